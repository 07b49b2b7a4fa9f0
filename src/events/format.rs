//! Compact text format for session event logs
//!
//! Format: `T:NNNNNN|CODE|data...`
//! - T:NNNNNN = simulation tick (6 digits, wraps at 999999)
//! - CODE = 2-char event type code
//! - data = pipe-separated values specific to event type
//!
//! Examples:
//! ```text
//! T:000000|SE|6f1c...|2026-03-01T12:00:00+00:00
//! T:000012|SA|right|100|18.00|1.307|1|0.00,0.70,0.00
//! T:000131|SC|right|2
//! T:000240|AR|15.21,0.70,0.40
//! T:000240|SR|1
//! ```

use bevy::prelude::*;

use super::types::GameEvent;
use crate::world::Side;

fn fmt_vec(v: Vec3) -> String {
    format!("{:.2},{:.2},{:.2}", v.x, v.y, v.z)
}

fn fmt_bool(b: bool) -> &'static str {
    if b { "1" } else { "0" }
}

/// Serialize a GameEvent to compact text format
pub fn serialize_event(tick: u64, event: &GameEvent) -> String {
    let ts = format!("T:{:06}", tick % 1_000_000);
    let code = event.type_code();

    let data = match event {
        GameEvent::SessionStart {
            session_id,
            timestamp,
        } => format!("{}|{}", session_id, timestamp),
        GameEvent::ShotAttempted {
            side,
            power,
            speed,
            angle,
            feasible,
            origin,
        } => format!(
            "{}|{}|{:.2}|{:.3}|{}|{}",
            side,
            power,
            speed,
            angle,
            fmt_bool(*feasible),
            fmt_vec(*origin)
        ),
        GameEvent::ShotScored { side, score } => format!("{}|{}", side, score),
        GameEvent::ShotResolved { made } => fmt_bool(*made).to_string(),
        GameEvent::StreakChanged { current, best } => format!("{}|{}", current, best),
        GameEvent::HighScoreChanged { value } => value.to_string(),
        GameEvent::BallAtRest { position } => fmt_vec(*position),
        GameEvent::BallReset => String::new(),
    };

    if data.is_empty() {
        format!("{}|{}", ts, code)
    } else {
        format!("{}|{}|{}", ts, code, data)
    }
}

/// Parse a compact text line back into a GameEvent
pub fn parse_event(line: &str) -> Option<(u64, GameEvent)> {
    let parts: Vec<&str> = line.split('|').collect();
    if parts.len() < 2 {
        return None;
    }

    let tick: u64 = parts[0].strip_prefix("T:")?.parse().ok()?;
    let code = parts[1];
    let data = &parts[2..];

    let event = match code {
        "SE" if data.len() >= 2 => GameEvent::SessionStart {
            session_id: data[0].to_string(),
            timestamp: data[1].to_string(),
        },
        "SA" if data.len() >= 6 => GameEvent::ShotAttempted {
            side: parse_side(data[0])?,
            power: data[1].parse().ok()?,
            speed: data[2].parse().ok()?,
            angle: data[3].parse().ok()?,
            feasible: data[4] == "1",
            origin: parse_vec(data[5])?,
        },
        "SC" if data.len() >= 2 => GameEvent::ShotScored {
            side: parse_side(data[0])?,
            score: data[1].parse().ok()?,
        },
        "SR" if !data.is_empty() => GameEvent::ShotResolved {
            made: data[0] == "1",
        },
        "SK" if data.len() >= 2 => GameEvent::StreakChanged {
            current: data[0].parse().ok()?,
            best: data[1].parse().ok()?,
        },
        "HS" if !data.is_empty() => GameEvent::HighScoreChanged {
            value: data[0].parse().ok()?,
        },
        "AR" if !data.is_empty() => GameEvent::BallAtRest {
            position: parse_vec(data[0])?,
        },
        "RB" => GameEvent::BallReset,
        _ => return None,
    };

    Some((tick, event))
}

fn parse_side(s: &str) -> Option<Side> {
    match s {
        "left" => Some(Side::Left),
        "right" => Some(Side::Right),
        _ => None,
    }
}

fn parse_vec(s: &str) -> Option<Vec3> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return None;
    }
    Some(Vec3::new(
        parts[0].parse().ok()?,
        parts[1].parse().ok()?,
        parts[2].parse().ok()?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_shot_attempt() {
        let event = GameEvent::ShotAttempted {
            side: Side::Right,
            power: 100,
            speed: 18.0,
            angle: 1.307,
            feasible: true,
            origin: Vec3::new(0.0, 0.7, -2.5),
        };
        let line = serialize_event(12, &event);
        assert_eq!(line, "T:000012|SA|right|100|18.00|1.307|1|0.00,0.70,-2.50");

        let (tick, parsed) = parse_event(&line).unwrap();
        assert_eq!(tick, 12);
        if let GameEvent::ShotAttempted {
            side,
            power,
            feasible,
            origin,
            ..
        } = parsed
        {
            assert_eq!(side, Side::Right);
            assert_eq!(power, 100);
            assert!(feasible);
            assert!((origin.z - -2.5).abs() < 0.01);
        } else {
            panic!("Wrong event type");
        }
    }

    #[test]
    fn test_dataless_event() {
        let line = serialize_event(5, &GameEvent::BallReset);
        assert_eq!(line, "T:000005|RB");
        assert_eq!(parse_event(&line), Some((5, GameEvent::BallReset)));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_event("nonsense").is_none());
        assert!(parse_event("T:000001|SC|middle|2").is_none());
        assert!(parse_event("T:000001|ZZ|1").is_none());
    }
}
