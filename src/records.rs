//! Persistent personal records
//!
//! High score and best streak survive restarts in a small JSON file in the
//! config directory. Read once at startup, written whenever a record falls.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::constants::RECORDS_FILE;
use crate::events::GameEvent;
use crate::session::SessionEvents;

/// Records that survive between sessions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Records {
    pub high_score: u32,
    pub best_streak: u32,
    /// When a record last changed (RFC 3339)
    pub updated_at: Option<String>,
}

impl Records {
    /// Load records from the default file
    pub fn load() -> Self {
        Self::load_from(Path::new(RECORDS_FILE))
    }

    /// Load records from file, or return defaults if missing or unreadable
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No records found at {}, starting fresh", path.display());
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(records) => {
                    info!("Loaded records from {}", path.display());
                    records
                }
                Err(e) => {
                    warn!("Failed to parse {}: {}, starting fresh", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read {}: {}, starting fresh", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(Path::new(RECORDS_FILE))
    }

    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, json)?;
        info!("Saved records to {}", path.display());
        Ok(())
    }

    /// Fold a session event in. Returns true if a record changed.
    pub fn observe(&mut self, event: &GameEvent) -> bool {
        let changed = match *event {
            GameEvent::HighScoreChanged { value } if value > self.high_score => {
                self.high_score = value;
                true
            }
            GameEvent::StreakChanged { best, .. } if best > self.best_streak => {
                self.best_streak = best;
                true
            }
            _ => false,
        };
        if changed {
            self.updated_at = Some(chrono::Utc::now().to_rfc3339());
        }
        changed
    }
}

/// Resource tracking the loaded records and whether they need writing
#[derive(Resource, Default)]
pub struct CurrentRecords {
    pub records: Records,
    pub dirty: bool,
}

impl CurrentRecords {
    pub fn loaded() -> Self {
        Self {
            records: Records::load(),
            dirty: false,
        }
    }

    /// Save if dirty
    pub fn save_if_dirty(&mut self) {
        if self.dirty {
            if let Err(e) = self.records.save() {
                warn!("Failed to save records: {}", e);
            }
            self.dirty = false;
        }
    }
}

/// Raise the stored records from this frame's session events
pub fn track_records(frame_events: Res<SessionEvents>, mut records: ResMut<CurrentRecords>) {
    for bus_event in &frame_events.events {
        if records.records.observe(&bus_event.event) {
            records.dirty = true;
        }
    }
}

/// System to write records after a change
pub fn save_records_system(mut records: ResMut<CurrentRecords>) {
    records.save_if_dirty();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observe_only_raises_records() {
        let mut records = Records {
            high_score: 10,
            best_streak: 3,
            updated_at: None,
        };
        assert!(!records.observe(&GameEvent::HighScoreChanged { value: 8 }));
        assert!(!records.observe(&GameEvent::StreakChanged { current: 0, best: 3 }));
        assert!(records.updated_at.is_none());

        assert!(records.observe(&GameEvent::HighScoreChanged { value: 12 }));
        assert!(records.observe(&GameEvent::StreakChanged { current: 4, best: 4 }));
        assert_eq!(records.high_score, 12);
        assert_eq!(records.best_streak, 4);
        assert!(records.updated_at.is_some());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = std::env::temp_dir().join(format!("hoopshot-records-{}", uuid::Uuid::new_v4()));
        let path = dir.join("records.json");

        assert_eq!(Records::load_from(&path), Records::default());

        let records = Records {
            high_score: 14,
            best_streak: 5,
            updated_at: Some("2026-01-01T00:00:00+00:00".to_string()),
        };
        records.save_to(&path).unwrap();
        assert_eq!(Records::load_from(&path), records);

        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Records::load_from(&path), Records::default());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_fields_default() {
        let records: Records = serde_json::from_str(r#"{ "high_score": 6 }"#).unwrap();
        assert_eq!(records.high_score, 6);
        assert_eq!(records.best_streak, 0);
    }
}
