//! SQLite shot history
//!
//! Every resolved possession is appended with where it was taken from, how hard,
//! and whether it went in. Uses WAL mode so the `simulate` tool can write while
//! something else reads.

use bevy::prelude::*;
use rusqlite::{Connection, Result, params};
use std::path::Path;
use std::sync::Mutex;

use crate::events::{BusEvent, GameEvent, serialize_event};
use crate::session::SessionEvents;
use crate::world::Side;

/// One finished shot, ready to store
#[derive(Debug, Clone, PartialEq)]
pub struct ShotRow {
    pub side: Side,
    pub origin: Vec3,
    pub power: u8,
    pub speed: f32,
    pub angle: f32,
    pub feasible: bool,
    pub made: bool,
    pub flight_ticks: u64,
}

/// Pairs each ShotAttempted with the ShotResolved that closes it
#[derive(Debug, Default)]
pub struct ShotTracker {
    pending: Option<(u64, ShotRow)>,
}

impl ShotTracker {
    /// Feed one bus event. Returns a row when a possession closes.
    pub fn observe(&mut self, bus_event: &BusEvent) -> Option<ShotRow> {
        match bus_event.event {
            GameEvent::ShotAttempted {
                side,
                power,
                speed,
                angle,
                feasible,
                origin,
            } => {
                let row = ShotRow {
                    side,
                    origin,
                    power,
                    speed,
                    angle,
                    feasible,
                    made: false,
                    flight_ticks: 0,
                };
                self.pending = Some((bus_event.tick, row));
                None
            }
            GameEvent::ShotResolved { made } => {
                let (start, mut row) = self.pending.take()?;
                row.made = made;
                row.flight_ticks = bus_event.tick.saturating_sub(start);
                Some(row)
            }
            _ => None,
        }
    }
}

/// Database wrapper for shot history
pub struct ShotHistory {
    conn: Connection,
}

impl ShotHistory {
    /// Open or create a database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!("Failed to create history directory {}: {}", parent.display(), e);
            return Err(rusqlite::Error::InvalidPath(parent.to_path_buf()));
        }
        let conn = Connection::open(path)?;

        // Enable WAL mode for concurrent reads during writes
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;

        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY,
                created_at TEXT NOT NULL,
                session_type TEXT NOT NULL,
                config_json TEXT
            );

            CREATE TABLE IF NOT EXISTS shots (
                id INTEGER PRIMARY KEY,
                session_id TEXT REFERENCES sessions(id),
                side TEXT NOT NULL,
                origin_x REAL NOT NULL,
                origin_z REAL NOT NULL,
                power INTEGER NOT NULL,
                speed REAL NOT NULL,
                angle REAL NOT NULL,
                feasible INTEGER NOT NULL,
                made INTEGER NOT NULL,
                flight_ticks INTEGER NOT NULL,
                created_at TEXT DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_shots_session ON shots(session_id);
            CREATE INDEX IF NOT EXISTS idx_shots_power ON shots(power);

            -- Raw session events in the compact text format
            CREATE TABLE IF NOT EXISTS events (
                id INTEGER PRIMARY KEY,
                session_id TEXT REFERENCES sessions(id),
                tick INTEGER NOT NULL,
                event_type TEXT NOT NULL,
                line TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_events_session ON events(session_id, tick);
            "#,
        )?;
        Ok(())
    }

    /// Create a new session and return its ID
    pub fn create_session(&self, session_type: &str, config_json: Option<&str>) -> Result<String> {
        let id = uuid::Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now().to_rfc3339();

        self.conn.execute(
            "INSERT INTO sessions (id, created_at, session_type, config_json)
             VALUES (?1, ?2, ?3, ?4)",
            params![id, created_at, session_type, config_json],
        )?;

        Ok(id)
    }

    /// Append a finished shot and return its row ID
    pub fn insert_shot(&self, session_id: &str, shot: &ShotRow) -> Result<i64> {
        self.conn.execute(
            r#"INSERT INTO shots
               (session_id, side, origin_x, origin_z, power, speed, angle,
                feasible, made, flight_ticks)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"#,
            params![
                session_id,
                shot.side.name(),
                shot.origin.x,
                shot.origin.z,
                shot.power,
                shot.speed,
                shot.angle,
                shot.feasible,
                shot.made,
                shot.flight_ticks as i64,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Insert many shots in one transaction
    pub fn insert_shots(&mut self, session_id: &str, shots: &[ShotRow]) -> Result<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"INSERT INTO shots
                   (session_id, side, origin_x, origin_z, power, speed, angle,
                    feasible, made, flight_ticks)
                   VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"#,
            )?;
            for shot in shots {
                stmt.execute(params![
                    session_id,
                    shot.side.name(),
                    shot.origin.x,
                    shot.origin.z,
                    shot.power,
                    shot.speed,
                    shot.angle,
                    shot.feasible,
                    shot.made,
                    shot.flight_ticks as i64,
                ])?;
            }
        }
        tx.commit()
    }

    /// Store a session event as a compact text line
    pub fn insert_event(&self, session_id: &str, bus_event: &BusEvent) -> Result<()> {
        self.conn.execute(
            "INSERT INTO events (session_id, tick, event_type, line) VALUES (?1, ?2, ?3, ?4)",
            params![
                session_id,
                bus_event.tick as i64,
                bus_event.event.type_code(),
                serialize_event(bus_event.tick, &bus_event.event),
            ],
        )?;
        Ok(())
    }

    /// Event lines for a session, in tick order
    pub fn event_lines(&self, session_id: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT line FROM events WHERE session_id = ?1 ORDER BY tick, id")?;
        let rows = stmt.query_map(params![session_id], |row| row.get(0))?;
        rows.collect()
    }

    /// Totals for one session
    pub fn session_summary(&self, session_id: &str) -> Result<SessionSummary> {
        self.conn.query_row(
            r#"SELECT
                COUNT(*),
                COALESCE(SUM(made), 0),
                COALESCE(SUM(CASE WHEN feasible = 0 THEN 1 ELSE 0 END), 0),
                COALESCE(AVG(flight_ticks), 0.0)
               FROM shots WHERE session_id = ?1"#,
            params![session_id],
            |row| {
                Ok(SessionSummary {
                    session_id: session_id.to_string(),
                    shots: row.get(0)?,
                    made: row.get(1)?,
                    infeasible: row.get(2)?,
                    avg_flight_ticks: row.get(3)?,
                })
            },
        )
    }

    /// Make rate per power level across all sessions, lowest power first
    pub fn make_rate_by_power(&self) -> Result<Vec<(u8, u32, u32)>> {
        let mut stmt = self.conn.prepare(
            "SELECT power, COUNT(*), SUM(made) FROM shots GROUP BY power ORDER BY power",
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?;
        rows.collect()
    }

    pub fn shot_count(&self) -> Result<u64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM shots", [], |row| row.get(0))
    }

    pub fn session_count(&self) -> Result<u64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))
    }
}

/// Aggregate stats for a session
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub session_id: String,
    pub shots: u32,
    pub made: u32,
    pub infeasible: u32,
    pub avg_flight_ticks: f64,
}

impl SessionSummary {
    pub fn make_rate(&self) -> f64 {
        if self.shots == 0 {
            0.0
        } else {
            self.made as f64 / self.shots as f64
        }
    }

    /// One-line report for logs
    pub fn describe(&self) -> String {
        format!(
            "Session {}: {} shots, {} made ({:.1}%), {} out of range, {:.0} ticks average flight",
            self.session_id,
            self.shots,
            self.made,
            self.make_rate() * 100.0,
            self.infeasible,
            self.avg_flight_ticks
        )
    }
}

/// Resource that appends the interactive game's shots to the history database.
/// The connection is wrapped in a Mutex so the resource stays `Sync`.
#[derive(Resource)]
pub struct HistoryRecorder {
    history: Mutex<ShotHistory>,
    tracker: ShotTracker,
    session_id: String,
}

impl HistoryRecorder {
    /// Open the database and start a new interactive session in it
    pub fn open(path: &Path) -> Result<Self> {
        let history = ShotHistory::open(path)?;
        let session_id = history.create_session("interactive", None)?;
        Ok(Self {
            history: Mutex::new(history),
            tracker: ShotTracker::default(),
            session_id,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Store one event, plus the shot row when it closes a possession
    pub fn record(&mut self, bus_event: &BusEvent) {
        let Ok(history) = self.history.get_mut() else {
            warn!("Shot history lock poisoned, dropping event");
            return;
        };
        if let Err(e) = history.insert_event(&self.session_id, bus_event) {
            warn!("Failed to store event: {}", e);
        }
        if let Some(row) = self.tracker.observe(bus_event)
            && let Err(e) = history.insert_shot(&self.session_id, &row)
        {
            warn!("Failed to store shot: {}", e);
        }
    }

    /// Summary of everything recorded so far this session
    pub fn summary(&self) -> Option<SessionSummary> {
        let history = self.history.lock().ok()?;
        history.session_summary(&self.session_id).ok()
    }

    /// This session's stored event lines, in tick order
    pub fn event_lines(&self) -> Option<Vec<String>> {
        let history = self.history.lock().ok()?;
        history.event_lines(&self.session_id).ok()
    }
}

/// Append this frame's session events to the history database, if one is open
pub fn record_history(frame_events: Res<SessionEvents>, recorder: Option<ResMut<HistoryRecorder>>) {
    let Some(mut recorder) = recorder else {
        return;
    };
    for bus_event in &frame_events.events {
        recorder.record(bus_event);
    }
}

/// Log the session totals when the app is closing. The full event log goes
/// out at debug level.
pub fn log_history_on_exit(
    mut exits: MessageReader<AppExit>,
    recorder: Option<Res<HistoryRecorder>>,
) {
    if exits.read().count() == 0 {
        return;
    }
    let Some(recorder) = recorder else {
        return;
    };
    match recorder.summary() {
        Some(summary) => info!("{}", summary.describe()),
        None => warn!("Could not read back session {}", recorder.session_id()),
    }
    for line in recorder.event_lines().unwrap_or_default() {
        debug!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::parse_event;

    fn sample_shot(power: u8, made: bool) -> ShotRow {
        ShotRow {
            side: Side::Right,
            origin: Vec3::new(1.0, 0.7, -2.0),
            power,
            speed: 12.75,
            angle: 1.2,
            feasible: true,
            made,
            flight_ticks: 200,
        }
    }

    #[test]
    fn test_create_database() {
        let db = ShotHistory::open_in_memory().unwrap();
        assert_eq!(db.shot_count().unwrap(), 0);
        assert_eq!(db.session_count().unwrap(), 0);
    }

    #[test]
    fn test_session_summary() {
        let mut db = ShotHistory::open_in_memory().unwrap();
        let session_id = db.create_session("test", None).unwrap();

        db.insert_shot(&session_id, &sample_shot(50, true)).unwrap();
        db.insert_shots(&session_id, &[sample_shot(50, false), sample_shot(100, true)])
            .unwrap();

        let summary = db.session_summary(&session_id).unwrap();
        assert_eq!(summary.shots, 3);
        assert_eq!(summary.made, 2);
        assert_eq!(summary.infeasible, 0);
        assert!((summary.avg_flight_ticks - 200.0).abs() < 1e-9);
        assert!((summary.make_rate() - 2.0 / 3.0).abs() < 1e-9);

        let by_power = db.make_rate_by_power().unwrap();
        assert_eq!(by_power, vec![(50, 2, 1), (100, 1, 1)]);
    }

    #[test]
    fn test_empty_session_summary() {
        let db = ShotHistory::open_in_memory().unwrap();
        let session_id = db.create_session("test", None).unwrap();
        let summary = db.session_summary(&session_id).unwrap();
        assert_eq!(summary.shots, 0);
        assert_eq!(summary.make_rate(), 0.0);
    }

    #[test]
    fn test_tracker_pairs_attempt_with_resolution() {
        let mut tracker = ShotTracker::default();
        let attempt = BusEvent {
            tick: 10,
            event: GameEvent::ShotAttempted {
                side: Side::Left,
                power: 40,
                speed: 11.7,
                angle: 0.9,
                feasible: true,
                origin: Vec3::new(-3.0, 0.7, 1.0),
            },
        };
        assert!(tracker.observe(&attempt).is_none());
        let scored = BusEvent {
            tick: 120,
            event: GameEvent::ShotScored {
                side: Side::Left,
                score: 2,
            },
        };
        assert!(tracker.observe(&scored).is_none());

        let row = tracker
            .observe(&BusEvent { tick: 250, event: GameEvent::ShotResolved { made: true } })
            .unwrap();
        assert_eq!(row.side, Side::Left);
        assert_eq!(row.power, 40);
        assert!(row.made);
        assert_eq!(row.flight_ticks, 240);

        // A resolution without an attempt (scripted drop) produces nothing
        assert!(tracker
            .observe(&BusEvent { tick: 300, event: GameEvent::ShotResolved { made: false } })
            .is_none());
    }

    #[test]
    fn test_events_stored_as_lines() {
        let db = ShotHistory::open_in_memory().unwrap();
        let session_id = db.create_session("test", None).unwrap();
        db.insert_event(&session_id, &BusEvent { tick: 7, event: GameEvent::BallReset })
            .unwrap();
        db.insert_event(
            &session_id,
            &BusEvent { tick: 3, event: GameEvent::HighScoreChanged { value: 6 } },
        )
        .unwrap();

        let lines = db.event_lines(&session_id).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(parse_event(&lines[0]), Some((3, GameEvent::HighScoreChanged { value: 6 })));
        assert_eq!(parse_event(&lines[1]), Some((7, GameEvent::BallReset)));
    }

    #[test]
    fn test_open_fails_when_directory_cannot_be_created() {
        let dir = std::env::temp_dir().join(format!("hoopshot-history-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        // A plain file where the database directory should go
        let blocker = dir.join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();

        let result = ShotHistory::open(&blocker.join("shots.db"));
        assert!(matches!(result, Err(rusqlite::Error::InvalidPath(p)) if p == blocker));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_recorder_stores_closed_possessions() {
        let dir = std::env::temp_dir().join(format!("hoopshot-history-{}", uuid::Uuid::new_v4()));
        let mut recorder = HistoryRecorder::open(&dir.join("shots.db")).unwrap();

        recorder.record(&BusEvent {
            tick: 10,
            event: GameEvent::ShotAttempted {
                side: Side::Right,
                power: 100,
                speed: 18.0,
                angle: 1.2,
                feasible: true,
                origin: Vec3::new(0.0, 0.7, 0.0),
            },
        });
        recorder.record(&BusEvent { tick: 250, event: GameEvent::ShotResolved { made: true } });

        let summary = recorder.summary().unwrap();
        assert_eq!(summary.session_id, recorder.session_id());
        assert_eq!(summary.shots, 1);
        assert_eq!(summary.made, 1);
        assert_eq!(summary.avg_flight_ticks, 240.0);
        assert!(summary.describe().contains("1 shots, 1 made (100.0%)"));

        let lines = recorder.event_lines().unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            parse_event(&lines[1]),
            Some((250, GameEvent::ShotResolved { made: true }))
        );

        drop(recorder);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
