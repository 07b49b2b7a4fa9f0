//! Config file auto-reload system
//!
//! Polls the gameplay tuning file every few seconds and pushes new values into
//! the running session when it changes.

use bevy::prelude::*;
use std::fs;
use std::time::SystemTime;

use crate::session::{ActiveSession, ShotSession};
use crate::tuning::{GAMEPLAY_TUNING_FILE, PhysicsTweaks, load_tuning_from_file};

/// How often to check for config changes (seconds)
const CHECK_INTERVAL: f32 = 3.0;

/// Tracks modification time of the tuning file for hot-reload
#[derive(Resource)]
pub struct ConfigWatcher {
    /// Time since last check
    pub timer: f32,
    pub path: String,
    /// Last known modification time
    pub tuning_mtime: Option<SystemTime>,
}

impl Default for ConfigWatcher {
    fn default() -> Self {
        Self::watching(GAMEPLAY_TUNING_FILE)
    }
}

impl ConfigWatcher {
    pub fn watching(path: &str) -> Self {
        Self {
            timer: 0.0,
            path: path.to_string(),
            tuning_mtime: get_mtime(path),
        }
    }

    /// Advance the poll timer. Returns true when the file changed since the last
    /// look (appearing or disappearing counts).
    pub fn poll(&mut self, dt: f32) -> bool {
        self.timer += dt;
        if self.timer < CHECK_INTERVAL {
            return false;
        }
        self.timer = 0.0;

        let mtime = get_mtime(&self.path);
        if mtime == self.tuning_mtime {
            return false;
        }
        self.tuning_mtime = mtime;
        true
    }
}

/// Get file modification time, or None if file doesn't exist
fn get_mtime(path: &str) -> Option<SystemTime> {
    fs::metadata(path).ok().and_then(|m| m.modified().ok())
}

/// Push reloaded tuning into the resource, the session and the fixed clock.
/// The fixed timestep follows `time_step` so each tick still covers one `dt`.
/// Returns false when nothing changed.
pub fn apply_tuning(
    new_tweaks: PhysicsTweaks,
    tweaks: &mut PhysicsTweaks,
    session: &mut ShotSession,
    fixed: &mut Time<Fixed>,
) -> bool {
    if *tweaks == new_tweaks {
        return false;
    }
    if new_tweaks.time_step != tweaks.time_step {
        fixed.set_timestep_seconds(new_tweaks.time_step as f64);
    }
    *tweaks = new_tweaks.clone();
    session.set_tweaks(new_tweaks);
    true
}

/// Check for tuning changes and reload as needed. A broken edit keeps the
/// values already in use.
pub fn check_config_changes(
    time: Res<Time>,
    mut watcher: ResMut<ConfigWatcher>,
    mut tweaks: ResMut<PhysicsTweaks>,
    mut session: ResMut<ActiveSession>,
    mut fixed: ResMut<Time<Fixed>>,
) {
    if !watcher.poll(time.delta_secs()) {
        return;
    }

    match load_tuning_from_file(&watcher.path) {
        Ok(new_tweaks) => {
            if apply_tuning(new_tweaks, &mut tweaks, &mut session, &mut fixed) {
                info!("Auto-reloaded tuning from {}", watcher.path);
            }
        }
        Err(e) => warn!("{}, keeping current tuning", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::CourtGeometry;

    #[test]
    fn test_poll_waits_for_interval_and_change() {
        let dir = std::env::temp_dir().join(format!("hoopshot-watch-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("tuning.json");
        let path_str = path.to_string_lossy().to_string();

        let mut watcher = ConfigWatcher::watching(&path_str);
        assert!(watcher.tuning_mtime.is_none());
        assert!(!watcher.poll(CHECK_INTERVAL + 1.0));

        fs::write(&path, "{}").unwrap();
        // Not due yet
        assert!(!watcher.poll(0.1));
        assert!(watcher.poll(CHECK_INTERVAL));
        // Seen already
        assert!(!watcher.poll(CHECK_INTERVAL));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_reloaded_time_step_retunes_fixed_clock() {
        let mut tweaks = PhysicsTweaks::default();
        let mut session = ShotSession::new(CourtGeometry::standard(), tweaks.clone());
        let mut fixed = Time::<Fixed>::from_seconds(tweaks.time_step as f64);

        let mut faster = tweaks.clone();
        faster.time_step = 1.0 / 120.0;
        assert!(apply_tuning(faster.clone(), &mut tweaks, &mut session, &mut fixed));
        assert_eq!(tweaks, faster);
        assert_eq!(session.tweaks().time_step, 1.0 / 120.0);
        assert!((fixed.timestep().as_secs_f64() - 1.0 / 120.0).abs() < 1e-6);

        // Same values again: nothing to do
        assert!(!apply_tuning(faster, &mut tweaks, &mut session, &mut fixed));
    }

    #[test]
    fn test_reload_without_step_change_keeps_fixed_clock() {
        let mut tweaks = PhysicsTweaks::default();
        let mut session = ShotSession::new(CourtGeometry::standard(), tweaks.clone());
        let mut fixed = Time::<Fixed>::from_seconds(tweaks.time_step as f64);
        let before = fixed.timestep();

        let mut heavier = tweaks.clone();
        heavier.gravity += 2.0;
        assert!(apply_tuning(heavier, &mut tweaks, &mut session, &mut fixed));
        assert_eq!(fixed.timestep(), before);
    }
}
