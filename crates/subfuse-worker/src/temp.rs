//! Temp artifact tracking and orphan sweeping.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Filename prefixes a job may create in the working directory. The orphan
/// sweep only ever touches files matching one of these.
const ARTIFACT_PREFIXES: &[&str] = &[
    "in_",
    "out_",
    "audio_",
    "subs_",
    "logo_",
    "logo_resized_",
];

/// Tracks every artifact a job creates so cleanup is guaranteed.
///
/// Paths are registered at allocation and must be released on the job's exit
/// path regardless of outcome. The startup orphan sweep catches anything a
/// crashed process left behind.
#[derive(Debug)]
pub struct TempManager {
    work_dir: PathBuf,
    active: Mutex<HashSet<PathBuf>>,
}

impl TempManager {
    pub fn new(work_dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let work_dir = work_dir.into();
        std::fs::create_dir_all(&work_dir)?;
        Ok(Self {
            work_dir,
            active: Mutex::new(HashSet::new()),
        })
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Allocate a unique path and register it as active. The file itself is
    /// created by whoever writes to the path.
    pub fn create(&self, prefix: &str, suffix: &str) -> PathBuf {
        let name = format!("{prefix}{}{suffix}", Uuid::new_v4().simple());
        let path = self.work_dir.join(name);
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        active.insert(path.clone());
        path
    }

    /// Delete the file if present and unregister it. Returns true if a file
    /// was actually removed; a missing file is not an error.
    pub fn release(&self, path: &Path) -> bool {
        {
            let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
            active.remove(path);
        }
        match std::fs::remove_file(path) {
            Ok(()) => true,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to delete temp artifact");
                false
            }
        }
    }

    pub fn release_all(&self, paths: &[PathBuf]) {
        for path in paths {
            self.release(path);
        }
    }

    /// Number of currently registered artifacts.
    pub fn active_count(&self) -> usize {
        let active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        active.len()
    }

    /// Delete artifact-patterned files older than `max_age` that no live job
    /// owns. Run once at startup.
    pub fn sweep_orphans(&self, max_age: Duration) -> usize {
        let entries = match std::fs::read_dir(&self.work_dir) {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "cannot scan work dir for orphans");
                return 0;
            }
        };

        let active = {
            let guard = self.active.lock().unwrap_or_else(|e| e.into_inner());
            guard.clone()
        };
        let now = SystemTime::now();
        let mut removed = 0;

        for entry in entries.flatten() {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !ARTIFACT_PREFIXES.iter().any(|p| name.starts_with(p)) {
                continue;
            }
            if active.contains(&path) {
                continue;
            }

            let old_enough = entry
                .metadata()
                .and_then(|m| m.modified())
                .ok()
                .and_then(|modified| now.duration_since(modified).ok())
                .is_some_and(|age| age > max_age);

            if old_enough {
                match std::fs::remove_file(&path) {
                    Ok(()) => {
                        debug!(path = %path.display(), "swept orphaned artifact");
                        removed += 1;
                    }
                    Err(e) => warn!(path = %path.display(), error = %e, "orphan sweep failed"),
                }
            }
        }

        if removed > 0 {
            info!(removed, "orphan sweep complete");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> (tempfile::TempDir, TempManager) {
        let dir = tempfile::tempdir().unwrap();
        let mgr = TempManager::new(dir.path()).unwrap();
        (dir, mgr)
    }

    #[test]
    fn test_create_release_round_trip() {
        let (_dir, mgr) = manager();
        let path = mgr.create("in_", ".mp4");
        assert!(path
            .file_name()
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("in_"));
        std::fs::write(&path, b"data").unwrap();
        assert_eq!(mgr.active_count(), 1);

        assert!(mgr.release(&path));
        assert!(!path.exists());
        assert_eq!(mgr.active_count(), 0);

        // Releasing a missing file is tolerated
        assert!(!mgr.release(&path));
    }

    #[test]
    fn test_create_yields_unique_paths() {
        let (_dir, mgr) = manager();
        let a = mgr.create("out_", ".mp4");
        let b = mgr.create("out_", ".mp4");
        assert_ne!(a, b);
    }

    #[test]
    fn test_sweep_respects_age_active_set_and_patterns() {
        let (dir, mgr) = manager();

        // Aged orphan, should be swept
        let orphan = dir.path().join("in_dead.mp4");
        std::fs::write(&orphan, b"x").unwrap();

        // Aged but active, must survive
        let active = mgr.create("audio_", ".wav");
        std::fs::write(&active, b"x").unwrap();

        // Aged but not artifact-patterned, must survive
        let foreign = dir.path().join("notes.txt");
        std::fs::write(&foreign, b"x").unwrap();

        std::thread::sleep(Duration::from_millis(1200));

        // Fresh orphan, must survive
        let fresh = dir.path().join("out_fresh.mp4");
        std::fs::write(&fresh, b"x").unwrap();

        let removed = mgr.sweep_orphans(Duration::from_secs(1));
        assert_eq!(removed, 1);
        assert!(!orphan.exists());
        assert!(active.exists());
        assert!(foreign.exists());
        assert!(fresh.exists());
    }
}
