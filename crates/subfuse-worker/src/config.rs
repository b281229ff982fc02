//! Worker configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{WorkerError, WorkerResult};

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Chat-platform bot credential
    pub bot_token: String,
    /// Optional machine-translation API key
    pub translator_api_key: Option<String>,
    /// Working directory for temp artifacts
    pub work_dir: PathBuf,
    /// Path of the persisted translation cache
    pub cache_file: PathBuf,
    /// Override for worker pool capacity (auto-sized from the host if unset)
    pub max_jobs: Option<usize>,
    /// Concurrent jobs allowed per user
    pub per_user_cap: u8,
    /// Age past which an unreleased temp file is treated as orphaned
    pub orphan_max_age: Duration,
    /// Optional hard cap on each ffmpeg invocation
    pub ffmpeg_timeout: Option<Duration>,
    /// Graceful shutdown timeout
    pub shutdown_timeout: Duration,
    /// Run startup self-checks and exit without serving
    pub dry_run: bool,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            translator_api_key: None,
            work_dir: PathBuf::from("/tmp/subfuse"),
            cache_file: PathBuf::from("/tmp/subfuse/translation_cache.json"),
            max_jobs: None,
            per_user_cap: 2,
            orphan_max_age: Duration::from_secs(24 * 3600),
            ffmpeg_timeout: None,
            shutdown_timeout: Duration::from_secs(30),
            dry_run: false,
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    ///
    /// `BOT_TOKEN` is required; everything else has a default.
    pub fn from_env() -> WorkerResult<Self> {
        let bot_token = std::env::var("BOT_TOKEN")
            .map_err(|_| WorkerError::config_error("BOT_TOKEN is not set"))?;
        if bot_token.trim().is_empty() {
            return Err(WorkerError::config_error("BOT_TOKEN is empty"));
        }

        let work_dir = std::env::var("SUBFUSE_WORK_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp/subfuse"));

        let cache_file = std::env::var("SUBFUSE_CACHE_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| work_dir.join("translation_cache.json"));

        Ok(Self {
            bot_token,
            translator_api_key: std::env::var("TRANSLATOR_API_KEY")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            work_dir,
            cache_file,
            max_jobs: std::env::var("SUBFUSE_MAX_JOBS")
                .ok()
                .and_then(|s| s.parse().ok()),
            per_user_cap: std::env::var("SUBFUSE_PER_USER_CAP")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
            orphan_max_age: Duration::from_secs(
                std::env::var("SUBFUSE_ORPHAN_MAX_AGE_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(24 * 3600),
            ),
            ffmpeg_timeout: std::env::var("SUBFUSE_FFMPEG_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs),
            shutdown_timeout: Duration::from_secs(
                std::env::var("SUBFUSE_SHUTDOWN_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            dry_run: std::env::var("DRY_RUN")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = WorkerConfig::default();
        assert_eq!(cfg.per_user_cap, 2);
        assert_eq!(cfg.orphan_max_age, Duration::from_secs(86400));
        assert!(cfg.max_jobs.is_none());
        assert!(!cfg.dry_run);
    }
}
