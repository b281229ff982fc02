//! Startup self-checks.

use tracing::info;

use subfuse_media::{check_ffmpeg, check_ffprobe, render_srt};
use subfuse_models::{SubtitleStyle, TranscriptSegment};

use crate::cache::TranslationCache;
use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::temp::TempManager;

/// Verify the process can actually do its job before serving.
///
/// Checks the transcoder binaries, the work directory, cache persistence,
/// and the subtitle renderer. Any failure here is startup-fatal.
pub fn run_self_checks(config: &WorkerConfig) -> WorkerResult<()> {
    let ffmpeg = check_ffmpeg()?;
    let ffprobe = check_ffprobe()?;
    info!(ffmpeg = %ffmpeg.display(), ffprobe = %ffprobe.display(), "transcoder binaries found");

    let temp = TempManager::new(&config.work_dir)?;
    let check_path = temp.create("out_", ".check");
    std::fs::write(&check_path, b"ok")?;
    if !temp.release(&check_path) {
        return Err(WorkerError::config_error(
            "work directory is not writable",
        ));
    }

    let cache = TranslationCache::new(&config.cache_file);
    cache.store("self check", "he", "ok");
    cache.save()?;
    cache.load();
    if cache.lookup("self check", "he").as_deref() != Some("ok") {
        return Err(WorkerError::config_error(
            "translation cache round trip failed",
        ));
    }

    let srt = render_srt(&[TranscriptSegment::new(0.0, 1.0, "check")])
        .map_err(WorkerError::from)?;
    if !srt.contains("00:00:01,000") {
        return Err(WorkerError::config_error("subtitle renderer broken"));
    }
    let style = SubtitleStyle::default().force_style();
    if !style.contains("FontSize=") {
        return Err(WorkerError::config_error("subtitle style renderer broken"));
    }

    info!("self checks passed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_checks_with_writable_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = WorkerConfig {
            work_dir: dir.path().to_path_buf(),
            cache_file: dir.path().join("cache.json"),
            ..Default::default()
        };
        // Skippable on hosts without ffmpeg; everything past the binary
        // check must pass
        match run_self_checks(&config) {
            Ok(()) => {}
            Err(WorkerError::Media(subfuse_media::MediaError::FfmpegNotFound))
            | Err(WorkerError::Media(subfuse_media::MediaError::FfprobeNotFound)) => {}
            Err(e) => panic!("unexpected self check failure: {e}"),
        }
    }
}
