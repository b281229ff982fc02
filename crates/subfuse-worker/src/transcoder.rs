//! FFmpeg-backed transcoder.

use async_trait::async_trait;
use std::path::Path;

use subfuse_media::{burn_subtitles, extract_speech_audio, overlay_logo, FfmpegRunner};
use subfuse_models::{LogoStyle, SubtitleStyle};

use crate::config::WorkerConfig;
use crate::error::WorkerResult;
use crate::traits::Transcoder;

/// Production transcoder running the ffmpeg CLI.
pub struct FfmpegTranscoder {
    runner: FfmpegRunner,
}

impl FfmpegTranscoder {
    pub fn new(config: &WorkerConfig) -> Self {
        let mut runner = FfmpegRunner::new();
        if let Some(timeout) = config.ffmpeg_timeout {
            runner = runner.with_timeout(timeout.as_secs());
        }
        Self { runner }
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn extract_audio(&self, video: &Path, wav_out: &Path) -> WorkerResult<()> {
        extract_speech_audio(&self.runner, video, wav_out).await?;
        Ok(())
    }

    async fn burn_subtitles(
        &self,
        video: &Path,
        srt: &Path,
        output: &Path,
        style: &SubtitleStyle,
        work_dir: &Path,
    ) -> WorkerResult<()> {
        burn_subtitles(&self.runner, video, srt, output, style, work_dir).await?;
        Ok(())
    }

    async fn overlay_logo(
        &self,
        video: &Path,
        logo: &Path,
        output: &Path,
        style: &LogoStyle,
        work_dir: &Path,
    ) -> WorkerResult<()> {
        overlay_logo(&self.runner, video, logo, output, style, work_dir).await?;
        Ok(())
    }
}
