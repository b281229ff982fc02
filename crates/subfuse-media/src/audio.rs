//! Audio extraction for speech recognition.

use std::path::Path;
use tracing::debug;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Denoise plus dynamic-range compression applied before transcription.
const SPEECH_FILTER: &str =
    "afftdn=nr=12,compand=0.3|0.3:1|1:-90/-60|-60/-40|-40/-30|-20/-20:6:0:-90:0.2";

/// Extract mono 16 kHz WAV audio suitable for speech recognition.
pub async fn extract_speech_audio(
    runner: &FfmpegRunner,
    video: impl AsRef<Path>,
    wav_out: impl AsRef<Path>,
) -> MediaResult<()> {
    let video = video.as_ref();
    if !video.exists() {
        return Err(MediaError::FileNotFound(video.to_path_buf()));
    }

    debug!(video = %video.display(), "extracting speech audio");

    let cmd = FfmpegCommand::new(video, wav_out.as_ref())
        .output_arg("-vn")
        .output_arg("-ac")
        .output_arg("1")
        .output_arg("-ar")
        .output_arg("16000")
        .output_arg("-af")
        .output_arg(SPEECH_FILTER)
        .output_arg("-sample_fmt")
        .output_arg("s16")
        .output_arg("-threads")
        .output_arg("2");

    runner.run(&cmd).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speech_audio_args() {
        let cmd = FfmpegCommand::new("in.mp4", "out.wav")
            .output_arg("-vn")
            .output_arg("-ac")
            .output_arg("1")
            .output_arg("-ar")
            .output_arg("16000")
            .output_arg("-af")
            .output_arg(SPEECH_FILTER);
        let args = cmd.build_args();
        assert!(args.contains(&"-vn".to_string()));
        assert!(args.contains(&"16000".to_string()));
        assert!(args.iter().any(|a| a.starts_with("afftdn=")));
    }

    #[tokio::test]
    async fn test_missing_input_is_rejected() {
        let runner = FfmpegRunner::new();
        let err = extract_speech_audio(&runner, "/nonexistent/clip.mp4", "/tmp/out.wav")
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
    }
}
