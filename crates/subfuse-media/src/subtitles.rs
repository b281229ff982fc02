//! SRT rendering and subtitle burning.

use std::path::Path;
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

use subfuse_models::{SubtitleStyle, TranscriptSegment};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::encode::{apply_profile, encode_threads, EncodeProfile};
use crate::error::{MediaError, MediaResult};
use crate::probe::probe_video;

/// Render segments as an SRT document.
pub fn render_srt(segments: &[TranscriptSegment]) -> MediaResult<String> {
    if segments.is_empty() {
        return Err(MediaError::internal("no segments to render"));
    }

    let mut out = String::new();
    for (i, seg) in segments.iter().enumerate() {
        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            i + 1,
            seg.start_timestamp(),
            seg.end_timestamp(),
            seg.text.trim()
        ));
    }
    Ok(out)
}

/// Write segments to an SRT file.
pub async fn write_srt(
    segments: &[TranscriptSegment],
    srt_path: impl AsRef<Path>,
) -> MediaResult<()> {
    let content = render_srt(segments)?;
    fs::write(srt_path.as_ref(), content).await?;
    Ok(())
}

/// Burn an SRT file into a video with the given style.
///
/// The video and SRT are copied into `work_dir` under short relative names
/// and ffmpeg runs from there, so the `subtitles` filter never sees a path
/// that needs quoting. A quality-tuned encode is tried first; if it fails,
/// a single conservative fallback runs before giving up.
pub async fn burn_subtitles(
    runner: &FfmpegRunner,
    input_video: impl AsRef<Path>,
    srt_path: impl AsRef<Path>,
    output_video: impl AsRef<Path>,
    style: &SubtitleStyle,
    work_dir: impl AsRef<Path>,
) -> MediaResult<()> {
    let input_video = input_video.as_ref();
    let srt_path = srt_path.as_ref();
    let work_dir = work_dir.as_ref();

    if !input_video.exists() {
        return Err(MediaError::FileNotFound(input_video.to_path_buf()));
    }
    if !srt_path.exists() {
        return Err(MediaError::FileNotFound(srt_path.to_path_buf()));
    }

    let info = probe_video(input_video).await?;
    let profile = EncodeProfile::for_hd(info.is_hd());

    let short_id = Uuid::new_v4().simple().to_string()[..8].to_string();
    let v_name = format!("in_{short_id}.mp4");
    let srt_name = format!("subs_{short_id}.srt");
    let out_name = format!("out_{short_id}.mp4");

    fs::copy(input_video, work_dir.join(&v_name)).await?;
    fs::copy(srt_path, work_dir.join(&srt_name)).await?;

    let vf = format!(
        "subtitles=filename='{}':force_style='{}'",
        srt_name,
        style.force_style()
    );

    let cmd = FfmpegCommand::new(&v_name, &out_name)
        .current_dir(work_dir)
        .video_filter(vf);
    let cmd = apply_profile(cmd, profile, encode_threads(num_threads()));

    debug!(profile = ?profile, "burning subtitles");

    let result = match runner.run(&cmd).await {
        Ok(()) => Ok(()),
        Err(primary_err) => {
            warn!(error = %primary_err, "quality-tuned burn failed, retrying with conservative settings");
            let fallback = FfmpegCommand::new(&v_name, &out_name)
                .current_dir(work_dir)
                .video_filter(format!("subtitles=filename='{srt_name}'"))
                .preset("veryfast")
                .video_codec("libx264")
                .audio_codec("copy");
            runner.run(&fallback).await
        }
    };

    let cleanup = async {
        let _ = fs::remove_file(work_dir.join(&v_name)).await;
        let _ = fs::remove_file(work_dir.join(&srt_name)).await;
    };

    match result {
        Ok(()) => {
            crate::fs_utils::move_file(work_dir.join(&out_name), output_video.as_ref()).await?;
            cleanup.await;
            Ok(())
        }
        Err(e) => {
            cleanup.await;
            let _ = fs::remove_file(work_dir.join(&out_name)).await;
            Err(e)
        }
    }
}

fn num_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_srt() {
        let segments = vec![
            TranscriptSegment::new(0.0, 1.5, "hello"),
            TranscriptSegment::new(1.5, 3.0, "  world  "),
        ];
        let srt = render_srt(&segments).unwrap();
        let expected = "1\n00:00:00,000 --> 00:00:01,500\nhello\n\n\
                        2\n00:00:01,500 --> 00:00:03,000\nworld\n\n";
        assert_eq!(srt, expected);
    }

    #[test]
    fn test_render_srt_rejects_empty() {
        assert!(render_srt(&[]).is_err());
    }

    #[tokio::test]
    async fn test_write_srt_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subs.srt");
        let segments = vec![TranscriptSegment::new(0.0, 1.0, "x")];
        write_srt(&segments, &path).await.unwrap();
        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(content.starts_with("1\n00:00:00,000"));
    }
}
