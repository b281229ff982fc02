//! Logo resize and overlay compositing.

use image::imageops::FilterType;
use image::GenericImageView;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

use subfuse_models::LogoStyle;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::encode::{apply_profile, encode_threads, EncodeProfile};
use crate::error::{MediaError, MediaResult};
use crate::probe::probe_video;

/// Smallest dimension a resized logo may have.
const MIN_LOGO_PX: u32 = 16;

/// Decode an uploaded logo and re-save it as an RGBA PNG at `dest`.
///
/// Later pipeline stages can then assume one format with an alpha channel.
pub async fn normalize_logo(
    src: impl AsRef<Path>,
    dest: impl AsRef<Path>,
) -> MediaResult<()> {
    let src = src.as_ref().to_path_buf();
    let dest = dest.as_ref().to_path_buf();
    if !src.exists() {
        return Err(MediaError::FileNotFound(src));
    }

    tokio::task::spawn_blocking(move || -> MediaResult<()> {
        let img = image::open(&src)?;
        img.to_rgba8().save(&dest)?;
        Ok(())
    })
    .await
    .map_err(|e| MediaError::internal(format!("logo decode task panicked: {e}")))?
}

/// Resize a logo for a given video frame and bake the opacity into its
/// alpha channel. Returns the path of the prepared RGBA PNG.
///
/// The logo is scaled to `size_percent` of the video height, keeping aspect
/// ratio, and shrunk further if it would cover more than half the frame
/// width.
pub async fn prepare_logo(
    logo_path: impl AsRef<Path>,
    video_width: u32,
    video_height: u32,
    style: &LogoStyle,
    work_dir: impl AsRef<Path>,
) -> MediaResult<PathBuf> {
    let logo_path = logo_path.as_ref().to_path_buf();
    let work_dir = work_dir.as_ref().to_path_buf();
    if !logo_path.exists() {
        return Err(MediaError::FileNotFound(logo_path));
    }

    let style = *style;
    // image decoding is CPU-bound, keep it off the async workers
    let out_path = tokio::task::spawn_blocking(move || -> MediaResult<PathBuf> {
        let img = image::open(&logo_path)?;
        let (lw, lh) = img.dimensions();

        let target_h = ((video_height as f32 * style.size_percent as f32 / 100.0) as u32)
            .max(MIN_LOGO_PX);
        let mut ratio = target_h as f32 / lh as f32;
        let mut target_w = ((lw as f32 * ratio) as u32).max(MIN_LOGO_PX);

        // Never let the logo cover more than half the frame width
        let max_w = video_width / 2;
        if target_w > max_w {
            ratio = max_w as f32 / lw as f32;
            target_w = ((lw as f32 * ratio) as u32).max(MIN_LOGO_PX);
        }
        let target_h = ((lh as f32 * ratio) as u32).max(MIN_LOGO_PX);

        let mut rgba = img
            .resize_exact(target_w, target_h, FilterType::Lanczos3)
            .to_rgba8();

        if style.opacity_percent < 100 {
            let factor = style.opacity_percent as u32;
            for pixel in rgba.pixels_mut() {
                pixel.0[3] = (pixel.0[3] as u32 * factor / 100) as u8;
            }
        }

        let out_path = work_dir.join(format!(
            "logo_resized_{}.png",
            Uuid::new_v4().simple()
        ));
        rgba.save(&out_path)?;
        Ok(out_path)
    })
    .await
    .map_err(|e| MediaError::internal(format!("logo resize task panicked: {e}")))??;

    Ok(out_path)
}

/// Composite a prepared logo over a video.
///
/// Tries the quality-tuned encode first; on failure retries once with
/// conservative settings, re-applying opacity in the filter since the
/// fallback cannot assume the prepared alpha channel survived.
pub async fn overlay_logo(
    runner: &FfmpegRunner,
    input_video: impl AsRef<Path>,
    logo_path: impl AsRef<Path>,
    output_video: impl AsRef<Path>,
    style: &LogoStyle,
    work_dir: impl AsRef<Path>,
) -> MediaResult<()> {
    let input_video = input_video.as_ref();
    let logo_path = logo_path.as_ref();
    let work_dir = work_dir.as_ref();

    if !input_video.exists() {
        return Err(MediaError::FileNotFound(input_video.to_path_buf()));
    }

    let info = probe_video(input_video).await?;
    let profile = EncodeProfile::for_hd(info.is_hd());
    let width = info.width.unwrap_or(1280);
    let height = info.height_or_default();

    let prepared = prepare_logo(logo_path, width, height, style, work_dir).await?;
    let xy = style.anchor.overlay_expr();

    debug!(anchor = %style.anchor, profile = ?profile, "overlaying logo");

    let filter = format!("[1:v]format=rgba[logo];[0:v][logo]overlay={xy}");
    let cmd = FfmpegCommand::new(input_video, output_video.as_ref())
        .second_input(&prepared)
        .filter_complex(filter);
    let cmd = apply_profile(cmd, profile, encode_threads(num_threads()));

    let result = match runner.run(&cmd).await {
        Ok(()) => Ok(()),
        Err(primary_err) => {
            warn!(error = %primary_err, "quality-tuned overlay failed, retrying with conservative settings");
            let opacity = style.opacity_percent as f32 / 100.0;
            let fallback_filter = format!(
                "[1]format=rgba,colorchannelmixer=aa={opacity}[wm];[0][wm]overlay={xy}"
            );
            let fallback = FfmpegCommand::new(input_video, output_video.as_ref())
                .second_input(&prepared)
                .filter_complex(fallback_filter)
                .preset("veryfast")
                .video_codec("libx264")
                .audio_codec("copy");
            runner.run(&fallback).await
        }
    };

    let _ = fs::remove_file(&prepared).await;
    result
}

fn num_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(2)
}
