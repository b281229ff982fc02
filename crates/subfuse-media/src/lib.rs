#![deny(unreachable_patterns)]
//! FFmpeg CLI wrapper for the subfuse render pipeline.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building
//! - Video probing (resolution, duration, size)
//! - Speech-audio extraction for transcription
//! - SRT rendering and subtitle burning
//! - Logo preparation and overlay compositing

pub mod audio;
pub mod command;
pub mod encode;
pub mod error;
pub mod fs_utils;
pub mod overlay;
pub mod probe;
pub mod subtitles;

pub use audio::extract_speech_audio;
pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use encode::{encode_threads, EncodeProfile};
pub use error::{MediaError, MediaResult};
pub use fs_utils::{move_file, verify_output};
pub use overlay::{normalize_logo, overlay_logo, prepare_logo};
pub use probe::{probe_video, VideoInfo, HD_WIDTH};
pub use subtitles::{burn_subtitles, render_srt, write_srt};
