//! Seams to the external collaborators the pipeline drives.
//!
//! Concrete implementations bind the chat platform, the speech model, and
//! the translation backend; the orchestrator only sees these traits.

use async_trait::async_trait;
use std::path::Path;

use subfuse_models::{LogoStyle, SubtitleStyle, TranscriptSegment};

use crate::error::WorkerResult;

/// Reference to a file offered by the chat platform, before transfer.
#[derive(Debug, Clone)]
pub struct FileRef {
    /// Platform-side file identifier
    pub id: String,
    /// Size the platform claims, if any; checked against ceilings before
    /// the transfer starts
    pub declared_size: Option<u64>,
    /// Original file name, used for extension checks
    pub file_name: Option<String>,
}

/// Result of one transcription pass.
#[derive(Debug, Clone)]
pub struct Transcription {
    pub segments: Vec<TranscriptSegment>,
    /// Language the recognizer detected in the audio
    pub detected_language: String,
}

/// Speech-to-text backend.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    async fn transcribe(&self, audio: &Path) -> WorkerResult<Transcription>;
}

/// Machine-translation backend. `translate_batch` is order-preserving and
/// returns exactly one translation per input.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate_batch(&self, texts: &[String], dest_lang: &str)
        -> WorkerResult<Vec<String>>;
}

/// Outbound messaging and file transfer against the chat platform.
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    /// Send a plain text message to the user.
    async fn send_text(&self, user: subfuse_models::UserId, text: &str) -> WorkerResult<()>;

    /// Send a rendered video with a caption.
    async fn send_video(
        &self,
        user: subfuse_models::UserId,
        video: &Path,
        caption: &str,
    ) -> WorkerResult<()>;

    /// Download a platform file to `dest`, returning the byte count.
    async fn download_file(&self, file: &FileRef, dest: &Path) -> WorkerResult<u64>;
}

/// Media-edit operations the pipeline drives.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Extract speech-ready audio from a video into `wav_out`.
    async fn extract_audio(&self, video: &Path, wav_out: &Path) -> WorkerResult<()>;

    /// Burn a subtitle file into a video, scratch files going to `work_dir`.
    async fn burn_subtitles(
        &self,
        video: &Path,
        srt: &Path,
        output: &Path,
        style: &SubtitleStyle,
        work_dir: &Path,
    ) -> WorkerResult<()>;

    /// Composite a registered logo over a video.
    async fn overlay_logo(
        &self,
        video: &Path,
        logo: &Path,
        output: &Path,
        style: &LogoStyle,
        work_dir: &Path,
    ) -> WorkerResult<()>;
}
