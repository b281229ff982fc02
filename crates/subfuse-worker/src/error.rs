//! Worker error types.

use subfuse_models::Notice;
use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Job failed: {0}")]
    JobFailed(String),

    #[error("Processing failed: {0}")]
    ProcessingFailed(String),

    #[error("File too large: {size} bytes (limit {limit})")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("Output too large: {size} bytes (limit {limit})")]
    OutputTooLarge { size: u64, limit: u64 },

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("No logo registered for this user")]
    NoLogo,

    #[error("Another workflow is already active for this user")]
    WorkflowActive,

    #[error("Too many concurrent jobs for this user")]
    SlotsExhausted,

    #[error("No transcription result")]
    NoTranscription,

    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),

    #[error("Translation failed: {0}")]
    TranslationFailed(String),

    #[error("Gateway operation failed: {0}")]
    GatewayFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Media error: {0}")]
    Media(#[from] subfuse_media::MediaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WorkerError {
    pub fn job_failed(msg: impl Into<String>) -> Self {
        Self::JobFailed(msg.into())
    }

    pub fn processing_failed(msg: impl Into<String>) -> Self {
        Self::ProcessingFailed(msg.into())
    }

    pub fn transcription_failed(msg: impl Into<String>) -> Self {
        Self::TranscriptionFailed(msg.into())
    }

    pub fn translation_failed(msg: impl Into<String>) -> Self {
        Self::TranslationFailed(msg.into())
    }

    pub fn gateway_failed(msg: impl Into<String>) -> Self {
        Self::GatewayFailed(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Errors caused by the upload itself; reported before any slot or
    /// artifact is allocated.
    pub fn is_user_input_error(&self) -> bool {
        matches!(
            self,
            WorkerError::FileTooLarge { .. } | WorkerError::UnsupportedFormat(_)
        )
    }

    /// Errors from contention; the request is rejected, nothing allocated.
    pub fn is_contention_error(&self) -> bool {
        matches!(
            self,
            WorkerError::WorkflowActive | WorkerError::SlotsExhausted
        )
    }

    /// The user-visible message category for this failure.
    ///
    /// Internal detail never leaks to the user; everything outside the
    /// known categories collapses to a generic processing failure.
    pub fn notice(&self) -> Notice {
        match self {
            WorkerError::FileTooLarge { .. } => Notice::FileTooLarge,
            WorkerError::OutputTooLarge { .. } => Notice::OutputTooLarge,
            WorkerError::UnsupportedFormat(_) => Notice::UnsupportedFormat,
            WorkerError::NoLogo => Notice::NoLogoRegistered,
            WorkerError::WorkflowActive | WorkerError::SlotsExhausted => Notice::ProcessActive,
            WorkerError::NoTranscription => Notice::NoSpeechDetected,
            _ => Notice::ProcessingFailed,
        }
    }

    /// Check if error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WorkerError::TranslationFailed(_) | WorkerError::GatewayFailed(_)
        )
    }
}
