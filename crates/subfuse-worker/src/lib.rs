//! Job orchestration for the subfuse pipeline.
//!
//! This crate provides:
//! - Per-user admission control and a host-sized worker pool
//! - The persistent TTL translation cache
//! - Temp artifact tracking with an orphan sweep
//! - The two workflow pipelines (subtitle burn, logo overlay)
//! - Inbound event handlers for the messaging layer

pub mod admission;
pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod pipeline;
pub mod pool;
pub mod retry;
pub mod session;
pub mod startup;
pub mod temp;
pub mod traits;
pub mod transcoder;
pub mod translate;

pub use admission::AdmissionController;
pub use cache::{Clock, SystemClock, TranslationCache, CACHE_TTL_DAYS, SAVE_EVERY_NEW_ENTRIES};
pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use handlers::Handlers;
pub use logging::JobLogger;
pub use pipeline::Pipeline;
pub use pool::WorkerPool;
pub use retry::{retry_async, RetryConfig, RetryResult};
pub use session::SessionStore;
pub use startup::run_self_checks;
pub use temp::TempManager;
pub use traits::{
    FileRef, MessagingGateway, SpeechRecognizer, Transcoder, Transcription, Translator,
};
pub use transcoder::FfmpegTranscoder;
pub use translate::{translate_segments, TranslationStats, TRANSLATION_BATCH_SIZE};
