//! Shared data models for the subfuse pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Per-user sessions and workflow state
//! - Subtitle and logo styling
//! - Transcript segments
//! - Jobs, workflows, and pipeline stages
//! - Menu actions and size limits
//! - Outbound notices and media deliveries

pub mod action;
pub mod job;
pub mod limits;
pub mod outbound;
pub mod segment;
pub mod session;
pub mod style;

// Re-export common types
pub use action::{ActionParseError, MenuAction, TextStyle};
pub use job::{JobId, JobStage, Workflow};
pub use limits::{
    extension_allowed, ALLOWED_IMAGE_EXTENSIONS, ALLOWED_VIDEO_EXTENSIONS, MAX_LOGO_BYTES,
    MAX_VIDEO_BYTES, MIN_OUTPUT_BYTES,
};
pub use outbound::{Notice, OutboundMessage};
pub use segment::{SrtTimestamp, TranscriptSegment};
pub use session::{PendingUpload, Session, UserId};
pub use style::{
    LogoAnchor, LogoStyle, StyleParseError, SubtitleColor, SubtitleFont, SubtitlePosition,
    SubtitleStyle, FONT_SIZES, LOGO_SIZE_CHOICES, OPACITY_CHOICES,
};
