//! Per-user session state.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::style::{LogoStyle, SubtitleStyle};

/// Chat-platform user identity.
pub type UserId = i64;

/// What kind of upload the session is currently waiting for.
///
/// The three workflows are mutually exclusive, so the waiting state is a
/// single enum rather than independent flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PendingUpload {
    #[default]
    None,
    /// Waiting for a video to subtitle-translate-and-burn.
    VideoForSubtitles,
    /// Waiting for a logo image.
    LogoImage,
    /// Waiting for a video to overlay the uploaded logo on.
    VideoForLogo,
}

/// One user's configuration and workflow state.
///
/// Created lazily with defaults on first contact and kept for the process
/// lifetime. All mutation goes through the session store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Interface language (BCP-47-ish code, e.g. "he", "en").
    pub ui_lang: String,
    /// Target translation language.
    pub target_lang: String,
    pub subtitle_style: SubtitleStyle,
    pub logo_style: LogoStyle,
    pub pending: PendingUpload,
    /// Normalized RGBA PNG, set once a logo has been uploaded.
    pub logo_path: Option<PathBuf>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            ui_lang: "he".to_string(),
            target_lang: "he".to_string(),
            subtitle_style: SubtitleStyle::default(),
            logo_style: LogoStyle::default(),
            pending: PendingUpload::None,
            logo_path: None,
        }
    }
}

impl Session {
    pub fn awaiting_video_for_subtitles(&self) -> bool {
        self.pending == PendingUpload::VideoForSubtitles
    }

    pub fn awaiting_logo_image(&self) -> bool {
        self.pending == PendingUpload::LogoImage
    }

    pub fn awaiting_video_for_logo(&self) -> bool {
        self.pending == PendingUpload::VideoForLogo
    }

    /// True while any step of the logo flow is pending.
    pub fn logo_workflow_active(&self) -> bool {
        matches!(
            self.pending,
            PendingUpload::LogoImage | PendingUpload::VideoForLogo
        )
    }

    /// True while the translate flow is waiting for its video.
    pub fn translation_workflow_active(&self) -> bool {
        self.pending == PendingUpload::VideoForSubtitles
    }
}
