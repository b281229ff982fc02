//! Job identity and pipeline stages.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for one processing job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Short prefix for log lines and temp file names.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which end-to-end flow a job belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Workflow {
    /// Transcribe, translate, and burn subtitles into the video.
    SubtitleBurn,
    /// Composite the user's logo over the video.
    LogoOverlay,
}

impl Workflow {
    pub fn as_str(&self) -> &'static str {
        match self {
            Workflow::SubtitleBurn => "subtitle_burn",
            Workflow::LogoOverlay => "logo_overlay",
        }
    }
}

impl fmt::Display for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Progress checkpoints a job passes through.
///
/// The subtitle flow visits Downloaded through Delivered in order; the logo
/// flow goes Downloaded, Overlaid, Delivered. Failed is terminal for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStage {
    Downloaded,
    AudioExtracted,
    Transcribed,
    Translated,
    Subtitled,
    Overlaid,
    Delivered,
    Failed,
}

impl JobStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStage::Downloaded => "downloaded",
            JobStage::AudioExtracted => "audio_extracted",
            JobStage::Transcribed => "transcribed",
            JobStage::Translated => "translated",
            JobStage::Subtitled => "subtitled",
            JobStage::Overlaid => "overlaid",
            JobStage::Delivered => "delivered",
            JobStage::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStage::Delivered | JobStage::Failed)
    }
}

impl fmt::Display for JobStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_id_unique_and_short() {
        let a = JobId::new();
        let b = JobId::new();
        assert_ne!(a, b);
        assert_eq!(a.short().len(), 8);
    }

    #[test]
    fn test_terminal_stages() {
        assert!(JobStage::Delivered.is_terminal());
        assert!(JobStage::Failed.is_terminal());
        assert!(!JobStage::Transcribed.is_terminal());
    }

    #[test]
    fn test_stage_serde_names() {
        let json = serde_json::to_string(&JobStage::AudioExtracted).unwrap();
        assert_eq!(json, "\"audio_extracted\"");
    }
}
