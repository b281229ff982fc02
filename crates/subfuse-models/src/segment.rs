//! Timed transcript segments.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One timed span of recognized (or translated) speech.
///
/// Times are seconds from the start of the media. `end` is always >= `start`;
/// segments with empty text are dropped before subtitling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl TranscriptSegment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// SRT timestamp for the segment start (`HH:MM:SS,mmm`).
    pub fn start_timestamp(&self) -> SrtTimestamp {
        SrtTimestamp(self.start)
    }

    /// SRT timestamp for the segment end (`HH:MM:SS,mmm`).
    pub fn end_timestamp(&self) -> SrtTimestamp {
        SrtTimestamp(self.end)
    }
}

/// Seconds rendered in SRT `HH:MM:SS,mmm` form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SrtTimestamp(pub f64);

impl fmt::Display for SrtTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_ms = (self.0.max(0.0) * 1000.0).round() as u64;
        let ms = total_ms % 1000;
        let secs = (total_ms / 1000) % 60;
        let mins = (total_ms / 60_000) % 60;
        let hours = total_ms / 3_600_000;
        write!(f, "{hours:02}:{mins:02}:{secs:02},{ms:03}")
    }
}
