//! Subtitle and logo style definitions.
//!
//! Subtitle styles render to an ASS `force_style` string consumed by the
//! ffmpeg `subtitles` filter; logo styles describe placement, relative size,
//! and opacity of an overlay image.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Subtitle colours, encoded as ASS `&HBBGGRR` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubtitleColor {
    #[default]
    White,
    Yellow,
    Black,
    Red,
    Blue,
    Green,
    Cyan,
    Magenta,
    Orange,
    Pink,
    Purple,
    Gray,
}

impl SubtitleColor {
    /// ASS PrimaryColour value in `&HBBGGRR` byte order.
    pub fn as_ass(&self) -> &'static str {
        match self {
            SubtitleColor::White => "&H00FFFFFF",
            SubtitleColor::Yellow => "&H0000FFFF",
            SubtitleColor::Black => "&H00000000",
            SubtitleColor::Red => "&H000000FF",
            SubtitleColor::Blue => "&H00FF0000",
            SubtitleColor::Green => "&H0000FF00",
            SubtitleColor::Cyan => "&H00FFFF00",
            SubtitleColor::Magenta => "&H00FF00FF",
            SubtitleColor::Orange => "&H000080FF",
            SubtitleColor::Pink => "&H00FF00FF",
            SubtitleColor::Purple => "&H00800080",
            SubtitleColor::Gray => "&H00808080",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubtitleColor::White => "white",
            SubtitleColor::Yellow => "yellow",
            SubtitleColor::Black => "black",
            SubtitleColor::Red => "red",
            SubtitleColor::Blue => "blue",
            SubtitleColor::Green => "green",
            SubtitleColor::Cyan => "cyan",
            SubtitleColor::Magenta => "magenta",
            SubtitleColor::Orange => "orange",
            SubtitleColor::Pink => "pink",
            SubtitleColor::Purple => "purple",
            SubtitleColor::Gray => "gray",
        }
    }
}

impl fmt::Display for SubtitleColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SubtitleColor {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "white" => Ok(SubtitleColor::White),
            "yellow" => Ok(SubtitleColor::Yellow),
            "black" => Ok(SubtitleColor::Black),
            "red" => Ok(SubtitleColor::Red),
            "blue" => Ok(SubtitleColor::Blue),
            "green" => Ok(SubtitleColor::Green),
            "cyan" => Ok(SubtitleColor::Cyan),
            "magenta" => Ok(SubtitleColor::Magenta),
            "orange" => Ok(SubtitleColor::Orange),
            "pink" => Ok(SubtitleColor::Pink),
            "purple" => Ok(SubtitleColor::Purple),
            "gray" => Ok(SubtitleColor::Gray),
            _ => Err(StyleParseError::UnknownColor(s.to_string())),
        }
    }
}

/// Subtitle placement, mapped to ASS numpad alignment codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SubtitlePosition {
    #[default]
    Bottom,
    Top,
    BottomLeft,
    BottomRight,
    TopLeft,
    TopRight,
    Middle,
}

impl SubtitlePosition {
    /// ASS `Alignment` numpad code.
    pub fn alignment(&self) -> u8 {
        match self {
            SubtitlePosition::Bottom => 2,
            SubtitlePosition::Top => 8,
            SubtitlePosition::BottomLeft => 1,
            SubtitlePosition::BottomRight => 3,
            SubtitlePosition::TopLeft => 7,
            SubtitlePosition::TopRight => 9,
            SubtitlePosition::Middle => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubtitlePosition::Bottom => "bottom",
            SubtitlePosition::Top => "top",
            SubtitlePosition::BottomLeft => "bottom-left",
            SubtitlePosition::BottomRight => "bottom-right",
            SubtitlePosition::TopLeft => "top-left",
            SubtitlePosition::TopRight => "top-right",
            SubtitlePosition::Middle => "middle",
        }
    }
}

impl fmt::Display for SubtitlePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SubtitlePosition {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bottom" => Ok(SubtitlePosition::Bottom),
            "top" => Ok(SubtitlePosition::Top),
            "bottom-left" => Ok(SubtitlePosition::BottomLeft),
            "bottom-right" => Ok(SubtitlePosition::BottomRight),
            "top-left" => Ok(SubtitlePosition::TopLeft),
            "top-right" => Ok(SubtitlePosition::TopRight),
            "middle" => Ok(SubtitlePosition::Middle),
            _ => Err(StyleParseError::UnknownPosition(s.to_string())),
        }
    }
}

/// Supported subtitle fonts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubtitleFont {
    #[default]
    Arial,
    Times,
    Courier,
    Impact,
    Comic,
    Tahoma,
    Verdana,
    David,
    Narkisim,
    Miriam,
}

impl SubtitleFont {
    /// Font family name as understood by libass.
    pub fn family(&self) -> &'static str {
        match self {
            SubtitleFont::Arial => "Arial",
            SubtitleFont::Times => "Times New Roman",
            SubtitleFont::Courier => "Courier New",
            SubtitleFont::Impact => "Impact",
            SubtitleFont::Comic => "Comic Sans MS",
            SubtitleFont::Tahoma => "Tahoma",
            SubtitleFont::Verdana => "Verdana",
            SubtitleFont::David => "David",
            SubtitleFont::Narkisim => "Narkisim",
            SubtitleFont::Miriam => "Miriam",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubtitleFont::Arial => "arial",
            SubtitleFont::Times => "times",
            SubtitleFont::Courier => "courier",
            SubtitleFont::Impact => "impact",
            SubtitleFont::Comic => "comic",
            SubtitleFont::Tahoma => "tahoma",
            SubtitleFont::Verdana => "verdana",
            SubtitleFont::David => "david",
            SubtitleFont::Narkisim => "narkisim",
            SubtitleFont::Miriam => "miriam",
        }
    }
}

impl fmt::Display for SubtitleFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SubtitleFont {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "arial" => Ok(SubtitleFont::Arial),
            "times" => Ok(SubtitleFont::Times),
            "courier" => Ok(SubtitleFont::Courier),
            "impact" => Ok(SubtitleFont::Impact),
            "comic" => Ok(SubtitleFont::Comic),
            "tahoma" => Ok(SubtitleFont::Tahoma),
            "verdana" => Ok(SubtitleFont::Verdana),
            "david" => Ok(SubtitleFont::David),
            "narkisim" => Ok(SubtitleFont::Narkisim),
            "miriam" => Ok(SubtitleFont::Miriam),
            _ => Err(StyleParseError::UnknownFont(s.to_string())),
        }
    }
}

/// Full subtitle styling for one burn job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleStyle {
    pub font_size: u32,
    pub color: SubtitleColor,
    pub font: SubtitleFont,
    pub position: SubtitlePosition,
    pub outline: u8,
    pub shadow: u8,
    pub bold: bool,
    pub italic: bool,
    /// Outline/box colour behind the text.
    pub background: SubtitleColor,
}

impl Default for SubtitleStyle {
    fn default() -> Self {
        Self {
            font_size: 16,
            color: SubtitleColor::White,
            font: SubtitleFont::Arial,
            position: SubtitlePosition::Bottom,
            outline: 1,
            shadow: 1,
            bold: false,
            italic: false,
            background: SubtitleColor::Black,
        }
    }
}

/// Font sizes offered by the menu.
pub const FONT_SIZES: &[u32] = &[6, 8, 10, 12, 14, 16, 18];

impl SubtitleStyle {
    /// Render the ASS `force_style` string for the ffmpeg `subtitles` filter.
    pub fn force_style(&self) -> String {
        let mut parts = vec![
            format!("FontSize={}", self.font_size),
            format!("PrimaryColour={}", self.color.as_ass()),
            format!("OutlineColour={}", self.background.as_ass()),
            "BorderStyle=1".to_string(),
            format!("Outline={}", self.outline),
            format!("Shadow={}", self.shadow),
            format!("Alignment={}", self.position.alignment()),
            format!("FontName={}", self.font.family()),
        ];
        if self.bold {
            parts.push("Bold=1".to_string());
        }
        if self.italic {
            parts.push("Italic=1".to_string());
        }
        parts.join(",")
    }
}

/// Named overlay anchors: corners, edge centers, and true center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LogoAnchor {
    TopLeft,
    TopCenter,
    #[default]
    TopRight,
    MiddleLeft,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
    Center,
}

impl LogoAnchor {
    pub const ALL: &'static [LogoAnchor] = &[
        LogoAnchor::TopLeft,
        LogoAnchor::TopCenter,
        LogoAnchor::TopRight,
        LogoAnchor::MiddleLeft,
        LogoAnchor::MiddleRight,
        LogoAnchor::BottomLeft,
        LogoAnchor::BottomCenter,
        LogoAnchor::BottomRight,
        LogoAnchor::Center,
    ];

    /// Short wire code used in menu callbacks.
    pub fn code(&self) -> &'static str {
        match self {
            LogoAnchor::TopLeft => "TL",
            LogoAnchor::TopCenter => "TC",
            LogoAnchor::TopRight => "TR",
            LogoAnchor::MiddleLeft => "ML",
            LogoAnchor::MiddleRight => "MR",
            LogoAnchor::BottomLeft => "BL",
            LogoAnchor::BottomCenter => "BC",
            LogoAnchor::BottomRight => "BR",
            LogoAnchor::Center => "MC",
        }
    }

    /// Human-readable anchor name for confirmations and captions.
    pub fn label(&self) -> &'static str {
        match self {
            LogoAnchor::TopLeft => "top left",
            LogoAnchor::TopCenter => "top center",
            LogoAnchor::TopRight => "top right",
            LogoAnchor::MiddleLeft => "middle left",
            LogoAnchor::MiddleRight => "middle right",
            LogoAnchor::BottomLeft => "bottom left",
            LogoAnchor::BottomCenter => "bottom center",
            LogoAnchor::BottomRight => "bottom right",
            LogoAnchor::Center => "center",
        }
    }

    /// `overlay` filter x:y expression with a 10 px margin off edges.
    pub fn overlay_expr(&self) -> &'static str {
        match self {
            LogoAnchor::TopLeft => "10:10",
            LogoAnchor::TopCenter => "(main_w-overlay_w)/2:10",
            LogoAnchor::TopRight => "main_w-overlay_w-10:10",
            LogoAnchor::MiddleLeft => "10:(main_h-overlay_h)/2",
            LogoAnchor::MiddleRight => "main_w-overlay_w-10:(main_h-overlay_h)/2",
            LogoAnchor::BottomLeft => "10:main_h-overlay_h-10",
            LogoAnchor::BottomCenter => "(main_w-overlay_w)/2:main_h-overlay_h-10",
            LogoAnchor::BottomRight => "main_w-overlay_w-10:main_h-overlay_h-10",
            LogoAnchor::Center => "(main_w-overlay_w)/2:(main_h-overlay_h)/2",
        }
    }
}

impl fmt::Display for LogoAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for LogoAnchor {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TL" => Ok(LogoAnchor::TopLeft),
            "TC" => Ok(LogoAnchor::TopCenter),
            "TR" => Ok(LogoAnchor::TopRight),
            "ML" => Ok(LogoAnchor::MiddleLeft),
            "MR" => Ok(LogoAnchor::MiddleRight),
            "BL" => Ok(LogoAnchor::BottomLeft),
            "BC" => Ok(LogoAnchor::BottomCenter),
            "BR" => Ok(LogoAnchor::BottomRight),
            "MC" => Ok(LogoAnchor::Center),
            _ => Err(StyleParseError::UnknownAnchor(s.to_string())),
        }
    }
}

/// Logo overlay styling for one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoStyle {
    pub anchor: LogoAnchor,
    /// Target logo height as a percentage of the video height.
    pub size_percent: u8,
    /// Opacity applied to the logo alpha channel (0..=100).
    pub opacity_percent: u8,
}

impl Default for LogoStyle {
    fn default() -> Self {
        Self {
            anchor: LogoAnchor::TopRight,
            size_percent: 20,
            opacity_percent: 70,
        }
    }
}

/// Logo size steps offered by the menu.
pub const LOGO_SIZE_CHOICES: &[u8] = &[0, 5, 10, 15, 20, 25, 30, 35, 40];

/// Opacity steps offered by the menu.
pub const OPACITY_CHOICES: &[u8] = &[0, 15, 30, 45, 60, 75, 90, 100];

#[derive(Debug, Error)]
pub enum StyleParseError {
    #[error("Unknown subtitle color: {0}")]
    UnknownColor(String),
    #[error("Unknown subtitle position: {0}")]
    UnknownPosition(String),
    #[error("Unknown subtitle font: {0}")]
    UnknownFont(String),
    #[error("Unknown logo anchor: {0}")]
    UnknownAnchor(String),
}
