//! Menu actions decoded from inline-keyboard callback data.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::style::{LogoAnchor, SubtitleColor, SubtitleFont, SubtitlePosition};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionParseError {
    #[error("unknown action: {0}")]
    UnknownAction(String),
    #[error("invalid argument for {action}: {value}")]
    InvalidArgument { action: &'static str, value: String },
}

impl ActionParseError {
    fn invalid(action: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidArgument {
            action,
            value: value.into(),
        }
    }
}

/// Bold/italic combination for subtitle text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextStyle {
    Normal,
    Bold,
    Italic,
    BoldItalic,
}

impl TextStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextStyle::Normal => "normal",
            TextStyle::Bold => "bold",
            TextStyle::Italic => "italic",
            TextStyle::BoldItalic => "bold_italic",
        }
    }

    pub fn is_bold(&self) -> bool {
        matches!(self, TextStyle::Bold | TextStyle::BoldItalic)
    }

    pub fn is_italic(&self) -> bool {
        matches!(self, TextStyle::Italic | TextStyle::BoldItalic)
    }
}

impl FromStr for TextStyle {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(TextStyle::Normal),
            "bold" => Ok(TextStyle::Bold),
            "italic" => Ok(TextStyle::Italic),
            "bold_italic" => Ok(TextStyle::BoldItalic),
            other => Err(ActionParseError::invalid("set_style", other)),
        }
    }
}

impl fmt::Display for TextStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Every action the menu can emit, decoded from its wire string.
///
/// Wire format is `name` or `name:arg` (target-language selection also
/// carries the page it was chosen from, `set_lang:code:page`).
#[derive(Debug, Clone, PartialEq)]
pub enum MenuAction {
    ChooseUiLang,
    SetUiLang(String),
    ChooseTargetLang,
    LangPage(usize),
    SetTargetLang { code: String, page: usize },
    ChooseFontSize,
    SetFontSize(u32),
    ChooseFontColor,
    SetFontColor(SubtitleColor),
    AdvancedSettings,
    ChoosePosition,
    SetPosition(SubtitlePosition),
    ChooseFont,
    SetFont(SubtitleFont),
    ChooseTextStyle,
    SetTextStyle(TextStyle),
    ChooseBackgroundColor,
    SetBackgroundColor(SubtitleColor),
    ChooseOutline,
    SetOutline(u8),
    ChooseShadow,
    SetShadow(u8),
    UploadVideo,
    LogoStart,
    LogoSetPosition(LogoAnchor),
    LogoSetSize(u8),
    LogoSetOpacity(u8),
    Help,
    BackMain,
}

impl FromStr for MenuAction {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Bare (argument-less) actions first
        match s {
            "choose_ui_lang" => return Ok(MenuAction::ChooseUiLang),
            "choose_lang" => return Ok(MenuAction::ChooseTargetLang),
            "choose_fontsize" => return Ok(MenuAction::ChooseFontSize),
            "choose_fontcolor" => return Ok(MenuAction::ChooseFontColor),
            "advanced_subtitle_settings" => return Ok(MenuAction::AdvancedSettings),
            "choose_subtitle_position" => return Ok(MenuAction::ChoosePosition),
            "choose_font_type" => return Ok(MenuAction::ChooseFont),
            "choose_text_style" => return Ok(MenuAction::ChooseTextStyle),
            "choose_background_color" => return Ok(MenuAction::ChooseBackgroundColor),
            "choose_outline_size" => return Ok(MenuAction::ChooseOutline),
            "choose_shadow_size" => return Ok(MenuAction::ChooseShadow),
            "upload_video" => return Ok(MenuAction::UploadVideo),
            "logo_start" => return Ok(MenuAction::LogoStart),
            "help" => return Ok(MenuAction::Help),
            "back_main" => return Ok(MenuAction::BackMain),
            _ => {}
        }

        let (name, arg) = s
            .split_once(':')
            .ok_or_else(|| ActionParseError::UnknownAction(s.to_string()))?;

        match name {
            "set_ui_lang" => Ok(MenuAction::SetUiLang(arg.to_string())),
            "lang_page" => {
                let page = arg
                    .parse()
                    .map_err(|_| ActionParseError::invalid("lang_page", arg))?;
                Ok(MenuAction::LangPage(page))
            }
            "set_lang" => {
                let (code, page) = arg
                    .split_once(':')
                    .ok_or_else(|| ActionParseError::invalid("set_lang", arg))?;
                let page = page
                    .parse()
                    .map_err(|_| ActionParseError::invalid("set_lang", arg))?;
                Ok(MenuAction::SetTargetLang {
                    code: code.to_string(),
                    page,
                })
            }
            "set_size" => {
                let size = arg
                    .parse()
                    .map_err(|_| ActionParseError::invalid("set_size", arg))?;
                Ok(MenuAction::SetFontSize(size))
            }
            "set_color" => {
                let color = arg
                    .parse()
                    .map_err(|_| ActionParseError::invalid("set_color", arg))?;
                Ok(MenuAction::SetFontColor(color))
            }
            "set_position" => {
                let pos = arg
                    .parse()
                    .map_err(|_| ActionParseError::invalid("set_position", arg))?;
                Ok(MenuAction::SetPosition(pos))
            }
            "set_font" => {
                let font = arg
                    .parse()
                    .map_err(|_| ActionParseError::invalid("set_font", arg))?;
                Ok(MenuAction::SetFont(font))
            }
            "set_style" => Ok(MenuAction::SetTextStyle(arg.parse()?)),
            "set_bg_color" => {
                let color = arg
                    .parse()
                    .map_err(|_| ActionParseError::invalid("set_bg_color", arg))?;
                Ok(MenuAction::SetBackgroundColor(color))
            }
            "set_outline" => {
                let n = arg
                    .parse()
                    .map_err(|_| ActionParseError::invalid("set_outline", arg))?;
                Ok(MenuAction::SetOutline(n))
            }
            "set_shadow" => {
                let n = arg
                    .parse()
                    .map_err(|_| ActionParseError::invalid("set_shadow", arg))?;
                Ok(MenuAction::SetShadow(n))
            }
            "logo_setpos" => {
                let anchor = arg
                    .parse()
                    .map_err(|_| ActionParseError::invalid("logo_setpos", arg))?;
                Ok(MenuAction::LogoSetPosition(anchor))
            }
            "logo_setsize" => {
                let pct = arg
                    .parse()
                    .map_err(|_| ActionParseError::invalid("logo_setsize", arg))?;
                Ok(MenuAction::LogoSetSize(pct))
            }
            "logo_setopacity" => {
                let pct = arg
                    .parse()
                    .map_err(|_| ActionParseError::invalid("logo_setopacity", arg))?;
                Ok(MenuAction::LogoSetOpacity(pct))
            }
            _ => Err(ActionParseError::UnknownAction(s.to_string())),
        }
    }
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuAction::ChooseUiLang => write!(f, "choose_ui_lang"),
            MenuAction::SetUiLang(code) => write!(f, "set_ui_lang:{code}"),
            MenuAction::ChooseTargetLang => write!(f, "choose_lang"),
            MenuAction::LangPage(page) => write!(f, "lang_page:{page}"),
            MenuAction::SetTargetLang { code, page } => write!(f, "set_lang:{code}:{page}"),
            MenuAction::ChooseFontSize => write!(f, "choose_fontsize"),
            MenuAction::SetFontSize(size) => write!(f, "set_size:{size}"),
            MenuAction::ChooseFontColor => write!(f, "choose_fontcolor"),
            MenuAction::SetFontColor(color) => write!(f, "set_color:{color}"),
            MenuAction::AdvancedSettings => write!(f, "advanced_subtitle_settings"),
            MenuAction::ChoosePosition => write!(f, "choose_subtitle_position"),
            MenuAction::SetPosition(pos) => write!(f, "set_position:{pos}"),
            MenuAction::ChooseFont => write!(f, "choose_font_type"),
            MenuAction::SetFont(font) => write!(f, "set_font:{font}"),
            MenuAction::ChooseTextStyle => write!(f, "choose_text_style"),
            MenuAction::SetTextStyle(style) => write!(f, "set_style:{style}"),
            MenuAction::ChooseBackgroundColor => write!(f, "choose_background_color"),
            MenuAction::SetBackgroundColor(color) => write!(f, "set_bg_color:{color}"),
            MenuAction::ChooseOutline => write!(f, "choose_outline_size"),
            MenuAction::SetOutline(n) => write!(f, "set_outline:{n}"),
            MenuAction::ChooseShadow => write!(f, "choose_shadow_size"),
            MenuAction::SetShadow(n) => write!(f, "set_shadow:{n}"),
            MenuAction::UploadVideo => write!(f, "upload_video"),
            MenuAction::LogoStart => write!(f, "logo_start"),
            MenuAction::LogoSetPosition(anchor) => write!(f, "logo_setpos:{anchor}"),
            MenuAction::LogoSetSize(pct) => write!(f, "logo_setsize:{pct}"),
            MenuAction::LogoSetOpacity(pct) => write!(f, "logo_setopacity:{pct}"),
            MenuAction::Help => write!(f, "help"),
            MenuAction::BackMain => write!(f, "back_main"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_actions() {
        assert_eq!("upload_video".parse(), Ok(MenuAction::UploadVideo));
        assert_eq!("logo_start".parse(), Ok(MenuAction::LogoStart));
        assert_eq!("back_main".parse(), Ok(MenuAction::BackMain));
    }

    #[test]
    fn test_parse_with_arguments() {
        assert_eq!(
            "set_size:18".parse(),
            Ok(MenuAction::SetFontSize(18))
        );
        assert_eq!(
            "set_lang:en:2".parse(),
            Ok(MenuAction::SetTargetLang {
                code: "en".to_string(),
                page: 2
            })
        );
        assert_eq!(
            "logo_setpos:TR".parse(),
            Ok(MenuAction::LogoSetPosition(LogoAnchor::TopRight))
        );
        assert_eq!(
            "set_style:bold_italic".parse(),
            Ok(MenuAction::SetTextStyle(TextStyle::BoldItalic))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            "frobnicate".parse::<MenuAction>(),
            Err(ActionParseError::UnknownAction(_))
        ));
        assert!(matches!(
            "set_size:huge".parse::<MenuAction>(),
            Err(ActionParseError::InvalidArgument { .. })
        ));
        assert!(matches!(
            "logo_setpos:XX".parse::<MenuAction>(),
            Err(ActionParseError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_display_round_trips() {
        for wire in [
            "set_lang:he:0",
            "set_size:14",
            "set_color:yellow",
            "set_position:bottom-left",
            "logo_setopacity:70",
            "advanced_subtitle_settings",
        ] {
            let action: MenuAction = wire.parse().unwrap();
            assert_eq!(action.to_string(), wire);
        }
    }

    #[test]
    fn test_text_style_flags() {
        assert!(TextStyle::BoldItalic.is_bold());
        assert!(TextStyle::BoldItalic.is_italic());
        assert!(!TextStyle::Normal.is_bold());
        assert!(TextStyle::Italic.is_italic());
    }
}
