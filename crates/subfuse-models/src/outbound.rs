//! Outbound messages handed back to the messaging transport.
//!
//! Handlers and the pipeline never emit raw strings: every user-visible
//! reply is one of a closed set of notices, rendered to the session's
//! interface language only at the transport boundary.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::action::TextStyle;
use crate::style::{LogoAnchor, SubtitleColor, SubtitleFont, SubtitlePosition};

/// Every user-visible message category the core can produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    // Settings confirmations
    UiLangSet { code: String },
    TargetLangSet { code: String },
    FontSizeSet { size: u32 },
    FontColorSet { color: SubtitleColor },
    PositionSet { position: SubtitlePosition },
    FontSet { font: SubtitleFont },
    TextStyleSet { style: TextStyle },
    BackgroundColorSet { color: SubtitleColor },
    OutlineSet { width: u8 },
    ShadowSet { depth: u8 },
    LogoPositionSet { anchor: LogoAnchor },
    LogoSizeSet { percent: u8 },
    LogoOpacitySet { percent: u8 },

    // Workflow prompts and progress
    UploadVideoPrompt {
        target_lang: String,
        font_size: u32,
        color: SubtitleColor,
    },
    UploadLogoPrompt,
    LogoRegistered,
    ProcessingStarted,
    BackToMainMenu,
    ChooseActionFirst,
    VideoOutsideUploadFlow,

    // Delivery captions
    SubtitlesDelivered {
        src_lang: String,
        target_lang: String,
        font_size: u32,
        color: SubtitleColor,
    },
    LogoDelivered {
        anchor: LogoAnchor,
        size_percent: u8,
        opacity_percent: u8,
    },

    // Failures
    FileTooLarge,
    OutputTooLarge,
    UnsupportedFormat,
    NoLogoRegistered,
    ProcessActive,
    NoSpeechDetected,
    ProcessingFailed,
}

/// One unit of outbound traffic: a textual notice or a rendered video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutboundMessage {
    Notice(Notice),
    Video { path: PathBuf, caption: Notice },
}

impl From<Notice> for OutboundMessage {
    fn from(notice: Notice) -> Self {
        OutboundMessage::Notice(notice)
    }
}

impl Notice {
    /// Render the notice in the given interface language.
    ///
    /// Hebrew is fully translated; everything else falls back to English.
    pub fn render(&self, ui_lang: &str) -> String {
        match ui_lang {
            "he" => self.render_he(),
            _ => self.render_en(),
        }
    }

    fn render_en(&self) -> String {
        match self {
            Notice::UiLangSet { code } => format!("✅ Interface language set to {code}."),
            Notice::TargetLangSet { code } => format!("✅ Target language set to {code}."),
            Notice::FontSizeSet { size } => format!("✅ Font size set to {size}."),
            Notice::FontColorSet { color } => format!("✅ Font color set to {color}."),
            Notice::PositionSet { position } => {
                format!("✅ Subtitle position set to {position}.")
            }
            Notice::FontSet { font } => format!("✅ Font set to {}.", font.family()),
            Notice::TextStyleSet { style } => format!("✅ Text style set to {style}."),
            Notice::BackgroundColorSet { color } => {
                format!("✅ Background color set to {color}.")
            }
            Notice::OutlineSet { width } => format!("✅ Outline set to {width}."),
            Notice::ShadowSet { depth } => format!("✅ Shadow set to {depth}."),
            Notice::LogoPositionSet { anchor } => {
                format!("✅ Logo position set to {}. Now choose opacity.", anchor.label())
            }
            Notice::LogoSizeSet { percent } => format!(
                "✅ Logo size set to {percent}%. Now upload a video to overlay the logo."
            ),
            Notice::LogoOpacitySet { percent } => {
                format!("✅ Opacity set to {percent}%. Now choose size.")
            }
            Notice::UploadVideoPrompt {
                target_lang,
                font_size,
                color,
            } => format!(
                "📥 Send a video file (mp4/mov/mkv/avi/flv) up to 20MB to translate and \
                 burn subtitles.\n\nCurrent settings:\n🎯 Language: {target_lang}\n\
                 🔤 Font size: {font_size}\n🎨 Color: {color}"
            ),
            Notice::UploadLogoPrompt => {
                "Upload a logo image (JPEG/PNG). After upload, choose position, size and opacity."
                    .to_string()
            }
            Notice::LogoRegistered => {
                "✅ Logo uploaded! Choose position, size and opacity from the menu, then send a video."
                    .to_string()
            }
            Notice::ProcessingStarted => {
                "🎬 Processing started, this can take a few minutes...".to_string()
            }
            Notice::BackToMainMenu => "Back to the main menu.".to_string(),
            Notice::ChooseActionFirst => "Choose an action from the menu first.".to_string(),
            Notice::VideoOutsideUploadFlow => {
                "Received a video, but no upload was requested. Pick an action from the menu first."
                    .to_string()
            }
            Notice::SubtitlesDelivered {
                src_lang,
                target_lang,
                font_size,
                color,
            } => format!(
                "✅ Video translated and burned successfully!\n\nApplied settings:\n\
                 🎯 Language: {target_lang}\n🔤 Font size: {font_size}\n🎨 Color: {color}\n\n\
                 Source language: {src_lang}"
            ),
            Notice::LogoDelivered {
                anchor,
                size_percent,
                opacity_percent,
            } => format!(
                "✅ Logo overlaid successfully!\n\nApplied settings:\n\
                 📍 Position: {}\n📏 Size: {size_percent}%\n🎭 Opacity: {opacity_percent}%",
                anchor.label()
            ),
            Notice::FileTooLarge => {
                "❌ File is too large (over 20MB). Please try a smaller file.".to_string()
            }
            Notice::OutputTooLarge => {
                "⚠️ Output is too large to send back (over 20MB). Try a shorter video or reduce resolution."
                    .to_string()
            }
            Notice::UnsupportedFormat => "❌ Unsupported file format.".to_string(),
            Notice::NoLogoRegistered => {
                "No logo file found. Start with the logo menu and upload a logo.".to_string()
            }
            Notice::ProcessActive => {
                "⚠️ A process is already active. Please wait for it to finish.".to_string()
            }
            Notice::NoSpeechDetected => {
                "❌ No speech was detected in this video.".to_string()
            }
            Notice::ProcessingFailed => "❌ Processing failed. Please try again.".to_string(),
        }
    }

    fn render_he(&self) -> String {
        match self {
            Notice::UiLangSet { code } => format!("✅ שפת הממשק נקבעה ל-{code}."),
            Notice::TargetLangSet { code } => format!("✅ שפת היעד נקבעה ל-{code}."),
            Notice::FontSizeSet { size } => format!("✅ גודל הגופן נקבע ל-{size}."),
            Notice::FontColorSet { color } => format!("✅ צבע הגופן נקבע ל-{color}."),
            Notice::PositionSet { position } => {
                format!("✅ מיקום הכתוביות נקבע ל-{position}.")
            }
            Notice::FontSet { font } => format!("✅ הגופן נקבע ל-{}.", font.family()),
            Notice::TextStyleSet { style } => format!("✅ סגנון הטקסט נקבע ל-{style}."),
            Notice::BackgroundColorSet { color } => format!("✅ צבע הרקע נקבע ל-{color}."),
            Notice::OutlineSet { width } => format!("✅ קו המתאר נקבע ל-{width}."),
            Notice::ShadowSet { depth } => format!("✅ הצל נקבע ל-{depth}."),
            Notice::LogoPositionSet { anchor } => {
                format!("✅ מיקום הלוגו נקבע ל-{}. כעת בחרו שקיפות.", anchor.label())
            }
            Notice::LogoSizeSet { percent } => {
                format!("✅ גודל הלוגו נקבע ל-{percent}%. כעת העלו וידאו להטמעת הלוגו.")
            }
            Notice::LogoOpacitySet { percent } => {
                format!("✅ השקיפות נקבעה ל-{percent}%. כעת בחרו גודל.")
            }
            Notice::UploadVideoPrompt {
                target_lang,
                font_size,
                color,
            } => format!(
                "📥 שלחו קובץ וידאו (mp4/mov/mkv/avi/flv) עד 20MB לתרגום וצריבת כתוביות.\n\n\
                 הגדרות נוכחיות:\n🎯 שפה: {target_lang}\n🔤 גודל גופן: {font_size}\n🎨 צבע: {color}"
            ),
            Notice::UploadLogoPrompt => {
                "העלו תמונת לוגו (JPEG/PNG). אחרי ההעלאה בחרו מיקום, גודל ושקיפות.".to_string()
            }
            Notice::LogoRegistered => {
                "✅ הלוגו הועלה! בחרו מיקום, גודל ושקיפות מהתפריט ואז שלחו וידאו.".to_string()
            }
            Notice::ProcessingStarted => {
                "🎬 העיבוד התחיל, זה עשוי לקחת כמה דקות...".to_string()
            }
            Notice::BackToMainMenu => "חזרה לתפריט הראשי.".to_string(),
            Notice::ChooseActionFirst => "בחרו פעולה מהתפריט תחילה.".to_string(),
            Notice::VideoOutsideUploadFlow => {
                "קיבלתי וידאו, אך לא התבקשה העלאה. בחרו פעולה מהתפריט תחילה.".to_string()
            }
            Notice::SubtitlesDelivered {
                src_lang,
                target_lang,
                font_size,
                color,
            } => format!(
                "✅ הסרטון תורגם וצורב בהצלחה!\n\nהגדרות שהוחלו:\n\
                 🎯 שפה: {target_lang}\n🔤 גודל גופן: {font_size}\n🎨 צבע: {color}\n\n\
                 שפת מקור: {src_lang}"
            ),
            Notice::LogoDelivered {
                anchor,
                size_percent,
                opacity_percent,
            } => format!(
                "✅ הלוגו הוטמע בהצלחה!\n\nהגדרות שהוחלו:\n\
                 📍 מיקום: {}\n📏 גודל: {size_percent}%\n🎭 שקיפות: {opacity_percent}%",
                anchor.label()
            ),
            Notice::FileTooLarge => {
                "❌ הקובץ גדול מדי (מעל 20MB). נסו קובץ קטן יותר.".to_string()
            }
            Notice::OutputTooLarge => {
                "⚠️ הפלט גדול מדי לשליחה (מעל 20MB). נסו וידאו קצר יותר.".to_string()
            }
            Notice::UnsupportedFormat => "❌ סוג קובץ לא נתמך.".to_string(),
            Notice::NoLogoRegistered => {
                "לא נמצא קובץ לוגו. התחילו בתפריט הלוגו והעלו לוגו.".to_string()
            }
            Notice::ProcessActive => "⚠️ תהליך כבר פעיל. אנא המתינו לסיומו.".to_string(),
            Notice::NoSpeechDetected => "❌ לא זוהה דיבור בסרטון.".to_string(),
            Notice::ProcessingFailed => "❌ העיבוד נכשל. נסו שוב.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_caption_carries_settings_and_source_language() {
        let caption = Notice::SubtitlesDelivered {
            src_lang: "en".to_string(),
            target_lang: "he".to_string(),
            font_size: 14,
            color: SubtitleColor::Yellow,
        };
        let en = caption.render("en");
        assert!(en.contains("Source language: en"));
        assert!(en.contains("Font size: 14"));
        assert!(en.contains("yellow"));

        let he = caption.render("he");
        assert!(he.contains("שפת מקור: en"));
        assert!(he.contains("14"));
    }

    #[test]
    fn test_unknown_ui_lang_falls_back_to_english() {
        assert_eq!(
            Notice::ProcessingFailed.render("fr"),
            Notice::ProcessingFailed.render("en")
        );
        assert_ne!(
            Notice::ProcessingFailed.render("he"),
            Notice::ProcessingFailed.render("en")
        );
    }

    #[test]
    fn test_logo_caption_reports_all_three_settings() {
        let caption = Notice::LogoDelivered {
            anchor: LogoAnchor::BottomRight,
            size_percent: 25,
            opacity_percent: 60,
        };
        let text = caption.render("en");
        assert!(text.contains("bottom right"));
        assert!(text.contains("25%"));
        assert!(text.contains("60%"));
    }

    #[test]
    fn test_notice_wraps_into_outbound_message() {
        let message: OutboundMessage = Notice::ProcessingStarted.into();
        assert_eq!(message, OutboundMessage::Notice(Notice::ProcessingStarted));
    }
}
