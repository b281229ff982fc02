//! Inbound event handling: uploads and menu actions.
//!
//! Handlers run on the dispatch path and must return quickly; anything
//! heavy is submitted to the worker pool. Replies come back as outbound
//! messages for the transport to render in the user's interface language;
//! errors carry their own message category via `WorkerError::notice`.

use std::sync::Arc;
use tracing::{debug, info};

use subfuse_media::normalize_logo;
use subfuse_models::{
    extension_allowed, MenuAction, Notice, OutboundMessage, PendingUpload,
    ALLOWED_IMAGE_EXTENSIONS, ALLOWED_VIDEO_EXTENSIONS, MAX_LOGO_BYTES, MAX_VIDEO_BYTES, UserId,
};

use crate::error::{WorkerError, WorkerResult};
use crate::pipeline::Pipeline;
use crate::pool::WorkerPool;
use crate::traits::FileRef;

/// Routes chat events into the orchestration core.
pub struct Handlers {
    pipeline: Arc<Pipeline>,
    pool: Arc<WorkerPool>,
}

impl Handlers {
    pub fn new(pipeline: Arc<Pipeline>, pool: Arc<WorkerPool>) -> Self {
        Self { pipeline, pool }
    }

    /// A video (or video document) arrived from the user.
    pub async fn handle_video_upload(
        &self,
        user: UserId,
        file: FileRef,
    ) -> WorkerResult<Vec<OutboundMessage>> {
        check_video_upload(&file)?;

        let pending = self.pipeline.sessions.get_or_create(user).pending;
        match pending {
            PendingUpload::VideoForSubtitles => {
                self.start_job(user, file, JobKind::Subtitles).await
            }
            PendingUpload::VideoForLogo => self.start_job(user, file, JobKind::Logo).await,
            _ => {
                debug!(user, "video received outside an upload flow");
                Ok(vec![Notice::VideoOutsideUploadFlow.into()])
            }
        }
    }

    /// A photo/image arrived; only meaningful while waiting for a logo.
    pub async fn handle_image_upload(
        &self,
        user: UserId,
        file: FileRef,
    ) -> WorkerResult<Vec<OutboundMessage>> {
        if !self.pipeline.sessions.get_or_create(user).awaiting_logo_image() {
            return Ok(vec![Notice::ChooseActionFirst.into()]);
        }

        check_logo_upload(&file)?;

        // Transfer and normalize before committing anything to the session
        let raw = self.pipeline.temp.create("logo_", ".img");
        let size = match self.pipeline.gateway.download_file(&file, &raw).await {
            Ok(size) => size,
            Err(e) => {
                self.pipeline.temp.release(&raw);
                return Err(e);
            }
        };
        if size > MAX_LOGO_BYTES {
            self.pipeline.temp.release(&raw);
            return Err(WorkerError::FileTooLarge {
                size,
                limit: MAX_LOGO_BYTES,
            });
        }

        let normalized = self
            .pipeline
            .temp
            .work_dir()
            .join(format!("logo_{user}.png"));
        let result = normalize_logo(&raw, &normalized).await;
        self.pipeline.temp.release(&raw);
        result?;

        self.pipeline.sessions.update(user, |s| {
            s.logo_path = Some(normalized.clone());
            s.pending = PendingUpload::VideoForLogo;
        });
        info!(user, "logo registered");

        Ok(vec![Notice::LogoRegistered.into()])
    }

    /// A menu button was pressed; `action_code` is the opaque wire string.
    pub async fn handle_menu_action(
        &self,
        user: UserId,
        action_code: &str,
    ) -> WorkerResult<Vec<OutboundMessage>> {
        let action: MenuAction = action_code
            .parse()
            .map_err(|e| WorkerError::job_failed(format!("bad menu action: {e}")))?;

        let notices = self.apply_action(user, action)?;
        Ok(notices.into_iter().map(OutboundMessage::from).collect())
    }

    /// Apply a menu action to the session, returning the confirmations.
    fn apply_action(&self, user: UserId, action: MenuAction) -> WorkerResult<Vec<Notice>> {
        let sessions = &self.pipeline.sessions;
        let notices = match action {
            MenuAction::SetUiLang(code) => {
                sessions.update(user, |s| s.ui_lang = code.clone());
                vec![Notice::UiLangSet { code }]
            }
            MenuAction::SetTargetLang { code, .. } => {
                sessions.update(user, |s| s.target_lang = code.clone());
                vec![Notice::TargetLangSet { code }]
            }
            MenuAction::SetFontSize(size) => {
                sessions.update(user, |s| s.subtitle_style.font_size = size);
                vec![Notice::FontSizeSet { size }]
            }
            MenuAction::SetFontColor(color) => {
                sessions.update(user, |s| s.subtitle_style.color = color);
                vec![Notice::FontColorSet { color }]
            }
            MenuAction::SetPosition(position) => {
                sessions.update(user, |s| s.subtitle_style.position = position);
                vec![Notice::PositionSet { position }]
            }
            MenuAction::SetFont(font) => {
                sessions.update(user, |s| s.subtitle_style.font = font);
                vec![Notice::FontSet { font }]
            }
            MenuAction::SetTextStyle(style) => {
                sessions.update(user, |s| {
                    s.subtitle_style.bold = style.is_bold();
                    s.subtitle_style.italic = style.is_italic();
                });
                vec![Notice::TextStyleSet { style }]
            }
            MenuAction::SetBackgroundColor(color) => {
                sessions.update(user, |s| s.subtitle_style.background = color);
                vec![Notice::BackgroundColorSet { color }]
            }
            MenuAction::SetOutline(width) => {
                sessions.update(user, |s| s.subtitle_style.outline = width);
                vec![Notice::OutlineSet { width }]
            }
            MenuAction::SetShadow(depth) => {
                sessions.update(user, |s| s.subtitle_style.shadow = depth);
                vec![Notice::ShadowSet { depth }]
            }
            MenuAction::LogoSetPosition(anchor) => {
                sessions.update(user, |s| s.logo_style.anchor = anchor);
                vec![Notice::LogoPositionSet { anchor }]
            }
            MenuAction::LogoSetSize(percent) => {
                sessions.update(user, |s| s.logo_style.size_percent = percent);
                vec![Notice::LogoSizeSet { percent }]
            }
            MenuAction::LogoSetOpacity(percent) => {
                sessions.update(user, |s| s.logo_style.opacity_percent = percent);
                vec![Notice::LogoOpacitySet { percent }]
            }
            // Starting the translate flow is blocked only by the logo flow;
            // jobs already running stay within the per-user slot cap.
            MenuAction::UploadVideo => {
                let session = sessions.get_or_create(user);
                if session.logo_workflow_active() {
                    return Err(WorkerError::WorkflowActive);
                }
                sessions.update(user, |s| s.pending = PendingUpload::VideoForSubtitles);
                vec![Notice::UploadVideoPrompt {
                    target_lang: session.target_lang,
                    font_size: session.subtitle_style.font_size,
                    color: session.subtitle_style.color,
                }]
            }
            // The logo flow waits out both a pending translate upload and
            // any job still running for the user.
            MenuAction::LogoStart => {
                let session = sessions.get_or_create(user);
                if session.translation_workflow_active()
                    || self.pipeline.admission.active_jobs(user) > 0
                {
                    return Err(WorkerError::WorkflowActive);
                }
                sessions.update(user, |s| s.pending = PendingUpload::LogoImage);
                vec![Notice::UploadLogoPrompt]
            }
            MenuAction::BackMain => {
                sessions.clear_pending(user);
                vec![Notice::BackToMainMenu]
            }
            // Navigation-only actions carry no state change; the menu layer
            // renders them
            MenuAction::ChooseUiLang
            | MenuAction::ChooseTargetLang
            | MenuAction::LangPage(_)
            | MenuAction::ChooseFontSize
            | MenuAction::ChooseFontColor
            | MenuAction::AdvancedSettings
            | MenuAction::ChoosePosition
            | MenuAction::ChooseFont
            | MenuAction::ChooseTextStyle
            | MenuAction::ChooseBackgroundColor
            | MenuAction::ChooseOutline
            | MenuAction::ChooseShadow
            | MenuAction::Help => Vec::new(),
        };
        Ok(notices)
    }

    async fn start_job(
        &self,
        user: UserId,
        file: FileRef,
        kind: JobKind,
    ) -> WorkerResult<Vec<OutboundMessage>> {
        if !self.pipeline.admission.try_acquire(user) {
            return Err(WorkerError::SlotsExhausted);
        }
        // The upload the user was waiting on has arrived
        self.pipeline.sessions.clear_pending(user);

        let pipeline = Arc::clone(&self.pipeline);
        let submitted = self.pool.submit(async move {
            let _ = match kind {
                JobKind::Subtitles => pipeline.run_subtitle_job(user, file).await,
                JobKind::Logo => pipeline.run_logo_job(user, file).await,
            };
        });

        if !submitted {
            self.pipeline.admission.release(user);
            return Err(WorkerError::job_failed("worker pool is shutting down"));
        }

        Ok(vec![Notice::ProcessingStarted.into()])
    }
}

#[derive(Debug, Clone, Copy)]
enum JobKind {
    Subtitles,
    Logo,
}

/// Reject an oversized or unsupported video before transfer.
fn check_video_upload(file: &FileRef) -> WorkerResult<()> {
    if let Some(size) = file.declared_size {
        if size > MAX_VIDEO_BYTES {
            return Err(WorkerError::FileTooLarge {
                size,
                limit: MAX_VIDEO_BYTES,
            });
        }
    }
    if let Some(name) = &file.file_name {
        if !extension_allowed(name, ALLOWED_VIDEO_EXTENSIONS) {
            return Err(WorkerError::UnsupportedFormat(name.clone()));
        }
    }
    Ok(())
}

/// Reject an oversized or unsupported logo before transfer.
fn check_logo_upload(file: &FileRef) -> WorkerResult<()> {
    if let Some(size) = file.declared_size {
        if size > MAX_LOGO_BYTES {
            return Err(WorkerError::FileTooLarge {
                size,
                limit: MAX_LOGO_BYTES,
            });
        }
    }
    if let Some(name) = &file.file_name {
        if !extension_allowed(name, ALLOWED_IMAGE_EXTENSIONS) {
            return Err(WorkerError::UnsupportedFormat(name.clone()));
        }
    }
    Ok(())
}
