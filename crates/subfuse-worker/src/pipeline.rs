//! Pipeline orchestration for the two workflows.
//!
//! Each job runs its steps strictly in sequence and ends in a cleanup stage
//! that releases every temp artifact and the user's admission slot no matter
//! which step failed.

use std::path::PathBuf;
use std::sync::Arc;

use subfuse_media::{verify_output, write_srt};
use subfuse_models::{
    JobId, JobStage, Notice, OutboundMessage, Workflow, MAX_VIDEO_BYTES, MIN_OUTPUT_BYTES, UserId,
};

use crate::admission::AdmissionController;
use crate::cache::TranslationCache;
use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::logging::JobLogger;
use crate::retry::RetryConfig;
use crate::session::SessionStore;
use crate::temp::TempManager;
use crate::traits::{FileRef, MessagingGateway, SpeechRecognizer, Transcoder, Translator};
use crate::transcoder::FfmpegTranscoder;
use crate::translate::translate_segments;

/// Everything a job needs, shared across workers.
pub struct Pipeline {
    pub sessions: Arc<SessionStore>,
    pub admission: Arc<AdmissionController>,
    pub cache: Arc<TranslationCache>,
    pub temp: Arc<TempManager>,
    pub recognizer: Arc<dyn SpeechRecognizer>,
    pub translator: Arc<dyn Translator>,
    pub gateway: Arc<dyn MessagingGateway>,
    transcoder: Arc<dyn Transcoder>,
    translation_retry: RetryConfig,
}

impl Pipeline {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: &WorkerConfig,
        sessions: Arc<SessionStore>,
        admission: Arc<AdmissionController>,
        cache: Arc<TranslationCache>,
        temp: Arc<TempManager>,
        recognizer: Arc<dyn SpeechRecognizer>,
        translator: Arc<dyn Translator>,
        gateway: Arc<dyn MessagingGateway>,
    ) -> Self {
        Self {
            sessions,
            admission,
            cache,
            temp,
            recognizer,
            translator,
            gateway,
            transcoder: Arc::new(FfmpegTranscoder::new(config)),
            translation_retry: RetryConfig::new("translate_batch"),
        }
    }

    /// Override the translation retry policy (deterministic backoff in tests).
    pub fn with_translation_retry(mut self, retry: RetryConfig) -> Self {
        self.translation_retry = retry;
        self
    }

    /// Swap the transcoder backend.
    pub fn with_transcoder(mut self, transcoder: Arc<dyn Transcoder>) -> Self {
        self.transcoder = transcoder;
        self
    }

    /// Run the subtitle-translate-burn workflow to completion.
    ///
    /// The caller has already taken the user's admission slot; it is
    /// released here along with every artifact, on success and failure
    /// alike.
    pub async fn run_subtitle_job(&self, user: UserId, file: FileRef) -> WorkerResult<()> {
        let log = JobLogger::new(JobId::new(), user, Workflow::SubtitleBurn);
        let mut artifacts: Vec<PathBuf> = Vec::new();

        let result = self.subtitle_steps(user, &file, &log, &mut artifacts).await;

        self.temp.release_all(&artifacts);
        self.admission.release(user);
        self.sessions.clear_pending(user);

        match &result {
            Ok(()) => log.stage(JobStage::Delivered),
            Err(e) => {
                log.failure(e);
                log.stage(JobStage::Failed);
                let _ = self.deliver(user, e.notice().into()).await;
            }
        }
        result
    }

    async fn subtitle_steps(
        &self,
        user: UserId,
        file: &FileRef,
        log: &JobLogger,
        artifacts: &mut Vec<PathBuf>,
    ) -> WorkerResult<()> {
        let session = self.sessions.get_or_create(user);

        let input = self.temp.create("in_", ".mp4");
        artifacts.push(input.clone());
        let size = self.gateway.download_file(file, &input).await?;
        if size > MAX_VIDEO_BYTES {
            return Err(WorkerError::FileTooLarge {
                size,
                limit: MAX_VIDEO_BYTES,
            });
        }
        log.stage(JobStage::Downloaded);

        let audio = self.temp.create("audio_", ".wav");
        artifacts.push(audio.clone());
        self.transcoder
            .extract_audio(&input, &audio)
            .await
            .map_err(|e| WorkerError::processing_failed(format!("audio extraction: {e}")))?;
        log.stage(JobStage::AudioExtracted);

        let transcription = self.recognizer.transcribe(&audio).await?;
        if transcription.segments.is_empty() {
            return Err(WorkerError::NoTranscription);
        }
        let src_lang = transcription.detected_language.clone();
        log.stage(JobStage::Transcribed);

        let (segments, stats) = translate_segments(
            &self.translator,
            &self.cache,
            transcription.segments,
            &session.target_lang,
            &self.translation_retry,
        )
        .await;
        if stats.degraded > 0 {
            log.warning("some segments kept their original language");
        }
        log.stage(JobStage::Translated);

        let srt = self.temp.create("subs_", ".srt");
        artifacts.push(srt.clone());
        write_srt(&segments, &srt).await?;

        let output = self.temp.create("out_", ".mp4");
        artifacts.push(output.clone());
        self.transcoder
            .burn_subtitles(
                &input,
                &srt,
                &output,
                &session.subtitle_style,
                self.temp.work_dir(),
            )
            .await?;
        log.stage(JobStage::Subtitled);

        let out_size = verify_output(&output, MIN_OUTPUT_BYTES).await?;
        if out_size > MAX_VIDEO_BYTES {
            return Err(WorkerError::OutputTooLarge {
                size: out_size,
                limit: MAX_VIDEO_BYTES,
            });
        }

        let caption = Notice::SubtitlesDelivered {
            src_lang,
            target_lang: session.target_lang.clone(),
            font_size: session.subtitle_style.font_size,
            color: session.subtitle_style.color,
        };
        self.deliver(
            user,
            OutboundMessage::Video {
                path: output.clone(),
                caption,
            },
        )
        .await?;
        Ok(())
    }

    /// Run the logo-overlay workflow to completion.
    pub async fn run_logo_job(&self, user: UserId, file: FileRef) -> WorkerResult<()> {
        let log = JobLogger::new(JobId::new(), user, Workflow::LogoOverlay);
        let mut artifacts: Vec<PathBuf> = Vec::new();

        let result = self.logo_steps(user, &file, &log, &mut artifacts).await;

        self.temp.release_all(&artifacts);
        self.admission.release(user);
        self.sessions.clear_pending(user);

        match &result {
            Ok(()) => log.stage(JobStage::Delivered),
            Err(e) => {
                log.failure(e);
                log.stage(JobStage::Failed);
                let _ = self.deliver(user, e.notice().into()).await;
            }
        }
        result
    }

    async fn logo_steps(
        &self,
        user: UserId,
        file: &FileRef,
        log: &JobLogger,
        artifacts: &mut Vec<PathBuf>,
    ) -> WorkerResult<()> {
        let session = self.sessions.get_or_create(user);
        let logo_path = session.logo_path.clone().ok_or(WorkerError::NoLogo)?;
        if !logo_path.exists() {
            return Err(WorkerError::NoLogo);
        }

        let input = self.temp.create("in_", ".mp4");
        artifacts.push(input.clone());
        let size = self.gateway.download_file(file, &input).await?;
        if size > MAX_VIDEO_BYTES {
            return Err(WorkerError::FileTooLarge {
                size,
                limit: MAX_VIDEO_BYTES,
            });
        }
        log.stage(JobStage::Downloaded);

        let output = self.temp.create("out_", ".mp4");
        artifacts.push(output.clone());
        self.transcoder
            .overlay_logo(
                &input,
                &logo_path,
                &output,
                &session.logo_style,
                self.temp.work_dir(),
            )
            .await?;
        log.stage(JobStage::Overlaid);

        let out_size = verify_output(&output, MIN_OUTPUT_BYTES).await?;
        if out_size > MAX_VIDEO_BYTES {
            return Err(WorkerError::OutputTooLarge {
                size: out_size,
                limit: MAX_VIDEO_BYTES,
            });
        }

        let caption = Notice::LogoDelivered {
            anchor: session.logo_style.anchor,
            size_percent: session.logo_style.size_percent,
            opacity_percent: session.logo_style.opacity_percent,
        };
        self.deliver(
            user,
            OutboundMessage::Video {
                path: output.clone(),
                caption,
            },
        )
        .await?;
        Ok(())
    }

    /// Send one outbound message, rendered in the user's interface language.
    async fn deliver(&self, user: UserId, message: OutboundMessage) -> WorkerResult<()> {
        let ui_lang = self.sessions.get_or_create(user).ui_lang;
        match message {
            OutboundMessage::Notice(notice) => {
                self.gateway.send_text(user, &notice.render(&ui_lang)).await
            }
            OutboundMessage::Video { path, caption } => {
                self.gateway
                    .send_video(user, &path, &caption.render(&ui_lang))
                    .await
            }
        }
    }
}
