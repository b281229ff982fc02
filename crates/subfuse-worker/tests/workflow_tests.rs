//! End-to-end workflow tests with mocked collaborators.
//!
//! The chat gateway, speech model, translator and transcoder are mocked;
//! everything else (sessions, admission, temp tracking, cache, pool) is
//! the real thing running against a temp directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockall::mock;

use subfuse_models::{
    LogoStyle, Notice, OutboundMessage, PendingUpload, SubtitleStyle, TranscriptSegment, UserId,
};
use subfuse_worker::{
    AdmissionController, FileRef, Handlers, MessagingGateway, Pipeline, RetryConfig, SessionStore,
    SpeechRecognizer, TempManager, Transcoder, Transcription, TranslationCache, Translator,
    WorkerConfig, WorkerError, WorkerPool, WorkerResult,
};

mock! {
    Recognizer {}
    #[async_trait]
    impl SpeechRecognizer for Recognizer {
        async fn transcribe(&self, audio: &Path) -> WorkerResult<Transcription>;
    }
}

mock! {
    TranslatorClient {}
    #[async_trait]
    impl Translator for TranslatorClient {
        async fn translate_batch(
            &self,
            texts: &[String],
            dest_lang: &str,
        ) -> WorkerResult<Vec<String>>;
    }
}

mock! {
    Gateway {}
    #[async_trait]
    impl MessagingGateway for Gateway {
        async fn send_text(&self, user: UserId, text: &str) -> WorkerResult<()>;
        async fn send_video(&self, user: UserId, video: &Path, caption: &str) -> WorkerResult<()>;
        async fn download_file(&self, file: &FileRef, dest: &Path) -> WorkerResult<u64>;
    }
}

mock! {
    Media {}
    #[async_trait]
    impl Transcoder for Media {
        async fn extract_audio(&self, video: &Path, wav_out: &Path) -> WorkerResult<()>;
        async fn burn_subtitles(
            &self,
            video: &Path,
            srt: &Path,
            output: &Path,
            style: &SubtitleStyle,
            work_dir: &Path,
        ) -> WorkerResult<()>;
        async fn overlay_logo(
            &self,
            video: &Path,
            logo: &Path,
            output: &Path,
            style: &LogoStyle,
            work_dir: &Path,
        ) -> WorkerResult<()>;
    }
}

const USER: UserId = 7;

struct Fixture {
    handlers: Handlers,
    sessions: Arc<SessionStore>,
    admission: Arc<AdmissionController>,
    temp: Arc<TempManager>,
    pool: Arc<WorkerPool>,
    work_dir: PathBuf,
    _dir: tempfile::TempDir,
}

fn fixture(
    recognizer: MockRecognizer,
    translator: MockTranslatorClient,
    gateway: MockGateway,
    media: MockMedia,
) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let config = WorkerConfig {
        work_dir: dir.path().to_path_buf(),
        cache_file: dir.path().join("cache.json"),
        ..Default::default()
    };

    let sessions = Arc::new(SessionStore::new());
    let admission = Arc::new(AdmissionController::new(config.per_user_cap));
    let cache = Arc::new(TranslationCache::new(&config.cache_file));
    let temp = Arc::new(TempManager::new(&config.work_dir).unwrap());

    let pipeline = Arc::new(
        Pipeline::new(
            &config,
            Arc::clone(&sessions),
            Arc::clone(&admission),
            cache,
            Arc::clone(&temp),
            Arc::new(recognizer),
            Arc::new(translator),
            Arc::new(gateway),
        )
        .with_translation_retry(
            RetryConfig::new("translate_batch").with_base_delay(Duration::from_millis(1)),
        )
        .with_transcoder(Arc::new(media)),
    );

    let pool = Arc::new(WorkerPool::new(2));
    Fixture {
        handlers: Handlers::new(pipeline, Arc::clone(&pool)),
        sessions,
        admission,
        temp,
        pool,
        work_dir: dir.path().to_path_buf(),
        _dir: dir,
    }
}

impl Fixture {
    /// Wait until the submitted job has fully finished: the user's slot is
    /// back and the pool permit has been returned. The permit outlives the
    /// job body, so this also covers the trailing failure notification.
    async fn settle(&self) {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                if self.admission.active_jobs(USER) == 0
                    && self.pool.available_workers() == self.pool.capacity()
                {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("pipeline did not go idle");
    }
}

fn video_file(size: u64) -> FileRef {
    FileRef {
        id: "file-1".to_string(),
        declared_size: Some(size),
        file_name: Some("clip.mp4".to_string()),
    }
}

/// Subtitle workflow runs front to back: download, transcribe, translate,
/// burn, deliver. The caption names the detected source language and the
/// applied style; slots, pending flags and temp artifacts are all released.
#[tokio::test]
async fn test_subtitle_job_delivers_video() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_download_file()
        .times(1)
        .returning(|_, dest: &Path| {
            std::fs::write(dest, vec![0u8; 1 << 20]).unwrap();
            Ok(1 << 20)
        });
    gateway
        .expect_send_video()
        .times(1)
        .withf(|user, video, caption| {
            *user == USER
                && std::fs::metadata(video).map(|m| m.len()).unwrap_or(0) >= 10 * 1024
                && caption.contains("Source language: en")
                && caption.contains("Font size: 16")
                && caption.contains("Language: he")
        })
        .returning(|_, _, _| Ok(()));

    let mut media = MockMedia::new();
    media.expect_extract_audio().times(1).returning(|_, wav: &Path| {
        std::fs::write(wav, b"wav").unwrap();
        Ok(())
    });
    media
        .expect_burn_subtitles()
        .times(1)
        .returning(|_, srt: &Path, output: &Path, _, _| {
            let rendered = std::fs::read_to_string(srt).unwrap();
            assert!(rendered.contains("שלום"));
            std::fs::write(output, vec![0u8; 20_000]).unwrap();
            Ok(())
        });

    let mut recognizer = MockRecognizer::new();
    recognizer.expect_transcribe().times(1).returning(|_| {
        Ok(Transcription {
            segments: vec![TranscriptSegment::new(0.0, 1.5, "hello")],
            detected_language: "en".to_string(),
        })
    });

    let mut translator = MockTranslatorClient::new();
    translator
        .expect_translate_batch()
        .times(1)
        .returning(|texts, _| Ok(texts.iter().map(|_| "שלום".to_string()).collect()));

    let fx = fixture(recognizer, translator, gateway, media);

    fx.handlers
        .handle_menu_action(USER, "set_ui_lang:en")
        .await
        .unwrap();
    let prompts = fx.handlers.handle_menu_action(USER, "upload_video").await.unwrap();
    assert!(matches!(
        prompts.as_slice(),
        [OutboundMessage::Notice(Notice::UploadVideoPrompt { .. })]
    ));

    let started = fx
        .handlers
        .handle_video_upload(USER, video_file(1 << 20))
        .await
        .unwrap();
    assert_eq!(
        started,
        vec![OutboundMessage::Notice(Notice::ProcessingStarted)]
    );
    fx.settle().await;

    assert_eq!(fx.admission.active_jobs(USER), 0);
    assert_eq!(fx.temp.active_count(), 0);
    assert_eq!(
        fx.sessions.get_or_create(USER).pending,
        PendingUpload::None
    );
}

/// A declared 25MB upload is rejected before any transfer: nothing is
/// downloaded, no artifact or slot is held afterwards.
#[tokio::test]
async fn test_oversized_upload_rejected_before_transfer() {
    let fx = fixture(
        MockRecognizer::new(),
        MockTranslatorClient::new(),
        MockGateway::new(),
        MockMedia::new(),
    );
    fx.sessions
        .update(USER, |s| s.pending = PendingUpload::VideoForSubtitles);

    let err = fx
        .handlers
        .handle_video_upload(USER, video_file(25 << 20))
        .await
        .unwrap_err();
    assert!(matches!(err, WorkerError::FileTooLarge { .. }));
    assert!(err.is_user_input_error());
    assert!(err.notice().render("en").contains("too large"));
    assert_eq!(fx.temp.active_count(), 0);
    assert_eq!(fx.admission.active_jobs(USER), 0);
}

/// Starting the subtitle workflow while the logo workflow is mid-flight is
/// refused and the logo flow keeps its pending state.
#[tokio::test]
async fn test_workflows_are_mutually_exclusive() {
    let fx = fixture(
        MockRecognizer::new(),
        MockTranslatorClient::new(),
        MockGateway::new(),
        MockMedia::new(),
    );

    fx.handlers.handle_menu_action(USER, "logo_start").await.unwrap();
    let err = fx
        .handlers
        .handle_menu_action(USER, "upload_video")
        .await
        .unwrap_err();
    assert!(matches!(err, WorkerError::WorkflowActive));
    assert!(err.is_contention_error());
    assert!(fx.sessions.workflow_active(USER));
    assert_eq!(
        fx.sessions.get_or_create(USER).pending,
        PendingUpload::LogoImage
    );
}

/// A running job does not block a second subtitle upload: the per-user cap
/// of two is what limits it. Starting the logo flow, in contrast, waits for
/// running jobs to finish.
#[tokio::test]
async fn test_running_job_allows_second_upload_within_cap() {
    let fx = fixture(
        MockRecognizer::new(),
        MockTranslatorClient::new(),
        MockGateway::new(),
        MockMedia::new(),
    );

    // One job in flight for the user
    assert!(fx.admission.try_acquire(USER));

    let err = fx
        .handlers
        .handle_menu_action(USER, "logo_start")
        .await
        .unwrap_err();
    assert!(matches!(err, WorkerError::WorkflowActive));

    let prompts = fx.handlers.handle_menu_action(USER, "upload_video").await.unwrap();
    assert!(matches!(
        prompts.as_slice(),
        [OutboundMessage::Notice(Notice::UploadVideoPrompt { .. })]
    ));
    assert_eq!(
        fx.sessions.get_or_create(USER).pending,
        PendingUpload::VideoForSubtitles
    );

    fx.admission.release(USER);
}

/// The second job over the same transcript is served from the translation
/// cache; the translator backend is hit exactly once.
#[tokio::test]
async fn test_repeat_transcript_hits_cache() {
    let mut gateway = MockGateway::new();
    gateway.expect_download_file().times(2).returning(|_, dest: &Path| {
        std::fs::write(dest, vec![0u8; 4096]).unwrap();
        Ok(4096)
    });
    gateway.expect_send_video().times(2).returning(|_, _, _| Ok(()));

    let mut media = MockMedia::new();
    media.expect_extract_audio().times(2).returning(|_, wav: &Path| {
        std::fs::write(wav, b"wav").unwrap();
        Ok(())
    });
    media
        .expect_burn_subtitles()
        .times(2)
        .returning(|_, _, output: &Path, _, _| {
            std::fs::write(output, vec![0u8; 20_000]).unwrap();
            Ok(())
        });

    let mut recognizer = MockRecognizer::new();
    recognizer.expect_transcribe().times(2).returning(|_| {
        Ok(Transcription {
            segments: vec![TranscriptSegment::new(0.0, 2.0, "good morning")],
            detected_language: "en".to_string(),
        })
    });

    let mut translator = MockTranslatorClient::new();
    translator
        .expect_translate_batch()
        .times(1)
        .returning(|texts, _| Ok(texts.iter().map(|t| format!("[{t}]")).collect()));

    let fx = fixture(recognizer, translator, gateway, media);

    for _ in 0..2 {
        fx.handlers.handle_menu_action(USER, "upload_video").await.unwrap();
        fx.handlers
            .handle_video_upload(USER, video_file(4096))
            .await
            .unwrap();
        fx.settle().await;
    }
    assert_eq!(fx.admission.active_jobs(USER), 0);
}

/// Logo workflow delivers an overlaid video once a logo is registered; the
/// caption reports anchor, size and opacity.
#[tokio::test]
async fn test_logo_job_delivers_video() {
    let mut gateway = MockGateway::new();
    gateway.expect_download_file().times(1).returning(|_, dest: &Path| {
        std::fs::write(dest, vec![0u8; 4096]).unwrap();
        Ok(4096)
    });
    gateway
        .expect_send_video()
        .times(1)
        .withf(|_, _, caption| {
            caption.contains("top right") && caption.contains("20%") && caption.contains("70%")
        })
        .returning(|_, _, _| Ok(()));

    let mut media = MockMedia::new();
    media
        .expect_overlay_logo()
        .times(1)
        .returning(|_, logo: &Path, output: &Path, _, _| {
            assert!(logo.exists());
            std::fs::write(output, vec![0u8; 20_000]).unwrap();
            Ok(())
        });

    let fx = fixture(
        MockRecognizer::new(),
        MockTranslatorClient::new(),
        gateway,
        media,
    );
    let logo = fx.work_dir.join("logo_7.png");
    std::fs::write(&logo, b"png").unwrap();
    fx.sessions.update(USER, |s| {
        s.logo_path = Some(logo.clone());
        s.pending = PendingUpload::VideoForLogo;
    });

    fx.handlers
        .handle_video_upload(USER, video_file(4096))
        .await
        .unwrap();
    fx.settle().await;

    assert_eq!(fx.admission.active_jobs(USER), 0);
    assert_eq!(fx.temp.active_count(), 0);
}

/// A logo-workflow video without a registered logo fails the job and tells
/// the user what is missing, in the session's interface language.
#[tokio::test]
async fn test_logo_job_without_logo_fails() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_send_text()
        .times(1)
        .withf(|_, text| text.contains("No logo"))
        .returning(|_, _| Ok(()));

    let fx = fixture(
        MockRecognizer::new(),
        MockTranslatorClient::new(),
        gateway,
        MockMedia::new(),
    );
    fx.sessions.update(USER, |s| {
        s.ui_lang = "en".to_string();
        s.pending = PendingUpload::VideoForLogo;
    });

    fx.handlers
        .handle_video_upload(USER, video_file(4096))
        .await
        .unwrap();
    fx.settle().await;

    assert_eq!(fx.admission.active_jobs(USER), 0);
    assert_eq!(fx.temp.active_count(), 0);
}
