//! Cache-aware batched segment translation.

use std::sync::Arc;
use tracing::{info, warn};

use subfuse_models::TranscriptSegment;

use crate::cache::TranslationCache;
use crate::retry::{retry_async, RetryConfig, RetryResult};
use crate::traits::Translator;

/// Misses are sent to the translator in batches of this size.
pub const TRANSLATION_BATCH_SIZE: usize = 10;

/// Outcome counters for one translation pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TranslationStats {
    pub cache_hits: usize,
    pub translated: usize,
    /// Segments left in their original language after retries ran out.
    pub degraded: usize,
}

/// Translate every non-empty segment to `dest_lang`.
///
/// The cache is consulted per segment; misses go to the translator in
/// batches, each batch retried per `retry`. A batch that still fails keeps
/// its original text rather than failing the job. Successful translations
/// are written back to the cache.
pub async fn translate_segments(
    translator: &Arc<dyn Translator>,
    cache: &Arc<TranslationCache>,
    segments: Vec<TranscriptSegment>,
    dest_lang: &str,
    retry: &RetryConfig,
) -> (Vec<TranscriptSegment>, TranslationStats) {
    let mut stats = TranslationStats::default();
    let mut out = segments;

    // Indexes of segments that need the translator
    let mut miss_indexes = Vec::new();
    for (i, seg) in out.iter_mut().enumerate() {
        let text = seg.text.trim();
        if text.is_empty() {
            continue;
        }
        if let Some(hit) = cache.lookup(text, dest_lang) {
            seg.text = hit;
            stats.cache_hits += 1;
        } else {
            miss_indexes.push(i);
        }
    }

    for batch in miss_indexes.chunks(TRANSLATION_BATCH_SIZE) {
        let texts: Vec<String> = batch
            .iter()
            .map(|&i| out[i].text.trim().to_string())
            .collect();

        let result = retry_async(retry, || {
            let texts = texts.clone();
            async move { translator.translate_batch(&texts, dest_lang).await }
        })
        .await;

        match result {
            RetryResult::Success(translations) if translations.len() == texts.len() => {
                for ((&i, original), translated) in
                    batch.iter().zip(&texts).zip(translations)
                {
                    cache.store(original, dest_lang, translated.as_str());
                    out[i].text = translated;
                    stats.translated += 1;
                }
            }
            RetryResult::Success(translations) => {
                warn!(
                    expected = texts.len(),
                    got = translations.len(),
                    "translator returned wrong batch size, keeping original text"
                );
                stats.degraded += batch.len();
            }
            RetryResult::Failed { error, attempts } => {
                warn!(
                    %error,
                    attempts,
                    batch_size = batch.len(),
                    "batch translation exhausted retries, keeping original text"
                );
                stats.degraded += batch.len();
            }
        }
    }

    info!(
        cache_hits = stats.cache_hits,
        translated = stats.translated,
        degraded = stats.degraded,
        "translation pass complete"
    );
    (out, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{WorkerError, WorkerResult};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct EchoTranslator {
        calls: AtomicUsize,
        fail: bool,
    }

    impl EchoTranslator {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail,
            })
        }
    }

    #[async_trait]
    impl Translator for EchoTranslator {
        async fn translate_batch(
            &self,
            texts: &[String],
            _dest_lang: &str,
        ) -> WorkerResult<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(WorkerError::translation_failed("backend down"));
            }
            Ok(texts.iter().map(|t| format!("[{t}]")).collect())
        }
    }

    fn segs(texts: &[&str]) -> Vec<TranscriptSegment> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| TranscriptSegment::new(i as f64, i as f64 + 1.0, *t))
            .collect()
    }

    fn fast_retry() -> RetryConfig {
        RetryConfig::new("test").with_base_delay(Duration::from_millis(1))
    }

    fn cache() -> Arc<TranslationCache> {
        let dir = tempfile::tempdir().unwrap();
        Arc::new(TranslationCache::new(dir.path().join("c.json")))
    }

    #[tokio::test]
    async fn test_second_pass_hits_cache_without_translator_calls() {
        let translator = EchoTranslator::new(false);
        let cache = cache();
        let t: Arc<dyn Translator> = translator.clone();

        let (out, stats) =
            translate_segments(&t, &cache, segs(&["hello"]), "he", &fast_retry()).await;
        assert_eq!(out[0].text, "[hello]");
        assert_eq!(stats.translated, 1);
        assert_eq!(translator.calls.load(Ordering::SeqCst), 1);

        let (out2, stats2) =
            translate_segments(&t, &cache, segs(&["hello"]), "he", &fast_retry()).await;
        assert_eq!(out2[0].text, "[hello]");
        assert_eq!(stats2.cache_hits, 1);
        assert_eq!(translator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_degrades_to_original_after_retries() {
        let translator = EchoTranslator::new(true);
        let cache = cache();
        let t: Arc<dyn Translator> = translator.clone();

        let (out, stats) =
            translate_segments(&t, &cache, segs(&["hello", "world"]), "he", &fast_retry())
                .await;
        assert_eq!(out[0].text, "hello");
        assert_eq!(out[1].text, "world");
        assert_eq!(stats.degraded, 2);
        // 1 initial try + 3 retries for the single batch
        assert_eq!(translator.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_empty_segments_skipped() {
        let translator = EchoTranslator::new(false);
        let cache = cache();
        let t: Arc<dyn Translator> = translator.clone();

        let (out, stats) =
            translate_segments(&t, &cache, segs(&["", "  ", "x"]), "he", &fast_retry()).await;
        assert_eq!(out[0].text, "");
        assert_eq!(out[2].text, "[x]");
        assert_eq!(stats.translated, 1);
    }

    #[tokio::test]
    async fn test_batching_respects_batch_size() {
        let translator = EchoTranslator::new(false);
        let cache = cache();
        let t: Arc<dyn Translator> = translator.clone();

        let texts: Vec<String> = (0..25).map(|i| format!("line {i}")).collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let (_, stats) = translate_segments(&t, &cache, segs(&refs), "he", &fast_retry()).await;
        assert_eq!(stats.translated, 25);
        // 25 misses in batches of 10
        assert_eq!(translator.calls.load(Ordering::SeqCst), 3);
    }
}
