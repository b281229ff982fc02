//! Persistent TTL cache for translated text.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use crate::error::WorkerResult;

/// Entries older than this are never returned and are swept.
pub const CACHE_TTL_DAYS: i64 = 7;

/// A disk save is triggered after this many new entries.
pub const SAVE_EVERY_NEW_ENTRIES: usize = 50;

/// Time source, injectable for TTL tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    translation: String,
    timestamp: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    new_since_save: usize,
}

/// Content-addressed translation cache with periodic disk persistence.
///
/// Keys are a one-way hash of `text + ":" + lang`, so restarts and parallel
/// processes derive identical keys for identical inputs. All access goes
/// through one lock; the disk file is only ever written under that lock.
pub struct TranslationCache {
    inner: Mutex<CacheInner>,
    path: PathBuf,
    ttl: ChronoDuration,
    clock: Arc<dyn Clock>,
}

impl TranslationCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_clock(path, Arc::new(SystemClock))
    }

    pub fn with_clock(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(CacheInner::default()),
            path: path.into(),
            ttl: ChronoDuration::days(CACHE_TTL_DAYS),
            clock,
        }
    }

    /// Deterministic cache key for a (text, language) pair.
    pub fn key(text: &str, lang: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        hasher.update(b":");
        hasher.update(lang.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Look up a translation; expired entries are misses.
    pub fn lookup(&self, text: &str, lang: &str) -> Option<String> {
        let key = Self::key(text, lang);
        let now = self.clock.now();
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner
            .entries
            .get(&key)
            .filter(|e| now - e.timestamp < self.ttl)
            .map(|e| e.translation.clone())
    }

    /// Upsert a translation with the current timestamp. Saves to disk when
    /// enough new entries have accumulated.
    pub fn store(&self, text: &str, lang: &str, translation: impl Into<String>) {
        let key = Self::key(text, lang);
        let entry = CacheEntry {
            translation: translation.into(),
            timestamp: self.clock.now(),
        };

        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.entries.insert(key, entry);
        inner.new_since_save += 1;

        if inner.new_since_save >= SAVE_EVERY_NEW_ENTRIES {
            if let Err(e) = self.save_locked(&mut inner) {
                warn!(error = %e, "periodic cache save failed");
            }
        }
    }

    /// Remove all expired entries, returning how many were dropped.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let before = inner.entries.len();
        let ttl = self.ttl;
        inner.entries.retain(|_, e| now - e.timestamp < ttl);
        before - inner.entries.len()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Load the cache from disk, dropping entries that expired while the
    /// process was down. A missing or unreadable file starts empty.
    pub fn load(&self) -> usize {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(_) => {
                debug!(path = %self.path.display(), "no cache file, starting empty");
                return 0;
            }
        };

        let parsed: HashMap<String, CacheEntry> = match serde_json::from_slice(&bytes) {
            Ok(m) => m,
            Err(e) => {
                warn!(error = %e, "cache file unreadable, starting empty");
                return 0;
            }
        };

        let now = self.clock.now();
        let ttl = self.ttl;
        let live: HashMap<String, CacheEntry> = parsed
            .into_iter()
            .filter(|(_, e)| now - e.timestamp < ttl)
            .collect();
        let count = live.len();

        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.entries = live;
        inner.new_since_save = 0;

        info!(entries = count, "translation cache loaded");
        count
    }

    /// Sweep expired entries and persist the cache to disk.
    pub fn save(&self) -> WorkerResult<()> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let now = self.clock.now();
        let ttl = self.ttl;
        inner.entries.retain(|_, e| now - e.timestamp < ttl);
        self.save_locked(&mut inner)
    }

    fn save_locked(&self, inner: &mut CacheInner) -> WorkerResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec(&inner.entries)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        inner.new_since_save = 0;
        debug!(entries = inner.entries.len(), "translation cache saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
