//! Time-bounded key-value stores for lookup results.
//!
//! [`CacheStore`] is the seam the [`DateFetcher`](crate::DateFetcher) talks
//! to. Two implementations are provided:
//!
//! - [`MemoryStore`]: process-wide map guarded by a `tokio` `RwLock`, for
//!   long-running hosts and tests.
//! - [`FileStore`]: one JSON file per key under a data directory, so that
//!   short-lived processes (the CLI) share entries across invocations.
//!
//! Expiry is enforced on read: an entry whose `expires_at` has passed reads as
//! absent. Both stores take their notion of "now" from a [`Clock`] so expiry
//! can be exercised without waiting.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::{Clock, Error, HebrewDateResult, Result};

/// Prefix shared by every lookup key.
pub const CACHE_KEY_PREFIX: &str = "hebrew_date_";

/// How long a successful lookup stays valid.
pub const CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Cache key for a local calendar date: `hebrew_date_YYYY-MM-DD`.
#[must_use]
pub fn cache_key(date: NaiveDate) -> String {
    format!("{CACHE_KEY_PREFIX}{}", date.format("%Y-%m-%d"))
}

/// Key-value store with per-entry expiry.
///
/// Implementations only need atomic get/set per key; there are no
/// cross-key transactions.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch a live entry. Expired and missing entries are both `None`.
    async fn get(&self, key: &str) -> Result<Option<HebrewDateResult>>;

    /// Store `value` under `key`, expiring `ttl` from now.
    async fn set(&self, key: &str, value: &HebrewDateResult, ttl: Duration) -> Result<()>;
}

/// A stored value with its expiry time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    /// The cached lookup result.
    pub value: HebrewDateResult,
    /// When the entry stops being served.
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    fn new(value: HebrewDateResult, now: DateTime<Utc>, ttl: Duration) -> Result<Self> {
        let delta = TimeDelta::from_std(ttl)
            .map_err(|e| Error::Storage(format!("TTL out of range: {e}")))?;
        let expires_at = now.checked_add_signed(delta).ok_or_else(|| {
            Error::Storage(format!("TTL of {}s is beyond the representable range", ttl.as_secs()))
        })?;
        Ok(Self { value, expires_at })
    }

    /// Whether the entry has expired at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// In-memory store.
pub struct MemoryStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    /// Create an empty store that reads time from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Number of entries held, including expired ones not yet overwritten.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store holds no entries at all.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<HebrewDateResult>> {
        let now = self.clock.now();
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: &HebrewDateResult, ttl: Duration) -> Result<()> {
        let entry = CacheEntry::new(value.clone(), self.clock.now(), ttl)?;
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }
}

/// Directory-backed store: `<dir>/<key>.json`.
pub struct FileStore {
    dir: PathBuf,
    clock: Arc<dyn Clock>,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| Error::Storage(format!("Failed to create cache directory: {e}")))?;
        Ok(Self { dir, clock })
    }

    /// Directory entries are written to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Remove every entry, returning how many were deleted.
    ///
    /// Temp files left behind by an interrupted write are removed too but
    /// not counted.
    pub fn clear(&self) -> Result<usize> {
        let entries = fs::read_dir(&self.dir)
            .map_err(|e| Error::Storage(format!("Failed to read cache directory: {e}")))?;
        let mut removed = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let is_entry = name.ends_with(".json");
            if !is_entry && !is_partial_write(name) {
                continue;
            }
            fs::remove_file(&path)
                .map_err(|e| Error::Storage(format!("Failed to remove cache entry: {e}")))?;
            if is_entry {
                removed += 1;
            }
        }
        debug!("Cleared {} cache entries from {}", removed, self.dir.display());
        Ok(removed)
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(key)))
    }

    fn discard(path: &Path) {
        if let Err(e) = fs::remove_file(path) {
            if e.kind() != ErrorKind::NotFound {
                warn!("Failed to remove stale cache entry {}: {}", path.display(), e);
            }
        }
    }
}

#[async_trait]
impl CacheStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<HebrewDateResult>> {
        let path = self.entry_path(key);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::Storage(format!("Failed to read cache entry: {e}"))),
        };

        let entry: CacheEntry = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Discarding unreadable cache entry {}: {}", path.display(), e);
                Self::discard(&path);
                return Ok(None);
            },
        };

        if entry.is_expired(self.clock.now()) {
            debug!("Cache entry {} expired at {}", key, entry.expires_at);
            Self::discard(&path);
            return Ok(None);
        }

        Ok(Some(entry.value))
    }

    async fn set(&self, key: &str, value: &HebrewDateResult, ttl: Duration) -> Result<()> {
        let entry = CacheEntry::new(value.clone(), self.clock.now(), ttl)?;
        let json = serde_json::to_string_pretty(&entry)?;

        // Write-then-rename so a concurrent reader never sees a partial file.
        let path = self.entry_path(key);
        let tmp = path.with_extension(format!("json.{}.tmp", std::process::id()));
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| Error::Storage(format!("Failed to write cache entry: {e}")))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| Error::Storage(format!("Failed to commit cache entry: {e}")))?;
        Ok(())
    }
}

/// `<key>.json.<pid>.tmp`, as written by [`FileStore::set`].
fn is_partial_write(name: &str) -> bool {
    name.strip_suffix(".tmp")
        .and_then(|rest| rest.rsplit_once(".json."))
        .is_some_and(|(_, pid)| !pid.is_empty() && pid.chars().all(|c| c.is_ascii_digit()))
}

/// Keep keys to a conservative filename alphabet.
fn sanitize_key(key: &str) -> String {
    let mut sanitized: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    while sanitized.contains("..") {
        sanitized = sanitized.replace("..", "_");
    }
    if sanitized.is_empty() {
        "_".to_string()
    } else {
        sanitized
    }
}
