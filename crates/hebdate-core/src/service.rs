//! Cached lookup of today's Hebrew date.
//!
//! [`DateFetcher`] resolves the local date from its [`Clock`], serves a live
//! cache entry when one exists, and otherwise asks the converter. Only
//! successful conversions are cached, so an upstream outage clears itself on
//! the next request instead of sticking for a day.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cache::{CACHE_TTL, cache_key};
use crate::{CacheStore, Clock, Fetcher, HebrewDateResult};

/// Looks up today's Hebrew date with a time-bounded cache in front of the
/// converter.
///
/// Concurrent callers on a cold cache may each hit the network; the
/// resulting writes carry identical data, so no coalescing is attempted.
pub struct DateFetcher {
    fetcher: Fetcher,
    store: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl DateFetcher {
    /// Wire a fetcher to its collaborators with the standard 24 hour TTL.
    pub fn new(fetcher: Fetcher, store: Arc<dyn CacheStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            fetcher,
            store,
            clock,
            ttl: CACHE_TTL,
        }
    }

    /// Override how long successful lookups are cached.
    #[must_use]
    pub const fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Today's Hebrew date.
    ///
    /// Never fails: transport, status and format problems come back as
    /// [`HebrewDateResult::Failure`]. A broken cache store is logged and
    /// bypassed.
    pub async fn get_hebrew_date(&self) -> HebrewDateResult {
        let today = self.clock.today();
        let key = cache_key(today);

        match self.store.get(&key).await {
            Ok(Some(cached)) => {
                debug!("Cache hit for {}", key);
                return cached;
            },
            Ok(None) => debug!("Cache miss for {}", key),
            Err(e) => warn!("Cache read for {} failed, fetching instead: {}", key, e),
        }

        let result = match self.fetcher.convert(today).await {
            Ok(date) => HebrewDateResult::Success(date),
            Err(e) => {
                warn!(
                    category = e.category(),
                    recoverable = e.is_recoverable(),
                    "Hebrew date lookup for {} failed: {}",
                    today,
                    e
                );
                return HebrewDateResult::from(e);
            },
        };

        if let Err(e) = self.store.set(&key, &result, self.ttl).await {
            warn!("Failed to cache {}: {}", key, e);
        } else {
            info!("Cached {} for {}s", key, self.ttl.as_secs());
        }

        result
    }

    /// Skip the cache entirely and ask the converter for today's date.
    ///
    /// The result is not written back.
    pub async fn fetch_uncached(&self) -> HebrewDateResult {
        let today = self.clock.today();
        match self.fetcher.convert(today).await {
            Ok(date) => HebrewDateResult::Success(date),
            Err(e) => HebrewDateResult::from(e),
        }
    }
}
