//! Expiring memo for zero-argument producers.
//!
//! A [`TtlCache`] holds at most one value together with the instant it was
//! produced. Aggregators own one cache per producer and hand it the fetch
//! closure on every call; the cache decides whether the closure runs.
//!
//! The refresh path is not serialized: two callers that miss at the same
//! time both run their producer and the last one to finish wins.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Source of "now" for cache expiry decisions.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Used by tests.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        *self.offset.lock() += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + *self.offset.lock()
    }
}

/// Stored value and the instant of its last successful production.
///
/// `value` is `None` only until the first success; after that it is only
/// ever replaced.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub value: Option<T>,
    pub fetched_at: Option<Instant>,
}

impl<T> Default for CacheEntry<T> {
    fn default() -> Self {
        Self {
            value: None,
            fetched_at: None,
        }
    }
}

/// Build a TTL from signed seconds; zero or negative disables caching.
pub fn ttl_from_secs(secs: i64) -> Duration {
    u64::try_from(secs)
        .map(Duration::from_secs)
        .unwrap_or(Duration::ZERO)
}

/// Single-slot TTL cache.
pub struct TtlCache<T> {
    name: &'static str,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entry: Mutex<CacheEntry<T>>,
}

impl<T: Clone> TtlCache<T> {
    /// Create a cache on the system clock. A zero TTL disables caching.
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self::with_clock(name, ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(name: &'static str, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            name,
            ttl,
            clock,
            entry: Mutex::new(CacheEntry::default()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Copy of the current entry.
    pub fn peek(&self) -> CacheEntry<T> {
        self.entry.lock().clone()
    }

    /// Return the cached value, running `producer` first when the entry is
    /// empty or older than the TTL.
    ///
    /// # Errors
    ///
    /// Returns the producer's error only when nothing has been cached yet.
    /// A failed refresh over an existing value keeps the old value and
    /// timestamp and returns the stale value.
    pub async fn get_or_refresh<F, Fut, E>(&self, producer: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let now = self.clock.now();
        if let Some(value) = self.fresh_value(now) {
            tracing::debug!("{} cache hit", self.name);
            return Ok(value);
        }

        tracing::info!("{} cache miss, refreshing", self.name);
        match producer().await {
            Ok(value) => {
                // Age counts from when the data arrived, not from the miss.
                let fetched_at = self.clock.now();
                let mut entry = self.entry.lock();
                entry.value = Some(value.clone());
                entry.fetched_at = Some(fetched_at);
                Ok(value)
            }
            Err(e) => {
                let entry = self.entry.lock();
                match &entry.value {
                    Some(stale) => {
                        tracing::warn!("{} refresh failed, serving stale value: {}", self.name, e);
                        Ok(stale.clone())
                    }
                    None => Err(e),
                }
            }
        }
    }

    fn fresh_value(&self, now: Instant) -> Option<T> {
        if self.ttl.is_zero() {
            return None;
        }
        let entry = self.entry.lock();
        let fetched_at = entry.fetched_at?;
        if now.saturating_duration_since(fetched_at) > self.ttl {
            return None;
        }
        entry.value.clone()
    }
}

impl<T> std::fmt::Debug for TtlCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("name", &self.name)
            .field("ttl", &self.ttl)
            .finish()
    }
}
