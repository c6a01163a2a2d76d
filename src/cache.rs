//! # Single-Slot Image Cache
//!
//! Holds the last successfully generated bitmap and decides, per request,
//! whether to reuse it or generate a new one.
//!
//! ```text
//!                 age < ttl
//!           ┌──────────────────┐
//!           ▼                  │
//!       ┌───────┐  serve   ┌───┴───┐
//!       │ Fresh │─────────►│ Fresh │
//!       └───────┘          └───────┘
//!
//!   ┌────────────────┐  generate ok   ┌───────┐
//!   │ Stale-or-Empty │───────────────►│ Fresh │  (entry replaced, timestamp = now)
//!   └──────┬─────────┘                └───────┘
//!          │ generate failed
//!          ├── stale entry exists ──► serve it, timestamp untouched
//!          └── no entry ────────────► error
//! ```
//!
//! ## Concurrency
//!
//! Regeneration is single-flight. Fresh reads only take the read lock and
//! never wait for a regeneration. Requests that find the entry stale queue
//! on the regeneration mutex; once inside they re-check freshness and, if
//! the attempt they waited on already failed, reuse its outcome instead of
//! starting another one.
//!
//! The generation itself runs on a spawned task that owns the regeneration
//! lock, so a client disconnecting mid-download does not throw the work away.

use bytes::Bytes;
use chrono::{DateTime, TimeDelta, Utc};
use std::future::Future;
use std::sync::{
    Arc, Mutex as StdMutex,
    atomic::{AtomicU64, Ordering},
};
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::error::{CatInkError, PipelineError};

/// Source of "now" for cache age calculations.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: StdMutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: StdMutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let by = TimeDelta::from_std(by).unwrap_or(TimeDelta::MAX);
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now = now.checked_add_signed(by).unwrap_or(DateTime::<Utc>::MAX_UTC);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// The one generated bitmap and when it was made.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub bytes: Bytes,
    pub generated_at: DateTime<Utc>,
}

/// How a response was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Served {
    /// Entry was younger than the TTL
    Fresh,
    /// Entry was just generated
    Generated,
    /// Generation failed; the old entry was reused
    Stale,
}

impl Served {
    pub fn as_str(self) -> &'static str {
        match self {
            Served::Fresh => "fresh",
            Served::Generated => "generated",
            Served::Stale => "stale",
        }
    }
}

/// Bitmap handed back to a caller.
#[derive(Debug, Clone)]
pub struct CacheHit {
    pub bytes: Bytes,
    pub generated_at: DateTime<Utc>,
    pub served: Served,
}

/// Point-in-time view of the cache, for status reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSnapshot {
    pub generated_at: Option<DateTime<Utc>>,
    pub age: Option<TimeDelta>,
    pub fresh: bool,
}

/// Single-slot, TTL-based cache with single-flight regeneration.
pub struct ImageCache {
    inner: Arc<CacheInner>,
}

struct CacheInner {
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
    entry: RwLock<Option<CacheEntry>>,
    /// Held for the whole regeneration; remembers the last failure
    regeneration: Arc<Mutex<Option<PipelineError>>>,
    /// Completed regeneration attempts, successful or not
    attempts: AtomicU64,
}

impl ImageCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Result<Self, CatInkError> {
        let ttl = TimeDelta::from_std(ttl)
            .map_err(|e| CatInkError::Config(format!("Cache TTL out of range: {}", e)))?;
        Ok(Self {
            inner: Arc::new(CacheInner {
                ttl,
                clock,
                entry: RwLock::new(None),
                regeneration: Arc::new(Mutex::new(None)),
                attempts: AtomicU64::new(0),
            }),
        })
    }

    pub fn ttl(&self) -> TimeDelta {
        self.inner.ttl
    }

    /// Serve the cached bitmap if fresh, otherwise run `produce` to replace it.
    ///
    /// Fails only when generation fails and there is nothing cached to fall
    /// back to. The generation runs on its own task: dropping the returned
    /// future does not cancel it, and its result is still stored.
    pub async fn get_or_generate<F, Fut>(&self, produce: F) -> Result<CacheHit, PipelineError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Bytes, PipelineError>> + Send + 'static,
    {
        let inner = &self.inner;
        if let Some(hit) = inner.fresh().await {
            return Ok(hit);
        }

        let observed = inner.attempts.load(Ordering::Acquire);
        let last_error = inner.regeneration.clone().lock_owned().await;

        if let Some(hit) = inner.fresh().await {
            // Someone else regenerated while we waited
            return Ok(hit);
        }
        if inner.attempts.load(Ordering::Acquire) != observed {
            if let Some(error) = last_error.as_ref() {
                tracing::debug!(%error, "regeneration failed while waiting, reusing outcome");
                return inner.stale_or(error.clone()).await;
            }
        }

        tracing::info!("cache expired, generating new image");
        let task = tokio::spawn(Arc::clone(inner).regenerate(produce(), last_error));
        match task.await {
            Ok(result) => result,
            Err(e) => {
                let error = PipelineError::ProcessingFailed(format!("Generation task failed: {}", e));
                tracing::error!(%error, "regeneration task did not finish");
                inner.stale_or(error).await
            }
        }
    }

    /// Current entry, fresh or not.
    pub async fn entry(&self) -> Option<CacheEntry> {
        self.inner.entry.read().await.clone()
    }

    pub async fn snapshot(&self) -> CacheSnapshot {
        let inner = &self.inner;
        let entry = inner.entry.read().await;
        let now = inner.clock.now();
        match entry.as_ref() {
            Some(entry) => {
                let age = now.signed_duration_since(entry.generated_at);
                CacheSnapshot {
                    generated_at: Some(entry.generated_at),
                    age: Some(age),
                    fresh: age < inner.ttl,
                }
            }
            None => CacheSnapshot {
                generated_at: None,
                age: None,
                fresh: false,
            },
        }
    }
}

impl CacheInner {
    /// Run one generation and record its outcome while holding the lock.
    async fn regenerate<Fut>(
        self: Arc<Self>,
        produce: Fut,
        mut last_error: OwnedMutexGuard<Option<PipelineError>>,
    ) -> Result<CacheHit, PipelineError>
    where
        Fut: Future<Output = Result<Bytes, PipelineError>>,
    {
        let result = produce.await;
        self.attempts.fetch_add(1, Ordering::AcqRel);

        match result {
            Ok(bytes) => {
                let generated_at = self.clock.now();
                *self.entry.write().await = Some(CacheEntry {
                    bytes: bytes.clone(),
                    generated_at,
                });
                *last_error = None;
                Ok(CacheHit {
                    bytes,
                    generated_at,
                    served: Served::Generated,
                })
            }
            Err(error) => {
                tracing::warn!(%error, "image generation failed");
                *last_error = Some(error.clone());
                self.stale_or(error).await
            }
        }
    }

    async fn fresh(&self) -> Option<CacheHit> {
        let entry = self.entry.read().await;
        let entry = entry.as_ref()?;
        let age = self.clock.now().signed_duration_since(entry.generated_at);
        if age >= self.ttl {
            return None;
        }

        tracing::debug!(remaining_secs = (self.ttl - age).num_seconds(), "serving cache");
        Some(CacheHit {
            bytes: entry.bytes.clone(),
            generated_at: entry.generated_at,
            served: Served::Fresh,
        })
    }

    async fn stale_or(&self, error: PipelineError) -> Result<CacheHit, PipelineError> {
        match self.entry.read().await.as_ref() {
            Some(entry) => {
                tracing::info!(generated_at = %entry.generated_at, "serving stale image");
                Ok(CacheHit {
                    bytes: entry.bytes.clone(),
                    generated_at: entry.generated_at,
                    served: Served::Stale,
                })
            }
            None => Err(error),
        }
    }
}
