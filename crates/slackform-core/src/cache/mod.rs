// ── List cache ──
//
// Best-effort memoization of rate-limited list endpoints. A cache never
// fails an operation: unreadable or malformed entries are misses, and
// write failures are logged and dropped.

mod file;
mod memory;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub use file::FileCache;
pub use memory::MemoryCache;

/// Cache key for the `usergroups.list` snapshot.
pub const USERGROUPS_CACHE_KEY: &str = "usergroups";

/// Key/value store for serialized list snapshots.
pub trait ListCache: Send + Sync + fmt::Debug {
    /// Cached value for `key`, or `None` on any kind of miss.
    fn load(&self, key: &str) -> Option<Value>;

    /// Overwrite the value for `key`.
    fn store(&self, key: &str, value: &Value);

    /// Drop the entry for `key`, if any.
    fn clear(&self, key: &str);

    /// Drop every entry.
    fn clear_all(&self);
}

/// The caller was cancelled while queued behind another fetch of the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interrupted;

/// Per-key single-flight guard for read-through fetches.
///
/// Concurrent misses on the same key inside one process are serialized, so
/// only the first caller pays for the remote call and the rest read its
/// result back from the cache.
#[derive(Debug, Default)]
pub struct SingleFlight {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `key`, or run `fetch` and cache its result.
    ///
    /// Waiting for another caller's fetch is abandoned as soon as `cancel`
    /// fires.
    pub async fn cached_or_fetch<T, E, F, Fut>(
        &self,
        cache: &dyn ListCache,
        key: &str,
        cancel: &CancellationToken,
        fetch: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<Interrupted>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(hit) = decode(cache, key) {
            return Ok(hit);
        }

        let lock = self.locks.entry(key.to_owned()).or_default().clone();
        let _guard = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!(key, "cancelled while waiting for in-flight fetch");
                return Err(Interrupted.into());
            }
            guard = lock.lock() => guard,
        };

        // Another caller may have filled the entry while we waited.
        if let Some(hit) = decode(cache, key) {
            return Ok(hit);
        }

        debug!(key, "cache miss, fetching");
        let fresh = fetch().await?;
        match serde_json::to_value(&fresh) {
            Ok(value) => cache.store(key, &value),
            Err(e) => warn!(key, error = %e, "failed to serialize cache entry"),
        }
        Ok(fresh)
    }
}

fn decode<T: DeserializeOwned>(cache: &dyn ListCache, key: &str) -> Option<T> {
    let value = cache.load(key)?;
    match serde_json::from_value(value) {
        Ok(hit) => {
            debug!(key, "cache hit");
            Some(hit)
        }
        Err(e) => {
            warn!(key, error = %e, "ignoring malformed cache entry");
            None
        }
    }
}
