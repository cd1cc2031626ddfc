//! Lookup caching for the [`crate::finder::Finder`].
//!
//! Responsibilities:
//! - Memoize successful search/folder lookups behind one get-or-compute call.
//! - Offer three strategies: disabled, scoped to one session, or shared by a
//!   whole process.
//!
//! Does NOT handle:
//! - Caching failures (an error is recomputed next time).
//! - Fine-grained invalidation. Any create clears the whole cache.
//!
//! Invariants:
//! - The shared cache is built once by the caller and passed in; there is no
//!   module-level global.
//! - Keys include the organization, so org-scoped finders never see each
//!   other's results.

use std::future::Future;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use moka::policy::EvictionPolicy;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::Result;

/// Default number of cached lookups.
pub const DEFAULT_LOOKUP_CACHE_SIZE: u64 = 1_000;

/// Lifetime of an entry in the process-wide cache.
pub const DEFAULT_SHARED_TTL_SECONDS: u64 = 60;

/// Caching strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    /// Every lookup goes to Grafana.
    #[default]
    Disabled,
    /// Entries live as long as this cache (one command, one store).
    Scoped,
    /// Process-wide; entries expire after [`DEFAULT_SHARED_TTL_SECONDS`].
    Shared,
}

/// Identifies one lookup.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct LookupKey {
    pub operation: &'static str,
    pub org: Option<i64>,
    pub args: Vec<String>,
}

impl LookupKey {
    pub fn new(operation: &'static str, org: Option<i64>, args: impl IntoIterator<Item = String>) -> Self {
        Self {
            operation,
            org,
            args: args.into_iter().collect(),
        }
    }
}

/// Get-or-compute cache of lookup results. Clones share entries.
#[derive(Clone, Debug)]
pub struct LookupCache {
    inner: Option<MokaCache<LookupKey, Value>>,
    mode: CacheMode,
}

impl Default for LookupCache {
    fn default() -> Self {
        Self::disabled()
    }
}

impl LookupCache {
    pub fn new(mode: CacheMode) -> Self {
        let inner = match mode {
            CacheMode::Disabled => None,
            CacheMode::Scoped => Some(
                MokaCache::builder()
                    .max_capacity(DEFAULT_LOOKUP_CACHE_SIZE)
                    .eviction_policy(EvictionPolicy::lru())
                    .build(),
            ),
            CacheMode::Shared => Some(
                MokaCache::builder()
                    .max_capacity(DEFAULT_LOOKUP_CACHE_SIZE)
                    .eviction_policy(EvictionPolicy::lru())
                    .time_to_live(Duration::from_secs(DEFAULT_SHARED_TTL_SECONDS))
                    .build(),
            ),
        };
        Self { inner, mode }
    }

    pub fn disabled() -> Self {
        Self::new(CacheMode::Disabled)
    }

    pub fn scoped() -> Self {
        Self::new(CacheMode::Scoped)
    }

    pub fn shared() -> Self {
        Self::new(CacheMode::Shared)
    }

    pub fn mode(&self) -> CacheMode {
        self.mode
    }

    /// Return the cached value for `key`, or compute, cache and return it.
    pub async fn get_or_try_compute<T, F, Fut>(&self, key: LookupKey, compute: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let Some(cache) = &self.inner else {
            return compute().await;
        };

        if let Some(hit) = cache.get(&key).await {
            trace!(operation = key.operation, args = ?key.args, "Lookup cache hit");
            return Ok(serde_json::from_value(hit)?);
        }

        trace!(operation = key.operation, args = ?key.args, "Lookup cache miss");
        let value = compute().await?;
        cache.insert(key, serde_json::to_value(&value)?).await;
        Ok(value)
    }

    /// Drop every entry.
    pub fn invalidate_all(&self) {
        if let Some(cache) = &self.inner {
            cache.invalidate_all();
            debug!("Invalidated lookup cache");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn key(arg: &str) -> LookupKey {
        LookupKey::new("folder", Some(1), [arg.to_string()])
    }

    async fn counted(cache: &LookupCache, calls: &AtomicUsize, arg: &str) -> Result<String> {
        cache
            .get_or_try_compute(key(arg), || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(arg.to_uppercase())
            })
            .await
    }

    #[tokio::test]
    async fn test_disabled_always_computes() {
        let cache = LookupCache::disabled();
        let calls = AtomicUsize::new(0);
        counted(&cache, &calls, "ops").await.unwrap();
        counted(&cache, &calls, "ops").await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_scoped_memoizes_per_key() {
        let cache = LookupCache::scoped();
        let calls = AtomicUsize::new(0);
        assert_eq!(counted(&cache, &calls, "ops").await.unwrap(), "OPS");
        assert_eq!(counted(&cache, &calls, "ops").await.unwrap(), "OPS");
        counted(&cache, &calls, "dev").await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let cache = LookupCache::shared();
        let calls = AtomicUsize::new(0);
        counted(&cache, &calls, "ops").await.unwrap();
        counted(&cache.clone(), &calls, "ops").await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache = LookupCache::scoped();
        let first: Result<String> = cache
            .get_or_try_compute(key("x"), || async move { Err(Error::Unsupported("x".to_string())) })
            .await;
        assert!(first.is_err());

        let second: Result<String> = cache
            .get_or_try_compute(key("x"), || async move { Ok("ok".to_string()) })
            .await;
        assert_eq!(second.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_invalidate_all() {
        let cache = LookupCache::scoped();
        let calls = AtomicUsize::new(0);
        counted(&cache, &calls, "ops").await.unwrap();
        cache.invalidate_all();
        counted(&cache, &calls, "ops").await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_org_is_part_of_key() {
        assert_ne!(
            LookupKey::new("folder", Some(1), ["ops".to_string()]),
            LookupKey::new("folder", Some(2), ["ops".to_string()])
        );
    }
}
