//! Context-keyed client cache
//!
//! Builds an API client per cluster context on demand and reuses it until it
//! has been idle for the configured TTL. Exec-based credentials go stale and
//! dashboards touch many contexts over a long uptime, so idle entries are
//! swept out instead of living forever.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use kube::Client;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::CacheConfig;
use crate::error::Error;
use crate::kube::ContextResolver;

struct CacheEntry {
    client: Client,
    last_accessed: Instant,
}

/// Point-in-time cache counters, served by the introspection endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub total: u64,
    pub cache_size: usize,
    pub hit_rate: String,
    pub ttl_ms: u64,
    pub cleanup_interval_ms: u64,
    pub enabled: bool,
}

/// Shared, process-wide client cache.
///
/// Owned by the composition root and injected into every handler that needs
/// cluster access. The entry map lock is never held across an await point;
/// two concurrent misses for the same context may both construct a client,
/// with the later insert winning. That costs one wasted construction and is
/// preferred over serializing misses behind a lock.
pub struct ClientCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
    resolver: Box<dyn ContextResolver>,
    ttl: Duration,
    cleanup_interval: Duration,
    enabled: bool,
}

impl ClientCache {
    pub fn new(resolver: Box<dyn ContextResolver>, config: &CacheConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            resolver,
            ttl: Duration::from_millis(config.ttl_ms),
            cleanup_interval: Duration::from_millis(config.cleanup_interval_ms),
            enabled: config.enabled,
        }
    }

    /// Get a client for the given context; `None` or `""` means the current
    /// context. A live, unexpired entry is a hit; everything else resolves
    /// and constructs a fresh client.
    pub async fn client(&self, context: Option<&str>) -> Result<Client, Error> {
        let key = context.unwrap_or("").to_string();

        if self.enabled {
            let mut entries = self.entries.write().expect("cache lock poisoned");
            match entries.get_mut(&key) {
                Some(entry) if entry.last_accessed.elapsed() < self.ttl => {
                    entry.last_accessed = Instant::now();
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return Ok(entry.client.clone());
                }
                Some(_) => {
                    // Expired entry: evict and treat the call as a miss
                    entries.remove(&key);
                }
                None => {}
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let requested = context.filter(|c| !c.is_empty());
        let client = self.resolver.client_for(requested).await?;

        if self.enabled {
            let mut entries = self.entries.write().expect("cache lock poisoned");
            entries.insert(
                key,
                CacheEntry {
                    client: client.clone(),
                    last_accessed: Instant::now(),
                },
            );
        }

        Ok(client)
    }

    /// Reset cache state.
    ///
    /// With a context name, evicts just that entry; unknown names are a
    /// no-op. With `None` or an empty name, clears every entry and zeroes
    /// the hit/miss counters. Never fails.
    pub fn reset(&self, context: Option<&str>) {
        let mut entries = self.entries.write().expect("cache lock poisoned");
        match context {
            Some(name) if !name.is_empty() => {
                entries.remove(name);
            }
            _ => {
                entries.clear();
                self.hits.store(0, Ordering::Relaxed);
                self.misses.store(0, Ordering::Relaxed);
            }
        }
    }

    /// Current counters. `hit_rate` is hits over total, `"0.0%"` when no
    /// call has been made yet.
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let rate = (hits as f64) / (total.max(1) as f64) * 100.0;

        CacheStats {
            hits,
            misses,
            total,
            cache_size: self.entries.read().expect("cache lock poisoned").len(),
            hit_rate: format!("{:.1}%", rate),
            ttl_ms: self.ttl.as_millis() as u64,
            cleanup_interval_ms: self.cleanup_interval.as_millis() as u64,
            enabled: self.enabled,
        }
    }

    /// Evict entries idle longer than the TTL, returning how many went.
    ///
    /// Keys are snapshotted first so the sweep tolerates concurrent gets and
    /// resets mutating the map underneath it.
    pub fn sweep(&self) -> usize {
        let keys: Vec<String> = self
            .entries
            .read()
            .expect("cache lock poisoned")
            .keys()
            .cloned()
            .collect();

        let mut evicted = 0;
        for key in keys {
            let mut entries = self.entries.write().expect("cache lock poisoned");
            if let Some(entry) = entries.get(&key) {
                if entry.last_accessed.elapsed() >= self.ttl {
                    entries.remove(&key);
                    evicted += 1;
                }
            }
        }

        if evicted > 0 {
            debug!(evicted, "evicted idle cluster clients");
        }
        evicted
    }

    /// Spawn the recurring eviction sweep. Abort the returned handle on
    /// shutdown.
    pub fn spawn_sweeper(self: Arc<Self>) -> JoinHandle<()> {
        let cache = self;
        // interval() panics on a zero period
        let period = cache.cleanup_interval.max(Duration::from_millis(1));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // interval fires immediately; the first sweep should not
            ticker.tick().await;
            loop {
                ticker.tick().await;
                cache.sweep();
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use kube::Config;
    use std::sync::atomic::AtomicUsize;

    /// Resolver fixture that counts constructions and never touches a
    /// cluster; the client is lazy so no connection is made.
    struct StaticResolver {
        constructed: AtomicUsize,
    }

    impl StaticResolver {
        fn new() -> Self {
            Self {
                constructed: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ContextResolver for StaticResolver {
        async fn client_for(&self, context: Option<&str>) -> Result<Client, Error> {
            if context == Some("broken") {
                return Err(Error::Configuration("context 'broken' not found".into()));
            }
            self.constructed.fetch_add(1, Ordering::SeqCst);
            let config = Config::new("http://127.0.0.1:8080".parse().unwrap());
            Client::try_from(config).map_err(Error::Kube)
        }
    }

    fn cache_with(config: CacheConfig) -> ClientCache {
        ClientCache::new(Box::new(StaticResolver::new()), &config)
    }

    #[tokio::test]
    async fn test_second_get_is_a_hit() {
        let cache = cache_with(CacheConfig::default());

        cache.client(Some("staging")).await.unwrap();
        cache.client(Some("staging")).await.unwrap();

        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.cache_size, 1);
    }

    #[tokio::test]
    async fn test_distinct_contexts_get_distinct_entries() {
        let cache = cache_with(CacheConfig::default());

        cache.client(None).await.unwrap();
        cache.client(Some("staging")).await.unwrap();
        cache.client(Some("prod")).await.unwrap();

        let stats = cache.stats();
        assert_eq!(stats.misses, 3);
        assert_eq!(stats.cache_size, 3);
    }

    #[tokio::test]
    async fn test_empty_context_aliases_current() {
        let cache = cache_with(CacheConfig::default());

        cache.client(None).await.unwrap();
        cache.client(Some("")).await.unwrap();

        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.cache_size, 1);
    }

    #[tokio::test]
    async fn test_expired_entry_is_a_miss() {
        let config = CacheConfig {
            ttl_ms: 0,
            ..CacheConfig::default()
        };
        let cache = cache_with(config);

        cache.client(Some("staging")).await.unwrap();
        cache.client(Some("staging")).await.unwrap();

        let stats = cache.stats();
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.cache_size, 1);
    }

    #[tokio::test]
    async fn test_disabled_cache_never_stores() {
        let config = CacheConfig {
            enabled: false,
            ..CacheConfig::default()
        };
        let cache = cache_with(config);

        cache.client(Some("staging")).await.unwrap();
        cache.client(Some("staging")).await.unwrap();

        let stats = cache.stats();
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.cache_size, 0);
        assert!(!stats.enabled);
    }

    #[tokio::test]
    async fn test_reset_all_zeroes_counters() {
        let cache = cache_with(CacheConfig::default());

        cache.client(Some("staging")).await.unwrap();
        cache.client(Some("staging")).await.unwrap();
        cache.reset(None);

        let stats = cache.stats();
        assert_eq!(stats.cache_size, 0);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.hit_rate, "0.0%");
    }

    #[tokio::test]
    async fn test_reset_single_context_keeps_counters() {
        let cache = cache_with(CacheConfig::default());

        cache.client(Some("staging")).await.unwrap();
        cache.client(Some("prod")).await.unwrap();
        cache.reset(Some("staging"));

        let stats = cache.stats();
        assert_eq!(stats.cache_size, 1);
        assert_eq!(stats.misses, 2);
    }

    #[tokio::test]
    async fn test_reset_is_idempotent_for_unknown_names() {
        let cache = cache_with(CacheConfig::default());

        cache.reset(Some("nonexistent-context"));
        cache.reset(Some(""));
        cache.reset(None);
        assert_eq!(cache.stats().cache_size, 0);
    }

    #[tokio::test]
    async fn test_resolver_failure_propagates_and_counts_a_miss() {
        let cache = cache_with(CacheConfig::default());

        let Err(err) = cache.client(Some("broken")).await else {
            panic!("expected the resolver failure to propagate as an error");
        };
        assert!(matches!(err, Error::Configuration(_)));

        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.cache_size, 0);
    }

    #[tokio::test]
    async fn test_sweep_evicts_only_idle_entries() {
        let config = CacheConfig {
            ttl_ms: 0,
            ..CacheConfig::default()
        };
        let cache = cache_with(config);

        cache.client(Some("staging")).await.unwrap();
        assert_eq!(cache.stats().cache_size, 1);

        let evicted = cache.sweep();
        assert_eq!(evicted, 1);
        assert_eq!(cache.stats().cache_size, 0);
        // Counters survive a sweep
        assert_eq!(cache.stats().misses, 1);
    }

    #[tokio::test]
    async fn test_hit_rate_format() {
        let cache = cache_with(CacheConfig::default());
        assert_eq!(cache.stats().hit_rate, "0.0%");

        cache.client(Some("staging")).await.unwrap();
        cache.client(Some("staging")).await.unwrap();
        cache.client(Some("staging")).await.unwrap();

        // 2 hits out of 3 calls
        assert_eq!(cache.stats().hit_rate, "66.7%");
    }
}
