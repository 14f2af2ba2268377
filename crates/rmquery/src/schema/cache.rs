//! LRU caching adapter for slow schema providers.
//!
//! Schema lookups against the resource service are network round trips.
//! [`CachedSchema`] keeps recent answers, including negative ones, so that
//! building many filters over the same attributes costs one lookup each.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use lru::LruCache;
use parking_lot::Mutex;

use super::{AttributeDescriptor, SchemaProvider};

/// Configuration for [`CachedSchema`].
#[derive(Debug, Clone)]
pub struct SchemaCacheConfig {
    /// Maximum number of cached attribute and object type answers (each).
    pub capacity: usize,
    /// Time-to-live for cached answers (None = never expire).
    pub ttl: Option<Duration>,
}

impl Default for SchemaCacheConfig {
    fn default() -> Self {
        Self {
            capacity: 1024,
            ttl: None,
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    created_at: Instant,
}

impl<T> CacheEntry<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            created_at: Instant::now(),
        }
    }

    fn is_expired(&self, ttl: Option<Duration>) -> bool {
        ttl.is_some_and(|ttl| self.created_at.elapsed() > ttl)
    }
}

/// Hit/miss counters for a [`CachedSchema`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchemaCacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups forwarded to the inner provider.
    pub misses: u64,
    /// Cached attribute answers.
    pub attribute_entries: usize,
    /// Cached object type answers.
    pub object_type_entries: usize,
}

/// [`SchemaProvider`] wrapper that memoizes lookups in LRU caches.
pub struct CachedSchema<S> {
    inner: S,
    attributes: Mutex<LruCache<String, CacheEntry<Option<AttributeDescriptor>>>>,
    object_types: Mutex<LruCache<String, CacheEntry<bool>>>,
    ttl: Option<Duration>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<S: SchemaProvider> CachedSchema<S> {
    /// Wraps `inner` with the default cache configuration.
    pub fn new(inner: S) -> Self {
        Self::with_config(inner, SchemaCacheConfig::default())
    }

    /// Wraps `inner` with a custom cache configuration.
    pub fn with_config(inner: S, config: SchemaCacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            attributes: Mutex::new(LruCache::new(capacity)),
            object_types: Mutex::new(LruCache::new(capacity)),
            ttl: config.ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Returns the wrapped provider.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Drops every cached answer.
    pub fn clear(&self) {
        self.attributes.lock().clear();
        self.object_types.lock().clear();
    }

    /// Returns current cache statistics.
    pub fn stats(&self) -> SchemaCacheStats {
        SchemaCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            attribute_entries: self.attributes.lock().len(),
            object_type_entries: self.object_types.lock().len(),
        }
    }

    fn lookup<T: Clone>(
        &self,
        cache: &Mutex<LruCache<String, CacheEntry<T>>>,
        key: &str,
        load: impl FnOnce() -> T,
    ) -> T {
        {
            let mut guard = cache.lock();
            let cached = guard
                .get(key)
                .map(|entry| (entry.is_expired(self.ttl), entry.value.clone()));
            match cached {
                Some((false, value)) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return value;
                }
                Some((true, _)) => {
                    guard.pop(key);
                }
                None => {}
            }
        }

        // Load outside the lock; concurrent misses may both hit the provider.
        self.misses.fetch_add(1, Ordering::Relaxed);
        let value = load();
        tracing::trace!(key, "schema cache miss");
        cache
            .lock()
            .put(key.to_string(), CacheEntry::new(value.clone()));
        value
    }
}

impl<S: SchemaProvider> SchemaProvider for CachedSchema<S> {
    fn describe_attribute(&self, name: &str) -> Option<AttributeDescriptor> {
        self.lookup(&self.attributes, name, || self.inner.describe_attribute(name))
    }

    fn has_object_type(&self, name: &str) -> bool {
        self.lookup(&self.object_types, name, || self.inner.has_object_type(name))
    }
}

impl<S> std::fmt::Debug for CachedSchema<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedSchema")
            .field("attribute_entries", &self.attributes.lock().len())
            .field("object_type_entries", &self.object_types.lock().len())
            .field("ttl", &self.ttl)
            .finish()
    }
}
