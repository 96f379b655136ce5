//! Memoization of compiled templates behind an enable switch.

use std::sync::Arc;
use std::time::Duration;

use cotton_common::Mtime;

use crate::error::CacheError;
use crate::key::CacheKey;
use crate::store::{CacheStore, MemoryStore};

/// Caches compiled templates by [`CacheKey`].
///
/// When disabled every lookup misses and every store is a no-op, so callers
/// can use one code path whether caching is configured or not.
#[derive(Clone)]
pub struct TemplateCache {
    enabled: bool,
    store: Arc<dyn CacheStore>,
}

impl TemplateCache {
    /// Creates a cache over `store`.
    pub fn new(enabled: bool, store: Arc<dyn CacheStore>) -> Self {
        Self { enabled, store }
    }

    /// Creates an enabled cache over a fresh [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::new(true, Arc::new(MemoryStore::new()))
    }

    /// Creates a cache that never stores anything.
    pub fn disabled() -> Self {
        Self::new(false, Arc::new(MemoryStore::new()))
    }

    /// Returns `true` if lookups and stores reach the store.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Derives the key for a template identity and modification time.
    pub fn key(&self, identity: &str, mtime: Mtime) -> CacheKey {
        CacheKey::new(identity, mtime)
    }

    /// Returns the cached compiled text for `key`.
    pub fn get(&self, key: &CacheKey) -> Option<String> {
        if !self.enabled {
            return None;
        }
        self.store.get(key.as_str())
    }

    /// Stores compiled text under `key` with no expiry.
    pub fn store(&self, key: &CacheKey, compiled: &str) -> Result<(), CacheError> {
        self.store_with_timeout(key, compiled, None)
    }

    /// Stores compiled text under `key`, expiring after `timeout` if given.
    pub fn store_with_timeout(
        &self,
        key: &CacheKey,
        compiled: &str,
        timeout: Option<Duration>,
    ) -> Result<(), CacheError> {
        if !self.enabled {
            return Ok(());
        }
        self.store.set(key.as_str(), compiled, timeout)
    }
}

impl std::fmt::Debug for TemplateCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateCache")
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_store::FileStore;

    fn mtime() -> Mtime {
        Mtime::from_secs_f64(1700000000.5)
    }

    #[test]
    fn enabled_cache_round_trips() {
        let cache = TemplateCache::in_memory();
        let key = cache.key("cotton/card.html", mtime());
        assert!(cache.get(&key).is_none());
        cache.store(&key, "compiled").unwrap();
        assert_eq!(cache.get(&key).as_deref(), Some("compiled"));
    }

    #[test]
    fn disabled_cache_never_hits() {
        let store = Arc::new(MemoryStore::new());
        let cache = TemplateCache::new(false, store.clone());
        let key = cache.key("cotton/card.html", mtime());
        cache.store(&key, "compiled").unwrap();
        assert!(cache.get(&key).is_none());
        assert!(store.is_empty());
        assert!(!TemplateCache::disabled().is_enabled());
    }

    #[test]
    fn disabled_cache_ignores_existing_entries() {
        let store = Arc::new(MemoryStore::new());
        let key = CacheKey::new("a.html", mtime());
        store.set(key.as_str(), "old", None).unwrap();
        let cache = TemplateCache::new(false, store);
        assert!(cache.get(&key).is_none());
    }

    #[test]
    fn new_mtime_misses() {
        let cache = TemplateCache::in_memory();
        let old = cache.key("a.html", Mtime::from_secs_f64(1.0));
        cache.store(&old, "v1").unwrap();
        let new = cache.key("a.html", Mtime::from_secs_f64(2.0));
        assert!(cache.get(&new).is_none());
    }

    #[test]
    fn file_backed_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TemplateCache::new(true, Arc::new(FileStore::new(dir.path())));
        let key = cache.key("pages/home.html", mtime());
        cache
            .store_with_timeout(&key, "compiled", Some(Duration::from_secs(60)))
            .unwrap();
        assert_eq!(cache.get(&key).as_deref(), Some("compiled"));
    }
}
