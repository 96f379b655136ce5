//! Key-value stores for compiled templates.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use crate::error::CacheError;
use crate::key::key_stem;

/// A shared key-value store for compiled template text.
///
/// Implementations are used from many threads at once. A `set` racing with
/// another `set` of the same key may let either value win; compiled output
/// for a key is deterministic, so both values are identical.
pub trait CacheStore: Send + Sync {
    /// Returns the stored value, or `None` if absent, expired or unreadable.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores a value. `timeout` of `None` keeps it until evicted.
    fn set(&self, key: &str, value: &str, timeout: Option<Duration>) -> Result<(), CacheError>;
}

#[derive(Debug, Clone)]
struct MemoryEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl MemoryEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| now < at)
    }
}

#[derive(Debug, Default)]
struct MemoryEntries {
    by_key: HashMap<String, MemoryEntry>,
    /// Newest key stored per template, see [`key_stem`].
    newest: HashMap<String, String>,
}

/// In-process store backed by a hash map.
///
/// Storing a template evicts the entry for any older modification time of
/// the same template, so a long-running process keeps one compiled version
/// per template.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<MemoryEntries>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .by_key
            .len()
    }

    /// Returns `true` if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops expired entries and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let MemoryEntries { by_key, newest } = &mut *entries;
        let before = by_key.len();
        by_key.retain(|_, entry| entry.is_live(now));
        newest.retain(|_, key| by_key.contains_key(key.as_str()));
        before - by_key.len()
    }
}

impl CacheStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .by_key
            .get(key)
            .filter(|entry| entry.is_live(Instant::now()))
            .map(|entry| entry.value.clone())
    }

    fn set(&self, key: &str, value: &str, timeout: Option<Duration>) -> Result<(), CacheError> {
        let entry = MemoryEntry {
            value: value.to_string(),
            expires_at: timeout.map(|t| Instant::now() + t),
        };
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let MemoryEntries { by_key, newest } = &mut *entries;
        if let Some(old) = newest.insert(key_stem(key).to_string(), key.to_string()) {
            if old != key {
                tracing::trace!(evicted = %old, "superseded by newer template version");
                by_key.remove(&old);
            }
        }
        by_key.insert(key.to_string(), entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::CacheKey;
    use cotton_common::Mtime;
    use std::sync::Arc;

    #[test]
    fn set_then_get() {
        let store = MemoryStore::new();
        assert!(store.get("k").is_none());
        store.set("k", "compiled", None).unwrap();
        assert_eq!(store.get("k").as_deref(), Some("compiled"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn overwrite_replaces_value() {
        let store = MemoryStore::new();
        store.set("k", "one", None).unwrap();
        store.set("k", "two", None).unwrap();
        assert_eq!(store.get("k").as_deref(), Some("two"));
    }

    #[test]
    fn zero_timeout_expires_immediately() {
        let store = MemoryStore::new();
        store.set("k", "v", Some(Duration::ZERO)).unwrap();
        assert!(store.get("k").is_none());
        assert_eq!(store.purge_expired(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn long_timeout_is_live() {
        let store = MemoryStore::new();
        store.set("k", "v", Some(Duration::from_secs(3600))).unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v"));
        assert_eq!(store.purge_expired(), 0);
    }

    #[test]
    fn newer_template_version_evicts_older() {
        let store = MemoryStore::new();
        let card_v1 = CacheKey::new("cotton/card.html", Mtime::from_secs_f64(1.0));
        let card_v2 = CacheKey::new("cotton/card.html", Mtime::from_secs_f64(2.0));
        let page = CacheKey::new("page.html", Mtime::from_secs_f64(1.0));

        store.set(card_v1.as_str(), "old", None).unwrap();
        store.set(page.as_str(), "page", None).unwrap();
        store.set(card_v2.as_str(), "new", None).unwrap();

        assert!(store.get(card_v1.as_str()).is_none());
        assert_eq!(store.get(card_v2.as_str()).as_deref(), Some("new"));
        assert_eq!(store.get(page.as_str()).as_deref(), Some("page"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn concurrent_writers() {
        let store = Arc::new(MemoryStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store.set("same", "identical", None).unwrap();
                    store.set(&format!("k{i}"), "v", None).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.get("same").as_deref(), Some("identical"));
        assert_eq!(store.len(), 9);
    }
}
