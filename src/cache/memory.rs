//! In-process cache store.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

use super::{CacheEntry, CacheStore, PutOutcome};
use crate::Result;
use crate::types::SessionKey;

/// Cache store held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<SessionKey, CacheEntry>>,
    writes: AtomicUsize,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of puts that actually published content.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace an entry verbatim, bypassing fingerprinting.
    ///
    /// Lets tests plant corrupt entries.
    pub fn insert_raw(&self, key: SessionKey, entry: CacheEntry) {
        let mut entries = self.entries.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.insert(key, entry);
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &SessionKey) -> Option<CacheEntry> {
        let entries = self.entries.read().ok()?;
        let entry = entries.get(key)?;

        if !entry.is_intact() {
            debug!(key = %key, "Ignoring in-memory cache entry with mismatched fingerprint");
            return None;
        }
        Some(entry.clone())
    }

    fn put(&self, key: &SessionKey, payload: &str) -> Result<PutOutcome> {
        let entry = CacheEntry::new(payload);
        let mut entries = self.entries.write().unwrap_or_else(|poisoned| poisoned.into_inner());

        if entries.get(key).is_some_and(|existing| existing.fingerprint == entry.fingerprint) {
            return Ok(PutOutcome::Unchanged);
        }

        entries.insert(key.clone(), entry);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(PutOutcome::Written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SessionKind;

    fn key() -> SessionKey {
        SessionKey::new(2024, "Monaco", SessionKind::Race)
    }

    #[test]
    fn put_is_idempotent_for_equal_content() {
        let cache = MemoryCache::new();
        assert_eq!(cache.put(&key(), "a").unwrap(), PutOutcome::Written);
        assert_eq!(cache.put(&key(), "a").unwrap(), PutOutcome::Unchanged);
        assert_eq!(cache.write_count(), 1);

        assert_eq!(cache.put(&key(), "b").unwrap(), PutOutcome::Written);
        assert_eq!(cache.get(&key()).unwrap().payload, "b");
        assert_eq!(cache.write_count(), 2);
    }

    #[test]
    fn corrupt_entry_reads_as_miss() {
        let cache = MemoryCache::new();
        cache.insert_raw(
            key(),
            CacheEntry { fingerprint: "deadbeef".to_string(), payload: "x".to_string() },
        );
        assert!(cache.get(&key()).is_none());
    }
}
