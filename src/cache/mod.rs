//! Session cache stores
//!
//! A cache store maps a [`SessionKey`] to a serialized session payload plus a
//! SHA-256 fingerprint of that payload. Entries are immutable once published
//! and readers never observe a partially written entry.
//!
//! Two implementations are provided:
//!
//! - [`DiskCache`] persists entries under a root directory and survives
//!   process restarts
//! - [`MemoryCache`] keeps entries in process memory; used by tests and as a
//!   stand-in where no writable directory exists
//!
//! `get` never fails: unreadable, corrupt or tampered entries are reported as
//! misses so the caller simply fetches again.

use sha2::{Digest, Sha256};

use crate::Result;
use crate::types::SessionKey;

mod disk;
mod memory;

pub use disk::DiskCache;
pub use memory::MemoryCache;

/// A published cache entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Hex-encoded SHA-256 of `payload`
    pub fingerprint: String,
    /// Serialized session
    pub payload: String,
}

impl CacheEntry {
    pub fn new(payload: impl Into<String>) -> Self {
        let payload = payload.into();
        Self { fingerprint: fingerprint(&payload), payload }
    }

    /// Whether the stored fingerprint still matches the payload.
    pub fn is_intact(&self) -> bool {
        self.fingerprint == fingerprint(&self.payload)
    }
}

/// Outcome of a [`CacheStore::put`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// A new or changed entry was published
    Written,
    /// An entry with identical content already existed; nothing was written
    Unchanged,
}

/// Durable key/value store for serialized sessions.
pub trait CacheStore: Send + Sync {
    /// Look up an entry; any read or integrity problem is a miss.
    fn get(&self, key: &SessionKey) -> Option<CacheEntry>;

    /// Publish `payload` under `key`.
    ///
    /// Writing content equal to the current entry is a no-op. Different
    /// content replaces the entry. Fails with
    /// [`TimingError::CacheWrite`](crate::TimingError::CacheWrite) when the
    /// store cannot be written.
    fn put(&self, key: &SessionKey, payload: &str) -> Result<PutOutcome>;
}

/// Hex-encoded SHA-256 of a payload.
pub fn fingerprint(payload: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_stable_and_content_sensitive() {
        assert_eq!(fingerprint("laps"), fingerprint("laps"));
        assert_ne!(fingerprint("laps"), fingerprint("laps "));
        assert_eq!(fingerprint("").len(), 64);
    }

    #[test]
    fn tampered_entry_is_not_intact() {
        let mut entry = CacheEntry::new("payload");
        assert!(entry.is_intact());
        entry.payload.push('!');
        assert!(!entry.is_intact());
    }
}
