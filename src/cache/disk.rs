//! On-disk cache store.
//!
//! Layout: `<root>/<year>/<event-slug>/<KIND>.yaml`, one file per session.
//! Each file is a small YAML envelope holding the payload and its
//! fingerprint. Entries are published by writing a temporary file in the
//! target directory and renaming it over the final path.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;
use tracing::{debug, trace, warn};

use super::{CacheEntry, CacheStore, PutOutcome, fingerprint};
use crate::types::SessionKey;
use crate::{Result, TimingError};

/// Envelope format version; entries written by other versions are misses.
const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    format_version: u32,
    fingerprint: String,
    payload: String,
}

/// Cache store rooted at a directory.
#[derive(Debug)]
pub struct DiskCache {
    root: PathBuf,
    /// Serializes the rename step of concurrent publishes
    publish_lock: Mutex<()>,
}

impl DiskCache {
    /// Create a store rooted at `root`. Directories are created lazily on
    /// the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), publish_lock: Mutex::new(()) }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the entry file for `key`.
    pub fn entry_path(&self, key: &SessionKey) -> PathBuf {
        self.root
            .join(key.year.to_string())
            .join(key.event_slug())
            .join(format!("{}.yaml", key.kind.code()))
    }
}

impl CacheStore for DiskCache {
    fn get(&self, key: &SessionKey) -> Option<CacheEntry> {
        let path = self.entry_path(key);

        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                trace!(path = %path.display(), "Cache miss");
                return None;
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Unreadable cache entry, treating as miss");
                return None;
            }
        };

        let envelope: Envelope = match serde_yaml_ng::from_str(&raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Corrupt cache entry, treating as miss");
                return None;
            }
        };

        if envelope.format_version != FORMAT_VERSION {
            debug!(
                path = %path.display(),
                found = envelope.format_version,
                expected = FORMAT_VERSION,
                "Cache entry format version mismatch"
            );
            return None;
        }

        let entry = CacheEntry { fingerprint: envelope.fingerprint, payload: envelope.payload };
        if !entry.is_intact() {
            warn!(path = %path.display(), "Cache entry fingerprint mismatch, treating as miss");
            return None;
        }

        debug!(key = %key, path = %path.display(), "Cache hit");
        Some(entry)
    }

    fn put(&self, key: &SessionKey, payload: &str) -> Result<PutOutcome> {
        let path = self.entry_path(key);
        let fingerprint = fingerprint(payload);

        if self.get(key).is_some_and(|existing| existing.fingerprint == fingerprint) {
            trace!(key = %key, "Cache entry already up to date");
            return Ok(PutOutcome::Unchanged);
        }

        let dir = path.parent().unwrap_or(&self.root).to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|e| TimingError::cache_write(dir.clone(), e))?;

        let envelope =
            Envelope { format_version: FORMAT_VERSION, fingerprint, payload: payload.to_string() };
        let body = serde_yaml_ng::to_string(&envelope)
            .map_err(|e| TimingError::parse("Cache envelope serialization", e.to_string()))?;

        let mut tmp =
            NamedTempFile::new_in(&dir).map_err(|e| TimingError::cache_write(dir.clone(), e))?;
        tmp.write_all(body.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| TimingError::cache_write(tmp.path().to_path_buf(), e))?;

        let _guard = self.publish_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        tmp.persist(&path).map_err(|e| TimingError::cache_write(path.clone(), e.error))?;

        debug!(key = %key, path = %path.display(), bytes = body.len(), "Published cache entry");
        Ok(PutOutcome::Written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SessionKind;
    use tempfile::TempDir;

    fn key() -> SessionKey {
        SessionKey::new(2024, "Abu Dhabi", SessionKind::Qualifying)
    }

    #[test]
    fn entry_path_follows_layout() {
        let cache = DiskCache::new("/cache");
        assert_eq!(cache.entry_path(&key()), PathBuf::from("/cache/2024/abu-dhabi/Q.yaml"));
    }

    #[test]
    fn put_then_get_round_trips_and_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let cache = DiskCache::new(tmp.path());

        assert!(cache.get(&key()).is_none());
        assert_eq!(cache.put(&key(), "laps: []").unwrap(), PutOutcome::Written);
        assert_eq!(cache.put(&key(), "laps: []").unwrap(), PutOutcome::Unchanged);

        let entry = cache.get(&key()).unwrap();
        assert_eq!(entry.payload, "laps: []");
        assert!(entry.is_intact());

        assert_eq!(cache.put(&key(), "laps: [1]").unwrap(), PutOutcome::Written);
        assert_eq!(cache.get(&key()).unwrap().payload, "laps: [1]");
    }

    #[test]
    fn no_temporary_files_remain_after_publish() {
        let tmp = TempDir::new().unwrap();
        let cache = DiskCache::new(tmp.path());
        cache.put(&key(), "payload").unwrap();

        let dir = cache.entry_path(&key()).parent().unwrap().to_path_buf();
        let names: Vec<_> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["Q.yaml".to_string()]);
    }

    #[test]
    fn corrupt_or_tampered_entries_are_misses() {
        let tmp = TempDir::new().unwrap();
        let cache = DiskCache::new(tmp.path());
        cache.put(&key(), "payload").unwrap();
        let path = cache.entry_path(&key());

        std::fs::write(&path, "{{ not yaml").unwrap();
        assert!(cache.get(&key()).is_none());

        let tampered = format!(
            "format_version: {}\nfingerprint: {}\npayload: other\n",
            FORMAT_VERSION,
            fingerprint("payload")
        );
        std::fs::write(&path, tampered).unwrap();
        assert!(cache.get(&key()).is_none());
    }

    #[test]
    fn concurrent_publishes_leave_one_intact_entry() {
        let tmp = TempDir::new().unwrap();
        let cache = DiskCache::new(tmp.path());
        let payloads: Vec<String> = (0..8).map(|writer| format!("writer: {writer}\nlaps: []\n")).collect();

        std::thread::scope(|scope| {
            for payload in &payloads {
                let cache = &cache;
                let payloads = &payloads;
                scope.spawn(move || {
                    for _ in 0..10 {
                        cache.put(&key(), payload).unwrap();
                        let entry = cache.get(&key()).expect("published entry is readable");
                        assert!(entry.is_intact());
                        assert!(payloads.contains(&entry.payload));
                    }
                });
            }
        });

        let entry = cache.get(&key()).unwrap();
        assert!(entry.is_intact());
        assert!(payloads.contains(&entry.payload));

        let dir = cache.entry_path(&key()).parent().unwrap().to_path_buf();
        assert_eq!(std::fs::read_dir(dir).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn unwritable_root_fails_with_cache_write() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "file, not a directory").unwrap();

        let cache = DiskCache::new(&blocker);
        let err = cache.put(&key(), "payload").unwrap_err();
        assert!(matches!(err, TimingError::CacheWrite { .. }));
    }
}
