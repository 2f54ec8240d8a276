//! Archive provider for raw session dumps
//!
//! Reads raw sessions from a directory tree laid out like the cache:
//! `<root>/<year>/<event-slug>/<KIND>.yaml`. Useful for offline analysis of
//! previously exported timing data and for tests.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::provider::TimingProvider;
use crate::raw::RawSession;
use crate::types::SessionKey;
use crate::{Result, TimingError};

/// Provider that serves raw sessions from an archive directory
#[derive(Debug, Clone)]
pub struct ArchiveProvider {
    /// Archive root directory
    root: PathBuf,
}

impl ArchiveProvider {
    /// Create a provider over an archive directory.
    ///
    /// The directory is not checked here; a missing archive surfaces as
    /// [`TimingError::UpstreamUnavailable`] on fetch.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path where the raw dump for `key` is expected.
    pub fn session_path(&self, key: &SessionKey) -> PathBuf {
        self.root
            .join(key.year.to_string())
            .join(key.event_slug())
            .join(format!("{}.yaml", key.kind.code()))
    }
}

#[async_trait::async_trait]
impl TimingProvider for ArchiveProvider {
    async fn fetch(&self, key: &SessionKey) -> Result<RawSession> {
        if !self.root.is_dir() {
            return Err(TimingError::upstream_unavailable(format!(
                "Archive directory {} is not available",
                self.root.display()
            )));
        }

        let path = self.session_path(key);
        debug!(key = %key, path = %path.display(), "Reading archived session");

        let yaml = match std::fs::read_to_string(&path) {
            Ok(yaml) => yaml,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(TimingError::session_not_found(key.year, &key.event, key.kind));
            }
            Err(e) => {
                return Err(TimingError::upstream_unavailable_with_source(
                    format!("Failed to read {}", path.display()),
                    Box::new(e),
                ));
            }
        };

        let mut raw = RawSession::parse(&yaml).map_err(|e| {
            TimingError::upstream_unavailable_with_source(
                format!("Malformed session payload at {}", path.display()),
                Box::new(e),
            )
        })?;

        if raw.event_name.trim().is_empty() {
            raw.event_name = key.event.clone();
        }

        info!("Fetched {} from archive: {} lap rows", key, raw.laps.len());
        Ok(raw)
    }

    fn name(&self) -> &str {
        "archive"
    }
}
