//! Session loading
//!
//! The [`SessionLoader`] turns a (year, event, kind) request into a
//! normalized, immutable [`Session`]:
//!
//! ```text
//!   request ──► memo ──hit──────────────────────────────► Arc<Session>
//!                 │
//!                miss
//!                 ▼
//!            cache store ──hit──► deserialize ──► memo ──► Arc<Session>
//!                 │
//!                miss
//!                 ▼
//!             provider ──► normalize ──► cache put ──► memo ──► Arc<Session>
//! ```
//!
//! A cache hit never touches the provider, so repeated loads of one key cost
//! at most one upstream fetch per cache lifetime. Sessions are memoized for
//! the lifetime of the loader, which also covers the case where the cache
//! cannot be written.
//!
//! Each key has its own memo slot. Concurrent loads of one key wait on that
//! slot and share a single fetch; loads of other keys proceed independently.
//! A failed load leaves the slot empty so the next request retries.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, warn};

use crate::{Result, TimingError};
use crate::cache::{CacheStore, PutOutcome};
use crate::provider::TimingProvider;
use crate::types::{Session, SessionKey, SessionKind};

pub mod normalize;

pub use normalize::{normalize_session, parse_duration_str};

/// Where a loaded session came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Already loaded by this loader
    Memory,
    /// Deserialized from the cache store
    Cache,
    /// Fetched from the provider
    Provider,
}

/// Loads sessions through the cache store.
pub struct SessionLoader<P: TimingProvider> {
    provider: P,
    cache: Arc<dyn CacheStore>,
    /// Memo slot per requested key; filled once the session has loaded
    sessions: Mutex<HashMap<SessionKey, Arc<OnceCell<Arc<Session>>>>>,
}

impl<P: TimingProvider> SessionLoader<P> {
    pub fn new(provider: P, cache: Arc<dyn CacheStore>) -> Self {
        Self { provider, cache, sessions: Mutex::new(HashMap::new()) }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn cache(&self) -> &Arc<dyn CacheStore> {
        &self.cache
    }

    /// Load a session by year, event name and kind.
    pub async fn load(&self, year: i32, event: &str, kind: SessionKind) -> Result<Arc<Session>> {
        self.load_key(&SessionKey::new(year, event, kind)).await
    }

    /// Load a session by key.
    ///
    /// # Errors
    ///
    /// - [`TimingError::SessionNotFound`](crate::TimingError::SessionNotFound)
    ///   when the provider cannot resolve the key
    /// - [`TimingError::UpstreamUnavailable`](crate::TimingError::UpstreamUnavailable)
    ///   on provider failure
    ///
    /// Neither failure writes a cache entry. A failed cache write is logged
    /// and the freshly fetched session is still returned.
    pub async fn load_key(&self, key: &SessionKey) -> Result<Arc<Session>> {
        self.load_with_source(key).await.map(|(session, _)| session)
    }

    /// Load a session and report where it came from.
    pub async fn load_with_source(&self, key: &SessionKey) -> Result<(Arc<Session>, LoadSource)> {
        // The map lock only covers slot lookup; the slot serializes the load.
        let slot = Arc::clone(self.sessions.lock().await.entry(key.clone()).or_default());

        let mut source = LoadSource::Memory;
        let loaded_from = &mut source;
        let session = slot
            .get_or_try_init(move || async move {
                let (session, from) = self.load_unmemoized(key).await?;
                *loaded_from = from;
                Ok::<_, TimingError>(Arc::new(session))
            })
            .await?;

        if source == LoadSource::Memory {
            debug!(key = %key, "Using loaded session");
        }
        Ok((Arc::clone(session), source))
    }

    /// Whether `key` has been loaded by this loader.
    pub async fn is_loaded(&self, key: &SessionKey) -> bool {
        self.sessions.lock().await.get(key).is_some_and(|slot| slot.initialized())
    }

    async fn load_unmemoized(&self, key: &SessionKey) -> Result<(Session, LoadSource)> {
        if let Some(session) = self.read_cache(key) {
            return Ok((session, LoadSource::Cache));
        }

        info!(key = %key, provider = self.provider.name(), "Fetching session from provider");
        let raw = self.provider.fetch(key).await?;
        let session = normalize_session(key, raw);

        info!(
            key = %key,
            laps = session.laps.len(),
            drivers = session.drivers().len(),
            warnings = session.warnings.len(),
            "Session normalized"
        );

        self.write_cache(key, &session);
        Ok((session, LoadSource::Provider))
    }

    fn read_cache(&self, key: &SessionKey) -> Option<Session> {
        let entry = self.cache.get(key)?;

        match serde_yaml_ng::from_str::<Session>(&entry.payload) {
            Ok(session) => {
                debug!(key = %key, laps = session.laps.len(), "Loaded session from cache");
                Some(session)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Cached session does not deserialize, refetching");
                None
            }
        }
    }

    fn write_cache(&self, key: &SessionKey, session: &Session) {
        let payload = match serde_yaml_ng::to_string(session) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to serialize session, keeping it in memory only");
                return;
            }
        };

        match self.cache.put(key, &payload) {
            Ok(PutOutcome::Written) => debug!(key = %key, bytes = payload.len(), "Cached session"),
            Ok(PutOutcome::Unchanged) => debug!(key = %key, "Cache already up to date"),
            Err(e) => {
                warn!(key = %key, error = %e, "Cache write failed, keeping session in memory only")
            }
        }
    }
}
