//! Provider trait for upstream timing sources

use crate::Result;
use crate::raw::RawSession;
use crate::types::SessionKey;

/// Trait for upstream timing data sources
///
/// Providers resolve a [`SessionKey`] to the raw lap and channel tables of
/// that session. They do not normalize or cache anything; that is the
/// session loader's job.
///
/// Implementations must distinguish the two failure modes callers act on:
/// - [`TimingError::SessionNotFound`](crate::TimingError::SessionNotFound) -
///   the (year, event, kind) triple does not exist upstream
/// - [`TimingError::UpstreamUnavailable`](crate::TimingError::UpstreamUnavailable) -
///   transport or provider failure; the request may succeed on retry
#[async_trait::async_trait]
pub trait TimingProvider: Send + Sync + 'static {
    /// Fetch the raw session for `key`.
    async fn fetch(&self, key: &SessionKey) -> Result<RawSession>;

    /// Short name used in log output.
    fn name(&self) -> &str {
        "timing-provider"
    }
}
