//! Engine façade tying configuration, loading and analyses together.

use std::sync::Arc;
use tracing::debug;

use crate::Result;
use crate::align::{DriverComparison, compare_fastest_laps};
use crate::cache::{CacheStore, DiskCache};
use crate::config::EngineConfig;
use crate::geometry::session_track_shape;
use crate::laps::{LapIndex, LapTimeGroup};
use crate::loader::SessionLoader;
use crate::provider::TimingProvider;
use crate::stints::{Segmentation, StintSegmenter};
use crate::types::{Lap, Session, SessionKind, TrackPoint};

/// Session cache and analysis engine.
///
/// Every operation runs to completion before returning; loaded sessions are
/// shared read-only.
pub struct Engine<P: TimingProvider> {
    config: EngineConfig,
    loader: SessionLoader<P>,
    segmenter: StintSegmenter,
}

impl<P: TimingProvider> Engine<P> {
    /// Create an engine with a disk cache at `config.cache_dir`.
    ///
    /// # Errors
    ///
    /// [`TimingError::Config`](crate::TimingError::Config) when the
    /// configuration does not validate.
    pub fn new(config: EngineConfig, provider: P) -> Result<Self> {
        let cache = Arc::new(DiskCache::new(&config.cache_dir));
        Self::with_cache(config, provider, cache)
    }

    /// Create an engine with an explicit cache store.
    pub fn with_cache(
        config: EngineConfig,
        provider: P,
        cache: Arc<dyn CacheStore>,
    ) -> Result<Self> {
        config.validate()?;
        debug!(cache_dir = %config.cache_dir.display(), "Engine configured");

        let segmenter = StintSegmenter::new(config.pin_first_stint_start);
        Ok(Self { loader: SessionLoader::new(provider, cache), segmenter, config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn loader(&self) -> &SessionLoader<P> {
        &self.loader
    }

    /// Load a session, from cache when possible.
    pub async fn load(&self, year: i32, event: &str, kind: SessionKind) -> Result<Arc<Session>> {
        self.loader.load(year, event, kind).await
    }

    /// Load the configured default session kind of an event.
    pub async fn load_default(&self, year: i32, event: &str) -> Result<Arc<Session>> {
        self.load(year, event, self.config.default_session_kind).await
    }

    /// Fastest timed lap of a driver.
    pub fn fastest_lap<'s>(&self, session: &'s Session, driver: &str) -> Result<&'s Lap> {
        LapIndex::new(session).fastest_lap(&driver_code(driver))
    }

    /// Laps within the configured quick-lap threshold.
    pub fn quick_laps<'s>(&self, session: &'s Session) -> Vec<&'s Lap> {
        LapIndex::new(session).quick_laps(self.config.quick_lap_threshold)
    }

    /// Quick-lap times grouped by driver and compound.
    pub fn lap_time_distribution(&self, session: &Session) -> Vec<LapTimeGroup> {
        LapIndex::new(session).lap_time_distribution(self.config.quick_lap_threshold)
    }

    /// Distance-aligned speed traces of two drivers' fastest laps.
    pub fn compare_drivers(
        &self,
        session: &Session,
        first: &str,
        second: &str,
    ) -> Result<DriverComparison> {
        compare_fastest_laps(session, &driver_code(first), &driver_code(second))
    }

    /// Tyre stints of one driver.
    pub fn stints(&self, session: &Session, driver: &str) -> Result<Segmentation> {
        self.segmenter.segment(session, &driver_code(driver))
    }

    /// Tyre stints of the whole field.
    pub fn strategy(&self, session: &Session) -> Segmentation {
        self.segmenter.strategy(session)
    }

    /// Track outline from the session's fastest lap.
    pub fn track_map(&self, session: &Session) -> Result<Vec<TrackPoint>> {
        session_track_shape(session)
    }
}

/// Driver codes are matched upper case.
fn driver_code(input: &str) -> String {
    input.trim().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TimingError;
    use crate::cache::MemoryCache;
    use crate::test_utils::{MockProvider, scenario_raw_session};
    use crate::types::{Compound, SessionKey};

    fn engine() -> Engine<MockProvider> {
        let provider = MockProvider::new()
            .with_session(SessionKey::new(2024, "Monaco", SessionKind::Race), scenario_raw_session());
        Engine::with_cache(EngineConfig::default(), provider, Arc::new(MemoryCache::new())).unwrap()
    }

    #[tokio::test]
    async fn answers_queries_on_a_loaded_session() {
        let engine = engine();
        let session = engine.load_default(2024, "Monaco").await.unwrap();

        assert_eq!(engine.fastest_lap(&session, " ver ").unwrap().lap_number, 2);

        let stints = engine.stints(&session, "VER").unwrap().stints;
        let rows: Vec<_> = stints.iter().map(|s| (s.compound, s.start_lap, s.end_lap)).collect();
        assert_eq!(rows, vec![(Compound::Soft, 0, 2), (Compound::Medium, 3, 3)]);

        // NOR lap 3 (105.0s) is above 1.07 × median 93.0s
        let quick: Vec<_> =
            engine.quick_laps(&session).iter().map(|l| (l.driver.as_str(), l.lap_number)).collect();
        assert_eq!(quick, vec![("NOR", 1), ("NOR", 2), ("VER", 1), ("VER", 2), ("VER", 3)]);

        assert_eq!(engine.track_map(&session).unwrap().len(), 20);
        assert_eq!(engine.strategy(&session).stints.len(), 3);
        assert!(!engine.lap_time_distribution(&session).is_empty());
    }

    #[tokio::test]
    async fn comparison_requires_timed_laps_for_both_drivers() {
        let engine = engine();
        let session = engine.load(2024, "Monaco", SessionKind::Race).await.unwrap();

        let comparison = engine.compare_drivers(&session, "nor", "ver").unwrap();
        assert_eq!(comparison.first.points.len(), 20);
        assert!(comparison.second.points.is_empty());

        let err = engine.compare_drivers(&session, "NOR", "HAM").unwrap_err();
        assert!(matches!(err, TimingError::DriverNotFound { .. }));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = EngineConfig::default().with_quick_lap_threshold(0.0);
        let result = Engine::with_cache(config, MockProvider::new(), Arc::new(MemoryCache::new()));
        assert!(matches!(result, Err(TimingError::Config { .. })));
    }
}
