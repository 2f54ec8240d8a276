//! Test utilities: fixture sessions and a scripted provider
//!
//! This module provides builders for small, hand-checkable sessions and a
//! [`MockProvider`] that counts upstream fetches, shared by unit tests and
//! benchmarks.

#![cfg(any(test, feature = "benchmark"))]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::provider::TimingProvider;
use crate::raw::{RawCarSample, RawLap, RawSession};
use crate::types::{ChannelSample, Compound, Event, Lap, Session, SessionKey, SessionKind};
use crate::{Result, TimingError};

/// Provider serving canned raw sessions and counting fetches.
#[derive(Debug, Default)]
pub struct MockProvider {
    sessions: HashMap<SessionKey, RawSession>,
    unavailable: bool,
    latency: Option<Duration>,
    fetches: AtomicUsize,
}

impl MockProvider {
    /// Provider that knows no sessions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider whose every fetch fails with `UpstreamUnavailable`.
    pub fn unavailable() -> Self {
        Self { unavailable: true, ..Self::default() }
    }

    pub fn with_session(mut self, key: SessionKey, raw: RawSession) -> Self {
        self.sessions.insert(key, raw);
        self
    }

    /// Delay every fetch, so concurrent requests overlap.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of fetches attempted so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl TimingProvider for MockProvider {
    async fn fetch(&self, key: &SessionKey) -> Result<RawSession> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if self.unavailable {
            return Err(TimingError::upstream_unavailable("mock provider offline"));
        }

        self.sessions
            .get(key)
            .cloned()
            .ok_or_else(|| TimingError::session_not_found(key.year, &key.event, key.kind))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Build a lap with no channel samples.
pub fn lap(driver: &str, lap_number: u32, seconds: Option<f64>, compound: Compound, stint: u32) -> Lap {
    Lap {
        driver: driver.to_string(),
        lap_number,
        lap_time: seconds.map(Duration::from_secs_f64),
        compound,
        stint,
        samples: Vec::new(),
    }
}

/// Wrap laps into a race session, sorted the way the loader sorts them.
pub fn session_with_laps(mut laps: Vec<Lap>) -> Session {
    laps.sort_by(|a, b| a.driver.cmp(&b.driver).then(a.lap_number.cmp(&b.lap_number)));
    Session {
        event: Event { year: 2024, name: "Test Grand Prix".to_string() },
        kind: SessionKind::Race,
        laps,
        warnings: Vec::new(),
    }
}

/// Samples of a car circling at constant speed, one every `step` seconds.
///
/// Positions trace a circle of radius 100 centred on the origin.
pub fn circle_samples(count: usize, speed_kph: f64, step: f64) -> Vec<ChannelSample> {
    (0..count)
        .map(|i| {
            let angle = i as f64 / count as f64 * std::f64::consts::TAU;
            ChannelSample {
                time: Duration::from_secs_f64(3600.0 + i as f64 * step),
                speed: Some(speed_kph),
                x: Some(100.0 * angle.cos()),
                y: Some(100.0 * angle.sin()),
                distance: None,
            }
        })
        .collect()
}

fn raw_lap(driver: &str, lap_number: f64, lap_time: &str, compound: &str, stint: f64) -> RawLap {
    RawLap {
        driver: driver.to_string(),
        lap_number: Some(lap_number),
        lap_time: Some(serde_yaml_ng::Value::String(lap_time.to_string())),
        compound: Some(compound.to_string()),
        stint: Some(stint),
        car_data: Vec::new(),
    }
}

/// Raw race session with two drivers.
///
/// VER: lap 1 92.1s SOFT stint 1, lap 2 91.8s SOFT stint 1, lap 3 95.0s
/// MEDIUM stint 2. NOR: three laps on HARD; lap 2 is the session's fastest
/// and carries car data.
pub fn scenario_raw_session() -> RawSession {
    let mut nor_fastest = raw_lap("NOR", 2.0, "0 days 00:01:31.500000", "HARD", 1.0);
    nor_fastest.car_data = (0..20)
        .map(|i| RawCarSample {
            session_time: Some(serde_yaml_ng::Value::from(4000.0 + i as f64 * 0.25)),
            speed: Some(180.0 + i as f64),
            x: Some(i as f64 * 10.0),
            y: Some((i as f64 * 0.5).sin() * 50.0),
            distance: None,
        })
        .collect();

    RawSession {
        event_name: "Monaco Grand Prix".to_string(),
        laps: vec![
            raw_lap("VER", 1.0, "1:32.100", "SOFT", 1.0),
            raw_lap("VER", 2.0, "1:31.800", "SOFT", 1.0),
            raw_lap("VER", 3.0, "1:35.000", "MEDIUM", 2.0),
            raw_lap("NOR", 1.0, "1:33.000", "HARD", 1.0),
            nor_fastest,
            raw_lap("NOR", 3.0, "1:45.000", "HARD", 1.0),
        ],
    }
}
