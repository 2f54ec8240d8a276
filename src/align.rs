//! Distance alignment of car telemetry.
//!
//! Raw channels are indexed by session time, which makes two drivers' laps
//! impossible to overlay directly. Re-indexing each lap by cumulative distance
//! puts them on a shared x-axis.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::Result;
use crate::laps::LapIndex;
use crate::types::{ChannelSample, Lap, Session, TelemetrySample};

/// Speed trace of one driver's lap, indexed by distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedTrace {
    pub driver: String,
    pub lap_number: u32,
    /// `(distance m, speed km/h)` pairs; samples without speed are omitted
    pub points: Vec<(f64, f64)>,
}

impl SpeedTrace {
    pub fn from_samples(lap: &Lap, samples: &[TelemetrySample]) -> Self {
        Self {
            driver: lap.driver.clone(),
            lap_number: lap.lap_number,
            points: samples.iter().filter_map(|s| s.speed.map(|v| (s.distance, v))).collect(),
        }
    }
}

/// Fastest-lap speed traces of two drivers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverComparison {
    pub first: SpeedTrace,
    pub second: SpeedTrace,
}

/// Re-index a lap's channel samples by cumulative distance.
///
/// Samples sharing a timestamp collapse to the last one. When every sample
/// carries a provider distance, that distance is used (clamped so it never
/// decreases). Otherwise distance is integrated from `speed / 3.6 × Δt`,
/// falling back to the straight-line position delta for samples without
/// speed. The first sample sits at distance 0.
pub fn align_by_distance(lap: &Lap) -> Vec<TelemetrySample> {
    let samples = collapse_duplicate_times(&lap.samples);
    if samples.is_empty() {
        return Vec::new();
    }

    let use_provided = samples.iter().all(|s| s.distance.is_some());
    let mut aligned = Vec::with_capacity(samples.len());
    let mut distance = 0.0_f64;
    let mut previous: Option<&ChannelSample> = None;

    for sample in samples {
        distance = if use_provided {
            let provided = sample.distance.unwrap_or(distance);
            if previous.is_none() { provided } else { distance.max(provided) }
        } else {
            match previous {
                Some(prev) => distance + step_distance(prev, sample),
                None => 0.0,
            }
        };

        aligned.push(TelemetrySample {
            distance,
            speed: sample.speed,
            x: sample.x,
            y: sample.y,
            time: sample.time,
        });
        previous = Some(sample);
    }

    trace!(
        driver = %lap.driver,
        lap = lap.lap_number,
        samples = aligned.len(),
        distance = distance,
        "Aligned lap by distance"
    );
    aligned
}

/// Align both drivers' fastest laps for a speed comparison.
pub fn compare_fastest_laps(session: &Session, first: &str, second: &str) -> Result<DriverComparison> {
    let index = LapIndex::new(session);
    let first_lap = index.fastest_lap(first)?;
    let second_lap = index.fastest_lap(second)?;

    Ok(DriverComparison {
        first: SpeedTrace::from_samples(first_lap, &align_by_distance(first_lap)),
        second: SpeedTrace::from_samples(second_lap, &align_by_distance(second_lap)),
    })
}

/// Keep the last sample of every run of identical timestamps.
///
/// Input must be sorted by time.
fn collapse_duplicate_times(samples: &[ChannelSample]) -> Vec<&ChannelSample> {
    let mut collapsed: Vec<&ChannelSample> = Vec::with_capacity(samples.len());
    for sample in samples {
        match collapsed.last_mut() {
            Some(last) if last.time == sample.time => *last = sample,
            _ => collapsed.push(sample),
        }
    }
    collapsed
}

/// Distance covered between two consecutive samples, never negative.
fn step_distance(prev: &ChannelSample, current: &ChannelSample) -> f64 {
    let dt = current.time.saturating_sub(prev.time).as_secs_f64();

    let step = match (current.speed, prev.position(), current.position()) {
        (Some(speed), _, _) => speed / 3.6 * dt,
        (None, Some(a), Some(b)) => (b.x - a.x).hypot(b.y - a.y),
        _ => 0.0,
    };

    if step.is_finite() { step.max(0.0) } else { 0.0 }
}
