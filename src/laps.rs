//! Lap queries: fastest laps, quick laps and lap-time distributions.
//!
//! A [`LapIndex`] borrows a [`Session`] and groups its laps per driver. All
//! queries consider only laps with a defined lap time; untimed laps are never
//! fastest and never quick.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

use crate::types::{Compound, Lap, Session};
use crate::{Result, TimingError};

/// Default quick-lap threshold: 107% of the driver's median lap time.
pub const DEFAULT_QUICK_LAP_THRESHOLD: f64 = 1.07;

/// Quick lap times of one driver on one compound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LapTimeGroup {
    pub driver: String,
    pub compound: Compound,
    /// Lap times in seconds, in lap order
    pub lap_times: Vec<f64>,
}

/// Per-driver view over a session's laps.
#[derive(Debug, Clone)]
pub struct LapIndex<'a> {
    by_driver: BTreeMap<&'a str, Vec<&'a Lap>>,
}

impl<'a> LapIndex<'a> {
    pub fn new(session: &'a Session) -> Self {
        let mut by_driver: BTreeMap<&'a str, Vec<&'a Lap>> = BTreeMap::new();
        for lap in &session.laps {
            by_driver.entry(lap.driver.as_str()).or_default().push(lap);
        }
        for laps in by_driver.values_mut() {
            laps.sort_by_key(|lap| lap.lap_number);
        }
        Self { by_driver }
    }

    /// Driver codes, sorted.
    pub fn drivers(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.by_driver.keys().copied()
    }

    /// Laps of one driver in lap-number order.
    pub fn driver_laps(&self, driver: &str) -> Result<&[&'a Lap]> {
        self.by_driver
            .get(driver)
            .map(Vec::as_slice)
            .ok_or_else(|| TimingError::driver_not_found(driver))
    }

    /// The driver's fastest timed lap.
    ///
    /// Ties go to the lower lap number.
    ///
    /// # Errors
    ///
    /// [`TimingError::DriverNotFound`] if the driver has no laps,
    /// [`TimingError::NoValidLap`] if none of them is timed.
    pub fn fastest_lap(&self, driver: &str) -> Result<&'a Lap> {
        fastest(self.driver_laps(driver)?.iter().copied())
            .ok_or_else(|| TimingError::no_valid_lap(driver))
    }

    /// The fastest timed lap of the whole session, regardless of driver.
    ///
    /// Ties go to the lower lap number, then the alphabetically first driver.
    pub fn session_fastest_lap(&self) -> Result<&'a Lap> {
        fastest(self.by_driver.values().flatten().copied())
            .ok_or_else(|| TimingError::no_valid_lap("any driver"))
    }

    /// Median of the driver's defined lap times.
    pub fn median_lap_time(&self, driver: &str) -> Result<Option<Duration>> {
        Ok(median(self.driver_laps(driver)?))
    }

    /// Laps whose time is within `threshold` times their driver's median.
    ///
    /// Returned in driver then lap order.
    pub fn quick_laps(&self, threshold: f64) -> Vec<&'a Lap> {
        let mut quick = Vec::new();

        for (driver, laps) in &self.by_driver {
            let Some(median) = median(laps) else {
                debug!(driver, "No timed laps, skipping quick-lap filter");
                continue;
            };
            let cutoff = median.as_secs_f64() * threshold;

            quick.extend(
                laps.iter()
                    .copied()
                    .filter(|lap| lap.lap_time_secs().is_some_and(|secs| secs <= cutoff)),
            );
        }

        quick
    }

    /// Quick-lap times grouped by driver and compound.
    ///
    /// This is the table behind the lap-time distribution chart. Groups are
    /// ordered by driver, then compound.
    pub fn lap_time_distribution(&self, threshold: f64) -> Vec<LapTimeGroup> {
        let mut groups: BTreeMap<(&str, Compound), Vec<f64>> = BTreeMap::new();

        for lap in self.quick_laps(threshold) {
            if let Some(secs) = lap.lap_time_secs() {
                groups.entry((lap.driver.as_str(), lap.compound)).or_default().push(secs);
            }
        }

        groups
            .into_iter()
            .map(|((driver, compound), lap_times)| LapTimeGroup {
                driver: driver.to_string(),
                compound,
                lap_times,
            })
            .collect()
    }
}

/// Minimum defined lap time; on ties the earlier candidate wins.
fn fastest<'a>(laps: impl Iterator<Item = &'a Lap>) -> Option<&'a Lap> {
    let mut best: Option<(&'a Lap, Duration)> = None;

    for lap in laps {
        let Some(time) = lap.lap_time else { continue };
        let better = match best {
            None => true,
            Some((current, best_time)) => {
                time < best_time
                    || (time == best_time && lap.lap_number < current.lap_number)
            }
        };
        if better {
            best = Some((lap, time));
        }
    }

    best.map(|(lap, _)| lap)
}

fn median(laps: &[&Lap]) -> Option<Duration> {
    let mut times: Vec<Duration> = laps.iter().filter_map(|lap| lap.lap_time).collect();
    if times.is_empty() {
        return None;
    }
    times.sort();

    // Sorted, so the midpoint never overflows.
    let mid = times.len() / 2;
    if times.len() % 2 == 1 {
        Some(times[mid])
    } else {
        Some(times[mid - 1] + (times[mid] - times[mid - 1]) / 2)
    }
}
