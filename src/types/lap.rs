//! Laps and stints.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ChannelSample, Compound};

/// One timed lap of one driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lap {
    /// Three-letter driver code, upper case
    pub driver: String,
    /// Lap number, unique per driver within a session
    pub lap_number: u32,
    /// Lap time; `None` for laps the provider did not time
    #[serde(default)]
    pub lap_time: Option<Duration>,
    pub compound: Compound,
    /// Stint number as assigned by the provider
    pub stint: u32,
    /// Raw time-indexed car channels recorded during the lap
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub samples: Vec<ChannelSample>,
}

impl Lap {
    /// Lap time in seconds, if the lap was timed.
    pub fn lap_time_secs(&self) -> Option<f64> {
        self.lap_time.map(|t| t.as_secs_f64())
    }
}

/// A run of consecutive laps sharing one stint number.
///
/// This is the row the tyre-strategy chart consumes: `(driver, compound,
/// start_lap, end_lap)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stint {
    pub driver: String,
    pub stint_number: u32,
    /// Compound of the first lap in the stint
    pub compound: Compound,
    /// Reported start boundary (0 for a pinned first stint)
    pub start_lap: u32,
    /// Highest lap number in the stint
    pub end_lap: u32,
    pub lap_count: usize,
}
