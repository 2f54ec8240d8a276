//! Non-fatal data quality reports.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a recovered data anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Lap row without a driver code; the row was dropped
    MissingDriver,
    /// Lap number missing, non-positive or fractional; the lap was dropped
    InvalidLapNumber,
    /// Second record for an already-seen lap number; the record was dropped
    DuplicateLap,
    /// Lap time present but unreadable; treated as untimed
    UnparseableLapTime,
    /// Stint number missing; inherited from the previous lap
    MissingStint,
    /// Stint number went down between consecutive laps
    StintRegression,
    /// Stint number skipped one or more values
    StintGap,
    /// Compound changed without a stint change
    CompoundChangeWithinStint,
    /// Channel samples without a timestamp were discarded
    DroppedSamples,
}

/// A non-fatal anomaly found in provider data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataQualityWarning {
    pub kind: WarningKind,
    #[serde(default)]
    pub driver: Option<String>,
    #[serde(default)]
    pub lap: Option<u32>,
    pub message: String,
}

impl DataQualityWarning {
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self { kind, driver: None, lap: None, message: message.into() }
    }

    pub fn for_lap(mut self, driver: impl Into<String>, lap: Option<u32>) -> Self {
        self.driver = Some(driver.into());
        self.lap = lap;
        self
    }
}

impl fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.driver, self.lap) {
            (Some(driver), Some(lap)) => write!(f, "{} lap {}: {}", driver, lap, self.message),
            (Some(driver), None) => write!(f, "{}: {}", driver, self.message),
            _ => f.write_str(&self.message),
        }
    }
}
