//! Car channel samples.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw time-indexed car channel sample, as recorded during a lap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelSample {
    /// Session timestamp of the sample
    pub time: Duration,
    /// Speed in km/h
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    /// Distance into the lap in metres, when the provider supplies it
    #[serde(default)]
    pub distance: Option<f64>,
}

impl ChannelSample {
    pub fn position(&self) -> Option<TrackPoint> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Some(TrackPoint { x, y }),
            _ => None,
        }
    }
}

/// Distance-indexed telemetry sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    /// Cumulative distance into the lap in metres
    pub distance: f64,
    /// Speed in km/h
    pub speed: Option<f64>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub time: Duration,
}

/// A point of a track outline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub x: f64,
    pub y: f64,
}
