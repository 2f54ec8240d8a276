//! Raw provider records
//!
//! These mirror the loosely typed tables a timing provider hands back: column
//! names in PascalCase, numbers that may be floats or missing, and timing
//! values that may be numbers or formatted strings. They exist only between
//! the provider and the session loader, which maps them to [`crate::types`].

use serde::{Deserialize, Serialize};

/// One session as delivered by the provider.
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct RawSession {
    /// Canonical event name resolved by the provider
    pub event_name: String,
    /// Lap table rows
    pub laps: Vec<RawLap>,
}

/// One row of the lap table.
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct RawLap {
    /// Driver abbreviation
    pub driver: String,
    /// Lap number; providers emit this as a float column
    pub lap_number: Option<f64>,
    /// Lap time as seconds or a formatted duration string
    pub lap_time: Option<serde_yaml_ng::Value>,
    /// Compound name, free text
    pub compound: Option<String>,
    /// Stint number; float column, may be NaN
    pub stint: Option<f64>,
    /// Car channel samples recorded during the lap
    pub car_data: Vec<RawCarSample>,
}

/// One car channel sample.
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct RawCarSample {
    /// Session timestamp as seconds or a formatted duration string
    pub session_time: Option<serde_yaml_ng::Value>,
    /// Speed in km/h
    pub speed: Option<f64>,
    #[serde(rename = "X")]
    pub x: Option<f64>,
    #[serde(rename = "Y")]
    pub y: Option<f64>,
    /// Distance into the lap in metres
    pub distance: Option<f64>,
}

impl RawSession {
    /// Parse a raw session document.
    pub fn parse(yaml: &str) -> crate::Result<Self> {
        serde_yaml_ng::from_str(yaml)
            .map_err(|e| crate::TimingError::parse("RawSession deserialization", e.to_string()))
    }
}
