//! Track geometry extraction.
//!
//! Produces the raw x/y outline a track map is drawn from. Points are passed
//! through untouched: no smoothing, rotation or scaling.

use std::time::Duration;

use crate::Result;
use crate::laps::LapIndex;
use crate::types::{Lap, Session, TrackPoint};

/// Position trace of one lap in timestamp order.
///
/// Samples without both coordinates are skipped first; positioned samples
/// sharing a timestamp then collapse to the last one.
pub fn track_shape(lap: &Lap) -> Vec<TrackPoint> {
    let mut shape: Vec<(Duration, TrackPoint)> = Vec::with_capacity(lap.samples.len());

    for sample in &lap.samples {
        let Some(point) = sample.position() else { continue };
        match shape.last_mut() {
            Some((time, last)) if *time == sample.time => *last = point,
            _ => shape.push((sample.time, point)),
        }
    }

    shape.into_iter().map(|(_, point)| point).collect()
}

/// Track outline from the session's overall fastest lap.
///
/// The fastest lap is chosen regardless of driver, since it is the lap most
/// likely to carry a complete position trace.
pub fn session_track_shape(session: &Session) -> Result<Vec<TrackPoint>> {
    let lap = LapIndex::new(session).session_fastest_lap()?;
    Ok(track_shape(lap))
}
