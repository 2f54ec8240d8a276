//! Normalization of raw provider rows into typed laps.

use serde_yaml_ng::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::warn;

use crate::raw::{RawCarSample, RawLap, RawSession};
use crate::types::{
    ChannelSample, Compound, DataQualityWarning, Event, Lap, Session, SessionKey, WarningKind,
};

/// Parse a timing string into a duration.
///
/// Accepts plain seconds (`92.1`), `M:SS.fff`, `H:MM:SS.fff` and the
/// `N days HH:MM:SS.ffffff` form. Blank, `NaT` and `nan` are the undefined
/// value and yield `Ok(None)`.
pub fn parse_duration_str(input: &str) -> Result<Option<Duration>, String> {
    let trimmed = input.trim();
    if trimmed.is_empty()
        || ["nat", "nan", "none", "null"].iter().any(|blank| trimmed.eq_ignore_ascii_case(blank))
    {
        return Ok(None);
    }

    let (days, clock) = match trimmed.split_once("day") {
        Some((days, rest)) => {
            let days: u64 =
                days.trim().parse().map_err(|_| format!("invalid day count in '{}'", trimmed))?;
            (days, rest.trim_start_matches('s').trim())
        }
        None => (0, trimmed),
    };

    let parts: Vec<&str> = clock.split(':').collect();
    if parts.len() > 3 {
        return Err(format!("too many ':' separators in '{}'", trimmed));
    }

    let (whole_units, seconds) = parts.split_at(parts.len() - 1);
    let seconds: f64 =
        seconds[0].trim().parse().map_err(|_| format!("invalid seconds in '{}'", trimmed))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(format!("seconds out of range in '{}'", trimmed));
    }

    let mut total_secs = days as f64 * 86_400.0;
    // hours then minutes, or just minutes
    let mut scale = 60.0_f64.powi(whole_units.len() as i32);
    for unit in whole_units {
        let value: u64 =
            unit.trim().parse().map_err(|_| format!("invalid time component in '{}'", trimmed))?;
        total_secs += value as f64 * scale;
        scale /= 60.0;
    }
    total_secs += seconds;

    Duration::try_from_secs_f64(total_secs)
        .map(Some)
        .map_err(|e| format!("duration out of range in '{}': {}", trimmed, e))
}

/// Parse a loosely typed timing cell: a number of seconds, a string, or null.
pub fn parse_duration_value(value: &Value) -> Result<Option<Duration>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => match n.as_f64() {
            Some(secs) if secs.is_nan() => Ok(None),
            Some(secs) => Duration::try_from_secs_f64(secs)
                .map(Some)
                .map_err(|e| format!("invalid duration {}: {}", secs, e)),
            None => Err(format!("non-numeric duration {:?}", n)),
        },
        Value::String(s) => parse_duration_str(s),
        other => Err(format!("unsupported duration value {:?}", other)),
    }
}

/// Convert a float column cell into a positive integer.
fn positive_integer(value: Option<f64>) -> Option<u32> {
    let value = value?;
    if value.is_finite() && value >= 1.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
        Some(value as u32)
    } else {
        None
    }
}

/// Normalize a raw provider session into a typed [`Session`].
///
/// Anomalies are recovered locally and recorded as warnings on the session:
/// bad lap numbers and duplicate laps are dropped, unreadable lap times
/// become untimed, missing stint numbers inherit the previous lap's, and
/// unknown compounds map to [`Compound::Unknown`].
pub fn normalize_session(key: &SessionKey, raw: RawSession) -> Session {
    let mut warnings = Vec::new();
    let mut by_driver: BTreeMap<String, Vec<RawLap>> = BTreeMap::new();

    for row in raw.laps {
        let driver = row.driver.trim().to_ascii_uppercase();
        if driver.is_empty() {
            warnings.push(DataQualityWarning::new(
                WarningKind::MissingDriver,
                format!("dropped lap row {:?} without driver code", row.lap_number),
            ));
            continue;
        }
        by_driver.entry(driver).or_default().push(row);
    }

    let mut laps = Vec::new();
    for (driver, rows) in by_driver {
        laps.extend(normalize_driver(&driver, rows, &mut warnings));
    }

    for warning in &warnings {
        warn!(session = %key, kind = ?warning.kind, "{}", warning);
    }

    let event_name =
        if raw.event_name.trim().is_empty() { key.event.clone() } else { raw.event_name };

    Session { event: Event { year: key.year, name: event_name }, kind: key.kind, laps, warnings }
}

fn normalize_driver(
    driver: &str,
    rows: Vec<RawLap>,
    warnings: &mut Vec<DataQualityWarning>,
) -> Vec<Lap> {
    let mut numbered = Vec::with_capacity(rows.len());
    for row in rows {
        match positive_integer(row.lap_number) {
            Some(number) => numbered.push((number, row)),
            None => warnings.push(
                DataQualityWarning::new(
                    WarningKind::InvalidLapNumber,
                    format!("dropped lap with invalid lap number {:?}", row.lap_number),
                )
                .for_lap(driver, None),
            ),
        }
    }

    // Stable: among duplicates the first row received stays first.
    numbered.sort_by_key(|(number, _)| *number);

    let mut laps: Vec<Lap> = Vec::with_capacity(numbered.len());
    let mut previous_stint = None;

    for (lap_number, row) in numbered {
        if laps.last().is_some_and(|lap| lap.lap_number == lap_number) {
            warnings.push(
                DataQualityWarning::new(WarningKind::DuplicateLap, "dropped duplicate lap record")
                    .for_lap(driver, Some(lap_number)),
            );
            continue;
        }

        let stint = match positive_integer(row.stint) {
            Some(stint) => stint,
            None => {
                let inherited = previous_stint.unwrap_or(1);
                warnings.push(
                    DataQualityWarning::new(
                        WarningKind::MissingStint,
                        format!("missing stint number, assuming stint {}", inherited),
                    )
                    .for_lap(driver, Some(lap_number)),
                );
                inherited
            }
        };
        previous_stint = Some(stint);

        let lap_time = match row.lap_time.as_ref().map(parse_duration_value) {
            None => None,
            Some(Ok(time)) => time,
            Some(Err(details)) => {
                warnings.push(
                    DataQualityWarning::new(WarningKind::UnparseableLapTime, details)
                        .for_lap(driver, Some(lap_number)),
                );
                None
            }
        };

        let compound = Compound::from_provider(row.compound.as_deref().unwrap_or_default());
        let samples = normalize_samples(driver, lap_number, row.car_data, warnings);

        laps.push(Lap { driver: driver.to_string(), lap_number, lap_time, compound, stint, samples });
    }

    laps
}

fn normalize_samples(
    driver: &str,
    lap_number: u32,
    raw: Vec<RawCarSample>,
    warnings: &mut Vec<DataQualityWarning>,
) -> Vec<ChannelSample> {
    let total = raw.len();
    let mut samples: Vec<ChannelSample> = raw
        .into_iter()
        .filter_map(|sample| {
            let time = sample.session_time.as_ref().map(parse_duration_value)?.ok()??;
            Some(ChannelSample {
                time,
                speed: sample.speed.filter(|v| v.is_finite()),
                x: sample.x.filter(|v| v.is_finite()),
                y: sample.y.filter(|v| v.is_finite()),
                distance: sample.distance.filter(|v| v.is_finite()),
            })
        })
        .collect();

    let dropped = total - samples.len();
    if dropped > 0 {
        warnings.push(
            DataQualityWarning::new(
                WarningKind::DroppedSamples,
                format!("dropped {} of {} samples without a timestamp", dropped, total),
            )
            .for_lap(driver, Some(lap_number)),
        );
    }

    samples.sort_by_key(|sample| sample.time);
    samples
}
