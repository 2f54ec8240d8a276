//! Session identity and the normalized session record.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::{DataQualityWarning, Lap, SessionKind};

/// Cache and provider key for one session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    pub year: i32,
    /// Event name as requested by the caller
    pub event: String,
    pub kind: SessionKind,
}

impl SessionKey {
    pub fn new(year: i32, event: impl AsRef<str>, kind: SessionKind) -> Self {
        Self { year, event: event.as_ref().trim().to_string(), kind }
    }

    /// Filesystem-safe form of the event name.
    ///
    /// Lower case; every run of non-alphanumeric characters collapses to a
    /// single `-`, with no leading or trailing dash.
    pub fn event_slug(&self) -> String {
        let mut slug = String::with_capacity(self.event.len());
        let mut pending_dash = false;

        for ch in self.event.chars() {
            if ch.is_alphanumeric() {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.extend(ch.to_lowercase());
            } else {
                pending_dash = true;
            }
        }

        if slug.is_empty() { "unnamed".to_string() } else { slug }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.year, self.event, self.kind.code())
    }
}

/// A resolved event: season plus the provider's canonical event name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub year: i32,
    pub name: String,
}

/// A fully loaded, normalized session.
///
/// Laps are ordered by driver code and then lap number. A `Session` is never
/// mutated once the loader has produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub event: Event,
    pub kind: SessionKind,
    pub laps: Vec<Lap>,
    /// Anomalies recovered from during normalization
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<DataQualityWarning>,
}

impl Session {
    /// Driver codes present in the session, sorted.
    pub fn drivers(&self) -> Vec<&str> {
        let codes: BTreeSet<&str> = self.laps.iter().map(|lap| lap.driver.as_str()).collect();
        codes.into_iter().collect()
    }

    /// Laps of one driver in lap-number order.
    pub fn driver_laps<'a>(&'a self, driver: &'a str) -> impl Iterator<Item = &'a Lap> + 'a {
        self.laps.iter().filter(move |lap| lap.driver == driver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_slug_collapses_separators() {
        let key = SessionKey::new(2024, "São Paulo  Grand-Prix!", SessionKind::Race);
        assert_eq!(key.event_slug(), "são-paulo-grand-prix");

        let key = SessionKey::new(2024, " -- ", SessionKind::Race);
        assert_eq!(key.event_slug(), "unnamed");
    }

    #[test]
    fn key_trims_event_name() {
        let key = SessionKey::new(2023, "  Bahrain ", SessionKind::Qualifying);
        assert_eq!(key.event, "Bahrain");
        assert_eq!(key.to_string(), "2023 Bahrain Q");
    }
}
