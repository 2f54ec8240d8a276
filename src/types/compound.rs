//! Tyre compounds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tyre compound fitted for a lap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Compound {
    Soft,
    Medium,
    Hard,
    Intermediate,
    Wet,
    Unknown,
}

impl Compound {
    /// Canonicalize a provider compound name.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Anything unrecognized (including blanks and test compounds) maps to
    /// [`Compound::Unknown`].
    pub fn from_provider(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "SOFT" | "S" => Compound::Soft,
            "MEDIUM" | "M" => Compound::Medium,
            "HARD" | "H" => Compound::Hard,
            "INTERMEDIATE" | "INTER" | "I" => Compound::Intermediate,
            "WET" | "W" | "FULL WET" => Compound::Wet,
            _ => Compound::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Compound::Soft => "SOFT",
            Compound::Medium => "MEDIUM",
            Compound::Hard => "HARD",
            Compound::Intermediate => "INTERMEDIATE",
            Compound::Wet => "WET",
            Compound::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalizes_known_names() {
        assert_eq!(Compound::from_provider("SOFT"), Compound::Soft);
        assert_eq!(Compound::from_provider(" medium "), Compound::Medium);
        assert_eq!(Compound::from_provider("Hard"), Compound::Hard);
        assert_eq!(Compound::from_provider("INTERMEDIATE"), Compound::Intermediate);
        assert_eq!(Compound::from_provider("wet"), Compound::Wet);
    }

    #[test]
    fn unrecognized_names_become_unknown() {
        assert_eq!(Compound::from_provider("TEST_UNKNOWN"), Compound::Unknown);
        assert_eq!(Compound::from_provider("nan"), Compound::Unknown);
        assert_eq!(Compound::from_provider(""), Compound::Unknown);
        assert_eq!(Compound::from_provider("HYPERSOFT"), Compound::Unknown);
    }
}
