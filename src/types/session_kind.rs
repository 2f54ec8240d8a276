//! Session kinds and their provider codes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TimingError;

/// Kind of a session within an event weekend.
///
/// Serializes as the provider code (`R`, `Q`, `FP1`, ...) and deserializes
/// from either a code or a long name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum SessionKind {
    #[serde(rename = "FP1")]
    Practice1,
    #[serde(rename = "FP2")]
    Practice2,
    #[serde(rename = "FP3")]
    Practice3,
    #[serde(rename = "SQ")]
    SprintQualifying,
    #[serde(rename = "S")]
    Sprint,
    #[serde(rename = "Q")]
    Qualifying,
    #[serde(rename = "R")]
    Race,
}

impl SessionKind {
    /// All session kinds in weekend order.
    pub const ALL: [SessionKind; 7] = [
        SessionKind::Practice1,
        SessionKind::Practice2,
        SessionKind::Practice3,
        SessionKind::SprintQualifying,
        SessionKind::Sprint,
        SessionKind::Qualifying,
        SessionKind::Race,
    ];

    /// Short code used by the timing provider and in cache paths.
    pub fn code(self) -> &'static str {
        match self {
            SessionKind::Practice1 => "FP1",
            SessionKind::Practice2 => "FP2",
            SessionKind::Practice3 => "FP3",
            SessionKind::SprintQualifying => "SQ",
            SessionKind::Sprint => "S",
            SessionKind::Qualifying => "Q",
            SessionKind::Race => "R",
        }
    }

    /// Human readable name.
    pub fn name(self) -> &'static str {
        match self {
            SessionKind::Practice1 => "Practice 1",
            SessionKind::Practice2 => "Practice 2",
            SessionKind::Practice3 => "Practice 3",
            SessionKind::SprintQualifying => "Sprint Qualifying",
            SessionKind::Sprint => "Sprint",
            SessionKind::Qualifying => "Qualifying",
            SessionKind::Race => "Race",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SessionKind {
    type Err = TimingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String =
            s.trim().chars().filter(|c| !c.is_whitespace() && *c != '_' && *c != '-').collect();
        let normalized = normalized.to_ascii_uppercase();

        let kind = match normalized.as_str() {
            "FP1" | "PRACTICE1" => SessionKind::Practice1,
            "FP2" | "PRACTICE2" => SessionKind::Practice2,
            "FP3" | "PRACTICE3" => SessionKind::Practice3,
            "SQ" | "SS" | "SPRINTQUALIFYING" | "SPRINTSHOOTOUT" => SessionKind::SprintQualifying,
            "S" | "SPRINT" => SessionKind::Sprint,
            "Q" | "QUALIFYING" => SessionKind::Qualifying,
            "R" | "RACE" => SessionKind::Race,
            _ => {
                return Err(TimingError::parse(
                    "Session kind",
                    format!("Unrecognized session '{}'", s.trim()),
                ));
            }
        };
        Ok(kind)
    }
}

impl TryFrom<String> for SessionKind {
    type Error = TimingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_and_names_case_insensitively() {
        assert_eq!("r".parse::<SessionKind>().unwrap(), SessionKind::Race);
        assert_eq!(" Q ".parse::<SessionKind>().unwrap(), SessionKind::Qualifying);
        assert_eq!("fp2".parse::<SessionKind>().unwrap(), SessionKind::Practice2);
        assert_eq!("Practice 3".parse::<SessionKind>().unwrap(), SessionKind::Practice3);
        assert_eq!("Sprint Shootout".parse::<SessionKind>().unwrap(), SessionKind::SprintQualifying);
        assert!("warmup".parse::<SessionKind>().is_err());
    }

    #[test]
    fn deserializes_codes_and_names() {
        let kinds: Vec<SessionKind> = serde_yaml_ng::from_str("[R, Qualifying, fp1]").unwrap();
        assert_eq!(kinds, vec![SessionKind::Race, SessionKind::Qualifying, SessionKind::Practice1]);
        assert_eq!(serde_yaml_ng::to_string(&SessionKind::Sprint).unwrap().trim(), "S");
    }

    #[test]
    fn codes_parse_back_to_the_same_kind() {
        for kind in SessionKind::ALL {
            assert_eq!(kind.code().parse::<SessionKind>().unwrap(), kind);
            assert_eq!(kind.name().parse::<SessionKind>().unwrap(), kind);
        }
    }
}
