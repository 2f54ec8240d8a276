//! Core types for session timing data.
//!
//! Everything downstream of the session loader works on these strongly typed
//! records; raw provider rows never leak past normalization.
//!
//! ## Overview
//!
//! - [`SessionKey`] identifies a session by (year, event, kind)
//! - [`Session`] owns the normalized [`Lap`]s of one session
//! - [`Lap`] carries timing, tyre data and raw [`ChannelSample`]s
//! - [`TelemetrySample`] is a distance-indexed sample produced by alignment
//! - [`Stint`] is a derived run of laps on one set of tyres
//! - [`DataQualityWarning`] records a non-fatal anomaly
//!
//! ## Usage Example
//!
//! ```rust
//! use paddock::types::{SessionKey, SessionKind};
//!
//! let key = SessionKey::new(2024, "  Monaco ", "q".parse::<SessionKind>().unwrap());
//! assert_eq!(key.event, "Monaco");
//! assert_eq!(key.kind, SessionKind::Qualifying);
//! assert_eq!(key.event_slug(), "monaco");
//! ```

mod compound;
mod lap;
mod session;
mod session_kind;
mod telemetry;
mod warning;

pub use compound::Compound;
pub use lap::{Lap, Stint};
pub use session::{Event, Session, SessionKey};
pub use session_kind::SessionKind;
pub use telemetry::{ChannelSample, TelemetrySample, TrackPoint};
pub use warning::{DataQualityWarning, WarningKind};
