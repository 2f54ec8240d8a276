//! Error types for session loading and analysis.
//!
//! Every failure the engine surfaces to a caller is a named [`TimingError`]
//! variant, so a front end can show a specific message instead of a generic
//! one. Non-fatal data anomalies are *not* errors: they are reported as
//! [`DataQualityWarning`](crate::types::DataQualityWarning) values and
//! processing continues.
//!
//! ## Error Categories
//!
//! - **Identity Errors**: unknown session triple or driver code
//! - **Upstream Errors**: transport or provider failures (retryable)
//! - **Result Errors**: a driver without a single timed lap
//! - **Cache Errors**: the durable store could not be written
//! - **Parse / Config Errors**: malformed payloads or configuration
//!
//! ## Recovery and Retry
//!
//! ```rust
//! use paddock::TimingError;
//!
//! let error = TimingError::upstream_unavailable("connection reset");
//! if error.is_retryable() {
//!     for suggestion in error.recovery_suggestions() {
//!         println!("  - {}", suggestion);
//!     }
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

use crate::types::SessionKind;

/// Result type alias for engine operations.
pub type Result<T, E = TimingError> = std::result::Result<T, E>;

/// Main error type for engine operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TimingError {
    #[error("No {kind} session found for '{event}' in {year}")]
    SessionNotFound { year: i32, event: String, kind: SessionKind },

    #[error("Timing provider unavailable: {reason}")]
    UpstreamUnavailable {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Driver '{driver}' not found in session")]
    DriverNotFound { driver: String },

    #[error("Driver '{driver}' has no lap with a recorded time")]
    NoValidLap { driver: String },

    #[error("Failed to write cache entry at {path}")]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {context}: {details}")]
    Parse { context: String, details: String },

    #[error("Invalid configuration: {details}")]
    Config { details: String },

    #[error("File error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TimingError {
    /// Returns whether this error is potentially recoverable through retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            TimingError::UpstreamUnavailable { .. } => true,
            TimingError::CacheWrite { .. } => true,
            TimingError::SessionNotFound { .. } => false,
            TimingError::DriverNotFound { .. } => false,
            TimingError::NoValidLap { .. } => false,
            TimingError::Parse { .. } => false,
            TimingError::Config { .. } => false,
            TimingError::File { .. } => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            TimingError::SessionNotFound { .. } => vec![
                "Check the event name spelling",
                "Verify the season year",
                "Check the session code (FP1, FP2, FP3, SQ, S, Q, R)",
            ],
            TimingError::UpstreamUnavailable { .. } => vec![
                "Retry the request",
                "Check network connectivity",
                "Verify the timing archive location",
            ],
            TimingError::DriverNotFound { .. } => vec![
                "Use the three-letter driver code (e.g. VER)",
                "Check that the driver took part in this session",
            ],
            TimingError::NoValidLap { .. } => vec![
                "Pick another driver",
                "Check whether the driver retired before completing a lap",
            ],
            TimingError::CacheWrite { .. } => vec![
                "Check cache directory permissions",
                "Ensure sufficient disk space",
                "Point the cache at a writable directory",
            ],
            TimingError::Parse { .. } => vec![
                "Check data format compatibility",
                "Verify source data integrity",
            ],
            TimingError::Config { .. } => vec![
                "Check configuration values",
                "Remove the setting to fall back to the default",
            ],
            TimingError::File { .. } => vec![
                "Check file exists and is readable",
                "Check file permissions",
            ],
        }
    }

    /// Helper constructor for session lookup failures.
    pub fn session_not_found(year: i32, event: impl Into<String>, kind: SessionKind) -> Self {
        TimingError::SessionNotFound { year, event: event.into(), kind }
    }

    /// Helper constructor for upstream failures.
    pub fn upstream_unavailable(reason: impl Into<String>) -> Self {
        TimingError::UpstreamUnavailable { reason: reason.into(), source: None }
    }

    /// Helper constructor for upstream failures with source.
    pub fn upstream_unavailable_with_source(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        TimingError::UpstreamUnavailable { reason: reason.into(), source: Some(source) }
    }

    /// Helper constructor for unknown driver codes.
    pub fn driver_not_found(driver: impl Into<String>) -> Self {
        TimingError::DriverNotFound { driver: driver.into() }
    }

    /// Helper constructor for drivers without a timed lap.
    pub fn no_valid_lap(driver: impl Into<String>) -> Self {
        TimingError::NoValidLap { driver: driver.into() }
    }

    /// Helper constructor for cache write failures.
    pub fn cache_write(path: PathBuf, source: std::io::Error) -> Self {
        TimingError::CacheWrite { path, source }
    }

    /// Helper constructor for file errors with path context.
    pub fn file_error(path: PathBuf, source: std::io::Error) -> Self {
        TimingError::File { path, source }
    }

    /// Helper constructor for parse errors.
    pub fn parse(context: impl Into<String>, details: impl Into<String>) -> Self {
        TimingError::Parse { context: context.into(), details: details.into() }
    }
}

impl From<std::io::Error> for TimingError {
    fn from(err: std::io::Error) -> Self {
        TimingError::File { path: PathBuf::from("<unknown>"), source: err }
    }
}
