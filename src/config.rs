//! Engine configuration.
//!
//! ```rust
//! use paddock::{EngineConfig, types::SessionKind};
//!
//! let config = EngineConfig::from_yaml("quick_lap_threshold: 1.05\ndefault_session_kind: Q\n")
//!     .unwrap();
//! assert_eq!(config.quick_lap_threshold, 1.05);
//! assert_eq!(config.default_session_kind, SessionKind::Qualifying);
//! assert!(config.pin_first_stint_start);
//! ```

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::laps::DEFAULT_QUICK_LAP_THRESHOLD;
use crate::types::SessionKind;
use crate::{Result, TimingError};

/// Environment variable overriding [`EngineConfig::cache_dir`].
pub const CACHE_DIR_ENV: &str = "PADDOCK_CACHE_DIR";

/// Tunable engine settings.
///
/// The quick-lap threshold and first-stint pin are empirical conventions
/// carried over from how lap charts are usually drawn; treat them as tunable
/// defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Root directory of the on-disk session cache
    pub cache_dir: PathBuf,
    /// A lap is quick when within this multiple of its driver's median
    pub quick_lap_threshold: f64,
    /// Session kind used when a request does not name one
    pub default_session_kind: SessionKind,
    /// Report the first stint of every driver as starting at lap 0
    pub pin_first_stint_start: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            quick_lap_threshold: DEFAULT_QUICK_LAP_THRESHOLD,
            default_session_kind: SessionKind::Race,
            pin_first_stint_start: true,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a YAML configuration document.
    ///
    /// Missing keys take their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: EngineConfig = serde_yaml_ng::from_str(yaml)
            .map_err(|e| TimingError::parse("EngineConfig deserialization", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file, then apply environment overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| TimingError::file_error(path.to_path_buf(), e))?;

        debug!(path = %path.display(), "Loaded engine configuration");
        Ok(Self::from_yaml(&yaml)?.with_env_overrides())
    }

    /// Apply `PADDOCK_CACHE_DIR` if set.
    pub fn with_env_overrides(self) -> Self {
        self.apply_cache_dir_override(std::env::var_os(CACHE_DIR_ENV))
    }

    fn apply_cache_dir_override(mut self, cache_dir: Option<OsString>) -> Self {
        if let Some(dir) = cache_dir.filter(|dir| !dir.is_empty()) {
            self.cache_dir = PathBuf::from(dir);
        }
        self
    }

    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }

    pub fn with_quick_lap_threshold(mut self, threshold: f64) -> Self {
        self.quick_lap_threshold = threshold;
        self
    }

    pub fn with_default_session_kind(mut self, kind: SessionKind) -> Self {
        self.default_session_kind = kind;
        self
    }

    pub fn with_pin_first_stint_start(mut self, pin: bool) -> Self {
        self.pin_first_stint_start = pin;
        self
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if !self.quick_lap_threshold.is_finite() || self.quick_lap_threshold <= 0.0 {
            return Err(TimingError::Config {
                details: format!(
                    "quick_lap_threshold must be a positive number, got {}",
                    self.quick_lap_threshold
                ),
            });
        }

        if self.cache_dir.as_os_str().is_empty() {
            return Err(TimingError::Config { details: "cache_dir must not be empty".to_string() });
        }

        Ok(())
    }
}

fn default_cache_dir() -> PathBuf {
    dirs::cache_dir().map(|dir| dir.join("paddock")).unwrap_or_else(|| PathBuf::from("cache"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = EngineConfig::default();
        assert_eq!(config.quick_lap_threshold, 1.07);
        assert_eq!(config.default_session_kind, SessionKind::Race);
        assert!(config.pin_first_stint_start);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn yaml_overrides_only_named_keys() {
        let config = EngineConfig::from_yaml("cache_dir: /tmp/f1\npin_first_stint_start: false\n")
            .unwrap();
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/f1"));
        assert!(!config.pin_first_stint_start);
        assert_eq!(config.quick_lap_threshold, 1.07);
    }

    #[test]
    fn rejects_invalid_threshold() {
        let err = EngineConfig::from_yaml("quick_lap_threshold: -1.0\n").unwrap_err();
        assert!(matches!(err, TimingError::Config { .. }));

        let err = EngineConfig::from_yaml("quick_lap_threshold: .nan\n").unwrap_err();
        assert!(matches!(err, TimingError::Config { .. }));
    }

    #[test]
    fn rejects_unknown_session_kind() {
        let err = EngineConfig::from_yaml("default_session_kind: Warmup\n").unwrap_err();
        assert!(matches!(err, TimingError::Parse { .. }));
    }

    #[test]
    fn cache_dir_override_ignores_empty_values() {
        let config = EngineConfig::default().with_cache_dir("/a");
        assert_eq!(
            config.clone().apply_cache_dir_override(Some(OsString::from("/b"))).cache_dir,
            PathBuf::from("/b")
        );
        assert_eq!(
            config.clone().apply_cache_dir_override(Some(OsString::new())).cache_dir,
            PathBuf::from("/a")
        );
        assert_eq!(config.apply_cache_dir_override(None).cache_dir, PathBuf::from("/a"));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = EngineConfig::load("/no/such/paddock.yaml").unwrap_err();
        assert!(matches!(err, TimingError::File { .. }));
    }
}
