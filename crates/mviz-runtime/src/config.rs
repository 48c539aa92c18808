#![forbid(unsafe_code)]

//! Startup configuration for a [`crate::Visualizer`].
//!
//! Every field has a default matching the classroom build, so
//! `VisualizerConfig::default()` needs no file at all.
//!
//! # Loading
//!
//! ```toml
//! # mviz.toml
//! rows = 6
//! max_rows = 8
//! speed = 1.5
//! theme = "dark"
//! ```
//!
//! ```rust,ignore
//! let config = VisualizerConfig::from_toml_file("mviz.toml")?.apply_env();
//! config.validate()?;
//! ```
//!
//! # Environment
//!
//! | Variable | Field |
//! |----------|-------|
//! | `MVIZ_ROWS` | `rows` |
//! | `MVIZ_SPEED` | `speed` |
//! | `MVIZ_THEME` | `theme` (`light` or `dark`) |
//! | `MVIZ_INTERVAL_MS` | `interval_ms` |
//!
//! Unparseable values are logged and ignored.

#[cfg(feature = "config-file")]
use std::path::Path;

#[cfg(feature = "config-file")]
use serde::{Deserialize, Serialize};

use mviz_core::{RowCount, Viewport};
use mviz_style::ThemeMode;

use crate::controller::ControllerSettings;
use crate::error::ConfigError;

pub const ENV_ROWS: &str = "MVIZ_ROWS";
pub const ENV_SPEED: &str = "MVIZ_SPEED";
pub const ENV_THEME: &str = "MVIZ_THEME";
pub const ENV_INTERVAL_MS: &str = "MVIZ_INTERVAL_MS";

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default, deny_unknown_fields))]
pub struct VisualizerConfig {
    /// Initial row count.
    pub rows: usize,
    /// Smallest row count the slider allows.
    pub min_rows: usize,
    /// Largest row count the slider allows.
    pub max_rows: usize,
    /// Milliseconds between reveals at speed 1.0.
    pub interval_ms: u64,
    /// Initial speed multiplier.
    pub speed: f64,
    pub theme: ThemeMode,
    /// Initial viewport width in pixels.
    pub width: f32,
    /// Initial viewport height in pixels.
    pub height: f32,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            rows: 5,
            min_rows: 2,
            max_rows: 10,
            interval_ms: ControllerSettings::BASE_INTERVAL.as_millis() as u64,
            speed: 1.0,
            theme: ThemeMode::Light,
            width: 640.0,
            height: 480.0,
        }
    }
}

impl VisualizerConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|err| ConfigError::Parse {
            format: "TOML",
            message: err.to_string(),
        })
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&read(path.as_ref())?)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config-file")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(|err| ConfigError::Parse {
            format: "JSON",
            message: err.to_string(),
        })
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json_str(&read(path.as_ref())?)
    }

    /// Load by extension: `.json` is JSON, anything else TOML.
    #[cfg(feature = "config-file")]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Override fields from `MVIZ_*` environment variables.
    #[must_use]
    pub fn apply_env(self) -> Self {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    /// Override fields from an arbitrary variable lookup.
    #[must_use]
    pub fn apply_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(rows) = parsed(&lookup, ENV_ROWS) {
            self.rows = rows;
        }
        if let Some(speed) = parsed(&lookup, ENV_SPEED) {
            self.speed = speed;
        }
        if let Some(theme) = parsed(&lookup, ENV_THEME) {
            self.theme = theme;
        }
        if let Some(interval) = parsed(&lookup, ENV_INTERVAL_MS) {
            self.interval_ms = interval;
        }
        self
    }

    /// The initial viewport.
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    /// Reject inconsistent values, reporting every problem at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        if self.min_rows < RowCount::MIN {
            errors.push(format!("min_rows must be >= {}", RowCount::MIN));
        }
        if self.max_rows > RowCount::MAX_SUPPORTED {
            errors.push(format!(
                "max_rows must be <= {}",
                RowCount::MAX_SUPPORTED
            ));
        }
        if self.min_rows > self.max_rows {
            errors.push(format!(
                "min_rows ({}) exceeds max_rows ({})",
                self.min_rows, self.max_rows
            ));
        } else if !(self.min_rows..=self.max_rows).contains(&self.rows) {
            errors.push(format!(
                "rows ({}) must be in {}..={}",
                self.rows, self.min_rows, self.max_rows
            ));
        }
        if self.interval_ms == 0 {
            errors.push("interval_ms must be > 0".to_owned());
        }
        let (min_speed, max_speed) = (ControllerSettings::MIN_SPEED, ControllerSettings::MAX_SPEED);
        if !self.speed.is_finite() || !(min_speed..=max_speed).contains(&self.speed) {
            errors.push(format!(
                "speed ({}) must be in {min_speed}..={max_speed}",
                self.speed
            ));
        }
        if !self.width.is_finite() || !self.height.is_finite() {
            errors.push("viewport dimensions must be finite".to_owned());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }
}

#[cfg(feature = "config-file")]
fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parsed<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparseable environment override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        let config = VisualizerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.rows, 5);
        assert_eq!((config.min_rows, config.max_rows), (2, 10));
        assert_eq!(config.interval_ms, 600);
    }

    #[test]
    fn env_overrides_apply() {
        let config = VisualizerConfig::default().apply_vars(vars(&[
            (ENV_ROWS, "7"),
            (ENV_SPEED, "2.5"),
            (ENV_THEME, "dark"),
            (ENV_INTERVAL_MS, "250"),
        ]));
        assert_eq!(config.rows, 7);
        assert_eq!(config.speed, 2.5);
        assert_eq!(config.theme, ThemeMode::Dark);
        assert_eq!(config.interval_ms, 250);
    }

    #[test]
    fn garbage_env_values_are_ignored() {
        let config = VisualizerConfig::default()
            .apply_vars(vars(&[(ENV_ROWS, "many"), (ENV_THEME, "sepia")]));
        assert_eq!(config, VisualizerConfig::default());
    }

    #[test]
    fn validate_collects_every_problem() {
        let config = VisualizerConfig {
            rows: 3,
            min_rows: 8,
            max_rows: 4,
            interval_ms: 0,
            speed: -1.0,
            ..VisualizerConfig::default()
        };
        let Err(ConfigError::Invalid(errors)) = config.validate() else {
            panic!("expected validation failure");
        };
        assert_eq!(errors.len(), 3, "{errors:?}");
    }

    #[test]
    fn rows_outside_bounds_fail() {
        let config = VisualizerConfig {
            rows: 11,
            ..VisualizerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[cfg(feature = "config-file")]
    #[test]
    fn toml_fills_missing_fields_with_defaults() {
        let config = VisualizerConfig::from_toml_str("rows = 6\ntheme = \"dark\"\n").unwrap();
        assert_eq!(config.rows, 6);
        assert_eq!(config.theme, ThemeMode::Dark);
        assert_eq!(config.max_rows, 10);
    }

    #[cfg(feature = "config-file")]
    #[test]
    fn toml_rejects_unknown_keys() {
        let err = VisualizerConfig::from_toml_str("colour = \"red\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { format: "TOML", .. }));
    }

    #[cfg(feature = "config-file")]
    #[test]
    fn json_round_trip_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mviz.json");
        std::fs::write(&path, r#"{ "rows": 4, "speed": 0.5 }"#).unwrap();
        let config = VisualizerConfig::from_file(&path).unwrap();
        assert_eq!(config.rows, 4);
        assert_eq!(config.speed, 0.5);
    }

    #[cfg(feature = "config-file")]
    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = VisualizerConfig::from_toml_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
