//! Dashboard Configuration Module
//! Loads settings from an optional JSON file with environment overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable pointing at a JSON config file.
pub const CONFIG_ENV: &str = "CO2_DASHBOARD_CONFIG";
/// Environment variable overriding the dataset path.
pub const DATA_PATH_ENV: &str = "CO2_DASHBOARD_DATA";
/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.json";

pub const DEFAULT_DATA_PATH: &str = "./input/CO2_Emissions.csv";
pub const DEFAULT_VEHICLE_CLASS: &str = "TWO-SEATER";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// How the engine-size range bounds are applied when building the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundMode {
    /// `lo < x < hi`; rows sitting exactly on a bound are dropped.
    #[default]
    Exclusive,
    /// `lo <= x <= hi`
    Inclusive,
}

impl BoundMode {
    pub fn contains(self, lo: f64, hi: f64, value: f64) -> bool {
        match self {
            BoundMode::Exclusive => lo < value && value < hi,
            BoundMode::Inclusive => lo <= value && value <= hi,
        }
    }
}

/// Runtime settings for the dashboard.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub default_vehicle_class: String,
    pub engine_step: f64,
    pub lower_quantile: f64,
    pub upper_quantile: f64,
    pub bound_mode: BoundMode,
    pub open_after_export: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            default_vehicle_class: DEFAULT_VEHICLE_CLASS.to_string(),
            engine_step: 0.3,
            lower_quantile: 0.1,
            upper_quantile: 0.95,
            bound_mode: BoundMode::Exclusive,
            open_after_export: true,
        }
    }
}

impl DashboardConfig {
    /// Resolve the config from the environment: explicit file, local
    /// `dashboard.json`, then defaults. The data path env var wins last.
    pub fn load() -> Result<Self, ConfigError> {
        let config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };

        let config =
            config.with_data_path_override(std::env::var(DATA_PATH_ENV).ok().as_deref());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded config from {}", path.display());
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the data path when an override is given and non-empty.
    pub fn with_data_path_override(mut self, data_path: Option<&str>) -> Self {
        if let Some(path) = data_path.map(str::trim).filter(|p| !p.is_empty()) {
            self.data_path = PathBuf::from(path);
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.engine_step.is_finite() && self.engine_step > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "engine_step must be positive, got {}",
                self.engine_step
            )));
        }
        let in_unit = |q: f64| (0.0..=1.0).contains(&q);
        if !in_unit(self.lower_quantile)
            || !in_unit(self.upper_quantile)
            || self.lower_quantile > self.upper_quantile
        {
            return Err(ConfigError::Invalid(format!(
                "quantiles must satisfy 0 <= lower <= upper <= 1, got {} and {}",
                self.lower_quantile, self.upper_quantile
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_match_the_source_dashboard() {
        let config = DashboardConfig::default();
        assert_eq!(config.data_path, PathBuf::from("./input/CO2_Emissions.csv"));
        assert_eq!(config.default_vehicle_class, "TWO-SEATER");
        assert_eq!(config.engine_step, 0.3);
        assert_eq!(config.lower_quantile, 0.1);
        assert_eq!(config.upper_quantile, 0.95);
        assert_eq!(config.bound_mode, BoundMode::Exclusive);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{ "data_path": "data/other.csv", "bound_mode": "inclusive" }"#;
        let config = DashboardConfig::from_json_str(json).unwrap();
        assert_eq!(config.data_path, PathBuf::from("data/other.csv"));
        assert_eq!(config.bound_mode, BoundMode::Inclusive);
        assert_eq!(config.default_vehicle_class, DEFAULT_VEHICLE_CLASS);
    }

    #[test]
    fn rejects_inverted_quantiles() {
        let json = r#"{ "lower_quantile": 0.9, "upper_quantile": 0.2 }"#;
        let err = DashboardConfig::from_json_str(json).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_non_positive_step() {
        let err = DashboardConfig::from_json_str(r#"{ "engine_step": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn reads_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "default_vehicle_class": "SUV - SMALL" }}"#).unwrap();
        let config = DashboardConfig::from_file(file.path()).unwrap();
        assert_eq!(config.default_vehicle_class, "SUV - SMALL");
    }

    #[test]
    fn missing_config_file_is_an_io_error() {
        let err = DashboardConfig::from_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn data_path_override_ignores_blank_values() {
        let config = DashboardConfig::default().with_data_path_override(Some("  "));
        assert_eq!(config.data_path, PathBuf::from(DEFAULT_DATA_PATH));

        let config = DashboardConfig::default().with_data_path_override(Some("/tmp/co2.csv"));
        assert_eq!(config.data_path, PathBuf::from("/tmp/co2.csv"));
    }

    #[test]
    fn bound_modes_differ_only_on_the_edges() {
        assert!(!BoundMode::Exclusive.contains(1.0, 2.0, 1.0));
        assert!(!BoundMode::Exclusive.contains(1.0, 2.0, 2.0));
        assert!(BoundMode::Exclusive.contains(1.0, 2.0, 1.5));
        assert!(BoundMode::Inclusive.contains(1.0, 2.0, 1.0));
        assert!(BoundMode::Inclusive.contains(1.0, 2.0, 2.0));
        assert!(!BoundMode::Inclusive.contains(1.0, 2.0, 2.1));
    }
}
