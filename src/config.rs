//! Dashboard configuration.
//!
//! Defaults can be overridden by a JSON file and then by command line flags.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Input files and slider bounds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Migrant counts by district.
    pub migrants_path: PathBuf,
    /// Yearly exchange-rate observations.
    pub rates_path: PathBuf,
    pub top_n_min: usize,
    pub top_n_max: usize,
    pub top_n_default: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            migrants_path: PathBuf::from("92e594ab51adfccc49b1e9bd02bb4708_20241020_022106.csv"),
            rates_path: PathBuf::from("a9c0cb61966b5c9fa47a4a9bbd375039_20240906_142928.csv"),
            top_n_min: 5,
            top_n_max: 20,
            top_n_default: 10,
        }
    }
}

impl DashboardConfig {
    /// Load from a JSON file; missing fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_n_min == 0 {
            return Err(ConfigError::Invalid("top_n_min must be at least 1".into()));
        }
        if !(self.top_n_min..=self.top_n_max).contains(&self.top_n_default) {
            return Err(ConfigError::Invalid(format!(
                "top_n_default {} is outside {}..={}",
                self.top_n_default, self.top_n_min, self.top_n_max
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
    fn test_default_config_is_valid() {
        let config = DashboardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.top_n_default, 10);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"rates_path": "rates.csv", "top_n_default": 12}}"#).unwrap();

        let config = DashboardConfig::from_file(file.path()).unwrap();

        assert_eq!(config.rates_path, PathBuf::from("rates.csv"));
        assert_eq!(config.top_n_default, 12);
        assert_eq!(config.top_n_max, 20);
    }

    #[test]
    fn test_default_outside_bounds_is_rejected() {
        let config = DashboardConfig {
            top_n_default: 25,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_file_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            DashboardConfig::from_file(file.path()),
            Err(ConfigError::Json(_))
        ));
    }
}
