//! Analysis configuration
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no
//! file at all) yields the stock report settings.

use crate::error::{AnalyticsError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory under the home directory holding `config.toml`
pub const CONFIG_DIR: &str = ".fraud-fx-stats";

/// Settings for one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Transaction CSV used when no path is given on the command line
    #[serde(default)]
    pub transactions_path: Option<PathBuf>,
    /// Wide exchange-rate CSV
    #[serde(default)]
    pub rates_path: Option<PathBuf>,
    #[serde(default = "default_top_countries")]
    pub top_countries: usize,
    #[serde(default = "default_top_cities")]
    pub top_cities: usize,
    /// Vendor-type substring for the category ranking
    #[serde(default = "default_category_filter")]
    pub category_filter: String,
    #[serde(default = "default_category_top")]
    pub category_top: usize,
    /// Percentile for vendor-diversity outliers, in [0, 1]
    #[serde(default = "default_outlier_quantile")]
    pub outlier_quantile: f64,
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,
    /// Where to write the amount histogram PNG, if anywhere
    #[serde(default)]
    pub chart_path: Option<PathBuf>,
}

fn default_top_countries() -> usize {
    5
}

fn default_top_cities() -> usize {
    5
}

fn default_category_filter() -> String {
    "fast_food".to_string()
}

fn default_category_top() -> usize {
    3
}

fn default_outlier_quantile() -> f64 {
    0.95
}

fn default_histogram_bins() -> usize {
    100
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            transactions_path: None,
            rates_path: None,
            top_countries: default_top_countries(),
            top_cities: default_top_cities(),
            category_filter: default_category_filter(),
            category_top: default_category_top(),
            outlier_quantile: default_outlier_quantile(),
            histogram_bins: default_histogram_bins(),
            chart_path: None,
        }
    }
}

impl AnalysisConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration.
    ///
    /// An explicit `path` must exist and parse. Without one, the default
    /// location `~/.fraud-fx-stats/config.toml` is used when present,
    /// otherwise the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_file(path),
            None => match default_config_path() {
                Some(default) if default.exists() => Self::load_file(&default),
                _ => {
                    log::debug!("No config file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    fn load_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            AnalyticsError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&contents)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Reject settings no reducer can honor
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.outlier_quantile) {
            return Err(AnalyticsError::ConfigError(format!(
                "outlier_quantile must be within [0, 1], got {}",
                self.outlier_quantile
            )));
        }
        if self.histogram_bins == 0 {
            return Err(AnalyticsError::ConfigError(
                "histogram_bins must be positive".to_string(),
            ));
        }
        for (name, value) in [
            ("top_countries", self.top_countries),
            ("top_cities", self.top_cities),
            ("category_top", self.category_top),
        ] {
            if value == 0 {
                return Err(AnalyticsError::ConfigError(format!(
                    "{} must be positive",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// `~/.fraud-fx-stats/config.toml`, if a home directory is known
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR).join("config.toml"))
}
