//! Serializable report configuration (TOML).
//!
//! Every section has defaults, so an empty config file (or no file at all)
//! produces the stock dashboard: 2022–2026 window, the standard category
//! list, a linear forecast at 90% confidence one year past the window.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use harvestlab_core::aggregate::{SortKey, TransactionFilter};
use harvestlab_core::domain::{AnalyticsConfig, DEFAULT_CATEGORIES};
use harvestlab_core::forecast::{ConfidenceLevel, ForecastMethod};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid year window: first_year {0} is after last_year {1}")]
    InvalidWindow(i32, i32),
}

/// Full report configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub analysis: AnalysisSection,
    #[serde(default)]
    pub forecast: ForecastSection,
    #[serde(default)]
    pub filter: FilterSection,
}

/// `[analysis]` — year window and category list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSection {
    #[serde(default = "default_first_year")]
    pub first_year: i32,
    #[serde(default = "default_last_year")]
    pub last_year: i32,
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
}

/// `[forecast]` — method, confidence level, and target year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSection {
    #[serde(default)]
    pub method: ForecastMethod,
    /// Fractional confidence level (0.80 | 0.90 | 0.95). Anything else maps
    /// to 0.90 at computation time.
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    /// Defaults to the year after the analysis window.
    #[serde(default)]
    pub target_year: Option<i32>,
}

/// `[filter]` — optional product/grower filters and table sort key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSection {
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub grower: Option<String>,
    #[serde(default)]
    pub sort: SortKey,
}

fn default_first_year() -> i32 {
    2022
}

fn default_last_year() -> i32 {
    2026
}

fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect()
}

fn default_confidence() -> f64 {
    0.90
}

impl Default for AnalysisSection {
    fn default() -> Self {
        Self {
            first_year: default_first_year(),
            last_year: default_last_year(),
            categories: default_categories(),
        }
    }
}

impl Default for ForecastSection {
    fn default() -> Self {
        Self {
            method: ForecastMethod::default(),
            confidence: default_confidence(),
            target_year: None,
        }
    }
}

impl ReportConfig {
    /// Load from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse from a TOML string and validate the window.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        if config.analysis.first_year > config.analysis.last_year {
            return Err(ConfigError::InvalidWindow(
                config.analysis.first_year,
                config.analysis.last_year,
            ));
        }
        Ok(config)
    }

    /// The engine-level analysis window.
    pub fn analytics_config(&self) -> AnalyticsConfig {
        AnalyticsConfig {
            first_year: self.analysis.first_year,
            last_year: self.analysis.last_year,
            categories: self.analysis.categories.clone(),
        }
    }

    /// The engine-level filter predicates.
    pub fn transaction_filter(&self) -> TransactionFilter {
        TransactionFilter {
            year: None,
            product: self.filter.product.clone(),
            grower_contains: self.filter.grower.clone(),
        }
    }

    /// Snapped confidence level (unrecognized fractions fall back to 90%).
    pub fn confidence_level(&self) -> ConfidenceLevel {
        ConfidenceLevel::from_fraction(self.forecast.confidence)
    }

    /// Target forecast year; one past the window unless configured.
    pub fn target_year(&self) -> i32 {
        self.forecast.target_year.unwrap_or(self.analysis.last_year + 1)
    }
}
