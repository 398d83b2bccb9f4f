//! Analysis configuration — category list and year window.
//!
//! Both the product category list and the analysis window are explicit
//! configuration so the engine generalizes to arbitrary windows and
//! category sets; 2022–2026 and the standard list are only defaults.

use serde::{Deserialize, Serialize};

/// Product categories carried by the default configuration.
pub const DEFAULT_CATEGORIES: [&str; 10] = [
    "Corn Seed",
    "Soybean Seed",
    "Sorghum",
    "Alfalfa",
    "Herbicide",
    "Fungicide",
    "Insecticide",
    "Fertilizer",
    "Equipment",
    "Other",
];

/// Configured analysis window and category set.
///
/// The category list constrains *expected* product values for presentation
/// purposes; ingestion and aggregation never gate on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// First year of the analysis window (inclusive).
    pub first_year: i32,
    /// Last year of the analysis window (inclusive).
    pub last_year: i32,
    /// Expected product categories, in display order.
    pub categories: Vec<String>,
}

impl AnalyticsConfig {
    pub fn new(first_year: i32, last_year: i32) -> Self {
        Self {
            first_year,
            last_year,
            ..Self::default()
        }
    }

    /// Years in the window, ascending. Empty if the window is inverted.
    pub fn years(&self) -> Vec<i32> {
        if self.last_year < self.first_year {
            return Vec::new();
        }
        (self.first_year..=self.last_year).collect()
    }

    /// True if `category` is one of the configured categories.
    pub fn is_known_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            first_year: 2022,
            last_year: 2026,
            categories: DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}
