//! Derived summary views — recomputed on demand, never cached.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Revenue/volume rollup for a single calendar year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlySummary {
    pub year: i32,
    pub revenue: f64,
    pub quantity: f64,
    pub order_count: usize,
    pub grower_count: usize,
    /// revenue / order_count; 0 when there are no orders.
    pub average_order_value: f64,
}

impl YearlySummary {
    /// All-zero summary for a year with no transactions.
    pub fn empty(year: i32) -> Self {
        Self {
            year,
            revenue: 0.0,
            quantity: 0.0,
            order_count: 0,
            grower_count: 0,
            average_order_value: 0.0,
        }
    }
}

/// Revenue/volume rollup for one calendar month within a year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub year: i32,
    /// 1–12.
    pub month: u32,
    pub revenue: f64,
    pub quantity: f64,
    pub order_count: usize,
}

/// Per-grower rollup across the filtered transaction set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowerSummary {
    pub grower_name: String,
    pub revenue: f64,
    pub order_count: usize,
    /// Distinct products this grower purchased.
    pub products: BTreeSet<String>,
    /// Earliest purchase date (min by date, not input order).
    pub first_purchase: Option<NaiveDate>,
    /// Latest purchase date.
    pub last_purchase: Option<NaiveDate>,
}

/// Per-product rollup with share of total revenue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub product: String,
    pub revenue: f64,
    pub quantity: f64,
    pub order_count: usize,
    /// Percent of total revenue (0–100); 0 when total revenue is 0.
    pub share_pct: f64,
}
