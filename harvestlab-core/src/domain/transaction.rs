//! Transaction — the atomic sales fact.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single sales transaction: one invoice line for one grower.
///
/// The grower name is the natural key — name equality IS identity; there is
/// no surrogate ID. `product` is expected to fall within the configured
/// category list but unknown categories are stored as-is, never rejected.
/// Columns the engine does not understand (e.g. hybrid, trait) survive in
/// `extra` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub invoice_number: String,
    pub grower_name: String,
    pub product: String,
    pub quantity: f64,
    pub amount: f64,
    /// Open extension map for ad-hoc columns. Preserved, never interpreted.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl Transaction {
    /// Calendar year of the transaction date.
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Calendar month (1–12) of the transaction date.
    pub fn month(&self) -> u32 {
        self.date.month()
    }

    /// Required-field invariant: grower and product must be non-empty, and
    /// quantity/amount must be non-negative finite numbers.
    pub fn is_valid(&self) -> bool {
        !self.grower_name.trim().is_empty()
            && !self.product.trim().is_empty()
            && self.quantity.is_finite()
            && self.quantity >= 0.0
            && self.amount.is_finite()
            && self.amount >= 0.0
    }
}
