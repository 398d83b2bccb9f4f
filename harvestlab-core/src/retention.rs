//! Retention analyzer — year-over-year grower cohort transitions.
//!
//! Membership is by grower name, not transaction count: a grower appearing
//! once or a hundred times in a year is present that year exactly once.
//! The three partitions are disjoint by construction:
//! - `returning` = current ∩ previous
//! - `new`       = current − previous
//! - `lost`      = previous − current

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::{AnalyticsConfig, Transaction};

/// Cohort transition for one (year, previous_year) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionCohort {
    pub year: i32,
    pub previous_year: i32,
    pub new: BTreeSet<String>,
    pub returning: BTreeSet<String>,
    pub lost: BTreeSet<String>,
    /// |returning| / |previous growers| as a percent, rounded to one
    /// decimal. 0 when the previous year had no growers.
    pub retention_rate: f64,
}

/// Distinct grower names transacting in the given calendar year.
pub fn growers_in_year(transactions: &[Transaction], year: i32) -> BTreeSet<String> {
    transactions
        .iter()
        .filter(|tx| tx.year() == year)
        .map(|tx| tx.grower_name.clone())
        .collect()
}

/// Cohort transition from `year - 1` into `year`.
pub fn cohort(transactions: &[Transaction], year: i32) -> RetentionCohort {
    let previous_year = year - 1;
    let current = growers_in_year(transactions, year);
    let previous = growers_in_year(transactions, previous_year);

    let returning: BTreeSet<String> = current.intersection(&previous).cloned().collect();
    let new: BTreeSet<String> = current.difference(&previous).cloned().collect();
    let lost: BTreeSet<String> = previous.difference(&current).cloned().collect();

    let retention_rate = if previous.is_empty() {
        0.0
    } else {
        let pct = returning.len() as f64 / previous.len() as f64 * 100.0;
        (pct * 10.0).round() / 10.0
    };

    RetentionCohort {
        year,
        previous_year,
        new,
        returning,
        lost,
        retention_rate,
    }
}

/// Pairwise cohorts across the configured window, oldest pair first.
///
/// The first year of the window has no predecessor inside the window and is
/// skipped, so an N-year window yields N-1 cohorts.
pub fn retention_trend(transactions: &[Transaction], config: &AnalyticsConfig) -> Vec<RetentionCohort> {
    config
        .years()
        .into_iter()
        .skip(1)
        .map(|year| cohort(transactions, year))
        .collect()
}
