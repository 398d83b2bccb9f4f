//! Aggregation engine — pure functions over a transaction set.
//!
//! Every function here is a single in-memory pass: transactions in, exact
//! sums/counts/distinct-sets out. No approximation, no hidden state, no
//! caching. An empty input set is a valid zero result, and every ratio
//! reports 0 on a zero denominator rather than NaN or infinity.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{
    AnalyticsConfig, GrowerSummary, MonthlySummary, ProductSummary, Transaction, YearlySummary,
};

// ─── Filtering ──────────────────────────────────────────────────────

/// Optional filter predicates applied before aggregation.
///
/// Year filtering uses calendar-year extraction (Jan 1 – Dec 31 inclusive),
/// not elapsed-day math. The grower filter is a case-insensitive substring
/// match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionFilter {
    pub year: Option<i32>,
    pub product: Option<String>,
    pub grower_contains: Option<String>,
}

impl TransactionFilter {
    /// True if the transaction passes every configured predicate.
    pub fn matches(&self, tx: &Transaction) -> bool {
        if let Some(year) = self.year {
            if tx.year() != year {
                return false;
            }
        }
        if let Some(product) = &self.product {
            if &tx.product != product {
                return false;
            }
        }
        if let Some(needle) = &self.grower_contains {
            if !tx
                .grower_name
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        true
    }
}

/// Apply a filter, borrowing the matching transactions.
pub fn filter<'a>(transactions: &'a [Transaction], f: &TransactionFilter) -> Vec<&'a Transaction> {
    transactions.iter().filter(|tx| f.matches(tx)).collect()
}

// ─── Totals ─────────────────────────────────────────────────────────

/// Total revenue across the set.
pub fn total_revenue(transactions: &[Transaction]) -> f64 {
    transactions.iter().map(|tx| tx.amount).sum()
}

/// Total unit quantity across the set.
pub fn total_quantity(transactions: &[Transaction]) -> f64 {
    transactions.iter().map(|tx| tx.quantity).sum()
}

/// Mean revenue per order; 0 for an empty set.
pub fn average_order_value(transactions: &[Transaction]) -> f64 {
    if transactions.is_empty() {
        return 0.0;
    }
    total_revenue(transactions) / transactions.len() as f64
}

/// Distinct grower names across the set.
pub fn distinct_growers(transactions: &[Transaction]) -> BTreeSet<String> {
    transactions
        .iter()
        .map(|tx| tx.grower_name.clone())
        .collect()
}

// ─── Yearly rollups ─────────────────────────────────────────────────

/// Rollup for a single calendar year. An empty year is all zeros.
pub fn yearly_summary(transactions: &[Transaction], year: i32) -> YearlySummary {
    let in_year: Vec<&Transaction> = transactions.iter().filter(|tx| tx.year() == year).collect();
    if in_year.is_empty() {
        return YearlySummary::empty(year);
    }

    let revenue: f64 = in_year.iter().map(|tx| tx.amount).sum();
    let quantity: f64 = in_year.iter().map(|tx| tx.quantity).sum();
    let growers: BTreeSet<&str> = in_year.iter().map(|tx| tx.grower_name.as_str()).collect();
    let order_count = in_year.len();

    YearlySummary {
        year,
        revenue,
        quantity,
        order_count,
        grower_count: growers.len(),
        average_order_value: revenue / order_count as f64,
    }
}

/// Rollups for every year in the configured window, sorted year ascending.
/// Years with no transactions appear as zero summaries.
pub fn yearly_summaries(transactions: &[Transaction], config: &AnalyticsConfig) -> Vec<YearlySummary> {
    config
        .years()
        .into_iter()
        .map(|year| yearly_summary(transactions, year))
        .collect()
}

/// Month-by-month rollup for one calendar year: always 12 entries,
/// January through December, zero-filled for quiet months.
pub fn monthly_summaries(transactions: &[Transaction], year: i32) -> Vec<MonthlySummary> {
    let mut months: Vec<MonthlySummary> = (1..=12)
        .map(|month| MonthlySummary {
            year,
            month,
            revenue: 0.0,
            quantity: 0.0,
            order_count: 0,
        })
        .collect();

    for tx in transactions.iter().filter(|tx| tx.year() == year) {
        let entry = &mut months[(tx.month() - 1) as usize];
        entry.revenue += tx.amount;
        entry.quantity += tx.quantity;
        entry.order_count += 1;
    }
    months
}

// ─── Grower rollups ─────────────────────────────────────────────────

/// Sort key for grower summary tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Revenue,
    Orders,
    Name,
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey::Revenue
    }
}

/// Per-grower rollups, sorted by revenue descending.
///
/// First/last purchase dates are min/max by date, independent of input order.
pub fn grower_summaries(transactions: &[Transaction]) -> Vec<GrowerSummary> {
    let mut by_grower: BTreeMap<&str, GrowerSummary> = BTreeMap::new();

    for tx in transactions {
        let entry = by_grower
            .entry(tx.grower_name.as_str())
            .or_insert_with(|| GrowerSummary {
                grower_name: tx.grower_name.clone(),
                revenue: 0.0,
                order_count: 0,
                products: BTreeSet::new(),
                first_purchase: None,
                last_purchase: None,
            });
        entry.revenue += tx.amount;
        entry.order_count += 1;
        entry.products.insert(tx.product.clone());
        entry.first_purchase = Some(match entry.first_purchase {
            Some(d) => d.min(tx.date),
            None => tx.date,
        });
        entry.last_purchase = Some(match entry.last_purchase {
            Some(d) => d.max(tx.date),
            None => tx.date,
        });
    }

    let mut summaries: Vec<GrowerSummary> = by_grower.into_values().collect();
    sort_growers(&mut summaries, SortKey::Revenue);
    summaries
}

/// Re-sort grower summaries in place by the given key.
///
/// Revenue and orders sort descending, name ascending. Name is the
/// tie-breaker for the numeric keys so output order is deterministic.
pub fn sort_growers(summaries: &mut [GrowerSummary], key: SortKey) {
    match key {
        SortKey::Revenue => summaries.sort_by(|a, b| {
            b.revenue
                .partial_cmp(&a.revenue)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.grower_name.cmp(&b.grower_name))
        }),
        SortKey::Orders => summaries.sort_by(|a, b| {
            b.order_count
                .cmp(&a.order_count)
                .then_with(|| a.grower_name.cmp(&b.grower_name))
        }),
        SortKey::Name => summaries.sort_by(|a, b| a.grower_name.cmp(&b.grower_name)),
    }
}

// ─── Product mix ────────────────────────────────────────────────────

/// Per-product rollups with percent-of-total share, sorted revenue descending.
///
/// Unknown categories aggregate like any other product; share is 0 for every
/// product when total revenue is 0.
pub fn product_mix(transactions: &[Transaction]) -> Vec<ProductSummary> {
    let total = total_revenue(transactions);
    let mut by_product: BTreeMap<&str, ProductSummary> = BTreeMap::new();

    for tx in transactions {
        let entry = by_product
            .entry(tx.product.as_str())
            .or_insert_with(|| ProductSummary {
                product: tx.product.clone(),
                revenue: 0.0,
                quantity: 0.0,
                order_count: 0,
                share_pct: 0.0,
            });
        entry.revenue += tx.amount;
        entry.quantity += tx.quantity;
        entry.order_count += 1;
    }

    let mut summaries: Vec<ProductSummary> = by_product.into_values().collect();
    for summary in &mut summaries {
        summary.share_pct = if total > 0.0 {
            summary.revenue / total * 100.0
        } else {
            0.0
        };
    }
    summaries.sort_by(|a, b| {
        b.revenue
            .partial_cmp(&a.revenue)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.product.cmp(&b.product))
    });
    summaries
}
