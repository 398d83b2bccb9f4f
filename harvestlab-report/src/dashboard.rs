//! Dashboard assembly — one pure call from transactions to a full report.
//!
//! `build_dashboard()` applies the configured filter once, then derives every
//! analytic view from the same filtered set: yearly rollups, retention trend,
//! product mix, grower table, and the revenue/grower forecast. The result is
//! schema-versioned for artifact persistence.

use serde::{Deserialize, Serialize};

use harvestlab_core::aggregate::{
    grower_summaries, monthly_summaries, product_mix, sort_growers, yearly_summaries,
};
use harvestlab_core::domain::{
    GrowerSummary, MonthlySummary, ProductSummary, Transaction, YearlySummary,
};
use harvestlab_core::forecast::{forecast, Forecast, SeriesPoint};
use harvestlab_core::retention::{retention_trend, RetentionCohort};

use crate::config::ReportConfig;

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete dashboard for one transaction set and configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub first_year: i32,
    pub last_year: i32,
    /// Transactions remaining after the configured filter.
    pub transaction_count: usize,
    /// blake3 content hash of the filtered transaction set.
    pub dataset_hash: String,
    pub yearly: Vec<YearlySummary>,
    /// Month-by-month rollup for the last year of the window.
    pub monthly: Vec<MonthlySummary>,
    pub retention: Vec<RetentionCohort>,
    pub product_mix: Vec<ProductSummary>,
    pub growers: Vec<GrowerSummary>,
    pub forecast: Forecast,
}

/// Default schema version for serde deserialization of older JSON without the field.
fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Build the full dashboard. Pure: identical inputs give identical output.
pub fn build_dashboard(transactions: &[Transaction], config: &ReportConfig) -> DashboardReport {
    let analytics = config.analytics_config();
    let filter = config.transaction_filter();

    let filtered: Vec<Transaction> = transactions
        .iter()
        .filter(|tx| filter.matches(tx))
        .cloned()
        .collect();

    let yearly = yearly_summaries(&filtered, &analytics);
    let monthly = monthly_summaries(&filtered, analytics.last_year);
    let retention = retention_trend(&filtered, &analytics);
    let mix = product_mix(&filtered);

    let mut growers = grower_summaries(&filtered);
    sort_growers(&mut growers, config.filter.sort);

    // Revenue and grower-count series come straight from the yearly rollups,
    // zero years included; the growth method skips zero-prior transitions.
    let revenue_series: Vec<SeriesPoint> = yearly
        .iter()
        .map(|s| SeriesPoint {
            year: s.year,
            value: s.revenue,
        })
        .collect();
    let grower_series: Vec<SeriesPoint> = yearly
        .iter()
        .map(|s| SeriesPoint {
            year: s.year,
            value: s.grower_count as f64,
        })
        .collect();

    let projection = forecast(
        &revenue_series,
        &grower_series,
        config.forecast.method,
        config.confidence_level(),
        config.target_year(),
    );

    DashboardReport {
        schema_version: SCHEMA_VERSION,
        first_year: analytics.first_year,
        last_year: analytics.last_year,
        transaction_count: filtered.len(),
        dataset_hash: dataset_hash(&filtered),
        yearly,
        monthly,
        retention,
        product_mix: mix,
        growers,
        forecast: projection,
    }
}

/// Deterministic content hash of a transaction set.
///
/// Two identical datasets hash identically, so artifacts can be traced back
/// to the exact records that produced them.
pub fn dataset_hash(transactions: &[Transaction]) -> String {
    let json =
        serde_json::to_vec(transactions).expect("transaction serialization failed");
    blake3::hash(&json).to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tx(year: i32, grower: &str, product: &str, amount: f64) -> Transaction {
        Transaction {
            date: NaiveDate::from_ymd_opt(year, 4, 10).unwrap(),
            invoice_number: format!("INV-{year}-{grower}"),
            grower_name: grower.into(),
            product: product.into(),
            quantity: 10.0,
            amount,
            extra: Default::default(),
        }
    }

    fn sample_set() -> Vec<Transaction> {
        vec![
            tx(2022, "Miller Farms", "Corn Seed", 10_000.0),
            tx(2023, "Miller Farms", "Corn Seed", 12_000.0),
            tx(2023, "Anders Brothers", "Herbicide", 4_000.0),
            tx(2024, "Miller Farms", "Soybean Seed", 15_000.0),
            tx(2024, "Hofmann Ag", "Corn Seed", 8_000.0),
        ]
    }

    #[test]
    fn dashboard_covers_every_view() {
        let report = build_dashboard(&sample_set(), &ReportConfig::default());
        assert_eq!(report.schema_version, SCHEMA_VERSION);
        assert_eq!(report.transaction_count, 5);
        assert_eq!(report.yearly.len(), 5); // 2022–2026, zero-filled
        assert_eq!(report.monthly.len(), 12);
        assert!(report.monthly.iter().all(|m| m.year == 2026));
        assert_eq!(report.retention.len(), 4);
        assert!(!report.product_mix.is_empty());
        assert_eq!(report.growers.len(), 3);
        assert_eq!(report.forecast.target_year, 2027);
        assert!(!report.dataset_hash.is_empty());
    }

    #[test]
    fn dashboard_is_deterministic() {
        let txs = sample_set();
        let config = ReportConfig::default();
        let a = build_dashboard(&txs, &config);
        let b = build_dashboard(&txs, &config);
        assert_eq!(a, b);
    }

    #[test]
    fn product_filter_narrows_every_view() {
        let mut config = ReportConfig::default();
        config.filter.product = Some("Corn Seed".into());
        let report = build_dashboard(&sample_set(), &config);
        assert_eq!(report.transaction_count, 3);
        assert_eq!(report.product_mix.len(), 1);
        assert_eq!(report.product_mix[0].product, "Corn Seed");
        // Only Corn Seed buyers count toward retention now.
        let cohort_2024 = report.retention.iter().find(|c| c.year == 2024).unwrap();
        assert_eq!(cohort_2024.lost.len() + cohort_2024.returning.len(), 1);
    }

    #[test]
    fn empty_store_produces_zero_dashboard() {
        let report = build_dashboard(&[], &ReportConfig::default());
        assert_eq!(report.transaction_count, 0);
        assert!(report.yearly.iter().all(|s| s.revenue == 0.0));
        assert!(report.growers.is_empty());
        assert!(report.product_mix.is_empty());
        assert_eq!(report.forecast.revenue.value, 0.0);
    }

    #[test]
    fn dataset_hash_tracks_content() {
        let txs = sample_set();
        let h1 = dataset_hash(&txs);
        let h2 = dataset_hash(&txs);
        assert_eq!(h1, h2);
        let mut changed = txs.clone();
        changed[0].amount += 1.0;
        assert_ne!(h1, dataset_hash(&changed));
    }

    #[test]
    fn forecast_series_built_from_window() {
        // All revenue in 2023/2024; the linear fit still sees five points
        // (three of them zero) and projects within a finite band.
        let report = build_dashboard(&sample_set(), &ReportConfig::default());
        assert!(report.forecast.revenue.value.is_finite());
        assert!(report.forecast.revenue.low <= report.forecast.revenue.value);
        assert!(report.forecast.revenue.value <= report.forecast.revenue.high);
    }
}
