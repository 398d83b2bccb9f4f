//! Property tests for engine invariants.
//!
//! Uses proptest to verify:
//! 1. Aggregation partitions the total exactly (per-grower and per-product)
//! 2. Retention partition identities and rate bounds
//! 3. Confidence band ordering for all methods and levels
//! 4. Forecast idempotence (pure function, no hidden state)
//! 5. Ingestion never panics on arbitrary text

use chrono::NaiveDate;
use proptest::prelude::*;

use harvestlab_core::aggregate::{grower_summaries, product_mix, total_revenue};
use harvestlab_core::data::parse_transactions_csv;
use harvestlab_core::domain::Transaction;
use harvestlab_core::forecast::{
    confidence_band, forecast, project, ConfidenceLevel, ForecastMethod, SeriesPoint,
};
use harvestlab_core::retention::{cohort, growers_in_year};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_grower() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "Miller Farms",
        "Anders Brothers",
        "Hofmann Ag",
        "Keller & Sons",
        "Prairie View",
        "Stonebridge",
    ])
    .prop_map(String::from)
}

fn arb_product() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["Corn Seed", "Soybean Seed", "Herbicide", "Other"])
        .prop_map(String::from)
}

fn arb_transaction() -> impl Strategy<Value = Transaction> {
    (
        2022..=2026i32,
        1..=12u32,
        1..=28u32,
        arb_grower(),
        arb_product(),
        0.0..1000.0f64,
        0.0..100_000.0f64,
    )
        .prop_map(|(year, month, day, grower, product, qty, amount)| Transaction {
            date: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
            invoice_number: format!("INV-{year}{month:02}{day:02}"),
            grower_name: grower,
            product,
            quantity: (qty * 100.0).round() / 100.0,
            amount: (amount * 100.0).round() / 100.0,
            extra: Default::default(),
        })
}

fn arb_series() -> impl Strategy<Value = Vec<SeriesPoint>> {
    prop::collection::vec(0.0..1_000_000.0f64, 1..10).prop_map(|values| {
        values
            .into_iter()
            .enumerate()
            .map(|(i, value)| SeriesPoint {
                year: 2020 + i as i32,
                // Round to cents so tiny subnormal priors cannot blow up
                // year-over-year rates.
                value: (value * 100.0).round() / 100.0,
            })
            .collect()
    })
}

fn arb_method() -> impl Strategy<Value = ForecastMethod> {
    prop::sample::select(vec![
        ForecastMethod::Linear,
        ForecastMethod::Growth,
        ForecastMethod::Weighted,
    ])
}

fn arb_level() -> impl Strategy<Value = ConfidenceLevel> {
    prop::sample::select(vec![
        ConfidenceLevel::P80,
        ConfidenceLevel::P90,
        ConfidenceLevel::P95,
    ])
}

// ── 1. Aggregation partitions the total ──────────────────────────────

proptest! {
    /// sum(per-grower revenue) == total revenue, exactly up to float noise.
    #[test]
    fn grower_revenue_partitions_total(txs in prop::collection::vec(arb_transaction(), 0..60)) {
        let total = total_revenue(&txs);
        let partitioned: f64 = grower_summaries(&txs).iter().map(|s| s.revenue).sum();
        prop_assert!((total - partitioned).abs() < 1e-6,
            "partition mismatch: total={total}, partitioned={partitioned}");
    }

    /// Product mix partitions the total too, and shares stay within [0, 100].
    #[test]
    fn product_mix_partitions_total(txs in prop::collection::vec(arb_transaction(), 0..60)) {
        let total = total_revenue(&txs);
        let mix = product_mix(&txs);
        let partitioned: f64 = mix.iter().map(|p| p.revenue).sum();
        prop_assert!((total - partitioned).abs() < 1e-6);
        for p in &mix {
            prop_assert!((0.0..=100.0 + 1e-9).contains(&p.share_pct));
        }
    }
}

// ── 2. Retention identities ──────────────────────────────────────────

proptest! {
    /// |new| + |returning| == |current| and |lost| + |returning| == |previous|,
    /// and the rate stays within [0, 100].
    #[test]
    fn retention_partition_identities(
        txs in prop::collection::vec(arb_transaction(), 0..80),
        year in 2023..=2026i32,
    ) {
        let c = cohort(&txs, year);
        let current = growers_in_year(&txs, year);
        let previous = growers_in_year(&txs, year - 1);

        prop_assert_eq!(c.new.len() + c.returning.len(), current.len());
        prop_assert_eq!(c.lost.len() + c.returning.len(), previous.len());
        prop_assert!((0.0..=100.0).contains(&c.retention_rate));
        if previous.is_empty() {
            prop_assert_eq!(c.retention_rate, 0.0);
        }
    }

    /// The three partitions are pairwise disjoint.
    #[test]
    fn retention_partitions_disjoint(
        txs in prop::collection::vec(arb_transaction(), 0..80),
        year in 2023..=2026i32,
    ) {
        let c = cohort(&txs, year);
        prop_assert!(c.new.intersection(&c.returning).next().is_none());
        prop_assert!(c.new.intersection(&c.lost).next().is_none());
        prop_assert!(c.returning.intersection(&c.lost).next().is_none());
    }
}

// ── 3. Confidence band ordering ──────────────────────────────────────

proptest! {
    /// low <= value <= high for every method and level over any non-empty
    /// series, and every component is finite and non-negative where floored.
    #[test]
    fn band_ordering(series in arb_series(), method in arb_method(), level in arb_level()) {
        let projected = project(&series, method, 2031);
        let band = confidence_band(projected, &series, level);

        prop_assert!(band.low.is_finite());
        prop_assert!(band.value.is_finite());
        prop_assert!(band.high.is_finite());
        prop_assert!(band.low >= 0.0);
        prop_assert!(band.value >= 0.0);
        prop_assert!(band.low <= band.value, "low {} > value {}", band.low, band.value);
        prop_assert!(band.value <= band.high, "value {} > high {}", band.value, band.high);
    }
}

// ── 4. Forecast idempotence ──────────────────────────────────────────

proptest! {
    /// Identical inputs produce bit-identical forecasts.
    #[test]
    fn forecast_idempotent(
        revenue in arb_series(),
        growers in arb_series(),
        method in arb_method(),
        level in arb_level(),
    ) {
        let a = forecast(&revenue, &growers, method, level, 2031);
        let b = forecast(&revenue, &growers, method, level, 2031);
        prop_assert_eq!(a, b);
    }
}

// ── 5. Ingestion never panics ────────────────────────────────────────

proptest! {
    /// Arbitrary text never makes the importer panic, and every accepted
    /// record satisfies the required-field invariant.
    #[test]
    fn ingest_is_total(text in "\\PC{0,400}") {
        let result = parse_transactions_csv(&text);
        for tx in &result.transactions {
            prop_assert!(tx.is_valid());
        }
    }
}
