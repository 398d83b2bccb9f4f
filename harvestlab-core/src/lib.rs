//! HarvestLab Core — domain types, aggregation, retention, forecasting.
//!
//! This crate contains the analytics engine for grower sales data:
//! - Domain types (transactions, yearly/grower/product summaries)
//! - Aggregation engine (filters, rollups, product mix)
//! - Retention analyzer (year-over-year cohort partitions)
//! - Forecast engine (linear / growth / weighted with confidence bands)
//! - Tolerant CSV ingestion
//!
//! Everything is pure and recomputed on demand: the caller owns the
//! transaction collection, and no function here holds state between calls or
//! mutates its input. Concurrent invocations never interfere.

pub mod aggregate;
pub mod data;
pub mod domain;
pub mod forecast;
pub mod retention;
