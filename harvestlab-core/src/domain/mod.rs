//! Domain types for HarvestLab

pub mod config;
pub mod summary;
pub mod transaction;

pub use config::{AnalyticsConfig, DEFAULT_CATEGORIES};
pub use summary::{GrowerSummary, MonthlySummary, ProductSummary, YearlySummary};
pub use transaction::Transaction;

/// Grower natural key type alias — name equality is identity.
pub type GrowerName = String;
