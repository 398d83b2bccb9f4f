//! HarvestLab Report — orchestration around the core engine.
//!
//! This crate builds on `harvestlab-core` to provide:
//! - In-memory transaction store (single writer, multiple readers)
//! - TOML report configuration
//! - Dashboard assembly (yearly, retention, mix, growers, forecast)
//! - JSON/CSV/Markdown export and artifact persistence

pub mod config;
pub mod dashboard;
pub mod export;
pub mod store;

pub use config::{ConfigError, ReportConfig};
pub use dashboard::{build_dashboard, dataset_hash, DashboardReport, SCHEMA_VERSION};
pub use export::{
    export_json, export_transactions_csv, generate_report, import_json, load_artifacts,
    save_artifacts,
};
pub use store::MemoryStore;
