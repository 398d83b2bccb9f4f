//! Data ingestion for HarvestLab

pub mod ingest;

pub use ingest::{parse_transactions_csv, ImportResult};
