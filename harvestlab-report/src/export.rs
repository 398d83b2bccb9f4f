//! Reporting and export — JSON, CSV, and Markdown artifact generation.
//!
//! Three export formats for dashboard results:
//! - **JSON**: full round-trip serialization with schema versioning
//! - **CSV**: transaction re-export with the canonical 6-column header
//! - **Markdown**: human-readable dashboard report
//!
//! All persisted artifacts include a `schema_version` field. Unknown versions
//! are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use harvestlab_core::domain::Transaction;

use crate::dashboard::{DashboardReport, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `DashboardReport` to pretty JSON.
pub fn export_json(report: &DashboardReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize DashboardReport to JSON")
}

/// Deserialize a `DashboardReport` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<DashboardReport> {
    let report: DashboardReport =
        serde_json::from_str(json).context("failed to deserialize DashboardReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export transactions as CSV with the canonical column order.
///
/// Columns: date, invoice_number, grower_name, product, quantity, amount.
/// Re-parsing the output reproduces the records (the extension map is not
/// part of the canonical format).
pub fn export_transactions_csv(transactions: &[Transaction]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "date",
        "invoice_number",
        "grower_name",
        "product",
        "quantity",
        "amount",
    ])?;

    for tx in transactions {
        wtr.write_record([
            &tx.date.to_string(),
            &tx.invoice_number,
            &tx.grower_name,
            &tx.product,
            &tx.quantity.to_string(),
            &format!("{:.2}", tx.amount),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for a single dashboard run.
///
/// Creates a directory named `report_{timestamp}/` under `output_dir`
/// containing:
/// - `report.json` — the full `DashboardReport`
/// - `transactions.csv` — the filtered transaction set, canonical columns
/// - `report.md` — human-readable Markdown report
///
/// Returns the path to the created directory.
pub fn save_artifacts(
    report: &DashboardReport,
    transactions: &[Transaction],
    output_dir: &Path,
) -> Result<PathBuf> {
    let dirname = format!("report_{}", chrono::Local::now().format("%Y%m%d_%H%M%S"));
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    let json = export_json(report)?;
    std::fs::write(run_dir.join("report.json"), &json)?;

    let csv = export_transactions_csv(transactions)?;
    std::fs::write(run_dir.join("transactions.csv"), &csv)?;

    let md = generate_report(report);
    std::fs::write(run_dir.join("report.md"), &md)?;

    Ok(run_dir)
}

/// Load a `DashboardReport` from an artifact directory's report.json.
///
/// Rejects unknown schema versions.
pub fn load_artifacts(dir: &Path) -> Result<DashboardReport> {
    let report_path = dir.join("report.json");
    let json = std::fs::read_to_string(&report_path)
        .with_context(|| format!("failed to read {}", report_path.display()))?;
    import_json(&json)
}

// ─── Markdown report ────────────────────────────────────────────────

/// Generate a Markdown report for a single dashboard run.
pub fn generate_report(report: &DashboardReport) -> String {
    let mut md = String::with_capacity(2048);

    md.push_str("# Sales Dashboard Report\n\n");

    // Metadata
    md.push_str("## Metadata\n\n");
    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!(
        "| Window | {}–{} |\n",
        report.first_year, report.last_year
    ));
    md.push_str(&format!("| Transactions | {} |\n", report.transaction_count));
    md.push_str(&format!("| Dataset Hash | {} |\n", report.dataset_hash));
    md.push('\n');

    // Yearly summary
    md.push_str("## Yearly Summary\n\n");
    md.push_str("| Year | Revenue | Quantity | Orders | Growers | Avg Order |\n");
    md.push_str("| --- | --- | --- | --- | --- | --- |\n");
    for s in &report.yearly {
        md.push_str(&format!(
            "| {} | ${:.2} | {:.1} | {} | {} | ${:.2} |\n",
            s.year, s.revenue, s.quantity, s.order_count, s.grower_count, s.average_order_value
        ));
    }
    md.push('\n');

    // Monthly detail for the final window year
    md.push_str(&format!("## Monthly Detail ({})\n\n", report.last_year));
    md.push_str("| Month | Revenue | Quantity | Orders |\n");
    md.push_str("| --- | --- | --- | --- |\n");
    for m in &report.monthly {
        md.push_str(&format!(
            "| {} | ${:.2} | {:.1} | {} |\n",
            m.month, m.revenue, m.quantity, m.order_count
        ));
    }
    md.push('\n');

    // Retention
    md.push_str("## Retention\n\n");
    md.push_str("| Year | New | Returning | Lost | Retention |\n");
    md.push_str("| --- | --- | --- | --- | --- |\n");
    for c in &report.retention {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {:.1}% |\n",
            c.year,
            c.new.len(),
            c.returning.len(),
            c.lost.len(),
            c.retention_rate
        ));
    }
    md.push('\n');

    // Product mix
    md.push_str("## Product Mix\n\n");
    md.push_str("| Product | Revenue | Orders | Share |\n");
    md.push_str("| --- | --- | --- | --- |\n");
    for p in &report.product_mix {
        md.push_str(&format!(
            "| {} | ${:.2} | {} | {:.1}% |\n",
            p.product, p.revenue, p.order_count, p.share_pct
        ));
    }
    md.push('\n');

    // Forecast
    md.push_str("## Forecast\n\n");
    md.push_str(&format!(
        "Method: {:?}, confidence {:.0}%, target year {}.\n\n",
        report.forecast.method,
        report.forecast.confidence.as_fraction() * 100.0,
        report.forecast.target_year
    ));
    md.push_str("| Series | Low | Projected | High |\n");
    md.push_str("| --- | --- | --- | --- |\n");
    md.push_str(&format!(
        "| Revenue | ${:.2} | ${:.2} | ${:.2} |\n",
        report.forecast.revenue.low, report.forecast.revenue.value, report.forecast.revenue.high
    ));
    md.push_str(&format!(
        "| Growers | {:.1} | {:.1} | {:.1} |\n",
        report.forecast.growers.low, report.forecast.growers.value, report.forecast.growers.high
    ));

    md
}
