//! HarvestLab CLI — dashboard, forecast, and export commands.
//!
//! Commands:
//! - `report` — build the full dashboard from a transaction CSV and save artifacts
//! - `forecast` — print the revenue/grower forecast only
//! - `export` — normalize a dirty CSV through parse + re-export

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use harvestlab_core::data::{parse_transactions_csv, ImportResult};
use harvestlab_core::forecast::ForecastMethod;
use harvestlab_report::{
    build_dashboard, export_transactions_csv, save_artifacts, DashboardReport, ReportConfig,
};

#[derive(Parser)]
#[command(
    name = "harvestlab",
    about = "HarvestLab CLI — grower sales analytics and forecasting"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the full dashboard from a transaction CSV and save artifacts.
    Report {
        /// Path to the transaction CSV (header optional, comma or tab delimited).
        #[arg(long)]
        input: PathBuf,

        /// Path to a TOML report config.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Forecast method: linear, growth, or weighted.
        #[arg(long)]
        method: Option<String>,

        /// Confidence level: 0.80, 0.90, or 0.95.
        #[arg(long)]
        confidence: Option<f64>,

        /// Target forecast year. Defaults to one past the analysis window.
        #[arg(long)]
        target_year: Option<i32>,

        /// Exact product filter.
        #[arg(long)]
        product: Option<String>,

        /// Case-insensitive grower name search.
        #[arg(long)]
        grower: Option<String>,

        /// Grower table sort key: revenue, orders, or name.
        #[arg(long)]
        sort: Option<String>,

        /// Output directory for artifacts.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,
    },
    /// Print the revenue/grower forecast for a transaction CSV.
    Forecast {
        /// Path to the transaction CSV.
        #[arg(long)]
        input: PathBuf,

        /// Forecast method: linear, growth, or weighted.
        #[arg(long, default_value = "linear")]
        method: String,

        /// Confidence level: 0.80, 0.90, or 0.95.
        #[arg(long, default_value_t = 0.90)]
        confidence: f64,

        /// Target forecast year.
        #[arg(long)]
        target_year: Option<i32>,

        /// First year of the analysis window.
        #[arg(long, default_value_t = 2022)]
        first_year: i32,

        /// Last year of the analysis window.
        #[arg(long, default_value_t = 2026)]
        last_year: i32,
    },
    /// Normalize a dirty CSV: parse tolerantly, re-export canonical columns.
    Export {
        /// Path to the input CSV.
        #[arg(long)]
        input: PathBuf,

        /// Path for the normalized output CSV.
        #[arg(long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            input,
            config,
            method,
            confidence,
            target_year,
            product,
            grower,
            sort,
            output_dir,
        } => run_report(
            &input, config, method, confidence, target_year, product, grower, sort, &output_dir,
        ),
        Commands::Forecast {
            input,
            method,
            confidence,
            target_year,
            first_year,
            last_year,
        } => run_forecast(&input, &method, confidence, target_year, first_year, last_year),
        Commands::Export { input, output } => run_export(&input, &output),
    }
}

fn load_input(path: &Path) -> Result<ImportResult> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(parse_transactions_csv(&text))
}

fn parse_method(name: &str) -> Result<ForecastMethod> {
    match name {
        "linear" => Ok(ForecastMethod::Linear),
        "growth" => Ok(ForecastMethod::Growth),
        "weighted" => Ok(ForecastMethod::Weighted),
        _ => anyhow::bail!("unknown method '{name}'. Valid: linear, growth, weighted"),
    }
}

fn parse_sort(name: &str) -> Result<harvestlab_core::aggregate::SortKey> {
    use harvestlab_core::aggregate::SortKey;
    match name {
        "revenue" => Ok(SortKey::Revenue),
        "orders" => Ok(SortKey::Orders),
        "name" => Ok(SortKey::Name),
        _ => anyhow::bail!("unknown sort key '{name}'. Valid: revenue, orders, name"),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_report(
    input: &Path,
    config_path: Option<PathBuf>,
    method: Option<String>,
    confidence: Option<f64>,
    target_year: Option<i32>,
    product: Option<String>,
    grower: Option<String>,
    sort: Option<String>,
    output_dir: &Path,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => ReportConfig::from_file(&path)?,
        None => ReportConfig::default(),
    };

    // CLI flags override the config file.
    if let Some(name) = method {
        config.forecast.method = parse_method(&name)?;
    }
    if let Some(level) = confidence {
        config.forecast.confidence = level;
    }
    if let Some(year) = target_year {
        config.forecast.target_year = Some(year);
    }
    if product.is_some() {
        config.filter.product = product;
    }
    if grower.is_some() {
        config.filter.grower = grower;
    }
    if let Some(key) = sort {
        config.filter.sort = parse_sort(&key)?;
    }

    let imported = load_input(input)?;
    if imported.skipped_rows > 0 {
        eprintln!("Skipped {} malformed row(s)", imported.skipped_rows);
    }

    let report = build_dashboard(&imported.transactions, &config);
    print_summary(&report);

    let run_dir = save_artifacts(&report, &imported.transactions, output_dir)?;
    println!("Artifacts saved to: {}", run_dir.display());

    Ok(())
}

fn run_forecast(
    input: &Path,
    method: &str,
    confidence: f64,
    target_year: Option<i32>,
    first_year: i32,
    last_year: i32,
) -> Result<()> {
    let mut config = ReportConfig::default();
    config.analysis.first_year = first_year;
    config.analysis.last_year = last_year;
    config.forecast.method = parse_method(method)?;
    config.forecast.confidence = confidence;
    config.forecast.target_year = target_year;

    let imported = load_input(input)?;
    let report = build_dashboard(&imported.transactions, &config);
    let f = &report.forecast;

    println!("=== Forecast {} ===", f.target_year);
    println!(
        "Method:     {:?} at {:.0}% confidence",
        f.method,
        f.confidence.as_fraction() * 100.0
    );
    println!(
        "Revenue:    ${:.2}  (${:.2} – ${:.2})",
        f.revenue.value, f.revenue.low, f.revenue.high
    );
    println!(
        "Growers:    {:.1}  ({:.1} – {:.1})",
        f.growers.value, f.growers.low, f.growers.high
    );

    Ok(())
}

fn run_export(input: &Path, output: &Path) -> Result<()> {
    let imported = load_input(input)?;
    let csv = export_transactions_csv(&imported.transactions)?;
    std::fs::write(output, &csv)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!(
        "Wrote {} record(s) to {} ({} skipped)",
        imported.transactions.len(),
        output.display(),
        imported.skipped_rows
    );
    Ok(())
}

fn print_summary(report: &DashboardReport) {
    println!();
    println!("=== Sales Dashboard ===");
    println!(
        "Window:         {}–{}",
        report.first_year, report.last_year
    );
    println!("Transactions:   {}", report.transaction_count);
    println!("Dataset Hash:   {}", report.dataset_hash);
    println!();
    println!("--- Yearly ---");
    for s in &report.yearly {
        println!(
            "{}:  ${:>12.2}  {:>5} orders  {:>4} growers",
            s.year, s.revenue, s.order_count, s.grower_count
        );
    }
    println!();
    println!("--- Retention ---");
    for c in &report.retention {
        println!(
            "{}:  {:>3} new  {:>3} returning  {:>3} lost  {:>5.1}%",
            c.year,
            c.new.len(),
            c.returning.len(),
            c.lost.len(),
            c.retention_rate
        );
    }
    println!();
    println!("--- Top Products ---");
    for p in report.product_mix.iter().take(5) {
        println!("{:<16} ${:>12.2}  {:>5.1}%", p.product, p.revenue, p.share_pct);
    }
    println!();
    println!("--- Forecast {} ---", report.forecast.target_year);
    println!(
        "Revenue:        ${:.2}  (${:.2} – ${:.2})",
        report.forecast.revenue.value,
        report.forecast.revenue.low,
        report.forecast.revenue.high
    );
    println!(
        "Growers:        {:.1}  ({:.1} – {:.1})",
        report.forecast.growers.value,
        report.forecast.growers.low,
        report.forecast.growers.high
    );
    println!();
}
