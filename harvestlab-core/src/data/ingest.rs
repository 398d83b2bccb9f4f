//! CSV ingestion — tolerant parsing of dirty transaction exports.
//!
//! The import contract is hard: no input shape aborts the import. Malformed
//! rows are skipped and counted; missing or unparsable numeric fields become
//! 0; unknown product categories pass through. Column order is fixed:
//! `date, invoice_number, grower_name, product, quantity, amount`, with any
//! further named columns preserved in the extension map.

use chrono::NaiveDate;

use crate::domain::Transaction;

/// Outcome of one import pass.
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub transactions: Vec<Transaction>,
    /// Rows dropped for having fewer than 6 fields, an unparsable date, or
    /// an empty grower/product.
    pub skipped_rows: usize,
}

/// Parse CSV text into transactions. Never fails.
///
/// The first line is scanned for "date"/"invoice" to detect an optional
/// header row, and for a tab character to choose the delimiter. Quoted
/// commas are handled by the csv reader for comma-delimited input.
pub fn parse_transactions_csv(text: &str) -> ImportResult {
    let first_line = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    let delimiter = if first_line.contains('\t') { b'\t' } else { b',' };
    let lowered = first_line.to_lowercase();
    let has_header = lowered.contains("date") || lowered.contains("invoice");

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut result = ImportResult::default();
    let mut header: Option<Vec<String>> = None;
    let mut saw_first = false;

    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(_) => {
                result.skipped_rows += 1;
                continue;
            }
        };

        if !saw_first {
            saw_first = true;
            if has_header {
                header = Some(record.iter().map(|f| f.trim().to_string()).collect());
                continue;
            }
        }

        // Blank lines come through as a single empty field.
        if record.len() == 1 && record.get(0).map(str::trim) == Some("") {
            continue;
        }

        // A row qualifies only with at least 6 delimited fields.
        if record.len() < 6 {
            result.skipped_rows += 1;
            continue;
        }

        let date = match parse_date(record.get(0).unwrap_or("")) {
            Some(d) => d,
            None => {
                result.skipped_rows += 1;
                continue;
            }
        };
        let grower_name = record.get(2).unwrap_or("").trim().to_string();
        let product = record.get(3).unwrap_or("").trim().to_string();
        if grower_name.is_empty() || product.is_empty() {
            result.skipped_rows += 1;
            continue;
        }

        let mut tx = Transaction {
            date,
            invoice_number: record.get(1).unwrap_or("").trim().to_string(),
            grower_name,
            product,
            quantity: parse_number(record.get(4).unwrap_or("")),
            amount: parse_money(record.get(5).unwrap_or("")),
            extra: Default::default(),
        };

        // Extra named columns survive only when a header names them.
        if let Some(names) = &header {
            for (i, name) in names.iter().enumerate().skip(6) {
                if name.is_empty() {
                    continue;
                }
                if let Some(value) = record.get(i) {
                    let value = value.trim();
                    if !value.is_empty() {
                        tx.extra.insert(name.clone(), value.to_string());
                    }
                }
            }
        }

        result.transactions.push(tx);
    }

    result
}

/// Accepted date formats: ISO, US long year, US short year.
fn parse_date(field: &str) -> Option<NaiveDate> {
    let field = field.trim();
    for format in ["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"] {
        if let Ok(date) = NaiveDate::parse_from_str(field, format) {
            return Some(date);
        }
    }
    None
}

/// Monetary parse: strip `$` and thousands separators, then parse.
/// Unparsable or negative values become 0.
pub(crate) fn parse_money(field: &str) -> f64 {
    let cleaned: String = field
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    parse_number(&cleaned)
}

/// Plain numeric parse with the same defaulting rules as money.
pub(crate) fn parse_number(field: &str) -> f64 {
    let cleaned = field.trim().replace(',', "");
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => v,
        _ => 0.0,
    }
}
