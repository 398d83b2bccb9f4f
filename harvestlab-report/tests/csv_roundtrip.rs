//! CSV round-trip: exporting a transaction set and re-parsing it must
//! reproduce the same records (modulo string/number formatting).

use chrono::NaiveDate;
use harvestlab_core::data::parse_transactions_csv;
use harvestlab_core::domain::Transaction;
use harvestlab_report::export_transactions_csv;

fn tx(
    date: (i32, u32, u32),
    invoice: &str,
    grower: &str,
    product: &str,
    qty: f64,
    amount: f64,
) -> Transaction {
    Transaction {
        date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        invoice_number: invoice.into(),
        grower_name: grower.into(),
        product: product.into(),
        quantity: qty,
        amount,
        extra: Default::default(),
    }
}

#[test]
fn roundtrip_reproduces_records() {
    let original = vec![
        tx((2023, 4, 10), "INV-1", "Miller Farms", "Corn Seed", 100.0, 12_000.0),
        tx((2024, 5, 2), "INV-2", "Anders Brothers", "Herbicide", 2.5, 3_000.50),
        tx((2024, 6, 30), "INV-3", "Hofmann Ag", "Fertilizer", 500.0, 4_300.25),
    ];

    let csv = export_transactions_csv(&original).unwrap();
    let reparsed = parse_transactions_csv(&csv);

    assert_eq!(reparsed.skipped_rows, 0);
    assert_eq!(reparsed.transactions, original);
}

#[test]
fn roundtrip_preserves_embedded_commas_and_quotes() {
    let original = vec![
        tx((2023, 4, 10), "INV-1", "Miller, Sons & Co", "Corn Seed", 10.0, 1_000.0),
        tx((2023, 4, 11), "INV-2", "\"Prairie\" View", "Other", 1.0, 50.0),
    ];

    let csv = export_transactions_csv(&original).unwrap();
    let reparsed = parse_transactions_csv(&csv);

    assert_eq!(reparsed.transactions, original);
}

#[test]
fn roundtrip_of_empty_set_is_header_only() {
    let csv = export_transactions_csv(&[]).unwrap();
    assert_eq!(csv.lines().count(), 1);
    let reparsed = parse_transactions_csv(&csv);
    assert!(reparsed.transactions.is_empty());
    assert_eq!(reparsed.skipped_rows, 0);
}

#[test]
fn double_roundtrip_is_stable() {
    let original = vec![
        tx((2023, 4, 10), "INV-1", "Miller Farms", "Corn Seed", 100.0, 12_000.0),
        tx((2025, 1, 2), "INV-2", "Keller & Sons", "Equipment", 1.0, 85_000.0),
    ];

    let once = export_transactions_csv(&original).unwrap();
    let twice = export_transactions_csv(&parse_transactions_csv(&once).transactions).unwrap();
    assert_eq!(once, twice);
}
