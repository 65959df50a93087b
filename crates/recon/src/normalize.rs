//! Coerce raw ledger tables into typed `LedgerRow`s.
//!
//! The output carries exactly the required columns (date, product, quantity)
//! regardless of what else the input had.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::config::LedgerSchema;
use crate::error::ReconError;
use crate::model::{LedgerKind, LedgerRow, RawTable};

/// Date formats tried when the config does not list its own.
pub const DEFAULT_DATE_FORMATS: [&str; 4] = [
    "%Y-%m-%d",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d/%m/%Y",
];

/// Product value used when the product column is missing entirely.
pub const FILLED_PRODUCT: &str = "0";

#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    pub date_formats: Vec<String>,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Normalize one ledger table.
///
/// An absent table yields no rows. A table without the date column is rejected
/// even when it has no data rows.
pub fn normalize(
    table: Option<&RawTable>,
    kind: LedgerKind,
    schema: &LedgerSchema,
    options: &NormalizeOptions,
) -> Result<Vec<LedgerRow>, ReconError> {
    let Some(table) = table else {
        return Ok(Vec::new());
    };

    let date_idx = table.column_index(&schema.date).ok_or_else(|| ReconError::MissingColumn {
        ledger: kind,
        column: schema.date.clone(),
    })?;
    let product_idx = table.column_index(&schema.product);
    let quantity_idx = table.column_index(&schema.quantity);

    if product_idx.is_none() {
        log::warn!(
            "{kind} ledger: column '{}' not found, filling with '{FILLED_PRODUCT}'",
            schema.product
        );
    }
    if quantity_idx.is_none() {
        log::warn!("{kind} ledger: column '{}' not found, filling with 0", schema.quantity);
    }

    let cell = |row: &[String], idx: Option<usize>| -> String {
        idx.and_then(|i| row.get(i))
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    };

    let mut rows = Vec::with_capacity(table.rows.len());
    for (i, raw) in table.rows.iter().enumerate() {
        let row_no = i + 1;

        let date_str = cell(raw, Some(date_idx));
        let date = parse_date(&date_str, &options.date_formats).map_err(|_| {
            ReconError::UnparsableDate {
                ledger: kind,
                row: row_no,
                value: date_str.clone(),
            }
        })?;

        let product = match product_idx {
            Some(_) => cell(raw, product_idx),
            None => FILLED_PRODUCT.to_string(),
        };

        let qty_str = cell(raw, quantity_idx);
        let quantity = parse_quantity(&qty_str).ok_or_else(|| ReconError::UnparsableQuantity {
            ledger: kind,
            row: row_no,
            value: qty_str.clone(),
        })?;

        rows.push(LedgerRow {
            date,
            product,
            quantity,
        });
    }

    Ok(rows)
}

/// Parse a date cell. Blank → `Ok(None)`; time-of-day is discarded.
pub fn parse_date(value: &str, formats: &[String]) -> Result<Option<NaiveDate>, ()> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    for fmt in formats {
        if let Ok(d) = NaiveDate::parse_from_str(value, fmt) {
            return Ok(Some(d));
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(Some(dt.date()));
        }
    }

    DateTime::parse_from_rfc3339(value)
        .map(|dt| Some(dt.date_naive()))
        .map_err(|_| ())
}

/// Parse a quantity cell. Blank reads as 0; integral decimals like `"100.0"`
/// are accepted.
pub fn parse_quantity(value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        return Some(0);
    }
    if let Ok(n) = value.parse::<i64>() {
        return Some(n);
    }
    let f: f64 = value.parse().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn purchases_schema() -> LedgerSchema {
        LedgerSchema::default_for(LedgerKind::Purchases)
    }

    #[test]
    fn absent_table_is_empty() {
        let rows = normalize(
            None,
            LedgerKind::Purchases,
            &purchases_schema(),
            &NormalizeOptions::default(),
        )
        .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn basic_rows_and_extra_columns_dropped() {
        let table = RawTable::new(["obs", "produto", "data", "quantidade_comprada"])
            .with_row(["first", "Parafuso", "2025-09-01", "100"])
            .with_row(["", " Porca ", "2025-09-02", " 50 "]);
        let rows = normalize(
            Some(&table),
            LedgerKind::Purchases,
            &purchases_schema(),
            &NormalizeOptions::default(),
        )
        .unwrap();
        assert_eq!(
            rows,
            vec![
                LedgerRow {
                    date: Some(d("2025-09-01")),
                    product: "Parafuso".into(),
                    quantity: 100,
                },
                LedgerRow {
                    date: Some(d("2025-09-02")),
                    product: "Porca".into(),
                    quantity: 50,
                },
            ]
        );
    }

    #[test]
    fn missing_date_column_is_fatal_even_when_empty() {
        let table = RawTable::new(["produto", "quantidade_em_estoque"]);
        let err = normalize(
            Some(&table),
            LedgerKind::Stock,
            &LedgerSchema::default_for(LedgerKind::Stock),
            &NormalizeOptions::default(),
        )
        .unwrap_err();
        match err {
            ReconError::MissingColumn { ledger, column } => {
                assert_eq!(ledger, LedgerKind::Stock);
                assert_eq!(column, "data");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_quantity_and_product_are_filled() {
        let table = RawTable::new(["data"]).with_row(["2025-09-01"]);
        let rows = normalize(
            Some(&table),
            LedgerKind::Sales,
            &LedgerSchema::default_for(LedgerKind::Sales),
            &NormalizeOptions::default(),
        )
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].product, FILLED_PRODUCT);
        assert_eq!(rows[0].quantity, 0);
    }

    #[test]
    fn unparsable_date_reports_row() {
        let table = RawTable::new(["data", "produto", "quantidade_comprada"])
            .with_row(["2025-09-01", "A", "1"])
            .with_row(["ontem", "A", "1"]);
        let err = normalize(
            Some(&table),
            LedgerKind::Purchases,
            &purchases_schema(),
            &NormalizeOptions::default(),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "purchases ledger, row 2: cannot parse date 'ontem'"
        );
    }

    #[test]
    fn unparsable_quantity_reports_row() {
        let table = RawTable::new(["data", "produto", "quantidade_comprada"])
            .with_row(["2025-09-01", "A", "dez"]);
        let err = normalize(
            Some(&table),
            LedgerKind::Purchases,
            &purchases_schema(),
            &NormalizeOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ReconError::UnparsableQuantity { row: 1, .. }));
    }

    #[test]
    fn blank_date_becomes_none() {
        let table = RawTable::new(["data", "produto", "quantidade_comprada"])
            .with_row(["", "A", "1"]);
        let rows = normalize(
            Some(&table),
            LedgerKind::Purchases,
            &purchases_schema(),
            &NormalizeOptions::default(),
        )
        .unwrap();
        assert_eq!(rows[0].date, None);
    }

    #[test]
    fn date_formats() {
        let formats: Vec<String> = DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect();
        assert_eq!(parse_date("2025-09-03", &formats), Ok(Some(d("2025-09-03"))));
        assert_eq!(parse_date("2025-09-03 17:45:00", &formats), Ok(Some(d("2025-09-03"))));
        assert_eq!(parse_date("2025-09-03T08:00:00", &formats), Ok(Some(d("2025-09-03"))));
        assert_eq!(parse_date("03/09/2025", &formats), Ok(Some(d("2025-09-03"))));
        assert_eq!(
            parse_date("2025-09-03T23:10:00-03:00", &formats),
            Ok(Some(d("2025-09-03")))
        );
        assert_eq!(parse_date("  ", &formats), Ok(None));
        assert!(parse_date("2025-13-40", &formats).is_err());
    }

    #[test]
    fn quantities() {
        assert_eq!(parse_quantity("42"), Some(42));
        assert_eq!(parse_quantity("-7"), Some(-7));
        assert_eq!(parse_quantity(""), Some(0));
        assert_eq!(parse_quantity("100.0"), Some(100));
        assert_eq!(parse_quantity("2.5"), None);
        assert_eq!(parse_quantity("NaN"), None);
        assert_eq!(parse_quantity("x"), None);
    }
}
