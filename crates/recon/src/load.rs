//! CSV → `RawTable`.

use std::path::Path;

use crate::error::ReconError;
use crate::model::{LedgerKind, RawTable};

/// Parse CSV text with a header row into a raw table.
///
/// Cells are trimmed and rows may be shorter or longer than the header. Text
/// with no header row yields a table without columns.
pub fn read_csv_table(ledger: LedgerKind, csv_data: &str) -> Result<RawTable, ReconError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(csv_data.as_bytes());

    let csv_err = |e: csv::Error| ReconError::Csv {
        origin: format!("{ledger} ledger"),
        message: e.to_string(),
    };

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        rows.push(record.iter().map(|v| v.to_string()).collect());
    }

    log::debug!("{ledger}: read {} rows, columns {:?}", rows.len(), headers);
    Ok(RawTable { headers, rows })
}

pub fn read_csv_file(ledger: LedgerKind, path: &Path) -> Result<RawTable, ReconError> {
    let csv_data = std::fs::read_to_string(path)
        .map_err(|e| ReconError::Io(format!("cannot read {}: {e}", path.display())))?;
    read_csv_table(ledger, &csv_data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_csv_basic() {
        let csv = "\
data,produto,quantidade_comprada
2025-09-01,Parafuso,100
2025-09-03, Parafuso ,20
";
        let table = read_csv_table(LedgerKind::Purchases, csv).unwrap();
        assert_eq!(table.headers, vec!["data", "produto", "quantidade_comprada"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1], vec!["2025-09-03", "Parafuso", "20"]);
    }

    #[test]
    fn ragged_rows_are_accepted() {
        let csv = "data,produto,quantidade_vendida\n2025-09-02,Parafuso\n";
        let table = read_csv_table(LedgerKind::Sales, csv).unwrap();
        assert_eq!(table.rows[0].len(), 2);
    }

    #[test]
    fn empty_text_has_no_columns() {
        let table = read_csv_table(LedgerKind::Stock, "").unwrap();
        assert!(table.headers.is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn quoted_fields() {
        let csv = "data,produto,quantidade_em_estoque\n2025-09-01,\"Parafuso, 6mm\",10\n";
        let table = read_csv_table(LedgerKind::Stock, csv).unwrap();
        assert_eq!(table.rows[0][1], "Parafuso, 6mm");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_csv_file(LedgerKind::Stock, &dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, ReconError::Io(_)));
    }

    #[test]
    fn reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("estoque.csv");
        std::fs::write(&path, "data,produto,quantidade_em_estoque\n2025-09-01,Porca,45\n").unwrap();
        let table = read_csv_file(LedgerKind::Stock, &path).unwrap();
        assert_eq!(table.rows, vec![vec!["2025-09-01", "Porca", "45"]]);
    }
}
