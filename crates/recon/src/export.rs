use std::io::Write;

use crate::error::ReconError;
use crate::model::Discrepancy;

/// Header row of the exported report. Matches the ledger exports' naming.
pub const REPORT_HEADERS: [&str; 10] = [
    "produto",
    "data",
    "estoque_anterior",
    "compras",
    "vendas",
    "estoque_atual",
    "estoque_esperado",
    "diferenca",
    "tipo_discrepancia",
    "sugestao",
];

/// Write report rows as CSV. Absent values become empty cells.
pub fn write_report_csv<W: Write>(writer: W, records: &[&Discrepancy]) -> Result<(), ReconError> {
    let mut wtr = csv::Writer::from_writer(writer);
    let io_err = |e: csv::Error| ReconError::Io(format!("CSV export: {e}"));

    wtr.write_record(REPORT_HEADERS).map_err(io_err)?;
    for r in records {
        wtr.write_record([
            r.product.clone(),
            r.date.format("%Y-%m-%d").to_string(),
            opt(r.stock_before),
            r.purchased.to_string(),
            r.sold.to_string(),
            opt(r.stock_recorded),
            opt(r.stock_expected),
            opt(r.difference),
            r.kind.tag().to_string(),
            r.suggestion.clone(),
        ])
        .map_err(io_err)?;
    }
    wtr.flush()
        .map_err(|e| ReconError::Io(format!("CSV export: {e}")))?;
    Ok(())
}

fn opt(v: Option<i64>) -> String {
    v.map(|n| n.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DiscrepancyKind;
    use chrono::NaiveDate;

    #[test]
    fn export_rows() {
        let records = vec![
            Discrepancy {
                product: "Parafuso".into(),
                date: NaiveDate::from_ymd_opt(2025, 9, 2).unwrap(),
                stock_before: Some(100),
                purchased: 0,
                sold: 10,
                stock_recorded: None,
                stock_expected: Some(90),
                difference: None,
                kind: DiscrepancyKind::StockNotReported,
                suggestion: "Stock record missing.".into(),
            },
            Discrepancy {
                product: "Porca, M6".into(),
                date: NaiveDate::from_ymd_opt(2025, 9, 2).unwrap(),
                stock_before: Some(50),
                purchased: 50,
                sold: 0,
                stock_recorded: Some(50),
                stock_expected: Some(100),
                difference: Some(-50),
                kind: DiscrepancyKind::MissingSale,
                suggestion: "Suggest adding a sale of 50 units.".into(),
            },
        ];
        let refs: Vec<&Discrepancy> = records.iter().collect();

        let mut buf = Vec::new();
        write_report_csv(&mut buf, &refs).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], REPORT_HEADERS.join(","));
        assert_eq!(
            lines[1],
            "Parafuso,2025-09-02,100,0,10,,90,,estoque_nao_informado,Stock record missing."
        );
        assert_eq!(
            lines[2],
            "\"Porca, M6\",2025-09-02,50,50,0,50,100,-50,falta_registro_venda,Suggest adding a sale of 50 units."
        );
    }

    #[test]
    fn empty_export_has_header_only() {
        let mut buf = Vec::new();
        write_report_csv(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap().lines().count(), 1);
    }
}
