//! Built-in example ledgers, offered when the caller has no files of its own.

use crate::model::{LedgerKind, RawTable, ReconInput};

const PURCHASES: &[(&str, &str, &str)] = &[
    ("2025-09-01", "Parafuso", "100"),
    ("2025-09-03", "Parafuso", "20"),
    ("2025-09-02", "Porca", "50"),
];

const SALES: &[(&str, &str, &str)] = &[
    ("2025-09-02", "Parafuso", "10"),
    ("2025-09-03", "Parafuso", "5"),
    ("2025-09-04", "Parafuso", "30"),
    ("2025-09-03", "Porca", "5"),
];

const STOCK: &[(&str, &str, &str)] = &[
    ("2025-09-01", "Parafuso", "100"),
    ("2025-09-03", "Parafuso", "105"),
    ("2025-09-04", "Parafuso", "70"),
    ("2025-09-02", "Porca", "50"),
    ("2025-09-03", "Porca", "45"),
];

pub fn sample_table(kind: LedgerKind) -> RawTable {
    let rows = match kind {
        LedgerKind::Purchases => PURCHASES,
        LedgerKind::Sales => SALES,
        LedgerKind::Stock => STOCK,
    };
    let mut table = RawTable::new(["data", "produto", kind.default_quantity_column()]);
    for (date, product, qty) in rows {
        table.push_row([*date, *product, *qty]);
    }
    table
}

pub fn sample_input() -> ReconInput {
    ReconInput {
        purchases: Some(sample_table(LedgerKind::Purchases)),
        sales: Some(sample_table(LedgerKind::Sales)),
        stock: Some(sample_table(LedgerKind::Stock)),
    }
}
