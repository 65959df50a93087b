use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::Tolerance;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// The three ledgers that feed a reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerKind {
    Purchases,
    Sales,
    Stock,
}

impl LedgerKind {
    pub const ALL: [LedgerKind; 3] = [Self::Purchases, Self::Sales, Self::Stock];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Purchases => "purchases",
            Self::Sales => "sales",
            Self::Stock => "stock",
        }
    }

    /// Quantity column name used by the ledger exports when no mapping is given.
    pub fn default_quantity_column(&self) -> &'static str {
        match self {
            Self::Purchases => "quantidade_comprada",
            Self::Sales => "quantidade_vendida",
            Self::Stock => "quantidade_em_estoque",
        }
    }
}

impl std::fmt::Display for LedgerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw table as read from a file: header names plus text cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new<H, S>(headers: H) -> Self
    where
        H: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Cells are matched to headers by position.
    pub fn push_row<R, S>(&mut self, row: R)
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    pub fn with_row<R, S>(mut self, row: R) -> Self
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_row(row);
        self
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Raw tables for one reconciliation run. An absent ledger reads as empty.
#[derive(Debug, Clone, Default)]
pub struct ReconInput {
    pub purchases: Option<RawTable>,
    pub sales: Option<RawTable>,
    pub stock: Option<RawTable>,
}

impl ReconInput {
    pub fn table(&self, kind: LedgerKind) -> Option<&RawTable> {
        match kind {
            LedgerKind::Purchases => self.purchases.as_ref(),
            LedgerKind::Sales => self.sales.as_ref(),
            LedgerKind::Stock => self.stock.as_ref(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.purchases.is_some() && self.sales.is_some() && self.stock.is_some()
    }
}

// ---------------------------------------------------------------------------
// Normalized rows + aggregation
// ---------------------------------------------------------------------------

/// One normalized ledger row. `date` is `None` when the cell was blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRow {
    pub date: Option<NaiveDate>,
    pub product: String,
    pub quantity: i64,
}

/// Summed activity of one product on one date.
///
/// `stock` is `None` when no reading was taken that day, which is distinct
/// from a reading of zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayActivity {
    pub purchased: i64,
    pub sold: i64,
    pub stock: Option<i64>,
}

/// Per-product, date-ordered activity.
pub type Timelines = BTreeMap<String, BTreeMap<NaiveDate, DayActivity>>;

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum DiscrepancyKind {
    /// Stock is higher than expected and no purchase was recorded.
    #[serde(rename = "falta_registro_compra")]
    MissingPurchase,
    /// Stock is lower than expected and no sale was recorded.
    #[serde(rename = "falta_registro_venda")]
    MissingSale,
    /// Stock disagrees with recorded movements in the same direction.
    #[serde(rename = "erro_lancamento_estoque")]
    StockEntryError,
    /// Movements exist but no stock reading has anchored the product yet.
    #[serde(rename = "sem_baseline")]
    NoBaseline,
    /// Movements exist but that day's stock reading is missing.
    #[serde(rename = "estoque_nao_informado")]
    StockNotReported,
}

impl DiscrepancyKind {
    pub const ALL: [DiscrepancyKind; 5] = [
        Self::MissingPurchase,
        Self::MissingSale,
        Self::StockEntryError,
        Self::NoBaseline,
        Self::StockNotReported,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            Self::MissingPurchase => "falta_registro_compra",
            Self::MissingSale => "falta_registro_venda",
            Self::StockEntryError => "erro_lancamento_estoque",
            Self::NoBaseline => "sem_baseline",
            Self::StockNotReported => "estoque_nao_informado",
        }
    }

    /// Kinds produced by a deviation beyond tolerance, as opposed to missing data.
    pub fn is_deviation(&self) -> bool {
        matches!(
            self,
            Self::MissingPurchase | Self::MissingSale | Self::StockEntryError
        )
    }
}

impl std::fmt::Display for DiscrepancyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for DiscrepancyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.tag() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|k| k.tag()).collect();
                format!("unknown discrepancy kind '{s}' (expected one of: {})", known.join(", "))
            })
    }
}

/// One flagged (product, date). Never mutated after the engine emits it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Discrepancy {
    pub product: String,
    pub date: NaiveDate,
    pub stock_before: Option<i64>,
    pub purchased: i64,
    pub sold: i64,
    pub stock_recorded: Option<i64>,
    pub stock_expected: Option<i64>,
    pub difference: Option<i64>,
    pub kind: DiscrepancyKind,
    pub suggestion: String,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub total: usize,
    pub products_flagged: usize,
    pub by_kind: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub config_name: String,
    pub tolerance: Tolerance,
    pub products_checked: usize,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconReport {
    pub meta: ReportMeta,
    pub summary: ReportSummary,
    pub discrepancies: Vec<Discrepancy>,
}
