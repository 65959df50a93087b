use serde::{Deserialize, Serialize};

use crate::error::ReconError;
use crate::model::LedgerKind;
use crate::normalize::{NormalizeOptions, DEFAULT_DATE_FORMATS};

// ---------------------------------------------------------------------------
// Tolerance
// ---------------------------------------------------------------------------

/// Maximum absolute deviation treated as noise. Never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Tolerance(i64);

impl Tolerance {
    pub const ZERO: Tolerance = Tolerance(0);

    pub fn new(value: i64) -> Result<Self, ReconError> {
        if value < 0 {
            return Err(ReconError::InvalidTolerance(value.to_string()));
        }
        Ok(Self(value))
    }

    /// Parse user input such as a CLI flag or form field.
    pub fn parse(input: &str) -> Result<Self, ReconError> {
        let trimmed = input.trim();
        let value: i64 = trimmed
            .parse()
            .map_err(|_| ReconError::InvalidTolerance(input.to_string()))?;
        Self::new(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// True when `diff` lies strictly outside the tolerance band.
    pub fn is_exceeded_by(&self, diff: i64) -> bool {
        diff.unsigned_abs() > self.0 as u64
    }
}

impl std::fmt::Display for Tolerance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ReconConfig {
    pub name: String,
    #[serde(default)]
    pub tolerance: i64,
    #[serde(default)]
    pub ledgers: LedgersConfig,
    #[serde(default)]
    pub dates: Option<DateConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Ledger sources. A ledger left out of the config is reconciled as empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LedgersConfig {
    #[serde(default)]
    pub purchases: Option<LedgerConfig>,
    #[serde(default)]
    pub sales: Option<LedgerConfig>,
    #[serde(default)]
    pub stock: Option<LedgerConfig>,
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    pub file: String,
    #[serde(default)]
    pub columns: ColumnMapping,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ColumnMapping {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub quantity: Option<String>,
}

/// Effective column names for one ledger, in required order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSchema {
    pub date: String,
    pub product: String,
    pub quantity: String,
}

impl LedgerSchema {
    pub fn default_for(kind: LedgerKind) -> Self {
        Self {
            date: "data".into(),
            product: "produto".into(),
            quantity: kind.default_quantity_column().into(),
        }
    }

    pub fn columns(&self) -> [&str; 3] {
        [&self.date, &self.product, &self.quantity]
    }
}

impl LedgerConfig {
    pub fn schema(&self, kind: LedgerKind) -> LedgerSchema {
        let defaults = LedgerSchema::default_for(kind);
        LedgerSchema {
            date: self.columns.date.clone().unwrap_or(defaults.date),
            product: self.columns.product.clone().unwrap_or(defaults.product),
            quantity: self.columns.quantity.clone().unwrap_or(defaults.quantity),
        }
    }
}

// ---------------------------------------------------------------------------
// Dates + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct DateConfig {
    pub formats: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub json: Option<String>,
    #[serde(default)]
    pub csv: Option<String>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        Tolerance::new(self.tolerance)?;

        for kind in LedgerKind::ALL {
            let Some(ledger) = self.ledger(kind) else {
                continue;
            };
            if ledger.file.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "ledger '{kind}': file must not be empty"
                )));
            }
            let schema = ledger.schema(kind);
            let cols = schema.columns();
            if cols.iter().any(|c| c.trim().is_empty()) {
                return Err(ReconError::ConfigValidation(format!(
                    "ledger '{kind}': column names must not be empty"
                )));
            }
            if cols[0] == cols[1] || cols[0] == cols[2] || cols[1] == cols[2] {
                return Err(ReconError::ConfigValidation(format!(
                    "ledger '{kind}': date, product and quantity columns must be distinct"
                )));
            }
        }

        if let Some(ref dates) = self.dates {
            if dates.formats.is_empty() {
                return Err(ReconError::ConfigValidation(
                    "dates.formats must list at least one format".into(),
                ));
            }
        }

        Ok(())
    }

    pub fn ledger(&self, kind: LedgerKind) -> Option<&LedgerConfig> {
        match kind {
            LedgerKind::Purchases => self.ledgers.purchases.as_ref(),
            LedgerKind::Sales => self.ledgers.sales.as_ref(),
            LedgerKind::Stock => self.ledgers.stock.as_ref(),
        }
    }

    /// Schema for a ledger, falling back to the default column names.
    pub fn schema(&self, kind: LedgerKind) -> LedgerSchema {
        self.ledger(kind)
            .map(|l| l.schema(kind))
            .unwrap_or_else(|| LedgerSchema::default_for(kind))
    }

    pub fn tolerance(&self) -> Result<Tolerance, ReconError> {
        Tolerance::new(self.tolerance)
    }

    pub fn normalize_options(&self) -> NormalizeOptions {
        match self.dates {
            Some(ref dates) => NormalizeOptions {
                date_formats: dates.formats.clone(),
            },
            None => NormalizeOptions {
                date_formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
            },
        }
    }

    pub fn configured_ledgers(&self) -> usize {
        LedgerKind::ALL.iter().filter(|k| self.ledger(**k).is_some()).count()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
