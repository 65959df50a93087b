//! `stockcheck-recon` — purchase/sale/stock ledger reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded tables, returns a classified report.
//! No CLI dependencies. CSV loading and export live here so every front end
//! reads and writes the same shapes.

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod filter;
pub mod load;
pub mod model;
pub mod normalize;
pub mod sample;
pub mod summary;

pub use config::{ReconConfig, Tolerance};
pub use engine::{reconcile, reconcile_rows, run};
pub use error::ReconError;
pub use filter::ReportFilter;
pub use model::{
    Discrepancy, DiscrepancyKind, LedgerKind, RawTable, ReconInput, ReconReport,
};
