//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Code | Domain    | Description                                        |
//! |------|-----------|----------------------------------------------------|
//! | 0    | Universal | Success, report empty                              |
//! | 1    | recon     | Discrepancies found (like `diff(1)`)               |
//! | 2    | Universal | CLI usage error (bad args, missing ledger files)   |
//! | 3    | recon     | Invalid config or tolerance                        |
//! | 4    | recon     | Input data error (missing column, bad date/qty)    |
//! |      |           | or a quantity sum overflowing i64                  |
//! | 5    | recon     | IO error reading inputs or writing outputs         |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into `recon_exit_code` or the relevant command

use stockcheck_recon::ReconError;

/// Success - command completed, nothing to report.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Report contains at least one discrepancy.
pub const EXIT_RECON_DISCREPANCIES: u8 = 1;

/// Config could not be parsed/validated, or the tolerance was rejected.
pub const EXIT_RECON_INVALID_CONFIG: u8 = 3;

/// A ledger table is malformed. No report is produced.
pub const EXIT_RECON_INPUT: u8 = 4;

/// Cannot read a ledger/config or write an output file.
pub const EXIT_RECON_IO: u8 = 5;

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_)
        | ReconError::ConfigValidation(_)
        | ReconError::InvalidTolerance(_) => EXIT_RECON_INVALID_CONFIG,
        ReconError::Io(_) => EXIT_RECON_IO,
        ReconError::MissingColumn { .. }
        | ReconError::UnparsableDate { .. }
        | ReconError::UnparsableQuantity { .. }
        | ReconError::QuantityOverflow { .. }
        | ReconError::Csv { .. } => EXIT_RECON_INPUT,
    }
}
