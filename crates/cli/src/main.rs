// stockcheck - reconcile purchase, sale and stock ledgers from the shell

mod exit_codes;
mod logging;
mod recon;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{EXIT_SUCCESS, EXIT_USAGE};
use recon::{FilterArgs, LedgerFiles, OutputArgs};

#[derive(Parser)]
#[command(name = "stockcheck")]
#[command(about = "Find days where recorded stock disagrees with purchases and sales")]
#[command(version)]
struct Cli {
    /// Log filter directives (e.g. info, stockcheck_recon=debug)
    #[arg(long, global = true, env = "STOCKCHECK_LOG")]
    log: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile the ledgers named in a config file (exit 0 = clean, exit 1 = discrepancies)
    #[command(after_help = "\
Ledger paths in the config are resolved relative to the config file.

Examples:
  stockcheck run loja.recon.toml
  stockcheck run loja.recon.toml --json
  stockcheck run loja.recon.toml --tolerance 5 --output report.json
  stockcheck run loja.recon.toml --kind erro_lancamento_estoque --csv erros.csv")]
    Run {
        /// Path to .recon.toml config file
        config: PathBuf,

        /// Override the config's tolerance (whole units)
        #[arg(long)]
        tolerance: Option<String>,

        /// Print the JSON report to stdout instead of a table
        #[arg(long)]
        json: bool,

        /// Write the JSON report to this file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Write the (filtered) records as CSV to this file
        #[arg(long)]
        csv: Option<PathBuf>,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Reconcile three CSV files using the default column names
    #[command(after_help = "\
Expected columns: data, produto and quantidade_comprada / quantidade_vendida /
quantidade_em_estoque.

Examples:
  stockcheck check --purchases compras.csv --sales vendas.csv --stock estoque.csv
  stockcheck check --example --tolerance 2
  stockcheck check --example --json --product Parafuso")]
    Check {
        /// Purchases ledger (CSV)
        #[arg(long)]
        purchases: Option<PathBuf>,

        /// Sales ledger (CSV)
        #[arg(long)]
        sales: Option<PathBuf>,

        /// Stock readings ledger (CSV)
        #[arg(long)]
        stock: Option<PathBuf>,

        /// Absolute tolerance for stock differences (whole units)
        #[arg(long, default_value = "0")]
        tolerance: String,

        /// Use the built-in example ledgers when files are missing
        #[arg(long)]
        example: bool,

        /// Print the JSON report to stdout instead of a table
        #[arg(long)]
        json: bool,

        /// Write the JSON report to this file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Write the (filtered) records as CSV to this file
        #[arg(long)]
        csv: Option<PathBuf>,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Parse and validate a config without reading any ledger
    Validate {
        /// Path to .recon.toml config file
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.log.as_deref());

    let result = match cli.command {
        Commands::Run {
            config,
            tolerance,
            json,
            output,
            csv,
            filter,
        } => recon::cmd_run(config, tolerance, OutputArgs { json, output, csv }, filter),
        Commands::Check {
            purchases,
            sales,
            stock,
            tolerance,
            example,
            json,
            output,
            csv,
            filter,
        } => recon::cmd_check(
            LedgerFiles {
                purchases,
                sales,
                stock,
            },
            tolerance,
            example,
            OutputArgs { json, output, csv },
            filter,
        ),
        Commands::Validate { config } => recon::cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
