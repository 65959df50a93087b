//! `stockcheck run|check|validate` — ledger reconciliation commands.

use std::path::{Path, PathBuf};

use clap::Args;

use stockcheck_recon::config::{LedgersConfig, OutputConfig};
use stockcheck_recon::export::write_report_csv;
use stockcheck_recon::load::read_csv_file;
use stockcheck_recon::sample::sample_input;
use stockcheck_recon::{
    Discrepancy, DiscrepancyKind, LedgerKind, ReconConfig, ReconError, ReconInput, ReconReport,
    ReportFilter, Tolerance,
};

use crate::exit_codes::{
    recon_exit_code, EXIT_RECON_DISCREPANCIES, EXIT_RECON_INVALID_CONFIG, EXIT_RECON_IO,
};
use crate::CliError;

/// Display/export filters. The JSON report always carries every record.
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Only show this product (exact, case-sensitive)
    #[arg(long)]
    pub product: Option<String>,

    /// Only show this discrepancy kind (e.g. erro_lancamento_estoque)
    #[arg(long)]
    pub kind: Option<String>,

    /// Case-insensitive text search over product, kind and suggestion
    #[arg(long)]
    pub search: Option<String>,
}

impl FilterArgs {
    fn to_filter(&self) -> Result<ReportFilter, CliError> {
        let kind = self
            .kind
            .as_deref()
            .map(|k| k.parse::<DiscrepancyKind>())
            .transpose()
            .map_err(CliError::args)?;
        Ok(ReportFilter {
            product: self.product.clone(),
            kind,
            query: self.search.clone(),
        })
    }
}

/// Where and how to emit a finished report.
pub struct OutputArgs {
    pub json: bool,
    pub output: Option<PathBuf>,
    pub csv: Option<PathBuf>,
}

fn recon_err(err: ReconError) -> CliError {
    CliError {
        code: recon_exit_code(&err),
        message: err.to_string(),
        hint: None,
    }
}

fn parse_tolerance(raw: &str) -> Result<Tolerance, CliError> {
    Tolerance::parse(raw).map_err(|e| recon_err(e).with_hint("tolerance must be a whole number ≥ 0"))
}

// ============================================================================
// run
// ============================================================================

pub fn cmd_run(
    config_path: PathBuf,
    tolerance: Option<String>,
    out: OutputArgs,
    filter: FilterArgs,
) -> Result<(), CliError> {
    let filter = filter.to_filter()?;
    let config_str = std::fs::read_to_string(&config_path).map_err(|e| CliError {
        code: EXIT_RECON_IO,
        message: format!("cannot read config {}: {e}", config_path.display()),
        hint: None,
    })?;

    let mut config = ReconConfig::from_toml(&config_str).map_err(recon_err)?;
    if let Some(raw) = tolerance {
        config.tolerance = parse_tolerance(&raw)?.value();
    }

    // Resolve file paths relative to config file's directory
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));

    let input = load_configured_input(&config, base_dir).map_err(recon_err)?;
    let report = stockcheck_recon::run(&config, &input).map_err(recon_err)?;

    // Flags win over the config's [output] section.
    let out = OutputArgs {
        json: out.json,
        output: out.output.or_else(|| resolve(base_dir, config.output.json.as_deref())),
        csv: out.csv.or_else(|| resolve(base_dir, config.output.csv.as_deref())),
    };
    emit(&report, &out, &filter)
}

fn resolve(base_dir: &Path, path: Option<&str>) -> Option<PathBuf> {
    path.map(|p| base_dir.join(p))
}

fn load_configured_input(config: &ReconConfig, base_dir: &Path) -> Result<ReconInput, ReconError> {
    let mut input = ReconInput::default();
    for kind in LedgerKind::ALL {
        let Some(ledger) = config.ledger(kind) else {
            log::info!("{kind} ledger not configured, reconciling as empty");
            continue;
        };
        let table = read_csv_file(kind, &base_dir.join(&ledger.file))?;
        set_table(&mut input, kind, table);
    }
    Ok(input)
}

fn set_table(input: &mut ReconInput, kind: LedgerKind, table: stockcheck_recon::RawTable) {
    match kind {
        LedgerKind::Purchases => input.purchases = Some(table),
        LedgerKind::Sales => input.sales = Some(table),
        LedgerKind::Stock => input.stock = Some(table),
    }
}

// ============================================================================
// check
// ============================================================================

pub struct LedgerFiles {
    pub purchases: Option<PathBuf>,
    pub sales: Option<PathBuf>,
    pub stock: Option<PathBuf>,
}

impl LedgerFiles {
    fn get(&self, kind: LedgerKind) -> Option<&PathBuf> {
        match kind {
            LedgerKind::Purchases => self.purchases.as_ref(),
            LedgerKind::Sales => self.sales.as_ref(),
            LedgerKind::Stock => self.stock.as_ref(),
        }
    }

    fn missing(&self) -> Vec<LedgerKind> {
        LedgerKind::ALL
            .into_iter()
            .filter(|k| self.get(*k).is_none())
            .collect()
    }
}

pub fn cmd_check(
    files: LedgerFiles,
    tolerance: String,
    example: bool,
    out: OutputArgs,
    filter: FilterArgs,
) -> Result<(), CliError> {
    let tolerance = parse_tolerance(&tolerance)?;
    let filter = filter.to_filter()?;

    let missing = files.missing();
    let input = if missing.is_empty() {
        let mut input = ReconInput::default();
        for kind in LedgerKind::ALL {
            if let Some(path) = files.get(kind) {
                let table = read_csv_file(kind, path).map_err(recon_err)?;
                set_table(&mut input, kind, table);
            }
        }
        input
    } else if example {
        log::warn!("using the built-in example ledgers");
        sample_input()
    } else {
        let names: Vec<&str> = missing.iter().map(|k| k.as_str()).collect();
        return Err(CliError::args(format!("missing ledger file(s): {}", names.join(", ")))
            .with_hint("pass --purchases, --sales and --stock, or --example to use sample data"));
    };

    let config = ReconConfig {
        name: "check".into(),
        tolerance: tolerance.value(),
        ledgers: LedgersConfig::default(),
        dates: None,
        output: OutputConfig::default(),
    };
    let report = stockcheck_recon::run(&config, &input).map_err(recon_err)?;
    emit(&report, &out, &filter)
}

// ============================================================================
// validate
// ============================================================================

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path).map_err(|e| CliError {
        code: EXIT_RECON_IO,
        message: format!("cannot read config {}: {e}", config_path.display()),
        hint: None,
    })?;

    match ReconConfig::from_toml(&config_str) {
        Ok(config) => {
            eprintln!(
                "valid: recon '{}' with {} ledger(s), tolerance {}",
                config.name,
                config.configured_ledgers(),
                config.tolerance,
            );
            Ok(())
        }
        Err(e) => Err(CliError {
            code: EXIT_RECON_INVALID_CONFIG,
            message: e.to_string(),
            hint: None,
        }),
    }
}

// ============================================================================
// Output
// ============================================================================

fn emit(report: &ReconReport, out: &OutputArgs, filter: &ReportFilter) -> Result<(), CliError> {
    let shown = filter.apply(&report.discrepancies);

    let json_str = serde_json::to_string_pretty(report).map_err(|e| CliError {
        code: EXIT_RECON_IO,
        message: format!("JSON serialization error: {e}"),
        hint: None,
    })?;

    if let Some(ref path) = out.output {
        std::fs::write(path, &json_str).map_err(|e| CliError {
            code: EXIT_RECON_IO,
            message: format!("cannot write output {}: {e}", path.display()),
            hint: None,
        })?;
        eprintln!("wrote {}", path.display());
    }

    if let Some(ref path) = out.csv {
        let file = std::fs::File::create(path).map_err(|e| CliError {
            code: EXIT_RECON_IO,
            message: format!("cannot write {}: {e}", path.display()),
            hint: None,
        })?;
        write_report_csv(file, &shown).map_err(recon_err)?;
        eprintln!("wrote {} ({} rows)", path.display(), shown.len());
    }

    if out.json {
        println!("{json_str}");
    } else if !shown.is_empty() {
        print!("{}", render_table(&shown));
    }

    // Human summary to stderr
    let s = &report.summary;
    eprintln!(
        "{} discrepancies across {} of {} products (tolerance {}): {}",
        s.total,
        s.products_flagged,
        report.meta.products_checked,
        report.meta.tolerance,
        s.describe(),
    );
    if !filter.is_empty() {
        eprintln!("filter matched {} of {} records", shown.len(), s.total);
    }

    if s.total > 0 {
        return Err(CliError {
            code: EXIT_RECON_DISCREPANCIES,
            message: String::new(),
            hint: None,
        });
    }
    Ok(())
}

const TABLE_HEADERS: [&str; 10] = [
    "product", "date", "before", "bought", "sold", "recorded", "expected", "diff", "kind",
    "suggestion",
];

/// Aligned plain-text table; absent values print as `-`.
fn render_table(records: &[&Discrepancy]) -> String {
    let cell = |v: Option<i64>| v.map(|n| n.to_string()).unwrap_or_else(|| "-".into());
    let rows: Vec<[String; 10]> = records
        .iter()
        .map(|r| {
            [
                r.product.clone(),
                r.date.to_string(),
                cell(r.stock_before),
                r.purchased.to_string(),
                r.sold.to_string(),
                cell(r.stock_recorded),
                cell(r.stock_expected),
                cell(r.difference),
                r.kind.to_string(),
                r.suggestion.clone(),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = TABLE_HEADERS.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (w, v) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(v.chars().count());
        }
    }

    let line = |cells: Vec<&str>| -> String {
        let last = cells.len() - 1;
        let mut out = String::new();
        for (i, (v, w)) in cells.iter().zip(&widths).enumerate() {
            if i == last {
                out.push_str(v);
            } else {
                out.push_str(v);
                out.push_str(&" ".repeat(w - v.chars().count() + 2));
            }
        }
        out.push('\n');
        out
    };

    let mut table = line(TABLE_HEADERS.to_vec());
    for row in &rows {
        table.push_str(&line(row.iter().map(String::as_str).collect()));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit_codes::EXIT_USAGE;

    fn sample_report() -> ReconReport {
        let config = ReconConfig::from_toml("name = \"t\"\ntolerance = 2\n").unwrap();
        stockcheck_recon::run(&config, &sample_input()).unwrap()
    }

    #[test]
    fn table_aligns_columns() {
        let report = sample_report();
        let refs: Vec<&Discrepancy> = report.discrepancies.iter().collect();
        let table = render_table(&refs);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), refs.len() + 1);
        assert!(lines[0].starts_with("product   date"));

        let kind_col = lines[0].find("kind").unwrap();
        for line in &lines[1..] {
            let tag = &line[kind_col..];
            assert!(DiscrepancyKind::ALL.iter().any(|k| tag.starts_with(k.tag())), "{line}");
        }
        assert!(lines[2].contains(" - "), "absent reading shows as '-': {}", lines[2]);
    }

    #[test]
    fn unknown_kind_is_usage_error() {
        let args = FilterArgs {
            kind: Some("baseline".into()),
            ..Default::default()
        };
        let err = args.to_filter().unwrap_err();
        assert_eq!(err.code, EXIT_USAGE);
    }

    #[test]
    fn bad_tolerance_maps_to_config_code() {
        let err = parse_tolerance("-3").unwrap_err();
        assert_eq!(err.code, EXIT_RECON_INVALID_CONFIG);
        assert!(err.hint.is_some());
    }

    #[test]
    fn check_lists_missing_ledgers() {
        let files = LedgerFiles {
            purchases: None,
            sales: Some(PathBuf::from("vendas.csv")),
            stock: None,
        };
        assert_eq!(files.missing(), vec![LedgerKind::Purchases, LedgerKind::Stock]);
    }
}
