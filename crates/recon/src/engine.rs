use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::aggregate::build_timelines;
use crate::classify::{
    classify_deviation, classify_opening, deviation_suggestion, no_baseline_suggestion,
    opening_suggestion, stock_not_reported_suggestion,
};
use crate::config::{LedgerSchema, ReconConfig, Tolerance};
use crate::error::ReconError;
use crate::model::{
    DayActivity, Discrepancy, DiscrepancyKind, LedgerKind, LedgerRow, RawTable, ReconInput,
    ReconReport, ReportMeta, Timelines,
};
use crate::normalize::{normalize, NormalizeOptions};
use crate::summary::compute_summary;

/// Run reconciliation per config. Returns the report with summary + metadata.
pub fn run(config: &ReconConfig, input: &ReconInput) -> Result<ReconReport, ReconError> {
    let tolerance = config.tolerance()?;
    let options = config.normalize_options();

    let normalized = |kind: LedgerKind| -> Result<Vec<LedgerRow>, ReconError> {
        normalize(input.table(kind), kind, &config.schema(kind), &options)
    };
    let purchases = normalized(LedgerKind::Purchases)?;
    let sales = normalized(LedgerKind::Sales)?;
    let stock = normalized(LedgerKind::Stock)?;

    let timelines = build_timelines(&purchases, &sales, &stock)?;
    let discrepancies = reconcile_timelines(&timelines, tolerance)?;
    let summary = compute_summary(&discrepancies);

    Ok(ReconReport {
        meta: ReportMeta {
            config_name: config.name.clone(),
            tolerance,
            products_checked: timelines.len(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        discrepancies,
    })
}

/// Reconcile raw tables using the default column names and date formats.
///
/// Any normalization failure aborts the whole run; no partial report is returned.
pub fn reconcile(
    purchases: Option<&RawTable>,
    sales: Option<&RawTable>,
    stock: Option<&RawTable>,
    tolerance: Tolerance,
) -> Result<Vec<Discrepancy>, ReconError> {
    let options = NormalizeOptions::default();
    let normalized = |table: Option<&RawTable>, kind: LedgerKind| {
        normalize(table, kind, &LedgerSchema::default_for(kind), &options)
    };

    let purchases = normalized(purchases, LedgerKind::Purchases)?;
    let sales = normalized(sales, LedgerKind::Sales)?;
    let stock = normalized(stock, LedgerKind::Stock)?;

    reconcile_rows(&purchases, &sales, &stock, tolerance)
}

/// Reconcile already-normalized rows.
pub fn reconcile_rows(
    purchases: &[LedgerRow],
    sales: &[LedgerRow],
    stock: &[LedgerRow],
    tolerance: Tolerance,
) -> Result<Vec<Discrepancy>, ReconError> {
    reconcile_timelines(&build_timelines(purchases, sales, stock)?, tolerance)
}

fn reconcile_timelines(
    timelines: &Timelines,
    tolerance: Tolerance,
) -> Result<Vec<Discrepancy>, ReconError> {
    log::info!(
        "products found: {:?}",
        timelines.keys().collect::<Vec<_>>()
    );

    let mut discrepancies = Vec::new();
    for (product, days) in timelines {
        discrepancies.extend(walk_product(product, days, tolerance)?);
    }

    // Already in order from the BTreeMap walk; the stable sort keeps the
    // ordering guarantee independent of how timelines are built.
    discrepancies.sort_by(|a, b| (&a.product, a.date).cmp(&(&b.product, b.date)));

    log::info!(
        "{} discrepancies across {} products",
        discrepancies.len(),
        timelines.len()
    );
    Ok(discrepancies)
}

/// Fold a product's dates, threading the running stock baseline.
fn walk_product(
    product: &str,
    days: &BTreeMap<NaiveDate, DayActivity>,
    tolerance: Tolerance,
) -> Result<Vec<Discrepancy>, ReconError> {
    let (_, found) = days.iter().try_fold(
        (None::<i64>, Vec::new()),
        |(baseline, mut found), (date, day)| {
            let (next, finding) =
                step(baseline, day, tolerance).ok_or_else(|| ReconError::QuantityOverflow {
                    product: product.to_string(),
                    date: *date,
                })?;
            if let Some(finding) = finding {
                log::debug!("{product} {date}: {}", finding.kind);
                found.push(finding.into_discrepancy(product, *date, day));
            }
            Ok::<_, ReconError>((next, found))
        },
    )?;
    Ok(found)
}

/// What a single date contributes to the report.
struct Finding {
    stock_before: Option<i64>,
    stock_expected: Option<i64>,
    difference: Option<i64>,
    kind: DiscrepancyKind,
    suggestion: String,
}

impl Finding {
    fn into_discrepancy(self, product: &str, date: NaiveDate, day: &DayActivity) -> Discrepancy {
        Discrepancy {
            product: product.to_string(),
            date,
            stock_before: self.stock_before,
            purchased: day.purchased,
            sold: day.sold,
            stock_recorded: day.stock,
            stock_expected: self.stock_expected,
            difference: self.difference,
            kind: self.kind,
            suggestion: self.suggestion,
        }
    }
}

/// Stock after applying a day's movements to `base`. `None` on overflow.
fn expected_from(base: i64, day: &DayActivity) -> Option<i64> {
    base.checked_add(day.purchased)?.checked_sub(day.sold)
}

/// One date of the walk. Returns the baseline for the next date and an
/// optional finding for this one, or `None` if the arithmetic overflows.
fn step(
    baseline: Option<i64>,
    day: &DayActivity,
    tolerance: Tolerance,
) -> Option<(Option<i64>, Option<Finding>)> {
    let DayActivity {
        purchased,
        sold,
        stock,
    } = *day;

    match (baseline, stock) {
        // First reading: it becomes the baseline and is checked against the
        // same day's movements.
        (None, Some(recorded)) => {
            let expected = expected_from(recorded, day)?;
            let diff = recorded.checked_sub(expected)?;
            let finding = classify_opening(diff, purchased, sold, tolerance).map(|kind| Finding {
                stock_before: Some(recorded),
                stock_expected: Some(expected),
                difference: Some(diff),
                kind,
                suggestion: opening_suggestion(kind, diff),
            });
            Some((Some(recorded), finding))
        }
        (None, None) => Some((
            None,
            Some(Finding {
                stock_before: None,
                stock_expected: None,
                difference: None,
                kind: DiscrepancyKind::NoBaseline,
                suggestion: no_baseline_suggestion(),
            }),
        )),
        // Missing reading: report it, keep comparing against the old baseline.
        (Some(prev), None) => Some((
            Some(prev),
            Some(Finding {
                stock_before: Some(prev),
                stock_expected: Some(expected_from(prev, day)?),
                difference: None,
                kind: DiscrepancyKind::StockNotReported,
                suggestion: stock_not_reported_suggestion(),
            }),
        )),
        (Some(prev), Some(recorded)) => {
            let expected = expected_from(prev, day)?;
            let diff = recorded.checked_sub(expected)?;
            let finding =
                classify_deviation(diff, purchased, sold, tolerance).map(|kind| Finding {
                    stock_before: Some(prev),
                    stock_expected: Some(expected),
                    difference: Some(diff),
                    kind,
                    suggestion: deviation_suggestion(kind, diff, expected),
                });
            Some((Some(recorded), finding))
        }
    }
}
