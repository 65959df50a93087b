//! Decision tree over (difference, purchased, sold).
//!
//! `diff` is always `recorded - expected`.

use crate::config::Tolerance;
use crate::model::DiscrepancyKind;

/// Classify the first stock reading of a product.
///
/// The check fires when there was a purchase that day, or when there was a
/// sale and the reading is off by more than the tolerance. A purchase alone
/// triggers it regardless of tolerance.
pub fn classify_opening(
    diff: i64,
    purchased: i64,
    sold: i64,
    tolerance: Tolerance,
) -> Option<DiscrepancyKind> {
    let triggered = purchased != 0 || (sold != 0 && tolerance.is_exceeded_by(diff));
    if !triggered {
        return None;
    }

    Some(if diff > 0 && purchased == 0 {
        DiscrepancyKind::MissingPurchase
    } else if diff < 0 && sold == 0 {
        DiscrepancyKind::MissingSale
    } else {
        DiscrepancyKind::StockEntryError
    })
}

/// Classify a reading against an established baseline. `None` = within tolerance.
pub fn classify_deviation(
    diff: i64,
    purchased: i64,
    sold: i64,
    tolerance: Tolerance,
) -> Option<DiscrepancyKind> {
    if !tolerance.is_exceeded_by(diff) {
        return None;
    }

    Some(match (diff > 0, purchased == 0, sold == 0) {
        (true, true, _) => DiscrepancyKind::MissingPurchase,
        (true, false, _) => DiscrepancyKind::StockEntryError,
        (false, _, true) => DiscrepancyKind::MissingSale,
        (false, _, false) => DiscrepancyKind::StockEntryError,
    })
}

pub fn opening_suggestion(kind: DiscrepancyKind, diff: i64) -> String {
    match kind {
        DiscrepancyKind::MissingPurchase => {
            format!("Suggest adding a purchase of {diff} units.")
        }
        DiscrepancyKind::MissingSale => {
            format!("Suggest adding a sale of {} units.", diff.unsigned_abs())
        }
        _ => "Review the stock entry or the day's records.".to_string(),
    }
}

pub fn deviation_suggestion(kind: DiscrepancyKind, diff: i64, expected: i64) -> String {
    match kind {
        DiscrepancyKind::MissingPurchase => {
            format!("Add a purchase of {diff} units or adjust stock to {expected}.")
        }
        DiscrepancyKind::MissingSale => {
            format!("Add a sale of {} units or adjust stock to {expected}.", diff.unsigned_abs())
        }
        _ if diff > 0 => {
            format!("Review the stock entry (difference +{diff}) and validate purchases.")
        }
        _ => format!("Review the stock entry (difference {diff}) and validate sales."),
    }
}

pub fn no_baseline_suggestion() -> String {
    "No initial stock record to validate against.".to_string()
}

pub fn stock_not_reported_suggestion() -> String {
    "Stock record missing.".to_string()
}
