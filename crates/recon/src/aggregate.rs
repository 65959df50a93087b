use std::collections::BTreeMap;

use crate::error::ReconError;
use crate::model::{DayActivity, LedgerRow, Timelines};

/// Adds one row's quantity into a day. `None` when the sum leaves the i64 range.
type Apply = fn(&mut DayActivity, i64) -> Option<()>;

/// Group normalized rows by (product, date) and sum each ledger's quantity.
///
/// Stock readings for the same (product, date) are summed as well. Rows with
/// a blank date or a blank product carry no position on any timeline and are
/// skipped.
pub fn build_timelines(
    purchases: &[LedgerRow],
    sales: &[LedgerRow],
    stock: &[LedgerRow],
) -> Result<Timelines, ReconError> {
    let mut timelines: Timelines = BTreeMap::new();

    fold(&mut timelines, "purchases", purchases, |day, qty| {
        day.purchased = day.purchased.checked_add(qty)?;
        Some(())
    })?;
    fold(&mut timelines, "sales", sales, |day, qty| {
        day.sold = day.sold.checked_add(qty)?;
        Some(())
    })?;
    fold(&mut timelines, "stock", stock, |day, qty| {
        day.stock = Some(day.stock.unwrap_or(0).checked_add(qty)?);
        Some(())
    })?;

    Ok(timelines)
}

fn fold(
    timelines: &mut Timelines,
    ledger: &str,
    rows: &[LedgerRow],
    apply: Apply,
) -> Result<(), ReconError> {
    for row in rows {
        let Some(date) = row.date else {
            log::debug!("{ledger}: skipping '{}' row without a date", row.product);
            continue;
        };
        if row.product.trim().is_empty() {
            log::debug!("{ledger}: skipping {date} row without a product");
            continue;
        }
        let day = timelines
            .entry(row.product.clone())
            .or_default()
            .entry(date)
            .or_default();
        apply(day, row.quantity).ok_or_else(|| ReconError::QuantityOverflow {
            product: row.product.clone(),
            date,
        })?;
    }
    Ok(())
}
