use std::collections::{BTreeMap, BTreeSet};

use crate::model::{Discrepancy, ReportSummary};

/// Compute summary statistics from a report's records.
pub fn compute_summary(records: &[Discrepancy]) -> ReportSummary {
    let mut by_kind: BTreeMap<String, usize> = BTreeMap::new();
    let mut products = BTreeSet::new();

    for r in records {
        *by_kind.entry(r.kind.to_string()).or_insert(0) += 1;
        products.insert(r.product.as_str());
    }

    ReportSummary {
        total: records.len(),
        products_flagged: products.len(),
        by_kind,
    }
}

impl ReportSummary {
    /// One-line rendering, e.g. `erro_lancamento_estoque: 2 | sem_baseline: 1`.
    pub fn describe(&self) -> String {
        if self.by_kind.is_empty() {
            return "no records".to_string();
        }
        self.by_kind
            .iter()
            .map(|(kind, n)| format!("{kind}: {n}"))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}
