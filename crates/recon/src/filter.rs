use crate::model::{Discrepancy, DiscrepancyKind};

/// Narrow a report down for display or export. Empty criteria match everything.
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub product: Option<String>,
    pub kind: Option<DiscrepancyKind>,
    /// Case-insensitive substring of the product, suggestion or kind tag.
    pub query: Option<String>,
}

impl ReportFilter {
    pub fn is_empty(&self) -> bool {
        self.product.is_none() && self.kind.is_none() && self.normalized_query().is_none()
    }

    pub fn matches(&self, record: &Discrepancy) -> bool {
        if let Some(ref product) = self.product {
            if &record.product != product {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if record.kind != kind {
                return false;
            }
        }
        if let Some(q) = self.normalized_query() {
            let hit = record.product.to_lowercase().contains(&q)
                || record.suggestion.to_lowercase().contains(&q)
                || record.kind.tag().contains(&q);
            if !hit {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(&self, records: &'a [Discrepancy]) -> Vec<&'a Discrepancy> {
        records.iter().filter(|r| self.matches(r)).collect()
    }

    fn normalized_query(&self) -> Option<String> {
        self.query
            .as_deref()
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(product: &str, kind: DiscrepancyKind, suggestion: &str) -> Discrepancy {
        Discrepancy {
            product: product.into(),
            date: NaiveDate::from_ymd_opt(2025, 9, 3).unwrap(),
            stock_before: Some(1),
            purchased: 0,
            sold: 0,
            stock_recorded: Some(1),
            stock_expected: Some(1),
            difference: Some(0),
            kind,
            suggestion: suggestion.into(),
        }
    }

    fn records() -> Vec<Discrepancy> {
        vec![
            record("Parafuso", DiscrepancyKind::StockNotReported, "Stock record missing."),
            record(
                "Parafuso",
                DiscrepancyKind::StockEntryError,
                "Review the stock entry (difference -10) and validate sales.",
            ),
            record("Porca", DiscrepancyKind::MissingSale, "Suggest adding a sale of 50 units."),
        ]
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let all = records();
        let filter = ReportFilter {
            query: Some("   ".into()),
            ..Default::default()
        };
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&all).len(), 3);
    }

    #[test]
    fn product_is_exact() {
        let all = records();
        let filter = ReportFilter {
            product: Some("Porca".into()),
            ..Default::default()
        };
        assert_eq!(filter.apply(&all).len(), 1);

        let filter = ReportFilter {
            product: Some("porca".into()),
            ..Default::default()
        };
        assert!(filter.apply(&all).is_empty());
    }

    #[test]
    fn criteria_combine() {
        let all = records();
        let filter = ReportFilter {
            product: Some("Parafuso".into()),
            kind: Some(DiscrepancyKind::StockEntryError),
            query: None,
        };
        let hits = filter.apply(&all);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].kind, DiscrepancyKind::StockEntryError);
    }

    #[test]
    fn query_searches_product_suggestion_and_tag() {
        let all = records();
        let by_product = ReportFilter {
            query: Some("PORCA".into()),
            ..Default::default()
        };
        assert_eq!(by_product.apply(&all).len(), 1);

        let by_suggestion = ReportFilter {
            query: Some("validate sales".into()),
            ..Default::default()
        };
        assert_eq!(by_suggestion.apply(&all).len(), 1);

        let by_tag = ReportFilter {
            query: Some("nao_informado".into()),
            ..Default::default()
        };
        assert_eq!(by_tag.apply(&all).len(), 1);
    }
}
