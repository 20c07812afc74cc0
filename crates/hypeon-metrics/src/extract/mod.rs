//! Platform signal extractors.
//!
//! Each extractor turns one platform's raw dataset into a bounded per-niche
//! sub-score mapping. All of them are total: an empty dataset or one whose
//! columns cannot support the metric yields an empty [`Extraction`], never
//! an error. Per-row failures are skipped and counted.

pub mod commerce;
pub mod sentiment;
pub mod social;

use std::collections::BTreeMap;

use hypeon_core::{Dataset, NicheKey, Row};

use crate::normalize::mean;
use crate::types::{Extraction, NicheScores};

/// Columns an extractor needs, declared up front so insufficient datasets
/// are rejected at the boundary instead of failing at arbitrary depth.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ColumnSpec {
    /// Every one of these must be present.
    pub required: &'static [&'static str],
    /// At least one of these must be present (ignored when empty).
    pub any_of: &'static [&'static str],
}

impl ColumnSpec {
    /// Checks `dataset` against this spec. Returns `false` (with a warn log
    /// naming the offender) when the dataset is unusable for the metric.
    pub(crate) fn usable(&self, dataset: &Dataset, extractor: &str) -> bool {
        if dataset.is_empty() {
            return false;
        }

        if let Some(missing) = self
            .required
            .iter()
            .find(|column| !dataset.has_column(column))
        {
            tracing::warn!(extractor, column = *missing, "required column missing");
            return false;
        }

        if !self.any_of.is_empty()
            && !self.any_of.iter().any(|column| dataset.has_column(column))
        {
            tracing::warn!(
                extractor,
                columns = ?self.any_of,
                "none of the alternative columns present"
            );
            return false;
        }

        true
    }
}

/// Groups rows by normalized niche and averages the per-row signal.
///
/// `per_row` returns `None` for a row that cannot be scored; such rows are
/// counted as skipped. Rows whose niche normalizes to the empty key are
/// dropped without counting — they carry no grouping information.
pub(crate) fn grouped_mean<F>(dataset: &Dataset, per_row: F) -> Extraction
where
    F: Fn(&Row) -> Option<f64>,
{
    let mut grouped: BTreeMap<NicheKey, Vec<f64>> = BTreeMap::new();
    let mut skipped = 0usize;

    for row in dataset.rows() {
        let niche = dataset.niche_of(row);
        if niche.is_empty() {
            continue;
        }
        match per_row(row) {
            Some(value) => grouped.entry(niche).or_default().push(value),
            None => skipped += 1,
        }
    }

    let scores: NicheScores = grouped
        .into_iter()
        .map(|(niche, values)| (niche, mean(&values)))
        .collect();

    Extraction {
        scores,
        skipped_rows: skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dataset(records: serde_json::Value) -> Dataset {
        Dataset::from_records(records).unwrap()
    }

    #[test]
    fn column_spec_rejects_empty_dataset() {
        let spec = ColumnSpec {
            required: &[],
            any_of: &[],
        };
        assert!(!spec.usable(&Dataset::empty(), "test"));
    }

    #[test]
    fn column_spec_rejects_missing_required_column() {
        let spec = ColumnSpec {
            required: &["views"],
            any_of: &[],
        };
        let ds = dataset(json!([{"likes": 3}]));
        assert!(!spec.usable(&ds, "test"));
    }

    #[test]
    fn column_spec_accepts_any_of_alternative() {
        let spec = ColumnSpec {
            required: &[],
            any_of: &["upvotes", "comments_count"],
        };
        let ds = dataset(json!([{"comments_count": 4}]));
        assert!(spec.usable(&ds, "test"));
    }

    #[test]
    fn grouped_mean_counts_skipped_rows() {
        let ds = dataset(json!([
            {"niche": "carpet", "v": 2.0},
            {"niche": "carpet", "v": 4.0},
            {"niche": "carpet"}
        ]));
        let extraction = grouped_mean(&ds, |row| row.number("v"));
        assert_eq!(extraction.skipped_rows, 1);
        let score = extraction.scores[&NicheKey::normalize("carpet")];
        assert!((score - 3.0).abs() < 1e-12);
    }

    #[test]
    fn grouped_mean_drops_empty_niche_keys() {
        let ds = dataset(json!([
            {"niche": "  ", "v": 2.0},
            {"niche": "curtains", "v": 4.0}
        ]));
        let extraction = grouped_mean(&ds, |row| row.number("v"));
        assert_eq!(extraction.scores.len(), 1);
        assert!(extraction
            .scores
            .contains_key(&NicheKey::normalize("curtain")));
        assert_eq!(extraction.skipped_rows, 0);
    }
}
