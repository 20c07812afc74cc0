//! Commerce-platform growth signals: Shopify stock availability and Amazon
//! review activity.

use hypeon_core::{Dataset, Row};

use crate::extract::{grouped_mean, ColumnSpec};
use crate::normalize::log_scaled;
use crate::types::Extraction;

/// Status strings that count as "in stock". Matched case-insensitively
/// against the `stock_status` column.
const IN_STOCK_VOCABULARY: &[&str] = &["in stock", "instock", "available"];

const SHOPIFY_SPEC: ColumnSpec = ColumnSpec {
    required: &["stock_status"],
    any_of: &[],
};

const AMAZON_SPEC: ColumnSpec = ColumnSpec {
    required: &[],
    any_of: &["reviews_count", "rating"],
};

/// True when the row's `stock_status` matches the in-stock vocabulary.
/// A missing or non-text status counts as out of stock.
pub(crate) fn is_in_stock(row: &Row) -> bool {
    row.text("stock_status").is_some_and(|status| {
        let lower = status.trim().to_lowercase();
        IN_STOCK_VOCABULARY.contains(&lower.as_str())
    })
}

/// Shopify availability sub-score: the fraction of rows per niche whose
/// stock status is in the in-stock vocabulary. Range [0, 1].
#[must_use]
pub fn shopify_availability(dataset: &Dataset) -> Extraction {
    if !SHOPIFY_SPEC.usable(dataset, "shopify_availability") {
        return Extraction::empty();
    }

    grouped_mean(dataset, |row| Some(if is_in_stock(row) { 1.0 } else { 0.0 }))
}

/// Largest review count in the dataset, when the column exists and any row
/// carries a positive value.
pub(crate) fn max_reviews(dataset: &Dataset) -> Option<f64> {
    if !dataset.has_column("reviews_count") {
        return None;
    }
    let max = dataset
        .rows()
        .iter()
        .filter_map(|row| row.number("reviews_count"))
        .fold(0.0_f64, f64::max);
    (max > 0.0).then_some(max)
}

/// Amazon review-activity sub-score. Range [0, 1].
///
/// Review counts are log-scaled against the dataset maximum and averaged
/// per niche. When no usable review counts exist, falls back to the
/// rating-derived score `(mean_rating - 3) / 2` clamped to `>= 0`; missing
/// ratings count as the neutral 3.0.
#[must_use]
pub fn amazon_review_activity(dataset: &Dataset) -> Extraction {
    if !AMAZON_SPEC.usable(dataset, "amazon_review_activity") {
        return Extraction::empty();
    }

    if let Some(max) = max_reviews(dataset) {
        return grouped_mean(dataset, |row| {
            let reviews = row.number("reviews_count").unwrap_or(0.0);
            Some(log_scaled(reviews, max))
        });
    }

    if !dataset.has_column("rating") {
        return Extraction::empty();
    }

    let mut extraction = grouped_mean(dataset, |row| Some(row.number("rating").unwrap_or(3.0)));
    for value in extraction.scores.values_mut() {
        *value = ((*value - 3.0) / 2.0).clamp(0.0, 1.0);
    }
    extraction
}
