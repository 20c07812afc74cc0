//! Product-level growth: per-product commerce scores blended with a
//! niche-level social enrichment scalar.
//!
//! This is a different metric from the niche-level growth rate, not a
//! refinement of it: commerce dominates (0.8) and the social signal enters
//! as one shared scalar per niche rather than per-platform sub-scores.

use hypeon_core::{Dataset, DatasetSnapshot, NicheKey, Platform, Row, ENRICHMENT_WEIGHTS};

use crate::error::MetricsError;
use crate::extract::commerce::{is_in_stock, max_reviews};
use crate::extract::social::total_engagement;
use crate::normalize::{log_scaled, mean};
use crate::types::ProductGrowthRecord;

const COMMERCE_WEIGHT: f64 = 0.8;
const ENRICHMENT_WEIGHT: f64 = 0.2;

/// Result cap: only the strongest products are worth returning.
const MAX_RECORDS: usize = 100;

/// Saturation midpoint shared with the growth extractor.
const DISCUSSION_MIDPOINT: f64 = 100.0;

/// Keeps a dataset's rows for `niche` when it has a niche column; datasets
/// without one cannot be narrowed and are used whole.
fn filter_by_niche<'a>(dataset: &'a Dataset, niche: &NicheKey) -> Vec<&'a Row> {
    if dataset.has_column("niche") {
        dataset
            .rows()
            .iter()
            .filter(|row| dataset.niche_of(row) == *niche)
            .collect()
    } else {
        dataset.rows().iter().collect()
    }
}

/// Computes the social enrichment scalar for one niche in [0, 1].
///
/// Blends TikTok log-scaled total engagement (0.7) with Reddit discussion
/// saturation (0.3), renormalized over whichever of the two sources is
/// non-empty. Both sources dark yields 0.
#[must_use]
pub fn social_enrichment(snapshot: &DatasetSnapshot, niche: &NicheKey) -> f64 {
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    let mut add = |platform: Platform, score: f64| {
        if let Some((_, weight)) = ENRICHMENT_WEIGHTS.iter().find(|(p, _)| *p == platform) {
            weighted_sum += weight * score;
            weight_total += weight;
        }
    };

    let tiktok_rows = filter_by_niche(&snapshot.tiktok, niche);
    if !tiktok_rows.is_empty() {
        let totals: Vec<f64> = tiktok_rows.iter().map(|row| total_engagement(row)).collect();
        let max = totals.iter().copied().fold(0.0_f64, f64::max);
        if max > 0.0 {
            let scaled: Vec<f64> = totals.iter().map(|t| log_scaled(*t, max)).collect();
            add(Platform::Tiktok, mean(&scaled));
        }
    }

    let post_count = filter_by_niche(&snapshot.reddit_posts, niche).len();
    let comment_count = snapshot.reddit_comments.len();
    #[allow(clippy::cast_precision_loss)]
    let volume = (post_count + comment_count) as f64;
    if volume > 0.0 {
        add(Platform::Reddit, volume / (volume + DISCUSSION_MIDPOINT));
    }

    if weight_total > 0.0 {
        weighted_sum / weight_total
    } else {
        0.0
    }
}

/// Per-row commerce score for the Amazon dataset: log-scaled review count
/// against the dataset max, or the rating-derived fallback.
fn amazon_commerce_score(row: &Row, max_reviews: Option<f64>, has_rating: bool) -> f64 {
    if let Some(max) = max_reviews {
        return log_scaled(row.number("reviews_count").unwrap_or(0.0), max);
    }
    if has_rating {
        let rating = row.number("rating").unwrap_or(3.0);
        return ((rating - 3.0) / 2.0).clamp(0.0, 1.0);
    }
    0.0
}

/// Synthesizes a stable product id: explicit `product_id`, then `sku`,
/// then `asin`, then `title`, then the row index. Every record must be
/// addressable even when the collector dropped identifier columns.
fn product_id_of(row: &Row, index: usize) -> String {
    row.identifier("product_id")
        .or_else(|| row.identifier("sku"))
        .or_else(|| row.identifier("asin"))
        .or_else(|| row.identifier("title"))
        .unwrap_or_else(|| index.to_string())
}

/// Computes per-product growth for one commerce platform, scoped to one
/// niche: `0.8 * commerce + 0.2 * social_enrichment`, sorted descending
/// and capped at 100 records.
///
/// The niche drives the enrichment scalar only; product rows are not
/// filtered by it, since commerce collectors run one niche per batch.
///
/// # Errors
///
/// - [`MetricsError::MissingNicheFilter`] when `niche` is empty — there is
///   no sane default, and a partial result would be misleading.
/// - [`MetricsError::UnsupportedPlatform`] for non-commerce platforms.
pub fn product_growth(
    snapshot: &DatasetSnapshot,
    platform: Platform,
    niche: &NicheKey,
) -> Result<Vec<ProductGrowthRecord>, MetricsError> {
    if niche.is_empty() {
        return Err(MetricsError::MissingNicheFilter);
    }

    let dataset = match platform {
        Platform::Shopify => &snapshot.shopify,
        Platform::Amazon => &snapshot.amazon,
        Platform::Tiktok | Platform::Reddit => {
            return Err(MetricsError::UnsupportedPlatform(platform))
        }
    };

    if dataset.is_empty() {
        return Ok(Vec::new());
    }
    if platform == Platform::Shopify && !dataset.has_column("stock_status") {
        tracing::warn!("shopify dataset lacks stock_status; no product growth available");
        return Ok(Vec::new());
    }

    let enrichment = social_enrichment(snapshot, niche);

    let reviews_max = max_reviews(dataset);
    let has_rating = dataset.has_column("rating");

    let mut records: Vec<ProductGrowthRecord> = dataset
        .rows()
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let commerce_score = match platform {
                Platform::Shopify => {
                    if is_in_stock(row) {
                        1.0
                    } else {
                        0.0
                    }
                }
                _ => amazon_commerce_score(row, reviews_max, has_rating),
            };
            let product_id = product_id_of(row, index);
            let title = row
                .identifier("title")
                .unwrap_or_else(|| product_id.clone());
            ProductGrowthRecord {
                product_id,
                title,
                commerce_score,
                social_enrichment: enrichment,
                growth_rate: COMMERCE_WEIGHT
                    .mul_add(commerce_score, ENRICHMENT_WEIGHT * enrichment),
            }
        })
        .collect();

    records.sort_by(|a, b| {
        b.growth_rate
            .partial_cmp(&a.growth_rate)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    records.truncate(MAX_RECORDS);

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dataset(records: serde_json::Value) -> Dataset {
        Dataset::from_records(records).unwrap()
    }

    fn carpet() -> NicheKey {
        NicheKey::normalize("carpet")
    }

    #[test]
    fn empty_niche_is_rejected_without_partial_result() {
        let snapshot = DatasetSnapshot {
            shopify: dataset(json!([{"stock_status": "in stock"}])),
            ..DatasetSnapshot::default()
        };
        let err = product_growth(&snapshot, Platform::Shopify, &NicheKey::normalize("  "))
            .unwrap_err();
        assert!(matches!(err, MetricsError::MissingNicheFilter));
    }

    #[test]
    fn social_platforms_are_unsupported() {
        let err = product_growth(&DatasetSnapshot::default(), Platform::Tiktok, &carpet())
            .unwrap_err();
        assert!(matches!(err, MetricsError::UnsupportedPlatform(Platform::Tiktok)));
    }

    #[test]
    fn empty_dataset_yields_empty_records() {
        let records =
            product_growth(&DatasetSnapshot::default(), Platform::Shopify, &carpet()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn shopify_without_stock_status_yields_empty_records() {
        let snapshot = DatasetSnapshot {
            shopify: dataset(json!([{"title": "rug"}])),
            ..DatasetSnapshot::default()
        };
        let records = product_growth(&snapshot, Platform::Shopify, &carpet()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn shopify_growth_is_commerce_dominated() {
        let snapshot = DatasetSnapshot {
            shopify: dataset(json!([
                {"product_id": "p1", "title": "Rug A", "stock_status": "in stock"},
                {"product_id": "p2", "title": "Rug B", "stock_status": "sold out"}
            ])),
            ..DatasetSnapshot::default()
        };
        let records = product_growth(&snapshot, Platform::Shopify, &carpet()).unwrap();
        assert_eq!(records.len(), 2);
        // No social sources: enrichment 0, growth is 0.8 * commerce.
        assert_eq!(records[0].product_id, "p1");
        assert!((records[0].growth_rate - 0.8).abs() < 1e-12);
        assert_eq!(records[1].growth_rate, 0.0);
    }

    #[test]
    fn enrichment_blends_tiktok_and_reddit() {
        let snapshot = DatasetSnapshot {
            tiktok: dataset(json!([
                {"niche": "carpet", "views": 900, "likes": 80, "comments": 15, "shares": 5}
            ])),
            reddit_posts: dataset(json!([{"niche": "carpet", "title": "carpet talk"}])),
            ..DatasetSnapshot::default()
        };
        let enrichment = social_enrichment(&snapshot, &carpet());
        let expected = 0.7f64.mul_add(1.0, 0.3 * (1.0 / 101.0));
        assert!((enrichment - expected).abs() < 1e-12);
    }

    #[test]
    fn enrichment_renormalizes_when_tiktok_is_dark() {
        let snapshot = DatasetSnapshot {
            reddit_posts: dataset(json!([{"niche": "carpet", "title": "carpet talk"}])),
            ..DatasetSnapshot::default()
        };
        let enrichment = social_enrichment(&snapshot, &carpet());
        // Reddit alone carries full weight after renormalization.
        assert!((enrichment - 1.0 / 101.0).abs() < 1e-12);
    }

    #[test]
    fn enrichment_ignores_other_niches_when_column_present() {
        let snapshot = DatasetSnapshot {
            tiktok: dataset(json!([
                {"niche": "curtain", "views": 900, "likes": 80, "comments": 15, "shares": 5}
            ])),
            ..DatasetSnapshot::default()
        };
        assert_eq!(social_enrichment(&snapshot, &carpet()), 0.0);
    }

    #[test]
    fn enrichment_is_zero_when_both_sources_dark() {
        assert_eq!(social_enrichment(&DatasetSnapshot::default(), &carpet()), 0.0);
    }

    #[test]
    fn amazon_uses_review_counts_with_rating_fallback() {
        let snapshot = DatasetSnapshot {
            amazon: dataset(json!([
                {"asin": "B001", "title": "Lamp", "reviews_count": 500},
                {"asin": "B002", "title": "Stand", "reviews_count": 5}
            ])),
            ..DatasetSnapshot::default()
        };
        let records = product_growth(&snapshot, Platform::Amazon, &carpet()).unwrap();
        assert_eq!(records[0].product_id, "B001");
        assert!((records[0].commerce_score - 1.0).abs() < 1e-12);
        assert!(records[1].commerce_score < 1.0);
    }

    #[test]
    fn amazon_rating_only_dataset_uses_fallback() {
        let snapshot = DatasetSnapshot {
            amazon: dataset(json!([{"asin": "B001", "title": "Lamp", "rating": 5.0}])),
            ..DatasetSnapshot::default()
        };
        let records = product_growth(&snapshot, Platform::Amazon, &carpet()).unwrap();
        assert!((records[0].commerce_score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn product_id_fallback_chain() {
        let snapshot = DatasetSnapshot {
            shopify: dataset(json!([
                {"stock_status": "in stock", "sku": "SKU-9"},
                {"stock_status": "in stock", "title": "Untagged Rug"},
                {"stock_status": "in stock"}
            ])),
            ..DatasetSnapshot::default()
        };
        let records = product_growth(&snapshot, Platform::Shopify, &carpet()).unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.product_id.as_str()).collect();
        assert!(ids.contains(&"SKU-9"));
        assert!(ids.contains(&"Untagged Rug"));
        assert!(ids.contains(&"2"));
        // Title falls back to the synthesized id.
        let anonymous = records.iter().find(|r| r.product_id == "2").unwrap();
        assert_eq!(anonymous.title, "2");
    }

    #[test]
    fn records_are_sorted_descending_and_capped() {
        let mut rows = Vec::new();
        for i in 0..150 {
            let status = if i % 2 == 0 { "in stock" } else { "sold out" };
            rows.push(json!({"product_id": format!("p{i}"), "stock_status": status}));
        }
        let snapshot = DatasetSnapshot {
            shopify: dataset(json!(rows)),
            ..DatasetSnapshot::default()
        };
        let records = product_growth(&snapshot, Platform::Shopify, &carpet()).unwrap();
        assert_eq!(records.len(), 100);
        for pair in records.windows(2) {
            assert!(pair[0].growth_rate >= pair[1].growth_rate);
        }
    }
}
