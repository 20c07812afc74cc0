//! Composite metric calculation: growth, sentiment, engagement, hype, and
//! the trend index, all keyed by niche.

use std::collections::BTreeSet;

use hypeon_core::{DatasetSnapshot, Metric, NicheKey, Platform};

use crate::aggregate::{aggregate, PlatformScores};
use crate::extract::{commerce, sentiment, social};
use crate::normalize::{min_max, stabilized};
use crate::types::{CompositeRecord, Extraction, NicheScores};

/// The trend index's hype term is a fixed placeholder, not the computed
/// hype score. Preserved for output compatibility with the reference
/// behavior; see DESIGN.md before changing it.
const TREND_HYPE_PLACEHOLDER: f64 = 0.5;

const TREND_GROWTH_WEIGHT: f64 = 0.35;
const TREND_ENGAGEMENT_WEIGHT: f64 = 0.25;
const TREND_SENTIMENT_WEIGHT: f64 = 0.25;
const TREND_HYPE_WEIGHT: f64 = 0.15;

fn log_extraction(metric: &str, platform: Platform, extraction: &Extraction) {
    if extraction.skipped_rows > 0 {
        tracing::debug!(
            metric,
            platform = %platform,
            skipped_rows = extraction.skipped_rows,
            "rows skipped during extraction"
        );
    }
}

/// Niche-level growth rate in [0, 1]: availability, review activity,
/// engagement volume, and discussion volume under the growth weight table.
#[must_use]
pub fn growth_rate(snapshot: &DatasetSnapshot) -> NicheScores {
    let mut per_platform = PlatformScores::new();

    let shopify = commerce::shopify_availability(&snapshot.shopify);
    log_extraction("growth", Platform::Shopify, &shopify);
    if !shopify.is_empty() {
        per_platform.insert(Platform::Shopify, shopify.scores);
    }

    let amazon = commerce::amazon_review_activity(&snapshot.amazon);
    log_extraction("growth", Platform::Amazon, &amazon);
    if !amazon.is_empty() {
        per_platform.insert(Platform::Amazon, amazon.scores);
    }

    let tiktok = social::tiktok_engagement_volume(&snapshot.tiktok);
    log_extraction("growth", Platform::Tiktok, &tiktok);
    if !tiktok.is_empty() {
        per_platform.insert(Platform::Tiktok, tiktok.scores);
    }

    let reddit = social::reddit_discussion_volume(&snapshot.reddit_posts, &snapshot.reddit_comments);
    log_extraction("growth", Platform::Reddit, &reddit);
    if !reddit.is_empty() {
        per_platform.insert(Platform::Reddit, reddit.scores);
    }

    aggregate(Metric::Growth, &per_platform)
}

/// Niche-level sentiment in [-1, 1]: Amazon ratings plus TikTok and Reddit
/// text polarity under the sentiment weight table.
#[must_use]
pub fn sentiment_score(snapshot: &DatasetSnapshot) -> NicheScores {
    let mut per_platform = PlatformScores::new();

    let amazon = sentiment::amazon_rating_sentiment(&snapshot.amazon);
    log_extraction("sentiment", Platform::Amazon, &amazon);
    if !amazon.is_empty() {
        per_platform.insert(Platform::Amazon, amazon.scores);
    }

    let tiktok = sentiment::tiktok_text_sentiment(&snapshot.tiktok);
    log_extraction("sentiment", Platform::Tiktok, &tiktok);
    if !tiktok.is_empty() {
        per_platform.insert(Platform::Tiktok, tiktok.scores);
    }

    let reddit =
        sentiment::reddit_text_sentiment(&snapshot.reddit_posts, &snapshot.reddit_comments);
    log_extraction("sentiment", Platform::Reddit, &reddit);
    if !reddit.is_empty() {
        per_platform.insert(Platform::Reddit, reddit.scores);
    }

    aggregate(Metric::Sentiment, &per_platform)
}

/// Niche-level engagement in [0, 1]: per-platform rates are min-max
/// normalized, combined under the engagement weight table, and the combined
/// result is min-max normalized again.
#[must_use]
pub fn engagement_score(snapshot: &DatasetSnapshot) -> NicheScores {
    let mut per_platform = PlatformScores::new();

    let mut tiktok = social::tiktok_engagement_rate(&snapshot.tiktok);
    log_extraction("engagement", Platform::Tiktok, &tiktok);
    if !tiktok.is_empty() {
        min_max(&mut tiktok.scores);
        per_platform.insert(Platform::Tiktok, tiktok.scores);
    }

    let mut reddit = social::reddit_engagement_rate(&snapshot.reddit_posts);
    log_extraction("engagement", Platform::Reddit, &reddit);
    if !reddit.is_empty() {
        min_max(&mut reddit.scores);
        per_platform.insert(Platform::Reddit, reddit.scores);
    }

    let mut combined = aggregate(Metric::Engagement, &per_platform);
    min_max(&mut combined);
    combined
}

/// Niche-level hype in [0.2, 1.0]: `0.6 * engagement + 0.8 * sentiment`
/// over the outer join of the two mappings, then the stabilized rescale so
/// tightly-clustered values do not collapse toward zero.
#[must_use]
pub fn hype_score(snapshot: &DatasetSnapshot) -> NicheScores {
    let engagement = engagement_score(snapshot);
    let sentiment = sentiment_score(snapshot);
    hype_from_parts(&engagement, &sentiment)
}

fn hype_from_parts(engagement: &NicheScores, sentiment: &NicheScores) -> NicheScores {
    let niches: BTreeSet<&NicheKey> = engagement.keys().chain(sentiment.keys()).collect();

    let mut raw = NicheScores::new();
    for niche in niches {
        let e = engagement.get(niche).copied().unwrap_or(0.0);
        let s = sentiment.get(niche).copied().unwrap_or(0.0);
        raw.insert(niche.clone(), 0.6f64.mul_add(e, 0.8 * s));
    }

    stabilized(&mut raw);
    raw
}

fn trend_index(growth: f64, engagement: f64, sentiment: f64) -> f64 {
    // Sentiment is rescaled from [-1, 1] onto [0, 1] before weighting.
    let sentiment_unit = (sentiment + 1.0) / 2.0;
    let combined = TREND_GROWTH_WEIGHT * growth
        + TREND_ENGAGEMENT_WEIGHT * engagement
        + TREND_SENTIMENT_WEIGHT * sentiment_unit
        + TREND_HYPE_WEIGHT * TREND_HYPE_PLACEHOLDER;
    (combined * 100.0).clamp(0.0, 100.0)
}

/// Computes every composite metric and joins them into one record per
/// niche present in any contributing source.
///
/// The join is outer: a niche missing from one metric mapping gets 0 for
/// that metric, never a missing-value marker. When every source is empty
/// the result is an empty list, not an error.
#[must_use]
pub fn composite_records(snapshot: &DatasetSnapshot) -> Vec<CompositeRecord> {
    let growth = growth_rate(snapshot);
    let sentiment = sentiment_score(snapshot);
    let engagement = engagement_score(snapshot);
    let hype = hype_from_parts(&engagement, &sentiment);

    let niches: BTreeSet<&NicheKey> = growth
        .keys()
        .chain(sentiment.keys())
        .chain(engagement.keys())
        .chain(hype.keys())
        .collect();

    niches
        .into_iter()
        .map(|niche| {
            let g = growth.get(niche).copied().unwrap_or(0.0);
            let s = sentiment.get(niche).copied().unwrap_or(0.0);
            let e = engagement.get(niche).copied().unwrap_or(0.0);
            let h = hype.get(niche).copied().unwrap_or(0.0);
            CompositeRecord {
                niche: niche.clone(),
                growth_rate: g,
                sentiment_score: s,
                engagement_score: e,
                hype_score: h,
                trend_index: trend_index(g, e, s),
            }
        })
        .collect()
}
