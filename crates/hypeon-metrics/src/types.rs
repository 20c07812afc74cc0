use std::collections::BTreeMap;

use serde::Serialize;

use hypeon_core::NicheKey;

/// Per-niche score mapping. `BTreeMap` keeps iteration order deterministic,
/// so identical inputs produce byte-identical outputs.
pub type NicheScores = BTreeMap<NicheKey, f64>;

/// The output of one platform extractor for one metric.
///
/// `skipped_rows` counts rows that failed a per-row computation (text that
/// could not be scored, unusable cells). They are excluded from the scores
/// rather than silently folded in, and the count is surfaced so collection
/// regressions show up in logs instead of disappearing.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub scores: NicheScores,
    pub skipped_rows: usize,
}

impl Extraction {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// All composite metrics for one niche. Fields are invariant non-null:
/// a niche missing from one metric mapping gets 0 for that metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeRecord {
    pub niche: NicheKey,
    pub growth_rate: f64,
    pub sentiment_score: f64,
    pub engagement_score: f64,
    pub hype_score: f64,
    pub trend_index: f64,
}

/// Product-level growth output for one product row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductGrowthRecord {
    pub product_id: String,
    pub title: String,
    pub commerce_score: f64,
    pub social_enrichment: f64,
    pub growth_rate: f64,
}
