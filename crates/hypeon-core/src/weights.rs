//! Static platform weight tables.
//!
//! Weights are fixed at compile time and sum to 1.0 per metric across every
//! platform that could contribute to it. The aggregator renormalizes over
//! the platforms actually present, so these are relative priorities, not
//! fixed fractions of the output.

use serde::{Deserialize, Serialize};

/// A composite metric the aggregator can combine sub-scores for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Growth,
    Sentiment,
    Engagement,
}

/// A weighted signal source. Reddit posts and comments both feed the single
/// `Reddit` weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Shopify,
    Amazon,
    Tiktok,
    Reddit,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Shopify => write!(f, "shopify"),
            Platform::Amazon => write!(f, "amazon"),
            Platform::Tiktok => write!(f, "tiktok"),
            Platform::Reddit => write!(f, "reddit"),
        }
    }
}

const GROWTH_WEIGHTS: &[(Platform, f64)] = &[
    (Platform::Shopify, 0.25),
    (Platform::Amazon, 0.35),
    (Platform::Tiktok, 0.30),
    (Platform::Reddit, 0.10),
];

const SENTIMENT_WEIGHTS: &[(Platform, f64)] = &[
    (Platform::Amazon, 0.50),
    (Platform::Tiktok, 0.30),
    (Platform::Reddit, 0.20),
];

const ENGAGEMENT_WEIGHTS: &[(Platform, f64)] = &[
    (Platform::Tiktok, 0.70),
    (Platform::Reddit, 0.30),
];

/// Blend used by the product-level social enrichment scalar.
pub const ENRICHMENT_WEIGHTS: &[(Platform, f64)] = &[
    (Platform::Tiktok, 0.7),
    (Platform::Reddit, 0.3),
];

/// The weight table for `metric`. Platforms not listed never contribute.
#[must_use]
pub fn weight_table(metric: Metric) -> &'static [(Platform, f64)] {
    match metric {
        Metric::Growth => GROWTH_WEIGHTS,
        Metric::Sentiment => SENTIMENT_WEIGHTS,
        Metric::Engagement => ENGAGEMENT_WEIGHTS,
    }
}

/// The static weight of `platform` for `metric`, or `None` when the
/// platform does not contribute to that metric.
#[must_use]
pub fn weight_of(metric: Metric, platform: Platform) -> Option<f64> {
    weight_table(metric)
        .iter()
        .find(|(p, _)| *p == platform)
        .map(|(_, w)| *w)
}
