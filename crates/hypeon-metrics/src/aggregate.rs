//! Renormalized weighted aggregation of per-platform sub-scores.

use std::collections::{BTreeMap, BTreeSet};

use hypeon_core::{weight_of, Metric, NicheKey, Platform};

use crate::types::NicheScores;

/// Per-platform sub-score mappings feeding one metric.
pub type PlatformScores = BTreeMap<Platform, NicheScores>;

/// Combines per-platform sub-scores into one score per niche.
///
/// For every niche present in at least one platform mapping, computes
/// `Σ(w_p * s_p) / Σ(w_p)` over only the platforms that actually scored
/// that niche. Absent platforms are excluded from the denominator rather
/// than counted as zero, so a niche covered by 2 of 4 sources still gets a
/// fully-weighted score. Platforms without a static weight for the metric
/// contribute nothing.
#[must_use]
pub fn aggregate(metric: Metric, per_platform: &PlatformScores) -> NicheScores {
    let niches: BTreeSet<&NicheKey> = per_platform
        .values()
        .flat_map(BTreeMap::keys)
        .collect();

    let mut combined = NicheScores::new();
    for niche in niches {
        let mut weighted_sum = 0.0;
        let mut weight_total = 0.0;

        for (platform, scores) in per_platform {
            let Some(weight) = weight_of(metric, *platform) else {
                continue;
            };
            if let Some(score) = scores.get(niche) {
                weighted_sum += weight * score;
                weight_total += weight;
            }
        }

        if weight_total > 0.0 {
            combined.insert(niche.clone(), weighted_sum / weight_total);
        }
    }

    combined
}
