//! Social-platform signals: TikTok engagement and Reddit discussion.
//!
//! TikTok and Reddit each feed two different metrics. Growth uses volume
//! (log-scaled total engagement, discussion saturation); engagement uses
//! per-item rates. The formulas are deliberately distinct — volume measures
//! reach, rate measures resonance.

use std::collections::BTreeMap;

use hypeon_core::{Dataset, NicheKey, Row};

use crate::extract::{grouped_mean, ColumnSpec};
use crate::normalize::{finite_or_zero, log_scaled, mean};
use crate::types::{Extraction, NicheScores};

const ENGAGEMENT_COLUMNS: &[&str] = &["views", "likes", "comments", "shares"];

/// Saturation midpoint for Reddit discussion volume: at 100 items the
/// sub-score is 0.5, approaching 1 asymptotically.
const DISCUSSION_MIDPOINT: f64 = 100.0;

const TIKTOK_VOLUME_SPEC: ColumnSpec = ColumnSpec {
    required: &[],
    any_of: ENGAGEMENT_COLUMNS,
};

const TIKTOK_RATE_SPEC: ColumnSpec = ColumnSpec {
    required: ENGAGEMENT_COLUMNS,
    any_of: &[],
};

const REDDIT_RATE_SPEC: ColumnSpec = ColumnSpec {
    required: &[],
    any_of: &["upvotes", "comments_count"],
};

/// Sum of views, likes, comments, and shares; absent cells contribute 0.
pub(crate) fn total_engagement(row: &Row) -> f64 {
    ENGAGEMENT_COLUMNS
        .iter()
        .filter_map(|column| row.number(column))
        .sum()
}

/// Largest per-row total engagement, when positive.
pub(crate) fn max_total_engagement(dataset: &Dataset) -> Option<f64> {
    let max = dataset
        .rows()
        .iter()
        .map(total_engagement)
        .fold(0.0_f64, f64::max);
    (max > 0.0).then_some(max)
}

/// TikTok engagement-volume sub-score (growth): per-row total engagement
/// log-scaled against the dataset maximum, averaged per niche. Range [0, 1].
#[must_use]
pub fn tiktok_engagement_volume(dataset: &Dataset) -> Extraction {
    if !TIKTOK_VOLUME_SPEC.usable(dataset, "tiktok_engagement_volume") {
        return Extraction::empty();
    }
    let Some(max) = max_total_engagement(dataset) else {
        return Extraction::empty();
    };

    grouped_mean(dataset, |row| Some(log_scaled(total_engagement(row), max)))
}

/// Reddit discussion-volume sub-score (growth): per-niche post + comment
/// count pushed through the saturation curve `v / (v + 100)`. Range [0, 1).
#[must_use]
pub fn reddit_discussion_volume(posts: &Dataset, comments: &Dataset) -> Extraction {
    let mut volumes: BTreeMap<NicheKey, f64> = BTreeMap::new();

    for dataset in [posts, comments] {
        for row in dataset.rows() {
            let niche = dataset.niche_of(row);
            if niche.is_empty() {
                continue;
            }
            *volumes.entry(niche).or_insert(0.0) += 1.0;
        }
    }

    let scores: NicheScores = volumes
        .into_iter()
        .filter(|(_, volume)| *volume > 0.0)
        .map(|(niche, volume)| (niche, volume / (volume + DISCUSSION_MIDPOINT)))
        .collect();

    Extraction {
        scores,
        skipped_rows: 0,
    }
}

/// Per-video engagement rate: interactions per view, 0 when the video has
/// no views or the division is not finite.
fn engagement_rate(row: &Row) -> f64 {
    let views = row.number("views").unwrap_or(0.0);
    if views <= 0.0 {
        return 0.0;
    }
    let interactions = row.number("likes").unwrap_or(0.0)
        + row.number("comments").unwrap_or(0.0)
        + row.number("shares").unwrap_or(0.0);
    finite_or_zero(interactions / views)
}

/// TikTok engagement-rate sub-score: per-video rate averaged first per
/// video (when a `video_id` column exists) and then per niche.
#[must_use]
pub fn tiktok_engagement_rate(dataset: &Dataset) -> Extraction {
    if !TIKTOK_RATE_SPEC.usable(dataset, "tiktok_engagement_rate") {
        return Extraction::empty();
    }

    if !dataset.has_column("video_id") {
        return grouped_mean(dataset, |row| Some(engagement_rate(row)));
    }

    // Two-stage average: rows belonging to the same video collapse into one
    // sample so multi-row videos cannot dominate their niche.
    let mut per_video: BTreeMap<(NicheKey, String), Vec<f64>> = BTreeMap::new();
    for (index, row) in dataset.rows().iter().enumerate() {
        let niche = dataset.niche_of(row);
        if niche.is_empty() {
            continue;
        }
        let video = row
            .identifier("video_id")
            .unwrap_or_else(|| format!("row-{index}"));
        per_video
            .entry((niche, video))
            .or_default()
            .push(engagement_rate(row));
    }

    let mut per_niche: BTreeMap<NicheKey, Vec<f64>> = BTreeMap::new();
    for ((niche, _), rates) in per_video {
        per_niche.entry(niche).or_default().push(mean(&rates));
    }

    let scores: NicheScores = per_niche
        .into_iter()
        .map(|(niche, video_means)| (niche, mean(&video_means)))
        .collect();

    Extraction {
        scores,
        skipped_rows: 0,
    }
}

/// Reddit engagement-rate sub-score: `(upvotes + comments) / (comments + 1)`
/// per post, averaged per niche.
#[must_use]
pub fn reddit_engagement_rate(posts: &Dataset) -> Extraction {
    if !REDDIT_RATE_SPEC.usable(posts, "reddit_engagement_rate") {
        return Extraction::empty();
    }

    grouped_mean(posts, |row| {
        let upvotes = row.number("upvotes").unwrap_or(0.0);
        let comments = row.number("comments_count").unwrap_or(0.0);
        Some(finite_or_zero((upvotes + comments) / (comments + 1.0)))
    })
}
