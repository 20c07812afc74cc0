//! Text- and rating-derived sentiment signals. All sub-scores live in
//! [-1, 1] with 0 as neutral.

use std::collections::BTreeMap;

use hypeon_core::{Dataset, NicheKey, Row};

use crate::extract::{grouped_mean, ColumnSpec};
use crate::normalize::mean;
use crate::scorer::polarity;
use crate::types::{Extraction, NicheScores};

const AMAZON_SPEC: ColumnSpec = ColumnSpec {
    required: &["rating"],
    any_of: &[],
};

const TIKTOK_SPEC: ColumnSpec = ColumnSpec {
    required: &[],
    any_of: &["description", "caption_clean"],
};

/// Amazon rating sentiment: per-niche mean star rating mapped through
/// `(mean - 3) / 2`, so 3 stars is neutral. Missing ratings count as 3.0.
#[must_use]
pub fn amazon_rating_sentiment(dataset: &Dataset) -> Extraction {
    if !AMAZON_SPEC.usable(dataset, "amazon_rating_sentiment") {
        return Extraction::empty();
    }

    let mut extraction = grouped_mean(dataset, |row| Some(row.number("rating").unwrap_or(3.0)));
    for value in extraction.scores.values_mut() {
        *value = ((*value - 3.0) / 2.0).clamp(-1.0, 1.0);
    }
    extraction
}

/// TikTok caption sentiment: lexicon polarity over the `description`
/// column, falling back to the legacy `caption_clean` name. Rows without
/// usable text are skipped and counted.
#[must_use]
pub fn tiktok_text_sentiment(dataset: &Dataset) -> Extraction {
    if !TIKTOK_SPEC.usable(dataset, "tiktok_text_sentiment") {
        return Extraction::empty();
    }

    // Newer collection runs renamed caption_clean to description; honor
    // both, preferring the newer name.
    grouped_mean(dataset, |row| {
        row.text("description")
            .or_else(|| row.text("caption_clean"))
            .map(polarity)
    })
}

/// Reddit sentiment: lexicon polarity over post titles and bodies plus the
/// comments dataset's `comment_text`, averaged per niche over every scored
/// text. A post contributes one sample per text field it carries.
#[must_use]
pub fn reddit_text_sentiment(posts: &Dataset, comments: &Dataset) -> Extraction {
    let mut samples: BTreeMap<NicheKey, Vec<f64>> = BTreeMap::new();
    let mut skipped = 0usize;

    let mut collect = |dataset: &Dataset, row: &Row, columns: &[&str]| {
        let niche = dataset.niche_of(row);
        if niche.is_empty() {
            return;
        }
        let texts: Vec<&str> = columns.iter().filter_map(|c| row.text(c)).collect();
        if texts.is_empty() {
            skipped += 1;
            return;
        }
        let entry = samples.entry(niche).or_default();
        for text in texts {
            entry.push(polarity(text));
        }
    };

    for row in posts.rows() {
        collect(posts, row, &["title", "post_body"]);
    }
    for row in comments.rows() {
        collect(comments, row, &["comment_text"]);
    }

    let scores: NicheScores = samples
        .into_iter()
        .map(|(niche, values)| (niche, mean(&values)))
        .collect();

    Extraction {
        scores,
        skipped_rows: skipped,
    }
}
