//! Snapshot loading from already-tabular JSON record files.
//!
//! Ingestion proper (scraping, warehouse exports) happens upstream; this
//! loader only reads the tabular artifacts those jobs leave behind. One
//! file per platform, each a JSON array of objects. A missing file is an
//! empty dataset, never an error — platforms go dark between runs.

use std::path::Path;

use serde_json::Value;

use crate::dataset::{Dataset, DatasetSnapshot};
use crate::CoreError;

const SHOPIFY_FILE: &str = "shopify_variants.json";
const AMAZON_FILE: &str = "amazon_products.json";
const TIKTOK_FILE: &str = "tiktok_data.json";
const REDDIT_POSTS_FILE: &str = "reddit_posts.json";
const REDDIT_COMMENTS_FILE: &str = "reddit_comments.json";

/// Loads a full [`DatasetSnapshot`] from `data_dir`.
///
/// # Errors
///
/// Returns [`CoreError`] when a file exists but cannot be read or is not a
/// JSON array of records. Absent files load as empty datasets.
pub fn load_snapshot(data_dir: &Path) -> Result<DatasetSnapshot, CoreError> {
    Ok(DatasetSnapshot {
        shopify: load_dataset(data_dir, SHOPIFY_FILE)?,
        amazon: load_dataset(data_dir, AMAZON_FILE)?,
        tiktok: load_dataset(data_dir, TIKTOK_FILE)?,
        reddit_posts: load_dataset(data_dir, REDDIT_POSTS_FILE)?,
        reddit_comments: load_dataset(data_dir, REDDIT_COMMENTS_FILE)?,
    })
}

fn load_dataset(data_dir: &Path, file_name: &str) -> Result<Dataset, CoreError> {
    let path = data_dir.join(file_name);
    if !path.exists() {
        tracing::warn!(file = file_name, "dataset file missing; loading as empty");
        return Ok(Dataset::empty());
    }

    let content = std::fs::read_to_string(&path).map_err(|e| CoreError::DatasetIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let records: Value =
        serde_json::from_str(&content).map_err(|e| CoreError::DatasetParse {
            path: path.display().to_string(),
            source: e,
        })?;

    let dataset = Dataset::from_records(records)?;
    tracing::info!(file = file_name, rows = dataset.len(), "loaded dataset");
    Ok(dataset)
}
