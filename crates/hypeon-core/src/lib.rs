//! Shared domain types for the Hypeon trend-metrics pipeline.
//!
//! Datasets arrive as loosely-typed tabular records collected independently
//! per platform; this crate owns their in-memory representation, niche-key
//! canonicalization, the static metric weight tables, and process
//! configuration. The scoring logic itself lives in `hypeon-metrics`.

pub mod app_config;
pub mod dataset;
pub mod loader;
pub mod niche;
pub mod weights;

mod config;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::load_app_config;
pub use dataset::{Dataset, DatasetSnapshot, Row};
pub use loader::load_snapshot;
pub use niche::NicheKey;
pub use weights::{weight_of, weight_table, Metric, Platform, ENRICHMENT_WEIGHTS};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("dataset records must be a JSON array of objects")]
    NotARecordArray,

    #[error("failed to read dataset file {path}: {source}")]
    DatasetIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dataset file {path}: {source}")]
    DatasetParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
