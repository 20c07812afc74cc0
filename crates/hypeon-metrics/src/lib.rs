//! Trend scoring for the Hypeon pipeline.
//!
//! Turns per-platform tabular snapshots into comparable niche-level
//! composite metrics (growth, sentiment, engagement, hype, trend index)
//! and per-product growth records. Every step is a pure function over an
//! immutable [`hypeon_core::DatasetSnapshot`]; missing platforms and
//! malformed rows degrade the output instead of failing it.

pub mod aggregate;
pub mod composite;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod product;
pub mod scorer;
pub mod types;

pub use aggregate::{aggregate, PlatformScores};
pub use composite::{
    composite_records, engagement_score, growth_rate, hype_score, sentiment_score,
};
pub use error::MetricsError;
pub use product::{product_growth, social_enrichment};
pub use scorer::polarity;
pub use types::{CompositeRecord, Extraction, NicheScores, ProductGrowthRecord};
