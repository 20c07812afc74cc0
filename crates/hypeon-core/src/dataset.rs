//! Loosely-typed tabular datasets.
//!
//! Platform collectors run independently, so column sets vary between
//! ingestion runs and cell types are not guaranteed. [`Dataset`] keeps rows
//! as JSON objects with trimmed-lowercased column names and offers typed
//! accessors that degrade to `None` instead of failing on absent or
//! mis-typed cells.

use serde_json::{Map, Value};

use crate::niche::NicheKey;
use crate::CoreError;

/// A single dataset row: column name → loosely-typed value.
#[derive(Debug, Clone, Default)]
pub struct Row(Map<String, Value>);

impl Row {
    /// Builds a row from a JSON object, normalizing column names to
    /// trimmed lowercase.
    #[must_use]
    pub fn from_object(object: Map<String, Value>) -> Self {
        let normalized = object
            .into_iter()
            .map(|(k, v)| (k.trim().to_lowercase(), v))
            .collect();
        Self(normalized)
    }

    /// Returns the raw cell value for `column`, if present.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    /// Reads a cell as `f64`. Accepts JSON numbers and numeric strings;
    /// anything else (including JSON null) is `None`.
    #[must_use]
    pub fn number(&self, column: &str) -> Option<f64> {
        match self.0.get(column)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Reads a cell as text. Only JSON strings qualify; numbers are not
    /// coerced because free-text columns never carry meaning as numbers.
    #[must_use]
    pub fn text(&self, column: &str) -> Option<&str> {
        match self.0.get(column)? {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Reads a cell as text, falling back to rendering numbers. Used for
    /// identifier columns (sku, asin) that some collectors emit numerically.
    #[must_use]
    pub fn identifier(&self, column: &str) -> Option<String> {
        match self.0.get(column)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// An immutable, read-only collection of rows from one platform.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    rows: Vec<Row>,
}

impl Dataset {
    /// Builds a dataset from a JSON value that must be an array of objects.
    /// Non-object array elements are dropped with a debug log rather than
    /// failing the whole dataset.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotARecordArray`] if `records` is not a JSON array.
    pub fn from_records(records: Value) -> Result<Self, CoreError> {
        let Value::Array(items) = records else {
            return Err(CoreError::NotARecordArray);
        };

        let total = items.len();
        let rows: Vec<Row> = items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(object) => Some(Row::from_object(object)),
                _ => None,
            })
            .collect();

        if rows.len() < total {
            tracing::debug!(
                dropped = total - rows.len(),
                "dropped non-object records while building dataset"
            );
        }

        Ok(Self { rows })
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True when at least one row carries `column`. Column sets vary per
    /// ingestion run, so presence is a per-dataset question, not a schema.
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.rows.iter().any(|row| row.get(column).is_some())
    }

    /// Reads the normalized niche key for a row: the `niche` column when
    /// this dataset has one, otherwise the synthetic `overall` key.
    #[must_use]
    pub fn niche_of(&self, row: &Row) -> NicheKey {
        if self.has_column("niche") {
            row.text("niche").map_or_else(NicheKey::overall, NicheKey::normalize)
        } else {
            NicheKey::overall()
        }
    }
}

/// One immutable snapshot of every platform dataset for a scoring pass.
///
/// Replaces ambient global state: the snapshot is constructed once per pass
/// and threaded through as a parameter. The pipeline never mutates it.
#[derive(Debug, Clone, Default)]
pub struct DatasetSnapshot {
    pub shopify: Dataset,
    pub amazon: Dataset,
    pub tiktok: Dataset,
    pub reddit_posts: Dataset,
    pub reddit_comments: Dataset,
}
