//! Niche label canonicalization.
//!
//! Every grouping key in the scoring pipeline goes through [`NicheKey::normalize`]
//! so that raw labels from different platforms collapse onto the same key.
//! The synonym table is the single source of truth for exceptions beyond
//! simple trimming and casing.

use serde::{Deserialize, Serialize};

/// Synonym table mapping trimmed-lowercased labels to their canonical form.
///
/// Keys must already be lowercase. Labels absent from the table canonicalize
/// to their trimmed-lowercased selves.
const NICHE_SYNONYMS: &[(&str, &str)] = &[
    ("carpets", "carpet"),
    ("curtains", "curtain"),
    ("kitchen gadgets", "kitchen_gadgets"),
];

/// A canonical niche key.
///
/// Two raw labels that denote the same real-world niche always map to the
/// same `NicheKey`. Datasets with no niche column group under [`NicheKey::overall`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NicheKey(String);

impl NicheKey {
    /// Canonicalizes a raw niche label: trim, lowercase, synonym lookup.
    ///
    /// Never fails. Empty or whitespace-only input yields the empty key,
    /// which callers filter out before aggregation (see [`NicheKey::is_empty`]).
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        let lower = raw.trim().to_lowercase();
        let canonical = NICHE_SYNONYMS
            .iter()
            .find(|(from, _)| *from == lower)
            .map_or(lower, |(_, to)| (*to).to_string());
        Self(canonical)
    }

    /// The synthetic key for datasets that carry no niche column at all.
    #[must_use]
    pub fn overall() -> Self {
        Self("overall".to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for NicheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(NicheKey::normalize("  Desk Lamps "), NicheKey::normalize("desk lamps"));
        assert_eq!(NicheKey::normalize("CARPET").as_str(), "carpet");
    }

    #[test]
    fn normalize_collapses_synonyms() {
        let expected = NicheKey::normalize("carpet");
        assert_eq!(NicheKey::normalize("Carpets"), expected);
        assert_eq!(NicheKey::normalize("carpet "), expected);
        assert_eq!(NicheKey::normalize("CARPET"), expected);
    }

    #[test]
    fn normalize_kitchen_gadgets_uses_underscore_form() {
        assert_eq!(
            NicheKey::normalize("Kitchen Gadgets").as_str(),
            "kitchen_gadgets"
        );
    }

    #[test]
    fn normalize_unknown_label_passes_through() {
        assert_eq!(NicheKey::normalize("pet toys").as_str(), "pet toys");
    }

    #[test]
    fn normalize_empty_input_yields_empty_key() {
        assert!(NicheKey::normalize("").is_empty());
        assert!(NicheKey::normalize("   ").is_empty());
    }

    #[test]
    fn overall_key_is_stable() {
        assert_eq!(NicheKey::overall().as_str(), "overall");
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&NicheKey::normalize("Carpets")).unwrap();
        assert_eq!(json, "\"carpet\"");
    }
}
