//! Catalog items for both datasets.
//!
//! A movie is identified by its title alone. A music release is identified by
//! its canonical id; descriptive fields never take part in equality.

use crate::error::{DataLoadError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

// =============================================================================
// Movie items
// =============================================================================

/// A MovieLens movie as seen from a user's rating map.
///
/// Equality, ordering and hashing all come from the title, so two catalog rows
/// with the same title collapse into one entity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieItem {
    pub title: String,
}

impl MovieItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl fmt::Display for MovieItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

// =============================================================================
// Music items
// =============================================================================

/// Canonicalize a raw catalog identifier by stripping every leading '0'.
///
/// Example: "0042" -> "42", "0" -> ""
pub fn canonical_id(raw: &str) -> String {
    raw.trim_start_matches('0').to_string()
}

/// Strip list punctuation from a raw category field.
///
/// Example: "['Rock', 'Pop']" -> "Rock, Pop"
pub fn clean_categories(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '[' | ']' | '\''))
        .collect()
}

/// An Amazon CDs & Vinyl release.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MusicItem {
    pub id: String,
    pub title: String,
    pub categories: String,
    pub brand: String,
    pub sales_type: String,
}

impl MusicItem {
    /// Build an item from raw catalog fields.
    ///
    /// Fails with `ValidationError` when the id is empty after
    /// canonicalization, since such a record can never be referenced.
    pub fn new(
        raw_id: &str,
        title: impl Into<String>,
        categories: &str,
        brand: impl Into<String>,
        sales_type: impl Into<String>,
    ) -> Result<Self> {
        let id = canonical_id(raw_id.trim());
        if id.is_empty() {
            return Err(DataLoadError::ValidationError(format!(
                "item id {:?} is empty after canonicalization",
                raw_id
            )));
        }

        Ok(Self {
            id,
            title: title.into(),
            categories: clean_categories(categories),
            brand: brand.into(),
            sales_type: sales_type.into(),
        })
    }

    /// Category text used in prompts; empty categories read as "unknown"
    pub fn category_label(&self) -> &str {
        if self.categories.is_empty() {
            "unknown"
        } else {
            &self.categories
        }
    }
}

impl PartialEq for MusicItem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MusicItem {}

impl Hash for MusicItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Compact JSON, used as the ratings key in result files
impl fmt::Display for MusicItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
