//! Core domain types for the food categorizer.
//!
//! This module defines the fundamental types used throughout the system:
//! - The closed set of category tags
//! - Food records as stored in the tracker's backup file
//! - The backup document itself

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Category
// ============================================================================

/// Classification tag applied to a food record
///
/// The set is closed: every record ends a run carrying one of these nine
/// tags (or whatever non-empty tag it already had).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Proteins,
    Starches,
    Vegetables,
    Fruits,
    Dairy,
    Fats,
    Beverages,
    Snacks,
    Other,
}

impl Category {
    /// All categories, in display and tally order
    pub const ALL: [Category; 9] = [
        Category::Proteins,
        Category::Starches,
        Category::Vegetables,
        Category::Fruits,
        Category::Dairy,
        Category::Fats,
        Category::Beverages,
        Category::Snacks,
        Category::Other,
    ];

    /// The tag as stored in the backup file
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Proteins => "proteins",
            Category::Starches => "starches",
            Category::Vegetables => "vegetables",
            Category::Fruits => "fruits",
            Category::Dairy => "dairy",
            Category::Fats => "fats",
            Category::Beverages => "beverages",
            Category::Snacks => "snacks",
            Category::Other => "other",
        }
    }

    /// Parse a stored category tag
    ///
    /// Returns `None` for tags outside the known set; callers decide
    /// whether that is an error (the batch driver preserves such tags on
    /// the record but leaves them out of the tally).
    pub fn parse(tag: &str) -> Option<Category> {
        match tag {
            "proteins" => Some(Category::Proteins),
            "starches" => Some(Category::Starches),
            "vegetables" => Some(Category::Vegetables),
            "fruits" => Some(Category::Fruits),
            "dairy" => Some(Category::Dairy),
            "fats" => Some(Category::Fats),
            "beverages" => Some(Category::Beverages),
            "snacks" => Some(Category::Snacks),
            "other" => Some(Category::Other),
            _ => None,
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Food record and backup document
// ============================================================================

/// A food entry from the backup file
///
/// Only the fields this program reads are typed. Everything else the
/// tracking app stores per food (ids, prices, portion flags, ...) passes
/// through untouched in `extra`, so the written file keeps the same shape
/// as the input.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FoodRecord {
    pub name: String,

    /// Grams per 100g (or per serving, depending on the source record).
    /// Absent fields deserialize to 0.
    #[serde(default)]
    pub proteins: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fats: f64,

    /// Category tag; absent or empty means "not yet categorized"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FoodRecord {
    /// Whether the record already carries a non-empty category tag
    pub fn has_category(&self) -> bool {
        self.category.as_deref().map_or(false, |c| !c.is_empty())
    }
}

/// A full nutrition-tracker backup document
///
/// Top-level keys other than `foods` are preserved verbatim.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Backup {
    pub foods: Vec<FoodRecord>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
