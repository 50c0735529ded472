//! Categorization engine.
//!
//! Ordered rule evaluation, first match wins, no backtracking:
//! keyword groups in table order, then macro-threshold fallbacks, then the
//! trailing condiment groups, then `Category::Other`.

use crate::rules::KeywordGroup;
use crate::{Category, FoodRecord, RuleSet};

/// Assign a category to a food record
///
/// Total and deterministic: always returns one of the nine tags, never
/// fails, regardless of what the record looks like. Matching is substring
/// containment over the lower-cased name; word boundaries are ignored on
/// purpose, so "pâtisserie" matches the "pâte" keyword. The record's
/// existing category field plays no part here.
pub fn categorize(rules: &RuleSet, food: &FoodRecord) -> Category {
    let name = food.name.to_lowercase();

    if let Some(category) = first_keyword_match(&rules.groups, &name) {
        return category;
    }

    for rule in &rules.fallbacks {
        if rule.matches(food.proteins, food.carbs, food.fats) {
            tracing::debug!(
                "'{}' matched macro fallback ({}/{}/{}) -> {}",
                food.name,
                food.proteins,
                food.carbs,
                food.fats,
                rule.category
            );
            return rule.category;
        }
    }

    if let Some(category) = first_keyword_match(&rules.trailing_groups, &name) {
        return category;
    }

    Category::Other
}

/// First group with a substring hit in the name, in table order
fn first_keyword_match(groups: &[KeywordGroup], name: &str) -> Option<Category> {
    for group in groups {
        if let Some(keyword) = group.keywords.iter().find(|k| name.contains(k.as_str())) {
            tracing::debug!("'{}' matched keyword '{}' -> {}", name, keyword, group.category);
            return Some(group.category);
        }
    }
    None
}
