//! The categorization rule table.
//!
//! The keyword lists are domain data, not logic: the table is an ordered
//! list of (category, keyword-set) pairs evaluated in sequence, followed by
//! macro-threshold fallbacks and a trailing condiment group. Order is
//! load-bearing; the first hit wins.

use crate::{Category, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One keyword group: the first group with a substring hit in the food
/// name decides the category.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeywordGroup {
    pub category: Category,
    pub keywords: Vec<String>,
}

/// Macro-threshold fallback rule
///
/// All present bounds must hold; comparisons are strict. A rule with no
/// bounds would match every record and is rejected by `validate`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MacroRule {
    pub category: Category,
    #[serde(default)]
    pub proteins_over: Option<f64>,
    #[serde(default)]
    pub proteins_under: Option<f64>,
    #[serde(default)]
    pub carbs_over: Option<f64>,
    #[serde(default)]
    pub carbs_under: Option<f64>,
    #[serde(default)]
    pub fats_over: Option<f64>,
}

impl MacroRule {
    /// Whether every bound of this rule holds for the given macros
    pub fn matches(&self, proteins: f64, carbs: f64, fats: f64) -> bool {
        let over = |bound: Option<f64>, value: f64| bound.map_or(true, |b| value > b);
        let under = |bound: Option<f64>, value: f64| bound.map_or(true, |b| value < b);

        over(self.proteins_over, proteins)
            && under(self.proteins_under, proteins)
            && over(self.carbs_over, carbs)
            && under(self.carbs_under, carbs)
            && over(self.fats_over, fats)
    }
}

/// The complete ordered rule table
///
/// Evaluation order: `groups` (first substring hit wins), then `fallbacks`
/// (first matching thresholds win), then `trailing_groups`, then
/// `Category::Other`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RuleSet {
    pub groups: Vec<KeywordGroup>,

    #[serde(default)]
    pub fallbacks: Vec<MacroRule>,

    /// Keyword groups consulted only after the macro fallbacks
    /// (condiments and seasonings in the built-in table)
    #[serde(default)]
    pub trailing_groups: Vec<KeywordGroup>,
}

/// Cached built-in rule table - built once and reused across all operations
static DEFAULT_RULES: Lazy<RuleSet> = Lazy::new(build_default_rules_internal);

/// Get a reference to the cached built-in rule table
pub fn get_default_rules() -> &'static RuleSet {
    &DEFAULT_RULES
}

/// Builds the built-in rule table
///
/// **Note**: For production use, prefer `get_default_rules()` which returns
/// a cached reference. This function is retained for testing and custom
/// table creation.
pub fn build_default_rules() -> RuleSet {
    build_default_rules_internal()
}

/// Internal function that actually builds the table
fn build_default_rules_internal() -> RuleSet {
    fn group(category: Category, keywords: &[&str]) -> KeywordGroup {
        KeywordGroup {
            category,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    // ========================================================================
    // Keyword groups (priority order)
    // ========================================================================

    let groups = vec![
        group(
            Category::Proteins,
            &[
                "poulet",
                "blanc de poulet",
                "grignotte",
                "boeuf",
                "steack",
                "steak",
                "charal",
                "morue",
                "accras",
                "thon",
                "sardine",
                "saumon",
                "oeuf",
                "jaune d",
                "protéine",
                "soja textur",
                "carpaccio",
            ],
        ),
        group(
            Category::Starches,
            &[
                "riz",
                "pâte",
                "pasta",
                "pain",
                "baguette",
                "brioche",
                "pomme de terre",
                "frite",
                "potatoes",
                "farine",
                "penne",
                "fusilli",
                "nouille",
                "udon",
                "lentille",
                "haricot rouge",
                "châtaigne",
                "chataigne",
            ],
        ),
        group(
            Category::Vegetables,
            &[
                "brocoli",
                "haricot vert",
                "champignon",
                "poivron",
                "poireau",
                "oignon",
                "petit pois",
                "sucrine",
                "olive",
                "légume",
                "poêlée",
                "ail gingembre",
            ],
        ),
        group(
            Category::Fruits,
            &["pomme", "kiwi", "orange", "raisin", "fruit", "gala"],
        ),
        group(
            Category::Dairy,
            &[
                "fromage",
                "comté",
                "raclette",
                "tomme",
                "saint nectaire",
                "ricotta",
                "lait",
                "skyr",
            ],
        ),
        group(
            Category::Fats,
            &["huile", "beurre", "amande", "noix", "crème de soja"],
        ),
        group(
            Category::Beverages,
            &[
                "coca", "fanta", "jus", "eau", "scheppes", "tonic", "sake", "rhum",
                "kieffer", "mirin",
            ],
        ),
        group(
            Category::Snacks,
            &[
                "burger",
                "mcdo",
                "mcdonald",
                "mcflurry",
                "mcextreme",
                "pizza",
                "sandwich",
                "biscuit",
                "chocolat",
                "pain au chocolat",
                "pâte à tartiner",
                "sucre",
                "tablette",
                "petit beurre",
                "gerblé",
            ],
        ),
    ];

    // ========================================================================
    // Macro-threshold fallbacks
    // ========================================================================

    let fallbacks = vec![
        // Very protein-rich with almost no carbs
        MacroRule {
            category: Category::Proteins,
            proteins_over: Some(15.0),
            proteins_under: None,
            carbs_over: None,
            carbs_under: Some(2.0),
            fats_over: None,
        },
        // Very fat-rich
        MacroRule {
            category: Category::Fats,
            proteins_over: None,
            proteins_under: None,
            carbs_over: None,
            carbs_under: None,
            fats_over: Some(80.0),
        },
        // Very carb-rich without much protein
        MacroRule {
            category: Category::Starches,
            proteins_over: None,
            proteins_under: Some(15.0),
            carbs_over: Some(60.0),
            carbs_under: None,
            fats_over: None,
        },
    ];

    // ========================================================================
    // Trailing groups (condiments and special ingredients)
    // ========================================================================

    let trailing_groups = vec![group(
        Category::Other,
        &["sauce", "miso", "levure", "sel", "son de blé", "tarte"],
    )];

    RuleSet {
        groups,
        fallbacks,
        trailing_groups,
    }
}

impl RuleSet {
    /// Load a rule table from a TOML file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let rules: RuleSet = toml::from_str(&contents)?;
        tracing::info!("Loaded rule table from {:?}", path);
        Ok(rules)
    }

    /// Validate the rule table for consistency
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.groups.is_empty() {
            errors.push("Rule table has no keyword groups".to_string());
        }

        let mut seen = std::collections::HashSet::new();
        for group in self.groups.iter().chain(&self.trailing_groups) {
            if group.keywords.is_empty() {
                errors.push(format!("Keyword group '{}' has no keywords", group.category));
            }
            if !seen.insert(group.category) {
                errors.push(format!(
                    "Category '{}' appears in more than one keyword group",
                    group.category
                ));
            }
            for keyword in &group.keywords {
                if keyword.is_empty() {
                    errors.push(format!(
                        "Keyword group '{}' contains an empty keyword",
                        group.category
                    ));
                }
                // Names are lower-cased before matching, so an uppercase
                // keyword can never match anything.
                if *keyword != keyword.to_lowercase() {
                    errors.push(format!(
                        "Keyword '{}' in group '{}' is not lowercase and can never match",
                        keyword, group.category
                    ));
                }
            }
        }

        for rule in &self.fallbacks {
            if rule.proteins_over.is_none()
                && rule.proteins_under.is_none()
                && rule.carbs_over.is_none()
                && rule.carbs_under.is_none()
                && rule.fats_over.is_none()
            {
                errors.push(format!(
                    "Macro fallback for '{}' has no bounds and would match every record",
                    rule.category
                ));
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules_validate() {
        let rules = build_default_rules();
        let errors = rules.validate();
        assert!(
            errors.is_empty(),
            "Built-in rule table has validation errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_default_group_order() {
        let rules = build_default_rules();
        let order: Vec<Category> = rules.groups.iter().map(|g| g.category).collect();
        assert_eq!(
            order,
            vec![
                Category::Proteins,
                Category::Starches,
                Category::Vegetables,
                Category::Fruits,
                Category::Dairy,
                Category::Fats,
                Category::Beverages,
                Category::Snacks,
            ]
        );
        assert_eq!(rules.trailing_groups.len(), 1);
        assert_eq!(rules.trailing_groups[0].category, Category::Other);
    }

    #[test]
    fn test_default_fallback_order() {
        let rules = build_default_rules();
        let order: Vec<Category> = rules.fallbacks.iter().map(|r| r.category).collect();
        assert_eq!(
            order,
            vec![Category::Proteins, Category::Fats, Category::Starches]
        );
    }

    #[test]
    fn test_macro_rule_bounds_are_strict() {
        let rule = MacroRule {
            category: Category::Proteins,
            proteins_over: Some(15.0),
            proteins_under: None,
            carbs_over: None,
            carbs_under: Some(2.0),
            fats_over: None,
        };
        assert!(rule.matches(15.1, 1.9, 0.0));
        assert!(!rule.matches(15.0, 1.9, 0.0)); // boundary excluded
        assert!(!rule.matches(15.1, 2.0, 0.0));
    }

    #[test]
    fn test_toml_roundtrip() {
        let rules = build_default_rules();
        let toml_str = toml::to_string(&rules).unwrap();
        let parsed: RuleSet = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.groups.len(), rules.groups.len());
        assert_eq!(parsed.fallbacks.len(), rules.fallbacks.len());
        assert_eq!(
            parsed.groups[0].keywords, rules.groups[0].keywords
        );
        assert!(parsed.validate().is_empty());
    }

    #[test]
    fn test_minimal_toml_table() {
        let toml_str = r#"
[[groups]]
category = "proteins"
keywords = ["tofu"]
"#;
        let rules: RuleSet = toml::from_str(toml_str).unwrap();
        assert_eq!(rules.groups.len(), 1);
        assert!(rules.fallbacks.is_empty());
        assert!(rules.trailing_groups.is_empty());
        assert!(rules.validate().is_empty());
    }

    #[test]
    fn test_validate_rejects_catch_all_fallback() {
        let mut rules = build_default_rules();
        rules.fallbacks.push(MacroRule {
            category: Category::Other,
            proteins_over: None,
            proteins_under: None,
            carbs_over: None,
            carbs_under: None,
            fats_over: None,
        });
        let errors = rules.validate();
        assert!(errors.iter().any(|e| e.contains("no bounds")));
    }

    #[test]
    fn test_validate_rejects_uppercase_keyword() {
        let mut rules = build_default_rules();
        rules.groups[0].keywords.push("Poulet".to_string());
        let errors = rules.validate();
        assert!(errors.iter().any(|e| e.contains("not lowercase")));
    }
}
