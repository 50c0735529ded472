//! Batch driver: fill in missing categories and tally the result.

use crate::{categorize, Backup, Category, RuleSet};

/// Per-category counts over a dataset, iterated in display order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryTally {
    counts: [usize; Category::ALL.len()],
}

impl CategoryTally {
    /// Count one record under the given category
    pub fn record(&mut self, category: Category) {
        self.counts[category.index()] += 1;
    }

    pub fn get(&self, category: Category) -> usize {
        self.counts[category.index()]
    }

    /// Iterate (category, count) pairs in display order
    pub fn iter(&self) -> impl Iterator<Item = (Category, usize)> + '_ {
        Category::ALL.iter().map(move |c| (*c, self.counts[c.index()]))
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Outcome of a categorization run
#[derive(Clone, Debug)]
pub struct RunStats {
    pub newly_categorized: usize,
    pub already_categorized: usize,
    /// Per-category counts over the entire final dataset, not just the
    /// newly categorized records
    pub tally: CategoryTally,
}

/// Fill in every missing category in the backup and tally the final dataset
///
/// Records that already carry a non-empty category are left untouched, so
/// re-running over an already-categorized file changes nothing.
pub fn categorize_backup(backup: &mut Backup, rules: &RuleSet) -> RunStats {
    let mut newly_categorized = 0;
    let mut already_categorized = 0;

    for food in &mut backup.foods {
        if food.has_category() {
            already_categorized += 1;
        } else {
            let category = categorize(rules, food);
            food.category = Some(category.as_str().to_string());
            newly_categorized += 1;
        }
    }

    let mut tally = CategoryTally::default();
    for food in &backup.foods {
        match food.category.as_deref().and_then(Category::parse) {
            Some(category) => tally.record(category),
            None => {
                // Pre-existing tags outside the known set are preserved on
                // the record but kept out of the nine-bucket tally.
                tracing::warn!(
                    "Food '{}' has category {:?} outside the known set; not tallied",
                    food.name,
                    food.category
                );
            }
        }
    }

    tracing::info!(
        "Categorized {} foods ({} already categorized)",
        newly_categorized,
        already_categorized
    );

    RunStats {
        newly_categorized,
        already_categorized,
        tally,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_default_rules;

    fn scenario_backup() -> Backup {
        serde_json::from_str(
            r#"{
              "foods": [
                {"name": "Blanc de poulet", "proteins": 23, "carbs": 0, "fats": 2},
                {"name": "Riz basmati", "proteins": 2, "carbs": 78, "fats": 0.5},
                {"name": "Café", "proteins": 0, "carbs": 0, "fats": 0, "category": "beverages"}
              ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_end_to_end_scenario() {
        let rules = build_default_rules();
        let mut backup = scenario_backup();

        let stats = categorize_backup(&mut backup, &rules);

        let categories: Vec<&str> = backup
            .foods
            .iter()
            .map(|f| f.category.as_deref().unwrap())
            .collect();
        assert_eq!(categories, vec!["proteins", "starches", "beverages"]);

        assert_eq!(stats.newly_categorized, 2);
        assert_eq!(stats.already_categorized, 1);
        assert_eq!(stats.tally.get(Category::Proteins), 1);
        assert_eq!(stats.tally.get(Category::Starches), 1);
        assert_eq!(stats.tally.get(Category::Beverages), 1);
        assert_eq!(stats.tally.total(), 3);
    }

    #[test]
    fn test_second_run_changes_nothing() {
        let rules = build_default_rules();
        let mut backup = scenario_backup();

        categorize_backup(&mut backup, &rules);
        let after_first: Vec<Option<String>> =
            backup.foods.iter().map(|f| f.category.clone()).collect();

        let stats = categorize_backup(&mut backup, &rules);
        let after_second: Vec<Option<String>> =
            backup.foods.iter().map(|f| f.category.clone()).collect();

        assert_eq!(after_first, after_second);
        assert_eq!(stats.newly_categorized, 0);
        assert_eq!(stats.already_categorized, 3);
    }

    #[test]
    fn test_empty_category_is_filled() {
        let rules = build_default_rules();
        let mut backup: Backup = serde_json::from_str(
            r#"{"foods": [{"name": "Saumon fumé", "category": ""}]}"#,
        )
        .unwrap();

        let stats = categorize_backup(&mut backup, &rules);
        assert_eq!(stats.newly_categorized, 1);
        assert_eq!(backup.foods[0].category.as_deref(), Some("proteins"));
    }

    #[test]
    fn test_unknown_existing_tag_preserved_but_not_tallied() {
        let rules = build_default_rules();
        let mut backup: Backup = serde_json::from_str(
            r#"{"foods": [{"name": "Mystère", "category": "homemade"}]}"#,
        )
        .unwrap();

        let stats = categorize_backup(&mut backup, &rules);
        assert_eq!(stats.already_categorized, 1);
        assert_eq!(backup.foods[0].category.as_deref(), Some("homemade"));
        assert_eq!(stats.tally.total(), 0);
    }

    #[test]
    fn test_tally_display_order() {
        let tally = CategoryTally::default();
        let order: Vec<Category> = tally.iter().map(|(c, _)| c).collect();
        assert_eq!(order.as_slice(), &Category::ALL);
    }
}
