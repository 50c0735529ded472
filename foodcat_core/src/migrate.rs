//! Legacy backup format migration.
//!
//! Older exports stored a food's price weight as `priceGrams`; the current
//! application format uses `priceQuantity` + `priceUnit` and always carries
//! the `isPortionBased` and `portionWeight` fields.

use crate::{Backup, FoodRecord};
use serde_json::Value;

/// Outcome of a format migration run
#[derive(Clone, Debug, Default)]
pub struct MigrationStats {
    pub total: usize,
    pub fixed: usize,
    /// Names of records whose price fields were migrated
    pub migrated_prices: Vec<String>,
}

/// Bring one record up to the current format; returns whether it changed
pub fn fix_food_format(food: &mut FoodRecord) -> bool {
    let mut changed = false;

    if let Some(grams) = food.extra.remove("priceGrams") {
        food.extra.insert("priceQuantity".to_string(), grams);
        food.extra
            .insert("priceUnit".to_string(), Value::String("grams".to_string()));
        changed = true;
    }

    if !food.extra.contains_key("isPortionBased") {
        food.extra
            .insert("isPortionBased".to_string(), Value::Bool(false));
        changed = true;
    }

    if !food.extra.contains_key("portionWeight") {
        food.extra.insert("portionWeight".to_string(), Value::Null);
        changed = true;
    }

    changed
}

/// Migrate every record in the backup to the current format
pub fn fix_backup_format(backup: &mut Backup) -> MigrationStats {
    let mut stats = MigrationStats {
        total: backup.foods.len(),
        ..Default::default()
    };

    for food in &mut backup.foods {
        let had_legacy_price = food.extra.contains_key("priceGrams");
        if fix_food_format(food) {
            stats.fixed += 1;
            if had_legacy_price {
                stats.migrated_prices.push(food.name.clone());
            }
            tracing::debug!("Fixed format for '{}'", food.name);
        }
    }

    tracing::info!("Fixed {} of {} foods", stats.fixed, stats.total);
    stats
}
