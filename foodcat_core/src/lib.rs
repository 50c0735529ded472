#![forbid(unsafe_code)]

//! Core domain model and logic for the foodcat nutrition-backup tool.
//!
//! This crate provides:
//! - Domain types (categories, food records, backup documents)
//! - The categorization rule table
//! - The categorization engine and batch driver
//! - Backup file I/O
//! - Legacy-format migration

pub mod types;
pub mod error;
pub mod rules;
pub mod config;
pub mod logging;
pub mod backup;
pub mod categorize;
pub mod batch;
pub mod migrate;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use rules::{build_default_rules, get_default_rules, RuleSet};
pub use config::Config;
pub use backup::{derive_output_path, load_backup, save_backup};
pub use categorize::categorize;
pub use batch::{categorize_backup, CategoryTally, RunStats};
pub use migrate::{fix_backup_format, fix_food_format, MigrationStats};
