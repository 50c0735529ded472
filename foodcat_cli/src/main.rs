use clap::{Parser, Subcommand};
use foodcat_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "foodcat")]
#[command(about = "Nutrition backup food categorizer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill in missing food categories in a backup file
    Categorize {
        /// Input backup JSON file
        input: PathBuf,

        /// Output file (defaults to a sibling of the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// TOML rule table used instead of the built-in one
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Categorize and report without writing the output file
        #[arg(long)]
        dry_run: bool,
    },

    /// Migrate a backup file from the legacy price/portion format
    FixFormat {
        /// Input backup JSON file
        input: PathBuf,

        /// Output file (defaults to a sibling of the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    foodcat_core::logging::init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Categorize {
            input,
            output,
            rules,
            dry_run,
        } => cmd_categorize(&input, output, rules, dry_run, &config),
        Commands::FixFormat { input, output } => cmd_fix_format(&input, output, &config),
    }
}

fn cmd_categorize(
    input: &Path,
    output: Option<PathBuf>,
    rules_file: Option<PathBuf>,
    dry_run: bool,
    config: &Config,
) -> Result<()> {
    // CLI flag wins over the config file; otherwise the built-in table
    let custom_rules;
    let rules = match rules_file.or_else(|| config.rules.file.clone()) {
        Some(path) => {
            custom_rules = RuleSet::load_from(&path)?;
            &custom_rules
        }
        None => get_default_rules(),
    };
    tracing::debug!("Using rule table with {} keyword groups", rules.groups.len());

    let errors = rules.validate();
    if !errors.is_empty() {
        eprintln!("Rule table validation errors:");
        for error in &errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::Rules("Invalid rule table".into()));
    }

    let output = resolve_output_path(input, output, &config.output.categorized_suffix)?;

    let mut backup = load_backup(input)?;
    let stats = categorize_backup(&mut backup, rules);

    if dry_run {
        print_report(&stats, &output);
        println!("\n[Dry run - output file not written]");
        return Ok(());
    }

    save_backup(&output, &backup)?;
    print_report(&stats, &output);

    Ok(())
}

fn cmd_fix_format(input: &Path, output: Option<PathBuf>, config: &Config) -> Result<()> {
    let output = resolve_output_path(input, output, &config.output.corrected_suffix)?;

    let mut backup = load_backup(input)?;
    println!("📊 {} foods found\n", backup.foods.len());

    let stats = fix_backup_format(&mut backup);

    save_backup(&output, &backup)?;

    println!("✅ Format fix complete!");
    println!();
    println!("   • Total foods: {}", stats.total);
    println!("   • Foods fixed: {}", stats.fixed);
    println!("   • Already up to date: {}", stats.total - stats.fixed);

    if !stats.migrated_prices.is_empty() {
        println!();
        println!("📋 Price format migrated for:");
        for (i, name) in stats.migrated_prices.iter().enumerate() {
            println!("   {}. {}", i + 1, name);
        }
    }

    println!();
    println!("💾 Output file: {}", output.display());

    Ok(())
}

/// Pick the output path and refuse to write over the input file
fn resolve_output_path(input: &Path, output: Option<PathBuf>, suffix: &str) -> Result<PathBuf> {
    let output = output.unwrap_or_else(|| derive_output_path(input, suffix));
    if output == input {
        return Err(Error::Backup(format!(
            "output path {} would overwrite the input file",
            output.display()
        )));
    }
    Ok(output)
}

fn print_report(stats: &RunStats, output: &Path) {
    println!("✅ Categorization complete!");
    println!();
    println!("📊 {} foods categorized", stats.newly_categorized);
    println!("⏭️  {} foods already categorized", stats.already_categorized);
    println!();
    println!("🏷️  Breakdown by category:");
    for (category, count) in stats.tally.iter() {
        println!(
            "   {} {}: {}",
            category_emoji(category),
            category_label(category),
            count
        );
    }
    println!();
    println!("📁 Output file: {}", output.display());
}

fn category_emoji(category: Category) -> &'static str {
    match category {
        Category::Proteins => "🥩",
        Category::Starches => "🍚",
        Category::Vegetables => "🥦",
        Category::Fruits => "🍎",
        Category::Dairy => "🥛",
        Category::Fats => "🥑",
        Category::Beverages => "🥤",
        Category::Snacks => "🍫",
        Category::Other => "📦",
    }
}

fn category_label(category: Category) -> &'static str {
    match category {
        Category::Proteins => "Proteins",
        Category::Starches => "Starches",
        Category::Vegetables => "Vegetables",
        Category::Fruits => "Fruits",
        Category::Dairy => "Dairy",
        Category::Fats => "Fats",
        Category::Beverages => "Beverages",
        Category::Snacks => "Snacks & sweets",
        Category::Other => "Other",
    }
}
