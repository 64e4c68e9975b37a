use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use stockroom::{CategoryName, add_category, get_categories, open_db};

/// The categories a new store starts with.
const DEFAULT_CATEGORIES: [&str; 4] = ["T-Shirts", "Pants", "Shoes", "Accessories"];

/// Create or verify the stockroom database and seed the default categories.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the SQLite database, created if it does not exist.
    #[arg(long, default_value = "inventory.db")]
    db_path: PathBuf,

    /// Only create the schema, do not add the default categories.
    #[arg(long)]
    no_seed: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    println!("Opening database at {:#?}", args.db_path);
    let connection = open_db(&args.db_path)?;

    if !args.no_seed && get_categories(&connection)?.is_empty() {
        println!("Adding default categories...");

        for name in DEFAULT_CATEGORIES {
            add_category(CategoryName::new(name)?, &connection)?;
        }
    }

    println!("Categories:");
    for category in get_categories(&connection)? {
        println!("  {:>3}  {}", category.id, category.name);
    }

    println!("Success!");

    Ok(())
}
