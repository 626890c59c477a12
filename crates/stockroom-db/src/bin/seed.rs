//! # Seed Data Generator
//!
//! Populates the SQLite database with demo products for development.
//!
//! ## Usage
//! ```bash
//! # Generate 200 products (default)
//! cargo run -p stockroom-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p stockroom-db --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p stockroom-db --bin seed -- --db ./data/stockroom.db
//! ```
//!
//! ## Generated Products
//! - Code: `{CATEGORY}-{INDEX}` (e.g. `LAC-0007`)
//! - Description: item name plus size
//! - Primary EAN: valid EAN-13 with a `84` (Spain) prefix
//! - Secondary EAN: on every third product

use std::env;

use anyhow::{bail, Context};
use stockroom_core::ean::check_digit;
use stockroom_core::ProductInput;
use stockroom_db::{Catalog, Database, DbConfig, SqliteStore};

/// Product categories for realistic demo data
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "LAC",
        &["Leche entera", "Leche desnatada", "Yogur natural", "Queso fresco", "Mantequilla"],
    ),
    (
        "BEB",
        &["Agua mineral", "Zumo de naranja", "Refresco de cola", "Café molido", "Té verde"],
    ),
    (
        "DES",
        &["Galletas María", "Cereales", "Magdalenas", "Tostadas", "Mermelada de fresa"],
    ),
    (
        "DRO",
        &["Detergente", "Lavavajillas", "Papel higiénico", "Champú", "Gel de ducha"],
    ),
];

const SIZES: &[&str] = &["pequeño", "mediano", "grande", "familiar"];

/// Builds a valid EAN-13 from a numeric seed.
fn ean_for(seed: usize) -> anyhow::Result<String> {
    let body = format!("84{:010}", seed % 10_000_000_000);
    let check = check_digit(&body).context("generated EAN body is not 12 digits")?;
    Ok(format!("{body}{check}"))
}

fn generate(index: usize) -> anyhow::Result<ProductInput> {
    let (category, items) = CATEGORIES[index % CATEGORIES.len()];
    let item = items[(index / CATEGORIES.len()) % items.len()];
    let size = SIZES[(index / (CATEGORIES.len() * items.len())) % SIZES.len()];

    let mut input = ProductInput::new(
        format!("{category}-{index:04}"),
        format!("{item} ({size})"),
        ean_for(index * 2)?,
    );
    if index % 3 == 0 {
        input = input.with_secondary(ean_for(index * 2 + 1)?);
    }
    Ok(input)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./stockroom_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                let value = args.get(i + 1).context("--count needs a value")?;
                count = value.parse().with_context(|| format!("invalid count: {value}"))?;
                i += 1;
            }
            "--db" | "-d" => {
                db_path = args.get(i + 1).context("--db needs a value")?.clone();
                i += 1;
            }
            "--help" | "-h" => {
                println!("Stockroom Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./stockroom_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => bail!("unknown argument: {other}"),
        }
        i += 1;
    }

    println!("Stockroom Seed Data Generator");
    println!("=============================");
    println!("Database: {db_path}");
    println!("Products: {count}");
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database, migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {existing} products");
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let catalog = Catalog::new(SqliteStore::new(db.clone()));
    let inputs = (0..count).map(generate).collect::<anyhow::Result<Vec<_>>>()?;

    let start = std::time::Instant::now();
    let report = catalog.import_products(&inputs).await;
    let elapsed = start.elapsed();

    println!();
    println!(
        "✓ Generated {} products in {:?} ({} failed)",
        report.imported, elapsed, report.failed
    );

    db.close().await;
    Ok(())
}
