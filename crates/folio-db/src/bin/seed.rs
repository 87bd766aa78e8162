//! # Seed Data Generator
//!
//! Populates the database with the demo bookstore catalog.
//!
//! ## Usage
//! ```bash
//! # Seed the default database file
//! cargo run -p folio-db --bin seed
//!
//! # Specify database path
//! cargo run -p folio-db --bin seed -- --db ./data/folio.db
//!
//! # Seed missing canonical titles into a catalog that already has books
//! cargo run -p folio-db --bin seed -- --force
//! ```
//!
//! ## Catalog
//! Eight well-known titles across fiction and technology. Stock levels
//! are chosen to exercise the dashboard: a couple of low-stock books
//! and one sold out entirely.

use std::env;

use folio_core::BookInput;
use folio_db::{Database, DbConfig};
use tracing_subscriber::EnvFilter;

/// The demo catalog: (title, author, isbn, price_cents, stock, genre).
const CATALOG: &[(&str, &str, &str, i64, i64, &str)] = &[
    (
        "The Great Gatsby",
        "F. Scott Fitzgerald",
        "978-0743273565",
        59900,
        25,
        "Classic Fiction",
    ),
    (
        "To Kill a Mockingbird",
        "Harper Lee",
        "978-0061120084",
        49900,
        3,
        "Classic Fiction",
    ),
    (
        "1984",
        "George Orwell",
        "978-0451524935",
        44900,
        18,
        "Dystopian",
    ),
    (
        "Pride and Prejudice",
        "Jane Austen",
        "978-0141439518",
        39900,
        2,
        "Romance",
    ),
    (
        "The Catcher in the Rye",
        "J.D. Salinger",
        "978-0316769488",
        54900,
        12,
        "Coming-of-Age",
    ),
    (
        "Clean Code",
        "Robert C. Martin",
        "978-0132350884",
        189900,
        8,
        "Technology",
    ),
    (
        "The Pragmatic Programmer",
        "David Thomas & Andrew Hunt",
        "978-0135957059",
        249900,
        4,
        "Technology",
    ),
    (
        "Dune",
        "Frank Herbert",
        "978-0441172719",
        74900,
        0,
        "Science Fiction",
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./folio_dev.db");
    let mut force = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--force" | "-f" => {
                force = true;
            }
            "--help" | "-h" => {
                println!("Folio Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./folio_dev.db)");
                println!("  -f, --force        Seed even if the catalog already has books");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Folio Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing books
    let existing = db.stats().inventory().await?.total_books;
    if existing > 0 && !force {
        println!("⚠ Database already has {} books", existing);
        println!("  Skipping seed to avoid surprises.");
        println!("  Re-run with --force to add any missing canonical titles.");
        return Ok(());
    }

    println!();

    let mut created = 0;
    let mut skipped = 0;

    for (title, author, isbn, price_cents, stock, genre) in CATALOG {
        // Never duplicate a title that is already in the catalog
        if db.books().get_by_isbn(isbn).await?.is_some() {
            skipped += 1;
            println!("  ⚠ {} (already seeded)", title);
            continue;
        }

        let input = BookInput {
            title: (*title).to_string(),
            author: (*author).to_string(),
            isbn: (*isbn).to_string(),
            price_cents: *price_cents,
            stock: *stock,
            genre: (*genre).to_string(),
            cover_url: None,
        };

        db.books().create(&input).await?;
        created += 1;
        println!("  ✓ {}", title);
    }

    println!();
    println!("✓ Seed complete: {} created, {} skipped", created, skipped);

    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=folio_db=trace` - Show trace for the database layer only
/// - Default: WARN, so seeding output stays readable
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
