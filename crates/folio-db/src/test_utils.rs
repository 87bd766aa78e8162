//! Shared test fixtures: in-memory database setup and catalog builders.

use folio_core::BookInput;

use crate::pool::{Database, DbConfig};

/// Centralized test database setup to eliminate duplication across test
/// files. Creates an in-memory SQLite database with all migrations applied.
pub(crate) async fn test_db() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

/// Returns a `BookInput` with the given title, ISBN, price, and stock and
/// neutral defaults elsewhere. The author and genre are deliberately bland
/// so that search tests only hit the fields they set themselves.
pub(crate) fn book_input(title: &str, isbn: &str, price_cents: i64, stock: i64) -> BookInput {
    BookInput {
        title: title.to_string(),
        author: "Test Author".to_string(),
        isbn: isbn.to_string(),
        price_cents,
        stock,
        genre: "Fiction".to_string(),
        cover_url: None,
    }
}
