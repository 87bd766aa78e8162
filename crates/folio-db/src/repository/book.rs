//! # Book Repository
//!
//! Database operations for the catalog.
//!
//! ## Key Operations
//! - Catalog CRUD with ISBN uniqueness
//! - Shelf search for the checkout screen
//! - Guarded delete vs force delete
//!
//! ## Delete Guard
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Two Ways To Remove A Book                            │
//! │                                                                         │
//! │  delete(id)                                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  COUNT sale lines referencing the book                                  │
//! │       ├── count > 0 → SaleRecordsExist(count)                          │
//! │       │               (caller may offer force delete)                   │
//! │       └── count = 0 → DELETE row                                        │
//! │                                                                         │
//! │  force_delete(id)                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DELETE all the book's sale lines                                       │
//! │       ├── affected sale now empty → DELETE the sale                     │
//! │       └── lines remain           → recompute the sale total             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DELETE the book row                                                    │
//! │  (stock is never returned anywhere: the book ceases to exist)          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::StoreResult;
use crate::repository::sale::line_rollup;
use folio_core::validation::{validate_book_input, validate_search_query, validate_stock};
use folio_core::{Book, BookInput, CoreError};

/// Repository for catalog database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = BookRepository::new(pool);
///
/// // Search the shelf
/// let results = repo.search_available("herbert").await?;
///
/// // Get by ID
/// let book = repo.get("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct BookRepository {
    pool: SqlitePool,
}

impl BookRepository {
    /// Creates a new BookRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BookRepository { pool }
    }

    /// Lists the whole catalog, newest first.
    pub async fn list(&self) -> StoreResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT id, title, author, isbn, price_cents, stock, genre, cover_url,
                   created_at, updated_at
            FROM books
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Gets a book by its ID.
    ///
    /// ## Arguments
    /// * `id` - Book UUID
    ///
    /// ## Returns
    /// * `Ok(Book)` - Book found
    /// * `Err(CoreError::BookNotFound)` - No such book
    pub async fn get(&self, id: &str) -> StoreResult<Book> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            SELECT id, title, author, isbn, price_cents, stock, genre, cover_url,
                   created_at, updated_at
            FROM books
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        book.ok_or_else(|| CoreError::BookNotFound(id.to_string()).into())
    }

    /// Gets a book by its ISBN (exact match after trimming).
    ///
    /// ## Returns
    /// * `Ok(Some(Book))` - Book found
    /// * `Ok(None)` - No book carries this ISBN
    pub async fn get_by_isbn(&self, isbn: &str) -> StoreResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            SELECT id, title, author, isbn, price_cents, stock, genre, cover_url,
                   created_at, updated_at
            FROM books
            WHERE isbn = ?1
            "#,
        )
        .bind(isbn.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    /// Searches in-stock books for the checkout screen.
    ///
    /// ## How It Works
    /// 1. Only books with `stock > 0` appear (nothing sellable is hidden,
    ///    nothing sold-out is offered)
    /// 2. Matches title, author, or ISBN as a substring (ASCII
    ///    case-insensitive)
    /// 3. Empty query returns the whole in-stock shelf
    ///
    /// ## Arguments
    /// * `query` - Search term (can be partial or empty)
    ///
    /// ## Example
    /// ```rust,ignore
    /// let hits = repo.search_available("dune").await?;
    /// let shelf = repo.search_available("").await?;
    /// ```
    pub async fn search_available(&self, query: &str) -> StoreResult<Vec<Book>> {
        let query = validate_search_query(query)?;

        debug!(query = %query, "Searching shelf");

        if query.is_empty() {
            let books = sqlx::query_as::<_, Book>(
                r#"
                SELECT id, title, author, isbn, price_cents, stock, genre, cover_url,
                       created_at, updated_at
                FROM books
                WHERE stock > 0
                ORDER BY title
                "#,
            )
            .fetch_all(&self.pool)
            .await?;

            return Ok(books);
        }

        // Escape LIKE wildcards so a literal search like "100%" matches
        // the text rather than acting as a pattern.
        let escaped = query
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        let pattern = format!("%{}%", escaped);

        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT id, title, author, isbn, price_cents, stock, genre, cover_url,
                   created_at, updated_at
            FROM books
            WHERE stock > 0
              AND (title LIKE ?1 ESCAPE '\'
                OR author LIKE ?1 ESCAPE '\'
                OR isbn LIKE ?1 ESCAPE '\')
            ORDER BY title
            "#,
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = books.len(), "Search returned books");
        Ok(books)
    }

    /// Creates a new catalog book.
    ///
    /// ## Rules
    /// - All text fields are trimmed before validation and storage
    /// - Price and stock must be non-negative
    /// - ISBN must not already exist (exact match after trimming)
    ///
    /// ## Returns
    /// * `Ok(Book)` - The created book with generated id and timestamps
    /// * `Err(CoreError::IsbnExists)` - ISBN already in the catalog
    /// * `Err(CoreError::Validation)` - A field failed validation
    pub async fn create(&self, input: &BookInput) -> StoreResult<Book> {
        let input = input.trimmed();
        validate_book_input(&input)?;

        debug!(isbn = %input.isbn, "Creating book");

        let mut tx = self.pool.begin().await?;

        // Pre-check the business key so the caller gets a domain conflict
        // instead of a raw constraint error; the UNIQUE index still backs
        // this up under races
        let existing: Option<String> = sqlx::query_scalar("SELECT id FROM books WHERE isbn = ?1")
            .bind(&input.isbn)
            .fetch_optional(tx.as_mut())
            .await?;

        if existing.is_some() {
            warn!(isbn = %input.isbn, "Create refused: ISBN already in catalog");
            return Err(CoreError::IsbnExists { isbn: input.isbn }.into());
        }

        let now = Utc::now();
        let book = Book {
            id: Uuid::new_v4().to_string(),
            title: input.title,
            author: input.author,
            isbn: input.isbn,
            price_cents: input.price_cents,
            stock: input.stock,
            genre: input.genre,
            cover_url: input.cover_url,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO books (
                id, title, author, isbn, price_cents, stock, genre, cover_url,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&book.id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(book.price_cents)
        .bind(book.stock)
        .bind(&book.genre)
        .bind(&book.cover_url)
        .bind(book.created_at)
        .bind(book.updated_at)
        .execute(tx.as_mut())
        .await?;

        tx.commit().await?;

        info!(id = %book.id, isbn = %book.isbn, "Book created");
        Ok(book)
    }

    /// Updates an existing catalog book.
    ///
    /// ## Rules
    /// - Same field validation as [`create`](Self::create)
    /// - The ISBN uniqueness check excludes the book being updated, so a
    ///   book may keep its own ISBN
    /// - `created_at` is preserved; `updated_at` is refreshed
    pub async fn update(&self, id: &str, input: &BookInput) -> StoreResult<Book> {
        let input = input.trimmed();
        validate_book_input(&input)?;

        debug!(id = %id, "Updating book");

        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, Book>(
            r#"
            SELECT id, title, author, isbn, price_cents, stock, genre, cover_url,
                   created_at, updated_at
            FROM books
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(tx.as_mut())
        .await?
        .ok_or_else(|| CoreError::BookNotFound(id.to_string()))?;

        let conflict: Option<String> =
            sqlx::query_scalar("SELECT id FROM books WHERE isbn = ?1 AND id != ?2")
                .bind(&input.isbn)
                .bind(id)
                .fetch_optional(tx.as_mut())
                .await?;

        if conflict.is_some() {
            warn!(id = %id, isbn = %input.isbn, "Update refused: ISBN taken by another book");
            return Err(CoreError::IsbnExists { isbn: input.isbn }.into());
        }

        let now = Utc::now();

        sqlx::query(
            r#"
            UPDATE books SET
                title = ?2,
                author = ?3,
                isbn = ?4,
                price_cents = ?5,
                stock = ?6,
                genre = ?7,
                cover_url = ?8,
                updated_at = ?9
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.author)
        .bind(&input.isbn)
        .bind(input.price_cents)
        .bind(input.stock)
        .bind(&input.genre)
        .bind(&input.cover_url)
        .bind(now)
        .execute(tx.as_mut())
        .await?;

        tx.commit().await?;

        info!(id = %id, "Book updated");

        Ok(Book {
            id: existing.id,
            title: input.title,
            author: input.author,
            isbn: input.isbn,
            price_cents: input.price_cents,
            stock: input.stock,
            genre: input.genre,
            cover_url: input.cover_url,
            created_at: existing.created_at,
            updated_at: now,
        })
    }

    /// Overwrites a book's stock count.
    ///
    /// This is the inventory correction tool (recounts, damaged copies,
    /// received shipments). It writes the given count directly and does
    /// not reconcile any sale.
    ///
    /// ## Arguments
    /// * `id` - Book UUID
    /// * `new_stock` - Absolute count to store (must be non-negative)
    pub async fn set_stock(&self, id: &str, new_stock: i64) -> StoreResult<Book> {
        validate_stock(new_stock)?;

        debug!(id = %id, stock = %new_stock, "Setting stock");

        let now = Utc::now();

        let result = sqlx::query("UPDATE books SET stock = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(new_stock)
            .bind(now)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::BookNotFound(id.to_string()).into());
        }

        self.get(id).await
    }

    /// Counts sale lines referencing a book.
    ///
    /// ## Usage
    /// The catalog UI shows this next to the delete button so the user
    /// knows whether a plain delete will be refused.
    pub async fn sale_line_count(&self, id: &str) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sale_lines WHERE book_id = ?1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Deletes a book that has no sales history.
    ///
    /// ## Returns
    /// * `Ok(())` - Book removed
    /// * `Err(CoreError::SaleRecordsExist)` - Sale lines reference the book;
    ///   carries the count so the caller can offer a force delete
    /// * `Err(CoreError::BookNotFound)` - No such book
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        debug!(id = %id, "Deleting book");

        let mut tx = self.pool.begin().await?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sale_lines WHERE book_id = ?1")
            .bind(id)
            .fetch_one(tx.as_mut())
            .await?;

        if count > 0 {
            warn!(id = %id, count, "Delete refused: sales history references the book");
            return Err(CoreError::SaleRecordsExist { count }.into());
        }

        let result = sqlx::query("DELETE FROM books WHERE id = ?1")
            .bind(id)
            .execute(tx.as_mut())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::BookNotFound(id.to_string()).into());
        }

        tx.commit().await?;

        info!(id = %id, "Book deleted");
        Ok(())
    }

    /// Deletes a book together with its entire sales history.
    ///
    /// ## Algorithm (single transaction)
    /// 1. Delete every sale line referencing the book
    /// 2. For each affected sale: delete it if it has no lines left,
    ///    otherwise recompute its total from the remaining lines
    /// 3. Delete the book row
    ///
    /// Stock is not returned to anything: the book row is removed
    /// outright, unlike line removal or sale deletion which put copies
    /// back on the shelf.
    pub async fn force_delete(&self, id: &str) -> StoreResult<()> {
        debug!(id = %id, "Force-deleting book");

        let mut tx = self.pool.begin().await?;

        let exists: Option<String> = sqlx::query_scalar("SELECT id FROM books WHERE id = ?1")
            .bind(id)
            .fetch_optional(tx.as_mut())
            .await?;

        if exists.is_none() {
            return Err(CoreError::BookNotFound(id.to_string()).into());
        }

        // Sales that need a recount once this book's lines are gone
        let affected_sales: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT sale_id FROM sale_lines WHERE book_id = ?1")
                .bind(id)
                .fetch_all(tx.as_mut())
                .await?;

        let lines_removed = sqlx::query("DELETE FROM sale_lines WHERE book_id = ?1")
            .bind(id)
            .execute(tx.as_mut())
            .await?
            .rows_affected();

        let mut sales_deleted = 0u64;
        for sale_id in &affected_sales {
            let (line_count, total_cents) = line_rollup(tx.as_mut(), sale_id).await?;

            if line_count == 0 {
                sqlx::query("DELETE FROM sales WHERE id = ?1")
                    .bind(sale_id)
                    .execute(tx.as_mut())
                    .await?;
                sales_deleted += 1;
            } else {
                sqlx::query("UPDATE sales SET total_cents = ?2 WHERE id = ?1")
                    .bind(sale_id)
                    .bind(total_cents)
                    .execute(tx.as_mut())
                    .await?;
            }
        }

        sqlx::query("DELETE FROM books WHERE id = ?1")
            .bind(id)
            .execute(tx.as_mut())
            .await?;

        tx.commit().await?;

        info!(
            id = %id,
            lines_removed,
            sales_touched = affected_sales.len(),
            sales_deleted,
            "Book force-deleted"
        );
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::test_utils::{book_input, test_db};
    use folio_core::{CartLine, ErrorKind};

    #[tokio::test]
    async fn test_create_and_get_round_trip() {
        let db = test_db().await;

        let created = db
            .books()
            .create(&book_input("Dune", "978-0441172719", 749, 3))
            .await
            .unwrap();

        let fetched = db.books().get(&created.id).await.unwrap();
        assert_eq!(fetched.title, "Dune");
        assert_eq!(fetched.isbn, "978-0441172719");
        assert_eq!(fetched.price_cents, 749);
        assert_eq!(fetched.stock, 3);
        assert_eq!(fetched.created_at, fetched.updated_at);
    }

    #[tokio::test]
    async fn test_create_trims_text_fields() {
        let db = test_db().await;

        let mut input = book_input("  Dune ", " 978-0441172719 ", 749, 3);
        input.author = " Frank Herbert ".to_string();

        let created = db.books().create(&input).await.unwrap();
        assert_eq!(created.title, "Dune");
        assert_eq!(created.author, "Frank Herbert");
        assert_eq!(created.isbn, "978-0441172719");
    }

    #[tokio::test]
    async fn test_create_rejects_blank_title() {
        let db = test_db().await;

        let err = db
            .books()
            .create(&book_input("   ", "978-0441172719", 749, 3))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "Validation error: title is required");
    }

    #[tokio::test]
    async fn test_create_duplicate_isbn_conflicts() {
        let db = test_db().await;

        db.books()
            .create(&book_input("Dune", "978-0441172719", 749, 3))
            .await
            .unwrap();

        // Same ISBN with surrounding whitespace still collides
        let err = db
            .books()
            .create(&book_input("Dune (hardcover)", " 978-0441172719 ", 1499, 1))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(
            err.to_string(),
            "A book with ISBN '978-0441172719' already exists"
        );
    }

    #[tokio::test]
    async fn test_get_by_isbn_trims_needle() {
        let db = test_db().await;

        let created = db
            .books()
            .create(&book_input("Dune", "978-0441172719", 749, 3))
            .await
            .unwrap();

        let found = db.books().get_by_isbn(" 978-0441172719 ").await.unwrap();
        assert_eq!(found.map(|b| b.id), Some(created.id));

        let missing = db.books().get_by_isbn("978-0000000000").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_update_preserves_created_at() {
        let db = test_db().await;

        let created = db
            .books()
            .create(&book_input("Dune", "978-0441172719", 749, 3))
            .await
            .unwrap();

        let mut input = book_input("Dune (revised)", "978-0441172719", 899, 5);
        input.genre = "Science Fiction".to_string();

        let updated = db.books().update(&created.id, &input).await.unwrap();
        assert_eq!(updated.title, "Dune (revised)");
        assert_eq!(updated.price_cents, 899);
        assert_eq!(updated.stock, 5);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);

        // Storage agrees with the returned struct
        let fetched = db.books().get(&created.id).await.unwrap();
        assert_eq!(fetched.title, "Dune (revised)");
        assert_eq!(fetched.price_cents, 899);
    }

    #[tokio::test]
    async fn test_update_keeps_own_isbn() {
        let db = test_db().await;

        let created = db
            .books()
            .create(&book_input("Dune", "978-0441172719", 749, 3))
            .await
            .unwrap();

        // Re-submitting the same ISBN must not count as a duplicate
        let updated = db
            .books()
            .update(&created.id, &book_input("Dune", "978-0441172719", 799, 3))
            .await
            .unwrap();
        assert_eq!(updated.price_cents, 799);
    }

    #[tokio::test]
    async fn test_update_rejects_taken_isbn() {
        let db = test_db().await;

        db.books()
            .create(&book_input("Dune", "978-0441172719", 749, 3))
            .await
            .unwrap();
        let other = db
            .books()
            .create(&book_input("Neuromancer", "978-0441569595", 650, 2))
            .await
            .unwrap();

        let err = db
            .books()
            .update(&other.id, &book_input("Neuromancer", "978-0441172719", 650, 2))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_update_missing_book() {
        let db = test_db().await;

        let err = db
            .books()
            .update("no-such-id", &book_input("Dune", "978-0441172719", 749, 3))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_set_stock_overwrites() {
        let db = test_db().await;

        let created = db
            .books()
            .create(&book_input("Dune", "978-0441172719", 749, 3))
            .await
            .unwrap();

        let book = db.books().set_stock(&created.id, 0).await.unwrap();
        assert_eq!(book.stock, 0);

        let book = db.books().set_stock(&created.id, 42).await.unwrap();
        assert_eq!(book.stock, 42);
    }

    #[tokio::test]
    async fn test_set_stock_rejects_negative() {
        let db = test_db().await;

        let created = db
            .books()
            .create(&book_input("Dune", "978-0441172719", 749, 3))
            .await
            .unwrap();

        let err = db.books().set_stock(&created.id, -1).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        // Stock untouched
        let book = db.books().get(&created.id).await.unwrap();
        assert_eq!(book.stock, 3);
    }

    #[tokio::test]
    async fn test_set_stock_missing_book() {
        let db = test_db().await;

        let err = db.books().set_stock("no-such-id", 5).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_search_available_hides_sold_out() {
        let db = test_db().await;

        db.books()
            .create(&book_input("Dune", "978-0441172719", 749, 3))
            .await
            .unwrap();
        db.books()
            .create(&book_input("Neuromancer", "978-0441569595", 650, 0))
            .await
            .unwrap();

        let shelf = db.books().search_available("").await.unwrap();
        assert_eq!(shelf.len(), 1);
        assert_eq!(shelf[0].title, "Dune");
    }

    #[tokio::test]
    async fn test_search_available_matches_fields() {
        let db = test_db().await;

        db.books()
            .create(&book_input("Dune", "978-0441172719", 749, 3))
            .await
            .unwrap();
        let mut input = book_input("Neuromancer", "978-0441569595", 650, 2);
        input.author = "William Gibson".to_string();
        db.books().create(&input).await.unwrap();

        // Title, case-insensitive
        let hits = db.books().search_available("dUNe").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Dune");

        // Author
        let hits = db.books().search_available("gibson").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Neuromancer");

        // ISBN fragment
        let hits = db.books().search_available("0441172719").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Dune");

        // No match
        let hits = db.books().search_available("tolkien").await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_search_orders_by_title() {
        let db = test_db().await;

        db.books()
            .create(&book_input("Neuromancer", "978-0441569595", 650, 2))
            .await
            .unwrap();
        db.books()
            .create(&book_input("Dune", "978-0441172719", 749, 3))
            .await
            .unwrap();

        let shelf = db.books().search_available("").await.unwrap();
        let titles: Vec<&str> = shelf.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Dune", "Neuromancer"]);
    }

    #[tokio::test]
    async fn test_delete_without_history() {
        let db = test_db().await;

        let created = db
            .books()
            .create(&book_input("Dune", "978-0441172719", 749, 3))
            .await
            .unwrap();

        db.books().delete(&created.id).await.unwrap();

        let err = db.books().get(&created.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_delete_missing_book() {
        let db = test_db().await;

        let err = db.books().delete("no-such-id").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_delete_blocked_then_force_delete_succeeds() {
        let db = test_db().await;

        let book = db
            .books()
            .create(&book_input("Dune", "978-0441172719", 749, 5))
            .await
            .unwrap();

        // Two sales, one line each, against the same book
        for _ in 0..2 {
            db.sales()
                .process_sale(&[CartLine {
                    book_id: book.id.clone(),
                    quantity: 1,
                }])
                .await
                .unwrap();
        }

        assert_eq!(db.books().sale_line_count(&book.id).await.unwrap(), 2);

        let err = db.books().delete(&book.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(
            err.to_string(),
            "Book has 2 sale record(s); use force delete to remove it along with its sales history"
        );

        // Book and its history are intact after the refused delete
        let book_after = db.books().get(&book.id).await.unwrap();
        assert_eq!(book_after.stock, 3);
        assert_eq!(db.sales().list().await.unwrap().len(), 2);

        // Force delete removes the book, its lines, and the emptied sales,
        // and returns no stock anywhere
        db.books().force_delete(&book.id).await.unwrap();

        let err = db.books().get(&book.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(db.sales().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_force_delete_recomputes_mixed_sales() {
        let db = test_db().await;

        let doomed = db
            .books()
            .create(&book_input("Dune", "978-0441172719", 100, 10))
            .await
            .unwrap();
        let kept = db
            .books()
            .create(&book_input("Neuromancer", "978-0441569595", 250, 10))
            .await
            .unwrap();

        // Sale A: 2 of doomed + 1 of kept → total 450
        let sale_a = db
            .sales()
            .process_sale(&[
                CartLine {
                    book_id: doomed.id.clone(),
                    quantity: 2,
                },
                CartLine {
                    book_id: kept.id.clone(),
                    quantity: 1,
                },
            ])
            .await
            .unwrap();

        // Sale B: only the doomed book → will disappear entirely
        let sale_b = db
            .sales()
            .process_sale(&[CartLine {
                book_id: doomed.id.clone(),
                quantity: 1,
            }])
            .await
            .unwrap();

        db.books().force_delete(&doomed.id).await.unwrap();

        // Sale A survives with only the kept line and a recomputed total
        let detail = db.sales().get(&sale_a).await.unwrap();
        assert_eq!(detail.lines.len(), 1);
        assert_eq!(detail.lines[0].line.book_id, kept.id);
        assert_eq!(detail.sale.total_cents, 250);
        assert_eq!(detail.computed_total().cents(), 250);

        // Sale B is gone
        let err = db.sales().get(&sale_b).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        // The kept book's stock is untouched; the doomed book's stock was
        // not "returned" to anything
        assert_eq!(db.books().get(&kept.id).await.unwrap().stock, 9);
    }

    #[tokio::test]
    async fn test_force_delete_missing_book() {
        let db = test_db().await;

        let err = db.books().force_delete("no-such-id").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
