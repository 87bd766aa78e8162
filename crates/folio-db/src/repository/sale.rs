//! # Sale Repository
//!
//! Database operations for sales and sale lines. Every mutation here is
//! a single transaction that moves stock and ledger together.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. CHECKOUT                                                           │
//! │     └── process_sale(cart)                                             │
//! │         ├── validates every line before any write                      │
//! │         ├── guarded stock decrement per line                           │
//! │         └── inserts sale + lines with the computed total               │
//! │                                                                         │
//! │  2. BACK-OFFICE EDITS                                                  │
//! │     └── update_line_quantity() → stock delta + total recompute         │
//! │     └── remove_line()          → stock back; empty sale is deleted     │
//! │                                                                         │
//! │  3. DELETE                                                             │
//! │     └── delete_sale() → every line's stock back; lines cascade         │
//! │                                                                         │
//! │  Invariants after every commit:                                        │
//! │  • stock ≥ 0 for every book                                            │
//! │  • sale.total = Σ price_at_sale × quantity over its lines              │
//! │  • no sale exists with zero lines                                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Each line captures the unit price at checkout. Catalog price edits
//! never rewrite history; only explicit quantity edits change a line,
//! and even those keep the captured price.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::StoreResult;
use folio_core::validation::validate_quantity;
use folio_core::{
    Book, BookSummary, CartLine, CoreError, LineDetail, Money, PaymentMethod, Sale, SaleLine,
    SaleWithLines, ValidationError, MAX_CART_ITEMS,
};

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Processes a checkout cart into a committed sale.
    ///
    /// ## Algorithm (single transaction)
    /// 1. Validate the cart shape (non-empty, sane quantities)
    /// 2. Load every referenced book; a missing one fails the whole cart
    /// 3. Check each line against the stock as read
    /// 4. Insert the sale with total = Σ price × quantity
    /// 5. Per line: guarded stock decrement, then insert the line with
    ///    the current catalog price captured as `price_at_sale_cents`
    ///
    /// The guard (`stock - qty >= 0` in the UPDATE itself) is what makes
    /// duplicate cart lines and concurrent checkouts safe: the decrement
    /// refuses to take any book below zero, and a refused decrement rolls
    /// back the entire sale.
    ///
    /// ## Returns
    /// The new sale's id.
    pub async fn process_sale(&self, cart: &[CartLine]) -> StoreResult<String> {
        if cart.is_empty() {
            return Err(CoreError::CartEmpty.into());
        }
        if cart.len() > MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            }
            .into());
        }
        for line in cart {
            if line.book_id.trim().is_empty() {
                return Err(ValidationError::Required {
                    field: "book_id".to_string(),
                }
                .into());
            }
            validate_quantity(line.quantity)?;
        }

        debug!(lines = cart.len(), "Processing sale");

        let mut tx = self.pool.begin().await?;

        // One read per distinct book; duplicate cart lines share the row
        let mut books: HashMap<String, Book> = HashMap::new();
        for line in cart {
            if books.contains_key(&line.book_id) {
                continue;
            }
            let book = sqlx::query_as::<_, Book>(
                r#"
                SELECT id, title, author, isbn, price_cents, stock, genre, cover_url,
                       created_at, updated_at
                FROM books
                WHERE id = ?1
                "#,
            )
            .bind(&line.book_id)
            .fetch_optional(tx.as_mut())
            .await?
            .ok_or_else(|| CoreError::BookNotFound(line.book_id.clone()))?;

            books.insert(line.book_id.clone(), book);
        }

        // Per-line check against the stock as read; the guarded decrements
        // below re-check cumulatively at write time
        let mut total = Money::zero();
        for line in cart {
            let book = books
                .get(&line.book_id)
                .ok_or_else(|| CoreError::BookNotFound(line.book_id.clone()))?;

            if book.stock < line.quantity {
                warn!(
                    book_id = %line.book_id,
                    available = book.stock,
                    requested = line.quantity,
                    "Sale refused: insufficient stock"
                );
                return Err(CoreError::InsufficientStock {
                    title: book.title.clone(),
                    available: book.stock,
                    requested: line.quantity,
                }
                .into());
            }

            total = total + book.price().multiply_quantity(line.quantity);
        }

        let sale_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO sales (id, total_cents, payment_method, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&sale_id)
        .bind(total.cents())
        .bind(PaymentMethod::Cash)
        .bind(now)
        .execute(tx.as_mut())
        .await?;

        for line in cart {
            let book = books
                .get(&line.book_id)
                .ok_or_else(|| CoreError::BookNotFound(line.book_id.clone()))?;

            let result = sqlx::query(
                r#"
                UPDATE books
                SET stock = stock - ?2, updated_at = ?3
                WHERE id = ?1 AND stock - ?2 >= 0
                "#,
            )
            .bind(&line.book_id)
            .bind(line.quantity)
            .bind(now)
            .execute(tx.as_mut())
            .await?;

            if result.rows_affected() == 0 {
                // Another line of this cart already took the remainder
                let available: i64 = sqlx::query_scalar("SELECT stock FROM books WHERE id = ?1")
                    .bind(&line.book_id)
                    .fetch_one(tx.as_mut())
                    .await?;

                warn!(
                    book_id = %line.book_id,
                    available,
                    requested = line.quantity,
                    "Sale refused: stock exhausted at write time"
                );
                return Err(CoreError::InsufficientStock {
                    title: book.title.clone(),
                    available,
                    requested: line.quantity,
                }
                .into());
            }

            sqlx::query(
                r#"
                INSERT INTO sale_lines (id, sale_id, book_id, quantity, price_at_sale_cents, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&sale_id)
            .bind(&line.book_id)
            .bind(line.quantity)
            .bind(book.price_cents)
            .bind(now)
            .execute(tx.as_mut())
            .await?;
        }

        tx.commit().await?;

        info!(
            id = %sale_id,
            lines = cart.len(),
            total_cents = total.cents(),
            "Sale processed"
        );
        Ok(sale_id)
    }

    /// Changes the quantity on an existing sale line.
    ///
    /// ## Algorithm (single transaction)
    /// 1. Load the line; missing → not found
    /// 2. Apply the stock delta (old − new) to the book with the same
    ///    guard as checkout; an increase beyond the shelf fails the edit
    /// 3. Write the new quantity (captured price stays frozen)
    /// 4. Recompute the sale total from the full line set
    ///
    /// ## Returns
    /// The updated sale with all of its lines.
    pub async fn update_line_quantity(
        &self,
        line_id: &str,
        new_quantity: i64,
    ) -> StoreResult<SaleWithLines> {
        validate_quantity(new_quantity)?;

        debug!(line_id = %line_id, new_quantity, "Updating sale line quantity");

        let mut tx = self.pool.begin().await?;

        let line = sqlx::query_as::<_, SaleLine>(
            r#"
            SELECT id, sale_id, book_id, quantity, price_at_sale_cents, created_at
            FROM sale_lines
            WHERE id = ?1
            "#,
        )
        .bind(line_id)
        .fetch_optional(tx.as_mut())
        .await?
        .ok_or_else(|| CoreError::SaleLineNotFound(line_id.to_string()))?;

        let delta = new_quantity - line.quantity;
        let now = Utc::now();

        if delta != 0 {
            // One guarded write covers both directions: a decrease returns
            // stock (the guard trivially holds), an increase takes stock
            // only if enough copies are on the shelf
            let result = sqlx::query(
                r#"
                UPDATE books
                SET stock = stock - ?2, updated_at = ?3
                WHERE id = ?1 AND stock - ?2 >= 0
                "#,
            )
            .bind(&line.book_id)
            .bind(delta)
            .bind(now)
            .execute(tx.as_mut())
            .await?;

            if result.rows_affected() == 0 {
                let book: Option<(String, i64)> =
                    sqlx::query_as("SELECT title, stock FROM books WHERE id = ?1")
                        .bind(&line.book_id)
                        .fetch_optional(tx.as_mut())
                        .await?;

                return match book {
                    // The old quantity is already allocated to this line,
                    // so the caller may request up to shelf + old
                    Some((title, stock)) => {
                        warn!(
                            line_id = %line_id,
                            available = stock + line.quantity,
                            requested = new_quantity,
                            "Quantity edit refused: insufficient stock"
                        );
                        Err(CoreError::InsufficientStock {
                            title,
                            available: stock + line.quantity,
                            requested: new_quantity,
                        }
                        .into())
                    }
                    None => Err(CoreError::BookNotFound(line.book_id.clone()).into()),
                };
            }
        }

        sqlx::query("UPDATE sale_lines SET quantity = ?2 WHERE id = ?1")
            .bind(line_id)
            .bind(new_quantity)
            .execute(tx.as_mut())
            .await?;

        let (_, total_cents) = line_rollup(tx.as_mut(), &line.sale_id).await?;

        let result = sqlx::query("UPDATE sales SET total_cents = ?2 WHERE id = ?1")
            .bind(&line.sale_id)
            .bind(total_cents)
            .execute(tx.as_mut())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::SaleNotFound(line.sale_id.clone()).into());
        }

        let updated = sale_with_lines(tx.as_mut(), &line.sale_id).await?;

        tx.commit().await?;

        info!(
            line_id = %line_id,
            sale_id = %line.sale_id,
            new_quantity,
            total_cents,
            "Sale line updated"
        );
        Ok(updated)
    }

    /// Removes a line from its sale, returning the copies to the shelf.
    ///
    /// ## Returns
    /// * `Ok(Some(sale))` - Lines remain; total was recomputed
    /// * `Ok(None)` - That was the last line; the whole sale was deleted
    ///
    /// Removing the last line is allowed here. Callers that want to steer
    /// users toward "delete the sale instead" enforce that in the UI.
    pub async fn remove_line(&self, line_id: &str) -> StoreResult<Option<SaleWithLines>> {
        debug!(line_id = %line_id, "Removing sale line");

        let mut tx = self.pool.begin().await?;

        let line = sqlx::query_as::<_, SaleLine>(
            r#"
            SELECT id, sale_id, book_id, quantity, price_at_sale_cents, created_at
            FROM sale_lines
            WHERE id = ?1
            "#,
        )
        .bind(line_id)
        .fetch_optional(tx.as_mut())
        .await?
        .ok_or_else(|| CoreError::SaleLineNotFound(line_id.to_string()))?;

        let now = Utc::now();

        // Put the copies back on the shelf before dropping the line
        let result = sqlx::query("UPDATE books SET stock = stock + ?2, updated_at = ?3 WHERE id = ?1")
            .bind(&line.book_id)
            .bind(line.quantity)
            .bind(now)
            .execute(tx.as_mut())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::BookNotFound(line.book_id.clone()).into());
        }

        sqlx::query("DELETE FROM sale_lines WHERE id = ?1")
            .bind(line_id)
            .execute(tx.as_mut())
            .await?;

        let (line_count, total_cents) = line_rollup(tx.as_mut(), &line.sale_id).await?;

        if line_count == 0 {
            // A sale must not outlive its lines
            sqlx::query("DELETE FROM sales WHERE id = ?1")
                .bind(&line.sale_id)
                .execute(tx.as_mut())
                .await?;

            tx.commit().await?;

            info!(
                line_id = %line_id,
                sale_id = %line.sale_id,
                "Last line removed; sale deleted"
            );
            return Ok(None);
        }

        sqlx::query("UPDATE sales SET total_cents = ?2 WHERE id = ?1")
            .bind(&line.sale_id)
            .bind(total_cents)
            .execute(tx.as_mut())
            .await?;

        let updated = sale_with_lines(tx.as_mut(), &line.sale_id).await?;

        tx.commit().await?;

        info!(
            line_id = %line_id,
            sale_id = %line.sale_id,
            total_cents,
            "Sale line removed"
        );
        Ok(Some(updated))
    }

    /// Deletes a whole sale, returning every line's copies to the shelf.
    ///
    /// ## Algorithm (single transaction)
    /// 1. Verify the sale exists
    /// 2. Increment each referenced book's stock by the line quantity;
    ///    a missing book aborts the deletion outright
    /// 3. Delete the sale (lines go with it via FK cascade)
    pub async fn delete_sale(&self, id: &str) -> StoreResult<()> {
        debug!(id = %id, "Deleting sale");

        let mut tx = self.pool.begin().await?;

        let exists: Option<String> = sqlx::query_scalar("SELECT id FROM sales WHERE id = ?1")
            .bind(id)
            .fetch_optional(tx.as_mut())
            .await?;

        if exists.is_none() {
            return Err(CoreError::SaleNotFound(id.to_string()).into());
        }

        let lines: Vec<(String, i64)> =
            sqlx::query_as("SELECT book_id, quantity FROM sale_lines WHERE sale_id = ?1")
                .bind(id)
                .fetch_all(tx.as_mut())
                .await?;

        let now = Utc::now();

        for (book_id, quantity) in &lines {
            let result =
                sqlx::query("UPDATE books SET stock = stock + ?2, updated_at = ?3 WHERE id = ?1")
                    .bind(book_id)
                    .bind(*quantity)
                    .bind(now)
                    .execute(tx.as_mut())
                    .await?;

            if result.rows_affected() == 0 {
                return Err(CoreError::BookNotFound(book_id.clone()).into());
            }
        }

        sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(tx.as_mut())
            .await?;

        tx.commit().await?;

        info!(id = %id, lines = lines.len(), "Sale deleted");
        Ok(())
    }

    /// Gets a sale with all of its lines.
    ///
    /// ## Returns
    /// * `Ok(SaleWithLines)` - Sale found
    /// * `Err(CoreError::SaleNotFound)` - No such sale
    pub async fn get(&self, id: &str) -> StoreResult<SaleWithLines> {
        let mut conn = self.pool.acquire().await?;
        sale_with_lines(&mut conn, id).await
    }

    /// Lists all sales, newest first, each with its lines.
    pub async fn list(&self) -> StoreResult<Vec<SaleWithLines>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, total_cents, payment_method, created_at
            FROM sales
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        self.attach_lines(sales).await
    }

    /// Lists the most recent sales, each with its lines.
    pub async fn recent(&self, limit: u32) -> StoreResult<Vec<SaleWithLines>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, total_cents, payment_method, created_at
            FROM sales
            ORDER BY created_at DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        self.attach_lines(sales).await
    }

    async fn attach_lines(&self, sales: Vec<Sale>) -> StoreResult<Vec<SaleWithLines>> {
        let mut conn = self.pool.acquire().await?;

        let mut result = Vec::with_capacity(sales.len());
        for sale in sales {
            let lines = fetch_lines(&mut conn, &sale.id).await?;
            result.push(SaleWithLines { sale, lines });
        }

        Ok(result)
    }
}

// =============================================================================
// Shared query helpers
// =============================================================================
//
// These take `&mut SqliteConnection` so the same code runs inside an open
// transaction (`tx.as_mut()`) and on a plain pooled connection.

/// Counts a sale's lines and sums their totals in one pass.
///
/// ## Returns
/// `(line_count, total_cents)` where total is Σ price_at_sale × quantity.
pub(crate) async fn line_rollup(
    conn: &mut SqliteConnection,
    sale_id: &str,
) -> StoreResult<(i64, i64)> {
    let rollup: (i64, i64) = sqlx::query_as(
        r#"
        SELECT COUNT(*), COALESCE(SUM(price_at_sale_cents * quantity), 0)
        FROM sale_lines
        WHERE sale_id = ?1
        "#,
    )
    .bind(sale_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(rollup)
}

/// Row shape for a sale line joined with its book's display columns.
#[derive(sqlx::FromRow)]
struct LineRow {
    id: String,
    sale_id: String,
    book_id: String,
    quantity: i64,
    price_at_sale_cents: i64,
    created_at: DateTime<Utc>,
    book_ref_id: Option<String>,
    book_title: Option<String>,
    book_author: Option<String>,
    book_isbn: Option<String>,
    book_cover_url: Option<String>,
}

impl LineRow {
    fn into_detail(self) -> LineDetail {
        let book = match self.book_ref_id {
            Some(id) => Some(BookSummary {
                id,
                title: self.book_title.unwrap_or_default(),
                author: self.book_author.unwrap_or_default(),
                isbn: self.book_isbn.unwrap_or_default(),
                cover_url: self.book_cover_url,
            }),
            None => None,
        };

        LineDetail {
            line: SaleLine {
                id: self.id,
                sale_id: self.sale_id,
                book_id: self.book_id,
                quantity: self.quantity,
                price_at_sale_cents: self.price_at_sale_cents,
                created_at: self.created_at,
            },
            book,
        }
    }
}

/// Fetches a sale's lines with book display data attached.
///
/// LEFT JOIN keeps lines readable even if the catalog row disappears;
/// such lines surface with `book: None`.
pub(crate) async fn fetch_lines(
    conn: &mut SqliteConnection,
    sale_id: &str,
) -> StoreResult<Vec<LineDetail>> {
    let rows = sqlx::query_as::<_, LineRow>(
        r#"
        SELECT
            l.id, l.sale_id, l.book_id, l.quantity, l.price_at_sale_cents, l.created_at,
            b.id AS book_ref_id,
            b.title AS book_title,
            b.author AS book_author,
            b.isbn AS book_isbn,
            b.cover_url AS book_cover_url
        FROM sale_lines l
        LEFT JOIN books b ON b.id = l.book_id
        WHERE l.sale_id = ?1
        ORDER BY l.created_at, l.rowid
        "#,
    )
    .bind(sale_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.into_iter().map(LineRow::into_detail).collect())
}

/// Loads a sale and its lines.
pub(crate) async fn sale_with_lines(
    conn: &mut SqliteConnection,
    sale_id: &str,
) -> StoreResult<SaleWithLines> {
    let sale = sqlx::query_as::<_, Sale>(
        r#"
        SELECT id, total_cents, payment_method, created_at
        FROM sales
        WHERE id = ?1
        "#,
    )
    .bind(sale_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| CoreError::SaleNotFound(sale_id.to_string()))?;

    let lines = fetch_lines(conn, sale_id).await?;

    Ok(SaleWithLines { sale, lines })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{book_input, test_db};
    use folio_core::ErrorKind;

    fn cart_line(book_id: &str, quantity: i64) -> CartLine {
        CartLine {
            book_id: book_id.to_string(),
            quantity,
        }
    }

    #[tokio::test]
    async fn test_process_sale_round_trip() {
        let db = test_db().await;

        let book = db
            .books()
            .create(&book_input("Dune", "978-0441172719", 100, 5))
            .await
            .unwrap();

        let sale_id = db
            .sales()
            .process_sale(&[cart_line(&book.id, 2)])
            .await
            .unwrap();

        // Stock moved from shelf to ledger
        assert_eq!(db.books().get(&book.id).await.unwrap().stock, 3);

        let detail = db.sales().get(&sale_id).await.unwrap();
        assert_eq!(detail.sale.total_cents, 200);
        assert_eq!(detail.sale.payment_method, PaymentMethod::Cash);
        assert_eq!(detail.lines.len(), 1);
        assert_eq!(detail.lines[0].line.quantity, 2);
        assert_eq!(detail.lines[0].line.price_at_sale_cents, 100);
        assert_eq!(detail.computed_total().cents(), detail.sale.total_cents);

        // Book display data rides along
        let summary = detail.lines[0].book.as_ref().unwrap();
        assert_eq!(summary.title, "Dune");
        assert_eq!(summary.isbn, "978-0441172719");
    }

    #[tokio::test]
    async fn test_process_sale_multi_book_total() {
        let db = test_db().await;

        let a = db
            .books()
            .create(&book_input("Dune", "978-0441172719", 100, 5))
            .await
            .unwrap();
        let b = db
            .books()
            .create(&book_input("Neuromancer", "978-0441569595", 250, 4))
            .await
            .unwrap();

        let sale_id = db
            .sales()
            .process_sale(&[cart_line(&a.id, 3), cart_line(&b.id, 1)])
            .await
            .unwrap();

        let detail = db.sales().get(&sale_id).await.unwrap();
        assert_eq!(detail.sale.total_cents, 550);
        assert_eq!(detail.lines.len(), 2);

        assert_eq!(db.books().get(&a.id).await.unwrap().stock, 2);
        assert_eq!(db.books().get(&b.id).await.unwrap().stock, 3);
    }

    #[tokio::test]
    async fn test_process_sale_empty_cart() {
        let db = test_db().await;

        let err = db.sales().process_sale(&[]).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "Cart is empty");
    }

    #[tokio::test]
    async fn test_process_sale_rejects_zero_quantity() {
        let db = test_db().await;

        let book = db
            .books()
            .create(&book_input("Dune", "978-0441172719", 100, 5))
            .await
            .unwrap();

        let err = db
            .sales()
            .process_sale(&[cart_line(&book.id, 0)])
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(
            err.to_string(),
            "Validation error: quantity must be at least 1"
        );
    }

    #[tokio::test]
    async fn test_process_sale_unknown_book_rolls_back() {
        let db = test_db().await;

        let book = db
            .books()
            .create(&book_input("Dune", "978-0441172719", 100, 5))
            .await
            .unwrap();

        // Valid line first, unknown book second: nothing may stick
        let err = db
            .sales()
            .process_sale(&[cart_line(&book.id, 2), cart_line("no-such-book", 1)])
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(db.books().get(&book.id).await.unwrap().stock, 5);
        assert!(db.sales().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_process_sale_insufficient_stock() {
        let db = test_db().await;

        let book = db
            .books()
            .create(&book_input("Dune", "978-0441172719", 100, 1))
            .await
            .unwrap();

        let err = db
            .sales()
            .process_sale(&[cart_line(&book.id, 2)])
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InsufficientStock);
        assert_eq!(
            err.to_string(),
            "Insufficient stock for \"Dune\": available 1, requested 2"
        );

        assert_eq!(db.books().get(&book.id).await.unwrap().stock, 1);
        assert!(db.sales().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_process_sale_exact_stock_reaches_zero() {
        let db = test_db().await;

        let book = db
            .books()
            .create(&book_input("Dune", "978-0441172719", 100, 2))
            .await
            .unwrap();

        db.sales()
            .process_sale(&[cart_line(&book.id, 2)])
            .await
            .unwrap();

        assert_eq!(db.books().get(&book.id).await.unwrap().stock, 0);
    }

    #[tokio::test]
    async fn test_process_sale_duplicate_lines_overdraw_rolls_back() {
        let db = test_db().await;

        let book = db
            .books()
            .create(&book_input("Dune", "978-0441172719", 100, 5))
            .await
            .unwrap();

        // Each line alone fits the shelf; together they do not
        let err = db
            .sales()
            .process_sale(&[cart_line(&book.id, 3), cart_line(&book.id, 3)])
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InsufficientStock);
        assert_eq!(db.books().get(&book.id).await.unwrap().stock, 5);
        assert!(db.sales().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_process_sale_duplicate_lines_within_stock() {
        let db = test_db().await;

        let book = db
            .books()
            .create(&book_input("Dune", "978-0441172719", 100, 6))
            .await
            .unwrap();

        let sale_id = db
            .sales()
            .process_sale(&[cart_line(&book.id, 3), cart_line(&book.id, 3)])
            .await
            .unwrap();

        assert_eq!(db.books().get(&book.id).await.unwrap().stock, 0);

        let detail = db.sales().get(&sale_id).await.unwrap();
        assert_eq!(detail.lines.len(), 2);
        assert_eq!(detail.sale.total_cents, 600);
    }

    #[tokio::test]
    async fn test_update_line_increase_takes_stock() {
        let db = test_db().await;

        let book = db
            .books()
            .create(&book_input("Dune", "978-0441172719", 100, 5))
            .await
            .unwrap();

        let sale_id = db
            .sales()
            .process_sale(&[cart_line(&book.id, 2)])
            .await
            .unwrap();
        let line_id = db.sales().get(&sale_id).await.unwrap().lines[0]
            .line
            .id
            .clone();

        let updated = db.sales().update_line_quantity(&line_id, 4).await.unwrap();
        assert_eq!(updated.sale.total_cents, 400);
        assert_eq!(updated.lines[0].line.quantity, 4);
        assert_eq!(updated.lines[0].line.price_at_sale_cents, 100);

        assert_eq!(db.books().get(&book.id).await.unwrap().stock, 1);
    }

    #[tokio::test]
    async fn test_update_line_decrease_returns_stock() {
        let db = test_db().await;

        let book = db
            .books()
            .create(&book_input("Dune", "978-0441172719", 100, 5))
            .await
            .unwrap();

        let sale_id = db
            .sales()
            .process_sale(&[cart_line(&book.id, 2)])
            .await
            .unwrap();
        let line_id = db.sales().get(&sale_id).await.unwrap().lines[0]
            .line
            .id
            .clone();

        let updated = db.sales().update_line_quantity(&line_id, 1).await.unwrap();
        assert_eq!(updated.sale.total_cents, 100);

        assert_eq!(db.books().get(&book.id).await.unwrap().stock, 4);
    }

    #[tokio::test]
    async fn test_update_line_same_quantity_is_noop() {
        let db = test_db().await;

        let book = db
            .books()
            .create(&book_input("Dune", "978-0441172719", 100, 5))
            .await
            .unwrap();

        let sale_id = db
            .sales()
            .process_sale(&[cart_line(&book.id, 2)])
            .await
            .unwrap();
        let line_id = db.sales().get(&sale_id).await.unwrap().lines[0]
            .line
            .id
            .clone();

        let updated = db.sales().update_line_quantity(&line_id, 2).await.unwrap();
        assert_eq!(updated.sale.total_cents, 200);
        assert_eq!(db.books().get(&book.id).await.unwrap().stock, 3);
    }

    #[tokio::test]
    async fn test_update_line_beyond_stock_leaves_everything_unchanged() {
        let db = test_db().await;

        // Shelf 3, sell 2 → shelf 1. Asking for 5 needs 3 more; only 1 left.
        let book = db
            .books()
            .create(&book_input("Dune", "978-0441172719", 100, 3))
            .await
            .unwrap();

        let sale_id = db
            .sales()
            .process_sale(&[cart_line(&book.id, 2)])
            .await
            .unwrap();
        let line_id = db.sales().get(&sale_id).await.unwrap().lines[0]
            .line
            .id
            .clone();

        let err = db
            .sales()
            .update_line_quantity(&line_id, 5)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InsufficientStock);
        assert_eq!(
            err.to_string(),
            "Insufficient stock for \"Dune\": available 3, requested 5"
        );

        // Nothing moved
        assert_eq!(db.books().get(&book.id).await.unwrap().stock, 1);
        let detail = db.sales().get(&sale_id).await.unwrap();
        assert_eq!(detail.lines[0].line.quantity, 2);
        assert_eq!(detail.sale.total_cents, 200);
    }

    #[tokio::test]
    async fn test_update_line_missing() {
        let db = test_db().await;

        let err = db
            .sales()
            .update_line_quantity("no-such-line", 2)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "Sale line not found: no-such-line");
    }

    #[tokio::test]
    async fn test_remove_line_recomputes_remaining_total() {
        let db = test_db().await;

        let a = db
            .books()
            .create(&book_input("Dune", "978-0441172719", 100, 5))
            .await
            .unwrap();
        let b = db
            .books()
            .create(&book_input("Neuromancer", "978-0441569595", 250, 4))
            .await
            .unwrap();

        let sale_id = db
            .sales()
            .process_sale(&[cart_line(&a.id, 2), cart_line(&b.id, 1)])
            .await
            .unwrap();

        let detail = db.sales().get(&sale_id).await.unwrap();
        let removed_line = detail
            .lines
            .iter()
            .find(|d| d.line.book_id == a.id)
            .unwrap()
            .line
            .clone();

        let updated = db
            .sales()
            .remove_line(&removed_line.id)
            .await
            .unwrap()
            .expect("sale should survive with one line left");

        assert_eq!(updated.lines.len(), 1);
        assert_eq!(updated.lines[0].line.book_id, b.id);
        assert_eq!(updated.sale.total_cents, 250);
        assert_eq!(updated.computed_total().cents(), 250);

        // Copies came back
        assert_eq!(db.books().get(&a.id).await.unwrap().stock, 5);
        assert_eq!(db.books().get(&b.id).await.unwrap().stock, 3);
    }

    #[tokio::test]
    async fn test_remove_last_line_deletes_sale() {
        let db = test_db().await;

        let book = db
            .books()
            .create(&book_input("Dune", "978-0441172719", 100, 3))
            .await
            .unwrap();

        let sale_id = db
            .sales()
            .process_sale(&[cart_line(&book.id, 3)])
            .await
            .unwrap();
        assert_eq!(db.books().get(&book.id).await.unwrap().stock, 0);

        let line_id = db.sales().get(&sale_id).await.unwrap().lines[0]
            .line
            .id
            .clone();

        let outcome = db.sales().remove_line(&line_id).await.unwrap();
        assert!(outcome.is_none(), "empty sale must be deleted, not kept");

        assert_eq!(db.books().get(&book.id).await.unwrap().stock, 3);

        let err = db.sales().get(&sale_id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(db.books().sale_line_count(&book.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_remove_line_missing() {
        let db = test_db().await;

        let err = db.sales().remove_line("no-such-line").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_delete_sale_returns_all_stock() {
        let db = test_db().await;

        let a = db
            .books()
            .create(&book_input("Dune", "978-0441172719", 100, 5))
            .await
            .unwrap();
        let b = db
            .books()
            .create(&book_input("Neuromancer", "978-0441569595", 250, 4))
            .await
            .unwrap();

        let sale_id = db
            .sales()
            .process_sale(&[cart_line(&a.id, 2), cart_line(&b.id, 3)])
            .await
            .unwrap();

        db.sales().delete_sale(&sale_id).await.unwrap();

        assert_eq!(db.books().get(&a.id).await.unwrap().stock, 5);
        assert_eq!(db.books().get(&b.id).await.unwrap().stock, 4);

        let err = db.sales().get(&sale_id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        // Lines went with the sale
        assert_eq!(db.books().sale_line_count(&a.id).await.unwrap(), 0);
        assert_eq!(db.books().sale_line_count(&b.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_sale_missing() {
        let db = test_db().await;

        let err = db.sales().delete_sale("no-such-sale").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "Sale not found: no-such-sale");
    }

    #[tokio::test]
    async fn test_sale_json_shape_for_boundary() {
        let db = test_db().await;

        let book = db
            .books()
            .create(&book_input("Dune", "978-0441172719", 100, 5))
            .await
            .unwrap();

        let sale_id = db
            .sales()
            .process_sale(&[cart_line(&book.id, 2)])
            .await
            .unwrap();
        let detail = db.sales().get(&sale_id).await.unwrap();

        // Presentation layers consume this exact shape
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["sale"]["payment_method"], "cash");
        assert_eq!(json["sale"]["total_cents"], 200);
        assert_eq!(json["lines"][0]["line"]["quantity"], 2);
        assert_eq!(json["lines"][0]["book"]["title"], "Dune");
    }

    #[tokio::test]
    async fn test_list_and_recent_order_newest_first() {
        let db = test_db().await;

        let book = db
            .books()
            .create(&book_input("Dune", "978-0441172719", 100, 10))
            .await
            .unwrap();

        let first = db
            .sales()
            .process_sale(&[cart_line(&book.id, 1)])
            .await
            .unwrap();
        let second = db
            .sales()
            .process_sale(&[cart_line(&book.id, 2)])
            .await
            .unwrap();

        let all = db.sales().list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].sale.id, second);
        assert_eq!(all[1].sale.id, first);

        let recent = db.sales().recent(1).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].sale.id, second);
    }
}
