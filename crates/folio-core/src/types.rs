//! # Domain Types
//!
//! Core domain types used throughout Folio.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Book       │   │      Sale       │   │    SaleLine     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  isbn (business)│   │  total_cents    │   │  sale_id (FK)   │       │
//! │  │  title, author  │   │  payment_method │   │  book_id (ref)  │       │
//! │  │  price_cents    │   │  created_at     │   │  quantity       │       │
//! │  │  stock          │   │                 │   │  price_at_sale  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    BookInput    │   │    CartLine     │   │ PaymentMethod   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  create/update  │   │  book_id        │   │  Cash           │       │
//! │  │  payload        │   │  quantity       │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Books carry two identities:
//! - `id`: UUID v4 - immutable, used for database relations
//! - `isbn`: business key - human-readable, globally unique in the catalog

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Book
// =============================================================================

/// A book in the inventory catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Book {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display title.
    pub title: String,

    /// Author name.
    pub author: String,

    /// ISBN - business identifier, unique across the catalog.
    pub isbn: String,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Copies currently on the shelf. Never negative.
    pub stock: i64,

    /// Genre label shown in catalog filters.
    pub genre: String,

    /// Optional cover image reference.
    pub cover_url: Option<String>,

    /// When the book was created.
    pub created_at: DateTime<Utc>,

    /// When the book was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks if any copies are on the shelf.
    #[inline]
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Checks if stock has fallen below the reorder threshold.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock < crate::LOW_STOCK_THRESHOLD
    }

    /// Value of the copies on the shelf (price × stock).
    #[inline]
    pub fn inventory_value(&self) -> Money {
        self.price().multiply_quantity(self.stock)
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale was paid.
///
/// Cash is the only tender in the current scope; the enum keeps the
/// storage column and serialized shape stable when card support lands.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cash
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A completed sale transaction.
///
/// `total_cents` is derived state: it always equals the sum of
/// `price_at_sale × quantity` over the sale's current lines, and is
/// recomputed from the full line set whenever a line changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: String,
    pub total_cents: i64,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the sale total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Sale Line
// =============================================================================

/// A line item in a sale.
/// Uses snapshot pattern to freeze the unit price at time of sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleLine {
    pub id: String,
    pub sale_id: String,
    /// Back-reference to the catalog. Not ownership: the book may be
    /// force-deleted later while this line remains.
    pub book_id: String,
    /// Copies sold. Always >= 1.
    pub quantity: i64,
    /// Unit price in cents at time of sale (frozen; quantity edits
    /// never re-read the current catalog price).
    pub price_at_sale_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl SaleLine {
    /// Returns the captured unit price as Money.
    #[inline]
    pub fn price_at_sale(&self) -> Money {
        Money::from_cents(self.price_at_sale_cents)
    }

    /// Returns the line total (price_at_sale × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price_at_sale().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Sale Views
// =============================================================================

/// Catalog display snapshot attached to a sale line in history views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSummary {
    pub id: String,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub cover_url: Option<String>,
}

/// A sale line joined with its book's display data.
///
/// `book` is `None` when the book was force-deleted after the sale;
/// the line itself (quantity, captured price) is still meaningful.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineDetail {
    pub line: SaleLine,
    pub book: Option<BookSummary>,
}

/// A sale together with all of its lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleWithLines {
    pub sale: Sale,
    pub lines: Vec<LineDetail>,
}

impl SaleWithLines {
    /// Recomputes the total from the lines (Σ price_at_sale × quantity).
    ///
    /// Always equals `sale.total()` for committed state; tests use this
    /// to assert the ledger invariant.
    pub fn computed_total(&self) -> Money {
        self.lines
            .iter()
            .fold(Money::zero(), |acc, detail| acc + detail.line.line_total())
    }
}

// =============================================================================
// Requests
// =============================================================================

/// Fields for creating or updating a catalog book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookInput {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub price_cents: i64,
    pub stock: i64,
    pub genre: String,
    pub cover_url: Option<String>,
}

impl BookInput {
    /// Returns a copy with all text fields trimmed.
    ///
    /// Validation and persistence both operate on the trimmed form, so
    /// " 978-0441172719 " and "978-0441172719" are the same ISBN.
    pub fn trimmed(&self) -> BookInput {
        BookInput {
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            isbn: self.isbn.trim().to_string(),
            price_cents: self.price_cents,
            stock: self.stock,
            genre: self.genre.trim().to_string(),
            cover_url: self.cover_url.clone(),
        }
    }
}

/// One requested line in a checkout: which book, how many copies.
///
/// A cart may name the same book in multiple lines; each line stays
/// independent through checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub book_id: String,
    pub quantity: i64,
}

// =============================================================================
// Stats
// =============================================================================

/// Inventory rollups for the catalog dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryStats {
    /// Number of books in the catalog.
    pub total_books: i64,
    /// Books with stock below the reorder threshold.
    pub low_stock_count: i64,
    /// Σ price × stock over the whole catalog, in cents.
    pub total_value_cents: i64,
}

impl InventoryStats {
    /// Returns the total inventory value as Money.
    #[inline]
    pub fn total_value(&self) -> Money {
        Money::from_cents(self.total_value_cents)
    }
}

/// Revenue rollups for the sales dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesStats {
    /// Number of sales on record.
    pub total_sales: i64,
    /// Σ sale totals, in cents.
    pub total_revenue_cents: i64,
    /// Σ quantities over all sale lines.
    pub total_items_sold: i64,
    /// Sales created since UTC midnight.
    pub today_sales: i64,
    /// Revenue since UTC midnight, in cents.
    pub today_revenue_cents: i64,
}

impl SalesStats {
    /// Returns all-time revenue as Money.
    #[inline]
    pub fn total_revenue(&self) -> Money {
        Money::from_cents(self.total_revenue_cents)
    }

    /// Returns today's revenue as Money.
    #[inline]
    pub fn today_revenue(&self) -> Money {
        Money::from_cents(self.today_revenue_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
