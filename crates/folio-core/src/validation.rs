//! # Validation Module
//!
//! Input validation utilities for Folio.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation (forms)                                          │
//! │  ├── Basic format checks (empty, length)                                │
//! │  └── Immediate user feedback                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE: Business rule validation                         │
//! │  ├── Runs before any storage write                                      │
//! │  └── Typed errors, surfaced verbatim                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── NOT NULL constraints                                               │
//! │  ├── UNIQUE constraints (isbn)                                          │
//! │  └── CHECK constraints (stock >= 0, quantity >= 1)                      │
//! │                                                                         │
//! │  Defense in depth: Multiple layers catch different errors               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use folio_core::validation::{validate_isbn, validate_quantity};
//!
//! // Validate ISBN before database insert
//! validate_isbn("978-0441172719").unwrap();
//!
//! // Validate quantity before checkout
//! validate_quantity(5).unwrap();
//! ```

use crate::error::ValidationError;
use crate::types::BookInput;
use crate::{MAX_ITEM_QUANTITY, MAX_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a book title.
///
/// ## Rules
/// - Must not be blank after trimming
/// - Must be at most 200 characters
///
/// ## Example
/// ```rust
/// use folio_core::validation::validate_title;
///
/// assert!(validate_title("The Great Gatsby").is_ok());
/// assert!(validate_title("   ").is_err());
/// ```
pub fn validate_title(title: &str) -> ValidationResult<()> {
    let title = title.trim();

    if title.is_empty() {
        return Err(ValidationError::Required {
            field: "title".to_string(),
        });
    }

    if title.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "title".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates an author name.
///
/// ## Rules
/// - Must not be blank after trimming
/// - Must be at most 200 characters
pub fn validate_author(author: &str) -> ValidationResult<()> {
    let author = author.trim();

    if author.is_empty() {
        return Err(ValidationError::Required {
            field: "author".to_string(),
        });
    }

    if author.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "author".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates an ISBN.
///
/// ## Rules
/// - Must not be blank after trimming
/// - Must be at most 32 characters
///
/// No digit/checksum validation: legacy catalogs carry SBNs and internal
/// codes in this field, so anything non-blank is accepted. Uniqueness is
/// enforced at the catalog layer, not here.
///
/// ## Example
/// ```rust
/// use folio_core::validation::validate_isbn;
///
/// assert!(validate_isbn("978-0441172719").is_ok());
/// assert!(validate_isbn("").is_err());
/// ```
pub fn validate_isbn(isbn: &str) -> ValidationResult<()> {
    let isbn = isbn.trim();

    if isbn.is_empty() {
        return Err(ValidationError::Required {
            field: "isbn".to_string(),
        });
    }

    if isbn.len() > 32 {
        return Err(ValidationError::TooLong {
            field: "isbn".to_string(),
            max: 32,
        });
    }

    Ok(())
}

/// Validates a genre label.
///
/// ## Rules
/// - Must not be blank after trimming
/// - Must be at most 100 characters
pub fn validate_genre(genre: &str) -> ValidationResult<()> {
    let genre = genre.trim();

    if genre.is_empty() {
        return Err(ValidationError::Required {
            field: "genre".to_string(),
        });
    }

    if genre.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "genre".to_string(),
            max: 100,
        });
    }

    Ok(())
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (returns all/default results)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a sale line quantity.
///
/// ## Rules
/// - Must be at least 1
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Checkout: Add Line                                                     │
/// │                                                                         │
/// │  User enters quantity: 5                                                │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(5) ← THIS FUNCTION                                   │
/// │       │                                                                 │
/// │       ├── qty < 1? → Error: "quantity must be at least 1"               │
/// │       │                                                                 │
/// │       ├── qty > 999? → Error: "quantity must be at most 999"            │
/// │       │                                                                 │
/// │       └── OK → Proceed against available stock                          │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 1 {
        return Err(ValidationError::AtLeast {
            field: "quantity".to_string(),
            min: 1,
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::AtMost {
            field: "quantity".to_string(),
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (promotional giveaways)
/// - Must not exceed MAX_PRICE_CENTS ($1,000,000.00)
///
/// ## Example
/// ```rust
/// use folio_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1099).is_ok());  // $10.99
/// assert!(validate_price_cents(0).is_ok());     // Free item
/// assert!(validate_price_cents(-100).is_err()); // Invalid
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "price".to_string(),
        });
    }

    if cents > MAX_PRICE_CENTS {
        return Err(ValidationError::AtMost {
            field: "price".to_string(),
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates a stock level.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (out of print, awaiting restock)
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "stock".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates a full book create/update payload.
///
/// Checks every field and fails on the first violation, in form order:
/// title, author, isbn, genre, price, stock.
///
/// ## Example
/// ```rust
/// use folio_core::types::BookInput;
/// use folio_core::validation::validate_book_input;
///
/// let input = BookInput {
///     title: "Dune".to_string(),
///     author: "Frank Herbert".to_string(),
///     isbn: "978-0441172719".to_string(),
///     price_cents: 749,
///     stock: 10,
///     genre: "Science Fiction".to_string(),
///     cover_url: None,
/// };
/// assert!(validate_book_input(&input).is_ok());
/// ```
pub fn validate_book_input(input: &BookInput) -> ValidationResult<()> {
    validate_title(&input.title)?;
    validate_author(&input.author)?;
    validate_isbn(&input.isbn)?;
    validate_genre(&input.genre)?;
    validate_price_cents(input.price_cents)?;
    validate_stock(input.stock)?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
