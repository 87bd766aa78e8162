//! # Error Types
//!
//! Domain-specific error types for folio-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  folio-core errors (this file)                                          │
//! │  ├── CoreError        - Business rule violations                        │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  folio-db errors (separate crate)                                       │
//! │  ├── DbError          - Database operation failures                     │
//! │  └── StoreError       - CoreError | DbError, what callers receive       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → caller                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (title, ISBN, counts)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use serde::Serialize;
use thiserror::Error;

// =============================================================================
// Error Kind
// =============================================================================

/// Machine-readable error classification.
///
/// Callers branch on the kind while showing `to_string()` to the user:
/// `Conflict` offers a force-delete, `InsufficientStock` highlights the
/// quantity field, and so on.
///
/// ## Serialization
/// ```json
/// { "kind": "INSUFFICIENT_STOCK", "message": "Insufficient stock for ..." }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Referenced book, sale, or sale line does not exist (404)
    NotFound,

    /// Input validation failed before any write (400)
    Validation,

    /// Duplicate ISBN, or delete blocked by existing sales (409)
    Conflict,

    /// Requested quantity exceeds available stock (422)
    InsufficientStock,

    /// Storage-level failure, surfaced by the database crate (500)
    Storage,
}

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Book cannot be found.
    ///
    /// ## When This Occurs
    /// - Book ID doesn't exist in the catalog
    /// - Book was deleted between a listing and the request
    #[error("Book not found: {0}")]
    BookNotFound(String),

    /// Sale not found.
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// Sale line not found.
    #[error("Sale line not found: {0}")]
    SaleLineNotFound(String),

    /// Insufficient stock to complete the operation.
    ///
    /// ## When This Occurs
    /// - A sale requests more copies than are on the shelf
    /// - A line quantity edit increases demand beyond available stock
    ///
    /// ## User Workflow
    /// ```text
    /// Checkout (qty: 5)
    ///      │
    ///      ▼
    /// Check stock: available=3
    ///      │
    ///      ▼
    /// InsufficientStock { title: "Dune", available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// UI shows: "Only 3 copies of Dune in stock"
    /// ```
    #[error("Insufficient stock for \"{title}\": available {available}, requested {requested}")]
    InsufficientStock {
        title: String,
        available: i64,
        requested: i64,
    },

    /// A book with this ISBN already exists in the catalog.
    #[error("A book with ISBN '{isbn}' already exists")]
    IsbnExists { isbn: String },

    /// Plain delete refused because sales history references the book.
    ///
    /// Carries the blocking count so the caller can offer force-delete,
    /// which removes the book along with its sales history.
    #[error("Book has {count} sale record(s); use force delete to remove it along with its sales history")]
    SaleRecordsExist { count: i64 },

    /// Sale was requested with no lines.
    #[error("Cart is empty")]
    CartEmpty,

    /// Cart has exceeded maximum allowed items.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Classifies this error for programmatic handling.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::BookNotFound(_)
            | CoreError::SaleNotFound(_)
            | CoreError::SaleLineNotFound(_) => ErrorKind::NotFound,
            CoreError::InsufficientStock { .. } => ErrorKind::InsufficientStock,
            CoreError::IsbnExists { .. } | CoreError::SaleRecordsExist { .. } => {
                ErrorKind::Conflict
            }
            CoreError::CartEmpty | CoreError::CartTooLarge { .. } | CoreError::Validation(_) => {
                ErrorKind::Validation
            }
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or blank after trimming.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Numeric value is below the allowed minimum.
    #[error("{field} must be at least {min}")]
    AtLeast { field: String, min: i64 },

    /// Numeric value exceeds the allowed maximum.
    #[error("{field} must be at most {max}")]
    AtMost { field: String, max: i64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            title: "Dune".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for \"Dune\": available 3, requested 5"
        );

        let err = CoreError::SaleRecordsExist { count: 4 };
        assert_eq!(
            err.to_string(),
            "Book has 4 sale record(s); use force delete to remove it along with its sales history"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "title".to_string(),
        };
        assert_eq!(err.to_string(), "title is required");

        let err = ValidationError::AtLeast {
            field: "quantity".to_string(),
            min: 1,
        };
        assert_eq!(err.to_string(), "quantity must be at least 1");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "isbn".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            CoreError::BookNotFound("b-1".to_string()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            CoreError::SaleLineNotFound("l-1".to_string()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            CoreError::IsbnExists {
                isbn: "978-0441172719".to_string()
            }
            .kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            CoreError::SaleRecordsExist { count: 2 }.kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            CoreError::InsufficientStock {
                title: "Dune".to_string(),
                available: 0,
                requested: 1,
            }
            .kind(),
            ErrorKind::InsufficientStock
        );
        assert_eq!(CoreError::CartEmpty.kind(), ErrorKind::Validation);
    }
}
