//! # folio-core: Pure Business Logic for Folio
//!
//! This crate is the **heart** of Folio. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Folio Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   Presentation (out of scope)                   │   │
//! │  │    Catalog UI ──► POS UI ──► Sales History UI ──► Dashboard     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ typed request/response               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 folio-db (Transaction Coordinator)              │   │
//! │  │     SQLite transactions, repositories, stats rollups            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ folio-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   error   │  │ validation│  │   │
//! │  │   │   Book    │  │   Money   │  │ CoreError │  │   rules   │  │   │
//! │  │   │   Sale    │  │  (cents)  │  │ ErrorKind │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Book, Sale, SaleLine, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use folio_core::money::Money;
//! use folio_core::validation::validate_quantity;
//!
//! // Create money from cents (never from floats!)
//! let price = Money::from_cents(749); // $7.49
//!
//! // Three copies at the captured unit price
//! validate_quantity(3).unwrap();
//! let line_total = price.multiply_quantity(3);
//!
//! assert_eq!(line_total.cents(), 2247);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use folio_core::Money` instead of
// `use folio_core::money::Money`

pub use error::{CoreError, CoreResult, ErrorKind, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Stock level below which a book counts as "low stock"
///
/// ## Business Reason
/// Drives the dashboard reorder indicator and the low-stock count in
/// inventory rollups. A book with exactly this many copies is NOT low;
/// one fewer is.
pub const LOW_STOCK_THRESHOLD: i64 = 5;

/// Maximum lines allowed in a single checkout
///
/// ## Business Reason
/// Prevents runaway carts and ensures reasonable transaction sizes.
/// Can be made configurable in future versions.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single book per sale line
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
/// Also bounds the line-total arithmetic: with quantity capped here and
/// price capped at [`MAX_PRICE_CENTS`], `price * quantity` summed over
/// [`MAX_CART_ITEMS`] lines stays far inside i64 range.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum book price in cents ($1,000,000.00)
///
/// ## Business Reason
/// Catches fat-fingered price entry (a missing decimal point turns
/// $19.99 into $1999, not into something that corrupts totals), and
/// keeps line-total math overflow-free together with [`MAX_ITEM_QUANTITY`].
pub const MAX_PRICE_CENTS: i64 = 100_000_000;
