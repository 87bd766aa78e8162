//! # folio-db: Database Layer for Folio
//!
//! This crate provides database access for the Folio bookstore system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Folio Data Flow                                 │
//! │                                                                         │
//! │  Caller (UI command, API handler, seed binary)                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     folio-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (book, sale,  │    │  (embedded)  │  │   │
//! │  │   │               │    │  stats)       │    │              │  │   │
//! │  │   │ SqlitePool    │    │ BookRepo      │    │ 001_init.sql │  │   │
//! │  │   │ Connection    │◄───│ SaleRepo      │    │ ...          │  │   │
//! │  │   │ Management    │    │ StatsRepo     │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   ./folio_dev.db (or the path the caller configures)           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and combined store error types
//! - [`repository`] - Repository implementations (book, sale)
//! - [`stats`] - Dashboard rollups
//!
//! ## Usage
//!
//! ```rust,ignore
//! use folio_db::{Database, DbConfig};
//!
//! // Create database with default config
//! let config = DbConfig::new("path/to/db.sqlite");
//! let db = Database::new(config).await?;
//!
//! // Use repositories
//! let shelf = db.books().search_available("dune").await?;
//! let sale_id = db.sales().process_sale(&cart).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod stats;

#[cfg(test)]
pub mod test_utils;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult, StoreError, StoreResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::book::BookRepository;
pub use repository::sale::SaleRepository;
pub use stats::StatsRepository;
