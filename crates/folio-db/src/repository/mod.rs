//! # Repository Module
//!
//! Database repository implementations for Folio.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Request Handler                                                       │
//! │       │                                                                 │
//! │       │  db.books().search_available("dune")                           │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  BookRepository                                                        │
//! │  ├── search_available(&self, query)                                    │
//! │  ├── get(&self, id)                                                    │
//! │  ├── create(&self, input)                                              │
//! │  └── update(&self, id, input)                                          │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • Easy to test (mock the repository)                                  │
//! │  • SQL is isolated in one place                                        │
//! │  • Can swap database implementations                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`BookRepository`] - Catalog CRUD, search, and guarded deletes
//! - [`SaleRepository`] - Sale processing and ledger edits
//!
//! [`BookRepository`]: book::BookRepository
//! [`SaleRepository`]: sale::SaleRepository

pub mod book;
pub mod sale;
