//! # stockroom-db: Database Layer for Stockroom
//!
//! This crate provides database access for Stockroom. Every statement goes
//! through a single query adapter that runs unchanged SQL text against
//! SQLite or MySQL.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Data Flow                              │
//! │                                                                         │
//! │  axum handler (GET /api/products)                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  stockroom-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │   Schema +   │  │   │
//! │  │   │   (pool.rs)   │    │ (product.rs)  │    │   Seeding    │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ Arc<dyn       │◄───│ CategoryRepo  │    │ CREATE TABLE │  │   │
//! │  │   │ QueryExecutor>│    │ ProductRepo   │    │ IF NOT EXISTS│  │   │
//! │  │   └───────┬───────┘    └───────────────┘    └──────────────┘  │   │
//! │  │           │                                                     │   │
//! │  │     ┌─────┴──────┐                                              │   │
//! │  │     ▼            ▼                                              │   │
//! │  │  SqliteExecutor  MySqlExecutor   (adapter.rs)                   │   │
//! │  └─────┬────────────┬──────────────────────────────────────────────┘   │
//! │        ▼            ▼                                                   │
//! │   ./inventory.db   MySQL server (inventory_manager)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`adapter`] - The `QueryExecutor` trait and read/write classification
//! - [`value`] - Parameters, decoded rows and write summaries
//! - [`sqlite`] / [`mysql`] - The two engine implementations
//! - [`pool`] - Connection configuration and the `Database` handle
//! - [`schema`] - Dialect-specific `CREATE TABLE IF NOT EXISTS`
//! - [`seed`] - First-start demonstration data
//! - [`repository`] - Category and product repositories
//! - [`error`] - Database error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockroom_core::ProductQuery;
//! use stockroom_db::{Database, DbConfig};
//!
//! let db = Database::connect(&DbConfig::in_memory()).await?;
//! db.bootstrap().await?;
//!
//! let products = db.products().list(&ProductQuery::new(Some("vis"), "all")).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod adapter;
pub mod error;
pub mod mysql;
pub mod pool;
pub mod repository;
pub mod schema;
pub mod seed;
pub mod sqlite;
pub mod value;

// =============================================================================
// Re-exports
// =============================================================================

pub use adapter::{Backend, QueryExecutor};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig, MySqlConfig, SqliteConfig};
pub use seed::SeedReport;
pub use value::{QueryOutcome, Row, SqlValue, WriteSummary};

// Repository re-exports for convenience
pub use repository::category::CategoryRepository;
pub use repository::product::ProductRepository;
