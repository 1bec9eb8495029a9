//! # stockroom-core: Pure Domain Logic for Stockroom
//!
//! This crate holds the domain model shared by every other crate in the
//! workspace. It has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          Browser UI  /  stockroom-client (API shim)             │   │
//! │  └───────────────┬───────────────────────────────┬─────────────────┘   │
//! │                  │ HTTP JSON                     │ offline             │
//! │  ┌───────────────▼─────────────────┐   ┌─────────▼─────────────────┐   │
//! │  │  apps/api-server (axum)         │   │  OfflineMirror (JSON file)│   │
//! │  └───────────────┬─────────────────┘   └─────────┬─────────────────┘   │
//! │                  │                               │                     │
//! │  ┌───────────────▼─────────────────┐             │                     │
//! │  │  stockroom-db (SQLite | MySQL)  │             │                     │
//! │  └───────────────┬─────────────────┘             │                     │
//! │                  │                               │                     │
//! │  ┌───────────────▼───────────────────────────────▼─────────────────┐   │
//! │  │               ★ stockroom-core (THIS CRATE) ★                    │   │
//! │  │   types • money • envelope • validation • seed                  │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Category, Product, filters, stock status)
//! - [`money`] - Money type with integer arithmetic
//! - [`envelope`] - `{success, ...}` JSON envelopes returned by every API call
//! - [`error`] - Domain error types
//! - [`validation`] - Upload rules and input normalization
//! - [`seed`] - Demonstration categories and products
//!
//! ## Example Usage
//!
//! ```rust
//! use stockroom_core::{CategoryFilter, ProductQuery};
//!
//! let query = ProductQuery::new(Some("  vis "), "4");
//! assert_eq!(query.search.as_deref(), Some("vis"));
//! assert_eq!(query.category, CategoryFilter::Id(4));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod envelope;
pub mod error;
pub mod money;
pub mod seed;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use envelope::{
    AckEnvelope, CategoriesEnvelope, CreatedEnvelope, Envelope, HealthEnvelope, ProductsEnvelope,
    UploadEnvelope,
};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum stock level applied when a product is written without one.
///
/// Only used for low-stock flagging; nothing enforces it.
pub const DEFAULT_MIN_STOCK_LEVEL: i64 = 10;

/// Default cap for a single uploaded image (5 MB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5_000_000;

/// Category filter value meaning "no category restriction".
pub const CATEGORY_FILTER_ALL: &str = "all";

/// Path prefix of the JSON API.
pub const API_PREFIX: &str = "/api";

/// Public path under which uploaded images are served.
pub const UPLOADS_PUBLIC_PATH: &str = "/uploads";
