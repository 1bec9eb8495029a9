//! # stockroom-client: Client API Shim
//!
//! A Rust rendition of the browser UI's `api` object: one surface, two
//! strategies, automatic fallback.
//!
//! ## Routing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  InventoryClient::get_products(&query)                                 │
//! │       │                                                                 │
//! │       ├── offline? ─────────────────────────► OfflineMirror (only)     │
//! │       │                                                                 │
//! │       └── online:  NetworkApi  ── Ok(envelope) ──► returned as-is      │
//! │                        │                           (success:false too) │
//! │                        └── Err(_) ── warn! ──► OfflineMirror (once)    │
//! │                                                                         │
//! │  No retries. No reconciliation between the two data sources.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`api`] - The `InventoryApi` trait every strategy implements
//! - [`network`] - HTTP strategy (reqwest)
//! - [`mirror`] - Offline strategy (local JSON snapshot)
//! - [`connectivity`] - Offline detection flags
//! - [`shim`] - `InventoryClient`, the routing layer
//! - [`error`] - Client error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockroom_client::{
//!     Connectivity, InventoryApi, InventoryClient, NetworkApi, NetworkConfig, OfflineMirror,
//! };
//! use stockroom_core::ProductQuery;
//!
//! let network = NetworkApi::new(NetworkConfig::new("http://localhost:5000"))?;
//! let mirror = OfflineMirror::open("./offline").await?;
//! let client = InventoryClient::new(network, mirror, Connectivity::online());
//!
//! let listing = client.get_products(&ProductQuery::new(Some("vis"), "all")).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod api;
pub mod connectivity;
pub mod error;
pub mod mirror;
pub mod network;
pub mod shim;

// =============================================================================
// Re-exports
// =============================================================================

pub use api::{ImageUpload, InventoryApi};
pub use connectivity::Connectivity;
pub use error::{ClientError, ClientResult};
pub use mirror::OfflineMirror;
pub use network::{NetworkApi, NetworkConfig};
pub use shim::InventoryClient;
