//! # Stockroom API Server
//!
//! HTTP resource layer for the inventory: categories, products, product
//! images, and a health probe.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         API Server                                      │
//! │                                                                         │
//! │  Browser UI / stockroom-client                                          │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  ┌─────────────┐   ┌──────────────┐   ┌──────────────────────────────┐ │
//! │  │ TraceLayer  │──►│  routes::*   │──►│  AppState                    │ │
//! │  │ CorsLayer   │   │  (axum)      │   │   • db: Database (SQL/MySQL) │ │
//! │  └─────────────┘   └──────────────┘   │   • uploads: UploadStore     │ │
//! │                                       └──────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables (an optional `.env` file is loaded first):
//! - `PORT` - listen port (default: 5000)
//! - `USE_MYSQL` - `true` selects MySQL (default: SQLite)
//! - `DB_HOST`, `DB_USER`, `DB_PASSWORD`, `DB_NAME`, `DB_PORT` - MySQL connection
//! - `SQLITE_PATH` - SQLite file (default: ./inventory.db)
//! - `UPLOAD_DIR` - image directory (default: ./uploads)
//! - `MAX_FILE_SIZE` - upload cap in bytes (default: 5000000)
//! - `RUST_LOG` - log filter (default: info)

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod uploads;

// Re-exports
pub use bootstrap::{bootstrap, StartupError};
pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ErrorCode};
pub use routes::router;
pub use state::AppState;
pub use uploads::{UploadError, UploadStore};
