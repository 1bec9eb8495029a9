//! # Startup Sequence
//!
//! ```text
//! 1. upload directory  ── create_dir_all (idempotent)
//! 2. store connection  ── SQLite file or MySQL server
//! 3. schema            ── CREATE TABLE IF NOT EXISTS × 2
//! 4. seed              ── only when the category table is empty
//! ```
//!
//! Any failure aborts startup; the binary exits non-zero.

use stockroom_db::{Database, DbError};
use thiserror::Error;
use tracing::info;

use crate::config::ServerConfig;
use crate::state::AppState;
use crate::uploads::{UploadError, UploadStore};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Cannot prepare upload directory: {0}")]
    Uploads(#[from] UploadError),

    #[error("Database unavailable: {0}")]
    Database(#[from] DbError),
}

/// Runs the startup steps in order and returns the ready state.
pub async fn bootstrap(config: &ServerConfig) -> Result<AppState, StartupError> {
    let uploads = UploadStore::new(&config.upload_dir, config.max_file_size);
    uploads.ensure_dir().await?;
    info!(dir = %uploads.dir().display(), "Upload directory ready");

    let db = Database::connect(&config.database).await?;
    let report = db.bootstrap().await?;
    if report.skipped() {
        info!(backend = %db.backend(), "Store already populated, seeding skipped");
    } else {
        info!(
            backend = %db.backend(),
            categories = report.categories,
            products = report.products,
            "Seeded demonstration data"
        );
    }

    Ok(AppState::new(db, uploads))
}
