//! Shared application state, handed to every handler through axum `State`.

use stockroom_db::Database;

use crate::uploads::UploadStore;

/// Cloned per request; both fields share their underlying resources.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub uploads: UploadStore,
}

impl AppState {
    pub fn new(db: Database, uploads: UploadStore) -> Self {
        AppState { db, uploads }
    }
}
