//! # Database Handle
//!
//! Engine selection, connection configuration and the `Database` handle.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Construction                              │
//! │                                                                         │
//! │  Server startup                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::Sqlite(..) | DbConfig::MySql(..)  ← from USE_MYSQL          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::connect(&config).await                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │   Arc<dyn QueryExecutor>                │                           │
//! │  │   SqliteExecutor  or  MySqlExecutor     │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       │ cloned into axum State, shared by every request                │
//! │       ▼                                                                 │
//! │  db.categories() / db.products()  ← cheap repository handles           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::adapter::{Backend, QueryExecutor};
use crate::error::DbResult;
use crate::mysql::MySqlExecutor;
use crate::repository::category::CategoryRepository;
use crate::repository::product::ProductRepository;
use crate::schema;
use crate::seed::{self, SeedReport};
use crate::sqlite::SqliteExecutor;

const IN_MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// SQLite settings.
///
/// ## Example
/// ```rust,ignore
/// let config = SqliteConfig::new("./inventory.db").max_connections(5);
/// ```
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Path to the database file, or `:memory:`.
    pub path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5
    pub max_connections: u32,

    /// Connection acquire timeout.
    /// Default: 30 seconds
    pub connect_timeout: Duration,
}

impl SqliteConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SqliteConfig {
            path: path.into(),
            max_connections: 5,
            connect_timeout: Duration::from_secs(30),
        }
    }

    /// An isolated in-memory database (for testing).
    pub fn in_memory() -> Self {
        SqliteConfig {
            path: PathBuf::from(IN_MEMORY_PATH),
            max_connections: 1,
            connect_timeout: Duration::from_secs(5),
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.path == Path::new(IN_MEMORY_PATH)
    }
}

/// MySQL settings.
#[derive(Clone)]
pub struct MySqlConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub port: u16,

    /// Default: 10
    pub max_connections: u32,

    /// Default: 30 seconds
    pub connect_timeout: Duration,
}

impl Default for MySqlConfig {
    fn default() -> Self {
        MySqlConfig {
            host: "localhost".to_string(),
            user: "root".to_string(),
            password: String::new(),
            database: "inventory_manager".to_string(),
            port: 3306,
            max_connections: 10,
            connect_timeout: Duration::from_secs(30),
        }
    }
}

// Keep the password out of logs
impl std::fmt::Debug for MySqlConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("port", &self.port)
            .field("max_connections", &self.max_connections)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

/// Which engine to open, and how.
#[derive(Debug, Clone)]
pub enum DbConfig {
    Sqlite(SqliteConfig),
    MySql(MySqlConfig),
}

impl DbConfig {
    /// In-memory SQLite (for testing).
    pub fn in_memory() -> Self {
        DbConfig::Sqlite(SqliteConfig::in_memory())
    }

    pub fn backend(&self) -> Backend {
        match self {
            DbConfig::Sqlite(_) => Backend::Sqlite,
            DbConfig::MySql(_) => Backend::MySql,
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository access.
///
/// Cloning is cheap: clones share one executor and its pool.
///
/// ## Usage in Handlers
/// ```rust,ignore
/// async fn list_categories(State(state): State<AppState>) -> Result<Json<CategoriesEnvelope>, ApiError> {
///     let categories = state.db.categories().list().await?;
///     Ok(Json(CategoriesEnvelope::ok(categories)))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    executor: Arc<dyn QueryExecutor>,
}

impl Database {
    /// Opens the configured engine.
    ///
    /// ## Returns
    /// * `Ok(Database)` - Ready to use (schema not yet ensured, see [`Database::bootstrap`])
    /// * `Err(DbError::ConnectionFailed)` - Store unreachable
    pub async fn connect(config: &DbConfig) -> DbResult<Self> {
        let executor: Arc<dyn QueryExecutor> = match config {
            DbConfig::Sqlite(cfg) => Arc::new(SqliteExecutor::connect(cfg).await?),
            DbConfig::MySql(cfg) => Arc::new(MySqlExecutor::connect(cfg).await?),
        };
        info!(backend = %executor.backend(), "Database connected");
        Ok(Database { executor })
    }

    /// Wraps an already-built executor.
    pub fn from_executor(executor: Arc<dyn QueryExecutor>) -> Self {
        Database { executor }
    }

    pub fn backend(&self) -> Backend {
        self.executor.backend()
    }

    /// The raw adapter, for statements no repository covers.
    pub fn executor(&self) -> &Arc<dyn QueryExecutor> {
        &self.executor
    }

    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(Arc::clone(&self.executor))
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(Arc::clone(&self.executor))
    }

    /// Creates missing tables, then seeds an empty store.
    ///
    /// Idempotent: against a populated store the schema statements are
    /// re-issued and seeding is skipped.
    pub async fn bootstrap(&self) -> DbResult<SeedReport> {
        schema::ensure_schema(self.executor.as_ref()).await?;
        seed::seed_if_empty(self).await
    }

    /// Checks if the store answers queries.
    pub async fn health_check(&self) -> bool {
        match self.executor.ping().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Database health check failed");
                false
            }
        }
    }

    /// Like [`Database::health_check`], keeping the failure.
    pub async fn ping(&self) -> DbResult<()> {
        self.executor.ping().await
    }

    /// Closes the pool. Later operations fail.
    pub async fn close(&self) {
        self.executor.close().await;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::connect(&DbConfig::in_memory()).await.unwrap();
        assert!(db.health_check().await);
        assert_eq!(db.backend(), Backend::Sqlite);
    }

    #[tokio::test]
    async fn test_closed_database_is_unhealthy() {
        let db = Database::connect(&DbConfig::in_memory()).await.unwrap();
        db.close().await;
        assert!(!db.health_check().await);
    }

    #[test]
    fn test_config_defaults() {
        let mysql = MySqlConfig::default();
        assert_eq!(mysql.database, "inventory_manager");
        assert_eq!(mysql.port, 3306);
        assert_eq!(mysql.max_connections, 10);

        let sqlite = SqliteConfig::new("./inventory.db").max_connections(3);
        assert_eq!(sqlite.max_connections, 3);
        assert!(!sqlite.is_in_memory());
        assert!(SqliteConfig::in_memory().is_in_memory());
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = MySqlConfig {
            password: "hunter2".to_string(),
            ..MySqlConfig::default()
        };
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
