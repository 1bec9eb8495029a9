//! # Schema Bootstrap
//!
//! `CREATE TABLE IF NOT EXISTS` for both tables, in each engine's dialect.
//! There is no migration history: an existing table is left as it is.
//!
//! ## Tables
//! ```text
//! ┌───────────────────────────┐         ┌───────────────────────────────┐
//! │ categories                │         │ products                      │
//! │ ───────────────────────── │         │ ───────────────────────────── │
//! │ id           PK auto      │◄────────│ category_id  FK (nullable)    │
//! │ name         UNIQUE       │  ON     │ id           PK auto          │
//! │ description               │ DELETE  │ name, description             │
//! │ created_at                │ SET NULL│ purchase_price, selling_price │
//! └───────────────────────────┘         │ remaining_stock   DEFAULT 0   │
//!                                       │ min_stock_level   DEFAULT 10  │
//!                                       │ image_url                     │
//!                                       │ created_at, updated_at        │
//!                                       └───────────────────────────────┘
//! ```

use tracing::info;

use crate::adapter::{Backend, QueryExecutor};
use crate::error::{DbError, DbResult};

const SQLITE_CATEGORIES: &str = r#"
CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    description TEXT,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
)"#;

const SQLITE_PRODUCTS: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT,
    category_id INTEGER,
    purchase_price REAL NOT NULL,
    selling_price REAL NOT NULL,
    remaining_stock INTEGER DEFAULT 0,
    min_stock_level INTEGER DEFAULT 10,
    image_url TEXT,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (category_id) REFERENCES categories(id) ON DELETE SET NULL
)"#;

const MYSQL_CATEGORIES: &str = r#"
CREATE TABLE IF NOT EXISTS categories (
    id INT AUTO_INCREMENT PRIMARY KEY,
    name VARCHAR(255) NOT NULL UNIQUE,
    description TEXT,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)"#;

const MYSQL_PRODUCTS: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id INT AUTO_INCREMENT PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    description TEXT,
    category_id INT,
    purchase_price DECIMAL(10,2) NOT NULL,
    selling_price DECIMAL(10,2) NOT NULL,
    remaining_stock INT DEFAULT 0,
    min_stock_level INT DEFAULT 10,
    image_url VARCHAR(500),
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
    FOREIGN KEY (category_id) REFERENCES categories(id) ON DELETE SET NULL
)"#;

/// DDL for one engine, in dependency order.
pub fn statements(backend: Backend) -> [&'static str; 2] {
    match backend {
        Backend::Sqlite => [SQLITE_CATEGORIES, SQLITE_PRODUCTS],
        Backend::MySql => [MYSQL_CATEGORIES, MYSQL_PRODUCTS],
    }
}

/// Creates whichever tables are missing.
pub async fn ensure_schema(executor: &dyn QueryExecutor) -> DbResult<()> {
    let backend = executor.backend();
    for ddl in statements(backend) {
        executor
            .execute(ddl, &[])
            .await
            .map_err(|e| DbError::SchemaFailed(e.to_string()))?;
    }
    info!(%backend, "Database tables ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::SqliteConfig;
    use crate::sqlite::SqliteExecutor;

    #[test]
    fn test_categories_created_before_products() {
        for backend in [Backend::Sqlite, Backend::MySql] {
            let [first, second] = statements(backend);
            assert!(first.contains("categories ("));
            assert!(second.contains("REFERENCES categories(id) ON DELETE SET NULL"));
        }
    }

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let exec = SqliteExecutor::connect(&SqliteConfig::in_memory()).await.unwrap();
        ensure_schema(&exec).await.unwrap();
        ensure_schema(&exec).await.unwrap();

        let rows = exec
            .execute(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('categories', 'products') ORDER BY name",
                &[],
            )
            .await
            .unwrap()
            .into_rows()
            .unwrap();
        let names: Vec<&str> = rows.iter().filter_map(|r| r["name"].as_str()).collect();
        assert_eq!(names, vec!["categories", "products"]);
    }
}
