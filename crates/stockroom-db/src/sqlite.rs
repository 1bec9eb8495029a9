//! # SQLite Executor
//!
//! The default, embedded engine.
//!
//! ## WAL Mode
//! File databases run in WAL (Write-Ahead Logging) mode so readers don't
//! block the writer. Foreign keys are switched on for every connection:
//! SQLite ships with them disabled, and the `ON DELETE SET NULL` on
//! `products.category_id` depends on them.
//!
//! ## Row Decoding
//! SQLite columns have affinities, not types: the storage class of each
//! value decides how it is read.
//! ```text
//! INTEGER → i64      REAL → f64      TEXT → String
//! BLOB    → String (lossy UTF-8)     NULL → null
//! ```

use std::str::FromStr;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{
    SqliteArguments, SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow,
    SqliteSynchronous,
};
use sqlx::{Arguments, Column, Row as _, SqlitePool, TypeInfo, ValueRef};
use tracing::{debug, info};

use crate::adapter::{is_insert_statement, is_read_statement, Backend, QueryExecutor};
use crate::error::{DbError, DbResult};
use crate::pool::SqliteConfig;
use crate::value::{json_f64, QueryOutcome, Row, SqlValue, WriteSummary};

/// [`QueryExecutor`] over a `SqlitePool`.
#[derive(Debug, Clone)]
pub struct SqliteExecutor {
    pool: SqlitePool,
}

impl SqliteExecutor {
    /// Opens (creating if missing) the configured database.
    pub async fn connect(config: &SqliteConfig) -> DbResult<Self> {
        info!(path = %config.path.display(), "Opening SQLite database");

        let base_options = if config.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        } else {
            SqliteConnectOptions::new()
                .filename(&config.path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
        };
        let connect_options = base_options.foreign_keys(true);

        // An in-memory database lives and dies with its single connection
        let max_connections = if config.is_in_memory() {
            1
        } else {
            config.max_connections
        };

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(config.connect_timeout);
        if config.is_in_memory() {
            pool_options = pool_options
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(max_connections, "SQLite pool created");
        Ok(SqliteExecutor { pool })
    }

    /// Wraps an existing pool.
    pub fn from_pool(pool: SqlitePool) -> Self {
        SqliteExecutor { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn bind<'q>(params: &[SqlValue]) -> DbResult<SqliteArguments<'q>> {
    let mut args = SqliteArguments::default();
    for param in params {
        let added = match param {
            SqlValue::Null => args.add(None::<String>),
            SqlValue::Int(v) => args.add(*v),
            SqlValue::Real(v) => args.add(*v),
            SqlValue::Text(v) => args.add(v.clone()),
        };
        added.map_err(|e| DbError::QueryFailed(e.to_string()))?;
    }
    Ok(args)
}

fn decode_row(row: &SqliteRow) -> DbResult<Row> {
    let mut decoded = Row::new();
    for (i, column) in row.columns().iter().enumerate() {
        let storage_class = {
            let raw = row.try_get_raw(i)?;
            if raw.is_null() {
                None
            } else {
                Some(raw.type_info().name().to_string())
            }
        };

        let value = match storage_class.as_deref() {
            None => Value::Null,
            Some("INTEGER") => Value::from(row.try_get_unchecked::<i64, _>(i)?),
            Some("REAL") => json_f64(row.try_get_unchecked::<f64, _>(i)?),
            Some("BLOB") => {
                let bytes: Vec<u8> = row.try_get_unchecked(i)?;
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            }
            Some(_) => Value::String(row.try_get_unchecked::<String, _>(i)?),
        };
        decoded.insert(column.name().to_string(), value);
    }
    Ok(decoded)
}

#[async_trait]
impl QueryExecutor for SqliteExecutor {
    fn backend(&self) -> Backend {
        Backend::Sqlite
    }

    async fn execute(&self, sql: &str, params: &[SqlValue]) -> DbResult<QueryOutcome> {
        debug!(sql = %sql.trim(), params = params.len(), "SQLite execute");
        let query = sqlx::query_with(sql, bind(params)?);

        if is_read_statement(sql) {
            let rows = query.fetch_all(&self.pool).await?;
            let rows = rows.iter().map(decode_row).collect::<DbResult<Vec<_>>>()?;
            debug!(count = rows.len(), "SQLite rows returned");
            return Ok(QueryOutcome::Rows(rows));
        }

        let result = query.execute(&self.pool).await?;
        Ok(QueryOutcome::Written(WriteSummary {
            insert_id: is_insert_statement(sql).then(|| result.last_insert_rowid()),
            changed: result.rows_affected(),
        }))
    }

    async fn ping(&self) -> DbResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        info!("Closing SQLite pool");
        self.pool.close().await;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    async fn executor() -> SqliteExecutor {
        SqliteExecutor::connect(&SqliteConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_write_then_read_round_trip() {
        let exec = executor().await;
        exec.execute(
            "CREATE TABLE t (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT, price REAL, note TEXT)",
            &[],
        )
        .await
        .unwrap();

        let written = exec
            .execute(
                "INSERT INTO t (name, price, note) VALUES (?, ?, ?)",
                &["Vis".into(), 12.5.into(), SqlValue::Null],
            )
            .await
            .unwrap()
            .into_write()
            .unwrap();
        assert_eq!(written.insert_id, Some(1));
        assert_eq!(written.changed, 1);

        let rows = exec
            .execute("SELECT id, name, price, note FROM t WHERE name = ?", &["Vis".into()])
            .await
            .unwrap()
            .into_rows()
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], Value::from(1));
        assert_eq!(rows[0]["name"], Value::from("Vis"));
        assert_eq!(rows[0]["price"], Value::from(12.5));
        assert_eq!(rows[0]["note"], Value::Null);
    }

    #[tokio::test]
    async fn test_update_reports_no_insert_id() {
        let exec = executor().await;
        exec.execute("CREATE TABLE t (id INTEGER PRIMARY KEY, n INTEGER)", &[])
            .await
            .unwrap();
        exec.execute("INSERT INTO t (id, n) VALUES (1, 0)", &[])
            .await
            .unwrap();

        let written = exec
            .execute("UPDATE t SET n = ? WHERE id = ?", &[5_i64.into(), 99_i64.into()])
            .await
            .unwrap()
            .into_write()
            .unwrap();
        assert_eq!(written, WriteSummary { insert_id: None, changed: 0 });
    }

    #[tokio::test]
    async fn test_engine_error_is_query_failed() {
        let exec = executor().await;
        let err = exec.execute("SELECT * FROM missing_table", &[]).await.unwrap_err();
        match err {
            DbError::QueryFailed(msg) => assert!(msg.contains("missing_table")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_foreign_keys_enabled() {
        let exec = executor().await;
        let rows = exec
            .execute("PRAGMA foreign_keys", &[])
            .await
            .unwrap()
            .into_rows()
            .unwrap();
        assert_eq!(rows[0]["foreign_keys"], Value::from(1));
    }

    #[tokio::test]
    async fn test_file_database_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let config = SqliteConfig::new(dir.path().join("inventory.db"));
        let exec = SqliteExecutor::connect(&config).await.unwrap();
        exec.ping().await.unwrap();
        assert!(dir.path().join("inventory.db").exists());
        exec.close().await;
    }
}
