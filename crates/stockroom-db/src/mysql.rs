//! # MySQL Executor
//!
//! The networked engine, selected with `USE_MYSQL=true`.
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. connect without a default database                                 │
//! │  2. CREATE DATABASE IF NOT EXISTS `inventory_manager`                  │
//! │  3. open the pool (max 10 connections) on that database                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Row Decoding
//! MySQL reports a declared type per column, so decoding goes by column
//! type rather than by value:
//! ```text
//! INT family / YEAR     → i64        *UNSIGNED → u64
//! DECIMAL(10,2)         → f64 (via rust_decimal)
//! FLOAT / DOUBLE        → f64
//! TIMESTAMP / DATETIME  → "YYYY-MM-DD HH:MM:SS"
//! everything else       → String
//! ```

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::mysql::{MySqlArguments, MySqlConnectOptions, MySqlPoolOptions, MySqlRow};
use sqlx::{Arguments, Column, ConnectOptions, Connection, MySqlPool, Row as _, TypeInfo, ValueRef};
use tracing::{debug, info};

use crate::adapter::{is_insert_statement, is_read_statement, Backend, QueryExecutor};
use crate::error::{DbError, DbResult};
use crate::pool::MySqlConfig;
use crate::value::{json_f64, QueryOutcome, Row, SqlValue, WriteSummary};
use stockroom_core::SQL_TIMESTAMP_FORMAT;

/// [`QueryExecutor`] over a `MySqlPool`.
#[derive(Debug, Clone)]
pub struct MySqlExecutor {
    pool: MySqlPool,
}

impl MySqlExecutor {
    /// Creates the database if needed, then opens the pool.
    pub async fn connect(config: &MySqlConfig) -> DbResult<Self> {
        info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            "Connecting to MySQL"
        );

        let server_options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password);

        let mut conn = server_options
            .connect()
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;
        let create = format!(
            "CREATE DATABASE IF NOT EXISTS {}",
            quote_identifier(&config.database)
        );
        sqlx::query(&create)
            .execute(&mut conn)
            .await
            .map_err(|e| DbError::SchemaFailed(e.to_string()))?;
        conn.close()
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout)
            .connect_with(server_options.database(&config.database))
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(max_connections = config.max_connections, "MySQL pool created");
        Ok(MySqlExecutor { pool })
    }

    /// Wraps an existing pool.
    pub fn from_pool(pool: MySqlPool) -> Self {
        MySqlExecutor { pool }
    }
}

/// Backtick-quotes an identifier, doubling embedded backticks.
fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

fn bind(params: &[SqlValue]) -> DbResult<MySqlArguments> {
    let mut args = MySqlArguments::default();
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

fn decode_row(row: &MySqlRow) -> DbResult<Row> {
    let mut decoded = Row::new();
    for (i, column) in row.columns().iter().enumerate() {
        if row.try_get_raw(i)?.is_null() {
            decoded.insert(column.name().to_string(), Value::Null);
            continue;
        }

        let type_name = column.type_info().name().to_ascii_uppercase();
        let value = if type_name.ends_with("UNSIGNED") {
            Value::from(row.try_get_unchecked::<u64, _>(i)?)
        } else {
            match type_name.as_str() {
                "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => {
                    Value::from(row.try_get_unchecked::<i64, _>(i)?)
                }
                "BOOLEAN" => Value::from(row.try_get_unchecked::<bool, _>(i)?),
                "FLOAT" => json_f64(f64::from(row.try_get_unchecked::<f32, _>(i)?)),
                "DOUBLE" => json_f64(row.try_get_unchecked::<f64, _>(i)?),
                "DECIMAL" => {
                    let amount: Decimal = row.try_get_unchecked(i)?;
                    let amount = amount.to_f64().ok_or_else(|| {
                        DbError::decode(column.name(), format!("DECIMAL out of range: {amount}"))
                    })?;
                    json_f64(amount)
                }
                "TIMESTAMP" | "DATETIME" => {
                    let ts: NaiveDateTime = row.try_get_unchecked(i)?;
                    Value::String(ts.format(SQL_TIMESTAMP_FORMAT).to_string())
                }
                "DATE" => {
                    let date: NaiveDate = row.try_get_unchecked(i)?;
                    Value::String(date.to_string())
                }
                "BINARY" | "VARBINARY" | "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" => {
                    let bytes: Vec<u8> = row.try_get_unchecked(i)?;
                    Value::String(String::from_utf8_lossy(&bytes).into_owned())
                }
                _ => Value::String(row.try_get_unchecked::<String, _>(i)?),
            }
        };
        decoded.insert(column.name().to_string(), value);
    }
    Ok(decoded)
}

#[async_trait]
impl QueryExecutor for MySqlExecutor {
    fn backend(&self) -> Backend {
        Backend::MySql
    }

    async fn execute(&self, sql: &str, params: &[SqlValue]) -> DbResult<QueryOutcome> {
        debug!(sql = %sql.trim(), params = params.len(), "MySQL execute");
        let query = sqlx::query_with(sql, bind(params)?);

        if is_read_statement(sql) {
            let rows = query.fetch_all(&self.pool).await?;
            let rows = rows.iter().map(decode_row).collect::<DbResult<Vec<_>>>()?;
            debug!(count = rows.len(), "MySQL rows returned");
            return Ok(QueryOutcome::Rows(rows));
        }

        let result = query.execute(&self.pool).await?;
        let insert_id = if is_insert_statement(sql) {
            i64::try_from(result.last_insert_id()).ok()
        } else {
            None
        };
        Ok(QueryOutcome::Written(WriteSummary {
            insert_id,
            changed: result.rows_affected(),
        }))
    }

    async fn ping(&self) -> DbResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        info!("Closing MySQL pool");
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("inventory_manager"), "`inventory_manager`");
        assert_eq!(quote_identifier("we`ird"), "`we``ird`");
    }

    #[test]
    fn test_bind_accepts_every_value_kind() {
        let params = [
            SqlValue::Null,
            SqlValue::Int(4),
            SqlValue::Real(12.5),
            SqlValue::Text("Vis".to_string()),
        ];
        assert!(bind(&params).is_ok());
    }
}
