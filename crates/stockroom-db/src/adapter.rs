//! # Query Adapter
//!
//! One contract over two SQL engines:
//! `execute(statement, params) -> rows | {insert_id, changed}`.
//!
//! ## Dispatch
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Repositories build SQL with `?` placeholders (valid for both engines) │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Arc<dyn QueryExecutor>  ← chosen once at startup from USE_MYSQL       │
//! │       │                                                                 │
//! │       ├── SqliteExecutor  (sqlite.rs)                                  │
//! │       └── MySqlExecutor   (mysql.rs)                                   │
//! │                                                                         │
//! │  Leading keyword decides the outcome shape, identically for both:      │
//! │    SELECT / WITH / PRAGMA / SHOW  → Rows                               │
//! │    anything else                  → Written                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No retries happen here. Errors carry the engine's message upward.

use std::fmt;

use async_trait::async_trait;

use crate::error::DbResult;
use crate::value::{QueryOutcome, SqlValue};

/// The active SQL engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Sqlite,
    MySql,
}

impl Backend {
    /// Display name reported by the health endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Sqlite => "SQLite",
            Backend::MySql => "MySQL",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Executes parameterized SQL against one engine.
#[async_trait]
pub trait QueryExecutor: Send + Sync + fmt::Debug {
    /// Which engine this executor talks to.
    fn backend(&self) -> Backend;

    /// Runs one statement with positional `?` parameters.
    async fn execute(&self, sql: &str, params: &[SqlValue]) -> DbResult<QueryOutcome>;

    /// Cheap liveness probe (`SELECT 1`).
    async fn ping(&self) -> DbResult<()>;

    /// Closes the underlying pool. Later calls fail.
    async fn close(&self);
}

/// Whether a statement returns rows.
pub fn is_read_statement(sql: &str) -> bool {
    let keyword: String = sql
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    matches!(
        keyword.to_ascii_uppercase().as_str(),
        "SELECT" | "WITH" | "PRAGMA" | "SHOW"
    )
}

/// Whether a statement is an INSERT (the only kind reporting an insert id).
pub fn is_insert_statement(sql: &str) -> bool {
    sql.trim_start()
        .get(..6)
        .is_some_and(|kw| kw.eq_ignore_ascii_case("INSERT"))
}
