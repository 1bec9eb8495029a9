//! # Category Repository
//!
//! Categories are read-only through the API. Inserts only happen while
//! seeding an empty store.

use std::sync::Arc;

use stockroom_core::Category;
use tracing::debug;

use crate::adapter::QueryExecutor;
use crate::error::{DbError, DbResult};
use crate::value::{Row, RowExt, SqlValue};

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    executor: Arc<dyn QueryExecutor>,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        CategoryRepository { executor }
    }

    /// All categories, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let rows = self
            .executor
            .execute(
                "SELECT id, name, description, created_at FROM categories ORDER BY name",
                &[],
            )
            .await?
            .into_rows()?;

        debug!(count = rows.len(), "Listed categories");
        rows.iter().map(category_from_row).collect()
    }

    pub async fn count(&self) -> DbResult<i64> {
        let rows = self
            .executor
            .execute("SELECT COUNT(*) AS count FROM categories", &[])
            .await?
            .into_rows()?;

        match rows.first() {
            Some(row) => row.get_i64("count"),
            None => Ok(0),
        }
    }

    /// Inserts a category and returns its generated id.
    pub async fn create(&self, name: &str, description: Option<&str>) -> DbResult<i64> {
        debug!(name = %name, "Inserting category");

        let summary = self
            .executor
            .execute(
                "INSERT INTO categories (name, description) VALUES (?, ?)",
                &[SqlValue::from(name), SqlValue::from(description)],
            )
            .await?
            .into_write()?;

        summary
            .insert_id
            .ok_or_else(|| DbError::QueryFailed("category insert returned no id".to_string()))
    }
}

fn category_from_row(row: &Row) -> DbResult<Category> {
    Ok(Category {
        id: row.get_i64("id")?,
        name: row.get_string("name")?,
        description: row.get_opt_string("description")?,
        created_at: row.get_timestamp("created_at")?,
    })
}
