//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Filtered Listing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ProductQuery { search: Some("vis"), category: Id(4) }                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SELECT p.*, c.name AS category_name                                   │
//! │  FROM products p LEFT JOIN categories c ON p.category_id = c.id        │
//! │  WHERE 1=1                                                             │
//! │    AND p.category_id = ?                                  ← 4          │
//! │  ORDER BY p.created_at DESC, p.id DESC                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  retain(ProductQuery::matches)                            ← "vis"      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The search term is applied after decoding with [`ProductQuery::matches`],
//! the same rule the offline mirror uses. SQL `LOWER`/`LIKE` only fold ASCII
//! on SQLite and follow accent-insensitive collations on MySQL, so pushing
//! the term into SQL would make the two stores disagree.

use std::sync::Arc;

use stockroom_core::{CategoryFilter, Product, ProductDraft, ProductQuery, ProductUpdate};
use tracing::debug;

use crate::adapter::QueryExecutor;
use crate::error::{DbError, DbResult};
use crate::value::{Row, RowExt, SqlValue};

const SELECT_PRODUCTS: &str = "SELECT p.id, p.name, p.description, p.category_id, \
     p.purchase_price, p.selling_price, p.remaining_stock, p.min_stock_level, \
     p.image_url, p.created_at, p.updated_at, c.name AS category_name \
     FROM products p LEFT JOIN categories c ON p.category_id = c.id \
     WHERE 1=1";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let id = repo.create(&draft).await?;
/// let listed = repo.list(&ProductQuery::new(Some("vis"), "all")).await?;
/// repo.delete(id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    executor: Arc<dyn QueryExecutor>,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        ProductRepository { executor }
    }

    /// Lists products matching the query, newest first.
    ///
    /// Filters combine with AND. Products created in the same second come
    /// back highest id first.
    pub async fn list(&self, query: &ProductQuery) -> DbResult<Vec<Product>> {
        let mut sql = String::from(SELECT_PRODUCTS);
        let mut params = Vec::new();

        match &query.category {
            CategoryFilter::All => {}
            CategoryFilter::Id(id) => {
                sql.push_str(" AND p.category_id = ?");
                params.push(SqlValue::from(*id));
            }
            CategoryFilter::Other(raw) => {
                sql.push_str(" AND p.category_id = ?");
                params.push(SqlValue::from(raw.as_str()));
            }
        }

        sql.push_str(" ORDER BY p.created_at DESC, p.id DESC");

        debug!(search = ?query.search, category = %query.category, "Listing products");
        let rows = self.executor.execute(&sql, &params).await?.into_rows()?;

        let mut products = rows
            .iter()
            .map(product_from_row)
            .collect::<DbResult<Vec<_>>>()?;
        products.retain(|product| query.matches(product));
        debug!(count = products.len(), "Listed products");

        Ok(products)
    }

    /// Gets a product by its id.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let sql = format!("{SELECT_PRODUCTS} AND p.id = ?");
        let rows = self
            .executor
            .execute(&sql, &[SqlValue::from(id)])
            .await?
            .into_rows()?;

        rows.first().map(product_from_row).transpose()
    }

    /// Image path stored on a product, if the product exists and has one.
    pub async fn image_url(&self, id: i64) -> DbResult<Option<String>> {
        let rows = self
            .executor
            .execute(
                "SELECT image_url FROM products WHERE id = ?",
                &[SqlValue::from(id)],
            )
            .await?
            .into_rows()?;

        match rows.first() {
            Some(row) => Ok(row
                .get_opt_string("image_url")?
                .filter(|url| !url.is_empty())),
            None => Ok(None),
        }
    }

    /// Inserts a product and returns its generated id.
    ///
    /// Absent stock defaults to 0 and an absent minimum level to 10. No other
    /// validation happens: the store's constraints are the only gate.
    pub async fn create(&self, draft: &ProductDraft) -> DbResult<i64> {
        debug!(name = %draft.name, "Inserting product");

        let summary = self
            .executor
            .execute(
                "INSERT INTO products (name, description, category_id, purchase_price, \
                 selling_price, remaining_stock, min_stock_level, image_url) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                &draft_params(draft),
            )
            .await?
            .into_write()?;

        summary
            .insert_id
            .ok_or_else(|| DbError::QueryFailed("product insert returned no id".to_string()))
    }

    /// Overwrites every mutable field and stamps `updated_at`.
    ///
    /// ## Returns
    /// Rows changed: `0` for an unknown id, which is not an error.
    pub async fn update(&self, update: &ProductUpdate) -> DbResult<u64> {
        debug!(id = update.id, "Updating product");

        let mut params = draft_params(&update.fields);
        params.push(SqlValue::from(update.id));

        let summary = self
            .executor
            .execute(
                "UPDATE products SET name = ?, description = ?, category_id = ?, \
                 purchase_price = ?, selling_price = ?, remaining_stock = ?, \
                 min_stock_level = ?, image_url = ?, updated_at = CURRENT_TIMESTAMP \
                 WHERE id = ?",
                &params,
            )
            .await?
            .into_write()?;

        Ok(summary.changed)
    }

    /// Deletes a product row. Image files are the caller's concern.
    ///
    /// ## Returns
    /// Rows changed: `0` when nothing matched.
    pub async fn delete(&self, id: i64) -> DbResult<u64> {
        debug!(id, "Deleting product");

        let summary = self
            .executor
            .execute("DELETE FROM products WHERE id = ?", &[SqlValue::from(id)])
            .await?
            .into_write()?;

        Ok(summary.changed)
    }
}

/// Parameters for the eight writable columns, in column order.
fn draft_params(draft: &ProductDraft) -> Vec<SqlValue> {
    vec![
        SqlValue::from(draft.name.as_str()),
        SqlValue::from(draft.description.as_deref()),
        SqlValue::from(draft.category_id),
        SqlValue::from(draft.purchase_price),
        SqlValue::from(draft.selling_price),
        SqlValue::from(draft.remaining_stock_or_default()),
        SqlValue::from(draft.min_stock_level_or_default()),
        SqlValue::from(draft.image_url_or_none()),
    ]
}

fn product_from_row(row: &Row) -> DbResult<Product> {
    Ok(Product {
        id: row.get_i64("id")?,
        name: row.get_string("name")?,
        description: row.get_opt_string("description")?,
        category_id: row.get_opt_i64("category_id")?,
        purchase_price: row.get_money("purchase_price")?,
        selling_price: row.get_money("selling_price")?,
        remaining_stock: row.get_opt_i64("remaining_stock")?.unwrap_or(0),
        min_stock_level: row
            .get_opt_i64("min_stock_level")?
            .unwrap_or(stockroom_core::DEFAULT_MIN_STOCK_LEVEL),
        image_url: row.get_opt_string("image_url")?,
        created_at: row.get_timestamp("created_at")?,
        updated_at: row.get_timestamp("updated_at")?,
        category_name: row.get_opt_string("category_name")?,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::Backend;
    use crate::pool::{Database, DbConfig};
    use crate::schema::ensure_schema;
    use crate::value::QueryOutcome;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use stockroom_core::Money;

    async fn empty_db() -> Database {
        let db = Database::connect(&DbConfig::in_memory()).await.unwrap();
        ensure_schema(db.executor().as_ref()).await.unwrap();
        db
    }

    fn draft(name: &str, description: Option<&str>, category_id: Option<i64>) -> ProductDraft {
        let mut d = ProductDraft::new(name, Money::from_cents(1250), Money::from_cents(1800));
        d.description = description.map(str::to_string);
        d.category_id = category_id;
        d
    }

    #[tokio::test]
    async fn test_create_applies_defaults() {
        let db = empty_db().await;
        let id = db.products().create(&draft("Vis", None, None)).await.unwrap();

        let product = db.products().get_by_id(id).await.unwrap().unwrap();
        assert_eq!(product.remaining_stock, 0);
        assert_eq!(product.min_stock_level, 10);
        assert_eq!(product.purchase_price, Money::from_cents(1250));
        assert_eq!(product.category_name, None);
        assert_eq!(product.image_url, None);
    }

    #[tokio::test]
    async fn test_explicit_zero_min_stock_is_kept() {
        let db = empty_db().await;
        let mut d = draft("Vis", None, None);
        d.min_stock_level = Some(0);
        let id = db.products().create(&d).await.unwrap();

        let product = db.products().get_by_id(id).await.unwrap().unwrap();
        assert_eq!(product.min_stock_level, 0);
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let db = empty_db().await;
        let repo = db.products();
        let first = repo.create(&draft("Premier", None, None)).await.unwrap();
        let second = repo.create(&draft("Second", None, None)).await.unwrap();
        let third = repo.create(&draft("Troisième", None, None)).await.unwrap();

        let ids: Vec<i64> = repo
            .list(&ProductQuery::all())
            .await
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![third, second, first]);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_over_name_or_description() {
        let db = empty_db().await;
        let repo = db.products();
        repo.create(&draft("Vis à bois", Some("tête fraisée"), None)).await.unwrap();
        repo.create(&draft("Marteau", Some("Manche bois"), None)).await.unwrap();
        repo.create(&draft("Ampoule LED", None, None)).await.unwrap();

        let names = |products: Vec<Product>| -> Vec<String> {
            products.into_iter().map(|p| p.name).collect()
        };

        let hits = repo.list(&ProductQuery::new(Some("BOIS"), "all")).await.unwrap();
        assert_eq!(names(hits), vec!["Marteau", "Vis à bois"]);

        let hits = repo.list(&ProductQuery::new(Some("led"), "all")).await.unwrap();
        assert_eq!(names(hits), vec!["Ampoule LED"]);

        let hits = repo.list(&ProductQuery::new(Some("perceuse"), "all")).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() {
        let db = empty_db().await;
        let repo = db.products();
        repo.create(&draft("Remise 10%", None, None)).await.unwrap();
        repo.create(&draft("Remise 100", None, None)).await.unwrap();

        let hits = repo.list(&ProductQuery::new(Some("10%"), "all")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Remise 10%");
    }

    #[tokio::test]
    async fn test_search_folds_non_ascii_case() {
        let db = empty_db().await;
        let repo = db.products();
        repo.create(&draft("Câble électrique 2.5mm", Some("Rouleau de 100m"), None))
            .await
            .unwrap();
        repo.create(&draft("Tube PVC", Some("Ø100 gris"), None)).await.unwrap();
        repo.create(&draft("Electrovanne", None, None)).await.unwrap();

        let hits = repo.list(&ProductQuery::new(Some("ÉLECTRIQUE"), "all")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Câble électrique 2.5mm");

        let hits = repo.list(&ProductQuery::new(Some("ø100"), "all")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Tube PVC");
    }

    #[tokio::test]
    async fn test_category_filter_and_join() {
        let db = empty_db().await;
        let outillage = db.categories().create("Outillage", None).await.unwrap();
        let repo = db.products();
        repo.create(&draft("Marteau", None, Some(outillage))).await.unwrap();
        repo.create(&draft("Orphelin", None, None)).await.unwrap();

        let hits = repo
            .list(&ProductQuery::all().with_category(CategoryFilter::Id(outillage)))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].category_name.as_deref(), Some("Outillage"));

        let all = repo.list(&ProductQuery::new(None, "all")).await.unwrap();
        assert_eq!(all.len(), 2);

        let none = repo.list(&ProductQuery::new(None, "outils")).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_deleting_category_nulls_reference() {
        let db = empty_db().await;
        let cat = db.categories().create("Peinture", None).await.unwrap();
        let id = db.products().create(&draft("Rouleau", None, Some(cat))).await.unwrap();

        db.executor()
            .execute("DELETE FROM categories WHERE id = ?", &[SqlValue::from(cat)])
            .await
            .unwrap();

        let product = db.products().get_by_id(id).await.unwrap().unwrap();
        assert_eq!(product.category_id, None);
        assert_eq!(product.category_name, None);
    }

    #[tokio::test]
    async fn test_update_overwrites_fields() {
        let db = empty_db().await;
        let repo = db.products();
        let id = repo.create(&draft("Vis", None, None)).await.unwrap();

        let mut fields = draft("Vis 4x40", Some("boîte de 100"), None);
        fields.remaining_stock = Some(150);
        fields.image_url = Some("/uploads/a.png".to_string());
        let changed = repo.update(&ProductUpdate::new(id, fields)).await.unwrap();
        assert_eq!(changed, 1);

        let product = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(product.name, "Vis 4x40");
        assert_eq!(product.remaining_stock, 150);
        assert_eq!(repo.image_url(id).await.unwrap().as_deref(), Some("/uploads/a.png"));
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_id_are_noops() {
        let db = empty_db().await;
        let repo = db.products();
        assert_eq!(repo.update(&ProductUpdate::new(999, draft("x", None, None))).await.unwrap(), 0);
        assert_eq!(repo.delete(999).await.unwrap(), 0);
        assert_eq!(repo.image_url(999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_removes_row() {
        let db = empty_db().await;
        let repo = db.products();
        let id = repo.create(&draft("Vis", None, None)).await.unwrap();
        assert_eq!(repo.delete(id).await.unwrap(), 1);
        assert!(repo.get_by_id(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_name_surfaces_store_error() {
        let db = empty_db().await;
        let err = db
            .executor()
            .execute(
                "INSERT INTO products (name, purchase_price, selling_price) VALUES (?, ?, ?)",
                &[SqlValue::Null, SqlValue::Real(1.0), SqlValue::Real(2.0)],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::QueryFailed(msg) if msg.contains("NOT NULL")));
    }

    // -------------------------------------------------------------------------
    // Statement shape, checked against a recording executor
    // -------------------------------------------------------------------------

    #[derive(Debug, Default)]
    struct RecordingExecutor {
        calls: Mutex<Vec<(String, Vec<SqlValue>)>>,
    }

    #[async_trait]
    impl QueryExecutor for RecordingExecutor {
        fn backend(&self) -> Backend {
            Backend::MySql
        }

        async fn execute(&self, sql: &str, params: &[SqlValue]) -> DbResult<QueryOutcome> {
            self.calls.lock().unwrap().push((sql.to_string(), params.to_vec()));
            Ok(QueryOutcome::Rows(Vec::new()))
        }

        async fn ping(&self) -> DbResult<()> {
            Ok(())
        }

        async fn close(&self) {}
    }

    #[tokio::test]
    async fn test_list_binds_filters_in_order() {
        let exec = Arc::new(RecordingExecutor::default());
        let repo = ProductRepository::new(exec.clone());

        repo.list(&ProductQuery::new(Some("a_b"), "outils")).await.unwrap();

        let calls = exec.calls.lock().unwrap();
        let (sql, params) = &calls[0];
        assert!(!sql.contains("LIKE"));
        assert!(sql.ends_with("ORDER BY p.created_at DESC, p.id DESC"));
        assert_eq!(params, &vec![SqlValue::from("outils")]);
    }
}
