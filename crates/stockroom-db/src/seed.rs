//! # First-Start Seeding
//!
//! Loads the demonstration catalogue into an empty store.
//!
//! ```text
//! categories empty? ──no──► skip (store is left untouched)
//!        │
//!       yes
//!        ▼
//! insert 6 categories, remembering each generated id by position
//!        ▼
//! insert 18 products, category position → generated id
//! ```
//!
//! Statements run one by one without a transaction. A failure midway
//! leaves a partial catalogue, and the next start skips seeding because
//! categories already exist.

use stockroom_core::seed::{SEED_CATEGORIES, SEED_PRODUCTS};
use tracing::{debug, info};

use crate::error::DbResult;
use crate::pool::Database;

/// What seeding did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedReport {
    pub categories: usize,
    pub products: usize,
}

impl SeedReport {
    pub fn skipped(&self) -> bool {
        self.categories == 0 && self.products == 0
    }
}

/// Seeds the store when the category table is empty.
pub async fn seed_if_empty(db: &Database) -> DbResult<SeedReport> {
    let existing = db.categories().count().await?;
    if existing > 0 {
        debug!(existing, "Categories present, skipping seed");
        return Ok(SeedReport::default());
    }

    let categories = db.categories();
    let mut category_ids = Vec::with_capacity(SEED_CATEGORIES.len());
    for category in SEED_CATEGORIES {
        let id = categories
            .create(category.name, Some(category.description))
            .await?;
        category_ids.push(id);
    }

    let products = db.products();
    for product in SEED_PRODUCTS {
        let category_id = category_ids.get(product.category).copied();
        products.create(&product.to_draft(category_id)).await?;
    }

    let report = SeedReport {
        categories: category_ids.len(),
        products: SEED_PRODUCTS.len(),
    };
    info!(
        categories = report.categories,
        products = report.products,
        "Sample data inserted"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;
    use stockroom_core::ProductQuery;

    #[tokio::test]
    async fn test_seeds_empty_store_once() {
        let db = Database::connect(&DbConfig::in_memory()).await.unwrap();

        let first = db.bootstrap().await.unwrap();
        assert_eq!(first, SeedReport { categories: 6, products: 18 });

        let second = db.bootstrap().await.unwrap();
        assert!(second.skipped());
        assert_eq!(db.categories().count().await.unwrap(), 6);
        assert_eq!(db.products().list(&ProductQuery::all()).await.unwrap().len(), 18);
    }

    #[tokio::test]
    async fn test_products_reference_categories_by_position() {
        let db = Database::connect(&DbConfig::in_memory()).await.unwrap();
        db.bootstrap().await.unwrap();

        let products = db.products().list(&ProductQuery::all()).await.unwrap();
        let perceuse = products
            .iter()
            .find(|p| p.name == "Perceuse visseuse 18V")
            .unwrap();
        assert_eq!(perceuse.category_name.as_deref(), Some("Outillage"));

        let cable = products
            .iter()
            .find(|p| p.name.starts_with("Câble électrique"))
            .unwrap();
        assert_eq!(cable.category_name.as_deref(), Some("Électricité"));
    }
}
