//! # Offline Mirror
//!
//! A local, persisted copy of the inventory that answers every API call
//! when the server can't.
//!
//! ## On Disk
//! ```text
//! <root>/
//! ├── inventory.json     ← snapshot: categories, products, id counters
//! └── images/
//!     └── <uuid>.png     ← uploads made while offline
//! ```
//!
//! ## Semantics
//! Same filters and ordering as the server listing (shared through
//! `ProductQuery::matches` and `order_newest_first`), same defaults on
//! create, same no-op on unknown ids. The mirror is seeded from the same
//! demonstration catalogue and is never reconciled with the server.
//!
//! Every mutation holds the state lock until the snapshot is written, so
//! concurrent writers cannot interleave.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use stockroom_core::seed::{SEED_CATEGORIES, SEED_PRODUCTS};
use stockroom_core::validation::{
    image_extension, image_file_name, validate_image_content_type, validate_upload_size,
};
use stockroom_core::{
    now_timestamp, order_newest_first, AckEnvelope, CategoriesEnvelope, Category,
    CreatedEnvelope, Product, ProductDraft, ProductQuery, ProductUpdate, ProductsEnvelope,
    UploadEnvelope, DEFAULT_MAX_UPLOAD_BYTES, UPLOADS_PUBLIC_PATH,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::api::{ImageUpload, InventoryApi};
use crate::error::ClientResult;

const SNAPSHOT_FILE: &str = "inventory.json";
const IMAGES_DIR: &str = "images";

// =============================================================================
// Snapshot
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct MirrorSnapshot {
    categories: Vec<Category>,
    products: Vec<Product>,
    #[serde(default)]
    next_category_id: i64,
    #[serde(default)]
    next_product_id: i64,
}

impl MirrorSnapshot {
    /// The demonstration catalogue, ids assigned from 1.
    fn seeded() -> Self {
        let now = now_timestamp();
        let categories: Vec<Category> = SEED_CATEGORIES
            .iter()
            .zip(1..)
            .map(|(seed, id)| Category {
                id,
                name: seed.name.to_string(),
                description: Some(seed.description.to_string()),
                created_at: now,
            })
            .collect();

        let products = SEED_PRODUCTS
            .iter()
            .zip(1..)
            .map(|(seed, id)| {
                let category_id = categories.get(seed.category).map(|c| c.id);
                product_from_draft(id, &seed.to_draft(category_id), now)
            })
            .collect();

        let mut snapshot = MirrorSnapshot {
            categories,
            products,
            next_category_id: 0,
            next_product_id: 0,
        };
        snapshot.normalize();
        snapshot
    }

    /// Repairs counters and joined names, e.g. after an import.
    fn normalize(&mut self) {
        let max_category = self.categories.iter().map(|c| c.id).max().unwrap_or(0);
        let max_product = self.products.iter().map(|p| p.id).max().unwrap_or(0);
        self.next_category_id = self.next_category_id.max(max_category + 1);
        self.next_product_id = self.next_product_id.max(max_product + 1);

        for i in 0..self.products.len() {
            let name = self.category_name(self.products[i].category_id);
            self.products[i].category_name = name;
        }
    }

    fn category_name(&self, category_id: Option<i64>) -> Option<String> {
        let id = category_id?;
        self.categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.clone())
    }
}

fn product_from_draft(id: i64, draft: &ProductDraft, now: NaiveDateTime) -> Product {
    Product {
        id,
        name: draft.name.clone(),
        description: draft.description.clone(),
        category_id: draft.category_id,
        purchase_price: draft.purchase_price,
        selling_price: draft.selling_price,
        remaining_stock: draft.remaining_stock_or_default(),
        min_stock_level: draft.min_stock_level_or_default(),
        image_url: draft.image_url_or_none().map(str::to_string),
        created_at: now,
        updated_at: now,
        category_name: None,
    }
}

// =============================================================================
// Offline Mirror
// =============================================================================

/// [`InventoryApi`] over a local JSON snapshot.
#[derive(Debug)]
pub struct OfflineMirror {
    root: PathBuf,
    state: Mutex<MirrorSnapshot>,
    max_upload_bytes: usize,
}

impl OfflineMirror {
    /// Opens the mirror at `root`, seeding it on first use.
    pub async fn open(root: impl Into<PathBuf>) -> ClientResult<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(root.join(IMAGES_DIR)).await?;

        let snapshot_path = root.join(SNAPSHOT_FILE);
        let snapshot = match tokio::fs::read_to_string(&snapshot_path).await {
            Ok(raw) => {
                let mut snapshot: MirrorSnapshot = serde_json::from_str(&raw)?;
                snapshot.normalize();
                debug!(path = %snapshot_path.display(), "Loaded offline snapshot");
                snapshot
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %snapshot_path.display(), "Seeding offline mirror");
                let snapshot = MirrorSnapshot::seeded();
                write_snapshot(&root, &snapshot).await?;
                snapshot
            }
            Err(e) => return Err(e.into()),
        };

        Ok(OfflineMirror {
            root,
            state: Mutex::new(snapshot),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        })
    }

    /// Sets the upload size cap.
    pub fn with_max_upload_bytes(mut self, max: usize) -> Self {
        self.max_upload_bytes = max;
        self
    }

    pub fn images_dir(&self) -> PathBuf {
        self.root.join(IMAGES_DIR)
    }

    /// The whole mirror as a JSON document.
    pub async fn export_data(&self) -> ClientResult<String> {
        let state = self.state.lock().await;
        Ok(serde_json::to_string_pretty(&*state)?)
    }

    /// Replaces the mirror with a previously exported document.
    ///
    /// The current state is kept if the document doesn't parse.
    pub async fn import_data(&self, json: &str) -> ClientResult<()> {
        let mut imported: MirrorSnapshot = serde_json::from_str(json)?;
        imported.normalize();

        let mut state = self.state.lock().await;
        write_snapshot(&self.root, &imported).await?;
        info!(
            categories = imported.categories.len(),
            products = imported.products.len(),
            "Imported offline data"
        );
        *state = imported;
        Ok(())
    }

    /// Back to the demonstration catalogue. Stored images are left alone.
    pub async fn reset_data(&self) -> ClientResult<()> {
        let mut state = self.state.lock().await;
        let seeded = MirrorSnapshot::seeded();
        write_snapshot(&self.root, &seeded).await?;
        *state = seeded;
        info!("Offline data reset");
        Ok(())
    }

    async fn remove_image(&self, image_url: &str) -> std::io::Result<()> {
        let Some(name) = image_file_name(image_url) else {
            return Ok(());
        };
        match tokio::fs::remove_file(self.images_dir().join(name)).await {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// Writes through a temporary file so a crash never leaves half a snapshot.
async fn write_snapshot(root: &Path, snapshot: &MirrorSnapshot) -> ClientResult<()> {
    let json = serde_json::to_vec_pretty(snapshot)?;
    let tmp = root.join(format!("{SNAPSHOT_FILE}.tmp"));
    tokio::fs::write(&tmp, json).await?;
    tokio::fs::rename(&tmp, root.join(SNAPSHOT_FILE)).await?;
    Ok(())
}

#[async_trait]
impl InventoryApi for OfflineMirror {
    async fn get_categories(&self) -> ClientResult<CategoriesEnvelope> {
        let state = self.state.lock().await;
        let mut categories = state.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(CategoriesEnvelope::ok(categories))
    }

    async fn get_products(&self, query: &ProductQuery) -> ClientResult<ProductsEnvelope> {
        let state = self.state.lock().await;
        let mut products: Vec<Product> = state
            .products
            .iter()
            .filter(|p| query.matches(p))
            .cloned()
            .collect();
        order_newest_first(&mut products);
        Ok(ProductsEnvelope::ok(products))
    }

    async fn create_product(&self, draft: &ProductDraft) -> ClientResult<CreatedEnvelope> {
        let mut state = self.state.lock().await;
        let id = state.next_product_id;

        let mut product = product_from_draft(id, draft, now_timestamp());
        product.category_name = state.category_name(product.category_id);

        let mut next = state.clone();
        next.products.push(product);
        next.next_product_id = id + 1;
        write_snapshot(&self.root, &next).await?;
        *state = next;

        debug!(id, "Created product offline");
        Ok(CreatedEnvelope::ok(id))
    }

    async fn update_product(&self, update: &ProductUpdate) -> ClientResult<AckEnvelope> {
        let mut state = self.state.lock().await;
        let Some(index) = state.products.iter().position(|p| p.id == update.id) else {
            return Ok(AckEnvelope::ok());
        };

        let mut next = state.clone();
        let existing = &next.products[index];
        let mut product = product_from_draft(update.id, &update.fields, now_timestamp());
        product.created_at = existing.created_at;
        product.category_name = next.category_name(product.category_id);
        next.products[index] = product;

        write_snapshot(&self.root, &next).await?;
        *state = next;
        Ok(AckEnvelope::ok())
    }

    async fn delete_product(&self, id: i64) -> ClientResult<AckEnvelope> {
        let mut state = self.state.lock().await;
        let Some(index) = state.products.iter().position(|p| p.id == id) else {
            return Ok(AckEnvelope::ok());
        };

        let mut next = state.clone();
        let removed = next.products.remove(index);
        if let Some(url) = removed.image_url.as_deref() {
            if let Err(e) = self.remove_image(url).await {
                warn!(id, image_url = %url, error = %e, "Could not delete product image");
            }
        }

        write_snapshot(&self.root, &next).await?;
        *state = next;
        Ok(AckEnvelope::ok())
    }

    async fn upload_image(&self, upload: &ImageUpload) -> ClientResult<UploadEnvelope> {
        if let Err(e) = validate_image_content_type(Some(upload.content_type.as_str()))
            .and_then(|()| validate_upload_size(upload.bytes.len(), self.max_upload_bytes))
        {
            return Ok(UploadEnvelope::failed(e.to_string()));
        }

        let name = format!("{}{}", Uuid::new_v4(), image_extension(&upload.file_name));
        tokio::fs::write(self.images_dir().join(&name), &upload.bytes).await?;

        debug!(file = %name, bytes = upload.bytes.len(), "Stored image offline");
        Ok(UploadEnvelope::ok(format!("{UPLOADS_PUBLIC_PATH}/{name}")))
    }

    async fn delete_image(&self, image_url: &str) -> ClientResult<AckEnvelope> {
        match self.remove_image(image_url).await {
            Ok(()) => Ok(AckEnvelope::ok()),
            Err(e) => Ok(AckEnvelope::failed(e.to_string())),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
