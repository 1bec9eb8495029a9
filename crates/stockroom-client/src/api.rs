//! # Inventory API Surface
//!
//! The seven operations the UI calls, each returning the same envelope
//! type whichever strategy serves it.

use async_trait::async_trait;
use stockroom_core::{
    AckEnvelope, CategoriesEnvelope, CreatedEnvelope, ProductDraft, ProductQuery, ProductUpdate,
    ProductsEnvelope, UploadEnvelope,
};

use crate::error::ClientResult;

/// An image picked by the user, ready to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Original file name; only its extension is kept.
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        ImageUpload {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }
}

/// Inventory operations, implemented by every strategy.
///
/// `Err` means the strategy could not produce an answer at all. An answer
/// of `success: false` is still `Ok`.
#[async_trait]
pub trait InventoryApi: Send + Sync {
    async fn get_categories(&self) -> ClientResult<CategoriesEnvelope>;

    async fn get_products(&self, query: &ProductQuery) -> ClientResult<ProductsEnvelope>;

    async fn create_product(&self, draft: &ProductDraft) -> ClientResult<CreatedEnvelope>;

    async fn update_product(&self, update: &ProductUpdate) -> ClientResult<AckEnvelope>;

    async fn delete_product(&self, id: i64) -> ClientResult<AckEnvelope>;

    async fn upload_image(&self, upload: &ImageUpload) -> ClientResult<UploadEnvelope>;

    async fn delete_image(&self, image_url: &str) -> ClientResult<AckEnvelope>;
}
