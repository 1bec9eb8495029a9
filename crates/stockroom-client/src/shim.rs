//! # Inventory Client
//!
//! Routes each call to the network or the offline mirror.
//!
//! ## When The Mirror Answers
//! - the connectivity flags say offline: the network is never attempted
//! - the network attempt returned `Err`: logged, then exactly one mirror call
//!
//! A `success: false` envelope from the server is an answer, not a failure,
//! and is returned as-is.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use stockroom_core::{
    AckEnvelope, CategoriesEnvelope, CreatedEnvelope, Envelope, InventorySummary, ProductDraft,
    ProductQuery, ProductUpdate, ProductsEnvelope, UploadEnvelope,
};
use tracing::{debug, warn};

use crate::api::{ImageUpload, InventoryApi};
use crate::connectivity::Connectivity;
use crate::error::{ClientError, ClientResult};

/// The API surface the UI talks to.
#[derive(Debug)]
pub struct InventoryClient<N, M> {
    network: N,
    mirror: M,
    connectivity: Arc<Connectivity>,
}

impl<N: InventoryApi, M: InventoryApi> InventoryClient<N, M> {
    pub fn new(network: N, mirror: M, connectivity: Connectivity) -> Self {
        Self::with_shared_connectivity(network, mirror, Arc::new(connectivity))
    }

    /// Shares the flags with a reachability watcher.
    pub fn with_shared_connectivity(network: N, mirror: M, connectivity: Arc<Connectivity>) -> Self {
        InventoryClient {
            network,
            mirror,
            connectivity,
        }
    }

    pub fn is_offline_mode(&self) -> bool {
        self.connectivity.is_offline()
    }

    pub fn connectivity(&self) -> &Arc<Connectivity> {
        &self.connectivity
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    pub fn mirror(&self) -> &M {
        &self.mirror
    }

    /// Dashboard figures over the products matching `query`.
    pub async fn inventory_summary(&self, query: &ProductQuery) -> ClientResult<InventorySummary> {
        let listing = self.get_products(query).await?;
        if !listing.success() {
            return Err(ClientError::Rejected(
                listing.error().unwrap_or("products unavailable").to_string(),
            ));
        }
        Ok(InventorySummary::from_products(&listing.products))
    }

    async fn route<'a, T, NF, MF>(
        &'a self,
        operation: &'static str,
        via_network: impl FnOnce(&'a N) -> NF,
        via_mirror: impl FnOnce(&'a M) -> MF,
    ) -> ClientResult<T>
    where
        T: Envelope,
        NF: Future<Output = ClientResult<T>>,
        MF: Future<Output = ClientResult<T>>,
    {
        if self.connectivity.is_offline() {
            debug!(operation, "Offline mode, using local mirror");
            return via_mirror(&self.mirror).await;
        }

        match via_network(&self.network).await {
            Ok(answer) => {
                // A rejection is an answer, not a transport failure
                if !answer.success() {
                    debug!(operation, error = ?answer.error(), "Server rejected request");
                }
                Ok(answer)
            }
            Err(e) => {
                warn!(operation, error = %e, "Network request failed, falling back to offline mirror");
                via_mirror(&self.mirror).await
            }
        }
    }
}

#[async_trait]
impl<N: InventoryApi, M: InventoryApi> InventoryApi for InventoryClient<N, M> {
    async fn get_categories(&self) -> ClientResult<CategoriesEnvelope> {
        self.route("get_categories", |n| n.get_categories(), |m| m.get_categories())
            .await
    }

    async fn get_products(&self, query: &ProductQuery) -> ClientResult<ProductsEnvelope> {
        self.route(
            "get_products",
            |n| n.get_products(query),
            |m| m.get_products(query),
        )
        .await
    }

    async fn create_product(&self, draft: &ProductDraft) -> ClientResult<CreatedEnvelope> {
        self.route(
            "create_product",
            |n| n.create_product(draft),
            |m| m.create_product(draft),
        )
        .await
    }

    async fn update_product(&self, update: &ProductUpdate) -> ClientResult<AckEnvelope> {
        self.route(
            "update_product",
            |n| n.update_product(update),
            |m| m.update_product(update),
        )
        .await
    }

    async fn delete_product(&self, id: i64) -> ClientResult<AckEnvelope> {
        self.route(
            "delete_product",
            |n| n.delete_product(id),
            |m| m.delete_product(id),
        )
        .await
    }

    async fn upload_image(&self, upload: &ImageUpload) -> ClientResult<UploadEnvelope> {
        self.route(
            "upload_image",
            |n| n.upload_image(upload),
            |m| m.upload_image(upload),
        )
        .await
    }

    async fn delete_image(&self, image_url: &str) -> ClientResult<AckEnvelope> {
        self.route(
            "delete_image",
            |n| n.delete_image(image_url),
            |m| m.delete_image(image_url),
        )
        .await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
