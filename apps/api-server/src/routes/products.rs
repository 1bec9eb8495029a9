//! # Product Routes
//!
//! ## Delete Flow
//! ```text
//! DELETE /api/products?id=12
//!   │
//!   ├── id not an integer ──────────────────────► {success:true}  (matches nothing)
//!   ├── look up image_url
//!   │     └── Some(url) → remove file ── error ──► warn!, carry on
//!   ├── DELETE FROM products WHERE id = 12
//!   └─────────────────────────────────────────────► {success:true}
//! ```

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use stockroom_core::validation::parse_product_id;
use stockroom_core::{
    AckEnvelope, CreatedEnvelope, ProductDraft, ProductQuery, ProductUpdate, ProductsEnvelope,
    CATEGORY_FILTER_ALL,
};
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::routes::ApiJson;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteParams {
    pub id: Option<String>,
}

/// `GET /api/products`: filters AND-combined, newest first.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ProductsEnvelope>, ApiError> {
    let query = ProductQuery::new(
        params.search.as_deref(),
        params.category.as_deref().unwrap_or(CATEGORY_FILTER_ALL),
    );
    let products = state.db.products().list(&query).await?;
    debug!(
        search = ?query.search,
        category = %query.category,
        count = products.len(),
        "Listed products"
    );
    Ok(Json(ProductsEnvelope::ok(products)))
}

/// `POST /api/products`
pub async fn create(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<ProductDraft>,
) -> Result<Json<CreatedEnvelope>, ApiError> {
    let id = state.db.products().create(&draft).await?;
    info!(id, name = %draft.name, "Product created");
    Ok(Json(CreatedEnvelope::ok(id)))
}

/// `PUT /api/products`: an unknown id changes nothing and still succeeds.
pub async fn update(
    State(state): State<AppState>,
    ApiJson(update): ApiJson<ProductUpdate>,
) -> Result<Json<AckEnvelope>, ApiError> {
    let changed = state.db.products().update(&update).await?;
    info!(id = update.id, changed, "Product updated");
    Ok(Json(AckEnvelope::ok()))
}

/// `DELETE /api/products?id=`
pub async fn delete(
    State(state): State<AppState>,
    Query(params): Query<DeleteParams>,
) -> Result<Json<AckEnvelope>, ApiError> {
    let Some(id) = params.id.as_deref().and_then(parse_product_id) else {
        debug!(id = ?params.id, "Delete without a usable id");
        return Ok(Json(AckEnvelope::ok()));
    };

    let products = state.db.products();
    if let Some(url) = products.image_url(id).await? {
        if let Err(e) = state.uploads.delete(&url).await {
            warn!(id, image_url = %url, error = %e, "Could not delete product image");
        }
    }

    let changed = products.delete(id).await?;
    info!(id, changed, "Product deleted");
    Ok(Json(AckEnvelope::ok()))
}

// =============================================================================
// Unit Tests
// =============================================================================
