//! # HTTP Routes
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET    /api/categories          categories::list                       │
//! │  GET    /api/products            products::list    ?search=&category=   │
//! │  POST   /api/products            products::create  JSON ProductDraft    │
//! │  PUT    /api/products            products::update  JSON ProductUpdate   │
//! │  DELETE /api/products            products::delete  ?id=                 │
//! │  POST   /api/upload              uploads::upload   multipart "image"    │
//! │  DELETE /api/upload              uploads::delete   JSON {imageUrl}      │
//! │  GET    /api/health              health::check                          │
//! │  GET    /uploads/<name>          static files from the upload dir       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every `/api` answer is a JSON envelope, failures included.

pub mod categories;
pub mod health;
pub mod products;
pub mod uploads;

use axum::extract::{DefaultBodyLimit, FromRequest, Multipart, Request};
use axum::routing::{get, post};
use axum::Router;
use stockroom_core::{API_PREFIX, UPLOADS_PUBLIC_PATH};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::state::AppState;

/// Room for multipart boundaries and headers around the image itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// `axum::Json` with failures rendered as an envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Multipart` with failures rendered as an envelope.
///
/// A request that is not `multipart/form-data` at all would otherwise get
/// axum's plain-text rejection.
pub struct ApiMultipart(pub Multipart);

impl<S> FromRequest<S> for ApiMultipart
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state).await?;
        Ok(ApiMultipart(multipart))
    }
}

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    let upload_limit = state.uploads.max_bytes().saturating_add(MULTIPART_OVERHEAD);

    let api = Router::new()
        .route("/categories", get(categories::list))
        .route(
            "/products",
            get(products::list)
                .post(products::create)
                .put(products::update)
                .delete(products::delete),
        )
        .route(
            "/upload",
            post(uploads::upload)
                .delete(uploads::delete)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/health", get(health::check));

    Router::new()
        .nest(API_PREFIX, api)
        .nest_service(UPLOADS_PUBLIC_PATH, ServeDir::new(state.uploads.dir()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// Test Support
// =============================================================================

#[cfg(test)]
pub(crate) mod test_support {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use serde_json::Value;
    use stockroom_db::{Database, DbConfig};
    use tower::ServiceExt;

    use crate::state::AppState;
    use crate::uploads::UploadStore;

    pub const BOUNDARY: &str = "stockroom-test-boundary";

    /// Seeded in-memory store plus a temporary upload directory.
    pub struct TestApp {
        pub router: Router,
        pub state: AppState,
        pub dir: tempfile::TempDir,
    }

    impl TestApp {
        pub async fn new() -> Self {
            Self::with_upload_cap(stockroom_core::DEFAULT_MAX_UPLOAD_BYTES).await
        }

        pub async fn with_upload_cap(max_bytes: usize) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let db = Database::connect(&DbConfig::in_memory()).await.unwrap();
            db.bootstrap().await.unwrap();
            let uploads = UploadStore::new(dir.path().join("uploads"), max_bytes);
            uploads.ensure_dir().await.unwrap();

            let state = AppState::new(db, uploads);
            TestApp {
                router: super::router(state.clone()),
                state,
                dir,
            }
        }

        pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let body = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap_or(Value::Null)
            };
            (status, body)
        }

        pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
            self.send(Request::get(uri).body(Body::empty()).unwrap()).await
        }

        pub async fn json(&self, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
            let request = Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap();
            self.send(request).await
        }

        pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
            self.send(Request::delete(uri).body(Body::empty()).unwrap()).await
        }

        pub async fn upload(&self, file_name: &str, content_type: &str, bytes: &[u8]) -> (StatusCode, Value) {
            let request = Request::post("/api/upload")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(multipart_body("image", file_name, content_type, bytes)))
                .unwrap();
            self.send(request).await
        }

        pub fn uploaded_files(&self) -> usize {
            std::fs::read_dir(self.state.uploads.dir()).unwrap().count()
        }
    }

    pub fn multipart_body(field: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
        let mut body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }
}
