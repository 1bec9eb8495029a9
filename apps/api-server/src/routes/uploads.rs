//! # Image Upload Routes
//!
//! ```text
//! POST /api/upload (multipart, field "image")
//!   ├── not multipart/form-data ─────► 400
//!   ├── no "image" part ─────────────► 400
//!   ├── Content-Type not image/* ────► 400   (nothing written)
//!   ├── more than MAX_FILE_SIZE ─────► 413   (nothing written)
//!   └── stored as <uuid><ext> ───────► {success, imageUrl:"/uploads/<name>"}
//!
//! DELETE /api/upload {"imageUrl": "/uploads/<name>"}
//!   ├── file removed or already gone ► {success:true}
//!   ├── no imageUrl ─────────────────► {success:true}   (nothing to do)
//!   └── other filesystem error ──────► 500
//! ```

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use stockroom_core::validation::{
    validate_image_content_type, validate_upload_size, IMAGE_FIELD,
};
use stockroom_core::{AckEnvelope, UploadEnvelope, ValidationError};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::routes::{ApiJson, ApiMultipart};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DeleteImageRequest {
    #[serde(rename = "imageUrl", default)]
    pub image_url: Option<String>,
}

/// `POST /api/upload`
pub async fn upload(
    State(state): State<AppState>,
    ApiMultipart(mut multipart): ApiMultipart,
) -> Result<Json<UploadEnvelope>, ApiError> {
    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            debug!(field = ?field.name(), "Skipping multipart field");
            continue;
        }

        validate_image_content_type(field.content_type())?;
        let file_name = field.file_name().unwrap_or_default().to_string();

        // Stop reading as soon as the cap is crossed
        let mut bytes = Vec::new();
        while let Some(chunk) = field.chunk().await? {
            bytes.extend_from_slice(&chunk);
            validate_upload_size(bytes.len(), state.uploads.max_bytes())?;
        }

        let image_url = state.uploads.save(&file_name, &bytes).await?;
        info!(image_url = %image_url, bytes = bytes.len(), "Image uploaded");
        return Ok(Json(UploadEnvelope::ok(image_url)));
    }

    Err(ValidationError::Required {
        field: IMAGE_FIELD.to_string(),
    }
    .into())
}

/// `DELETE /api/upload`
pub async fn delete(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<DeleteImageRequest>,
) -> Result<Json<AckEnvelope>, ApiError> {
    let Some(image_url) = request.image_url else {
        debug!("Image delete requested without imageUrl");
        return Ok(Json(AckEnvelope::ok()));
    };

    let removed = state.uploads.delete(&image_url).await?;
    debug!(image_url = %image_url, removed, "Image delete requested");
    Ok(Json(AckEnvelope::ok()))
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::TestApp;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_upload_stores_image_with_unique_name() {
        let app = TestApp::new().await;

        let (status, first) = app.upload("photo.png", "image/png", b"one").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["success"], true);
        let first_url = first["imageUrl"].as_str().unwrap().to_string();
        assert!(first_url.starts_with("/uploads/"));
        assert!(first_url.ends_with(".png"));

        let (_, second) = app.upload("photo.png", "image/png", b"two").await;
        assert_ne!(second["imageUrl"].as_str().unwrap(), first_url);
        assert_eq!(app.uploaded_files(), 2);
    }

    #[tokio::test]
    async fn test_non_image_is_rejected_without_writing() {
        let app = TestApp::new().await;

        let (status, body) = app.upload("notes.txt", "text/plain", b"hello").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(app.uploaded_files(), 0);
    }

    #[tokio::test]
    async fn test_missing_image_part_is_400() {
        let app = TestApp::new().await;
        let request = axum::http::Request::post("/api/upload")
            .header(
                axum::http::header::CONTENT_TYPE,
                format!(
                    "multipart/form-data; boundary={}",
                    crate::routes::test_support::BOUNDARY
                ),
            )
            .body(axum::body::Body::from(
                crate::routes::test_support::multipart_body("photo", "a.png", "image/png", b"x"),
            ))
            .unwrap();

        let (status, body) = app.send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "image is required");
        assert_eq!(app.uploaded_files(), 0);
    }

    #[tokio::test]
    async fn test_oversized_upload_is_413() {
        let app = TestApp::with_upload_cap(8).await;

        let (status, body) = app.upload("big.png", "image/png", &[0u8; 16]).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["success"], false);
        assert_eq!(app.uploaded_files(), 0);
    }

    #[tokio::test]
    async fn test_delete_image() {
        let app = TestApp::new().await;
        let (_, uploaded) = app.upload("photo.webp", "image/webp", b"webp").await;
        let url = uploaded["imageUrl"].as_str().unwrap().to_string();

        let (status, body) = app.json("DELETE", "/api/upload", json!({"imageUrl": url})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(app.uploaded_files(), 0);

        // Already gone
        let (status, body) = app.json("DELETE", "/api/upload", json!({"imageUrl": url})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

    }

    #[tokio::test]
    async fn test_delete_without_image_url_is_a_noop() {
        let app = TestApp::new().await;
        app.upload("photo.png", "image/png", b"keep").await;

        let (status, body) = app.json("DELETE", "/api/upload", json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (status, body) = app
            .json("DELETE", "/api/upload", json!({"imageUrl": null}))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(app.uploaded_files(), 1);
    }

    #[tokio::test]
    async fn test_non_multipart_upload_is_400_envelope() {
        let app = TestApp::new().await;

        let (status, body) = app
            .json("POST", "/api/upload", json!({"image": "photo.png"}))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["error"].is_string());
        assert_eq!(app.uploaded_files(), 0);
    }
}
