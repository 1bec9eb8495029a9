//! Category routes. Categories are read-only over HTTP.

use axum::extract::State;
use axum::Json;
use stockroom_core::CategoriesEnvelope;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/categories`, ordered by name.
pub async fn list(State(state): State<AppState>) -> Result<Json<CategoriesEnvelope>, ApiError> {
    let categories = state.db.categories().list().await?;
    debug!(count = categories.len(), "Listed categories");
    Ok(Json(CategoriesEnvelope::ok(categories)))
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::TestApp;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_list_categories_by_name() {
        let app = TestApp::new().await;
        let (status, body) = app.get("/api/categories").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        let names: Vec<&str> = body["categories"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|c| c["name"].as_str())
            .collect();
        assert_eq!(names.len(), 6);
        assert_eq!(names[0], "Droguerie");
        assert_eq!(names[1], "Outillage");
    }

    #[tokio::test]
    async fn test_store_failure_is_500_envelope() {
        let app = TestApp::new().await;
        app.state.db.close().await;

        let (status, body) = app.get("/api/categories").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().is_some());
    }
}
