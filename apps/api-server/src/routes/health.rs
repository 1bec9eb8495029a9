//! Health check route.

use axum::extract::State;
use axum::Json;
use stockroom_core::HealthEnvelope;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/health`: pings the store and names the engine in use.
pub async fn check(State(state): State<AppState>) -> Result<Json<HealthEnvelope>, ApiError> {
    state.db.ping().await?;
    Ok(Json(HealthEnvelope::ok(state.db.backend().as_str())))
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::TestApp;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_health_reports_backend() {
        let app = TestApp::new().await;
        let (status, body) = app.get("/api/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["database"], "SQLite");
        assert_eq!(body["message"], "SQLite database connected successfully");
    }

    #[tokio::test]
    async fn test_health_fails_when_store_is_gone() {
        let app = TestApp::new().await;
        app.state.db.close().await;

        let (status, body) = app.get("/api/health").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
    }
}
