//! # API Error Type
//!
//! Unified error type for route handlers.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Handler: Result<Json<Envelope>, ApiError>                              │
//! │                                                                         │
//! │  DbError ─────────────► DATABASE_ERROR   500                            │
//! │  ValidationError ─────► BAD_REQUEST      400  (TooLarge → 413)          │
//! │  UploadError ─────────► STORAGE_ERROR    500                            │
//! │  JSON / multipart ────► BAD_REQUEST      400  (body limit → 413)        │
//! │                                                                         │
//! │  Body, whatever the code:                                               │
//! │    { "success": false, "error": "<message>" }                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Store messages are passed through verbatim; the UI shows them as-is.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use stockroom_core::{AckEnvelope, ValidationError};
use stockroom_db::DbError;
use tracing::{error, warn};

use crate::uploads::UploadError;

/// Error codes, each tied to one HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Malformed request or rejected upload (400)
    BadRequest,

    /// Upload over the size cap (413)
    PayloadTooLarge,

    /// Store operation failed (500)
    DatabaseError,

    /// Upload directory operation failed (500)
    StorageError,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ErrorCode::DatabaseError | ErrorCode::StorageError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// API error returned from route handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::BadRequest, message)
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }

    /// Keeps a 413 a 413, anything else becomes a 400.
    fn from_rejection(status: StatusCode, message: String) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::new(ErrorCode::PayloadTooLarge, message)
        } else {
            ApiError::bad_request(message)
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(AckEnvelope::failed(self.message))).into_response()
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        error!(error = %err, "Database operation failed");
        let message = match err {
            DbError::QueryFailed(msg) => msg,
            other => other.to_string(),
        };
        ApiError::new(ErrorCode::DatabaseError, message)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        let code = match err {
            ValidationError::TooLarge { .. } => ErrorCode::PayloadTooLarge,
            _ => ErrorCode::BadRequest,
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        error!(error = %err, "Upload storage failed");
        ApiError::new(ErrorCode::StorageError, err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(error = %rejection.body_text(), "Rejected JSON body");
        ApiError::from_rejection(rejection.status(), rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::from_rejection(rejection.status(), rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::from_rejection(err.status(), err.body_text())
    }
}
