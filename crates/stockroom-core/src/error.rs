//! # Error Types
//!
//! Domain-specific error types for stockroom-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockroom-core errors (this file)                                     │
//! │  ├── CoreError        - Malformed amounts / timestamps                 │
//! │  └── ValidationError  - Upload rejections                              │
//! │                                                                         │
//! │  stockroom-db errors     └── DbError      - store failures             │
//! │  stockroom-client errors └── ClientError  - network / mirror failures  │
//! │  api-server errors       └── ApiError     - what the HTTP caller sees  │
//! │                                                                         │
//! │  Flow: ValidationError ──────────────────► ApiError → envelope        │
//! │        CoreError → DbError ──────────────► ApiError → envelope        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation is deliberately thin in this system: the only hard rejections
//! are on image uploads. Everything else is coerced and handed to the store.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A monetary amount could not be interpreted.
    ///
    /// ## When This Occurs
    /// - A price arrives as a string that is not a number (`"12,5€"`)
    /// - A price is NaN or infinite
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// A timestamp string is in none of the accepted formats.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These map to HTTP 400 (or 413 for [`ValidationError::TooLarge`]).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field or multipart part is missing.
    #[error("{field} is required")]
    Required { field: String },

    /// Value is not in the allowed set (e.g. a `text/plain` upload).
    #[error("{field} must be one of: {allowed}")]
    NotAllowed { field: String, allowed: String },

    /// Payload exceeds the configured size cap.
    #[error("{field} is too large: {actual} bytes (max {max})")]
    TooLarge {
        field: String,
        max: usize,
        actual: usize,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
