//! # Client Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Client Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │    Network      │  │     Mirror      │  │     Application         │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Network        │  │  Storage        │  │  Rejected               │ │
//! │  │  Decode         │  │  Snapshot       │  │  (success:false where   │ │
//! │  │  InvalidUrl     │  │                 │  │   a value was needed)   │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Any Err from the network strategy triggers the offline fallback.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Network Errors
    // =========================================================================
    /// Transport failure, timeout, or a non-2xx answer to a read.
    #[error("Network error: {0}")]
    Network(String),

    /// The response body was not the expected JSON envelope.
    #[error("Invalid response: {0}")]
    Decode(String),

    /// The configured base URL can't be used.
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    // =========================================================================
    // Mirror Errors
    // =========================================================================
    /// Reading or writing the mirror's files failed.
    #[error("Offline storage error: {0}")]
    Storage(String),

    /// A snapshot could not be (de)serialized.
    #[error("Invalid offline snapshot: {0}")]
    Snapshot(String),

    // =========================================================================
    // Application Errors
    // =========================================================================
    /// An envelope came back with `success: false`.
    #[error("Request rejected: {0}")]
    Rejected(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else if err.is_builder() {
            ClientError::InvalidUrl(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Snapshot(err.to_string())
    }
}
