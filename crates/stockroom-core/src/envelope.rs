//! # Response Envelopes
//!
//! Every API response is a JSON object carrying `success` plus either a
//! payload or an `error` message.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  GET  /api/categories   {"success":true,"categories":[...]}      │
//! │  GET  /api/products     {"success":true,"products":[...]}        │
//! │  POST /api/products     {"success":true,"id":42}                 │
//! │  PUT/DELETE ...         {"success":true}                         │
//! │  POST /api/upload       {"success":true,"imageUrl":"/uploads/.."}│
//! │  GET  /api/health       {"success":true,"message":..,"database"} │
//! │                                                                  │
//! │  any failure            {"success":false,"error":"..."}          │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The same types are decoded by the client shim, so payload fields are
//! `#[serde(default)]`: a failure envelope carries no payload.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{Category, Product};

/// Common accessors over every envelope.
pub trait Envelope {
    fn success(&self) -> bool;
    fn error(&self) -> Option<&str>;
}

macro_rules! impl_envelope {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Envelope for $ty {
                fn success(&self) -> bool {
                    self.success
                }

                fn error(&self) -> Option<&str> {
                    self.error.as_deref()
                }
            }
        )*
    };
}

/// Result of a category listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoriesEnvelope {
    pub success: bool,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CategoriesEnvelope {
    pub fn ok(categories: Vec<Category>) -> Self {
        CategoriesEnvelope {
            success: true,
            categories,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        CategoriesEnvelope {
            success: false,
            categories: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// Result of a product listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductsEnvelope {
    pub success: bool,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProductsEnvelope {
    pub fn ok(products: Vec<Product>) -> Self {
        ProductsEnvelope {
            success: true,
            products,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        ProductsEnvelope {
            success: false,
            products: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// Result of a product creation: the generated id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreatedEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CreatedEnvelope {
    pub fn ok(id: i64) -> Self {
        CreatedEnvelope {
            success: true,
            id: Some(id),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        CreatedEnvelope {
            success: false,
            id: None,
            error: Some(error.into()),
        }
    }
}

/// Bare acknowledgement for updates and deletions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AckEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AckEnvelope {
    pub fn ok() -> Self {
        AckEnvelope {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        AckEnvelope {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Result of an image upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UploadEnvelope {
    pub success: bool,
    #[serde(
        rename = "imageUrl",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadEnvelope {
    pub fn ok(image_url: impl Into<String>) -> Self {
        UploadEnvelope {
            success: true,
            image_url: Some(image_url.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        UploadEnvelope {
            success: false,
            image_url: None,
            error: Some(error.into()),
        }
    }
}

/// Liveness report: which store backend is active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HealthEnvelope {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    /// `"SQLite"` or `"MySQL"`.
    #[serde(default)]
    pub database: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthEnvelope {
    pub fn ok(database: impl Into<String>) -> Self {
        let database = database.into();
        HealthEnvelope {
            success: true,
            message: format!("{database} database connected successfully"),
            database,
            error: None,
        }
    }
}

impl_envelope!(
    CategoriesEnvelope,
    ProductsEnvelope,
    CreatedEnvelope,
    AckEnvelope,
    UploadEnvelope,
    HealthEnvelope,
);
