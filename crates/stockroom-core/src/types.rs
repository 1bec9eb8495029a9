//! # Domain Types
//!
//! Core domain types used throughout Stockroom.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐        ┌──────────────────────┐                   │
//! │  │    Category     │ 0..1 ◄─│       Product        │                   │
//! │  │  ─────────────  │        │  ──────────────────  │                   │
//! │  │  id (i64)       │        │  id (i64)            │                   │
//! │  │  name (unique)  │        │  category_id (FK?)   │                   │
//! │  │  description    │        │  purchase / selling  │                   │
//! │  └─────────────────┘        │  remaining_stock     │                   │
//! │                             │  min_stock_level     │                   │
//! │                             │  image_url           │                   │
//! │                             └──────────────────────┘                   │
//! │                                                                         │
//! │  Inputs:   ProductDraft (create)   ProductUpdate (id + draft)          │
//! │  Queries:  ProductQuery { search, CategoryFilter }                     │
//! │  Derived:  StockStatus, InventorySummary                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Identifiers are store-generated integers. There is no business key: two
//! products may share a name.

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::validation::normalize_search_query;
use crate::{CATEGORY_FILTER_ALL, DEFAULT_MIN_STOCK_LEVEL};

// =============================================================================
// Timestamps
// =============================================================================

/// Format produced by SQL `CURRENT_TIMESTAMP` and used on the wire.
pub const SQL_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parses a timestamp in any of the shapes the two stores and the offline
/// mirror produce.
///
/// Accepted: `2024-05-01 10:00:00`, `2024-05-01 10:00:00.123`,
/// `2024-05-01T10:00:00`, and RFC 3339 (converted to UTC).
pub fn parse_timestamp(raw: &str) -> CoreResult<NaiveDateTime> {
    let raw = raw.trim();
    for format in [
        SQL_TIMESTAMP_FORMAT,
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
    ] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(ts);
        }
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.naive_utc())
        .map_err(|_| CoreError::InvalidTimestamp(raw.to_string()))
}

/// Current UTC time at second precision, like `CURRENT_TIMESTAMP`.
pub fn now_timestamp() -> NaiveDateTime {
    let now = Utc::now().naive_utc();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Serde adapter for `NaiveDateTime` fields in [`SQL_TIMESTAMP_FORMAT`].
pub mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{parse_timestamp, SQL_TIMESTAMP_FORMAT};

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&ts.format(SQL_TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}

/// Lenient integer decoding for form-originated JSON.
///
/// The UI posts whatever its inputs hold: `4`, `"4"`, `""` or `null` for a
/// category select, for instance. This is the "basic type coercion" the API
/// performs; anything else is rejected.
pub mod coerce {
    use serde::de::{self, Visitor};
    use serde::Deserializer;
    use std::fmt;

    pub fn optional_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
        deserializer.deserialize_any(OptionalI64)
    }

    struct OptionalI64;

    impl<'de> Visitor<'de> for OptionalI64 {
        type Value = Option<i64>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an integer, a numeric string, an empty string or null")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
            deserializer.deserialize_any(OptionalI64)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            i64::try_from(v)
                .map(Some)
                .map_err(|_| E::custom(format!("integer out of range: {v}")))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            if v.fract() == 0.0 && v.is_finite() {
                Ok(Some(v as i64))
            } else {
                Err(E::custom(format!("expected a whole number, got {v}")))
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            let v = v.trim();
            if v.is_empty() {
                return Ok(None);
            }
            v.parse()
                .map(Some)
                .map_err(|_| E::custom(format!("expected an integer, got '{v}'")))
        }
    }
}

// =============================================================================
// Category
// =============================================================================

/// A product category. Read-only through the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Category {
    /// Store-generated identifier.
    #[ts(type = "number")]
    pub id: i64,

    /// Unique display name.
    pub name: String,

    pub description: Option<String>,

    #[serde(with = "timestamp")]
    #[ts(type = "string")]
    pub created_at: NaiveDateTime,
}

// =============================================================================
// Product
// =============================================================================

/// A product as listed by the API, joined with its category name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Store-generated identifier.
    #[ts(type = "number")]
    pub id: i64,

    pub name: String,

    pub description: Option<String>,

    /// Category reference; `None` when uncategorized or the category was removed.
    #[ts(type = "number | null")]
    pub category_id: Option<i64>,

    #[ts(type = "number")]
    pub purchase_price: Money,

    #[ts(type = "number")]
    pub selling_price: Money,

    /// Freely settable; last write wins.
    #[ts(type = "number")]
    pub remaining_stock: i64,

    /// Threshold for low-stock flagging.
    #[ts(type = "number")]
    pub min_stock_level: i64,

    /// Relative path such as `/uploads/<uuid>.png`.
    pub image_url: Option<String>,

    #[serde(with = "timestamp")]
    #[ts(type = "string")]
    pub created_at: NaiveDateTime,

    #[serde(with = "timestamp")]
    #[ts(type = "string")]
    pub updated_at: NaiveDateTime,

    /// Joined from the categories table; not a stored column.
    #[serde(default)]
    pub category_name: Option<String>,
}

impl Product {
    /// Classifies current stock against the minimum level.
    pub fn stock_status(&self) -> StockStatus {
        StockStatus::classify(self.remaining_stock, self.min_stock_level)
    }

    /// True when stock is at or below the minimum level (out of stock included).
    pub fn is_low_stock(&self) -> bool {
        self.remaining_stock <= self.min_stock_level
    }

    /// Selling price minus purchase price.
    pub fn margin(&self) -> Money {
        self.selling_price - self.purchase_price
    }

    /// Value of the remaining stock at selling price.
    pub fn stock_value(&self) -> Money {
        self.selling_price.multiply_quantity(self.remaining_stock)
    }
}

/// Sorts products newest first; ties on `created_at` go to the higher id.
///
/// `CURRENT_TIMESTAMP` has one-second resolution, so the id breaks ties
/// between products created in the same second.
pub fn order_newest_first(products: &mut [Product]) {
    products.sort_by_key(|p| Reverse((p.created_at, p.id)));
}

// =============================================================================
// Product Inputs
// =============================================================================

/// Fields supplied when creating a product.
///
/// No field validation happens beyond type coercion: a negative price is
/// stored as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductDraft {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "coerce::optional_i64")]
    #[ts(type = "number | null")]
    pub category_id: Option<i64>,

    #[ts(type = "number")]
    pub purchase_price: Money,

    #[ts(type = "number")]
    pub selling_price: Money,

    /// Defaults to 0 when absent.
    #[serde(default, deserialize_with = "coerce::optional_i64")]
    #[ts(type = "number | null")]
    pub remaining_stock: Option<i64>,

    /// Defaults to [`DEFAULT_MIN_STOCK_LEVEL`] when absent.
    #[serde(default, deserialize_with = "coerce::optional_i64")]
    #[ts(type = "number | null")]
    pub min_stock_level: Option<i64>,

    #[serde(default)]
    pub image_url: Option<String>,
}

impl ProductDraft {
    /// Creates a draft with the required fields; everything else defaults.
    pub fn new(name: impl Into<String>, purchase_price: Money, selling_price: Money) -> Self {
        ProductDraft {
            name: name.into(),
            description: None,
            category_id: None,
            purchase_price,
            selling_price,
            remaining_stock: None,
            min_stock_level: None,
            image_url: None,
        }
    }

    pub fn remaining_stock_or_default(&self) -> i64 {
        self.remaining_stock.unwrap_or(0)
    }

    pub fn min_stock_level_or_default(&self) -> i64 {
        self.min_stock_level.unwrap_or(DEFAULT_MIN_STOCK_LEVEL)
    }

    /// Image path, with the empty string treated as "no image".
    pub fn image_url_or_none(&self) -> Option<&str> {
        self.image_url.as_deref().filter(|url| !url.trim().is_empty())
    }
}

/// Fields supplied when updating a product: the identifier plus every
/// mutable field. Updating an unknown id is a silent no-op.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductUpdate {
    #[ts(type = "number")]
    pub id: i64,

    #[serde(flatten)]
    pub fields: ProductDraft,
}

impl ProductUpdate {
    pub fn new(id: i64, fields: ProductDraft) -> Self {
        ProductUpdate { id, fields }
    }
}

// =============================================================================
// Queries
// =============================================================================

/// Category restriction for a product listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Sentinel `"all"` (or empty): no restriction.
    #[default]
    All,
    /// Exact category id.
    Id(i64),
    /// Anything else. Handed to the store as text; matches nothing offline.
    Other(String),
}

impl CategoryFilter {
    /// Query-string value, or `None` when no parameter should be sent.
    pub fn as_param(&self) -> Option<String> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Id(id) => Some(id.to_string()),
            CategoryFilter::Other(raw) => Some(raw.clone()),
        }
    }

    /// Whether a product's category reference passes this filter.
    pub fn accepts(&self, category_id: Option<i64>) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Id(id) => category_id == Some(*id),
            CategoryFilter::Other(_) => false,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case(CATEGORY_FILTER_ALL) {
            return Ok(CategoryFilter::All);
        }
        Ok(match s.parse::<i64>() {
            Ok(id) => CategoryFilter::Id(id),
            Err(_) => CategoryFilter::Other(s.to_string()),
        })
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(CATEGORY_FILTER_ALL),
            CategoryFilter::Id(id) => write!(f, "{id}"),
            CategoryFilter::Other(raw) => f.write_str(raw),
        }
    }
}

/// A product listing request. Filters combine with AND.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductQuery {
    /// Trimmed search term; `None` means no text filter.
    pub search: Option<String>,
    pub category: CategoryFilter,
}

impl ProductQuery {
    /// Builds a query from raw request values.
    pub fn new(search: Option<&str>, category: &str) -> Self {
        let category = match category.parse() {
            Ok(filter) => filter,
            Err(never) => match never {},
        };
        ProductQuery {
            search: normalize_search_query(search),
            category,
        }
    }

    /// The unfiltered listing.
    pub fn all() -> Self {
        ProductQuery::default()
    }

    pub fn with_search(mut self, term: &str) -> Self {
        self.search = normalize_search_query(Some(term));
        self
    }

    pub fn with_category(mut self, category: CategoryFilter) -> Self {
        self.category = category;
        self
    }

    /// Case-insensitive substring match over name OR description, AND the
    /// category filter. The store-side listing implements the same rule in SQL.
    pub fn matches(&self, product: &Product) -> bool {
        if !self.category.accepts(product.category_id) {
            return false;
        }
        match &self.search {
            None => true,
            Some(term) => {
                let term = term.to_lowercase();
                product.name.to_lowercase().contains(&term)
                    || product
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&term))
            }
        }
    }
}

// =============================================================================
// Stock Status
// =============================================================================

/// Stock badge shown next to each product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// Nothing left (or negative after manual edits).
    OutOfStock,
    /// At or below the minimum level.
    Low,
    InStock,
}

impl StockStatus {
    pub fn classify(remaining_stock: i64, min_stock_level: i64) -> Self {
        if remaining_stock <= 0 {
            StockStatus::OutOfStock
        } else if remaining_stock <= min_stock_level {
            StockStatus::Low
        } else {
            StockStatus::InStock
        }
    }
}

// =============================================================================
// Inventory Summary
// =============================================================================

/// Dashboard figures over a product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InventorySummary {
    #[ts(type = "number")]
    pub total_products: usize,

    /// Σ selling_price × remaining_stock, saturating at the `i64` cent range.
    #[ts(type = "number")]
    pub stock_value: Money,

    /// Products with stock at or below their minimum level.
    #[ts(type = "number")]
    pub low_stock_count: usize,
}

impl InventorySummary {
    pub fn from_products(products: &[Product]) -> Self {
        let mut stock_value = Money::zero();
        let mut low_stock_count = 0;
        for product in products {
            stock_value += product.stock_value();
            if product.is_low_stock() {
                low_stock_count += 1;
            }
        }
        InventorySummary {
            total_products: products.len(),
            stock_value,
            low_stock_count,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
