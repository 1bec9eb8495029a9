//! # Values Crossing the Adapter
//!
//! Parameters going in, rows and write summaries coming out.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  execute(sql, &[SqlValue])                                       │
//! │      │                                                           │
//! │      ├── read  ──► QueryOutcome::Rows(Vec<Row>)                  │
//! │      │            Row = { "id": 7, "name": "Vis", ... }          │
//! │      │                                                           │
//! │      └── write ──► QueryOutcome::Written(WriteSummary)           │
//! │                   { insert_id: Some(7), changed: 1 }             │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rows are decoded dynamically into JSON values so both engines share one
//! representation; the [`RowExt`] accessors turn them back into typed
//! fields.

use chrono::NaiveDateTime;
use serde_json::Value;
use stockroom_core::{parse_timestamp, Money};

use crate::error::{DbError, DbResult};

// =============================================================================
// Parameters
// =============================================================================

/// A positional statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Int(i64),
    Real(f64),
    Text(String),
}

impl SqlValue {
    /// JSON rendering, used for logging and by test executors.
    pub fn to_json(&self) -> Value {
        match self {
            SqlValue::Null => Value::Null,
            SqlValue::Int(v) => Value::from(*v),
            SqlValue::Real(v) => json_f64(*v),
            SqlValue::Text(v) => Value::String(v.clone()),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Real(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

/// Prices are stored as decimals (REAL / DECIMAL(10,2)).
impl From<Money> for SqlValue {
    fn from(v: Money) -> Self {
        SqlValue::Real(v.to_decimal())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(SqlValue::Null, Into::into)
    }
}

/// Non-finite floats have no JSON form and decode as null.
pub(crate) fn json_f64(v: f64) -> Value {
    serde_json::Number::from_f64(v).map_or(Value::Null, Value::Number)
}

// =============================================================================
// Outcomes
// =============================================================================

/// One decoded result row, keyed by column name (or alias).
pub type Row = serde_json::Map<String, Value>;

/// Result of a data-modifying statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteSummary {
    /// Generated key of an INSERT; `None` for UPDATE/DELETE/DDL.
    pub insert_id: Option<i64>,
    /// Rows changed by the statement.
    pub changed: u64,
}

/// What `execute` hands back, depending on the statement kind.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Rows(Vec<Row>),
    Written(WriteSummary),
}

impl QueryOutcome {
    pub fn into_rows(self) -> DbResult<Vec<Row>> {
        match self {
            QueryOutcome::Rows(rows) => Ok(rows),
            QueryOutcome::Written(_) => Err(DbError::QueryFailed(
                "expected rows from a read statement".to_string(),
            )),
        }
    }

    pub fn into_write(self) -> DbResult<WriteSummary> {
        match self {
            QueryOutcome::Written(summary) => Ok(summary),
            QueryOutcome::Rows(_) => Err(DbError::QueryFailed(
                "expected a write summary from a write statement".to_string(),
            )),
        }
    }
}

// =============================================================================
// Typed Row Access
// =============================================================================

/// Typed accessors over a decoded [`Row`].
///
/// Lenient about representation: MySQL hands DECIMAL back as a number and
/// SQLite stores whatever affinity produced, so integers may arrive as
/// whole floats and numbers as numeric text.
pub trait RowExt {
    fn value(&self, column: &str) -> DbResult<&Value>;

    fn get_opt_i64(&self, column: &str) -> DbResult<Option<i64>> {
        match self.value(column)? {
            Value::Null => Ok(None),
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
                .map(Some)
                .ok_or_else(|| DbError::decode(column, format!("not an integer: {n}"))),
            Value::String(s) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| DbError::decode(column, format!("not an integer: '{s}'"))),
            other => Err(DbError::decode(column, format!("unexpected value {other}"))),
        }
    }

    fn get_i64(&self, column: &str) -> DbResult<i64> {
        self.get_opt_i64(column)?
            .ok_or_else(|| DbError::decode(column, "unexpected NULL"))
    }

    fn get_opt_string(&self, column: &str) -> DbResult<Option<String>> {
        match self.value(column)? {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s.clone())),
            Value::Number(n) => Ok(Some(n.to_string())),
            other => Err(DbError::decode(column, format!("unexpected value {other}"))),
        }
    }

    fn get_string(&self, column: &str) -> DbResult<String> {
        self.get_opt_string(column)?
            .ok_or_else(|| DbError::decode(column, "unexpected NULL"))
    }

    fn get_money(&self, column: &str) -> DbResult<Money> {
        let parsed = match self.value(column)? {
            Value::Number(n) => match n.as_f64() {
                Some(f) => Money::from_decimal(f),
                None => return Err(DbError::decode(column, format!("not a number: {n}"))),
            },
            Value::String(s) => s.parse(),
            other => return Err(DbError::decode(column, format!("unexpected value {other}"))),
        };
        parsed.map_err(|e| DbError::decode(column, e.to_string()))
    }

    fn get_timestamp(&self, column: &str) -> DbResult<NaiveDateTime> {
        let raw = self.get_string(column)?;
        parse_timestamp(&raw).map_err(|e| DbError::decode(column, e.to_string()))
    }
}

impl RowExt for Row {
    fn value(&self, column: &str) -> DbResult<&Value> {
        self.get(column)
            .ok_or_else(|| DbError::decode(column, "column missing from result"))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(SqlValue::from(None::<i64>), SqlValue::Null);
        assert_eq!(SqlValue::from(Some(4_i64)), SqlValue::Int(4));
        assert_eq!(SqlValue::from(Money::from_cents(1250)), SqlValue::Real(12.5));
    }

    #[test]
    fn test_lenient_integer_access() {
        let r = row(json!({"a": 7, "b": 7.0, "c": "7", "d": null, "e": 7.5}));
        assert_eq!(r.get_i64("a").unwrap(), 7);
        assert_eq!(r.get_i64("b").unwrap(), 7);
        assert_eq!(r.get_i64("c").unwrap(), 7);
        assert_eq!(r.get_opt_i64("d").unwrap(), None);
        assert!(r.get_i64("d").is_err());
        assert!(r.get_i64("e").is_err());
        assert!(matches!(r.get_i64("missing"), Err(DbError::Decode { .. })));
    }

    #[test]
    fn test_money_and_timestamp_access() {
        let r = row(json!({"price": 12.5, "text_price": "18.00", "at": "2024-05-01 10:00:00"}));
        assert_eq!(r.get_money("price").unwrap(), Money::from_cents(1250));
        assert_eq!(r.get_money("text_price").unwrap(), Money::from_cents(1800));
        assert_eq!(
            r.get_timestamp("at").unwrap().to_string(),
            "2024-05-01 10:00:00"
        );
    }

    #[test]
    fn test_outcome_shape_mismatch() {
        assert!(QueryOutcome::Rows(vec![]).into_write().is_err());
        assert!(QueryOutcome::Written(WriteSummary::default())
            .into_rows()
            .is_err());
    }
}
