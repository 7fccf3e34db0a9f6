//! Column values passed to and read back from MySQL.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Serialize;
use sqlx::mysql::MySqlRow;
use sqlx::{Column, FromRow, Row, TypeInfo};

/// A dynamically typed column value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    DateTime(NaiveDateTime),
    Json(serde_json::Value),
    /// Operand of an `in` / `not in` condition. Never bound as a single value.
    List(Vec<Value>),
}

/// Column name → value, for inserts and updates.
///
/// Ordered so the generated column list is deterministic.
pub type Values = BTreeMap<String, Value>;

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Scalars map onto their variants and arrays onto `List`; objects stay
    /// `Json`.
    pub fn from_json(value: serde_json::Value) -> Value {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(v) => Value::Bool(v),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Value::Int)
                .or_else(|| n.as_u64().map(Value::UInt))
                .unwrap_or_else(|| Value::Float(n.as_f64().unwrap_or_default())),
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from_json).collect())
            }
            object => Value::Json(object),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Int(v) => Some(v),
            Value::UInt(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }
}

macro_rules! from_int {
    ($variant:ident, $target:ty, $($t:ty),+) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::$variant(<$target>::from(v))
                }
            }
        )+
    };
}

from_int!(Int, i64, i8, i16, i32, i64);
from_int!(UInt, u64, u8, u16, u32, u64);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v.naive_utc())
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Json(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

// ---------------------------------------------------------------------------
// Dynamic row decoding
// ---------------------------------------------------------------------------

/// A row decoded without a destination struct, keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<String, Value>);

impl Record {
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn into_map(self) -> BTreeMap<String, Value> {
        self.0
    }
}

impl<'r> FromRow<'r, MySqlRow> for Record {
    fn from_row(row: &'r MySqlRow) -> Result<Self, sqlx::Error> {
        let mut fields = BTreeMap::new();
        for column in row.columns() {
            let value = decode_column(row, column.ordinal(), column.type_info().name())?;
            fields.insert(column.name().to_string(), value);
        }
        Ok(Record(fields))
    }
}

/// Decode one column by its MySQL type name.
///
/// Dispatch is done here on the reported type, so the driver's own
/// compatibility check is skipped with `try_get_unchecked`.
fn decode_column(row: &MySqlRow, index: usize, type_name: &str) -> Result<Value, sqlx::Error> {
    if let Some(base) = type_name.strip_suffix(" UNSIGNED") {
        if is_integer(base) {
            return Ok(row.try_get_unchecked::<Option<u64>, _>(index)?.into());
        }
    }

    let value = match type_name {
        "NULL" => Value::Null,
        "BOOLEAN" => row.try_get_unchecked::<Option<bool>, _>(index)?.into(),
        t if is_integer(t) || t == "YEAR" => row.try_get_unchecked::<Option<i64>, _>(index)?.into(),
        "FLOAT" => row.try_get_unchecked::<Option<f32>, _>(index)?.into(),
        "DOUBLE" => row.try_get_unchecked::<Option<f64>, _>(index)?.into(),
        "DATETIME" | "TIMESTAMP" => row
            .try_get_unchecked::<Option<NaiveDateTime>, _>(index)?
            .into(),
        "DATE" => row
            .try_get_unchecked::<Option<NaiveDate>, _>(index)?
            .map(|d| d.to_string())
            .into(),
        "TIME" => row
            .try_get_unchecked::<Option<NaiveTime>, _>(index)?
            .map(|t| t.to_string())
            .into(),
        "JSON" => row
            .try_get_unchecked::<Option<serde_json::Value>, _>(index)?
            .into(),
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BIT"
        | "GEOMETRY" => row
            .try_get_unchecked::<Option<Vec<u8>>, _>(index)?
            .map(Value::Bytes)
            .unwrap_or(Value::Null),
        // DECIMAL travels as text on both protocols; so do the string types.
        _ => row.try_get_unchecked::<Option<String>, _>(index)?.into(),
    };
    Ok(value)
}

fn is_integer(type_name: &str) -> bool {
    matches!(
        type_name,
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT"
    )
}
