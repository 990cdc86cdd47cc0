//! Query descriptor - the structured result of query extraction

use crate::schema::{SchemaField, COLLECTION_NAME, UNKNOWN_FIELD};
use serde::Serialize;
use serde_json::Value;

/// Value a descriptor filters on
///
/// Numeric schema fields carry `Integer` once coercion succeeds. Model output
/// that is neither a string nor an integer is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Integer value
    Integer(i64),

    /// String value
    Text(String),

    /// Any other JSON value the model produced
    Other(Value),
}

impl FieldValue {
    /// Build a `FieldValue` from an arbitrary JSON value
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::String(s) => FieldValue::Text(s),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Integer(i),
                None => FieldValue::Other(Value::Number(n)),
            },
            other => FieldValue::Other(other),
        }
    }

    /// Borrow the string form, if this is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the integer form, if this is an integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Integer(i)
    }
}

/// Result-count cap of a descriptor
///
/// `Raw` holds a limit that could not be read as an integer (for example
/// `"ten"`); it is passed through rather than rejected.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Limit {
    /// Integer limit
    Count(i64),

    /// Unconverted JSON value
    Raw(Value),
}

impl Limit {
    /// Build a `Limit` from an arbitrary JSON value
    pub fn from_json(value: Value) -> Self {
        match value.as_i64() {
            Some(n) => Limit::Count(n),
            None => Limit::Raw(value),
        }
    }

    /// Get the integer form, if known
    pub fn count(&self) -> Option<i64> {
        match self {
            Limit::Count(n) => Some(*n),
            Limit::Raw(_) => None,
        }
    }
}

impl Default for Limit {
    fn default() -> Self {
        Limit::Count(1)
    }
}

/// A normalized query over the `sales` collection
///
/// Always fully populated. When nothing usable can be recovered from the
/// model, [`QueryDescriptor::default`] is used.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryDescriptor {
    /// Target collection
    pub collection_name: String,

    /// Schema field identifier, or `"unknown"`
    pub field_name: String,

    /// Value to match
    pub field_value: FieldValue,

    /// Maximum number of results
    pub limit: Limit,
}

impl QueryDescriptor {
    /// Resolve `field_name` against the schema
    pub fn schema_field(&self) -> Option<SchemaField> {
        SchemaField::from_name(&self.field_name)
    }

    /// Whether this is exactly the default descriptor
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl Default for QueryDescriptor {
    /// The fallback descriptor: `sales` / `unknown` / `unknown` / `1`
    fn default() -> Self {
        Self {
            collection_name: COLLECTION_NAME.to_string(),
            field_name: UNKNOWN_FIELD.to_string(),
            field_value: FieldValue::Text(UNKNOWN_FIELD.to_string()),
            limit: Limit::default(),
        }
    }
}
