//! Structural description of entity fields.
//!
//! An [`EntitySchema`] lists the fields of one record type together with their
//! primitive [`FieldKind`]. The repository uses it to resolve filter and
//! ordering field names to ORM columns and to reject values of the wrong shape
//! before a query reaches the store. No business rules live here; form rules
//! are in [`crate::validation`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("{entity} has no field named `{field}`")]
    UnknownField { entity: &'static str, field: String },

    #[error("field `{field}` expects {expected}, got `{got}`")]
    InvalidValue {
        field: &'static str,
        expected: String,
        got: String,
    },
}

/// Primitive type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Text,
    Number,
    Boolean,
    Timestamp,
    /// A string restricted to the listed values.
    Enumerated(&'static [&'static str]),
}

impl FieldKind {
    /// Human readable name used in error messages.
    pub fn describe(&self) -> String {
        match self {
            FieldKind::Integer => "an integer".to_string(),
            FieldKind::Text => "a string".to_string(),
            FieldKind::Number => "a number".to_string(),
            FieldKind::Boolean => "`true` or `false`".to_string(),
            FieldKind::Timestamp => "an RFC 3339 timestamp".to_string(),
            FieldKind::Enumerated(values) => format!("one of {}", values.join(", ")),
        }
    }

    /// Parse a textual value, e.g. from a query string.
    pub fn parse(&self, raw: &str) -> Option<FieldValue> {
        match self {
            FieldKind::Integer => raw.trim().parse().ok().map(FieldValue::Integer),
            FieldKind::Text => Some(FieldValue::Text(raw.to_string())),
            FieldKind::Number => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(FieldValue::Number),
            FieldKind::Boolean => match raw.trim() {
                "true" => Some(FieldValue::Boolean(true)),
                "false" => Some(FieldValue::Boolean(false)),
                _ => None,
            },
            FieldKind::Timestamp => DateTime::parse_from_rfc3339(raw.trim())
                .ok()
                .map(|ts| FieldValue::Timestamp(ts.with_timezone(&Utc))),
            FieldKind::Enumerated(values) => values
                .iter()
                .any(|v| *v == raw)
                .then(|| FieldValue::Text(raw.to_string())),
        }
    }

    /// Coerce an already typed value to this kind. Integers widen to numbers
    /// and RFC 3339 strings are accepted for timestamps; anything else must
    /// match exactly.
    pub fn coerce(&self, value: FieldValue) -> Option<FieldValue> {
        match (self, value) {
            (FieldKind::Integer, v @ FieldValue::Integer(_)) => Some(v),
            (FieldKind::Text, v @ FieldValue::Text(_)) => Some(v),
            (FieldKind::Number, v @ FieldValue::Number(_)) => Some(v),
            (FieldKind::Number, FieldValue::Integer(n)) => Some(FieldValue::Number(n as f64)),
            (FieldKind::Boolean, v @ FieldValue::Boolean(_)) => Some(v),
            (FieldKind::Timestamp, v @ FieldValue::Timestamp(_)) => Some(v),
            (FieldKind::Timestamp, FieldValue::Text(s)) => self.parse(&s),
            (FieldKind::Enumerated(_), FieldValue::Text(s)) => self.parse(&s),
            _ => None,
        }
    }
}

/// A typed field value, as used in equality filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Integer(i64),
    Text(String),
    Number(f64),
    Boolean(bool),
    Timestamp(DateTime<Utc>),
    Null,
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Integer(n) => write!(f, "{n}"),
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Boolean(b) => write!(f, "{b}"),
            FieldValue::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339()),
            FieldValue::Null => write!(f, "null"),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(value)
    }
}

impl From<FieldValue> for sea_orm::Value {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Integer(n) => n.into(),
            FieldValue::Text(s) => s.into(),
            FieldValue::Number(n) => n.into(),
            FieldValue::Boolean(b) => b.into(),
            FieldValue::Timestamp(ts) => ts.into(),
            FieldValue::Null => sea_orm::Value::String(None),
        }
    }
}

/// One field of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// Name on the wire (camelCase).
    pub name: &'static str,
    /// Column name in the store (snake_case).
    pub column: &'static str,
    pub kind: FieldKind,
    /// Set by the store (`id`, `createdAt`); ignored on insert and save.
    pub server_assigned: bool,
}

impl FieldDef {
    pub const fn new(name: &'static str, column: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            column,
            kind,
            server_assigned: false,
        }
    }

    pub const fn server_assigned(mut self) -> Self {
        self.server_assigned = true;
        self
    }

    /// Parse a textual value for this field.
    pub fn parse(&self, raw: &str) -> Result<FieldValue, SchemaError> {
        self.kind.parse(raw).ok_or_else(|| self.invalid(raw))
    }

    /// Check a typed value against this field's kind.
    pub fn check(&self, value: FieldValue) -> Result<FieldValue, SchemaError> {
        let got = value.to_string();
        self.kind.coerce(value).ok_or_else(|| self.invalid(&got))
    }

    fn invalid(&self, got: &str) -> SchemaError {
        SchemaError::InvalidValue {
            field: self.name,
            expected: self.kind.describe(),
            got: got.to_string(),
        }
    }
}

/// Field list of one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntitySchema {
    /// Resource name, also the path segment under `/api`.
    pub name: &'static str,
    pub table: &'static str,
    pub fields: &'static [FieldDef],
}

impl EntitySchema {
    /// Look a field up by wire name or column name.
    pub fn field(&self, name: &str) -> Option<&'static FieldDef> {
        self.fields
            .iter()
            .find(|f| f.name == name || f.column == name)
    }

    pub fn require_field(&self, name: &str) -> Result<&'static FieldDef, SchemaError> {
        self.field(name).ok_or_else(|| SchemaError::UnknownField {
            entity: self.name,
            field: name.to_string(),
        })
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    /// Fields a client may set.
    pub fn mutable_fields(&self) -> impl Iterator<Item = &'static FieldDef> + '_ {
        self.fields.iter().filter(|f| !f.server_assigned)
    }
}
