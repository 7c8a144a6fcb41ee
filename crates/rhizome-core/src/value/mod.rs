mod wire;

use serde::{Serialize, Serializer};
use std::fmt;

///
/// Value
/// Scalar runtime value carried by records and filters.
///
/// Null → the field's value is explicitly absent (e.g. a relation that is
/// not set). Values serialize untagged, so records round-trip through the
/// row codec and assembled trees render as plain nested structures.
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Value {
    Blob(Vec<u8>),
    Bool(bool),
    Int(i64),
    Null,
    Text(String),
}

impl Value {
    /// Stable kind tag for diagnostics.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Blob(_) => ValueKind::Blob,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Null => ValueKind::Null,
            Self::Text(_) => ValueKind::Text,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Blob(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blob(bytes) => write!(f, "<{} bytes>", bytes.len()),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Null => write!(f, "null"),
            Self::Text(value) => write!(f, "\"{value}\""),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Blob(bytes) => serializer.serialize_bytes(bytes),
            Self::Bool(value) => serializer.serialize_bool(*value),
            Self::Int(value) => serializer.serialize_i64(*value),
            Self::Null => serializer.serialize_unit(),
            Self::Text(value) => serializer.serialize_str(value),
        }
    }
}

///
/// ValueKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValueKind {
    Blob,
    Bool,
    Int,
    Null,
    Text,
}

impl ValueKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Null => "null",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// TESTS
///
