use crate::value::Value;
use derive_more::{Deref, DerefMut};
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, MapAccess, Visitor},
};
use std::{collections::BTreeMap, fmt};

///
/// Node
///
/// One record slot: a scalar value, or a nested record produced by relation
/// population.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Node {
    Record(Record),
    Value(Value),
}

impl Node {
    #[must_use]
    pub const fn null() -> Self {
        Self::Value(Value::Null)
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Value(Value::Null))
    }

    #[must_use]
    pub const fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Record(_) => None,
        }
    }

    #[must_use]
    pub const fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(record) => Some(record),
            Self::Value(_) => None,
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<Record> for Node {
    fn from(record: Record) -> Self {
        Self::Record(record)
    }
}

impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Record(record) => record.serialize(serializer),
            Self::Value(value) => value.serialize(serializer),
        }
    }
}

///
/// NodeVisitor
/// Untagged decode shape: a map decodes as a nested record, anything else as
/// a scalar value.
///

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar value or a field map")
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Node, E> {
        Ok(Node::Value(Value::Bool(value)))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Node, E> {
        Ok(Node::Value(Value::Int(value)))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Node, E> {
        i64::try_from(value)
            .map(|value| Node::Value(Value::Int(value)))
            .map_err(|_| E::custom(format!("integer {value} is out of the signed 64-bit range")))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Node, E> {
        Ok(Node::Value(Value::Text(value.to_string())))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Node, E> {
        Ok(Node::Value(Value::Text(value)))
    }

    fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Node, E> {
        Ok(Node::Value(Value::Blob(value.to_vec())))
    }

    fn visit_byte_buf<E: de::Error>(self, value: Vec<u8>) -> Result<Node, E> {
        Ok(Node::Value(Value::Blob(value)))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Node, E> {
        Ok(Node::Value(Value::Null))
    }

    fn visit_none<E: de::Error>(self) -> Result<Node, E> {
        Ok(Node::Value(Value::Null))
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Node, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Node, A::Error> {
        let mut fields = BTreeMap::new();
        while let Some((name, node)) = access.next_entry::<String, Node>()? {
            fields.insert(name, node);
        }

        Ok(Node::Record(Record(fields)))
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(NodeVisitor)
    }
}

///
/// Record
///
/// Ordered field map for one row. Rows loaded from the store are flat
/// (scalar nodes only); the resolver nests related records during
/// population. Produced fresh per query; equality is by value.
///

#[derive(Clone, Debug, Default, Deref, DerefMut, Deserialize, Eq, PartialEq, Serialize)]
pub struct Record(BTreeMap<String, Node>);

impl Record {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder-style scalar insert, used by fixtures and tests.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), Node::Value(value.into()));
        self
    }

    /// Builder-style node insert.
    #[must_use]
    pub fn with_node(mut self, field: impl Into<String>, node: impl Into<Node>) -> Self {
        self.0.insert(field.into(), node.into());
        self
    }

    /// Set one field, replacing any existing node.
    pub fn set(&mut self, field: impl Into<String>, node: impl Into<Node>) {
        self.0.insert(field.into(), node.into());
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Node> {
        self.0.get(field)
    }

    /// Scalar accessor; nested records yield `None`.
    #[must_use]
    pub fn get_value(&self, field: &str) -> Option<&Value> {
        self.0.get(field).and_then(Node::as_value)
    }
}

impl IntoIterator for Record {
    type Item = (String, Node);
    type IntoIter = std::collections::btree_map::IntoIter<String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

///
/// TESTS
///
