use crate::{
    db::{filter::Filter, store::RowStore},
    error::{ErrorClass, ErrorOrigin, InternalError},
    obs::{self, MetricsEvent},
    record::Record,
    serialize::{SerializeError, deserialize, serialize},
    value::Value,
};
use derive_more::{Deref, DerefMut};
use std::{
    collections::BTreeMap,
    fmt::{self, Display},
};
use thiserror::Error as ThisError;

///
/// RawRowError
///

#[derive(Debug, ThisError)]
pub enum RawRowError {
    #[error("row exceeds max size: {len} bytes (limit {MAX_ROW_BYTES})")]
    TooLarge { len: usize },
}

impl RawRowError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        ErrorClass::Unsupported
    }

    #[must_use]
    pub const fn origin(&self) -> ErrorOrigin {
        ErrorOrigin::Store
    }
}

impl From<RawRowError> for InternalError {
    fn from(err: RawRowError) -> Self {
        Self::new(err.class(), err.origin(), err.to_string())
    }
}

///
/// RawRow
///

/// Max serialized bytes for a single row to keep value loads bounded.
pub const MAX_ROW_BYTES: usize = 1024 * 1024;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawRow(Vec<u8>);

impl RawRow {
    pub fn try_new(bytes: Vec<u8>) -> Result<Self, RawRowError> {
        if bytes.len() > MAX_ROW_BYTES {
            return Err(RawRowError::TooLarge { len: bytes.len() });
        }
        Ok(Self(bytes))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Overwrite the payload, bypassing encode. Test-only corruption hook.
    #[cfg(test)]
    pub(crate) fn poison(&mut self, bytes: Vec<u8>) {
        self.0 = bytes;
    }

    pub fn try_decode(&self) -> Result<Record, SerializeError> {
        deserialize::<Record>(&self.0)
    }
}

///
/// DataKey
///
/// `(entity name, primary-key value)` address of one stored row.
///

#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct DataKey {
    entity: String,
    key: Value,
}

impl DataKey {
    #[must_use]
    pub fn new(entity: impl Into<String>, key: Value) -> Self {
        Self {
            entity: entity.into(),
            key,
        }
    }

    #[must_use]
    pub fn entity(&self) -> &str {
        &self.entity
    }

    #[must_use]
    pub const fn key(&self) -> &Value {
        &self.key
    }
}

impl Display for DataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} ({})", self.entity, self.key)
    }
}

///
/// MemoryStore
///
/// BTreeMap-backed reference store. Rows are held as bounded CBOR payloads
/// and decoded on read; undecodable payloads surface as corruption. Scans
/// are linear, with no secondary indexing.
///

#[derive(Debug, Default, Deref, DerefMut)]
pub struct MemoryStore(BTreeMap<DataKey, RawRow>);

impl MemoryStore {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Insert one row for `entity`, keyed by `pk_field`'s value in the row.
    ///
    /// Rejects rows without a usable key, duplicate keys, and oversized
    /// payloads; all before anything is stored.
    pub fn insert(
        &mut self,
        entity: &str,
        pk_field: &str,
        record: &Record,
    ) -> Result<(), InternalError> {
        let key = match record.get_value(pk_field) {
            Some(value) if !value.is_null() => value.clone(),
            _ => {
                return Err(InternalError::store_invariant(format!(
                    "row for entity '{entity}' is missing primary-key field '{pk_field}'"
                )));
            }
        };

        let data_key = DataKey::new(entity, key);
        if self.0.contains_key(&data_key) {
            return Err(InternalError::store_duplicate_key(data_key.to_string()));
        }

        let bytes = serialize(record)?;
        let raw = RawRow::try_new(bytes)?;
        self.0.insert(data_key, raw);

        Ok(())
    }

    /// Number of stored rows across all entities.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.0.len()
    }
}

impl RowStore for MemoryStore {
    fn query(&self, entity: &str, filter: &Filter) -> Result<Vec<Record>, InternalError> {
        let mut rows = Vec::new();
        let mut scanned = 0u64;

        for (key, raw) in self.0.iter().filter(|(key, _)| key.entity() == entity) {
            scanned = scanned.saturating_add(1);

            let record = raw.try_decode().map_err(|err| {
                InternalError::store_corruption(format!("row {key} failed to decode: {err}"))
            })?;
            if filter.matches(&record) {
                rows.push(record);
            }
        }

        obs::record(MetricsEvent::RowsScanned {
            entity: entity.to_string(),
            rows_scanned: scanned,
        });

        Ok(rows)
    }
}

///
/// TESTS
///
