//! CBOR row-codec wrappers.
//!
//! This module is format-level only: no store constants or policy limits are
//! defined here. Size bounds are caller policy and live with the store.

use crate::error::InternalError;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error as ThisError;

///
/// SerializeError
///

#[derive(Debug, ThisError)]
pub enum SerializeError {
    #[error("serialize error: {0}")]
    Serialize(String),

    #[error("deserialize error: {0}")]
    Deserialize(String),
}

impl From<SerializeError> for InternalError {
    fn from(err: SerializeError) -> Self {
        Self::serialize_internal(err.to_string())
    }
}

/// Serialize a value to the engine's CBOR row format.
pub fn serialize<T>(value: &T) -> Result<Vec<u8>, SerializeError>
where
    T: Serialize,
{
    serde_cbor::to_vec(value).map_err(|err| SerializeError::Serialize(err.to_string()))
}

/// Deserialize a value produced by [`serialize`].
pub fn deserialize<T>(bytes: &[u8]) -> Result<T, SerializeError>
where
    T: DeserializeOwned,
{
    serde_cbor::from_slice(bytes).map_err(|err| SerializeError::Deserialize(err.to_string()))
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    #[test]
    fn truncated_payloads_fail_to_deserialize() {
        let record = Record::new().with("user_id", 1).with("name", "John");
        let mut bytes = serialize(&record).expect("serialize");
        bytes.truncate(bytes.len() - 1);

        let err = deserialize::<Record>(&bytes).expect_err("truncated payload must fail");
        assert!(matches!(err, SerializeError::Deserialize(_)));
    }
}
