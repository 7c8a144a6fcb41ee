//! Schema AST, registry, and validation for the rhizome population engine:
//! entity definitions, relation descriptors, and the eager build-time checks
//! that keep mapping errors out of the query path.

pub mod error;
pub mod node;
pub mod registry;
pub mod validate;

/// Maximum length for entity schema identifiers.
pub const MAX_ENTITY_NAME_LEN: usize = 64;

/// Maximum length for field schema identifiers.
pub const MAX_FIELD_NAME_LEN: usize = 64;

/// Maximum length for relation schema identifiers.
pub const MAX_RELATION_NAME_LEN: usize = 64;

use crate::{error::ErrorTree, registry::RegistryError};
use thiserror::Error as ThisError;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        err,
        error::ErrorTree,
        node::{EntityDef, FieldDef, FieldKind, RelationDef, RelationKind},
        registry::{Schema, SchemaBuilder},
    };
    pub use serde::Serialize;
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("validation failed: {0}")]
    Validation(ErrorTree),
}
