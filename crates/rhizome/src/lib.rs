//! ## Crate layout
//! - `core`: runtime values, records, the row-store boundary, loader,
//!   relation resolver, result assembler, and the session facade.
//! - `schema`: schema AST, builder, and validation utilities.
//!
//! The `prelude` module mirrors the runtime surface most callers need.

pub use rhizome_core as core;
pub use rhizome_schema as schema;

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///

pub mod prelude {
    pub use crate::core::{
        db::{Filter, LoadQuery, MemoryStore, PopulatePath, Resolver, RowLoader, RowStore, Session},
        error::{ErrorClass, ErrorDetail, ErrorOrigin, InternalError},
        record::{Node, Record},
        value::{Value, ValueKind},
    };
    pub use crate::schema::{
        node::{EntityDef, FieldDef, FieldKind, RelationDef, RelationKind},
        registry::{Schema, SchemaBuilder},
    };
}
