//! Core runtime for Rhizome: values, records, the row-store boundary, the
//! relation resolver, and the session facade exported via the `prelude`.

pub mod db;
pub mod error;
pub mod obs;
pub mod record;
pub mod serialize;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// Errors, serializers, and observability stay at their module paths.
///

pub mod prelude {
    pub use crate::{
        db::{Filter, LoadQuery, MemoryStore, PopulatePath, RowStore, Session},
        record::{Node, Record},
        value::Value,
    };
    pub use rhizome_schema::{
        node::{EntityDef, FieldDef, FieldKind, RelationDef, RelationKind},
        registry::{Schema, SchemaBuilder},
    };
}
