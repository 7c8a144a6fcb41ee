//! Schema nodes: plain data values describing entities, fields, and
//! relations. Declarative metadata becomes ordinary registration calls on
//! [`crate::registry::SchemaBuilder`]; nothing here is macro-generated.

mod entity;
mod field;
mod relation;

pub use entity::EntityDef;
pub use field::{FieldDef, FieldKind};
pub use relation::{RelationDef, RelationKind};
