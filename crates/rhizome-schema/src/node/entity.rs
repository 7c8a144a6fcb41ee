use crate::node::{FieldDef, FieldKind, RelationDef};
use serde::Serialize;

///
/// EntityDef
///
/// One entity definition: ordered fields, primary-key field, and relation
/// descriptors. Immutable once registered with the schema builder.
///

#[derive(Clone, Debug, Serialize)]
pub struct EntityDef {
    pub name: String,
    pub fields: Vec<FieldDef>,
    pub primary_key: String,
    pub relations: Vec<RelationDef>,
}

impl EntityDef {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            primary_key: String::new(),
            relations: Vec::new(),
        }
    }

    /// Append one field declaration.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldDef::new(name, kind));
        self
    }

    /// Name the primary-key field; must be declared via [`Self::field`].
    #[must_use]
    pub fn primary_key(mut self, name: impl Into<String>) -> Self {
        self.primary_key = name.into();
        self
    }

    /// Append one relation descriptor.
    #[must_use]
    pub fn relation(mut self, relation: RelationDef) -> Self {
        self.relations.push(relation);
        self
    }

    #[must_use]
    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }

    #[must_use]
    pub fn get_relation(&self, name: &str) -> Option<&RelationDef> {
        self.relations.iter().find(|relation| relation.name == name)
    }

    /// Return the primary-key field if it is declared on the entity.
    #[must_use]
    pub fn get_pk_field(&self) -> Option<&FieldDef> {
        self.get_field(&self.primary_key)
    }
}

///
/// TESTS
///
