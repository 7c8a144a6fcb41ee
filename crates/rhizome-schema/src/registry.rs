use crate::{
    Error,
    node::{EntityDef, RelationDef},
    validate::{relation::owning_counterparts, validate_schema},
};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

///
/// RegistryError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum RegistryError {
    #[error("entity '{0}' already registered")]
    DuplicateEntity(String),

    #[error("unknown entity '{0}'")]
    UnknownEntity(String),

    #[error("entity '{0}' has no relation '{1}'")]
    UnknownRelation(String, String),

    #[error("inverse relation '{0}.{1}' has no single owning counterpart on '{2}'")]
    BrokenMapping(String, String, String),
}

///
/// SchemaBuilder
///
/// Mutable registration surface. Definitions are collected here and
/// validated as one unit by [`Self::build`]; queries only ever see a
/// validated [`Schema`].
///

#[derive(Debug, Default)]
pub struct SchemaBuilder {
    entities: BTreeMap<String, EntityDef>,
}

impl SchemaBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one entity definition.
    pub fn register(&mut self, entity: EntityDef) -> Result<(), RegistryError> {
        if self.entities.contains_key(&entity.name) {
            return Err(RegistryError::DuplicateEntity(entity.name));
        }

        self.entities.insert(entity.name.clone(), entity);
        Ok(())
    }

    /// Validate every registered definition and freeze the schema.
    ///
    /// Mapping errors surface here, before any query runs; a schema that
    /// fails to build is unusable by construction.
    pub fn build(self) -> Result<Schema, Error> {
        validate_schema(&self.entities).map_err(Error::Validation)?;

        Ok(Schema {
            entities: self.entities,
        })
    }
}

///
/// Schema
///
/// Immutable, validated entity registry. Read-only after build, so it can be
/// shared across concurrent callers without locking.
///

#[derive(Clone, Debug)]
pub struct Schema {
    entities: BTreeMap<String, EntityDef>,
}

impl Schema {
    /// Look up an entity definition by name.
    pub fn get(&self, name: &str) -> Result<&EntityDef, RegistryError> {
        self.entities
            .get(name)
            .ok_or_else(|| RegistryError::UnknownEntity(name.to_string()))
    }

    /// Look up a relation descriptor declared on `entity`.
    pub fn relation(&self, entity: &str, relation: &str) -> Result<&RelationDef, RegistryError> {
        self.get(entity)?.get_relation(relation).ok_or_else(|| {
            RegistryError::UnknownRelation(entity.to_string(), relation.to_string())
        })
    }

    /// Resolve the owning-side counterpart of an inverse descriptor.
    ///
    /// Guaranteed to succeed for descriptors of a built schema; kept
    /// fallible so hand-constructed descriptors fail instead of panicking.
    pub fn resolve_inverse(
        &self,
        source: &str,
        relation: &RelationDef,
    ) -> Result<&RelationDef, RegistryError> {
        let broken = || {
            RegistryError::BrokenMapping(
                source.to_string(),
                relation.name.clone(),
                relation.target.clone(),
            )
        };

        let Some(mapped_by) = relation.mapped_by.as_deref() else {
            return Err(broken());
        };
        let target = self.get(&relation.target)?;

        match owning_counterparts(target, source, mapped_by).as_slice() {
            [owner] => Ok(*owner),
            _ => Err(broken()),
        }
    }

    /// Iterate entity definitions in name order.
    pub fn entities(&self) -> impl Iterator<Item = &EntityDef> {
        self.entities.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

///
/// TESTS
///
