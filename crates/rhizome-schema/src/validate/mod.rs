//! Schema validation orchestration and shared helpers.

pub mod naming;
pub mod relation;

use crate::{err, error::ErrorTree, node::EntityDef};
use std::collections::BTreeMap;

/// Run full schema validation in a staged, deterministic order.
pub(crate) fn validate_schema(entities: &BTreeMap<String, EntityDef>) -> Result<(), ErrorTree> {
    let mut errors = ErrorTree::new();

    // Phase 1: validate each entity (naming + local structural invariants).
    for entity in entities.values() {
        naming::validate_entity_naming(entity, &mut errors);
        validate_entity(entity, &mut errors);
    }

    // Phase 2: enforce schema-wide relation invariants.
    relation::validate_relations(entities, &mut errors);

    errors.result()
}

// Local invariants that need no view of other entities.
fn validate_entity(entity: &EntityDef, errs: &mut ErrorTree) {
    if entity.primary_key.is_empty() {
        err!(errs, "entity '{0}' declares no primary key", entity.name);
    } else if entity.get_pk_field().is_none() {
        err!(
            errs,
            "entity '{0}' primary key '{1}' is not a declared field",
            entity.name,
            entity.primary_key
        );
    }

    for (index, field) in entity.fields.iter().enumerate() {
        let first = entity
            .fields
            .iter()
            .position(|other| other.name == field.name);
        if first != Some(index) {
            err!(
                errs,
                "entity '{0}' declares field '{1}' more than once",
                entity.name,
                field.name
            );
        }
    }

    for (index, relation) in entity.relations.iter().enumerate() {
        let first = entity
            .relations
            .iter()
            .position(|other| other.name == relation.name);
        if first != Some(index) {
            err!(
                errs,
                "entity '{0}' declares relation '{1}' more than once",
                entity.name,
                relation.name
            );
        }
    }
}

///
/// TESTS
///
