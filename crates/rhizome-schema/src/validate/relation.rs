use crate::{
    err,
    error::ErrorTree,
    node::{EntityDef, RelationDef},
};
use std::collections::BTreeMap;

// Validate every relation edge against the full entity map: targets must be
// registered, owning sides must name a declared foreign-key field, and each
// inverse side must pair with exactly one owning counterpart.
pub(crate) fn validate_relations(entities: &BTreeMap<String, EntityDef>, errs: &mut ErrorTree) {
    for entity in entities.values() {
        for relation in &entity.relations {
            let Some(target) = entities.get(&relation.target) else {
                err!(
                    errs,
                    "entity '{0}', relation '{1}', targets unknown entity '{2}'",
                    entity.name,
                    relation.name,
                    relation.target
                );
                continue;
            };

            if relation.kind.is_owning() {
                validate_owning(entity, relation, errs);
            } else {
                validate_inverse(entity, target, relation, errs);
            }
        }
    }
}

// Owning side: the foreign-key field must exist on the source entity.
fn validate_owning(entity: &EntityDef, relation: &RelationDef, errs: &mut ErrorTree) {
    let Some(fk_field) = relation.fk_field.as_deref() else {
        err!(
            errs,
            "entity '{0}', owning relation '{1}', declares no foreign-key field",
            entity.name,
            relation.name
        );
        return;
    };

    if entity.get_field(fk_field).is_none() {
        err!(
            errs,
            "entity '{0}', relation '{1}', names undeclared foreign-key field '{2}'",
            entity.name,
            relation.name,
            fk_field
        );
    }
}

// Inverse side: exactly one owning counterpart must exist on the target,
// so mapping errors surface at build time rather than at query time.
fn validate_inverse(
    entity: &EntityDef,
    target: &EntityDef,
    relation: &RelationDef,
    errs: &mut ErrorTree,
) {
    let Some(mapped_by) = relation.mapped_by.as_deref() else {
        err!(
            errs,
            "entity '{0}', inverse relation '{1}', declares no mapped-by field",
            entity.name,
            relation.name
        );
        return;
    };

    let owners = owning_counterparts(target, &entity.name, mapped_by);
    if owners.len() != 1 {
        err!(
            errs,
            "entity '{0}', inverse relation '{1}', has {2} owning counterpart(s) on '{3}' for mapped-by field '{4}' (expected exactly one)",
            entity.name,
            relation.name,
            owners.len(),
            target.name,
            mapped_by
        );
    }
}

/// Owning relations on `target` that point back at `source` through the
/// `mapped_by` foreign-key field.
pub(crate) fn owning_counterparts<'a>(
    target: &'a EntityDef,
    source: &str,
    mapped_by: &str,
) -> Vec<&'a RelationDef> {
    target
        .relations
        .iter()
        .filter(|relation| {
            relation.kind.is_owning()
                && relation.target == source
                && relation.fk_field.as_deref() == Some(mapped_by)
        })
        .collect()
}

///
/// TESTS
///
