use crate::{
    MAX_ENTITY_NAME_LEN, MAX_FIELD_NAME_LEN, MAX_RELATION_NAME_LEN, err, error::ErrorTree,
    node::EntityDef,
};

// Shared identifier rule: lowercase snake_case ASCII, starting with a letter.
fn is_valid_ident(ident: &str) -> bool {
    let mut chars = ident.chars();
    chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

fn validate_ident(errs: &mut ErrorTree, context: &str, ident: &str, max_len: usize) {
    if ident.is_empty() {
        err!(errs, "{context} name must not be empty");
        return;
    }
    if ident.len() > max_len {
        err!(
            errs,
            "{context} name '{ident}' exceeds {max_len} characters"
        );
    }
    if !is_valid_ident(ident) {
        err!(
            errs,
            "{context} name '{ident}' must be lowercase snake_case ASCII starting with a letter"
        );
    }
}

/// Enforce identifier rules for one entity and everything it declares.
pub(crate) fn validate_entity_naming(entity: &EntityDef, errs: &mut ErrorTree) {
    validate_ident(errs, "entity", &entity.name, MAX_ENTITY_NAME_LEN);

    for field in &entity.fields {
        let context = format!("entity '{}' field", entity.name);
        validate_ident(errs, &context, &field.name, MAX_FIELD_NAME_LEN);
    }

    for relation in &entity.relations {
        let context = format!("entity '{}' relation", entity.name);
        validate_ident(errs, &context, &relation.name, MAX_RELATION_NAME_LEN);
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{EntityDef, FieldKind};

    #[test]
    fn well_formed_identifiers_pass() {
        let entity = EntityDef::new("user_profile2")
            .field("user_id", FieldKind::Int)
            .primary_key("user_id");
        let mut errs = ErrorTree::new();
        validate_entity_naming(&entity, &mut errs);
        assert!(errs.is_empty(), "unexpected errors: {errs}");
    }

    #[test]
    fn uppercase_and_leading_digit_identifiers_fail() {
        let entity = EntityDef::new("User").field("1st", FieldKind::Int);
        let mut errs = ErrorTree::new();
        validate_entity_naming(&entity, &mut errs);
        assert_eq!(errs.len(), 2, "expected two naming failures: {errs}");
    }

    #[test]
    fn over_long_identifiers_fail() {
        let name = "a".repeat(MAX_ENTITY_NAME_LEN + 1);
        let entity = EntityDef::new(name);
        let mut errs = ErrorTree::new();
        validate_entity_naming(&entity, &mut errs);
        assert!(errs.iter().any(|m| m.contains("exceeds")));
    }
}
