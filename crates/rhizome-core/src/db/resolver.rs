use crate::{
    db::{loader::RowLoader, path::PopulatePath, store::RowStore},
    error::{ErrorClass, ErrorDetail, ErrorOrigin, InternalError},
    obs::{self, ExecKind, MetricsEvent, Span},
    record::{Node, Record},
    value::Value,
};
use rhizome_schema::{
    node::{RelationDef, RelationKind},
    registry::{RegistryError, Schema},
};
use thiserror::Error as ThisError;

///
/// ResolveError
///

#[derive(Debug, ThisError)]
pub enum ResolveError {
    #[error("entity '{entity}' has no relation '{relation}'")]
    UnknownRelation { entity: String, relation: String },

    #[error(
        "dangling reference: {entity}.{relation} -> '{target}' key {key} has no row"
    )]
    DanglingReference {
        entity: String,
        relation: String,
        target: String,
        key: Value,
    },

    #[error("row for entity '{entity}' is missing primary-key field '{field}'")]
    MissingPrimaryKey { entity: String, field: String },
}

impl ResolveError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::UnknownRelation { .. } => ErrorClass::Unsupported,
            Self::DanglingReference { .. } => ErrorClass::Corruption,
            Self::MissingPrimaryKey { .. } => ErrorClass::InvariantViolation,
        }
    }

    #[must_use]
    pub const fn origin(&self) -> ErrorOrigin {
        ErrorOrigin::Resolver
    }
}

impl From<ResolveError> for InternalError {
    fn from(err: ResolveError) -> Self {
        Self {
            class: err.class(),
            origin: err.origin(),
            message: err.to_string(),
            detail: Some(ErrorDetail::Resolve(err)),
        }
    }
}

///
/// Resolver
///
/// Walks one population path from a root record, issuing one lookup per
/// segment and stopping at the first absent link. The per-segment walk is
/// linear: a segment that resolves to null is terminal, so nothing past it
/// is looked up.
///

pub struct Resolver<'a, S> {
    schema: &'a Schema,
    loader: RowLoader<'a, S>,
}

impl<'a, S> Resolver<'a, S>
where
    S: RowStore,
{
    #[must_use]
    pub const fn new(schema: &'a Schema, store: &'a S) -> Self {
        Self {
            schema,
            loader: RowLoader::new(store),
        }
    }

    /// Resolve `path` from `root`, returning the node to merge under the
    /// path's first segment: `Null` at the first unresolved link, nested
    /// records for every link actually found.
    pub fn populate(
        &self,
        root: &Record,
        entity: &str,
        path: &PopulatePath,
    ) -> Result<Node, InternalError> {
        let mut span = Span::new(ExecKind::Populate, entity);
        let mut fetched = 0u64;

        let node = self.resolve_segments(root, entity, path.segments(), &mut fetched)?;
        span.set_rows(fetched);

        Ok(node)
    }

    fn resolve_segments(
        &self,
        current: &Record,
        entity: &str,
        segments: &[String],
        fetched: &mut u64,
    ) -> Result<Node, InternalError> {
        let Some((segment, rest)) = segments.split_first() else {
            // populate() is never called with an empty path; parse rejects it.
            return Err(InternalError::resolver_invariant(
                "population path has no segments",
            ));
        };

        let relation = match self.schema.relation(entity, segment) {
            Ok(relation) => relation,
            Err(RegistryError::UnknownRelation(..)) => {
                return Err(ResolveError::UnknownRelation {
                    entity: entity.to_string(),
                    relation: segment.clone(),
                }
                .into());
            }
            Err(err) => return Err(err.into()),
        };

        let related = if relation.kind.is_owning() {
            self.resolve_owning(current, entity, relation)?
        } else {
            self.resolve_inverse(current, entity, relation)?
        };

        let Some(mut row) = related else {
            // Absent link: terminal. The remaining segments are never
            // attempted and trigger no lookups.
            obs::record(MetricsEvent::RelationNull {
                entity: entity.to_string(),
                relation: segment.clone(),
            });
            return Ok(Node::null());
        };
        *fetched = fetched.saturating_add(1);

        if let Some(next) = rest.first() {
            let child = self.resolve_segments(&row, &relation.target, rest, fetched)?;
            row.set(next.clone(), child);
        }

        Ok(Node::Record(row))
    }

    // Owning side: read the local foreign key. Absent or null means the
    // relation is simply not set; a key without a target row is corruption.
    fn resolve_owning(
        &self,
        current: &Record,
        entity: &str,
        relation: &RelationDef,
    ) -> Result<Option<Record>, InternalError> {
        debug_assert!(matches!(
            relation.kind,
            RelationKind::ManyToOne | RelationKind::OneToOneOwning
        ));

        let Some(fk_field) = relation.fk_field.as_deref() else {
            return Err(InternalError::schema_internal(format!(
                "owning relation '{entity}.{}' has no foreign-key field",
                relation.name
            )));
        };

        let fk_value = match current.get_value(fk_field) {
            Some(value) if !value.is_null() => value.clone(),
            _ => return Ok(None),
        };

        let target = self.schema.get(&relation.target)?;
        obs::record(MetricsEvent::RelationLookup {
            entity: entity.to_string(),
        });

        let row = self
            .loader
            .find_by_foreign_key(&relation.target, &target.primary_key, &fk_value)?;
        let Some(row) = row else {
            obs::record(MetricsEvent::DanglingReference {
                entity: entity.to_string(),
                relation: relation.name.clone(),
            });
            return Err(ResolveError::DanglingReference {
                entity: entity.to_string(),
                relation: relation.name.clone(),
                target: relation.target.clone(),
                key: fk_value,
            }
            .into());
        };

        Ok(Some(row))
    }

    // Inverse side: look the owning row up by this record's primary key.
    // Absence is a normal null, not an error.
    fn resolve_inverse(
        &self,
        current: &Record,
        entity: &str,
        relation: &RelationDef,
    ) -> Result<Option<Record>, InternalError> {
        let owning = self.schema.resolve_inverse(entity, relation)?;
        let Some(owning_field) = owning.fk_field.as_deref() else {
            return Err(InternalError::schema_internal(format!(
                "owning counterpart '{}.{}' has no foreign-key field",
                relation.target, owning.name
            )));
        };

        let source = self.schema.get(entity)?;
        let parent_key = match current.get_value(&source.primary_key) {
            Some(value) if !value.is_null() => value.clone(),
            _ => {
                // The current record came out of the store, so its key must
                // be present; anything else is a broken row.
                return Err(ResolveError::MissingPrimaryKey {
                    entity: entity.to_string(),
                    field: source.primary_key.clone(),
                }
                .into());
            }
        };

        obs::record(MetricsEvent::RelationLookup {
            entity: entity.to_string(),
        });

        self.loader
            .find_by_inverse_key(&relation.target, owning_field, &parent_key)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::path::PopulatePath,
        obs::{metrics_report, metrics_reset_all},
        test_support::{badge_row, color_row, fixture_schema, profile_row, user_row},
    };
    use crate::db::store::MemoryStore;
    use proptest::prelude::*;

    fn populate(
        store: &MemoryStore,
        root: &Record,
        path: &str,
    ) -> Result<Node, InternalError> {
        let schema = fixture_schema();
        let resolver = Resolver::new(&schema, store);
        let path = PopulatePath::parse(path).expect("valid path");
        resolver.populate(root, "user", &path)
    }

    fn store_with_user() -> (MemoryStore, Record) {
        let mut store = MemoryStore::new();
        let user = user_row(1, "John");
        store.insert("user", "user_id", &user).expect("insert user");
        (store, user)
    }

    #[test]
    fn absent_inverse_relation_resolves_to_terminal_null() {
        metrics_reset_all();
        let (store, user) = store_with_user();

        let node = populate(&store, &user, "profile.badge.color").expect("populate");
        assert!(node.is_null());

        // Only the inverse lookup for `profile` ran; nothing was attempted
        // for `badge` or `color`.
        let report = metrics_report();
        assert_eq!(report.ops.relation_lookups, 1);
        assert_eq!(report.ops.relation_nulls, 1);
    }

    #[test]
    fn owning_relation_with_null_foreign_key_short_circuits_without_lookups() {
        metrics_reset_all();
        let mut store = MemoryStore::new();
        let user = user_row(1, "John");
        store.insert("user", "user_id", &user).expect("insert user");
        let profile = Record::new().with("user", 1).with("badge_id", Value::Null);
        store.insert("profile", "user", &profile).expect("insert profile");

        let node = populate(&store, &user, "profile.badge.color").expect("populate");
        let profile_node = node.as_record().expect("profile resolved");
        assert!(profile_node.get("badge").is_some_and(Node::is_null));

        // One lookup for profile, none for badge (null fk), none for color.
        let report = metrics_report();
        assert_eq!(report.ops.relation_lookups, 1);
        assert_eq!(report.ops.relation_nulls, 1);
    }

    #[test]
    fn full_chain_resolves_into_nested_records() {
        let mut store = MemoryStore::new();
        let user = user_row(1, "John");
        store.insert("user", "user_id", &user).expect("user");
        store
            .insert("profile", "user", &profile_row(1, 7))
            .expect("profile");
        store
            .insert("badge", "badge_id", &badge_row(7, "gold", 3))
            .expect("badge");
        store
            .insert("color", "color_id", &color_row(3, "red"))
            .expect("color");

        let node = populate(&store, &user, "profile.badge.color").expect("populate");

        let profile = node.as_record().expect("profile record");
        assert_eq!(profile.get_value("user"), Some(&Value::Int(1)));
        let badge = profile
            .get("badge")
            .and_then(Node::as_record)
            .expect("badge record");
        assert_eq!(badge.get_value("name"), Some(&Value::Text("gold".into())));
        let color = badge
            .get("color")
            .and_then(Node::as_record)
            .expect("color record");
        assert_eq!(color.get_value("name"), Some(&Value::Text("red".into())));

        // Read-only: running the same populate twice is structurally equal.
        let again = populate(&store, &user, "profile.badge.color").expect("populate");
        assert_eq!(again, node);
    }

    #[test]
    fn dangling_foreign_key_is_an_error_not_null() {
        metrics_reset_all();
        let mut store = MemoryStore::new();
        let user = user_row(1, "John");
        store.insert("user", "user_id", &user).expect("user");
        // Profile points at badge 7, which does not exist.
        store
            .insert("profile", "user", &profile_row(1, 7))
            .expect("profile");

        let err = populate(&store, &user, "profile.badge.color")
            .expect_err("dangling reference must fail");
        assert!(err.is_corruption());
        assert!(matches!(
            err.detail,
            Some(ErrorDetail::Resolve(ResolveError::DanglingReference { .. }))
        ));

        assert_eq!(metrics_report().ops.dangling_references, 1);
    }

    #[test]
    fn unknown_relation_segment_is_rejected() {
        let (store, user) = store_with_user();

        let err = populate(&store, &user, "settings").expect_err("unknown relation");
        assert!(matches!(
            err.detail,
            Some(ErrorDetail::Resolve(ResolveError::UnknownRelation { .. }))
        ));
        assert!(err.message.contains("no relation 'settings'"));
    }

    #[test]
    fn root_without_primary_key_value_is_an_invariant_violation() {
        let (store, _) = store_with_user();
        let broken_root = Record::new().with("name", "John");

        let err = populate(&store, &broken_root, "profile").expect_err("broken root");
        assert!(matches!(
            err.detail,
            Some(ErrorDetail::Resolve(ResolveError::MissingPrimaryKey { .. }))
        ));
    }

    // One link of the fixture chain, as stored:
    // - Unset: the foreign key toward it is null (inverse: no row exists)
    // - Missing: the foreign key is set but the target row is absent
    // - Present: the target row exists
    #[derive(Clone, Copy, Debug)]
    enum Link {
        Unset,
        Missing,
        Present,
    }

    fn link_strategy() -> impl Strategy<Value = Link> {
        prop_oneof![Just(Link::Unset), Just(Link::Missing), Just(Link::Present)]
    }

    proptest! {
        // Property: the populated tree nests exactly as deep as the chain of
        // present links, terminates with null at the first unset link, and
        // raises a corruption error iff a set key has no target row.
        #[test]
        fn population_depth_matches_the_stored_chain(
            profile in link_strategy(),
            badge in link_strategy(),
            color in link_strategy(),
        ) {
            let mut store = MemoryStore::new();
            let user = user_row(1, "John");
            store.insert("user", "user_id", &user).expect("user");

            // `profile` is reached through an inverse relation, so a set-but-
            // missing row is indistinguishable from an unset one: absence is
            // a normal null, never dangling.
            let profile_stored = matches!(profile, Link::Present);
            if profile_stored {
                let badge_fk = match badge {
                    Link::Unset => Value::Null,
                    Link::Missing | Link::Present => Value::Int(7),
                };
                let row = Record::new().with("user", 1).with("badge_id", badge_fk);
                store.insert("profile", "user", &row).expect("profile");
            }
            let badge_stored = profile_stored && matches!(badge, Link::Present);
            if badge_stored {
                let color_fk = match color {
                    Link::Unset => Value::Null,
                    Link::Missing | Link::Present => Value::Int(3),
                };
                let row = Record::new()
                    .with("badge_id", 7)
                    .with("name", "gold")
                    .with("color_id", color_fk);
                store.insert("badge", "badge_id", &row).expect("badge");
            }
            let color_stored = badge_stored && matches!(color, Link::Present);
            if color_stored {
                store.insert("color", "color_id", &color_row(3, "red")).expect("color");
            }

            let result = populate(&store, &user, "profile.badge.color");

            // A dangling link is any set foreign key whose row is absent.
            // The walk fails at the first one it actually reaches.
            let badge_dangles = profile_stored && matches!(badge, Link::Missing);
            let color_dangles = badge_stored && matches!(color, Link::Missing);

            if badge_dangles || color_dangles {
                let err = result.expect_err("set key without target row must fail");
                prop_assert!(err.is_corruption());
                return Ok(());
            }

            let node = result.expect("populate succeeds");
            if !profile_stored {
                prop_assert!(node.is_null());
                return Ok(());
            }

            let profile_node = node.as_record().expect("profile record");
            let badge_node = profile_node.get("badge").expect("badge slot");
            if !badge_stored {
                prop_assert!(badge_node.is_null());
                return Ok(());
            }

            let badge_record = badge_node.as_record().expect("badge record");
            let color_node = badge_record.get("color").expect("color slot");
            if color_stored {
                prop_assert!(color_node.as_record().is_some());
            } else {
                prop_assert!(color_node.is_null());
            }
        }
    }
}
