//! Shared test fixtures: the user → profile → badge → color chain used by
//! resolver and session tests.

use crate::record::Record;
use rhizome_schema::{
    node::{EntityDef, FieldKind, RelationDef},
    registry::{Schema, SchemaBuilder},
};

pub(crate) fn fixture_schema() -> Schema {
    let mut builder = SchemaBuilder::new();

    builder
        .register(
            EntityDef::new("user")
                .field("user_id", FieldKind::Int)
                .field("name", FieldKind::Text)
                .primary_key("user_id")
                .relation(RelationDef::one_to_one_inverse("profile", "profile", "user")),
        )
        .expect("register user");

    builder
        .register(
            EntityDef::new("profile")
                .field("user", FieldKind::Int)
                .field("badge_id", FieldKind::Int)
                .primary_key("user")
                .relation(RelationDef::one_to_one_owning("user", "user", "user"))
                .relation(RelationDef::many_to_one("badge", "badge", "badge_id")),
        )
        .expect("register profile");

    builder
        .register(
            EntityDef::new("badge")
                .field("badge_id", FieldKind::Int)
                .field("name", FieldKind::Text)
                .field("color_id", FieldKind::Int)
                .primary_key("badge_id")
                .relation(RelationDef::many_to_one("color", "color", "color_id")),
        )
        .expect("register badge");

    builder
        .register(
            EntityDef::new("color")
                .field("color_id", FieldKind::Int)
                .field("name", FieldKind::Text)
                .primary_key("color_id"),
        )
        .expect("register color");

    builder.build().expect("fixture schema must build")
}

pub(crate) fn user_row(user_id: i64, name: &str) -> Record {
    Record::new().with("user_id", user_id).with("name", name)
}

pub(crate) fn profile_row(user: i64, badge_id: i64) -> Record {
    Record::new().with("user", user).with("badge_id", badge_id)
}

pub(crate) fn badge_row(badge_id: i64, name: &str, color_id: i64) -> Record {
    Record::new()
        .with("badge_id", badge_id)
        .with("name", name)
        .with("color_id", color_id)
}

pub(crate) fn color_row(color_id: i64, name: &str) -> Record {
    Record::new().with("color_id", color_id).with("name", name)
}
