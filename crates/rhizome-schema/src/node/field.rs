use serde::Serialize;

///
/// FieldKind
///
/// Scalar shape of one entity field, aligned with the runtime value
/// variants.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum FieldKind {
    Blob,
    Bool,
    Int,
    Text,
}

///
/// FieldDef
///

#[derive(Clone, Debug, Serialize)]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldDef {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}
