use serde::Serialize;

///
/// RelationKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum RelationKind {
    /// Many-to-one; this entity holds the foreign-key field.
    ManyToOne,
    /// One-to-one, owning side; this entity holds the foreign-key field.
    OneToOneOwning,
    /// One-to-one, mapped side; the target holds the foreign key and this
    /// entity references the relation only logically (`mapped_by`).
    OneToOneInverse,
}

impl RelationKind {
    /// Whether this side holds the physical foreign-key field.
    #[must_use]
    pub const fn is_owning(self) -> bool {
        matches!(self, Self::ManyToOne | Self::OneToOneOwning)
    }
}

///
/// RelationDef
///
/// One to-one relation edge declared on a source entity. Owning kinds carry
/// the local foreign-key field; the inverse kind carries the field of the
/// owning counterpart on the target (`mapped_by`).
///

#[derive(Clone, Debug, Serialize)]
pub struct RelationDef {
    pub name: String,
    pub kind: RelationKind,
    pub target: String,

    /// Local foreign-key field (owning kinds only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fk_field: Option<String>,

    /// Foreign-key field of the owning counterpart on the target (inverse
    /// kind only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapped_by: Option<String>,
}

impl RelationDef {
    #[must_use]
    pub fn many_to_one(
        name: impl Into<String>,
        target: impl Into<String>,
        fk_field: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: RelationKind::ManyToOne,
            target: target.into(),
            fk_field: Some(fk_field.into()),
            mapped_by: None,
        }
    }

    #[must_use]
    pub fn one_to_one_owning(
        name: impl Into<String>,
        target: impl Into<String>,
        fk_field: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: RelationKind::OneToOneOwning,
            target: target.into(),
            fk_field: Some(fk_field.into()),
            mapped_by: None,
        }
    }

    #[must_use]
    pub fn one_to_one_inverse(
        name: impl Into<String>,
        target: impl Into<String>,
        mapped_by: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: RelationKind::OneToOneInverse,
            target: target.into(),
            fk_field: None,
            mapped_by: Some(mapped_by.into()),
        }
    }
}
