use crate::db::resolver::ResolveError;
use rhizome_schema::registry::RegistryError;
use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured runtime error with a stable internal classification.
/// Every subsystem error converts into this shape at the public boundary.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    /// The variant (if present) must correspond to `origin`.
    pub detail: Option<ErrorDetail>,
}

impl InternalError {
    /// Construct an error with no structured detail.
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    /// Root lookup failure: typed, never a silent miss.
    pub(crate) fn store_not_found(entity: &str, filter: &str) -> Self {
        Self {
            class: ErrorClass::NotFound,
            origin: ErrorOrigin::Store,
            message: format!("no '{entity}' row matches {filter}"),
            detail: Some(ErrorDetail::Store(StoreError::NotFound {
                entity: entity.to_string(),
                filter: filter.to_string(),
            })),
        }
    }

    /// Construct a store-origin corruption error.
    pub(crate) fn store_corruption(message: impl Into<String>) -> Self {
        let message = message.into();

        Self {
            class: ErrorClass::Corruption,
            origin: ErrorOrigin::Store,
            message: message.clone(),
            detail: Some(ErrorDetail::Store(StoreError::Corrupt { message })),
        }
    }

    /// Construct a store-origin invariant violation.
    pub(crate) fn store_invariant(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::InvariantViolation,
            ErrorOrigin::Store,
            message.into(),
        )
    }

    /// Construct a store-origin duplicate-key conflict.
    pub(crate) fn store_duplicate_key(key: impl Into<String>) -> Self {
        let key = key.into();

        Self {
            class: ErrorClass::Conflict,
            origin: ErrorOrigin::Store,
            message: format!("duplicate row key: {key}"),
            detail: Some(ErrorDetail::Store(StoreError::DuplicateKey { key })),
        }
    }

    /// Construct a resolver-origin invariant violation.
    pub(crate) fn resolver_invariant(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::InvariantViolation,
            ErrorOrigin::Resolver,
            message.into(),
        )
    }

    /// Construct a schema-origin internal error.
    pub(crate) fn schema_internal(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Schema, message.into())
    }

    /// Construct a serialize-origin internal error.
    pub(crate) fn serialize_internal(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Serialize, message.into())
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.class, ErrorClass::NotFound)
    }

    #[must_use]
    pub const fn is_corruption(&self) -> bool {
        matches!(self.class, ErrorClass::Corruption)
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

impl From<RegistryError> for InternalError {
    fn from(err: RegistryError) -> Self {
        let class = match err {
            RegistryError::DuplicateEntity(_) => ErrorClass::Conflict,
            RegistryError::UnknownEntity(_) | RegistryError::UnknownRelation(..) => {
                ErrorClass::Unsupported
            }
            RegistryError::BrokenMapping(..) => ErrorClass::InvariantViolation,
        };

        Self::new(class, ErrorOrigin::Schema, err.to_string())
    }
}

///
/// ErrorDetail
///
/// Structured, origin-specific error detail carried by [`InternalError`].
/// This enum is intentionally extensible.
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    Store(StoreError),
    #[error("{0}")]
    Resolve(ResolveError),
}

///
/// StoreError
///
/// Store-specific structured error detail.
/// Never returned directly; always wrapped in [`ErrorDetail::Store`].
///

#[derive(Debug, ThisError)]
pub enum StoreError {
    #[error("no '{entity}' row matches {filter}")]
    NotFound { entity: String, filter: String },

    #[error("store corruption: {message}")]
    Corrupt { message: String },

    #[error("duplicate row key: {key}")]
    DuplicateKey { key: String },
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Corruption,
    NotFound,
    Internal,
    Conflict,
    Unsupported,
    InvariantViolation,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Corruption => "corruption",
            Self::NotFound => "not_found",
            Self::Internal => "internal",
            Self::Conflict => "conflict",
            Self::Unsupported => "unsupported",
            Self::InvariantViolation => "invariant_violation",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Serialize,
    Store,
    Loader,
    Resolver,
    Schema,
    Interface,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Serialize => "serialize",
            Self::Store => "store",
            Self::Loader => "loader",
            Self::Resolver => "resolver",
            Self::Schema => "schema",
            Self::Interface => "interface",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_carries_store_detail() {
        let err = InternalError::store_not_found("user", "name = \"John\"");
        assert!(err.is_not_found());
        assert!(matches!(
            err.detail,
            Some(ErrorDetail::Store(StoreError::NotFound { .. }))
        ));
        assert_eq!(
            err.display_with_class(),
            "store:not_found: no 'user' row matches name = \"John\""
        );
    }

    #[test]
    fn registry_errors_map_to_schema_origin() {
        let err: InternalError = RegistryError::UnknownEntity("account".to_string()).into();
        assert_eq!(err.origin, ErrorOrigin::Schema);
        assert_eq!(err.class, ErrorClass::Unsupported);
        assert!(err.message.contains("unknown entity 'account'"));
    }
}
