use crate::error::{ErrorClass, ErrorOrigin, InternalError};
use std::fmt;
use thiserror::Error as ThisError;

///
/// PathError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum PathError {
    #[error("population path is empty")]
    Empty,

    #[error("population path '{path}' has an empty segment")]
    EmptySegment { path: String },

    #[error("population path segment '{segment}' is not a valid relation identifier")]
    InvalidSegment { segment: String },
}

impl From<PathError> for InternalError {
    fn from(err: PathError) -> Self {
        Self::new(
            ErrorClass::Unsupported,
            ErrorOrigin::Interface,
            err.to_string(),
        )
    }
}

///
/// PopulatePath
///
/// Parsed dotted relation path (`"profile.badge.color"`). Segments are
/// validated identifiers; a parsed path is never empty.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PopulatePath {
    segments: Vec<String>,
}

impl PopulatePath {
    pub fn parse(path: &str) -> Result<Self, PathError> {
        if path.is_empty() {
            return Err(PathError::Empty);
        }

        let mut segments = Vec::new();
        for segment in path.split('.') {
            if segment.is_empty() {
                return Err(PathError::EmptySegment {
                    path: path.to_string(),
                });
            }
            if !is_relation_ident(segment) {
                return Err(PathError::InvalidSegment {
                    segment: segment.to_string(),
                });
            }
            segments.push(segment.to_string());
        }

        Ok(Self { segments })
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for PopulatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

// Same identifier discipline the schema's naming validation enforces.
fn is_relation_ident(segment: &str) -> bool {
    let mut chars = segment.chars();
    chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_paths_parse_into_segments() {
        let path = PopulatePath::parse("profile.badge.color").expect("valid path");
        assert_eq!(path.segments(), ["profile", "badge", "color"]);
        assert_eq!(path.len(), 3);
        assert_eq!(path.to_string(), "profile.badge.color");
    }

    #[test]
    fn single_segment_paths_are_valid() {
        let path = PopulatePath::parse("profile").expect("valid path");
        assert_eq!(path.segments(), ["profile"]);
    }

    #[test]
    fn empty_path_is_rejected() {
        assert_eq!(PopulatePath::parse(""), Err(PathError::Empty));
    }

    #[test]
    fn empty_segments_are_rejected() {
        assert!(matches!(
            PopulatePath::parse("profile..badge"),
            Err(PathError::EmptySegment { .. })
        ));
        assert!(matches!(
            PopulatePath::parse(".profile"),
            Err(PathError::EmptySegment { .. })
        ));
    }

    #[test]
    fn malformed_segments_are_rejected() {
        for path in ["Profile", "profile.2badge", "profile.bad-ge"] {
            assert!(
                matches!(
                    PopulatePath::parse(path),
                    Err(PathError::InvalidSegment { .. })
                ),
                "expected '{path}' to be rejected"
            );
        }
    }
}
