use crate::{record::Record, value::Value};
use std::fmt;

///
/// Filter
///
/// Conjunctive field-equality filter: the only predicate shape the store
/// boundary requires. An empty filter matches every row.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Filter {
    clauses: Vec<(String, Value)>,
}

impl Filter {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            clauses: Vec::new(),
        }
    }

    /// Add one `field = value` clause.
    #[must_use]
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push((field.into(), value.into()));
        self
    }

    /// Whether every clause matches the record's scalar fields.
    ///
    /// A clause against a missing or nested field never matches; an explicit
    /// `Null` clause matches an explicit null field.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        self.clauses
            .iter()
            .all(|(field, value)| record.get_value(field) == Some(value))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    #[must_use]
    pub fn clauses(&self) -> &[(String, Value)] {
        &self.clauses
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.clauses.is_empty() {
            return write!(f, "<all rows>");
        }

        for (index, (field, value)) in self.clauses.iter().enumerate() {
            if index > 0 {
                write!(f, " and ")?;
            }
            write!(f, "{field} = {value}")?;
        }
        Ok(())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_matches_any_row() {
        let row = Record::new().with("user_id", 1);
        assert!(Filter::new().matches(&row));
    }

    #[test]
    fn all_clauses_must_match() {
        let row = Record::new().with("user_id", 1).with("name", "John");

        assert!(Filter::new().eq("name", "John").matches(&row));
        assert!(
            Filter::new()
                .eq("name", "John")
                .eq("user_id", 1)
                .matches(&row)
        );
        assert!(!Filter::new().eq("name", "Jane").matches(&row));
        assert!(!Filter::new().eq("missing", 1).matches(&row));
    }

    #[test]
    fn null_clause_matches_explicit_null_only() {
        let row = Record::new().with("badge_id", Value::Null);

        assert!(Filter::new().eq("badge_id", Value::Null).matches(&row));
        assert!(!Filter::new().eq("other", Value::Null).matches(&row));
    }

    #[test]
    fn display_renders_clauses_for_diagnostics() {
        let filter = Filter::new().eq("name", "John").eq("user_id", 1);
        assert_eq!(filter.to_string(), "name = \"John\" and user_id = 1");
        assert_eq!(Filter::new().to_string(), "<all rows>");
    }
}
