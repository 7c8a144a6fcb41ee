use crate::{
    db::{filter::Filter, store::RowStore},
    error::InternalError,
    record::Record,
    value::Value,
};

///
/// RowLoader
///
/// Read-only lookup layer over the store boundary. All three lookups reduce
/// to the single `query` primitive; none of them mutate anything.
///

pub struct RowLoader<'a, S> {
    store: &'a S,
}

impl<'a, S> RowLoader<'a, S>
where
    S: RowStore,
{
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// First row matching `filter`, or a typed NotFound; never a silent
    /// miss.
    pub fn find_one(&self, entity: &str, filter: &Filter) -> Result<Record, InternalError> {
        let mut rows = self.store.query(entity, filter)?;
        if rows.is_empty() {
            return Err(InternalError::store_not_found(entity, &filter.to_string()));
        }

        Ok(rows.remove(0))
    }

    /// Zero-or-one row for an owning to-one lookup through `key_field`
    /// (the target's primary key).
    pub fn find_by_foreign_key(
        &self,
        entity: &str,
        key_field: &str,
        value: &Value,
    ) -> Result<Option<Record>, InternalError> {
        self.find_unique(entity, key_field, value)
    }

    /// Zero-or-one row for an inverse (`mapped_by`) to-one lookup keyed by
    /// the parent's primary key.
    pub fn find_by_inverse_key(
        &self,
        entity: &str,
        inverse_field: &str,
        parent_key: &Value,
    ) -> Result<Option<Record>, InternalError> {
        self.find_unique(entity, inverse_field, parent_key)
    }

    // To-one lookups promise zero-or-one; more than one match means the
    // store no longer upholds the uniqueness the schema relies on.
    fn find_unique(
        &self,
        entity: &str,
        field: &str,
        value: &Value,
    ) -> Result<Option<Record>, InternalError> {
        let mut rows = self
            .store
            .query(entity, &Filter::new().eq(field, value.clone()))?;

        match rows.len() {
            0 => Ok(None),
            1 => Ok(Some(rows.remove(0))),
            found => Err(InternalError::store_corruption(format!(
                "{found} rows matched to-one lookup {entity}.{field} = {value}"
            ))),
        }
    }
}

///
/// TESTS
///
