use crate::{
    db::{
        assemble::assemble, filter::Filter, loader::RowLoader, path::PopulatePath,
        resolver::Resolver, store::RowStore,
    },
    error::InternalError,
    obs::{ExecKind, Span},
    record::{Node, Record},
    value::Value,
};
use rhizome_schema::registry::Schema;
use std::sync::Arc;

///
/// Session
///
/// Binds one immutable schema to one store. The schema is read-only after
/// build, so sessions can be shared across concurrent callers freely.
///

pub struct Session<S> {
    schema: Arc<Schema>,
    store: S,
}

impl<S> Session<S>
where
    S: RowStore,
{
    #[must_use]
    pub const fn new(schema: Arc<Schema>, store: S) -> Self {
        Self { schema, store }
    }

    #[must_use]
    pub const fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Start a fluent load query against `entity`.
    #[must_use]
    pub fn load(&self, entity: impl Into<String>) -> LoadQuery<'_, S> {
        LoadQuery {
            session: self,
            entity: entity.into(),
            filter: Filter::new(),
            populate: Vec::new(),
        }
    }
}

///
/// LoadQuery
///
/// Session-bound fluent load wrapper. Owns filter and population intent
/// only; lookups happen in the execution terminals.
///

pub struct LoadQuery<'a, S> {
    session: &'a Session<S>,
    entity: String,
    filter: Filter,
    populate: Vec<String>,
}

impl<S> LoadQuery<'_, S>
where
    S: RowStore,
{
    /// Add one `field = value` filter clause.
    #[must_use]
    pub fn filter_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter = self.filter.eq(field, value);
        self
    }

    /// Add one dotted population path, parsed and validated at execution.
    #[must_use]
    pub fn populate(mut self, path: impl Into<String>) -> Self {
        self.populate.push(path.into());
        self
    }

    /// Execute and return the first match, fully populated.
    ///
    /// A zero-row result is a typed NotFound, never a silent miss; it stays
    /// distinct from a populated-but-null relation.
    pub fn one(&self) -> Result<Record, InternalError> {
        let mut span = Span::new(ExecKind::Load, self.entity.as_str());

        // Unknown entities fail here, before the store can mask them as an
        // empty scan.
        self.session.schema.get(&self.entity)?;

        let loader = RowLoader::new(&self.session.store);
        let root = loader.find_one(&self.entity, &self.filter)?;
        let populated = self.resolve_paths(&root)?;
        span.set_rows(1);

        Ok(assemble(&root, populated))
    }

    /// Execute and return the first match, or `None` when no row matches.
    pub fn one_opt(&self) -> Result<Option<Record>, InternalError> {
        match self.one() {
            Ok(record) => Ok(Some(record)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn resolve_paths(&self, root: &Record) -> Result<Vec<(PopulatePath, Node)>, InternalError> {
        let resolver = Resolver::new(&self.session.schema, &self.session.store);

        let mut resolved = Vec::with_capacity(self.populate.len());
        for raw in &self.populate {
            let path = PopulatePath::parse(raw)?;
            let node = resolver.populate(root, &self.entity, &path)?;
            resolved.push((path, node));
        }

        Ok(resolved)
    }
}

///
/// TESTS
///
