mod memory;

pub use memory::{DataKey, MAX_ROW_BYTES, MemoryStore, RawRow};

use crate::{db::filter::Filter, error::InternalError, record::Record};

///
/// RowStore
///
/// Minimal store boundary the engine consumes. `query` is the only I/O
/// primitive; the row loader is built entirely on top of it. Lookups are
/// read-only and side-effect-free beyond the query itself.
///

pub trait RowStore {
    /// Return every row of `entity` matching `filter`, in primary-key order.
    fn query(&self, entity: &str, filter: &Filter) -> Result<Vec<Record>, InternalError>;
}
