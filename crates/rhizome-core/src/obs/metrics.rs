use crate::obs::sink::{ExecKind, MetricsEvent};
use std::{cell::RefCell, collections::BTreeMap};

thread_local! {
    static STATE: RefCell<MetricsSnapshot> = RefCell::new(MetricsSnapshot::default());
}

///
/// OpCounters
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct OpCounters {
    pub load_calls: u64,
    pub populate_calls: u64,
    pub rows_loaded: u64,
    pub rows_scanned: u64,
    pub relation_lookups: u64,
    pub relation_nulls: u64,
    pub dangling_references: u64,
}

///
/// MetricsSnapshot
///
/// Aggregate counters plus a per-entity breakdown.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MetricsSnapshot {
    pub ops: OpCounters,
    pub entities: BTreeMap<String, OpCounters>,
}

impl MetricsSnapshot {
    // Apply one event to both the aggregate and the per-entity counters.
    pub(super) fn apply(&mut self, event: MetricsEvent) {
        match event {
            MetricsEvent::ExecStart { kind, entity } => {
                for counters in self.both(&entity) {
                    match kind {
                        ExecKind::Load => {
                            counters.load_calls = counters.load_calls.saturating_add(1);
                        }
                        ExecKind::Populate => {
                            counters.populate_calls = counters.populate_calls.saturating_add(1);
                        }
                    }
                }
            }

            MetricsEvent::ExecFinish {
                kind,
                entity,
                rows_touched,
            } => {
                if matches!(kind, ExecKind::Load) {
                    for counters in self.both(&entity) {
                        counters.rows_loaded = counters.rows_loaded.saturating_add(rows_touched);
                    }
                }
            }

            MetricsEvent::RowsScanned {
                entity,
                rows_scanned,
            } => {
                for counters in self.both(&entity) {
                    counters.rows_scanned = counters.rows_scanned.saturating_add(rows_scanned);
                }
            }

            MetricsEvent::RelationLookup { entity } => {
                for counters in self.both(&entity) {
                    counters.relation_lookups = counters.relation_lookups.saturating_add(1);
                }
            }

            MetricsEvent::RelationNull { entity, .. } => {
                for counters in self.both(&entity) {
                    counters.relation_nulls = counters.relation_nulls.saturating_add(1);
                }
            }

            MetricsEvent::DanglingReference { entity, .. } => {
                for counters in self.both(&entity) {
                    counters.dangling_references =
                        counters.dangling_references.saturating_add(1);
                }
            }
        }
    }

    // Aggregate counters plus the per-entity entry, created on first use.
    fn both(&mut self, entity: &str) -> [&mut OpCounters; 2] {
        let entry = self
            .entities
            .entry(entity.to_string())
            .or_default();
        [&mut self.ops, entry]
    }
}

pub(super) fn with_state_mut<R>(f: impl FnOnce(&mut MetricsSnapshot) -> R) -> R {
    STATE.with_borrow_mut(f)
}

/// Snapshot the current thread's metrics state.
#[must_use]
pub fn metrics_report() -> MetricsSnapshot {
    STATE.with_borrow(Clone::clone)
}

/// Reset the current thread's metrics state.
pub fn metrics_reset_all() {
    STATE.with_borrow_mut(|state| *state = MetricsSnapshot::default());
}

///
/// TESTS
///
