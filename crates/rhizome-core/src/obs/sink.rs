use crate::obs::metrics;

///
/// ExecKind
///

#[derive(Clone, Copy, Debug)]
pub enum ExecKind {
    Load,
    Populate,
}

///
/// MetricsEvent
///

#[derive(Clone, Debug)]
pub enum MetricsEvent {
    ExecStart {
        kind: ExecKind,
        entity: String,
    },
    ExecFinish {
        kind: ExecKind,
        entity: String,
        rows_touched: u64,
    },
    RowsScanned {
        entity: String,
        rows_scanned: u64,
    },
    RelationLookup {
        entity: String,
    },
    RelationNull {
        entity: String,
        relation: String,
    },
    DanglingReference {
        entity: String,
        relation: String,
    },
}

/// Record one event into the current thread's counter state.
pub fn record(event: MetricsEvent) {
    metrics::with_state_mut(|state| state.apply(event));
}

///
/// Span
/// RAII guard that emits start/finish events for one executor call.
/// Ensures finish accounting happens even on early error returns.
///

pub struct Span {
    kind: ExecKind,
    entity: String,
    rows: u64,
}

impl Span {
    #[must_use]
    /// Start a span for a specific entity and executor kind.
    pub fn new(kind: ExecKind, entity: impl Into<String>) -> Self {
        let entity = entity.into();
        record(MetricsEvent::ExecStart {
            kind,
            entity: entity.clone(),
        });

        Self {
            kind,
            entity,
            rows: 0,
        }
    }

    pub const fn set_rows(&mut self, rows: u64) {
        self.rows = rows;
    }
}

impl Drop for Span {
    fn drop(&mut self) {
        record(MetricsEvent::ExecFinish {
            kind: self.kind,
            entity: std::mem::take(&mut self.entity),
            rows_touched: self.rows,
        });
    }
}

///
/// TESTS
///
