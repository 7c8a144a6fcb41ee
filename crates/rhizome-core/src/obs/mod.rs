//! In-process observability.
//!
//! Engine logic MUST NOT mutate counter state directly. All instrumentation
//! flows through [`MetricsEvent`] and [`sink::record`]; this module is the
//! only bridge between execution logic and the counter state.

mod metrics;
mod sink;

pub use metrics::{MetricsSnapshot, OpCounters, metrics_report, metrics_reset_all};
pub use sink::{ExecKind, MetricsEvent, Span, record};
