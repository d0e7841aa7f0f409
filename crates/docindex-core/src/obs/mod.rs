//! Observability: runtime telemetry (metrics) and sink abstractions.
//!
//! Structured trace events go through `tracing`; counters go through the
//! sink so callers can route them per `Db` handle.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EventOps, EventPerf, EventReport, EventState, TypeCounters};
pub use sink::{ExecKind, MetricsEvent, MetricsSink, ScanKind, metrics_report, metrics_reset_all};
