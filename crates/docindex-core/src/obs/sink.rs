//! Metrics sink boundary.
//!
//! Engine logic never touches `obs::metrics` directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
use crate::obs::metrics::{self, type_counters};
use std::{cell::RefCell, time::Instant};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<&'static dyn MetricsSink>> = const { RefCell::new(None) };
}

///
/// ExecKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExecKind {
    Put,
    Get,
    Query,
}

///
/// ScanKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScanKind {
    /// Unbounded scan over every entry of one `(type, field, value)`.
    Prefix,

    /// Id-bounded scan narrowed by the previous filter field.
    Range,
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent<'a> {
    ExecStart {
        kind: ExecKind,
        type_name: &'a str,
    },
    ExecFinish {
        kind: ExecKind,
        type_name: &'a str,
        rows_touched: u64,
        micros: u64,
    },
    IndexScan {
        kind: ScanKind,
        type_name: &'a str,
        entries: u64,
    },
    IndexDelta {
        type_name: &'a str,
        inserts: u64,
        removes: u64,
    },
    ShortCircuit {
        type_name: &'a str,
    },
    DanglingIndexEntry {
        type_name: &'a str,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent<'_>);
}

/// GlobalMetricsSink
/// Default sink that writes into the thread-local metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent<'_>) {
        match event {
            MetricsEvent::ExecStart { kind, type_name } => {
                metrics::with_state_mut(|m| {
                    match kind {
                        ExecKind::Put => m.ops.put_calls = m.ops.put_calls.saturating_add(1),
                        ExecKind::Get => m.ops.get_calls = m.ops.get_calls.saturating_add(1),
                        ExecKind::Query => {
                            m.ops.query_calls = m.ops.query_calls.saturating_add(1);
                        }
                    }

                    let entry = type_counters(m, type_name);
                    match kind {
                        ExecKind::Put => entry.put_calls = entry.put_calls.saturating_add(1),
                        ExecKind::Get => entry.get_calls = entry.get_calls.saturating_add(1),
                        ExecKind::Query => {
                            entry.query_calls = entry.query_calls.saturating_add(1);
                        }
                    }
                });
            }

            MetricsEvent::ExecFinish {
                kind,
                type_name,
                rows_touched,
                micros,
            } => {
                metrics::with_state_mut(|m| {
                    match kind {
                        ExecKind::Put => {
                            m.ops.rows_written = m.ops.rows_written.saturating_add(rows_touched);
                            metrics::add_micros(
                                &mut m.perf.put_micros_total,
                                &mut m.perf.put_micros_max,
                                micros,
                            );
                        }
                        ExecKind::Get => {
                            m.ops.rows_loaded = m.ops.rows_loaded.saturating_add(rows_touched);
                            metrics::add_micros(
                                &mut m.perf.get_micros_total,
                                &mut m.perf.get_micros_max,
                                micros,
                            );
                        }
                        ExecKind::Query => {
                            m.ops.rows_loaded = m.ops.rows_loaded.saturating_add(rows_touched);
                            metrics::add_micros(
                                &mut m.perf.query_micros_total,
                                &mut m.perf.query_micros_max,
                                micros,
                            );
                        }
                    }

                    let entry = type_counters(m, type_name);
                    match kind {
                        ExecKind::Put => {
                            entry.rows_written = entry.rows_written.saturating_add(rows_touched);
                        }
                        ExecKind::Get | ExecKind::Query => {
                            entry.rows_loaded = entry.rows_loaded.saturating_add(rows_touched);
                        }
                    }
                });
            }

            MetricsEvent::IndexScan {
                kind,
                type_name,
                entries,
            } => {
                metrics::with_state_mut(|m| {
                    match kind {
                        ScanKind::Prefix => {
                            m.ops.prefix_scans = m.ops.prefix_scans.saturating_add(1);
                        }
                        ScanKind::Range => m.ops.range_scans = m.ops.range_scans.saturating_add(1),
                    }
                    m.ops.index_entries_scanned =
                        m.ops.index_entries_scanned.saturating_add(entries);

                    let entry = type_counters(m, type_name);
                    entry.index_entries_scanned =
                        entry.index_entries_scanned.saturating_add(entries);
                });
            }

            MetricsEvent::IndexDelta {
                type_name,
                inserts,
                removes,
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.index_inserts = m.ops.index_inserts.saturating_add(inserts);
                    m.ops.index_removes = m.ops.index_removes.saturating_add(removes);

                    let entry = type_counters(m, type_name);
                    entry.index_inserts = entry.index_inserts.saturating_add(inserts);
                    entry.index_removes = entry.index_removes.saturating_add(removes);
                });
            }

            MetricsEvent::ShortCircuit { .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.short_circuits = m.ops.short_circuits.saturating_add(1);
                });
            }

            MetricsEvent::DanglingIndexEntry { .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.dangling_index_entries = m.ops.dangling_index_entries.saturating_add(1);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent<'_>) {
    match SINK_OVERRIDE.with(|cell| *cell.borrow()) {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current metrics state.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all metrics state (counters + perf).
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override.
pub(crate) fn with_metrics_sink<T>(sink: &'static dyn MetricsSink, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<&'static dyn MetricsSink>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = self.0;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}

/// Span
/// RAII guard that emits start/finish metrics events for one engine call.
/// Ensures finish accounting happens even on early return or unwind.

pub(crate) struct Span<'a> {
    kind: ExecKind,
    type_name: &'a str,
    start: Instant,
    rows: u64,
}

impl<'a> Span<'a> {
    /// Start a metrics span for a type and entrypoint.
    #[must_use]
    pub(crate) fn new(kind: ExecKind, type_name: &'a str) -> Self {
        record(MetricsEvent::ExecStart { kind, type_name });

        Self {
            kind,
            type_name,
            start: Instant::now(),
            rows: 0,
        }
    }

    pub(crate) const fn set_rows(&mut self, rows: u64) {
        self.rows = rows;
    }
}

impl Drop for Span<'_> {
    fn drop(&mut self) {
        let micros = u64::try_from(self.start.elapsed().as_micros()).unwrap_or(u64::MAX);

        record(MetricsEvent::ExecFinish {
            kind: self.kind,
            type_name: self.type_name,
            rows_touched: self.rows,
            micros,
        });
    }
}
