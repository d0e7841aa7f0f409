use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters and simple perf totals for operations.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub perf: EventPerf,

    /// Per-type counters keyed by type name; untyped documents use `""`.
    ///
    /// Grows by one entry per distinct type name seen on this thread and is
    /// only cleared by `metrics_reset_all`. Callers feeding unbounded type names
    /// should reset periodically.
    pub types: BTreeMap<String, TypeCounters>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventOps {
    // Engine entrypoints
    pub put_calls: u64,
    pub get_calls: u64,
    pub query_calls: u64,

    // Scan kinds
    pub prefix_scans: u64,
    pub range_scans: u64,

    // Rows touched
    pub rows_written: u64,
    pub rows_loaded: u64,
    pub index_entries_scanned: u64,

    // Index maintenance
    pub index_inserts: u64,
    pub index_removes: u64,

    // Query outcomes
    pub short_circuits: u64,
    pub dangling_index_entries: u64,
}

///
/// TypeCounters
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct TypeCounters {
    pub put_calls: u64,
    pub get_calls: u64,
    pub query_calls: u64,
    pub rows_written: u64,
    pub rows_loaded: u64,
    pub index_entries_scanned: u64,
    pub index_inserts: u64,
    pub index_removes: u64,
}

///
/// EventPerf
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventPerf {
    // Wall-clock totals per entrypoint, in microseconds
    pub put_micros_total: u128,
    pub get_micros_total: u128,
    pub query_micros_total: u128,

    // Maximum observed single-call durations
    pub put_micros_max: u64,
    pub get_micros_max: u64,
    pub query_micros_max: u64,
}

///
/// EventReport
/// Point-in-time snapshot of the event state.
///

pub type EventReport = EventState;

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Borrow (creating if needed) the counters for one type.
///
/// Entries are never evicted; see [`EventState::types`].
pub(crate) fn type_counters<'a>(state: &'a mut EventState, type_name: &str) -> &'a mut TypeCounters {
    state.types.entry(type_name.to_string()).or_default()
}

/// Reset all counters and perf totals.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

/// Snapshot the current state.
#[must_use]
pub(crate) fn report() -> EventReport {
    with_state(Clone::clone)
}

/// Accumulate a duration and track a max.
#[allow(clippy::missing_const_for_fn)]
pub(crate) fn add_micros(total: &mut u128, max: &mut u64, delta: u64) {
    *total = total.saturating_add(u128::from(delta));
    if delta > *max {
        *max = delta;
    }
}
