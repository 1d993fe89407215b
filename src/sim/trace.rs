//! Dispatch trace.
//!
//! An ordered log of every transition the simulator ran, for diagnostics and
//! test assertions. Recording is opt-in through
//! [`SimConfig::record_trace`](crate::sim::SimConfig::record_trace).

use crate::core::{EventKind, Tick};
use serde::{Deserialize, Serialize};

/// Record of a single dispatch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DispatchRecord {
    /// Tick at which the event was dispatched
    pub tick: Tick,
    /// Label of the machine that handled it
    pub machine: String,
    pub event: EventKind,
    /// Engine-assigned id (0 for `Init`, which is never enqueued)
    pub event_id: u64,
    pub tag: Option<u64>,
    /// State before the handler ran
    pub from: String,
    /// State after the handler ran
    pub to: String,
}

/// Ordered history of dispatches.
///
/// # Example
///
/// ```rust
/// use edgesim::core::EventKind;
/// use edgesim::sim::{DispatchRecord, DispatchTrace};
///
/// let mut trace = DispatchTrace::new();
/// trace.record(DispatchRecord {
///     tick: 0,
///     machine: "timer#0".to_string(),
///     event: EventKind::Init,
///     event_id: 0,
///     tag: None,
///     from: "Uninitialized".to_string(),
///     to: "Waiting".to_string(),
/// });
///
/// assert_eq!(trace.path("timer#0"), vec!["Uninitialized", "Waiting"]);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DispatchTrace {
    records: Vec<DispatchRecord>,
}

impl DispatchTrace {
    /// Create an empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a dispatch.
    pub fn record(&mut self, record: DispatchRecord) {
        self.records.push(record);
    }

    /// Every dispatch, oldest first.
    pub fn records(&self) -> &[DispatchRecord] {
        &self.records
    }

    /// Number of recorded dispatches.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Dispatches handled by `machine`, in order.
    pub fn for_machine<'a>(&'a self, machine: &'a str) -> impl Iterator<Item = &'a DispatchRecord> {
        self.records.iter().filter(move |r| r.machine == machine)
    }

    /// Number of dispatches of `kind` across all machines.
    pub fn count(&self, kind: EventKind) -> usize {
        self.records.iter().filter(|r| r.event == kind).count()
    }

    /// States traversed by `machine`: its first `from`, then every `to`.
    ///
    /// Self-transitions are included, so the path has one entry per dispatch
    /// plus one.
    pub fn path(&self, machine: &str) -> Vec<&str> {
        let mut records = self
            .records
            .iter()
            .filter(|r| r.machine == machine)
            .peekable();
        let Some(first) = records.peek().copied() else {
            return Vec::new();
        };

        let mut path = vec![first.from.as_str()];
        path.extend(records.map(|r| r.to.as_str()));
        path
    }

    /// Pretty-printed JSON for diagnostics.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(tick: Tick, machine: &str, event: EventKind, from: &str, to: &str) -> DispatchRecord {
        DispatchRecord {
            tick,
            machine: machine.to_string(),
            event,
            event_id: tick,
            tag: None,
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    fn sample() -> DispatchTrace {
        let mut trace = DispatchTrace::new();
        trace.record(record(0, "a", EventKind::Init, "Uninitialized", "Waiting"));
        trace.record(record(0, "b", EventKind::Init, "Uninitialized", "Idle"));
        trace.record(record(10, "a", EventKind::Timeout, "Waiting", "Waiting"));
        trace.record(record(20, "a", EventKind::Timeout, "Waiting", "Triggered"));
        trace
    }

    #[test]
    fn empty_trace_has_no_path() {
        let trace = DispatchTrace::new();
        assert!(trace.is_empty());
        assert!(trace.path("a").is_empty());
    }

    #[test]
    fn path_follows_one_machine() {
        let trace = sample();
        assert_eq!(
            trace.path("a"),
            vec!["Uninitialized", "Waiting", "Waiting", "Triggered"]
        );
        assert_eq!(trace.path("b"), vec!["Uninitialized", "Idle"]);
    }

    #[test]
    fn count_spans_machines() {
        let trace = sample();
        assert_eq!(trace.count(EventKind::Init), 2);
        assert_eq!(trace.count(EventKind::Timeout), 2);
        assert_eq!(trace.count(EventKind::RisingEdge), 0);
        assert_eq!(trace.len(), 4);
    }

    #[test]
    fn json_export_keeps_every_record() {
        let trace = sample();
        let json = trace.to_json().unwrap();
        let parsed: DispatchTrace = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.records(), trace.records());
    }
}
