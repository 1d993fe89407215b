//! Simulator configuration.

use serde::{Deserialize, Serialize};

/// Settings fixed when the simulator is built.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Upper bound on the clock for `run`/`run_until`. `poll` ignores it.
    pub tick_limit: Option<u64>,

    /// Record every dispatch in the simulator's [`DispatchTrace`](crate::sim::DispatchTrace).
    pub record_trace: bool,
}

impl SimConfig {
    /// Create the default configuration: no tick limit, no trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop `run`/`run_until` with an error once the clock reaches `ticks`.
    pub fn tick_limit(mut self, ticks: u64) -> Self {
        self.tick_limit = Some(ticks);
        self
    }

    /// Enable or disable the dispatch trace.
    pub fn record_trace(mut self, enabled: bool) -> Self {
        self.record_trace = enabled;
        self
    }
}
