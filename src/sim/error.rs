//! Simulation errors.

use thiserror::Error;

/// Fatal conditions surfaced by [`Simulator::poll`](crate::sim::Simulator::poll).
///
/// None of these are retryable. Every one halts the run.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SimError {
    #[error("Invalid transition! Taking {event} from {state} in {machine}")]
    InvalidTransition {
        machine: String,
        state: String,
        event: &'static str,
    },

    #[error("Init resubmitted by {machine}; it is delivered exactly once at build time")]
    InitResubmitted { machine: String },

    #[error("Tick limit ({limit}) reached with work still pending")]
    TickLimitExceeded { limit: u64 },

    #[error("Simulation halted by an earlier fatal error")]
    Halted,
}
