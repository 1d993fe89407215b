//! Build errors for simulators.

use crate::sim::SimError;
use thiserror::Error;

/// Problems found while registering a single machine.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RegistrationError {
    #[error("{machine}: transition for {event} in state {state} declared more than once")]
    DuplicateTransition {
        machine: String,
        state: String,
        event: &'static str,
    },

    #[error("{machine}: no handler for Init in state Uninitialized")]
    MissingInitHandler { machine: String },

    #[error("{machine}: registered in state {state}, expected Uninitialized")]
    NotUninitialized { machine: String, state: String },
}

/// Errors that can occur when building a simulator.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("No machines registered. Call .add(machine) before .build()")]
    NoMachines,

    #[error("{} machine registration problem(s): {}", .0.len(), join(.0))]
    InvalidMachines(Vec<RegistrationError>),

    #[error("Initial dispatch failed: {0}")]
    Init(#[from] SimError),
}

fn join(errors: &[RegistrationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
