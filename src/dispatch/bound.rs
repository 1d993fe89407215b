//! Type-erased machine slots.
//!
//! The simulator drives a heterogeneous list of machines through one uniform
//! interface. Each slot pairs a machine with the table built from its type.

use super::table::Transitions;
use crate::core::{Combinator, Event, Machine, State};
use crate::sim::SimError;
use std::any::Any;

/// Outcome of a successful dispatch.
pub(crate) struct Dispatched {
    pub combinator: Combinator,
    /// `(from, to)` state names, present only when asked for.
    pub names: Option<(String, String)>,
}

/// Uniform "evaluate a due event" capability over any machine type.
pub(crate) trait DynMachine {
    fn state_name(&self) -> String;

    fn is_uninitialized(&self) -> bool;

    /// Read the current state once, resolve its handler and run it.
    /// State names are only built when `describe` is set.
    fn dispatch(
        &mut self,
        label: &str,
        event: &Event,
        describe: bool,
    ) -> Result<Dispatched, SimError>;

    fn as_any(&self) -> &dyn Any;
}

pub(crate) struct Bound<M: Machine> {
    machine: M,
    transitions: Transitions<M>,
}

impl<M: Machine> Bound<M> {
    pub fn new(machine: M) -> Self {
        Self {
            machine,
            transitions: M::transitions(),
        }
    }

    pub fn transitions(&self) -> &Transitions<M> {
        &self.transitions
    }
}

impl<M: Machine> DynMachine for Bound<M> {
    fn state_name(&self) -> String {
        self.machine.current_state().name().to_string()
    }

    fn is_uninitialized(&self) -> bool {
        self.machine.current_state().is_uninitialized()
    }

    fn dispatch(
        &mut self,
        label: &str,
        event: &Event,
        describe: bool,
    ) -> Result<Dispatched, SimError> {
        let state = self.machine.current_state();
        let Some(handler) = self.transitions.resolve(&state, event.kind()) else {
            return Err(SimError::InvalidTransition {
                machine: label.to_string(),
                state: state.name().to_string(),
                event: event.kind().name(),
            });
        };

        let combinator = handler(&mut self.machine, event);
        let names = describe.then(|| {
            (
                state.name().to_string(),
                self.machine.current_state().name().to_string(),
            )
        });
        Ok(Dispatched { combinator, names })
    }

    fn as_any(&self) -> &dyn Any {
        &self.machine
    }
}
