//! Double dispatch from `(state, event)` to transition handlers.
//!
//! Each machine type declares its handlers once in a [`Transitions`] table.
//! A pair with no entry is a testbench bug: the simulator reports it as a
//! fatal [`SimError::InvalidTransition`](crate::sim::SimError::InvalidTransition).

mod bound;
mod table;

pub(crate) use bound::{Bound, DynMachine};
pub use table::{Handler, Transitions};
