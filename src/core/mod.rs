//! Core simulation types.
//!
//! This module contains the vocabulary shared by machines and the engine:
//! - States via the `State` trait
//! - The fixed set of primitive events
//! - Combinators describing what a transition schedules next
//! - The `Machine` contract

mod combinator;
mod event;
mod machine;
mod state;

pub use combinator::Combinator;
pub use event::{Event, EventKind, Level, LevelSource, Tick};
pub use machine::Machine;
pub use state::State;
