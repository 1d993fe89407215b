//! Builder API for assembling simulations.
//!
//! This module provides the fluent [`SimBuilder`] that registers machines and
//! performs the mandatory initial dispatch, plus the [`state_enum!`](crate::state_enum)
//! macro for declaring machine states with minimal boilerplate.

pub mod error;
pub mod macros;
pub mod sim;

pub use error::{BuildError, RegistrationError};
pub use sim::SimBuilder;
