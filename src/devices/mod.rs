//! Ready-made machines for common testbench plumbing.
//!
//! These are ordinary consumers of the engine's public contract. They own
//! their configuration and validate it themselves; the core treats every
//! timeout as an opaque tick count.

pub mod clock;

pub use clock::{ClockConfig, ClockConfigError, ClockDriver, ClockState, ClockViolation};
