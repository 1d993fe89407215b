//! Core State trait for simulated machines.
//!
//! A state is a bare tag: two states are equal iff they are the same tag.
//! Every machine's state set carries the reserved `Uninitialized` tag, which
//! is the only state a machine may be registered in.

use std::fmt::Debug;

/// Trait for machine states.
///
/// # Required Traits
///
/// - `Clone`: the simulator reads a copy of the state before each dispatch
/// - `PartialEq`: dispatch tables are keyed by state
/// - `Debug`: states must be debuggable for diagnostics
///
/// Most machines should declare their states with [`state_enum!`](crate::state_enum),
/// which adds the `Uninitialized` variant and implements this trait.
///
/// # Example
///
/// ```rust
/// use edgesim::core::State;
///
/// #[derive(Clone, PartialEq, Debug)]
/// enum LinkState {
///     Uninitialized,
///     Idle,
///     Busy,
/// }
///
/// impl State for LinkState {
///     const UNINITIALIZED: Self = Self::Uninitialized;
///
///     fn name(&self) -> &str {
///         match self {
///             Self::Uninitialized => "Uninitialized",
///             Self::Idle => "Idle",
///             Self::Busy => "Busy",
///         }
///     }
/// }
///
/// assert!(LinkState::Uninitialized.is_uninitialized());
/// ```
pub trait State: Clone + PartialEq + Debug {
    /// The reserved starting state.
    const UNINITIALIZED: Self;

    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// Check if this is the reserved starting state.
    fn is_uninitialized(&self) -> bool {
        *self == Self::UNINITIALIZED
    }
}
