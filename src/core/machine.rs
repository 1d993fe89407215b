//! The contract a simulated machine fulfils.

use super::state::State;
use crate::dispatch::Transitions;

/// A behavioral model driven by the simulator.
///
/// The machine owns its current state and changes it only from inside its
/// own transition handlers. The simulator reads the state immediately before
/// each dispatch.
///
/// # Example
///
/// ```rust
/// use edgesim::core::{Combinator, Event, EventKind, Machine};
/// use edgesim::dispatch::Transitions;
/// use edgesim::state_enum;
///
/// state_enum! {
///     enum BlinkState {
///         Waiting,
///         Triggered,
///     }
/// }
///
/// struct Blink {
///     state: BlinkState,
/// }
///
/// impl Machine for Blink {
///     type State = BlinkState;
///
///     fn current_state(&self) -> BlinkState {
///         self.state
///     }
///
///     fn transitions() -> Transitions<Self> {
///         Transitions::new()
///             .on(BlinkState::Uninitialized, EventKind::Init, |m: &mut Blink, _| {
///                 m.state = BlinkState::Waiting;
///                 Event::timeout(100).into()
///             })
///             .on(BlinkState::Waiting, EventKind::Timeout, |m: &mut Blink, _| {
///                 m.state = BlinkState::Triggered;
///                 Combinator::None
///             })
///     }
/// }
/// ```
pub trait Machine: 'static {
    type State: State;

    /// Current state (pure).
    fn current_state(&self) -> Self::State;

    /// The machine's dispatch table. Built once, when the machine is registered.
    fn transitions() -> Transitions<Self>
    where
        Self: Sized;
}
