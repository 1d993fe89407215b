//! Edgesim: a tick-driven discrete-event simulation kernel
//!
//! Edgesim drives hardware-verification testbenches. Independent machines
//! (behavioral models of bus masters, slaves, clocked device wrappers) advance
//! through explicit states in response to timed and level-triggered events on
//! a shared virtual clock, without threads or wall-clock waiting. Waiting is
//! data: a pending event carried from one tick to the next.
//!
//! # Core Concepts
//!
//! - **State**: a machine's current phase, always starting at `Uninitialized`
//! - **Event**: `Init`, `Timeout`, `RisingEdge` or `FallingEdge`
//! - **Combinator**: what a transition schedules next (`None`, `Only`, `AllOf`, `OneOf`)
//! - **Simulator**: evaluates pending events one tick per `poll`
//!
//! # Example
//!
//! ```rust
//! use edgesim::builder::SimBuilder;
//! use edgesim::core::{Combinator, Event, EventKind, Machine};
//! use edgesim::dispatch::Transitions;
//! use edgesim::state_enum;
//!
//! state_enum! {
//!     enum TimerState {
//!         Waiting,
//!         Triggered,
//!     }
//! }
//!
//! struct Timer {
//!     state: TimerState,
//! }
//!
//! impl Machine for Timer {
//!     type State = TimerState;
//!
//!     fn current_state(&self) -> TimerState {
//!         self.state
//!     }
//!
//!     fn transitions() -> Transitions<Self> {
//!         Transitions::new()
//!             .on(TimerState::Uninitialized, EventKind::Init, |m: &mut Timer, _| {
//!                 m.state = TimerState::Waiting;
//!                 Event::timeout(100).into()
//!             })
//!             .on(TimerState::Waiting, EventKind::Timeout, |m: &mut Timer, _| {
//!                 m.state = TimerState::Triggered;
//!                 Combinator::None
//!             })
//!     }
//! }
//!
//! let mut builder = SimBuilder::new();
//! let timer = builder.add(Timer { state: TimerState::Uninitialized });
//! let mut sim = builder.build().unwrap();
//!
//! while sim.poll().unwrap() {}
//!
//! assert_eq!(sim.machine(timer).unwrap().state, TimerState::Triggered);
//! assert_eq!(sim.now(), 101);
//! ```

pub mod builder;
pub mod core;
pub mod devices;
pub mod dispatch;
pub mod sim;

// Re-export commonly used types
pub use builder::{BuildError, SimBuilder};
pub use self::core::{Combinator, Event, EventKind, Level, LevelSource, Machine, State, Tick};
pub use dispatch::Transitions;
pub use sim::{MachineId, SimConfig, SimError, Simulator};
