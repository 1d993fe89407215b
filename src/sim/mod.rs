//! The simulation engine.
//!
//! # Key Concepts
//!
//! - **Registry**: pending `(machine, event)` records, in insertion order
//! - **Simulator**: owns the virtual clock and steps it one tick per `poll`
//! - **Trace**: optional log of every dispatch
//!
//! A tick evaluates every pending record once. Satisfied events are
//! dispatched immediately; whatever their handlers schedule is evaluated from
//! the next tick on. Completing a `OneOf` member cancels its siblings wherever
//! they are pending.

mod config;
mod error;
mod registry;
mod simulator;
mod trace;

pub use config::SimConfig;
pub use error::SimError;
pub use simulator::{MachineId, Simulator};
pub use trace::{DispatchRecord, DispatchTrace};

pub(crate) use registry::IdAllocator;
pub(crate) use simulator::MachineSlot;

#[cfg(test)]
mod tests {
    use crate::builder::{BuildError, SimBuilder};
    use crate::core::{Combinator, Event, EventKind, Machine};
    use crate::dispatch::Transitions;
    use crate::sim::{SimConfig, SimError};
    use crate::state_enum;
    use tracing_test::traced_test;

    state_enum! {
        enum TimerState {
            Waiting,
            Triggered,
        }
    }

    struct Timer {
        state: TimerState,
        plan: Combinator,
        fired: Vec<Option<u64>>,
    }

    impl Timer {
        fn scheduling(plan: Combinator) -> Self {
            Self {
                state: TimerState::Uninitialized,
                plan,
                fired: Vec::new(),
            }
        }
    }

    impl Machine for Timer {
        type State = TimerState;

        fn current_state(&self) -> TimerState {
            self.state
        }

        fn transitions() -> Transitions<Self> {
            Transitions::new()
                .on(TimerState::Uninitialized, EventKind::Init, |m: &mut Timer, _| {
                    m.state = TimerState::Waiting;
                    std::mem::take(&mut m.plan)
                })
                .on(TimerState::Waiting, EventKind::Timeout, |m: &mut Timer, e| {
                    m.fired.push(e.tag());
                    m.state = TimerState::Triggered;
                    Combinator::None
                })
                .on(TimerState::Triggered, EventKind::Timeout, |m: &mut Timer, e| {
                    m.fired.push(e.tag());
                    Combinator::None
                })
        }
    }

    #[test]
    fn empty_registry_ends_the_run() {
        let mut builder = SimBuilder::new();
        builder.add(Timer::scheduling(Combinator::None));
        let mut sim = builder.build().unwrap();

        assert_eq!(sim.pending(), 0);
        assert_eq!(sim.poll(), Ok(false));
        assert_eq!(sim.now(), 0);
    }

    #[test]
    fn poll_reports_work_even_when_nothing_fires() {
        let mut builder = SimBuilder::new();
        let id = builder.add(Timer::scheduling(Event::timeout(3).into()));
        let mut sim = builder.build().unwrap();

        for _ in 0..3 {
            assert_eq!(sim.poll(), Ok(true));
            assert_eq!(sim.machine(id).unwrap().state, TimerState::Waiting);
        }
        assert_eq!(sim.poll(), Ok(true));
        assert_eq!(sim.machine(id).unwrap().state, TimerState::Triggered);
        assert_eq!(sim.poll(), Ok(false));
        assert_eq!(sim.now(), 4);
    }

    #[test]
    fn one_of_tie_goes_to_first_registered() {
        let mut builder = SimBuilder::new();
        let id = builder.add(Timer::scheduling(Combinator::one_of([
            Event::timeout(5).with_tag(1),
            Event::timeout(5).with_tag(2),
        ])));
        let mut sim = builder.build().unwrap();

        sim.run().unwrap();
        assert_eq!(sim.machine(id).unwrap().fired, vec![Some(1)]);
    }

    #[test]
    fn one_of_cancels_sibling_carried_to_next_tick() {
        let mut builder = SimBuilder::new();
        let id = builder.add(Timer::scheduling(Combinator::one_of([
            Event::timeout(9).with_tag(1),
            Event::timeout(4).with_tag(2),
        ])));
        let mut sim = builder.build().unwrap();

        for _ in 0..5 {
            sim.poll().unwrap();
        }
        assert_eq!(sim.machine(id).unwrap().fired, vec![Some(2)]);

        // The losing timeout was already carried forward; it is dropped, not dispatched.
        assert_eq!(sim.pending(), 1);
        assert_eq!(sim.poll(), Ok(true));
        assert_eq!(sim.pending(), 0);
        assert_eq!(sim.poll(), Ok(false));
        assert_eq!(sim.machine(id).unwrap().fired, vec![Some(2)]);
    }

    #[test]
    fn invalid_transition_halts() {
        state_enum! {
            enum BadState {
                Stuck,
            }
        }

        struct Bad {
            state: BadState,
        }

        impl Machine for Bad {
            type State = BadState;

            fn current_state(&self) -> BadState {
                self.state
            }

            fn transitions() -> Transitions<Self> {
                Transitions::new().on(BadState::Uninitialized, EventKind::Init, |m: &mut Bad, _| {
                    m.state = BadState::Stuck;
                    Event::timeout(0).into()
                })
            }
        }

        let mut builder = SimBuilder::new();
        builder.add(Bad {
            state: BadState::Uninitialized,
        });
        let mut sim = builder.build().unwrap();

        match sim.poll() {
            Err(SimError::InvalidTransition { state, event, .. }) => {
                assert_eq!(state, "Stuck");
                assert_eq!(event, "Timeout");
            }
            other => panic!("Expected invalid transition, got {other:?}"),
        }
        assert!(sim.is_halted());
        assert_eq!(sim.poll(), Err(SimError::Halted));
    }

    #[test]
    fn tick_limit_bounds_run() {
        let mut builder = SimBuilder::new().config(SimConfig::new().tick_limit(10));
        builder.add(Timer::scheduling(Event::timeout(50).into()));
        let mut sim = builder.build().unwrap();

        assert_eq!(sim.run(), Err(SimError::TickLimitExceeded { limit: 10 }));
        assert_eq!(sim.now(), 10);
    }

    #[test]
    fn run_until_stops_on_predicate() {
        let mut builder = SimBuilder::new();
        let id = builder.add(Timer::scheduling(Event::timeout(20).into()));
        let mut sim = builder.build().unwrap();

        let stopped_at = sim
            .run_until(|s| s.machine(id).is_some_and(|t| t.state == TimerState::Triggered))
            .unwrap();
        assert_eq!(stopped_at, 21);
        assert_eq!(sim.poll(), Ok(false));
    }

    #[test]
    fn trace_records_only_when_enabled() {
        let mut builder = SimBuilder::new();
        builder.add(Timer::scheduling(Event::timeout(1).into()));
        let mut sim = builder.build().unwrap();
        sim.run().unwrap();
        assert!(sim.trace().is_empty());

        let mut builder = SimBuilder::new().config(SimConfig::new().record_trace(true));
        let id = builder.add(Timer::scheduling(Event::timeout(1).with_tag(7).into()));
        let mut sim = builder.build().unwrap();
        sim.run().unwrap();

        let label = sim.label(id).unwrap().to_string();
        let records = sim.trace().records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].tick, 1);
        assert_eq!(records[1].event_id, 1);
        assert_eq!(records[1].tag, Some(7));
        assert_eq!(sim.trace().path(&label), vec!["Uninitialized", "Waiting", "Triggered"]);
    }

    state_enum! {
        enum EchoState {
            Running,
        }
    }

    /// Keeps a copy of its Init event and hands it back later.
    struct Echo {
        state: EchoState,
        immediately: bool,
        saved: Option<Event>,
    }

    impl Echo {
        fn new(immediately: bool) -> Self {
            Self {
                state: EchoState::Uninitialized,
                immediately,
                saved: None,
            }
        }
    }

    impl Machine for Echo {
        type State = EchoState;

        fn current_state(&self) -> EchoState {
            self.state
        }

        fn transitions() -> Transitions<Self> {
            Transitions::new()
                .on_any(EventKind::Init, |m: &mut Echo, e| {
                    m.state = EchoState::Running;
                    if m.immediately {
                        return e.clone().into();
                    }
                    m.saved = Some(e.clone());
                    Event::timeout(2).into()
                })
                .on(EchoState::Running, EventKind::Timeout, |m: &mut Echo, _| {
                    m.saved.take().map(Combinator::from).unwrap_or_default()
                })
        }
    }

    #[test]
    fn init_returned_from_init_handler_fails_the_build() {
        let mut builder = SimBuilder::new();
        builder.add(Echo::new(true));

        match builder.build() {
            Err(BuildError::Init(SimError::InitResubmitted { machine })) => {
                assert_eq!(machine, "Echo#0");
            }
            other => panic!("Expected resubmitted Init, got {other:?}"),
        }
    }

    #[test]
    fn init_returned_later_halts_the_run() {
        let mut builder = SimBuilder::new().config(SimConfig::new().record_trace(true));
        builder.add(Echo::new(false));
        let mut sim = builder.build().unwrap();

        assert_eq!(sim.poll(), Ok(true));
        assert_eq!(sim.poll(), Ok(true));
        assert_eq!(
            sim.poll(),
            Err(SimError::InitResubmitted {
                machine: "Echo#0".to_string()
            })
        );
        assert!(sim.is_halted());
        assert_eq!(sim.pending(), 0);
        assert_eq!(sim.trace().count(EventKind::Init), 1);
    }

    #[test]
    fn config_is_kept_after_build() {
        let config = SimConfig::new().tick_limit(64).record_trace(true);
        let mut builder = SimBuilder::new().config(config.clone());
        builder.add(Timer::scheduling(Combinator::None));
        let sim = builder.build().unwrap();

        assert_eq!(sim.config(), &config);
    }

    #[traced_test]
    #[test]
    fn dispatches_are_logged() {
        let mut builder = SimBuilder::new();
        builder.add(Timer::scheduling(Event::timeout(0).into()));
        let mut sim = builder.build().unwrap();
        sim.run().unwrap();

        assert!(logs_contain("dispatched"));
        assert!(logs_contain("Timeout"));
    }
}
