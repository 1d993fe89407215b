//! Clock driver for clocked device models.
//!
//! Toggles a clock line at a fixed interval until a `done` line rises. The
//! device model itself is not part of the engine; hook it in through
//! [`ClockDriver::on_toggle`] to evaluate it on every clock edge.

use crate::core::{Combinator, Event, EventKind, Level, Machine};
use crate::dispatch::Transitions;
use crate::state_enum;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::rc::Rc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// A single problem with a [`ClockConfig`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClockViolation {
    #[error("half period must be nonzero")]
    ZeroHalfPeriod,

    #[error("half period {half_period} is not a power of two")]
    NotPowerOfTwo { half_period: u64 },

    #[error("initial delay {delay} must be below the half period {half_period}")]
    DelayTooLong { delay: u64, half_period: u64 },
}

/// Every violation found in a rejected [`ClockConfig`].
#[derive(Debug, Clone, Error, PartialEq)]
#[error("invalid clock configuration: {}", describe(.0))]
pub struct ClockConfigError(pub Vec<ClockViolation>);

fn describe(violations: &[ClockViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Timing of a [`ClockDriver`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClockConfig {
    /// Ticks between consecutive toggles.
    pub half_period: u64,

    /// Ticks before the first toggle. Defaults to half of `half_period`.
    pub initial_delay: Option<u64>,
}

impl ClockConfig {
    /// Toggle every `half_period` ticks.
    pub fn new(half_period: u64) -> Self {
        Self {
            half_period,
            initial_delay: None,
        }
    }

    /// Set the delay before the first toggle.
    pub fn initial_delay(mut self, ticks: u64) -> Self {
        self.initial_delay = Some(ticks);
        self
    }

    fn first_toggle(&self) -> u64 {
        self.initial_delay.unwrap_or(self.half_period / 2)
    }

    /// Check the configuration, accumulating ALL violations.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ClockViolation>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<ClockViolation>>> = Vec::new();

        let period = if self.half_period == 0 {
            Validation::fail(ClockViolation::ZeroHalfPeriod)
        } else if !self.half_period.is_power_of_two() {
            Validation::fail(ClockViolation::NotPowerOfTwo {
                half_period: self.half_period,
            })
        } else {
            Validation::success(())
        };
        checks.push(period);

        if let Some(delay) = self.initial_delay {
            let check = if delay >= self.half_period {
                Validation::fail(ClockViolation::DelayTooLong {
                    delay,
                    half_period: self.half_period,
                })
            } else {
                Validation::success(())
            };
            checks.push(check);
        }

        Validation::all_vec(checks).map(|_| ())
    }
}

state_enum! {
    pub enum ClockState {
        Running,
        Stopped,
    }
}

type ToggleHook = Box<dyn FnMut(Level, u64)>;

/// Machine that drives a clock line.
///
/// Every step schedules `OneOf(Timeout, RisingEdge(done))`: the clock keeps
/// toggling until `done` rises, then the driver stops scheduling.
pub struct ClockDriver {
    state: ClockState,
    config: ClockConfig,
    clock: Rc<Cell<bool>>,
    done: Rc<Cell<bool>>,
    toggles: u64,
    hook: Option<ToggleHook>,
}

impl ClockDriver {
    /// Create a driver for `clock`, stopping once `done` rises.
    ///
    /// Rejects an invalid `config`, reporting every violation.
    pub fn new(
        config: ClockConfig,
        clock: Rc<Cell<bool>>,
        done: Rc<Cell<bool>>,
    ) -> Result<Self, ClockConfigError> {
        if let Validation::Failure(violations) = config.validate() {
            return Err(ClockConfigError(violations.iter().cloned().collect()));
        }

        Ok(Self {
            state: ClockState::Uninitialized,
            config,
            clock,
            done,
            toggles: 0,
            hook: None,
        })
    }

    /// Run `hook(level, toggle_count)` after every toggle.
    pub fn on_toggle<F>(mut self, hook: F) -> Self
    where
        F: FnMut(Level, u64) + 'static,
    {
        self.hook = Some(Box::new(hook));
        self
    }

    /// Toggles performed so far.
    pub fn toggles(&self) -> u64 {
        self.toggles
    }

    /// Current level of the clock line.
    pub fn level(&self) -> Level {
        Level::from(self.clock.get())
    }

    /// Whether the driver is still running.
    pub fn state(&self) -> ClockState {
        self.state
    }

    fn next(&self, delay: u64) -> Combinator {
        Combinator::one_of([Event::timeout(delay), Event::rising_edge(self.done.clone())])
    }

    fn toggle(&mut self) -> Combinator {
        self.clock.set(!self.clock.get());
        self.toggles += 1;

        let level = self.level();
        let toggles = self.toggles;
        if let Some(hook) = self.hook.as_mut() {
            hook(level, toggles);
        }
        self.next(self.config.half_period)
    }
}

impl Machine for ClockDriver {
    type State = ClockState;

    fn current_state(&self) -> ClockState {
        self.state
    }

    fn transitions() -> Transitions<Self> {
        Transitions::new()
            .on(ClockState::Uninitialized, EventKind::Init, |m: &mut ClockDriver, _| {
                m.state = ClockState::Running;
                m.next(m.config.first_toggle())
            })
            .on(ClockState::Running, EventKind::Timeout, |m: &mut ClockDriver, _| {
                m.toggle()
            })
            .on(ClockState::Running, EventKind::RisingEdge, |m: &mut ClockDriver, _| {
                m.state = ClockState::Stopped;
                Combinator::None
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SimBuilder;

    fn lines() -> (Rc<Cell<bool>>, Rc<Cell<bool>>) {
        (Rc::new(Cell::new(false)), Rc::new(Cell::new(false)))
    }

    #[test]
    fn valid_config_passes() {
        assert!(ClockConfig::new(4).validate().is_success());
        assert!(ClockConfig::new(1).initial_delay(0).validate().is_success());
    }

    #[test]
    fn validation_accumulates_all_violations() {
        let config = ClockConfig::new(6).initial_delay(9);

        match config.validate() {
            Validation::Failure(errors) => {
                assert_eq!(errors.len(), 2);
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, ClockViolation::NotPowerOfTwo { half_period: 6 })));
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, ClockViolation::DelayTooLong { delay: 9, .. })));
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }

    #[test]
    fn zero_half_period_is_rejected() {
        let (clock, done) = lines();
        let err = ClockDriver::new(ClockConfig::new(0), clock, done).err().unwrap();
        assert_eq!(err, ClockConfigError(vec![ClockViolation::ZeroHalfPeriod]));
    }

    #[test]
    fn clock_toggles_until_done() {
        let (clock, done) = lines();
        let seen = Rc::new(Cell::new(0u64));
        let seen_by_hook = seen.clone();

        let driver = ClockDriver::new(ClockConfig::new(4), clock.clone(), done.clone())
            .unwrap()
            .on_toggle(move |_, n| seen_by_hook.set(n));

        let mut builder = SimBuilder::new();
        let id = builder.add(driver);
        let mut sim = builder.build().unwrap();

        // First toggle after 2 ticks, then every 4.
        for _ in 0..3 {
            sim.poll().unwrap();
        }
        assert!(clock.get());
        for _ in 0..4 {
            sim.poll().unwrap();
        }
        assert!(!clock.get());
        assert_eq!(seen.get(), 2);

        done.set(true);
        sim.run().unwrap();

        let driver = sim.machine(id).unwrap();
        assert_eq!(driver.state(), ClockState::Stopped);
        assert_eq!(driver.toggles(), 2);
    }
}
