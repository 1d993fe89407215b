//! Primitive events.
//!
//! The set of event kinds is fixed by the engine: machines pick from
//! [`EventKind`] and can never define their own. Each kind carries a
//! satisfaction predicate evaluated once per tick while the event is pending.

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Virtual clock value. Advances by exactly one per `poll`.
pub type Tick = u64;

/// Two-level interpretation of an external signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    Hi,
    Low,
}

impl From<bool> for Level {
    fn from(value: bool) -> Self {
        if value {
            Level::Hi
        } else {
            Level::Low
        }
    }
}

impl From<u8> for Level {
    fn from(value: u8) -> Self {
        Level::from(value != 0)
    }
}

/// Read capability over an externally owned, level-bearing value.
///
/// The testbench mutates the value freely between polls; the engine only
/// samples it.
pub trait LevelSource {
    fn level(&self) -> Level;
}

impl LevelSource for Rc<Cell<bool>> {
    fn level(&self) -> Level {
        Level::from(self.get())
    }
}

impl LevelSource for Rc<Cell<u8>> {
    fn level(&self) -> Level {
        Level::from(self.get())
    }
}

/// Discriminant of an [`Event`], used as the dispatch key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Init,
    Timeout,
    RisingEdge,
    FallingEdge,
}

impl EventKind {
    /// Human-readable name used in logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Init => "Init",
            Self::Timeout => "Timeout",
            Self::RisingEdge => "RisingEdge",
            Self::FallingEdge => "FallingEdge",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

type Sampler = Rc<dyn Fn() -> Level>;

/// Edge detector: remembers the last observed level of its source.
#[derive(Clone)]
struct Edge {
    sample: Sampler,
    last: Level,
}

impl Edge {
    fn new(sample: Sampler) -> Self {
        let last = sample();
        Self { sample, last }
    }

    /// Fires on a `from -> to` transition. The last observed level is only
    /// updated while the edge has not been seen.
    fn observe(&mut self, from: Level, to: Level) -> bool {
        let now = (self.sample)();
        if self.last == from && now == to {
            return true;
        }
        self.last = now;
        false
    }
}

#[derive(Clone)]
enum Trigger {
    Init,
    Timeout { duration: Tick, start: Tick },
    Rising(Edge),
    Falling(Edge),
}

/// A schedulable stimulus.
///
/// Ids are assigned by the simulator the first time the event is enqueued
/// (0 means unassigned). The optional tag is opaque to the engine and is
/// handed back to the owning machine's transition handler untouched.
///
/// Cloning yields an unscheduled copy: no id, not canceled, no siblings.
pub struct Event {
    id: u64,
    tag: Option<u64>,
    canceled: bool,
    cancel_on_complete: Vec<u64>,
    trigger: Trigger,
}

impl Event {
    fn with_trigger(trigger: Trigger) -> Self {
        Self {
            id: 0,
            tag: None,
            canceled: false,
            cancel_on_complete: Vec::new(),
            trigger,
        }
    }

    /// The registration event. Only the simulator creates these.
    pub(crate) fn init() -> Self {
        Self::with_trigger(Trigger::Init)
    }

    /// Satisfied once `duration` ticks have passed since the event was scheduled.
    pub fn timeout(duration: Tick) -> Self {
        Self::with_trigger(Trigger::Timeout { duration, start: 0 })
    }

    /// Satisfied on the first Low -> Hi transition of `source`.
    ///
    /// The source is sampled once here, so an event built while the source is
    /// already `Hi` waits for it to drop first.
    pub fn rising_edge<S: LevelSource + 'static>(source: S) -> Self {
        Self::with_trigger(Trigger::Rising(Edge::new(Rc::new(move || source.level()))))
    }

    /// Satisfied on the first Hi -> Low transition of `source`.
    pub fn falling_edge<S: LevelSource + 'static>(source: S) -> Self {
        Self::with_trigger(Trigger::Falling(Edge::new(Rc::new(move || source.level()))))
    }

    /// Rising edge over a value with a custom two-level interpretation.
    pub fn rising_edge_with<T, F>(source: Rc<Cell<T>>, eval: F) -> Self
    where
        T: Copy + 'static,
        F: Fn(T) -> Level + 'static,
    {
        Self::with_trigger(Trigger::Rising(Edge::new(Rc::new(move || eval(source.get())))))
    }

    /// Falling edge over a value with a custom two-level interpretation.
    pub fn falling_edge_with<T, F>(source: Rc<Cell<T>>, eval: F) -> Self
    where
        T: Copy + 'static,
        F: Fn(T) -> Level + 'static,
    {
        Self::with_trigger(Trigger::Falling(Edge::new(Rc::new(move || eval(source.get())))))
    }

    /// Attach a user correlation tag.
    pub fn with_tag(mut self, tag: u64) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Which primitive event this is.
    pub fn kind(&self) -> EventKind {
        match self.trigger {
            Trigger::Init => EventKind::Init,
            Trigger::Timeout { .. } => EventKind::Timeout,
            Trigger::Rising(_) => EventKind::RisingEdge,
            Trigger::Falling(_) => EventKind::FallingEdge,
        }
    }

    /// Engine-assigned id, 0 while unassigned.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Whether the simulator has assigned an id yet.
    pub fn has_id(&self) -> bool {
        self.id != 0
    }

    /// User correlation tag, if one was attached.
    pub fn tag(&self) -> Option<u64> {
        self.tag
    }

    /// Whether a sibling's completion has canceled this event.
    pub fn is_canceled(&self) -> bool {
        self.canceled
    }

    /// Ids of sibling events canceled when this one completes.
    pub fn cancel_on_complete(&self) -> &[u64] {
        &self.cancel_on_complete
    }

    pub(crate) fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    pub(crate) fn cancel(&mut self) {
        self.canceled = true;
    }

    /// Record every id in `group` except this event's own.
    pub(crate) fn cancel_siblings(&mut self, group: &[u64]) {
        let own = self.id;
        self.cancel_on_complete
            .extend(group.iter().copied().filter(|id| *id != own));
    }

    /// Start the timer, if any. Called when the event is scheduled.
    pub(crate) fn start(&mut self, now: Tick) {
        if let Trigger::Timeout { start, .. } = &mut self.trigger {
            *start = now;
        }
    }

    /// Evaluate the satisfaction predicate at tick `now`.
    ///
    /// Edge events sample their source and may update their last observed level.
    pub(crate) fn satisfied(&mut self, now: Tick) -> bool {
        match &mut self.trigger {
            Trigger::Init => true,
            Trigger::Timeout { duration, start } => now >= start.saturating_add(*duration),
            Trigger::Rising(edge) => edge.observe(Level::Low, Level::Hi),
            Trigger::Falling(edge) => edge.observe(Level::Hi, Level::Low),
        }
    }
}

impl Clone for Event {
    fn clone(&self) -> Self {
        Self {
            tag: self.tag,
            ..Self::with_trigger(self.trigger.clone())
        }
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("kind", &self.kind())
            .field("id", &self.id)
            .field("tag", &self.tag)
            .field("canceled", &self.canceled)
            .field("cancel_on_complete", &self.cancel_on_complete)
            .finish()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind(), f)
    }
}
