//! The stepping engine.

use super::config::SimConfig;
use super::error::SimError;
use super::registry::{IdAllocator, Registry, Slot};
use super::trace::{DispatchRecord, DispatchTrace};
use crate::core::{Event, EventKind, Machine, Tick};
use crate::dispatch::DynMachine;
use std::fmt;
use std::marker::PhantomData;
use tracing::{debug, enabled, error, trace};

/// Typed handle to a machine owned by a [`Simulator`].
pub struct MachineId<M> {
    slot: Slot,
    _phantom: PhantomData<fn() -> M>,
}

impl<M> MachineId<M> {
    pub(crate) fn new(slot: Slot) -> Self {
        Self {
            slot,
            _phantom: PhantomData,
        }
    }

    /// Position of the machine in registration order.
    pub fn index(&self) -> usize {
        self.slot
    }
}

impl<M> Clone for MachineId<M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M> Copy for MachineId<M> {}

impl<M> fmt::Debug for MachineId<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MachineId").field(&self.slot).finish()
    }
}

/// A registered machine and its id space.
pub(crate) struct MachineSlot {
    pub label: String,
    pub machine: Box<dyn DynMachine>,
    pub ids: IdAllocator,
}

/// Discrete-event simulator over a fixed set of machines.
///
/// Built by [`SimBuilder`](crate::builder::SimBuilder). Each call to
/// [`poll`](Simulator::poll) performs one tick of work.
pub struct Simulator {
    now: Tick,
    slots: Vec<MachineSlot>,
    pending: Registry,
    config: SimConfig,
    trace: DispatchTrace,
    halted: bool,
}

impl Simulator {
    pub(crate) fn new(slots: Vec<MachineSlot>, config: SimConfig) -> Self {
        Self {
            now: 0,
            slots,
            pending: Registry::default(),
            config,
            trace: DispatchTrace::new(),
            halted: false,
        }
    }

    /// Deliver the sole `Init` event to every machine, in registration order.
    pub(crate) fn initialize(&mut self) -> Result<(), SimError> {
        let mut initial = Registry::default();
        for slot in 0..self.slots.len() {
            let event = Event::init();
            self.fire(slot, &event, &mut initial)?;
        }
        self.pending = initial;
        Ok(())
    }

    /// Current tick.
    pub fn now(&self) -> Tick {
        self.now
    }

    /// Number of outstanding events, including canceled ones not yet dropped.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Whether a fatal error has stopped the run.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Configuration the simulator was built with.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Dispatches recorded so far. Empty unless tracing is enabled.
    pub fn trace(&self) -> &DispatchTrace {
        &self.trace
    }

    /// Label used for `id` in logs, errors and the trace.
    pub fn label<M: Machine>(&self, id: MachineId<M>) -> Option<&str> {
        self.slots.get(id.slot).map(|s| s.label.as_str())
    }

    /// Read-only view of a registered machine. Only the machine's own
    /// transition handlers change its state.
    pub fn machine<M: Machine>(&self, id: MachineId<M>) -> Option<&M> {
        self.slots
            .get(id.slot)
            .and_then(|s| s.machine.as_any().downcast_ref::<M>())
    }

    /// Advance the simulation by one tick.
    ///
    /// Returns `Ok(false)` once no events remain, `Ok(true)` otherwise, even if
    /// nothing fired this tick. An invalid transition halts the simulator.
    pub fn poll(&mut self) -> Result<bool, SimError> {
        if self.halted {
            return Err(SimError::Halted);
        }
        if self.pending.is_empty() {
            return Ok(false);
        }

        match self.step() {
            Ok(()) => Ok(true),
            Err(e) => {
                error!(tick = self.now, error = %e, "simulation halted");
                self.halted = true;
                self.pending = Registry::default();
                Err(e)
            }
        }
    }

    fn step(&mut self) -> Result<(), SimError> {
        trace!(tick = self.now, pending = self.pending.len(), "poll");

        let mut current = std::mem::take(&mut self.pending);
        let mut next = Registry::default();

        while let Some(mut record) = current.pop_front() {
            if record.event.is_canceled() {
                continue;
            }
            if !record.event.satisfied(self.now) {
                next.push(record);
                continue;
            }

            self.fire(record.machine, &record.event, &mut next)?;

            // Siblings may sit later in this pass or already in the next tick.
            for &id in record.event.cancel_on_complete() {
                current.cancel(record.machine, id);
                next.cancel(record.machine, id);
            }
        }

        self.now += 1;
        self.pending = next;
        Ok(())
    }

    /// Dispatch `event` to the machine in `slot` and expand the result into `into`.
    fn fire(&mut self, slot: Slot, event: &Event, into: &mut Registry) -> Result<(), SimError> {
        let describe = self.config.record_trace || enabled!(tracing::Level::DEBUG);
        let entry = &mut self.slots[slot];
        let dispatched = entry.machine.dispatch(&entry.label, event, describe)?;

        if dispatched
            .combinator
            .events()
            .iter()
            .any(|e| e.kind() == EventKind::Init)
        {
            return Err(SimError::InitResubmitted {
                machine: entry.label.clone(),
            });
        }

        if let Some((from, to)) = dispatched.names {
            debug!(
                tick = self.now,
                machine = %entry.label,
                event = %event.kind(),
                id = event.id(),
                from = %from,
                to = %to,
                "dispatched"
            );

            if self.config.record_trace {
                self.trace.record(DispatchRecord {
                    tick: self.now,
                    machine: entry.label.clone(),
                    event: event.kind(),
                    event_id: event.id(),
                    tag: event.tag(),
                    from,
                    to,
                });
            }
        }

        into.expand(slot, &mut entry.ids, self.now, dispatched.combinator);
        Ok(())
    }

    /// Poll until no work remains. Returns the tick at which the run ended.
    pub fn run(&mut self) -> Result<Tick, SimError> {
        self.run_until(|_| false)
    }

    /// Poll until `done` holds or no work remains, whichever comes first.
    ///
    /// `done` is checked before every tick. Honors the configured tick limit.
    pub fn run_until<F>(&mut self, mut done: F) -> Result<Tick, SimError>
    where
        F: FnMut(&Simulator) -> bool,
    {
        while !done(self) {
            if let Some(limit) = self.config.tick_limit {
                if self.now >= limit && !self.pending.is_empty() {
                    return Err(SimError::TickLimitExceeded { limit });
                }
            }
            if !self.poll()? {
                break;
            }
        }
        Ok(self.now)
    }
}

impl fmt::Debug for Simulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulator")
            .field("now", &self.now)
            .field("machines", &self.slots.iter().map(|s| &s.label).collect::<Vec<_>>())
            .field("pending", &self.pending.len())
            .field("halted", &self.halted)
            .finish()
    }
}
