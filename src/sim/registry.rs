//! Outstanding-event registry.
//!
//! Records are kept in insertion order. That order decides which of several
//! events satisfied on the same tick is evaluated first, and therefore which
//! member of a `OneOf` group wins a tie.

use crate::core::{Combinator, Event, Tick};
use std::collections::VecDeque;
use tracing::trace;

/// Stable slot index of a registered machine.
pub(crate) type Slot = usize;

/// A pending `(machine, event)` pair.
#[derive(Debug)]
pub(crate) struct Outstanding {
    pub machine: Slot,
    pub event: Event,
}

/// Per-machine event id counter. Ids start at 1; 0 means unassigned.
#[derive(Debug, Default)]
pub(crate) struct IdAllocator {
    last: u64,
}

impl IdAllocator {
    /// Assign an id to `event` if it has none, returning its id.
    pub fn assign(&mut self, event: &mut Event) -> u64 {
        if !event.has_id() {
            self.last += 1;
            event.set_id(self.last);
        }
        event.id()
    }
}

#[derive(Debug, Default)]
pub(crate) struct Registry {
    records: VecDeque<Outstanding>,
}

impl Registry {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn pop_front(&mut self) -> Option<Outstanding> {
        self.records.pop_front()
    }

    pub fn push(&mut self, record: Outstanding) {
        self.records.push_back(record);
    }

    /// Schedule a single event: assign its id, start its timer, append it.
    fn enqueue(&mut self, machine: Slot, ids: &mut IdAllocator, now: Tick, mut event: Event) {
        ids.assign(&mut event);
        event.start(now);
        self.push(Outstanding { machine, event });
    }

    /// Expand a transition result into pending records.
    pub fn expand(&mut self, machine: Slot, ids: &mut IdAllocator, now: Tick, combinator: Combinator) {
        match combinator {
            Combinator::None => {}
            Combinator::Only(event) => self.enqueue(machine, ids, now, event),
            Combinator::AllOf(events) => {
                for event in events {
                    self.enqueue(machine, ids, now, event);
                }
            }
            Combinator::OneOf(mut events) => {
                let group: Vec<u64> = events.iter_mut().map(|e| ids.assign(e)).collect();
                for mut event in events {
                    event.cancel_siblings(&group);
                    self.enqueue(machine, ids, now, event);
                }
            }
        }
    }

    /// Mark `machine`'s pending event `id` canceled. Returns whether one matched.
    pub fn cancel(&mut self, machine: Slot, id: u64) -> bool {
        let mut found = false;
        for record in self
            .records
            .iter_mut()
            .filter(|r| r.machine == machine && r.event.id() == id)
        {
            trace!(machine, id, "canceled");
            record.event.cancel();
            found = true;
        }
        found
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &Outstanding> {
        self.records.iter()
    }
}
