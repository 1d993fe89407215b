//! Per-machine dispatch tables.

use crate::builder::RegistrationError;
use crate::core::{Combinator, Event, EventKind, Machine, State};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Transition handler: mutates the machine and says what to schedule next.
pub type Handler<M> = Box<dyn Fn(&mut M, &Event) -> Combinator>;

struct Entry<M: Machine> {
    /// `None` matches any state.
    state: Option<M::State>,
    kind: EventKind,
    handler: Handler<M>,
}

impl<M: Machine> Entry<M> {
    fn matches(&self, state: &M::State, kind: EventKind) -> bool {
        self.kind == kind && self.state.as_ref().is_none_or(|s| s == state)
    }

    fn describe(&self) -> String {
        match &self.state {
            Some(state) => state.name().to_string(),
            None => "*".to_string(),
        }
    }
}

/// Resolves `(state, event kind)` pairs to transition handlers.
///
/// An entry declared with [`Transitions::on_any`] is a wildcard for its event
/// kind: it matches every state that has no specific entry of its own.
pub struct Transitions<M: Machine> {
    entries: Vec<Entry<M>>,
}

impl<M: Machine> Transitions<M> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Handle `kind` while in `state`.
    pub fn on<F>(mut self, state: M::State, kind: EventKind, handler: F) -> Self
    where
        F: Fn(&mut M, &Event) -> Combinator + 'static,
    {
        self.entries.push(Entry {
            state: Some(state),
            kind,
            handler: Box::new(handler),
        });
        self
    }

    /// Handle `kind` in any state lacking a more specific entry.
    pub fn on_any<F>(mut self, kind: EventKind, handler: F) -> Self
    where
        F: Fn(&mut M, &Event) -> Combinator + 'static,
    {
        self.entries.push(Entry {
            state: None,
            kind,
            handler: Box::new(handler),
        });
        self
    }

    /// Find the handler for `(state, kind)`, preferring specific entries.
    pub fn resolve(&self, state: &M::State, kind: EventKind) -> Option<&Handler<M>> {
        self.entries
            .iter()
            .filter(|e| e.matches(state, kind))
            .min_by_key(|e| e.state.is_none())
            .map(|e| &e.handler)
    }

    /// Number of declared entries, wildcards included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entry has been declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check the table for registration problems, accumulating ALL of them.
    pub fn validate(&self, machine: &str) -> Validation<(), NonEmptyVec<RegistrationError>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<RegistrationError>>> = Vec::new();

        for (i, entry) in self.entries.iter().enumerate() {
            let duplicated = self.entries[..i]
                .iter()
                .any(|earlier| earlier.kind == entry.kind && earlier.state == entry.state);
            let check = if duplicated {
                Validation::fail(RegistrationError::DuplicateTransition {
                    machine: machine.to_string(),
                    state: entry.describe(),
                    event: entry.kind.name(),
                })
            } else {
                Validation::success(())
            };
            checks.push(check);
        }

        let init = if self
            .resolve(&M::State::UNINITIALIZED, EventKind::Init)
            .is_some()
        {
            Validation::success(())
        } else {
            Validation::fail(RegistrationError::MissingInitHandler {
                machine: machine.to_string(),
            })
        };
        checks.push(init);

        Validation::all_vec(checks).map(|_| ())
    }
}

impl<M: Machine> Default for Transitions<M> {
    fn default() -> Self {
        Self::new()
    }
}
