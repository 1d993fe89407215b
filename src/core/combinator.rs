//! Transition results.
//!
//! A transition handler does not wait for anything itself. It returns a
//! [`Combinator`] describing what it wants scheduled next, and the simulator
//! turns that into pending records.

use super::event::Event;

/// What a transition wants scheduled next.
#[derive(Clone, Debug, Default)]
pub enum Combinator {
    /// Schedule nothing.
    #[default]
    None,

    /// Schedule exactly one event.
    Only(Event),

    /// Schedule every event. Each is tracked independently.
    AllOf(Vec<Event>),

    /// Schedule every event. The first to complete cancels all the others.
    OneOf(Vec<Event>),
}

impl Combinator {
    /// Schedule every event independently.
    pub fn all_of<I: IntoIterator<Item = Event>>(events: I) -> Self {
        Self::AllOf(events.into_iter().collect())
    }

    /// Schedule every event; the first to complete cancels the rest.
    pub fn one_of<I: IntoIterator<Item = Event>>(events: I) -> Self {
        Self::OneOf(events.into_iter().collect())
    }

    /// Whether this is [`Combinator::None`].
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Number of events this combinator schedules.
    pub fn len(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Only(_) => 1,
            Self::AllOf(events) | Self::OneOf(events) => events.len(),
        }
    }

    /// Whether no event would be scheduled.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The events this combinator schedules, in declaration order.
    pub fn events(&self) -> &[Event] {
        match self {
            Self::None => &[],
            Self::Only(event) => std::slice::from_ref(event),
            Self::AllOf(events) | Self::OneOf(events) => events,
        }
    }
}

impl From<Event> for Combinator {
    fn from(event: Event) -> Self {
        Self::Only(event)
    }
}
