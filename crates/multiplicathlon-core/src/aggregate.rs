//! Aggregate root abstraction.

use uuid::Uuid;

use crate::event::DomainEvent;

/// Trait for aggregate roots whose state is a fold over their own events.
///
/// Command methods validate, raise an event, apply it immediately and keep
/// it in the uncommitted buffer until the caller drains it.
pub trait AggregateRoot: Send + Sync {
    /// The event type this aggregate produces and consumes.
    type Event: DomainEvent;

    /// Returns the aggregate identifier.
    fn aggregate_id(&self) -> Uuid;

    /// Returns the current version (number of events applied).
    fn version(&self) -> i64;

    /// Apply an event to mutate internal state.
    fn apply(&mut self, event: &Self::Event);

    /// Returns events raised since the last drain.
    fn uncommitted_events(&self) -> &[Self::Event];

    /// Drains and returns the uncommitted events.
    fn take_uncommitted_events(&mut self) -> Vec<Self::Event>;
}
