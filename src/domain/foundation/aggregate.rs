//! Aggregate root trait for state-stored aggregates.

use std::fmt;

use super::EventEnvelope;

/// Trait for aggregate roots persisted as state snapshots.
///
/// Aggregates are not event-sourced: the current state is the stored
/// document, and domain events are transient records queued during a
/// command method and drained once by the transactional scope that
/// persisted the change. The `version` counter is the optimistic
/// concurrency token checked by every conditional write.
pub trait AggregateRoot: Clone + Send + Sync {
    /// Strongly-typed identifier for this aggregate.
    type Id: fmt::Display + Clone + PartialEq + Send + Sync;

    /// Returns the aggregate type name (e.g., "ItemListing").
    ///
    /// Used for error context and event envelopes.
    fn aggregate_type() -> &'static str;

    /// Returns the aggregate's unique identifier.
    fn id(&self) -> &Self::Id;

    /// Returns the current version of the aggregate.
    ///
    /// Version starts at 0 for a new aggregate and advances with each
    /// successful conditional write.
    fn version(&self) -> u64;

    /// Sets the aggregate version.
    ///
    /// Called by the store when a conditional write succeeds.
    fn set_version(&mut self, version: u64);

    /// Drains the events queued by command methods since the last drain.
    ///
    /// Each queued event is returned at most once.
    fn take_events(&mut self) -> Vec<EventEnvelope>;
}
