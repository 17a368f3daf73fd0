//! Transactional scope shared by all command services.
//!
//! `UnitOfWork` owns the load-mutate-persist-dispatch sequence for a single
//! aggregate instance. Command services never talk to the store or the event
//! publisher directly for writes; they hand a mutation closure to the scope
//! and get back the persisted snapshot.
//!
//! # Event flow
//!
//! Events queued by the aggregate during the mutation are drained exactly
//! once, stamped with the command's correlation context, dispatched to the
//! synchronous channel inline, and then handed to the asynchronous channel.
//! If the conditional write fails, no events leave the scope. A synchronous
//! handler failure surfaces to the caller and skips the asynchronous channel;
//! the persisted write stands.

use std::sync::Arc;

use tracing::debug;

use crate::domain::foundation::{
    AggregateRoot, AggregateStore, CommandMetadata, DomainError, EventEnvelope,
};
use crate::ports::EventPublisher;

/// Transactional scope for a single aggregate type.
///
/// Cheap to clone; both dependencies are shared behind `Arc`.
#[derive(Clone)]
pub struct UnitOfWork<A: AggregateRoot> {
    store: Arc<dyn AggregateStore<A>>,
    publisher: Arc<dyn EventPublisher>,
}

impl<A: AggregateRoot> UnitOfWork<A> {
    /// Creates a scope over the given store and event publisher.
    pub fn new(store: Arc<dyn AggregateStore<A>>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self { store, publisher }
    }

    /// Inserts a fresh aggregate and dispatches its queued events.
    ///
    /// Returns the stored snapshot.
    ///
    /// # Errors
    ///
    /// - `Conflict` if an aggregate with the same ID already exists
    /// - any error a synchronous event handler returns
    pub async fn with_new(
        &self,
        mut aggregate: A,
        metadata: &CommandMetadata,
    ) -> Result<A, DomainError> {
        // 1. Insert; a duplicate ID fails here and nothing is dispatched
        let stored = self.store.save(&aggregate).await?;

        // 2. Drain the queued events and stamp the command context
        let events = stamp(aggregate.take_events(), metadata);

        // 3. Synchronous channel first, then the asynchronous queue
        self.dispatch(events).await?;

        Ok(stored)
    }

    /// Loads an aggregate, applies `mutate`, and persists the result with a
    /// version-checked conditional write.
    ///
    /// Returns the stored snapshot with its version advanced. The mutation
    /// closure runs on the freshly loaded copy; if it returns an error the
    /// store is left untouched and nothing is dispatched.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no aggregate exists under `id`
    /// - any error returned by `mutate`
    /// - `Concurrency` if a concurrent write advanced the stored version
    /// - any error a synchronous event handler returns
    pub async fn with_scoped_transaction<F>(
        &self,
        id: &A::Id,
        metadata: &CommandMetadata,
        mutate: F,
    ) -> Result<A, DomainError>
    where
        F: FnOnce(&mut A) -> Result<(), DomainError>,
    {
        // 1. Load the current snapshot
        let mut aggregate = self.store.get(id).await?;

        // 2. Apply the mutation; domain errors abort before any write
        mutate(&mut aggregate)?;

        // 3. Conditional write keyed on the loaded version
        let stored = self.store.update(&aggregate).await?;

        // 4. Drain the queued events and stamp the command context
        let events = stamp(aggregate.take_events(), metadata);

        // 5. Synchronous channel first, then the asynchronous queue
        self.dispatch(events).await?;

        Ok(stored)
    }

    async fn dispatch(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError> {
        if events.is_empty() {
            return Ok(());
        }

        debug!(
            aggregate_type = A::aggregate_type(),
            count = events.len(),
            "Dispatching domain events"
        );

        self.publisher.dispatch_sync(&events).await?;
        self.publisher.publish_all(events).await
    }
}

/// Copies the command's correlation context onto each drained envelope.
///
/// The correlation ID is resolved once so every event of the command shares
/// the same value even when the metadata has to generate one.
fn stamp(events: Vec<EventEnvelope>, metadata: &CommandMetadata) -> Vec<EventEnvelope> {
    let correlation_id = metadata.correlation_id();

    events
        .into_iter()
        .map(|event| {
            let mut event = event.with_correlation_id(correlation_id.clone());
            if let Some(actor) = metadata.actor() {
                event = event.with_user_id(actor);
            }
            if let Some(trace_id) = metadata.trace_id() {
                event = event.with_trace_id(trace_id);
            }
            event
        })
        .collect()
}
