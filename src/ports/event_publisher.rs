//! EventPublisher port - Interface for publishing domain events.
//!
//! This port defines how committed changes reach event handlers without
//! the caller knowing about the underlying transport (in-memory channel,
//! broker, etc.).

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Port for publishing domain events.
///
/// Publication is split across two channels:
/// - `dispatch_sync` runs synchronous-channel handlers in the calling
///   stack; a handler error propagates and fails the operation
/// - `publish` / `publish_all` hand events to the asynchronous channel;
///   acceptance is the only guarantee, delivery failures surface through
///   observability and never reach the caller
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Run synchronous-channel handlers for these events, inline.
    ///
    /// # Errors
    ///
    /// The first handler error aborts the run and propagates.
    async fn dispatch_sync(&self, events: &[EventEnvelope]) -> Result<(), DomainError>;

    /// Hand a single event to the asynchronous channel.
    ///
    /// Waits for queue space when the channel is full.
    ///
    /// # Errors
    ///
    /// - `Infrastructure` if the channel is closed
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Hand multiple events to the asynchronous channel, in order.
    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError>;
}
