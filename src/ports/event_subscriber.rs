//! EventSubscriber port - Interface for subscribing to domain events.
//!
//! This port defines how handlers register interest in domain events
//! without knowing about the underlying transport mechanism.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Handler for processing domain events.
///
/// Implementations should be:
/// - **Idempotent** - The asynchronous channel delivers at-least-once
/// - **Quick** - Synchronous-channel handlers run in the committing call
/// - **Isolated** - One handler's failure must not corrupt another's work
///
/// # Example
///
/// ```ignore
/// struct SearchSync { /* ... */ }
///
/// #[async_trait]
/// impl EventHandler for SearchSync {
///     async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
///         let payload: ListingPublished = event.payload_as()?;
///         // Refresh the search document...
///         Ok(())
///     }
///
///     fn name(&self) -> &'static str {
///         "SearchSync"
///     }
/// }
/// ```
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Process an event.
    ///
    /// Must be idempotent: the same event may be delivered more than
    /// once on the asynchronous channel.
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Handler name for logging.
    fn name(&self) -> &'static str;
}

/// Port for subscribing to domain events.
///
/// Registration happens at process start, before dispatching begins. A
/// given event type may have zero, one, or many handlers on either
/// channel.
pub trait EventSubscriber: Send + Sync {
    /// Register a handler on the synchronous channel.
    ///
    /// The handler runs inline in the committing call; its error fails
    /// the triggering operation. Reserved for strict invariants.
    fn register_sync(&self, event_type: &str, handler: Arc<dyn EventHandler>);

    /// Register a handler on the asynchronous channel.
    ///
    /// The handler runs on the dispatcher task after commit, with
    /// bounded retry; its error never reaches the triggering caller.
    fn register(&self, event_type: &str, handler: Arc<dyn EventHandler>);

    /// Register one handler for several event types on the
    /// asynchronous channel.
    fn register_all(&self, event_types: &[&str], handler: Arc<dyn EventHandler>);
}

/// Combined trait for event bus implementations.
///
/// An EventBus provides both publishing and subscribing capabilities.
pub trait EventBus: super::EventPublisher + EventSubscriber {}

// Blanket implementation - any type that implements both traits is an EventBus
impl<T: super::EventPublisher + EventSubscriber> EventBus for T {}
