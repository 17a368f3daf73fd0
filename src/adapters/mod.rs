//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `events` - The two-channel domain event bus
//! - `memory` - In-memory repositories and collaborators for testing
//!   and development

pub mod events;
pub mod memory;

pub use events::{DomainEventBus, EventBusConfig};
pub use memory::{
    InMemoryListingRepository, InMemoryReservationRequestRepository, InMemorySearchIndex,
    RecordingNotifier,
};
