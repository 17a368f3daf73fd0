//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `ListingRepository` - Listing store plus listing finders
//! - `ReservationRequestRepository` - Request store plus request finders
//!
//! Both extend the generic `AggregateStore` from the domain foundation.
//!
//! ## Event Ports
//!
//! - `EventPublisher` - Port for publishing domain events
//! - `EventSubscriber` - Port for subscribing to domain events
//! - `EventHandler` - Handler that processes incoming events
//!
//! ## Collaborator Ports
//!
//! - `SearchIndex` - Listing search documents
//! - `Notifier` - User-facing notifications

mod event_publisher;
mod event_subscriber;
mod listing_repository;
mod notifier;
mod reservation_request_repository;
mod search_index;

pub use event_publisher::EventPublisher;
pub use event_subscriber::{EventBus, EventHandler, EventSubscriber};
pub use listing_repository::ListingRepository;
pub use notifier::{Notification, Notifier};
pub use reservation_request_repository::ReservationRequestRepository;
pub use search_index::{IndexedListing, SearchIndex};
