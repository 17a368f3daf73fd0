//! In-memory adapters for testing and development.
//!
//! Each adapter honors the same contract a production implementation
//! would: conditional writes on the repositories, replace-on-upsert in
//! the index. They additionally expose recording helpers for test
//! assertions.

mod listing_repository;
mod notifier;
mod reservation_request_repository;
mod search_index;

pub use listing_repository::InMemoryListingRepository;
pub use notifier::RecordingNotifier;
pub use reservation_request_repository::InMemoryReservationRequestRepository;
pub use search_index::InMemorySearchIndex;
