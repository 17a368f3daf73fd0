//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, traits, and error types
//! that form the vocabulary of the Lend Circle domain.

mod aggregate;
mod command;
mod errors;
mod events;
mod ids;
mod passport;
mod period;
mod repository;
mod state_machine;
mod timestamp;

pub use aggregate::AggregateRoot;
pub use command::CommandMetadata;
pub use errors::{DomainError, ValidationError};
pub use events::{
    domain_event, DomainEvent, EventEnvelope, EventId, EventMetadata, SerializableDomainEvent,
};
pub use ids::{ListingId, ReservationRequestId, UserId};
pub use passport::Passport;
pub use period::Period;
pub use repository::AggregateStore;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
