//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, passports, errors)
//! - `listing` - Item listing aggregate, lifecycle and moderation loop
//! - `reservation` - Reservation request aggregate and borrowing handshake

pub mod foundation;
pub mod listing;
pub mod reservation;
