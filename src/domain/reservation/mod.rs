//! Reservation request domain module.
//!
//! Handles the borrowing handshake: a reserver files a request against
//! a published listing, the listing's owner accepts or rejects it, and
//! either party concludes an accepted sharing. Requests point at their
//! listing by ID; the listing aggregate never owns them.
//!
//! # Events
//!
//! - `ReservationRequested` - Published when a reserver files a request
//! - `ReservationAccepted` - Published when the listing owner accepts
//! - `ReservationRejected` - Published when the listing owner declines
//! - `ReservationCancelled` - Published when the reserver withdraws
//! - `ReservationCloseRequested` - Published when the reserver asks to
//!   wrap up
//! - `ReservationClosed` - Published when the sharing concludes
//! - `ReservationRescheduled` - Published when the reserver moves the
//!   period

mod aggregate;
mod events;
mod reference;
mod state;
mod visa;

pub use aggregate::ReservationRequest;
pub use events::{
    ReservationAccepted, ReservationCancelled, ReservationCloseRequested, ReservationClosed,
    ReservationRejected, ReservationRequested, ReservationRescheduled,
};
pub use reference::ReservationRequestRef;
pub use state::ReservationState;
pub use visa::{ReservationGrants, ReservationVisa};
