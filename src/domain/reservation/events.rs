//! Reservation request domain events.
//!
//! Events published when reservation lifecycle changes occur:
//! - `ReservationRequested` - New request filed against a listing
//! - `ReservationAccepted` - Sharer agreed to lend the item
//! - `ReservationRejected` - Sharer declined the request
//! - `ReservationCancelled` - Reserver withdrew the request
//! - `ReservationCloseRequested` - One party asked to wrap up
//! - `ReservationClosed` - Sharing concluded
//! - `ReservationRescheduled` - Reserver moved the requested period

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    domain_event, EventId, ListingId, Period, ReservationRequestId, Timestamp, UserId,
};

// ════════════════════════════════════════════════════════════════════════════
// ReservationRequested
// ════════════════════════════════════════════════════════════════════════════

/// Published when a user files a reservation request against a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationRequested {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// ID of the new reservation request.
    pub reservation_request_id: ReservationRequestId,

    /// Listing the request targets.
    pub listing_id: ListingId,

    /// User asking to borrow the item.
    pub reserver_id: UserId,

    /// Requested borrowing window.
    pub period: Period,

    /// When the request was filed.
    pub requested_at: Timestamp,
}

domain_event!(
    ReservationRequested,
    event_type = "reservation.requested.v1",
    schema_version = 1,
    aggregate_id = reservation_request_id,
    aggregate_type = "ReservationRequest",
    occurred_at = requested_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// ReservationAccepted
// ════════════════════════════════════════════════════════════════════════════

/// Published when the sharer accepts a request.
///
/// Carries both parties and the period so downstream notification needs
/// no further loads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationAccepted {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// ID of the accepted reservation request.
    pub reservation_request_id: ReservationRequestId,

    /// Listing the request targets.
    pub listing_id: ListingId,

    /// User borrowing the item.
    pub reserver_id: UserId,

    /// User lending the item.
    pub sharer_id: UserId,

    /// Agreed borrowing window.
    pub period: Period,

    /// When the request was accepted.
    pub accepted_at: Timestamp,
}

domain_event!(
    ReservationAccepted,
    event_type = "reservation.accepted.v1",
    schema_version = 1,
    aggregate_id = reservation_request_id,
    aggregate_type = "ReservationRequest",
    occurred_at = accepted_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// ReservationRejected
// ════════════════════════════════════════════════════════════════════════════

/// Published when the sharer declines a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationRejected {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// ID of the rejected reservation request.
    pub reservation_request_id: ReservationRequestId,

    /// Listing the request targeted.
    pub listing_id: ListingId,

    /// User whose request was declined.
    pub reserver_id: UserId,

    /// When the request was rejected.
    pub rejected_at: Timestamp,
}

domain_event!(
    ReservationRejected,
    event_type = "reservation.rejected.v1",
    schema_version = 1,
    aggregate_id = reservation_request_id,
    aggregate_type = "ReservationRequest",
    occurred_at = rejected_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// ReservationCancelled
// ════════════════════════════════════════════════════════════════════════════

/// Published when the reserver withdraws their request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCancelled {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// ID of the cancelled reservation request.
    pub reservation_request_id: ReservationRequestId,

    /// Listing the request targeted.
    pub listing_id: ListingId,

    /// User who withdrew the request.
    pub reserver_id: UserId,

    /// When the request was cancelled.
    pub cancelled_at: Timestamp,
}

domain_event!(
    ReservationCancelled,
    event_type = "reservation.cancelled.v1",
    schema_version = 1,
    aggregate_id = reservation_request_id,
    aggregate_type = "ReservationRequest",
    occurred_at = cancelled_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// ReservationCloseRequested
// ════════════════════════════════════════════════════════════════════════════

/// Published when one party asks to wrap up an accepted reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCloseRequested {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// ID of the reservation request entering closure.
    pub reservation_request_id: ReservationRequestId,

    /// Listing the request targets.
    pub listing_id: ListingId,

    /// Party who asked to close.
    pub requested_by: UserId,

    /// When closure was requested.
    pub close_requested_at: Timestamp,
}

domain_event!(
    ReservationCloseRequested,
    event_type = "reservation.close_requested.v1",
    schema_version = 1,
    aggregate_id = reservation_request_id,
    aggregate_type = "ReservationRequest",
    occurred_at = close_requested_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// ReservationClosed
// ════════════════════════════════════════════════════════════════════════════

/// Published when a sharing concludes.
///
/// Drives the sharing-history recording on the listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationClosed {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// ID of the closed reservation request.
    pub reservation_request_id: ReservationRequestId,

    /// Listing whose sharing history should record this closure.
    pub listing_id: ListingId,

    /// Party who confirmed closure.
    pub closed_by: UserId,

    /// When the sharing concluded.
    pub closed_at: Timestamp,
}

domain_event!(
    ReservationClosed,
    event_type = "reservation.closed.v1",
    schema_version = 1,
    aggregate_id = reservation_request_id,
    aggregate_type = "ReservationRequest",
    occurred_at = closed_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// ReservationRescheduled
// ════════════════════════════════════════════════════════════════════════════

/// Published when the reserver moves the requested period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationRescheduled {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// ID of the rescheduled reservation request.
    pub reservation_request_id: ReservationRequestId,

    /// Listing the request targets.
    pub listing_id: ListingId,

    /// New borrowing window.
    pub period: Period,

    /// When the period was changed.
    pub rescheduled_at: Timestamp,
}

domain_event!(
    ReservationRescheduled,
    event_type = "reservation.rescheduled.v1",
    schema_version = 1,
    aggregate_id = reservation_request_id,
    aggregate_type = "ReservationRequest",
    occurred_at = rescheduled_at,
    event_id = event_id
);
