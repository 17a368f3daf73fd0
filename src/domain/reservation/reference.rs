//! Read-only reservation request reference (Entity Reference).

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ListingId, Period, ReservationRequestId, Timestamp, UserId};

use super::ReservationState;

/// Flattened read-only projection of a `ReservationRequest`.
///
/// Carries the referenced listing's owner (`listing_sharer_id`) so a visa
/// can be minted from the ref alone, without loading the listing again.
/// Constructed fresh on every load and never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationRequestRef {
    pub id: ReservationRequestId,
    pub listing_id: ListingId,
    pub reserver_id: UserId,
    pub listing_sharer_id: UserId,
    pub state: ReservationState,
    pub period: Period,
    pub close_requested_by_sharer: bool,
    pub close_requested_by_reserver: bool,
    pub version: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
