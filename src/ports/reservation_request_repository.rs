//! Reservation request repository port (write side).
//!
//! Extends the generic aggregate store with request-specific finders.
//! Finders return full aggregates rather than refs: a
//! `ReservationRequestRef` flattens in the listing owner's id, which
//! only the caller can join in from the listing side.

use async_trait::async_trait;

use crate::domain::foundation::{AggregateStore, DomainError, ListingId, Timestamp, UserId};
use crate::domain::reservation::ReservationRequest;

/// Repository port for `ReservationRequest` persistence.
///
/// Implementations must ensure:
/// - `find_active_by_listing` covers exactly the Requested and Accepted
///   states (the overlap invariant is checked against these)
/// - `find_settled_updated_before` covers exactly the Rejected, Closed
///   and Cancelled states (the retention sweep deletes these)
#[async_trait]
pub trait ReservationRequestRepository: AggregateStore<ReservationRequest> {
    /// Find all requests filed by a reserver.
    async fn find_by_reserver(
        &self,
        reserver_id: &UserId,
    ) -> Result<Vec<ReservationRequest>, DomainError>;

    /// Find active (Requested or Accepted) requests targeting a listing.
    async fn find_active_by_listing(
        &self,
        listing_id: &ListingId,
    ) -> Result<Vec<ReservationRequest>, DomainError>;

    /// Find settled requests not touched since the cutoff.
    ///
    /// Feeds the retention purge.
    async fn find_settled_updated_before(
        &self,
        cutoff: &Timestamp,
    ) -> Result<Vec<ReservationRequest>, DomainError>;
}
