//! Read-side services returning entity reference snapshots.
//!
//! Queries never hand out aggregates. Listings flatten directly into
//! `ListingRef`; reservation requests need the owning listing joined in
//! because a `ReservationRequestRef` carries the listing owner's id for
//! capability evaluation.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ListingId, ReservationRequestId, UserId};
use crate::domain::listing::ListingRef;
use crate::domain::reservation::ReservationRequestRef;
use crate::ports::{ListingRepository, ReservationRequestRepository};

/// Read-side service for listings.
#[derive(Clone)]
pub struct ListingQueries {
    listings: Arc<dyn ListingRepository>,
}

impl ListingQueries {
    pub fn new(listings: Arc<dyn ListingRepository>) -> Self {
        Self { listings }
    }

    /// Returns one listing snapshot.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no listing exists under `id`
    pub async fn get_by_id(&self, id: &ListingId) -> Result<ListingRef, DomainError> {
        Ok(self.listings.get(id).await?.to_ref())
    }

    /// Returns every listing regardless of state.
    pub async fn get_all(&self) -> Result<Vec<ListingRef>, DomainError> {
        self.listings.find_all().await
    }

    /// Returns the listings owned by a sharer.
    pub async fn get_by_sharer(&self, sharer_id: &UserId) -> Result<Vec<ListingRef>, DomainError> {
        self.listings.find_by_sharer(sharer_id).await
    }
}

/// Read-side service for reservation requests.
#[derive(Clone)]
pub struct ReservationQueries {
    requests: Arc<dyn ReservationRequestRepository>,
    listings: Arc<dyn ListingRepository>,
}

impl ReservationQueries {
    pub fn new(
        requests: Arc<dyn ReservationRequestRepository>,
        listings: Arc<dyn ListingRepository>,
    ) -> Self {
        Self { requests, listings }
    }

    /// Returns one reservation request snapshot.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the request or its listing does not exist
    pub async fn get_by_id(
        &self,
        id: &ReservationRequestId,
    ) -> Result<ReservationRequestRef, DomainError> {
        let request = self.requests.get(id).await?;
        let listing = self.listings.get(request.listing_id()).await?;
        Ok(request.to_ref(listing.sharer_id()))
    }

    /// Returns every request filed by a reserver.
    pub async fn get_by_reserver(
        &self,
        reserver_id: &UserId,
    ) -> Result<Vec<ReservationRequestRef>, DomainError> {
        let requests = self.requests.find_by_reserver(reserver_id).await?;

        let mut refs = Vec::with_capacity(requests.len());
        for request in requests {
            let listing = self.listings.get(request.listing_id()).await?;
            refs.push(request.to_ref(listing.sharer_id()));
        }
        Ok(refs)
    }

    /// Returns the active requests competing for one listing.
    pub async fn get_active_by_listing(
        &self,
        listing_id: &ListingId,
    ) -> Result<Vec<ReservationRequestRef>, DomainError> {
        let listing = self.listings.get(listing_id).await?;
        let requests = self.requests.find_active_by_listing(listing_id).await?;

        Ok(requests
            .into_iter()
            .map(|request| request.to_ref(listing.sharer_id()))
            .collect())
    }
}
