//! Command service for the reservation request lifecycle.
//!
//! Reservation commands always run against a pair of snapshots: the request
//! itself and a `ListingRef` of the listing it targets. The listing is
//! loaded first so the aggregate can verify the linkage and evaluate
//! owner-side capabilities; the request is then mutated inside the
//! transactional scope.
//!
//! The admission paths (filing and rescheduling) serialize per listing:
//! the overlap check and the write that follows it hold the listing's
//! admission lock together, so the no-overlap rule survives concurrent
//! use.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::application::UnitOfWork;
use crate::domain::foundation::{
    AggregateRoot, CommandMetadata, DomainError, ListingId, Passport, Period,
    ReservationRequestId,
};
use crate::domain::listing::ListingRef;
use crate::domain::reservation::{ReservationRequest, ReservationRequestRef};
use crate::ports::{ListingRepository, ReservationRequestRepository};

/// Per-listing admission locks.
///
/// Holding a listing's lock across the overlap check and the write that
/// follows it serializes concurrent admissions for that listing.
/// Entries live for the lifetime of the service; clones share the map.
#[derive(Clone, Default)]
struct AdmissionLocks {
    per_listing: Arc<Mutex<HashMap<ListingId, Arc<Mutex<()>>>>>,
}

impl AdmissionLocks {
    /// Takes the admission lock for one listing.
    ///
    /// The registry lock is released before waiting on the listing lock,
    /// so admissions for other listings never queue behind it.
    async fn acquire(&self, listing_id: &ListingId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut per_listing = self.per_listing.lock().await;
            per_listing.entry(*listing_id).or_default().clone()
        };
        lock.lock_owned().await
    }
}

/// Application service exposing the reservation request command API.
#[derive(Clone)]
pub struct ReservationCommands {
    listings: Arc<dyn ListingRepository>,
    requests: Arc<dyn ReservationRequestRepository>,
    unit_of_work: UnitOfWork<ReservationRequest>,
    admission: AdmissionLocks,
}

impl ReservationCommands {
    /// Creates the service over both repositories and the request scope.
    pub fn new(
        listings: Arc<dyn ListingRepository>,
        requests: Arc<dyn ReservationRequestRepository>,
        unit_of_work: UnitOfWork<ReservationRequest>,
    ) -> Self {
        Self {
            listings,
            requests,
            unit_of_work,
            admission: AdmissionLocks::default(),
        }
    }

    /// Files a reservation request against a published listing.
    ///
    /// Admissions for one listing run serialized: of two concurrent
    /// overlapping requests, exactly one is admitted.
    ///
    /// # Errors
    ///
    /// - `Authorization` if the passport carries no actor
    /// - `NotFound` if the listing does not exist
    /// - `Conflict` if the listing is not open, the caller owns it, the
    ///   period falls outside the sharing window, or another active request
    ///   overlaps the period
    pub async fn request(
        &self,
        listing_id: ListingId,
        passport: &Passport,
        period: Period,
        metadata: CommandMetadata,
    ) -> Result<ReservationRequestRef, DomainError> {
        // 1. Resolve the reserver; system passports cannot reserve
        let id = ReservationRequestId::new();
        let reserver_id = passport.actor_id().cloned().ok_or_else(|| {
            DomainError::authorization(ReservationRequest::aggregate_type(), id, "request")
        })?;

        // 2. Load the listing snapshot the admission guards run against
        let listing = self.listings.get(&listing_id).await?.to_ref();

        // 3. Admission guards: listing open, not the caller's own, period
        //    inside the sharing window
        let request = ReservationRequest::new(id, &listing, reserver_id, period)?;

        // 4. No double-booking against other active requests; the check
        //    and the insert below hold the listing's admission lock
        let _admission = self.admission.acquire(&listing_id).await;
        self.ensure_no_overlap(&listing_id, &period, None).await?;

        // 5. Insert and dispatch
        let stored = self.unit_of_work.with_new(request, &metadata).await?;
        Ok(stored.to_ref(&listing.sharer_id))
    }

    /// Accepts a pending request on behalf of the listing owner.
    pub async fn accept(
        &self,
        id: ReservationRequestId,
        passport: &Passport,
        metadata: CommandMetadata,
    ) -> Result<ReservationRequestRef, DomainError> {
        let listing = self.listing_of(&id).await?;
        let stored = self
            .unit_of_work
            .with_scoped_transaction(&id, &metadata, |request| request.accept(passport, &listing))
            .await?;
        Ok(stored.to_ref(&listing.sharer_id))
    }

    /// Declines a pending request on behalf of the listing owner.
    pub async fn reject(
        &self,
        id: ReservationRequestId,
        passport: &Passport,
        metadata: CommandMetadata,
    ) -> Result<ReservationRequestRef, DomainError> {
        let listing = self.listing_of(&id).await?;
        let stored = self
            .unit_of_work
            .with_scoped_transaction(&id, &metadata, |request| request.reject(passport, &listing))
            .await?;
        Ok(stored.to_ref(&listing.sharer_id))
    }

    /// Withdraws the caller's own request.
    pub async fn cancel(
        &self,
        id: ReservationRequestId,
        passport: &Passport,
        metadata: CommandMetadata,
    ) -> Result<ReservationRequestRef, DomainError> {
        let listing = self.listing_of(&id).await?;
        let stored = self
            .unit_of_work
            .with_scoped_transaction(&id, &metadata, |request| request.cancel(passport, &listing))
            .await?;
        Ok(stored.to_ref(&listing.sharer_id))
    }

    /// Asks to wrap up an accepted sharing, on behalf of the reserver.
    pub async fn request_close(
        &self,
        id: ReservationRequestId,
        passport: &Passport,
        metadata: CommandMetadata,
    ) -> Result<ReservationRequestRef, DomainError> {
        let listing = self.listing_of(&id).await?;
        let stored = self
            .unit_of_work
            .with_scoped_transaction(&id, &metadata, |request| {
                request.request_close(passport, &listing)
            })
            .await?;
        Ok(stored.to_ref(&listing.sharer_id))
    }

    /// Confirms closure of the sharing, by either party.
    pub async fn close(
        &self,
        id: ReservationRequestId,
        passport: &Passport,
        metadata: CommandMetadata,
    ) -> Result<ReservationRequestRef, DomainError> {
        let listing = self.listing_of(&id).await?;
        let stored = self
            .unit_of_work
            .with_scoped_transaction(&id, &metadata, |request| request.close(passport, &listing))
            .await?;
        Ok(stored.to_ref(&listing.sharer_id))
    }

    /// Moves a pending request to a different period.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the new period leaves the sharing window or clashes
    ///   with another active request
    pub async fn reschedule(
        &self,
        id: ReservationRequestId,
        passport: &Passport,
        new_period: Period,
        metadata: CommandMetadata,
    ) -> Result<ReservationRequestRef, DomainError> {
        // 1. Load both snapshots
        let current = self.requests.get(&id).await?;
        let listing = self.listings.get(current.listing_id()).await?.to_ref();

        // 2. The new period must not clash with other active requests;
        //    the request's own current period is excluded. The check and
        //    the write below hold the listing's admission lock
        let _admission = self.admission.acquire(current.listing_id()).await;
        self.ensure_no_overlap(current.listing_id(), &new_period, Some(&id))
            .await?;

        // 3. Reschedule inside the transactional scope
        let stored = self
            .unit_of_work
            .with_scoped_transaction(&id, &metadata, |request| {
                request.reschedule(passport, &listing, new_period)
            })
            .await?;
        Ok(stored.to_ref(&listing.sharer_id))
    }

    /// Removes a request record entirely, on behalf of the listing owner.
    ///
    /// Physical removal emits no events; retention sweeps use the same
    /// repository path under the system gate.
    pub async fn delete(
        &self,
        id: ReservationRequestId,
        passport: &Passport,
    ) -> Result<(), DomainError> {
        // 1. Load the request and the listing it targets
        let request = self.requests.get(&id).await?;
        let listing = self.listings.get(request.listing_id()).await?.to_ref();

        // 2. Owner-only capability check
        let visa = passport.for_reservation_request(&request.to_ref(&listing.sharer_id));
        if !visa.determine_if(|g| g.can_delete) {
            return Err(DomainError::authorization(
                ReservationRequest::aggregate_type(),
                id,
                "delete",
            ));
        }

        // 3. Remove the record
        self.requests.delete(&id).await
    }

    // ─────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────

    /// Loads the listing referenced by the given request.
    async fn listing_of(&self, id: &ReservationRequestId) -> Result<ListingRef, DomainError> {
        let request = self.requests.get(id).await?;
        Ok(self.listings.get(request.listing_id()).await?.to_ref())
    }

    /// Fails with `Conflict` when an active request on the listing overlaps
    /// `period`. `exclude` skips the request being rescheduled.
    async fn ensure_no_overlap(
        &self,
        listing_id: &ListingId,
        period: &Period,
        exclude: Option<&ReservationRequestId>,
    ) -> Result<(), DomainError> {
        let active = self.requests.find_active_by_listing(listing_id).await?;
        let clash = active
            .iter()
            .filter(|request| exclude.map_or(true, |skip| request.id() != skip))
            .any(|request| request.period().overlaps(period));

        if clash {
            return Err(DomainError::conflict(format!(
                "an active reservation request already overlaps the requested period for listing {listing_id}"
            )));
        }
        Ok(())
    }
}
