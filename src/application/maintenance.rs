//! Scheduled sweeps: listing expiry and reservation retention.
//!
//! Both sweeps are batch jobs driven by a scheduler, not user commands.
//! They work item by item and never abort the whole batch on a single
//! failure: a listing that cannot be expired or a request that cannot be
//! deleted is logged and skipped, and the sweep reports what it actually
//! transitioned.

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::UnitOfWork;
use crate::domain::foundation::{
    AggregateRoot, CommandMetadata, DomainError, ListingId, Passport, ReservationRequestId,
    Timestamp, UserId,
};
use crate::domain::listing::ItemListing;
use crate::domain::reservation::ReservationRequest;
use crate::ports::{ListingRepository, ReservationRequestRepository};

/// Default retention for settled reservation requests, in days.
pub const DEFAULT_PURGE_AFTER_DAYS: i64 = 183;

/// Application service running the scheduled sweeps.
#[derive(Clone)]
pub struct Maintenance {
    listings: Arc<dyn ListingRepository>,
    requests: Arc<dyn ReservationRequestRepository>,
    listing_uow: UnitOfWork<ItemListing>,
    purge_after_days: i64,
}

impl Maintenance {
    /// Creates the service.
    ///
    /// `purge_after_days` is how long settled reservation requests are
    /// kept after their last update before the retention sweep removes
    /// them.
    pub fn new(
        listings: Arc<dyn ListingRepository>,
        requests: Arc<dyn ReservationRequestRepository>,
        listing_uow: UnitOfWork<ItemListing>,
        purge_after_days: i64,
    ) -> Self {
        Self {
            listings,
            requests,
            listing_uow,
            purge_after_days,
        }
    }

    /// Expires every Published listing whose sharing period has ended.
    ///
    /// `sharer_id` restricts the sweep to one owner's listings; `None`
    /// sweeps everything. Each listing goes through the regular `expire`
    /// command, so the passport still has to hold the capability and a
    /// `listing.expired.v1` event is published per transition. Listings
    /// that fail are logged and skipped.
    ///
    /// Returns the IDs that actually transitioned to Expired.
    ///
    /// # Errors
    ///
    /// - `Infrastructure` if the due-listing query itself fails
    pub async fn expire_ended_listings(
        &self,
        passport: &Passport,
        sharer_id: Option<&UserId>,
    ) -> Result<Vec<ListingId>, DomainError> {
        let now = Timestamp::now();

        // 1. Collect the due listings
        let due = self
            .listings
            .find_published_ending_before(&now, sharer_id)
            .await?;

        // 2. Expire one by one through the regular command path
        let metadata = CommandMetadata::for_passport(passport).with_source("scheduler");
        let mut expired = Vec::new();
        for listing in due {
            let outcome = self
                .listing_uow
                .with_scoped_transaction(&listing.id, &metadata, |l| l.expire(passport, now))
                .await;

            match outcome {
                Ok(_) => expired.push(listing.id),
                Err(err) => {
                    warn!(listing_id = %listing.id, error = %err, "Expiry sweep skipped listing");
                }
            }
        }

        info!(count = expired.len(), "Expiry sweep finished");
        Ok(expired)
    }

    /// Deletes settled reservation requests past the retention window.
    ///
    /// Settled means Rejected, Closed, or Cancelled; the window is
    /// measured from the request's last update. Removal is physical and
    /// emits no events. Requests that fail to delete are logged and
    /// skipped.
    ///
    /// Returns the IDs that were removed.
    ///
    /// # Errors
    ///
    /// - `Authorization` unless the passport is the system passport
    /// - `Infrastructure` if the due-request query itself fails
    pub async fn purge_expired_reservation_requests(
        &self,
        passport: &Passport,
    ) -> Result<Vec<ReservationRequestId>, DomainError> {
        // 1. Retention cleanup runs under the system gate only
        if !passport.is_system() {
            return Err(DomainError::authorization(
                ReservationRequest::aggregate_type(),
                "*",
                "purge",
            ));
        }

        // 2. Collect settled requests older than the retention window
        let cutoff = Timestamp::now().minus_days(self.purge_after_days);
        let due = self.requests.find_settled_updated_before(&cutoff).await?;

        // 3. Remove them; physical deletion, no events
        let mut purged = Vec::new();
        for request in due {
            match self.requests.delete(request.id()).await {
                Ok(()) => purged.push(*request.id()),
                Err(err) => {
                    warn!(
                        reservation_request_id = %request.id(),
                        error = %err,
                        "Retention sweep skipped request"
                    );
                }
            }
        }

        info!(count = purged.len(), "Retention sweep finished");
        Ok(purged)
    }
}
