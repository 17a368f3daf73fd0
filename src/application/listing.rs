//! Command service for the listing lifecycle.
//!
//! Thin orchestration over the `ItemListing` aggregate: each method loads
//! the listing through the transactional scope, invokes the matching
//! aggregate command with the caller's passport, and returns the persisted
//! snapshot as a `ListingRef`. Authorization and state rules live in the
//! aggregate; this layer never re-checks them.

use crate::application::UnitOfWork;
use crate::domain::foundation::{
    AggregateRoot, CommandMetadata, DomainError, ListingId, Passport, Timestamp,
};
use crate::domain::listing::{ItemListing, ListingDetails, ListingRef};

/// Application service exposing the listing command API.
#[derive(Clone)]
pub struct ListingCommands {
    unit_of_work: UnitOfWork<ItemListing>,
}

impl ListingCommands {
    /// Creates the service over a listing transactional scope.
    pub fn new(unit_of_work: UnitOfWork<ItemListing>) -> Self {
        Self { unit_of_work }
    }

    /// Drafts a new listing owned by the passport's actor.
    ///
    /// # Errors
    ///
    /// - `Authorization` if the passport carries no actor (system passports
    ///   cannot own listings)
    /// - `Validation` if the details fail value checks
    pub async fn create(
        &self,
        passport: &Passport,
        details: ListingDetails,
        metadata: CommandMetadata,
    ) -> Result<ListingRef, DomainError> {
        let id = ListingId::new();
        let sharer_id = passport
            .actor_id()
            .cloned()
            .ok_or_else(|| DomainError::authorization(ItemListing::aggregate_type(), id, "create"))?;

        let listing = ItemListing::draft(id, sharer_id, details)?;
        let stored = self.unit_of_work.with_new(listing, &metadata).await?;
        Ok(stored.to_ref())
    }

    /// Makes a drafted or paused listing publicly visible.
    pub async fn publish(
        &self,
        id: ListingId,
        passport: &Passport,
        metadata: CommandMetadata,
    ) -> Result<ListingRef, DomainError> {
        let stored = self
            .unit_of_work
            .with_scoped_transaction(&id, &metadata, |listing| listing.publish(passport))
            .await?;
        Ok(stored.to_ref())
    }

    /// Temporarily withdraws a published listing from browsing.
    pub async fn pause(
        &self,
        id: ListingId,
        passport: &Passport,
        metadata: CommandMetadata,
    ) -> Result<ListingRef, DomainError> {
        let stored = self
            .unit_of_work
            .with_scoped_transaction(&id, &metadata, |listing| listing.pause(passport))
            .await?;
        Ok(stored.to_ref())
    }

    /// Permanently withdraws a listing.
    pub async fn cancel(
        &self,
        id: ListingId,
        passport: &Passport,
        metadata: CommandMetadata,
    ) -> Result<ListingRef, DomainError> {
        let stored = self
            .unit_of_work
            .with_scoped_transaction(&id, &metadata, |listing| listing.cancel(passport))
            .await?;
        Ok(stored.to_ref())
    }

    /// Expires a published listing whose sharing period has ended.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the sharing period has not ended yet
    pub async fn expire(
        &self,
        id: ListingId,
        passport: &Passport,
        metadata: CommandMetadata,
    ) -> Result<ListingRef, DomainError> {
        let now = Timestamp::now();
        let stored = self
            .unit_of_work
            .with_scoped_transaction(&id, &metadata, |listing| listing.expire(passport, now))
            .await?;
        Ok(stored.to_ref())
    }

    /// Takes a listing down for moderation.
    pub async fn block(
        &self,
        id: ListingId,
        passport: &Passport,
        metadata: CommandMetadata,
    ) -> Result<ListingRef, DomainError> {
        let stored = self
            .unit_of_work
            .with_scoped_transaction(&id, &metadata, |listing| listing.block(passport))
            .await?;
        Ok(stored.to_ref())
    }

    /// Files an appeal against a block on behalf of the owner.
    pub async fn request_appeal(
        &self,
        id: ListingId,
        passport: &Passport,
        metadata: CommandMetadata,
    ) -> Result<ListingRef, DomainError> {
        let stored = self
            .unit_of_work
            .with_scoped_transaction(&id, &metadata, |listing| listing.request_appeal(passport))
            .await?;
        Ok(stored.to_ref())
    }

    /// Returns a blocked or appealed listing to public visibility.
    pub async fn reinstate(
        &self,
        id: ListingId,
        passport: &Passport,
        metadata: CommandMetadata,
    ) -> Result<ListingRef, DomainError> {
        let stored = self
            .unit_of_work
            .with_scoped_transaction(&id, &metadata, |listing| listing.reinstate(passport))
            .await?;
        Ok(stored.to_ref())
    }

    /// Replaces the editable content of a listing.
    pub async fn update_details(
        &self,
        id: ListingId,
        passport: &Passport,
        details: ListingDetails,
        metadata: CommandMetadata,
    ) -> Result<ListingRef, DomainError> {
        let stored = self
            .unit_of_work
            .with_scoped_transaction(&id, &metadata, |listing| {
                listing.update_details(passport, details)
            })
            .await?;
        Ok(stored.to_ref())
    }

    /// Flags a listing for moderation review.
    pub async fn report(
        &self,
        id: ListingId,
        passport: &Passport,
        metadata: CommandMetadata,
    ) -> Result<ListingRef, DomainError> {
        let stored = self
            .unit_of_work
            .with_scoped_transaction(&id, &metadata, |listing| listing.report(passport))
            .await?;
        Ok(stored.to_ref())
    }
}
