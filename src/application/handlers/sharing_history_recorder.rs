//! Folds closed reservations into the listing's sharing history.
//!
//! Listens for `reservation.closed.v1` and appends the request ID to the
//! referenced listing through the regular transactional scope, so the
//! follow-up `listing.sharing_recorded.v1` event flows like any other
//! listing change. Recording is duplicate-safe on the aggregate, which
//! makes redelivery harmless.

use async_trait::async_trait;

use crate::application::UnitOfWork;
use crate::domain::foundation::{CommandMetadata, DomainError, EventEnvelope};
use crate::domain::listing::ItemListing;
use crate::domain::reservation::ReservationClosed;
use crate::ports::EventHandler;

const SUBSCRIBED_EVENTS: &[&str] = &["reservation.closed.v1"];

/// Handler recording closed reservations on their listing.
pub struct SharingHistoryRecorder {
    listing_uow: UnitOfWork<ItemListing>,
}

impl SharingHistoryRecorder {
    pub fn new(listing_uow: UnitOfWork<ItemListing>) -> Self {
        Self { listing_uow }
    }

    /// Event types to register this handler for.
    pub fn event_types() -> &'static [&'static str] {
        SUBSCRIBED_EVENTS
    }
}

#[async_trait]
impl EventHandler for SharingHistoryRecorder {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        let payload: ReservationClosed = event.payload_as().map_err(|err| {
            DomainError::infrastructure(format!(
                "malformed {} payload: {err}",
                event.event_type
            ))
        })?;

        // Carry the originating correlation chain onto the follow-up event
        let mut metadata = CommandMetadata::new().with_source("event-handler");
        if let Some(correlation_id) = &event.metadata.correlation_id {
            metadata = metadata.with_correlation_id(correlation_id.clone());
        }

        self.listing_uow
            .with_scoped_transaction(&payload.listing_id, &metadata, |listing| {
                listing.record_sharing(payload.reservation_request_id);
                Ok(())
            })
            .await?;

        Ok(())
    }

    fn name(&self) -> &'static str {
        "SharingHistoryRecorder"
    }
}
