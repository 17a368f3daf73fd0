//! Notifies the parties affected by reservation decisions and takedowns.
//!
//! Two triggers: an accepted reservation messages both the reserver and
//! the listing owner with the agreed period, and a blocked listing tells
//! its owner that an appeal is open to them. Message composition lives
//! here; delivery transport stays behind the `Notifier` port.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::domain::foundation::{DomainError, EventEnvelope, Period};
use crate::domain::listing::ListingBlocked;
use crate::domain::reservation::ReservationAccepted;
use crate::ports::{EventHandler, Notification, Notifier};

const SUBSCRIBED_EVENTS: &[&str] = &["reservation.accepted.v1", "listing.blocked.v1"];

/// Handler composing user-facing messages from domain events.
pub struct ReservationNotifier {
    notifier: Arc<dyn Notifier>,
}

impl ReservationNotifier {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Event types to register this handler for.
    pub fn event_types() -> &'static [&'static str] {
        SUBSCRIBED_EVENTS
    }

    async fn on_reservation_accepted(&self, event: &EventEnvelope) -> Result<(), DomainError> {
        let payload: ReservationAccepted = parse_payload(event)?;
        let span = format_span(&payload.period);

        self.notifier
            .notify(Notification::new(
                payload.reserver_id,
                "Reservation accepted",
                format!("Your reservation for {span} was accepted."),
            ))
            .await?;

        self.notifier
            .notify(Notification::new(
                payload.sharer_id,
                "Reservation accepted",
                format!("You accepted a reservation for {span} on your listing."),
            ))
            .await
    }

    async fn on_listing_blocked(&self, event: &EventEnvelope) -> Result<(), DomainError> {
        let payload: ListingBlocked = parse_payload(event)?;

        self.notifier
            .notify(Notification::new(
                payload.sharer_id,
                "Listing blocked",
                "Your listing was taken down by moderation. You can request an appeal.",
            ))
            .await
    }
}

fn parse_payload<T: DeserializeOwned>(event: &EventEnvelope) -> Result<T, DomainError> {
    event.payload_as().map_err(|err| {
        DomainError::infrastructure(format!("malformed {} payload: {err}", event.event_type))
    })
}

fn format_span(period: &Period) -> String {
    format!(
        "{} to {}",
        period.start().as_datetime().format("%Y-%m-%d"),
        period.end().as_datetime().format("%Y-%m-%d")
    )
}

#[async_trait]
impl EventHandler for ReservationNotifier {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        match event.event_type.as_str() {
            "reservation.accepted.v1" => self.on_reservation_accepted(&event).await,
            "listing.blocked.v1" => self.on_listing_blocked(&event).await,
            _ => Ok(()),
        }
    }

    fn name(&self) -> &'static str {
        "ReservationNotifier"
    }
}
