//! Keeps the search index in step with the listing lifecycle.
//!
//! Reacts to every listing lifecycle event by reloading the listing and
//! reconciling the index against its current state: publicly visible
//! listings get their document upserted, everything else gets removed.
//! Reloading instead of trusting the payload makes redelivery and
//! out-of-order delivery harmless.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope, ListingId};
use crate::ports::{EventHandler, IndexedListing, ListingRepository, SearchIndex};

const SUBSCRIBED_EVENTS: &[&str] = &[
    "listing.published.v1",
    "listing.paused.v1",
    "listing.cancelled.v1",
    "listing.expired.v1",
    "listing.blocked.v1",
    "listing.reinstated.v1",
    "listing.details_updated.v1",
];

/// Handler projecting listings into the search index.
pub struct ListingIndexSynchronizer {
    listings: Arc<dyn ListingRepository>,
    index: Arc<dyn SearchIndex>,

    /// Fingerprint of the last document written per listing, used to
    /// skip writes that would not change what the index sees.
    fingerprints: Mutex<HashMap<ListingId, u64>>,
}

impl ListingIndexSynchronizer {
    pub fn new(listings: Arc<dyn ListingRepository>, index: Arc<dyn SearchIndex>) -> Self {
        Self {
            listings,
            index,
            fingerprints: Mutex::new(HashMap::new()),
        }
    }

    /// Event types to register this handler for.
    pub fn event_types() -> &'static [&'static str] {
        SUBSCRIBED_EVENTS
    }

    fn fingerprint(document: &IndexedListing) -> u64 {
        let mut hasher = DefaultHasher::new();
        document.hash(&mut hasher);
        hasher.finish()
    }

    fn last_fingerprint(&self, id: &ListingId) -> Option<u64> {
        self.fingerprints
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .copied()
    }

    fn remember(&self, id: ListingId, fingerprint: u64) {
        self.fingerprints
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, fingerprint);
    }

    fn forget(&self, id: &ListingId) {
        self.fingerprints
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id);
    }
}

#[async_trait]
impl EventHandler for ListingIndexSynchronizer {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        // 1. The envelope's aggregate id names the listing
        let listing_id: ListingId = event.aggregate_id.parse().map_err(|_| {
            DomainError::infrastructure(format!(
                "event {} carries a malformed listing id: {}",
                event.event_type, event.aggregate_id
            ))
        })?;

        // 2. Reconcile against the listing's current state
        match self.listings.find_by_id(&listing_id).await? {
            Some(listing) if listing.state().is_publicly_visible() => {
                let document = IndexedListing::from_ref(&listing.to_ref());
                let fingerprint = Self::fingerprint(&document);

                // 3a. Identical document is already indexed; skip the write
                if self.last_fingerprint(&listing_id) == Some(fingerprint) {
                    return Ok(());
                }

                self.index.upsert(document).await?;
                self.remember(listing_id, fingerprint);
            }
            _ => {
                // 3b. Hidden or gone: drop the document
                self.index.remove(&listing_id).await?;
                self.forget(&listing_id);
            }
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "ListingIndexSynchronizer"
    }
}
