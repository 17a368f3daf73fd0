//! In-memory listing repository for testing and development.
//!
//! Backs the `ListingRepository` port with a map guarded by an async
//! lock. Version checks follow the same conditional-write contract a
//! database-backed adapter would honor.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{
    AggregateRoot, AggregateStore, DomainError, ListingId, Timestamp, UserId,
};
use crate::domain::listing::{ItemListing, ListingRef};
use crate::ports::ListingRepository;

/// In-memory store for `ItemListing` aggregates.
///
/// Stored copies never retain pending events; a load after a write
/// cannot re-deliver events the write already dispatched.
#[derive(Debug, Clone)]
pub struct InMemoryListingRepository {
    listings: Arc<RwLock<HashMap<ListingId, ItemListing>>>,
}

impl InMemoryListingRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self {
            listings: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the number of stored listings (for test assertions).
    pub async fn count(&self) -> usize {
        self.listings.read().await.len()
    }

    /// Clears all stored listings (for test isolation).
    pub async fn clear(&self) {
        self.listings.write().await.clear();
    }

    fn detached(aggregate: &ItemListing) -> ItemListing {
        let mut copy = aggregate.clone();
        copy.take_events();
        copy
    }
}

impl Default for InMemoryListingRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AggregateStore<ItemListing> for InMemoryListingRepository {
    async fn find_by_id(&self, id: &ListingId) -> Result<Option<ItemListing>, DomainError> {
        Ok(self.listings.read().await.get(id).cloned())
    }

    async fn save(&self, aggregate: &ItemListing) -> Result<ItemListing, DomainError> {
        let mut listings = self.listings.write().await;
        if listings.contains_key(aggregate.id()) {
            return Err(DomainError::conflict(format!(
                "listing {} already exists",
                aggregate.id()
            )));
        }
        let stored = Self::detached(aggregate);
        listings.insert(*aggregate.id(), stored.clone());
        Ok(stored)
    }

    async fn update(&self, aggregate: &ItemListing) -> Result<ItemListing, DomainError> {
        let mut listings = self.listings.write().await;
        let stored = listings.get(aggregate.id()).ok_or_else(|| {
            DomainError::not_found(ItemListing::aggregate_type(), aggregate.id())
        })?;
        if stored.version() != aggregate.version() {
            return Err(DomainError::concurrency(
                ItemListing::aggregate_type(),
                aggregate.id(),
                aggregate.version(),
                stored.version(),
            ));
        }
        let mut updated = Self::detached(aggregate);
        updated.set_version(aggregate.version() + 1);
        listings.insert(*updated.id(), updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: &ListingId) -> Result<(), DomainError> {
        let mut listings = self.listings.write().await;
        if listings.remove(id).is_none() {
            return Err(DomainError::not_found(ItemListing::aggregate_type(), id));
        }
        Ok(())
    }
}

#[async_trait]
impl ListingRepository for InMemoryListingRepository {
    async fn find_by_sharer(&self, sharer_id: &UserId) -> Result<Vec<ListingRef>, DomainError> {
        let listings = self.listings.read().await;
        Ok(listings
            .values()
            .filter(|l| l.sharer_id() == sharer_id)
            .map(|l| l.to_ref())
            .collect())
    }

    async fn find_all(&self) -> Result<Vec<ListingRef>, DomainError> {
        let listings = self.listings.read().await;
        Ok(listings.values().map(|l| l.to_ref()).collect())
    }

    async fn find_published_ending_before(
        &self,
        cutoff: &Timestamp,
        sharer_id: Option<&UserId>,
    ) -> Result<Vec<ListingRef>, DomainError> {
        let listings = self.listings.read().await;
        Ok(listings
            .values()
            .filter(|l| l.state().is_publicly_visible())
            .filter(|l| l.sharing_period().ended_before(cutoff))
            .filter(|l| sharer_id.map_or(true, |s| l.sharer_id() == s))
            .map(|l| l.to_ref())
            .collect())
    }
}
