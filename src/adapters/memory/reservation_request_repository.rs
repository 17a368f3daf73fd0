//! In-memory reservation request repository for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{
    AggregateRoot, AggregateStore, DomainError, ListingId, ReservationRequestId, Timestamp, UserId,
};
use crate::domain::reservation::ReservationRequest;
use crate::ports::ReservationRequestRepository;

/// In-memory store for `ReservationRequest` aggregates.
///
/// Stored copies never retain pending events; a load after a write
/// cannot re-deliver events the write already dispatched.
#[derive(Debug, Clone)]
pub struct InMemoryReservationRequestRepository {
    requests: Arc<RwLock<HashMap<ReservationRequestId, ReservationRequest>>>,
}

impl InMemoryReservationRequestRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self {
            requests: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the number of stored requests (for test assertions).
    pub async fn count(&self) -> usize {
        self.requests.read().await.len()
    }

    /// Clears all stored requests (for test isolation).
    pub async fn clear(&self) {
        self.requests.write().await.clear();
    }

    fn detached(aggregate: &ReservationRequest) -> ReservationRequest {
        let mut copy = aggregate.clone();
        copy.take_events();
        copy
    }
}

impl Default for InMemoryReservationRequestRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AggregateStore<ReservationRequest> for InMemoryReservationRequestRepository {
    async fn find_by_id(
        &self,
        id: &ReservationRequestId,
    ) -> Result<Option<ReservationRequest>, DomainError> {
        Ok(self.requests.read().await.get(id).cloned())
    }

    async fn save(&self, aggregate: &ReservationRequest) -> Result<ReservationRequest, DomainError> {
        let mut requests = self.requests.write().await;
        if requests.contains_key(aggregate.id()) {
            return Err(DomainError::conflict(format!(
                "reservation request {} already exists",
                aggregate.id()
            )));
        }
        let stored = Self::detached(aggregate);
        requests.insert(*aggregate.id(), stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        aggregate: &ReservationRequest,
    ) -> Result<ReservationRequest, DomainError> {
        let mut requests = self.requests.write().await;
        let stored = requests.get(aggregate.id()).ok_or_else(|| {
            DomainError::not_found(ReservationRequest::aggregate_type(), aggregate.id())
        })?;
        if stored.version() != aggregate.version() {
            return Err(DomainError::concurrency(
                ReservationRequest::aggregate_type(),
                aggregate.id(),
                aggregate.version(),
                stored.version(),
            ));
        }
        let mut updated = Self::detached(aggregate);
        updated.set_version(aggregate.version() + 1);
        requests.insert(*updated.id(), updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: &ReservationRequestId) -> Result<(), DomainError> {
        let mut requests = self.requests.write().await;
        if requests.remove(id).is_none() {
            return Err(DomainError::not_found(
                ReservationRequest::aggregate_type(),
                id,
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ReservationRequestRepository for InMemoryReservationRequestRepository {
    async fn find_by_reserver(
        &self,
        reserver_id: &UserId,
    ) -> Result<Vec<ReservationRequest>, DomainError> {
        let requests = self.requests.read().await;
        Ok(requests
            .values()
            .filter(|r| r.reserver_id() == reserver_id)
            .cloned()
            .collect())
    }

    async fn find_active_by_listing(
        &self,
        listing_id: &ListingId,
    ) -> Result<Vec<ReservationRequest>, DomainError> {
        let requests = self.requests.read().await;
        Ok(requests
            .values()
            .filter(|r| r.listing_id() == listing_id)
            .filter(|r| r.state().is_active())
            .cloned()
            .collect())
    }

    async fn find_settled_updated_before(
        &self,
        cutoff: &Timestamp,
    ) -> Result<Vec<ReservationRequest>, DomainError> {
        let requests = self.requests.read().await;
        Ok(requests
            .values()
            .filter(|r| r.state().is_settled())
            .filter(|r| r.updated_at().is_before(cutoff))
            .cloned()
            .collect())
    }
}
