//! Base store trait for aggregate persistence.
//!
//! This module provides the generic `AggregateStore<A>` trait that defines
//! the standard persistence interface for all aggregate repositories.
//!
//! # DRY Pattern
//!
//! Instead of each repository defining its own `find_by_id`, `save`, `update`,
//! `delete` methods with identical signatures, they inherit from this base trait
//! and only add domain-specific query methods.
//!
//! # Example
//!
//! ```ignore
//! // Domain-specific repository extends the base trait
//! #[async_trait]
//! pub trait ListingRepository: AggregateStore<ItemListing> {
//!     async fn find_by_sharer(&self, sharer_id: &UserId) -> Result<Vec<ItemListing>, DomainError>;
//! }
//! ```

use async_trait::async_trait;

use super::{AggregateRoot, DomainError};

/// Base trait for aggregate stores.
///
/// Provides conditional-write persistence keyed on the aggregate's
/// version counter. Domain-specific repositories extend this trait
/// with additional query methods.
///
/// # Concurrency
///
/// `update` is a conditional write: it succeeds only when the stored
/// version equals the incoming aggregate's version, and the returned
/// copy carries the advanced version. A mismatch surfaces as
/// `DomainError::Concurrency`; callers reload and retry.
///
/// # Events
///
/// Stored snapshots never retain queued domain events. Implementations
/// drain the pending queue from the copy they keep, so a later load
/// cannot re-deliver events that were already dispatched.
#[async_trait]
pub trait AggregateStore<A: AggregateRoot>: Send + Sync {
    /// Finds an aggregate by its unique identifier.
    ///
    /// Returns `Ok(None)` if the aggregate doesn't exist.
    /// Returns `Err` only for infrastructure failures.
    async fn find_by_id(&self, id: &A::Id) -> Result<Option<A>, DomainError>;

    /// Persists a new aggregate.
    ///
    /// Returns the stored snapshot.
    ///
    /// # Errors
    ///
    /// - `Conflict` if an aggregate with the same ID already exists
    /// - `Infrastructure` on persistence failure
    async fn save(&self, aggregate: &A) -> Result<A, DomainError>;

    /// Updates an existing aggregate with a version-checked write.
    ///
    /// Returns the stored snapshot with its version advanced.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the aggregate doesn't exist
    /// - `Concurrency` if the stored version differs from the incoming one
    /// - `Infrastructure` on persistence failure
    async fn update(&self, aggregate: &A) -> Result<A, DomainError>;

    /// Deletes an aggregate by its identifier.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the aggregate doesn't exist
    /// - `Infrastructure` on persistence failure
    async fn delete(&self, id: &A::Id) -> Result<(), DomainError>;

    /// Loads an aggregate, failing with `NotFound` if absent.
    async fn get(&self, id: &A::Id) -> Result<A, DomainError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(A::aggregate_type(), id.clone()))
    }

    /// Checks if an aggregate with the given ID exists.
    ///
    /// Default implementation uses `find_by_id`. Override if a more
    /// efficient existence check is available.
    async fn exists(&self, id: &A::Id) -> Result<bool, DomainError> {
        Ok(self.find_by_id(id).await?.is_some())
    }
}
