//! Listing repository port (write side).
//!
//! Extends the generic aggregate store with listing-specific finders.
//! Finders return read-only [`ListingRef`] snapshots; mutation always
//! goes through the store half of the contract.

use async_trait::async_trait;

use crate::domain::foundation::{AggregateStore, DomainError, Timestamp, UserId};
use crate::domain::listing::{ItemListing, ListingRef};

/// Repository port for `ItemListing` persistence.
///
/// Implementations must ensure:
/// - finders reflect the latest committed state
/// - `find_published_ending_before` only returns listings whose sharing
///   period ended strictly before the cutoff
#[async_trait]
pub trait ListingRepository: AggregateStore<ItemListing> {
    /// Find all listings owned by a sharer.
    async fn find_by_sharer(&self, sharer_id: &UserId) -> Result<Vec<ListingRef>, DomainError>;

    /// Find every listing regardless of state.
    async fn find_all(&self) -> Result<Vec<ListingRef>, DomainError>;

    /// Find Published listings whose sharing period ended before the
    /// cutoff, optionally restricted to one sharer.
    ///
    /// Feeds the expiry sweep.
    async fn find_published_ending_before(
        &self,
        cutoff: &Timestamp,
        sharer_id: Option<&UserId>,
    ) -> Result<Vec<ListingRef>, DomainError>;
}
