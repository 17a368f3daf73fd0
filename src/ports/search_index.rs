//! SearchIndex port - Interface to the listing search index.
//!
//! The index holds flattened documents for published listings. Writes
//! come only from the index synchronizer handler, which keeps the index
//! eventually consistent with the listing store.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ListingId};
use crate::domain::listing::{Category, ListingRef, ListingState};

/// Searchable projection of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexedListing {
    pub id: ListingId,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub location: String,
    pub state: ListingState,
}

impl IndexedListing {
    /// Builds the document from a listing snapshot.
    pub fn from_ref(listing: &ListingRef) -> Self {
        Self {
            id: listing.id,
            title: listing.title.clone(),
            description: listing.description.clone(),
            category: listing.category,
            location: listing.location.clone(),
            state: listing.state,
        }
    }
}

/// Port for maintaining the listing search index.
///
/// Implementations must ensure:
/// - `upsert` replaces any existing document with the same id
/// - `remove` of an absent id is a no-op, not an error
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Insert or replace a listing document.
    async fn upsert(&self, document: IndexedListing) -> Result<(), DomainError>;

    /// Drop the document for a listing, if present.
    async fn remove(&self, id: &ListingId) -> Result<(), DomainError>;
}
