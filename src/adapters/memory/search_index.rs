//! In-memory search index for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ListingId};
use crate::ports::{IndexedListing, SearchIndex};

/// In-memory `SearchIndex` keeping documents in a map.
///
/// Counts upserts so tests can assert that idempotent handlers skip
/// redundant writes.
#[derive(Debug)]
pub struct InMemorySearchIndex {
    documents: Arc<RwLock<HashMap<ListingId, IndexedListing>>>,
    upserts: AtomicUsize,
}

impl InMemorySearchIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self {
            documents: Arc::new(RwLock::new(HashMap::new())),
            upserts: AtomicUsize::new(0),
        }
    }

    /// Returns the stored document for a listing, if any.
    pub async fn document(&self, id: &ListingId) -> Option<IndexedListing> {
        self.documents.read().await.get(id).cloned()
    }

    /// Returns the number of stored documents.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Returns true when no documents are stored.
    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    /// Returns how many upserts the index has absorbed.
    pub fn upsert_count(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }
}

impl Default for InMemorySearchIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchIndex for InMemorySearchIndex {
    async fn upsert(&self, document: IndexedListing) -> Result<(), DomainError> {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        self.documents.write().await.insert(document.id, document);
        Ok(())
    }

    async fn remove(&self, id: &ListingId) -> Result<(), DomainError> {
        self.documents.write().await.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::{Category, ListingState};

    fn doc(id: ListingId, title: &str) -> IndexedListing {
        IndexedListing {
            id,
            title: title.to_string(),
            description: "desc".to_string(),
            category: Category::Household,
            location: "Delft".to_string(),
            state: ListingState::Published,
        }
    }

    #[tokio::test]
    async fn upsert_replaces_existing_document() {
        let index = InMemorySearchIndex::new();
        let id = ListingId::new();

        index.upsert(doc(id, "first")).await.unwrap();
        index.upsert(doc(id, "second")).await.unwrap();

        assert_eq!(index.len().await, 1);
        assert_eq!(index.document(&id).await.unwrap().title, "second");
        assert_eq!(index.upsert_count(), 2);
    }

    #[tokio::test]
    async fn remove_of_absent_id_is_a_no_op() {
        let index = InMemorySearchIndex::new();

        index.remove(&ListingId::new()).await.unwrap();

        assert!(index.is_empty().await);
    }

    #[tokio::test]
    async fn remove_drops_document() {
        let index = InMemorySearchIndex::new();
        let id = ListingId::new();
        index.upsert(doc(id, "gone soon")).await.unwrap();

        index.remove(&id).await.unwrap();

        assert!(index.document(&id).await.is_none());
    }
}
