//! Read-only listing reference (Entity Reference).

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ListingId, Period, ReservationRequestId, Timestamp, UserId};

use super::{Category, ImageUri, ListingState};

/// Flattened read-only projection of an `ItemListing`.
///
/// Constructed fresh on every load and handed to visas and read-side
/// consumers. Carries no command methods and is never cached; a ref
/// reflects the aggregate at the moment it was built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRef {
    pub id: ListingId,
    pub sharer_id: UserId,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub location: String,
    pub sharing_period: Period,
    pub state: ListingState,
    pub sharing_history: Vec<ReservationRequestId>,
    pub reports: u32,
    pub images: Vec<ImageUri>,
    pub version: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
