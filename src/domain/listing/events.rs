//! Item listing domain events.
//!
//! Events published when listing lifecycle changes occur:
//! - `ListingDrafted` - New listing drafted by its sharer
//! - `ListingPublished` - Listing made visible to other users
//! - `ListingPaused` - Listing temporarily hidden by its sharer
//! - `ListingCancelled` - Listing withdrawn permanently
//! - `ListingExpired` - Sharing period ended
//! - `ListingBlocked` - Listing hidden by moderation
//! - `ListingAppealRequested` - Sharer appealed a block
//! - `ListingReinstated` - Moderation restored the listing
//! - `ListingDetailsUpdated` - Sharer edited listing content
//! - `ListingReported` - A user flagged the listing
//! - `ListingSharingRecorded` - Closed reservation added to history

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    domain_event, EventId, ListingId, Period, ReservationRequestId, Timestamp, UserId,
};

// ════════════════════════════════════════════════════════════════════════════
// ListingDrafted
// ════════════════════════════════════════════════════════════════════════════

/// Published when a sharer drafts a new listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingDrafted {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// ID of the drafted listing.
    pub listing_id: ListingId,

    /// User who owns the listing.
    pub sharer_id: UserId,

    /// Listing title.
    pub title: String,

    /// When the listing was drafted.
    pub drafted_at: Timestamp,
}

domain_event!(
    ListingDrafted,
    event_type = "listing.drafted.v1",
    schema_version = 1,
    aggregate_id = listing_id,
    aggregate_type = "ItemListing",
    occurred_at = drafted_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// ListingPublished
// ════════════════════════════════════════════════════════════════════════════

/// Published when a listing becomes visible to other users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingPublished {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// ID of the published listing.
    pub listing_id: ListingId,

    /// User who owns the listing.
    pub sharer_id: UserId,

    /// Sharing window the listing is offered for.
    pub sharing_period: Period,

    /// When the listing was published.
    pub published_at: Timestamp,
}

domain_event!(
    ListingPublished,
    event_type = "listing.published.v1",
    schema_version = 1,
    aggregate_id = listing_id,
    aggregate_type = "ItemListing",
    occurred_at = published_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// ListingPaused
// ════════════════════════════════════════════════════════════════════════════

/// Published when a sharer temporarily hides a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingPaused {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// ID of the paused listing.
    pub listing_id: ListingId,

    /// User who owns the listing.
    pub sharer_id: UserId,

    /// When the listing was paused.
    pub paused_at: Timestamp,
}

domain_event!(
    ListingPaused,
    event_type = "listing.paused.v1",
    schema_version = 1,
    aggregate_id = listing_id,
    aggregate_type = "ItemListing",
    occurred_at = paused_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// ListingCancelled
// ════════════════════════════════════════════════════════════════════════════

/// Published when a sharer withdraws a listing permanently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingCancelled {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// ID of the cancelled listing.
    pub listing_id: ListingId,

    /// User who owns the listing.
    pub sharer_id: UserId,

    /// When the listing was cancelled.
    pub cancelled_at: Timestamp,
}

domain_event!(
    ListingCancelled,
    event_type = "listing.cancelled.v1",
    schema_version = 1,
    aggregate_id = listing_id,
    aggregate_type = "ItemListing",
    occurred_at = cancelled_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// ListingExpired
// ════════════════════════════════════════════════════════════════════════════

/// Published when a listing's sharing period has ended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingExpired {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// ID of the expired listing.
    pub listing_id: ListingId,

    /// User who owns the listing.
    pub sharer_id: UserId,

    /// When the expiry was recorded.
    pub expired_at: Timestamp,
}

domain_event!(
    ListingExpired,
    event_type = "listing.expired.v1",
    schema_version = 1,
    aggregate_id = listing_id,
    aggregate_type = "ItemListing",
    occurred_at = expired_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// ListingBlocked
// ════════════════════════════════════════════════════════════════════════════

/// Published when moderation hides a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingBlocked {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// ID of the blocked listing.
    pub listing_id: ListingId,

    /// User who owns the listing.
    pub sharer_id: UserId,

    /// Moderator who blocked the listing (None for system blocks).
    pub blocked_by: Option<UserId>,

    /// When the listing was blocked.
    pub blocked_at: Timestamp,
}

domain_event!(
    ListingBlocked,
    event_type = "listing.blocked.v1",
    schema_version = 1,
    aggregate_id = listing_id,
    aggregate_type = "ItemListing",
    occurred_at = blocked_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// ListingAppealRequested
// ════════════════════════════════════════════════════════════════════════════

/// Published when a sharer appeals a block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingAppealRequested {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// ID of the appealed listing.
    pub listing_id: ListingId,

    /// User who owns the listing.
    pub sharer_id: UserId,

    /// When the appeal was requested.
    pub requested_at: Timestamp,
}

domain_event!(
    ListingAppealRequested,
    event_type = "listing.appeal_requested.v1",
    schema_version = 1,
    aggregate_id = listing_id,
    aggregate_type = "ItemListing",
    occurred_at = requested_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// ListingReinstated
// ════════════════════════════════════════════════════════════════════════════

/// Published when moderation restores a blocked listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingReinstated {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// ID of the reinstated listing.
    pub listing_id: ListingId,

    /// User who owns the listing.
    pub sharer_id: UserId,

    /// When the listing was reinstated.
    pub reinstated_at: Timestamp,
}

domain_event!(
    ListingReinstated,
    event_type = "listing.reinstated.v1",
    schema_version = 1,
    aggregate_id = listing_id,
    aggregate_type = "ItemListing",
    occurred_at = reinstated_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// ListingDetailsUpdated
// ════════════════════════════════════════════════════════════════════════════

/// Published when a sharer edits listing content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingDetailsUpdated {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// ID of the updated listing.
    pub listing_id: ListingId,

    /// User who owns the listing.
    pub sharer_id: UserId,

    /// New listing title.
    pub title: String,

    /// When the update occurred.
    pub updated_at: Timestamp,
}

domain_event!(
    ListingDetailsUpdated,
    event_type = "listing.details_updated.v1",
    schema_version = 1,
    aggregate_id = listing_id,
    aggregate_type = "ItemListing",
    occurred_at = updated_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// ListingReported
// ════════════════════════════════════════════════════════════════════════════

/// Published when a user flags a listing for moderation review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingReported {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// ID of the reported listing.
    pub listing_id: ListingId,

    /// User who filed the report.
    pub reported_by: UserId,

    /// Total report count after this report.
    pub total_reports: u32,

    /// When the report was filed.
    pub reported_at: Timestamp,
}

domain_event!(
    ListingReported,
    event_type = "listing.reported.v1",
    schema_version = 1,
    aggregate_id = listing_id,
    aggregate_type = "ItemListing",
    occurred_at = reported_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// ListingSharingRecorded
// ════════════════════════════════════════════════════════════════════════════

/// Published when a closed reservation is appended to the sharing history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingSharingRecorded {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// ID of the listing whose history grew.
    pub listing_id: ListingId,

    /// The closed reservation request.
    pub reservation_request_id: ReservationRequestId,

    /// When the history entry was recorded.
    pub recorded_at: Timestamp,
}

domain_event!(
    ListingSharingRecorded,
    event_type = "listing.sharing_recorded.v1",
    schema_version = 1,
    aggregate_id = listing_id,
    aggregate_type = "ItemListing",
    occurred_at = recorded_at,
    event_id = event_id
);
