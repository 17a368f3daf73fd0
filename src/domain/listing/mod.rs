//! Item listing domain module.
//!
//! Handles the listing lifecycle: drafting, publishing, pausing,
//! cancellation, expiry, and the moderation loop (block, appeal,
//! reinstate). Listings reference closed reservations by ID through
//! their sharing history but do NOT own them.
//!
//! # Events
//!
//! - `ListingDrafted` - Published when a sharer drafts a new listing
//! - `ListingPublished` - Published when the listing becomes visible
//! - `ListingPaused` - Published when the sharer hides it temporarily
//! - `ListingCancelled` - Published when the sharer withdraws it
//! - `ListingExpired` - Published when the sharing period has ended
//! - `ListingBlocked` - Published when moderation hides it
//! - `ListingAppealRequested` - Published when the sharer appeals a block
//! - `ListingReinstated` - Published when moderation restores it
//! - `ListingDetailsUpdated` - Published when the sharer edits content
//! - `ListingReported` - Published when a user flags it
//! - `ListingSharingRecorded` - Published when history records a closed
//!   reservation

mod aggregate;
mod category;
mod events;
mod image;
mod reference;
mod state;
mod visa;

pub use aggregate::{ItemListing, ListingDetails, MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH};
pub use category::Category;
pub use events::{
    ListingAppealRequested, ListingBlocked, ListingCancelled, ListingDetailsUpdated,
    ListingDrafted, ListingExpired, ListingPaused, ListingPublished, ListingReinstated,
    ListingReported, ListingSharingRecorded,
};
pub use image::{validate_images, ImageUri, MAX_IMAGES};
pub use reference::ListingRef;
pub use state::ListingState;
pub use visa::{ListingGrants, ListingVisa};
