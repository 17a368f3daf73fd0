//! Item listing aggregate entity.
//!
//! An item listing is something a sharer offers to lend out for a bounded
//! sharing period. Its lifecycle runs from `Drafted` through `Published`
//! to one of the terminal states `Cancelled` or `Expired`, with a
//! moderation loop through `Blocked` and `AppealRequested`.
//!
//! # Authorization
//!
//! Every command method self-checks through a [`ListingVisa`] minted from
//! the caller's [`Passport`]: a caller without the capability fails with
//! `Authorization` before any state inspection, a capable caller in a
//! disallowed state fails with `InvalidStateTransition`.
//!
//! # Events
//!
//! Command methods queue domain events on the aggregate. The transactional
//! scope that persists the change drains them exactly once; an aggregate
//! loaded from storage never carries queued events.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    AggregateRoot, DomainError, EventEnvelope, EventId, ListingId, Passport, Period,
    ReservationRequestId, SerializableDomainEvent, Timestamp, UserId, ValidationError,
};
use crate::domain::listing::category::Category;
use crate::domain::listing::events::{
    ListingAppealRequested, ListingBlocked, ListingCancelled, ListingDetailsUpdated,
    ListingDrafted, ListingExpired, ListingPaused, ListingPublished, ListingReinstated,
    ListingReported, ListingSharingRecorded,
};
use crate::domain::listing::image::{validate_images, ImageUri};
use crate::domain::listing::reference::ListingRef;
use crate::domain::listing::state::ListingState;
use crate::domain::listing::visa::{ListingGrants, ListingVisa};

/// Maximum length for listing title.
pub const MAX_TITLE_LENGTH: usize = 140;

/// Maximum length for listing description.
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;

const AGGREGATE_TYPE: &str = "ItemListing";

/// Editable content of a listing, used for drafting and updating.
#[derive(Debug, Clone)]
pub struct ListingDetails {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub location: String,
    pub sharing_period: Period,
    pub images: Vec<ImageUri>,
}

/// Item listing aggregate - an item offered for lending.
///
/// # Invariants
///
/// - `title` is 1-140 characters, non-empty
/// - `images` holds at most 5 entries
/// - `state` changes only along the transitions of [`ListingState`]
/// - `version` advances only through the persistence boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemListing {
    /// Unique identifier for this listing.
    id: ListingId,

    /// User who owns and shares the item.
    sharer_id: UserId,

    /// Listing title.
    title: String,

    /// Free-form item description.
    description: String,

    /// Browsing category.
    category: Category,

    /// Where the item is available for pickup.
    location: String,

    /// Window in which the item is offered.
    sharing_period: Period,

    /// Current lifecycle state.
    state: ListingState,

    /// Closed reservations recorded against this listing (not owned).
    sharing_history: Vec<ReservationRequestId>,

    /// Number of moderation reports filed.
    reports: u32,

    /// Photos of the item.
    images: Vec<ImageUri>,

    /// Optimistic concurrency counter, stored as `schema_version`.
    #[serde(rename = "schema_version")]
    version: u64,

    /// When the listing was drafted.
    created_at: Timestamp,

    /// When the listing was last updated.
    updated_at: Timestamp,

    /// Events queued by command methods, drained by the transactional scope.
    #[serde(skip)]
    pending_events: Vec<EventEnvelope>,
}

impl ItemListing {
    /// Draft a new listing owned by `sharer_id`.
    ///
    /// # Errors
    ///
    /// - `Validation` if the details fail value checks
    pub fn draft(
        id: ListingId,
        sharer_id: UserId,
        details: ListingDetails,
    ) -> Result<Self, DomainError> {
        Self::validate_details(&details)?;

        let now = Timestamp::now();
        let mut listing = Self {
            id,
            sharer_id,
            title: details.title,
            description: details.description,
            category: details.category,
            location: details.location,
            sharing_period: details.sharing_period,
            state: ListingState::Drafted,
            sharing_history: Vec::new(),
            reports: 0,
            images: details.images,
            version: 0,
            created_at: now,
            updated_at: now,
            pending_events: Vec::new(),
        };

        listing.queue_event(&ListingDrafted {
            event_id: EventId::new(),
            listing_id: listing.id,
            sharer_id: listing.sharer_id.clone(),
            title: listing.title.clone(),
            drafted_at: now,
        });
        Ok(listing)
    }

    /// Reconstitute a listing from persistence (no validation, no events).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: ListingId,
        sharer_id: UserId,
        details: ListingDetails,
        state: ListingState,
        sharing_history: Vec<ReservationRequestId>,
        reports: u32,
        version: u64,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            sharer_id,
            title: details.title,
            description: details.description,
            category: details.category,
            location: details.location,
            sharing_period: details.sharing_period,
            state,
            sharing_history,
            reports,
            images: details.images,
            version,
            created_at,
            updated_at,
            pending_events: Vec::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the listing ID.
    pub fn id(&self) -> &ListingId {
        &self.id
    }

    /// Returns the owner's user ID.
    pub fn sharer_id(&self) -> &UserId {
        &self.sharer_id
    }

    /// Returns the listing title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the item description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the browsing category.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Returns the pickup location.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Returns the sharing window.
    pub fn sharing_period(&self) -> Period {
        self.sharing_period
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> ListingState {
        self.state
    }

    /// Returns the recorded closed reservations.
    pub fn sharing_history(&self) -> &[ReservationRequestId] {
        &self.sharing_history
    }

    /// Returns the number of moderation reports filed.
    pub fn reports(&self) -> u32 {
        self.reports
    }

    /// Returns the listing photos.
    pub fn images(&self) -> &[ImageUri] {
        &self.images
    }

    /// Returns when the listing was drafted.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns when the listing was last updated.
    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Builds a read-only reference snapshot of this listing.
    pub fn to_ref(&self) -> ListingRef {
        ListingRef {
            id: self.id,
            sharer_id: self.sharer_id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category,
            location: self.location.clone(),
            sharing_period: self.sharing_period,
            state: self.state,
            sharing_history: self.sharing_history.clone(),
            reports: self.reports,
            images: self.images.clone(),
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Make the listing visible to other users.
    ///
    /// # Errors
    ///
    /// - `Authorization` if the caller is not the owner
    /// - `InvalidStateTransition` unless Drafted or Paused
    pub fn publish(&mut self, passport: &Passport) -> Result<(), DomainError> {
        self.authorize(passport, "publish", |g| g.can_publish)?;
        self.ensure_state(
            &[ListingState::Drafted, ListingState::Paused],
            "publish",
        )?;

        self.state = ListingState::Published;
        self.touch();
        self.queue_event(&ListingPublished {
            event_id: EventId::new(),
            listing_id: self.id,
            sharer_id: self.sharer_id.clone(),
            sharing_period: self.sharing_period,
            published_at: self.updated_at,
        });
        Ok(())
    }

    /// Temporarily hide the listing.
    ///
    /// # Errors
    ///
    /// - `Authorization` if the caller is not the owner
    /// - `InvalidStateTransition` unless Published
    pub fn pause(&mut self, passport: &Passport) -> Result<(), DomainError> {
        self.authorize(passport, "pause", |g| g.can_pause)?;
        self.ensure_state(&[ListingState::Published], "pause")?;

        self.state = ListingState::Paused;
        self.touch();
        self.queue_event(&ListingPaused {
            event_id: EventId::new(),
            listing_id: self.id,
            sharer_id: self.sharer_id.clone(),
            paused_at: self.updated_at,
        });
        Ok(())
    }

    /// Withdraw the listing permanently.
    ///
    /// # Errors
    ///
    /// - `Authorization` if the caller is not the owner
    /// - `InvalidStateTransition` unless Drafted, Published or Paused
    pub fn cancel(&mut self, passport: &Passport) -> Result<(), DomainError> {
        self.authorize(passport, "cancel", |g| g.can_cancel)?;
        self.ensure_state(
            &[
                ListingState::Drafted,
                ListingState::Published,
                ListingState::Paused,
            ],
            "cancel",
        )?;

        self.state = ListingState::Cancelled;
        self.touch();
        self.queue_event(&ListingCancelled {
            event_id: EventId::new(),
            listing_id: self.id,
            sharer_id: self.sharer_id.clone(),
            cancelled_at: self.updated_at,
        });
        Ok(())
    }

    /// Mark the listing expired once its sharing period has ended.
    ///
    /// Invoked by the daily sweep under a system passport, or by the owner.
    ///
    /// # Errors
    ///
    /// - `Authorization` if the caller is neither the owner nor the system
    /// - `InvalidStateTransition` unless Published
    /// - `Conflict` if the sharing period has not ended before `now`
    pub fn expire(&mut self, passport: &Passport, now: Timestamp) -> Result<(), DomainError> {
        self.authorize(passport, "expire", |g| g.can_expire)?;
        self.ensure_state(&[ListingState::Published], "expire")?;
        if !self.sharing_period.ended_before(&now) {
            return Err(DomainError::conflict(format!(
                "sharing period of listing {} has not ended",
                self.id
            )));
        }

        self.state = ListingState::Expired;
        self.touch();
        self.queue_event(&ListingExpired {
            event_id: EventId::new(),
            listing_id: self.id,
            sharer_id: self.sharer_id.clone(),
            expired_at: self.updated_at,
        });
        Ok(())
    }

    /// Hide the listing for moderation reasons.
    ///
    /// # Errors
    ///
    /// - `Authorization` if the caller holds no moderation rights
    /// - `InvalidStateTransition` if terminal or already blocked
    pub fn block(&mut self, passport: &Passport) -> Result<(), DomainError> {
        self.authorize(passport, "block", |g| g.can_block)?;
        if !self.state.is_blockable() {
            return Err(DomainError::invalid_transition(
                AGGREGATE_TYPE,
                self.id,
                self.state,
                "block",
            ));
        }

        self.state = ListingState::Blocked;
        self.touch();
        self.queue_event(&ListingBlocked {
            event_id: EventId::new(),
            listing_id: self.id,
            sharer_id: self.sharer_id.clone(),
            blocked_by: passport.actor_id().cloned(),
            blocked_at: self.updated_at,
        });
        Ok(())
    }

    /// Appeal a moderation block.
    ///
    /// A listing already under appeal cannot be appealed again.
    ///
    /// # Errors
    ///
    /// - `Authorization` if the caller is not the owner
    /// - `InvalidStateTransition` unless Blocked
    pub fn request_appeal(&mut self, passport: &Passport) -> Result<(), DomainError> {
        self.authorize(passport, "request_appeal", |g| g.can_request_appeal)?;
        self.ensure_state(&[ListingState::Blocked], "request_appeal")?;

        self.state = ListingState::AppealRequested;
        self.touch();
        self.queue_event(&ListingAppealRequested {
            event_id: EventId::new(),
            listing_id: self.id,
            sharer_id: self.sharer_id.clone(),
            requested_at: self.updated_at,
        });
        Ok(())
    }

    /// Restore a blocked listing to Published.
    ///
    /// # Errors
    ///
    /// - `Authorization` if the caller holds no moderation rights
    /// - `InvalidStateTransition` unless Blocked or AppealRequested
    pub fn reinstate(&mut self, passport: &Passport) -> Result<(), DomainError> {
        self.authorize(passport, "reinstate", |g| g.can_reinstate)?;
        self.ensure_state(
            &[ListingState::Blocked, ListingState::AppealRequested],
            "reinstate",
        )?;

        self.state = ListingState::Published;
        self.touch();
        self.queue_event(&ListingReinstated {
            event_id: EventId::new(),
            listing_id: self.id,
            sharer_id: self.sharer_id.clone(),
            reinstated_at: self.updated_at,
        });
        Ok(())
    }

    /// Replace the listing's editable content.
    ///
    /// # Errors
    ///
    /// - `Authorization` if the caller is not the owner
    /// - `InvalidStateTransition` unless Drafted, Published or Paused
    /// - `Validation` if the new details fail value checks
    pub fn update_details(
        &mut self,
        passport: &Passport,
        details: ListingDetails,
    ) -> Result<(), DomainError> {
        self.authorize(passport, "update", |g| g.can_update)?;
        if !self.state.is_editable() {
            return Err(DomainError::invalid_transition(
                AGGREGATE_TYPE,
                self.id,
                self.state,
                "update",
            ));
        }
        Self::validate_details(&details)?;

        self.title = details.title;
        self.description = details.description;
        self.category = details.category;
        self.location = details.location;
        self.sharing_period = details.sharing_period;
        self.images = details.images;
        self.touch();
        self.queue_event(&ListingDetailsUpdated {
            event_id: EventId::new(),
            listing_id: self.id,
            sharer_id: self.sharer_id.clone(),
            title: self.title.clone(),
            updated_at: self.updated_at,
        });
        Ok(())
    }

    /// Flag the listing for moderation review.
    ///
    /// Reporting never changes the lifecycle state; taking the listing
    /// down stays a moderation decision through `block`.
    ///
    /// # Errors
    ///
    /// - `Authorization` unless the caller is an authenticated non-owner
    /// - `InvalidStateTransition` unless the listing is publicly visible
    pub fn report(&mut self, passport: &Passport) -> Result<(), DomainError> {
        self.authorize(passport, "report", |g| g.can_report)?;
        if !self.state.is_publicly_visible() {
            return Err(DomainError::invalid_transition(
                AGGREGATE_TYPE,
                self.id,
                self.state,
                "report",
            ));
        }
        let reported_by = passport
            .actor_id()
            .cloned()
            .ok_or_else(|| DomainError::authorization(AGGREGATE_TYPE, self.id, "report"))?;

        self.reports = self.reports.saturating_add(1);
        self.touch();
        self.queue_event(&ListingReported {
            event_id: EventId::new(),
            listing_id: self.id,
            reported_by,
            total_reports: self.reports,
            reported_at: self.updated_at,
        });
        Ok(())
    }

    /// Append a closed reservation to the sharing history.
    ///
    /// Invoked by the reservation-closed reaction, not by user commands.
    /// Duplicate-safe: returns `false` without mutation when the request
    /// is already recorded, so redelivery is harmless.
    pub fn record_sharing(&mut self, request_id: ReservationRequestId) -> bool {
        if self.sharing_history.contains(&request_id) {
            return false;
        }

        self.sharing_history.push(request_id);
        self.touch();
        self.queue_event(&ListingSharingRecorded {
            event_id: EventId::new(),
            listing_id: self.id,
            reservation_request_id: request_id,
            recorded_at: self.updated_at,
        });
        true
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Checks a capability through a freshly minted visa.
    fn authorize(
        &self,
        passport: &Passport,
        action: &'static str,
        predicate: impl FnOnce(&ListingGrants) -> bool,
    ) -> Result<(), DomainError> {
        let visa: ListingVisa = passport.for_listing(&self.to_ref());
        if visa.determine_if(predicate) {
            Ok(())
        } else {
            Err(DomainError::authorization(AGGREGATE_TYPE, self.id, action))
        }
    }

    /// Checks that the command is admissible from the current state.
    fn ensure_state(
        &self,
        allowed: &[ListingState],
        action: &'static str,
    ) -> Result<(), DomainError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(DomainError::invalid_transition(
                AGGREGATE_TYPE,
                self.id,
                self.state,
                action,
            ))
        }
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }

    fn queue_event<E: SerializableDomainEvent>(&mut self, event: &E) {
        self.pending_events.push(event.to_envelope());
    }

    /// Validates listing content.
    fn validate_details(details: &ListingDetails) -> Result<(), DomainError> {
        let title = details.title.trim();
        if title.is_empty() {
            return Err(ValidationError::empty_field("title").into());
        }
        if title.len() > MAX_TITLE_LENGTH {
            return Err(ValidationError::out_of_range(
                "title",
                1,
                MAX_TITLE_LENGTH as i32,
                title.len() as i32,
            )
            .into());
        }
        if details.description.len() > MAX_DESCRIPTION_LENGTH {
            return Err(ValidationError::out_of_range(
                "description",
                0,
                MAX_DESCRIPTION_LENGTH as i32,
                details.description.len() as i32,
            )
            .into());
        }
        if details.location.trim().is_empty() {
            return Err(ValidationError::empty_field("location").into());
        }
        validate_images(&details.images)?;
        Ok(())
    }
}

impl AggregateRoot for ItemListing {
    type Id = ListingId;

    fn aggregate_type() -> &'static str {
        AGGREGATE_TYPE
    }

    fn id(&self) -> &ListingId {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    fn take_events(&mut self) -> Vec<EventEnvelope> {
        std::mem::take(&mut self.pending_events)
    }
}
