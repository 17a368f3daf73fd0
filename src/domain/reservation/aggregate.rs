//! Reservation request aggregate entity.
//!
//! A reservation request is one user's ask to borrow a listed item for a
//! period. It moves from `Requested` through `Accepted` (and optionally
//! `Closing`) to `Closed`, or ends early in `Rejected` or `Cancelled`.
//!
//! # Authorization
//!
//! Reservation capabilities depend on the caller's relationship to the
//! request and to the listing it targets. The listing's owner is not
//! stored on this aggregate; command methods take the listing's
//! [`ListingRef`] snapshot and mint their visa from it. The visa gates
//! the role component (`Authorization`), the state machine gates the
//! state component (`InvalidStateTransition`), so "not allowed for you"
//! and "not allowed for anyone right now" stay distinct.
//!
//! # Events
//!
//! Command methods queue domain events on the aggregate; the
//! transactional scope that persists the change drains them exactly once.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    AggregateRoot, DomainError, EventEnvelope, EventId, ListingId, Passport, Period,
    ReservationRequestId, SerializableDomainEvent, Timestamp, UserId,
};
use crate::domain::listing::ListingRef;
use crate::domain::reservation::events::{
    ReservationAccepted, ReservationCancelled, ReservationCloseRequested, ReservationClosed,
    ReservationRejected, ReservationRequested, ReservationRescheduled,
};
use crate::domain::reservation::reference::ReservationRequestRef;
use crate::domain::reservation::state::ReservationState;
use crate::domain::reservation::visa::{ReservationGrants, ReservationVisa};

const AGGREGATE_TYPE: &str = "ReservationRequest";

/// Reservation request aggregate - one user's ask to borrow an item.
///
/// # Invariants
///
/// - `period` lies within the target listing's sharing period at
///   creation and on every reschedule
/// - `state` changes only along the transitions of [`ReservationState`]
/// - the reserver is never the listing's sharer
/// - `version` advances only through the persistence boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationRequest {
    /// Unique identifier for this request.
    id: ReservationRequestId,

    /// Listing the request targets (not owned).
    listing_id: ListingId,

    /// User asking to borrow the item.
    reserver_id: UserId,

    /// Current lifecycle state.
    state: ReservationState,

    /// Requested borrowing window.
    period: Period,

    /// Whether the sharer has asked for or confirmed closure.
    close_requested_by_sharer: bool,

    /// Whether the reserver has asked for or confirmed closure.
    close_requested_by_reserver: bool,

    /// Optimistic concurrency counter, stored as `schema_version`.
    #[serde(rename = "schema_version")]
    version: u64,

    /// When the request was filed.
    created_at: Timestamp,

    /// When the request was last updated.
    updated_at: Timestamp,

    /// Events queued by command methods, drained by the transactional scope.
    #[serde(skip)]
    pending_events: Vec<EventEnvelope>,
}

impl ReservationRequest {
    /// File a new reservation request against a listing snapshot.
    ///
    /// The overlap invariant against other active requests is enforced
    /// by the creating service inside the same transactional scope, not
    /// here.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the listing is not open for reservations, the
    ///   reserver owns the listing, or the period falls outside the
    ///   listing's sharing period
    pub fn new(
        id: ReservationRequestId,
        listing: &ListingRef,
        reserver_id: UserId,
        period: Period,
    ) -> Result<Self, DomainError> {
        if !listing.state.is_publicly_visible() {
            return Err(DomainError::conflict(format!(
                "listing {} is not open for reservations",
                listing.id
            )));
        }
        if listing.sharer_id == reserver_id {
            return Err(DomainError::conflict("cannot reserve your own listing"));
        }
        if !listing.sharing_period.contains(&period) {
            return Err(DomainError::conflict(
                "requested period lies outside the listing's sharing period",
            ));
        }

        let now = Timestamp::now();
        let mut request = Self {
            id,
            listing_id: listing.id,
            reserver_id,
            state: ReservationState::Requested,
            period,
            close_requested_by_sharer: false,
            close_requested_by_reserver: false,
            version: 0,
            created_at: now,
            updated_at: now,
            pending_events: Vec::new(),
        };

        request.queue_event(&ReservationRequested {
            event_id: EventId::new(),
            reservation_request_id: request.id,
            listing_id: request.listing_id,
            reserver_id: request.reserver_id.clone(),
            period,
            requested_at: now,
        });
        Ok(request)
    }

    /// Reconstitute a request from persistence (no validation, no events).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: ReservationRequestId,
        listing_id: ListingId,
        reserver_id: UserId,
        state: ReservationState,
        period: Period,
        close_requested_by_sharer: bool,
        close_requested_by_reserver: bool,
        version: u64,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            listing_id,
            reserver_id,
            state,
            period,
            close_requested_by_sharer,
            close_requested_by_reserver,
            version,
            created_at,
            updated_at,
            pending_events: Vec::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the request ID.
    pub fn id(&self) -> &ReservationRequestId {
        &self.id
    }

    /// Returns the targeted listing's ID.
    pub fn listing_id(&self) -> &ListingId {
        &self.listing_id
    }

    /// Returns the reserver's user ID.
    pub fn reserver_id(&self) -> &UserId {
        &self.reserver_id
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> ReservationState {
        self.state
    }

    /// Returns the requested borrowing window.
    pub fn period(&self) -> Period {
        self.period
    }

    /// Returns whether the sharer has asked for or confirmed closure.
    pub fn close_requested_by_sharer(&self) -> bool {
        self.close_requested_by_sharer
    }

    /// Returns whether the reserver has asked for or confirmed closure.
    pub fn close_requested_by_reserver(&self) -> bool {
        self.close_requested_by_reserver
    }

    /// Returns when the request was filed.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns when the request was last updated.
    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Builds a read-only reference snapshot.
    ///
    /// The listing owner's id is flattened in so a visa can be minted
    /// from the ref alone.
    pub fn to_ref(&self, listing_sharer_id: &UserId) -> ReservationRequestRef {
        ReservationRequestRef {
            id: self.id,
            listing_id: self.listing_id,
            reserver_id: self.reserver_id.clone(),
            listing_sharer_id: listing_sharer_id.clone(),
            state: self.state,
            period: self.period,
            close_requested_by_sharer: self.close_requested_by_sharer,
            close_requested_by_reserver: self.close_requested_by_reserver,
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Accept the request (listing owner).
    ///
    /// # Errors
    ///
    /// - `Authorization` if the caller does not own the listing
    /// - `InvalidStateTransition` unless Requested
    pub fn accept(&mut self, passport: &Passport, listing: &ListingRef) -> Result<(), DomainError> {
        self.authorize(passport, listing, "accept", |g| g.is_listing_owner)?;
        self.ensure_state(&[ReservationState::Requested], "accept")?;

        self.state = ReservationState::Accepted;
        self.touch();
        self.queue_event(&ReservationAccepted {
            event_id: EventId::new(),
            reservation_request_id: self.id,
            listing_id: self.listing_id,
            reserver_id: self.reserver_id.clone(),
            sharer_id: listing.sharer_id.clone(),
            period: self.period,
            accepted_at: self.updated_at,
        });
        Ok(())
    }

    /// Decline the request (listing owner).
    ///
    /// # Errors
    ///
    /// - `Authorization` if the caller does not own the listing
    /// - `InvalidStateTransition` unless Requested
    pub fn reject(&mut self, passport: &Passport, listing: &ListingRef) -> Result<(), DomainError> {
        self.authorize(passport, listing, "reject", |g| g.is_listing_owner)?;
        self.ensure_state(&[ReservationState::Requested], "reject")?;

        self.state = ReservationState::Rejected;
        self.touch();
        self.queue_event(&ReservationRejected {
            event_id: EventId::new(),
            reservation_request_id: self.id,
            listing_id: self.listing_id,
            reserver_id: self.reserver_id.clone(),
            rejected_at: self.updated_at,
        });
        Ok(())
    }

    /// Withdraw the request (reserver).
    ///
    /// A rejected request may still be cancelled to clear it from the
    /// reserver's list.
    ///
    /// # Errors
    ///
    /// - `Authorization` if the caller is not the reserver
    /// - `InvalidStateTransition` unless Requested, Accepted or Rejected
    pub fn cancel(&mut self, passport: &Passport, listing: &ListingRef) -> Result<(), DomainError> {
        self.authorize(passport, listing, "cancel", |g| g.is_reserver)?;
        self.ensure_state(
            &[
                ReservationState::Requested,
                ReservationState::Accepted,
                ReservationState::Rejected,
            ],
            "cancel",
        )?;

        self.state = ReservationState::Cancelled;
        self.touch();
        self.queue_event(&ReservationCancelled {
            event_id: EventId::new(),
            reservation_request_id: self.id,
            listing_id: self.listing_id,
            reserver_id: self.reserver_id.clone(),
            cancelled_at: self.updated_at,
        });
        Ok(())
    }

    /// Ask to wrap up an accepted sharing (reserver).
    ///
    /// # Errors
    ///
    /// - `Authorization` if the caller is not the reserver
    /// - `InvalidStateTransition` unless Accepted
    pub fn request_close(
        &mut self,
        passport: &Passport,
        listing: &ListingRef,
    ) -> Result<(), DomainError> {
        self.authorize(passport, listing, "request_close", |g| g.is_reserver)?;
        self.ensure_state(&[ReservationState::Accepted], "request_close")?;
        let requested_by = self.require_actor(passport, "request_close")?;

        self.close_requested_by_reserver = true;
        self.state = ReservationState::Closing;
        self.touch();
        self.queue_event(&ReservationCloseRequested {
            event_id: EventId::new(),
            reservation_request_id: self.id,
            listing_id: self.listing_id,
            requested_by,
            close_requested_at: self.updated_at,
        });
        Ok(())
    }

    /// Conclude the sharing (either party).
    ///
    /// # Errors
    ///
    /// - `Authorization` unless the caller is the reserver or the
    ///   listing owner
    /// - `InvalidStateTransition` unless Accepted or Closing
    pub fn close(&mut self, passport: &Passport, listing: &ListingRef) -> Result<(), DomainError> {
        self.authorize(passport, listing, "close", |g| {
            g.is_reserver || g.is_listing_owner
        })?;
        self.ensure_state(
            &[ReservationState::Accepted, ReservationState::Closing],
            "close",
        )?;
        let closed_by = self.require_actor(passport, "close")?;

        if passport.acts_as(&listing.sharer_id) {
            self.close_requested_by_sharer = true;
        } else {
            self.close_requested_by_reserver = true;
        }
        self.state = ReservationState::Closed;
        self.touch();
        self.queue_event(&ReservationClosed {
            event_id: EventId::new(),
            reservation_request_id: self.id,
            listing_id: self.listing_id,
            closed_by,
            closed_at: self.updated_at,
        });
        Ok(())
    }

    /// Move the requested period (reserver, while still Requested).
    ///
    /// The creating service re-runs the overlap check against the new
    /// period in the same transactional scope.
    ///
    /// # Errors
    ///
    /// - `Authorization` if the caller is not the reserver
    /// - `InvalidStateTransition` unless Requested
    /// - `Conflict` if the new period falls outside the listing's
    ///   sharing period
    pub fn reschedule(
        &mut self,
        passport: &Passport,
        listing: &ListingRef,
        new_period: Period,
    ) -> Result<(), DomainError> {
        self.authorize(passport, listing, "reschedule", |g| g.is_reserver)?;
        self.ensure_state(&[ReservationState::Requested], "reschedule")?;
        if !listing.sharing_period.contains(&new_period) {
            return Err(DomainError::conflict(
                "requested period lies outside the listing's sharing period",
            ));
        }

        self.period = new_period;
        self.touch();
        self.queue_event(&ReservationRescheduled {
            event_id: EventId::new(),
            reservation_request_id: self.id,
            listing_id: self.listing_id,
            period: new_period,
            rescheduled_at: self.updated_at,
        });
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Checks the role component of a capability through a fresh visa.
    ///
    /// The listing snapshot must be the one this request targets.
    fn authorize(
        &self,
        passport: &Passport,
        listing: &ListingRef,
        action: &'static str,
        predicate: impl FnOnce(&ReservationGrants) -> bool,
    ) -> Result<(), DomainError> {
        if listing.id != self.listing_id {
            return Err(DomainError::conflict(format!(
                "listing {} does not match reservation request {}",
                listing.id, self.id
            )));
        }
        let visa: ReservationVisa =
            passport.for_reservation_request(&self.to_ref(&listing.sharer_id));
        if visa.determine_if(predicate) {
            Ok(())
        } else {
            Err(DomainError::authorization(AGGREGATE_TYPE, self.id, action))
        }
    }

    /// Checks that the command is admissible from the current state.
    fn ensure_state(
        &self,
        allowed: &[ReservationState],
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

    /// Returns the acting user; system passports carry none.
    fn require_actor(
        &self,
        passport: &Passport,
        action: &'static str,
    ) -> Result<UserId, DomainError> {
        passport
            .actor_id()
            .cloned()
            .ok_or_else(|| DomainError::authorization(AGGREGATE_TYPE, self.id, action))
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }

    fn queue_event<E: SerializableDomainEvent>(&mut self, event: &E) {
        self.pending_events.push(event.to_envelope());
    }
}

impl AggregateRoot for ReservationRequest {
    type Id = ReservationRequestId;

    fn aggregate_type() -> &'static str {
        AGGREGATE_TYPE
    }

    fn id(&self) -> &ReservationRequestId {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::{Category, ListingState};

    fn sharer() -> UserId {
        UserId::new("sharer-1").unwrap()
    }

    fn reserver() -> UserId {
        UserId::new("reserver-1").unwrap()
    }

    fn owner_passport() -> Passport {
        Passport::user(sharer())
    }

    fn reserver_passport() -> Passport {
        Passport::user(reserver())
    }

    fn listing_ref(state: ListingState) -> ListingRef {
        let now = Timestamp::now();
        ListingRef {
            id: ListingId::new(),
            sharer_id: sharer(),
            title: "Tent, 4 person".to_string(),
            description: "Dome tent".to_string(),
            category: Category::Outdoors,
            location: "Utrecht".to_string(),
            sharing_period: Period::try_new(now.minus_days(1), now.add_days(30)).unwrap(),
            state,
            sharing_history: Vec::new(),
            reports: 0,
            images: Vec::new(),
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    fn published_listing() -> ListingRef {
        listing_ref(ListingState::Published)
    }

    fn fitting_period() -> Period {
        let now = Timestamp::now();
        Period::try_new(now.add_days(2), now.add_days(5)).unwrap()
    }

    fn requested(listing: &ListingRef) -> ReservationRequest {
        ReservationRequest::new(
            ReservationRequestId::new(),
            listing,
            reserver(),
            fitting_period(),
        )
        .unwrap()
    }

    fn accepted(listing: &ListingRef) -> ReservationRequest {
        let mut request = requested(listing);
        request.accept(&owner_passport(), listing).unwrap();
        request
    }

    // Creation tests

    #[test]
    fn new_request_starts_requested_at_version_zero() {
        let listing = published_listing();
        let request = requested(&listing);
        assert_eq!(request.state(), ReservationState::Requested);
        assert_eq!(AggregateRoot::version(&request), 0);
        assert_eq!(request.listing_id(), &listing.id);
        assert!(!request.close_requested_by_sharer());
        assert!(!request.close_requested_by_reserver());
    }

    #[test]
    fn new_request_queues_requested_event() {
        let listing = published_listing();
        let mut request = requested(&listing);
        let events = request.take_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, "reservation.requested.v1");
    }

    #[test]
    fn cannot_reserve_unpublished_listing() {
        for state in [
            ListingState::Drafted,
            ListingState::Paused,
            ListingState::Blocked,
            ListingState::Cancelled,
        ] {
            let listing = listing_ref(state);
            let result = ReservationRequest::new(
                ReservationRequestId::new(),
                &listing,
                reserver(),
                fitting_period(),
            );
            assert!(matches!(result, Err(DomainError::Conflict { .. })), "state {state}");
        }
    }

    #[test]
    fn cannot_reserve_own_listing() {
        let listing = published_listing();
        let result = ReservationRequest::new(
            ReservationRequestId::new(),
            &listing,
            sharer(),
            fitting_period(),
        );
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[test]
    fn period_must_fit_the_sharing_window() {
        let listing = published_listing();
        let now = Timestamp::now();
        let outside = Period::try_new(now.add_days(20), now.add_days(40)).unwrap();
        let result =
            ReservationRequest::new(ReservationRequestId::new(), &listing, reserver(), outside);
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    // Accept and reject tests

    #[test]
    fn owner_accepts_requested() {
        let listing = published_listing();
        let request = accepted(&listing);
        assert_eq!(request.state(), ReservationState::Accepted);
    }

    #[test]
    fn accepted_event_carries_both_parties_and_period() {
        let listing = published_listing();
        let mut request = requested(&listing);
        request.take_events();
        request.accept(&owner_passport(), &listing).unwrap();

        let events = request.take_events();
        assert_eq!(events.len(), 1);
        let payload: ReservationAccepted = events[0].payload_as().unwrap();
        assert_eq!(payload.reserver_id, reserver());
        assert_eq!(payload.sharer_id, sharer());
        assert_eq!(payload.period, request.period());
    }

    #[test]
    fn reserver_cannot_accept_own_request() {
        let listing = published_listing();
        let mut request = requested(&listing);
        let result = request.accept(&reserver_passport(), &listing);
        assert!(matches!(result, Err(DomainError::Authorization { .. })));
        assert_eq!(request.state(), ReservationState::Requested);
    }

    #[test]
    fn accept_twice_is_invalid_transition() {
        let listing = published_listing();
        let mut request = accepted(&listing);
        let result = request.accept(&owner_passport(), &listing);
        assert!(matches!(
            result,
            Err(DomainError::InvalidStateTransition { .. })
        ));
    }

    #[test]
    fn owner_rejects_requested() {
        let listing = published_listing();
        let mut request = requested(&listing);
        request.reject(&owner_passport(), &listing).unwrap();
        assert_eq!(request.state(), ReservationState::Rejected);
    }

    #[test]
    fn reject_after_accept_is_invalid_transition() {
        let listing = published_listing();
        let mut request = accepted(&listing);
        let result = request.reject(&owner_passport(), &listing);
        assert!(matches!(
            result,
            Err(DomainError::InvalidStateTransition { .. })
        ));
    }

    // Cancel tests

    #[test]
    fn reserver_cancels_requested() {
        let listing = published_listing();
        let mut request = requested(&listing);
        request.cancel(&reserver_passport(), &listing).unwrap();
        assert_eq!(request.state(), ReservationState::Cancelled);
    }

    #[test]
    fn owner_cannot_cancel_for_the_reserver() {
        let listing = published_listing();
        let mut request = requested(&listing);
        let result = request.cancel(&owner_passport(), &listing);
        assert!(matches!(result, Err(DomainError::Authorization { .. })));
        assert_eq!(request.state(), ReservationState::Requested);
    }

    #[test]
    fn reserver_cancels_accepted_and_rejected() {
        let listing = published_listing();

        let mut request = accepted(&listing);
        request.cancel(&reserver_passport(), &listing).unwrap();
        assert_eq!(request.state(), ReservationState::Cancelled);

        let mut request = requested(&listing);
        request.reject(&owner_passport(), &listing).unwrap();
        request.cancel(&reserver_passport(), &listing).unwrap();
        assert_eq!(request.state(), ReservationState::Cancelled);
    }

    #[test]
    fn cancel_after_close_is_invalid_transition() {
        let listing = published_listing();
        let mut request = accepted(&listing);
        request.close(&owner_passport(), &listing).unwrap();

        let result = request.cancel(&reserver_passport(), &listing);
        assert!(matches!(
            result,
            Err(DomainError::InvalidStateTransition { .. })
        ));
    }

    // Closure tests

    #[test]
    fn reserver_requests_close_from_accepted() {
        let listing = published_listing();
        let mut request = accepted(&listing);
        request.request_close(&reserver_passport(), &listing).unwrap();

        assert_eq!(request.state(), ReservationState::Closing);
        assert!(request.close_requested_by_reserver());
        assert!(!request.close_requested_by_sharer());
    }

    #[test]
    fn owner_cannot_request_close() {
        let listing = published_listing();
        let mut request = accepted(&listing);
        let result = request.request_close(&owner_passport(), &listing);
        assert!(matches!(result, Err(DomainError::Authorization { .. })));
    }

    #[test]
    fn request_close_needs_accepted() {
        let listing = published_listing();
        let mut request = requested(&listing);
        let result = request.request_close(&reserver_passport(), &listing);
        assert!(matches!(
            result,
            Err(DomainError::InvalidStateTransition { .. })
        ));
    }

    #[test]
    fn owner_closes_after_reserver_requested_close() {
        let listing = published_listing();
        let mut request = accepted(&listing);
        request.request_close(&reserver_passport(), &listing).unwrap();
        request.close(&owner_passport(), &listing).unwrap();

        assert_eq!(request.state(), ReservationState::Closed);
        assert!(request.close_requested_by_reserver());
        assert!(request.close_requested_by_sharer());
    }

    #[test]
    fn reserver_closes_directly_from_accepted() {
        let listing = published_listing();
        let mut request = accepted(&listing);
        request.close(&reserver_passport(), &listing).unwrap();
        assert_eq!(request.state(), ReservationState::Closed);
    }

    #[test]
    fn third_party_cannot_close() {
        let listing = published_listing();
        let mut request = accepted(&listing);
        let stranger = Passport::user(UserId::new("someone-else").unwrap());
        let result = request.close(&stranger, &listing);
        assert!(matches!(result, Err(DomainError::Authorization { .. })));
    }

    #[test]
    fn close_from_requested_is_invalid_transition() {
        let listing = published_listing();
        let mut request = requested(&listing);
        let result = request.close(&owner_passport(), &listing);
        assert!(matches!(
            result,
            Err(DomainError::InvalidStateTransition { .. })
        ));
    }

    #[test]
    fn closed_event_names_listing_and_closer() {
        let listing = published_listing();
        let mut request = accepted(&listing);
        request.take_events();
        request.close(&owner_passport(), &listing).unwrap();

        let events = request.take_events();
        assert_eq!(events.len(), 1);
        let payload: ReservationClosed = events[0].payload_as().unwrap();
        assert_eq!(payload.listing_id, listing.id);
        assert_eq!(payload.closed_by, sharer());
    }

    // Reschedule tests

    #[test]
    fn reserver_reschedules_while_requested() {
        let listing = published_listing();
        let mut request = requested(&listing);
        let now = Timestamp::now();
        let new_period = Period::try_new(now.add_days(10), now.add_days(12)).unwrap();

        request
            .reschedule(&reserver_passport(), &listing, new_period)
            .unwrap();
        assert_eq!(request.period(), new_period);
    }

    #[test]
    fn reschedule_outside_sharing_window_is_a_conflict() {
        let listing = published_listing();
        let mut request = requested(&listing);
        let now = Timestamp::now();
        let outside = Period::try_new(now.add_days(25), now.add_days(45)).unwrap();

        let result = request.reschedule(&reserver_passport(), &listing, outside);
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[test]
    fn reschedule_after_accept_is_invalid_transition() {
        let listing = published_listing();
        let mut request = accepted(&listing);
        let result = request.reschedule(&reserver_passport(), &listing, fitting_period());
        assert!(matches!(
            result,
            Err(DomainError::InvalidStateTransition { .. })
        ));
    }

    // Guard ordering and plumbing tests

    #[test]
    fn role_denial_wins_over_state_denial() {
        // A third party calling accept on a closed request hits the role
        // gate first.
        let listing = published_listing();
        let mut request = accepted(&listing);
        request.close(&owner_passport(), &listing).unwrap();

        let stranger = Passport::user(UserId::new("someone-else").unwrap());
        let result = request.accept(&stranger, &listing);
        assert!(matches!(result, Err(DomainError::Authorization { .. })));
    }

    #[test]
    fn mismatched_listing_snapshot_is_rejected() {
        let listing = published_listing();
        let other_listing = published_listing();
        let mut request = requested(&listing);

        let result = request.accept(&owner_passport(), &other_listing);
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[test]
    fn events_are_drained_once() {
        let listing = published_listing();
        let mut request = requested(&listing);
        request.accept(&owner_passport(), &listing).unwrap();

        let events = request.take_events();
        assert_eq!(events.len(), 2);
        assert!(request.take_events().is_empty());
    }

    #[test]
    fn serialization_drops_pending_events() {
        let listing = published_listing();
        let mut request = requested(&listing);

        let json = serde_json::to_string(&request).unwrap();
        let mut restored: ReservationRequest = serde_json::from_str(&json).unwrap();

        assert!(json.contains("\"schema_version\""));
        assert!(restored.take_events().is_empty());
        assert_eq!(restored.state(), request.state());
        assert_eq!(restored.id(), request.id());
    }

    #[test]
    fn to_ref_flattens_listing_owner() {
        let listing = published_listing();
        let request = requested(&listing);

        let reference = request.to_ref(&listing.sharer_id);
        assert_eq!(reference.listing_sharer_id, sharer());
        assert_eq!(reference.reserver_id, reserver());
        assert_eq!(reference.state, ReservationState::Requested);
    }

    // Property tests

    mod properties {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone, Copy, PartialEq)]
        enum Caller {
            Reserver,
            ListingOwner,
            Stranger,
            Moderator,
            System,
        }

        #[derive(Debug, Clone, Copy)]
        enum Command {
            Accept,
            Reject,
            Cancel,
            RequestClose,
            Close,
            Reschedule,
        }

        #[derive(Debug, PartialEq)]
        enum Outcome {
            Transition(ReservationState),
            Stays,
            Denied,
            Invalid,
        }

        fn any_state() -> impl Strategy<Value = ReservationState> {
            prop::sample::select(vec![
                ReservationState::Requested,
                ReservationState::Accepted,
                ReservationState::Rejected,
                ReservationState::Cancelled,
                ReservationState::Closing,
                ReservationState::Closed,
            ])
        }

        fn any_command() -> impl Strategy<Value = Command> {
            prop::sample::select(vec![
                Command::Accept,
                Command::Reject,
                Command::Cancel,
                Command::RequestClose,
                Command::Close,
                Command::Reschedule,
            ])
        }

        fn any_caller() -> impl Strategy<Value = Caller> {
            prop::sample::select(vec![
                Caller::Reserver,
                Caller::ListingOwner,
                Caller::Stranger,
                Caller::Moderator,
                Caller::System,
            ])
        }

        fn request_in(listing: &ListingRef, state: ReservationState) -> ReservationRequest {
            let now = Timestamp::now();
            let (by_sharer, by_reserver) = match state {
                ReservationState::Closing => (false, true),
                ReservationState::Closed => (true, true),
                _ => (false, false),
            };
            ReservationRequest::reconstitute(
                ReservationRequestId::new(),
                listing.id,
                reserver(),
                state,
                fitting_period(),
                by_sharer,
                by_reserver,
                2,
                now.minus_days(3),
                now.minus_days(1),
            )
        }

        fn passport_for(caller: Caller) -> Passport {
            match caller {
                Caller::Reserver => reserver_passport(),
                Caller::ListingOwner => owner_passport(),
                Caller::Stranger => Passport::user(UserId::new("someone-else").unwrap()),
                Caller::Moderator => Passport::moderator(UserId::new("mod-1").unwrap()),
                Caller::System => Passport::system(),
            }
        }

        fn apply(
            request: &mut ReservationRequest,
            command: Command,
            passport: &Passport,
            listing: &ListingRef,
        ) -> Result<(), DomainError> {
            match command {
                Command::Accept => request.accept(passport, listing),
                Command::Reject => request.reject(passport, listing),
                Command::Cancel => request.cancel(passport, listing),
                Command::RequestClose => request.request_close(passport, listing),
                Command::Close => request.close(passport, listing),
                Command::Reschedule => {
                    let now = Timestamp::now();
                    let new_period = Period::try_new(now.add_days(8), now.add_days(11)).unwrap();
                    request.reschedule(passport, listing, new_period)
                }
            }
        }

        /// Mirror of the per-command role and source-state tables.
        ///
        /// Moderator and system passports hold no reservation grants, so
        /// they land in `Denied` for every command.
        fn expected(state: ReservationState, command: Command, caller: Caller) -> Outcome {
            use Caller::*;
            use ReservationState::*;

            let authorized = match command {
                Command::Accept | Command::Reject => caller == ListingOwner,
                Command::Cancel | Command::RequestClose | Command::Reschedule => {
                    caller == Reserver
                }
                Command::Close => matches!(caller, Reserver | ListingOwner),
            };
            if !authorized {
                return Outcome::Denied;
            }

            match command {
                Command::Accept if state == Requested => Outcome::Transition(Accepted),
                Command::Reject if state == Requested => Outcome::Transition(Rejected),
                Command::Cancel if matches!(state, Requested | Accepted | Rejected) => {
                    Outcome::Transition(Cancelled)
                }
                Command::RequestClose if state == Accepted => Outcome::Transition(Closing),
                Command::Close if matches!(state, Accepted | Closing) => {
                    Outcome::Transition(Closed)
                }
                Command::Reschedule if state == Requested => Outcome::Stays,
                _ => Outcome::Invalid,
            }
        }

        proptest! {
            #[test]
            fn commands_match_the_role_and_transition_tables(
                state in any_state(),
                command in any_command(),
                caller in any_caller(),
            ) {
                let listing = published_listing();
                let mut request = request_in(&listing, state);
                let passport = passport_for(caller);

                let result = apply(&mut request, command, &passport, &listing);

                match expected(state, command, caller) {
                    Outcome::Transition(next) => {
                        prop_assert!(result.is_ok(), "unexpected {:?}", result);
                        prop_assert_eq!(request.state(), next);
                    }
                    Outcome::Stays => {
                        prop_assert!(result.is_ok(), "unexpected {:?}", result);
                        prop_assert_eq!(request.state(), state);
                    }
                    Outcome::Denied => {
                        prop_assert!(
                            matches!(result, Err(DomainError::Authorization { .. })),
                            "unexpected {:?}",
                            result
                        );
                        prop_assert_eq!(request.state(), state);
                    }
                    Outcome::Invalid => {
                        prop_assert!(
                            matches!(result, Err(DomainError::InvalidStateTransition { .. })),
                            "unexpected {:?}",
                            result
                        );
                        prop_assert_eq!(request.state(), state);
                    }
                }
            }

            #[test]
            fn failed_commands_leave_no_queued_events(
                state in any_state(),
                command in any_command(),
                caller in any_caller(),
            ) {
                let listing = published_listing();
                let mut request = request_in(&listing, state);
                let passport = passport_for(caller);

                if apply(&mut request, command, &passport, &listing).is_err() {
                    prop_assert!(request.take_events().is_empty());
                }
            }
        }
    }
}
