//! Capability evaluation for reservation request commands.
//!
//! Reservation grants depend on both the caller's relationship to the
//! request (reserver or owner of the referenced listing) and the
//! request's current state. [`ReservationVisa::determine_if`] recomputes
//! the grant set on every call, so the answer always reflects the
//! snapshot the visa was minted from.

use crate::domain::foundation::Passport;
use crate::domain::reservation::reference::ReservationRequestRef;
use crate::domain::reservation::state::ReservationState;

/// Capability set a caller holds over one reservation request.
///
/// Derived from `{is_reserver, is_listing_owner, current_state}`, never
/// stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservationGrants {
    /// Caller filed the reservation request.
    pub is_reserver: bool,

    /// Caller owns the listing the request targets.
    pub is_listing_owner: bool,

    /// Caller may withdraw the request.
    pub can_cancel: bool,

    /// Caller may accept the request.
    pub can_accept: bool,

    /// Caller may decline the request.
    pub can_reject: bool,

    /// Caller may ask to wrap up the sharing.
    pub can_request_close: bool,

    /// Caller may confirm closure.
    pub can_close: bool,

    /// Caller may change the requested period.
    pub can_update: bool,

    /// Caller may delete the request record (administrative override).
    pub can_delete: bool,
}

impl ReservationGrants {
    fn compute(passport: &Passport, request: &ReservationRequestRef) -> Self {
        let is_reserver = passport.acts_as(&request.reserver_id);
        let is_listing_owner = passport.acts_as(&request.listing_sharer_id);
        let state = request.state;

        Self {
            is_reserver,
            is_listing_owner,
            can_cancel: is_reserver
                && matches!(
                    state,
                    ReservationState::Requested
                        | ReservationState::Accepted
                        | ReservationState::Rejected
                ),
            can_accept: is_listing_owner && state == ReservationState::Requested,
            can_reject: is_listing_owner && state == ReservationState::Requested,
            can_request_close: is_reserver && state == ReservationState::Accepted,
            can_close: (is_reserver || is_listing_owner)
                && matches!(
                    state,
                    ReservationState::Accepted | ReservationState::Closing
                ),
            can_update: is_reserver && state == ReservationState::Requested,
            can_delete: is_listing_owner,
        }
    }
}

/// Scoped authorization evaluator for one reservation request instance.
#[derive(Debug, Clone)]
pub struct ReservationVisa {
    passport: Passport,
    request: ReservationRequestRef,
}

impl ReservationVisa {
    pub fn new(passport: Passport, request: ReservationRequestRef) -> Self {
        Self { passport, request }
    }

    /// Evaluates `predicate` against a freshly computed grant set.
    pub fn determine_if(&self, predicate: impl FnOnce(&ReservationGrants) -> bool) -> bool {
        let grants = ReservationGrants::compute(&self.passport, &self.request);
        predicate(&grants)
    }

    /// Returns the current grant set for inspection.
    pub fn grants(&self) -> ReservationGrants {
        ReservationGrants::compute(&self.passport, &self.request)
    }

    pub fn passport(&self) -> &Passport {
        &self.passport
    }
}

impl Passport {
    /// Mints a visa scoped to the given reservation request snapshot.
    pub fn for_reservation_request(&self, request: &ReservationRequestRef) -> ReservationVisa {
        ReservationVisa::new(self.clone(), request.clone())
    }
}
