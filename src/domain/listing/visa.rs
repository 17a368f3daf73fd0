//! Capability evaluation for item listing commands.
//!
//! A [`ListingVisa`] is minted by a [`Passport`] for one listing snapshot and
//! answers permission questions through [`ListingVisa::determine_if`]. Grants
//! are recomputed from the caller's role relationship on every call rather
//! than cached, so a visa held across state changes never serves stale
//! answers.

use crate::domain::foundation::Passport;
use crate::domain::listing::reference::ListingRef;

/// Capability set a caller holds over one listing.
///
/// Listing capabilities derive from the caller's role alone; whether the
/// listing's current state admits a command is checked separately by the
/// state machine, so denied-for-you and denied-for-everyone stay distinct
/// errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingGrants {
    /// Caller is the sharer who owns the listing.
    pub is_owner: bool,

    /// Caller may make the listing visible.
    pub can_publish: bool,

    /// Caller may temporarily hide the listing.
    pub can_pause: bool,

    /// Caller may withdraw the listing permanently.
    pub can_cancel: bool,

    /// Caller may mark the listing expired once its period has ended.
    pub can_expire: bool,

    /// Caller may hide the listing for moderation reasons.
    pub can_block: bool,

    /// Caller may appeal a moderation block.
    pub can_request_appeal: bool,

    /// Caller may restore a blocked listing.
    pub can_reinstate: bool,

    /// Caller may edit the listing's content.
    pub can_update: bool,

    /// Caller may flag the listing for moderation review.
    pub can_report: bool,
}

impl ListingGrants {
    fn compute(passport: &Passport, listing: &ListingRef) -> Self {
        let is_owner = passport.acts_as(&listing.sharer_id);
        let has_moderation_rights = passport.has_moderation_rights();

        Self {
            is_owner,
            can_publish: is_owner,
            can_pause: is_owner,
            can_cancel: is_owner,
            can_expire: is_owner || passport.is_system(),
            can_block: has_moderation_rights,
            can_request_appeal: is_owner,
            can_reinstate: has_moderation_rights,
            can_update: is_owner,
            can_report: passport.actor_id().is_some() && !is_owner,
        }
    }
}

/// Scoped authorization evaluator for one listing instance.
#[derive(Debug, Clone)]
pub struct ListingVisa {
    passport: Passport,
    listing: ListingRef,
}

impl ListingVisa {
    pub fn new(passport: Passport, listing: ListingRef) -> Self {
        Self { passport, listing }
    }

    /// Evaluates `predicate` against a freshly computed grant set.
    pub fn determine_if(&self, predicate: impl FnOnce(&ListingGrants) -> bool) -> bool {
        let grants = ListingGrants::compute(&self.passport, &self.listing);
        predicate(&grants)
    }

    /// Returns the current grant set for inspection.
    pub fn grants(&self) -> ListingGrants {
        ListingGrants::compute(&self.passport, &self.listing)
    }

    pub fn passport(&self) -> &Passport {
        &self.passport
    }
}

impl Passport {
    /// Mints a visa scoped to the given listing snapshot.
    pub fn for_listing(&self, listing: &ListingRef) -> ListingVisa {
        ListingVisa::new(self.clone(), listing.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ListingId, Period, Timestamp, UserId};
    use crate::domain::listing::category::Category;
    use crate::domain::listing::state::ListingState;

    fn listing_ref(sharer: &str) -> ListingRef {
        let now = Timestamp::now();
        ListingRef {
            id: ListingId::new(),
            sharer_id: UserId::new(sharer).unwrap(),
            title: "Cordless drill".to_string(),
            description: "18V drill with two batteries".to_string(),
            category: Category::Tools,
            location: "Rotterdam".to_string(),
            sharing_period: Period::try_new(now, now.add_days(14)).unwrap(),
            state: ListingState::Published,
            sharing_history: Vec::new(),
            reports: 0,
            images: Vec::new(),
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn owner_holds_lifecycle_grants() {
        let listing = listing_ref("sharer-1");
        let passport = Passport::user(UserId::new("sharer-1").unwrap());

        let visa = passport.for_listing(&listing);

        assert!(visa.determine_if(|g| g.can_publish));
        assert!(visa.determine_if(|g| g.can_pause));
        assert!(visa.determine_if(|g| g.can_cancel));
        assert!(visa.determine_if(|g| g.can_expire));
        assert!(visa.determine_if(|g| g.can_request_appeal));
        assert!(visa.determine_if(|g| g.can_update));
    }

    #[test]
    fn owner_lacks_moderation_grants() {
        let listing = listing_ref("sharer-1");
        let passport = Passport::user(UserId::new("sharer-1").unwrap());

        let visa = passport.for_listing(&listing);

        assert!(!visa.determine_if(|g| g.can_block));
        assert!(!visa.determine_if(|g| g.can_reinstate));
    }

    #[test]
    fn owner_cannot_report_own_listing() {
        let listing = listing_ref("sharer-1");
        let passport = Passport::user(UserId::new("sharer-1").unwrap());

        let visa = passport.for_listing(&listing);

        assert!(!visa.determine_if(|g| g.can_report));
    }

    #[test]
    fn other_user_may_only_report() {
        let listing = listing_ref("sharer-1");
        let passport = Passport::user(UserId::new("visitor-1").unwrap());

        let visa = passport.for_listing(&listing);

        assert!(visa.determine_if(|g| g.can_report));
        assert!(!visa.determine_if(|g| g.can_publish));
        assert!(!visa.determine_if(|g| g.can_cancel));
        assert!(!visa.determine_if(|g| g.can_expire));
        assert!(!visa.determine_if(|g| g.can_block));
    }

    #[test]
    fn moderator_holds_block_and_reinstate() {
        let listing = listing_ref("sharer-1");
        let passport = Passport::moderator(UserId::new("mod-1").unwrap());

        let visa = passport.for_listing(&listing);

        assert!(visa.determine_if(|g| g.can_block));
        assert!(visa.determine_if(|g| g.can_reinstate));
        assert!(!visa.determine_if(|g| g.can_publish));
    }

    #[test]
    fn moderator_owning_listing_keeps_owner_grants() {
        let listing = listing_ref("mod-1");
        let passport = Passport::moderator(UserId::new("mod-1").unwrap());

        let visa = passport.for_listing(&listing);

        assert!(visa.determine_if(|g| g.is_owner));
        assert!(visa.determine_if(|g| g.can_publish && g.can_block));
    }

    #[test]
    fn system_may_expire_and_moderate_but_not_report() {
        let listing = listing_ref("sharer-1");
        let passport = Passport::system();

        let visa = passport.for_listing(&listing);

        assert!(visa.determine_if(|g| g.can_expire));
        assert!(visa.determine_if(|g| g.can_block));
        assert!(visa.determine_if(|g| g.can_reinstate));
        assert!(!visa.determine_if(|g| g.can_report));
        assert!(!visa.determine_if(|g| g.can_publish));
    }

    #[test]
    fn grants_reflect_passport_not_listing_state() {
        let mut listing = listing_ref("sharer-1");
        listing.state = ListingState::Blocked;
        let passport = Passport::user(UserId::new("sharer-1").unwrap());

        let visa = passport.for_listing(&listing);

        // Role grants stay constant; the state machine decides whether a
        // command is admissible from Blocked.
        assert!(visa.determine_if(|g| g.can_publish));
        assert!(visa.determine_if(|g| g.can_request_appeal));
    }
}
