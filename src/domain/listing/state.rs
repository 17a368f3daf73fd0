//! ListingState enum for tracking the lifecycle of item listings.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle state of an item listing.
///
/// `Cancelled` and `Expired` are terminal. `Blocked` and
/// `AppealRequested` form the moderation loop: a blocked listing can be
/// appealed by its sharer and reinstated or re-blocked by a moderator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ListingState {
    #[default]
    Drafted,
    Published,
    Paused,
    Cancelled,
    Expired,
    Blocked,
    AppealRequested,
}

impl ListingState {
    /// Returns true if the listing is visible to other users.
    pub fn is_publicly_visible(&self) -> bool {
        matches!(self, ListingState::Published)
    }

    /// Returns true if the sharer may edit listing details in this state.
    pub fn is_editable(&self) -> bool {
        matches!(
            self,
            ListingState::Drafted | ListingState::Published | ListingState::Paused
        )
    }

    /// Returns true if a moderator may block the listing in this state.
    ///
    /// Terminal listings cannot be blocked, and a blocked listing is
    /// already blocked.
    pub fn is_blockable(&self) -> bool {
        self.can_transition_to(&ListingState::Blocked)
    }
}

impl StateMachine for ListingState {
    fn can_transition_to(&self, target: &ListingState) -> bool {
        use ListingState::*;
        matches!(
            (self, target),
            (Drafted, Published)
                | (Drafted, Cancelled)
                | (Drafted, Blocked)
                | (Published, Paused)
                | (Published, Cancelled)
                | (Published, Expired)
                | (Published, Blocked)
                | (Paused, Published)
                | (Paused, Cancelled)
                | (Paused, Blocked)
                | (Blocked, AppealRequested)
                | (Blocked, Published)
                | (AppealRequested, Published)
                | (AppealRequested, Blocked)
        )
    }

    fn valid_transitions(&self) -> Vec<ListingState> {
        use ListingState::*;
        match self {
            Drafted => vec![Published, Cancelled, Blocked],
            Published => vec![Paused, Cancelled, Expired, Blocked],
            Paused => vec![Published, Cancelled, Blocked],
            Blocked => vec![AppealRequested, Published],
            AppealRequested => vec![Published, Blocked],
            Cancelled | Expired => vec![],
        }
    }
}

impl fmt::Display for ListingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ListingState::Drafted => "Drafted",
            ListingState::Published => "Published",
            ListingState::Paused => "Paused",
            ListingState::Cancelled => "Cancelled",
            ListingState::Expired => "Expired",
            ListingState::Blocked => "Blocked",
            ListingState::AppealRequested => "AppealRequested",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_drafted() {
        assert_eq!(ListingState::default(), ListingState::Drafted);
    }

    #[test]
    fn drafted_can_be_published_or_cancelled() {
        assert!(ListingState::Drafted.can_transition_to(&ListingState::Published));
        assert!(ListingState::Drafted.can_transition_to(&ListingState::Cancelled));
    }

    #[test]
    fn drafted_cannot_be_paused_or_expired() {
        assert!(!ListingState::Drafted.can_transition_to(&ListingState::Paused));
        assert!(!ListingState::Drafted.can_transition_to(&ListingState::Expired));
    }

    #[test]
    fn published_can_pause_cancel_expire_block() {
        let published = ListingState::Published;
        assert!(published.can_transition_to(&ListingState::Paused));
        assert!(published.can_transition_to(&ListingState::Cancelled));
        assert!(published.can_transition_to(&ListingState::Expired));
        assert!(published.can_transition_to(&ListingState::Blocked));
    }

    #[test]
    fn paused_can_republish() {
        assert!(ListingState::Paused.can_transition_to(&ListingState::Published));
    }

    #[test]
    fn paused_cannot_expire() {
        assert!(!ListingState::Paused.can_transition_to(&ListingState::Expired));
    }

    #[test]
    fn blocked_allows_appeal_and_reinstate() {
        assert!(ListingState::Blocked.can_transition_to(&ListingState::AppealRequested));
        assert!(ListingState::Blocked.can_transition_to(&ListingState::Published));
    }

    #[test]
    fn blocked_cannot_be_blocked_again() {
        assert!(!ListingState::Blocked.can_transition_to(&ListingState::Blocked));
        assert!(!ListingState::Blocked.is_blockable());
    }

    #[test]
    fn appeal_requested_can_be_reinstated_or_reblocked() {
        assert!(ListingState::AppealRequested.can_transition_to(&ListingState::Published));
        assert!(ListingState::AppealRequested.can_transition_to(&ListingState::Blocked));
    }

    #[test]
    fn appeal_cannot_be_requested_twice() {
        assert!(!ListingState::AppealRequested.can_transition_to(&ListingState::AppealRequested));
    }

    #[test]
    fn cancelled_and_expired_are_terminal() {
        assert!(ListingState::Cancelled.is_terminal());
        assert!(ListingState::Expired.is_terminal());
        assert!(!ListingState::Blocked.is_terminal());
    }

    #[test]
    fn terminal_states_cannot_be_blocked() {
        assert!(!ListingState::Cancelled.is_blockable());
        assert!(!ListingState::Expired.is_blockable());
    }

    #[test]
    fn non_terminal_states_are_blockable() {
        assert!(ListingState::Drafted.is_blockable());
        assert!(ListingState::Published.is_blockable());
        assert!(ListingState::Paused.is_blockable());
        assert!(ListingState::AppealRequested.is_blockable());
    }

    #[test]
    fn only_published_is_publicly_visible() {
        assert!(ListingState::Published.is_publicly_visible());
        assert!(!ListingState::Drafted.is_publicly_visible());
        assert!(!ListingState::Paused.is_publicly_visible());
        assert!(!ListingState::Blocked.is_publicly_visible());
    }

    #[test]
    fn editable_states_are_drafted_published_paused() {
        assert!(ListingState::Drafted.is_editable());
        assert!(ListingState::Published.is_editable());
        assert!(ListingState::Paused.is_editable());
        assert!(!ListingState::Blocked.is_editable());
        assert!(!ListingState::Cancelled.is_editable());
    }

    #[test]
    fn serializes_to_snake_case_json() {
        assert_eq!(
            serde_json::to_string(&ListingState::AppealRequested).unwrap(),
            "\"appeal_requested\""
        );
        assert_eq!(
            serde_json::to_string(&ListingState::Drafted).unwrap(),
            "\"drafted\""
        );
    }

    #[test]
    fn deserializes_from_snake_case_json() {
        let state: ListingState = serde_json::from_str("\"appeal_requested\"").unwrap();
        assert_eq!(state, ListingState::AppealRequested);
    }
}
