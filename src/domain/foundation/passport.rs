//! Passport capability token for command authorization.
//!
//! A Passport identifies who is asking for an operation: a regular user,
//! a moderator, or the system itself (scheduled sweeps). It is minted
//! per operation and carries no persistent state. Aggregate-scoped
//! capability checks happen through Visas minted from a Passport plus
//! an entity reference; see `domain::listing::ListingVisa` and
//! `domain::reservation::ReservationVisa`.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::UserId;

/// Caller identity and role for a single operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Passport {
    /// A regular authenticated user.
    User { user_id: UserId },

    /// A moderator acting in their moderation capacity.
    Moderator { user_id: UserId },

    /// The system itself (scheduled sweeps, internal processes).
    System,
}

impl Passport {
    /// Creates a passport for a regular user.
    pub fn user(user_id: UserId) -> Self {
        Passport::User { user_id }
    }

    /// Creates a passport for a moderator.
    pub fn moderator(user_id: UserId) -> Self {
        Passport::Moderator { user_id }
    }

    /// Creates a system passport.
    pub fn system() -> Self {
        Passport::System
    }

    /// Returns the acting user's ID, if any.
    ///
    /// System passports carry no user identity.
    pub fn actor_id(&self) -> Option<&UserId> {
        match self {
            Passport::User { user_id } | Passport::Moderator { user_id } => Some(user_id),
            Passport::System => None,
        }
    }

    /// Checks whether this passport belongs to the given user.
    pub fn acts_as(&self, user_id: &UserId) -> bool {
        self.actor_id() == Some(user_id)
    }

    /// Returns true for moderator passports.
    pub fn is_moderator(&self) -> bool {
        matches!(self, Passport::Moderator { .. })
    }

    /// Returns true for the system passport.
    pub fn is_system(&self) -> bool {
        matches!(self, Passport::System)
    }

    /// Returns true for moderator or system passports.
    pub fn has_moderation_rights(&self) -> bool {
        self.is_moderator() || self.is_system()
    }

    /// Audit label for event metadata and logs.
    pub fn actor_label(&self) -> String {
        match self.actor_id() {
            Some(user_id) => user_id.to_string(),
            None => "system".to_string(),
        }
    }
}

impl fmt::Display for Passport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Passport::User { user_id } => write!(f, "user {}", user_id),
            Passport::Moderator { user_id } => write!(f, "moderator {}", user_id),
            Passport::System => write!(f, "system"),
        }
    }
}
