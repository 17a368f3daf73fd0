//! ReservationState enum for tracking the lifecycle of reservation requests.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle state of a reservation request.
///
/// `Closed` and `Cancelled` are terminal. `Rejected` is an end outcome
/// but keeps a single outgoing edge: the reserver may still cancel a
/// rejected request to clear it from their list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReservationState {
    #[default]
    Requested,
    Accepted,
    Rejected,
    Closing,
    Closed,
    Cancelled,
}

impl ReservationState {
    /// Returns true while the request occupies the listing's calendar.
    ///
    /// Active requests participate in the overlap invariant.
    pub fn is_active(&self) -> bool {
        matches!(self, ReservationState::Requested | ReservationState::Accepted)
    }

    /// Returns true once the request has reached an end outcome.
    ///
    /// Settled requests are eligible for retention purging.
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            ReservationState::Rejected | ReservationState::Closed | ReservationState::Cancelled
        )
    }
}

impl StateMachine for ReservationState {
    fn can_transition_to(&self, target: &ReservationState) -> bool {
        use ReservationState::*;
        matches!(
            (self, target),
            (Requested, Accepted)
                | (Requested, Rejected)
                | (Requested, Cancelled)
                | (Accepted, Closing)
                | (Accepted, Closed)
                | (Accepted, Cancelled)
                | (Rejected, Cancelled)
                | (Closing, Closed)
        )
    }

    fn valid_transitions(&self) -> Vec<ReservationState> {
        use ReservationState::*;
        match self {
            Requested => vec![Accepted, Rejected, Cancelled],
            Accepted => vec![Closing, Closed, Cancelled],
            Rejected => vec![Cancelled],
            Closing => vec![Closed],
            Closed | Cancelled => vec![],
        }
    }
}

impl fmt::Display for ReservationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReservationState::Requested => "Requested",
            ReservationState::Accepted => "Accepted",
            ReservationState::Rejected => "Rejected",
            ReservationState::Closing => "Closing",
            ReservationState::Closed => "Closed",
            ReservationState::Cancelled => "Cancelled",
        };
        write!(f, "{}", s)
    }
}
