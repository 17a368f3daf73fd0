//! State machine trait for status enums.
//!
//! Provides a consistent interface for validating state transitions
//! across aggregate lifecycle states (ItemListing, ReservationRequest).

/// Trait for status enums that represent state machines.
///
/// Implementors define valid state transitions; terminal detection
/// comes for free.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for ReservationState {
///     fn can_transition_to(&self, target: &Self) -> bool {
///         matches!(
///             (self, target),
///             (Requested, Accepted) |
///             (Requested, Rejected) |
///             // ... etc
///         )
///     }
///
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             Requested => vec![Accepted, Rejected, Cancelled],
///             // ... etc
///         }
///     }
/// }
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
