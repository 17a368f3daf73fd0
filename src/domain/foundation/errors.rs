//! Error types for the domain layer.

use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i32,
        max: i32,
        actual: i32,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: i32, max: i32, actual: i32) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised by aggregate commands, repositories, and application services.
///
/// Each variant tells the caller something different about how to react:
/// `Concurrency` means reload and retry, `Authorization` means the caller
/// lacks the capability, `InvalidStateTransition` means nobody can do this
/// right now regardless of who asks.
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    #[error("Not authorized to {action} {aggregate} {id}")]
    Authorization {
        aggregate: &'static str,
        id: String,
        action: &'static str,
    },

    #[error("Cannot {action} {aggregate} {id} in state {state}")]
    InvalidStateTransition {
        aggregate: &'static str,
        id: String,
        state: String,
        action: &'static str,
    },

    #[error("{aggregate} {id} not found")]
    NotFound { aggregate: &'static str, id: String },

    #[error("Concurrent modification of {aggregate} {id}: expected version {expected}, found {actual}")]
    Concurrency {
        aggregate: &'static str,
        id: String,
        expected: u64,
        actual: u64,
    },

    #[error("Conflict: {reason}")]
    Conflict { reason: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Infrastructure failure: {reason}")]
    Infrastructure { reason: String },
}

impl DomainError {
    /// Creates an authorization error for a denied capability.
    pub fn authorization(
        aggregate: &'static str,
        id: impl ToString,
        action: &'static str,
    ) -> Self {
        DomainError::Authorization {
            aggregate,
            id: id.to_string(),
            action,
        }
    }

    /// Creates an invalid state transition error.
    pub fn invalid_transition(
        aggregate: &'static str,
        id: impl ToString,
        state: impl ToString,
        action: &'static str,
    ) -> Self {
        DomainError::InvalidStateTransition {
            aggregate,
            id: id.to_string(),
            state: state.to_string(),
            action,
        }
    }

    /// Creates a not found error.
    pub fn not_found(aggregate: &'static str, id: impl ToString) -> Self {
        DomainError::NotFound {
            aggregate,
            id: id.to_string(),
        }
    }

    /// Creates an optimistic concurrency error.
    pub fn concurrency(
        aggregate: &'static str,
        id: impl ToString,
        expected: u64,
        actual: u64,
    ) -> Self {
        DomainError::Concurrency {
            aggregate,
            id: id.to_string(),
            expected,
            actual,
        }
    }

    /// Creates a business rule conflict error.
    pub fn conflict(reason: impl Into<String>) -> Self {
        DomainError::Conflict { reason: reason.into() }
    }

    /// Creates an infrastructure error.
    pub fn infrastructure(reason: impl Into<String>) -> Self {
        DomainError::Infrastructure { reason: reason.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_empty_field_displays_correctly() {
        let err = ValidationError::empty_field("title");
        assert_eq!(format!("{}", err), "Field 'title' cannot be empty");
    }

    #[test]
    fn validation_error_out_of_range_displays_correctly() {
        let err = ValidationError::out_of_range("images", 0, 5, 7);
        assert_eq!(
            format!("{}", err),
            "Field 'images' must be between 0 and 5, got 7"
        );
    }

    #[test]
    fn validation_error_invalid_format_displays_correctly() {
        let err = ValidationError::invalid_format("image_uri", "unsupported scheme");
        assert_eq!(
            format!("{}", err),
            "Field 'image_uri' has invalid format: unsupported scheme"
        );
    }

    #[test]
    fn authorization_error_displays_action_and_target() {
        let err = DomainError::authorization("ItemListing", "abc", "publish");
        assert_eq!(format!("{}", err), "Not authorized to publish ItemListing abc");
    }

    #[test]
    fn invalid_transition_error_displays_state() {
        let err = DomainError::invalid_transition("ItemListing", "abc", "cancelled", "publish");
        assert_eq!(
            format!("{}", err),
            "Cannot publish ItemListing abc in state cancelled"
        );
    }

    #[test]
    fn concurrency_error_displays_versions() {
        let err = DomainError::concurrency("ReservationRequest", "r1", 3, 4);
        assert_eq!(
            format!("{}", err),
            "Concurrent modification of ReservationRequest r1: expected version 3, found 4"
        );
    }

    #[test]
    fn validation_error_converts_into_domain_error() {
        let err: DomainError = ValidationError::empty_field("title").into();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
