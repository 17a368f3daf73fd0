//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Event channel capacity must be at least 1")]
    InvalidChannelCapacity,

    #[error("Handler delivery attempts must be at least 1")]
    InvalidRetryPolicy,

    #[error("Handler delivery attempts exceed maximum allowed (10)")]
    RetryBudgetTooLarge,

    #[error("Retention window must be at least one day")]
    InvalidRetentionWindow,

    #[error("Image limit must be at least 1")]
    InvalidImageLimit,

    #[error("Image limit exceeds maximum allowed (5)")]
    ImageLimitTooLarge,
}
