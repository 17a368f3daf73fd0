//! Command infrastructure for application services.
//!
//! This module provides the standard types for command processing:
//! - `CommandMetadata` - Context that flows through command processing
//!
//! Caller identity travels separately in the `Passport`; metadata carries
//! only the tracing and audit context that command services stamp onto
//! the events they emit.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Passport;

/// Metadata context for command services.
///
/// Carries tracing and correlation context through the command
/// processing pipeline. This should be passed to all command services
/// and propagated to emitted events.
///
/// # Example
///
/// ```ignore
/// let metadata = CommandMetadata::for_passport(&passport)
///     .with_correlation_id(request_id)
///     .with_source("api");
///
/// listing_commands.publish(listing_id, &passport, metadata).await?;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    /// Audit label of the caller (user id or "system").
    #[serde(skip_serializing_if = "Option::is_none")]
    actor: Option<String>,

    /// Links related operations across a single user request.
    /// Generated lazily if not provided.
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,

    /// Distributed tracing span/trace ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,

    /// Source of this command (e.g., "api", "scheduler").
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
}

impl CommandMetadata {
    /// Creates empty command metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates metadata with the actor label taken from a passport.
    pub fn for_passport(passport: &Passport) -> Self {
        Self {
            actor: Some(passport.actor_label()),
            correlation_id: None,
            trace_id: None,
            source: None,
        }
    }

    /// Builder: Set the actor label.
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Builder: Add correlation ID for request tracing.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Builder: Add trace ID for distributed tracing.
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Builder: Add source identifier.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the actor label if set.
    pub fn actor(&self) -> Option<&str> {
        self.actor.as_deref()
    }

    /// Returns the correlation ID, generating one if not set.
    ///
    /// This ensures every command has a correlation ID for tracing,
    /// even if the caller didn't provide one.
    pub fn correlation_id(&self) -> String {
        self.correlation_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }

    /// Returns the correlation ID only if explicitly set.
    pub fn correlation_id_opt(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    /// Returns the trace ID if set.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Returns the source if set.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

#[cfg(test)]
impl CommandMetadata {
    /// Creates a test fixture with a stable correlation ID.
    ///
    /// Only available in test builds.
    pub fn test_fixture() -> Self {
        Self::new()
            .with_actor("test-user-123")
            .with_correlation_id("test-correlation-id")
            .with_source("test")
    }
}
