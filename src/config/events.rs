//! Event bus configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Ceiling on the per-handler delivery budget.
pub const MAX_DELIVERY_ATTEMPTS: u32 = 10;

/// Configuration for the domain event bus.
///
/// Controls the bounded asynchronous queue and the per-handler retry
/// policy. `max_attempts` counts total deliveries, so `3` means one
/// initial delivery plus two retries.
#[derive(Debug, Clone, Deserialize)]
pub struct EventsConfig {
    /// Capacity of the bounded asynchronous event queue
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Total delivery attempts per handler before the event is dropped;
    /// capped at [`MAX_DELIVERY_ATTEMPTS`]
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base delay of the exponential retry backoff, in milliseconds
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
}

fn default_channel_capacity() -> usize {
    256
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    50
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
            max_attempts: default_max_attempts(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
        }
    }
}

impl EventsConfig {
    /// Validate event bus configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.channel_capacity == 0 {
            return Err(ValidationError::InvalidChannelCapacity);
        }
        if self.max_attempts == 0 {
            return Err(ValidationError::InvalidRetryPolicy);
        }
        if self.max_attempts > MAX_DELIVERY_ATTEMPTS {
            return Err(ValidationError::RetryBudgetTooLarge);
        }
        Ok(())
    }
}
