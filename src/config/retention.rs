//! Retention configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Configuration for the reservation retention sweep.
#[derive(Debug, Clone, Deserialize)]
pub struct RetentionConfig {
    /// Days a settled reservation request is kept after its last update
    /// before the retention sweep removes it
    #[serde(default = "default_purge_after_days")]
    pub purge_after_days: i64,
}

fn default_purge_after_days() -> i64 {
    // Roughly six months
    183
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            purge_after_days: default_purge_after_days(),
        }
    }
}

impl RetentionConfig {
    /// Validate retention configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.purge_after_days < 1 {
            return Err(ValidationError::InvalidRetentionWindow);
        }
        Ok(())
    }
}
