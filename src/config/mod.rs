//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `LEND_CIRCLE_` prefix and nested values use underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use lend_circle::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Purging settled requests after {} days", config.retention.purge_after_days);
//! ```

mod error;
mod events;
mod listings;
mod retention;

pub use error::{ConfigError, ValidationError};
pub use events::{EventsConfig, MAX_DELIVERY_ATTEMPTS};
pub use listings::ListingsConfig;
pub use retention::RetentionConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Contains all configuration sections for the lending marketplace.
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Event delivery configuration (channel capacity, retry policy)
    #[serde(default)]
    pub events: EventsConfig,

    /// Retention configuration (settled request purge window)
    #[serde(default)]
    pub retention: RetentionConfig,

    /// Listing limits
    #[serde(default)]
    pub listings: ListingsConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `LEND_CIRCLE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// Every section carries defaults, so an empty environment yields a
    /// working configuration.
    ///
    /// # Environment Variable Format
    ///
    /// - `LEND_CIRCLE__EVENTS__CHANNEL_CAPACITY=512` -> `events.channel_capacity = 512`
    /// - `LEND_CIRCLE__RETENTION__PURGE_AFTER_DAYS=90` -> `retention.purge_after_days = 90`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("LEND_CIRCLE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Performs semantic validation of configuration:
    /// - Channel capacity and retry attempt floors
    /// - Retention window floor
    /// - Image limit bounds
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.events.validate()?;
        self.retention.validate()?;
        self.listings.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Helper to clear environment variables after testing
    fn clear_env() {
        env::remove_var("LEND_CIRCLE__EVENTS__CHANNEL_CAPACITY");
        env::remove_var("LEND_CIRCLE__EVENTS__MAX_ATTEMPTS");
        env::remove_var("LEND_CIRCLE__EVENTS__RETRY_BASE_DELAY_MS");
        env::remove_var("LEND_CIRCLE__RETENTION__PURGE_AFTER_DAYS");
        env::remove_var("LEND_CIRCLE__LISTINGS__MAX_IMAGES");
    }

    #[test]
    fn test_load_with_empty_environment_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.events.channel_capacity, 256);
        assert_eq!(config.events.max_attempts, 3);
        assert_eq!(config.retention.purge_after_days, 183);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("LEND_CIRCLE__EVENTS__CHANNEL_CAPACITY", "64");
        env::set_var("LEND_CIRCLE__RETENTION__PURGE_AFTER_DAYS", "90");
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.events.channel_capacity, 64);
        assert_eq!(config.retention.purge_after_days, 90);
    }

    #[test]
    fn test_custom_image_limit() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("LEND_CIRCLE__LISTINGS__MAX_IMAGES", "3");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.listings.max_images, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_values() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("LEND_CIRCLE__RETENTION__PURGE_AFTER_DAYS", "0");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidRetentionWindow)
        ));
    }
}
