//! Listing configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::listing::MAX_IMAGES;

/// Deploy-facing listing limits.
///
/// `max_images` may lower the image limit below the domain cap but
/// never raise it; `validate()` enforces the bound.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingsConfig {
    /// Maximum photos allowed per listing
    #[serde(default = "default_max_images")]
    pub max_images: usize,
}

fn default_max_images() -> usize {
    MAX_IMAGES
}

impl Default for ListingsConfig {
    fn default() -> Self {
        Self {
            max_images: default_max_images(),
        }
    }
}

impl ListingsConfig {
    /// Validate listing configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_images == 0 {
            return Err(ValidationError::InvalidImageLimit);
        }
        if self.max_images > MAX_IMAGES {
            return Err(ValidationError::ImageLimitTooLarge);
        }
        Ok(())
    }
}
