//! ImageUri value object for listing photos.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Maximum number of images per listing.
pub const MAX_IMAGES: usize = 5;

/// URI of a listing photo stored in external blob storage.
///
/// The domain only keeps validated references; upload and serving
/// are handled outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageUri(String);

impl ImageUri {
    /// Creates a new ImageUri, returning error if empty or not http(s).
    pub fn try_new(uri: impl Into<String>) -> Result<Self, ValidationError> {
        let uri = uri.into();
        if uri.trim().is_empty() {
            return Err(ValidationError::empty_field("image_uri"));
        }
        if !uri.starts_with("https://") && !uri.starts_with("http://") {
            return Err(ValidationError::invalid_format(
                "image_uri",
                "must use http or https scheme",
            ));
        }
        Ok(Self(uri))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validates an image list against the per-listing limit.
pub fn validate_images(images: &[ImageUri]) -> Result<(), ValidationError> {
    if images.len() > MAX_IMAGES {
        return Err(ValidationError::out_of_range(
            "images",
            0,
            MAX_IMAGES as i32,
            images.len() as i32,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_https_uri() {
        let uri = ImageUri::try_new("https://images.example.com/drill.jpg").unwrap();
        assert_eq!(uri.as_str(), "https://images.example.com/drill.jpg");
    }

    #[test]
    fn rejects_empty_uri() {
        assert!(ImageUri::try_new("").is_err());
        assert!(ImageUri::try_new("   ").is_err());
    }

    #[test]
    fn rejects_non_http_scheme() {
        assert!(ImageUri::try_new("ftp://example.com/a.jpg").is_err());
        assert!(ImageUri::try_new("not-a-uri").is_err());
    }

    #[test]
    fn validate_images_accepts_up_to_limit() {
        let images: Vec<ImageUri> = (0..MAX_IMAGES)
            .map(|i| ImageUri::try_new(format!("https://img.example.com/{}.jpg", i)).unwrap())
            .collect();
        assert!(validate_images(&images).is_ok());
    }

    #[test]
    fn validate_images_rejects_over_limit() {
        let images: Vec<ImageUri> = (0..=MAX_IMAGES)
            .map(|i| ImageUri::try_new(format!("https://img.example.com/{}.jpg", i)).unwrap())
            .collect();
        let result = validate_images(&images);
        assert!(result.is_err());
    }
}
