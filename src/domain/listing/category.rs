//! Category value object for item listings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Closed set of listing categories used for search and browsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Tools,
    Electronics,
    Household,
    Outdoors,
    Sports,
    Mobility,
    Books,
    Toys,
    Other,
}

impl Category {
    /// Returns the display label.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Tools => "Tools",
            Category::Electronics => "Electronics",
            Category::Household => "Household",
            Category::Outdoors => "Outdoors",
            Category::Sports => "Sports",
            Category::Mobility => "Mobility",
            Category::Books => "Books",
            Category::Toys => "Toys",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tools" => Ok(Category::Tools),
            "electronics" => Ok(Category::Electronics),
            "household" => Ok(Category::Household),
            "outdoors" => Ok(Category::Outdoors),
            "sports" => Ok(Category::Sports),
            "mobility" => Ok(Category::Mobility),
            "books" => Ok(Category::Books),
            "toys" => Ok(Category::Toys),
            "other" => Ok(Category::Other),
            _ => Err(ValidationError::invalid_format(
                "category",
                format!("unknown category '{}'", s),
            )),
        }
    }
}
