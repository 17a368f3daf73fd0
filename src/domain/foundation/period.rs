//! Period value object for bounded time ranges.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Timestamp, ValidationError};

/// A bounded time range with an inclusive start and exclusive end.
///
/// Used for listing sharing windows and reservation spans.
/// Invariant: `end` is strictly after `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    start: Timestamp,
    end: Timestamp,
}

impl Period {
    /// Creates a new Period, returning error if end is not after start.
    pub fn try_new(start: Timestamp, end: Timestamp) -> Result<Self, ValidationError> {
        if !end.is_after(&start) {
            return Err(ValidationError::invalid_format(
                "period",
                "end must be after start",
            ));
        }
        Ok(Self { start, end })
    }

    /// Returns the start of the period.
    pub fn start(&self) -> &Timestamp {
        &self.start
    }

    /// Returns the end of the period.
    pub fn end(&self) -> &Timestamp {
        &self.end
    }

    /// Checks whether two periods share any instant.
    ///
    /// Half-open semantics: a period ending exactly when another
    /// starts does not overlap it.
    pub fn overlaps(&self, other: &Period) -> bool {
        self.start.is_before(&other.end) && other.start.is_before(&self.end)
    }

    /// Checks whether the other period lies entirely within this one.
    pub fn contains(&self, other: &Period) -> bool {
        !other.start.is_before(&self.start) && !other.end.is_after(&self.end)
    }

    /// Checks whether the period is entirely in the past.
    pub fn ended_before(&self, instant: &Timestamp) -> bool {
        self.end.is_before(instant)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start.as_datetime().to_rfc3339(),
            self.end.as_datetime().to_rfc3339()
        )
    }
}
