//! Validated region codes.

use super::RegionError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Provider region code such as `us-ashburn-1`.
///
/// A code is two or more lowercase alphabetic segments followed by a numeric
/// segment, all joined with `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegionId(String);

impl RegionId {
    /// Parses and validates a region code.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::InvalidRegion`] when the code is malformed.
    pub fn new(value: impl AsRef<str>) -> Result<Self, RegionError> {
        let trimmed = value.as_ref().trim();
        if is_region_code(trimmed) {
            Ok(Self(trimmed.to_owned()))
        } else {
            Err(RegionError::InvalidRegion(value.as_ref().to_owned()))
        }
    }

    /// Returns the region code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_region_code(candidate: &str) -> bool {
    let segments: Vec<&str> = candidate.split('-').collect();
    let Some((last, names)) = segments.split_last() else {
        return false;
    };
    if names.len() < 2 {
        return false;
    }
    let numeric = !last.is_empty() && last.chars().all(|character| character.is_ascii_digit());
    let alphabetic = names.iter().all(|segment| {
        !segment.is_empty() && segment.chars().all(|character| character.is_ascii_lowercase())
    });
    numeric && alphabetic
}

impl TryFrom<String> for RegionId {
    type Error = RegionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RegionId> for String {
    fn from(value: RegionId) -> Self {
        value.0
    }
}

impl AsRef<str> for RegionId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
