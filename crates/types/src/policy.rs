//! Token update policy controlling when cached arguments are refreshed.

use std::error::Error;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Controls which template edits trigger a refresh of dependent messages'
/// cached arguments.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum UpdatePolicy {
    /// Refresh when tokens were added to the template text.
    #[serde(rename = "update_when_added")]
    WhenAdded,
    /// Refresh when tokens were removed from the template text.
    #[serde(rename = "update_when_removed")]
    WhenRemoved,
    /// Refresh on any token-set change, added or removed.
    #[default]
    #[serde(rename = "update_when_item")]
    WhenItem,
}

impl UpdatePolicy {
    /// Canonical string form, matching the persisted settings value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WhenAdded => "update_when_added",
            Self::WhenRemoved => "update_when_removed",
            Self::WhenItem => "update_when_item",
        }
    }
}

impl fmt::Display for UpdatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpdatePolicy {
    type Err = ParseUpdatePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "update_when_added" => Ok(Self::WhenAdded),
            "update_when_removed" => Ok(Self::WhenRemoved),
            "update_when_item" => Ok(Self::WhenItem),
            _ => Err(ParseUpdatePolicyError),
        }
    }
}

/// Error returned when a settings value does not name a known policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseUpdatePolicyError;

impl fmt::Display for ParseUpdatePolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid update policy; expected 'update_when_added', 'update_when_removed', or 'update_when_item'")
    }
}

impl Error for ParseUpdatePolicyError {}
