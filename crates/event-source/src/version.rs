use serde::{Deserialize, Serialize};

/// Aggregate version number.
///
/// Starts at 0 for an aggregate with no history; the first recorded event
/// carries version 1. An aggregate's version is always its committed version
/// plus the number of pending changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version(i64);

impl Version {
    /// Creates a version from a raw value.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Version of an aggregate with no events.
    pub fn initial() -> Self {
        Self(0)
    }

    /// Version carried by the first event of an aggregate.
    pub fn first() -> Self {
        Self(1)
    }

    /// Returns the next version.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the raw value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::initial()
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Version {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Version> for i64 {
    fn from(version: Version) -> Self {
        version.0
    }
}
