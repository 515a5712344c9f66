//! Strongly-typed identifier for persisted override records.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Backend primary key of a permission override (`id_override`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct OverrideId(pub i64);

impl OverrideId {
    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }
}

impl fmt::Debug for OverrideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OverrideId({})", self.0)
    }
}

impl fmt::Display for OverrideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for OverrideId {
    #[inline]
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::str::FromStr for OverrideId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

// Some backends send numeric keys as strings.
impl<'de> Deserialize<'de> for OverrideId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        crate::serde::deserialize_i64_or_string(deserializer).map(Self)
    }
}
