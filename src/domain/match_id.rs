//! Type-safe match identifier.
//!
//! [`MatchId`] is a newtype wrapper around `u64` providing type safety so
//! that match identifiers cannot be confused with other integers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a match (topic).
///
/// A non-negative integer assigned by the match-creation collaborator.
/// Used as the dictionary key in [`super::SubscriptionRegistry`] and as
/// the subscription target in client commands. No entity exists for a
/// match id with zero subscribers — it is only a key while at least one
/// connection references it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(u64);

impl MatchId {
    /// Creates a `MatchId` from a raw integer.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the inner integer value.
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for MatchId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<MatchId> for u64 {
    fn from(id: MatchId) -> Self {
        id.0
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn serde_is_transparent() {
        let id = MatchId::new(42);
        let json = serde_json::to_string(&id).unwrap_or_default();
        assert_eq!(json, "42");

        let back: Option<MatchId> = serde_json::from_str("42").ok();
        assert_eq!(back, Some(id));
    }

    #[test]
    fn display_is_plain_integer() {
        assert_eq!(format!("{}", MatchId::new(7)), "7");
    }

    #[test]
    fn hash_works_in_hashmap() {
        use std::collections::HashMap;
        let id = MatchId::new(1);
        let mut map = HashMap::new();
        map.insert(id, "test");
        assert_eq!(map.get(&id), Some(&"test"));
    }
}
