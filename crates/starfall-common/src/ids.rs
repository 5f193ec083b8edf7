//! ID types for actors and spawned objects.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for actor IDs.
static ACTOR_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for an actor in the play field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(u64);

impl ActorId {
    /// Creates a new unique actor ID.
    #[must_use]
    pub fn new() -> Self {
        Self(ACTOR_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Creates an actor ID from a raw value (for deserialization).
    #[must_use]
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Null/invalid actor ID.
    pub const NULL: Self = Self(0);

    /// Checks if this is a valid (non-null) actor ID.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_ids_unique() {
        let a = ActorId::new();
        let b = ActorId::new();
        assert_ne!(a, b);
        assert!(a.is_valid());
    }

    #[test]
    fn test_null_id_invalid() {
        assert!(!ActorId::NULL.is_valid());
        assert_eq!(ActorId::from_raw(0), ActorId::NULL);
    }
}
