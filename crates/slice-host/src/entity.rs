//! Host entity identifiers.
//!
//! An [`EntityId`] is the 32-bit handle the game client assigns to a live
//! object. Handles are unique among live objects only: the client recycles
//! them after despawn, so an id alone cannot tell two successive objects
//! apart.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// EntityId
// ---------------------------------------------------------------------------

/// A host-assigned entity handle.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Sentinel the client uses for objects that have no entity id.
    pub const INVALID: EntityId = EntityId(0xE000_0000);

    /// Wrap a raw handle.
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw `u32` representation.
    #[inline]
    pub fn to_raw(self) -> u32 {
        self.0
    }

    /// Whether this is the "no entity" sentinel.
    #[inline]
    pub fn is_invalid(self) -> bool {
        self == Self::INVALID
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({:X})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:X}", self.0)
    }
}

impl From<u32> for EntityId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_round_trip() {
        let id = EntityId::new(0x4000_12AB);
        assert_eq!(id.to_raw(), 0x4000_12AB);
        assert_eq!(EntityId::from(0x4000_12AB), id);
    }

    #[test]
    fn display_is_uppercase_hex() {
        let id = EntityId::new(0x4000_12ab);
        assert_eq!(format!("{id}"), "400012AB");
        assert_eq!(format!("{id:?}"), "EntityId(400012AB)");
    }

    #[test]
    fn invalid_sentinel() {
        assert!(EntityId::INVALID.is_invalid());
        assert!(!EntityId::new(1).is_invalid());
    }
}
