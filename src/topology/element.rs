//! `ElementId`: a strong, zero-cost handle for elements in a mesh.
//!
//! Same identifier scheme as [`NodeId`](crate::topology::node::NodeId):
//! non-negative, unique within a mesh, automatic allocation picks the
//! smallest unused value.

use std::fmt;

/// Identifier of an element within a mesh.
#[derive(
    Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct ElementId(u64);

impl ElementId {
    /// Creates a new `ElementId` from a raw `u64` value.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        ElementId(raw)
    }

    /// Returns the inner `u64` value of this `ElementId`.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for ElementId {
    #[inline]
    fn from(raw: u64) -> Self {
        ElementId(raw)
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ElementId").field(&self.0).finish()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
