//! `NodeId`: a strong, zero-cost handle for nodes in a nodeset.
//!
//! Every node is identified by a non-negative integer that is unique within
//! its nodeset. Unlike mesh entity handles that reserve 0 as a sentinel,
//! node identifiers start at 0 because automatic allocation hands out the
//! smallest unused identifier and stores may legitimately begin empty.
//!
//! This module provides:
//! - A transparent `NodeId` newtype around `u64` for zero-cost layout
//!   guarantees.
//! - Implementations of common traits (`Debug`, `Display`, ordering,
//!   hashing, serde) so `NodeId` can be used in maps, sets, and printed
//!   easily.

use std::fmt;

/// Identifier of a node within a nodeset.
///
/// # Memory layout
/// This type is `repr(transparent)`: it has the same ABI and alignment as a
/// plain `u64`.
#[derive(
    Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct NodeId(u64);

impl NodeId {
    /// Creates a new `NodeId` from a raw `u64` value.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        NodeId(raw)
    }

    /// Returns the inner `u64` value of this `NodeId`.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for NodeId {
    #[inline]
    fn from(raw: u64) -> Self {
        NodeId(raw)
    }
}

/// Custom `Debug` implementation to display as `NodeId(raw_value)`.
impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeId").field(&self.0).finish()
    }
}

/// Prints the numeric identifier without any wrapper text.
impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
