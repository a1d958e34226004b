//! Endpoint and group identifiers.
//!
//! A `NodeId` addresses one vehicle endpoint in the mobility store and the
//! node pool; a `GroupId` addresses one rear → front traffic pair.  Both are
//! plain indices handed out densely from zero, so `index()` can address a
//! `Vec` directly.

use std::fmt;

/// One vehicle endpoint: radio plus mobility state.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "endpoint-{}", self.0)
    }
}

/// Zero-based traffic group.  Trace files and logs use the one-based
/// [`number`][GroupId::number].
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupId(pub u8);

impl GroupId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// `group-1.txt`, `group-2.txt`.
    #[inline]
    pub fn number(self) -> u32 {
        u32::from(self.0) + 1
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group-{}", self.number())
    }
}
