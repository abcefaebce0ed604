//! Compact ids for mesh cells and partition ranks.

use core::fmt;
use core::num::NonZeroU32;

use crate::error::{RtError, RtResult};

/// 0-based index stored as `index + 1`, so `Option<Id>` costs no extra space.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Id(NonZeroU32);

impl Id {
    /// Id for a 0-based index. `u32::MAX` saturates onto `u32::MAX - 1`.
    pub fn from_index(index: u32) -> Self {
        Self(NonZeroU32::MIN.saturating_add(index))
    }

    /// Id for a position in a mesh-sized field.
    pub fn from_slot(slot: usize) -> RtResult<Self> {
        u32::try_from(slot)
            .ok()
            .filter(|&i| i < u32::MAX)
            .map(Self::from_index)
            .ok_or(RtError::TooManyCells { count: slot.saturating_add(1) })
    }

    pub fn index(self) -> u32 {
        self.0.get() - 1
    }

    /// Position in mesh-sized fields.
    pub fn slot(self) -> usize {
        self.index() as usize
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.index())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Mesh cell index (position in mesh-sized fields).
pub type CellId = Id;
/// Rank of a partition in a decomposed run.
pub type PartitionId = Id;
