//! # Block Type Module
//!
//! The built-in block types. The numeric value of each variant is the block id
//! stored in chunk grids and resolved through the
//! [`BlockRegistry`](super::BlockRegistry).

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use super::BlockTypeSize;

/// Enumerates the built-in block types.
///
/// `FromPrimitive` lets ids read back from a grid be turned into a type again.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// Empty space. Non-solid and never meshed.
    AIR = 0,

    /// Sub-surface soil laid below the grass layer.
    DIRT = 1,

    /// Top layer of the ground strata; trees only grow on it.
    GRASS = 2,

    /// Everything deeper than the dirt layer.
    STONE = 3,

    /// Tree trunks.
    WOOD = 4,

    /// Tree canopies.
    LEAVES = 5,
}

impl BlockType {
    /// Number of built-in block types.
    pub const COUNT: usize = 6;

    /// Resolves a stored id back to a built-in type, `None` for foreign ids.
    pub fn from_id(id: BlockTypeSize) -> Option<Self> {
        FromPrimitive::from_u8(id)
    }

    pub fn id(self) -> BlockTypeSize {
        self as BlockTypeSize
    }
}
