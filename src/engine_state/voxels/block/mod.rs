//! # Block Module
//!
//! Block ids, block faces, and the registry that resolves an id to what the
//! simulation needs to know about it.

use block_type::BlockType;
use log::warn;

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to store block ids in a chunk grid.
pub type BlockTypeSize = u8;

/// What the core knows about a block id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockDefinition {
    pub name: &'static str,
    /// Solid blocks are meshed, hide their neighbours' faces and collide.
    pub solid: bool,
    /// Atlas index per face, in [`BlockSide::all`](block_side::BlockSide::all) order.
    pub texture_indices: [u32; 6],
}

/// Returned for ids nobody registered.
pub static UNKNOWN_BLOCK: BlockDefinition = BlockDefinition {
    name: "unknown",
    solid: false,
    texture_indices: [0; 6],
};

/// Built-in definitions, indexed by [`BlockType`] id.
///
/// Face order: [Left, Right, Bottom, Top, Back, Front]
pub static BUILTIN_BLOCKS: [BlockDefinition; BlockType::COUNT] = [
    BlockDefinition {
        name: "air",
        solid: false,
        texture_indices: [0; 6],
    },
    BlockDefinition {
        name: "dirt",
        solid: true,
        texture_indices: [1; 6],
    },
    BlockDefinition {
        name: "grass",
        // top: 3, bottom: dirt, sides: 2
        solid: true,
        texture_indices: [2, 2, 1, 3, 2, 2],
    },
    BlockDefinition {
        name: "stone",
        solid: true,
        texture_indices: [5; 6],
    },
    BlockDefinition {
        name: "wood",
        solid: true,
        texture_indices: [0; 6],
    },
    BlockDefinition {
        name: "leaves",
        solid: true,
        texture_indices: [6; 6],
    },
];

/// Id-indexed lookup table of block definitions.
///
/// Starts out with the built-in blocks; games may register more ids after them.
#[derive(Debug, Clone)]
pub struct BlockRegistry {
    definitions: Vec<BlockDefinition>,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        BlockRegistry {
            definitions: BUILTIN_BLOCKS.to_vec(),
        }
    }
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a definition under the next free id and returns that id, or `None`
    /// when the id space is exhausted.
    pub fn register(&mut self, definition: BlockDefinition) -> Option<BlockTypeSize> {
        let id = BlockTypeSize::try_from(self.definitions.len()).ok()?;
        self.definitions.push(definition);
        Some(id)
    }

    pub fn get(&self, id: BlockTypeSize) -> Option<&BlockDefinition> {
        self.definitions.get(id as usize)
    }

    /// Resolves `id`. Unknown ids log a warning and resolve to a non-solid
    /// placeholder.
    pub fn id_to_block(&self, id: BlockTypeSize) -> &BlockDefinition {
        self.get(id).unwrap_or_else(|| {
            warn!("unknown block id {id}, treating it as non-solid");
            &UNKNOWN_BLOCK
        })
    }

    /// Hot-path solidity check used by meshing; unknown ids are quietly non-solid.
    pub fn is_solid(&self, id: BlockTypeSize) -> bool {
        self.get(id).is_some_and(|definition| definition.solid)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
