use cgmath::Vector3;

use crate::engine_state::voxels::block::{block_type::BlockType, BlockTypeSize};

use super::{CHUNK_DIMENSION, CHUNK_PLANE_SIZE, CHUNK_SIZE};

/// The 16×16×16 block ids of one chunk.
///
/// Stored flat in x, then y, then z order: `index = x + 16y + 256z`.
#[derive(Clone, PartialEq, Eq)]
pub struct BlockGrid {
    blocks: Box<[BlockTypeSize]>,
}

impl std::fmt::Debug for BlockGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockGrid")
            .field("non_air", &self.count_non_air())
            .finish()
    }
}

impl Default for BlockGrid {
    fn default() -> Self {
        Self::empty()
    }
}

impl BlockGrid {
    /// A grid of air.
    pub fn empty() -> Self {
        BlockGrid {
            blocks: vec![BlockType::AIR.id(); CHUNK_SIZE as usize].into_boxed_slice(),
        }
    }

    pub fn in_bounds(position: Vector3<i32>) -> bool {
        (0..CHUNK_DIMENSION).contains(&position.x)
            && (0..CHUNK_DIMENSION).contains(&position.y)
            && (0..CHUNK_DIMENSION).contains(&position.z)
    }

    fn index(position: Vector3<i32>) -> usize {
        (position.x + position.y * CHUNK_DIMENSION + position.z * CHUNK_PLANE_SIZE) as usize
    }

    /// Block id at `position`.
    ///
    /// # Panics
    /// If `position` is outside the chunk. Use [`BlockGrid::get_checked`] for
    /// neighbour lookups that may leave it.
    pub fn get(&self, position: Vector3<i32>) -> BlockTypeSize {
        assert!(Self::in_bounds(position), "{position:?} is outside the chunk");
        self.blocks[Self::index(position)]
    }

    pub fn get_checked(&self, position: Vector3<i32>) -> Option<BlockTypeSize> {
        Self::in_bounds(position).then(|| self.blocks[Self::index(position)])
    }

    /// Writes `block_type` at `position`; positions outside the chunk are
    /// ignored and reported as `false`.
    pub fn set(&mut self, position: Vector3<i32>, block_type: BlockTypeSize) -> bool {
        if !Self::in_bounds(position) {
            return false;
        }
        self.blocks[Self::index(position)] = block_type;
        true
    }

    pub fn fill(&mut self, block_type: BlockTypeSize) {
        self.blocks.fill(block_type);
    }

    pub fn count_non_air(&self) -> usize {
        self.blocks
            .iter()
            .filter(|&&id| id != BlockType::AIR.id())
            .count()
    }

    pub fn as_slice(&self) -> &[BlockTypeSize] {
        &self.blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get() {
        let mut grid = BlockGrid::empty();
        assert!(grid.set(Vector3::new(1, 2, 3), BlockType::DIRT.id()));
        assert_eq!(grid.get(Vector3::new(1, 2, 3)), BlockType::DIRT.id());
        assert_eq!(grid.as_slice()[1 + 2 * 16 + 3 * 256], BlockType::DIRT.id());
        assert_eq!(grid.count_non_air(), 1);
    }

    #[test]
    fn out_of_bounds_is_ignored() {
        let mut grid = BlockGrid::empty();
        assert!(!grid.set(Vector3::new(16, 0, 0), BlockType::DIRT.id()));
        assert!(!grid.set(Vector3::new(0, -1, 0), BlockType::DIRT.id()));
        assert_eq!(grid.get_checked(Vector3::new(0, 0, 16)), None);
        assert_eq!(grid.count_non_air(), 0);
    }
}
