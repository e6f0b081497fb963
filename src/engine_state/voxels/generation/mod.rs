//! # Terrain Generation
//!
//! Chunks are filled by a pipeline of generators applied in order. Each one sees
//! the writes of the generators before it and may read or write any cell of
//! the chunk it is given. The default pipeline lays ground strata, carves caves
//! out of the stone, then plants trees on exposed grass.
//!
//! Generators are pure functions of (seed, chunk coordinate), so a chunk that
//! is unloaded and loaded again comes back identical.

use cgmath::Point3;

use super::chunk::{BlockGrid, CHUNK_DIMENSION};

mod caves;
mod ground;
mod trees;

pub use caves::CaveGenerator;
pub use ground::GroundGenerator;
pub use trees::TreeGenerator;

/// One stage of the terrain pipeline.
pub trait TerrainGenerator: Send + Sync {
    fn name(&self) -> &'static str;

    /// Writes into `blocks`, the grid of the chunk at `chunk` (chunk coordinates).
    fn generate(&self, blocks: &mut BlockGrid, chunk: Point3<i32>);
}

/// Ground, then caves, then trees.
pub fn default_generators(seed: u32) -> Vec<Box<dyn TerrainGenerator>> {
    vec![
        Box::new(GroundGenerator::new(seed)),
        Box::new(CaveGenerator::new(seed)),
        Box::new(TreeGenerator::new(seed)),
    ]
}

/// World block coordinate of cell `local` (0..16) along one axis of chunk `chunk`.
pub(crate) fn world_coordinate(chunk: i32, local: i32) -> i32 {
    chunk * CHUNK_DIMENSION + local
}

#[cfg(test)]
mod tests {
    use cgmath::Vector3;

    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;

    fn generate(seed: u32, chunk: Point3<i32>) -> BlockGrid {
        let mut blocks = BlockGrid::empty();
        for generator in default_generators(seed) {
            generator.generate(&mut blocks, chunk);
        }
        blocks
    }

    #[test]
    fn pipeline_is_deterministic() {
        for chunk in [Point3::new(0, 0, 0), Point3::new(-3, 0, 2), Point3::new(5, -1, -7)] {
            assert_eq!(generate(7, chunk), generate(7, chunk));
        }
    }

    #[test]
    fn deep_chunks_are_mostly_stone() {
        let blocks = generate(1, Point3::new(0, -3, 0));
        let stone = blocks
            .as_slice()
            .iter()
            .filter(|&&id| id == BlockType::STONE.id())
            .count();
        assert!(stone > blocks.as_slice().len() / 2, "only {stone} stone blocks");
    }

    #[test]
    fn sky_chunks_are_empty() {
        let blocks = generate(1, Point3::new(0, 6, 0));
        assert_eq!(blocks.count_non_air(), 0);
        assert_eq!(blocks.get(Vector3::new(0, 0, 0)), BlockType::AIR.id());
    }
}
