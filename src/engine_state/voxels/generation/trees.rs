use cgmath::{Point3, Vector3};

use crate::engine_state::voxels::{
    block::block_type::BlockType,
    chunk::{BlockGrid, CHUNK_DIMENSION},
};

use super::TerrainGenerator;

/// Chance that a grass-topped column grows a tree.
pub const TREE_CHANCE: f32 = 0.02;
pub const MIN_TRUNK_HEIGHT: i32 = 4;
pub const MAX_TRUNK_HEIGHT: i32 = 6;
/// Canopy layers above the top of the trunk.
const CANOPY_ABOVE: i32 = 1;

/// Grows trunk-and-canopy trees on the topmost grass block of some columns.
///
/// Trees that would not fit in the chunk vertically are not grown; canopy
/// cells that fall outside the chunk horizontally are dropped.
pub struct TreeGenerator {
    seed: u32,
}

impl TreeGenerator {
    pub fn new(seed: u32) -> Self {
        TreeGenerator { seed }
    }

    /// Per-chunk RNG, so regeneration reproduces the same trees.
    fn rng_for(&self, chunk: Point3<i32>) -> fastrand::Rng {
        let mut state = self.seed as u64;
        state ^= (chunk.x as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        state ^= (chunk.y as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
        state ^= (chunk.z as u64).wrapping_mul(0x1656_67B1_9E37_79F9);
        fastrand::Rng::with_seed(state)
    }

    fn topmost_solid(blocks: &BlockGrid, i: i32, k: i32) -> Option<i32> {
        (0..CHUNK_DIMENSION)
            .rev()
            .find(|&j| blocks.get(Vector3::new(i, j, k)) != BlockType::AIR.id())
    }

    fn grow(blocks: &mut BlockGrid, root: Vector3<i32>, trunk_height: i32) {
        let top = root.y + trunk_height;

        for y in (top - 2)..=(top + CANOPY_ABOVE) {
            let radius: i32 = if y > top { 1 } else { 2 };
            for dz in -radius..=radius {
                for dx in -radius..=radius {
                    // Trim the corners of the wide layers.
                    if radius == 2 && dx.abs() == 2 && dz.abs() == 2 {
                        continue;
                    }
                    let position = Vector3::new(root.x + dx, y, root.z + dz);
                    if blocks.get_checked(position) == Some(BlockType::AIR.id()) {
                        blocks.set(position, BlockType::LEAVES.id());
                    }
                }
            }
        }

        for y in (root.y + 1)..=top {
            blocks.set(Vector3::new(root.x, y, root.z), BlockType::WOOD.id());
        }
    }
}

impl TerrainGenerator for TreeGenerator {
    fn name(&self) -> &'static str {
        "trees"
    }

    fn generate(&self, blocks: &mut BlockGrid, chunk: Point3<i32>) {
        let mut rng = self.rng_for(chunk);

        for k in 0..CHUNK_DIMENSION {
            for i in 0..CHUNK_DIMENSION {
                // Draw for every column so one tree doesn't shift the others.
                let roll = rng.f32();
                let trunk_height = rng.i32(MIN_TRUNK_HEIGHT..=MAX_TRUNK_HEIGHT);

                let Some(j) = Self::topmost_solid(blocks, i, k) else {
                    continue;
                };
                let root = Vector3::new(i, j, k);
                if blocks.get(root) != BlockType::GRASS.id() || roll >= TREE_CHANCE {
                    continue;
                }
                if j + trunk_height + CANOPY_ABOVE >= CHUNK_DIMENSION {
                    continue;
                }

                Self::grow(blocks, root, trunk_height);
            }
        }
    }
}
