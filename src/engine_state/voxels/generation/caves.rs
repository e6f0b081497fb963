use cgmath::{Point3, Vector3};
use noise::{NoiseFn, Perlin};

use crate::engine_state::voxels::{
    block::block_type::BlockType,
    chunk::{BlockGrid, CHUNK_DIMENSION},
};

use super::{world_coordinate, TerrainGenerator};

/// Scaling applied to world coordinates when sampling the cave noise.
pub const CAVE_SCALE: f64 = 0.05;
/// Stone whose noise sample falls strictly inside this band becomes air.
pub const CAVE_NEGATIVE_THRESHOLD: f64 = -0.08;
pub const CAVE_POSITIVE_THRESHOLD: f64 = 0.08;

/// Carves winding tunnels out of stone with a band of 3D Perlin noise.
///
/// Only stone is carved, so caves never break through the grass and dirt
/// layers.
pub struct CaveGenerator {
    noise: Perlin,
}

impl CaveGenerator {
    pub fn new(seed: u32) -> Self {
        CaveGenerator {
            noise: Perlin::new(seed.wrapping_add(3)),
        }
    }

    pub fn is_cave(&self, x: i32, y: i32, z: i32) -> bool {
        let sample = self.noise.get([
            x as f64 * CAVE_SCALE,
            y as f64 * CAVE_SCALE,
            z as f64 * CAVE_SCALE,
        ]);
        sample > CAVE_NEGATIVE_THRESHOLD && sample < CAVE_POSITIVE_THRESHOLD
    }
}

impl TerrainGenerator for CaveGenerator {
    fn name(&self) -> &'static str {
        "caves"
    }

    fn generate(&self, blocks: &mut BlockGrid, chunk: Point3<i32>) {
        for k in 0..CHUNK_DIMENSION {
            for j in 0..CHUNK_DIMENSION {
                for i in 0..CHUNK_DIMENSION {
                    let position = Vector3::new(i, j, k);
                    if blocks.get(position) != BlockType::STONE.id() {
                        continue;
                    }
                    if self.is_cave(
                        world_coordinate(chunk.x, i),
                        world_coordinate(chunk.y, j),
                        world_coordinate(chunk.z, k),
                    ) {
                        blocks.set(position, BlockType::AIR.id());
                    }
                }
            }
        }
    }
}
