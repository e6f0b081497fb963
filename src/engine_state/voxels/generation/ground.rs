use cgmath::{Point3, Vector3};
use noise::{NoiseFn, Perlin};

use crate::engine_state::voxels::{
    block::block_type::BlockType,
    chunk::{BlockGrid, CHUNK_DIMENSION},
};

use super::{world_coordinate, TerrainGenerator};

/// World height the terrain undulates around.
pub const GROUND_LEVEL: f64 = 4.0;
/// Amplitude of the base heightfield.
pub const BASE_AMPLITUDE: f64 = 6.0;
pub const BASE_SCALE: f64 = 0.01;
/// Amplitude of the hill octave at full hilliness.
pub const HILL_AMPLITUDE: f64 = 18.0;
pub const HILL_SCALE: f64 = 0.04;
pub const HILLINESS_SCALE: f64 = 0.004;
/// Hilliness below this keeps the terrain flat.
pub const HILLINESS_THRESHOLD: f64 = 0.2;
/// Dirt layers between the grass and the stone.
pub const DIRT_DEPTH: i32 = 3;

/// Lays grass, dirt and stone under a 2D noise heightfield.
///
/// A second, low-frequency noise ("hilliness") decides per column whether a
/// hill octave is blended into the base height.
pub struct GroundGenerator {
    base: Perlin,
    hills: Perlin,
    hilliness: Perlin,
}

impl GroundGenerator {
    pub fn new(seed: u32) -> Self {
        GroundGenerator {
            base: Perlin::new(seed),
            hills: Perlin::new(seed.wrapping_add(1)),
            hilliness: Perlin::new(seed.wrapping_add(2)),
        }
    }

    /// Surface height of the column at world block (x, z).
    pub fn height_at(&self, x: i32, z: i32) -> i32 {
        let (x, z) = (x as f64, z as f64);
        let mut height = GROUND_LEVEL + self.base.get([x * BASE_SCALE, z * BASE_SCALE]) * BASE_AMPLITUDE;

        let hilliness = self.hilliness.get([x * HILLINESS_SCALE, z * HILLINESS_SCALE]);
        if hilliness > HILLINESS_THRESHOLD {
            let blend = (hilliness - HILLINESS_THRESHOLD) / (1.0 - HILLINESS_THRESHOLD);
            let hill = self.hills.get([x * HILL_SCALE, z * HILL_SCALE]).abs();
            height += hill * HILL_AMPLITUDE * blend;
        }

        height.floor() as i32
    }
}

impl TerrainGenerator for GroundGenerator {
    fn name(&self) -> &'static str {
        "ground"
    }

    fn generate(&self, blocks: &mut BlockGrid, chunk: Point3<i32>) {
        for k in 0..CHUNK_DIMENSION {
            for i in 0..CHUNK_DIMENSION {
                let height = self.height_at(
                    world_coordinate(chunk.x, i),
                    world_coordinate(chunk.z, k),
                );

                for j in 0..CHUNK_DIMENSION {
                    let y = world_coordinate(chunk.y, j);
                    let block_type = if y > height {
                        continue;
                    } else if y == height {
                        BlockType::GRASS
                    } else if y >= height - DIRT_DEPTH {
                        BlockType::DIRT
                    } else {
                        BlockType::STONE
                    };
                    blocks.set(Vector3::new(i, j, k), block_type.id());
                }
            }
        }
    }
}
