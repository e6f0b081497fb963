use cgmath::Vector3;

use crate::engine_state::{
    rendering::Vertex,
    voxels::block::{block_side::BlockSide, BlockTypeSize},
};

/// Texture coordinates of the four quad corners.
const FACE_UVS: [[f32; 2]; 4] = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

/// A single visible quad of one block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// Block position in chunk coordinates
    pub position: Vector3<i32>,
    pub block_type: BlockTypeSize,
    pub block_side: BlockSide,
}

impl Face {
    pub fn new(position: Vector3<i32>, block_type: BlockTypeSize, block_side: BlockSide) -> Self {
        Face {
            position,
            block_type,
            block_side,
        }
    }

    /// The quad's four vertices, centered on the block's position.
    pub fn vertices(&self) -> [Vertex; 4] {
        let center = [
            self.position.x as f32,
            self.position.y as f32,
            self.position.z as f32,
        ];
        let normal = self.block_side.normal();
        let normal = [normal.x, normal.y, normal.z];
        let corners = self.block_side.corners();

        std::array::from_fn(|i| {
            Vertex::new(
                [
                    center[0] + corners[i][0],
                    center[1] + corners[i][1],
                    center[2] + corners[i][2],
                ],
                normal,
                FACE_UVS[i],
                self.block_type as u32,
            )
        })
    }

    /// The quad's six indices, offset by `base` (the index of its first vertex).
    pub fn indices(&self, base: u32) -> [u32; 6] {
        self.block_side.indices().map(|index| index + base)
    }
}
