//! # Block Side Module
//!
//! The six faces of a voxel block, with the geometry the mesher needs for each.

use cgmath::Vector3;

/// One of the six faces of a block.
///
/// The order is: [LEFT, RIGHT, BOTTOM, TOP, BACK, FRONT]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// Facing negative X
    LEFT = 0,

    /// Facing positive X
    RIGHT = 1,

    /// Facing negative Y
    BOTTOM = 2,

    /// Facing positive Y
    TOP = 3,

    /// Facing negative Z
    BACK = 4,

    /// Facing positive Z
    FRONT = 5,
}

/// Quad corners as (-0.5 | +0.5) offsets from the block center, listed so that
/// the index pattern of [`BlockSide::indices`] yields an outward normal.
const CORNERS: [[[f32; 3]; 4]; 6] = [
    // LEFT
    [
        [-0.5, -0.5, 0.5],
        [-0.5, -0.5, -0.5],
        [-0.5, 0.5, -0.5],
        [-0.5, 0.5, 0.5],
    ],
    // RIGHT
    [
        [0.5, -0.5, -0.5],
        [0.5, -0.5, 0.5],
        [0.5, 0.5, 0.5],
        [0.5, 0.5, -0.5],
    ],
    // BOTTOM
    [
        [-0.5, -0.5, -0.5],
        [0.5, -0.5, -0.5],
        [0.5, -0.5, 0.5],
        [-0.5, -0.5, 0.5],
    ],
    // TOP
    [
        [-0.5, 0.5, 0.5],
        [0.5, 0.5, 0.5],
        [0.5, 0.5, -0.5],
        [-0.5, 0.5, -0.5],
    ],
    // BACK
    [
        [-0.5, -0.5, -0.5],
        [0.5, -0.5, -0.5],
        [0.5, 0.5, -0.5],
        [-0.5, 0.5, -0.5],
    ],
    // FRONT
    [
        [0.5, -0.5, 0.5],
        [-0.5, -0.5, 0.5],
        [-0.5, 0.5, 0.5],
        [0.5, 0.5, 0.5],
    ],
];

/// Top and bottom faces wind one way.
const CAP_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];
/// The four side faces wind the other way.
const SIDE_INDICES: [u32; 6] = [0, 2, 1, 0, 3, 2];

impl BlockSide {
    /// All six faces in a consistent order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::LEFT,
            BlockSide::RIGHT,
            BlockSide::BOTTOM,
            BlockSide::TOP,
            BlockSide::BACK,
            BlockSide::FRONT,
        ]
    }

    /// Grid step from a block to the neighbour this face looks at.
    pub fn offset(self) -> Vector3<i32> {
        match self {
            BlockSide::LEFT => Vector3::new(-1, 0, 0),
            BlockSide::RIGHT => Vector3::new(1, 0, 0),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
            BlockSide::TOP => Vector3::new(0, 1, 0),
            BlockSide::BACK => Vector3::new(0, 0, -1),
            BlockSide::FRONT => Vector3::new(0, 0, 1),
        }
    }

    /// Outward unit normal.
    pub fn normal(self) -> Vector3<f32> {
        let offset = self.offset();
        Vector3::new(offset.x as f32, offset.y as f32, offset.z as f32)
    }

    /// Corner offsets from the block center.
    pub fn corners(self) -> [[f32; 3]; 4] {
        CORNERS[self as usize]
    }

    /// Local indices into [`BlockSide::corners`] for the face's two triangles.
    pub fn indices(self) -> [u32; 6] {
        match self {
            BlockSide::TOP | BlockSide::BOTTOM => CAP_INDICES,
            _ => SIDE_INDICES,
        }
    }
}
