//! # Meshing
//!
//! Converts a chunk's block grid into renderable quads. Every visible face of a
//! solid block becomes four vertices and six indices; faces between two solid
//! blocks are culled. Top and bottom faces wind one way, the four side faces
//! the other, so all normals point outwards.

mod face;
mod mesh;

pub use face::Face;
pub use mesh::ChunkMesh;
