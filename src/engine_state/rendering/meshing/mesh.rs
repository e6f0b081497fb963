use cgmath::Vector3;

use crate::engine_state::{
    rendering::Vertex,
    voxels::{
        block::{block_side::BlockSide, BlockRegistry},
        chunk::{BlockGrid, CHUNK_DIMENSION},
    },
};

use super::face::Face;

/// Renderable geometry of one chunk, plus the blocks that produced it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    /// Solid blocks with at least one visible face, in chunk coordinates.
    pub exposed: Vec<Vector3<i32>>,
}

impl ChunkMesh {
    /// Meshes `blocks`: one quad per solid block face whose neighbour is not
    /// solid. Neighbours outside the chunk always count as open.
    ///
    /// This is a pure function of the grid, so re-meshing unchanged blocks
    /// gives the same buffers.
    pub fn build(blocks: &BlockGrid, registry: &BlockRegistry) -> Self {
        let mut mesh = ChunkMesh::default();

        for k in 0..CHUNK_DIMENSION {
            for j in 0..CHUNK_DIMENSION {
                for i in 0..CHUNK_DIMENSION {
                    let position = Vector3::new(i, j, k);
                    let block_type = blocks.get(position);
                    if !registry.is_solid(block_type) {
                        continue;
                    }

                    let mut exposed = false;
                    for side in BlockSide::all() {
                        let neighbour = blocks.get_checked(position + side.offset());
                        if neighbour.is_some_and(|id| registry.is_solid(id)) {
                            continue;
                        }
                        mesh.push_face(Face::new(position, block_type, side));
                        exposed = true;
                    }

                    if exposed {
                        mesh.exposed.push(position);
                    }
                }
            }
        }

        mesh
    }

    fn push_face(&mut self, face: Face) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&face.vertices());
        self.indices.extend_from_slice(&face.indices(base));
    }

    pub fn face_count(&self) -> usize {
        self.indices.len() / 6
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;

    #[test]
    fn single_block_emits_six_faces() {
        let mut blocks = BlockGrid::empty();
        blocks.set(Vector3::new(3, 4, 5), BlockType::STONE.id());

        let mesh = ChunkMesh::build(&blocks, &BlockRegistry::new());
        assert_eq!(mesh.face_count(), 6);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert_eq!(mesh.exposed, vec![Vector3::new(3, 4, 5)]);
    }

    #[test]
    fn shared_faces_are_culled() {
        let mut blocks = BlockGrid::empty();
        blocks.set(Vector3::new(3, 4, 5), BlockType::STONE.id());
        blocks.set(Vector3::new(4, 4, 5), BlockType::DIRT.id());

        let mesh = ChunkMesh::build(&blocks, &BlockRegistry::new());
        assert_eq!(mesh.face_count(), 10);
    }

    #[test]
    fn chunk_border_faces_are_always_emitted() {
        let mut blocks = BlockGrid::empty();
        blocks.fill(BlockType::STONE.id());

        let mesh = ChunkMesh::build(&blocks, &BlockRegistry::new());
        let per_side = (CHUNK_DIMENSION * CHUNK_DIMENSION) as usize;
        assert_eq!(mesh.face_count(), 6 * per_side);
        // Only the shell is exposed.
        let inner = (CHUNK_DIMENSION - 2).pow(3) as usize;
        assert_eq!(mesh.exposed.len(), (CHUNK_DIMENSION.pow(3)) as usize - inner);
    }

    #[test]
    fn quads_sit_half_a_block_from_the_center() {
        let mut blocks = BlockGrid::empty();
        blocks.set(Vector3::new(0, 0, 0), BlockType::GRASS.id());

        let mesh = ChunkMesh::build(&blocks, &BlockRegistry::new());
        for vertex in &mesh.vertices {
            for coordinate in vertex.position {
                assert_eq!(coordinate.abs(), 0.5);
            }
            assert_eq!(vertex.block_type, BlockType::GRASS.id() as u32);
        }
    }

    #[test]
    fn remeshing_is_deterministic() {
        let mut blocks = BlockGrid::empty();
        for i in 0..CHUNK_DIMENSION {
            blocks.set(Vector3::new(i, i / 2, 15 - i), BlockType::DIRT.id());
            blocks.set(Vector3::new(i, 0, i), BlockType::WOOD.id());
        }

        let registry = BlockRegistry::new();
        let first = ChunkMesh::build(&blocks, &registry);
        let second = ChunkMesh::build(&blocks, &registry);
        assert_eq!(first.vertices.len(), second.vertices.len());
        assert_eq!(first.indices.len(), second.indices.len());
        assert_eq!(first, second);
    }
}
