//! # Chunk Module
//!
//! A chunk is a 16×16×16 block of the world. Its game object sits at the
//! chunk's world origin (`coordinate * 16`) and block (i, j, k) is the unit cube
//! centered at `origin + (i, j, k)`.
//!
//! The [`Chunk`] component owns the block grid and the mesh derived from it.
//! The mesh is rebuilt from scratch whenever the grid changes, never patched,
//! and reaches the renderer through the main-thread queue.

use std::any::Any;

use cgmath::{Point3, Vector3};
use log::trace;

use crate::engine_state::{
    context::EngineContext,
    entity::{Component, ComponentKind, GameObject},
    rendering::{Camera, ChunkMesh, GpuMesh},
};

use super::{
    block::{BlockRegistry, BlockTypeSize},
    generation::TerrainGenerator,
};

mod block_grid;

pub use block_grid::BlockGrid;

/// The dimension (width, height, depth) of a chunk in blocks.
pub const CHUNK_DIMENSION: i32 = 16;
/// The number of blocks in a single 2D plane of a chunk (CHUNK_DIMENSION²).
pub const CHUNK_PLANE_SIZE: i32 = CHUNK_DIMENSION * CHUNK_DIMENSION;
/// The total number of blocks in a chunk (CHUNK_DIMENSION³).
pub const CHUNK_SIZE: i32 = CHUNK_PLANE_SIZE * CHUNK_DIMENSION;

/// Chunk coordinate containing the world position `position`.
pub fn chunk_coordinate(position: Vector3<f32>) -> Point3<i32> {
    let size = CHUNK_DIMENSION as f32;
    Point3::new(
        (position.x / size).floor() as i32,
        (position.y / size).floor() as i32,
        (position.z / size).floor() as i32,
    )
}

/// World position of a chunk's origin block.
pub fn chunk_origin(coordinate: Point3<i32>) -> Vector3<f32> {
    Vector3::new(
        (coordinate.x * CHUNK_DIMENSION) as f32,
        (coordinate.y * CHUNK_DIMENSION) as f32,
        (coordinate.z * CHUNK_DIMENSION) as f32,
    )
}

/// Name of the game object holding the chunk at `coordinate`.
pub fn chunk_name(coordinate: Point3<i32>) -> String {
    format!("chunk_{}_{}_{}", coordinate.x, coordinate.y, coordinate.z)
}

/// Block grid plus derived mesh of one chunk.
pub struct Chunk {
    /// The position of this chunk in chunk coordinates (not block coordinates).
    pub coordinate: Point3<i32>,
    blocks: BlockGrid,
    mesh: ChunkMesh,
    gpu: GpuMesh,
}

impl Chunk {
    /// Wraps an existing grid and meshes it.
    pub fn new(coordinate: Point3<i32>, blocks: BlockGrid, registry: &BlockRegistry) -> Self {
        let mesh = ChunkMesh::build(&blocks, registry);
        Chunk {
            coordinate,
            blocks,
            mesh,
            gpu: GpuMesh::new(),
        }
    }

    /// Runs `generators` in order over an empty grid, then meshes the result.
    pub fn generate(
        coordinate: Point3<i32>,
        generators: &[Box<dyn TerrainGenerator>],
        registry: &BlockRegistry,
    ) -> Self {
        let mut blocks = BlockGrid::empty();
        for generator in generators {
            generator.generate(&mut blocks, coordinate);
            trace!("chunk {:?}: ran {}", coordinate, generator.name());
        }
        Self::new(coordinate, blocks, registry)
    }

    pub fn blocks(&self) -> &BlockGrid {
        &self.blocks
    }

    pub fn mesh(&self) -> &ChunkMesh {
        &self.mesh
    }

    /// Offsets of the exposed solid blocks, for the chunk's voxel collider.
    pub fn collision_cells(&self) -> Vec<Vector3<i32>> {
        self.mesh.exposed.clone()
    }

    pub fn block_at(&self, position: Vector3<i32>) -> Option<BlockTypeSize> {
        self.blocks.get_checked(position)
    }

    /// Writes one block and, if anything changed, rebuilds the mesh and queues
    /// a fresh upload.
    pub fn set_block(
        &mut self,
        position: Vector3<i32>,
        block_type: BlockTypeSize,
        ctx: &EngineContext,
    ) -> bool {
        if self.blocks.get_checked(position) == Some(block_type) {
            return false;
        }
        if !self.blocks.set(position, block_type) {
            return false;
        }
        self.mesh = ChunkMesh::build(&self.blocks, &ctx.blocks);
        self.upload(ctx);
        true
    }

    pub fn is_resident(&self) -> bool {
        self.gpu.handle().is_some()
    }

    pub fn is_uploading(&self) -> bool {
        self.gpu.is_uploading()
    }

    fn upload(&mut self, ctx: &EngineContext) {
        self.gpu
            .upload(self.mesh.vertices.clone(), self.mesh.indices.clone(), ctx);
    }
}

impl Component for Chunk {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Chunk
    }

    fn on_load(&mut self, _owner: &GameObject, ctx: &EngineContext) {
        self.upload(ctx);
    }

    fn update(&mut self, owner: &GameObject, _ctx: &EngineContext) {
        if self.gpu.is_uploading() && self.gpu.poll().is_none() {
            trace!("{}: mesh upload still pending", owner.name());
        }
    }

    fn render(&self, owner: &GameObject, camera: &Camera, ctx: &EngineContext) {
        self.gpu.draw(owner.transform().model_matrix(), camera, ctx);
    }

    fn on_unload(&mut self, _owner: &GameObject, ctx: &EngineContext) {
        self.gpu.release(ctx);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::EngineConfig,
        engine_state::{rendering::HeadlessRenderer, voxels::block::block_type::BlockType},
    };

    #[test]
    fn chunk_coordinates_floor_towards_negative_infinity() {
        assert_eq!(chunk_coordinate(Vector3::new(0.0, 15.9, 16.0)), Point3::new(0, 0, 1));
        assert_eq!(chunk_coordinate(Vector3::new(-0.1, -16.0, -16.1)), Point3::new(-1, -1, -2));
        assert_eq!(chunk_origin(Point3::new(-1, 2, 0)), Vector3::new(-16.0, 32.0, 0.0));
    }

    #[test]
    fn mesh_is_uploaded_through_the_main_thread_queue() {
        let renderer = Arc::new(HeadlessRenderer::new());
        let ctx = EngineContext::with_renderer(EngineConfig::default(), renderer.clone());
        let mut blocks = BlockGrid::empty();
        blocks.set(Vector3::new(0, 0, 0), BlockType::DIRT.id());
        let coordinate = Point3::new(0, 0, 0);
        let owner = ctx.game_objects.create(chunk_name(coordinate));

        owner
            .add_component(Box::new(Chunk::new(coordinate, blocks, &ctx.blocks)), &ctx)
            .unwrap();
        owner.update(&ctx);
        let uploading = owner
            .with_component::<Chunk, _>(&ComponentKind::Chunk, |chunk| chunk.is_uploading())
            .unwrap();
        assert!(uploading);

        ctx.main_thread.drain().unwrap();
        owner.update(&ctx);
        let resident = owner
            .with_component::<Chunk, _>(&ComponentKind::Chunk, |chunk| chunk.is_resident())
            .unwrap();
        assert!(resident);
        assert_eq!(renderer.resident_meshes(), 1);

        ctx.game_objects.destroy(owner.name(), &ctx).unwrap();
        ctx.main_thread.drain().unwrap();
        assert_eq!(renderer.resident_meshes(), 0);
    }

    #[test]
    fn set_block_remeshes() {
        let ctx = EngineContext::new(EngineConfig::default());
        let mut chunk = Chunk::new(Point3::new(0, 0, 0), BlockGrid::empty(), &ctx.blocks);
        assert!(chunk.mesh().is_empty());

        assert!(chunk.set_block(Vector3::new(1, 1, 1), BlockType::STONE.id(), &ctx));
        assert_eq!(chunk.mesh().face_count(), 6);
        assert!(!chunk.set_block(Vector3::new(1, 1, 1), BlockType::STONE.id(), &ctx));
        assert!(!chunk.set_block(Vector3::new(1, 16, 1), BlockType::STONE.id(), &ctx));
        assert_eq!(chunk.collision_cells(), vec![Vector3::new(1, 1, 1)]);
    }

    #[test]
    fn empty_chunks_upload_nothing() {
        let renderer = Arc::new(HeadlessRenderer::new());
        let ctx = EngineContext::with_renderer(EngineConfig::default(), renderer.clone());
        let owner = ctx.game_objects.create("empty");
        owner
            .add_component(
                Box::new(Chunk::new(Point3::new(0, 0, 0), BlockGrid::empty(), &ctx.blocks)),
                &ctx,
            )
            .unwrap();
        assert_eq!(ctx.main_thread.drain().unwrap(), 0);
        assert_eq!(renderer.resident_meshes(), 0);
    }
}
