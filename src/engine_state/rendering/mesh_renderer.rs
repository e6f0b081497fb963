//! # Mesh Renderer
//!
//! A component that draws a fixed mesh at its owner's transform, e.g. the
//! player's body. Chunks manage their own mesh instead.

use std::any::Any;

use cgmath::Vector3;

use crate::engine_state::{
    context::EngineContext,
    entity::{Component, ComponentKind, GameObject},
    voxels::block::{block_side::BlockSide, BlockTypeSize},
};

use super::{gpu_mesh::GpuMesh, meshing::Face, Camera, Vertex};

pub struct MeshRenderer {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    gpu: GpuMesh,
}

impl MeshRenderer {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        MeshRenderer {
            vertices,
            indices,
            gpu: GpuMesh::new(),
        }
    }

    /// A unit cube textured like `block_type`, centered on the owner.
    pub fn block(block_type: BlockTypeSize) -> Self {
        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for side in BlockSide::all() {
            let face = Face::new(Vector3::new(0, 0, 0), block_type, side);
            indices.extend_from_slice(&face.indices(vertices.len() as u32));
            vertices.extend_from_slice(&face.vertices());
        }
        Self::new(vertices, indices)
    }

    pub fn is_resident(&self) -> bool {
        self.gpu.handle().is_some()
    }
}

impl Component for MeshRenderer {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Mesh
    }

    fn on_load(&mut self, _owner: &GameObject, ctx: &EngineContext) {
        self.gpu
            .upload(self.vertices.clone(), self.indices.clone(), ctx);
    }

    fn update(&mut self, _owner: &GameObject, _ctx: &EngineContext) {
        self.gpu.poll();
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
