//! # Rendering Boundary
//!
//! The renderer itself (shaders, framebuffers, passes) lives outside the
//! simulation core. The core produces vertex/index data, asks the renderer to
//! upload it, draws it with a model matrix and a camera, and releases it. Upload
//! and release happen on the main thread through the task queue.
//!
//! ## Key Components
//! - [`Renderer`]: the entry points the core calls
//! - [`MeshHandle`]: opaque handle to an uploaded mesh
//! - [`HeadlessRenderer`]: bookkeeping-only renderer for servers and tests
//! - [`GpuMesh`] / [`MeshRenderer`]: main-thread upload and release of meshes
//! - [`meshing`]: block grid to quad mesh conversion

use std::{
    collections::HashSet,
    sync::atomic::{AtomicU64, AtomicUsize, Ordering},
};

use cgmath::Matrix4;
use log::warn;

use crate::core::MtResource;

pub mod camera;
pub mod gpu_mesh;
pub mod mesh_renderer;
pub mod meshing;
pub mod vertex;

pub use camera::Camera;
pub use gpu_mesh::GpuMesh;
pub use mesh_renderer::MeshRenderer;
pub use meshing::ChunkMesh;
pub use vertex::Vertex;

/// Opaque handle to a mesh resident on the GPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u64);

/// What the simulation core needs from a renderer.
///
/// `upload_mesh` and `release_mesh` are only ever called from the main thread.
/// `draw` is called during the render pass, also on the main thread.
pub trait Renderer: Send + Sync {
    fn upload_mesh(&self, vertices: &[Vertex], indices: &[u32]) -> MeshHandle;

    fn release_mesh(&self, handle: MeshHandle);

    fn draw(&self, handle: MeshHandle, model: Matrix4<f32>, camera: &Camera);
}

/// A renderer that only keeps track of what would be on the GPU.
#[derive(Default)]
pub struct HeadlessRenderer {
    next_handle: AtomicU64,
    resident: MtResource<HashSet<MeshHandle>>,
    draw_calls: AtomicUsize,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resident_meshes(&self) -> usize {
        self.resident.get().len()
    }

    pub fn draw_calls(&self) -> usize {
        self.draw_calls.load(Ordering::Relaxed)
    }
}

impl Renderer for HeadlessRenderer {
    fn upload_mesh(&self, _vertices: &[Vertex], _indices: &[u32]) -> MeshHandle {
        let handle = MeshHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        self.resident.get_mut().insert(handle);
        handle
    }

    fn release_mesh(&self, handle: MeshHandle) {
        if !self.resident.get_mut().remove(&handle) {
            warn!("released unknown mesh {:?}", handle);
        }
    }

    fn draw(&self, handle: MeshHandle, _model: Matrix4<f32>, _camera: &Camera) {
        if self.resident.get().contains(&handle) {
            self.draw_calls.fetch_add(1, Ordering::Relaxed);
        } else {
            warn!("draw of unknown mesh {:?}", handle);
        }
    }
}
