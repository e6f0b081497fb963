//! Upload/draw/release bookkeeping for one mesh that lives on the renderer.

use cgmath::Matrix4;
use log::warn;

use crate::engine_state::{
    context::EngineContext,
    task_management::{TaskTicket, TicketState},
};

use super::{Camera, MeshHandle, Vertex};

#[derive(Debug, Default)]
enum Residency {
    #[default]
    Empty,
    Uploading(TaskTicket<MeshHandle>),
    Resident(MeshHandle),
}

/// A mesh whose GPU lifetime is driven through the main-thread queue.
///
/// Uploads are submitted from whatever thread runs the owning component and
/// picked up later with a zero-wait poll, so a frame never blocks on them.
#[derive(Debug, Default)]
pub struct GpuMesh {
    residency: Residency,
}

impl GpuMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an upload, releasing whatever was uploaded before. Empty meshes
    /// are not uploaded at all.
    pub fn upload(&mut self, vertices: Vec<Vertex>, indices: Vec<u32>, ctx: &EngineContext) {
        self.release(ctx);
        if indices.is_empty() {
            return;
        }

        let renderer = ctx.renderer.clone();
        let ticket = ctx
            .main_thread
            .submit(move || renderer.upload_mesh(&vertices, &indices));
        self.residency = Residency::Uploading(ticket);
    }

    /// Picks up a finished upload. Returns the handle once the mesh is resident.
    pub fn poll(&mut self) -> Option<MeshHandle> {
        if let Residency::Uploading(ticket) = &self.residency {
            match ticket.poll() {
                TicketState::Ready(handle) => self.residency = Residency::Resident(handle),
                TicketState::Pending => return None,
                TicketState::Abandoned => {
                    warn!("mesh upload was dropped before it ran");
                    self.residency = Residency::Empty;
                }
            }
        }
        self.handle()
    }

    pub fn handle(&self) -> Option<MeshHandle> {
        match self.residency {
            Residency::Resident(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self.residency, Residency::Uploading(_))
    }

    pub fn draw(&self, model: Matrix4<f32>, camera: &Camera, ctx: &EngineContext) {
        if let Some(handle) = self.handle() {
            ctx.renderer.draw(handle, model, camera);
        }
    }

    /// Queues the release of the resident mesh. An upload still in flight is
    /// released right after it runs, since the queue is FIFO.
    pub fn release(&mut self, ctx: &EngineContext) {
        let renderer = ctx.renderer.clone();
        match std::mem::take(&mut self.residency) {
            Residency::Empty => {}
            Residency::Resident(handle) => ctx.main_thread.post(move || renderer.release_mesh(handle)),
            Residency::Uploading(ticket) => ctx.main_thread.post(move || {
                if let TicketState::Ready(handle) = ticket.poll() {
                    renderer.release_mesh(handle);
                }
            }),
        }
    }
}
