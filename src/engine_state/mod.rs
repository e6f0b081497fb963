//! # Engine State Module
//!
//! The simulation core: game objects and their components, physics, voxel
//! streaming and the glue that drives them once per tick.
//!
//! ## Key Components
//!
//! * `EngineState` - owns the [`EngineContext`] and runs the tick loop
//! * `entity` - game objects, components and transforms
//! * `physics` - collision shapes, dispatch, colliders and rigidbodies
//! * `voxels` - blocks, chunks, terrain generation and the streaming world
//! * `rendering` - meshing and the renderer boundary
//! * `task_management` - the main-thread task queue
//! * `persistence` - binary save and load of game objects
//!
//! ## Tick
//!
//! 1. every registered game object is updated, objects in parallel on the
//!    rayon pool and the components of one object in sequence
//! 2. main-thread tasks queued so far (mesh uploads and releases) run
//! 3. every game object renders with the current camera
//!
//! The tick uses the fixed step from the configuration; wall-clock time never
//! enters the simulation.

use log::{debug, trace};
use rayon::prelude::*;

use cgmath::{Deg, EuclideanSpace, Point3, Vector3};

use crate::{
    config::EngineConfig,
    core::MtWeak,
    engine_state::{
        entity::{SharedTransform, Transform},
        rendering::{Camera, Renderer},
    },
};

pub mod context;
pub mod entity;
pub mod persistence;
pub mod physics;
pub mod rendering;
pub mod task_management;
pub mod voxels;

pub use context::EngineContext;

/// Offset from a followed transform to the camera eye.
const EYE_HEIGHT: f32 = 0.7;

/// The engine: a context plus the per-tick driver around it.
///
/// Must be ticked from the thread that created it, which owns the main-thread
/// queue.
pub struct EngineState {
    ctx: EngineContext,
    camera: Camera,
    camera_target: Option<MtWeak<Transform>>,
    tick_count: u64,
}

impl EngineState {
    /// An engine drawing to a headless renderer.
    pub fn new(config: EngineConfig) -> Self {
        Self::from_context(EngineContext::new(config))
    }

    pub fn with_renderer(config: EngineConfig, renderer: std::sync::Arc<dyn Renderer>) -> Self {
        Self::from_context(EngineContext::with_renderer(config, renderer))
    }

    fn from_context(ctx: EngineContext) -> Self {
        EngineState {
            ctx,
            camera: Camera::default(),
            camera_target: None,
            tick_count: 0,
        }
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera_target = None;
        self.camera = camera;
    }

    /// Keeps the camera at eye height above `target` until another camera is set.
    pub fn follow(&mut self, target: &SharedTransform) {
        self.camera_target = Some(target.downgrade());
    }

    /// Number of ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.tick_count
    }

    /// Runs one fixed step.
    pub fn tick(&mut self) {
        let objects = self.ctx.game_objects.snapshot();
        let ctx = &self.ctx;
        objects.par_iter().for_each(|object| object.update(ctx));

        match self.ctx.main_thread.drain() {
            Ok(executed) if executed > 0 => trace!("ran {executed} main-thread tasks"),
            Ok(_) => {}
            Err(err) => debug!("main-thread tasks left queued: {err}"),
        }

        self.update_camera();
        // Objects created during the update pass render this tick too.
        for object in self.ctx.game_objects.snapshot() {
            object.render(&self.camera, &self.ctx);
        }

        self.tick_count += 1;
    }

    /// Destroys every game object and runs the releases that queues.
    pub fn shutdown(&mut self) {
        self.ctx.game_objects.clear(&self.ctx);
        if let Err(err) = self.ctx.main_thread.drain() {
            debug!("main-thread tasks left queued at shutdown: {err}");
        }
        debug!("engine shut down after {} ticks", self.tick_count);
    }

    fn update_camera(&mut self) {
        let Some(target) = self.camera_target.as_ref().and_then(MtWeak::upgrade) else {
            return;
        };
        let eye = Point3::from_vec(target.world_position() + Vector3::new(0.0, EYE_HEIGHT, 0.0));
        self.camera = Camera::first_person(eye, Deg(0.0), Deg(-20.0), 16.0 / 9.0);
    }
}
