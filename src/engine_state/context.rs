//! # Engine Context
//!
//! The handle every lifecycle hook receives. It owns the registries that would
//! otherwise be process-wide singletons (game objects, colliders, blocks),
//! the collision dispatch table, the main-thread queue and the renderer.
//!
//! The context is `Sync`: the parallel update pass shares one `&EngineContext`
//! across worker threads.

use std::sync::Arc;

use super::{
    entity::GameObjectDirectory,
    physics::{ColliderDirectory, CollisionDispatch},
    rendering::{HeadlessRenderer, Renderer},
    task_management::MainThreadQueue,
    voxels::block::BlockRegistry,
};
use crate::config::EngineConfig;

pub struct EngineContext {
    pub config: EngineConfig,
    pub game_objects: GameObjectDirectory,
    pub colliders: ColliderDirectory,
    pub collisions: CollisionDispatch,
    pub blocks: BlockRegistry,
    /// Owned by the thread that created the context.
    pub main_thread: MainThreadQueue,
    pub renderer: Arc<dyn Renderer>,
}

impl EngineContext {
    /// A context drawing to a [`HeadlessRenderer`], owned by the calling thread.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_renderer(config, Arc::new(HeadlessRenderer::new()))
    }

    pub fn with_renderer(config: EngineConfig, renderer: Arc<dyn Renderer>) -> Self {
        EngineContext {
            config,
            game_objects: GameObjectDirectory::new(),
            colliders: ColliderDirectory::new(),
            collisions: CollisionDispatch::new(),
            blocks: BlockRegistry::new(),
            main_thread: MainThreadQueue::new(),
            renderer,
        }
    }
}
