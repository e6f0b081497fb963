//! # Components
//!
//! A component is an attachable unit of behaviour or data. Game objects hold at
//! most one component per [`ComponentKind`] and forward lifecycle calls to them.
//!
//! ## Lifecycle
//! 1. `initialize` when attached to a game object
//! 2. `on_load` right after attachment, for derived or GPU-resident state
//! 3. `update` once per tick
//! 4. `render` once per frame with the active camera
//! 5. `on_unload` then `uninitialize` when detached or destroyed
//!
//! Every hook receives the owning game object instead of storing a pointer back
//! to it, so a component never keeps its owner alive.

use std::any::Any;

use crate::{
    engine_state::{context::EngineContext, rendering::Camera},
    error::EngineResult,
};

use super::GameObject;

/// Capability tag. Two components with the same kind can't share an owner.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Collider,
    Rigidbody,
    World,
    Chunk,
    Mesh,
    /// Game-specific components outside the core.
    Custom(&'static str),
}

impl ComponentKind {
    /// Stable name used in save files and log messages.
    pub fn tag(&self) -> &str {
        match self {
            ComponentKind::Collider => "collider",
            ComponentKind::Rigidbody => "rigidbody",
            ComponentKind::World => "world",
            ComponentKind::Chunk => "chunk",
            ComponentKind::Mesh => "mesh",
            ComponentKind::Custom(tag) => tag,
        }
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// A unit of behaviour attached to a [`GameObject`].
///
/// All hooks but `kind` and the `Any` accessors have empty defaults.
/// Implementations must not assume anything about the order in which sibling
/// components are updated.
pub trait Component: Any + Send + Sync {
    fn kind(&self) -> ComponentKind;

    fn initialize(&mut self, _owner: &GameObject, _ctx: &EngineContext) {}

    fn update(&mut self, _owner: &GameObject, _ctx: &EngineContext) {}

    fn render(&self, _owner: &GameObject, _camera: &Camera, _ctx: &EngineContext) {}

    fn on_load(&mut self, _owner: &GameObject, _ctx: &EngineContext) {}

    fn on_unload(&mut self, _owner: &GameObject, _ctx: &EngineContext) {}

    fn uninitialize(&mut self, _owner: &GameObject, _ctx: &EngineContext) {}

    /// Serialized payload for save files. `None` means the component isn't
    /// persisted and is rebuilt some other way (chunks are regenerated).
    fn save(&self) -> Option<EngineResult<Vec<u8>>> {
        None
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
