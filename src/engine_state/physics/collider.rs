//! # Collider Component
//!
//! Gives its game object a collidable shape and keeps it registered in the
//! [`ColliderDirectory`](super::ColliderDirectory) while attached.

use std::any::Any;

use cgmath::Vector3;

use crate::{
    core::MtResource,
    engine_state::{
        context::EngineContext,
        entity::{Component, ComponentKind, GameObject},
    },
    error::EngineResult,
};

use super::{
    directory::ColliderHandle,
    shape::{ColliderShape, CollisionShape},
};

/// A box or voxel-mesh collider.
pub struct Collider {
    shape: MtResource<ColliderShape>,
}

impl Collider {
    pub fn new(shape: ColliderShape) -> Self {
        Collider {
            shape: MtResource::new(shape),
        }
    }

    /// Axis-aligned box of full size `size`, centered on the owner.
    pub fn box_collider(size: Vector3<f32>) -> Self {
        Self::new(ColliderShape::cube(size))
    }

    /// Unit cubes at the owner's position plus each of `cells`.
    pub fn voxel_mesh(cells: Vec<Vector3<i32>>) -> Self {
        Self::new(ColliderShape::voxels(cells))
    }

    /// Rebuilds a collider from its saved payload.
    pub fn load(payload: &[u8]) -> EngineResult<Box<dyn Component>> {
        let shape: ColliderShape = serde_json::from_slice(payload)?;
        Ok(Box::new(Collider::new(shape)))
    }

    pub fn shape(&self) -> ColliderShape {
        self.shape.get().clone()
    }

    /// Replaces the shape; the directory entry sees the change immediately.
    pub fn set_shape(&self, shape: ColliderShape) {
        *self.shape.get_mut() = shape;
    }

    pub fn posed(&self, owner: &GameObject) -> CollisionShape {
        let position = owner.transform().world_position();
        self.shape.get().posed(position)
    }
}

impl Component for Collider {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Collider
    }

    fn initialize(&mut self, owner: &GameObject, ctx: &EngineContext) {
        ctx.colliders.register(ColliderHandle {
            owner: owner.name().to_string(),
            transform: owner.transform().clone(),
            shape: self.shape.clone(),
        });
    }

    fn uninitialize(&mut self, owner: &GameObject, ctx: &EngineContext) {
        ctx.colliders.unregister(owner.name(), &self.shape);
    }

    fn save(&self) -> Option<EngineResult<Vec<u8>>> {
        Some(serde_json::to_vec(&*self.shape.get()).map_err(Into::into))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
