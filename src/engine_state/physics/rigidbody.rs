//! # Rigidbody
//!
//! Fixed-step gravity integration with axis-aligned collision resolution.
//!
//! ## Per tick
//! 1. Grounded state resets; bodies that weren't grounded get gravity
//! 2. The position advances by `velocity * dt`. When the step is long compared
//!    to the body it is clipped by a swept test, and motion into the obstacle
//!    it stopped at is cancelled
//! 3. Every collider near the body is tested and resolved in turn. An upward
//!    push grounds the body, any vertical push stops vertical motion
//! 4. A body resting exactly on a surface is detected by probing just below it
//!
//! The body shape is the sibling box collider; without one the update is
//! logged and skipped.

use std::any::Any;

use cgmath::{InnerSpace, Vector3, Zero};
use log::error;
use serde::{Deserialize, Serialize};

use crate::{
    engine_state::{
        context::EngineContext,
        entity::{Component, ComponentKind, GameObject},
    },
    error::{EngineError, EngineResult},
};

use super::{
    collider::Collider,
    directory::ColliderHandle,
    shape::{ColliderShape, CollisionShape, ShapeKind},
    swept::swept_shapes,
};

/// How far below the body the resting-contact probe looks.
pub const GROUND_PROBE: f32 = 1e-3;
/// Gap left between a body and the obstacle a swept test stopped it at.
const CONTACT_SKIN: f32 = GROUND_PROBE / 2.0;

/// Velocity and ground contact of a simulated body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rigidbody {
    velocity: Vector3<f32>,
    grounded: bool,
}

impl Default for Rigidbody {
    fn default() -> Self {
        Self::new()
    }
}

impl Rigidbody {
    pub fn new() -> Self {
        Rigidbody {
            velocity: Vector3::new(0.0, 0.0, 0.0),
            grounded: false,
        }
    }

    pub fn with_velocity(velocity: Vector3<f32>) -> Self {
        Rigidbody {
            velocity,
            grounded: false,
        }
    }

    /// Rebuilds a rigidbody from its saved payload.
    pub fn load(payload: &[u8]) -> EngineResult<Box<dyn Component>> {
        let rigidbody: Rigidbody = serde_json::from_slice(payload)?;
        Ok(Box::new(rigidbody))
    }

    pub fn velocity(&self) -> Vector3<f32> {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vector3<f32>) {
        self.velocity = velocity;
    }

    /// Adds `impulse` straight onto the velocity.
    pub fn add_force(&mut self, impulse: Vector3<f32>) {
        self.velocity += impulse;
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    fn body_shape(owner: &GameObject) -> EngineResult<ColliderShape> {
        owner
            .with_component::<Collider, _>(&ComponentKind::Collider, Collider::shape)
            .filter(|shape| shape.kind() == ShapeKind::Box)
            .ok_or_else(|| EngineError::MissingComponent {
                owner: owner.name().to_string(),
                component: "Rigidbody",
                required: "BoxCollider",
            })
    }

    fn step(&mut self, owner: &GameObject, ctx: &EngineContext) -> EngineResult<()> {
        let body = Self::body_shape(owner)?;
        let config = &ctx.config;
        let transform = owner.transform();

        let was_grounded = self.grounded;
        self.grounded = false;
        if !was_grounded {
            self.velocity.y += config.gravity * config.fixed_dt;
        }

        let start = transform.world_position();
        let nearby = ctx
            .colliders
            .within(start, config.broad_phase_radius, Some(owner.name()));

        let mut displacement = self.velocity * config.fixed_dt;
        let posed = body.posed(start);
        let half = posed.bounds().half_extents;
        if displacement.magnitude() > half.x.min(half.y).min(half.z) {
            // Overlaps are left to the resolution pass below.
            let impact = nearby
                .iter()
                .filter(|(_, obstacle)| !ctx.collisions.intersects(&posed, obstacle))
                .filter_map(|(_, obstacle)| swept_shapes(&posed, obstacle, displacement))
                .min_by(f32::total_cmp);
            if let Some(t) = impact {
                let travel = (displacement.magnitude() * t - CONTACT_SKIN).max(0.0);
                displacement = displacement.normalize() * travel;
                self.stop_against(&body.posed(start + displacement), &nearby, ctx);
            }
        }
        transform.get_mut().translate(displacement);

        for (_, obstacle) in &nearby {
            let current = body.posed(transform.world_position());
            let result = ctx.collisions.collide(&current, obstacle);
            if !result.intersects {
                continue;
            }

            transform.get_mut().translate(result.resolution);
            if result.resolution.y > 0.0 {
                self.grounded = true;
                self.velocity.y = 0.0;
            } else if result.resolution.y < 0.0 {
                self.velocity.y = 0.0;
            }
        }

        if !self.grounded && self.velocity.y <= 0.0 {
            let probe = body.posed(transform.world_position() - Vector3::new(0.0, GROUND_PROBE, 0.0));
            if nearby
                .iter()
                .any(|(_, obstacle)| ctx.collisions.intersects(&probe, obstacle))
            {
                self.grounded = true;
                self.velocity.y = 0.0;
            }
        }

        Ok(())
    }

    /// Zeroes every velocity component that points into an obstacle within
    /// reach of `body`.
    fn stop_against(
        &mut self,
        body: &CollisionShape,
        nearby: &[(ColliderHandle, CollisionShape)],
        ctx: &EngineContext,
    ) {
        for axis in 0..3 {
            let speed = self.velocity[axis];
            if speed == 0.0 {
                continue;
            }
            let mut reach = Vector3::zero();
            reach[axis] = 2.0 * CONTACT_SKIN * speed.signum();
            if nearby.iter().any(|(_, obstacle)| {
                !ctx.collisions.intersects(body, obstacle)
                    && swept_shapes(body, obstacle, reach).is_some()
            })
            {
                self.velocity[axis] = 0.0;
            }
        }
    }
}

impl Component for Rigidbody {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Rigidbody
    }

    fn update(&mut self, owner: &GameObject, ctx: &EngineContext) {
        if let Err(err) = self.step(owner, ctx) {
            error!("{err}; skipping its physics this tick");
        }
    }

    fn save(&self) -> Option<EngineResult<Vec<u8>>> {
        Some(serde_json::to_vec(self).map_err(Into::into))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
