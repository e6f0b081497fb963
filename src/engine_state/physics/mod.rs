//! # Physics
//!
//! Collision detection and resolution for two shape kinds, axis-aligned boxes
//! and voxel meshes, plus the rigidbody integrator built on top of them.
//!
//! ## Key Components
//! - [`shape`]: declared shapes, posed shapes, rays
//! - [`CollisionDispatch`]: per-pair intersection tests and MTV resolution
//! - [`swept_aabb`]: slab-method continuous test for fast bodies
//! - [`Collider`] / [`ColliderDirectory`]: the collider component and the
//!   registry it joins, with blocking and async ray casts
//! - [`Rigidbody`]: gravity, integration and ground contact

pub mod collider;
pub mod collision;
pub mod directory;
pub mod rigidbody;
pub mod shape;
pub mod swept;

pub use collider::Collider;
pub use collision::{CollisionDispatch, CollisionResult};
pub use directory::{ColliderDirectory, ColliderHandle, RaycastHit};
pub use rigidbody::Rigidbody;
pub use shape::{Aabb, ColliderShape, CollisionShape, Ray, ShapeKind};
pub use swept::{swept_aabb, swept_shapes};
