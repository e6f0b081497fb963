//! # Collider Directory
//!
//! Every active collider, keyed by the name of the game object owning it. One
//! entry per game object: registering twice or unregistering a non-member is
//! logged and otherwise ignored.
//!
//! Queries work on point-in-time snapshots. A snapshot doesn't reflect
//! colliders registered or removed after it was taken.

use std::{collections::HashMap, future::Future};

use cgmath::Vector3;
use futures::channel::oneshot;
use log::{debug, warn};

use crate::{core::MtResource, engine_state::entity::SharedTransform};

use super::shape::{ColliderShape, CollisionShape, Ray};

/// A registered collider: who owns it, where it is, what it looks like.
#[derive(Clone)]
pub struct ColliderHandle {
    pub owner: String,
    pub transform: SharedTransform,
    pub shape: MtResource<ColliderShape>,
}

impl ColliderHandle {
    /// The shape placed at the owner's current world position.
    pub fn posed(&self) -> CollisionShape {
        let position = self.transform.world_position();
        self.shape.get().posed(position)
    }
}

impl std::fmt::Debug for ColliderHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColliderHandle")
            .field("owner", &self.owner)
            .field("kind", &self.shape.get().kind())
            .finish()
    }
}

/// Closest collider hit by a ray.
#[derive(Debug, Clone, PartialEq)]
pub struct RaycastHit {
    pub owner: String,
    pub point: Vector3<f32>,
    pub distance: f32,
}

/// Concurrent owner-name → collider map.
#[derive(Default)]
pub struct ColliderDirectory {
    colliders: MtResource<HashMap<String, ColliderHandle>>,
}

impl ColliderDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `handle` unless its owner already has a collider. Returns whether
    /// it was added.
    pub fn register(&self, handle: ColliderHandle) -> bool {
        let mut colliders = self.colliders.get_mut();
        if colliders.contains_key(&handle.owner) {
            warn!("{} already has a registered collider; ignoring", handle.owner);
            return false;
        }
        debug!("registered collider of {}", handle.owner);
        colliders.insert(handle.owner.clone(), handle);
        true
    }

    /// Removes the collider of `owner`, but only if the registered entry is
    /// the one holding `shape`. Returns whether anything was removed.
    pub fn unregister(&self, owner: &str, shape: &MtResource<ColliderShape>) -> bool {
        let mut colliders = self.colliders.get_mut();
        match colliders.get(owner) {
            Some(handle) if handle.shape.ptr_eq(shape) => {
                colliders.remove(owner);
                true
            }
            Some(_) => {
                warn!("{owner}'s registered collider belongs to another game object; leaving it");
                false
            }
            None => {
                warn!("{owner} has no registered collider to remove");
                false
            }
        }
    }

    pub fn get(&self, owner: &str) -> Option<ColliderHandle> {
        self.colliders.get().get(owner).cloned()
    }

    pub fn contains(&self, owner: &str) -> bool {
        self.colliders.get().contains_key(owner)
    }

    /// Snapshot copy of every registered collider.
    pub fn get_all(&self) -> Vec<ColliderHandle> {
        self.colliders.get().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.colliders.get().len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.get().is_empty()
    }

    /// Broad phase: posed shapes whose bounds come within `radius` of `point`,
    /// leaving out the collider of `exclude`.
    pub fn within(
        &self,
        point: Vector3<f32>,
        radius: f32,
        exclude: Option<&str>,
    ) -> Vec<(ColliderHandle, CollisionShape)> {
        self.get_all()
            .into_iter()
            .filter(|handle| Some(handle.owner.as_str()) != exclude)
            .filter_map(|handle| {
                let shape = handle.posed();
                (shape.distance_to(point) <= radius).then_some((handle, shape))
            })
            .collect()
    }

    /// Closest collider along `ray`, skipping the collider of `ignore`.
    pub fn raycast(&self, ray: Ray, ignore: Option<&str>) -> Option<RaycastHit> {
        raycast_snapshot(&self.get_all(), &ray, ignore)
    }

    /// Same as [`ColliderDirectory::raycast`], evaluated on the rayon pool over
    /// a snapshot taken now.
    pub fn raycast_async(
        &self,
        ray: Ray,
        ignore: Option<String>,
    ) -> impl Future<Output = Option<RaycastHit>> + Send + 'static {
        let snapshot = self.get_all();
        let (sender, receiver) = oneshot::channel();
        rayon::spawn(move || {
            let hit = raycast_snapshot(&snapshot, &ray, ignore.as_deref());
            // The caller may have dropped the future.
            let _ = sender.send(hit);
        });
        async move { receiver.await.ok().flatten() }
    }
}

/// Linear scan; the first collider found at the minimum distance wins.
fn raycast_snapshot(
    snapshot: &[ColliderHandle],
    ray: &Ray,
    ignore: Option<&str>,
) -> Option<RaycastHit> {
    let mut closest: Option<RaycastHit> = None;
    for handle in snapshot {
        if Some(handle.owner.as_str()) == ignore {
            continue;
        }
        let Some(distance) = handle.posed().ray_distance(ray) else {
            continue;
        };
        if closest.as_ref().is_some_and(|hit| hit.distance <= distance) {
            continue;
        }
        closest = Some(RaycastHit {
            owner: handle.owner.clone(),
            point: ray.at(distance),
            distance,
        });
    }
    closest
}
