//! # Pairwise Collision
//!
//! Intersection tests and minimum translation vectors (MTV) for every pair of
//! shape kinds, reached through a [`CollisionDispatch`] table.
//!
//! ## Conventions
//! - A [`CollisionResult`]'s resolution is the translation to apply to the
//!   *first* shape of the call to separate it from the second.
//! - Each MTV is clamped to [`MAX_RESOLUTION`] per axis so that one resolution
//!   call never moves a body more than a unit.
//! - Voxel meshes against voxel meshes only intersect where two cells occupy
//!   exactly the same position; partial overlap does not count.

use std::collections::HashMap;

use cgmath::{InnerSpace, Vector3, Zero};
use log::warn;

use super::shape::{Aabb, CollisionShape, ShapeKind};

/// Largest displacement, per axis, a single resolution call may produce.
pub const MAX_RESOLUTION: f32 = 1.0;
/// Tolerance of the voxel point-identity test.
pub const VOXEL_EPSILON: f32 = 1e-6;
/// Iteration cap of [`CollisionDispatch::resolve_iterative`].
pub const MAX_SOLVER_ITERATIONS: usize = 10;
/// Residual translation below which the iterative solver stops.
pub const SOLVER_TOLERANCE: f32 = 1e-5;

/// Outcome of one pairwise test. Transient, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    pub intersects: bool,
    pub resolution: Vector3<f32>,
}

impl CollisionResult {
    pub const NONE: CollisionResult = CollisionResult {
        intersects: false,
        resolution: Vector3::new(0.0, 0.0, 0.0),
    };

    pub fn hit(resolution: Vector3<f32>) -> Self {
        CollisionResult {
            intersects: true,
            resolution,
        }
    }

    fn negated(self) -> Self {
        CollisionResult {
            intersects: self.intersects,
            resolution: -self.resolution,
        }
    }
}

/// Handles one (first, second) shape-kind pair.
pub type CollisionHandler = fn(&CollisionShape, &CollisionShape) -> CollisionResult;

/// MTV pushing `a` out of `b`, or `None` when they don't overlap.
///
/// The axis is the one with the smallest positive overlap (x wins ties, then
/// y). The push points away from `b`'s center, positive when the centers
/// coincide.
pub fn box_box_mtv(a: &Aabb, b: &Aabb) -> Option<Vector3<f32>> {
    let delta = a.center - b.center;
    let reach = a.half_extents + b.half_extents;
    let overlap = Vector3::new(
        reach.x - delta.x.abs(),
        reach.y - delta.y.abs(),
        reach.z - delta.z.abs(),
    );
    if overlap.x <= 0.0 || overlap.y <= 0.0 || overlap.z <= 0.0 {
        return None;
    }

    let mut axis = 0;
    for candidate in 1..3 {
        if overlap[candidate] < overlap[axis] {
            axis = candidate;
        }
    }

    let direction = if delta[axis] < 0.0 { -1.0 } else { 1.0 };
    let mut mtv = Vector3::zero();
    mtv[axis] = direction * overlap[axis].min(MAX_RESOLUTION);
    Some(mtv)
}

fn clamp_resolution(resolution: Vector3<f32>) -> Vector3<f32> {
    Vector3::new(
        resolution.x.clamp(-MAX_RESOLUTION, MAX_RESOLUTION),
        resolution.y.clamp(-MAX_RESOLUTION, MAX_RESOLUTION),
        resolution.z.clamp(-MAX_RESOLUTION, MAX_RESOLUTION),
    )
}

fn box_box(a: &CollisionShape, b: &CollisionShape) -> CollisionResult {
    let (CollisionShape::Box(a), CollisionShape::Box(b)) = (a, b) else {
        return CollisionResult::NONE;
    };
    box_box_mtv(a, b).map_or(CollisionResult::NONE, CollisionResult::hit)
}

/// Sums the MTVs against every overlapping voxel.
fn box_voxel_mesh(a: &CollisionShape, b: &CollisionShape) -> CollisionResult {
    let CollisionShape::Box(aabb) = a else {
        return CollisionResult::NONE;
    };
    if !aabb.overlaps(&b.bounds()) {
        return CollisionResult::NONE;
    }

    let mut intersects = false;
    let mut resolution = Vector3::zero();
    for center in b.cell_centers() {
        if let Some(mtv) = box_box_mtv(aabb, &Aabb::unit_cube(center)) {
            intersects = true;
            resolution += mtv;
        }
    }

    if intersects {
        CollisionResult::hit(clamp_resolution(resolution))
    } else {
        CollisionResult::NONE
    }
}

/// Averages the MTVs of every pair of cells sharing a position.
fn voxel_mesh_voxel_mesh(a: &CollisionShape, b: &CollisionShape) -> CollisionResult {
    if !a.bounds().overlaps(&b.bounds()) {
        return CollisionResult::NONE;
    }

    let mut pairs = 0;
    let mut resolution = Vector3::zero();
    for a_center in a.cell_centers() {
        for b_center in b.cell_centers() {
            let delta = a_center - b_center;
            if delta.x.abs() > VOXEL_EPSILON
                || delta.y.abs() > VOXEL_EPSILON
                || delta.z.abs() > VOXEL_EPSILON
            {
                continue;
            }
            if let Some(mtv) = box_box_mtv(&Aabb::unit_cube(a_center), &Aabb::unit_cube(b_center)) {
                resolution += mtv;
            }
            pairs += 1;
        }
    }

    if pairs == 0 {
        CollisionResult::NONE
    } else {
        CollisionResult::hit(clamp_resolution(resolution / pairs as f32))
    }
}

/// Table of collision handlers keyed by shape-kind pair.
///
/// Pairs are normalized by [`ShapeKind::rank`] before lookup, so one
/// registration serves both call orders.
pub struct CollisionDispatch {
    /// Normalized pair → (handler, whether the handler expects the pair swapped).
    handlers: HashMap<(ShapeKind, ShapeKind), (CollisionHandler, bool)>,
}

impl Default for CollisionDispatch {
    fn default() -> Self {
        let mut dispatch = CollisionDispatch::empty();
        dispatch.register(ShapeKind::Box, ShapeKind::Box, box_box);
        dispatch.register(ShapeKind::Box, ShapeKind::VoxelMesh, box_voxel_mesh);
        dispatch.register(ShapeKind::VoxelMesh, ShapeKind::VoxelMesh, voxel_mesh_voxel_mesh);
        dispatch
    }
}

fn normalize(first: ShapeKind, second: ShapeKind) -> ((ShapeKind, ShapeKind), bool) {
    if first.rank() <= second.rank() {
        ((first, second), false)
    } else {
        ((second, first), true)
    }
}

impl CollisionDispatch {
    /// The built-in handlers.
    pub fn new() -> Self {
        Self::default()
    }

    /// A table with no handlers at all.
    pub fn empty() -> Self {
        CollisionDispatch {
            handlers: HashMap::new(),
        }
    }

    /// Registers `handler` for shapes of kinds (`first`, `second`), in that
    /// argument order. Replaces any handler of the same unordered pair.
    pub fn register(&mut self, first: ShapeKind, second: ShapeKind, handler: CollisionHandler) {
        let (key, swapped) = normalize(first, second);
        self.handlers.insert(key, (handler, swapped));
    }

    pub fn has_handler(&self, first: ShapeKind, second: ShapeKind) -> bool {
        self.handlers.contains_key(&normalize(first, second).0)
    }

    /// Tests `a` against `b`. The resolution moves `a` out of `b`.
    pub fn collide(&self, a: &CollisionShape, b: &CollisionShape) -> CollisionResult {
        let (key, call_swapped) = normalize(a.kind(), b.kind());
        let Some(&(handler, handler_swapped)) = self.handlers.get(&key) else {
            warn!("no collision handler for {:?} × {:?}", key.0, key.1);
            return CollisionResult::NONE;
        };

        // Call the handler in its own argument order.
        let handler_first_is_a = if key.0 == key.1 {
            true
        } else {
            call_swapped == handler_swapped
        };
        if handler_first_is_a {
            handler(a, b)
        } else {
            handler(b, a).negated()
        }
    }

    pub fn intersects(&self, a: &CollisionShape, b: &CollisionShape) -> bool {
        self.collide(a, b).intersects
    }

    /// Translation that moves `a` out of `b`, zero when they don't intersect.
    pub fn resolve(&self, a: &CollisionShape, b: &CollisionShape) -> Vector3<f32> {
        self.collide(a, b).resolution
    }

    /// Resolves repeatedly, moving `a` each time, until it no longer intersects,
    /// the step falls below [`SOLVER_TOLERANCE`] or [`MAX_SOLVER_ITERATIONS`]
    /// is reached. Returns the accumulated translation.
    pub fn resolve_iterative(&self, a: &CollisionShape, b: &CollisionShape) -> Vector3<f32> {
        let mut moved = a.clone();
        let mut total = Vector3::zero();
        for _ in 0..MAX_SOLVER_ITERATIONS {
            let step = self.collide(&moved, b);
            if !step.intersects || step.resolution.magnitude() < SOLVER_TOLERANCE {
                break;
            }
            total += step.resolution;
            moved = moved.translated(step.resolution);
        }
        total
    }
}
