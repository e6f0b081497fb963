//! # Swept Tests
//!
//! Continuous collision for bodies that move far enough in one step to skip
//! over thin geometry. Times are fractions of the step, in `[0, 1]`.

use cgmath::{InnerSpace, Vector3};

use super::shape::{Aabb, CollisionShape};

/// Relative velocities with a squared magnitude below this count as static.
pub const MIN_SWEEP_SPEED_SQUARED: f32 = 1e-12;

/// Earliest time in `[0, 1]` at which `moving`, travelling by `velocity` over
/// the step, touches `target`, by intersecting the per-axis slab intervals.
///
/// Boxes already overlapping, or touching and moving into each other, report
/// `0.0`; touching boxes moving apart report `None`. With a negligible
/// velocity this is the static overlap test: `Some(0.0)` if overlapping,
/// `None` otherwise.
pub fn swept_aabb(moving: &Aabb, target: &Aabb, velocity: Vector3<f32>) -> Option<f32> {
    if velocity.magnitude2() < MIN_SWEEP_SPEED_SQUARED {
        return moving.overlaps(target).then_some(0.0);
    }

    let (moving_min, moving_max) = (moving.min(), moving.max());
    let (target_min, target_max) = (target.min(), target.max());
    let mut entry = f32::NEG_INFINITY;
    let mut exit = f32::INFINITY;

    for axis in 0..3 {
        let speed = velocity[axis];
        if speed.abs() <= f32::EPSILON {
            // No motion on this axis: it must already overlap, for all time.
            if moving_max[axis] <= target_min[axis] || moving_min[axis] >= target_max[axis] {
                return None;
            }
            continue;
        }

        let t1 = (target_min[axis] - moving_max[axis]) / speed;
        let t2 = (target_max[axis] - moving_min[axis]) / speed;
        entry = entry.max(t1.min(t2));
        exit = exit.min(t1.max(t2));
    }

    if entry > exit || exit <= 0.0 || entry > 1.0 {
        return None;
    }
    Some(entry.max(0.0))
}

/// [`swept_aabb`] lifted to shapes: the earliest contact between any box of
/// `moving` and any box of `target`.
pub fn swept_shapes(
    moving: &CollisionShape,
    target: &CollisionShape,
    velocity: Vector3<f32>,
) -> Option<f32> {
    let moving_boxes = boxes(moving);
    let target_boxes = boxes(target);

    // Cheap reject on the swept bounds.
    let bounds = moving.bounds();
    let reach = Aabb::new(
        bounds.center + velocity / 2.0,
        bounds.half_extents + velocity.map(|v| v.abs() / 2.0),
    );
    if !reach.overlaps(&target.bounds()) && velocity.magnitude2() >= MIN_SWEEP_SPEED_SQUARED {
        return None;
    }

    moving_boxes
        .iter()
        .flat_map(|a| target_boxes.iter().filter_map(move |b| swept_aabb(a, b, velocity)))
        .min_by(f32::total_cmp)
}

fn boxes(shape: &CollisionShape) -> Vec<Aabb> {
    match shape {
        CollisionShape::Box(aabb) => vec![*aabb],
        CollisionShape::VoxelMesh { .. } => shape.cell_centers().map(Aabb::unit_cube).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::physics::shape::ColliderShape;

    fn unit(x: f32, y: f32, z: f32) -> Aabb {
        Aabb::unit_cube(Vector3::new(x, y, z))
    }

    #[test]
    fn zero_velocity_matches_the_static_test() {
        let zero = Vector3::new(0.0, 0.0, 0.0);
        let a = unit(0.0, 0.0, 0.0);
        for b in [unit(0.5, 0.0, 0.0), unit(0.9, 0.9, 0.9), unit(2.0, 0.0, 0.0), unit(1.0, 0.0, 0.0)] {
            let expected = a.overlaps(&b).then_some(0.0);
            assert_eq!(swept_aabb(&a, &b, zero), expected, "{b:?}");
        }
    }

    #[test]
    fn reports_the_entry_time() {
        let a = unit(0.0, 0.0, 0.0);
        let b = unit(3.0, 0.0, 0.0);
        // Gap of 2 units, covering 4 per step.
        let t = swept_aabb(&a, &b, Vector3::new(4.0, 0.0, 0.0)).unwrap();
        assert!((t - 0.5).abs() < 1e-6);
    }

    #[test]
    fn misses_when_too_slow_or_moving_away() {
        let a = unit(0.0, 0.0, 0.0);
        let b = unit(3.0, 0.0, 0.0);
        assert_eq!(swept_aabb(&a, &b, Vector3::new(1.0, 0.0, 0.0)), None);
        assert_eq!(swept_aabb(&a, &b, Vector3::new(-4.0, 0.0, 0.0)), None);
        // Passes above it.
        assert_eq!(swept_aabb(&a, &unit(3.0, 2.0, 0.0), Vector3::new(4.0, 0.0, 0.0)), None);
    }

    #[test]
    fn already_overlapping_is_time_zero() {
        let a = unit(0.0, 0.0, 0.0);
        let b = unit(0.5, 0.0, 0.0);
        assert_eq!(swept_aabb(&a, &b, Vector3::new(0.0, -3.0, 0.0)), Some(0.0));
    }

    #[test]
    fn touching_counts_only_when_moving_into_the_target() {
        let a = unit(0.0, 0.0, 0.0);
        let b = unit(1.0, 0.0, 0.0);
        assert_eq!(swept_aabb(&a, &b, Vector3::new(2.0, 0.0, 0.0)), Some(0.0));
        assert_eq!(swept_aabb(&a, &b, Vector3::new(-2.0, 0.0, 0.0)), None);
        // Sliding along the shared face.
        assert_eq!(swept_aabb(&a, &b, Vector3::new(0.0, 2.0, 0.0)), None);
    }

    #[test]
    fn catches_a_fast_body_tunnelling_through_a_floor() {
        let body = ColliderShape::cube(Vector3::new(1.0, 1.0, 1.0)).posed(Vector3::new(0.0, 5.0, 0.0));
        let floor = ColliderShape::voxels(vec![Vector3::new(0, 0, 0), Vector3::new(1, 0, 0)])
            .posed(Vector3::new(0.0, 0.0, 0.0));
        // Ends the step at y = -5, fully past the floor.
        let t = swept_shapes(&body, &floor, Vector3::new(0.0, -10.0, 0.0)).unwrap();
        assert!((t - 0.4).abs() < 1e-6);
    }
}
