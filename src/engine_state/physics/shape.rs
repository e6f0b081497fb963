//! # Collision Shapes
//!
//! [`ColliderShape`] is what a collider is declared with: a box size or a set of
//! voxel offsets. Placing it at its owner's world position gives a
//! [`CollisionShape`], the value all pairwise tests work on.
//!
//! Boxes are always axis-aligned; the owner's rotation is ignored for
//! collision purposes.

use std::sync::Arc;

use cgmath::{InnerSpace, Vector3};
use serde::{Deserialize, Serialize};

/// Stable ordering of shape kinds used to normalize shape pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Box,
    VoxelMesh,
}

impl ShapeKind {
    pub fn rank(self) -> u8 {
        match self {
            ShapeKind::Box => 0,
            ShapeKind::VoxelMesh => 1,
        }
    }
}

/// A ray with a normalized direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vector3<f32>,
    pub direction: Vector3<f32>,
    pub max_distance: f32,
}

impl Ray {
    /// A ray of unlimited length. A zero `direction` stays zero and only hits
    /// shapes containing `origin`.
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        let direction = if direction.magnitude2() > 0.0 {
            direction.normalize()
        } else {
            direction
        };
        Ray {
            origin,
            direction,
            max_distance: f32::INFINITY,
        }
    }

    pub fn with_max_distance(mut self, max_distance: f32) -> Self {
        self.max_distance = max_distance;
        self
    }

    pub fn at(&self, distance: f32) -> Vector3<f32> {
        self.origin + self.direction * distance
    }
}

/// Axis-aligned box given by center and half extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vector3<f32>,
    pub half_extents: Vector3<f32>,
}

impl Aabb {
    pub fn new(center: Vector3<f32>, half_extents: Vector3<f32>) -> Self {
        Aabb {
            center,
            half_extents,
        }
    }

    /// The unit cube of a voxel centered at `center`.
    pub fn unit_cube(center: Vector3<f32>) -> Self {
        Aabb::new(center, Vector3::new(0.5, 0.5, 0.5))
    }

    pub fn min(&self) -> Vector3<f32> {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vector3<f32> {
        self.center + self.half_extents
    }

    pub fn translated(&self, delta: Vector3<f32>) -> Self {
        Aabb::new(self.center + delta, self.half_extents)
    }

    /// Strict overlap on all three axes; touching boxes do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let delta = self.center - other.center;
        let reach = self.half_extents + other.half_extents;
        delta.x.abs() < reach.x && delta.y.abs() < reach.y && delta.z.abs() < reach.z
    }

    /// Distance from `point` to the closest point of the box, zero inside.
    pub fn distance_to(&self, point: Vector3<f32>) -> f32 {
        let (min, max) = (self.min(), self.max());
        let outside = Vector3::new(
            (min.x - point.x).max(0.0).max(point.x - max.x),
            (min.y - point.y).max(0.0).max(point.y - max.y),
            (min.z - point.z).max(0.0).max(point.z - max.z),
        );
        outside.magnitude()
    }

    /// Distance along `ray` to the box, by the slab method. A ray starting
    /// inside hits at distance zero.
    pub fn ray_distance(&self, ray: &Ray) -> Option<f32> {
        let (min, max) = (self.min(), self.max());
        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            let (origin, direction) = (ray.origin[axis], ray.direction[axis]);
            if direction.abs() <= f32::EPSILON {
                if origin < min[axis] || origin > max[axis] {
                    return None;
                }
                continue;
            }
            let t1 = (min[axis] - origin) / direction;
            let t2 = (max[axis] - origin) / direction;
            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));
        }

        let entry = t_min.max(0.0);
        (t_max >= entry && entry <= ray.max_distance).then_some(entry)
    }
}

/// Voxel offsets of a mesh collider, with their bounds cached.
///
/// Serialized as a plain list of offsets; the order carries no meaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Vector3<i32>>", into = "Vec<Vector3<i32>>")]
pub struct VoxelCells {
    cells: Arc<[Vector3<i32>]>,
    min: Vector3<i32>,
    max: Vector3<i32>,
}

impl From<Vec<Vector3<i32>>> for VoxelCells {
    fn from(cells: Vec<Vector3<i32>>) -> Self {
        let mut min = Vector3::new(0, 0, 0);
        let mut max = Vector3::new(0, 0, 0);
        for (i, cell) in cells.iter().enumerate() {
            if i == 0 {
                min = *cell;
                max = *cell;
                continue;
            }
            min = Vector3::new(min.x.min(cell.x), min.y.min(cell.y), min.z.min(cell.z));
            max = Vector3::new(max.x.max(cell.x), max.y.max(cell.y), max.z.max(cell.z));
        }
        VoxelCells {
            cells: cells.into(),
            min,
            max,
        }
    }
}

impl From<VoxelCells> for Vec<Vector3<i32>> {
    fn from(cells: VoxelCells) -> Self {
        cells.cells.to_vec()
    }
}

impl VoxelCells {
    pub fn as_slice(&self) -> &[Vector3<i32>] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// What a collider is declared with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    /// Box of full size `size`, centered on the owner.
    Box { size: Vector3<f32> },
    /// Unit cubes centered at the owner's position plus each offset.
    VoxelMesh { cells: VoxelCells },
}

impl ColliderShape {
    pub fn cube(size: Vector3<f32>) -> Self {
        ColliderShape::Box { size }
    }

    pub fn voxels(cells: Vec<Vector3<i32>>) -> Self {
        ColliderShape::VoxelMesh {
            cells: cells.into(),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            ColliderShape::Box { .. } => ShapeKind::Box,
            ColliderShape::VoxelMesh { .. } => ShapeKind::VoxelMesh,
        }
    }

    /// Places the shape at world position `position`.
    pub fn posed(&self, position: Vector3<f32>) -> CollisionShape {
        match self {
            ColliderShape::Box { size } => CollisionShape::Box(Aabb::new(position, *size / 2.0)),
            ColliderShape::VoxelMesh { cells } => CollisionShape::VoxelMesh {
                origin: position,
                cells: cells.clone(),
            },
        }
    }
}

/// A shape placed in the world.
#[derive(Debug, Clone, PartialEq)]
pub enum CollisionShape {
    Box(Aabb),
    VoxelMesh {
        origin: Vector3<f32>,
        cells: VoxelCells,
    },
}

impl CollisionShape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            CollisionShape::Box(_) => ShapeKind::Box,
            CollisionShape::VoxelMesh { .. } => ShapeKind::VoxelMesh,
        }
    }

    pub fn translated(&self, delta: Vector3<f32>) -> Self {
        match self {
            CollisionShape::Box(aabb) => CollisionShape::Box(aabb.translated(delta)),
            CollisionShape::VoxelMesh { origin, cells } => CollisionShape::VoxelMesh {
                origin: *origin + delta,
                cells: cells.clone(),
            },
        }
    }

    /// World centers of the voxel cells; empty for a box.
    pub fn cell_centers(&self) -> impl Iterator<Item = Vector3<f32>> + '_ {
        let (origin, cells) = match self {
            CollisionShape::Box(_) => (Vector3::new(0.0, 0.0, 0.0), &[][..]),
            CollisionShape::VoxelMesh { origin, cells } => (*origin, cells.as_slice()),
        };
        cells
            .iter()
            .map(move |cell| origin + Vector3::new(cell.x as f32, cell.y as f32, cell.z as f32))
    }

    /// Smallest box containing the whole shape.
    pub fn bounds(&self) -> Aabb {
        match self {
            CollisionShape::Box(aabb) => *aabb,
            CollisionShape::VoxelMesh { origin, cells } => {
                let min = Vector3::new(cells.min.x as f32, cells.min.y as f32, cells.min.z as f32);
                let max = Vector3::new(cells.max.x as f32, cells.max.y as f32, cells.max.z as f32);
                let half_extents = (max - min) / 2.0 + Vector3::new(0.5, 0.5, 0.5);
                Aabb::new(*origin + (min + max) / 2.0, half_extents)
            }
        }
    }

    pub fn distance_to(&self, point: Vector3<f32>) -> f32 {
        self.bounds().distance_to(point)
    }

    /// Distance along `ray` to the nearest part of the shape.
    pub fn ray_distance(&self, ray: &Ray) -> Option<f32> {
        match self {
            CollisionShape::Box(aabb) => aabb.ray_distance(ray),
            CollisionShape::VoxelMesh { .. } => {
                self.bounds().ray_distance(ray)?;
                self.cell_centers()
                    .filter_map(|center| Aabb::unit_cube(center).ray_distance(ray))
                    .min_by(f32::total_cmp)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn touching_boxes_do_not_overlap() {
        let a = Aabb::unit_cube(Vector3::new(0.0, 0.0, 0.0));
        assert!(!a.overlaps(&Aabb::unit_cube(Vector3::new(1.0, 0.0, 0.0))));
        assert!(a.overlaps(&Aabb::unit_cube(Vector3::new(0.99, 0.2, -0.3))));
    }

    #[test]
    fn voxel_bounds_cover_every_cell() {
        let shape = ColliderShape::voxels(vec![Vector3::new(0, 0, 0), Vector3::new(2, -1, 3)])
            .posed(Vector3::new(10.0, 0.0, 0.0));
        let bounds = shape.bounds();
        assert_eq!(bounds.min(), Vector3::new(9.5, -1.5, -0.5));
        assert_eq!(bounds.max(), Vector3::new(12.5, 0.5, 3.5));
    }

    #[test]
    fn ray_hits_the_near_face() {
        let aabb = Aabb::unit_cube(Vector3::new(5.0, 0.0, 0.0));
        let ray = Ray::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(2.0, 0.0, 0.0));
        assert!(approx_eq(aabb.ray_distance(&ray).unwrap(), 4.5));
        assert_eq!(aabb.ray_distance(&ray.with_max_distance(4.0)), None);

        let away = Ray::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(-1.0, 0.0, 0.0));
        assert_eq!(aabb.ray_distance(&away), None);

        let inside = Ray::new(Vector3::new(5.2, 0.0, 0.0), Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(aabb.ray_distance(&inside), Some(0.0));
    }

    #[test]
    fn ray_picks_the_closest_voxel() {
        let shape = ColliderShape::voxels(vec![Vector3::new(3, 0, 0), Vector3::new(1, 0, 0)])
            .posed(Vector3::new(0.0, 0.0, 0.0));
        let ray = Ray::new(Vector3::new(-5.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
        assert!(approx_eq(shape.ray_distance(&ray).unwrap(), 5.5));
    }

    #[test]
    fn voxel_cells_serialize_as_a_list() {
        let shape = ColliderShape::voxels(vec![Vector3::new(1, 2, 3)]);
        let json = serde_json::to_string(&shape).unwrap();
        let back: ColliderShape = serde_json::from_str(&json).unwrap();
        assert_eq!(back, shape);
    }
}
