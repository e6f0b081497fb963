//! # Transform
//!
//! Position, rotation and scale of a game object, plus an optional weak link to
//! a parent transform. The model matrix is always recomputed through the parent
//! chain, so edits to a parent show up in its children immediately.

use cgmath::{Deg, Matrix4, Vector3, Vector4, Zero};
use serde::{Deserialize, Serialize};

use crate::{
    core::{MtResource, MtWeak},
    error::{EngineError, EngineResult},
};

/// A transform shared between its game object, colliders, children and the
/// chunk streamer.
pub type SharedTransform = MtResource<Transform>;

/// Model-space placement of a game object.
///
/// Rotation holds Euler angles in degrees and is applied X, then Y, then Z.
/// Nothing clamps or wraps it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
    #[serde(skip)]
    parent: Option<MtWeak<Transform>>,
}

impl PartialEq for MtWeak<Transform> {
    fn eq(&self, other: &Self) -> bool {
        match (self.upgrade(), other.upgrade()) {
            (Some(a), Some(b)) => a.ptr_eq(&b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::zero(),
            rotation: Vector3::zero(),
            scale: Vector3::new(1.0, 1.0, 1.0),
            parent: None,
        }
    }
}

impl Transform {
    /// A transform at `position` with no rotation and unit scale.
    pub fn at(position: Vector3<f32>) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Moves by `delta`. Repeated calls accumulate.
    pub fn translate(&mut self, delta: Vector3<f32>) {
        self.position += delta;
    }

    /// Adds `delta` degrees to each Euler angle.
    pub fn rotate(&mut self, delta: Vector3<f32>) {
        self.rotation += delta;
    }

    /// Adds `delta` to the scale (additive, not multiplicative).
    pub fn scale_by(&mut self, delta: Vector3<f32>) {
        self.scale += delta;
    }

    /// Replaces the local position outright.
    pub fn set_local_position(&mut self, position: Vector3<f32>) {
        self.position = position;
    }

    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    pub fn clear_parent(&mut self) {
        self.parent = None;
    }

    /// Local matrix: translation, then rotation X, Y, Z, then scale.
    pub fn local_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_x(Deg(self.rotation.x))
            * Matrix4::from_angle_y(Deg(self.rotation.y))
            * Matrix4::from_angle_z(Deg(self.rotation.z))
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

impl MtResource<Transform> {
    /// Creates a shared transform at `position`.
    pub fn at(position: Vector3<f32>) -> Self {
        MtResource::new(Transform::at(position))
    }

    /// Composes the model matrix through every live ancestor.
    ///
    /// Each level's lock is released before moving to its parent. A parent that
    /// has been dropped ends the chain, leaving the remaining local space.
    pub fn model_matrix(&self) -> Matrix4<f32> {
        let (mut matrix, mut parent) = {
            let transform = self.get();
            (transform.local_matrix(), transform.parent.clone())
        };

        while let Some(link) = parent.take() {
            let Some(ancestor) = link.upgrade() else {
                break;
            };
            let ancestor = ancestor.get();
            matrix = ancestor.local_matrix() * matrix;
            parent = ancestor.parent.clone();
        }

        matrix
    }

    /// World-space origin of this transform.
    pub fn world_position(&self) -> Vector3<f32> {
        if !self.get().has_parent() {
            return self.get().position;
        }
        (self.model_matrix() * Vector4::unit_w()).truncate()
    }

    /// Links this transform under `parent`.
    ///
    /// Fails with [`EngineError::HierarchyCycle`] if `parent` is this transform
    /// or already one of its descendants.
    pub fn set_parent(&self, parent: &SharedTransform) -> EngineResult<()> {
        let mut cursor = Some(parent.clone());
        while let Some(current) = cursor {
            if current.ptr_eq(self) {
                return Err(EngineError::HierarchyCycle);
            }
            cursor = current.get().parent.as_ref().and_then(MtWeak::upgrade);
        }

        self.get_mut().parent = Some(parent.downgrade());
        Ok(())
    }

    /// Whether `parent` is the direct parent of this transform.
    pub fn is_child_of(&self, parent: &SharedTransform) -> bool {
        self.get()
            .parent
            .as_ref()
            .is_some_and(|link| link.points_to(parent))
    }
}
