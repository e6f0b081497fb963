//! # Camera
//!
//! The view a render pass is drawn from. The core only carries it through to
//! the renderer; it never reads the matrix itself.

use cgmath::{perspective, Deg, InnerSpace, Matrix4, Point3, Rad, Vector3};

/// Vertical field of view used by [`Camera::first_person`].
pub const FIELD_OF_VIEW: Deg<f32> = Deg(45.0);
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 1000.0;

/// Position plus combined view-projection matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub view_projection: Matrix4<f32>,
}

impl Camera {
    /// A camera at `position` facing along `yaw`/`pitch` (yaw 0 looks down +X).
    pub fn first_person<Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: Point3<f32>,
        yaw: Y,
        pitch: P,
        aspect: f32,
    ) -> Self {
        let (yaw, pitch) = (yaw.into(), pitch.into());
        let (yaw_sin, yaw_cos) = yaw.0.sin_cos();
        let (pitch_sin, pitch_cos) = pitch.0.sin_cos();
        let forward = Vector3::new(yaw_cos * pitch_cos, pitch_sin, yaw_sin * pitch_cos).normalize();

        let view = Matrix4::look_to_rh(position, forward, Vector3::unit_y());
        let projection = perspective(FIELD_OF_VIEW, aspect, Z_NEAR, Z_FAR);

        Camera {
            position,
            view_projection: projection * view,
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Camera::first_person(Point3::new(0.0, 0.0, 0.0), Deg(0.0), Deg(0.0), 16.0 / 9.0)
    }
}
