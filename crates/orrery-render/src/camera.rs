//! Perspective camera with reverse-Z projection.

use crate::pipeline::CameraUniform;
use glam::{Mat3, Mat4, Quat, Vec3};

/// A perspective camera that generates view and projection matrices.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Position in world space.
    pub position: Vec3,
    /// Rotation as a unit quaternion.
    pub rotation: Quat,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width / height.
    pub aspect_ratio: f32,
    /// Near clip plane distance (always positive).
    pub near: f32,
    /// Far clip plane distance (always positive, > near).
    pub far: f32,
}

impl Camera {
    /// Compute the view matrix (inverse of camera transform).
    pub fn view_matrix(&self) -> Mat4 {
        let rotation_matrix = Mat4::from_quat(self.rotation);
        let translation_matrix = Mat4::from_translation(self.position);
        (translation_matrix * rotation_matrix).inverse()
    }

    /// Compute the projection matrix with reverse-Z.
    ///
    /// Near maps to z=1, far maps to z=0, which keeps most float precision
    /// where distant geometry (the starfield shell) lives. Implemented by
    /// swapping near/far in the standard perspective matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.far, self.near)
    }

    /// Compute the combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// The forward direction vector (-Z in camera space).
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Aim the camera at `target` with +Y as the up reference.
    pub fn look_at(&mut self, target: Vec3) {
        let forward = (target - self.position).normalize_or_zero();
        if forward == Vec3::ZERO {
            return;
        }
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        // Degenerate when looking straight up or down; keep the old rotation.
        if right == Vec3::ZERO {
            return;
        }
        let camera_up = right.cross(forward);
        self.rotation = Quat::from_mat3(&Mat3::from_cols(right, camera_up, -forward));
    }

    /// Update the aspect ratio after a viewport resize.
    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        self.aspect_ratio = width / height;
    }

    /// Convert the camera to a uniform suitable for GPU upload.
    pub fn to_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_projection_matrix().to_cols_array_2d(),
            camera_pos: [self.position.x, self.position.y, self.position.z, 0.0],
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            fov_y: std::f32::consts::FRAC_PI_4, // 45 degrees
            aspect_ratio: 16.0 / 9.0,
            near: 0.1,
            far: 1500.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_4;

    #[test]
    fn test_identity_camera_looks_down_neg_z() {
        let camera = Camera::default();
        let forward = camera.forward();
        assert!((forward.x).abs() < 1e-6);
        assert!((forward.y).abs() < 1e-6);
        assert!((forward.z + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_default_frustum_parameters() {
        let camera = Camera::default();
        assert!((camera.fov_y - FRAC_PI_4).abs() < 1e-6);
        assert_eq!(camera.near, 0.1);
        assert_eq!(camera.far, 1500.0);
    }

    #[test]
    fn test_set_aspect_ratio() {
        let mut camera = Camera::default();
        camera.set_aspect_ratio(1920.0, 1080.0);
        assert!((camera.aspect_ratio - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_look_at_origin_from_orbit() {
        let mut camera = Camera {
            position: Vec3::new(0.0, 0.0, -5.0),
            ..Camera::default()
        };
        camera.look_at(Vec3::ZERO);
        let forward = camera.forward();
        // Forward must point from the camera toward the origin (+Z here).
        assert!((forward - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_look_at_keeps_rotation_normalized() {
        let mut camera = Camera {
            position: Vec3::new(-0.8, 0.0, -4.2),
            ..Camera::default()
        };
        camera.look_at(Vec3::ZERO);
        assert!((camera.rotation.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_look_at_self_is_noop() {
        let mut camera = Camera {
            position: Vec3::new(1.0, 2.0, 3.0),
            ..Camera::default()
        };
        let before = camera.rotation;
        camera.look_at(camera.position);
        assert_eq!(camera.rotation, before);
    }

    #[test]
    fn test_view_matrix_inverse_is_camera_transform() {
        let camera = Camera {
            position: Vec3::new(10.0, 20.0, 30.0),
            rotation: Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            ..Camera::default()
        };
        let inv_view = camera.view_matrix().inverse();
        let reconstructed_pos = inv_view.col(3).truncate();
        assert!((reconstructed_pos - camera.position).length() < 1e-4);
    }

    #[test]
    fn test_reverse_z_depth_ordering() {
        let camera = Camera::default();
        let proj = camera.projection_matrix();

        // Reverse-Z: a near point maps to higher NDC depth than a far point.
        let near_point = proj * glam::Vec4::new(0.0, 0.0, -0.5, 1.0);
        let far_point = proj * glam::Vec4::new(0.0, 0.0, -1000.0, 1.0);
        let near_depth = near_point.z / near_point.w;
        let far_depth = far_point.z / far_point.w;
        assert!(
            near_depth > far_depth,
            "near {near_depth} must exceed far {far_depth} with reverse-Z"
        );
    }

    #[test]
    fn test_camera_uniform_carries_position() {
        let camera = Camera {
            position: Vec3::new(1.0, 2.0, 3.0),
            ..Camera::default()
        };
        let uniform = camera.to_uniform();
        assert_eq!(uniform.camera_pos, [1.0, 2.0, 3.0, 0.0]);
    }
}
