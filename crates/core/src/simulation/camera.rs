//! Orbit camera state for renderers
//!
//! The camera never touches solver state. It orbits the origin: a fixed eye
//! on the +z axis at `distance`, with the scene rotated by pitch about x and
//! then by yaw about y.

use nalgebra::{Matrix4, Perspective3, Point3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

/// Pitch limit in degrees
pub const MAX_PITCH_DEG: f32 = 85.0;

/// Allowed eye distance range
pub const DISTANCE_RANGE: (f32, f32) = (0.5, 15.0);

/// Vertical field of view of [`CameraState::projection_matrix`], in degrees
pub const FIELD_OF_VIEW_DEG: f32 = 45.0;

/// Near and far clip planes of [`CameraState::projection_matrix`]
pub const CLIP_PLANES: (f32, f32) = (0.1, 100.0);

/// Orbit camera
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    /// Pitch in degrees, clamped to `±MAX_PITCH_DEG`
    pub rot_x_deg: f32,
    /// Yaw in degrees, wrapped into `[0, 360)`
    pub rot_y_deg: f32,
    /// Eye distance from the origin
    pub distance: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            rot_x_deg: 30.0,
            rot_y_deg: 45.0,
            distance: 3.0,
        }
    }
}

impl CameraState {
    /// Add `delta_x` to yaw and `delta_y` to pitch (degrees)
    ///
    /// Non-finite deltas are ignored per axis.
    pub fn rotate(&mut self, delta_x: f32, delta_y: f32) {
        if delta_x.is_finite() {
            self.rot_y_deg = (self.rot_y_deg + delta_x).rem_euclid(360.0);
        }
        if delta_y.is_finite() {
            self.rot_x_deg = (self.rot_x_deg + delta_y).clamp(-MAX_PITCH_DEG, MAX_PITCH_DEG);
        }
    }

    /// Move the eye by `delta`, keeping it inside `DISTANCE_RANGE`
    ///
    /// A non-finite `delta` is ignored.
    pub fn zoom(&mut self, delta: f32) {
        if delta.is_finite() {
            self.distance = (self.distance + delta).clamp(DISTANCE_RANGE.0, DISTANCE_RANGE.1);
        }
    }

    fn scene_rotation(&self) -> Rotation3<f32> {
        let pitch = Rotation3::from_axis_angle(&Vector3::x_axis(), self.rot_x_deg.to_radians());
        let yaw = Rotation3::from_axis_angle(&Vector3::y_axis(), self.rot_y_deg.to_radians());
        pitch * yaw
    }

    /// World-to-view transform
    pub fn view_matrix(&self) -> Matrix4<f32> {
        let look = Matrix4::look_at_rh(
            &Point3::new(0.0, 0.0, self.distance),
            &Point3::origin(),
            &Vector3::y(),
        );
        look * self.scene_rotation().to_homogeneous()
    }

    /// Perspective projection for a viewport of the given aspect ratio
    pub fn projection_matrix(&self, aspect: f32) -> Matrix4<f32> {
        Perspective3::new(
            aspect,
            FIELD_OF_VIEW_DEG.to_radians(),
            CLIP_PLANES.0,
            CLIP_PLANES.1,
        )
        .to_homogeneous()
    }

    /// Eye position in world coordinates
    pub fn eye_position(&self) -> Point3<f32> {
        self.scene_rotation().inverse() * Point3::new(0.0, 0.0, self.distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let camera = CameraState::default();
        assert_eq!(camera.rot_x_deg, 30.0);
        assert_eq!(camera.rot_y_deg, 45.0);
        assert_eq!(camera.distance, 3.0);
    }

    #[test]
    fn test_pitch_clamped() {
        let mut camera = CameraState::default();
        camera.rotate(10.0, 200.0);
        assert_eq!(camera.rot_x_deg, 85.0);
        assert_eq!(camera.rot_y_deg, 55.0);
        camera.rotate(0.0, -500.0);
        assert_eq!(camera.rot_x_deg, -85.0);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut camera = CameraState::default();
        camera.zoom(-10.0);
        assert_eq!(camera.distance, 0.5);
        camera.zoom(100.0);
        assert_eq!(camera.distance, 15.0);
        camera.zoom(-0.2);
        assert_relative_eq!(camera.distance, 14.8);
    }

    #[test]
    fn test_non_finite_deltas_ignored() {
        let mut camera = CameraState::default();
        camera.rotate(f32::INFINITY, f32::NAN);
        camera.zoom(f32::NAN);
        assert_eq!(camera, CameraState::default());

        // Later valid input still moves the camera
        camera.rotate(0.0, 10.0);
        camera.zoom(1.0);
        assert_eq!(camera.rot_x_deg, 40.0);
        assert_eq!(camera.distance, 4.0);
        assert!(camera.view_matrix().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_yaw_wraps() {
        let mut camera = CameraState::default();
        camera.rotate(350.0, 0.0);
        assert_relative_eq!(camera.rot_y_deg, 35.0);
        camera.rotate(-40.0, 0.0);
        assert_relative_eq!(camera.rot_y_deg, 355.0);
    }

    #[test]
    fn test_eye_maps_to_view_origin_axis() {
        let camera = CameraState::default();
        let eye = camera.eye_position();
        assert_relative_eq!(eye.coords.norm(), camera.distance, epsilon = 1e-5);

        // The eye sits at the view-space origin
        let in_view = camera.view_matrix().transform_point(&eye);
        assert_relative_eq!(in_view.coords.norm(), 0.0, epsilon = 1e-5);
    }
}
