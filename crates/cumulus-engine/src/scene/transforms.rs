use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Camera and projection parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraParams {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Initial distance between the eye and the cloud center.
    pub distance: f32,
    /// Zoom never moves the eye closer than this.
    pub min_distance: f32,
    /// Distance at which markers are drawn at their base size.
    pub reference_distance: f32,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 1.0,
            far: 1000.0,
            distance: 5.0,
            min_distance: 2.0,
            reference_distance: 5.0,
        }
    }
}

/// Model, view and projection matrices.
///
/// Each matrix has exactly one owner in `CloudScene`: the timer rebuilds
/// `model`, zoom rebuilds `view`, resize rebuilds `projection`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transforms {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
}

impl Default for Transforms {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        }
    }
}

/// Rotation by `theta` degrees about Z, then `phi` degrees about Y.
pub fn model_matrix(theta_degrees: f32, phi_degrees: f32) -> Mat4 {
    let phi = Mat4::from_rotation_y(phi_degrees.to_radians());
    let theta = Mat4::from_rotation_z(theta_degrees.to_radians());
    phi * theta
}

/// Moves the world `distance` units away from the eye along -Z.
pub fn view_matrix(distance: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(0.0, 0.0, -distance))
}

/// Right-handed perspective with a `[0, 1]` depth range.
///
/// Degenerate sizes (minimized windows) fall back to a square aspect.
pub fn projection_matrix(camera: &CameraParams, width: f32, height: f32) -> Mat4 {
    let aspect = if width > 0.0 && height > 0.0 { width / height } else { 1.0 };
    Mat4::perspective_rh(camera.fov_degrees.to_radians(), aspect, camera.near, camera.far)
}

#[cfg(test)]
mod tests {
    use glam::Vec4;

    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn zero_angles_are_identity() {
        assert!(model_matrix(0.0, 0.0).abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn theta_rotates_about_z_first() {
        // 90° about Z takes +X to +Y; the Y rotation then leaves +Y alone.
        let m = model_matrix(90.0, 90.0);
        assert!(approx(m.transform_vector3(Vec3::X), Vec3::Y));
    }

    #[test]
    fn phi_rotates_about_y() {
        let m = model_matrix(0.0, 90.0);
        assert!(approx(m.transform_vector3(Vec3::X), -Vec3::Z));
    }

    #[test]
    fn view_pushes_origin_back() {
        let v = view_matrix(5.0);
        assert!(approx(v.transform_point3(Vec3::ZERO), Vec3::new(0.0, 0.0, -5.0)));
    }

    #[test]
    fn projection_maps_near_and_far_to_unit_depth() {
        let camera = CameraParams::default();
        let p = projection_matrix(&camera, 1000.0, 1000.0);

        let near = p * Vec4::new(0.0, 0.0, -camera.near, 1.0);
        let far = p * Vec4::new(0.0, 0.0, -camera.far, 1.0);
        assert!((near.z / near.w).abs() < 1e-5);
        assert!((far.z / far.w - 1.0).abs() < 1e-4);
    }

    #[test]
    fn projection_tracks_aspect() {
        let camera = CameraParams::default();
        let square = projection_matrix(&camera, 800.0, 800.0);
        let wide = projection_matrix(&camera, 1600.0, 800.0);
        // x scale halves when the window is twice as wide.
        assert!((wide.x_axis.x * 2.0 - square.x_axis.x).abs() < 1e-5);
        assert_eq!(wide.y_axis.y, square.y_axis.y);
    }

    #[test]
    fn zero_height_does_not_produce_nan() {
        let p = projection_matrix(&CameraParams::default(), 640.0, 0.0);
        assert!(!p.is_nan());
    }
}
