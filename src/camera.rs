use glam::{Mat4, Vec3};

/// First-person camera with a single yaw heading.
///
/// The look target is never stored; it is derived from `eye` and `yaw`
/// every time it is needed, so the camera always looks along its heading
/// no matter how it has been translated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub up: Vec3,
    /// Heading in degrees. Zero faces down the negative Z axis.
    pub yaw: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(-2.0, 1.0, 8.0),
            up: Vec3::Y,
            yaw: 0.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the point exactly one unit ahead of `eye` along the heading.
    pub fn look_target(&self) -> Vec3 {
        move_forward(self.eye, self.yaw, 1.0)
    }

    /// Builds the view matrix from the derived look target.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.look_target(), self.up)
    }
}

/// Displaces `pos` along the heading's forward axis by a signed `distance`.
pub fn move_forward(pos: Vec3, yaw_degrees: f32, distance: f32) -> Vec3 {
    let yaw = yaw_degrees.to_radians();
    Vec3::new(
        pos.x + distance * yaw.sin(),
        pos.y,
        pos.z - distance * yaw.cos(),
    )
}

/// Displaces `pos` along the heading's right axis by a signed `distance`.
pub fn move_strafe(pos: Vec3, yaw_degrees: f32, distance: f32) -> Vec3 {
    let yaw = yaw_degrees.to_radians();
    Vec3::new(
        pos.x + distance * yaw.cos(),
        pos.y,
        pos.z + distance * yaw.sin(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn look_target_is_one_unit_ahead() {
        for yaw in [0.0_f32, 37.5, 90.0, 180.0, -45.0] {
            let camera = Camera {
                eye: Vec3::new(3.0, 2.0, -7.0),
                up: Vec3::Y,
                yaw,
            };
            let target = camera.look_target();
            assert!((target.distance(camera.eye) - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn zero_yaw_faces_negative_z() {
        let moved = move_forward(Vec3::ZERO, 0.0, 2.0);
        assert!(moved.abs_diff_eq(Vec3::new(0.0, 0.0, -2.0), 1e-6));
        let strafed = move_strafe(Vec3::ZERO, 0.0, 2.0);
        assert!(strafed.abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn negative_distance_reverses_direction() {
        let forward = move_forward(Vec3::ZERO, 30.0, 0.5);
        let backward = move_forward(Vec3::ZERO, 30.0, -0.5);
        assert!((forward + backward).abs_diff_eq(Vec3::ZERO, 1e-6));
    }

    #[test]
    fn movement_never_changes_height() {
        let pos = Vec3::new(1.0, 4.0, 1.0);
        assert_eq!(move_forward(pos, 77.0, 3.0).y, 4.0);
        assert_eq!(move_strafe(pos, 77.0, 3.0).y, 4.0);
    }

    #[test]
    fn view_matrix_places_eye_at_origin() {
        let camera = Camera::new();
        let view = camera.view_matrix();
        let eye_in_view = view * camera.eye.extend(1.0);
        assert!(eye_in_view.truncate().abs_diff_eq(Vec3::ZERO, 1e-5));
    }
}
