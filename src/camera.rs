// Free camera for the demo

use glam::Vec3;

use crate::math::{look_at_matrix, Matrix4};

/// A free camera described by a position and a viewing direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub view_dir: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            view_dir: Vec3::NEG_Z,
        }
    }
}

impl Camera {
    /// Camera on the +Z axis looking at the origin.
    pub fn at_distance(distance: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, distance),
            view_dir: Vec3::NEG_Z,
        }
    }

    pub fn view_matrix(&self) -> Matrix4 {
        look_at_matrix(self.position, self.view_dir, Vec3::Y)
    }

    fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = self.view_dir.normalize();
        let right = forward.cross(Vec3::Y).normalize();
        let up = right.cross(forward).normalize();
        (right, up, forward)
    }

    /// Slides the camera along its right and up vectors.
    pub fn pan(&mut self, x_dist: f32, y_dist: f32) {
        let (right, up, _) = self.basis();
        self.position += right * x_dist + up * y_dist;
    }

    /// Moves the camera along its viewing direction.
    pub fn dolly(&mut self, dist: f32) {
        let (_, _, forward) = self.basis();
        self.position += forward * dist;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use glam::Vec4;

    #[test]
    fn pan_moves_in_screen_plane() {
        let mut camera = Camera::default();
        camera.pan(1.0, -2.0);
        assert_abs_diff_eq!(camera.position.x, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(camera.position.y, -2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(camera.position.z, 5.0, epsilon = 1e-6);
    }

    #[test]
    fn dolly_approaches_origin() {
        let mut camera = Camera::at_distance(5.0);
        camera.dolly(2.0);
        assert_abs_diff_eq!(camera.position.z, 3.0, epsilon = 1e-6);

        let origin = camera.view_matrix().transform_point(Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert_abs_diff_eq!(origin.z, -3.0, epsilon = 1e-6);
    }
}
