//! Fixed camera: view pulled back along z, 45-degree perspective.

use glam::{Mat4, Vec3};

const FOV_Y_DEGREES: f32 = 45.0;
const NEAR_PLANE: f32 = 0.1;
const FAR_PLANE: f32 = 100.0;
const CAMERA_OFFSET: Vec3 = Vec3::new(0.0, 0.0, -3.0);

/// Immovable camera. Only the aspect ratio changes, tracking the viewport.
pub struct Camera {
    aspect_ratio: f32,
}

impl Camera {
    pub fn new(aspect_ratio: f32) -> Self {
        Self { aspect_ratio }
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    /// View matrix: the scene translated three units away from the eye.
    pub fn view(&self) -> Mat4 {
        Mat4::from_translation(CAMERA_OFFSET)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(
            FOV_Y_DEGREES.to_radians(),
            self.aspect_ratio,
            NEAR_PLANE,
            FAR_PLANE,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_is_pure_translation() {
        let camera = Camera::new(800.0 / 600.0);
        let view = camera.view();
        assert_eq!(view.w_axis.z, -3.0);
        assert_eq!(view.x_axis.x, 1.0);
    }

    #[test]
    fn test_projection_tracks_aspect_ratio() {
        let mut camera = Camera::new(800.0 / 600.0);
        let wide = camera.projection();
        camera.set_aspect_ratio(4.0 / 3.0);
        assert_eq!(camera.projection(), wide);
        camera.set_aspect_ratio(2.0);
        assert_ne!(camera.projection(), wide);
    }
}
