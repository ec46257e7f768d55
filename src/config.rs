//! Scene and viewport configuration.
//!
//! Everything tunable is a named field rather than a buried constant; the
//! defaults describe the stock two-body scene.

use std::path::PathBuf;

use crate::vector::Vector3;

/// Initial conditions for one body, in plain data form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySpec {
    pub position: Vector3,
    pub velocity: Vector3,
    pub mass: f64,
    pub radius: f64,
}

/// Viewer configuration. `Default` gives an 800x600 viewport, a 1000 s
/// time step, a 16x16-band sphere proxy, and the two-body scene scaled by
/// 1e11 metres per view unit.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub width: u32,
    pub height: u32,
    /// Seconds advanced per `update()` call.
    pub time_step: f64,
    pub latitude_bands: u32,
    pub longitude_bands: u32,
    /// World metres per view-space unit, applied to positions and radii.
    pub world_scale: f64,
    /// Directory holding the two WGSL stage sources.
    pub shader_dir: PathBuf,
    pub bodies: Vec<BodySpec>,
}

impl ViewerConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            time_step: 1000.0,
            latitude_bands: 16,
            longitude_bands: 16,
            world_scale: 1e11,
            shader_dir: PathBuf::from("shaders"),
            bodies: default_scene(),
        }
    }
}

/// Central massive body at rest plus a lighter body offset along x with an
/// orthogonal velocity. Radii are display sizes, not derived from mass.
fn default_scene() -> Vec<BodySpec> {
    vec![
        BodySpec {
            position: Vector3::ZERO,
            velocity: Vector3::ZERO,
            mass: 1.0e24,
            radius: 1.0e10,
        },
        BodySpec {
            position: Vector3::new(1e11, 0.0, 0.0),
            velocity: Vector3::new(0.0, 30000.0, 0.0),
            mass: 1.0e22,
            radius: 4.0e9,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_viewer_constants() {
        let config = ViewerConfig::default();
        assert_eq!(config.width, 800);
        assert_eq!(config.height, 600);
        assert_eq!(config.time_step, 1000.0);
        assert_eq!(config.latitude_bands, 16);
        assert_eq!(config.longitude_bands, 16);
        assert_eq!(config.world_scale, 1e11);
        assert_eq!(config.bodies.len(), 2);
    }

    #[test]
    fn test_default_scene_central_body_at_rest() {
        let config = ViewerConfig::default();
        assert_eq!(config.bodies[0].position, Vector3::ZERO);
        assert_eq!(config.bodies[0].velocity, Vector3::ZERO);
        assert_eq!(config.bodies[1].velocity, Vector3::new(0.0, 30000.0, 0.0));
    }
}
