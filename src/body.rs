//! Simulated point mass with a rendered radius.

use crate::vector::Vector3;

/// A body advances in a straight line at constant velocity; there is no
/// force model. Mass and radius are fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    position: Vector3,
    velocity: Vector3,
    mass: f64,
    radius: f64,
}

impl Body {
    /// The radius is a scene-supplied display size in world units; no
    /// mass-to-radius formula is applied.
    pub fn new(position: Vector3, velocity: Vector3, mass: f64, radius: f64) -> Self {
        Self {
            position,
            velocity,
            mass,
            radius,
        }
    }

    /// Advance the position by one time step: `position += velocity * dt`.
    pub fn integrate(&mut self, dt: f64) {
        self.position = self.position + self.velocity * dt;
    }

    pub fn position(&self) -> Vector3 {
        self.position
    }

    pub fn velocity(&self) -> Vector3 {
        self.velocity
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrate_moves_by_velocity_times_dt() {
        let mut body = Body::new(
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(10.0, -20.0, 30.0),
            5.0,
            0.5,
        );
        body.integrate(0.5);
        assert_eq!(body.position(), Vector3::new(6.0, -8.0, 18.0));
    }

    #[test]
    fn test_integrate_leaves_velocity_and_mass_unchanged() {
        let velocity = Vector3::new(0.0, 30000.0, 0.0);
        let mut body = Body::new(Vector3::new(1e11, 0.0, 0.0), velocity, 1e22, 4e9);
        body.integrate(1000.0);
        assert_eq!(body.velocity(), velocity);
        assert_eq!(body.mass(), 1e22);
        assert_eq!(body.radius(), 4e9);
    }
}
