//! Double-precision 3-component vector for simulation state.
//!
//! Render math stays in `glam` f32; body positions and velocities live in
//! astronomical units of metres and need f64 to survive values around 1e11.

use std::ops::{Add, Mul, Sub};

/// Immutable-style 3-vector. Every operation returns a new value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Unit vector in the same direction. The zero vector has no direction,
    /// so it normalizes to itself rather than dividing by zero.
    pub fn normalized(&self) -> Self {
        let mag = self.magnitude();
        if mag == 0.0 {
            return Self::ZERO;
        }
        Self::new(self.x / mag, self.y / mag, self.z / mag)
    }
}

impl Add for Vector3 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Vector3 {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Mul<f64> for Vector3 {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self {
        Self::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_constant() {
        assert_eq!(Vector3::ZERO, Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(Vector3::default(), Vector3::ZERO);
    }

    #[test]
    fn test_magnitude() {
        let v = Vector3::new(3.0, 4.0, 0.0);
        assert_eq!(v.magnitude(), 5.0);
    }

    #[test]
    fn test_zero_vector_normalizes_to_zero() {
        assert_eq!(Vector3::ZERO.normalized(), Vector3::ZERO);
    }
}
