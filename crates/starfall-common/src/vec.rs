//! 2D vector math for positions, velocities, and trajectory evaluation.

use serde::{Deserialize, Serialize};

/// 2D vector for positions and directions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
}

impl Vec2 {
    /// Zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Unit vector pointing up (screen coordinates, -Y is up).
    pub const UP: Self = Self { x: 0.0, y: -1.0 };

    /// Unit vector pointing down.
    pub const DOWN: Self = Self { x: 0.0, y: 1.0 };

    /// Unit vector pointing left.
    pub const LEFT: Self = Self { x: -1.0, y: 0.0 };

    /// Unit vector pointing right.
    pub const RIGHT: Self = Self { x: 1.0, y: 0.0 };

    /// Creates a new Vec2.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the length (magnitude) of the vector.
    #[must_use]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Returns the squared length, avoiding the square root.
    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Returns a normalized (unit length) version of the vector.
    /// Returns zero vector if the vector has zero length.
    #[must_use]
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self {
                x: self.x / len,
                y: self.y / len,
            }
        } else {
            Self::ZERO
        }
    }

    /// Dot product of two vectors.
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Distance between two points.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }

    /// Unit vector for a heading given in degrees.
    #[must_use]
    pub fn from_degrees(degrees: f32) -> Self {
        Self::from_radians(degrees.to_radians())
    }

    /// Unit vector for an angle given in radians.
    #[must_use]
    pub fn from_radians(radians: f32) -> Self {
        Self {
            x: radians.cos(),
            y: radians.sin(),
        }
    }

    /// Angle of the vector in degrees.
    #[must_use]
    pub fn to_degrees(self) -> f32 {
        self.y.atan2(self.x).to_degrees()
    }

    /// Perpendicular vector (rotated 90 degrees counter-clockwise in screen space).
    #[must_use]
    pub fn perp(self) -> Self {
        Self {
            x: -self.y,
            y: self.x,
        }
    }

    /// Rotates the vector by an angle in radians.
    #[must_use]
    pub fn rotated(self, radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    /// Linear interpolation between two points.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl std::ops::Div<f32> for Vec2 {
    type Output = Self;

    fn div(self, scalar: f32) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
        }
    }
}

impl std::ops::Neg for Vec2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl std::ops::SubAssign for Vec2 {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

impl std::ops::MulAssign<f32> for Vec2 {
    fn mul_assign(&mut self, scalar: f32) {
        self.x *= scalar;
        self.y *= scalar;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_ops() {
        let a = Vec2::new(3.0, 4.0);
        let b = Vec2::new(1.0, 2.0);

        assert_eq!(a + b, Vec2::new(4.0, 6.0));
        assert_eq!(a - b, Vec2::new(2.0, 2.0));
        assert_eq!(a * 2.0, Vec2::new(6.0, 8.0));
        assert_eq!(-a, Vec2::new(-3.0, -4.0));
        assert!((a.length() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalized_zero_vector() {
        assert_eq!(Vec2::ZERO.normalized(), Vec2::ZERO);
    }

    #[test]
    fn test_heading_round_trip() {
        let v = Vec2::from_degrees(90.0);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
        assert!((v.to_degrees() - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_rotated_quarter_turn() {
        let v = Vec2::RIGHT.rotated(std::f32::consts::FRAC_PI_2);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Vec2::new(10.0, -5.0);
        let b = Vec2::new(-2.0, 7.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
    }

    proptest::proptest! {
        #[test]
        fn prop_rotation_preserves_length(x in -1000.0f32..1000.0, y in -1000.0f32..1000.0, angle in -10.0f32..10.0) {
            let v = Vec2::new(x, y);
            let rotated = v.rotated(angle);
            proptest::prop_assert!((rotated.length() - v.length()).abs() < 1e-2);
        }

        #[test]
        fn prop_normalized_is_unit_length(x in -1000.0f32..1000.0, y in -1000.0f32..1000.0) {
            let v = Vec2::new(x, y);
            proptest::prop_assume!(v.length() > 1e-3);
            proptest::prop_assert!((v.normalized().length() - 1.0).abs() < 1e-4);
        }
    }
}
