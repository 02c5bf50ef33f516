//! 2D vector primitives
//!
//! Vectors are plain `glam::DVec2` values. The extension trait only adds the
//! two operations glam spells differently from the rest of the kernel.

use glam::DVec2;

/// A 2D vector in double precision
pub type Vector = DVec2;

/// The zero vector
pub const VEC_ZERO: Vector = DVec2::ZERO;

/// Kernel-specific vector operations
pub trait VectorExt {
    /// Scalar z-component of the 3D cross product
    fn cross(self, other: Self) -> f64;

    /// Rotate counter-clockwise by `angle` radians about the origin
    fn rotated(self, angle: f64) -> Self;
}

impl VectorExt for DVec2 {
    #[inline]
    fn cross(self, other: Self) -> f64 {
        self.x * other.y - other.x * self.y
    }

    #[inline]
    fn rotated(self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        DVec2::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }
}
