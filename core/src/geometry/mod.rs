//! Geometry

mod bounds2;
mod bounds3;
mod normal;
mod point2;
mod point3;
mod ray;
mod vector3;

// Re-export
pub use bounds2::*;
pub use bounds3::*;
pub use normal::*;
pub use point2::*;
pub use point3::*;
pub use ray::*;
pub use vector3::*;

use crate::pbrt::*;

/// Trait to support dot products with another type.
pub trait Dot<V> {
    /// The result of the dot product.
    type Output;

    /// Returns the dot product.
    ///
    /// * `other` - The other value.
    fn dot(&self, other: &V) -> Self::Output;

    /// Returns the absolute value of the dot product.
    ///
    /// * `other` - The other value.
    fn abs_dot(&self, other: &V) -> Self::Output;
}

/// Trait to flip a direction so it lies in the same hemisphere as another.
pub trait FaceForward<V>: Sized {
    /// Returns this value flipped, if needed, so that it points into the same
    /// hemisphere as `other`.
    ///
    /// * `other` - The reference direction.
    fn face_forward(&self, other: &V) -> Self;
}

/// Trait to support union operations.
pub trait Union<T> {
    /// Returns the union with another value.
    ///
    /// * `other` - The other value.
    fn union(&self, other: &T) -> Self;
}

/// Construct a local coordinate system given only a single normalized vector.
///
/// * `v1` - The normalized vector.
pub fn coordinate_system(v1: &Vector3f) -> (Vector3f, Vector3f) {
    let v2 = if abs(v1.x) > abs(v1.y) {
        Vector3f::new(-v1.z, 0.0, v1.x) / (v1.x * v1.x + v1.z * v1.z).sqrt()
    } else {
        Vector3f::new(0.0, v1.z, -v1.y) / (v1.y * v1.y + v1.z * v1.z).sqrt()
    };
    let v3 = v1.cross(&v2);
    (v2, v3)
}
