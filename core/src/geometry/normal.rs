//! 3-D normals

use crate::geometry::*;
use crate::pbrt::*;
use num_traits::{Num, Zero};
use std::ops::{Add, AddAssign, Mul, Neg};

/// A 3-D normal containing numeric values.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Normal3<T> {
    /// X-coordinate.
    pub x: T,

    /// Y-coordinate.
    pub y: T,

    /// Z-coordinate.
    pub z: T,
}

/// 3-D normal containing `Float` values.
pub type Normal3f = Normal3<Float>;
impl Normal3f {
    /// Zero normal.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };
}

impl<T: Num + Copy> Normal3<T> {
    /// Creates a new 3-D normal.
    ///
    /// * `x` - X-coordinate.
    /// * `y` - Y-coordinate.
    /// * `z` - Z-coordinate.
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    /// Creates a new 3-D zero normal.
    pub fn zero() -> Self
    where
        T: Zero,
    {
        Self::new(T::zero(), T::zero(), T::zero())
    }

    /// Returns the square of the normal's length.
    pub fn length_squared(&self) -> T {
        self.x * self.x + self.y * self.y + self.z * self.z
    }
}

impl<T: num_traits::Float> Normal3<T> {
    /// Returns the normal's length.
    pub fn length(&self) -> T {
        self.length_squared().sqrt()
    }

    /// Returns the unit normal.
    pub fn normalize(&self) -> Self {
        let l = self.length();
        Self::new(self.x / l, self.y / l, self.z / l)
    }
}

impl<T: Num + Neg<Output = T> + PartialOrd + Copy> Dot<Normal3<T>> for Normal3<T> {
    type Output = T;

    /// Returns the dot product with another normal.
    ///
    /// * `other` - The other normal.
    fn dot(&self, other: &Self) -> T {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Returns the absolute value of the dot product with another normal.
    ///
    /// * `other` - The other normal.
    fn abs_dot(&self, other: &Self) -> T {
        abs(self.dot(other))
    }
}

impl<T: Num + Neg<Output = T> + PartialOrd + Copy> Dot<Vector3<T>> for Normal3<T> {
    type Output = T;

    /// Returns the dot product with a vector.
    ///
    /// * `other` - The vector.
    fn dot(&self, other: &Vector3<T>) -> T {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Returns the absolute value of the dot product with a vector.
    ///
    /// * `other` - The vector.
    fn abs_dot(&self, other: &Vector3<T>) -> T {
        abs(self.dot(other))
    }
}

impl<T: Num + Neg<Output = T> + PartialOrd + Copy> FaceForward<Vector3<T>> for Normal3<T> {
    /// Returns this normal flipped, if needed, so that it points into the same
    /// hemisphere as a vector.
    ///
    /// * `other` - The vector.
    fn face_forward(&self, other: &Vector3<T>) -> Self {
        if self.dot(other) < T::zero() {
            -*self
        } else {
            *self
        }
    }
}

impl<T: Num + Copy> Add for Normal3<T> {
    type Output = Self;

    /// Adds the given normal.
    ///
    /// * `other` - The normal to add.
    fn add(self, other: Self) -> Self::Output {
        Self::Output::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl<T: Num + Copy> AddAssign for Normal3<T> {
    /// Performs the `+=` operation.
    ///
    /// * `other` - The normal to add.
    fn add_assign(&mut self, other: Self) {
        *self = Self::new(self.x + other.x, self.y + other.y, self.z + other.z);
    }
}

impl<T: Num + Copy> Mul<T> for Normal3<T> {
    type Output = Self;

    /// Scale the normal.
    ///
    /// * `f` - The scaling factor.
    fn mul(self, f: T) -> Self::Output {
        Self::Output::new(f * self.x, f * self.y, f * self.z)
    }
}

impl<T: Num + Neg<Output = T>> Neg for Normal3<T> {
    type Output = Self;

    /// Flip the normal's direction.
    fn neg(self) -> Self::Output {
        Self::Output {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl<T: Num + Copy> From<Vector3<T>> for Normal3<T> {
    /// Convert a vector to a normal.
    ///
    /// * `v` - The vector.
    fn from(v: Vector3<T>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_forward_against_vector() {
        let n = Normal3f::new(0.0, 1.0, 0.0);
        let wo = Vector3f::new(0.0, -1.0, 0.0);
        assert_eq!(n.face_forward(&wo), Normal3f::new(0.0, -1.0, 0.0));
    }
}
