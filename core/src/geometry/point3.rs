//! 3-D points

use crate::geometry::*;
use crate::pbrt::*;
use num_traits::{Num, Zero};
use std::ops::{Add, AddAssign, Div, Index, Mul, Sub, SubAssign};

/// A 3-D point containing numeric values.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point3<T> {
    /// X-coordinate.
    pub x: T,

    /// Y-coordinate.
    pub y: T,

    /// Z-coordinate.
    pub z: T,
}

/// 3-D point containing `Float` values.
pub type Point3f = Point3<Float>;
impl Point3f {
    /// Origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };
}

impl<T: Num + Copy> Point3<T> {
    /// Creates a new 3-D point.
    ///
    /// * `x` - X-coordinate.
    /// * `y` - Y-coordinate.
    /// * `z` - Z-coordinate.
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    /// Creates a new 3-D zero point.
    pub fn zero() -> Self
    where
        T: Zero,
    {
        Self::new(T::zero(), T::zero(), T::zero())
    }
}

impl<T: num_traits::Float> Point3<T> {
    /// Returns the distance to another point.
    ///
    /// * `other` - The other point.
    pub fn distance(self, other: Self) -> T {
        (self - other).length()
    }

    /// Returns the square of the distance to another point.
    ///
    /// * `other` - The other point.
    pub fn distance_squared(self, other: Self) -> T {
        (self - other).length_squared()
    }

    /// Linearly interpolate towards another point.
    ///
    /// * `other` - The other point.
    /// * `t`     - Interpolation parameter.
    pub fn lerp(self, other: Self, t: T) -> Self {
        self + (other - self) * t
    }
}

impl<T: Num + Copy> Add<Vector3<T>> for Point3<T> {
    type Output = Self;

    /// Offset the point by a vector.
    ///
    /// * `v` - The offset vector.
    fn add(self, v: Vector3<T>) -> Self::Output {
        Self::Output::new(self.x + v.x, self.y + v.y, self.z + v.z)
    }
}

impl<T: Num + Copy> AddAssign<Vector3<T>> for Point3<T> {
    /// Offset the point by a vector.
    ///
    /// * `v` - The offset vector.
    fn add_assign(&mut self, v: Vector3<T>) {
        *self = Self::new(self.x + v.x, self.y + v.y, self.z + v.z);
    }
}

impl<T: Num + Copy> Add for Point3<T> {
    type Output = Self;

    /// Adds the coordinates of another point. Useful for computing weighted
    /// sums of points.
    ///
    /// * `other` - The other point.
    fn add(self, other: Self) -> Self::Output {
        Self::Output::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl<T: Num + Copy> AddAssign for Point3<T> {
    /// Adds the coordinates of another point.
    ///
    /// * `other` - The other point.
    fn add_assign(&mut self, other: Self) {
        *self = Self::new(self.x + other.x, self.y + other.y, self.z + other.z);
    }
}

impl<T: Num + Copy> Sub for Point3<T> {
    type Output = Vector3<T>;

    /// Returns the vector from another point to this one.
    ///
    /// * `other` - The other point.
    fn sub(self, other: Self) -> Self::Output {
        Self::Output::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl<T: Num + Copy> Sub<Vector3<T>> for Point3<T> {
    type Output = Self;

    /// Offset the point backwards by a vector.
    ///
    /// * `v` - The offset vector.
    fn sub(self, v: Vector3<T>) -> Self::Output {
        Self::Output::new(self.x - v.x, self.y - v.y, self.z - v.z)
    }
}

impl<T: Num + Copy> SubAssign<Vector3<T>> for Point3<T> {
    /// Offset the point backwards by a vector.
    ///
    /// * `v` - The offset vector.
    fn sub_assign(&mut self, v: Vector3<T>) {
        *self = Self::new(self.x - v.x, self.y - v.y, self.z - v.z);
    }
}

impl<T: Num + Copy> Mul<T> for Point3<T> {
    type Output = Self;

    /// Scale the point's coordinates.
    ///
    /// * `f` - The scaling factor.
    fn mul(self, f: T) -> Self::Output {
        Self::Output::new(f * self.x, f * self.y, f * self.z)
    }
}

macro_rules! premul {
    ($t: ty) => {
        impl Mul<Point3<$t>> for $t {
            type Output = Point3<$t>;

            /// Scale the point's coordinates.
            ///
            /// * `p` - The point to scale.
            fn mul(self, p: Point3<$t>) -> Point3<$t> {
                p * self
            }
        }
    };
}
premul!(f32);
premul!(f64);

impl<T: Num + Copy> Div<T> for Point3<T> {
    type Output = Self;

    /// Scale the point's coordinates by `1/f`.
    ///
    /// * `f` - The scaling factor.
    fn div(self, f: T) -> Self::Output {
        debug_assert!(!f.is_zero());
        Self::Output::new(self.x / f, self.y / f, self.z / f)
    }
}

impl<T> Index<usize> for Point3<T> {
    type Output = T;

    /// Index the point by axis.
    ///
    /// * `i` - The axis (0, 1 or 2).
    fn index(&self, i: usize) -> &Self::Output {
        match i {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Invalid axis for std::Index on Point3<T>"),
        }
    }
}

impl<T: Num + Copy> From<Vector3<T>> for Point3<T> {
    /// Convert a vector to a point.
    ///
    /// * `v` - The vector.
    fn from(v: Vector3<T>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn distances() {
        let p1 = Point3f::new(0.0, 0.0, 0.0);
        let p2 = Point3f::new(3.0, 4.0, 0.0);
        assert!(approx_eq!(Float, p1.distance(p2), 5.0));
        assert!(approx_eq!(Float, p1.distance_squared(p2), 25.0));
    }

    #[test]
    fn lerp_midpoint() {
        let p1 = Point3f::new(0.0, 2.0, -2.0);
        let p2 = Point3f::new(2.0, 0.0, 2.0);
        assert_eq!(p1.lerp(p2, 0.5), Point3f::new(1.0, 1.0, 0.0));
    }
}
