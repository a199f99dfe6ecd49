//! 3-D Axis Aligned Bounding Boxes.

use crate::geometry::*;
use crate::pbrt::*;
use num_traits::{Bounded, Num};

/// 3-D Axis Aligned Bounding Box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds3<T> {
    /// Minimum bounds.
    pub p_min: Point3<T>,

    /// Maximum bounds.
    pub p_max: Point3<T>,
}

/// 3-D bounding box containing `Float` points.
pub type Bounds3f = Bounds3<Float>;

impl<T: Num + PartialOrd + Copy> Bounds3<T> {
    /// Creates a new 3-D bounding box from 2 points. The minimum and maximum
    /// bounds are used for each coordinate axis.
    ///
    /// * `p1` - First point.
    /// * `p2` - Second point.
    pub fn new(p1: Point3<T>, p2: Point3<T>) -> Self {
        Self {
            p_min: Point3::new(min(p1.x, p2.x), min(p1.y, p2.y), min(p1.z, p2.z)),
            p_max: Point3::new(max(p1.x, p2.x), max(p1.y, p2.y), max(p1.z, p2.z)),
        }
    }

    /// Returns an empty bounding box where minimum and maximum bounds are
    /// the maximum and minimum values of the type's limits. This way it can
    /// be grown from nothing iteratively via unions.
    pub fn empty() -> Self
    where
        T: Bounded,
    {
        Self {
            p_min: Point3::new(T::max_value(), T::max_value(), T::max_value()),
            p_max: Point3::new(T::min_value(), T::min_value(), T::min_value()),
        }
    }

    /// Returns the vector along the box diagonal from the minimum point to
    /// the maximum point.
    pub fn diagonal(&self) -> Vector3<T> {
        self.p_max - self.p_min
    }

    /// Returns the volume of the bounding box.
    pub fn volume(&self) -> T {
        let d = self.diagonal();
        d.x * d.y * d.z
    }

    /// Returns true if a point is inside the bounding box.
    ///
    /// * `p` - The point.
    pub fn inside(&self, p: &Point3<T>) -> bool {
        p.x >= self.p_min.x
            && p.x <= self.p_max.x
            && p.y >= self.p_min.y
            && p.y <= self.p_max.y
            && p.z >= self.p_min.z
            && p.z <= self.p_max.z
    }

    /// Returns true if another bounding box is fully contained inside this one.
    ///
    /// * `other` - The other bounding box.
    pub fn contains(&self, other: &Bounds3<T>) -> bool {
        self.inside(&other.p_min) && self.inside(&other.p_max)
    }
}

impl Bounds3f {
    /// Pad the bounding box by a constant amount equally in all dimensions.
    ///
    /// * `delta` - The padding amount.
    pub fn expand(&self, delta: Float) -> Self {
        let v = Vector3f::new(delta, delta, delta);
        Self {
            p_min: self.p_min - v,
            p_max: self.p_max + v,
        }
    }

    /// Returns the midpoint of the bounding box.
    pub fn midpoint(&self) -> Point3f {
        self.p_min.lerp(self.p_max, 0.5)
    }

    /// Returns the center and radius of a sphere that bounds the bounding box.
    pub fn bounding_sphere(&self) -> (Point3f, Float) {
        let center = self.midpoint();
        let radius = if self.inside(&center) {
            center.distance(self.p_max)
        } else {
            0.0
        };
        (center, radius)
    }
}

impl<T: Num + PartialOrd + Copy> Union<Point3<T>> for Bounds3<T> {
    /// Returns a bounding box extended to include a point.
    ///
    /// * `other` - The point.
    fn union(&self, other: &Point3<T>) -> Self {
        Self {
            p_min: Point3::new(
                min(self.p_min.x, other.x),
                min(self.p_min.y, other.y),
                min(self.p_min.z, other.z),
            ),
            p_max: Point3::new(
                max(self.p_max.x, other.x),
                max(self.p_max.y, other.y),
                max(self.p_max.z, other.z),
            ),
        }
    }
}

impl<T: Num + PartialOrd + Copy> Union<Bounds3<T>> for Bounds3<T> {
    /// Returns a bounding box extended to include another bounding box.
    ///
    /// * `other` - The other bounding box.
    fn union(&self, other: &Bounds3<T>) -> Self {
        Self {
            p_min: Point3::new(
                min(self.p_min.x, other.p_min.x),
                min(self.p_min.y, other.p_min.y),
                min(self.p_min.z, other.p_min.z),
            ),
            p_max: Point3::new(
                max(self.p_max.x, other.p_max.x),
                max(self.p_max.y, other.p_max.y),
                max(self.p_max.z, other.p_max.z),
            ),
        }
    }
}

impl<T: Num + PartialOrd + Copy> From<Point3<T>> for Bounds3<T> {
    /// Use a 3-D point as minimum and maximum 3-D bounds.
    ///
    /// * `p` - 3-D point.
    fn from(p: Point3<T>) -> Self {
        Self { p_min: p, p_max: p }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_grows_from_empty() {
        let b = Bounds3f::empty();
        let b = b.union(&Point3f::new(1.0, -1.0, 0.0));
        let b = b.union(&Point3f::new(-1.0, 1.0, 2.0));
        assert_eq!(b.p_min, Point3f::new(-1.0, -1.0, 0.0));
        assert_eq!(b.p_max, Point3f::new(1.0, 1.0, 2.0));
    }

    #[test]
    fn inside_is_inclusive() {
        let b = Bounds3f::new(Point3f::ZERO, Point3f::new(1.0, 1.0, 1.0));
        assert!(b.inside(&Point3f::ZERO));
        assert!(b.inside(&Point3f::new(0.5, 0.5, 0.5)));
        assert!(!b.inside(&Point3f::new(1.5, 0.5, 0.5)));
    }

    #[test]
    fn bounding_sphere_contains_corners() {
        let b = Bounds3f::new(Point3f::new(-1.0, -1.0, -1.0), Point3f::new(1.0, 1.0, 1.0));
        let (c, r) = b.bounding_sphere();
        assert_eq!(c, Point3f::ZERO);
        assert!(r >= 3.0_f32.sqrt() - 1e-5);
    }
}
