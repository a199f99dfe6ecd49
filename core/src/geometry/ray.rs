//! Rays

use crate::geometry::*;
use crate::pbrt::*;

/// Auxiliary rays offset one pixel in the raster x and y directions, used to
/// estimate the image plane footprint at an intersection.
#[derive(Copy, Clone, Debug)]
pub struct RayDifferential {
    /// Origin of the x offset ray.
    pub rx_origin: Point3f,

    /// Origin of the y offset ray.
    pub ry_origin: Point3f,

    /// Direction of the x offset ray.
    pub rx_direction: Vector3f,

    /// Direction of the y offset ray.
    pub ry_direction: Vector3f,
}

/// A Ray.
#[derive(Clone, Debug)]
pub struct Ray {
    /// Origin.
    pub o: Point3f,

    /// Direction.
    pub d: Vector3f,

    /// Maximum extent of the ray.
    pub t_max: Float,

    /// Time value.
    pub time: Float,

    /// Differentials, present on camera rays.
    pub differentials: Option<RayDifferential>,
}

impl Ray {
    /// Returns a new ray.
    ///
    /// * `o`     - Origin.
    /// * `d`     - Direction.
    /// * `t_max` - Maximum extent of the ray.
    /// * `time`  - Time value.
    pub fn new(o: Point3f, d: Vector3f, t_max: Float, time: Float) -> Self {
        Self {
            o,
            d,
            t_max,
            time,
            differentials: None,
        }
    }

    /// Get the position along the ray at a given parameter.
    ///
    /// * `t` - The parameter.
    pub fn at(&self, t: Float) -> Point3f {
        self.o + self.d * t
    }
}
