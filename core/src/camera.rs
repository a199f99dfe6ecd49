//! Cameras.

use crate::geometry::*;
use crate::pbrt::*;
use std::sync::Arc;

/// A point on the film for which a camera ray should be generated.
#[derive(Copy, Clone)]
pub struct CameraSample {
    /// Point on the film in raster coordinates.
    pub p_film: Point2f,

    /// Time of the sample.
    pub time: Float,
}

/// Interface for cameras.
pub trait Camera: Send + Sync {
    /// Returns the raster extent of the film.
    fn sample_extent(&self) -> Bounds2i;

    /// Generates a world space ray for a film sample.
    ///
    /// * `sample` - The film sample.
    fn generate_ray(&self, sample: &CameraSample) -> Ray;
}

/// Atomic reference counted `Camera`.
pub type ArcCamera = Arc<dyn Camera>;

/// A pinhole perspective camera.
pub struct PinholeCamera {
    /// Eye position.
    eye: Point3f,

    /// Camera right direction.
    right: Vector3f,

    /// Camera up direction.
    up: Vector3f,

    /// Camera viewing direction.
    forward: Vector3f,

    /// Tangent of half the vertical field of view.
    tan_half_fov: Float,

    /// Film aspect ratio.
    aspect: Float,

    /// Film resolution in pixels.
    resolution: Point2i,
}

impl PinholeCamera {
    /// Create a new `PinholeCamera`.
    ///
    /// * `eye`        - Eye position.
    /// * `look_at`    - Point the camera looks at.
    /// * `up`         - Up direction.
    /// * `fov`        - Vertical field of view in degrees.
    /// * `resolution` - Film resolution in pixels.
    pub fn new(
        eye: Point3f,
        look_at: Point3f,
        up: Vector3f,
        fov: Float,
        resolution: Point2i,
    ) -> Self {
        let forward = (look_at - eye).normalize();
        let right = up.normalize().cross(&forward).normalize();
        let up = forward.cross(&right);
        Self {
            eye,
            right,
            up,
            forward,
            tan_half_fov: (fov.to_radians() * 0.5).tan(),
            aspect: resolution.x as Float / resolution.y as Float,
            resolution,
        }
    }

    /// Returns the normalized world space direction through a film point.
    ///
    /// * `p_film` - Point on the film in raster coordinates.
    fn ray_direction(&self, p_film: &Point2f) -> Vector3f {
        let sx = p_film.x / self.resolution.x as Float;
        let sy = p_film.y / self.resolution.y as Float;
        let x = (2.0 * sx - 1.0) * self.tan_half_fov * self.aspect;
        let y = (1.0 - 2.0 * sy) * self.tan_half_fov;
        (self.right * x + self.up * y + self.forward).normalize()
    }
}

impl Camera for PinholeCamera {
    fn sample_extent(&self) -> Bounds2i {
        Bounds2i::new(
            Point2i::zero(),
            Point2i::new(self.resolution.x, self.resolution.y),
        )
    }

    fn generate_ray(&self, sample: &CameraSample) -> Ray {
        let d = self.ray_direction(&sample.p_film);
        let mut ray = Ray::new(self.eye, d, INFINITY, sample.time);
        // One pixel offsets on the film for footprint estimation.
        ray.differentials = Some(RayDifferential {
            rx_origin: self.eye,
            ry_origin: self.eye,
            rx_direction: self
                .ray_direction(&Point2f::new(sample.p_film.x + 1.0, sample.p_film.y)),
            ry_direction: self
                .ray_direction(&Point2f::new(sample.p_film.x, sample.p_film.y + 1.0)),
        });
        ray
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn center_ray_points_forward() {
        let camera = PinholeCamera::new(
            Point3f::ZERO,
            Point3f::new(0.0, 0.0, 1.0),
            Vector3f::new(0.0, 1.0, 0.0),
            60.0,
            Point2i::new(64, 64),
        );
        let ray = camera.generate_ray(&CameraSample {
            p_film: Point2f::new(32.0, 32.0),
            time: 0.0,
        });
        assert_eq!(ray.o, Point3f::ZERO);
        assert!(approx_eq!(Float, ray.d.z, 1.0, epsilon = 1e-5));
    }

    #[test]
    fn corner_rays_diverge() {
        let camera = PinholeCamera::new(
            Point3f::ZERO,
            Point3f::new(0.0, 0.0, 1.0),
            Vector3f::new(0.0, 1.0, 0.0),
            60.0,
            Point2i::new(64, 64),
        );
        let top_left = camera.generate_ray(&CameraSample {
            p_film: Point2f::new(0.0, 0.0),
            time: 0.0,
        });
        assert!(top_left.d.x < 0.0);
        assert!(top_left.d.y > 0.0);
    }

    #[test]
    fn rays_carry_pixel_differentials() {
        let camera = PinholeCamera::new(
            Point3f::ZERO,
            Point3f::new(0.0, 0.0, 1.0),
            Vector3f::new(0.0, 1.0, 0.0),
            60.0,
            Point2i::new(64, 64),
        );
        let ray = camera.generate_ray(&CameraSample {
            p_film: Point2f::new(32.0, 32.0),
            time: 0.0,
        });
        let diff = ray.differentials.expect("differentials");
        // One pixel to the right on the film moves the direction right, one
        // pixel down moves it down.
        assert!(diff.rx_direction.x > ray.d.x);
        assert!(diff.ry_direction.y < ray.d.y);
    }
}
