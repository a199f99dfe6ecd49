//! Light sources.

use crate::geometry::*;
use crate::interaction::Hit;
use crate::pbrt::*;
use crate::rng::RNG;
use crate::scene::Scene;
use crate::spectrum::Spectrum;
use std::sync::Arc;

/// Tracks the shadow ray between a shading point and a sampled light point
/// so occlusion can be evaluated lazily.
#[derive(Clone)]
pub struct VisibilityTester {
    ray: Ray,
}

impl VisibilityTester {
    /// Create a `VisibilityTester` for the segment between two points.
    ///
    /// * `p0`   - The shading point.
    /// * `eps0` - Ray offset at the shading point.
    /// * `p1`   - The sampled light point.
    /// * `eps1` - Ray offset at the light point.
    /// * `time` - Time of the interaction.
    pub fn segment(p0: Point3f, eps0: Float, p1: Point3f, eps1: Float, time: Float) -> Self {
        let d = p1 - p0;
        let dist = d.length();
        let w = d / dist;
        Self {
            ray: Ray::new(p0 + w * eps0, w, max(dist - eps0 - eps1, 0.0), time),
        }
    }

    /// Returns true if the segment is not occluded.
    ///
    /// * `scene` - The scene.
    pub fn unoccluded(&self, scene: &Scene) -> bool {
        !scene.intersect_p(&self.ray)
    }

    /// Returns the transmittance along the segment.
    ///
    /// * `scene` - The scene.
    /// * `rng`   - The random number generator.
    pub fn transmittance(&self, scene: &Scene, rng: &mut RNG) -> Spectrum {
        scene.transmittance(&self.ray, rng)
    }
}

/// Result of sampling a light's incident radiance at a shading point.
pub struct Li {
    /// The incident radiance.
    pub value: Spectrum,

    /// The incident direction.
    pub wi: Vector3f,

    /// The PDF of sampling `wi`.
    pub pdf: Float,

    /// The shadow ray to the sampled light point.
    pub visibility: VisibilityTester,
}

/// Interface for light sources.
pub trait Light: Send + Sync {
    /// Samples the incident radiance arriving at a shading point.
    ///
    /// * `hit`         - The shading point.
    /// * `ray_epsilon` - Ray offset at the shading point.
    /// * `u`           - The random sample point.
    fn sample_li(&self, hit: &Hit, ray_epsilon: Float, u: &Point2f) -> Li;

    /// Returns the PDF of sampling a direction towards the light from a
    /// shading point.
    ///
    /// * `hit` - The shading point.
    /// * `wi`  - The direction.
    fn pdf_li(&self, hit: &Hit, wi: &Vector3f) -> Float;

    /// Returns the total emitted power.
    fn power(&self) -> Spectrum;

    /// Returns true if the light is described by a delta distribution.
    fn is_delta_light(&self) -> bool;

    /// Returns the number of samples to take from this light.
    fn n_samples(&self) -> usize {
        1
    }

    /// Returns the radiance carried by a ray that escapes the scene.
    ///
    /// * `_ray` - The escaped ray.
    fn le(&self, _ray: &Ray) -> Spectrum {
        Spectrum::ZERO
    }
}

/// Atomic reference counted `Light`.
pub type ArcLight = Arc<dyn Light>;

/// An isotropic point light source.
pub struct PointLight {
    /// Position.
    p: Point3f,

    /// Radiant intensity.
    intensity: Spectrum,
}

impl PointLight {
    /// Create a new `PointLight`.
    ///
    /// * `p`         - Position.
    /// * `intensity` - Radiant intensity.
    pub fn new(p: Point3f, intensity: Spectrum) -> Self {
        Self { p, intensity }
    }
}

impl Light for PointLight {
    fn sample_li(&self, hit: &Hit, ray_epsilon: Float, _u: &Point2f) -> Li {
        let d = self.p - hit.p;
        let dist_squared = d.length_squared();
        Li {
            value: self.intensity / dist_squared,
            wi: d / dist_squared.sqrt(),
            pdf: 1.0,
            visibility: VisibilityTester::segment(hit.p, ray_epsilon, self.p, 0.0, hit.time),
        }
    }

    /// A delta light cannot be hit by a sampled direction.
    fn pdf_li(&self, _hit: &Hit, _wi: &Vector3f) -> Float {
        0.0
    }

    fn power(&self) -> Spectrum {
        self.intensity * FOUR_PI
    }

    fn is_delta_light(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn point_light_falls_off_with_squared_distance() {
        let light = PointLight::new(Point3f::new(0.0, 0.0, 2.0), Spectrum::new(4.0));
        let hit = Hit::new(
            Point3f::ZERO,
            Normal3f::new(0.0, 0.0, 1.0),
            Vector3f::new(0.0, 0.0, 1.0),
            0.0,
        );
        let li = light.sample_li(&hit, 1e-3, &Point2f::new(0.5, 0.5));
        assert!(approx_eq!(Float, li.value[0], 1.0, epsilon = 1e-5));
        assert!(approx_eq!(Float, li.wi.z, 1.0, epsilon = 1e-5));
        assert_eq!(li.pdf, 1.0);
        assert!(light.is_delta_light());
    }
}
