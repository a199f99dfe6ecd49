//! Participating media.

use crate::geometry::*;
use crate::pbrt::*;
use crate::rng::RNG;
use crate::spectrum::Spectrum;
use std::sync::Arc;

/// Interface for participating media.
pub trait Medium: Send + Sync {
    /// Returns the beam transmittance along a ray, from its origin to `t_max`.
    ///
    /// * `ray` - The ray.
    /// * `rng` - The random number generator.
    fn tr(&self, ray: &Ray, rng: &mut RNG) -> Spectrum;
}

/// Atomic reference counted `Medium`.
pub type ArcMedium = Arc<dyn Medium>;

/// Medium with constant extinction everywhere.
pub struct HomogeneousMedium {
    /// Extinction coefficient.
    sigma_t: Spectrum,
}

impl HomogeneousMedium {
    /// Create a new `HomogeneousMedium`.
    ///
    /// * `sigma_t` - The extinction coefficient.
    pub fn new(sigma_t: Spectrum) -> Self {
        Self { sigma_t }
    }
}

impl Medium for HomogeneousMedium {
    /// Returns the beam transmittance along a ray using Beer's law.
    ///
    /// * `ray`  - The ray.
    /// * `_rng` - The random number generator.
    fn tr(&self, ray: &Ray, _rng: &mut RNG) -> Spectrum {
        let d = min(ray.t_max * ray.d.length(), Float::MAX);
        (-self.sigma_t * d).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn transmittance_follows_beers_law() {
        let medium = HomogeneousMedium::new(Spectrum::new(0.5));
        let ray = Ray::new(Point3f::ZERO, Vector3f::new(1.0, 0.0, 0.0), 2.0, 0.0);
        let mut rng = RNG::new(0);
        let tr = medium.tr(&ray, &mut rng);
        assert!(approx_eq!(Float, tr[0], (-1.0 as Float).exp(), epsilon = 1e-5));
    }
}
