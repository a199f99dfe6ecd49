//! Materials.

use crate::bssrdf::Bssrdf;
use crate::interaction::SurfaceInteraction;
use crate::reflection::*;
use crate::pbrt::*;
use crate::spectrum::Spectrum;
use bumpalo::Bump;
use std::sync::Arc;

/// Interface for materials.
pub trait Material: Send + Sync {
    /// Returns the BSDF at an intersection, allocated in the given arena.
    ///
    /// * `arena` - The arena for BSDF allocations.
    /// * `si`    - The surface interaction.
    fn bsdf<'arena>(&self, arena: &'arena Bump, si: &SurfaceInteraction) -> &'arena dyn Bsdf;

    /// Returns the subsurface scattering properties at an intersection for
    /// translucent materials.
    ///
    /// * `si` - The surface interaction.
    fn bssrdf(&self, _si: &SurfaceInteraction) -> Option<Bssrdf> {
        None
    }
}

/// Atomic reference counted `Material`.
pub type ArcMaterial = Arc<dyn Material>;

/// Purely diffuse material.
pub struct MatteMaterial {
    /// Diffuse reflectance.
    kd: Spectrum,
}

impl MatteMaterial {
    /// Create a new `MatteMaterial`.
    ///
    /// * `kd` - The diffuse reflectance.
    pub fn new(kd: Spectrum) -> Self {
        Self { kd }
    }
}

impl Material for MatteMaterial {
    fn bsdf<'arena>(&self, arena: &'arena Bump, si: &SurfaceInteraction) -> &'arena dyn Bsdf {
        arena.alloc(LambertianBsdf::new(
            self.kd.clamp_default(),
            si.ns,
            si.hit.n,
        ))
    }
}

/// Translucent material described by measured subsurface scattering
/// coefficients, with a specular surface reflection.
pub struct SubsurfaceMaterial {
    /// Specular reflectance.
    kr: Spectrum,

    /// Absorption coefficient.
    sigma_a: Spectrum,

    /// Reduced scattering coefficient.
    sigma_prime_s: Spectrum,

    /// Relative index of refraction.
    eta: Float,
}

impl SubsurfaceMaterial {
    /// Create a new `SubsurfaceMaterial`.
    ///
    /// * `kr`            - Specular reflectance.
    /// * `sigma_a`       - Absorption coefficient.
    /// * `sigma_prime_s` - Reduced scattering coefficient.
    /// * `scale`         - Scale applied to both scattering coefficients.
    /// * `eta`           - Relative index of refraction.
    pub fn new(
        kr: Spectrum,
        sigma_a: Spectrum,
        sigma_prime_s: Spectrum,
        scale: Float,
        eta: Float,
    ) -> Self {
        Self {
            kr,
            sigma_a: sigma_a * scale,
            sigma_prime_s: sigma_prime_s * scale,
            eta,
        }
    }
}

impl Material for SubsurfaceMaterial {
    fn bsdf<'arena>(&self, arena: &'arena Bump, si: &SurfaceInteraction) -> &'arena dyn Bsdf {
        arena.alloc(SpecularReflectionBsdf::new(
            self.kr.clamp_default(),
            1.0,
            self.eta,
            si.ns,
        ))
    }

    fn bssrdf(&self, _si: &SurfaceInteraction) -> Option<Bssrdf> {
        Some(Bssrdf::new(self.sigma_a, self.sigma_prime_s, self.eta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::*;

    fn test_interaction() -> SurfaceInteraction {
        SurfaceInteraction::new(
            Point3f::ZERO,
            Normal3f::new(0.0, 0.0, 1.0),
            Vector3f::new(0.0, 0.0, 1.0),
            0.0,
            1e-3,
            None,
        )
    }

    #[test]
    fn matte_material_has_no_bssrdf() {
        let m = MatteMaterial::new(Spectrum::new(0.5));
        assert!(m.bssrdf(&test_interaction()).is_none());
    }

    #[test]
    fn subsurface_material_scales_coefficients() {
        let m = SubsurfaceMaterial::new(
            Spectrum::ONE,
            Spectrum::new(0.1),
            Spectrum::new(1.0),
            2.0,
            1.3,
        );
        let bssrdf = m.bssrdf(&test_interaction()).expect("bssrdf");
        assert_eq!(bssrdf.sigma_a(), Spectrum::new(0.2));
        assert_eq!(bssrdf.sigma_prime_s(), Spectrum::new(2.0));
    }
}
