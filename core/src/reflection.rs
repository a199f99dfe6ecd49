//! BSDFs.

use crate::geometry::*;
use crate::pbrt::*;
use crate::sampling::*;
use crate::spectrum::Spectrum;

bitflags! {
    /// Types of scattering a BxDF lobe models.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct BxDFType: u8 {
        const BSDF_REFLECTION = 1 << 0;
        const BSDF_TRANSMISSION = 1 << 1;
        const BSDF_DIFFUSE = 1 << 2;
        const BSDF_GLOSSY = 1 << 3;
        const BSDF_SPECULAR = 1 << 4;
        const BSDF_ALL = Self::BSDF_REFLECTION.bits()
            | Self::BSDF_TRANSMISSION.bits()
            | Self::BSDF_DIFFUSE.bits()
            | Self::BSDF_GLOSSY.bits()
            | Self::BSDF_SPECULAR.bits();
    }
}

/// Result of sampling an incident direction from a BSDF.
#[derive(Clone)]
pub struct BxDFSample {
    /// The BSDF value.
    pub f: Spectrum,

    /// The sampled incident direction in world space.
    pub wi: Vector3f,

    /// The PDF of sampling `wi`.
    pub pdf: Float,

    /// The type of the sampled lobe.
    pub sampled_type: BxDFType,
}

/// Interface for BSDFs. Directions are in world space; implementations carry
/// their own shading frame.
pub trait Bsdf {
    /// Returns the number of lobes matching the given flags.
    ///
    /// * `flags` - The lobe types to match.
    fn num_components(&self, flags: BxDFType) -> usize;

    /// Evaluates the BSDF for a pair of directions.
    ///
    /// * `wo`    - The outgoing direction.
    /// * `wi`    - The incident direction.
    /// * `flags` - The lobe types to match.
    fn f(&self, wo: &Vector3f, wi: &Vector3f, flags: BxDFType) -> Spectrum;

    /// Samples an incident direction for an outgoing direction.
    ///
    /// * `wo`    - The outgoing direction.
    /// * `u`     - The random sample point.
    /// * `flags` - The lobe types to match.
    fn sample_f(&self, wo: &Vector3f, u: &Point2f, flags: BxDFType) -> Option<BxDFSample>;

    /// Returns the PDF of sampling an incident direction for an outgoing
    /// direction.
    ///
    /// * `wo`    - The outgoing direction.
    /// * `wi`    - The incident direction.
    /// * `flags` - The lobe types to match.
    fn pdf(&self, wo: &Vector3f, wi: &Vector3f, flags: BxDFType) -> Float;
}

/// An orthonormal frame used to transform directions between world space and
/// the reflection coordinate system where the surface normal is the z-axis.
#[derive(Copy, Clone)]
pub struct ShadingFrame {
    ns: Vector3f,
    ss: Vector3f,
    ts: Vector3f,
}

impl ShadingFrame {
    /// Create a new `ShadingFrame` around a shading normal.
    ///
    /// * `ns` - The normalized shading normal.
    pub fn new(ns: Normal3f) -> Self {
        let ns = Vector3f::from(ns);
        let (ss, ts) = coordinate_system(&ns);
        Self { ns, ss, ts }
    }

    /// Transform a world space direction to the reflection coordinate system.
    ///
    /// * `v` - The direction.
    pub fn world_to_local(&self, v: &Vector3f) -> Vector3f {
        Vector3f::new(v.dot(&self.ss), v.dot(&self.ts), v.dot(&self.ns))
    }

    /// Transform a direction in the reflection coordinate system to world
    /// space.
    ///
    /// * `v` - The direction.
    pub fn local_to_world(&self, v: &Vector3f) -> Vector3f {
        self.ss * v.x + self.ts * v.y + self.ns * v.z
    }
}

/// Lambertian diffuse reflection.
pub struct LambertianBsdf {
    /// Reflectance.
    r: Spectrum,

    /// Shading frame.
    frame: ShadingFrame,

    /// Geometric normal, used to distinguish reflection from transmission.
    ng: Normal3f,
}

impl LambertianBsdf {
    const LOBE: BxDFType = BxDFType::BSDF_REFLECTION.union(BxDFType::BSDF_DIFFUSE);

    /// Create a new `LambertianBsdf`.
    ///
    /// * `r`  - The reflectance.
    /// * `ns` - The shading normal.
    /// * `ng` - The geometric normal.
    pub fn new(r: Spectrum, ns: Normal3f, ng: Normal3f) -> Self {
        Self {
            r,
            frame: ShadingFrame::new(ns),
            ng,
        }
    }
}

impl Bsdf for LambertianBsdf {
    fn num_components(&self, flags: BxDFType) -> usize {
        if flags.contains(Self::LOBE) {
            1
        } else {
            0
        }
    }

    fn f(&self, wo: &Vector3f, wi: &Vector3f, flags: BxDFType) -> Spectrum {
        if !flags.contains(Self::LOBE) {
            return Spectrum::ZERO;
        }
        // Reflection only; wo and wi must lie on the same geometric side.
        if self.ng.dot(wo) * self.ng.dot(wi) <= 0.0 {
            return Spectrum::ZERO;
        }
        self.r * INV_PI
    }

    fn sample_f(&self, wo: &Vector3f, u: &Point2f, flags: BxDFType) -> Option<BxDFSample> {
        if !flags.contains(Self::LOBE) {
            return None;
        }
        let wo_local = self.frame.world_to_local(wo);
        if wo_local.z == 0.0 {
            return None;
        }

        // Cosine-sample the hemisphere on wo's side of the surface.
        let mut wi_local = cosine_sample_hemisphere(u);
        if wo_local.z < 0.0 {
            wi_local.z = -wi_local.z;
        }
        let pdf = cosine_hemisphere_pdf(abs(wi_local.z));
        if pdf == 0.0 {
            return None;
        }

        Some(BxDFSample {
            f: self.r * INV_PI,
            wi: self.frame.local_to_world(&wi_local),
            pdf,
            sampled_type: Self::LOBE,
        })
    }

    fn pdf(&self, wo: &Vector3f, wi: &Vector3f, flags: BxDFType) -> Float {
        if !flags.contains(Self::LOBE) {
            return 0.0;
        }
        let wo_local = self.frame.world_to_local(wo);
        let wi_local = self.frame.world_to_local(wi);
        if wo_local.z * wi_local.z <= 0.0 {
            0.0
        } else {
            cosine_hemisphere_pdf(abs(wi_local.z))
        }
    }
}

/// Perfect mirror reflection scaled by a dielectric Fresnel term.
pub struct SpecularReflectionBsdf {
    /// Reflectance.
    r: Spectrum,

    /// Index of refraction on the incident side.
    eta_a: Float,

    /// Index of refraction on the transmitted side.
    eta_b: Float,

    /// Shading frame.
    frame: ShadingFrame,
}

impl SpecularReflectionBsdf {
    const LOBE: BxDFType = BxDFType::BSDF_REFLECTION.union(BxDFType::BSDF_SPECULAR);

    /// Create a new `SpecularReflectionBsdf`.
    ///
    /// * `r`     - The reflectance.
    /// * `eta_a` - Index of refraction on the incident side.
    /// * `eta_b` - Index of refraction on the transmitted side.
    /// * `ns`    - The shading normal.
    pub fn new(r: Spectrum, eta_a: Float, eta_b: Float, ns: Normal3f) -> Self {
        Self {
            r,
            eta_a,
            eta_b,
            frame: ShadingFrame::new(ns),
        }
    }
}

impl Bsdf for SpecularReflectionBsdf {
    fn num_components(&self, flags: BxDFType) -> usize {
        if flags.contains(Self::LOBE) {
            1
        } else {
            0
        }
    }

    /// A delta distribution; evaluation returns black.
    fn f(&self, _wo: &Vector3f, _wi: &Vector3f, _flags: BxDFType) -> Spectrum {
        Spectrum::ZERO
    }

    fn sample_f(&self, wo: &Vector3f, _u: &Point2f, flags: BxDFType) -> Option<BxDFSample> {
        if !flags.contains(Self::LOBE) {
            return None;
        }
        let wo_local = self.frame.world_to_local(wo);
        if wo_local.z == 0.0 {
            return None;
        }
        let wi_local = Vector3f::new(-wo_local.x, -wo_local.y, wo_local.z);
        let fr = fr_dielectric(wo_local.z, self.eta_a, self.eta_b);
        Some(BxDFSample {
            f: self.r * fr / abs(wi_local.z),
            wi: self.frame.local_to_world(&wi_local),
            pdf: 1.0,
            sampled_type: Self::LOBE,
        })
    }

    fn pdf(&self, _wo: &Vector3f, _wi: &Vector3f, _flags: BxDFType) -> Float {
        0.0
    }
}

/// Returns the Fresnel reflectance for a dielectric interface and
/// unpolarized light.
///
/// * `cos_theta_i` - Cosine of the incident angle.
/// * `eta_i`       - Index of refraction on the incident side.
/// * `eta_t`       - Index of refraction on the transmitted side.
pub fn fr_dielectric(cos_theta_i: Float, eta_i: Float, eta_t: Float) -> Float {
    let mut cos_theta_i = clamp(cos_theta_i, -1.0, 1.0);

    // Swap the indices of refraction if exiting the medium.
    let entering = cos_theta_i > 0.0;
    let (eta_i, eta_t) = if entering {
        (eta_i, eta_t)
    } else {
        cos_theta_i = abs(cos_theta_i);
        (eta_t, eta_i)
    };

    // Compute cos_theta_t using Snell's law.
    let sin_theta_i = max(0.0, 1.0 - cos_theta_i * cos_theta_i).sqrt();
    let sin_theta_t = eta_i / eta_t * sin_theta_i;

    // Total internal reflection.
    if sin_theta_t >= 1.0 {
        return 1.0;
    }

    let cos_theta_t = max(0.0, 1.0 - sin_theta_t * sin_theta_t).sqrt();
    let r_parl = ((eta_t * cos_theta_i) - (eta_i * cos_theta_t))
        / ((eta_t * cos_theta_i) + (eta_i * cos_theta_t));
    let r_perp = ((eta_i * cos_theta_i) - (eta_t * cos_theta_t))
        / ((eta_i * cos_theta_i) + (eta_t * cos_theta_t));
    (r_parl * r_parl + r_perp * r_perp) * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RNG;
    use float_cmp::approx_eq;

    #[test]
    fn fresnel_at_normal_incidence() {
        // ((n1 - n2) / (n1 + n2))^2 for n1 = 1, n2 = 1.5.
        let fr = fr_dielectric(1.0, 1.0, 1.5);
        assert!(approx_eq!(Float, fr, 0.04, epsilon = 1e-4));
    }

    #[test]
    fn fresnel_total_internal_reflection() {
        // Grazing exit from the dense side.
        let fr = fr_dielectric(-0.1, 1.0, 1.5);
        assert_eq!(fr, 1.0);
    }

    #[test]
    fn lambertian_samples_stay_on_wo_side() {
        let n = Normal3f::new(0.0, 0.0, 1.0);
        let bsdf = LambertianBsdf::new(Spectrum::new(0.5), n, n);
        let wo = Vector3f::new(0.3, 0.2, 0.9).normalize();
        let mut rng = RNG::new(11);
        for _ in 0..64 {
            let u = Point2f::new(rng.uniform_float(), rng.uniform_float());
            let s = bsdf
                .sample_f(&wo, &u, BxDFType::BSDF_ALL)
                .expect("diffuse sample");
            assert!(n.dot(&s.wi) > 0.0);
            assert!(s.pdf > 0.0);
            assert_eq!(s.f, Spectrum::new(0.5) * INV_PI);
        }
    }

    #[test]
    fn lambertian_ignores_specular_requests() {
        let n = Normal3f::new(0.0, 0.0, 1.0);
        let bsdf = LambertianBsdf::new(Spectrum::new(0.5), n, n);
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let u = Point2f::new(0.5, 0.5);
        let flags = BxDFType::BSDF_REFLECTION | BxDFType::BSDF_SPECULAR;
        assert!(bsdf.sample_f(&wo, &u, flags).is_none());
        assert_eq!(bsdf.num_components(flags), 0);
    }

    #[test]
    fn specular_reflection_mirrors_direction() {
        let n = Normal3f::new(0.0, 0.0, 1.0);
        let bsdf = SpecularReflectionBsdf::new(Spectrum::ONE, 1.0, 1.3, n);
        let wo = Vector3f::new(0.5, 0.0, 0.5).normalize();
        let s = bsdf
            .sample_f(&wo, &Point2f::new(0.5, 0.5), BxDFType::BSDF_ALL)
            .expect("specular sample");
        let expected = Vector3f::new(-wo.x, -wo.y, wo.z);
        assert!(approx_eq!(Float, s.wi.x, expected.x, epsilon = 1e-5));
        assert!(approx_eq!(Float, s.wi.y, expected.y, epsilon = 1e-5));
        assert!(approx_eq!(Float, s.wi.z, expected.z, epsilon = 1e-5));
        assert_eq!(s.pdf, 1.0);
    }
}
