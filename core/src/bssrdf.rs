//! BSSRDF.

use crate::pbrt::*;
use crate::spectrum::Spectrum;

/// Scattering properties for translucent materials: an absorption
/// coefficient, a reduced scattering coefficient and the relative index of
/// refraction.
#[derive(Clone)]
pub struct Bssrdf {
    /// Absorption coefficient.
    sigma_a: Spectrum,

    /// Reduced scattering coefficient.
    sigma_prime_s: Spectrum,

    /// Relative index of refraction.
    eta: Float,
}

impl Bssrdf {
    /// Create a new `Bssrdf`.
    ///
    /// * `sigma_a`       - Absorption coefficient.
    /// * `sigma_prime_s` - Reduced scattering coefficient.
    /// * `eta`           - Relative index of refraction.
    pub fn new(sigma_a: Spectrum, sigma_prime_s: Spectrum, eta: Float) -> Self {
        Self {
            sigma_a,
            sigma_prime_s,
            eta,
        }
    }

    /// Returns the absorption coefficient.
    pub fn sigma_a(&self) -> Spectrum {
        self.sigma_a
    }

    /// Returns the reduced scattering coefficient.
    pub fn sigma_prime_s(&self) -> Spectrum {
        self.sigma_prime_s
    }

    /// Returns the reduced extinction coefficient.
    pub fn sigma_prime_t(&self) -> Spectrum {
        self.sigma_a + self.sigma_prime_s
    }

    /// Returns the relative index of refraction.
    pub fn eta(&self) -> Float {
        self.eta
    }
}

/// Returns the average diffuse Fresnel reflectance for a relative index of
/// refraction, using the Egan and Hilgeman polynomial approximation.
///
/// * `eta` - The relative index of refraction.
pub fn fresnel_diffuse_reflectance(eta: Float) -> Float {
    -1.440 / (eta * eta) + 0.710 / eta + 0.668 + 0.0636 * eta
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn diffuse_fresnel_reflectance_for_skin_like_eta() {
        let fdr = fresnel_diffuse_reflectance(1.3);
        assert!(approx_eq!(Float, fdr, 0.44476, epsilon = 1e-4));
    }

    #[test]
    fn reduced_extinction_is_sum_of_coefficients() {
        let bssrdf = Bssrdf::new(Spectrum::new(0.1), Spectrum::new(1.2), 1.3);
        let sigma_prime_t = bssrdf.sigma_prime_t();
        for c in 0..3 {
            assert!(approx_eq!(Float, sigma_prime_t[c], 1.3, epsilon = 1e-6));
        }
    }
}
