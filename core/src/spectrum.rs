//! RGB Spectrum

use crate::pbrt::*;
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Index, Mul, MulAssign, Neg, Sub};

/// Number of spectral samples for the RGB spectrum.
pub const SPECTRUM_SAMPLES: usize = 3;

/// An RGB colour spectrum.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RGBSpectrum {
    /// The spectrum samples.
    c: [Float; SPECTRUM_SAMPLES],
}

/// Default to using `RGBSpectrum` for the `Spectrum` type.
pub type Spectrum = RGBSpectrum;

impl RGBSpectrum {
    /// Black spectrum.
    pub const ZERO: Self = Self { c: [0.0; SPECTRUM_SAMPLES] };

    /// Unit spectrum.
    pub const ONE: Self = Self { c: [1.0; SPECTRUM_SAMPLES] };

    /// Creates a new spectrum with a constant value across all samples.
    ///
    /// * `v` - The constant value.
    pub fn new(v: Float) -> Self {
        Self { c: [v; SPECTRUM_SAMPLES] }
    }

    /// Creates a new spectrum from RGB values.
    ///
    /// * `rgb` - The RGB values.
    pub fn from_rgb(rgb: [Float; 3]) -> Self {
        Self { c: rgb }
    }

    /// Returns the RGB values.
    pub fn to_rgb(&self) -> [Float; 3] {
        self.c
    }

    /// Returns true if all spectrum samples are 0.
    pub fn is_black(&self) -> bool {
        self.c.iter().all(|v| *v == 0.0)
    }

    /// Returns true if any spectrum sample is NaN.
    pub fn has_nans(&self) -> bool {
        self.c.iter().any(|v| v.is_nan())
    }

    /// Returns the luminance of the spectrum.
    pub fn y(&self) -> Float {
        const W: [Float; 3] = [0.212671, 0.715160, 0.072169];
        W[0] * self.c[0] + W[1] * self.c[1] + W[2] * self.c[2]
    }

    /// Returns the square root of the spectrum samples.
    pub fn sqrt(&self) -> Self {
        let mut c = self.c;
        for v in c.iter_mut() {
            *v = v.sqrt();
        }
        Self { c }
    }

    /// Returns `e` raised to the power of the spectrum samples.
    pub fn exp(&self) -> Self {
        let mut c = self.c;
        for v in c.iter_mut() {
            *v = v.exp();
        }
        Self { c }
    }

    /// Returns the spectrum with samples clamped to a range.
    ///
    /// * `low`  - The lower bound.
    /// * `high` - The upper bound.
    pub fn clamp(&self, low: Float, high: Float) -> Self {
        let mut c = self.c;
        for v in c.iter_mut() {
            *v = clamp(*v, low, high);
        }
        Self { c }
    }

    /// Returns the spectrum with samples clamped to be non-negative.
    pub fn clamp_default(&self) -> Self {
        self.clamp(0.0, INFINITY)
    }

    /// Returns the largest spectrum sample.
    pub fn max_component_value(&self) -> Float {
        max(self.c[0], max(self.c[1], self.c[2]))
    }
}

impl Add for RGBSpectrum {
    type Output = Self;

    /// Adds another spectrum sample-wise.
    ///
    /// * `other` - The spectrum to add.
    fn add(self, other: Self) -> Self::Output {
        Self::Output {
            c: [
                self.c[0] + other.c[0],
                self.c[1] + other.c[1],
                self.c[2] + other.c[2],
            ],
        }
    }
}

impl AddAssign for RGBSpectrum {
    /// Performs the `+=` operation sample-wise.
    ///
    /// * `other` - The spectrum to add.
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for RGBSpectrum {
    type Output = Self;

    /// Subtracts another spectrum sample-wise.
    ///
    /// * `other` - The spectrum to subtract.
    fn sub(self, other: Self) -> Self::Output {
        Self::Output {
            c: [
                self.c[0] - other.c[0],
                self.c[1] - other.c[1],
                self.c[2] - other.c[2],
            ],
        }
    }
}

impl Mul for RGBSpectrum {
    type Output = Self;

    /// Multiplies by another spectrum sample-wise.
    ///
    /// * `other` - The spectrum to multiply by.
    fn mul(self, other: Self) -> Self::Output {
        Self::Output {
            c: [
                self.c[0] * other.c[0],
                self.c[1] * other.c[1],
                self.c[2] * other.c[2],
            ],
        }
    }
}

impl MulAssign for RGBSpectrum {
    /// Performs the `*=` operation sample-wise.
    ///
    /// * `other` - The spectrum to multiply by.
    fn mul_assign(&mut self, other: Self) {
        *self = *self * other;
    }
}

impl Mul<Float> for RGBSpectrum {
    type Output = Self;

    /// Scales the spectrum samples.
    ///
    /// * `f` - The scaling factor.
    fn mul(self, f: Float) -> Self::Output {
        Self::Output {
            c: [self.c[0] * f, self.c[1] * f, self.c[2] * f],
        }
    }
}

impl Mul<RGBSpectrum> for Float {
    type Output = RGBSpectrum;

    /// Scales the spectrum samples.
    ///
    /// * `s` - The spectrum to scale.
    fn mul(self, s: RGBSpectrum) -> RGBSpectrum {
        s * self
    }
}

impl MulAssign<Float> for RGBSpectrum {
    /// Scales the spectrum samples.
    ///
    /// * `f` - The scaling factor.
    fn mul_assign(&mut self, f: Float) {
        *self = *self * f;
    }
}

impl Div for RGBSpectrum {
    type Output = Self;

    /// Divides by another spectrum sample-wise.
    ///
    /// * `other` - The spectrum to divide by.
    fn div(self, other: Self) -> Self::Output {
        debug_assert!(!other.c.iter().any(|v| *v == 0.0));
        Self::Output {
            c: [
                self.c[0] / other.c[0],
                self.c[1] / other.c[1],
                self.c[2] / other.c[2],
            ],
        }
    }
}

impl Div<Float> for RGBSpectrum {
    type Output = Self;

    /// Scales the spectrum samples by `1/f`.
    ///
    /// * `f` - The scaling factor.
    fn div(self, f: Float) -> Self::Output {
        debug_assert!(f != 0.0);
        let inv = 1.0 / f;
        self * inv
    }
}

impl DivAssign<Float> for RGBSpectrum {
    /// Scales the spectrum samples by `1/f`.
    ///
    /// * `f` - The scaling factor.
    fn div_assign(&mut self, f: Float) {
        *self = *self / f;
    }
}

impl Neg for RGBSpectrum {
    type Output = Self;

    /// Negates the spectrum samples.
    fn neg(self) -> Self::Output {
        Self::Output {
            c: [-self.c[0], -self.c[1], -self.c[2]],
        }
    }
}

impl Index<usize> for RGBSpectrum {
    type Output = Float;

    /// Index the spectrum samples.
    ///
    /// * `i` - The sample index.
    fn index(&self, i: usize) -> &Self::Output {
        &self.c[i]
    }
}

impl fmt::Display for RGBSpectrum {
    /// Formats the spectrum samples.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.c[0], self.c[1], self.c[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn black_spectrum() {
        assert!(Spectrum::ZERO.is_black());
        assert!(!Spectrum::new(0.25).is_black());
    }

    #[test]
    fn luminance_of_white() {
        assert!(approx_eq!(Float, Spectrum::ONE.y(), 1.0, epsilon = 1e-5));
    }

    #[test]
    fn clamp_negative_samples() {
        let s = Spectrum::from_rgb([-1.0, 0.5, 2.0]);
        assert_eq!(s.clamp_default(), Spectrum::from_rgb([0.0, 0.5, 2.0]));
    }
}
