//! Low discrepancy sequences.

use crate::geometry::*;
use crate::pbrt::*;
use crate::rng::ONE_MINUS_EPSILON;

/// Scale factor mapping a u32 to [0, 1).
const INV_U32_MAX: Float = 2.3283064365386963e-10;

/// Generate the n'th value of the scrambled van der Corput sequence.
///
/// * `n`        - The sample index.
/// * `scramble` - The scramble value.
pub fn van_der_corput(n: u32, scramble: u32) -> Float {
    let mut bits = n;
    bits = (bits << 16) | (bits >> 16);
    bits = ((bits & 0x00ff00ff) << 8) | ((bits & 0xff00ff00) >> 8);
    bits = ((bits & 0x0f0f0f0f) << 4) | ((bits & 0xf0f0f0f0) >> 4);
    bits = ((bits & 0x33333333) << 2) | ((bits & 0xcccccccc) >> 2);
    bits = ((bits & 0x55555555) << 1) | ((bits & 0xaaaaaaaa) >> 1);
    bits ^= scramble;
    min((bits as Float) * INV_U32_MAX, ONE_MINUS_EPSILON)
}

/// Generate the n'th value of the scrambled Sobol' (0,2)-sequence second
/// dimension.
///
/// * `n`        - The sample index.
/// * `scramble` - The scramble value.
pub fn sobol_2(n: u32, scramble: u32) -> Float {
    let mut s = scramble;
    let mut v: u32 = 1 << 31;
    let mut i = n;
    while i != 0 {
        if i & 1 != 0 {
            s ^= v;
        }
        i >>= 1;
        v ^= v >> 1;
    }
    min((s as Float) * INV_U32_MAX, ONE_MINUS_EPSILON)
}

/// Generate the n'th sample of a scrambled (0,2)-sequence.
///
/// * `n`        - The sample index.
/// * `scramble` - The scramble values for each dimension.
pub fn sample_02(n: u32, scramble: [u32; 2]) -> Point2f {
    Point2f::new(van_der_corput(n, scramble[0]), sobol_2(n, scramble[1]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_in_unit_square() {
        for n in 0..256 {
            let s = sample_02(n, [0xdeadbeef, 0x12345678]);
            assert!((0.0..1.0).contains(&s.x));
            assert!((0.0..1.0).contains(&s.y));
        }
    }

    #[test]
    fn unscrambled_van_der_corput_prefix() {
        assert_eq!(van_der_corput(0, 0), 0.0);
        assert_eq!(van_der_corput(1, 0), 0.5);
        assert_eq!(van_der_corput(2, 0), 0.25);
        assert_eq!(van_der_corput(3, 0), 0.75);
    }

    #[test]
    fn first_quarter_of_02_sequence_is_stratified() {
        // The first 4 samples of an unscrambled (0,2)-sequence land in
        // distinct quadrants.
        let mut seen = [false; 4];
        for n in 0..4 {
            let s = sample_02(n, [0, 0]);
            let q = (if s.x >= 0.5 { 1 } else { 0 }) + (if s.y >= 0.5 { 2 } else { 0 });
            seen[q] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
