//! Common

#![allow(dead_code)]

use num_traits::{Num, Zero};
use std::ops::Neg;

/// Use 32-bit precision for floating point numbers.
pub type Float = f32;

/// Default signed integer to 32-bit.
pub type Int = i32;

/// Infinity (∞)
pub const INFINITY: Float = Float::INFINITY;

/// PI (π)
pub const PI: Float = std::f32::consts::PI;

/// 1/PI (1/π)
pub const INV_PI: Float = 1.0 / PI;

/// PI/2 (π/2)
pub const PI_OVER_TWO: Float = PI * 0.5;

/// PI/4 (π/4)
pub const PI_OVER_FOUR: Float = PI * 0.25;

/// 2*PI (2π)
pub const TWO_PI: Float = PI * 2.0;

/// 4*PI (4π)
pub const FOUR_PI: Float = PI * 4.0;

/// 1/4*PI (1/4π)
pub const INV_FOUR_PI: Float = 1.0 / FOUR_PI;

/// Machine Epsilon
pub const MACHINE_EPSILON: Float = f32::EPSILON * 0.5;

/// Shadow Epsilon
pub const SHADOW_EPSILON: Float = 0.0001;

/// Returns the absolute value of a number.
///
/// * `n` - The number.
#[inline(always)]
pub fn abs<T>(n: T) -> T
where
    T: Num + Neg<Output = T> + PartialOrd + Copy,
{
    if n < T::zero() {
        -n
    } else {
        n
    }
}

/// Returns the minimum of 2 numbers.
///
/// * `a` - First number.
/// * `b` - Second number.
#[inline(always)]
pub fn min<T>(a: T, b: T) -> T
where
    T: Num + PartialOrd + Copy,
{
    if a < b {
        a
    } else {
        b
    }
}

/// Returns the maximum of 2 numbers.
///
/// * `a` - First number.
/// * `b` - Second number.
#[inline(always)]
pub fn max<T>(a: T, b: T) -> T
where
    T: Num + PartialOrd + Copy,
{
    if a > b {
        a
    } else {
        b
    }
}

/// Clamps a value between a minimum and maximum value.
///
/// * `val` - The number to clamp.
/// * `low` - Minimum value.
/// * `high` - Maximum value.
#[inline(always)]
pub fn clamp<T>(val: T, low: T, high: T) -> T
where
    T: Num + PartialOrd + Copy,
{
    if val < low {
        low
    } else if val > high {
        high
    } else {
        val
    }
}

/// Linearly interpolate between two values.
///
/// * `t`  - Interpolation parameter.
/// * `v1` - Value at `t` = 0.
/// * `v2` - Value at `t` = 1.
#[inline(always)]
pub fn lerp(t: Float, v1: Float, v2: Float) -> Float {
    (1.0 - t) * v1 + t * v2
}

/// Returns the cosine of an angle given in radians.
///
/// * `theta` - The angle in radians.
#[inline(always)]
pub fn cos(theta: Float) -> Float {
    theta.cos()
}

/// Returns the sine of an angle given in radians.
///
/// * `theta` - The angle in radians.
#[inline(always)]
pub fn sin(theta: Float) -> Float {
    theta.sin()
}

/// Returns the next power of 2 that is greater than or equal to a value.
///
/// * `n` - The number.
#[inline(always)]
pub fn round_up_pow2(n: u32) -> u32 {
    if n.is_power_of_two() {
        n
    } else {
        n.next_power_of_two()
    }
}

/// Solve a quadratic equation returning the two real roots in ascending
/// order, or `None` if there are no real solutions. The discriminant is
/// evaluated in double precision to reduce cancellation error.
///
/// * `a` - Coefficient of the squared term.
/// * `b` - Coefficient of the linear term.
/// * `c` - Constant term.
pub fn quadratic(a: Float, b: Float, c: Float) -> Option<(Float, Float)> {
    let (a, b, c) = (a as f64, b as f64, c as f64);
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }
    let root = discriminant.sqrt();
    let q = if b < 0.0 {
        -0.5 * (b - root)
    } else {
        -0.5 * (b + root)
    };
    let (t0, t1) = (q / a, c / q);
    if t0 > t1 {
        Some((t1 as Float, t0 as Float))
    } else {
        Some((t0 as Float, t1 as Float))
    }
}

/// Returns true if a number is zero.
///
/// * `n` - The number.
#[inline(always)]
pub fn is_zero<T: Zero>(n: T) -> bool {
    n.is_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_bounds() {
        assert_eq!(clamp(0.5, 1.0, 2.0), 1.0);
        assert_eq!(clamp(3.5, 1.0, 2.0), 2.0);
        assert_eq!(clamp(1.5, 1.0, 2.0), 1.5);
    }

    #[test]
    fn round_up_pow2_values() {
        assert_eq!(round_up_pow2(1), 1);
        assert_eq!(round_up_pow2(2), 2);
        assert_eq!(round_up_pow2(3), 4);
        assert_eq!(round_up_pow2(4096), 4096);
        assert_eq!(round_up_pow2(4097), 8192);
    }
}
