//! Floating-point family semantics under MXCSR control.
//!
//! The emitted program runs with flush-to-zero enabled and a rounding mode
//! selected by FROUND. The host computes in round-to-nearest, so each
//! operation here takes the nearest result, recovers the sign of its
//! rounding error with an error-free transform (TwoSum for addition, a
//! fused multiply-add residual for multiplication, division and square
//! root, exact integer arithmetic for conversions) and steps one ulp when
//! the selected direction disagrees with nearest.
//!
//! Subnormal results are flushed to a zero of the same sign. Subnormal
//! inputs are used as they are (DAZ is not set).
//!
//! NaN results follow SSE: a NaN operand is returned quieted (the first
//! operand wins when both are NaN) and an invalid operation returns the
//! default negative quiet NaN.

#![allow(clippy::float_cmp)]

use std::cmp::Ordering;

/// MXCSR rounding control.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RoundingMode {
    /// Round to nearest, ties to even.
    #[default]
    Nearest,
    /// Round toward negative infinity.
    Down,
    /// Round toward positive infinity.
    Up,
    /// Round toward zero.
    TowardZero,
}

impl RoundingMode {
    /// Mode selected by the low two bits of `value` (the MXCSR RC encoding).
    pub const fn from_bits(value: u64) -> Self {
        match value & 3 {
            0 => Self::Nearest,
            1 => Self::Down,
            2 => Self::Up,
            _ => Self::TowardZero,
        }
    }
}

/// Smallest double greater than `x`.
pub fn next_up(x: f64) -> f64 {
    if x.is_nan() || x == f64::INFINITY {
        return x;
    }
    if x == 0.0 {
        return f64::from_bits(1);
    }
    let bits = x.to_bits();
    if x > 0.0 {
        f64::from_bits(bits + 1)
    } else {
        f64::from_bits(bits - 1)
    }
}

/// Largest double less than `x`.
pub fn next_down(x: f64) -> f64 {
    -next_up(-x)
}

fn sign_of(x: f64) -> Ordering {
    x.partial_cmp(&0.0).unwrap_or(Ordering::Equal)
}

/// Moves `nearest` one ulp in `mode`'s direction when the exact result
/// lies on the side given by `exact` (exact compared to nearest).
fn adjust(mode: RoundingMode, nearest: f64, exact: Ordering) -> f64 {
    match (mode, exact) {
        (RoundingMode::Nearest, _) | (_, Ordering::Equal) => nearest,
        (RoundingMode::Down, Ordering::Less) => next_down(nearest),
        (RoundingMode::Up, Ordering::Greater) => next_up(nearest),
        (RoundingMode::TowardZero, Ordering::Less) if nearest > 0.0 => next_down(nearest),
        (RoundingMode::TowardZero, Ordering::Greater) if nearest < 0.0 => next_up(nearest),
        _ => nearest,
    }
}

/// Overflowed nearest results lie beyond the exact value.
fn overflow(mode: RoundingMode, nearest: f64) -> f64 {
    adjust(mode, nearest, sign_of(-nearest))
}

/// Default NaN produced by invalid operations such as `inf - inf`.
pub const DEFAULT_NAN: f64 = f64::from_bits(0xFFF8_0000_0000_0000);

const QUIET_BIT: u64 = 1 << 51;

fn propagate_nan(a: f64, b: f64) -> Option<f64> {
    if a.is_nan() {
        Some(f64::from_bits(a.to_bits() | QUIET_BIT))
    } else if b.is_nan() {
        Some(f64::from_bits(b.to_bits() | QUIET_BIT))
    } else {
        None
    }
}

fn flush(x: f64) -> f64 {
    if x.is_subnormal() { 0.0f64.copysign(x) } else { x }
}

/// `a + b`.
pub fn add(mode: RoundingMode, a: f64, b: f64) -> f64 {
    if let Some(nan) = propagate_nan(a, b) {
        return nan;
    }
    let s = a + b;
    if s.is_nan() {
        return DEFAULT_NAN;
    }
    if !a.is_finite() || !b.is_finite() {
        return s;
    }
    if s.is_infinite() {
        return overflow(mode, s);
    }
    if s == 0.0 {
        // Exact cancellation: only round-down produces -0.
        if a == 0.0 && b == 0.0 && a.is_sign_negative() == b.is_sign_negative() {
            return a;
        }
        return if mode == RoundingMode::Down { -0.0 } else { 0.0 };
    }
    let bb = s - a;
    let err = (a - (s - bb)) + (b - bb);
    flush(adjust(mode, s, sign_of(err)))
}

/// `a - b`.
pub fn sub(mode: RoundingMode, a: f64, b: f64) -> f64 {
    // Negating a NaN would flip its sign bit.
    if let Some(nan) = propagate_nan(a, b) {
        return nan;
    }
    add(mode, a, -b)
}

/// `a * b`.
pub fn mul(mode: RoundingMode, a: f64, b: f64) -> f64 {
    if let Some(nan) = propagate_nan(a, b) {
        return nan;
    }
    let p = a * b;
    if p.is_nan() {
        return DEFAULT_NAN;
    }
    if !a.is_finite() || !b.is_finite() {
        return p;
    }
    if p.is_infinite() {
        return overflow(mode, p);
    }
    if p == 0.0 {
        return p;
    }
    let err = a.mul_add(b, -p);
    flush(adjust(mode, p, sign_of(err)))
}

/// `a / b`.
pub fn div(mode: RoundingMode, a: f64, b: f64) -> f64 {
    if let Some(nan) = propagate_nan(a, b) {
        return nan;
    }
    let q = a / b;
    if q.is_nan() {
        return DEFAULT_NAN;
    }
    if !a.is_finite() || !b.is_finite() || b == 0.0 {
        return q;
    }
    if q.is_infinite() {
        return overflow(mode, q);
    }
    if q == 0.0 {
        return q;
    }
    let r = (-q).mul_add(b, a);
    let exact = if b > 0.0 {
        sign_of(r)
    } else {
        sign_of(r).reverse()
    };
    flush(adjust(mode, q, exact))
}

/// Square root of `|a|`.
pub fn sqrt_abs(mode: RoundingMode, a: f64) -> f64 {
    let x = a.abs();
    if x.is_nan() {
        return f64::from_bits(x.to_bits() | QUIET_BIT);
    }
    let s = x.sqrt();
    if !x.is_finite() || x == 0.0 {
        return s;
    }
    let r = (-s).mul_add(s, x);
    adjust(mode, s, sign_of(r))
}

/// Converts a signed 64-bit integer to double.
pub fn from_i64(mode: RoundingMode, value: i64) -> f64 {
    let nearest = value as f64;
    let exact = i128::from(value).cmp(&(nearest as i128));
    adjust(mode, nearest, exact)
}
