//! Sentinel encoding of missing values.
//!
//! Each primitive kind reserves one bit pattern (or value) to mean "not
//! available". The predicates here are the only way NA should be tested:
//! `f64` NA is a NaN, so `x == na::double()` is always false.

use crate::complex::Complex;
use crate::logical::Logical;

// ============================================================================
// Sentinels
// ============================================================================

/// Bit pattern of the `f64` NA value.
pub const DOUBLE_NA_BITS: u64 = 0x7ff0_0000_0000_0009;

/// Mask applied to the low bits of a NaN when testing for NA.
pub const DOUBLE_NA_MASK: u64 = 0xF;

/// Value the masked low bits must have for a NaN to be NA.
pub const DOUBLE_NA_RESULT: u64 = 9;

/// Bit pattern of the `f32` NA value.
pub const FLOAT_NA_BITS: u32 = 0xff80_0009;

/// Mask applied to the low bits of an `f32` NaN when testing for NA.
pub const FLOAT_NA_MASK: u32 = 0xF;

/// Value the masked low bits must have for an `f32` NaN to be NA.
pub const FLOAT_NA_RESULT: u32 = 9;

/// The `i32` NA value.
pub const INT: i32 = i32::MIN;

/// The `i64` NA value.
pub const LONG: i64 = i64::MAX;

/// The `f64` NA value.
#[inline]
#[must_use]
pub fn double() -> f64 {
    f64::from_bits(DOUBLE_NA_BITS)
}

/// The `f32` NA value.
#[inline]
#[must_use]
pub fn float() -> f32 {
    f32::from_bits(FLOAT_NA_BITS)
}

/// The complex NA value, `(NA, NA)`.
#[inline]
#[must_use]
pub fn complex() -> Complex {
    Complex::new(double(), double())
}

// ============================================================================
// Predicates
// ============================================================================

/// Returns true if `value` is the `f64` NA sentinel.
#[inline]
pub fn is_double(value: f64) -> bool {
    value.is_nan() && (value.to_bits() & DOUBLE_NA_MASK) == DOUBLE_NA_RESULT
}

/// Returns true if `value` is the `f32` NA sentinel.
#[inline]
pub fn is_float(value: f32) -> bool {
    value.is_nan() && (value.to_bits() & FLOAT_NA_MASK) == FLOAT_NA_RESULT
}

/// Returns true if `value` is the `i32` NA sentinel.
#[inline]
pub fn is_int(value: i32) -> bool {
    value == INT
}

/// Returns true if `value` is the `i64` NA sentinel.
#[inline]
pub fn is_long(value: i64) -> bool {
    value == LONG
}

/// Returns true if either part of `value` is NA.
#[inline]
pub fn is_complex(value: Complex) -> bool {
    is_double(value.re) || is_double(value.im)
}

// ============================================================================
// NaValue
// ============================================================================

/// A type with an in-band missing value.
pub trait NaValue: Sized {
    /// The NA value of this type.
    fn na() -> Self;

    /// Returns true if this value is NA.
    fn is_na(&self) -> bool;
}

impl NaValue for f64 {
    #[inline]
    fn na() -> Self {
        double()
    }

    #[inline]
    fn is_na(&self) -> bool {
        is_double(*self)
    }
}

impl NaValue for f32 {
    #[inline]
    fn na() -> Self {
        float()
    }

    #[inline]
    fn is_na(&self) -> bool {
        is_float(*self)
    }
}

impl NaValue for i32 {
    #[inline]
    fn na() -> Self {
        INT
    }

    #[inline]
    fn is_na(&self) -> bool {
        is_int(*self)
    }
}

impl NaValue for i64 {
    #[inline]
    fn na() -> Self {
        LONG
    }

    #[inline]
    fn is_na(&self) -> bool {
        is_long(*self)
    }
}

impl NaValue for Complex {
    #[inline]
    fn na() -> Self {
        complex()
    }

    #[inline]
    fn is_na(&self) -> bool {
        is_complex(*self)
    }
}

impl NaValue for Logical {
    #[inline]
    fn na() -> Self {
        Logical::Na
    }

    #[inline]
    fn is_na(&self) -> bool {
        matches!(self, Logical::Na)
    }
}

/// `None` plays the role of NA for reference-like values.
impl<T> NaValue for Option<T> {
    #[inline]
    fn na() -> Self {
        None
    }

    #[inline]
    fn is_na(&self) -> bool {
        self.is_none()
    }
}

/// Returns the NA value of `T`.
#[inline]
pub fn na<T: NaValue>() -> T {
    T::na()
}

/// Returns true if `value` is NA.
#[inline]
pub fn is_na<T: NaValue>(value: &T) -> bool {
    value.is_na()
}

/// Formats `value`, printing `NA` for missing values.
pub fn to_string<T: NaValue + std::fmt::Display>(value: &T) -> String {
    if value.is_na() {
        "NA".to_string()
    } else {
        value.to_string()
    }
}

// ============================================================================
// Combinators
// ============================================================================

/// Wraps a unary operation so that NA inputs pass through untouched.
pub fn ignore<T, F>(op: F) -> impl Fn(T) -> T
where
    T: NaValue,
    F: Fn(T) -> T,
{
    move |value| if value.is_na() { value } else { op(value) }
}

/// Wraps a binary operation so that it yields NA when either input is NA.
pub fn ignore2<T, F>(op: F) -> impl Fn(T, T) -> T
where
    T: NaValue,
    F: Fn(T, T) -> T,
{
    move |a, b| {
        if a.is_na() || b.is_na() {
            T::na()
        } else {
            op(a, b)
        }
    }
}

/// Wraps a binary operation so that a single NA operand is replaced by
/// `fill`. Only when both operands are NA is the result NA.
pub fn ignore2_or<T, F>(op: F, fill: T) -> impl Fn(T, T) -> T
where
    T: NaValue + Copy,
    F: Fn(T, T) -> T,
{
    move |a, b| match (a.is_na(), b.is_na()) {
        (true, true) => T::na(),
        (true, false) => op(fill, b),
        (false, true) => op(a, fill),
        (false, false) => op(a, b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_sentinel_bits() {
        assert_eq!(double().to_bits(), 0x7ff0_0000_0000_0009);
        assert!(is_double(double()));
    }

    #[test]
    fn test_nan_is_not_na() {
        assert!(!is_double(f64::NAN));
        #[allow(clippy::zero_divided_by_zero)]
        let computed = 0.0_f64 / 0.0;
        assert!(!is_double(computed));
        assert!(!is_double(1.0));
    }

    #[test]
    fn test_float_sentinel() {
        assert!(is_float(float()));
        assert!(!is_float(f32::NAN));
        assert!(!is_float(0.5));
    }

    #[test]
    fn test_integer_sentinels() {
        assert!(is_int(i32::MIN));
        assert!(!is_int(0));
        assert!(is_long(i64::MAX));
        assert!(!is_long(i64::MIN));
    }

    #[test]
    fn test_complex_either_part() {
        assert!(is_complex(complex()));
        assert!(is_complex(Complex::new(1.0, double())));
        assert!(is_complex(Complex::new(double(), 1.0)));
        assert!(!is_complex(Complex::new(1.0, f64::NAN)));
    }

    #[test]
    fn test_option_na() {
        assert!(na::<Option<String>>().is_na());
        assert!(!Some(3).is_na());
    }

    #[test]
    fn test_ignore() {
        let double_it = ignore(|x: f64| x * 2.0);
        assert_eq!(double_it(2.0), 4.0);
        assert!(is_double(double_it(double())));
    }

    #[test]
    fn test_ignore2() {
        let add = ignore2(|a: i32, b: i32| a + b);
        assert_eq!(add(1, 2), 3);
        assert!(is_int(add(INT, 2)));
        assert!(is_int(add(2, INT)));
    }

    #[test]
    fn test_ignore2_or() {
        let add = ignore2_or(|a: f64, b: f64| a + b, 0.0);
        assert_eq!(add(double(), 2.0), 2.0);
        assert_eq!(add(3.0, double()), 3.0);
        assert!(is_double(add(double(), double())));
    }

    #[test]
    fn test_to_string() {
        assert_eq!(to_string(&double()), "NA");
        assert_eq!(to_string(&1.5), "1.5");
        assert_eq!(to_string(&INT), "NA");
    }
}
