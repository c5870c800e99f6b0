//! NA-propagating conversions between scalar kinds.
//!
//! Every conversion maps NA to NA. Conversions that cannot represent the
//! source value (a NaN or out-of-range double into an integer, a long outside
//! the `i32` range) also produce NA rather than saturating.
//!
//! Complex values convert to `f64` by projecting onto the real part. Integer
//! kinds only accept complex values whose imaginary part is zero; anything
//! else is NA.

use crate::complex::Complex;
use crate::logical::Logical;
use crate::na::{self, NaValue};

/// Conversion from `T` that preserves missing values.
pub trait FromNa<T>: Sized {
    /// Converts `value`, mapping NA (and unrepresentable values) to NA.
    fn from_na(value: T) -> Self;
}

/// The reciprocal of [`FromNa`].
pub trait IntoNa<T> {
    /// Converts `self` into `T`, mapping NA to NA.
    fn into_na(self) -> T;
}

impl<T, U: FromNa<T>> IntoNa<U> for T {
    #[inline]
    fn into_na(self) -> U {
        U::from_na(self)
    }
}

macro_rules! identity_conversions {
    ($($ty:ty),*) => {
        $(
            impl FromNa<$ty> for $ty {
                #[inline]
                fn from_na(value: $ty) -> Self {
                    value
                }
            }
        )*
    };
}

identity_conversions!(f64, f32, i32, i64, bool, Logical, Complex);

/// Implements a conversion that checks the source for NA first.
macro_rules! na_conversion {
    ($from:ty => $to:ty, |$v:ident| $body:expr) => {
        impl FromNa<$from> for $to {
            #[inline]
            fn from_na($v: $from) -> Self {
                if $v.is_na() {
                    <$to as NaValue>::na()
                } else {
                    $body
                }
            }
        }
    };
}

// ============================================================================
// Into f64
// ============================================================================

na_conversion!(i32 => f64, |v| f64::from(v));
na_conversion!(i64 => f64, |v| v as f64);
na_conversion!(f32 => f64, |v| f64::from(v));
na_conversion!(Complex => f64, |v| v.re);
na_conversion!(Logical => f64, |v| f64::from(v.to_i32()));

impl FromNa<bool> for f64 {
    #[inline]
    fn from_na(value: bool) -> Self {
        if value {
            1.0
        } else {
            0.0
        }
    }
}

// ============================================================================
// Into f32
// ============================================================================

na_conversion!(f64 => f32, |v| v as f32);
na_conversion!(i32 => f32, |v| v as f32);

// ============================================================================
// Into i32
// ============================================================================

impl FromNa<f64> for i32 {
    #[inline]
    fn from_na(value: f64) -> Self {
        let t = value.trunc();
        // NaN fails both comparisons
        if t > f64::from(na::INT) && t <= f64::from(i32::MAX) {
            t as i32
        } else {
            na::INT
        }
    }
}

na_conversion!(i64 => i32, |v| {
    if v > i64::from(na::INT) && v <= i64::from(i32::MAX) {
        v as i32
    } else {
        na::INT
    }
});
na_conversion!(Complex => i32, |v| {
    if v.is_real() {
        i32::from_na(v.re)
    } else {
        na::INT
    }
});
na_conversion!(Logical => i32, |v| v.to_i32());

impl FromNa<bool> for i32 {
    #[inline]
    fn from_na(value: bool) -> Self {
        i32::from(value)
    }
}

// ============================================================================
// Into i64
// ============================================================================

impl FromNa<f64> for i64 {
    #[inline]
    fn from_na(value: f64) -> Self {
        let t = value.trunc();
        // i64::MAX as f64 rounds up to 2^63, which is already out of range
        if t >= i64::MIN as f64 && t < i64::MAX as f64 {
            t as i64
        } else {
            na::LONG
        }
    }
}

na_conversion!(i32 => i64, |v| i64::from(v));
na_conversion!(Complex => i64, |v| {
    if v.is_real() {
        i64::from_na(v.re)
    } else {
        na::LONG
    }
});
na_conversion!(Logical => i64, |v| i64::from(v.to_i32()));

impl FromNa<bool> for i64 {
    #[inline]
    fn from_na(value: bool) -> Self {
        i64::from(value)
    }
}

// ============================================================================
// Into Complex
// ============================================================================

na_conversion!(f64 => Complex, |v| Complex::from_real(v));
na_conversion!(i32 => Complex, |v| Complex::from_real(f64::from(v)));
na_conversion!(i64 => Complex, |v| Complex::from_real(v as f64));
na_conversion!(Logical => Complex, |v| Complex::from_real(f64::from(v.to_i32())));

impl FromNa<bool> for Complex {
    #[inline]
    fn from_na(value: bool) -> Self {
        Complex::from_real(f64::from_na(value))
    }
}

// ============================================================================
// Into Logical
// ============================================================================

impl FromNa<f64> for Logical {
    #[inline]
    fn from_na(value: f64) -> Self {
        Logical::from_f64(value)
    }
}

impl FromNa<i32> for Logical {
    #[inline]
    fn from_na(value: i32) -> Self {
        Logical::from_i32(value)
    }
}

na_conversion!(i64 => Logical, |v| Logical::from_bool(v != 0));
na_conversion!(Complex => Logical, |v| Logical::from_bool(v != Complex::ZERO));

impl FromNa<bool> for Logical {
    #[inline]
    fn from_na(value: bool) -> Self {
        Logical::from_bool(value)
    }
}
