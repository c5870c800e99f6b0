//! Complex scalar.
//!
//! `Complex` is `#[repr(C)]`, so a `[Complex]` buffer has the layout of
//! interleaved `(re, im)` doubles.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::na::{self, NaValue};

/// A complex number with `f64` parts.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Complex {
    /// Real part.
    pub re: f64,
    /// Imaginary part.
    pub im: f64,
}

impl Complex {
    /// Zero.
    pub const ZERO: Complex = Complex { re: 0.0, im: 0.0 };

    /// One.
    pub const ONE: Complex = Complex { re: 1.0, im: 0.0 };

    /// The imaginary unit.
    pub const I: Complex = Complex { re: 0.0, im: 1.0 };

    /// Create a complex number from its parts.
    #[inline]
    #[must_use]
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Create a complex number with zero imaginary part.
    #[inline]
    #[must_use]
    pub const fn from_real(re: f64) -> Self {
        Self { re, im: 0.0 }
    }

    /// Real part.
    #[inline]
    pub const fn real(self) -> f64 {
        self.re
    }

    /// Imaginary part.
    #[inline]
    pub const fn imag(self) -> f64 {
        self.im
    }

    /// Modulus.
    #[inline]
    pub fn abs(self) -> f64 {
        self.re.hypot(self.im)
    }

    /// Squared modulus.
    #[inline]
    pub fn norm_sqr(self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    /// Argument in radians.
    #[inline]
    pub fn arg(self) -> f64 {
        self.im.atan2(self.re)
    }

    /// Complex conjugate.
    #[inline]
    #[must_use]
    pub fn conj(self) -> Self {
        Self::new(self.re, -self.im)
    }

    /// Returns true if either part is NaN (NA included).
    #[inline]
    pub fn is_nan(self) -> bool {
        self.re.is_nan() || self.im.is_nan()
    }

    /// Returns true if the imaginary part is exactly zero.
    #[inline]
    pub fn is_real(self) -> bool {
        self.im == 0.0
    }
}

impl From<f64> for Complex {
    fn from(re: f64) -> Self {
        Self::from_real(re)
    }
}

impl From<(f64, f64)> for Complex {
    fn from((re, im): (f64, f64)) -> Self {
        Self::new(re, im)
    }
}

// ============================================================================
// Arithmetic
// ============================================================================

impl Add for Complex {
    type Output = Complex;

    fn add(self, rhs: Complex) -> Complex {
        Complex::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub for Complex {
    type Output = Complex;

    fn sub(self, rhs: Complex) -> Complex {
        Complex::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Mul for Complex {
    type Output = Complex;

    fn mul(self, rhs: Complex) -> Complex {
        Complex::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

impl Div for Complex {
    type Output = Complex;

    fn div(self, rhs: Complex) -> Complex {
        let denom = rhs.norm_sqr();
        Complex::new(
            (self.re * rhs.re + self.im * rhs.im) / denom,
            (self.im * rhs.re - self.re * rhs.im) / denom,
        )
    }
}

impl Mul<f64> for Complex {
    type Output = Complex;

    fn mul(self, rhs: f64) -> Complex {
        Complex::new(self.re * rhs, self.im * rhs)
    }
}

impl Neg for Complex {
    type Output = Complex;

    fn neg(self) -> Complex {
        Complex::new(-self.re, -self.im)
    }
}

// ============================================================================
// Formatting and parsing
// ============================================================================

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_na() {
            return f.pad("NA");
        }
        let sign = if self.im.is_sign_negative() { '-' } else { '+' };
        match f.precision() {
            Some(p) => write!(f, "{:.*}{}{:.*}i", p, self.re, sign, p, self.im.abs()),
            None => write!(f, "{}{}{}i", self.re, sign, self.im.abs()),
        }
    }
}

/// Error returned when a string is not a complex literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid complex literal `{0}`")]
pub struct ParseComplexError(pub String);

impl FromStr for Complex {
    type Err = ParseComplexError;

    /// Accepts `a`, `bi`, `a+bi` and `a-bi`. `NA` parses to the NA value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || ParseComplexError(s.to_string());
        if s == "NA" {
            return Ok(na::complex());
        }
        let Some(body) = s.strip_suffix('i') else {
            return s.parse::<f64>().map(Complex::from_real).map_err(|_| err());
        };

        // Split at the last sign that is not a leading sign or an exponent sign.
        let bytes = body.as_bytes();
        let split = (1..bytes.len())
            .rev()
            .find(|&i| matches!(bytes[i], b'+' | b'-') && !matches!(bytes[i - 1], b'e' | b'E'));

        let parse_imag = |part: &str| -> Result<f64, ParseComplexError> {
            match part {
                "" | "+" => Ok(1.0),
                "-" => Ok(-1.0),
                p => p.parse::<f64>().map_err(|_| err()),
            }
        };

        match split {
            Some(i) => {
                let re = body[..i].parse::<f64>().map_err(|_| err())?;
                let im = parse_imag(&body[i..])?;
                Ok(Complex::new(re, im))
            }
            None => Ok(Complex::new(0.0, parse_imag(body)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_arithmetic() {
        let a = Complex::new(1.0, 2.0);
        let b = Complex::new(3.0, -1.0);
        assert_eq!(a + b, Complex::new(4.0, 1.0));
        assert_eq!(a - b, Complex::new(-2.0, 3.0));
        assert_eq!(a * b, Complex::new(5.0, 5.0));
        let q = (a * b) / b;
        assert_relative_eq!(q.re, 1.0);
        assert_relative_eq!(q.im, 2.0);
    }

    #[test]
    fn test_abs_and_conj() {
        let z = Complex::new(3.0, 4.0);
        assert_relative_eq!(z.abs(), 5.0);
        assert_eq!(z.conj(), Complex::new(3.0, -4.0));
    }

    #[test]
    fn test_parse() {
        assert_eq!("1+2i".parse::<Complex>(), Ok(Complex::new(1.0, 2.0)));
        assert_eq!("1.5-2i".parse::<Complex>(), Ok(Complex::new(1.5, -2.0)));
        assert_eq!("-3i".parse::<Complex>(), Ok(Complex::new(0.0, -3.0)));
        assert_eq!("i".parse::<Complex>(), Ok(Complex::I));
        assert_eq!("2.5".parse::<Complex>(), Ok(Complex::from_real(2.5)));
        assert_eq!("1e-3+1e2i".parse::<Complex>(), Ok(Complex::new(1e-3, 1e2)));
        assert!("abc".parse::<Complex>().is_err());
        assert!("NA".parse::<Complex>().map(|c| c.is_na()).unwrap_or(false));
    }

    #[test]
    fn test_display() {
        assert_eq!(Complex::new(1.0, -2.0).to_string(), "1-2i");
        assert_eq!(format!("{:.1}", Complex::new(1.0, 2.0)), "1.0+2.0i");
        assert_eq!(na::complex().to_string(), "NA");
    }

    #[test]
    fn test_repr_c_layout() {
        assert_eq!(std::mem::size_of::<Complex>(), 2 * std::mem::size_of::<f64>());
    }
}
