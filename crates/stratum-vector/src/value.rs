//! Dynamically typed element values.

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use stratum_core::na::DOUBLE_NA_BITS;
use stratum_core::{Complex, FromNa, Logical, NaValue};

/// A single element of any vector kind.
///
/// `Value` is the currency builders accept and untyped accessors return.
/// Every NA compares equal to every other NA, whatever its variant.
#[derive(Clone, Default)]
pub enum Value {
    /// A missing value with no particular kind.
    #[default]
    Na,
    /// A double.
    Double(f64),
    /// A 32-bit integer.
    Int(i32),
    /// A 64-bit integer.
    Long(i64),
    /// A three-valued boolean.
    Logical(Logical),
    /// A complex number.
    Complex(Complex),
    /// A shared string.
    Str(Arc<str>),
    /// An opaque object.
    Any(Arc<dyn Any + Send + Sync>),
}

impl Value {
    /// Wrap an arbitrary object.
    pub fn any<T: Any + Send + Sync>(value: T) -> Self {
        Value::Any(Arc::new(value))
    }

    /// Returns true for NA of any kind, including the primitive sentinels.
    pub fn is_na(&self) -> bool {
        match self {
            Value::Na => true,
            Value::Double(x) => x.is_na(),
            Value::Int(x) => x.is_na(),
            Value::Long(x) => x.is_na(),
            Value::Logical(x) => x.is_na(),
            Value::Complex(x) => x.is_na(),
            Value::Str(_) | Value::Any(_) => false,
        }
    }

    /// The value as a double if it is numeric or logical. Complex values
    /// project onto their real part.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Na => Some(f64::na()),
            Value::Double(x) => Some(*x),
            Value::Int(x) => Some(f64::from_na(*x)),
            Value::Long(x) => Some(f64::from_na(*x)),
            Value::Logical(x) => Some(f64::from_na(*x)),
            Value::Complex(x) => Some(f64::from_na(*x)),
            Value::Str(_) | Value::Any(_) => None,
        }
    }

    /// The string payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The wrapped object, if it is a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Any(obj) => obj.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Short lowercase name of the variant.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Na => "na",
            Value::Double(_) => "double",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Logical(_) => "logical",
            Value::Complex(_) => "complex",
            Value::Str(_) => "string",
            Value::Any(_) => "object",
        }
    }
}

/// Bits that identify a double for equality and hashing: one NA, one NaN
/// and a single zero.
pub(crate) fn canonical_bits(x: f64) -> u64 {
    if x.is_na() {
        DOUBLE_NA_BITS
    } else if x.is_nan() {
        f64::NAN.to_bits()
    } else if x == 0.0 {
        0
    } else {
        x.to_bits()
    }
}

fn same_f64(a: f64, b: f64) -> bool {
    canonical_bits(a) == canonical_bits(b)
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self.is_na(), other.is_na()) {
            (true, true) => return true,
            (true, false) | (false, true) => return false,
            _ => {}
        }
        match (self, other) {
            (Value::Double(a), Value::Double(b)) => same_f64(*a, *b),
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Logical(a), Value::Logical(b)) => a == b,
            (Value::Complex(a), Value::Complex(b)) => same_f64(a.re, b.re) && same_f64(a.im, b.im),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Any(a), Value::Any(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if self.is_na() {
            state.write_u8(0);
            return;
        }
        match self {
            Value::Na => {}
            Value::Double(x) => {
                state.write_u8(1);
                canonical_bits(*x).hash(state);
            }
            Value::Int(x) => {
                state.write_u8(2);
                x.hash(state);
            }
            Value::Long(x) => {
                state.write_u8(3);
                x.hash(state);
            }
            Value::Logical(x) => {
                state.write_u8(4);
                x.hash(state);
            }
            Value::Complex(x) => {
                state.write_u8(5);
                canonical_bits(x.re).hash(state);
                canonical_bits(x.im).hash(state);
            }
            Value::Str(s) => {
                state.write_u8(6);
                s.hash(state);
            }
            Value::Any(obj) => {
                state.write_u8(7);
                (Arc::as_ptr(obj) as *const () as usize).hash(state);
            }
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Na => write!(f, "Na"),
            Value::Double(x) => f.debug_tuple("Double").field(x).finish(),
            Value::Int(x) => f.debug_tuple("Int").field(x).finish(),
            Value::Long(x) => f.debug_tuple("Long").field(x).finish(),
            Value::Logical(x) => f.debug_tuple("Logical").field(x).finish(),
            Value::Complex(x) => f.debug_tuple("Complex").field(x).finish(),
            Value::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Value::Any(_) => write!(f, "Any(..)"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_na() {
            return write!(f, "NA");
        }
        match self {
            Value::Na => write!(f, "NA"),
            Value::Double(x) => write!(f, "{x}"),
            Value::Int(x) => write!(f, "{x}"),
            Value::Long(x) => write!(f, "{x}"),
            Value::Logical(x) => write!(f, "{x}"),
            Value::Complex(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Any(_) => write!(f, "<object>"),
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value.into())
                }
            }
        )*
    };
}

value_from!(
    f64 => Double,
    f32 => Double,
    i32 => Int,
    i16 => Int,
    i8 => Int,
    u16 => Int,
    u8 => Int,
    i64 => Long,
    u32 => Long,
    Logical => Logical,
    bool => Logical,
    Complex => Complex,
    &str => Str,
    String => Str,
    Arc<str> => Str,
);

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::Str(value.as_str().into())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Na, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratum_core::na;

    #[test]
    fn test_na_equality_across_variants() {
        assert_eq!(Value::Na, Value::Double(na::double()));
        assert_eq!(Value::Int(na::INT), Value::Logical(Logical::Na));
        assert_ne!(Value::Na, Value::Double(f64::NAN));
        assert_ne!(Value::Double(1.0), Value::Int(1));
    }

    #[test]
    fn test_double_canonical_equality() {
        assert_eq!(Value::Double(0.0), Value::Double(-0.0));
        assert_eq!(Value::Double(f64::NAN), Value::Double(-f64::NAN));
        assert_ne!(Value::Double(f64::NAN), Value::Double(na::double()));
    }

    #[test]
    fn test_from_conversions() {
        assert!(matches!(Value::from(2.5_f32), Value::Double(x) if x == 2.5));
        assert!(matches!(Value::from(true), Value::Logical(Logical::True)));
        assert!(matches!(Value::from("a"), Value::Str(_)));
        assert!(Value::from(None::<i32>).is_na());
        assert!(matches!(Value::from(Some(3_i64)), Value::Long(3)));
    }

    #[test]
    fn test_any_identity() {
        let a = Value::any(vec![1, 2]);
        let b = a.clone();
        assert_eq!(a, b);
        assert_ne!(a, Value::any(vec![1, 2]));
        assert_eq!(a.downcast_ref::<Vec<i32>>(), Some(&vec![1, 2]));
        assert_eq!(a.to_string(), "<object>");
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Double(na::double()).to_string(), "NA");
        assert_eq!(Value::Int(3).to_string(), "3");
        assert_eq!(Value::Logical(Logical::True).to_string(), "TRUE");
    }
}
