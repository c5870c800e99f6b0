//! The closed set of vector element kinds.

use std::any::{Any, TypeId};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use stratum_core::na;
use stratum_core::{Complex, Logical};

use crate::builder::Builder;
use crate::error::{VectorError, VectorResult};
use crate::value::Value;
use crate::vector::Vector;

/// Measurement scale of a vector type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scale {
    /// Values with magnitude.
    Numerical,
    /// Labels and categories.
    Nominal,
}

/// Element kind of a [`Vector`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VectorType {
    /// `f64` elements.
    Double,
    /// `i32` elements.
    Int,
    /// `i64` elements.
    Long,
    /// [`Logical`] elements.
    Logical,
    /// [`Complex`] elements.
    Complex,
    /// String elements.
    String,
    /// Opaque objects.
    Object,
    /// Elements of any kind, chosen per element.
    Variable,
}

impl VectorType {
    /// Every vector type.
    pub const ALL: [VectorType; 8] = [
        VectorType::Double,
        VectorType::Int,
        VectorType::Long,
        VectorType::Logical,
        VectorType::Complex,
        VectorType::String,
        VectorType::Object,
        VectorType::Variable,
    ];

    /// The vector type that stores values of the Rust type `T`. Types with
    /// no dedicated kind map to `Object`.
    pub fn of<T: Any + ?Sized>() -> Self {
        let id = TypeId::of::<T>();
        let is = |candidates: &[TypeId]| candidates.contains(&id);
        if is(&[TypeId::of::<f64>(), TypeId::of::<f32>()]) {
            VectorType::Double
        } else if is(&[
            TypeId::of::<i32>(),
            TypeId::of::<i16>(),
            TypeId::of::<i8>(),
            TypeId::of::<u16>(),
            TypeId::of::<u8>(),
        ]) {
            VectorType::Int
        } else if is(&[TypeId::of::<i64>(), TypeId::of::<u32>()]) {
            VectorType::Long
        } else if is(&[TypeId::of::<Logical>(), TypeId::of::<bool>()]) {
            VectorType::Logical
        } else if id == TypeId::of::<Complex>() {
            VectorType::Complex
        } else if is(&[
            TypeId::of::<String>(),
            TypeId::of::<str>(),
            TypeId::of::<Arc<str>>(),
            TypeId::of::<&'static str>(),
        ]) {
            VectorType::String
        } else if id == TypeId::of::<Value>() {
            VectorType::Variable
        } else {
            VectorType::Object
        }
    }

    /// The vector type a single value would be stored in.
    pub fn of_value(value: &Value) -> Self {
        match value {
            Value::Double(_) => VectorType::Double,
            Value::Int(_) => VectorType::Int,
            Value::Long(_) => VectorType::Long,
            Value::Logical(_) => VectorType::Logical,
            Value::Complex(_) => VectorType::Complex,
            Value::Str(_) => VectorType::String,
            Value::Na | Value::Any(_) => VectorType::Object,
        }
    }

    /// Lowercase name of the type.
    pub const fn name(self) -> &'static str {
        match self {
            VectorType::Double => "double",
            VectorType::Int => "int",
            VectorType::Long => "long",
            VectorType::Logical => "logical",
            VectorType::Complex => "complex",
            VectorType::String => "string",
            VectorType::Object => "object",
            VectorType::Variable => "variable",
        }
    }

    /// Measurement scale of the type.
    pub const fn scale(self) -> Scale {
        match self {
            VectorType::Double | VectorType::Int | VectorType::Long | VectorType::Complex => {
                Scale::Numerical
            }
            VectorType::Logical
            | VectorType::String
            | VectorType::Object
            | VectorType::Variable => Scale::Nominal,
        }
    }

    /// Returns true for numerical types.
    pub const fn is_numeric(self) -> bool {
        matches!(self.scale(), Scale::Numerical)
    }

    /// Returns true if elements of this type can be copied into an array.
    pub const fn is_array_compatible(self) -> bool {
        matches!(
            self,
            VectorType::Double
                | VectorType::Int
                | VectorType::Long
                | VectorType::Logical
                | VectorType::Complex
        )
    }

    /// The NA value of this type.
    pub fn na(self) -> Value {
        match self {
            VectorType::Double => Value::Double(na::double()),
            VectorType::Int => Value::Int(na::INT),
            VectorType::Long => Value::Long(na::LONG),
            VectorType::Logical => Value::Logical(Logical::Na),
            VectorType::Complex => Value::Complex(na::complex()),
            VectorType::String | VectorType::Object | VectorType::Variable => Value::Na,
        }
    }

    /// Returns true if `value` is NA.
    pub fn is_na(self, value: &Value) -> bool {
        value.is_na()
    }

    /// Order two values under this type's comparison.
    ///
    /// NA sorts before every other value. Ordinary NaN sorts after every
    /// number. Complex values have no order. Values of different kinds
    /// compare numerically when both are numeric and fail otherwise.
    pub fn compare_values(self, a: &Value, b: &Value) -> VectorResult<Ordering> {
        match (a.is_na(), b.is_na()) {
            (true, true) => return Ok(Ordering::Equal),
            (true, false) => return Ok(Ordering::Less),
            (false, true) => return Ok(Ordering::Greater),
            (false, false) => {}
        }
        match (a, b) {
            (Value::Complex(_), _) | (_, Value::Complex(_)) => Err(VectorError::Unsupported {
                operation: "ordering of complex values",
                vector_type: self,
            }),
            _ if self == VectorType::Complex => Err(VectorError::Unsupported {
                operation: "ordering of complex values",
                vector_type: self,
            }),
            (Value::Int(x), Value::Int(y)) => Ok(x.cmp(y)),
            (Value::Long(x), Value::Long(y)) => Ok(x.cmp(y)),
            (Value::Logical(x), Value::Logical(y)) => Ok(x.cmp(y)),
            (Value::Str(x), Value::Str(y)) => Ok(x.cmp(y)),
            _ => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => Ok(compare_f64(x, y)),
                _ => Err(VectorError::Unsupported {
                    operation: "ordering of mixed kinds",
                    vector_type: self,
                }),
            },
        }
    }

    /// Returns true if two values are equal under this type. NA equals NA.
    pub fn values_equal(self, a: &Value, b: &Value) -> bool {
        match self.compare_values(a, b) {
            Ok(ordering) => ordering == Ordering::Equal,
            Err(_) => a == b,
        }
    }

    /// Order element `i` of `a` against element `j` of `b`.
    pub fn compare(self, a: &Vector, i: usize, b: &Vector, j: usize) -> VectorResult<Ordering> {
        self.compare_values(&a.get_value(i)?, &b.get_value(j)?)
    }

    /// Returns true if element `i` of `a` equals element `j` of `b`.
    pub fn equals(self, a: &Vector, i: usize, b: &Vector, j: usize) -> VectorResult<bool> {
        Ok(self.values_equal(&a.get_value(i)?, &b.get_value(j)?))
    }

    /// An empty builder of this type.
    pub fn new_builder(self) -> Builder {
        Builder::new(self)
    }

    /// A builder of this type holding `len` NA elements.
    pub fn with_len(self, len: usize) -> Builder {
        Builder::with_len(self, len)
    }

    /// An empty builder of this type with room for `capacity` elements.
    pub fn with_capacity(self, capacity: usize) -> Builder {
        Builder::with_capacity(self, capacity)
    }

    /// A builder of this type filled with the elements of `vector`,
    /// converted to this type.
    pub fn copy(self, vector: &Vector) -> Builder {
        let mut builder = Builder::with_capacity(self, vector.len());
        builder.add_all(vector);
        builder
    }
}

/// Total order on non-NA doubles with NaN last.
pub(crate) fn compare_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b)
        .unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()))
}

impl fmt::Display for VectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_of_rust_types() {
        assert_eq!(VectorType::of::<f64>(), VectorType::Double);
        assert_eq!(VectorType::of::<u8>(), VectorType::Int);
        assert_eq!(VectorType::of::<i64>(), VectorType::Long);
        assert_eq!(VectorType::of::<bool>(), VectorType::Logical);
        assert_eq!(VectorType::of::<str>(), VectorType::String);
        assert_eq!(VectorType::of::<Value>(), VectorType::Variable);
        assert_eq!(VectorType::of::<Vec<u8>>(), VectorType::Object);
    }

    #[test]
    fn test_scale() {
        assert!(VectorType::Double.is_numeric());
        assert!(VectorType::Complex.is_numeric());
        assert!(!VectorType::Logical.is_numeric());
        assert_eq!(VectorType::String.scale(), Scale::Nominal);
    }

    #[test]
    fn test_na_sorts_first() {
        for ty in [VectorType::Double, VectorType::Int, VectorType::Long] {
            let na = ty.na();
            assert_eq!(
                ty.compare_values(&na, &Value::Int(-5)).unwrap(),
                Ordering::Less
            );
            assert_eq!(ty.compare_values(&na, &na).unwrap(), Ordering::Equal);
        }
        assert_eq!(
            VectorType::String
                .compare_values(&Value::from("a"), &Value::Na)
                .unwrap(),
            Ordering::Greater
        );
    }

    #[test]
    fn test_nan_sorts_after_numbers() {
        let ty = VectorType::Double;
        assert_eq!(
            ty.compare_values(&Value::Double(f64::NAN), &Value::Double(1e300))
                .unwrap(),
            Ordering::Greater
        );
        assert_eq!(
            ty.compare_values(&Value::Double(f64::NAN), &Value::Double(f64::NAN))
                .unwrap(),
            Ordering::Equal
        );
    }

    #[test]
    fn test_complex_has_no_order() {
        let ty = VectorType::Complex;
        let a = Value::Complex(Complex::new(1.0, 2.0));
        assert!(ty.compare_values(&a, &a).is_err());
        assert!(ty.values_equal(&a, &a));
        assert!(ty.compare_values(&ty.na(), &a).is_ok());
    }

    #[test]
    fn test_mixed_kinds() {
        let ty = VectorType::Variable;
        assert_eq!(
            ty.compare_values(&Value::Int(2), &Value::Double(1.5)).unwrap(),
            Ordering::Greater
        );
        assert!(ty.compare_values(&Value::Int(2), &Value::from("2")).is_err());
        assert!(!ty.values_equal(&Value::Int(2), &Value::from("2")));
    }

    #[test]
    fn test_display() {
        assert_eq!(VectorType::Logical.to_string(), "logical");
    }
}
