//! Elementwise arithmetic between vectors.
//!
//! Operands are promoted to a common kind before the operation runs:
//!
//! | Operands | Result |
//! |----------|--------|
//! | int and logical | int |
//! | int, long and logical | long |
//! | any complex | complex |
//! | any other numeric mix | double |
//! | strings, objects, variables | variable, per element |
//!
//! NA on either side gives NA. Integer arithmetic wraps, and integer
//! division by zero is NA.

use serde::{Deserialize, Serialize};
use stratum_array::NumericElement;

use crate::builder::Builder;
use crate::coerce::{self, Mode};
use crate::error::{VectorError, VectorResult};
use crate::value::Value;
use crate::vector::Vector;
use crate::vector_type::VectorType;

/// A binary arithmetic operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArithOp {
    /// Addition.
    Add,
    /// Subtraction.
    Sub,
    /// Multiplication.
    Mul,
    /// Division.
    Div,
}

impl ArithOp {
    /// Lowercase name of the operation.
    pub const fn name(self) -> &'static str {
        match self {
            ArithOp::Add => "add",
            ArithOp::Sub => "sub",
            ArithOp::Mul => "mul",
            ArithOp::Div => "div",
        }
    }

    /// Apply the operation to two numeric elements, propagating NA.
    #[inline]
    pub fn apply<T: NumericElement>(self, a: T, b: T) -> T {
        match self {
            ArithOp::Add => a.na_add(b),
            ArithOp::Sub => a.na_sub(b),
            ArithOp::Mul => a.na_mul(b),
            ArithOp::Div => a.na_div(b),
        }
    }

    /// Apply the operation to two dynamic values. Values without a numeric
    /// meaning give NA.
    pub fn apply_values(self, a: &Value, b: &Value) -> Value {
        if a.is_na() || b.is_na() {
            return Value::Na;
        }
        match promote(value_kind(a), value_kind(b)) {
            VectorType::Int => match (as_int(a), as_int(b)) {
                (Some(x), Some(y)) => Value::Int(self.apply(x, y)),
                _ => Value::Na,
            },
            VectorType::Long => match (as_long(a), as_long(b)) {
                (Some(x), Some(y)) => Value::Long(self.apply(x, y)),
                _ => Value::Na,
            },
            VectorType::Complex => match (coerce::to_complex(a), coerce::to_complex(b)) {
                (Some(x), Some(y)) => Value::Complex(self.apply(x, y)),
                _ => Value::Na,
            },
            VectorType::Double => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => Value::Double(self.apply(x, y)),
                _ => Value::Na,
            },
            _ => Value::Na,
        }
    }
}

fn as_int(value: &Value) -> Option<i32> {
    coerce::to_int(value, Mode::Exact)
}

fn as_long(value: &Value) -> Option<i64> {
    coerce::to_long(value, Mode::Exact)
}

/// The kind a single value takes part in arithmetic as.
fn value_kind(value: &Value) -> VectorType {
    match value {
        Value::Str(_) | Value::Any(_) | Value::Na => VectorType::Object,
        other => VectorType::of_value(other),
    }
}

/// The common kind two operand kinds are promoted to.
pub(crate) fn promote(a: VectorType, b: VectorType) -> VectorType {
    use VectorType::*;
    let integral = |t| matches!(t, Int | Logical);
    let numeric = |t| matches!(t, Double | Int | Long | Logical | Complex);
    if integral(a) && integral(b) {
        Int
    } else if (integral(a) || a == Long) && (integral(b) || b == Long) {
        Long
    } else if numeric(a) && numeric(b) {
        if a == Complex || b == Complex {
            Complex
        } else {
            Double
        }
    } else {
        Variable
    }
}

impl Vector {
    /// Combine this vector with `other` element by element into a vector of
    /// type `vector_type`. The results of `combiner` are coerced the way a
    /// builder coerces them.
    pub fn combine<F>(
        &self,
        other: &Vector,
        vector_type: VectorType,
        mut combiner: F,
    ) -> VectorResult<Vector>
    where
        F: FnMut(Value, Value) -> Value,
    {
        self.check_same_len(other)?;
        let mut builder = Builder::with_capacity(vector_type, self.len());
        for (a, b) in self.values().zip(other.values()) {
            builder.add(combiner(a, b));
        }
        Ok(builder.build())
    }

    /// Apply `op` element by element.
    pub fn arith(&self, op: ArithOp, other: &Vector) -> VectorResult<Vector> {
        self.check_same_len(other)?;
        Ok(self.arith_aligned(op, other))
    }

    /// `other` must have this vector's length.
    fn arith_aligned(&self, op: ArithOp, other: &Vector) -> Vector {
        let vector_type = promote(self.vector_type(), other.vector_type());
        tracing::trace!(
            op = op.name(),
            left = %self.vector_type(),
            right = %other.vector_type(),
            result = %vector_type,
            len = self.len(),
            "vector arithmetic"
        );
        let n = self.len();
        match vector_type {
            VectorType::Int => (0..n)
                .map(|i| op.apply(self.int_at(i), other.int_at(i)))
                .collect(),
            VectorType::Long => (0..n)
                .map(|i| op.apply(self.long_at(i), other.long_at(i)))
                .collect(),
            VectorType::Double => (0..n)
                .map(|i| op.apply(self.double_at(i), other.double_at(i)))
                .collect(),
            VectorType::Complex => (0..n)
                .map(|i| op.apply(self.complex_at(i), other.complex_at(i)))
                .collect(),
            _ => {
                let mut builder = Builder::with_capacity(VectorType::Variable, n);
                for (a, b) in self.values().zip(other.values()) {
                    builder.add(op.apply_values(&a, &b));
                }
                builder.build()
            }
        }
    }

    /// Elementwise sum.
    pub fn add(&self, other: &Vector) -> VectorResult<Vector> {
        self.arith(ArithOp::Add, other)
    }

    /// Elementwise difference.
    pub fn sub(&self, other: &Vector) -> VectorResult<Vector> {
        self.arith(ArithOp::Sub, other)
    }

    /// Elementwise product.
    pub fn mul(&self, other: &Vector) -> VectorResult<Vector> {
        self.arith(ArithOp::Mul, other)
    }

    /// Elementwise quotient.
    pub fn div(&self, other: &Vector) -> VectorResult<Vector> {
        self.arith(ArithOp::Div, other)
    }

    /// Apply `op` between every element and `scalar`.
    pub fn arith_scalar(&self, op: ArithOp, scalar: impl Into<Value>) -> Vector {
        self.arith_aligned(op, &Vector::singleton(scalar, self.len()))
    }

    /// `self + scalar`, element by element.
    pub fn add_scalar(&self, scalar: impl Into<Value>) -> Vector {
        self.arith_scalar(ArithOp::Add, scalar)
    }

    /// `self - scalar`, element by element.
    pub fn sub_scalar(&self, scalar: impl Into<Value>) -> Vector {
        self.arith_scalar(ArithOp::Sub, scalar)
    }

    /// `self * scalar`, element by element.
    pub fn mul_scalar(&self, scalar: impl Into<Value>) -> Vector {
        self.arith_scalar(ArithOp::Mul, scalar)
    }

    /// `self / scalar`, element by element.
    pub fn div_scalar(&self, scalar: impl Into<Value>) -> Vector {
        self.arith_scalar(ArithOp::Div, scalar)
    }

    fn check_same_len(&self, other: &Vector) -> VectorResult<()> {
        if self.len() == other.len() {
            Ok(())
        } else {
            Err(VectorError::LengthMismatch {
                left: self.len(),
                right: other.len(),
            })
        }
    }
}
