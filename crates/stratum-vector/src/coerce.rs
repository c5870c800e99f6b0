//! Conversions from [`Value`] into each element kind.
//!
//! Every function returns `None` when the value has no meaning in the target
//! kind. NA always converts to the target's NA.

use std::sync::Arc;

use stratum_core::{na, Complex, FromNa, Logical, NaValue};

use crate::resolver;
use crate::value::Value;
use crate::vector_type::VectorType;

/// How strictly numeric values are narrowed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Only conversions that keep the value. Used when storing.
    Exact,
    /// Truncate and project. Used by typed accessors.
    Project,
}

/// Resolve a string or object into `target`, rejecting results that are
/// themselves unresolved.
fn resolved(target: VectorType, value: &Value) -> Option<Value> {
    resolver::resolve(target, value).filter(|v| !matches!(v, Value::Str(_) | Value::Any(_)))
}

pub(crate) fn to_double(value: &Value, mode: Mode) -> Option<f64> {
    match value {
        Value::Complex(c) if mode == Mode::Exact && !c.is_na() && !c.is_real() => None,
        // past 2^53 not every long has a double
        Value::Long(x) if mode == Mode::Exact && !x.is_na() && *x as f64 as i64 != *x => None,
        Value::Str(_) | Value::Any(_) => {
            resolved(VectorType::Double, value).and_then(|v| to_double(&v, mode))
        }
        other => other.as_f64(),
    }
}

pub(crate) fn to_int(value: &Value, mode: Mode) -> Option<i32> {
    match value {
        Value::Na => Some(na::INT),
        Value::Int(x) => Some(*x),
        Value::Logical(x) => Some(x.to_i32()),
        Value::Long(x) => narrow(x.is_na(), i32::from_na(*x), mode),
        Value::Double(x) => {
            let out = i32::from_na(*x);
            if mode == Mode::Exact && !x.is_na() && f64::from_na(out) != *x {
                None
            } else {
                Some(out)
            }
        }
        Value::Complex(c) => match to_double(value, mode) {
            Some(re) if !c.is_na() => to_int(&Value::Double(re), mode),
            Some(_) => Some(na::INT),
            None => None,
        },
        Value::Str(_) | Value::Any(_) => {
            resolved(VectorType::Int, value).and_then(|v| to_int(&v, mode))
        }
    }
}

pub(crate) fn to_long(value: &Value, mode: Mode) -> Option<i64> {
    match value {
        Value::Na => Some(na::LONG),
        Value::Long(x) => Some(*x),
        Value::Int(x) => Some(i64::from_na(*x)),
        Value::Logical(x) => Some(i64::from_na(*x)),
        Value::Double(x) => {
            let out = i64::from_na(*x);
            if mode == Mode::Exact && !x.is_na() && (out.is_na() || out as f64 != *x) {
                None
            } else {
                Some(out)
            }
        }
        Value::Complex(c) => match to_double(value, mode) {
            Some(re) if !c.is_na() => to_long(&Value::Double(re), mode),
            Some(_) => Some(na::LONG),
            None => None,
        },
        Value::Str(_) | Value::Any(_) => {
            resolved(VectorType::Long, value).and_then(|v| to_long(&v, mode))
        }
    }
}

pub(crate) fn to_logical(value: &Value, mode: Mode) -> Option<Logical> {
    match value {
        Value::Na => Some(Logical::Na),
        Value::Logical(x) => Some(*x),
        Value::Int(x) => Some(Logical::from_na(*x)),
        Value::Long(x) => Some(Logical::from_na(*x)),
        Value::Double(x) => Some(Logical::from_na(*x)),
        Value::Complex(c) if mode == Mode::Exact && !c.is_na() && !c.is_real() => None,
        Value::Complex(c) => Some(Logical::from_na(*c)),
        Value::Str(_) | Value::Any(_) => {
            resolved(VectorType::Logical, value).and_then(|v| to_logical(&v, mode))
        }
    }
}

pub(crate) fn to_complex(value: &Value) -> Option<Complex> {
    match value {
        Value::Na => Some(na::complex()),
        Value::Complex(x) => Some(*x),
        Value::Double(x) => Some(Complex::from_na(*x)),
        Value::Int(x) => Some(Complex::from_na(*x)),
        Value::Long(x) => Some(Complex::from_na(*x)),
        Value::Logical(x) => Some(Complex::from_na(*x)),
        Value::Str(_) | Value::Any(_) => {
            resolved(VectorType::Complex, value).and_then(|v| to_complex(&v))
        }
    }
}

/// The string form of a value; the inner `None` is NA.
pub(crate) fn to_string(value: &Value) -> Option<Option<Arc<str>>> {
    if value.is_na() {
        return Some(None);
    }
    match value {
        Value::Str(s) => Some(Some(Arc::clone(s))),
        Value::Any(_) => match resolver::resolve(VectorType::String, value) {
            Some(Value::Str(s)) => Some(Some(s)),
            Some(v) if v.is_na() => Some(None),
            _ => None,
        },
        other => Some(Some(other.to_string().into())),
    }
}

fn narrow<T: NaValue>(source_na: bool, out: T, mode: Mode) -> Option<T> {
    if mode == Mode::Exact && !source_na && out.is_na() {
        None
    } else {
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_narrowing_rejects_loss() {
        assert_eq!(to_int(&Value::Double(3.0), Mode::Exact), Some(3));
        assert_eq!(to_int(&Value::Double(1.5), Mode::Exact), None);
        assert_eq!(to_int(&Value::Double(1.5), Mode::Project), Some(1));
        assert_eq!(to_int(&Value::Long(1 << 40), Mode::Exact), None);
        assert_eq!(to_int(&Value::Long(1 << 40), Mode::Project), Some(na::INT));
        assert_eq!(to_long(&Value::Double(2.5), Mode::Exact), None);
        assert_eq!(to_long(&Value::Double(-7.0), Mode::Exact), Some(-7));
    }

    #[test]
    fn test_exact_long_to_double_keeps_every_bit() {
        let big = (1_i64 << 53) + 1;
        assert_eq!(to_double(&Value::Long(big), Mode::Exact), None);
        assert_eq!(to_double(&Value::Long(big), Mode::Project), Some(big as f64));
        assert_eq!(to_double(&Value::Long(1 << 53), Mode::Exact), Some(9007199254740992.0));
        assert_eq!(to_double(&Value::Long(i64::MIN), Mode::Exact), Some(i64::MIN as f64));
        assert!(to_double(&Value::Long(na::LONG), Mode::Exact).is_some_and(|x| x.is_na()));
    }

    #[test]
    fn test_na_converts_to_na() {
        let na = Value::Double(na::double());
        assert_eq!(to_int(&na, Mode::Exact), Some(na::INT));
        assert_eq!(to_long(&na, Mode::Exact), Some(na::LONG));
        assert_eq!(to_logical(&na, Mode::Exact), Some(Logical::Na));
        assert!(to_complex(&na).is_some_and(|c| c.is_na()));
        assert_eq!(to_string(&na), Some(None));
    }

    #[test]
    fn test_complex_projection() {
        let c = Value::Complex(Complex::new(2.0, 1.0));
        assert_eq!(to_double(&c, Mode::Exact), None);
        assert_eq!(to_double(&c, Mode::Project), Some(2.0));
        assert_eq!(to_int(&Value::Complex(Complex::new(4.0, 0.0)), Mode::Exact), Some(4));
    }

    #[test]
    fn test_strings_go_through_resolver() {
        assert_eq!(to_double(&Value::from("1.25"), Mode::Exact), Some(1.25));
        assert_eq!(to_int(&Value::from("x"), Mode::Exact), None);
        assert_eq!(to_logical(&Value::from("F"), Mode::Exact), Some(Logical::False));
        assert_eq!(
            to_string(&Value::Int(12)).flatten().as_deref(),
            Some("12")
        );
    }
}
