//! Integration tests for immutable vectors.
//!
//! Tests cover:
//! - Typed access and conversion
//! - Comparison and sorting
//! - Elementwise arithmetic and filtering
//! - Conversion to arrays

use std::cmp::Ordering;

use approx::assert_relative_eq;
use stratum_array::ArrayFactory;
use stratum_core::na::{self, NaValue};
use stratum_core::{Complex, Logical};
use stratum_vector::*;

fn sample() -> Vector {
    Vector::from(vec![1.0, na::double(), na::double(), 4.0])
}

// ============================================================================
// Access Tests
// ============================================================================

mod access_tests {
    use super::*;

    #[test]
    fn test_sample_access() {
        let v = sample();
        assert_eq!(v.get_as_int(0).unwrap(), 1);
        assert!(v.is_na(1));
        assert!(v.has_na());
        assert_eq!(v.count_na(), 2);
        assert_eq!(v.get::<f64>(3).unwrap(), 4.0);
        assert!(v.get::<i64>(2).unwrap().is_na());
    }

    #[test]
    fn test_get_value() {
        let v = Vector::from(vec![Logical::True, Logical::Na]);
        assert_eq!(v.get_value(0).unwrap(), Value::Logical(Logical::True));
        assert!(v.get_value(1).unwrap().is_na());
        assert!(v.get_value(2).is_err());
    }

    #[test]
    fn test_singleton_and_from_values() {
        let v = Vector::singleton("x", 3);
        assert_eq!(v.vector_type(), VectorType::String);
        assert_eq!(v.len(), 3);

        let v = Vector::from_values([Value::Na, Value::Int(2), Value::Double(3.0)]);
        assert_eq!(v.vector_type(), VectorType::Int);
        assert!(v.is_na(0));
        assert_eq!(v.get_as_int(2).unwrap(), 3);
    }

    #[test]
    fn test_complex_access() {
        let v = Vector::from(vec![Complex::new(1.0, 2.0), na::complex()]);
        assert_eq!(v.get_as_double(0).unwrap(), 1.0);
        assert_eq!(v.get_as_int(0).unwrap(), 1);
        assert_eq!(v.get_as_long(0).unwrap(), 1);
        assert!(v.is_na(1));
        assert_eq!(v.to_string_at(1).unwrap(), "NA");
    }
}

// ============================================================================
// Arithmetic Tests
// ============================================================================

mod arithmetic_tests {
    use super::*;

    #[test]
    fn test_na_propagates_elementwise() {
        let a = Vector::from(vec![1.0, na::double(), 3.0]);
        let b = Vector::from(vec![10.0, 20.0, na::double()]);
        let sum = a.add(&b).unwrap();
        assert_eq!(sum.vector_type(), VectorType::Double);
        assert_eq!(sum.get_as_double(0).unwrap(), 11.0);
        assert!(sum.is_na(1));
        assert!(sum.is_na(2));
    }

    #[test]
    fn test_operand_kinds_are_promoted() {
        let ints = Vector::from(vec![6, 7]);
        let longs = Vector::from(vec![2_i64, 2]);
        let quotient = ints.div(&longs).unwrap();
        assert_eq!(quotient.vector_type(), VectorType::Long);
        assert_eq!(quotient, Vector::from(vec![3_i64, 3]));

        let diff = ints.sub(&Vector::from(vec![0.5, 1.0])).unwrap();
        assert_eq!(diff.vector_type(), VectorType::Double);
        assert_relative_eq!(diff.get_as_double(0).unwrap(), 5.5);

        let z = ints.mul(&Vector::from(vec![Complex::I, Complex::ONE])).unwrap();
        assert_eq!(z.get_as_complex(0).unwrap(), Complex::new(0.0, 6.0));
        assert_eq!(z.get_as_complex(1).unwrap(), Complex::new(7.0, 0.0));
    }

    #[test]
    fn test_integer_division_by_zero_is_na() {
        let v = Vector::from(vec![4, 5]).div(&Vector::from(vec![0, 5])).unwrap();
        assert!(v.is_na(0));
        assert_eq!(v.get_as_int(1).unwrap(), 1);
    }

    #[test]
    fn test_scalar_operands() {
        let v = Vector::from(vec![1, na::INT, 3]);
        let doubled = v.mul_scalar(2);
        assert_eq!(doubled.vector_type(), VectorType::Int);
        assert_eq!(doubled.get_as_int(2).unwrap(), 6);
        assert!(doubled.is_na(1));
        assert_eq!(v.add_scalar(0.5).get_as_double(0).unwrap(), 1.5);
        assert!(v.sub_scalar(Value::Na).is_na(0));
    }

    #[test]
    fn test_non_numeric_operands_give_na() {
        let words = Vector::from(vec!["a", "b"]);
        let out = words.add(&Vector::from(vec![1, 2])).unwrap();
        assert_eq!(out.vector_type(), VectorType::Variable);
        assert!((0..2).all(|i| out.is_na(i)));
    }

    #[test]
    fn test_length_mismatch() {
        let err = Vector::from(vec![1, 2])
            .add(&Vector::from(vec![1]))
            .unwrap_err();
        assert!(matches!(
            err,
            VectorError::LengthMismatch { left: 2, right: 1 }
        ));
    }

    #[test]
    fn test_custom_combiner() {
        let a = Vector::from(vec!["x", "y"]);
        let b = Vector::from(vec![1, 2]);
        let joined = a
            .combine(&b, VectorType::String, |l, r| {
                Value::from(format!("{l}{r}"))
            })
            .unwrap();
        assert_eq!(joined.get_as_string(1).unwrap().as_deref(), Some("y2"));
    }
}

// ============================================================================
// Filtering Tests
// ============================================================================

mod filtering_tests {
    use super::*;

    #[test]
    fn test_select_mask_keeps_true_entries() {
        let v = Vector::from(vec![10, 20, 30, 40]);
        let mask = Vector::from(vec![Logical::True, Logical::False, Logical::Na, Logical::True]);
        assert_eq!(v.select_mask(&mask).unwrap(), Vector::from(vec![10, 40]));
        let bits = Vector::from(vec![true, true, false, false]);
        assert_eq!(v.select_mask(&bits).unwrap(), v.head(2));
        assert!(v.select_mask(&Vector::from(vec![true])).is_err());
    }

    #[test]
    fn test_non_na() {
        let v = sample().non_na();
        assert_eq!(v, Vector::from(vec![1.0, 4.0]));
        assert!(!v.has_na());
        let words = Vector::from(vec![None, Some("a".to_string())]).non_na();
        assert_eq!(words.len(), 1);
        assert_eq!(words.vector_type(), VectorType::String);
    }
}

// ============================================================================
// Ordering Tests
// ============================================================================

mod ordering_tests {
    use super::*;

    #[test]
    fn test_sort_places_na_first() {
        let v = Vector::from(vec![3, na::INT, 1, 2]);
        let sorted = v.sort(SortOrder::Ascending).unwrap();
        assert!(sorted.is_na(0));
        assert_eq!(sorted.tail(3), Vector::from(vec![1, 2, 3]));
        let desc = v.sort(SortOrder::Descending).unwrap();
        assert_eq!(desc.head(3), Vector::from(vec![3, 2, 1]));
        assert!(desc.is_na(3));
    }

    #[test]
    fn test_sorted_indices_stable() {
        let v = Vector::from(vec!["b", "a", "b", "a"]);
        assert_eq!(v.sorted_indices(SortOrder::Ascending).unwrap(), vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_complex_sort_unsupported() {
        let v = Vector::from(vec![Complex::ONE, Complex::I]);
        assert!(matches!(
            v.sort(SortOrder::Ascending),
            Err(VectorError::Unsupported { .. })
        ));
        assert!(v.equals_at(0, &v, 0).unwrap());
    }

    #[test]
    fn test_compare_across_vectors() {
        let a = Vector::from(vec![1.5]);
        let b = Vector::from(vec![2_i32]);
        assert_eq!(a.compare_with(0, &b, 0).unwrap(), Ordering::Less);
        assert!(!a.equals_at(0, &b, 0).unwrap());
        assert!(a.compare(0, 1).is_err());
    }

    #[test]
    fn test_mixed_variable_sort_fails() {
        let v = Vector::variable([Value::Int(1), Value::from("a")]);
        assert!(v.sort(SortOrder::Ascending).is_err());
    }
}

// ============================================================================
// Array Conversion Tests
// ============================================================================

mod array_tests {
    use super::*;

    #[test]
    fn test_to_arrays() {
        let v = Vector::from(vec![1, 0, na::INT]);
        let d = v.to_double_array().unwrap();
        assert_eq!(d.get(0).unwrap(), 1.0);
        assert!(d.get(2).unwrap().is_na());
        let l = v.to_logical_array().unwrap();
        assert_eq!(l.to_vec(), vec![Logical::True, Logical::False, Logical::Na]);
        assert!(matches!(
            v.to_bit_array(),
            Err(VectorError::NaNotRepresentable { index: 2, .. })
        ));
        assert_eq!(
            v.head(2).to_bit_array().unwrap().to_vec(),
            vec![true, false]
        );
    }

    #[test]
    fn test_double_array_feeds_numerics() {
        let v = Vector::from(vec![0.1, 0.2, 0.3]);
        let a = v.to_double_array().unwrap();
        assert_relative_eq!(a.sum(), 0.6, epsilon = 1e-12);
        assert_relative_eq!(a.mean(), 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_nominal_kinds_rejected() {
        let v = Vector::from(vec!["1"]);
        assert!(matches!(
            v.to_double_array(),
            Err(VectorError::IllegalType { .. })
        ));
    }

    #[test]
    fn test_from_array_storage_order() {
        let a = ArrayFactory::new()
            .array_2d::<f64, _>(&[[1.0, 2.0], [3.0, 4.0]])
            .unwrap();
        let v = Vector::from_array(&a.transpose());
        assert_eq!(v, Vector::from(vec![1.0, 2.0, 3.0, 4.0]));
        let v = Vector::from_array(&a);
        assert_eq!(v.get_as_double(1).unwrap(), 3.0);
    }
}
