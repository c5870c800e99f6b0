//! Integration tests for vector builders.
//!
//! Tests cover:
//! - Growth and NA padding
//! - Coercion between element kinds
//! - Reading from data entries
//! - Copy builders

use std::cmp::Ordering;

use stratum_core::na::{self, NaValue};
use stratum_core::{Complex, Logical};
use stratum_vector::*;

// ============================================================================
// Growth Tests
// ============================================================================

mod growth_tests {
    use super::*;

    #[test]
    fn test_gap_filled_with_na() {
        let mut b = Builder::new(VectorType::Double);
        b.set(3, 4.0).set(0, 1.0);
        let v = b.build();
        assert_eq!(v.len(), 4);
        assert!(v.is_na(1));
        assert!(v.is_na(2));
        assert_eq!(v.get_as_int(0).unwrap(), 1);
        assert_eq!(v.get_as_double(3).unwrap(), 4.0);
    }

    #[test]
    fn test_padding_per_kind() {
        for ty in VectorType::ALL {
            let mut b = ty.new_builder();
            b.set_na(2);
            let v = b.build();
            assert_eq!(v.len(), 3, "{ty}");
            assert!((0..3).all(|i| v.is_na(i)), "{ty}");
            assert_eq!(v.vector_type(), ty);
        }
    }

    #[test]
    fn test_overwrite_keeps_length() {
        let mut b = VectorType::Int.with_len(2);
        b.set(1, 5).set(1, 6);
        assert_eq!(b.len(), 2);
        assert_eq!(b.build().get_as_int(1).unwrap(), 6);
    }

    #[test]
    fn test_empty_build() {
        let v = VectorType::String.with_capacity(8).build();
        assert!(v.is_empty());
        assert_eq!(v, Vector::empty(VectorType::String));
    }
}

// ============================================================================
// Coercion Tests
// ============================================================================

mod coercion_tests {
    use super::*;

    #[test]
    fn test_widening() {
        let mut b = Builder::new(VectorType::Double);
        b.add(1_i32).add(2_i64).add(true).add(Complex::new(3.0, 0.0));
        let v = b.build();
        let values: Vec<f64> = (0..4).map(|i| v.get_as_double(i).unwrap()).collect();
        assert_eq!(values, vec![1.0, 2.0, 1.0, 3.0]);
    }

    #[test]
    fn test_complex_with_imaginary_part_is_na_in_double() {
        let mut b = Builder::new(VectorType::Double);
        b.add(Complex::new(1.0, 2.0));
        assert!(b.build().is_na(0));
    }

    #[test]
    fn test_long_beyond_double_precision_is_na() {
        let mut b = Builder::new(VectorType::Double);
        b.add((1_i64 << 53) + 1).add(1_i64 << 53);
        let v = b.build();
        assert!(v.is_na(0));
        assert_eq!(v.get_as_double(1).unwrap(), 9007199254740992.0);
    }

    #[test]
    fn test_sentinels_map_across_kinds() {
        let mut b = Builder::new(VectorType::Long);
        b.add(na::INT).add(na::double()).add(Logical::Na);
        let v = b.build();
        assert!((0..3).all(|i| v.get_as_long(i).unwrap() == na::LONG));
    }

    #[test]
    fn test_strings_parse_through_resolver() {
        let mut b = Builder::new(VectorType::Logical);
        b.extend(["TRUE", "F", "NA", "maybe"]);
        let v = b.build();
        assert_eq!(v.get_as_logical(0).unwrap(), Logical::True);
        assert_eq!(v.get_as_logical(1).unwrap(), Logical::False);
        assert!(v.is_na(2));
        assert!(v.is_na(3));
    }

    #[test]
    fn test_string_builder_formats_values() {
        let mut b = Builder::new(VectorType::String);
        b.add(12).add(Logical::True).add(na::double());
        let v = b.build();
        assert_eq!(v.get_as_string(0).unwrap().as_deref(), Some("12"));
        assert_eq!(v.get_as_string(1).unwrap().as_deref(), Some("TRUE"));
        assert!(v.is_na(2));
    }

    #[test]
    fn test_unresolvable_object_is_na() {
        struct Opaque;
        let mut b = Builder::new(VectorType::Int);
        b.add(Value::any(Opaque));
        assert!(b.build().is_na(0));
    }

    #[test]
    fn test_registered_object_resolver() {
        struct Meters(i64);
        resolver::register::<Meters, _>(VectorType::Long, |m| Some(Value::Long(m.0)));
        let mut b = Builder::new(VectorType::Long);
        b.add(Value::any(Meters(1200)));
        assert_eq!(b.build().get_as_long(0).unwrap(), 1200);
    }

    #[test]
    fn test_variable_keeps_each_kind() {
        let v = Vector::variable([Value::Int(1), Value::from("a"), Value::Na]);
        assert_eq!(v.type_at(0).unwrap(), VectorType::Int);
        assert_eq!(v.type_at(1).unwrap(), VectorType::String);
        assert!(v.is_na(2));
    }
}

// ============================================================================
// Entry Tests
// ============================================================================

mod entry_tests {
    use super::*;

    #[test]
    fn test_read_all() {
        let mut entry = StringDataEntry::from_delimited("1,2,NA,x,5", ',');
        let mut b = Builder::new(VectorType::Int);
        b.read_all(&mut entry).unwrap();
        let v = b.build();
        assert_eq!(v.len(), 5);
        assert_eq!(v.get_as_int(1).unwrap(), 2);
        assert!(v.is_na(2));
        assert!(v.is_na(3));
        assert_eq!(v.get_as_int(4).unwrap(), 5);
    }

    #[test]
    fn test_read_at_pads() {
        let mut entry = StringDataEntry::new(["hello"]);
        let mut b = Builder::new(VectorType::String);
        b.read_at(2, &mut entry).unwrap();
        let v = b.build();
        assert!(v.is_na(0) && v.is_na(1));
        assert_eq!(v.get_as_string(2).unwrap().as_deref(), Some("hello"));
    }

    #[test]
    fn test_exhausted_entry_is_an_error() {
        let mut entry = StringDataEntry::new(Vec::<String>::new());
        let mut b = Builder::new(VectorType::Double);
        assert!(matches!(b.read(&mut entry), Err(VectorError::Io(_))));
    }
}

// ============================================================================
// Copy Tests
// ============================================================================

mod copy_tests {
    use super::*;

    #[test]
    fn test_copy_builder_is_independent() {
        let v = Vector::from(vec![1.0, 2.0]);
        let mut b = v.new_copy_builder();
        b.set(0, 9.0).add(3.0);
        let w = b.build();
        assert_eq!(v.get_as_double(0).unwrap(), 1.0);
        assert_eq!(w.get_as_double(0).unwrap(), 9.0);
        assert_eq!(w.len(), 3);
    }

    #[test]
    fn test_add_from_and_set_from() {
        let src = Vector::from(vec![10, 20, 30]);
        let mut b = Builder::new(VectorType::Double);
        b.add_from(&src, 2).unwrap();
        b.set_from(3, &src, 0).unwrap();
        assert!(b.add_from(&src, 3).is_err());
        let v = b.build();
        assert_eq!(v.get_as_double(0).unwrap(), 30.0);
        assert!(v.get_as_double(1).unwrap().is_na());
        assert_eq!(v.get_as_double(3).unwrap(), 10.0);
    }

    #[test]
    fn test_type_copy_converts() {
        let src = Vector::from(vec![1.0, na::double(), 2.5]);
        let v = VectorType::Int.copy(&src).build();
        assert_eq!(v.get_as_int(0).unwrap(), 1);
        assert!(v.is_na(1));
        assert!(v.is_na(2));
    }

    #[test]
    fn test_builder_compare_na_first() {
        let mut b = Builder::new(VectorType::String);
        b.add("b").add_na().add("a");
        assert_eq!(b.compare(1, 2).unwrap(), Ordering::Less);
        assert_eq!(b.compare(0, 2).unwrap(), Ordering::Greater);
    }
}
