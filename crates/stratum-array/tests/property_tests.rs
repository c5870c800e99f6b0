//! Property-based tests for the view engine.

use proptest::prelude::*;
use stratum_array::*;

fn shape_and_data() -> impl Strategy<Value = (Vec<usize>, Vec<i64>)> {
    prop::collection::vec(1usize..5, 1..4).prop_flat_map(|dims| {
        let n: usize = dims.iter().product();
        (Just(dims), prop::collection::vec(-1000i64..1000, n))
    })
}

fn shape_and_doubles() -> impl Strategy<Value = (Vec<usize>, Vec<f64>)> {
    prop::collection::vec(1usize..5, 1..4).prop_flat_map(|dims| {
        let n: usize = dims.iter().product();
        let element = prop_oneof![
            3 => (-1e6f64..1e6).boxed(),
            1 => Just(stratum_core::na::double()).boxed(),
        ];
        (Just(dims), prop::collection::vec(element, n))
    })
}

proptest! {
    #[test]
    fn prop_transpose_is_involution((dims, data) in shape_and_data()) {
        let a = Array::from_shape_vec(dims, data).unwrap();
        let tt = a.transpose().transpose().copy();
        prop_assert_eq!(tt, a);
    }

    #[test]
    fn prop_reshape_round_trip((dims, data) in shape_and_data()) {
        let a = Array::from_shape_vec(dims.clone(), data).unwrap();
        let n = a.len();
        let back = a.reshape([n]).unwrap().reshape(dims).unwrap().copy();
        prop_assert_eq!(back, a);
    }

    #[test]
    fn prop_transpose_get_swaps_indices(rows in 1usize..6, cols in 1usize..6) {
        let data: Vec<i32> = (0..(rows * cols) as i32).collect();
        let a = Array::from_shape_vec([rows, cols], data).unwrap();
        let t = a.transpose();
        for i in 0..rows {
            for j in 0..cols {
                prop_assert_eq!(a.get2(i, j).unwrap(), t.get2(j, i).unwrap());
            }
        }
    }

    #[test]
    fn prop_slice_writes_alias_parent(
        rows in 2usize..6,
        cols in 2usize..6,
        start in 0usize..2,
        value in -100i32..100,
    ) {
        let mut a = ArrayFactory::new().int_array([rows, cols]).unwrap();
        {
            let mut s = a
                .slice_mut(&[SliceRange::new(start, rows), SliceRange::new(start, cols)])
                .unwrap();
            s.set2(0, 0, value).unwrap();
        }
        prop_assert_eq!(a.get2(start, start).unwrap(), value);
        prop_assert_eq!(a.sum(), value);
    }

    #[test]
    fn prop_copy_is_contiguous_and_equal((dims, data) in shape_and_data()) {
        let a = Array::from_shape_vec(dims, data).unwrap();
        let t = a.transpose();
        let c = t.copy();
        prop_assert!(c.is_contiguous());
        prop_assert!(!c.is_view());
        prop_assert_eq!(c, t);
    }

    #[test]
    fn prop_double_views_with_na_compare_equal((dims, data) in shape_and_doubles()) {
        let a = Array::from_shape_vec(dims.clone(), data).unwrap();
        prop_assert_eq!(a.copy(), a.clone());
        prop_assert_eq!(a.transpose().transpose().copy(), a.clone());
        let n = a.len();
        let back = a.reshape([n]).unwrap().reshape(dims).unwrap().copy();
        prop_assert_eq!(back, a);
    }
}
