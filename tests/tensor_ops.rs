//! Integration tests for tensor construction and element-wise operations
//!
//! Tests verify:
//! - Shape validation and zero initialization
//! - add / multiply / exp / log / sum results
//! - Size-mismatch and domain edge cases
//! - Display output

mod common;

use common::{assert_allclose_f32, init_tracing, seeded_rng};
use densa::error::Error;
use densa::tensor::Tensor;

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_new_2x3_is_zeroed() {
    let t = Tensor::<f32>::new(&[2, 3]).unwrap();
    assert_eq!(t.shape(), &[2, 3]);
    assert_eq!(t.size(), 6);
    assert_eq!(t.to_vec(), vec![0.0; 6]);
}

#[test]
fn test_zero_dimension_rejected() {
    assert_eq!(
        Tensor::<f32>::new(&[3, 0, 2]).unwrap_err(),
        Error::InvalidShape { axis: 1, value: 0 }
    );
}

#[test]
fn test_huge_shape_is_allocation_failure() {
    let err = Tensor::<f32>::new(&[usize::MAX, 2]).unwrap_err();
    assert!(matches!(err, Error::AllocationFailure { .. }), "{err}");
}

// ============================================================================
// Element-wise
// ============================================================================

#[test]
fn test_add_2x2() {
    init_tracing();
    let a = Tensor::<f32>::from_slice(&[1.0, 2.0, 3.0, 4.0], &[2, 2]);
    let b = Tensor::<f32>::from_slice(&[5.0, 6.0, 7.0, 8.0], &[2, 2]);

    let c = a.add(&b).unwrap();
    assert_eq!(c.shape(), &[2, 2]);
    assert_eq!(c.to_vec(), vec![6.0, 8.0, 10.0, 12.0]);

    // Operands untouched
    assert_eq!(a.to_vec(), vec![1.0, 2.0, 3.0, 4.0]);
    assert_eq!(b.to_vec(), vec![5.0, 6.0, 7.0, 8.0]);
}

#[test]
fn test_multiply_2x2() {
    let a = Tensor::<f32>::from_slice(&[1.0, 2.0, 3.0, 4.0], &[2, 2]);
    let b = Tensor::<f32>::from_slice(&[5.0, 6.0, 7.0, 8.0], &[2, 2]);
    assert_eq!(a.multiply(&b).unwrap().to_vec(), vec![5.0, 12.0, 21.0, 32.0]);
}

#[test]
fn test_add_size_mismatch() {
    let a = Tensor::<f32>::new(&[2, 2]).unwrap();
    let b = Tensor::<f32>::new(&[5]).unwrap();
    assert_eq!(
        a.add(&b).unwrap_err(),
        Error::SizeMismatch {
            op: "add",
            expected: 4,
            got: 5
        }
    );
}

#[test]
fn test_exp_of_ones() {
    let t = Tensor::<f32>::full(&[3], 1.0).unwrap();
    let e = t.exp().unwrap();
    assert_allclose_f32(&e.to_vec(), &[std::f32::consts::E; 3], 1e-6, 1e-6, "exp(1)");
}

#[test]
fn test_log_of_exp() {
    let t = Tensor::<f32>::from_slice(&[-2.0, 0.0, 0.5, 3.0], &[4]);
    let back = t.exp().unwrap().log().unwrap();
    assert_allclose_f32(&back.to_vec(), &t.to_vec(), 1e-5, 1e-5, "log(exp(x))");
}

#[test]
fn test_log_zero_and_negative() {
    let t = Tensor::<f32>::from_slice(&[0.0, -4.0], &[2]);
    let out = t.log().unwrap().to_vec();
    assert_eq!(out[0], f32::NEG_INFINITY);
    assert!(out[1].is_nan());
}

// ============================================================================
// Reduction and in-place writes
// ============================================================================

#[test]
fn test_sum_after_fill() {
    let mut t = Tensor::<f32>::new(&[3, 4]).unwrap();
    t.fill(0.5);
    assert_eq!(t.sum(), 6.0);
}

#[test]
fn test_set_data_then_sum() {
    let mut t = Tensor::<f32>::new(&[2, 2]).unwrap();
    t.set_data(&[1.0, 2.0, 3.0, 4.0]).unwrap();
    assert_eq!(t.sum(), 10.0);

    assert_eq!(
        t.set_data(&[1.0, 2.0, 3.0]).unwrap_err(),
        Error::size_mismatch("set_data", 4, 3)
    );
    assert_eq!(t.to_vec(), vec![1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn test_randomize_in_unit_interval() {
    let mut t = Tensor::<f32>::new(&[64, 64]).unwrap();
    t.randomize(&mut seeded_rng(42));
    let data = t.to_vec();
    assert!(data.iter().all(|&x| (0.0..1.0).contains(&x)));

    // 4096 draws should not all coincide
    assert!(data.iter().any(|&x| x != data[0]));
}

#[test]
fn test_display_format() {
    let t = Tensor::<f32>::from_slice(&[1.0, 2.5, -3.0], &[3]);
    assert_eq!(t.to_string(), "Tensor shape: (3)\nData: 1.00 2.50 -3.00");
}
