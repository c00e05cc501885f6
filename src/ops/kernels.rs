//! Element-wise and reduction kernels
//!
//! Plain scalar loops over contiguous slices. Callers guarantee that every
//! slice passed to a kernel has the same length.

use super::{BinaryOp, ReduceOp, UnaryOp};
use crate::dtype::Element;
use rand::Rng;

/// Execute a binary operation element-wise
#[inline]
pub fn binary_op_kernel<T: Element>(op: BinaryOp, a: &[T], b: &[T], out: &mut [T]) {
    debug_assert_eq!(a.len(), out.len());
    debug_assert_eq!(b.len(), out.len());

    match op {
        BinaryOp::Add => {
            for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
                *o = x + y;
            }
        }
        BinaryOp::Mul => {
            for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
                *o = x * y;
            }
        }
    }
}

/// Execute a unary operation element-wise
#[inline]
pub fn unary_op_kernel<T: Element>(op: UnaryOp, a: &[T], out: &mut [T]) {
    debug_assert_eq!(a.len(), out.len());

    match op {
        UnaryOp::Exp => {
            for (o, &x) in out.iter_mut().zip(a) {
                *o = x.exp();
            }
        }
        UnaryOp::Log => {
            for (o, &x) in out.iter_mut().zip(a) {
                *o = x.ln();
            }
        }
    }
}

/// Reduce a slice to a single value
///
/// Accumulation runs strictly left to right in the element type. Floating
/// point addition is not associative, so a different order (pairwise, SIMD
/// lanes) could round differently; this kernel does not reorder.
#[inline]
pub fn reduce_kernel<T: Element>(op: ReduceOp, a: &[T]) -> T {
    match op {
        ReduceOp::Sum => a.iter().fold(T::zero(), |acc, &x| acc + x),
    }
}

/// Set every element of `out` to `value`
#[inline]
pub fn fill_kernel<T: Element>(out: &mut [T], value: T) {
    out.fill(value);
}

/// Fill output with uniform random values in [0, 1)
///
/// Each draw is an integer `k` in `[0, 2^p)` scaled by `2^-p`, where `p` is
/// the element type's significand precision. Every such value is exactly
/// representable, so rounding can never produce 1.0.
#[inline]
pub fn rand_uniform_kernel<T: Element, R: Rng + ?Sized>(rng: &mut R, out: &mut [T]) {
    let bits = T::MANTISSA_DIGITS;
    let scale = (-(bits as f64)).exp2();

    for elem in out.iter_mut() {
        let k: u64 = rng.random_range(0..(1u64 << bits));
        *elem = T::from_f64(k as f64 * scale);
    }
}
