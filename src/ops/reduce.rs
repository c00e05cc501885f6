//! Reduction operations

use super::kernels;
use crate::dtype::Element;
use crate::tensor::Tensor;

/// Reduction operation kind
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReduceOp {
    /// Sum of elements
    Sum,
}

impl<T: Element> Tensor<T> {
    /// Sum of all elements
    ///
    /// Accumulates left to right in the element type, so the rounding of the
    /// result depends on element order. This is expected floating-point
    /// behavior, not a defect.
    pub fn sum(&self) -> T {
        self.reduce(ReduceOp::Sum)
    }

    /// Reduce every element to a single value
    pub fn reduce(&self, op: ReduceOp) -> T {
        self.with_slice(|data| kernels::reduce_kernel(op, data))
    }
}
