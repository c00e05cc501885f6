//! Tensor operations
//!
//! Element-wise arithmetic, transcendental maps, and reductions over
//! [`Tensor`](crate::tensor::Tensor) values.
//!
//! ```text
//! Tensor<T>
//!   ├── add, multiply      (binary, size-checked, fresh result buffer)
//!   ├── exp, log           (unary, same shape, fresh result buffer)
//!   └── sum                (reduction to a scalar)
//! ```
//!
//! # Operand compatibility
//!
//! Binary operations compare total element counts only. Operands of shape
//! `[4]` and `[2, 2]` are therefore accepted, and the result takes the
//! left operand's shape. There is no broadcasting: any difference in element
//! count is an [`Error::SizeMismatch`](crate::error::Error::SizeMismatch).
//!
//! # Result ownership
//!
//! Results are written into a newly allocated buffer that no operand
//! references. The result adopts the left operand's [`Ownership`]
//! discipline, starting with a reference count of one.
//!
//! [`Ownership`]: crate::tensor::Ownership
//!
//! # Kernels
//!
//! The [`kernels`] module holds the slice-level loops the tensor methods
//! dispatch to. They never allocate and never fail.

mod arithmetic;
pub mod kernels;
mod reduce;

pub use arithmetic::{BinaryOp, UnaryOp};
pub use reduce::ReduceOp;
