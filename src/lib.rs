//! # densa
//!
//! **Dense floating-point tensors with explicit ownership and checked handles.**
//!
//! densa provides a small n-dimensional array core: validated shapes, a
//! contiguous row-major buffer, element-wise arithmetic, and a handle layer
//! that lets a host outside Rust drive tensors without ever dereferencing a
//! released one.
//!
//! ## Features
//!
//! - **Tensors**: N-dimensional, contiguous, row-major, f32 by default
//! - **Ownership**: exclusive (copy on clone) or shared (alias on clone)
//! - **Element-wise ops**: add, multiply, exp, log
//! - **Reductions**: sum
//! - **Handles**: generation-checked ids with idempotent release
//!
//! ## Quick Start
//!
//! ```rust
//! use densa::prelude::*;
//!
//! let a = Tensor::<f32>::from_slice(&[1.0, 2.0, 3.0, 4.0], &[2, 2]);
//! let b = Tensor::<f32>::from_slice(&[5.0, 6.0, 7.0, 8.0], &[2, 2]);
//!
//! let c = (&a + &b)?;
//! assert_eq!(c.sum(), 36.0);
//!
//! let mut registry = TensorRegistry::<f32>::new();
//! let h = registry.insert(c)?;
//! registry.release(h);
//! assert!(matches!(registry.sum(h), Err(Error::UseAfterRelease { .. })));
//! # Ok::<(), Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `f16`: Half-precision element types (F16, BF16) via the `half` crate

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod dtype;
pub mod error;
pub mod handle;
pub mod ops;
pub mod tensor;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dtype::{DType, Element};
    pub use crate::error::{Error, Result};
    pub use crate::handle::{Handle, RegistryConfig, TensorRegistry};
    pub use crate::tensor::{Ownership, Shape, Tensor};
}
