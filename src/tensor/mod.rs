//! Tensor types and operations
//!
//! This module provides the core [`Tensor`] type, a dense n-dimensional array
//! whose [`Buffer`] is held under an exclusive or shared [`Ownership`]
//! discipline.

mod buffer;
mod core;
mod shape;
mod storage;

pub use buffer::Buffer;
pub use core::Tensor;
pub use shape::Shape;
pub use storage::{Ownership, Storage};
