//! Data type system for densa tensors
//!
//! A tensor holds a single homogeneous floating-point element type. The
//! [`Element`] trait maps Rust types onto the runtime [`DType`] tag used for
//! diagnostics and byte-level transfer across a host boundary.

mod element;

pub use element::Element;

use std::fmt;

/// Element types supported by densa tensors
///
/// The tag tells a reader of [`Tensor::to_bytes`](crate::tensor::Tensor::to_bytes)
/// output how wide each element is.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
#[repr(u8)]
pub enum DType {
    /// 64-bit floating point
    F64 = 0,
    /// 32-bit floating point (the default)
    #[default]
    F32 = 1,
    /// 16-bit floating point (IEEE 754), requires the `f16` feature
    F16 = 2,
    /// 16-bit brain floating point, requires the `f16` feature
    BF16 = 3,
}

impl DType {
    /// Size of one element in bytes
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            Self::F64 => 8,
            Self::F32 => 4,
            Self::F16 | Self::BF16 => 2,
        }
    }

    /// Short name for display (e.g., "f32")
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::F64 => "f64",
            Self::F32 => "f32",
            Self::F16 => "f16",
            Self::BF16 => "bf16",
        }
    }

}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}
