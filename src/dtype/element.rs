//! Element trait for mapping Rust types to DType

use super::DType;
use bytemuck::{Pod, Zeroable};
use std::fmt::Debug;
use std::ops::{Add, Mul};

/// Trait for types that can be elements of a tensor
///
/// This trait connects Rust's type system to densa's runtime dtype tag.
/// It's implemented for `f32` and `f64`, and for `half::f16` / `half::bf16`
/// with the `f16` feature.
///
/// # Bounds
/// - `Copy + Send + Sync + 'static` - Basic trait requirements
/// - `Pod + Zeroable` - Safe byte-level transfer (bytemuck)
/// - `Add + Mul` - Element-wise arithmetic (Output = Self)
pub trait Element:
    Copy
    + Send
    + Sync
    + Pod
    + Zeroable
    + Debug
    + PartialOrd
    + 'static
    + Add<Output = Self>
    + Mul<Output = Self>
{
    /// The corresponding DType for this Rust type
    const DTYPE: DType;

    /// Significand precision in bits, including the implicit leading bit
    ///
    /// Every multiple of `2^-MANTISSA_DIGITS` in `[0, 1)` is exactly
    /// representable, which is what uniform sampling relies on.
    const MANTISSA_DIGITS: u32;

    /// Convert to f64 for formatting and generic numeric code
    fn to_f64(self) -> f64;

    /// Convert from f64 to this type
    fn from_f64(v: f64) -> Self;

    /// Zero value
    fn zero() -> Self;

    /// Natural exponential
    #[inline]
    fn exp(self) -> Self {
        Self::from_f64(self.to_f64().exp())
    }

    /// Natural logarithm; non-positive inputs follow IEEE (NaN, -inf)
    #[inline]
    fn ln(self) -> Self {
        Self::from_f64(self.to_f64().ln())
    }
}

impl Element for f64 {
    const DTYPE: DType = DType::F64;
    const MANTISSA_DIGITS: u32 = f64::MANTISSA_DIGITS;

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }

    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn exp(self) -> Self {
        f64::exp(self)
    }

    #[inline]
    fn ln(self) -> Self {
        f64::ln(self)
    }
}

impl Element for f32 {
    const DTYPE: DType = DType::F32;
    const MANTISSA_DIGITS: u32 = f32::MANTISSA_DIGITS;

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v as f32
    }

    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn exp(self) -> Self {
        f32::exp(self)
    }

    #[inline]
    fn ln(self) -> Self {
        f32::ln(self)
    }
}

// ============================================================================
// Half-precision floating point types (requires "f16" feature)
// ============================================================================

#[cfg(feature = "f16")]
impl Element for half::f16 {
    const DTYPE: DType = DType::F16;
    const MANTISSA_DIGITS: u32 = half::f16::MANTISSA_DIGITS;

    #[inline]
    fn to_f64(self) -> f64 {
        half::f16::to_f64(self)
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        half::f16::from_f64(v)
    }

    #[inline]
    fn zero() -> Self {
        half::f16::ZERO
    }
}

#[cfg(feature = "f16")]
impl Element for half::bf16 {
    const DTYPE: DType = DType::BF16;
    const MANTISSA_DIGITS: u32 = half::bf16::MANTISSA_DIGITS;

    #[inline]
    fn to_f64(self) -> f64 {
        half::bf16::to_f64(self)
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        half::bf16::from_f64(v)
    }

    #[inline]
    fn zero() -> Self {
        half::bf16::ZERO
    }
}
