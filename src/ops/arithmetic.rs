//! Element-wise arithmetic and transcendental operations

use super::kernels;
use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::tensor::{Buffer, Shape, Tensor};
use std::ops::{Add, Mul};
use tracing::instrument;

/// Binary operation kind
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    /// Addition: a + b
    Add,
    /// Multiplication: a * b
    Mul,
}

impl BinaryOp {
    /// Operation name used in errors and spans
    pub const fn name(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Mul => "multiply",
        }
    }
}

/// Unary operation kind
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    /// Exponential: e^a
    Exp,
    /// Natural log: ln(a)
    Log,
}

impl UnaryOp {
    /// Operation name used in spans
    pub const fn name(self) -> &'static str {
        match self {
            Self::Exp => "exp",
            Self::Log => "log",
        }
    }
}

impl<T: Element> Tensor<T> {
    /// Element-wise sum
    ///
    /// Fails with [`Error::SizeMismatch`] when the operands hold different
    /// numbers of elements. The result has `self`'s shape.
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.binary_op(BinaryOp::Add, other)
    }

    /// Element-wise product
    ///
    /// Same compatibility rule as [`Self::add`].
    pub fn multiply(&self, other: &Self) -> Result<Self> {
        self.binary_op(BinaryOp::Mul, other)
    }

    /// Element-wise natural exponential
    pub fn exp(&self) -> Result<Self> {
        self.unary_op(UnaryOp::Exp)
    }

    /// Element-wise natural logarithm
    ///
    /// Non-positive elements produce NaN or negative infinity rather than an
    /// error.
    pub fn log(&self) -> Result<Self> {
        self.unary_op(UnaryOp::Log)
    }

    /// Apply a binary operation into a fresh buffer
    ///
    /// Nothing is allocated until the size check passes, and neither operand
    /// is written, so a failure leaves no trace.
    #[instrument(level = "trace", skip_all, fields(op = op.name(), size = self.size()))]
    pub fn binary_op(&self, op: BinaryOp, other: &Self) -> Result<Self> {
        if self.size() != other.size() {
            return Err(Error::size_mismatch(op.name(), self.size(), other.size()));
        }

        let mut out = Buffer::zeroed(self.result_shape())?;
        self.storage_pair(other, |a, b| {
            kernels::binary_op_kernel(op, a, b, out.as_mut_slice())
        });
        Ok(Tensor::from_buffer(out, self.ownership()))
    }

    /// Apply a unary operation into a fresh buffer of the same shape
    #[instrument(level = "trace", skip_all, fields(op = op.name(), size = self.size()))]
    pub fn unary_op(&self, op: UnaryOp) -> Result<Self> {
        let mut out = Buffer::zeroed(self.result_shape())?;
        self.with_slice(|a| kernels::unary_op_kernel(op, a, out.as_mut_slice()));
        Ok(Tensor::from_buffer(out, self.ownership()))
    }

    fn result_shape(&self) -> Shape {
        self.shape_ref().clone()
    }
}

impl<'a, T: Element> Add<&'a Tensor<T>> for &'a Tensor<T> {
    type Output = Result<Tensor<T>>;

    fn add(self, rhs: &'a Tensor<T>) -> Self::Output {
        Tensor::add(self, rhs)
    }
}

impl<'a, T: Element> Mul<&'a Tensor<T>> for &'a Tensor<T> {
    type Output = Result<Tensor<T>>;

    fn mul(self, rhs: &'a Tensor<T>) -> Self::Output {
        Tensor::multiply(self, rhs)
    }
}
