//! Shape type: validated dimensions of a tensor

use crate::error::{Error, Result};
use smallvec::SmallVec;
use std::fmt;
use std::ops::Deref;

/// Stack allocation threshold for dimensions
/// Most tensors have 4 or fewer dimensions, so we stack-allocate up to 4
pub(crate) const STACK_DIMS: usize = 4;

/// Shape type: dimensions of a tensor
///
/// Every dimension is strictly positive. A shape with no dimensions is a
/// scalar and describes exactly one element. A `Shape` cannot be built
/// without passing validation and exposes no mutation.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Shape(SmallVec<[usize; STACK_DIMS]>);

impl Shape {
    /// Validate and build a shape from unsigned dimensions
    ///
    /// Fails with [`Error::InvalidShape`] if any dimension is zero.
    pub fn new(dims: &[usize]) -> Result<Self> {
        if let Some(axis) = dims.iter().position(|&d| d == 0) {
            return Err(Error::InvalidShape { axis, value: 0 });
        }
        Ok(Self(dims.iter().copied().collect()))
    }

    /// Validate and build a shape from signed dimensions
    ///
    /// Hosts that pass dimensions as signed integers go through here;
    /// zero and negative values are both rejected.
    pub fn from_signed(dims: &[i64]) -> Result<Self> {
        let mut out = SmallVec::with_capacity(dims.len());
        for (axis, &value) in dims.iter().enumerate() {
            match usize::try_from(value) {
                Ok(d) if d > 0 => out.push(d),
                _ => return Err(Error::InvalidShape { axis, value }),
            }
        }
        Ok(Self(out))
    }

    /// The rank-0 shape (one element)
    pub fn scalar() -> Self {
        Self(SmallVec::new())
    }

    /// View shape as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        self.0.as_slice()
    }

    /// Number of dimensions in this shape.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.0.len()
    }

    /// Whether this is the scalar shape.
    #[inline]
    pub fn is_scalar(&self) -> bool {
        self.0.is_empty()
    }

    /// Product of the dimensions, `None` on overflow
    ///
    /// The empty product is 1.
    pub fn checked_numel(&self) -> Option<usize> {
        self.0.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
    }

    /// Product of the dimensions
    ///
    /// Only meaningful for shapes that back a live buffer; those are known
    /// not to overflow.
    #[inline]
    pub fn numel(&self) -> usize {
        self.0.iter().product()
    }
}

impl Deref for Shape {
    type Target = [usize];

    fn deref(&self) -> &Self::Target {
        self.0.as_slice()
    }
}

impl AsRef<[usize]> for Shape {
    fn as_ref(&self) -> &[usize] {
        self.0.as_slice()
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, d) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", d)?;
        }
        write!(f, ")")
    }
}

impl TryFrom<&[usize]> for Shape {
    type Error = Error;

    fn try_from(value: &[usize]) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<Vec<usize>> for Shape {
    type Error = Error;

    fn try_from(value: Vec<usize>) -> Result<Self> {
        Self::new(&value)
    }
}

impl<const N: usize> TryFrom<[usize; N]> for Shape {
    type Error = Error;

    fn try_from(value: [usize; N]) -> Result<Self> {
        Self::new(&value)
    }
}
