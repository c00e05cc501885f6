//! Buffer: owned flat storage for a tensor's elements

use super::Shape;
use crate::dtype::Element;
use crate::error::{Error, Result};

/// Owned, fixed-length contiguous block of elements plus its shape
///
/// `size` is derived from `shape` at construction and never changes; there is
/// no resize operation. Allocation goes through `try_reserve_exact`, so an
/// allocation failure surfaces as [`Error::AllocationFailure`] instead of an
/// abort, and no half-built buffer is ever returned.
#[derive(Clone, Debug, PartialEq)]
pub struct Buffer<T: Element> {
    shape: Shape,
    data: Box<[T]>,
    size: usize,
}

impl<T: Element> Buffer<T> {
    /// Allocate a zero-initialized buffer for `shape`
    pub fn zeroed(shape: Shape) -> Result<Self> {
        Self::filled(shape, T::zero())
    }

    /// Allocate a buffer for `shape` with every element set to `value`
    pub fn filled(shape: Shape, value: T) -> Result<Self> {
        let size = shape
            .checked_numel()
            .ok_or_else(|| Error::allocation(&shape, "element count overflows usize"))?;

        let mut data = Vec::new();
        data.try_reserve_exact(size)
            .map_err(|e| Error::allocation(&shape, e.to_string()))?;
        data.resize(size, value);

        Ok(Self {
            shape,
            data: data.into_boxed_slice(),
            size,
        })
    }

    /// Allocate a buffer for `shape` holding a copy of `values`
    ///
    /// Fails with [`Error::SizeMismatch`] if `values.len()` differs from the
    /// shape's element count.
    pub fn from_slice(shape: Shape, values: &[T]) -> Result<Self> {
        let mut buffer = Self::zeroed(shape)?;
        buffer.copy_from(values)?;
        Ok(buffer)
    }

    /// The buffer's shape
    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Cached element count
    #[inline]
    pub fn size(&self) -> usize {
        debug_assert_eq!(self.size, self.shape.numel());
        self.size
    }

    /// Elements in row-major order
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable elements in row-major order
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Overwrite every element from `values`
    ///
    /// The length is checked before any element is written, so a failed
    /// call leaves the buffer untouched.
    pub fn copy_from(&mut self, values: &[T]) -> Result<()> {
        if values.len() != self.size {
            return Err(Error::size_mismatch("set_data", self.size, values.len()));
        }
        self.data.copy_from_slice(values);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeroed() {
        let buf = Buffer::<f32>::zeroed(Shape::new(&[2, 3]).unwrap()).unwrap();
        assert_eq!(buf.size(), 6);
        assert_eq!(buf.size(), buf.shape().numel());
        assert!(buf.as_slice().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_scalar_buffer_has_one_element() {
        let buf = Buffer::<f64>::zeroed(Shape::scalar()).unwrap();
        assert_eq!(buf.size(), 1);
    }

    #[test]
    fn test_overflow_is_allocation_failure() {
        let shape = Shape::new(&[usize::MAX, 2]).unwrap();
        let err = Buffer::<f32>::zeroed(shape).unwrap_err();
        assert!(matches!(err, Error::AllocationFailure { .. }));
    }

    #[test]
    fn test_oversized_request_is_allocation_failure() {
        // Fits in usize but not in the address space
        let shape = Shape::new(&[usize::MAX / 4]).unwrap();
        let err = Buffer::<f64>::zeroed(shape).unwrap_err();
        assert!(matches!(err, Error::AllocationFailure { .. }));
    }

    #[test]
    fn test_copy_from_mismatch_leaves_contents() {
        let mut buf = Buffer::<f32>::filled(Shape::new(&[2]).unwrap(), 7.0).unwrap();
        let err = buf.copy_from(&[1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(err, Error::size_mismatch("set_data", 2, 3));
        assert_eq!(buf.as_slice(), &[7.0, 7.0]);
    }
}
