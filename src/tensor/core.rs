//! Core Tensor type

use super::{Buffer, Ownership, Shape, Storage};
use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use crate::ops::kernels;
use rand::Rng;
use std::fmt;
use tracing::instrument;

/// Dense n-dimensional array of floating-point elements
///
/// `Tensor` consists of:
/// - **Shape**: validated, immutable dimensions
/// - **Storage**: the element [`Buffer`] under an [`Ownership`] discipline
///
/// # Ownership
///
/// An exclusive tensor behaves like a value: `clone()` copies the buffer.
/// A shared tensor behaves like a handle: `clone()` bumps a reference count
/// and both values see each other's in-place writes (`fill`, `randomize`,
/// `set_data`). Arithmetic always writes into a freshly allocated buffer, so
/// results never alias an operand.
///
/// # Example
///
/// ```
/// use densa::tensor::Tensor;
///
/// let a = Tensor::<f32>::try_from_slice(&[1.0, 2.0, 3.0, 4.0], &[2, 2])?;
/// let b = Tensor::<f32>::try_from_slice(&[5.0, 6.0, 7.0, 8.0], &[2, 2])?;
///
/// assert_eq!(a.add(&b)?.to_vec(), vec![6.0, 8.0, 10.0, 12.0]);
/// assert_eq!(a.sum(), 10.0);
/// # Ok::<(), densa::error::Error>(())
/// ```
#[derive(Clone)]
pub struct Tensor<T: Element = f32> {
    /// Copy of the buffer's shape, readable without touching storage
    shape: Shape,
    /// Element storage
    storage: Storage<T>,
}

impl<T: Element> Tensor<T> {
    /// Wrap an already-built buffer
    pub fn from_buffer(buffer: Buffer<T>, ownership: Ownership) -> Self {
        Self {
            shape: buffer.shape().clone(),
            storage: Storage::new(buffer, ownership),
        }
    }

    /// Create a zero-filled exclusive tensor
    ///
    /// Fails with [`Error::InvalidShape`] on a zero dimension and with
    /// [`Error::AllocationFailure`] if storage cannot be obtained.
    pub fn new(shape: &[usize]) -> Result<Self> {
        Self::with_ownership(shape, Ownership::Exclusive)
    }

    /// Create a zero-filled shared tensor
    pub fn new_shared(shape: &[usize]) -> Result<Self> {
        Self::with_ownership(shape, Ownership::Shared)
    }

    /// Create a zero-filled tensor under the given ownership discipline
    pub fn with_ownership(shape: &[usize], ownership: Ownership) -> Result<Self> {
        Self::from_shape(Shape::new(shape)?, ownership)
    }

    /// Create a zero-filled tensor from a validated shape
    #[instrument(level = "trace", skip_all, fields(shape = %shape, ?ownership))]
    pub fn from_shape(shape: Shape, ownership: Ownership) -> Result<Self> {
        Ok(Self::from_buffer(Buffer::zeroed(shape)?, ownership))
    }

    /// Create an exclusive tensor with every element set to `value`
    pub fn full(shape: &[usize], value: T) -> Result<Self> {
        let buffer = Buffer::filled(Shape::new(shape)?, value)?;
        Ok(Self::from_buffer(buffer, Ownership::Exclusive))
    }

    /// Create an exclusive tensor from a slice of data (fallible version)
    ///
    /// Returns [`Error::SizeMismatch`] if `data.len()` does not equal the
    /// product of the `shape` dimensions.
    pub fn try_from_slice(data: &[T], shape: &[usize]) -> Result<Self> {
        let buffer = Buffer::from_slice(Shape::new(shape)?, data)?;
        Ok(Self::from_buffer(buffer, Ownership::Exclusive))
    }

    /// Create an exclusive tensor from a slice of data
    ///
    /// # Panics
    ///
    /// Panics if the shape is invalid or `data.len()` does not equal the
    /// product of the `shape` dimensions. For a fallible alternative, use
    /// [`Self::try_from_slice`].
    pub fn from_slice(data: &[T], shape: &[usize]) -> Self {
        Self::try_from_slice(data, shape).expect("Tensor::from_slice failed")
    }

    // ===== Accessors =====

    /// Get the shape
    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.shape.as_slice()
    }

    /// Get the validated shape
    #[inline]
    pub fn shape_ref(&self) -> &Shape {
        &self.shape
    }

    /// Number of dimensions
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.ndim()
    }

    /// Total number of elements
    #[inline]
    pub fn size(&self) -> usize {
        self.shape.numel()
    }

    /// Element type tag
    #[inline]
    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    /// Get the storage
    #[inline]
    pub fn storage(&self) -> &Storage<T> {
        &self.storage
    }

    /// Ownership discipline of the underlying buffer
    #[inline]
    pub fn ownership(&self) -> Ownership {
        self.storage.ownership()
    }

    /// Whether clones of this tensor alias its buffer
    #[inline]
    pub fn is_shared(&self) -> bool {
        self.ownership() == Ownership::Shared
    }

    /// Number of tensors referencing this tensor's buffer
    #[inline]
    pub fn ref_count(&self) -> usize {
        self.storage.ref_count()
    }

    /// Whether `self` and `other` read and write the same buffer
    #[inline]
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        self.storage.ptr_eq(&other.storage)
    }

    // ===== In-place mutation =====

    /// Set every element to `value`
    pub fn fill(&mut self, value: T) {
        self.storage
            .write(|buf| kernels::fill_kernel(buf.as_mut_slice(), value));
    }

    /// Fill with independent uniform draws from `[0, 1)`
    ///
    /// The generator is supplied by the caller; seed it for reproducible
    /// contents.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.storage
            .write(|buf| kernels::rand_uniform_kernel(rng, buf.as_mut_slice()));
    }

    /// Replace the contents element-for-element
    ///
    /// Fails with [`Error::SizeMismatch`] when `values.len() != self.size()`;
    /// the prior contents are left unchanged in that case.
    pub fn set_data(&mut self, values: &[T]) -> Result<()> {
        self.storage.write(|buf| buf.copy_from(values))
    }

    // ===== Conversion =====

    /// Move into shared storage without copying the elements
    pub fn into_shared(self) -> Self {
        Self {
            shape: self.shape,
            storage: self.storage.into_shared(),
        }
    }

    /// Detach into exclusive storage
    ///
    /// If other aliases still reference the buffer it is copied, so they
    /// keep their contents and stop observing this tensor's writes.
    pub fn into_exclusive(self) -> Self {
        Self {
            shape: self.shape,
            storage: self.storage.into_exclusive(),
        }
    }

    /// Run `f` over the elements in row-major order
    #[inline]
    pub fn with_slice<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        self.storage.read(|buf| f(buf.as_slice()))
    }

    /// Copy the elements out in row-major order
    pub fn to_vec(&self) -> Vec<T> {
        self.with_slice(|data| data.to_vec())
    }

    /// Size of the element data in bytes
    #[inline]
    pub fn nbytes(&self) -> usize {
        self.size() * self.dtype().size_in_bytes()
    }

    /// Copy the elements out as native-endian bytes
    ///
    /// The result is [`Self::nbytes`] long; [`Self::dtype`] tells a reader
    /// how to split it.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.nbytes());
        self.with_slice(|data| out.extend_from_slice(bytemuck::cast_slice::<T, u8>(data)));
        out
    }

    /// Extract the single element of a one-element tensor
    ///
    /// Returns [`Error::SizeMismatch`] if the tensor holds more than one element.
    pub fn item(&self) -> Result<T> {
        if self.size() != 1 {
            return Err(Error::size_mismatch("item", 1, self.size()));
        }
        Ok(self.with_slice(|data| data[0]))
    }

    pub(crate) fn storage_pair<R>(
        &self,
        other: &Self,
        f: impl FnOnce(&[T], &[T]) -> R,
    ) -> R {
        self.storage
            .read_pair(&other.storage, |a, b| f(a.as_slice(), b.as_slice()))
    }
}

impl<T: Element> fmt::Debug for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape)
            .field("dtype", &self.dtype())
            .field("ownership", &self.ownership())
            .field("refs", &self.ref_count())
            .finish()
    }
}

/// Diagnostic dump of shape and contents
///
/// ```text
/// Tensor shape: (2, 2)
/// Data: 1.00 2.00 3.00 4.00
/// ```
///
/// The formatter precision (`{:.4}`) overrides the default of two decimals.
impl<T: Element> fmt::Display for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(2);
        writeln!(f, "Tensor shape: {}", self.shape)?;
        write!(f, "Data:")?;
        self.with_slice(|data| {
            for value in data {
                write!(f, " {:.*}", precision, value.to_f64())?;
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_new_is_zeroed() {
        let t = Tensor::<f32>::new(&[2, 3]).unwrap();
        assert_eq!(t.shape(), &[2, 3]);
        assert_eq!(t.ndim(), 2);
        assert_eq!(t.size(), 6);
        assert_eq!(t.dtype(), DType::F32);
        assert!(t.to_vec().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_scalar_tensor() {
        let t = Tensor::<f64>::full(&[], 3.5).unwrap();
        assert_eq!(t.size(), 1);
        assert_eq!(t.item().unwrap(), 3.5);
    }

    #[test]
    fn test_invalid_shape() {
        let err = Tensor::<f32>::new(&[2, 0]).unwrap_err();
        assert_eq!(err, Error::InvalidShape { axis: 1, value: 0 });
    }

    #[test]
    fn test_from_slice_mismatch() {
        let err = Tensor::<f32>::try_from_slice(&[1.0, 2.0, 3.0], &[2, 2]).unwrap_err();
        assert_eq!(err, Error::size_mismatch("set_data", 4, 3));
    }

    #[test]
    fn test_fill() {
        let mut t = Tensor::<f32>::new(&[3]).unwrap();
        t.fill(1.5);
        assert_eq!(t.to_vec(), vec![1.5, 1.5, 1.5]);
    }

    #[test]
    fn test_randomize_is_reproducible() {
        let mut a = Tensor::<f64>::new(&[16]).unwrap();
        let mut b = Tensor::<f64>::new(&[16]).unwrap();
        a.randomize(&mut StdRng::seed_from_u64(7));
        b.randomize(&mut StdRng::seed_from_u64(7));

        assert_eq!(a.to_vec(), b.to_vec());
        assert!(a.to_vec().iter().all(|&x| (0.0..1.0).contains(&x)));
    }

    #[cfg(feature = "f16")]
    #[test]
    fn test_half_precision_ops() {
        use half::{bf16, f16};

        let mut h = Tensor::<f16>::new(&[256]).unwrap();
        h.randomize(&mut StdRng::seed_from_u64(5));
        assert!(h.to_vec().iter().all(|x| (0.0..1.0).contains(&x.to_f64())));

        let mut b = Tensor::<bf16>::new(&[256]).unwrap();
        b.randomize(&mut StdRng::seed_from_u64(5));
        assert!(b.to_vec().iter().all(|x| (0.0..1.0).contains(&x.to_f64())));

        let ones = Tensor::<f16>::full(&[4], f16::from_f64(1.0)).unwrap();
        assert_eq!(ones.sum().to_f64(), 4.0);
        let back = ones.exp().unwrap().log().unwrap();
        assert!(back.to_vec().iter().all(|x| (x.to_f64() - 1.0).abs() < 1e-2));
        assert_eq!(ones.nbytes(), 8);
    }

    #[test]
    fn test_set_data_mismatch_keeps_contents() {
        let mut t = Tensor::<f32>::from_slice(&[1.0, 2.0], &[2]);
        assert!(t.set_data(&[9.0]).is_err());
        assert_eq!(t.to_vec(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_item_requires_single_element() {
        let t = Tensor::<f32>::new(&[2]).unwrap();
        assert_eq!(t.item(), Err(Error::size_mismatch("item", 1, 2)));
    }

    #[test]
    fn test_to_bytes() {
        let t = Tensor::<f32>::from_slice(&[1.0], &[1]);
        assert_eq!(t.to_bytes(), 1.0f32.to_ne_bytes().to_vec());

        let t = Tensor::<f64>::new(&[2, 3]).unwrap();
        assert_eq!(t.nbytes(), 48);
        assert_eq!(t.to_bytes().len(), t.nbytes());
    }

    #[test]
    fn test_clone_follows_ownership() {
        let a = Tensor::<f32>::new_shared(&[2]).unwrap();
        assert!(a.shares_storage_with(&a.clone()));

        let b = Tensor::<f32>::new(&[2]).unwrap();
        assert!(!b.shares_storage_with(&b.clone()));
    }

    #[test]
    fn test_display() {
        let t = Tensor::<f32>::from_slice(&[1.0, 2.0, 3.0, 4.0], &[2, 2]);
        assert_eq!(
            t.to_string(),
            "Tensor shape: (2, 2)\nData: 1.00 2.00 3.00 4.00"
        );
        assert_eq!(format!("{:.1}", t), "Tensor shape: (2, 2)\nData: 1.0 2.0 3.0 4.0");
    }
}
