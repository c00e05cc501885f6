//! Process-wide `f32` registry
//!
//! Free functions over one [`TensorRegistry<f32>`] guarded by a mutex, for
//! hosts that drive tensors through plain handles and cannot keep a registry
//! value around. Every call takes the lock for its whole duration, so calls
//! from different threads are serialized.
//!
//! ```
//! use densa::handle::global;
//!
//! let a = global::create(&[2, 2])?;
//! global::fill(a, 1.5)?;
//! assert_eq!(global::sum(a)?, 6.0);
//! global::release(a);
//! assert!(global::sum(a).is_err());
//! # Ok::<(), densa::error::Error>(())
//! ```

use super::{Handle, RegistryConfig, TensorRegistry};
use crate::dtype::DType;
use crate::error::Result;
use rand::Rng;
use std::sync::{Mutex, MutexGuard, OnceLock};

static REGISTRY: OnceLock<Mutex<TensorRegistry<f32>>> = OnceLock::new();

/// Install settings for the global registry
///
/// Only effective before the first registry call; returns `false` if the
/// registry already exists.
pub fn configure(config: RegistryConfig) -> bool {
    REGISTRY
        .set(Mutex::new(TensorRegistry::with_config(config)))
        .is_ok()
}

fn registry() -> MutexGuard<'static, TensorRegistry<f32>> {
    // A panic while holding the lock cannot leave a slot half-updated in a
    // way later calls would misread, so recover the guard.
    REGISTRY
        .get_or_init(|| Mutex::new(TensorRegistry::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Run `f` with exclusive access to the global registry
///
/// Useful for batching several operations under one lock.
pub fn with_registry<R>(f: impl FnOnce(&mut TensorRegistry<f32>) -> R) -> R {
    f(&mut registry())
}

/// See [`TensorRegistry::create`]
pub fn create(shape: &[i64]) -> Result<Handle> {
    registry().create(shape)
}

/// See [`TensorRegistry::create_from_data`]
pub fn create_from_data(shape: &[i64], values: &[f32]) -> Result<Handle> {
    registry().create_from_data(shape, values)
}

/// See [`TensorRegistry::release`]
pub fn release(handle: Handle) {
    registry().release(handle)
}

/// See [`TensorRegistry::share`]
pub fn share(handle: Handle) -> Result<Handle> {
    registry().share(handle)
}

/// See [`TensorRegistry::add`]
pub fn add(a: Handle, b: Handle) -> Result<Handle> {
    registry().add(a, b)
}

/// See [`TensorRegistry::multiply`]
pub fn multiply(a: Handle, b: Handle) -> Result<Handle> {
    registry().multiply(a, b)
}

/// See [`TensorRegistry::exp`]
pub fn exp(handle: Handle) -> Result<Handle> {
    registry().exp(handle)
}

/// See [`TensorRegistry::log`]
pub fn log(handle: Handle) -> Result<Handle> {
    registry().log(handle)
}

/// See [`TensorRegistry::sum`]
pub fn sum(handle: Handle) -> Result<f32> {
    registry().sum(handle)
}

/// See [`TensorRegistry::set_data`]
pub fn set_data(handle: Handle, values: &[f32]) -> Result<()> {
    registry().set_data(handle, values)
}

/// See [`TensorRegistry::fill`]
pub fn fill(handle: Handle, value: f32) -> Result<()> {
    registry().fill(handle, value)
}

/// See [`TensorRegistry::randomize`]
pub fn randomize<R: Rng + ?Sized>(handle: Handle, rng: &mut R) -> Result<()> {
    registry().randomize(handle, rng)
}

/// See [`TensorRegistry::read_shape`]
pub fn read_shape(handle: Handle) -> Result<Vec<usize>> {
    registry().read_shape(handle)
}

/// See [`TensorRegistry::read_data`]
pub fn read_data(handle: Handle) -> Result<Vec<f32>> {
    registry().read_data(handle)
}

/// See [`TensorRegistry::read_dtype`]
pub fn read_dtype(handle: Handle) -> Result<DType> {
    registry().read_dtype(handle)
}

/// See [`TensorRegistry::read_bytes`]
pub fn read_bytes(handle: Handle) -> Result<Vec<u8>> {
    registry().read_bytes(handle)
}

/// See [`TensorRegistry::render`]
pub fn render(handle: Handle) -> Result<String> {
    registry().render(handle)
}

/// See [`TensorRegistry::is_live`]
pub fn is_live(handle: Handle) -> bool {
    registry().is_live(handle)
}

/// See [`TensorRegistry::live_count`]
pub fn live_count() -> usize {
    registry().live_count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    // Other tests share the global registry, so nothing here asserts on
    // global counts.

    #[test]
    fn test_global_lifecycle() {
        let a = create_from_data(&[2], &[1.0, 2.0]).unwrap();
        let b = create_from_data(&[2], &[3.0, 4.0]).unwrap();
        let c = add(a, b).unwrap();

        assert_eq!(read_data(c).unwrap(), vec![4.0, 6.0]);
        assert_eq!(read_shape(c).unwrap(), vec![2]);

        for h in [a, b, c] {
            release(h);
            assert!(!is_live(h));
        }
        assert_eq!(sum(c), Err(Error::UseAfterRelease { handle: c }));
    }

    #[test]
    fn test_with_registry_batches() {
        let total = with_registry(|reg| {
            let h = reg.create(&[3]).unwrap();
            reg.fill(h, 2.0).unwrap();
            let s = reg.sum(h).unwrap();
            reg.release(h);
            s
        });
        assert_eq!(total, 6.0);
    }
}
