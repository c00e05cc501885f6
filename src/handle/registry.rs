//! Slot arena mapping handles to live tensors

use super::{Handle, RegistryConfig};
use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use crate::ops::{BinaryOp, UnaryOp};
use crate::tensor::{Buffer, Shape, Tensor};
use rand::Rng;
use tracing::instrument;

struct Slot<T: Element> {
    /// Generation handed out with the current (or next) occupant
    generation: u32,
    tensor: Option<Tensor<T>>,
}

/// Owner of every tensor reachable through a [`Handle`]
///
/// The registry holds one owner per live handle. Releasing a handle drops
/// that owner; the buffer itself is freed once no handle and no outside
/// alias references it. Every operation except [`release`](Self::release)
/// rejects non-live handles with [`Error::UseAfterRelease`]; `release` on a
/// non-live handle does nothing.
///
/// Operations that produce a tensor (`add`, `multiply`, `exp`, `log`)
/// register the result and return a new handle; the operands stay live.
pub struct TensorRegistry<T: Element = f32> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    live: usize,
    live_elements: usize,
    config: RegistryConfig,
}

impl<T: Element> TensorRegistry<T> {
    /// Create an empty registry with default settings
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty registry
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            slots: Vec::with_capacity(config.initial_capacity),
            free: Vec::new(),
            live: 0,
            live_elements: 0,
            config,
        }
    }

    /// Active settings
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Number of live handles
    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Elements addressed by live handles, aliases counted per handle
    pub fn live_elements(&self) -> usize {
        self.live_elements
    }

    /// Whether `handle` currently denotes a tensor
    pub fn is_live(&self, handle: Handle) -> bool {
        self.live_index(handle).is_some()
    }

    /// Iterate over every live handle
    pub fn handles(&self) -> impl Iterator<Item = Handle> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.tensor
                .as_ref()
                .map(|_| Handle::new(index as u32, slot.generation))
        })
    }

    // ===== Lifecycle =====

    /// Allocate a zero-filled tensor and return its handle
    ///
    /// Fails with [`Error::InvalidShape`] on a zero or negative dimension and
    /// with [`Error::AllocationFailure`] if storage cannot be obtained. No
    /// handle is issued on failure.
    #[instrument(level = "debug", skip(self))]
    pub fn create(&mut self, shape: &[i64]) -> Result<Handle> {
        let shape = Shape::from_signed(shape)?;
        self.check_budget(&shape)?;
        let tensor = Tensor::from_shape(shape, self.config.ownership)?;
        self.adopt(tensor)
    }

    /// Allocate a tensor holding a copy of `values`
    ///
    /// Fails with [`Error::SizeMismatch`] if `values` does not match the
    /// shape's element count.
    #[instrument(level = "debug", skip(self, values), fields(len = values.len()))]
    pub fn create_from_data(&mut self, shape: &[i64], values: &[T]) -> Result<Handle> {
        let shape = Shape::from_signed(shape)?;
        self.check_budget(&shape)?;
        let buffer = Buffer::from_slice(shape, values)?;
        self.adopt(Tensor::from_buffer(buffer, self.config.ownership))
    }

    /// Take ownership of an existing tensor
    pub fn insert(&mut self, tensor: Tensor<T>) -> Result<Handle> {
        self.check_budget(tensor.shape_ref())?;
        self.adopt(tensor)
    }

    /// Release a handle
    ///
    /// Drops the registry's owner of the tensor. Releasing a handle that is
    /// already released, stale, or was never issued is a no-op.
    #[instrument(level = "debug", skip(self))]
    pub fn release(&mut self, handle: Handle) {
        let slot = match self.slots.get_mut(handle.index() as usize) {
            Some(slot) if slot.generation == handle.generation() => slot,
            _ => {
                tracing::debug!(%handle, "release of non-live handle ignored");
                return;
            }
        };
        let Some(tensor) = slot.tensor.take() else {
            tracing::debug!(%handle, "release of non-live handle ignored");
            return;
        };

        let last_owner = tensor.ref_count() == 1;
        self.live -= 1;
        self.live_elements -= tensor.size();
        drop(tensor);

        // A slot whose generation is exhausted is retired rather than reused,
        // so no stale handle can ever match a later occupant.
        if slot.generation < u32::MAX {
            slot.generation += 1;
            self.free.push(handle.index());
        }
        tracing::debug!(%handle, buffer_freed = last_owner, "handle released");
    }

    /// Release every live handle
    pub fn clear(&mut self) {
        let live: Vec<Handle> = self.handles().collect();
        for handle in live {
            self.release(handle);
        }
    }

    /// Borrow the tensor behind a live handle
    pub fn get(&self, handle: Handle) -> Result<&Tensor<T>> {
        self.live_index(handle)
            .and_then(|index| self.slots[index].tensor.as_ref())
            .ok_or_else(|| reject(handle))
    }

    /// Mutably borrow the tensor behind a live handle
    pub fn get_mut(&mut self, handle: Handle) -> Result<&mut Tensor<T>> {
        match self.live_index(handle) {
            Some(index) => self.slots[index]
                .tensor
                .as_mut()
                .ok_or_else(|| reject(handle)),
            None => Err(reject(handle)),
        }
    }

    /// Issue a second handle aliasing the same buffer
    ///
    /// An exclusive tensor is first moved into shared storage (no copy), so
    /// in-place writes through either handle are visible through both.
    /// Releasing one handle leaves the other live. If the alias would
    /// exceed the element budget nothing changes, including the original
    /// tensor's ownership.
    pub fn share(&mut self, handle: Handle) -> Result<Handle> {
        self.check_budget(self.get(handle)?.shape_ref())?;

        let index = self.live_index(handle).ok_or_else(|| reject(handle))?;
        let slot = &mut self.slots[index];
        if let Some(tensor) = slot.tensor.take() {
            slot.tensor = Some(tensor.into_shared());
        }

        let alias = self.get(handle)?.clone();
        self.adopt(alias)
    }

    // ===== Operations =====

    /// Element-wise sum of two tensors into a new handle
    pub fn add(&mut self, a: Handle, b: Handle) -> Result<Handle> {
        self.binary(BinaryOp::Add, a, b)
    }

    /// Element-wise product of two tensors into a new handle
    pub fn multiply(&mut self, a: Handle, b: Handle) -> Result<Handle> {
        self.binary(BinaryOp::Mul, a, b)
    }

    /// Element-wise exponential into a new handle
    pub fn exp(&mut self, handle: Handle) -> Result<Handle> {
        self.unary(UnaryOp::Exp, handle)
    }

    /// Element-wise natural logarithm into a new handle
    pub fn log(&mut self, handle: Handle) -> Result<Handle> {
        self.unary(UnaryOp::Log, handle)
    }

    /// Sum of all elements
    pub fn sum(&self, handle: Handle) -> Result<T> {
        Ok(self.get(handle)?.sum())
    }

    /// Replace a tensor's contents
    pub fn set_data(&mut self, handle: Handle, values: &[T]) -> Result<()> {
        self.get_mut(handle)?.set_data(values)
    }

    /// Set every element of a tensor to `value`
    pub fn fill(&mut self, handle: Handle, value: T) -> Result<()> {
        self.get_mut(handle)?.fill(value);
        Ok(())
    }

    /// Fill a tensor with uniform draws from `[0, 1)`
    pub fn randomize<R: Rng + ?Sized>(&mut self, handle: Handle, rng: &mut R) -> Result<()> {
        self.get_mut(handle)?.randomize(rng);
        Ok(())
    }

    /// Copy out a tensor's shape
    pub fn read_shape(&self, handle: Handle) -> Result<Vec<usize>> {
        Ok(self.get(handle)?.shape().to_vec())
    }

    /// Copy out a tensor's elements in row-major order
    pub fn read_data(&self, handle: Handle) -> Result<Vec<T>> {
        Ok(self.get(handle)?.to_vec())
    }

    /// Element type of a tensor, for splitting [`read_bytes`](Self::read_bytes)
    pub fn read_dtype(&self, handle: Handle) -> Result<DType> {
        Ok(self.get(handle)?.dtype())
    }

    /// Copy out a tensor's elements as native-endian bytes
    pub fn read_bytes(&self, handle: Handle) -> Result<Vec<u8>> {
        Ok(self.get(handle)?.to_bytes())
    }

    /// Diagnostic text dump of shape and contents
    pub fn render(&self, handle: Handle) -> Result<String> {
        Ok(self.get(handle)?.to_string())
    }

    // ===== Internals =====

    fn binary(&mut self, op: BinaryOp, a: Handle, b: Handle) -> Result<Handle> {
        let out = {
            let lhs = self.get(a)?;
            let rhs = self.get(b)?;
            if lhs.size() == rhs.size() {
                self.check_budget(lhs.shape_ref())?;
            }
            lhs.binary_op(op, rhs)?
        };
        self.adopt(out)
    }

    fn unary(&mut self, op: UnaryOp, handle: Handle) -> Result<Handle> {
        let out = {
            let input = self.get(handle)?;
            self.check_budget(input.shape_ref())?;
            input.unary_op(op)?
        };
        self.adopt(out)
    }

    fn live_index(&self, handle: Handle) -> Option<usize> {
        let index = handle.index() as usize;
        self.slots
            .get(index)
            .filter(|slot| slot.generation == handle.generation() && slot.tensor.is_some())
            .map(|_| index)
    }

    fn check_budget(&self, shape: &Shape) -> Result<()> {
        let Some(max) = self.config.max_live_elements else {
            return Ok(());
        };
        let requested = shape
            .checked_numel()
            .ok_or_else(|| Error::allocation(shape, "element count overflows usize"))?;
        if self.live_elements.saturating_add(requested) > max {
            return Err(Error::allocation(
                shape,
                format!(
                    "registry budget of {} elements exceeded ({} live)",
                    max, self.live_elements
                ),
            ));
        }
        Ok(())
    }

    fn adopt(&mut self, tensor: Tensor<T>) -> Result<Handle> {
        let size = tensor.size();
        let handle = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.tensor = Some(tensor);
                Handle::new(index, slot.generation)
            }
            None => {
                let index = u32::try_from(self.slots.len())
                    .map_err(|_| Error::allocation(tensor.shape(), "handle slots exhausted"))?;
                self.slots.push(Slot {
                    generation: 1,
                    tensor: Some(tensor),
                });
                Handle::new(index, 1)
            }
        };
        self.live += 1;
        self.live_elements += size;
        tracing::debug!(%handle, size, "handle issued");
        Ok(handle)
    }
}

fn reject(handle: Handle) -> Error {
    tracing::warn!(%handle, "operation on non-live handle rejected");
    Error::UseAfterRelease { handle }
}

impl<T: Element> Default for TensorRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element> std::fmt::Debug for TensorRegistry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TensorRegistry")
            .field("live", &self.live_count())
            .field("slots", &self.slots.len())
            .field("live_elements", &self.live_elements)
            .field("config", &self.config)
            .finish()
    }
}
