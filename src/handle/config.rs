//! Registry configuration

use crate::tensor::Ownership;

/// Settings for a [`TensorRegistry`](super::TensorRegistry)
///
/// # Example
///
/// ```
/// use densa::handle::{RegistryConfig, TensorRegistry};
/// use densa::tensor::Ownership;
///
/// let config = RegistryConfig::default()
///     .with_initial_capacity(64)
///     .with_max_live_elements(1 << 20)
///     .with_ownership(Ownership::Shared);
/// let registry = TensorRegistry::<f32>::with_config(config);
/// assert_eq!(registry.live_count(), 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Slots to preallocate
    pub initial_capacity: usize,
    /// Upper bound on elements addressed by live handles
    ///
    /// Each live handle counts its tensor's size, aliases included. A request
    /// that would go past the bound fails with
    /// [`Error::AllocationFailure`](crate::error::Error::AllocationFailure)
    /// before anything is allocated. `None` means unbounded.
    pub max_live_elements: Option<usize>,
    /// Discipline for tensors the registry allocates
    pub ownership: Ownership,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 16,
            max_live_elements: None,
            ownership: Ownership::Exclusive,
        }
    }
}

impl RegistryConfig {
    /// Set the number of preallocated slots
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Bound the elements addressed by live handles
    pub fn with_max_live_elements(mut self, max: usize) -> Self {
        self.max_live_elements = Some(max);
        self
    }

    /// Set the discipline for tensors the registry allocates
    pub fn with_ownership(mut self, ownership: Ownership) -> Self {
        self.ownership = ownership;
        self
    }
}
