//! Opaque handles for driving tensors across a component boundary
//!
//! A host that cannot own Rust values holds [`Handle`]s instead. A handle is
//! an index into a [`TensorRegistry`] slot plus the generation that slot had
//! when the handle was issued. Releasing a handle bumps the slot's
//! generation, so every later use of the old handle is detected and rejected
//! with [`Error::UseAfterRelease`](crate::error::Error::UseAfterRelease)
//! instead of touching freed or recycled memory.
//!
//! ```text
//!            create / insert / add / ...
//! Uninitialized ───────────────────────────▶ Live
//!                                              │ release
//!                                              ▼
//!                                           Released ──release──▶ Released (no-op)
//! ```
//!
//! The [`global`] module wraps one process-wide `f32` registry behind a
//! mutex for embedders that want free functions.

mod config;
pub mod global;
mod registry;

pub use config::RegistryConfig;
pub use registry::TensorRegistry;

use std::fmt;

/// Generation-checked reference to a tensor held by a [`TensorRegistry`]
///
/// Generations start at 1, so the all-zero handle ([`Handle::NULL`]) is never
/// issued and always rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Handle {
    index: u32,
    generation: u32,
}

impl Handle {
    /// A handle no registry ever issues
    pub const NULL: Handle = Handle {
        index: 0,
        generation: 0,
    };

    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index
    #[inline]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Slot generation at issue time
    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }

    /// Pack into a single integer for hosts that pass handles as numbers
    ///
    /// Generation in the high 32 bits, index in the low 32 bits.
    #[inline]
    pub const fn to_raw(self) -> u64 {
        ((self.generation as u64) << 32) | self.index as u64
    }

    /// Unpack a value produced by [`Handle::to_raw`]
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self {
            index: raw as u32,
            generation: (raw >> 32) as u32,
        }
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}v{})", self.index, self.generation)
    }
}
