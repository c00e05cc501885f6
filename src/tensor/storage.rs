//! Storage: exclusive or reference-counted ownership of a buffer

use super::Buffer;
use crate::dtype::Element;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Ownership discipline of a tensor's buffer, chosen at construction
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Ownership {
    /// Each tensor owns its buffer outright; cloning copies the elements
    #[default]
    Exclusive,
    /// The buffer sits behind an atomic reference count; cloning aliases it
    /// and in-place mutation through any alias is seen by all of them
    Shared,
}

/// Storage for tensor data
///
/// `Exclusive` holds the buffer inline. `Shared` wraps it in
/// `Arc<RwLock<_>>`: the count is atomic so aliases may be cloned and dropped
/// on any thread, and the buffer is freed when the last alias goes away.
/// The lock only makes each individual access sound; ordering concurrent
/// mutations is up to the caller.
pub enum Storage<T: Element> {
    /// Uniquely owned buffer
    Exclusive(Buffer<T>),
    /// Reference-counted buffer
    Shared(Arc<RwLock<Buffer<T>>>),
}

/// Acquire read lock, recovering from poison if necessary.
fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Acquire write lock, recovering from poison if necessary.
fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<T: Element> Storage<T> {
    /// Wrap a buffer under the given discipline
    pub fn new(buffer: Buffer<T>, ownership: Ownership) -> Self {
        match ownership {
            Ownership::Exclusive => Self::Exclusive(buffer),
            Ownership::Shared => Self::Shared(Arc::new(RwLock::new(buffer))),
        }
    }

    /// The discipline this storage was built with
    #[inline]
    pub fn ownership(&self) -> Ownership {
        match self {
            Self::Exclusive(_) => Ownership::Exclusive,
            Self::Shared(_) => Ownership::Shared,
        }
    }

    /// Number of tensors referencing this buffer (always 1 when exclusive)
    #[inline]
    pub fn ref_count(&self) -> usize {
        match self {
            Self::Exclusive(_) => 1,
            Self::Shared(inner) => Arc::strong_count(inner),
        }
    }

    /// Whether both storages refer to the same buffer
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Shared(a), Self::Shared(b)) => Arc::ptr_eq(a, b),
            (Self::Exclusive(a), Self::Exclusive(b)) => std::ptr::eq(a, b),
            _ => false,
        }
    }

    /// Run `f` with read access to the buffer
    pub fn read<R>(&self, f: impl FnOnce(&Buffer<T>) -> R) -> R {
        match self {
            Self::Exclusive(buffer) => f(buffer),
            Self::Shared(inner) => f(&*read_lock(inner)),
        }
    }

    /// Run `f` with read access to two buffers at once
    ///
    /// When both sides alias one shared buffer the lock is taken once and the
    /// same buffer is passed twice.
    pub fn read_pair<R>(&self, other: &Self, f: impl FnOnce(&Buffer<T>, &Buffer<T>) -> R) -> R {
        if self.ptr_eq(other) {
            return self.read(|buffer| f(buffer, buffer));
        }
        self.read(|a| other.read(|b| f(a, b)))
    }

    /// Run `f` with write access to the buffer
    pub fn write<R>(&mut self, f: impl FnOnce(&mut Buffer<T>) -> R) -> R {
        match self {
            Self::Exclusive(buffer) => f(buffer),
            Self::Shared(inner) => f(&mut *write_lock(inner)),
        }
    }

    /// Convert to shared storage, moving the buffer without copying
    pub fn into_shared(self) -> Self {
        match self {
            Self::Exclusive(buffer) => Self::Shared(Arc::new(RwLock::new(buffer))),
            shared @ Self::Shared(_) => shared,
        }
    }

    /// Detach into exclusive storage
    ///
    /// A shared buffer is copied so the remaining aliases are unaffected.
    pub fn into_exclusive(self) -> Self {
        match self {
            Self::Shared(inner) => match Arc::try_unwrap(inner) {
                Ok(lock) => Self::Exclusive(lock.into_inner().unwrap_or_else(|p| p.into_inner())),
                Err(inner) => Self::Exclusive(read_lock(&inner).clone()),
            },
            exclusive @ Self::Exclusive(_) => exclusive,
        }
    }
}

impl<T: Element> Clone for Storage<T> {
    /// Exclusive storage is deep-copied; shared storage bumps the count
    fn clone(&self) -> Self {
        match self {
            Self::Exclusive(buffer) => Self::Exclusive(buffer.clone()),
            Self::Shared(inner) => Self::Shared(Arc::clone(inner)),
        }
    }
}

impl<T: Element> std::fmt::Debug for Storage<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("ownership", &self.ownership())
            .field("refs", &self.ref_count())
            .field("size", &self.read(|b| b.size()))
            .finish()
    }
}
