//! Sync-primitive shim.
//!
//! Production code in this crate is written once against this module instead
//! of against `std::sync`/`std::cell` directly, so the same source can be
//! exercised both by a normal build and by `loom`'s model checker (built with
//! `--cfg loom`, dev-dependency only). Mirrors the `crate::loom` shim pattern
//! used by other hand-rolled lock-free task primitives in this corpus.

#[cfg(not(loom))]
pub(crate) use std::sync::{Arc, Condvar, Mutex, Weak};

#[cfg(loom)]
pub(crate) use loom::sync::{Arc, Condvar, Mutex, Weak};

#[cfg(not(loom))]
pub(crate) mod atomic {
    pub(crate) use std::sync::atomic::{AtomicPtr, AtomicU8, Ordering};
}

#[cfg(loom)]
pub(crate) mod atomic {
    pub(crate) use loom::sync::atomic::{AtomicPtr, AtomicU8, Ordering};
}

#[cfg(not(loom))]
pub(crate) use std::thread;

#[cfg(loom)]
pub(crate) use loom::thread;

/// A cell that tracks accesses under loom and is a bare `UnsafeCell` otherwise.
///
/// Both call conventions (`with`/`with_mut`) match loom's own `UnsafeCell`
/// shape, so the same call sites compile either way.
pub(crate) struct UnsafeCell<T>(Inner<T>);

#[cfg(not(loom))]
type Inner<T> = std::cell::UnsafeCell<T>;
#[cfg(loom)]
type Inner<T> = loom::cell::UnsafeCell<T>;

impl<T> UnsafeCell<T> {
    pub(crate) fn new(data: T) -> Self {
        #[cfg(not(loom))]
        {
            Self(std::cell::UnsafeCell::new(data))
        }
        #[cfg(loom)]
        {
            Self(loom::cell::UnsafeCell::new(data))
        }
    }

    pub(crate) fn with<R>(&self, f: impl FnOnce(*const T) -> R) -> R {
        #[cfg(not(loom))]
        {
            f(self.0.get() as *const T)
        }
        #[cfg(loom)]
        {
            self.0.with(f)
        }
    }

    pub(crate) fn with_mut<R>(&self, f: impl FnOnce(*mut T) -> R) -> R {
        #[cfg(not(loom))]
        {
            f(self.0.get())
        }
        #[cfg(loom)]
        {
            self.0.with_mut(f)
        }
    }
}
