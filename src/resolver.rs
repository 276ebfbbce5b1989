//! [`Resolver<V, E>`]: the write-side handle paired with a [`crate::future::Future`] (§4.4).

use crate::error::FutureError;
use crate::future::{Inner, State};
use crate::loom::Weak;
use crate::outcome::Outcome;

/// Exclusively owns the write capability for one [`crate::future::Future`].
///
/// Holds only a weak reference to the paired future: once every observer
/// (and the future handle itself) has dropped, `needs_resolution` reports
/// false and further writes are no-ops, mirroring the source's ARC-cycle
/// avoidance recast as ownership (SPEC_FULL.md §9).
pub struct Resolver<V, E>
where
    V: Clone + Send + 'static,
    E: FutureError + Clone,
{
    inner: Weak<Inner<V, E>>,
}

impl<V, E> Resolver<V, E>
where
    V: Clone + Send + 'static,
    E: FutureError + Clone,
{
    pub(crate) fn new(inner: Weak<Inner<V, E>>) -> Self {
        Resolver { inner }
    }

    /// Attempts the state CAS. Returns true iff this call won.
    pub fn resolve(&self, outcome: Outcome<V, E>) -> bool {
        match self.inner.upgrade() {
            Some(inner) => inner.try_resolve(outcome),
            None => false,
        }
    }

    pub fn resolve_value(&self, value: V) -> bool {
        self.resolve(Outcome::Value(value))
    }

    pub fn resolve_error(&self, error: E) -> bool {
        self.resolve(Outcome::Error(error))
    }

    /// Equivalent to `resolve(Error(Canceled(reason)))` for a resolver with
    /// no upstream task handle. Upstream-aware futures (§4.5) first ask
    /// their task to cancel instead.
    pub fn cancel(&self, reason: impl Into<String>) -> bool {
        match self.inner.upgrade() {
            Some(inner) => inner.cancel(reason),
            None => false,
        }
    }

    /// True iff the paired future is still live AND unresolved.
    pub fn needs_resolution(&self) -> bool {
        match self.inner.upgrade() {
            Some(inner) => inner.state() != State::Resolved,
            None => false,
        }
    }

    /// Registers a closure invoked iff the future is dropped before
    /// resolution. Single-shot; a later call replaces an earlier one.
    pub fn notify(&self, closure: impl FnOnce() + Send + 'static) {
        if let Some(inner) = self.inner.upgrade() {
            inner.set_notify(Box::new(closure));
        }
    }
}

impl<V, E> Drop for Resolver<V, E>
where
    V: Clone + Send + 'static,
    E: FutureError + Clone,
{
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            if inner.state() != State::Resolved {
                log::warn!("resolver dropped without resolving, abandoning future");
                inner.try_resolve(Outcome::Error(E::abandoned()));
            }
        }
    }
}
