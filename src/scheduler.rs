//! The external execution substrate the core consumes (§6).
//!
//! The production thread pool is explicitly out of scope (§1); this module
//! specifies only the abstract contract and a blocking helper,
//! [`BarrierToken`], used by [`crate::future::Future::get`].

use std::time::Instant;

use crate::loom::{Arc, Condvar, Mutex};
use crate::qos::QoS;

/// A fire-and-forget (or delayed) job submitted to a [`Scheduler`].
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// The scheduler adapter consumed by every other component in this crate.
///
/// Concrete adapters live in [`crate::executor`]; this crate never assumes a
/// particular one. Implementors only need `submit` and `submit_after`;
/// `current_qos` and `barrier_wait` have sensible best-effort defaults.
pub trait Scheduler: Send + Sync + 'static {
    /// Enqueue `job` to run at `qos`. Must never run `job` before returning
    /// (no inline execution) so that callers are never re-entered
    /// synchronously from their own submission.
    fn submit(&self, qos: QoS, job: Job);

    /// Enqueue `job` to run at `qos` no earlier than `deadline`.
    fn submit_after(&self, deadline: Instant, qos: QoS, job: Job);

    /// Best-effort hint of the QoS the calling thread is currently running
    /// at. `Unspecified` is always a valid answer.
    fn current_qos(&self) -> QoS {
        QoS::Unspecified
    }

    /// Block the calling thread until `token` is signaled. Used only by
    /// blocking `get()`. The default implementation parks on the token's own
    /// condition variable, which is correct for any scheduler whose worker
    /// threads are not also the caller.
    fn barrier_wait(&self, token: BarrierToken) {
        token.wait();
    }
}

/// A one-shot wait/signal pair used to implement blocking `get()` on top of
/// the otherwise fully asynchronous `on_result` registration path (§5,
/// "Suspension points").
#[derive(Clone)]
pub struct BarrierToken {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl BarrierToken {
    pub fn new() -> Self {
        BarrierToken {
            inner: Arc::new((Mutex::new(false), Condvar::new())),
        }
    }

    /// Wake the thread blocked in [`BarrierToken::wait`].
    pub fn signal(&self) {
        let (lock, cvar) = &*self.inner;
        let mut done = lock.lock().unwrap();
        *done = true;
        cvar.notify_all();
    }

    /// Block until [`BarrierToken::signal`] has been called at least once.
    pub fn wait(&self) {
        let (lock, cvar) = &*self.inner;
        let mut done = lock.lock().unwrap();
        while !*done {
            done = cvar.wait(done).unwrap();
        }
    }
}

impl Default for BarrierToken {
    fn default() -> Self {
        Self::new()
    }
}
