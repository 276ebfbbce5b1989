//! Upstream-aware future (§4.5): a future composed with a weak reference to
//! an external task handle, so that cancellation can be propagated upstream
//! before falling back to a direct resolve.

use crate::error::FutureError;
use crate::future::Future;
use crate::loom::{Arc, Weak};
use crate::qos::QoS;
use crate::resolver::Resolver;
use crate::scheduler::Scheduler;

/// The minimal surface an external task object (an HTTP request, a file
/// transfer) must expose for cancellation propagation (§6, "Task-object
/// adapter"). The third part of that contract, `on_complete(callback)`, is
/// adapter-specific (it feeds `(result | error)` back through a
/// [`Resolver`]) and is therefore not part of this trait: whoever
/// constructs the concrete task wires its own completion callback to the
/// [`Resolver`] returned by [`TaskFuture::new`].
pub trait UpstreamTask: Send + Sync + 'static {
    /// Starts (or resumes) the underlying work.
    fn resume(&self);

    /// Requests cancellation. Completion, if any, still arrives through the
    /// task's own completion callback.
    fn cancel(&self);
}

/// A [`Future`] composed with a weak reference to an [`UpstreamTask`].
///
/// `cancel` first asks the task to cancel; the future resolves only once
/// the task's completion callback later calls back into the paired
/// [`Resolver`]. If the task handle is already gone, `cancel` falls back to
/// the base future's behavior of resolving `Canceled` directly.
pub struct TaskFuture<V, E>
where
    V: Clone + Send + 'static,
    E: FutureError + Clone,
{
    future: Future<V, E>,
    task: Weak<dyn UpstreamTask>,
}

impl<V, E> TaskFuture<V, E>
where
    V: Clone + Send + 'static,
    E: FutureError + Clone,
{
    /// Resumes `task` and returns the composed future alongside the
    /// resolver its completion callback should drive.
    pub fn new(scheduler: Arc<dyn Scheduler>, qos: QoS, task: &Arc<dyn UpstreamTask>) -> (Self, Resolver<V, E>) {
        let (future, resolver) = Future::pair(scheduler, qos);
        future.begin_execution();
        task.resume();
        (
            TaskFuture {
                future,
                task: Arc::downgrade(task),
            },
            resolver,
        )
    }

    pub fn future(&self) -> &Future<V, E> {
        &self.future
    }

    /// Forwards cancellation to the upstream task when it is still live;
    /// otherwise falls back to resolving `Canceled(reason)` directly (the
    /// spec's prescribed resolution of the "cancel on a gone task" open
    /// question).
    pub fn cancel(&self, reason: impl Into<String>) -> bool {
        let reason = reason.into();
        match self.task.upgrade() {
            Some(task) => {
                log::debug!("forwarding cancel to upstream task: {reason}");
                task.cancel();
                true
            }
            None => {
                log::warn!("upstream task gone, falling back to direct cancel: {reason}");
                self.future.cancel(reason)
            }
        }
    }
}

impl<V, E> std::ops::Deref for TaskFuture<V, E>
where
    V: Clone + Send + 'static,
    E: FutureError + Clone,
{
    type Target = Future<V, E>;

    fn deref(&self) -> &Future<V, E> {
        &self.future
    }
}
