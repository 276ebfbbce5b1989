//! `enqueuing`, `enqueuing_on` (§4.6): rehome a future's notifications onto
//! a different scheduler.

use crate::error::FutureError;
use crate::future::Future;
use crate::loom::Arc;
use crate::qos::QoS;
use crate::scheduler::Scheduler;

impl<V, E> Future<V, E>
where
    V: Clone + Send + 'static,
    E: FutureError + Clone,
{
    /// Returns a future whose own notifications fire on `self`'s scheduler
    /// but at `qos` as the new default, rather than whatever default `self`
    /// was created with.
    pub fn enqueuing(&self, qos: QoS) -> Future<V, E> {
        self.enqueuing_on(self.scheduler(), qos)
    }

    /// Returns a future whose notifications fire on `scheduler` at `qos`
    /// instead of on `self`'s scheduler.
    pub fn enqueuing_on(&self, scheduler: Arc<dyn Scheduler>, qos: QoS) -> Future<V, E> {
        let (child, resolver) = Future::pair(scheduler, qos);
        self.on_result(QoS::Unspecified, move |outcome| {
            let _ = resolver.resolve(outcome);
        });
        child
    }
}
