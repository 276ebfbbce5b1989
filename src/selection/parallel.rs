//! `in_parallel` (§4.7).

use crate::error::FutureError;
use crate::future::Future;
use crate::loom::Arc;
use crate::qos::QoS;
use crate::scheduler::Scheduler;

/// Submits `count` independent tasks to `scheduler` in parallel; the
/// returned futures are available immediately and resolve individually as
/// each task finishes. `task` is invoked once per index, 0..count.
pub fn in_parallel<V, E>(
    scheduler: Arc<dyn Scheduler>,
    count: usize,
    qos: QoS,
    task: impl Fn(usize) -> Result<V, E> + Send + Sync + 'static,
) -> Vec<Future<V, E>>
where
    V: Clone + Send + 'static,
    E: FutureError + Clone,
{
    let task = Arc::new(task);
    (0..count)
        .map(|i| {
            let task = Arc::clone(&task);
            Future::from_fallible(Arc::clone(&scheduler), qos, move || task(i))
        })
        .collect()
}
