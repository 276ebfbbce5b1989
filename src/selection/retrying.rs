//! `retrying` (§4.7).

use crate::error::FutureError;
use crate::future::Future;
use crate::loom::Arc;
use crate::outcome::Outcome;
use crate::qos::QoS;
use crate::scheduler::Scheduler;

type Task<V, E> = Arc<dyn Fn() -> Future<V, E> + Send + Sync>;

/// Runs `task`, retrying up to `max_attempts` times while it resolves with
/// an error; returns the last attempt's outcome. `max_attempts == 0`
/// resolves immediately with `Invalid` (§8, "Boundary behaviors").
pub fn retrying<V, E>(
    scheduler: Arc<dyn Scheduler>,
    max_attempts: usize,
    qos: QoS,
    task: impl Fn() -> Future<V, E> + Send + Sync + 'static,
) -> Future<V, E>
where
    V: Clone + Send + 'static,
    E: FutureError + Clone,
{
    if max_attempts == 0 {
        return Future::resolved_error(scheduler, qos, E::invalid("retrying called with max_attempts == 0"));
    }
    attempt(scheduler, Arc::new(task), 1, max_attempts, qos)
}

fn attempt<V, E>(scheduler: Arc<dyn Scheduler>, task: Task<V, E>, attempt_no: usize, max: usize, qos: QoS) -> Future<V, E>
where
    V: Clone + Send + 'static,
    E: FutureError + Clone,
{
    let this_try = task();
    if attempt_no >= max {
        return this_try;
    }
    let (child, resolver) = Future::pair(Arc::clone(&scheduler), qos);
    this_try.on_result(QoS::Unspecified, move |outcome| match outcome {
        Outcome::Value(v) => {
            let _ = resolver.resolve_value(v);
        }
        Outcome::Error(_) => {
            let next = attempt(scheduler, task, attempt_no + 1, max, qos);
            next.on_result(QoS::Unspecified, move |outcome| {
                let _ = resolver.resolve(outcome);
            });
        }
    });
    child
}
