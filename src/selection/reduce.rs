//! `reduce` (§4.7): a left fold over a sequence of futures with error
//! short-circuit, built directly on `flat_map`'s own short-circuit (§4.6).

use crate::error::FutureError;
use crate::future::Future;
use crate::loom::Arc;
use crate::qos::QoS;
use crate::scheduler::Scheduler;

/// Folds `items` left-to-right into `Acc` via `f`, short-circuiting on the
/// first error `f` returns (or the first input error).
pub fn reduce<V, E, Acc>(
    items: Vec<Future<V, E>>,
    scheduler: Arc<dyn Scheduler>,
    qos: QoS,
    initial: Acc,
    f: impl Fn(Acc, V) -> Result<Acc, E> + Send + Sync + 'static,
) -> Future<Acc, E>
where
    V: Clone + Send + 'static,
    Acc: Clone + Send + 'static,
    E: FutureError + Clone,
{
    let f = Arc::new(f);
    let mut acc_future = Future::resolved_value(Arc::clone(&scheduler), qos, initial);
    for item in items {
        let f = Arc::clone(&f);
        let scheduler = Arc::clone(&scheduler);
        acc_future = acc_future.flat_map(qos, move |acc| {
            let f = Arc::clone(&f);
            let scheduler = Arc::clone(&scheduler);
            item.flat_map(qos, move |v| match f(acc, v) {
                Ok(next) => Future::resolved_value(scheduler, qos, next),
                Err(e) => Future::resolved_error(scheduler, qos, e),
            })
        });
    }
    acc_future
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, NetError};
    use crate::executor::InlineScheduler;
    use crate::outcome::Outcome;

    fn scheduler() -> Arc<dyn Scheduler> {
        Arc::new(InlineScheduler::new())
    }

    type E = Error<NetError>;

    #[test]
    fn reduce_sums_values_in_order() {
        let items: Vec<Future<i32, E>> =
            vec![1, 2, 3, 4].into_iter().map(|v| Future::resolved_value(scheduler(), QoS::Default, v)).collect();
        let total = reduce(items, scheduler(), QoS::Default, 0, |acc, v| Ok(acc + v));
        assert_eq!(total.get(), Outcome::Value(10));
    }

    #[test]
    fn reduce_short_circuits_on_error() {
        let items: Vec<Future<i32, E>> =
            vec![1, 2, 0, 4].into_iter().map(|v| Future::resolved_value(scheduler(), QoS::Default, v)).collect();
        let total = reduce(items, scheduler(), QoS::Default, 0, |acc, v| {
            if v > 0 {
                Ok(acc + v)
            } else {
                Err(Error::Invalid(format!("zero at acc={acc}")))
            }
        });
        assert!(matches!(total.get(), Outcome::Error(Error::Invalid(m)) if m == "zero at acc=3"));
    }
}
