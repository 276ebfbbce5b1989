//! `flat_map`, `recover` (§4.6).

use crate::error::FutureError;
use crate::future::Future;
use crate::outcome::Outcome;
use crate::qos::QoS;

impl<V, E> Future<V, E>
where
    V: Clone + Send + 'static,
    E: FutureError + Clone,
{
    /// Chains: downstream resolves when the inner future resolves.
    /// Short-circuits on upstream error.
    pub fn flat_map<V2>(&self, qos: QoS, f: impl FnOnce(V) -> Future<V2, E> + Send + 'static) -> Future<V2, E>
    where
        V2: Clone + Send + 'static,
    {
        let (child, resolver) = Future::pair(self.scheduler(), qos.or(self.default_qos()));
        self.on_result(qos, move |outcome| match outcome {
            Outcome::Value(v) => {
                let inner = f(v);
                inner.on_result(QoS::Unspecified, move |inner_outcome| {
                    let _ = resolver.resolve(inner_outcome);
                });
            }
            Outcome::Error(e) => {
                let _ = resolver.resolve(Outcome::Error(e));
            }
        });
        child
    }

    /// Mirror of `flat_map` on the error channel.
    pub fn recover(&self, qos: QoS, f: impl FnOnce(E) -> Future<V, E> + Send + 'static) -> Future<V, E> {
        let (child, resolver) = Future::pair(self.scheduler(), qos.or(self.default_qos()));
        self.on_result(qos, move |outcome| match outcome {
            Outcome::Value(v) => {
                let _ = resolver.resolve_value(v);
            }
            Outcome::Error(e) => {
                let inner = f(e);
                inner.on_result(QoS::Unspecified, move |inner_outcome| {
                    let _ = resolver.resolve(inner_outcome);
                });
            }
        });
        child
    }
}

#[cfg(test)]
mod tests {
    use crate::error::{Error, NetError};
    use crate::executor::InlineScheduler;
    use crate::future::Future;
    use crate::loom::Arc;
    use crate::outcome::Outcome;
    use crate::qos::QoS;
    use crate::scheduler::Scheduler;

    fn scheduler() -> Arc<dyn Scheduler> {
        Arc::new(InlineScheduler::new())
    }

    #[test]
    fn flat_map_identity_law() {
        let f: Future<i32, Error<NetError>> = Future::resolved_value(scheduler(), QoS::Default, 5);
        let unit = |v: i32| Future::resolved_value(scheduler(), QoS::Default, v);
        let chained = f.flat_map(QoS::Default, unit);
        assert_eq!(chained.get(), f.get());
    }

    #[test]
    fn flat_map_short_circuits_on_upstream_error() {
        let f: Future<i32, Error<NetError>> = Future::resolved_error(scheduler(), QoS::Default, Error::Invalid("bad".into()));
        let chained = f.flat_map(QoS::Default, |v| Future::resolved_value(scheduler(), QoS::Default, v * 2));
        assert!(matches!(chained.get(), Outcome::Error(Error::Invalid(_))));
    }

    #[test]
    fn recover_identity_law() {
        let f: Future<i32, Error<NetError>> = Future::resolved_value(scheduler(), QoS::Default, 5);
        let unit_err = |e: Error<NetError>| Future::resolved_error(scheduler(), QoS::Default, e);
        let recovered = f.recover(QoS::Default, unit_err);
        assert_eq!(recovered.get(), f.get());
    }

    #[test]
    fn recover_replaces_error_with_value() {
        let f: Future<i32, Error<NetError>> = Future::resolved_error(scheduler(), QoS::Default, Error::Invalid("bad".into()));
        let recovered = f.recover(QoS::Default, |_| Future::resolved_value(scheduler(), QoS::Default, 0));
        assert_eq!(recovered.get(), Outcome::Value(0));
    }
}
