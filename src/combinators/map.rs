//! `map`, `try_map`, `map_error` (§4.6).

use crate::error::FutureError;
use crate::future::Future;
use crate::outcome::Outcome;
use crate::qos::QoS;

impl<V, E> Future<V, E>
where
    V: Clone + Send + 'static,
    E: FutureError + Clone,
{
    /// Fires `f` on the scheduler at `qos` when upstream resolves with
    /// `Value`; propagates errors unchanged.
    pub fn map<V2>(&self, qos: QoS, f: impl FnOnce(V) -> V2 + Send + 'static) -> Future<V2, E>
    where
        V2: Clone + Send + 'static,
    {
        let (child, resolver) = Future::pair(self.scheduler(), qos.or(self.default_qos()));
        self.on_result(qos, move |outcome| {
            let _ = resolver.resolve(outcome.map(f));
        });
        child
    }

    /// As `map`; a thrown error becomes the downstream error.
    pub fn try_map<V2>(&self, qos: QoS, f: impl FnOnce(V) -> Result<V2, E> + Send + 'static) -> Future<V2, E>
    where
        V2: Clone + Send + 'static,
    {
        let (child, resolver) = Future::pair(self.scheduler(), qos.or(self.default_qos()));
        self.on_result(qos, move |outcome| {
            let _ = resolver.resolve(outcome.try_map(f));
        });
        child
    }

    /// `Future`-level mirror of `Outcome::map_error`: values pass through
    /// unchanged.
    pub fn map_error<E2>(&self, qos: QoS, f: impl FnOnce(E) -> E2 + Send + 'static) -> Future<V, E2>
    where
        E2: FutureError + Clone,
    {
        let (child, resolver) = Future::pair(self.scheduler(), qos.or(self.default_qos()));
        self.on_result(qos, move |outcome: Outcome<V, E>| {
            let _ = resolver.resolve(outcome.map_error(f));
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
    fn map_transforms_value() {
        let f: Future<i32, Error<NetError>> = Future::resolved_value(scheduler(), QoS::Default, 5);
        let mapped = f.map(QoS::Default, |v| v * 2);
        assert_eq!(mapped.get(), Outcome::Value(10));
    }

    #[test]
    fn map_identity_law() {
        let f: Future<i32, Error<NetError>> = Future::resolved_value(scheduler(), QoS::Default, 5);
        let mapped = f.map(QoS::Default, |v| v);
        assert_eq!(mapped.get(), f.get());
    }

    #[test]
    fn map_composition_law() {
        let f: Future<i32, Error<NetError>> = Future::resolved_value(scheduler(), QoS::Default, 5);
        let g: Future<i32, Error<NetError>> = Future::resolved_value(scheduler(), QoS::Default, 5);
        let lhs = f.map(QoS::Default, |v| v + 1).map(QoS::Default, |v| v * 2);
        let rhs = g.map(QoS::Default, |v| (v + 1) * 2);
        assert_eq!(lhs.get(), rhs.get());
    }

    #[test]
    fn map_propagates_error() {
        let f: Future<i32, Error<NetError>> = Future::resolved_error(scheduler(), QoS::Default, Error::Invalid("bad".into()));
        let mapped = f.map(QoS::Default, |v| v * 2);
        assert!(matches!(mapped.get(), Outcome::Error(Error::Invalid(_))));
    }

    #[test]
    fn try_map_thrown_error_becomes_downstream_error() {
        let f: Future<i32, Error<NetError>> = Future::resolved_value(scheduler(), QoS::Default, 5);
        let mapped = f.try_map(QoS::Default, |_| Err(Error::Invalid("nope".into())));
        assert!(matches!(mapped.get(), Outcome::Error(Error::Invalid(_))));
    }
}
