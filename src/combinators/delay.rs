//! `delay`, `timeout` (§4.6): the two scheduler-driven time combinators.

use std::time::{Duration, Instant};

use crate::error::FutureError;
use crate::future::Future;
use crate::outcome::Outcome;
use crate::qos::QoS;

impl<V, E> Future<V, E>
where
    V: Clone + Send + 'static,
    E: FutureError + Clone,
{
    /// Postpones resolution to no earlier than `deadline`. Upstream errors
    /// forward immediately, with no delay. If `deadline` has already
    /// passed, returns `self` unchanged (referential identity preserved,
    /// per §8 "Boundary behaviors").
    pub fn delay(&self, deadline: Instant) -> Future<V, E> {
        if deadline <= Instant::now() {
            return self.clone();
        }
        let (child, resolver) = Future::pair(self.scheduler(), self.default_qos());
        let scheduler = self.scheduler();
        self.on_result(QoS::Unspecified, move |outcome| match outcome {
            Outcome::Value(v) => {
                scheduler.submit_after(
                    deadline,
                    QoS::Unspecified,
                    Box::new(move || {
                        let _ = resolver.resolve_value(v);
                    }),
                );
            }
            Outcome::Error(e) => {
                let _ = resolver.resolve_error(e);
            }
        });
        child
    }

    /// Cancels the downstream with `TimedOut(reason)` if `self` has not
    /// resolved by `now + duration`. `duration <= 0` resolves with
    /// `TimedOut` immediately (§8, "Boundary behaviors").
    ///
    /// Implemented per §5 ("Timeouts"): a delayed write racing an
    /// upstream-completion write against the same child future, each
    /// going straight through the child's `Inner` rather than through a
    /// shared `Resolver` (a `Resolver` is exclusively owned, §4.4, so two
    /// independent completion paths use the crate-internal write instead).
    pub fn timeout(&self, duration: Duration, reason: impl Into<String>) -> Future<V, E> {
        let reason = reason.into();
        if duration.is_zero() {
            return Future::resolved_error(self.scheduler(), self.default_qos(), E::timed_out(reason));
        }
        let (child, resolver) = Future::pair(self.scheduler(), self.default_qos());
        let deadline = Instant::now() + duration;
        self.scheduler().submit_after(
            deadline,
            QoS::Unspecified,
            Box::new(move || {
                let _ = resolver.resolve_error(E::timed_out(reason));
            }),
        );
        let child_inner = child.inner.clone();
        self.on_result(QoS::Unspecified, move |outcome| {
            let _ = child_inner.try_resolve(outcome);
        });
        child
    }
}
