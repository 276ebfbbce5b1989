//! `apply` (§4.6): applies a deferred function to a deferred operand.

use std::sync::Mutex;

use crate::error::FutureError;
use crate::future::Future;
use crate::outcome::Outcome;
use crate::qos::QoS;

/// A transform future's item type: `V -> V2`, boxed behind an `Arc` so it
/// satisfies the `Clone` bound every `Future` item type carries (§3,
/// "Decided Open Questions" in `SPEC_FULL.md`) without requiring every
/// closure passed to `apply` to itself be `Clone`.
pub type Transform<V, V2> = std::sync::Arc<dyn Fn(V) -> V2 + Send + Sync>;

struct Pending<V, E, V2> {
    operand: Option<Outcome<V, E>>,
    transform: Option<Outcome<Transform<V, V2>, E>>,
}

impl<V, E> Future<V, E>
where
    V: Clone + Send + 'static,
    E: FutureError + Clone,
{
    /// Waits for both `self` and `tf` to resolve, then applies `tf`'s
    /// function to `self`'s value. If either side is an error, the first
    /// error - operand, then transform - is propagated, matching
    /// [`crate::outcome::Outcome::apply`].
    pub fn apply<V2>(&self, qos: QoS, tf: &Future<Transform<V, V2>, E>) -> Future<V2, E>
    where
        V2: Clone + Send + 'static,
    {
        let (child, resolver) = Future::pair(self.scheduler(), qos.or(self.default_qos()));
        let resolver = std::sync::Arc::new(resolver);
        let pending = std::sync::Arc::new(Mutex::new(Pending {
            operand: None,
            transform: None,
        }));

        let resolver_for_operand = std::sync::Arc::clone(&resolver);
        let pending_for_operand = std::sync::Arc::clone(&pending);
        self.on_result(qos, move |outcome| {
            let ready = {
                let mut guard = pending_for_operand.lock().unwrap();
                guard.operand = Some(outcome);
                guard.transform.is_some()
            };
            if ready {
                let mut guard = pending_for_operand.lock().unwrap();
                let operand = guard.operand.take().unwrap();
                let transform = guard.transform.take().unwrap();
                let _ = resolver_for_operand.resolve(operand.apply(transform));
            }
        });

        let resolver_for_transform = std::sync::Arc::clone(&resolver);
        let pending_for_transform = std::sync::Arc::clone(&pending);
        tf.on_result(qos, move |outcome| {
            let ready = {
                let mut guard = pending_for_transform.lock().unwrap();
                guard.transform = Some(outcome);
                guard.operand.is_some()
            };
            if ready {
                let mut guard = pending_for_transform.lock().unwrap();
                let operand = guard.operand.take().unwrap();
                let transform = guard.transform.take().unwrap();
                let _ = resolver_for_transform.resolve(operand.apply(transform));
            }
        });

        child
    }
}
