//! `split` (§4.6): given a future of a tuple, returns one future per slot.
//! Errors fan out to all of them.

use crate::error::FutureError;
use crate::future::Future;
use crate::outcome::Outcome;
use crate::qos::QoS;

impl<A, B, E> Future<(A, B), E>
where
    A: Clone + Send + 'static,
    B: Clone + Send + 'static,
    E: FutureError + Clone,
{
    /// Splits a `Future<(A, B), E>` into its two component futures.
    pub fn split(&self) -> (Future<A, E>, Future<B, E>) {
        let (fa, ra) = Future::pair(self.scheduler(), self.default_qos());
        let (fb, rb) = Future::pair(self.scheduler(), self.default_qos());
        self.on_result(QoS::Unspecified, move |outcome| match outcome {
            Outcome::Value((a, b)) => {
                let _ = ra.resolve_value(a);
                let _ = rb.resolve_value(b);
            }
            Outcome::Error(e) => {
                let _ = ra.resolve_error(e.clone());
                let _ = rb.resolve_error(e);
            }
        });
        (fa, fb)
    }
}

impl<A, B, C, E> Future<(A, B, C), E>
where
    A: Clone + Send + 'static,
    B: Clone + Send + 'static,
    C: Clone + Send + 'static,
    E: FutureError + Clone,
{
    /// Splits a `Future<(A, B, C), E>` into its three component futures.
    pub fn split3(&self) -> (Future<A, E>, Future<B, E>, Future<C, E>) {
        let (fa, ra) = Future::pair(self.scheduler(), self.default_qos());
        let (fb, rb) = Future::pair(self.scheduler(), self.default_qos());
        let (fc, rc) = Future::pair(self.scheduler(), self.default_qos());
        self.on_result(QoS::Unspecified, move |outcome| match outcome {
            Outcome::Value((a, b, c)) => {
                let _ = ra.resolve_value(a);
                let _ = rb.resolve_value(b);
                let _ = rc.resolve_value(c);
            }
            Outcome::Error(e) => {
                let _ = ra.resolve_error(e.clone());
                let _ = rb.resolve_error(e.clone());
                let _ = rc.resolve_error(e);
            }
        });
        (fa, fb, fc)
    }
}
