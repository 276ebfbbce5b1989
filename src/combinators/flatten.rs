//! `flatten` (§4.6): `Future<Future<V, E>, E> -> Future<V, E>`.

use crate::error::FutureError;
use crate::future::Future;
use crate::qos::QoS;

impl<V, E> Future<Future<V, E>, E>
where
    V: Clone + Send + 'static,
    E: FutureError + Clone,
{
    /// Equivalent to `self.flat_map(qos, |inner| inner)`: resolves when the
    /// future produced by `self` itself resolves.
    pub fn flatten(&self) -> Future<V, E> {
        self.flat_map(QoS::Unspecified, |inner| inner)
    }
}
