//! [`Waiter`]: one registered handler plus the intrusive next-pointer that
//! makes the wait-queue a Treiber stack (§3, §4.2).

use std::ptr;

use crate::outcome::Outcome;
use crate::qos::QoS;

/// A boxed handler, called exactly once with the future's resolved outcome.
pub(crate) type Handler<V, E> = Box<dyn FnOnce(Outcome<V, E>) + Send + 'static>;

/// An intrusive wait-queue node. Allocated when a handler is registered on
/// an unresolved future; exclusively owned by whichever side of the
/// push/drain race currently points at it (§3, "Ownership").
pub(crate) struct Waiter<V, E> {
    pub(crate) handler: Handler<V, E>,
    pub(crate) qos: QoS,
    pub(crate) next: *mut Waiter<V, E>,
}

impl<V, E> Waiter<V, E> {
    pub(crate) fn new(qos: QoS, handler: Handler<V, E>) -> Box<Self> {
        Box::new(Waiter {
            handler,
            qos,
            next: ptr::null_mut(),
        })
    }
}
