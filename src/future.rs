//! [`Future<V, E>`]: the lock-free single-assignment container (§3, §4.3).

use std::mem::MaybeUninit;
use std::ptr;

use crate::error::FutureError;
use crate::loom::atomic::{AtomicPtr, AtomicU8, Ordering};
use crate::loom::{Arc, UnsafeCell};
use crate::outcome::Outcome;
use crate::qos::QoS;
use crate::resolver::Resolver;
use crate::scheduler::{BarrierToken, Scheduler};
use crate::waiter::{Handler, Waiter};

const WAITING: u8 = 0;
const EXECUTING: u8 = 1;
const RESOLVING: u8 = 2;
const RESOLVED: u8 = 3;

/// Observable coarse state of a [`Future`] (§4.3). The transient
/// `Resolving` sentinel used internally during the resolve CAS is folded
/// into `Executing` here: from an observer's perspective the outcome is not
/// yet readable either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Waiting,
    Executing,
    Resolved,
}

pub(crate) struct Inner<V, E: FutureError> {
    state: AtomicU8,
    outcome: UnsafeCell<MaybeUninit<Outcome<V, E>>>,
    waiters: AtomicPtr<Waiter<V, E>>,
    scheduler: Arc<dyn Scheduler>,
    default_qos: QoS,
    notify: parking_lot::Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

// The outcome slot and the wait-queue are the only state the compiler
// cannot see is safe to share: all access to each goes through the atomic
// handoffs in `try_resolve`/`register`/`drain` (§5, "Shared resource
// policy"), never through a bare unsynchronized borrow. `V`/`E` need only
// be `Send` (the handoff is a one-time move across threads, not ongoing
// concurrent access), matching how other hand-rolled lock-free containers
// in this corpus assert `Send`/`Sync` on their inner cell explicitly rather
// than relying on auto traits.
unsafe impl<V: Send, E: FutureError> Send for Inner<V, E> {}
unsafe impl<V: Send, E: FutureError> Sync for Inner<V, E> {}

impl<V, E> Inner<V, E>
where
    V: Clone + Send + 'static,
    E: FutureError + Clone,
{
    fn new(scheduler: Arc<dyn Scheduler>, default_qos: QoS) -> Self {
        Inner {
            state: AtomicU8::new(WAITING),
            outcome: UnsafeCell::new(MaybeUninit::uninit()),
            waiters: AtomicPtr::new(ptr::null_mut()),
            scheduler,
            default_qos,
            notify: parking_lot::Mutex::new(None),
        }
    }

    fn already_resolved(scheduler: Arc<dyn Scheduler>, default_qos: QoS, outcome: Outcome<V, E>) -> Self {
        Inner {
            state: AtomicU8::new(RESOLVED),
            outcome: UnsafeCell::new(MaybeUninit::new(outcome)),
            waiters: AtomicPtr::new(ptr::null_mut()),
            scheduler,
            default_qos,
            notify: parking_lot::Mutex::new(None),
        }
    }

    pub(crate) fn state(&self) -> State {
        match self.state.load(Ordering::Acquire) {
            WAITING => State::Waiting,
            RESOLVED => State::Resolved,
            _ => State::Executing,
        }
    }

    pub(crate) fn scheduler(&self) -> Arc<dyn Scheduler> {
        Arc::clone(&self.scheduler)
    }

    pub(crate) fn default_qos(&self) -> QoS {
        self.default_qos
    }

    pub(crate) fn peek(&self) -> Option<&Outcome<V, E>> {
        if self.state.load(Ordering::Acquire) != RESOLVED {
            return None;
        }
        let ptr = self.outcome.with(|p| p);
        Some(unsafe { (*ptr).assume_init_ref() })
    }

    fn clone_outcome(&self) -> Outcome<V, E> {
        self.outcome
            .with(|p| unsafe { (*p).assume_init_ref().clone() })
    }

    pub(crate) fn begin_execution(&self) {
        let _ = self.state.compare_exchange(WAITING, EXECUTING, Ordering::AcqRel, Ordering::Acquire);
    }

    /// Registration protocol (§4.3): wait-free for the caller, lock-free
    /// overall. Interleaves safely with `try_resolve`: either the waiter
    /// becomes visible to the drainer, or the resolver already published
    /// `Resolved` before our state check and we submit the handler
    /// ourselves.
    ///
    /// A successful push can still race the *drainer's* one-shot
    /// `waiters.swap(null)` (§4.2): resolve publishes `Resolved` and then
    /// drains in two separate steps, so another thread may observe
    /// `Resolved`, read a stale `head`, and CAS a node onto the queue
    /// strictly after the drain already swapped it to null - the node
    /// would then sit in a queue nothing will ever swap again. So the
    /// post-CAS state is re-checked; if the future is resolved by then, a
    /// second `drain()` flushes whatever is currently queued (our own node,
    /// and/or anyone else who lost the same race). `drain`'s swap is
    /// idempotent to call more than once: each node is claimed by exactly
    /// one swap, so this can never submit a handler twice.
    pub(crate) fn register(self: &Arc<Self>, qos: QoS, handler: Handler<V, E>) {
        let resolved_qos = qos.or(self.default_qos);
        let mut node = Waiter::new(resolved_qos, handler);
        loop {
            let head = self.waiters.load(Ordering::Acquire);
            node.next = head;
            if self.state.load(Ordering::Acquire) == RESOLVED {
                log::trace!("waiter registered on an already-resolved future, submitting directly");
                self.submit_waiter(node);
                return;
            }
            let node_ptr = Box::into_raw(node);
            match self
                .waiters
                .compare_exchange_weak(head, node_ptr, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => {
                    log::trace!("waiter enqueued");
                    if self.state.load(Ordering::Acquire) == RESOLVED {
                        log::trace!("resolved concurrently with enqueue, draining again to avoid a stranded waiter");
                        self.drain();
                    }
                    return;
                }
                Err(_) => {
                    node = unsafe { Box::from_raw(node_ptr) };
                }
            }
        }
    }

    fn submit_waiter(self: &Arc<Self>, node: Box<Waiter<V, E>>) {
        let Waiter { handler, qos, .. } = *node;
        let inner = Arc::clone(self);
        self.scheduler.submit(
            qos,
            Box::new(move || {
                let outcome = inner.clone_outcome();
                handler(outcome);
            }),
        );
    }

    /// Attempts the resolve CAS (`Waiting`/`Executing` -> `Resolving`). On
    /// success: writes the outcome, publishes `Resolved` with release
    /// ordering, then drains the wait-queue.
    pub(crate) fn try_resolve(self: &Arc<Self>, outcome: Outcome<V, E>) -> bool {
        loop {
            let cur = self.state.load(Ordering::Acquire);
            if cur == RESOLVING || cur == RESOLVED {
                return false;
            }
            match self
                .state
                .compare_exchange_weak(cur, RESOLVING, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => break,
                Err(_) => continue,
            }
        }
        self.outcome.with_mut(|p| unsafe {
            (*p).write(outcome);
        });
        self.state.store(RESOLVED, Ordering::Release);
        log::debug!("future resolved, draining wait-queue");
        self.drain();
        true
    }

    /// One-shot traversal of the wait-queue (§4.2): claims the head with a
    /// single swap, reverses the LIFO list into FIFO registration order,
    /// then submits and frees each node.
    fn drain(self: &Arc<Self>) {
        let mut head = self.waiters.swap(ptr::null_mut(), Ordering::AcqRel);
        let mut prev: *mut Waiter<V, E> = ptr::null_mut();
        while !head.is_null() {
            let next = unsafe { (*head).next };
            unsafe {
                (*head).next = prev;
            }
            prev = head;
            head = next;
        }
        let mut node = prev;
        while !node.is_null() {
            let boxed = unsafe { Box::from_raw(node) };
            let next = boxed.next;
            self.submit_waiter(boxed);
            node = next;
        }
    }

    pub(crate) fn cancel(self: &Arc<Self>, reason: impl Into<String>) -> bool {
        let reason = reason.into();
        log::debug!("cancel requested: {reason}");
        self.try_resolve(Outcome::Error(E::canceled(reason)))
    }

    pub(crate) fn set_notify(&self, closure: Box<dyn FnOnce() + Send>) {
        *self.notify.lock() = Some(closure);
    }

    pub(crate) fn get(self: &Arc<Self>) -> Outcome<V, E> {
        if let Some(outcome) = self.peek() {
            return outcome.clone();
        }
        let token = BarrierToken::new();
        let result = std::sync::Arc::new(parking_lot::Mutex::new(None));
        let result_for_handler = std::sync::Arc::clone(&result);
        let token_for_handler = token.clone();
        self.register(
            QoS::Unspecified,
            Box::new(move |outcome| {
                *result_for_handler.lock() = Some(outcome);
                token_for_handler.signal();
            }),
        );
        self.scheduler.barrier_wait(token);
        result.lock().take().expect("barrier signaled without a result")
    }
}

impl<V, E: FutureError> Drop for Inner<V, E> {
    fn drop(&mut self) {
        if self.state.load(Ordering::Acquire) == RESOLVED {
            self.outcome.with_mut(|p| unsafe {
                ptr::drop_in_place((*p).as_mut_ptr());
            });
        } else if let Some(f) = self.notify.lock().take() {
            log::warn!("future dropped unresolved, invoking notify closure");
            f();
        }
        let mut head = self.waiters.swap(ptr::null_mut(), Ordering::AcqRel);
        while !head.is_null() {
            let boxed = unsafe { Box::from_raw(head) };
            head = boxed.next;
        }
    }
}

/// A single-assignment container for an eventual [`Outcome<V, E>`].
///
/// Cloning a `Future` clones the handle, not the value: all clones observe
/// the same resolution. `V` and `E` are bound `Clone` because a resolved
/// outcome may be observed by more than one registered handler (fan-out);
/// see `SPEC_FULL.md`, "Decided Open Questions".
pub struct Future<V, E>
where
    V: Clone + Send + 'static,
    E: FutureError + Clone,
{
    pub(crate) inner: Arc<Inner<V, E>>,
}

impl<V, E> Clone for Future<V, E>
where
    V: Clone + Send + 'static,
    E: FutureError + Clone,
{
    fn clone(&self) -> Self {
        Future {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V, E> Future<V, E>
where
    V: Clone + Send + 'static,
    E: FutureError + Clone,
{
    /// Creates a future/resolver pair, the way `MarkusJais-futures-rs`'s
    /// `promise()` does, generalized to an explicit scheduler and default
    /// QoS rather than implicit global state (SPEC_FULL.md §9).
    pub fn pair(scheduler: Arc<dyn Scheduler>, default_qos: QoS) -> (Self, Resolver<V, E>) {
        let inner = Arc::new(Inner::new(scheduler, default_qos));
        let resolver = Resolver::new(Arc::downgrade(&inner));
        (Future { inner }, resolver)
    }

    /// Already-resolved creation variant (§4.3), mirroring the teacher's
    /// `done`/`finished` leaf futures.
    pub fn resolved_value(scheduler: Arc<dyn Scheduler>, default_qos: QoS, value: V) -> Self {
        Future {
            inner: Arc::new(Inner::already_resolved(scheduler, default_qos, Outcome::Value(value))),
        }
    }

    /// Already-resolved creation variant (§4.3), mirroring the teacher's
    /// `failed` leaf future.
    pub fn resolved_error(scheduler: Arc<dyn Scheduler>, default_qos: QoS, error: E) -> Self {
        Future {
            inner: Arc::new(Inner::already_resolved(scheduler, default_qos, Outcome::Error(error))),
        }
    }

    /// From a task closure `(Resolver) -> ()` (§4.3): the future transitions
    /// to `Executing` and the task is submitted on the scheduler; the
    /// closure is responsible for calling a `Resolver` method.
    pub fn from_task(
        scheduler: Arc<dyn Scheduler>,
        qos: QoS,
        task: impl FnOnce(Resolver<V, E>) + Send + 'static,
    ) -> Self {
        let (future, resolver) = Self::pair(Arc::clone(&scheduler), qos);
        future.inner.begin_execution();
        scheduler.submit(qos.or(future.inner.default_qos()), Box::new(move || task(resolver)));
        future
    }

    /// From a synchronous fallible task `() -> Result<V, E>` (§4.3): adapter
    /// that wraps it in a resolver-style closure.
    pub fn from_fallible(
        scheduler: Arc<dyn Scheduler>,
        qos: QoS,
        task: impl FnOnce() -> Result<V, E> + Send + 'static,
    ) -> Self {
        Self::from_task(scheduler, qos, move |resolver| match task() {
            Ok(v) => {
                resolver.resolve_value(v);
            }
            Err(e) => {
                resolver.resolve_error(e);
            }
        })
    }

    /// Non-blocking: returns the outcome iff `state() == Resolved`.
    pub fn peek(&self) -> Option<&Outcome<V, E>> {
        self.inner.peek()
    }

    /// Blocks the calling thread until resolved (§5, "Suspension points").
    pub fn get(&self) -> Outcome<V, E> {
        self.inner.get()
    }

    /// Registers a handler fired once upon resolution, on the scheduler at
    /// `qos`. If already resolved, the handler is submitted immediately.
    ///
    /// The registered closure carries a strong clone of this future's
    /// `Inner` for as long as it is pending, so a combinator chain like
    /// `f.map(..).map(..)` keeps every intermediate alive without the
    /// caller having to bind it to a name (§3, "Ownership": "a
    /// combinator-produced child Future holds a strong reference to its
    /// parent only via the closure it registers; once the closure has
    /// fired, that reference is released").
    pub fn on_result(&self, qos: QoS, handler: impl FnOnce(Outcome<V, E>) + Send + 'static) {
        let keepalive = Arc::clone(&self.inner);
        self.inner.register(
            qos,
            Box::new(move |outcome| {
                handler(outcome);
                drop(keepalive);
            }),
        );
    }

    /// Convenience: `on_result` that fires only for `Value`.
    pub fn on_value(&self, qos: QoS, handler: impl FnOnce(V) + Send + 'static) {
        self.on_result(qos, move |outcome| {
            if let Outcome::Value(v) = outcome {
                handler(v);
            }
        });
    }

    /// Convenience: `on_result` that fires only for `Error`.
    pub fn on_error(&self, qos: QoS, handler: impl FnOnce(E) + Send + 'static) {
        self.on_result(qos, move |outcome| {
            if let Outcome::Error(e) = outcome {
                handler(e);
            }
        });
    }

    /// State hint: `Waiting -> Executing`; idempotent, never reverses.
    pub fn begin_execution(&self) {
        self.inner.begin_execution();
    }

    /// Attempts to resolve with a synthetic `Canceled(reason)`. Returns
    /// true iff this call caused the resolution.
    pub fn cancel(&self, reason: impl Into<String>) -> bool {
        self.inner.cancel(reason)
    }

    /// Observable coarse state.
    pub fn state(&self) -> State {
        self.inner.state()
    }

    pub fn default_qos(&self) -> QoS {
        self.inner.default_qos()
    }

    pub fn scheduler(&self) -> Arc<dyn Scheduler> {
        self.inner.scheduler()
    }
}
