//! A lock-free single-assignment future/resolver pair with a combinator
//! algebra, in the spirit of `futures-rs`.
//!
//! A [`Future<V, E>`] is a write-once container for an eventual
//! [`Outcome<V, E>`]: either a value or an error, never both, never more
//! than once. Unlike a poll-based future, nothing here drives itself
//! forward - every [`Future`] is paired with a [`Resolver`] that some
//! producer (a task closure, an upstream network request, another
//! combinator) uses to write the single result, and every observer
//! registers a handler that the resolution fans out to, asynchronously,
//! through an external [`Scheduler`].
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use deferred::executor::InlineScheduler;
//! use deferred::prelude::*;
//!
//! let scheduler: Arc<dyn Scheduler> = Arc::new(InlineScheduler::new());
//! let f: Future<i32, Error<std::convert::Infallible>> =
//!     Future::resolved_value(scheduler, QoS::Default, 10);
//! let doubled = f.map(QoS::Default, |v| v * 2);
//! assert_eq!(doubled.get(), Outcome::Value(20));
//! ```
//!
//! ## Core
//!
//! - [`Outcome`] - the pure `Value | Error` sum every future eventually
//!   produces.
//! - [`Future`] - the lock-free state machine (§4.3): a state atom, a
//!   write-once outcome slot, and an intrusive wait-queue of handlers
//!   drained exactly once at resolution.
//! - [`Resolver`] - the exclusive write-side handle paired with a future.
//!
//! ## Combinators
//!
//! `map`, `try_map`, `map_error`, `flat_map`, `recover`, `apply`, `delay`,
//! `timeout`, `validate`, `enqueuing`/`enqueuing_on`, `split`/`split3`, and
//! `flatten` are all inherent methods on [`Future`] (see `src/combinators/`).
//! Selection and aggregation - `first_value`, `first_resolved`, `combine`,
//! `reduce`, `in_parallel`, `retrying` - are free functions over
//! collections of futures (see [`selection`]), since they fan out to more
//! than one input rather than chaining off a single receiver.
//!
//! ## What this crate does not provide
//!
//! The execution substrate (a real thread pool) is out of scope; this
//! crate only consumes the [`Scheduler`] trait. [`executor`] ships two
//! reference adapters (`InlineScheduler`, `ThreadPoolScheduler`) good
//! enough to run and test everything above, but neither is "the"
//! production scheduler. An HTTP/URL-session integration layer is sketched
//! in [`task`] only as far as the [`task::UpstreamTask`] contract that
//! cancellation propagation consumes.

pub mod combinators;
pub mod error;
pub mod executor;
pub mod future;
pub(crate) mod loom;
pub mod outcome;
pub mod qos;
pub mod resolver;
pub mod scheduler;
pub mod selection;
pub mod task;
pub(crate) mod waiter;

pub use error::{Error, FutureError, NetError};
pub use future::{Future, State};
pub use outcome::Outcome;
pub use qos::QoS;
pub use resolver::Resolver;
pub use scheduler::{BarrierToken, Job, Scheduler};
pub use task::{TaskFuture, UpstreamTask};

/// A flat import surface bundling the types most callers reach for,
/// matching how other multi-module futures crates in this corpus expose a
/// `prelude` rather than forcing `use deferred::future::Future`.
pub mod prelude {
    pub use crate::error::{Error, FutureError};
    pub use crate::future::Future;
    pub use crate::outcome::Outcome;
    pub use crate::qos::QoS;
    pub use crate::resolver::Resolver;
    pub use crate::scheduler::Scheduler;
}
