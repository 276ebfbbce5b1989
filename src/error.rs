//! The control-flow error taxonomy (§6, §7) and the concrete [`Error<D>`]
//! that implements it.

/// Constructors every error type usable as a `Future<V, E>`'s `E` must
/// provide, so that the core can synthesize control-flow errors without
/// knowing the user's domain error type.
///
/// Two kinds of error exist in this taxonomy: control-flow errors
/// synthesized by the core (the methods on this trait) and domain errors
/// produced by user tasks, carried opaquely as `E`.
pub trait FutureError: Send + 'static {
    /// A resolve whose outcome is `Error(Canceled(message))` (user-initiated
    /// via [`crate::resolver::Resolver::cancel`] or
    /// [`crate::future::Future::cancel`]).
    fn canceled(message: impl Into<String>) -> Self
    where
        Self: Sized;

    /// Produced by [`crate::combinators::delay::timeout`] when the upstream
    /// does not resolve within the allotted duration.
    fn timed_out(message: impl Into<String>) -> Self
    where
        Self: Sized;

    /// Given to the non-winning inputs of a selection combinator when
    /// `cancel_others` is set.
    fn not_selected() -> Self
    where
        Self: Sized;

    /// Produced by [`crate::combinators::validate::validate`] and by
    /// boundary cases such as `retrying(0, ..)`.
    fn invalid(message: impl Into<String>) -> Self
    where
        Self: Sized;

    /// Produced when a [`crate::resolver::Resolver`] is dropped without
    /// resolving while its paired future is still live. Distinct from
    /// `canceled`: this is never user-initiated.
    fn abandoned() -> Self
    where
        Self: Sized;
}

/// The concrete error type most users of this crate reach for: the
/// control-flow family plus one `Domain(D)` variant for whatever error a
/// user's own task produces.
#[derive(Debug, thiserror::Error)]
pub enum Error<D> {
    #[error("canceled: {0}")]
    Canceled(String),

    #[error("timed out: {0}")]
    TimedOut(String),

    #[error("not selected")]
    NotSelected,

    #[error("invalid: {0}")]
    Invalid(String),

    #[error("abandoned")]
    Abandoned,

    #[error(transparent)]
    Domain(#[from] D),
}

impl<D: Clone> Clone for Error<D> {
    fn clone(&self) -> Self {
        match self {
            Error::Canceled(m) => Error::Canceled(m.clone()),
            Error::TimedOut(m) => Error::TimedOut(m.clone()),
            Error::NotSelected => Error::NotSelected,
            Error::Invalid(m) => Error::Invalid(m.clone()),
            Error::Abandoned => Error::Abandoned,
            Error::Domain(d) => Error::Domain(d.clone()),
        }
    }
}

impl<D: PartialEq> PartialEq for Error<D> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Error::Canceled(a), Error::Canceled(b)) => a == b,
            (Error::TimedOut(a), Error::TimedOut(b)) => a == b,
            (Error::NotSelected, Error::NotSelected) => true,
            (Error::Invalid(a), Error::Invalid(b)) => a == b,
            (Error::Abandoned, Error::Abandoned) => true,
            (Error::Domain(a), Error::Domain(b)) => a == b,
            _ => false,
        }
    }
}

impl<D: std::error::Error + Send + 'static> FutureError for Error<D> {
    fn canceled(message: impl Into<String>) -> Self {
        Error::Canceled(message.into())
    }

    fn timed_out(message: impl Into<String>) -> Self {
        Error::TimedOut(message.into())
    }

    fn not_selected() -> Self {
        Error::NotSelected
    }

    fn invalid(message: impl Into<String>) -> Self {
        Error::Invalid(message.into())
    }

    fn abandoned() -> Self {
        Error::Abandoned
    }
}

/// Domain errors carried by the illustrative URL/HTTP adapter surface (§6).
/// Not a production HTTP client; it exists so [`crate::task`]'s
/// upstream-aware future has a realistic `D` to be generic over in tests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetError {
    #[error("server responded with status {0}")]
    ServerStatus(u16),
    #[error("task is not in a state that supports this operation")]
    InvalidState,
    #[error("download interrupted, {} bytes of resume data available", .0.len())]
    InterruptedDownload(Vec<u8>),
}
