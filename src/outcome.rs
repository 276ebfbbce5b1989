//! [`Outcome`]: the pure sum type a [`crate::future::Future`] eventually
//! produces (§3, §4.1).

/// Either a value or an error. No interior mutability; every combinator here
/// is a pure structural transform.
#[derive(Debug, Clone)]
pub enum Outcome<V, E> {
    Value(V),
    Error(E),
}

impl<V, E> Outcome<V, E> {
    pub fn is_value(&self) -> bool {
        matches!(self, Outcome::Value(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error(_))
    }

    pub fn value(self) -> Option<V> {
        match self {
            Outcome::Value(v) => Some(v),
            Outcome::Error(_) => None,
        }
    }

    pub fn error(self) -> Option<E> {
        match self {
            Outcome::Value(_) => None,
            Outcome::Error(e) => Some(e),
        }
    }

    pub fn as_ref(&self) -> Outcome<&V, &E> {
        match self {
            Outcome::Value(v) => Outcome::Value(v),
            Outcome::Error(e) => Outcome::Error(e),
        }
    }

    /// `Value(v) -> Value(f(v))`; `Error(e) -> Error(e)`.
    pub fn map<V2>(self, f: impl FnOnce(V) -> V2) -> Outcome<V2, E> {
        match self {
            Outcome::Value(v) => Outcome::Value(f(v)),
            Outcome::Error(e) => Outcome::Error(e),
        }
    }

    /// `Value(v) -> f(v)`; errors pass through unchanged.
    pub fn try_map<V2>(self, f: impl FnOnce(V) -> Result<V2, E>) -> Outcome<V2, E> {
        match self {
            Outcome::Value(v) => match f(v) {
                Ok(v2) => Outcome::Value(v2),
                Err(e) => Outcome::Error(e),
            },
            Outcome::Error(e) => Outcome::Error(e),
        }
    }

    /// `Value(v) -> f(v)`; errors pass through unchanged.
    pub fn flat_map<V2>(self, f: impl FnOnce(V) -> Outcome<V2, E>) -> Outcome<V2, E> {
        match self {
            Outcome::Value(v) => f(v),
            Outcome::Error(e) => Outcome::Error(e),
        }
    }

    /// Mirror of `flat_map` on the error channel: `Error(e) -> f(e)`; values
    /// pass through unchanged.
    pub fn recover(self, f: impl FnOnce(E) -> Outcome<V, E>) -> Outcome<V, E> {
        match self {
            Outcome::Value(v) => Outcome::Value(v),
            Outcome::Error(e) => f(e),
        }
    }

    /// `Error(e) -> Error(f(e))`; values pass through unchanged.
    pub fn map_error<E2>(self, f: impl FnOnce(E) -> E2) -> Outcome<V, E2> {
        match self {
            Outcome::Value(v) => Outcome::Value(v),
            Outcome::Error(e) => Outcome::Error(f(e)),
        }
    }

    /// Applies a deferred function to this operand. If either side is
    /// `Error`, the first error (operand, then transform) is propagated.
    pub fn apply<V2>(self, transform: Outcome<impl FnOnce(V) -> V2, E>) -> Outcome<V2, E> {
        match (self, transform) {
            (Outcome::Error(e), _) => Outcome::Error(e),
            (Outcome::Value(_), Outcome::Error(e)) => Outcome::Error(e),
            (Outcome::Value(v), Outcome::Value(f)) => Outcome::Value(f(v)),
        }
    }
}

impl<V: PartialEq, E: PartialEq> PartialEq for Outcome<V, E> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Outcome::Value(a), Outcome::Value(b)) => a == b,
            (Outcome::Error(a), Outcome::Error(b)) => a == b,
            _ => false,
        }
    }
}

impl<V: Eq, E: Eq> Eq for Outcome<V, E> {}
