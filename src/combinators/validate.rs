//! `validate` (§4.6): turns a value failing a predicate into an error.

use crate::error::FutureError;
use crate::future::Future;
use crate::qos::QoS;

impl<V, E> Future<V, E>
where
    V: Clone + Send + 'static,
    E: FutureError + Clone,
{
    /// Maps `Value(v)` to `Error(Invalid(message))` when `predicate(v)` is
    /// false; errors pass through unchanged, matching `try_map`'s contract.
    pub fn validate(
        &self,
        qos: QoS,
        predicate: impl FnOnce(&V) -> bool + Send + 'static,
        message: impl Into<String>,
    ) -> Future<V, E> {
        let message = message.into();
        self.try_map(qos, move |v| {
            if predicate(&v) {
                Ok(v)
            } else {
                Err(E::invalid(message))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, NetError};
    use crate::executor::InlineScheduler;
    use crate::loom::Arc;
    use crate::outcome::Outcome;
    use crate::scheduler::Scheduler;

    fn scheduler() -> Arc<dyn Scheduler> {
        Arc::new(InlineScheduler::new())
    }

    #[test]
    fn validate_passes_value_meeting_predicate() {
        let f: Future<i32, Error<NetError>> = Future::resolved_value(scheduler(), QoS::Default, 5);
        let validated = f.validate(QoS::Default, |v| *v > 0, "must be positive");
        assert_eq!(validated.get(), Outcome::Value(5));
    }

    #[test]
    fn validate_rejects_value_failing_predicate() {
        let f: Future<i32, Error<NetError>> = Future::resolved_value(scheduler(), QoS::Default, -1);
        let validated = f.validate(QoS::Default, |v| *v > 0, "must be positive");
        assert!(matches!(validated.get(), Outcome::Error(Error::Invalid(m)) if m == "must be positive"));
    }

    #[test]
    fn validate_passes_errors_through_unchanged() {
        let f: Future<i32, Error<NetError>> =
            Future::resolved_error(scheduler(), QoS::Default, Error::Invalid("upstream".into()));
        let validated = f.validate(QoS::Default, |v| *v > 0, "must be positive");
        assert!(matches!(validated.get(), Outcome::Error(Error::Invalid(m)) if m == "upstream"));
    }
}
