//! `first_value`, `first_resolved` (§4.7).

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::FutureError;
use crate::future::Future;
use crate::outcome::Outcome;
use crate::qos::QoS;

/// Resolves with the first `Value` produced by any input. If every input
/// errors, resolves with the last error observed. `None` for an empty
/// iterator (the spec's first alternative for this Open Question, bound
/// in `SPEC_FULL.md`, "Decided Open Questions").
pub fn first_value<V, E>(inputs: Vec<Future<V, E>>, cancel_others: bool) -> Option<Future<V, E>>
where
    V: Clone + Send + 'static,
    E: FutureError + Clone,
{
    if inputs.is_empty() {
        return None;
    }
    let scheduler = inputs[0].scheduler();
    let qos = inputs[0].default_qos();
    let (child, resolver) = Future::pair(scheduler, qos);
    let resolver = Arc::new(resolver);
    let remaining = Arc::new(AtomicUsize::new(inputs.len()));
    let last_error: Arc<Mutex<Option<E>>> = Arc::new(Mutex::new(None));

    for (i, input) in inputs.iter().enumerate() {
        let others: Vec<Future<V, E>> = inputs
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, f)| f.clone())
            .collect();
        let resolver = Arc::clone(&resolver);
        let remaining = Arc::clone(&remaining);
        let last_error = Arc::clone(&last_error);
        input.on_result(QoS::Unspecified, move |outcome| match outcome {
            Outcome::Value(v) => {
                let won = resolver.resolve_value(v);
                remaining.fetch_sub(1, Ordering::AcqRel);
                if won && cancel_others {
                    cancel_rest(&others);
                }
            }
            Outcome::Error(e) => {
                *last_error.lock().unwrap() = Some(e);
                if remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
                    if let Some(last) = last_error.lock().unwrap().take() {
                        let _ = resolver.resolve_error(last);
                    }
                }
            }
        });
    }

    Some(child)
}

/// Resolves with whichever input resolves first, value or error alike.
/// `None` for an empty iterator.
pub fn first_resolved<V, E>(inputs: Vec<Future<V, E>>, cancel_others: bool) -> Option<Future<V, E>>
where
    V: Clone + Send + 'static,
    E: FutureError + Clone,
{
    if inputs.is_empty() {
        return None;
    }
    let scheduler = inputs[0].scheduler();
    let qos = inputs[0].default_qos();
    let (child, resolver) = Future::pair(scheduler, qos);
    let resolver = Arc::new(resolver);

    for (i, input) in inputs.iter().enumerate() {
        let others: Vec<Future<V, E>> = inputs
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, f)| f.clone())
            .collect();
        let resolver = Arc::clone(&resolver);
        input.on_result(QoS::Unspecified, move |outcome| {
            let won = resolver.resolve(outcome);
            if won && cancel_others {
                cancel_rest(&others);
            }
        });
    }

    Some(child)
}

/// Resolves every non-winning input directly with `NotSelected`, bypassing
/// the public `Resolver` (these futures may have their own resolvers held
/// elsewhere; this is the same crate-internal write `timeout` uses).
fn cancel_rest<V, E>(others: &[Future<V, E>])
where
    V: Clone + Send + 'static,
    E: FutureError + Clone,
{
    for other in others {
        let _ = other.inner.try_resolve(Outcome::Error(E::not_selected()));
    }
}

/// Forces `other` to `NotSelected` if it hasn't already resolved; a no-op
/// (first writer wins, §3 Invariant 1) if it beat the race.
fn force_not_selected<V, E>(other: &Future<V, E>)
where
    V: Clone + Send + 'static,
    E: FutureError + Clone,
{
    let _ = other.inner.try_resolve(Outcome::Error(E::not_selected()));
}

/// Typed-tuple variadic form of [`first_resolved`] (§4.7). Whichever input
/// settles first - value or error alike - wins the race; every other input
/// is forced to `NotSelected` (best effort, same as `cancel_rest`). Returns
/// the same futures passed in, each now guaranteed resolved.
pub fn first_resolved2<A, B, E>(a: Future<A, E>, b: Future<B, E>) -> (Future<A, E>, Future<B, E>)
where
    A: Clone + Send + 'static,
    B: Clone + Send + 'static,
    E: FutureError + Clone,
{
    let decided = Arc::new(AtomicBool::new(false));

    {
        let decided = Arc::clone(&decided);
        let b = b.clone();
        a.on_result(QoS::Unspecified, move |_outcome| {
            if decided.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_ok() {
                force_not_selected(&b);
            }
        });
    }
    {
        let decided = Arc::clone(&decided);
        let a = a.clone();
        b.on_result(QoS::Unspecified, move |_outcome| {
            if decided.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_ok() {
                force_not_selected(&a);
            }
        });
    }

    (a, b)
}

/// Three-input form of [`first_resolved2`].
pub fn first_resolved3<A, B, C, E>(
    a: Future<A, E>,
    b: Future<B, E>,
    c: Future<C, E>,
) -> (Future<A, E>, Future<B, E>, Future<C, E>)
where
    A: Clone + Send + 'static,
    B: Clone + Send + 'static,
    C: Clone + Send + 'static,
    E: FutureError + Clone,
{
    let decided = Arc::new(AtomicBool::new(false));

    {
        let decided = Arc::clone(&decided);
        let (b, c) = (b.clone(), c.clone());
        a.on_result(QoS::Unspecified, move |_outcome| {
            if decided.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_ok() {
                force_not_selected(&b);
                force_not_selected(&c);
            }
        });
    }
    {
        let decided = Arc::clone(&decided);
        let (a, c) = (a.clone(), c.clone());
        b.on_result(QoS::Unspecified, move |_outcome| {
            if decided.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_ok() {
                force_not_selected(&a);
                force_not_selected(&c);
            }
        });
    }
    {
        let decided = Arc::clone(&decided);
        let (a, b) = (a.clone(), b.clone());
        c.on_result(QoS::Unspecified, move |_outcome| {
            if decided.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_ok() {
                force_not_selected(&a);
                force_not_selected(&b);
            }
        });
    }

    (a, b, c)
}

/// Four-input form of [`first_resolved2`].
pub fn first_resolved4<A, B, C, D, E>(
    a: Future<A, E>,
    b: Future<B, E>,
    c: Future<C, E>,
    d: Future<D, E>,
) -> (Future<A, E>, Future<B, E>, Future<C, E>, Future<D, E>)
where
    A: Clone + Send + 'static,
    B: Clone + Send + 'static,
    C: Clone + Send + 'static,
    D: Clone + Send + 'static,
    E: FutureError + Clone,
{
    let decided = Arc::new(AtomicBool::new(false));

    {
        let decided = Arc::clone(&decided);
        let (b, c, d) = (b.clone(), c.clone(), d.clone());
        a.on_result(QoS::Unspecified, move |_outcome| {
            if decided.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_ok() {
                force_not_selected(&b);
                force_not_selected(&c);
                force_not_selected(&d);
            }
        });
    }
    {
        let decided = Arc::clone(&decided);
        let (a, c, d) = (a.clone(), c.clone(), d.clone());
        b.on_result(QoS::Unspecified, move |_outcome| {
            if decided.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_ok() {
                force_not_selected(&a);
                force_not_selected(&c);
                force_not_selected(&d);
            }
        });
    }
    {
        let decided = Arc::clone(&decided);
        let (a, b, d) = (a.clone(), b.clone(), d.clone());
        c.on_result(QoS::Unspecified, move |_outcome| {
            if decided.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_ok() {
                force_not_selected(&a);
                force_not_selected(&b);
                force_not_selected(&d);
            }
        });
    }
    {
        let decided = Arc::clone(&decided);
        let (a, b, c) = (a.clone(), b.clone(), c.clone());
        d.on_result(QoS::Unspecified, move |_outcome| {
            if decided.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_ok() {
                force_not_selected(&a);
                force_not_selected(&b);
                force_not_selected(&c);
            }
        });
    }

    (a, b, c, d)
}

/// Typed-tuple variadic form of [`first_value`] (§4.7). The first input to
/// produce a `Value` wins and every other input is forced to `NotSelected`;
/// if every input errors, none is forced and each keeps its own error (a
/// typed tuple has no single slot to carry a merged "last error" into,
/// unlike the `Vec` form).
pub fn first_value2<A, B, E>(a: Future<A, E>, b: Future<B, E>) -> (Future<A, E>, Future<B, E>)
where
    A: Clone + Send + 'static,
    B: Clone + Send + 'static,
    E: FutureError + Clone,
{
    let decided = Arc::new(AtomicBool::new(false));

    {
        let decided = Arc::clone(&decided);
        let b = b.clone();
        a.on_result(QoS::Unspecified, move |outcome| {
            if matches!(outcome, Outcome::Value(_))
                && decided.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_ok()
            {
                force_not_selected(&b);
            }
        });
    }
    {
        let decided = Arc::clone(&decided);
        let a = a.clone();
        b.on_result(QoS::Unspecified, move |outcome| {
            if matches!(outcome, Outcome::Value(_))
                && decided.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_ok()
            {
                force_not_selected(&a);
            }
        });
    }

    (a, b)
}

/// Three-input form of [`first_value2`].
pub fn first_value3<A, B, C, E>(
    a: Future<A, E>,
    b: Future<B, E>,
    c: Future<C, E>,
) -> (Future<A, E>, Future<B, E>, Future<C, E>)
where
    A: Clone + Send + 'static,
    B: Clone + Send + 'static,
    C: Clone + Send + 'static,
    E: FutureError + Clone,
{
    let decided = Arc::new(AtomicBool::new(false));

    {
        let decided = Arc::clone(&decided);
        let (b, c) = (b.clone(), c.clone());
        a.on_result(QoS::Unspecified, move |outcome| {
            if matches!(outcome, Outcome::Value(_))
                && decided.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_ok()
            {
                force_not_selected(&b);
                force_not_selected(&c);
            }
        });
    }
    {
        let decided = Arc::clone(&decided);
        let (a, c) = (a.clone(), c.clone());
        b.on_result(QoS::Unspecified, move |outcome| {
            if matches!(outcome, Outcome::Value(_))
                && decided.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_ok()
            {
                force_not_selected(&a);
                force_not_selected(&c);
            }
        });
    }
    {
        let decided = Arc::clone(&decided);
        let (a, b) = (a.clone(), b.clone());
        c.on_result(QoS::Unspecified, move |outcome| {
            if matches!(outcome, Outcome::Value(_))
                && decided.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_ok()
            {
                force_not_selected(&a);
                force_not_selected(&b);
            }
        });
    }

    (a, b, c)
}

/// Four-input form of [`first_value2`].
pub fn first_value4<A, B, C, D, E>(
    a: Future<A, E>,
    b: Future<B, E>,
    c: Future<C, E>,
    d: Future<D, E>,
) -> (Future<A, E>, Future<B, E>, Future<C, E>, Future<D, E>)
where
    A: Clone + Send + 'static,
    B: Clone + Send + 'static,
    C: Clone + Send + 'static,
    D: Clone + Send + 'static,
    E: FutureError + Clone,
{
    let decided = Arc::new(AtomicBool::new(false));

    {
        let decided = Arc::clone(&decided);
        let (b, c, d) = (b.clone(), c.clone(), d.clone());
        a.on_result(QoS::Unspecified, move |outcome| {
            if matches!(outcome, Outcome::Value(_))
                && decided.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_ok()
            {
                force_not_selected(&b);
                force_not_selected(&c);
                force_not_selected(&d);
            }
        });
    }
    {
        let decided = Arc::clone(&decided);
        let (a, c, d) = (a.clone(), c.clone(), d.clone());
        b.on_result(QoS::Unspecified, move |outcome| {
            if matches!(outcome, Outcome::Value(_))
                && decided.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_ok()
            {
                force_not_selected(&a);
                force_not_selected(&c);
                force_not_selected(&d);
            }
        });
    }
    {
        let decided = Arc::clone(&decided);
        let (a, b, d) = (a.clone(), b.clone(), d.clone());
        c.on_result(QoS::Unspecified, move |outcome| {
            if matches!(outcome, Outcome::Value(_))
                && decided.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_ok()
            {
                force_not_selected(&a);
                force_not_selected(&b);
                force_not_selected(&d);
            }
        });
    }
    {
        let decided = Arc::clone(&decided);
        let (a, b, c) = (a.clone(), b.clone(), c.clone());
        d.on_result(QoS::Unspecified, move |outcome| {
            if matches!(outcome, Outcome::Value(_))
                && decided.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_ok()
            {
                force_not_selected(&a);
                force_not_selected(&b);
                force_not_selected(&c);
            }
        });
    }

    (a, b, c, d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, NetError};
    use crate::executor::InlineScheduler;
    use crate::scheduler::Scheduler;

    fn scheduler() -> Arc<dyn Scheduler> {
        Arc::new(InlineScheduler::new())
    }

    type E = Error<NetError>;

    #[test]
    fn first_value_over_empty_is_none() {
        assert!(first_value::<i32, E>(Vec::new(), false).is_none());
    }

    #[test]
    fn first_value_prefers_value_over_errors() {
        let inputs: Vec<Future<i32, E>> = (0..10)
            .map(|i| {
                if i == 4 {
                    Future::resolved_value(scheduler(), QoS::Default, 4)
                } else {
                    Future::resolved_error(scheduler(), QoS::Default, Error::Invalid(format!("e{i}")))
                }
            })
            .collect();
        let winner = first_value(inputs, false).unwrap();
        assert_eq!(winner.get(), Outcome::Value(4));
    }

    #[test]
    fn first_value_cancels_others_with_not_selected() {
        let scheduler = scheduler();
        let mut pairs = Vec::new();
        let mut inputs = Vec::new();
        for _ in 0..3 {
            let (f, r) = Future::<i32, E>::pair(scheduler.clone(), QoS::Default);
            inputs.push(f.clone());
            pairs.push((f, r));
        }
        let winner = first_value(inputs, true).unwrap();
        pairs[0].1.resolve_value(1);
        assert_eq!(winner.get(), Outcome::Value(1));
        assert!(matches!(pairs[1].0.peek(), Some(Outcome::Error(Error::NotSelected))));
        assert!(matches!(pairs[2].0.peek(), Some(Outcome::Error(Error::NotSelected))));
    }

    #[test]
    fn first_value_all_error_yields_last_error() {
        let inputs: Vec<Future<i32, E>> = (0..3)
            .map(|i| Future::resolved_error(scheduler(), QoS::Default, Error::Invalid(format!("e{i}"))))
            .collect();
        let winner = first_value(inputs, false).unwrap();
        assert!(matches!(winner.get(), Outcome::Error(Error::Invalid(_))));
    }

    #[test]
    fn first_resolved_takes_whatever_comes_first() {
        let scheduler = scheduler();
        let a: Future<i32, E> = Future::resolved_error(scheduler.clone(), QoS::Default, Error::Invalid("a".into()));
        let b: Future<i32, E> = Future::resolved_value(scheduler, QoS::Default, 9);
        let winner = first_resolved(vec![a, b], false).unwrap();
        assert!(matches!(winner.get(), Outcome::Error(Error::Invalid(m)) if m == "a"));
    }

    #[test]
    fn first_resolved2_forces_the_loser_to_not_selected() {
        let scheduler = scheduler();
        let (a, ar) = Future::<i32, E>::pair(scheduler.clone(), QoS::Default);
        let (b, br) = Future::<&str, E>::pair(scheduler, QoS::Default);
        let (a, b) = first_resolved2(a, b);
        ar.resolve_value(1);
        assert_eq!(a.get(), Outcome::Value(1));
        assert!(matches!(b.peek(), Some(Outcome::Error(Error::NotSelected))));
        assert!(!br.resolve_value("too late"));
    }

    #[test]
    fn first_value2_prefers_the_typed_value_and_cancels_the_other() {
        let scheduler = scheduler();
        let a: Future<i32, E> = Future::resolved_error(scheduler.clone(), QoS::Default, Error::Invalid("a".into()));
        let b: Future<&str, E> = Future::resolved_value(scheduler, QoS::Default, "won");
        let (a, b) = first_value2(a, b);
        assert!(matches!(a.get(), Outcome::Error(Error::Invalid(m)) if m == "a"));
        assert_eq!(b.get(), Outcome::Value("won"));
    }

    #[test]
    fn first_value4_each_input_keeps_its_own_error_when_none_has_a_value() {
        let scheduler = scheduler();
        let a: Future<i32, E> = Future::resolved_error(scheduler.clone(), QoS::Default, Error::Invalid("a".into()));
        let b: Future<i32, E> = Future::resolved_error(scheduler.clone(), QoS::Default, Error::Invalid("b".into()));
        let c: Future<i32, E> = Future::resolved_error(scheduler.clone(), QoS::Default, Error::Invalid("c".into()));
        let d: Future<i32, E> = Future::resolved_error(scheduler, QoS::Default, Error::Invalid("d".into()));
        let (a, b, c, d) = first_value4(a, b, c, d);
        assert!(matches!(a.get(), Outcome::Error(Error::Invalid(m)) if m == "a"));
        assert!(matches!(b.get(), Outcome::Error(Error::Invalid(m)) if m == "b"));
        assert!(matches!(c.get(), Outcome::Error(Error::Invalid(m)) if m == "c"));
        assert!(matches!(d.get(), Outcome::Error(Error::Invalid(m)) if m == "d"));
    }

    #[test]
    fn first_resolved4_cancels_the_other_three() {
        let scheduler = scheduler();
        let (a, ar) = Future::<i32, E>::pair(scheduler.clone(), QoS::Default);
        let (b, _br) = Future::<i32, E>::pair(scheduler.clone(), QoS::Default);
        let (c, _cr) = Future::<&str, E>::pair(scheduler.clone(), QoS::Default);
        let (d, _dr) = Future::<f64, E>::pair(scheduler, QoS::Default);
        let (a, b, c, d) = first_resolved4(a, b, c, d);
        ar.resolve_value(42);
        assert_eq!(a.get(), Outcome::Value(42));
        assert!(matches!(b.peek(), Some(Outcome::Error(Error::NotSelected))));
        assert!(matches!(c.peek(), Some(Outcome::Error(Error::NotSelected))));
        assert!(matches!(d.peek(), Some(Outcome::Error(Error::NotSelected))));
    }
}
