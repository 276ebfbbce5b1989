//! `combine`, `combine2`/`combine3`/`combine4` (§4.7).

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::error::FutureError;
use crate::future::Future;
use crate::loom::Arc;
use crate::outcome::Outcome;
use crate::qos::QoS;
use crate::scheduler::Scheduler;

/// Waits for every input to resolve, failing with the first error
/// encountered; otherwise produces all values in input order.
pub fn combine<V, E>(inputs: Vec<Future<V, E>>, scheduler: Arc<dyn Scheduler>, qos: QoS) -> Future<Vec<V>, E>
where
    V: Clone + Send + 'static,
    E: FutureError + Clone,
{
    let count = inputs.len();
    if count == 0 {
        return Future::resolved_value(scheduler, qos, Vec::new());
    }
    let (child, resolver) = Future::pair(scheduler, qos);
    let resolver = Arc::new(resolver);
    let slots: Arc<Mutex<Vec<Option<V>>>> = Arc::new(Mutex::new(vec![None; count]));
    let remaining = Arc::new(AtomicUsize::new(count));

    for (i, input) in inputs.into_iter().enumerate() {
        let resolver = Arc::clone(&resolver);
        let slots = Arc::clone(&slots);
        let remaining = Arc::clone(&remaining);
        input.on_result(QoS::Unspecified, move |outcome| match outcome {
            Outcome::Value(v) => {
                slots.lock()[i] = Some(v);
                if remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
                    let values: Vec<V> = slots
                        .lock()
                        .iter_mut()
                        .map(|slot| slot.take().expect("every slot filled when remaining hits zero"))
                        .collect();
                    let _ = resolver.resolve_value(values);
                }
            }
            Outcome::Error(e) => {
                let _ = resolver.resolve_error(e);
            }
        });
    }

    child
}

macro_rules! combine_n {
    ($name:ident, ($($t:ident : $idx:tt),+)) => {
        #[allow(non_snake_case)]
        pub fn $name<$($t,)+ E>(
            $($t: Future<$t, E>,)+
            scheduler: Arc<dyn Scheduler>,
            qos: QoS,
        ) -> Future<($($t,)+), E>
        where
            $($t: Clone + Send + 'static,)+
            E: FutureError + Clone,
        {
            let (child, resolver) = Future::pair(scheduler, qos);
            let resolver = Arc::new(resolver);
            let slots: Arc<Mutex<($(Option<$t>,)+)>> = Arc::new(Mutex::new(Default::default()));
            let remaining = Arc::new(AtomicUsize::new(combine_n!(@count $($t)+)));

            $(
                {
                    let resolver = Arc::clone(&resolver);
                    let slots = Arc::clone(&slots);
                    let remaining = Arc::clone(&remaining);
                    $t.on_result(QoS::Unspecified, move |outcome| match outcome {
                        Outcome::Value(v) => {
                            slots.lock().$idx = Some(v);
                            if remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
                                let mut guard = slots.lock();
                                let tuple = ($(guard.$idx.take().expect("slot filled"),)+);
                                let _ = resolver.resolve_value(tuple);
                            }
                        }
                        Outcome::Error(e) => {
                            let _ = resolver.resolve_error(e);
                        }
                    });
                }
            )+

            child
        }
    };
    (@count $($t:ident)+) => {
        0usize $(+ { let _ = stringify!($t); 1usize })+
    };
}

combine_n!(combine2, (A: 0, B: 1));
combine_n!(combine3, (A: 0, B: 1, C: 2));
combine_n!(combine4, (A: 0, B: 1, C: 2, D: 3));
