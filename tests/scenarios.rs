//! The six literal end-to-end scenarios from spec.md §8.

use std::sync::Arc;
use std::time::{Duration, Instant};

use deferred::error::{Error, NetError};
use deferred::executor::ThreadPoolScheduler;
use deferred::future::Future;
use deferred::outcome::Outcome;
use deferred::qos::QoS;
use deferred::scheduler::Scheduler;
use deferred::selection::{combine::combine4, first_value, reduce};

type E = Error<NetError>;

fn scheduler() -> Arc<dyn Scheduler> {
    Arc::new(ThreadPoolScheduler::new(4))
}

/// 1. Sequential map chain: value(10.5).delay(50ms).map(...).delay(500ms)
/// yields 21 after >= 550ms.
#[test]
fn sequential_map_chain() {
    let scheduler = scheduler();
    let start = Instant::now();
    let f: Future<f64, E> = Future::resolved_value(Arc::clone(&scheduler), QoS::Default, 10.5);
    let chained = f
        .delay(start + Duration::from_millis(50))
        .map(QoS::Default, |d| (2.0 * d).floor() as i32)
        .delay(start + Duration::from_millis(550));
    assert_eq!(chained.get(), Outcome::Value(21));
    assert!(start.elapsed() >= Duration::from_millis(550));
}

/// 2. Combine four: combine4(7, 11, "s", 3.0.delay(1ms)) -> (7, 11, "s", 3.0).
#[test]
fn combine_four() {
    let scheduler = scheduler();
    let a: Future<i32, E> = Future::resolved_value(Arc::clone(&scheduler), QoS::Default, 7);
    let b: Future<i32, E> = Future::resolved_value(Arc::clone(&scheduler), QoS::Default, 11);
    let c: Future<&str, E> = Future::resolved_value(Arc::clone(&scheduler), QoS::Default, "s");
    let d: Future<f64, E> = Future::resolved_value(Arc::clone(&scheduler), QoS::Default, 3.0)
        .delay(Instant::now() + Duration::from_millis(1));
    let combined = combine4(a, b, c, d, Arc::clone(&scheduler), QoS::Default);
    assert_eq!(combined.get(), Outcome::Value((7, 11, "s", 3.0)));
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("test error at acc={0}")]
struct TestErr(i32);

/// 3. reduce([1, 2, 0, 4], 0, |a,i| if i>0 {Ok(a+i)} else {Err(TestErr(a))})
/// -> Err(TestErr(3)).
#[test]
fn reduce_with_error() {
    let scheduler = scheduler();
    let items: Vec<Future<i32, Error<TestErr>>> = vec![1, 2, 0, 4]
        .into_iter()
        .map(|v| Future::resolved_value(Arc::clone(&scheduler), QoS::Default, v))
        .collect();
    let result = reduce(items, Arc::clone(&scheduler), QoS::Default, 0, |acc, i| {
        if i > 0 {
            Ok(acc + i)
        } else {
            Err(Error::Domain(TestErr(acc)))
        }
    });
    assert_eq!(result.get(), Outcome::Error(Error::Domain(TestErr(3))));
}

/// 4. Ten futures; index 4 resolves Value(4), index 9 errors. first_value
/// yields Value(4); with cancel_others=true the remaining eight are
/// Err(NotSelected).
#[test]
fn first_value_selection() {
    let scheduler = scheduler();
    let mut pairs = Vec::new();
    let mut inputs = Vec::new();
    for _ in 0..10 {
        let (f, r) = Future::<i32, E>::pair(Arc::clone(&scheduler), QoS::Default);
        inputs.push(f.clone());
        pairs.push((f, r));
    }
    let winner = first_value(inputs, true).unwrap();
    pairs[9].1.resolve_error(Error::Invalid("nine".into()));
    pairs[4].1.resolve_value(4);
    assert_eq!(winner.get(), Outcome::Value(4));
    for (i, (f, _)) in pairs.iter().enumerate() {
        if i == 4 || i == 9 {
            continue;
        }
        assert!(matches!(f.get(), Outcome::Error(Error::NotSelected)), "index {i}");
    }
}

/// 5. Timeout win: a task that sleeps 5s before resolving, raced against a
/// 150ms timeout, yields Err(TimedOut("slow")) at >= 150ms.
#[test]
fn timeout_win() {
    let scheduler = scheduler();
    let start = Instant::now();
    let slow: Future<i32, E> = Future::from_task(Arc::clone(&scheduler), QoS::Default, |resolver| {
        std::thread::sleep(Duration::from_secs(5));
        resolver.resolve_value(1);
    });
    let timed = slow.timeout(Duration::from_millis(150), "slow");
    assert!(matches!(timed.get(), Outcome::Error(Error::TimedOut(m)) if m == "slow"));
    assert!(start.elapsed() >= Duration::from_millis(150));
    assert!(start.elapsed() < Duration::from_secs(4));
}

/// 6. Canceling a downstream future: `let (f,r) = pair(); let m =
/// f.map(..).map(..); m.cancel("stop")` resolves `m` with
/// `Err(Canceled("stop"))` without disturbing `f` or the intermediate
/// `doubled` - per §5 ("Cancellation"), "there is no backward propagation
/// unless an explicit upstream-aware task handle is installed" (§4.5). See
/// DESIGN.md, "Decided Open Questions", for why this test departs from
/// §8's literal wording (which describes cancellation reaching all the way
/// back to the root resolver, contradicting §5's own binding rule).
#[test]
fn canceling_downstream_does_not_disturb_upstream() {
    let scheduler = scheduler();
    let (f, r): (Future<i32, E>, _) = Future::pair(Arc::clone(&scheduler), QoS::Default);
    let doubled = f.map(QoS::Default, |x| x * 2);
    let plus_hundred = doubled.map(QoS::Default, |x| x + 100);

    assert!(plus_hundred.cancel("stop"));
    assert!(matches!(plus_hundred.get(), Outcome::Error(Error::Canceled(m)) if m == "stop"));

    // `f` and `doubled` were never touched by `plus_hundred`'s cancel; `r`
    // still wins its resolve, and `doubled` still observes the value, but
    // `plus_hundred` is already terminal and ignores the late resolution.
    assert!(r.resolve_value(5));
    assert_eq!(doubled.get(), Outcome::Value(10));
    assert!(matches!(plus_hundred.get(), Outcome::Error(Error::Canceled(m)) if m == "stop"));
}
