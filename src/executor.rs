//! Concrete [`Scheduler`] adapters, reference-grade rather than production
//! (the execution substrate is explicitly out of scope, §1): enough to run
//! and test the core without every downstream crate writing its own.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;
use std::thread;
use std::time::Instant;

use parking_lot::{Condvar, Mutex};

use crate::loom::Arc;
use crate::qos::QoS;
use crate::scheduler::{Job, Scheduler};

/// Runs every submitted job synchronously on the submitting thread.
/// `submit_after` sleeps the calling thread up to the deadline, then runs
/// inline. Deterministic; meant for single-threaded tests, the way the
/// teacher's own leaf/"done" futures sidestep a real executor entirely.
pub struct InlineScheduler;

impl InlineScheduler {
    pub fn new() -> Self {
        InlineScheduler
    }
}

impl Default for InlineScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for InlineScheduler {
    fn submit(&self, _qos: QoS, job: Job) {
        job();
    }

    fn submit_after(&self, deadline: Instant, _qos: QoS, job: Job) {
        let now = Instant::now();
        if deadline > now {
            thread::sleep(deadline - now);
        }
        job();
    }
}

struct PrioritizedJob {
    qos: QoS,
    seq: u64,
    job: Job,
}

impl PartialEq for PrioritizedJob {
    fn eq(&self, other: &Self) -> bool {
        self.qos == other.qos && self.seq == other.seq
    }
}
impl Eq for PrioritizedJob {}
impl PartialOrd for PrioritizedJob {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for PrioritizedJob {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Higher QoS first; within equal QoS, earlier submission (lower
        // seq) first - a `BinaryHeap` is a max-heap, so reverse `seq`.
        self.qos.cmp(&other.qos).then_with(|| other.seq.cmp(&self.seq))
    }
}

struct DelayedJob {
    deadline: Instant,
    qos: QoS,
    seq: u64,
    job: Job,
}

impl PartialEq for DelayedJob {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}
impl Eq for DelayedJob {}
impl PartialOrd for DelayedJob {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for DelayedJob {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.deadline.cmp(&other.deadline).then_with(|| self.seq.cmp(&other.seq))
    }
}

struct Shared {
    ready: Mutex<BinaryHeap<PrioritizedJob>>,
    ready_cvar: Condvar,
    delayed: Mutex<BinaryHeap<Reverse<DelayedJob>>>,
    delayed_cvar: Condvar,
    shutdown: std::sync::atomic::AtomicBool,
    seq: AtomicUsize,
}

/// A small fixed-size worker pool keyed by QoS priority, plus one timer
/// thread for `submit_after`. The priority-queue-behind-a-mutex shape
/// mirrors the simple concurrent scheduler used by other task-executor
/// crates in this corpus (a `Mutex<BinaryHeap<_>>` guarding prioritized
/// runnables); the timer thread is a standard min-heap-by-deadline design.
pub struct ThreadPoolScheduler {
    shared: Arc<Shared>,
    _workers: Vec<thread::JoinHandle<()>>,
    _timer: thread::JoinHandle<()>,
}

impl ThreadPoolScheduler {
    pub fn new(worker_count: usize) -> Self {
        let worker_count = worker_count.max(1);
        let shared = Arc::new(Shared {
            ready: Mutex::new(BinaryHeap::new()),
            ready_cvar: Condvar::new(),
            delayed: Mutex::new(BinaryHeap::new()),
            delayed_cvar: Condvar::new(),
            shutdown: std::sync::atomic::AtomicBool::new(false),
            seq: AtomicUsize::new(0),
        });

        let mut workers = Vec::with_capacity(worker_count);
        for _ in 0..worker_count {
            let shared = Arc::clone(&shared);
            workers.push(thread::spawn(move || worker_loop(shared)));
        }

        let timer_shared = Arc::clone(&shared);
        let timer = thread::spawn(move || timer_loop(timer_shared));

        ThreadPoolScheduler {
            shared,
            _workers: workers,
            _timer: timer,
        }
    }

    fn next_seq(&self) -> u64 {
        self.shared.seq.fetch_add(1, Ordering::Relaxed) as u64
    }
}

impl Drop for ThreadPoolScheduler {
    fn drop(&mut self) {
        self.shared.shutdown.store(true, Ordering::SeqCst);
        self.shared.ready_cvar.notify_all();
        self.shared.delayed_cvar.notify_all();
    }
}

fn worker_loop(shared: Arc<Shared>) {
    loop {
        let mut queue = shared.ready.lock();
        loop {
            if shared.shutdown.load(Ordering::SeqCst) {
                return;
            }
            if let Some(job) = queue.pop() {
                drop(queue);
                (job.job)();
                break;
            }
            shared.ready_cvar.wait(&mut queue);
        }
    }
}

fn timer_loop(shared: Arc<Shared>) {
    loop {
        let mut delayed = shared.delayed.lock();
        loop {
            if shared.shutdown.load(Ordering::SeqCst) {
                return;
            }
            match delayed.peek() {
                None => {
                    shared.delayed_cvar.wait(&mut delayed);
                }
                Some(Reverse(next)) => {
                    let now = Instant::now();
                    if next.deadline <= now {
                        let Reverse(due) = delayed.pop().unwrap();
                        let mut ready = shared.ready.lock();
                        ready.push(PrioritizedJob {
                            qos: due.qos,
                            seq: due.seq,
                            job: due.job,
                        });
                        shared.ready_cvar.notify_one();
                    } else {
                        let _ = shared.delayed_cvar.wait_for(&mut delayed, next.deadline - now);
                    }
                }
            }
        }
    }
}

impl Scheduler for ThreadPoolScheduler {
    fn submit(&self, qos: QoS, job: Job) {
        let seq = self.next_seq();
        let mut queue = self.shared.ready.lock();
        queue.push(PrioritizedJob { qos, seq, job });
        self.shared.ready_cvar.notify_one();
    }

    fn submit_after(&self, deadline: Instant, qos: QoS, job: Job) {
        if deadline <= Instant::now() {
            self.submit(qos, job);
            return;
        }
        let seq = self.next_seq();
        let mut delayed = self.shared.delayed.lock();
        delayed.push(Reverse(DelayedJob { deadline, qos, seq, job }));
        self.shared.delayed_cvar.notify_one();
    }
}

static DEFAULT_SCHEDULER: OnceLock<Arc<dyn Scheduler>> = OnceLock::new();

/// Installs the process-default scheduler (SPEC_FULL.md §A.6). May only be
/// called once; later calls are no-ops and return `false`. There is no
/// implicit global scheduler otherwise - every `Future` constructor takes
/// one explicitly (SPEC_FULL.md §9, "Global singletons").
pub fn set_default_scheduler(scheduler: Arc<dyn Scheduler>) -> bool {
    DEFAULT_SCHEDULER.set(scheduler).is_ok()
}

/// Returns the process-default scheduler, if one has been installed.
pub fn default_scheduler() -> Option<Arc<dyn Scheduler>> {
    DEFAULT_SCHEDULER.get().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn inline_runs_synchronously() {
        let scheduler = InlineScheduler::new();
        let (tx, rx) = mpsc::channel();
        scheduler.submit(QoS::Default, Box::new(move || tx.send(42).unwrap()));
        assert_eq!(rx.try_recv().unwrap(), 42);
    }

    #[test]
    fn thread_pool_runs_submitted_jobs() {
        let scheduler = ThreadPoolScheduler::new(2);
        let (tx, rx) = mpsc::channel();
        for i in 0..5 {
            let tx = tx.clone();
            scheduler.submit(QoS::Default, Box::new(move || tx.send(i).unwrap()));
        }
        let mut got: Vec<i32> = (0..5).map(|_| rx.recv_timeout(std::time::Duration::from_secs(1)).unwrap()).collect();
        got.sort();
        assert_eq!(got, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn thread_pool_honors_submit_after() {
        let scheduler = ThreadPoolScheduler::new(1);
        let (tx, rx) = mpsc::channel();
        let start = Instant::now();
        scheduler.submit_after(
            start + std::time::Duration::from_millis(30),
            QoS::Default,
            Box::new(move || tx.send(Instant::now()).unwrap()),
        );
        let fired = rx.recv_timeout(std::time::Duration::from_secs(1)).unwrap();
        assert!(fired.duration_since(start) >= std::time::Duration::from_millis(25));
    }
}
