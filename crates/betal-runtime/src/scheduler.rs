#![forbid(unsafe_code)]

//! Microtask job queue for lifecycle notifications.
//!
//! Mount, unmount, props-change and state-change hooks never run inline.
//! They are queued as [`Job`]s and drained at the next microtask boundary
//! provided by the [`Platform`]. At most one flush is pending at a time; jobs
//! enqueued while a flush runs join the same flush, in FIFO order.
//!
//! A failing or panicking job is logged and does not stop the queue.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use betal_core::Platform;

use crate::error::HookResult;

/// A deferred lifecycle notification.
pub type Job = Box<dyn FnOnce() -> HookResult>;

struct SchedulerInner {
    host: Rc<dyn Platform>,
    jobs: RefCell<VecDeque<Job>>,
    flush_pending: Cell<bool>,
    catch_panics: bool,
}

/// FIFO job queue flushed at microtask boundaries.
///
/// Cheap to clone; clones share the queue.
#[derive(Clone)]
pub struct Scheduler {
    inner: Rc<SchedulerInner>,
}

impl Scheduler {
    /// Create a scheduler backed by `host` microtasks.
    pub fn new(host: Rc<dyn Platform>, catch_panics: bool) -> Self {
        Self {
            inner: Rc::new(SchedulerInner {
                host,
                jobs: RefCell::new(VecDeque::new()),
                flush_pending: Cell::new(false),
                catch_panics,
            }),
        }
    }

    /// Queue a job and make sure a flush is scheduled.
    pub fn enqueue_job(&self, job: Job) {
        self.inner.jobs.borrow_mut().push_back(job);
        self.schedule_update();
    }

    fn schedule_update(&self) {
        if self.inner.flush_pending.replace(true) {
            return;
        }
        let weak = Rc::downgrade(&self.inner);
        self.inner.host.queue_microtask(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                Scheduler { inner }.flush();
            }
        }));
    }

    /// Run every queued job, including jobs enqueued by jobs. Returns the
    /// number of jobs run.
    ///
    /// The pending flag is cleared even when a job unwinds out of the flush
    /// (with panic catching disabled), so the next enqueue schedules a fresh
    /// microtask that picks up the jobs left behind.
    pub fn flush(&self) -> usize {
        let _pending = PendingGuard(&self.inner.flush_pending);
        let mut ran = 0;
        loop {
            // Pop in its own statement so no borrow is held while the job runs.
            let next = self.inner.jobs.borrow_mut().pop_front();
            let Some(job) = next else { break };
            self.run_job(job);
            ran += 1;
        }
        if ran > 0 {
            crate::debug_trace!(Scheduler, "flush ran {} jobs", ran);
        }
        ran
    }

    fn run_job(&self, job: Job) {
        if !self.inner.catch_panics {
            if let Err(err) = job() {
                tracing::error!(error = %err, "[scheduler] lifecycle job failed");
            }
            return;
        }
        match catch_unwind(AssertUnwindSafe(job)) {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                tracing::error!(error = %err, "[scheduler] lifecycle job failed");
            }
            Err(payload) => {
                let msg = if let Some(s) = payload.downcast_ref::<&str>() {
                    (*s).to_owned()
                } else if let Some(s) = payload.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "unknown panic payload".to_owned()
                };
                tracing::error!("[scheduler] lifecycle job panicked: {msg}");
            }
        }
    }

    /// Drain the queue now, including jobs the drained jobs enqueue.
    ///
    /// Use this to wait for every pending lifecycle hook before inspecting
    /// the tree. The microtask queued earlier becomes a no-op.
    pub fn next_tick(&self) -> usize {
        self.flush()
    }

    /// Number of queued jobs.
    pub fn pending(&self) -> usize {
        self.inner.jobs.borrow().len()
    }

    /// Whether a flush microtask is queued and has not run yet.
    pub fn is_flush_pending(&self) -> bool {
        self.inner.flush_pending.get()
    }
}

/// Clears the flush-pending flag when the flush ends, normally or by unwind.
struct PendingGuard<'a>(&'a Cell<bool>);

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("pending", &self.pending())
            .field("flush_pending", &self.is_flush_pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use betal_headless::MemoryDom;

    fn scheduler() -> (Rc<MemoryDom>, Scheduler) {
        let dom = MemoryDom::new();
        let scheduler = Scheduler::new(dom.clone(), true);
        (dom, scheduler)
    }

    fn push(log: &Rc<RefCell<Vec<&'static str>>>, name: &'static str) -> Job {
        let log = Rc::clone(log);
        Box::new(move || {
            log.borrow_mut().push(name);
            Ok(())
        })
    }

    #[test]
    fn jobs_wait_for_the_microtask_boundary() {
        let (dom, scheduler) = scheduler();
        let log = Rc::new(RefCell::new(Vec::new()));
        scheduler.enqueue_job(push(&log, "a"));
        scheduler.enqueue_job(push(&log, "b"));
        assert!(log.borrow().is_empty());
        assert_eq!(dom.pending_microtasks(), 1);

        dom.run_microtasks();
        assert_eq!(*log.borrow(), vec!["a", "b"]);
        assert!(!scheduler.is_flush_pending());
    }

    #[test]
    fn jobs_enqueued_during_flush_run_in_same_flush() {
        let (dom, scheduler) = scheduler();
        let log = Rc::new(RefCell::new(Vec::new()));
        let inner = scheduler.clone();
        let l = Rc::clone(&log);
        scheduler.enqueue_job(Box::new(move || {
            l.borrow_mut().push("outer");
            inner.enqueue_job(push(&l, "inner"));
            Ok(())
        }));
        assert_eq!(dom.run_microtasks(), 1);
        assert_eq!(*log.borrow(), vec!["outer", "inner"]);
    }

    #[test]
    fn failing_and_panicking_jobs_do_not_stop_the_queue() {
        let (dom, scheduler) = scheduler();
        let log = Rc::new(RefCell::new(Vec::new()));
        scheduler.enqueue_job(Box::new(|| -> HookResult { Err("boom".into()) }));
        scheduler.enqueue_job(Box::new(|| -> HookResult { panic!("kaboom") }));
        scheduler.enqueue_job(push(&log, "after"));
        dom.run_microtasks();
        assert_eq!(*log.borrow(), vec!["after"]);
    }

    #[test]
    fn uncaught_panic_does_not_wedge_the_queue() {
        let dom = MemoryDom::new();
        let scheduler = Scheduler::new(dom.clone(), false);
        let log = Rc::new(RefCell::new(Vec::new()));
        scheduler.enqueue_job(Box::new(|| -> HookResult { panic!("kaboom") }));
        scheduler.enqueue_job(push(&log, "left behind"));

        let unwound = catch_unwind(AssertUnwindSafe(|| dom.run_microtasks()));
        assert!(unwound.is_err());
        assert!(!scheduler.is_flush_pending());
        assert_eq!(scheduler.pending(), 1);

        scheduler.enqueue_job(push(&log, "later"));
        assert_eq!(dom.pending_microtasks(), 1);
        dom.run_microtasks();
        assert_eq!(*log.borrow(), vec!["left behind", "later"]);
        assert!(!scheduler.is_flush_pending());
    }

    #[test]
    fn next_tick_drains_immediately() {
        let (dom, scheduler) = scheduler();
        let log = Rc::new(RefCell::new(Vec::new()));
        scheduler.enqueue_job(push(&log, "a"));
        assert_eq!(scheduler.next_tick(), 1);
        assert_eq!(*log.borrow(), vec!["a"]);
        // The stale microtask finds an empty queue.
        dom.run_microtasks();
        assert_eq!(*log.borrow(), vec!["a"]);
    }
}
