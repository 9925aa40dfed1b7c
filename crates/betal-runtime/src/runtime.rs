#![forbid(unsafe_code)]

//! Shared runtime state.
//!
//! One [`Runtime`] exists per application. It bundles the platform adapter,
//! the lifecycle [`Scheduler`], the slot tracker and the application context,
//! and is cloned into every component instance.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use betal_core::Platform;

use crate::config::RuntimeConfig;
use crate::router::{NoopRouter, Router};
use crate::scheduler::Scheduler;

/// Services shared with every component of an application.
#[derive(Clone)]
pub struct AppContext {
    router: Rc<dyn Router>,
}

impl AppContext {
    /// Context exposing `router`.
    pub fn new(router: Rc<dyn Router>) -> Self {
        Self { router }
    }

    /// The application router.
    pub fn router(&self) -> &Rc<dyn Router> {
        &self.router
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new(Rc::new(NoopRouter))
    }
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}

/// Records whether the render in progress created a slot placeholder, so
/// projection only walks templates that need it.
#[derive(Debug, Default)]
pub struct SlotTracker {
    used: Cell<bool>,
}

impl SlotTracker {
    /// Note that the current render produced a slot.
    pub fn mark(&self) {
        self.used.set(true);
    }

    /// Whether a slot was produced since the last call; resets the flag.
    pub fn take(&self) -> bool {
        self.used.replace(false)
    }
}

struct RuntimeInner {
    platform: Rc<dyn Platform>,
    scheduler: Scheduler,
    slots: SlotTracker,
    context: AppContext,
    config: RuntimeConfig,
}

/// Handle to the shared runtime. Cheap to clone.
#[derive(Clone)]
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Runtime {
    /// Create a runtime on top of `platform`.
    pub fn new(platform: Rc<dyn Platform>, context: AppContext, config: RuntimeConfig) -> Self {
        let scheduler = Scheduler::new(Rc::clone(&platform), config.catch_job_panics);
        Self {
            inner: Rc::new(RuntimeInner {
                platform,
                scheduler,
                slots: SlotTracker::default(),
                context,
                config,
            }),
        }
    }

    /// Runtime with a no-op router and default configuration.
    pub fn with_platform(platform: Rc<dyn Platform>) -> Self {
        Self::new(platform, AppContext::default(), RuntimeConfig::default())
    }

    /// The platform adapter.
    pub fn platform(&self) -> &dyn Platform {
        self.inner.platform.as_ref()
    }

    /// The lifecycle scheduler.
    pub fn scheduler(&self) -> &Scheduler {
        &self.inner.scheduler
    }

    /// The slot tracker.
    pub fn slots(&self) -> &SlotTracker {
        &self.inner.slots
    }

    /// The application context.
    pub fn context(&self) -> &AppContext {
        &self.inner.context
    }

    /// The runtime configuration.
    pub fn config(&self) -> &RuntimeConfig {
        &self.inner.config
    }

    /// Run every pending lifecycle job. Returns the number of jobs run.
    pub fn next_tick(&self) -> usize {
        self.inner.scheduler.next_tick()
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("scheduler", &self.inner.scheduler)
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_tracker_resets_on_take() {
        let tracker = SlotTracker::default();
        assert!(!tracker.take());
        tracker.mark();
        assert!(tracker.take());
        assert!(!tracker.take());
    }
}
