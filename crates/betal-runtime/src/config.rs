#![forbid(unsafe_code)]

//! Runtime and application configuration.

use std::fmt;
use std::rc::Rc;

use crate::router::Router;

/// Knobs for the component runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Log a warning when a component emits an event nobody listens to.
    pub warn_unhandled_events: bool,
    /// Catch panics raised by lifecycle jobs at the scheduler boundary.
    ///
    /// When `false` a panicking hook unwinds through the flush.
    pub catch_job_panics: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            warn_unhandled_events: true,
            catch_job_panics: true,
        }
    }
}

impl RuntimeConfig {
    /// Toggle warnings for unhandled component events.
    #[must_use]
    pub fn with_warn_unhandled_events(mut self, enabled: bool) -> Self {
        self.warn_unhandled_events = enabled;
        self
    }

    /// Toggle panic capture for lifecycle jobs.
    #[must_use]
    pub fn with_catch_job_panics(mut self, enabled: bool) -> Self {
        self.catch_job_panics = enabled;
        self
    }
}

/// Options accepted by [`App::new`](crate::app::App::new).
#[derive(Clone, Default)]
pub struct AppOptions {
    /// Router shared with the whole component tree. A no-op router is used
    /// when absent.
    pub router: Option<Rc<dyn Router>>,
    /// Runtime configuration.
    pub config: RuntimeConfig,
}

impl AppOptions {
    /// Attach a router.
    #[must_use]
    pub fn with_router(mut self, router: Rc<dyn Router>) -> Self {
        self.router = Some(router);
        self
    }

    /// Replace the runtime configuration.
    #[must_use]
    pub fn with_config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }
}

impl fmt::Debug for AppOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppOptions")
            .field("router", &self.router.as_ref().map(|_| "<router>"))
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_warn_and_catch() {
        let config = RuntimeConfig::default();
        assert!(config.warn_unhandled_events);
        assert!(config.catch_job_panics);
    }

    #[test]
    fn builders_override_fields() {
        let options = AppOptions::default()
            .with_config(RuntimeConfig::default().with_warn_unhandled_events(false));
        assert!(!options.config.warn_unhandled_events);
        assert!(options.router.is_none());
    }
}
