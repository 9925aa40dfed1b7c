#![forbid(unsafe_code)]

//! Router boundary.
//!
//! Routing itself lives outside the runtime. The application host only
//! initialises and destroys the router and shares it with every component
//! through the [`AppContext`](crate::runtime::AppContext).

use std::rc::Rc;

/// A navigation between two paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteChange {
    /// Path before the navigation, if any.
    pub from: Option<String>,
    /// Path after the navigation.
    pub to: String,
}

/// Callback notified on every navigation.
pub type RouteHandler = Rc<dyn Fn(&RouteChange)>;

/// Handle returned by [`Router::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteToken(pub u64);

/// Contract every router implementation fulfils.
pub trait Router {
    /// Start listening to the platform's navigation source.
    fn init(&self);
    /// Stop listening and release resources.
    fn destroy(&self);
    /// Navigate to `path`.
    fn navigate_to(&self, path: &str);
    /// Go back one entry.
    fn back(&self);
    /// Go forward one entry.
    fn forward(&self);
    /// Observe navigations.
    fn subscribe(&self, handler: RouteHandler) -> RouteToken;
    /// Stop observing.
    fn unsubscribe(&self, token: RouteToken);
}

/// Router that does nothing. Used when the application has none.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRouter;

impl Router for NoopRouter {
    fn init(&self) {}

    fn destroy(&self) {}

    fn navigate_to(&self, _path: &str) {}

    fn back(&self) {}

    fn forward(&self) {}

    fn subscribe(&self, _handler: RouteHandler) -> RouteToken {
        RouteToken(0)
    }

    fn unsubscribe(&self, _token: RouteToken) {}
}
