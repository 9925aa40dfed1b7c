#![forbid(unsafe_code)]

//! Named command bus.
//!
//! Components use a [`Dispatcher`] to emit events to their parent's handlers.
//! Handlers are compared by identity, so subscribing the same `Rc` twice
//! registers it once.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

/// Handler for a named command.
pub type CommandHandler<P> = Rc<dyn Fn(&P)>;

/// Hook run after every dispatched command.
pub type AfterCommandHandler = Rc<dyn Fn()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SubId(u64);

struct Registry<P> {
    next_id: u64,
    commands: HashMap<String, Vec<(SubId, CommandHandler<P>)>>,
    after: Vec<(SubId, AfterCommandHandler)>,
}

impl<P> Registry<P> {
    fn next_id(&mut self) -> SubId {
        self.next_id += 1;
        SubId(self.next_id)
    }
}

/// Canceller returned by [`Dispatcher::subscribe`] and
/// [`Dispatcher::after_every_command`].
///
/// Dropping a subscription leaves the handler registered; call
/// [`Subscription::cancel`] to remove it.
#[must_use = "keep the subscription to be able to cancel it"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// A canceller that does nothing.
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    /// Whether cancelling this subscription has no effect.
    pub fn is_noop(&self) -> bool {
        self.cancel.is_none()
    }

    /// Unregister the handler. Safe to call after the dispatcher is gone.
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("noop", &self.is_noop())
            .finish()
    }
}

/// Command bus keyed by command name.
pub struct Dispatcher<P> {
    registry: Rc<RefCell<Registry<P>>>,
    warn_unhandled: bool,
}

impl<P: 'static> Default for Dispatcher<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: 'static> Dispatcher<P> {
    /// Create an empty dispatcher that warns about unhandled commands.
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                commands: HashMap::new(),
                after: Vec::new(),
            })),
            warn_unhandled: true,
        }
    }

    /// Toggle the warning logged when a command has no handlers.
    #[must_use]
    pub fn with_unhandled_warnings(mut self, enabled: bool) -> Self {
        self.warn_unhandled = enabled;
        self
    }

    /// Register `handler` for `command`.
    ///
    /// Registering a handler that is already subscribed to `command` returns
    /// a no-op canceller and keeps the original registration.
    pub fn subscribe(&self, command: &str, handler: CommandHandler<P>) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id();
        let handlers = registry.commands.entry(command.to_owned()).or_default();
        if handlers
            .iter()
            .any(|(_, existing)| std::ptr::addr_eq(Rc::as_ptr(existing), Rc::as_ptr(&handler)))
        {
            return Subscription::noop();
        }
        handlers.push((id, handler));

        let weak: Weak<RefCell<Registry<P>>> = Rc::downgrade(&self.registry);
        let command = command.to_owned();
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(registry) = weak.upgrade() {
                    if let Some(handlers) = registry.borrow_mut().commands.get_mut(&command) {
                        handlers.retain(|(sub, _)| *sub != id);
                    }
                }
            })),
        }
    }

    /// Register a hook run after every dispatch, handled or not.
    pub fn after_every_command(&self, handler: AfterCommandHandler) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id();
        registry.after.push((id, handler));

        let weak = Rc::downgrade(&self.registry);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(registry) = weak.upgrade() {
                    registry.borrow_mut().after.retain(|(sub, _)| *sub != id);
                }
            })),
        }
    }

    /// Run every handler for `command` in registration order, then every
    /// after-command hook.
    ///
    /// Handlers may subscribe, cancel or dispatch re-entrantly; the handler
    /// lists are snapshotted before anything runs.
    pub fn dispatch(&self, command: &str, payload: &P) {
        let handlers: Vec<CommandHandler<P>> = self
            .registry
            .borrow()
            .commands
            .get(command)
            .map(|handlers| handlers.iter().map(|(_, h)| Rc::clone(h)).collect())
            .unwrap_or_default();

        if handlers.is_empty() {
            if self.warn_unhandled {
                tracing::warn!(command, "no handlers for command");
            }
        } else {
            for handler in &handlers {
                handler(payload);
            }
        }

        let after: Vec<AfterCommandHandler> = self
            .registry
            .borrow()
            .after
            .iter()
            .map(|(_, h)| Rc::clone(h))
            .collect();
        for hook in &after {
            hook();
        }
    }

    /// Number of handlers registered for `command`.
    pub fn handler_count(&self, command: &str) -> usize {
        self.registry
            .borrow()
            .commands
            .get(command)
            .map_or(0, Vec::len)
    }
}

impl<P> fmt::Debug for Dispatcher<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.borrow();
        f.debug_struct("Dispatcher")
            .field("commands", &registry.commands.len())
            .field("after", &registry.after.len())
            .finish()
    }
}
