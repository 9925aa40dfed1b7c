#![forbid(unsafe_code)]

//! Runtime error types.
//!
//! [`RuntimeError`] covers structural bugs and lifecycle misuse; these are
//! fatal for the operation that hit them and are returned to the caller.
//! [`HookError`] is what lifecycle hooks, event handlers and custom methods
//! report; the runtime logs those instead of propagating them.

use std::fmt;

/// Fatal runtime errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// A vnode kind that cannot take part in the operation (an unprojected
    /// slot reaching mount, destroy or patch).
    UnsupportedNode {
        /// Kind of the offending vnode.
        kind: &'static str,
        /// Operation that was attempted.
        op: &'static str,
    },
    /// The vnode has no platform node: it was never mounted or was already
    /// destroyed.
    Detached {
        /// Kind of the offending vnode.
        kind: &'static str,
    },
    /// `mount` called on a component that is already mounted.
    ComponentAlreadyMounted(String),
    /// A mutation on a component that is not mounted (yet or anymore).
    ComponentNotMounted(String),
    /// `mount` called on a component that has been unmounted.
    ComponentDestroyed(String),
    /// A custom method name collides with a runtime method.
    ReservedMethod(String),
    /// The same custom method name was registered twice.
    DuplicateMethod(String),
    /// `call` with a method name the definition does not provide.
    UnknownMethod(String),
    /// The application is already mounted.
    AppAlreadyMounted,
    /// The application is not mounted.
    AppNotMounted,
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedNode { kind, op } => write!(f, "can't {op} vnode of type: {kind}"),
            Self::Detached { kind } => write!(f, "{kind} vnode is not mounted"),
            Self::ComponentAlreadyMounted(name) => {
                write!(f, "component {name} is already mounted")
            }
            Self::ComponentNotMounted(name) => write!(f, "component {name} is not mounted"),
            Self::ComponentDestroyed(name) => {
                write!(f, "component {name} was unmounted and can't be mounted again")
            }
            Self::ReservedMethod(name) => {
                write!(f, "method \"{name}()\" already exists in the component")
            }
            Self::DuplicateMethod(name) => write!(f, "method \"{name}()\" registered twice"),
            Self::UnknownMethod(name) => write!(f, "component has no method \"{name}()\""),
            Self::AppAlreadyMounted => write!(f, "the application is already mounted"),
            Self::AppNotMounted => write!(f, "the application is not mounted"),
        }
    }
}

impl std::error::Error for RuntimeError {}

/// Failure reported by user code: hooks, handlers and custom methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookError {
    message: String,
}

impl HookError {
    /// Create an error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for HookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for HookError {}

impl From<RuntimeError> for HookError {
    fn from(err: RuntimeError) -> Self {
        Self::new(err.to_string())
    }
}

impl From<&str> for HookError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for HookError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

/// Result of a lifecycle hook or event handler.
pub type HookResult = Result<(), HookError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_culprit() {
        let err = RuntimeError::UnsupportedNode {
            kind: "slot",
            op: "mount",
        };
        assert_eq!(err.to_string(), "can't mount vnode of type: slot");
        assert_eq!(
            RuntimeError::ReservedMethod("render".into()).to_string(),
            "method \"render()\" already exists in the component"
        );
    }

    #[test]
    fn runtime_errors_convert_into_hook_errors() {
        let hook: HookError = RuntimeError::AppNotMounted.into();
        assert_eq!(hook.message(), "the application is not mounted");
    }
}
