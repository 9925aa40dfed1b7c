#![forbid(unsafe_code)]

//! betal public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for users. It
//! re-exports the common types of the internal crates and offers a prelude
//! for writing components.
//!
//! ```
//! use betal::prelude::*;
//!
//! struct Greeting;
//!
//! impl Component for Greeting {
//!     fn render(&self, cx: &RenderCx<'_>) -> VNode {
//!         let name = cx.prop("name").and_then(|v| v.as_str().map(str::to_owned));
//!         h("h1", Props::new(), [format!("Hello, {}", name.unwrap_or_default())])
//!     }
//! }
//!
//! # fn main() -> betal::Result<()> {
//! let dom = MemoryDom::new();
//! let root = dom.create_root();
//! let mut app = create_app(
//!     dom.clone(),
//!     ComponentDef::new("Greeting", Greeting),
//!     props([("name", json!("betal"))]),
//! );
//! app.mount(root)?;
//! assert_eq!(dom.to_html(root), "<root><h1>Hello, betal</h1></root>");
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::rc::Rc;

// --- Core re-exports -------------------------------------------------------

pub use betal_core::{ListenerId, NodeId, Platform};

// --- Runtime re-exports ----------------------------------------------------

pub use betal_runtime::{
    App, AppContext, AppOptions, ClassList, Component, ComponentDef, ComponentHandle, Dispatcher,
    Handler, HookError, HookResult, IntoChild, NoopRouter, Phase, PropMap, Props, RenderCx,
    RouteChange, RouteHandler, RouteToken, Router, RuntimeConfig, RuntimeError, Subscription,
    VNode, fragment, h, text,
};

#[cfg(feature = "headless")]
pub use betal_headless::{MemoryDom, NodeSnapshot};

pub use serde_json::{Value, json};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for betal apps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Structural or lifecycle error raised by the runtime.
    Runtime(RuntimeError),
    /// Failure reported by a hook, handler or custom method.
    Hook(HookError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Runtime(err) => write!(f, "{err}"),
            Self::Hook(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Runtime(err) => Some(err),
            Self::Hook(err) => Some(err),
        }
    }
}

impl From<RuntimeError> for Error {
    fn from(err: RuntimeError) -> Self {
        Self::Runtime(err)
    }
}

impl From<HookError> for Error {
    fn from(err: HookError) -> Self {
        Self::Hook(err)
    }
}

/// Standard result type for betal APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Helpers --------------------------------------------------------------

/// Create an application with default options.
pub fn create_app(platform: Rc<dyn Platform>, root: ComponentDef, props: PropMap) -> App {
    App::new(platform, root, props, AppOptions::default())
}

/// Build a [`PropMap`] from key/value pairs.
pub fn props<K, I>(pairs: I) -> PropMap
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Value)>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        App, AppOptions, Component, ComponentDef, ComponentHandle, Error, Handler, HookResult,
        Platform, PropMap, Props, RenderCx, Result, Router, VNode, Value, create_app, fragment,
        h, json, props, text,
    };

    #[cfg(feature = "headless")]
    pub use crate::MemoryDom;

    pub use crate::{core, runtime};
}

pub use betal_core as core;
#[cfg(feature = "headless")]
pub use betal_headless as headless;
pub use betal_runtime as runtime;
