#![forbid(unsafe_code)]

//! Reconciliation engine and component runtime.
//!
//! # Role in betal
//! `betal-runtime` turns virtual node trees into platform nodes and keeps
//! them in sync. It sits on top of `betal-core` (the platform contract and
//! the keyed-list diff) and is platform agnostic: anything implementing
//! [`betal_core::Platform`] can host it, from a browser binding to the
//! in-memory tree in `betal-headless`.
//!
//! # Primary responsibilities
//! - **Virtual nodes**: [`VNode`] and the [`h`], [`text`] and [`fragment`]
//!   builders.
//! - **Mount and destroy**: [`mount`] materializes a tree, [`destroy`] tears
//!   it down, releasing every listener and nested component.
//! - **Patch**: [`patch`] reconciles two trees with minimal platform
//!   operations, reusing keyed nodes.
//! - **Components**: [`Component`], [`ComponentDef`] and live
//!   [`ComponentHandle`] instances with props, state, events and slots.
//! - **Scheduling**: lifecycle hooks are deferred to the next microtask
//!   through the [`Scheduler`].
//! - **App host**: [`App`] mounts a root component and drives the router
//!   boundary.

pub mod app;
mod attributes;
pub mod component;
pub mod config;
pub mod debug_trace;
pub mod destroy;
pub mod dispatcher;
pub mod error;
mod events;
pub mod h;
pub mod mount;
pub mod patch;
pub mod router;
pub mod runtime;
pub mod scheduler;
pub mod slots;
pub mod vnode;

pub use app::App;
pub use component::{
    Component, ComponentDef, ComponentDefBuilder, ComponentHandle, Method, Phase, RESERVED_METHODS,
    RenderCx, WeakComponentHandle,
};
pub use config::{AppOptions, RuntimeConfig};
pub use destroy::destroy;
pub use dispatcher::{AfterCommandHandler, CommandHandler, Dispatcher, Subscription};
pub use error::{HookError, HookResult, RuntimeError};
pub use h::{IntoChild, Tag, fragment, h, text};
pub use mount::mount;
pub use patch::patch;
pub use router::{NoopRouter, RouteChange, RouteHandler, RouteToken, Router};
pub use runtime::{AppContext, Runtime, SlotTracker};
pub use scheduler::{Job, Scheduler};
pub use slots::fill_slots;
pub use vnode::{
    ClassList, ComponentNode, ElementNode, FragmentNode, Handler, PropMap, Props, SlotNode,
    TextNode, VNode, dom_nodes, flatten_children,
};
