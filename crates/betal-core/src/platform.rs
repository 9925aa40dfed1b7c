#![forbid(unsafe_code)]

//! Platform adapter contract.
//!
//! The reconciliation engine never touches real presentation nodes directly.
//! Everything goes through a [`Platform`] implementation, which owns the live
//! tree and hands out opaque [`NodeId`] handles.
//!
//! # Host-driven microtasks
//!
//! The runtime defers lifecycle notifications to the next microtask boundary.
//! It does not own an event loop; instead it asks the platform to run a
//! [`Microtask`] once the current synchronous work has finished. A browser
//! adapter maps this onto `queueMicrotask`, the headless adapter keeps a queue
//! the host drains explicitly.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

/// Opaque handle to a node owned by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque handle to a registered event listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Callback invoked by the platform when a listened-to event fires.
///
/// The payload is the event detail as a JSON value.
pub type EventCallback = Rc<dyn Fn(&Value)>;

/// A deferred zero-argument task run at the microtask boundary.
pub type Microtask = Box<dyn FnOnce()>;

/// Attribute names with this prefix go through the string attribute path;
/// everything else is assigned as a direct node property.
pub const DATA_ATTRIBUTE_PREFIX: &str = "data-";

/// Primitive operations a presentation backend must provide.
///
/// All methods take `&self`: adapters are shared through `Rc` and use
/// interior mutability, since callbacks they invoke re-enter the runtime.
pub trait Platform {
    /// Create a detached text node.
    fn create_text_node(&self, value: &str) -> NodeId;

    /// Create a detached element node for `tag`.
    fn create_element_node(&self, tag: &str) -> NodeId;

    /// Replace the text content of a text node.
    fn set_text_content(&self, node: NodeId, value: &str);

    /// Insert `node` into `parent` before the child currently at `index`.
    ///
    /// `None`, or an index at or past the end, appends. If `node` is already
    /// attached it is moved; the reference child is resolved before the node
    /// is detached, so moving a node onto its own position is a no-op.
    fn insert_node(&self, node: NodeId, parent: NodeId, index: Option<usize>);

    /// Detach `node` from its parent, if any.
    fn remove_node(&self, node: NodeId);

    /// Current children of `parent`, in order.
    fn child_nodes(&self, parent: NodeId) -> Vec<NodeId>;

    /// Set a string attribute (the `data-*` path).
    fn set_attribute(&self, node: NodeId, name: &str, value: &str);

    /// Remove a string attribute.
    fn remove_attribute(&self, node: NodeId, name: &str);

    /// Assign a direct node property such as `value`, `checked` or `disabled`.
    fn set_property(&self, node: NodeId, name: &str, value: &Value);

    /// Clear a direct node property.
    fn remove_property(&self, node: NodeId, name: &str);

    /// Add a class token.
    fn add_class(&self, node: NodeId, class: &str);

    /// Remove a class token.
    fn remove_class(&self, node: NodeId, class: &str);

    /// Set an inline style property.
    fn set_style_property(&self, node: NodeId, property: &str, value: &str);

    /// Clear an inline style property.
    fn remove_style_property(&self, node: NodeId, property: &str);

    /// Register a listener for `event` on `node`.
    fn add_event_listener(&self, node: NodeId, event: &str, callback: EventCallback)
    -> ListenerId;

    /// Unregister a listener previously returned by [`Platform::add_event_listener`].
    fn remove_event_listener(&self, node: NodeId, event: &str, listener: ListenerId);

    /// Run `task` at the next microtask boundary.
    fn queue_microtask(&self, task: Microtask);
}
