#![forbid(unsafe_code)]

//! `betal-headless` provides a deterministic in-memory platform for betal.
//!
//! Design goals:
//! - **Host-driven microtasks**: queued microtasks only run when the host
//!   calls [`MemoryDom::run_microtasks`] or fires an event, never behind its
//!   back.
//! - **Inspectable**: every node, attribute, class, style and listener can be
//!   queried, and subtrees render to HTML or a serializable snapshot.
//! - **No threads, no browser**: suitable for unit tests and embedders.
//!
//! # Example
//!
//! ```
//! use betal_core::Platform;
//! use betal_headless::MemoryDom;
//!
//! let dom = MemoryDom::new();
//! let root = dom.create_root();
//! let p = dom.create_element_node("p");
//! let text = dom.create_text_node("hi");
//! dom.insert_node(text, p, None);
//! dom.insert_node(p, root, None);
//! assert_eq!(dom.to_html(root), "<root><p>hi</p></root>");
//! ```

pub mod snapshot;

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use betal_core::platform::{EventCallback, ListenerId, Microtask, NodeId, Platform};
use serde_json::Value;

pub use snapshot::NodeSnapshot;

/// Headless adapter error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadlessError {
    /// The node id was never handed out by this adapter.
    UnknownNode(NodeId),
}

impl core::fmt::Display for HeadlessError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnknownNode(node) => write!(f, "unknown node: {node}"),
        }
    }
}

impl std::error::Error for HeadlessError {}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeKind {
    Element(String),
    Text(String),
}

struct Listener {
    id: ListenerId,
    event: String,
    callback: EventCallback,
}

struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: BTreeMap<String, String>,
    properties: BTreeMap<String, Value>,
    classes: Vec<String>,
    style: BTreeMap<String, String>,
    listeners: Vec<Listener>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            attributes: BTreeMap::new(),
            properties: BTreeMap::new(),
            classes: Vec::new(),
            style: BTreeMap::new(),
            listeners: Vec::new(),
        }
    }
}

/// Arena-backed presentation tree implementing [`Platform`].
///
/// Removed nodes stay in the arena (detached), the way a real document keeps
/// nodes alive while something references them.
pub struct MemoryDom {
    nodes: RefCell<Vec<NodeData>>,
    next_listener: Cell<u64>,
    microtasks: RefCell<VecDeque<Microtask>>,
}

impl MemoryDom {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            nodes: RefCell::new(Vec::new()),
            next_listener: Cell::new(1),
            microtasks: RefCell::new(VecDeque::new()),
        })
    }

    /// Create a detached `<root>` element to mount applications into.
    pub fn create_root(&self) -> NodeId {
        self.create_element_node("root")
    }

    fn alloc(&self, kind: NodeKind) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(NodeData::new(kind));
        NodeId((nodes.len() - 1) as u64)
    }

    fn with_node<R>(&self, node: NodeId, f: impl FnOnce(&NodeData) -> R) -> Option<R> {
        let nodes = self.nodes.borrow();
        nodes.get(node.0 as usize).map(f)
    }

    fn with_node_mut<R>(&self, node: NodeId, f: impl FnOnce(&mut NodeData) -> R) -> Option<R> {
        let mut nodes = self.nodes.borrow_mut();
        nodes.get_mut(node.0 as usize).map(f)
    }

    fn detach(nodes: &mut [NodeData], node: NodeId) {
        let Some(parent) = nodes.get(node.0 as usize).and_then(|n| n.parent) else {
            return;
        };
        if let Some(parent_data) = nodes.get_mut(parent.0 as usize) {
            parent_data.children.retain(|child| *child != node);
        }
        if let Some(data) = nodes.get_mut(node.0 as usize) {
            data.parent = None;
        }
    }

    // --- Inspection -------------------------------------------------------

    /// Tag name of an element node.
    pub fn tag(&self, node: NodeId) -> Option<String> {
        self.with_node(node, |data| match &data.kind {
            NodeKind::Element(tag) => Some(tag.clone()),
            NodeKind::Text(_) => None,
        })
        .flatten()
    }

    /// Content of a text node.
    pub fn text(&self, node: NodeId) -> Option<String> {
        self.with_node(node, |data| match &data.kind {
            NodeKind::Text(value) => Some(value.clone()),
            NodeKind::Element(_) => None,
        })
        .flatten()
    }

    /// Concatenated text of a subtree.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        if let Some(value) = self.text(node) {
            out.push_str(&value);
        }
        for child in self.child_nodes(node) {
            self.collect_text(child, out);
        }
    }

    /// Parent of `node`, if attached.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.with_node(node, |data| data.parent).flatten()
    }

    /// Whether `node` currently has a parent.
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.parent(node).is_some()
    }

    /// String attribute value.
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.with_node(node, |data| data.attributes.get(name).cloned())
            .flatten()
    }

    /// Direct property value.
    pub fn property(&self, node: NodeId, name: &str) -> Option<Value> {
        self.with_node(node, |data| data.properties.get(name).cloned())
            .flatten()
    }

    /// Class tokens in insertion order.
    pub fn classes(&self, node: NodeId) -> Vec<String> {
        self.with_node(node, |data| data.classes.clone())
            .unwrap_or_default()
    }

    /// Inline style property.
    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.with_node(node, |data| data.style.get(property).cloned())
            .flatten()
    }

    /// Listeners registered on `node`.
    pub fn listeners_on(&self, node: NodeId) -> usize {
        self.with_node(node, |data| data.listeners.len())
            .unwrap_or(0)
    }

    /// Listeners registered anywhere in the document, attached or not.
    pub fn listener_count(&self) -> usize {
        self.nodes
            .borrow()
            .iter()
            .map(|data| data.listeners.len())
            .sum()
    }

    /// Number of nodes ever created.
    pub fn node_count(&self) -> usize {
        self.nodes.borrow().len()
    }

    /// Number of nodes in the subtree below `node` (excluding `node`).
    pub fn descendant_count(&self, node: NodeId) -> usize {
        self.child_nodes(node)
            .into_iter()
            .map(|child| 1 + self.descendant_count(child))
            .sum()
    }

    /// Serialize a subtree as HTML. Properties are rendered like attributes.
    pub fn to_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_html(node, &mut out);
        out
    }

    fn write_html(&self, node: NodeId, out: &mut String) {
        let Some((kind, attrs, classes, style)) = self.with_node(node, |data| {
            let mut attrs: BTreeMap<String, String> = data.attributes.clone();
            for (name, value) in &data.properties {
                attrs.insert(name.clone(), property_text(value));
            }
            (
                data.kind.clone(),
                attrs,
                data.classes.clone(),
                data.style.clone(),
            )
        }) else {
            return;
        };

        match kind {
            NodeKind::Text(value) => out.push_str(&escape(&value)),
            NodeKind::Element(tag) => {
                out.push('<');
                out.push_str(&tag);
                for (name, value) in attrs {
                    out.push_str(&format!(" {name}=\"{}\"", escape(&value)));
                }
                if !classes.is_empty() {
                    out.push_str(&format!(" class=\"{}\"", classes.join(" ")));
                }
                if !style.is_empty() {
                    let css: Vec<String> = style.iter().map(|(k, v)| format!("{k}: {v};")).collect();
                    out.push_str(&format!(" style=\"{}\"", css.join(" ")));
                }
                out.push('>');
                for child in self.child_nodes(node) {
                    self.write_html(child, out);
                }
                out.push_str(&format!("</{tag}>"));
            }
        }
    }

    /// Structured snapshot of a subtree.
    pub fn snapshot(&self, node: NodeId) -> Result<NodeSnapshot, HeadlessError> {
        let (kind, attributes, properties, classes, style) = self
            .with_node(node, |data| {
                (
                    data.kind.clone(),
                    data.attributes.clone(),
                    data.properties.clone(),
                    data.classes.clone(),
                    data.style.clone(),
                )
            })
            .ok_or(HeadlessError::UnknownNode(node))?;

        let children = self
            .child_nodes(node)
            .into_iter()
            .map(|child| self.snapshot(child))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(match kind {
            NodeKind::Text(text) => NodeSnapshot::Text { text },
            NodeKind::Element(tag) => NodeSnapshot::Element {
                tag,
                attributes,
                properties,
                classes,
                style,
                children,
            },
        })
    }

    // --- Host driving -----------------------------------------------------

    /// Fire `event` on `node`, the way a browser task would.
    ///
    /// Each listener runs in registration order and the microtask queue is
    /// drained after every listener. Returns the number of listeners invoked.
    pub fn dispatch_event(&self, node: NodeId, event: &str, payload: Value) -> usize {
        let callbacks: Vec<EventCallback> = self
            .with_node(node, |data| {
                data.listeners
                    .iter()
                    .filter(|listener| listener.event == event)
                    .map(|listener| Rc::clone(&listener.callback))
                    .collect()
            })
            .unwrap_or_default();

        for callback in &callbacks {
            callback(&payload);
            self.run_microtasks();
        }
        callbacks.len()
    }

    /// Run queued microtasks, including ones queued while draining.
    ///
    /// Returns the number of tasks run.
    pub fn run_microtasks(&self) -> usize {
        let mut ran = 0;
        loop {
            let task = self.microtasks.borrow_mut().pop_front();
            let Some(task) = task else {
                break;
            };
            task();
            ran += 1;
        }
        ran
    }

    /// Microtasks waiting to run.
    pub fn pending_microtasks(&self) -> usize {
        self.microtasks.borrow().len()
    }
}

fn property_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl Platform for MemoryDom {
    fn create_text_node(&self, value: &str) -> NodeId {
        self.alloc(NodeKind::Text(value.to_owned()))
    }

    fn create_element_node(&self, tag: &str) -> NodeId {
        self.alloc(NodeKind::Element(tag.to_owned()))
    }

    fn set_text_content(&self, node: NodeId, value: &str) {
        self.with_node_mut(node, |data| {
            if let NodeKind::Text(text) = &mut data.kind {
                *text = value.to_owned();
            }
        });
    }

    fn insert_node(&self, node: NodeId, parent: NodeId, index: Option<usize>) {
        let mut nodes = self.nodes.borrow_mut();
        let Some(parent_data) = nodes.get(parent.0 as usize) else {
            return;
        };
        let reference = index.and_then(|i| parent_data.children.get(i).copied());
        if reference == Some(node) {
            return;
        }

        Self::detach(&mut nodes, node);

        let parent_data = &mut nodes[parent.0 as usize];
        match reference.and_then(|r| parent_data.children.iter().position(|c| *c == r)) {
            Some(position) => parent_data.children.insert(position, node),
            None => parent_data.children.push(node),
        }
        if let Some(data) = nodes.get_mut(node.0 as usize) {
            data.parent = Some(parent);
        }
    }

    fn remove_node(&self, node: NodeId) {
        Self::detach(&mut self.nodes.borrow_mut(), node);
    }

    fn child_nodes(&self, parent: NodeId) -> Vec<NodeId> {
        self.with_node(parent, |data| data.children.clone())
            .unwrap_or_default()
    }

    fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        self.with_node_mut(node, |data| {
            data.attributes.insert(name.to_owned(), value.to_owned());
        });
    }

    fn remove_attribute(&self, node: NodeId, name: &str) {
        self.with_node_mut(node, |data| {
            data.attributes.remove(name);
        });
    }

    fn set_property(&self, node: NodeId, name: &str, value: &Value) {
        self.with_node_mut(node, |data| {
            data.properties.insert(name.to_owned(), value.clone());
        });
    }

    fn remove_property(&self, node: NodeId, name: &str) {
        self.with_node_mut(node, |data| {
            data.properties.remove(name);
        });
    }

    fn add_class(&self, node: NodeId, class: &str) {
        self.with_node_mut(node, |data| {
            if !data.classes.iter().any(|c| c == class) {
                data.classes.push(class.to_owned());
            }
        });
    }

    fn remove_class(&self, node: NodeId, class: &str) {
        self.with_node_mut(node, |data| data.classes.retain(|c| c != class));
    }

    fn set_style_property(&self, node: NodeId, property: &str, value: &str) {
        self.with_node_mut(node, |data| {
            data.style.insert(property.to_owned(), value.to_owned());
        });
    }

    fn remove_style_property(&self, node: NodeId, property: &str) {
        self.with_node_mut(node, |data| {
            data.style.remove(property);
        });
    }

    fn add_event_listener(
        &self,
        node: NodeId,
        event: &str,
        callback: EventCallback,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.with_node_mut(node, |data| {
            data.listeners.push(Listener {
                id,
                event: event.to_owned(),
                callback,
            });
        });
        id
    }

    fn remove_event_listener(&self, node: NodeId, event: &str, listener: ListenerId) {
        self.with_node_mut(node, |data| {
            data.listeners
                .retain(|l| !(l.id == listener && l.event == event));
        });
    }

    fn queue_microtask(&self, task: Microtask) {
        self.microtasks.borrow_mut().push_back(task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn element(dom: &MemoryDom, tag: &str, parent: NodeId) -> NodeId {
        let node = dom.create_element_node(tag);
        dom.insert_node(node, parent, None);
        node
    }

    #[test]
    fn insert_at_index_and_append() {
        let dom = MemoryDom::new();
        let root = dom.create_root();
        let a = element(&dom, "a", root);
        let c = element(&dom, "c", root);
        let b = dom.create_element_node("b");
        dom.insert_node(b, root, Some(1));
        assert_eq!(dom.child_nodes(root), vec![a, b, c]);

        let d = dom.create_element_node("d");
        dom.insert_node(d, root, Some(99));
        assert_eq!(dom.child_nodes(root), vec![a, b, c, d]);
    }

    #[test]
    fn moving_resolves_reference_before_detaching() {
        let dom = MemoryDom::new();
        let root = dom.create_root();
        let a = element(&dom, "a", root);
        let b = element(&dom, "b", root);
        let c = element(&dom, "c", root);

        // Move c to the front.
        dom.insert_node(c, root, Some(0));
        assert_eq!(dom.child_nodes(root), vec![c, a, b]);

        // Moving onto its own slot changes nothing.
        dom.insert_node(a, root, Some(1));
        assert_eq!(dom.child_nodes(root), vec![c, a, b]);

        // Move a forward: reference is b (index 2) before detaching.
        dom.insert_node(a, root, Some(2));
        assert_eq!(dom.child_nodes(root), vec![c, a, b]);

        dom.insert_node(c, root, None);
        assert_eq!(dom.child_nodes(root), vec![a, b, c]);
    }

    #[test]
    fn remove_detaches_but_keeps_node() {
        let dom = MemoryDom::new();
        let root = dom.create_root();
        let a = element(&dom, "a", root);
        dom.remove_node(a);
        assert!(dom.child_nodes(root).is_empty());
        assert!(!dom.is_attached(a));
        assert_eq!(dom.tag(a).as_deref(), Some("a"));
    }

    #[test]
    fn html_rendering_includes_props_classes_styles() {
        let dom = MemoryDom::new();
        let root = dom.create_root();
        let div = element(&dom, "div", root);
        dom.set_attribute(div, "data-id", "7");
        dom.set_property(div, "id", &Value::from("main"));
        dom.add_class(div, "a");
        dom.add_class(div, "b");
        dom.add_class(div, "a");
        dom.set_style_property(div, "color", "red");
        let text = dom.create_text_node("x < y");
        dom.insert_node(text, div, None);

        assert_eq!(
            dom.to_html(root),
            "<root><div data-id=\"7\" id=\"main\" class=\"a b\" style=\"color: red;\">x &lt; y</div></root>"
        );
    }

    #[test]
    fn dispatch_runs_listeners_then_microtasks() {
        let dom = MemoryDom::new();
        let root = dom.create_root();
        let button = element(&dom, "button", root);
        let log = Rc::new(RefCell::new(Vec::new()));

        let weak = Rc::downgrade(&dom);
        let log_cb = Rc::clone(&log);
        dom.add_event_listener(
            button,
            "click",
            Rc::new(move |payload: &Value| {
                log_cb.borrow_mut().push(format!("click {payload}"));
                let log_task = Rc::clone(&log_cb);
                if let Some(dom) = weak.upgrade() {
                    dom.queue_microtask(Box::new(move || {
                        log_task.borrow_mut().push("microtask".to_owned());
                    }));
                }
            }),
        );

        assert_eq!(dom.dispatch_event(button, "click", Value::from(1)), 1);
        assert_eq!(dom.dispatch_event(button, "input", Value::Null), 0);
        assert_eq!(*log.borrow(), vec!["click 1".to_owned(), "microtask".to_owned()]);
        assert_eq!(dom.pending_microtasks(), 0);
    }

    #[test]
    fn removing_listener_by_id() {
        let dom = MemoryDom::new();
        let node = dom.create_element_node("input");
        let id = dom.add_event_listener(node, "input", Rc::new(|_: &Value| {}));
        dom.add_event_listener(node, "change", Rc::new(|_: &Value| {}));
        assert_eq!(dom.listener_count(), 2);
        dom.remove_event_listener(node, "input", id);
        assert_eq!(dom.listeners_on(node), 1);
    }

    #[test]
    fn unknown_node_snapshot_errors() {
        let dom = MemoryDom::new();
        assert_eq!(
            dom.snapshot(NodeId(42)),
            Err(HeadlessError::UnknownNode(NodeId(42)))
        );
    }
}
