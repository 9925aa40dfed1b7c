#![forbid(unsafe_code)]

//! Virtual node model.
//!
//! A [`VNode`] is a lightweight description of a piece of UI. Once mounted it
//! also carries a back-reference to the platform node it produced (`el`),
//! the listeners it registered and, for components, the live instance.
//! Those runtime fields are private to the engine; cloning a vnode always
//! yields an unmounted description.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use betal_core::{ListenerId, NodeId, class_tokens};
use serde_json::Value;

use crate::component::{ComponentDef, ComponentHandle};
use crate::error::HookResult;

/// Component props and state: a string-keyed map of JSON values.
pub type PropMap = BTreeMap<String, Value>;

/// Event handler attached through [`Props::on`].
///
/// The first argument is the component that owns the handler: the host
/// component of the template for DOM listeners, the parent for component
/// events. It is `None` for listeners mounted outside any component.
///
/// Handlers compare by identity: re-rendering with a clone of the same
/// `Handler` keeps the registered listener, a fresh closure replaces it.
#[derive(Clone)]
pub struct Handler(Rc<dyn Fn(Option<&ComponentHandle>, &Value) -> HookResult>);

impl Handler {
    /// Wrap a closure.
    pub fn new(f: impl Fn(Option<&ComponentHandle>, &Value) -> HookResult + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invoke the handler.
    pub fn call(&self, this: Option<&ComponentHandle>, payload: &Value) -> HookResult {
        (self.0)(this, payload)
    }

    /// Whether both handles wrap the same closure.
    pub fn ptr_eq(&self, other: &Handler) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({:p})", Rc::as_ptr(&self.0))
    }
}

/// Class specification: a whitespace separated string or a list of names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassList {
    /// `"btn primary"`
    Text(String),
    /// `["btn", "primary"]`
    List(Vec<String>),
}

impl ClassList {
    /// Non-blank class tokens.
    pub fn tokens(&self) -> Vec<String> {
        match self {
            Self::Text(text) => class_tokens(text),
            Self::List(list) => list
                .iter()
                .map(|class| class.trim())
                .filter(|class| !class.is_empty())
                .map(str::to_owned)
                .collect(),
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Self::Text(text) => Value::String(text.clone()),
            Self::List(list) => Value::Array(list.iter().cloned().map(Value::String).collect()),
        }
    }
}

impl From<&str> for ClassList {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for ClassList {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<String>> for ClassList {
    fn from(list: Vec<String>) -> Self {
        Self::List(list)
    }
}

impl From<Vec<&str>> for ClassList {
    fn from(list: Vec<&str>) -> Self {
        Self::List(list.into_iter().map(str::to_owned).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ClassList {
    fn from(list: [&str; N]) -> Self {
        Self::List(list.into_iter().map(str::to_owned).collect())
    }
}

/// Properties of an element or component vnode.
///
/// ```
/// use betal_runtime::Props;
/// use serde_json::json;
///
/// let props = Props::new()
///     .key("row-1")
///     .class("row selected")
///     .style("color", "red")
///     .attr("data-id", json!(1));
/// assert_eq!(props.key.as_deref(), Some("row-1"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Props {
    /// Sibling identity used by the keyed diff. Never reaches the platform.
    pub key: Option<String>,
    /// Attributes and properties.
    pub attrs: PropMap,
    /// Class specification.
    pub class: Option<ClassList>,
    /// Inline style properties.
    pub style: BTreeMap<String, String>,
    /// Event handlers by event name.
    pub on: BTreeMap<String, Handler>,
}

impl Props {
    /// Empty props.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sibling key.
    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set an attribute. `null` values are treated as absent.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Set the class specification.
    #[must_use]
    pub fn class(mut self, class: impl Into<ClassList>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Set an inline style property.
    #[must_use]
    pub fn style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.insert(property.into(), value.into());
        self
    }

    /// Attach a fresh handler for `event`.
    #[must_use]
    pub fn on(
        self,
        event: impl Into<String>,
        f: impl Fn(Option<&ComponentHandle>, &Value) -> HookResult + 'static,
    ) -> Self {
        self.handler(event, Handler::new(f))
    }

    /// Attach an existing handler for `event`, keeping its identity.
    #[must_use]
    pub fn handler(mut self, event: impl Into<String>, handler: Handler) -> Self {
        self.on.insert(event.into(), handler);
        self
    }

    /// The props a component instance receives: attributes plus `class` and
    /// `style` when set. `key` and `on` are consumed by the runtime.
    pub fn component_props(&self) -> PropMap {
        let mut props = self.attrs.clone();
        if let Some(class) = &self.class {
            props.insert("class".to_owned(), class.to_value());
        }
        if !self.style.is_empty() {
            let style = self
                .style
                .iter()
                .map(|(name, value)| (name.clone(), Value::String(value.clone())))
                .collect();
            props.insert("style".to_owned(), Value::Object(style));
        }
        props
    }
}

impl From<PropMap> for Props {
    fn from(attrs: PropMap) -> Self {
        Self {
            attrs,
            ..Self::default()
        }
    }
}

/// A text vnode.
#[derive(Debug)]
pub struct TextNode {
    /// Text content.
    pub value: String,
    pub(crate) el: Option<NodeId>,
}

/// An element vnode.
#[derive(Debug)]
pub struct ElementNode {
    /// Tag name.
    pub tag: String,
    /// Attributes, classes, styles, handlers and key.
    pub props: Props,
    /// Child vnodes.
    pub children: Vec<VNode>,
    pub(crate) el: Option<NodeId>,
    pub(crate) listeners: BTreeMap<String, ListenerId>,
}

/// A fragment vnode: children without a wrapper node.
///
/// When mounted, `el` is the parent the children were inserted into.
#[derive(Debug)]
pub struct FragmentNode {
    /// Child vnodes.
    pub children: Vec<VNode>,
    pub(crate) el: Option<NodeId>,
}

/// A component vnode.
#[derive(Debug)]
pub struct ComponentNode {
    /// Component definition.
    pub def: ComponentDef,
    /// Props, key and parent handlers.
    pub props: Props,
    /// External content projected into the component's slots.
    pub children: Vec<VNode>,
    pub(crate) el: Option<NodeId>,
    pub(crate) instance: Option<ComponentHandle>,
}

/// A slot placeholder. Only valid inside a component template; it is
/// replaced before mounting.
#[derive(Debug)]
pub struct SlotNode {
    /// Default content used when the component received no external content.
    pub children: Vec<VNode>,
}

/// A virtual node.
#[derive(Debug)]
pub enum VNode {
    /// Text.
    Text(TextNode),
    /// Element.
    Element(ElementNode),
    /// Fragment.
    Fragment(FragmentNode),
    /// Component.
    Component(ComponentNode),
    /// Slot placeholder.
    Slot(SlotNode),
}

impl Clone for TextNode {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            el: None,
        }
    }
}

impl Clone for ElementNode {
    fn clone(&self) -> Self {
        Self {
            tag: self.tag.clone(),
            props: self.props.clone(),
            children: self.children.clone(),
            el: None,
            listeners: BTreeMap::new(),
        }
    }
}

impl Clone for FragmentNode {
    fn clone(&self) -> Self {
        Self {
            children: self.children.clone(),
            el: None,
        }
    }
}

impl Clone for ComponentNode {
    fn clone(&self) -> Self {
        Self {
            def: self.def.clone(),
            props: self.props.clone(),
            children: self.children.clone(),
            el: None,
            instance: None,
        }
    }
}

impl Clone for SlotNode {
    fn clone(&self) -> Self {
        Self {
            children: self.children.clone(),
        }
    }
}

impl Clone for VNode {
    fn clone(&self) -> Self {
        match self {
            Self::Text(node) => Self::Text(node.clone()),
            Self::Element(node) => Self::Element(node.clone()),
            Self::Fragment(node) => Self::Fragment(node.clone()),
            Self::Component(node) => Self::Component(node.clone()),
            Self::Slot(node) => Self::Slot(node.clone()),
        }
    }
}

impl VNode {
    /// Lowercase kind name, as used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Element(_) => "element",
            Self::Fragment(_) => "fragment",
            Self::Component(_) => "component",
            Self::Slot(_) => "slot",
        }
    }

    /// Platform node this vnode is attached to, if mounted.
    ///
    /// For fragments this is the parent node; for components, the first
    /// element of the rendered tree at the time it was last mounted or
    /// patched.
    pub fn el(&self) -> Option<NodeId> {
        match self {
            Self::Text(node) => node.el,
            Self::Element(node) => node.el,
            Self::Fragment(node) => node.el,
            Self::Component(node) => node.el,
            Self::Slot(_) => None,
        }
    }

    /// Sibling key, for elements and components.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Element(node) => node.props.key.as_deref(),
            Self::Component(node) => node.props.key.as_deref(),
            _ => None,
        }
    }

    /// Child vnodes; empty for text.
    pub fn children(&self) -> &[VNode] {
        match self {
            Self::Element(node) => &node.children,
            Self::Fragment(node) => &node.children,
            Self::Component(node) => &node.children,
            Self::Slot(node) => &node.children,
            Self::Text(_) => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<VNode>> {
        match self {
            Self::Element(node) => Some(&mut node.children),
            Self::Fragment(node) => Some(&mut node.children),
            Self::Slot(node) => Some(&mut node.children),
            Self::Text(_) | Self::Component(_) => None,
        }
    }

    /// Live component instance, for mounted component vnodes.
    pub fn component(&self) -> Option<&ComponentHandle> {
        match self {
            Self::Component(node) => node.instance.as_ref(),
            _ => None,
        }
    }

    /// Whether two vnodes can occupy the same position without a remount:
    /// same kind, and for elements the same tag and key, for components the
    /// same definition and key.
    pub fn same_slot(&self, other: &VNode) -> bool {
        match (self, other) {
            (Self::Element(a), Self::Element(b)) => a.tag == b.tag && a.props.key == b.props.key,
            (Self::Component(a), Self::Component(b)) => {
                a.def.ptr_eq(&b.def) && a.props.key == b.props.key
            }
            (Self::Text(_), Self::Text(_))
            | (Self::Fragment(_), Self::Fragment(_))
            | (Self::Slot(_), Self::Slot(_)) => true,
            _ => false,
        }
    }
}

impl From<&str> for VNode {
    fn from(value: &str) -> Self {
        crate::h::text(value)
    }
}

impl From<String> for VNode {
    fn from(value: String) -> Self {
        crate::h::text(value)
    }
}

/// Children flattened through fragments, in document order.
pub fn flatten_children(children: &[VNode]) -> Vec<&VNode> {
    let mut out = Vec::with_capacity(children.len());
    collect(children, &mut out);
    out
}

fn collect<'a>(children: &'a [VNode], out: &mut Vec<&'a VNode>) {
    for child in children {
        match child {
            VNode::Fragment(fragment) => collect(&fragment.children, out),
            other => out.push(other),
        }
    }
}

/// Mutable flattening; nested fragments are marked as living in `parent`.
pub(crate) fn flatten_children_mut(children: &mut [VNode], parent: NodeId) -> Vec<&mut VNode> {
    let mut out = Vec::with_capacity(children.len());
    collect_mut(children, parent, &mut out);
    out
}

fn collect_mut<'a>(children: &'a mut [VNode], parent: NodeId, out: &mut Vec<&'a mut VNode>) {
    for child in children.iter_mut() {
        match child {
            VNode::Fragment(fragment) => {
                fragment.el = Some(parent);
                collect_mut(&mut fragment.children, parent, out);
            }
            other => out.push(other),
        }
    }
}

/// Owning flattening.
pub(crate) fn flatten_children_owned(children: Vec<VNode>) -> Vec<VNode> {
    let mut out = Vec::with_capacity(children.len());
    collect_owned(children, &mut out);
    out
}

fn collect_owned(children: Vec<VNode>, out: &mut Vec<VNode>) {
    for child in children {
        match child {
            VNode::Fragment(fragment) => collect_owned(fragment.children, out),
            other => out.push(other),
        }
    }
}

/// Platform nodes a mounted vnode contributes to its parent, in order.
pub fn dom_nodes(vnode: &VNode) -> Vec<NodeId> {
    match vnode {
        VNode::Text(node) => node.el.into_iter().collect(),
        VNode::Element(node) => node.el.into_iter().collect(),
        VNode::Fragment(node) => flatten_children(&node.children)
            .into_iter()
            .flat_map(dom_nodes)
            .collect(),
        VNode::Component(node) => node
            .instance
            .as_ref()
            .map(ComponentHandle::elements)
            .unwrap_or_default(),
        VNode::Slot(_) => Vec::new(),
    }
}
