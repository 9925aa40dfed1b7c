#![forbid(unsafe_code)]

//! Hyperscript builders.
//!
//! ```
//! use betal_runtime::{Props, fragment, h, text};
//!
//! let list = h("ul", Props::new().class("todos"), [
//!     h("li", Props::new().key("a"), ["Buy milk"]),
//!     h("li", Props::new().key("b"), ["Walk dog"]),
//! ]);
//! let both = fragment([list, text("2 items")]);
//! assert_eq!(both.children().len(), 2);
//! ```

use std::collections::BTreeMap;

use crate::component::ComponentDef;
use crate::vnode::{ComponentNode, ElementNode, FragmentNode, Props, SlotNode, TextNode, VNode};

/// What [`h`] builds: an element by tag name, or a component.
#[derive(Debug, Clone)]
pub enum Tag {
    /// Platform element.
    Element(String),
    /// Component definition.
    Component(ComponentDef),
}

impl From<&str> for Tag {
    fn from(tag: &str) -> Self {
        Self::Element(tag.to_owned())
    }
}

impl From<String> for Tag {
    fn from(tag: String) -> Self {
        Self::Element(tag)
    }
}

impl From<ComponentDef> for Tag {
    fn from(def: ComponentDef) -> Self {
        Self::Component(def)
    }
}

impl From<&ComponentDef> for Tag {
    fn from(def: &ComponentDef) -> Self {
        Self::Component(def.clone())
    }
}

/// Anything usable as a child: vnodes, strings (wrapped as text) and
/// optional vnodes (`None` is dropped, for conditional rendering).
pub trait IntoChild {
    /// Convert into a child, or `None` to skip it.
    fn into_child(self) -> Option<VNode>;
}

impl IntoChild for VNode {
    fn into_child(self) -> Option<VNode> {
        Some(self)
    }
}

impl IntoChild for Option<VNode> {
    fn into_child(self) -> Option<VNode> {
        self
    }
}

impl IntoChild for &str {
    fn into_child(self) -> Option<VNode> {
        Some(text(self))
    }
}

impl IntoChild for String {
    fn into_child(self) -> Option<VNode> {
        Some(text(self))
    }
}

fn children<C: IntoChild>(children: impl IntoIterator<Item = C>) -> Vec<VNode> {
    children.into_iter().filter_map(IntoChild::into_child).collect()
}

/// Build an element or component vnode.
///
/// Missing children are dropped and strings become text nodes.
pub fn h<C: IntoChild>(
    tag: impl Into<Tag>,
    props: Props,
    kids: impl IntoIterator<Item = C>,
) -> VNode {
    let kids = children(kids);
    match tag.into() {
        Tag::Element(tag) => VNode::Element(ElementNode {
            tag,
            props,
            children: kids,
            el: None,
            listeners: BTreeMap::new(),
        }),
        Tag::Component(def) => VNode::Component(ComponentNode {
            def,
            props,
            children: kids,
            el: None,
            instance: None,
        }),
    }
}

/// Build a text vnode.
pub fn text(value: impl Into<String>) -> VNode {
    VNode::Text(TextNode {
        value: value.into(),
        el: None,
    })
}

/// Build a fragment vnode.
pub fn fragment<C: IntoChild>(kids: impl IntoIterator<Item = C>) -> VNode {
    VNode::Fragment(FragmentNode {
        children: children(kids),
        el: None,
    })
}

/// Slot placeholders are created through
/// [`RenderCx::slot`](crate::component::RenderCx::slot), which also marks the
/// render as needing projection.
pub(crate) fn slot<C: IntoChild>(defaults: impl IntoIterator<Item = C>) -> VNode {
    VNode::Slot(SlotNode {
        children: children(defaults),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_become_text_and_none_is_dropped() {
        let node = h("p", Props::new(), [Some(text("a")), None, Some("b".into())]);
        assert_eq!(node.kind(), "element");
        let kinds: Vec<_> = node.children().iter().map(VNode::kind).collect();
        assert_eq!(kinds, vec!["text", "text"]);
    }

    #[test]
    fn fragment_keeps_order() {
        let node = fragment(["x", "y"]);
        let values: Vec<_> = node
            .children()
            .iter()
            .map(|child| match child {
                VNode::Text(t) => t.value.as_str(),
                _ => "",
            })
            .collect();
        assert_eq!(values, vec!["x", "y"]);
    }

    #[test]
    fn slot_holds_defaults() {
        let node = slot(["fallback"]);
        assert_eq!(node.kind(), "slot");
        assert_eq!(node.children().len(), 1);
    }
}
