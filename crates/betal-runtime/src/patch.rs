#![forbid(unsafe_code)]

//! Reconcile a mounted vnode tree against a freshly rendered one.
//!
//! [`patch`] consumes the old tree and transfers its platform nodes, listeners
//! and component instances into the new tree wherever two vnodes occupy the
//! same slot (see [`VNode::same_slot`]). Everything else is destroyed and
//! mounted fresh.
//!
//! Children are compared after flattening fragments, using the keyed edit
//! script from [`betal_core::diff_sequence`].

use betal_core::{DiffOp, NodeId, arrays_diff, diff_sequence, objects_diff};

use crate::attributes::{remove_attribute, set_attribute};
use crate::component::ComponentHandle;
use crate::destroy::destroy;
use crate::error::RuntimeError;
use crate::events::add_event_listener;
use crate::mount::mount;
use crate::runtime::Runtime;
use crate::vnode::{
    ComponentNode, ElementNode, Handler, VNode, dom_nodes, flatten_children_mut,
    flatten_children_owned,
};

/// Reconcile `old` (mounted under `parent`) into `new`.
///
/// `offset` is the position among `parent`'s children where `old`'s nodes
/// start. It places the replacement when `old` owns no node, anchors the
/// children of a fragment next to foreign siblings, and is recorded on a
/// component instance so its own re-renders know where its region begins.
pub fn patch(
    rt: &Runtime,
    old: VNode,
    new: &mut VNode,
    parent: NodeId,
    host: Option<&ComponentHandle>,
    offset: usize,
) -> Result<(), RuntimeError> {
    if !old.same_slot(new) {
        let index = dom_nodes(&old)
            .first()
            .and_then(|first| {
                rt.platform()
                    .child_nodes(parent)
                    .iter()
                    .position(|node| node == first)
            })
            .unwrap_or(offset);
        let mut old = old;
        destroy(rt, &mut old)?;
        return mount(rt, new, parent, Some(index), host);
    }

    match (old, new) {
        (VNode::Text(old), VNode::Text(new)) => {
            new.el = old.el;
            if old.value != new.value {
                let el = new.el.ok_or(RuntimeError::Detached { kind: "text" })?;
                rt.platform().set_text_content(el, &new.value);
            }
            Ok(())
        }
        (VNode::Element(mut old), VNode::Element(new)) => {
            let el = old.el.ok_or(RuntimeError::Detached { kind: "element" })?;
            new.el = Some(el);
            patch_element(rt, &mut old, new, el, host);
            patch_children(rt, old.children, &mut new.children, el, host, 0)
        }
        (VNode::Fragment(old), VNode::Fragment(new)) => {
            let el = old.el.unwrap_or(parent);
            new.el = Some(el);
            patch_children(rt, old.children, &mut new.children, el, host, offset)
        }
        (VNode::Component(old), VNode::Component(new)) => patch_component(old, new, offset),
        (old, _) => Err(RuntimeError::UnsupportedNode {
            kind: old.kind(),
            op: "patch",
        }),
    }
}

fn patch_element(
    rt: &Runtime,
    old: &mut ElementNode,
    new: &mut ElementNode,
    el: NodeId,
    host: Option<&ComponentHandle>,
) {
    let platform = rt.platform();

    let attrs = objects_diff(&old.props.attrs, &new.props.attrs, |a, b| a == b);
    for name in attrs.removed {
        remove_attribute(platform, el, name);
    }
    for name in attrs.added.into_iter().chain(attrs.updated) {
        if let Some(value) = new.props.attrs.get(name) {
            set_attribute(platform, el, name, value);
        }
    }

    let old_classes = old.props.class.as_ref().map(|c| c.tokens()).unwrap_or_default();
    let new_classes = new.props.class.as_ref().map(|c| c.tokens()).unwrap_or_default();
    let classes = arrays_diff(&old_classes, &new_classes);
    for class in &classes.removed {
        platform.remove_class(el, class);
    }
    for class in &classes.added {
        platform.add_class(el, class);
    }

    let style = objects_diff(&old.props.style, &new.props.style, |a, b| a == b);
    for property in style.removed {
        platform.remove_style_property(el, property);
    }
    for property in style.added.into_iter().chain(style.updated) {
        if let Some(value) = new.props.style.get(property) {
            platform.set_style_property(el, property, value);
        }
    }

    let events = objects_diff(&old.props.on, &new.props.on, Handler::ptr_eq);
    let mut listeners = std::mem::take(&mut old.listeners);
    for event in events.removed.iter().chain(&events.updated) {
        if let Some(id) = listeners.remove(*event) {
            platform.remove_event_listener(el, event, id);
        }
    }
    for event in events.added.iter().chain(&events.updated) {
        if let Some(handler) = new.props.on.get(*event) {
            let id = add_event_listener(platform, event, handler, el, host);
            listeners.insert((*event).to_owned(), id);
        }
    }
    new.listeners = listeners;
}

fn patch_children(
    rt: &Runtime,
    old_children: Vec<VNode>,
    new_children: &mut [VNode],
    parent: NodeId,
    host: Option<&ComponentHandle>,
    offset: usize,
) -> Result<(), RuntimeError> {
    let old_flat = flatten_children_owned(old_children);
    let mut new_flat = flatten_children_mut(new_children, parent);
    let ops = diff_sequence(&old_flat, &new_flat, |a: &VNode, b: &&mut VNode| {
        a.same_slot(b)
    });
    let mut old_slots: Vec<Option<VNode>> = old_flat.into_iter().map(Some).collect();

    // Platform nodes owned by `new_flat[..index]`, all already in place. Ops
    // other than `Remove` arrive once per new index, in ascending order.
    let mut placed = 0;
    for op in ops {
        let at = offset + placed;
        let index = match op {
            DiffOp::Add { index } => {
                mount(rt, &mut *new_flat[index], parent, Some(at), host)?;
                index
            }
            DiffOp::Remove { original_index, .. } => {
                if let Some(mut old) = old_slots[original_index].take() {
                    destroy(rt, &mut old)?;
                }
                continue;
            }
            DiffOp::Move {
                original_index,
                index,
                ..
            } => {
                let old = take_old(&mut old_slots, original_index)?;
                for (shift, node) in dom_nodes(&old).into_iter().enumerate() {
                    rt.platform().insert_node(node, parent, Some(at + shift));
                }
                patch(rt, old, &mut *new_flat[index], parent, host, at)?;
                index
            }
            DiffOp::Noop {
                original_index,
                index,
            } => {
                let old = take_old(&mut old_slots, original_index)?;
                patch(rt, old, &mut *new_flat[index], parent, host, at)?;
                index
            }
        };
        placed += dom_nodes(&*new_flat[index]).len();
    }
    Ok(())
}

fn take_old(slots: &mut [Option<VNode>], original_index: usize) -> Result<VNode, RuntimeError> {
    slots
        .get_mut(original_index)
        .and_then(Option::take)
        .ok_or(RuntimeError::Detached { kind: "child" })
}

fn patch_component(
    old: ComponentNode,
    new: &mut ComponentNode,
    offset: usize,
) -> Result<(), RuntimeError> {
    let instance = old
        .instance
        .ok_or(RuntimeError::Detached { kind: "component" })?;
    instance.set_region_hint(offset);
    instance.set_external_content(new.children.clone());
    instance.update_props(new.props.component_props())?;
    new.el = instance.first_element();
    new.instance = Some(instance);
    Ok(())
}
