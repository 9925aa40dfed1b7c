#![forbid(unsafe_code)]

//! Slot projection.
//!
//! A component template may contain slot placeholders. Before mounting, each
//! placeholder is replaced by a fragment holding the content the component
//! received from its parent, or the slot's own defaults when it received
//! none. A placeholder with nothing to show is removed.
//!
//! Projection stops at nested component vnodes: their slots belong to them.

use crate::h::fragment;
use crate::vnode::{SlotNode, VNode};

/// Replace every slot in `vdom` with `external` content or its defaults.
///
/// A slot at the root of the template becomes a fragment (empty when there
/// is nothing to show).
pub fn fill_slots(vdom: &mut VNode, external: &[VNode]) {
    if let VNode::Slot(slot) = &mut *vdom {
        *vdom = projection(slot, external).unwrap_or_else(|| fragment(Vec::<VNode>::new()));
        return;
    }
    fill_children(vdom, external);
}

fn fill_children(node: &mut VNode, external: &[VNode]) {
    let Some(children) = node.children_mut() else {
        return;
    };
    let mut i = 0;
    while i < children.len() {
        if let VNode::Slot(slot) = &mut children[i] {
            match projection(slot, external) {
                Some(content) => {
                    children[i] = content;
                    i += 1;
                }
                None => {
                    children.remove(i);
                }
            }
            continue;
        }
        fill_children(&mut children[i], external);
        i += 1;
    }
}

fn projection(slot: &mut SlotNode, external: &[VNode]) -> Option<VNode> {
    let views = if external.is_empty() {
        std::mem::take(&mut slot.children)
    } else {
        external.to_vec()
    };
    (!views.is_empty()).then(|| fragment(views))
}
