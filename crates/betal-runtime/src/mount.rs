#![forbid(unsafe_code)]

//! Materialize a vnode tree into platform nodes.

use betal_core::NodeId;

use crate::attributes::set_attributes;
use crate::component::ComponentHandle;
use crate::error::RuntimeError;
use crate::events::add_event_listeners;
use crate::runtime::Runtime;
use crate::vnode::{ComponentNode, ElementNode, VNode, dom_nodes};

/// Mount `vnode` under `parent`, before the child currently at `index`
/// (`None` appends).
///
/// Listeners registered along the way are bound to `host`. Component
/// instances are created and mounted recursively; their `on_mounted` hooks
/// are queued after their subtree, so children are notified first.
pub fn mount(
    rt: &Runtime,
    vnode: &mut VNode,
    parent: NodeId,
    index: Option<usize>,
    host: Option<&ComponentHandle>,
) -> Result<(), RuntimeError> {
    match vnode {
        VNode::Text(node) => {
            let el = rt.platform().create_text_node(&node.value);
            node.el = Some(el);
            rt.platform().insert_node(el, parent, index);
        }
        VNode::Element(node) => mount_element(rt, node, parent, index, host)?,
        VNode::Fragment(node) => {
            node.el = Some(parent);
            // Each child lands after the nodes its predecessors placed.
            let mut next = index;
            for child in &mut node.children {
                mount(rt, child, parent, next, host)?;
                if let Some(at) = next {
                    next = Some(at + dom_nodes(child).len());
                }
            }
        }
        VNode::Component(node) => mount_component(rt, node, parent, index, host)?,
        VNode::Slot(_) => {
            return Err(RuntimeError::UnsupportedNode {
                kind: "slot",
                op: "mount",
            });
        }
    }
    Ok(())
}

fn mount_element(
    rt: &Runtime,
    node: &mut ElementNode,
    parent: NodeId,
    index: Option<usize>,
    host: Option<&ComponentHandle>,
) -> Result<(), RuntimeError> {
    let platform = rt.platform();
    let el = platform.create_element_node(&node.tag);
    node.listeners = add_event_listeners(platform, &node.props.on, el, host);
    set_attributes(platform, el, &node.props);
    node.el = Some(el);

    for child in &mut node.children {
        mount(rt, child, el, None, host)?;
    }
    platform.insert_node(el, parent, index);
    Ok(())
}

fn mount_component(
    rt: &Runtime,
    node: &mut ComponentNode,
    parent: NodeId,
    index: Option<usize>,
    host: Option<&ComponentHandle>,
) -> Result<(), RuntimeError> {
    let instance = ComponentHandle::new(
        node.def.clone(),
        rt.clone(),
        node.props.component_props(),
        node.props.on.clone(),
        host,
    );
    instance.set_external_content(node.children.clone());
    instance.mount(parent, index)?;
    node.el = instance.first_element();
    node.instance = Some(instance.clone());

    rt.scheduler()
        .enqueue_job(Box::new(move || instance.notify_mounted()));
    Ok(())
}
