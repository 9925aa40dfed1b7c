#![forbid(unsafe_code)]

//! Tear down a mounted vnode tree.

use crate::error::RuntimeError;
use crate::events::remove_event_listeners;
use crate::runtime::Runtime;
use crate::vnode::VNode;

/// Remove `vnode`'s platform nodes, unregister its listeners and unmount
/// nested components, leaving the vnode unmounted.
///
/// Component `on_unmounted` hooks are queued, not run.
pub fn destroy(rt: &Runtime, vnode: &mut VNode) -> Result<(), RuntimeError> {
    let platform = rt.platform();
    match vnode {
        VNode::Text(node) => {
            let el = node.el.take().ok_or(RuntimeError::Detached { kind: "text" })?;
            platform.remove_node(el);
        }
        VNode::Element(node) => {
            let el = node
                .el
                .take()
                .ok_or(RuntimeError::Detached { kind: "element" })?;
            platform.remove_node(el);
            for child in &mut node.children {
                destroy(rt, child)?;
            }
            remove_event_listeners(platform, el, std::mem::take(&mut node.listeners));
        }
        VNode::Fragment(node) => {
            for child in &mut node.children {
                destroy(rt, child)?;
            }
            node.el = None;
        }
        VNode::Component(node) => {
            let instance = node
                .instance
                .take()
                .ok_or(RuntimeError::Detached { kind: "component" })?;
            instance.unmount()?;
            node.el = None;
            rt.scheduler()
                .enqueue_job(Box::new(move || instance.notify_unmounted()));
        }
        VNode::Slot(_) => {
            return Err(RuntimeError::UnsupportedNode {
                kind: "slot",
                op: "destroy",
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::h::{fragment, h, text};
    use crate::mount::mount;
    use crate::vnode::Props;
    use betal_core::Platform;
    use betal_headless::MemoryDom;

    #[test]
    fn destroy_detaches_everything() {
        let dom = MemoryDom::new();
        let root = dom.create_root();
        let rt = Runtime::with_platform(dom.clone());
        let mut tree = fragment([
            h("button", Props::new().on("click", |_, _| Ok(())), ["go"]),
            text("tail"),
        ]);
        mount(&rt, &mut tree, root, None, None).unwrap();
        assert_eq!(dom.listener_count(), 1);

        destroy(&rt, &mut tree).unwrap();
        assert!(dom.child_nodes(root).is_empty());
        assert_eq!(dom.listener_count(), 0);
        assert_eq!(tree.el(), None);
    }

    #[test]
    fn destroying_twice_reports_detached() {
        let dom = MemoryDom::new();
        let root = dom.create_root();
        let rt = Runtime::with_platform(dom.clone());
        let mut node = text("x");
        mount(&rt, &mut node, root, None, None).unwrap();
        destroy(&rt, &mut node).unwrap();
        assert_eq!(
            destroy(&rt, &mut node),
            Err(RuntimeError::Detached { kind: "text" })
        );
    }
}
