#![forbid(unsafe_code)]

//! `MemoryDom` against the platform contract the runtime relies on.

use std::cell::RefCell;
use std::rc::Rc;

use betal_core::{NodeId, Platform};
use betal_headless::{HeadlessError, MemoryDom};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn texts(dom: &MemoryDom, parent: NodeId) -> Vec<String> {
    dom.child_nodes(parent)
        .into_iter()
        .map(|node| dom.text(node).unwrap_or_default())
        .collect()
}

fn list(dom: &MemoryDom, parent: NodeId, values: &[&str]) -> Vec<NodeId> {
    values
        .iter()
        .map(|value| {
            let node = dom.create_text_node(value);
            dom.insert_node(node, parent, None);
            node
        })
        .collect()
}

#[test]
fn insert_at_index_and_past_end() {
    let dom = MemoryDom::new();
    let root = dom.create_root();
    list(&dom, root, &["a", "c"]);
    let b = dom.create_text_node("b");
    dom.insert_node(b, root, Some(1));
    let z = dom.create_text_node("z");
    dom.insert_node(z, root, Some(99));
    assert_eq!(texts(&dom, root), vec!["a", "b", "c", "z"]);
}

#[test]
fn moving_forward_and_backward() {
    let dom = MemoryDom::new();
    let root = dom.create_root();
    let nodes = list(&dom, root, &["a", "b", "c", "d"]);

    // Backward: reference resolved before detaching.
    dom.insert_node(nodes[3], root, Some(0));
    assert_eq!(texts(&dom, root), vec!["d", "a", "b", "c"]);

    // Forward: lands before the node that was at the index.
    dom.insert_node(nodes[3], root, Some(3));
    assert_eq!(texts(&dom, root), vec!["a", "b", "d", "c"]);

    // Onto its own position.
    dom.insert_node(nodes[1], root, Some(1));
    assert_eq!(texts(&dom, root), vec!["a", "b", "d", "c"]);
}

#[test]
fn moving_between_parents() {
    let dom = MemoryDom::new();
    let root = dom.create_root();
    let other = dom.create_element_node("div");
    dom.insert_node(other, root, None);
    let node = dom.create_text_node("x");
    dom.insert_node(node, root, None);

    dom.insert_node(node, other, None);
    assert_eq!(dom.parent(node), Some(other));
    assert_eq!(dom.child_nodes(root), vec![other]);
}

#[test]
fn microtasks_wait_for_the_host() {
    let dom = MemoryDom::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let l = Rc::clone(&log);
    let inner = Rc::clone(&dom);
    dom.queue_microtask(Box::new(move || {
        l.borrow_mut().push("first");
        let l2 = Rc::clone(&l);
        inner.queue_microtask(Box::new(move || l2.borrow_mut().push("nested")));
    }));
    assert!(log.borrow().is_empty());
    assert_eq!(dom.run_microtasks(), 2);
    assert_eq!(*log.borrow(), vec!["first", "nested"]);
}

#[test]
fn events_drain_microtasks_after_each_listener() {
    let dom = MemoryDom::new();
    let button = dom.create_element_node("button");
    let log = Rc::new(RefCell::new(Vec::new()));

    for name in ["one", "two"] {
        let l = Rc::clone(&log);
        let queue = Rc::clone(&dom);
        dom.add_event_listener(
            button,
            "click",
            Rc::new(move |payload: &Value| {
                l.borrow_mut().push(format!("{name}:{payload}"));
                let l2 = Rc::clone(&l);
                queue.queue_microtask(Box::new(move || l2.borrow_mut().push(format!("{name}:task"))));
            }),
        );
    }

    assert_eq!(dom.dispatch_event(button, "click", json!(1)), 2);
    assert_eq!(
        *log.borrow(),
        vec!["one:1", "one:task", "two:1", "two:task"]
    );
}

#[test]
fn removed_listener_stops_firing() {
    let dom = MemoryDom::new();
    let button = dom.create_element_node("button");
    let id = dom.add_event_listener(button, "click", Rc::new(|_: &Value| {}));
    assert_eq!(dom.listeners_on(button), 1);
    dom.remove_event_listener(button, "click", id);
    assert_eq!(dom.dispatch_event(button, "click", json!(null)), 0);
}

#[test]
fn unknown_node_snapshot_is_an_error() {
    let dom = MemoryDom::new();
    assert_eq!(
        dom.snapshot(NodeId(404)),
        Err(HeadlessError::UnknownNode(NodeId(404)))
    );
}
