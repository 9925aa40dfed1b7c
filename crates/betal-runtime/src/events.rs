#![forbid(unsafe_code)]

//! Event listener wiring.
//!
//! Platform callbacks hold the owning component weakly. Handler failures are
//! logged; they never unwind into the platform.

use std::collections::BTreeMap;
use std::rc::Rc;

use betal_core::{EventCallback, ListenerId, NodeId, Platform};
use serde_json::Value;

use crate::component::ComponentHandle;
use crate::vnode::Handler;

/// Register `handler` for `event` on `el`, bound to `host`.
pub(crate) fn add_event_listener(
    platform: &dyn Platform,
    event: &str,
    handler: &Handler,
    el: NodeId,
    host: Option<&ComponentHandle>,
) -> ListenerId {
    let host = host.map(ComponentHandle::downgrade);
    let handler = handler.clone();
    let name = event.to_owned();
    let callback: EventCallback = Rc::new(move |payload: &Value| {
        let this = host.as_ref().and_then(|weak| weak.upgrade());
        if let Err(err) = handler.call(this.as_ref(), payload) {
            tracing::error!(event = %name, error = %err, "event handler failed");
        }
    });
    platform.add_event_listener(el, event, callback)
}

/// Register every handler in `events`. Returns the listener ids by event.
pub(crate) fn add_event_listeners(
    platform: &dyn Platform,
    events: &BTreeMap<String, Handler>,
    el: NodeId,
    host: Option<&ComponentHandle>,
) -> BTreeMap<String, ListenerId> {
    events
        .iter()
        .map(|(event, handler)| {
            let id = add_event_listener(platform, event, handler, el, host);
            (event.clone(), id)
        })
        .collect()
}

/// Unregister every listener in `listeners`.
pub(crate) fn remove_event_listeners(
    platform: &dyn Platform,
    el: NodeId,
    listeners: BTreeMap<String, ListenerId>,
) {
    for (event, id) in listeners {
        platform.remove_event_listener(el, &event, id);
    }
}
