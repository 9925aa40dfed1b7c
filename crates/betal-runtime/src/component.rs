#![forbid(unsafe_code)]

//! Stateful components.
//!
//! A [`Component`] describes behaviour: initial state, rendering and
//! lifecycle hooks. [`ComponentDef`] pairs it with a name and custom methods
//! and is what templates reference. Every mount of a definition creates a
//! [`ComponentHandle`], a live instance with its own props, state and
//! rendered subtree.
//!
//! # Lifecycle
//!
//! ```text
//! Constructed --mount--> Mounted --unmount--> Unmounted
//! ```
//!
//! Hooks never run inline. Mounting, unmounting and every props or state
//! change enqueue the matching hook on the runtime [`Scheduler`], so hooks
//! observe a fully patched tree. Child components mount before their parent
//! finishes, so children's `on_mounted` hooks run first.
//!
//! [`Scheduler`]: crate::scheduler::Scheduler

use std::cell::{Ref, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use betal_core::NodeId;
use serde_json::Value;

use crate::dispatcher::{Dispatcher, Subscription};
use crate::error::{HookError, HookResult, RuntimeError};
use crate::h::{IntoChild, slot};
use crate::mount::mount;
use crate::patch::patch;
use crate::runtime::{AppContext, Runtime};
use crate::slots::fill_slots;
use crate::destroy::destroy;
use crate::vnode::{Handler, PropMap, VNode, dom_nodes};

/// Names a custom method may not use: every public [`ComponentHandle`]
/// method plus the [`Component`] hooks.
pub const RESERVED_METHODS: &[&str] = &[
    "new",
    "downgrade",
    "ptr_eq",
    "def",
    "runtime",
    "app_context",
    "phase",
    "is_mounted",
    "parent",
    "host_el",
    "mount",
    "unmount",
    "patch",
    "render",
    "state",
    "props",
    "update_state",
    "update_props",
    "emit",
    "elements",
    "first_element",
    "offset",
    "on_mounted",
    "on_unmounted",
    "on_props_change",
    "on_state_change",
    "set_external_content",
    "call",
];

/// Behaviour of a component.
///
/// Only [`render`](Component::render) is required. Hooks default to doing
/// nothing and receive the live instance.
pub trait Component: 'static {
    /// Initial state for an instance receiving `props`.
    fn state(&self, props: &PropMap) -> PropMap {
        let _ = props;
        PropMap::new()
    }

    /// Describe the UI for the current props and state.
    fn render(&self, cx: &RenderCx<'_>) -> VNode;

    /// After the instance's subtree is mounted.
    fn on_mounted(&self, this: &ComponentHandle) -> HookResult {
        let _ = this;
        Ok(())
    }

    /// After the instance's subtree is destroyed.
    fn on_unmounted(&self, this: &ComponentHandle) -> HookResult {
        let _ = this;
        Ok(())
    }

    /// After a props update was patched.
    fn on_props_change(&self, this: &ComponentHandle, new: &PropMap, old: &PropMap) -> HookResult {
        let _ = (this, new, old);
        Ok(())
    }

    /// After a state update was patched.
    fn on_state_change(&self, this: &ComponentHandle) -> HookResult {
        let _ = this;
        Ok(())
    }
}

/// Custom method attached to a definition.
pub type Method = Rc<dyn Fn(&ComponentHandle, &Value) -> Result<Value, HookError>>;

struct Definition {
    name: String,
    component: Box<dyn Component>,
    methods: BTreeMap<String, Method>,
}

/// A component definition. Clones share identity.
///
/// Two component vnodes are only reconciled in place when they reference
/// the same definition.
#[derive(Clone)]
pub struct ComponentDef {
    inner: Rc<Definition>,
}

impl ComponentDef {
    /// Definition without custom methods.
    pub fn new(name: impl Into<String>, component: impl Component) -> Self {
        Self {
            inner: Rc::new(Definition {
                name: name.into(),
                component: Box::new(component),
                methods: BTreeMap::new(),
            }),
        }
    }

    /// Start a definition with custom methods.
    pub fn builder(name: impl Into<String>, component: impl Component) -> ComponentDefBuilder {
        ComponentDefBuilder {
            name: name.into(),
            component: Box::new(component),
            methods: Vec::new(),
        }
    }

    /// Definition name, used in errors and logs.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Whether both handles refer to the same definition.
    pub fn ptr_eq(&self, other: &ComponentDef) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Whether the definition provides a custom method `name`.
    pub fn has_method(&self, name: &str) -> bool {
        self.inner.methods.contains_key(name)
    }

    fn component(&self) -> &dyn Component {
        self.inner.component.as_ref()
    }
}

impl fmt::Debug for ComponentDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDef")
            .field("name", &self.inner.name)
            .field("methods", &self.inner.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder returned by [`ComponentDef::builder`].
#[must_use = "call build() to get the definition"]
pub struct ComponentDefBuilder {
    name: String,
    component: Box<dyn Component>,
    methods: Vec<(String, Method)>,
}

impl ComponentDefBuilder {
    /// Attach a custom method callable through [`ComponentHandle::call`].
    pub fn method(
        mut self,
        name: impl Into<String>,
        f: impl Fn(&ComponentHandle, &Value) -> Result<Value, HookError> + 'static,
    ) -> Self {
        self.methods.push((name.into(), Rc::new(f)));
        self
    }

    /// Finish the definition.
    ///
    /// Fails if a method name collides with a runtime method or was given
    /// twice.
    pub fn build(self) -> Result<ComponentDef, RuntimeError> {
        let mut methods = BTreeMap::new();
        for (name, method) in self.methods {
            if RESERVED_METHODS.contains(&name.as_str()) {
                return Err(RuntimeError::ReservedMethod(name));
            }
            if methods.contains_key(&name) {
                return Err(RuntimeError::DuplicateMethod(name));
            }
            methods.insert(name, method);
        }
        Ok(ComponentDef {
            inner: Rc::new(Definition {
                name: self.name,
                component: self.component,
                methods,
            }),
        })
    }
}

/// Lifecycle phase of an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Created, not mounted yet.
    Constructed,
    /// Mounted into a host node.
    Mounted,
    /// Unmounted. Terminal.
    Unmounted,
}

struct Instance {
    phase: Phase,
    props: PropMap,
    state: PropMap,
    vdom: Option<VNode>,
    host: Option<NodeId>,
    handlers: BTreeMap<String, Handler>,
    parent: Option<WeakComponentHandle>,
    subscriptions: Vec<Subscription>,
    external: Vec<VNode>,
    // Last known position of the rendered region among the host's children.
    region_hint: usize,
}

struct ComponentCell {
    def: ComponentDef,
    runtime: Runtime,
    dispatcher: Dispatcher<Value>,
    instance: RefCell<Instance>,
}

/// A live component instance. Clones share the instance.
#[derive(Clone)]
pub struct ComponentHandle {
    cell: Rc<ComponentCell>,
}

/// Non-owning reference to a [`ComponentHandle`].
#[derive(Clone)]
pub struct WeakComponentHandle {
    cell: Weak<ComponentCell>,
}

impl WeakComponentHandle {
    /// The instance, if it is still alive.
    pub fn upgrade(&self) -> Option<ComponentHandle> {
        self.cell.upgrade().map(|cell| ComponentHandle { cell })
    }
}

impl fmt::Debug for WeakComponentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WeakComponentHandle")
    }
}

impl ComponentHandle {
    /// Create an instance of `def`.
    ///
    /// `handlers` are the parent's handlers for events this instance emits;
    /// they run with `parent` as their owner.
    pub fn new(
        def: ComponentDef,
        runtime: Runtime,
        props: PropMap,
        handlers: BTreeMap<String, Handler>,
        parent: Option<&ComponentHandle>,
    ) -> Self {
        let state = def.component().state(&props);
        let dispatcher = Dispatcher::new().with_unhandled_warnings(runtime.config().warn_unhandled_events);
        Self {
            cell: Rc::new(ComponentCell {
                def,
                runtime,
                dispatcher,
                instance: RefCell::new(Instance {
                    phase: Phase::Constructed,
                    props,
                    state,
                    vdom: None,
                    host: None,
                    handlers,
                    parent: parent.map(ComponentHandle::downgrade),
                    subscriptions: Vec::new(),
                    external: Vec::new(),
                    region_hint: 0,
                }),
            }),
        }
    }

    /// Weak reference to this instance.
    pub fn downgrade(&self) -> WeakComponentHandle {
        WeakComponentHandle {
            cell: Rc::downgrade(&self.cell),
        }
    }

    /// Whether both handles refer to the same instance.
    pub fn ptr_eq(&self, other: &ComponentHandle) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }

    /// The definition this instance was created from.
    pub fn def(&self) -> &ComponentDef {
        &self.cell.def
    }

    /// The shared runtime.
    pub fn runtime(&self) -> &Runtime {
        &self.cell.runtime
    }

    /// The application context.
    pub fn app_context(&self) -> &AppContext {
        self.cell.runtime.context()
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.cell.instance.borrow().phase
    }

    /// Whether the instance is mounted.
    pub fn is_mounted(&self) -> bool {
        self.phase() == Phase::Mounted
    }

    /// Current props.
    ///
    /// Drop the guard before updating the instance.
    pub fn props(&self) -> Ref<'_, PropMap> {
        Ref::map(self.cell.instance.borrow(), |instance| &instance.props)
    }

    /// Current state.
    ///
    /// Drop the guard before updating the instance.
    pub fn state(&self) -> Ref<'_, PropMap> {
        Ref::map(self.cell.instance.borrow(), |instance| &instance.state)
    }

    /// The parent instance, if any.
    pub fn parent(&self) -> Option<ComponentHandle> {
        self.cell
            .instance
            .borrow()
            .parent
            .as_ref()
            .and_then(WeakComponentHandle::upgrade)
    }

    /// Host node the instance is mounted into.
    pub fn host_el(&self) -> Option<NodeId> {
        self.cell.instance.borrow().host
    }

    /// Platform nodes the rendered subtree places in the host, in order.
    pub fn elements(&self) -> Vec<NodeId> {
        self.cell
            .instance
            .borrow()
            .vdom
            .as_ref()
            .map(dom_nodes)
            .unwrap_or_default()
    }

    /// First element of [`elements`](Self::elements).
    pub fn first_element(&self) -> Option<NodeId> {
        self.elements().first().copied()
    }

    /// Position of the first rendered node among the host's children when
    /// the template root is a fragment, zero otherwise.
    ///
    /// An empty fragment still reports where its nodes would go.
    pub fn offset(&self) -> usize {
        let (host, vdom_is_fragment) = {
            let instance = self.cell.instance.borrow();
            (
                instance.host,
                matches!(instance.vdom, Some(VNode::Fragment(_))),
            )
        };
        match host {
            Some(host) if vdom_is_fragment => self.region_start(self.first_element(), host),
            _ => 0,
        }
    }

    /// Position among `host`'s children where the rendered region starts.
    ///
    /// Resolved from the first rendered node when there is one, else from
    /// the preceding siblings in the parent's tree, else from the position
    /// recorded at the last mount or patch.
    fn region_start(&self, first: Option<NodeId>, host: NodeId) -> usize {
        let found = first.and_then(|first| {
            self.cell
                .runtime
                .platform()
                .child_nodes(host)
                .iter()
                .position(|node| *node == first)
        });
        found
            .or_else(|| self.position_in_parent())
            .unwrap_or_else(|| self.cell.instance.borrow().region_hint)
    }

    fn position_in_parent(&self) -> Option<usize> {
        let parent = self.parent()?;
        let found = {
            let instance = parent.cell.instance.try_borrow().ok()?;
            let vdom = instance.vdom.as_ref()?;
            locate(std::slice::from_ref(vdom), self)?
        };
        match found {
            Located::InElement(count) => Some(count),
            Located::AtRoot(count) => {
                let host = parent.host_el()?;
                Some(parent.region_start(parent.first_element(), host) + count)
            }
        }
    }

    pub(crate) fn set_region_hint(&self, position: usize) {
        self.cell.instance.borrow_mut().region_hint = position;
    }

    /// Replace the content projected into this instance's slots.
    pub fn set_external_content(&self, content: Vec<VNode>) {
        self.cell.instance.borrow_mut().external = content;
    }

    /// Render the current template, with slots projected.
    pub fn render(&self) -> VNode {
        let cx = RenderCx { this: self };
        let mut vdom = self.cell.def.component().render(&cx);
        if self.cell.runtime.slots().take() {
            let external = self.cell.instance.borrow().external.clone();
            fill_slots(&mut vdom, &external);
        }
        vdom
    }

    /// Render and mount into `host`, before the child at `index` or appended.
    pub fn mount(&self, host: NodeId, index: Option<usize>) -> Result<(), RuntimeError> {
        match self.phase() {
            Phase::Constructed => {}
            Phase::Mounted => {
                return Err(RuntimeError::ComponentAlreadyMounted(self.name().to_owned()));
            }
            Phase::Unmounted => {
                return Err(RuntimeError::ComponentDestroyed(self.name().to_owned()));
            }
        }
        crate::debug_trace!(Mount, "mount component {}", self.name());

        let placed = self.cell.runtime.platform().child_nodes(host).len();
        self.set_region_hint(index.map_or(placed, |index| index.min(placed)));
        let mut vdom = self.render();
        mount(&self.cell.runtime, &mut vdom, host, index, Some(self))?;
        let subscriptions = self.wire_event_handlers();

        let mut instance = self.cell.instance.borrow_mut();
        instance.vdom = Some(vdom);
        instance.host = Some(host);
        instance.subscriptions = subscriptions;
        instance.phase = Phase::Mounted;
        Ok(())
    }

    /// Destroy the rendered subtree and cancel event subscriptions.
    pub fn unmount(&self) -> Result<(), RuntimeError> {
        let (vdom, subscriptions) = {
            let mut instance = self.cell.instance.borrow_mut();
            if instance.phase != Phase::Mounted {
                return Err(RuntimeError::ComponentNotMounted(self.name().to_owned()));
            }
            instance.phase = Phase::Unmounted;
            instance.host = None;
            (
                instance.vdom.take(),
                std::mem::take(&mut instance.subscriptions),
            )
        };
        crate::debug_trace!(Mount, "unmount component {}", self.name());

        if let Some(mut vdom) = vdom {
            destroy(&self.cell.runtime, &mut vdom)?;
        }
        for subscription in subscriptions {
            subscription.cancel();
        }
        Ok(())
    }

    /// Shallow-merge `partial` into the state, re-render and patch, then
    /// queue `on_state_change`.
    pub fn update_state(&self, partial: PropMap) -> Result<(), RuntimeError> {
        self.ensure_mounted()?;
        self.cell.instance.borrow_mut().state.extend(partial);
        self.patch()?;

        let this = self.clone();
        self.cell.runtime.scheduler().enqueue_job(Box::new(move || {
            this.cell.def.component().on_state_change(&this)
        }));
        Ok(())
    }

    /// Shallow-merge `props` into the current props. When the merged props
    /// deep-equal the current ones nothing happens; otherwise re-render,
    /// patch and queue `on_props_change`.
    pub fn update_props(&self, props: PropMap) -> Result<(), RuntimeError> {
        self.ensure_mounted()?;
        let (new, old) = {
            let instance = self.cell.instance.borrow();
            let mut merged = instance.props.clone();
            merged.extend(props);
            if merged == instance.props {
                return Ok(());
            }
            (merged, instance.props.clone())
        };
        self.cell.instance.borrow_mut().props = new.clone();
        self.patch()?;

        let this = self.clone();
        self.cell.runtime.scheduler().enqueue_job(Box::new(move || {
            this.cell.def.component().on_props_change(&this, &new, &old)
        }));
        Ok(())
    }

    /// Emit `event` to the parent's handler, if one was given.
    pub fn emit(&self, event: &str, payload: Value) {
        self.cell.dispatcher.dispatch(event, &payload);
    }

    /// Call a custom method of the definition.
    pub fn call(&self, method: &str, args: &Value) -> Result<Value, HookError> {
        let method_fn = self
            .cell
            .def
            .inner
            .methods
            .get(method)
            .cloned()
            .ok_or_else(|| RuntimeError::UnknownMethod(method.to_owned()))?;
        method_fn(self, args)
    }

    /// Re-render and reconcile against the mounted tree.
    pub(crate) fn patch(&self) -> Result<(), RuntimeError> {
        let mut next = self.render();
        let (previous, host) = {
            let mut instance = self.cell.instance.borrow_mut();
            match (instance.vdom.take(), instance.host) {
                (Some(vdom), Some(host)) => (vdom, host),
                (vdom, _) => {
                    instance.vdom = vdom;
                    return Err(RuntimeError::ComponentNotMounted(self.name().to_owned()));
                }
            }
        };
        let offset = self.region_start(dom_nodes(&previous).first().copied(), host);
        self.set_region_hint(offset);
        crate::debug_trace!(Patch, "patch component {} (offset {})", self.name(), offset);

        let result = patch(&self.cell.runtime, previous, &mut next, host, Some(self), offset);
        self.cell.instance.borrow_mut().vdom = Some(next);
        result
    }

    pub(crate) fn notify_mounted(&self) -> HookResult {
        self.cell.def.component().on_mounted(self)
    }

    pub(crate) fn notify_unmounted(&self) -> HookResult {
        self.cell.def.component().on_unmounted(self)
    }

    fn name(&self) -> &str {
        self.cell.def.name()
    }

    fn ensure_mounted(&self) -> Result<(), RuntimeError> {
        if self.is_mounted() {
            Ok(())
        } else {
            Err(RuntimeError::ComponentNotMounted(self.name().to_owned()))
        }
    }

    fn wire_event_handlers(&self) -> Vec<Subscription> {
        let (handlers, parent) = {
            let instance = self.cell.instance.borrow();
            (instance.handlers.clone(), instance.parent.clone())
        };
        handlers
            .into_iter()
            .map(|(event, handler)| {
                let parent = parent.clone();
                let name = event.clone();
                self.cell.dispatcher.subscribe(
                    &event,
                    Rc::new(move |payload: &Value| {
                        let owner = parent.as_ref().and_then(WeakComponentHandle::upgrade);
                        if let Err(err) = handler.call(owner.as_ref(), payload) {
                            tracing::error!(event = %name, error = %err, "component event handler failed");
                        }
                    }),
                )
            })
            .collect()
    }
}

/// Where a component vnode sits in its parent's rendered tree, counted in
/// platform nodes placed before it.
enum Located {
    /// Directly in the parent's own region, after the parent's offset.
    AtRoot(usize),
    /// Among the children of an element.
    InElement(usize),
}

fn locate(children: &[VNode], target: &ComponentHandle) -> Option<Located> {
    let mut placed = 0;
    for child in crate::vnode::flatten_children(children) {
        match child {
            VNode::Component(node)
                if node
                    .instance
                    .as_ref()
                    .is_some_and(|instance| instance.ptr_eq(target)) =>
            {
                return Some(Located::AtRoot(placed));
            }
            VNode::Element(node) => {
                if let Some(Located::AtRoot(count) | Located::InElement(count)) =
                    locate(&node.children, target)
                {
                    return Some(Located::InElement(count));
                }
            }
            _ => {}
        }
        placed += dom_nodes(child).len();
    }
    None
}

impl fmt::Debug for ComponentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let instance = self.cell.instance.try_borrow();
        let mut out = f.debug_struct("ComponentHandle");
        out.field("name", &self.cell.def.name());
        if let Ok(instance) = instance {
            out.field("phase", &instance.phase)
                .field("props", &instance.props)
                .field("state", &instance.state);
        }
        out.finish()
    }
}

/// Render context handed to [`Component::render`].
pub struct RenderCx<'a> {
    this: &'a ComponentHandle,
}

impl<'a> RenderCx<'a> {
    /// The instance being rendered.
    pub fn this(&self) -> &'a ComponentHandle {
        self.this
    }

    /// Current props.
    pub fn props(&self) -> Ref<'a, PropMap> {
        self.this.props()
    }

    /// Current state.
    pub fn state(&self) -> Ref<'a, PropMap> {
        self.this.state()
    }

    /// One prop, cloned.
    pub fn prop(&self, key: &str) -> Option<Value> {
        self.this.props().get(key).cloned()
    }

    /// One state entry, cloned.
    pub fn state_value(&self, key: &str) -> Option<Value> {
        self.this.state().get(key).cloned()
    }

    /// The application context.
    pub fn app_context(&self) -> &'a AppContext {
        self.this.app_context()
    }

    /// Placeholder for external content, with `defaults` shown when the
    /// instance received none.
    pub fn slot<C: IntoChild>(&self, defaults: impl IntoIterator<Item = C>) -> VNode {
        self.this.cell.runtime.slots().mark();
        slot(defaults)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::h::{h, text};
    use crate::vnode::Props;
    use betal_headless::MemoryDom;
    use serde_json::json;

    struct Label;

    impl Component for Label {
        fn state(&self, props: &PropMap) -> PropMap {
            let mut state = PropMap::new();
            state.insert("count".into(), props.get("start").cloned().unwrap_or(json!(0)));
            state
        }

        fn render(&self, cx: &RenderCx<'_>) -> VNode {
            let count = cx.state_value("count").unwrap_or(json!(0));
            h("span", Props::new(), [text(count.to_string())])
        }
    }

    fn instance(dom: &Rc<MemoryDom>, def: ComponentDef) -> ComponentHandle {
        let runtime = Runtime::with_platform(dom.clone());
        let mut props = PropMap::new();
        props.insert("start".into(), json!(3));
        ComponentHandle::new(def, runtime, props, BTreeMap::new(), None)
    }

    #[test]
    fn reserved_and_duplicate_methods_are_rejected() {
        let err = ComponentDef::builder("X", Label)
            .method("render", |_, _| Ok(Value::Null))
            .build()
            .unwrap_err();
        assert_eq!(err, RuntimeError::ReservedMethod("render".into()));

        let err = ComponentDef::builder("X", Label)
            .method("reset", |_, _| Ok(Value::Null))
            .method("reset", |_, _| Ok(Value::Null))
            .build()
            .unwrap_err();
        assert_eq!(err, RuntimeError::DuplicateMethod("reset".into()));
    }

    #[test]
    fn every_handle_method_name_is_reserved() {
        for name in [
            "new", "downgrade", "ptr_eq", "def", "runtime", "app_context", "phase",
            "is_mounted", "props", "state", "parent", "host_el", "elements",
            "first_element", "offset", "set_external_content", "render", "mount",
            "unmount", "update_state", "update_props", "emit", "call",
        ] {
            let err = ComponentDef::builder("X", Label)
                .method(name, |_, _| Ok(Value::Null))
                .build()
                .unwrap_err();
            assert_eq!(err, RuntimeError::ReservedMethod(name.into()));
        }
    }

    #[test]
    fn custom_methods_see_the_instance() {
        let def = ComponentDef::builder("Label", Label)
            .method("double", |this, _| {
                let count = this.state().get("count").and_then(Value::as_i64).unwrap_or(0);
                Ok(json!(count * 2))
            })
            .build()
            .unwrap();
        let dom = MemoryDom::new();
        let handle = instance(&dom, def);
        assert_eq!(handle.call("double", &Value::Null).unwrap(), json!(6));
        assert!(handle.call("triple", &Value::Null).is_err());
    }

    #[test]
    fn lifecycle_phases() {
        let dom = MemoryDom::new();
        let root = dom.create_root();
        let handle = instance(&dom, ComponentDef::new("Label", Label));
        assert_eq!(handle.phase(), Phase::Constructed);
        assert_eq!(
            handle.update_state(PropMap::new()),
            Err(RuntimeError::ComponentNotMounted("Label".into()))
        );

        handle.mount(root, None).unwrap();
        assert!(handle.is_mounted());
        assert_eq!(dom.to_html(root), "<root><span>3</span></root>");
        assert_eq!(
            handle.mount(root, None),
            Err(RuntimeError::ComponentAlreadyMounted("Label".into()))
        );

        handle.unmount().unwrap();
        assert_eq!(handle.phase(), Phase::Unmounted);
        assert_eq!(dom.to_html(root), "<root></root>");
        assert_eq!(
            handle.unmount(),
            Err(RuntimeError::ComponentNotMounted("Label".into()))
        );
        assert_eq!(
            handle.mount(root, None),
            Err(RuntimeError::ComponentDestroyed("Label".into()))
        );
    }

    #[test]
    fn update_state_patches_in_place() {
        let dom = MemoryDom::new();
        let root = dom.create_root();
        let handle = instance(&dom, ComponentDef::new("Label", Label));
        handle.mount(root, None).unwrap();
        let span = handle.first_element().unwrap();

        let mut partial = PropMap::new();
        partial.insert("count".into(), json!(4));
        handle.update_state(partial).unwrap();

        assert_eq!(handle.first_element(), Some(span));
        assert_eq!(dom.text_content(root), "4");
    }
}
