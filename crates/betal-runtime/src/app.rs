#![forbid(unsafe_code)]

//! Application host.
//!
//! An [`App`] owns the root component vnode, the shared runtime and the
//! router lifecycle. Mounting renders the root component into a host node
//! and initialises the router; unmounting destroys the tree and the router.

use std::rc::Rc;

use betal_core::{NodeId, Platform};

use crate::component::{ComponentDef, ComponentHandle};
use crate::config::AppOptions;
use crate::destroy::destroy;
use crate::error::RuntimeError;
use crate::h::h;
use crate::mount::mount;
use crate::router::{NoopRouter, Router};
use crate::runtime::{AppContext, Runtime};
use crate::vnode::{PropMap, Props, VNode};

struct Mounted {
    vdom: VNode,
    host: NodeId,
}

/// A mountable application.
///
/// ```
/// use betal_headless::MemoryDom;
/// use betal_runtime::{App, AppOptions, Component, ComponentDef, PropMap, Props, RenderCx, VNode, h};
///
/// struct Hello;
///
/// impl Component for Hello {
///     fn render(&self, _cx: &RenderCx<'_>) -> VNode {
///         h("p", Props::new(), ["hello"])
///     }
/// }
///
/// let dom = MemoryDom::new();
/// let root = dom.create_root();
/// let mut app = App::new(dom.clone(), ComponentDef::new("Hello", Hello), PropMap::new(), AppOptions::default());
/// app.mount(root).unwrap();
/// assert_eq!(dom.to_html(root), "<root><p>hello</p></root>");
/// app.unmount().unwrap();
/// ```
pub struct App {
    runtime: Runtime,
    root: ComponentDef,
    props: PropMap,
    mounted: Option<Mounted>,
}

impl App {
    /// Create an application rendering `root` with `props` on `platform`.
    pub fn new(
        platform: Rc<dyn Platform>,
        root: ComponentDef,
        props: PropMap,
        options: AppOptions,
    ) -> Self {
        let router: Rc<dyn Router> = options.router.unwrap_or_else(|| Rc::new(NoopRouter));
        let runtime = Runtime::new(platform, AppContext::new(router), options.config);
        Self {
            runtime,
            root,
            props,
            mounted: None,
        }
    }

    /// Mount the root component into `host` and initialise the router.
    pub fn mount(&mut self, host: NodeId) -> Result<(), RuntimeError> {
        if self.mounted.is_some() {
            return Err(RuntimeError::AppAlreadyMounted);
        }
        let mut vdom = h(
            &self.root,
            Props::from(self.props.clone()),
            Vec::<VNode>::new(),
        );
        mount(&self.runtime, &mut vdom, host, None, None)?;
        self.runtime.context().router().init();
        tracing::debug!(root = self.root.name(), %host, "application mounted");
        self.mounted = Some(Mounted { vdom, host });
        Ok(())
    }

    /// Destroy the tree and the router.
    pub fn unmount(&mut self) -> Result<(), RuntimeError> {
        let Some(mut mounted) = self.mounted.take() else {
            return Err(RuntimeError::AppNotMounted);
        };
        destroy(&self.runtime, &mut mounted.vdom)?;
        self.runtime.context().router().destroy();
        tracing::debug!(root = self.root.name(), host = %mounted.host, "application unmounted");
        Ok(())
    }

    /// Whether the application is mounted.
    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// Host node the application is mounted into.
    pub fn host(&self) -> Option<NodeId> {
        self.mounted.as_ref().map(|mounted| mounted.host)
    }

    /// Root component instance, while mounted.
    pub fn root_component(&self) -> Option<ComponentHandle> {
        self.mounted
            .as_ref()
            .and_then(|mounted| mounted.vdom.component().cloned())
    }

    /// The shared runtime.
    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// The application context.
    pub fn context(&self) -> &AppContext {
        self.runtime.context()
    }

    /// Run every pending lifecycle hook. Returns the number of jobs run.
    pub fn next_tick(&self) -> usize {
        self.runtime.next_tick()
    }
}
