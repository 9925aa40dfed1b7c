#![forbid(unsafe_code)]

//! Log output for failures the runtime contains instead of propagating.

use std::sync::{Arc, Mutex};

use betal_core::Platform;
use betal_headless::MemoryDom;
use betal_runtime::{
    App, AppOptions, Component, ComponentDef, ComponentHandle, HookResult, PropMap, Props,
    RenderCx, RuntimeConfig, VNode, h,
};
use serde_json::Value;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

// ============================================================================
// Test Infrastructure
// ============================================================================

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: Level,
    message: String,
    fields: Vec<(String, String)>,
}

impl CapturedEvent {
    fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let message = visitor
            .0
            .iter()
            .find(|(name, _)| name == "message")
            .map(|(_, value)| value.clone())
            .unwrap_or_default();
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message,
            fields: visitor.0,
        });
    }
}

/// Run `f` with a capturing subscriber installed and return what it logged.
fn with_captured_events<F: FnOnce()>(f: F) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = EventCapture {
        events: Arc::clone(&events),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    captured
}

// ============================================================================
// Components
// ============================================================================

struct Faulty;

impl Component for Faulty {
    fn render(&self, _cx: &RenderCx<'_>) -> VNode {
        h(
            "button",
            Props::new().on("click", |this, _| {
                let this = this.ok_or("no owner")?;
                this.emit("unheard", Value::Null);
                Err("click failed".into())
            }),
            ["x"],
        )
    }

    fn on_mounted(&self, _this: &ComponentHandle) -> HookResult {
        Err("mount hook failed".into())
    }

    fn on_unmounted(&self, _this: &ComponentHandle) -> HookResult {
        panic!("unmount hook exploded");
    }
}

fn faulty_app(dom: &std::rc::Rc<MemoryDom>, config: RuntimeConfig) -> App {
    App::new(
        dom.clone(),
        ComponentDef::new("Faulty", Faulty),
        PropMap::new(),
        AppOptions::default().with_config(config),
    )
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn failing_hook_is_logged_and_queue_continues() {
    let events = with_captured_events(|| {
        let dom = MemoryDom::new();
        let root = dom.create_root();
        let mut app = faulty_app(&dom, RuntimeConfig::default());
        app.mount(root).unwrap();
        assert_eq!(app.next_tick(), 1);

        app.unmount().unwrap();
        assert_eq!(app.next_tick(), 1);
    });

    let errors: Vec<_> = events.iter().filter(|e| e.level == Level::ERROR).collect();
    assert_eq!(errors.len(), 2, "{events:#?}");
    assert!(errors[0].message.contains("lifecycle job failed"));
    assert_eq!(errors[0].field("error"), Some("mount hook failed"));
    assert!(errors[1].message.contains("unmount hook exploded"));
}

#[test]
fn unhandled_emit_warns_and_handler_error_is_logged() {
    let events = with_captured_events(|| {
        let dom = MemoryDom::new();
        let root = dom.create_root();
        let mut app = faulty_app(&dom, RuntimeConfig::default());
        app.mount(root).unwrap();
        app.next_tick();

        let button = dom.child_nodes(root)[0];
        assert_eq!(dom.dispatch_event(button, "click", Value::Null), 1);
    });

    let warning = events
        .iter()
        .find(|e| e.level == Level::WARN)
        .expect("unhandled emit warns");
    assert!(warning.message.contains("no handlers"));
    assert_eq!(warning.field("command"), Some("unheard"));

    let handler_error = events
        .iter()
        .find(|e| e.message.contains("event handler failed"))
        .expect("handler error logged");
    assert_eq!(handler_error.level, Level::ERROR);
    assert_eq!(handler_error.field("event"), Some("click"));
}

#[test]
fn unhandled_warning_can_be_disabled() {
    let events = with_captured_events(|| {
        let dom = MemoryDom::new();
        let root = dom.create_root();
        let config = RuntimeConfig::default().with_warn_unhandled_events(false);
        let mut app = faulty_app(&dom, config);
        app.mount(root).unwrap();

        let button = dom.child_nodes(root)[0];
        dom.dispatch_event(button, "click", Value::Null);
    });

    assert!(events.iter().all(|e| e.level != Level::WARN), "{events:#?}");
}
