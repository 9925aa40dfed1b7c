#![forbid(unsafe_code)]

//! Attribute, class and style application.
//!
//! Attribute values follow three paths: `null` removes, `data-*` names go
//! through the string attribute API, everything else is assigned as a node
//! property.

use betal_core::platform::DATA_ATTRIBUTE_PREFIX;
use betal_core::{NodeId, Platform};
use serde_json::Value;

use crate::vnode::{ClassList, Props};

/// Apply class, style and attributes of `props` to a fresh element.
pub(crate) fn set_attributes(platform: &dyn Platform, el: NodeId, props: &Props) {
    if let Some(class) = &props.class {
        set_class(platform, el, class);
    }
    for (property, value) in &props.style {
        platform.set_style_property(el, property, value);
    }
    for (name, value) in &props.attrs {
        set_attribute(platform, el, name, value);
    }
}

fn set_class(platform: &dyn Platform, el: NodeId, class: &ClassList) {
    for token in class.tokens() {
        platform.add_class(el, &token);
    }
}

/// Set one attribute.
pub(crate) fn set_attribute(platform: &dyn Platform, el: NodeId, name: &str, value: &Value) {
    if value.is_null() {
        remove_attribute(platform, el, name);
    } else if name.starts_with(DATA_ATTRIBUTE_PREFIX) {
        platform.set_attribute(el, name, &attribute_text(value));
    } else {
        platform.set_property(el, name, value);
    }
}

/// Clear both the property and the attribute named `name`.
pub(crate) fn remove_attribute(platform: &dyn Platform, el: NodeId, name: &str) {
    platform.remove_property(el, name);
    platform.remove_attribute(el, name);
}

/// String form of an attribute value; strings are used verbatim.
fn attribute_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
