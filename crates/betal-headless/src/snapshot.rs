#![forbid(unsafe_code)]

//! Serializable subtree snapshots.
//!
//! Snapshots are plain data, detached from the arena, so tests can compare
//! whole trees or persist them as JSON golden files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A captured node and its descendants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeSnapshot {
    /// A text node.
    Text {
        /// Text content.
        text: String,
    },
    /// An element node.
    Element {
        /// Tag name.
        tag: String,
        /// String attributes.
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        attributes: BTreeMap<String, String>,
        /// Direct properties.
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        properties: BTreeMap<String, Value>,
        /// Class tokens in insertion order.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        classes: Vec<String>,
        /// Inline style properties.
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        style: BTreeMap<String, String>,
        /// Child snapshots.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<NodeSnapshot>,
    },
}

impl NodeSnapshot {
    /// Tag name for elements, `None` for text.
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Element { tag, .. } => Some(tag),
            Self::Text { .. } => None,
        }
    }

    /// Children of an element; empty for text.
    pub fn children(&self) -> &[NodeSnapshot] {
        match self {
            Self::Element { children, .. } => children,
            Self::Text { .. } => &[],
        }
    }

    /// Render as pretty JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
