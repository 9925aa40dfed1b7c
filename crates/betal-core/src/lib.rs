#![forbid(unsafe_code)]

//! Core: the platform adapter contract and the keyed-list diff kernel.
//!
//! `betal-core` has no notion of components or virtual nodes. It defines what
//! a presentation backend must provide ([`platform::Platform`]) and the pure
//! sequence/map diffing routines the reconciliation engine in
//! `betal-runtime` is built on.

pub mod diff;
pub mod logging;
pub mod objects;
pub mod platform;

// Kernel tracing macros at the crate root.
#[cfg(feature = "tracing")]
pub use logging::{debug_span, trace};

pub use diff::{DiffOp, apply_sequence, diff_sequence};
pub use objects::{ArraysDiff, ObjectsDiff, arrays_diff, class_tokens, objects_diff};
pub use platform::{EventCallback, ListenerId, Microtask, NodeId, Platform};
