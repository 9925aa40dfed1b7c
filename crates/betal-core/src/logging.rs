#![forbid(unsafe_code)]

//! Optional tracing for the diff kernel.
//!
//! With the `tracing` feature the kernel opens a `diff_sequence` span and
//! emits the script length at trace level. Without it both macros compile
//! away, so the kernel stays dependency-free for adapters that do not log.

#[cfg(feature = "tracing")]
pub use tracing::{debug_span, trace};

#[cfg(not(feature = "tracing"))]
mod noop_macros {
    /// Expands to a [`NoopSpan`](crate::logging::NoopSpan).
    #[macro_export]
    macro_rules! debug_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }

    /// Expands to nothing.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }
}

/// Stand-in span when tracing is compiled out.
#[cfg(not(feature = "tracing"))]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    /// Returns a guard that does nothing on drop.
    pub fn enter(&self) -> NoopGuard {
        NoopGuard
    }
}

/// Guard returned by [`NoopSpan::enter`].
#[cfg(not(feature = "tracing"))]
pub struct NoopGuard;
