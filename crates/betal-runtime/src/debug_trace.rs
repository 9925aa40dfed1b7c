#![forbid(unsafe_code)]

//! Scoped stderr tracing controlled by environment variable.
//!
//! `BETAL_DEBUG_TRACE` takes a comma separated list of scopes (`mount`,
//! `patch`, `scheduler`) or `1`/`all` for everything:
//!
//! ```bash
//! BETAL_DEBUG_TRACE=patch,scheduler cargo test -p betal-runtime
//! ```
//!
//! The variable is read once; afterwards each check is a static load and a
//! bit test.

use std::sync::LazyLock;
use std::time::Instant;

/// Area of the runtime a trace line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceScope {
    /// Component mount and unmount.
    Mount,
    /// Component re-render and reconciliation.
    Patch,
    /// Lifecycle job flushes.
    Scheduler,
}

impl TraceScope {
    const ALL: u8 = 0b111;

    /// Lowercase scope name, as accepted in `BETAL_DEBUG_TRACE`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mount => "mount",
            Self::Patch => "patch",
            Self::Scheduler => "scheduler",
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Self::Mount => 0b001,
            Self::Patch => 0b010,
            Self::Scheduler => 0b100,
        }
    }
}

/// Parse a `BETAL_DEBUG_TRACE` value into a scope mask. Unknown tokens are
/// ignored.
pub fn parse_scopes(value: &str) -> u8 {
    value
        .split(',')
        .map(|token| token.trim().to_ascii_lowercase())
        .fold(0, |mask, token| {
            mask | match token.as_str() {
                "1" | "true" | "all" => TraceScope::ALL,
                "mount" => TraceScope::Mount.bit(),
                "patch" => TraceScope::Patch.bit(),
                "scheduler" => TraceScope::Scheduler.bit(),
                _ => 0,
            }
        })
}

static ENABLED_SCOPES: LazyLock<u8> = LazyLock::new(|| {
    std::env::var("BETAL_DEBUG_TRACE")
        .map(|value| parse_scopes(&value))
        .unwrap_or(0)
});

static START_TIME: LazyLock<Instant> = LazyLock::new(Instant::now);

/// Whether tracing is enabled for `scope`.
#[inline]
pub fn is_enabled(scope: TraceScope) -> bool {
    *ENABLED_SCOPES & scope.bit() != 0
}

/// Milliseconds since the first trace call.
#[inline]
pub fn elapsed_ms() -> u64 {
    START_TIME.elapsed().as_millis() as u64
}

/// Print a trace line to stderr when `scope` is enabled.
///
/// ```ignore
/// debug_trace!(Scheduler, "flush ran {} jobs", ran);
/// ```
#[macro_export]
macro_rules! debug_trace {
    ($scope:ident, $($arg:tt)*) => {
        if $crate::debug_trace::is_enabled($crate::debug_trace::TraceScope::$scope) {
            eprintln!(
                "[betal {:>8}ms {:<9}] {}",
                $crate::debug_trace::elapsed_ms(),
                $crate::debug_trace::TraceScope::$scope.name(),
                format_args!($($arg)*)
            );
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_lists_and_wildcards() {
        assert_eq!(parse_scopes(""), 0);
        assert_eq!(parse_scopes("0"), 0);
        assert_eq!(parse_scopes("1"), TraceScope::ALL);
        assert_eq!(parse_scopes("ALL"), TraceScope::ALL);
        assert_eq!(
            parse_scopes(" patch , Scheduler,bogus"),
            TraceScope::Patch.bit() | TraceScope::Scheduler.bit()
        );
    }

    #[test]
    fn macro_expands_for_every_scope() {
        crate::debug_trace!(Mount, "mount {}", 1);
        crate::debug_trace!(Patch, "patch");
        crate::debug_trace!(Scheduler, "ran {} jobs", 0);
        let _ = elapsed_ms();
    }
}
