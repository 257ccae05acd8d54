#![forbid(unsafe_code)]

//! Logging facade.
//!
//! With the `tracing` feature the usual `tracing` macros are re-exported here
//! and at the crate root. Without it, same-named macros expand to nothing so
//! call sites never need their own `#[cfg]`.

#[cfg(feature = "tracing")]
pub use tracing::{debug, debug_span, info, trace, warn};

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {};
}

/// No-op span stand-in; `enter()` returns a guard that does nothing.
#[cfg(not(feature = "tracing"))]
#[doc(hidden)]
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    #[inline]
    pub const fn enter(&self) -> NoopSpan {
        NoopSpan
    }
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! debug_span {
    ($($arg:tt)*) => {
        $crate::logging::NoopSpan
    };
}
