//! Zero-cost tracing macros.
//!
//! Mirrors the pattern of gating every internal trace call behind a Cargo
//! feature so that a build without `logging` carries no tracing code at all
//! on the execution path, not even a disabled-level check. When `logging`
//! is off these macros expand to nothing; the arguments are not evaluated.

#[cfg(feature = "logging")]
#[macro_export]
#[doc(hidden)]
macro_rules! log_trace {
    ($($arg:tt)*) => { $crate::__log::trace!($($arg)*); };
}

#[cfg(not(feature = "logging"))]
#[macro_export]
#[doc(hidden)]
macro_rules! log_trace {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "logging")]
#[macro_export]
#[doc(hidden)]
macro_rules! log_debug {
    ($($arg:tt)*) => { $crate::__log::debug!($($arg)*); };
}

#[cfg(not(feature = "logging"))]
#[macro_export]
#[doc(hidden)]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "logging")]
#[macro_export]
#[doc(hidden)]
macro_rules! log_warn {
    ($($arg:tt)*) => { $crate::__log::warn!($($arg)*); };
}

#[cfg(not(feature = "logging"))]
#[macro_export]
#[doc(hidden)]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "logging")]
#[doc(hidden)]
pub use log as __log;
