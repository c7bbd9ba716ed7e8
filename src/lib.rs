//! # flight-models: hierarchical state machines, guarded procedures, and a
//! real-time container
//!
//! Three behavioural-model kinds used to build dependable flight/embedded
//! software, sharing one design: topology (nodes, transitions/flows,
//! guards, actions) is declared once and executed deterministically, and
//! can be **derived** — a new descriptor reusing a base's topology while
//! overriding selected callbacks.
//!
//! - [`sm`] — hierarchical UML-style state machines: choice
//!   pseudo-states, guarded transitions, entry/do/exit actions, SMs
//!   embedded inside proper states.
//! - [`pr`] — activity-style procedures: action and decision nodes
//!   connected by guarded control flows, single-sweep execution.
//! - [`rt`] — a thread-bearing real-time container wrapping a functional
//!   behaviour in a notification/activation loop (`std` only).
//!
//! ## Dynamic vs. static creation
//!
//! Both engines separate a model's *topology* (which nodes exist, how
//! they're wired) from its *extension* (callback tables, runtime
//! counters, user data). [`sm::SmBuilder`]/[`pr::PrBuilder`] build
//! heap-backed topology (the "Dynamic-creation module"); `static_sm!`/
//! `static_pr!` wire up `'static` const arrays instead (the
//! "Static-creation module", for `no_std`/no-alloc targets). Both satisfy
//! the same [`sm::SmTopology`]/[`pr::PrTopology`] trait, so the execution
//! engine in [`sm::SmDescriptor`]/[`pr::PrDescriptor`] is written once and
//! works against either.
//!
//! ## Features
//!
//! - `std` (default): enables [`rt`] and `std::error::Error` impls.
//! - `alloc` (default via `std`): enables the heap-backed builders.
//! - `logging` (default): routes the engines' internal trace/debug/warn
//!   points through the [`log`] crate; compiles to nothing when disabled.
//!
//! A `no_std`, no-`alloc` build still gets the `static_sm!`/`static_pr!`
//! macros to lay out topology, though the execution engine itself
//! currently lives in the `alloc`-gated [`sm`]/[`pr`] modules.
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

mod logging;

pub mod error;
#[cfg(feature = "alloc")]
pub mod pr;
#[cfg(feature = "std")]
pub mod rt;
#[cfg(feature = "alloc")]
pub mod sm;
pub mod static_macros;

pub use error::ErrorCode;
