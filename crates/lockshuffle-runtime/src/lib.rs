#![forbid(unsafe_code)]

//! lockshuffle runtime: mode-list parsing, pick sequencing, and the
//! switch protocol.
//!
//! # Key components
//!
//! - [`parse_mode_list`] - allow/deny mode-list strings into candidate sets
//! - [`ModePicker`] - full-coverage, no-immediate-repeat pick sequencing
//! - [`RandomScheduler`] - the per-frame orchestrator the host drives
//! - [`SchedulerConfig`] - startup configuration (duration, mode list, ...)
//!
//! # Role in lockshuffle
//! `lockshuffle-runtime` is the orchestrator. It consumes the mode registry
//! and screen surfaces from `lockshuffle-core`, decides when to switch and
//! what to switch to, and dispatches every lifecycle hook of the active mode.
//!
//! The host's obligation is small: build a registry, construct one
//! [`RandomScheduler`], and call `init`/`draw`/`refresh`/`change`/`release`
//! once per screen per frame or event. Everything else is internal.

pub mod modelist;
pub mod picker;
pub mod scheduler;

mod clock;
mod switcher;

pub use modelist::{ParsedModeList, parse_mode_list};
pub use picker::{ModePicker, Selection};
pub use scheduler::{RandomScheduler, SchedulerConfig, SchedulerError};
