#![forbid(unsafe_code)]

//! lockshuffle public facade crate.
//!
//! Re-exports the stable surface area: the mode vocabulary from
//! `lockshuffle-core` and the scheduler from `lockshuffle-runtime`.
//!
//! # Quick start
//!
//! ```
//! use lockshuffle::{
//!     ModeContext, ModeDescriptor, ModeHooks, ModeRegistry, RandomScheduler, SchedulerConfig,
//! };
//!
//! struct Sparks;
//!
//! impl ModeHooks for Sparks {
//!     fn init(&mut self, _ctx: &mut ModeContext<'_>) {}
//!     fn draw(&mut self, _ctx: &mut ModeContext<'_>) {}
//! }
//!
//! let registry = ModeRegistry::new(vec![ModeDescriptor::new("sparks", Box::new(Sparks))])?;
//! let mut scheduler = RandomScheduler::new(registry, SchedulerConfig::default())?;
//! // Per screen, per frame: scheduler.init(&mut surface); scheduler.draw(&mut surface); ...
//! # let _ = &mut scheduler;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// --- Core re-exports -------------------------------------------------------

pub use lockshuffle_core::mode::{
    ModeDefaults, ModeDescriptor, ModeFlags, ModeHooks, ModeRegistry, NoopHooks, RegistryError,
};
pub use lockshuffle_core::params::AnimationParams;
pub use lockshuffle_core::screen::{ModeContext, PenValues, ScreenSurface};
pub use lockshuffle_core::time::{ManualClock, SystemClock, WallClock};

// --- Runtime re-exports ----------------------------------------------------

pub use lockshuffle_runtime::{
    ModePicker, ParsedModeList, RandomScheduler, SchedulerConfig, SchedulerError, Selection,
    parse_mode_list,
};

/// Commonly used imports for hosts and mode implementations.
pub mod prelude {
    pub use crate::{
        AnimationParams, ModeContext, ModeDefaults, ModeDescriptor, ModeFlags, ModeHooks,
        ModeRegistry, PenValues, RandomScheduler, SchedulerConfig, ScreenSurface,
    };
}
