#![forbid(unsafe_code)]

//! Core: mode lifecycle, the mode registry, and screen abstractions.
//!
//! # Role in lockshuffle
//! `lockshuffle-core` is the vocabulary crate. It defines what a "mode" is
//! (a self-contained animation exposing init/draw/release/refresh hooks),
//! how modes are described and classified ([`ModeDescriptor`], [`ModeFlags`],
//! [`ModeRegistry`]), the opaque per-screen drawing surface the host provides
//! ([`ScreenSurface`]), the live animation knobs every mode reads each frame
//! ([`AnimationParams`]), and the wall-clock seam ([`WallClock`]).
//!
//! The scheduler that actually sequences modes lives in `lockshuffle-runtime`.
//!
//! [`ModeDescriptor`]: mode::ModeDescriptor
//! [`ModeFlags`]: mode::ModeFlags
//! [`ModeRegistry`]: mode::ModeRegistry
//! [`ScreenSurface`]: screen::ScreenSurface
//! [`AnimationParams`]: params::AnimationParams
//! [`WallClock`]: time::WallClock

pub mod mode;
pub mod params;
pub mod screen;
pub mod time;

pub use mode::{
    ModeDefaults, ModeDescriptor, ModeFlags, ModeHooks, ModeRegistry, NoopHooks, RegistryError,
};
pub use params::AnimationParams;
pub use screen::{ModeContext, PenValues, ScreenSurface};
pub use time::{ManualClock, SystemClock, WallClock};
