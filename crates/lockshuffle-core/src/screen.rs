#![forbid(unsafe_code)]

//! Per-screen drawing surface abstraction.
//!
//! The scheduler never draws anything itself. Every pixel-touching operation
//! goes through [`ScreenSurface`], which the host implements once per physical
//! screen (display head). The scheduler's entire discipline toward the shared
//! drawing state is:
//!
//! 1. snapshot the shared pen attributes once, the first time it sees a screen;
//! 2. restore that snapshot whenever a mode switch may have left the pen dirty;
//! 3. ask the host to re-fix the colormap after the restore.
//!
//! [`PenValues`] carries the snapshot. The scheduler stores and replays it but
//! never interprets individual fields; they exist so hosts backed by an
//! X11-style shared graphics context know exactly which attributes round-trip.

use crate::params::AnimationParams;

// ---------------------------------------------------------------------------
// Pen snapshot
// ---------------------------------------------------------------------------

/// Snapshot of the shared drawing-context attributes a mode may mutate.
///
/// Field meanings follow the X11 `XGCValues` members the original protocol
/// saves (function, line width/style, cap style, join style, graphics
/// exposures, font, subwindow mode). Hosts on other backends are free to map
/// these however they like, or ignore fields that have no analogue; the
/// scheduler treats the whole struct as an opaque payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PenValues {
    /// Raster operation (e.g. `GXcopy`).
    pub function: u32,
    /// Line width in pixels; 0 means the backend's thin-line fast path.
    pub line_width: i32,
    /// Solid / on-off dash / double dash.
    pub line_style: u32,
    /// Line cap style.
    pub cap_style: u32,
    /// Line join style.
    pub join_style: u32,
    /// Whether drawing generates exposure events.
    pub graphics_exposures: bool,
    /// Backend font handle.
    pub font: u64,
    /// Clipping behavior with respect to subwindows.
    pub subwindow_mode: u32,
}

// ---------------------------------------------------------------------------
// Screen surface
// ---------------------------------------------------------------------------

/// One physical screen, as seen by the scheduler.
///
/// The host passes a surface into every scheduler entry point. The scheduler
/// uses it to identify the screen, blank it on switches, and restore shared
/// drawing state; modes receive it (wrapped in a [`ModeContext`]) to paint.
pub trait ScreenSurface {
    /// Stable zero-based index of this screen.
    fn index(&self) -> usize;

    /// Whether this screen makes the scheduling decisions.
    ///
    /// Screen 0 is the timing authority: switches are decided only while
    /// processing it, and the other screens pick up the new mode on their own
    /// next tick. That convention is the entire multi-screen coordination
    /// mechanism, so overriding this is rarely a good idea.
    fn is_authority(&self) -> bool {
        self.index() == 0
    }

    /// Blank the drawable ahead of a newly switched-in mode's first frame.
    fn clear(&mut self);

    /// Read the current shared pen attributes.
    fn pen(&self) -> PenValues;

    /// Overwrite the shared pen attributes from a snapshot.
    fn set_pen(&mut self, pen: &PenValues);

    /// Re-fix the colormap for the current mode's color demands.
    fn fix_colormap(&mut self, ncolors: u32, saturation: f32);
}

// ---------------------------------------------------------------------------
// Mode context
// ---------------------------------------------------------------------------

/// Everything a mode hook gets to see: its screen and the live knobs.
///
/// Modes read the same process-wide [`AnimationParams`] every frame (the
/// scheduler overwrites them on each switch with the incoming mode's
/// defaults), and draw through the screen's surface. Per-screen private state
/// is the mode's own business, keyed off [`ScreenSurface::index`].
pub struct ModeContext<'a> {
    /// The screen being initialized / drawn / released / refreshed.
    pub surface: &'a mut dyn ScreenSurface,
    /// Live animation parameters for the active mode.
    pub params: &'a AnimationParams,
}

impl ModeContext<'_> {
    /// Shorthand for the screen index, for modes keeping per-screen state.
    pub fn screen(&self) -> usize {
        self.surface.index()
    }
}
