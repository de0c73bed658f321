#![forbid(unsafe_code)]

//! Switch protocol: moving the running system into a newly picked mode.
//!
//! A switch is deliberately small: record previous/current, install the
//! incoming mode's declared defaults into the live animation knobs, and mark
//! every screen as needing shared-state restoration. It does *not* invoke the
//! new mode's `init` hook — the scheduler does that after the per-screen
//! fixup has run, so the ordering on each screen is always
//! restore-shared-state → fixup → init-new-mode.
//!
//! # Per-screen restoration
//!
//! The outgoing mode may have scribbled on the shared pen (line width, raster
//! function, font, ...). Each screen carries a snapshot of the pristine pen,
//! taken the first time the scheduler saw that screen; the fixup flag set
//! here tells the scheduler to replay that snapshot and re-fix the colormap
//! the next time it holds that screen's surface, before any hook of the new
//! mode runs there.

use lockshuffle_core::mode::ModeRegistry;
use lockshuffle_core::params::AnimationParams;
use lockshuffle_core::screen::PenValues;
use tracing::info;

/// Per-screen bookkeeping owned by the scheduler.
#[derive(Debug, Clone, Default)]
pub(crate) struct ScreenSlot {
    /// Pristine pen snapshot, taken on first contact with the screen.
    pub saved_pen: Option<PenValues>,
    /// Shared drawing state needs restoring before the next hook runs here.
    pub fix: bool,
    /// The new mode's `init` hook has not yet run on this screen.
    pub pending_init: bool,
}

/// Tracks the active and previously active mode and performs switches.
#[derive(Debug)]
pub(crate) struct ModeSwitcher {
    current: Option<usize>,
    previous: Option<usize>,
    verbose: bool,
}

impl ModeSwitcher {
    pub fn new(verbose: bool) -> Self {
        Self {
            current: None,
            previous: None,
            verbose,
        }
    }

    /// Registry index of the active mode, once the first switch happened.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Registry index of the mode switched away from, if it differs.
    pub fn previous(&self) -> Option<usize> {
        self.previous
    }

    /// Collapse previous onto current after its release hook ran.
    pub fn mark_released(&mut self) {
        self.previous = self.current;
    }

    /// Transition into `new_index`: bookkeeping, live params, fixup marking.
    pub fn set_mode(
        &mut self,
        registry: &ModeRegistry,
        params: &mut AnimationParams,
        slots: &mut [ScreenSlot],
        new_index: usize,
    ) {
        self.previous = self.current;
        self.current = Some(new_index);

        let entry = registry
            .get(new_index)
            .expect("picker only yields registry indices");
        params.apply(entry.defaults());

        for slot in slots.iter_mut() {
            slot.fix = true;
        }

        if self.verbose {
            info!(mode = entry.name(), "mode");
        }
    }
}
