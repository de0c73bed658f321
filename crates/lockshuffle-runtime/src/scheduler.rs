#![forbid(unsafe_code)]

//! The random-mode scheduler: ties parsing, picking, and switching into the
//! per-frame entry points the host drives.
//!
//! # Protocol with the host
//!
//! The host calls, once per physical screen:
//!
//! - [`RandomScheduler::init`] when a screen comes up (and after refresh-worthy
//!   disruptions),
//! - [`RandomScheduler::draw`] once per animation frame,
//! - [`RandomScheduler::refresh`] on window-uncover events,
//! - [`RandomScheduler::change`] on an explicit "next mode now" request,
//! - [`RandomScheduler::release`] when tearing a switched-away mode down.
//!
//! # Screen-0 authority
//!
//! All scheduling decisions (when to switch, which mode comes next) happen
//! only while processing the authority screen (index 0). Other screens
//! observe the already-updated current mode on their own next tick. That
//! convention keeps every screen in lockstep on the same mode without any
//! locking; it also means [`RandomScheduler::change`] from a non-authority
//! screen performs a draw step but cannot trigger a global switch.
//!
//! # Single-threaded by design
//!
//! Nothing here suspends, blocks, or spawns. All state mutation happens
//! synchronously inside the entry points; the only external query is the
//! wall clock.

use lockshuffle_core::mode::ModeRegistry;
use lockshuffle_core::params::AnimationParams;
use lockshuffle_core::screen::{ModeContext, ScreenSurface};
use lockshuffle_core::time::{SystemClock, WallClock};
use std::fmt;
use tracing::debug;

use crate::clock::ScheduleClock;
use crate::modelist::parse_mode_list;
use crate::picker::{ModePicker, Selection};
use crate::switcher::{ModeSwitcher, ScreenSlot};

/// Default seconds a mode runs before an automatic switch.
const DEFAULT_DURATION_SECS: i64 = 60;

/// Configuration read once at startup (CLI flags / resources in the
/// original host).
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Seconds each mode runs; 0 = never switch automatically. Negative
    /// values are clamped to 0. Default: 60.
    pub duration_secs: i64,
    /// Allow/deny mode list (see the `modelist` module). Default: empty,
    /// which selects every non-meta mode.
    pub modelist: String,
    /// Walk modes round-robin instead of picking randomly. Default: false.
    pub sequential: bool,
    /// Emit an `info!` diagnostic naming each newly active mode.
    /// Default: false.
    pub verbose: bool,
    /// Physical screens the host drives. Screens beyond this count are
    /// accommodated on first contact. Default: 1.
    pub screen_count: usize,
    /// Fixed RNG seed for reproducible pick sequences. Default: none
    /// (entropy-seeded).
    pub seed: Option<u64>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_DURATION_SECS,
            modelist: String::new(),
            sequential: false,
            verbose: false,
            screen_count: 1,
            seed: None,
        }
    }
}

/// Error constructing a [`RandomScheduler`].
#[derive(Debug)]
pub enum SchedulerError {
    /// The registry has no modes at all; there is nothing to schedule.
    EmptyRegistry,
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRegistry => write!(f, "mode registry is empty"),
        }
    }
}

impl std::error::Error for SchedulerError {}

/// Which lifecycle hook to dispatch to the active mode.
#[derive(Debug, Clone, Copy)]
enum Hook {
    Init,
    Draw,
    Release,
    Refresh,
}

/// The top-level orchestrator. One instance per process.
///
/// Owns the registry (hooks need mutable access), the live animation
/// parameters, the pick pool, the switch bookkeeping, and per-screen slots.
pub struct RandomScheduler {
    registry: ModeRegistry,
    config: SchedulerConfig,
    params: AnimationParams,
    picker: Option<ModePicker>,
    switcher: ModeSwitcher,
    clock: ScheduleClock,
    slots: Vec<ScreenSlot>,
    wall: Box<dyn WallClock>,
}

impl RandomScheduler {
    /// Create a scheduler over `registry` with the production wall clock.
    pub fn new(registry: ModeRegistry, config: SchedulerConfig) -> Result<Self, SchedulerError> {
        Self::with_clock(registry, config, Box::new(SystemClock::new()))
    }

    /// Create a scheduler with an explicit wall clock (tests drive a
    /// [`ManualClock`](lockshuffle_core::time::ManualClock) here).
    pub fn with_clock(
        registry: ModeRegistry,
        config: SchedulerConfig,
        wall: Box<dyn WallClock>,
    ) -> Result<Self, SchedulerError> {
        if registry.is_empty() {
            return Err(SchedulerError::EmptyRegistry);
        }
        let clock = ScheduleClock::new(config.duration_secs);
        let switcher = ModeSwitcher::new(config.verbose);
        let slots = vec![ScreenSlot::default(); config.screen_count.max(1)];
        Ok(Self {
            registry,
            config,
            params: AnimationParams::default(),
            picker: None,
            switcher,
            clock,
            slots,
            wall,
        })
    }

    /// Name of the active mode, once the first pick happened.
    pub fn current_mode(&self) -> Option<&str> {
        self.switcher
            .current()
            .and_then(|i| self.registry.get(i))
            .map(|e| e.name())
    }

    /// Live animation parameters of the active mode.
    pub fn params(&self) -> &AnimationParams {
        &self.params
    }

    /// Re-parse a new mode list and rebuild the pick pool from scratch.
    ///
    /// The active mode keeps running until the next switch; only future picks
    /// draw from the new candidate set.
    pub fn set_mode_list(&mut self, modelist: &str) {
        self.config.modelist = modelist.to_owned();
        if self.picker.is_some() {
            self.picker = Some(self.build_picker());
        }
    }

    /// Bring a screen up: first-ever call starts the whole scheduler.
    ///
    /// Concludes by invoking the current mode's `init` hook for this screen.
    pub fn init(&mut self, surface: &mut dyn ScreenSurface) {
        let s = surface.index();
        self.ensure_slot(s);

        if self.switcher.current().is_none() {
            self.start(surface);
        }

        if self.slots[s].saved_pen.is_none() {
            self.slots[s].saved_pen = Some(surface.pen());
        }
        if self.slots[s].fix {
            self.fixup(surface);
        }
        if let Some(current) = self.switcher.current() {
            self.run_hook(surface, current, Hook::Init);
            self.slots[s].pending_init = false;
        }
    }

    /// Advance one animation frame on a screen.
    ///
    /// On the authority screen this is also where switches are decided;
    /// always concludes by invoking the current mode's `draw` hook.
    pub fn draw(&mut self, surface: &mut dyn ScreenSurface) {
        let s = surface.index();
        self.ensure_slot(s);
        if self.switcher.current().is_none() {
            self.init(surface);
        }

        let now = self.wall.seconds();
        if surface.is_authority() && self.clock.should_switch(now) {
            let new_index = self.picker.as_mut().map(ModePicker::pick);
            if let Some(new_index) = new_index {
                debug!(
                    from = self.current_mode(),
                    to = self.registry.get(new_index).map(|e| e.name()),
                    "switching modes"
                );
                surface.clear();
                self.switcher
                    .set_mode(&self.registry, &mut self.params, &mut self.slots, new_index);
                self.clock.reset(now);
                for slot in &mut self.slots {
                    slot.pending_init = true;
                }
            }
        }

        if self.slots[s].fix {
            self.fixup(surface);
        }
        if self.slots[s].pending_init {
            if let Some(current) = self.switcher.current() {
                self.run_hook(surface, current, Hook::Init);
            }
            self.slots[s].pending_init = false;
        }
        if let Some(current) = self.switcher.current() {
            self.run_hook(surface, current, Hook::Draw);
        }
    }

    /// Repaint after the drawable was damaged: delegates to the current
    /// mode's `refresh` hook. No-op before the first init.
    pub fn refresh(&mut self, surface: &mut dyn ScreenSurface) {
        self.ensure_slot(surface.index());
        if let Some(current) = self.switcher.current() {
            self.run_hook(surface, current, Hook::Refresh);
        }
    }

    /// Force a switch now.
    ///
    /// Only the authority screen can arm the request; the draw step that
    /// follows makes the switch take effect without waiting for the next
    /// natural frame tick. Called from elsewhere this is just a draw.
    pub fn change(&mut self, surface: &mut dyn ScreenSurface) {
        if surface.is_authority() {
            self.clock.request_change();
        }
        self.draw(surface);
    }

    /// Release the mode that was switched away from, at most once.
    pub fn release(&mut self, surface: &mut dyn ScreenSurface) {
        self.ensure_slot(surface.index());
        if let (Some(previous), Some(current)) = (self.switcher.previous(), self.switcher.current())
        {
            if previous != current {
                self.run_hook(surface, previous, Hook::Release);
            }
        }
        self.switcher.mark_released();
    }

    // -- internals ----------------------------------------------------------

    /// First-ever contact: parse the mode list, seed the pool, switch into an
    /// initial mode, and start the clock.
    fn start(&mut self, surface: &mut dyn ScreenSurface) {
        let s = surface.index();
        self.slots[s].saved_pen = Some(surface.pen());

        let mut picker = self.build_picker();
        let first = picker.pick();
        self.picker = Some(picker);

        self.switcher
            .set_mode(&self.registry, &mut self.params, &mut self.slots, first);
        self.clock.reset(self.wall.seconds());
    }

    fn build_picker(&self) -> ModePicker {
        let parsed = parse_mode_list(&self.registry, &self.config.modelist);
        let selection = if self.config.sequential {
            Selection::Sequential
        } else {
            Selection::Random
        };
        match self.config.seed {
            Some(seed) => ModePicker::seeded(parsed.candidates, selection, seed),
            None => ModePicker::new(parsed.candidates, selection),
        }
    }

    fn ensure_slot(&mut self, index: usize) {
        if index >= self.slots.len() {
            self.slots.resize(index + 1, ScreenSlot::default());
        }
    }

    /// Restore this screen's pristine pen and re-fix its colormap.
    fn fixup(&mut self, surface: &mut dyn ScreenSurface) {
        let slot = &mut self.slots[surface.index()];
        if let Some(pen) = &slot.saved_pen {
            surface.set_pen(pen);
        }
        surface.fix_colormap(self.params.ncolors, self.params.saturation);
        slot.fix = false;
    }

    fn run_hook(&mut self, surface: &mut dyn ScreenSurface, index: usize, hook: Hook) {
        let Self {
            registry, params, ..
        } = self;
        let Some(entry) = registry.get_mut(index) else {
            return;
        };
        let mut ctx = ModeContext {
            surface,
            params: &*params,
        };
        match hook {
            Hook::Init => entry.hooks_mut().init(&mut ctx),
            Hook::Draw => entry.hooks_mut().draw(&mut ctx),
            Hook::Release => entry.hooks_mut().release(&mut ctx),
            Hook::Refresh => entry.hooks_mut().refresh(&mut ctx),
        }
    }
}

impl fmt::Debug for RandomScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomScheduler")
            .field("current", &self.current_mode())
            .field("config", &self.config)
            .field("candidates", &self.picker.as_ref().map(ModePicker::candidate_count))
            .field("screens", &self.slots.len())
            .finish_non_exhaustive()
    }
}
