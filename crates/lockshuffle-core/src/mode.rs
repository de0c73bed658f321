#![forbid(unsafe_code)]

//! Mode lifecycle trait, descriptors, classification flags, and the registry.
//!
//! A "mode" is one self-contained animation: bouncing balls, a plasma plot, a
//! voting-model cellular simulation. Each mode exposes four lifecycle hooks
//! ([`ModeHooks`]) operating on an opaque per-screen context, and declares the
//! animation defaults the scheduler installs whenever the mode becomes active.
//!
//! The host constructs every [`ModeDescriptor`] once at startup, collects them
//! into a [`ModeRegistry`] in a stable order, and hands the registry to the
//! scheduler. The registry is structurally immutable afterward: no mode is
//! ever added or removed while the scheduler runs.
//!
//! # Classification
//!
//! Mode-list group keywords (`allgl`, `allnice`, ...) resolve against
//! [`ModeFlags`] carried by each descriptor, so group membership travels with
//! the registry rather than being compiled into the parser. [`META`] marks
//! entries like "blank" that are addressable by name but excluded from `all`
//! and from the empty-list fallback.
//!
//! [`META`]: ModeFlags::META

use std::fmt;

use bitflags::bitflags;

use crate::screen::ModeContext;

// ---------------------------------------------------------------------------
// Lifecycle hooks
// ---------------------------------------------------------------------------

/// The four lifecycle hooks every mode implements.
///
/// Hooks are invoked once per screen per event: `init` when the mode becomes
/// active on a screen (and again after refresh-worthy disruptions), `draw`
/// once per animation frame, `release` when the mode is being switched away
/// from for good, `refresh` when the window was uncovered and needs repainting.
///
/// Per-screen private state is the implementation's own concern, typically a
/// small per-screen vector indexed by [`ModeContext::screen`].
pub trait ModeHooks {
    /// Prepare per-screen state and paint the first frame's backdrop.
    fn init(&mut self, ctx: &mut ModeContext<'_>);

    /// Paint one animation frame.
    fn draw(&mut self, ctx: &mut ModeContext<'_>);

    /// Tear down per-screen state after the mode was switched away from.
    ///
    /// Default: nothing to tear down.
    fn release(&mut self, ctx: &mut ModeContext<'_>) {
        let _ = ctx;
    }

    /// Repaint after the drawable was damaged (e.g. window uncovered).
    ///
    /// Default: re-run `init`, which is how most classic modes repaint.
    fn refresh(&mut self, ctx: &mut ModeContext<'_>) {
        self.init(ctx);
    }
}

/// A mode that draws nothing.
///
/// Handy for "blank"-style meta entries and for tests that only exercise
/// scheduling, not painting.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl ModeHooks for NoopHooks {
    fn init(&mut self, _ctx: &mut ModeContext<'_>) {}

    fn draw(&mut self, _ctx: &mut ModeContext<'_>) {}

    fn refresh(&mut self, _ctx: &mut ModeContext<'_>) {}
}

// ---------------------------------------------------------------------------
// Defaults and flags
// ---------------------------------------------------------------------------

/// Default delay between draw ticks (µs) when a mode declares nothing better.
const DEFAULT_DELAY_MICROS: u64 = 50_000;

/// Default colormap size.
const DEFAULT_NCOLORS: u32 = 64;

/// Animation defaults a mode declares once; installed into the live
/// [`AnimationParams`](crate::params::AnimationParams) on every switch.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeDefaults {
    /// Microseconds between draw ticks.
    pub delay_micros: u64,
    /// Object/batch count; negative requests a randomized count.
    pub count: i32,
    /// Cycles before the animation restarts.
    pub cycles: u32,
    /// Object size hint; negative means "pick for me".
    pub size: i32,
    /// Colors to allocate.
    pub ncolors: u32,
    /// Color saturation in `[0.0, 1.0]`.
    pub saturation: f32,
}

impl Default for ModeDefaults {
    fn default() -> Self {
        Self {
            delay_micros: DEFAULT_DELAY_MICROS,
            count: 1,
            cycles: 1,
            size: 1,
            ncolors: DEFAULT_NCOLORS,
            saturation: 1.0,
        }
    }
}

bitflags! {
    /// Classification flags consumed by mode-list group keywords.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ModeFlags: u16 {
        /// Meta entry (blank/bomb style): addressable by name, excluded from
        /// `all`, every group, and the empty-list fallback.
        const META = 1 << 0;
        /// Renders through GL.
        const GL = 1 << 1;
        /// Unstable / hacker-grade mode, excluded from `allstable`.
        const UNSTABLE = 1 << 2;
        /// Heavy CPU burner, excluded from `allnice`.
        const CPU_HEAVY = 1 << 3;
        /// Supports red/blue 3d glasses rendering (`all3d`).
        const USE_3D = 1 << 4;
        /// Can display XPM imagery (`allxpm`).
        const XPM = 1 << 5;
        /// Writes recognizable text/imagery (`allwrite`).
        const WRITABLE = 1 << 6;
        /// Tracks the pointer (`allmouse`).
        const MOUSE = 1 << 7;
        /// Cellular automaton (`allautomata`).
        const AUTOMATA = 1 << 8;
        /// Fractal renderer (`allfractal`).
        const FRACTAL = 1 << 9;
        /// Geometric pattern renderer (`allgeometry`).
        const GEOMETRY = 1 << 10;
        /// Astronomy/space themed (`allspace`).
        const SPACE = 1 << 11;
    }
}

// ---------------------------------------------------------------------------
// Descriptor
// ---------------------------------------------------------------------------

/// One registered mode: stable name, animation defaults, classification
/// flags, and the boxed lifecycle implementation.
pub struct ModeDescriptor {
    name: String,
    defaults: ModeDefaults,
    flags: ModeFlags,
    hooks: Box<dyn ModeHooks>,
}

impl ModeDescriptor {
    /// Describe a mode with default animation parameters and no flags.
    pub fn new(name: impl Into<String>, hooks: Box<dyn ModeHooks>) -> Self {
        Self {
            name: name.into(),
            defaults: ModeDefaults::default(),
            flags: ModeFlags::empty(),
            hooks,
        }
    }

    /// Replace the animation defaults.
    pub fn with_defaults(mut self, defaults: ModeDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Replace the classification flags.
    pub fn with_flags(mut self, flags: ModeFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Unique, process-lifetime-stable mode name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Animation defaults installed when this mode becomes active.
    pub fn defaults(&self) -> &ModeDefaults {
        &self.defaults
    }

    /// Classification flags.
    pub fn flags(&self) -> ModeFlags {
        self.flags
    }

    /// Whether this is a meta entry (excluded from `all` and groups).
    pub fn is_meta(&self) -> bool {
        self.flags.contains(ModeFlags::META)
    }

    /// Mutable access to the lifecycle hooks.
    pub fn hooks_mut(&mut self) -> &mut dyn ModeHooks {
        self.hooks.as_mut()
    }
}

impl fmt::Debug for ModeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModeDescriptor")
            .field("name", &self.name)
            .field("defaults", &self.defaults)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Error building a [`ModeRegistry`].
#[derive(Debug)]
pub enum RegistryError {
    /// Two descriptors share a name; lookups would be ambiguous.
    DuplicateName(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateName(name) => write!(f, "duplicate mode name {name:?}"),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Ordered, immutable collection of mode descriptors.
///
/// Indices into the registry are the currency of the whole scheduler: the
/// inclusion table, pick pool, and current/previous bookkeeping all speak
/// registry indices. Order is the host's registration order and never changes.
pub struct ModeRegistry {
    entries: Vec<ModeDescriptor>,
}

impl ModeRegistry {
    /// Build a registry from descriptors in host registration order.
    ///
    /// Names must be unique.
    pub fn new(entries: Vec<ModeDescriptor>) -> Result<Self, RegistryError> {
        for (i, entry) in entries.iter().enumerate() {
            if entries[..i].iter().any(|e| e.name == entry.name) {
                return Err(RegistryError::DuplicateName(entry.name.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// Number of registered modes, meta entries included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no entries at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Descriptor at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&ModeDescriptor> {
        self.entries.get(index)
    }

    /// Mutable descriptor at `index` (needed to invoke hooks).
    pub fn get_mut(&mut self, index: usize) -> Option<&mut ModeDescriptor> {
        self.entries.get_mut(index)
    }

    /// Index of the mode whose name matches `name` exactly.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    /// Iterate descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ModeDescriptor> {
        self.entries.iter()
    }

    /// Indices of every non-meta mode, in registration order.
    ///
    /// This is the "no restriction" candidate set the parser falls back to
    /// when a mode list selects nothing.
    pub fn selectable_indices(&self) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.is_meta())
            .map(|(i, _)| i)
            .collect()
    }
}

impl fmt::Debug for ModeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(ModeDescriptor::name))
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
