#![forbid(unsafe_code)]

//! Live animation parameters.
//!
//! Historically these were process-wide globals (`delay`, `batchcount`,
//! `cycles`, ...): every mode reads the same knobs each frame, which is why
//! the scheduler must overwrite all of them from the incoming mode's declared
//! defaults on every switch. Here they are an explicit struct owned by the
//! scheduler and handed to mode hooks read-only through `ModeContext`.

use crate::mode::ModeDefaults;

/// The knobs the active mode consults every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationParams {
    /// Microseconds the host should sleep between draw ticks.
    pub delay_micros: u64,
    /// Object/batch count (mode-specific meaning; may be negative to request
    /// a randomized count, as several classic modes do).
    pub count: i32,
    /// Cycle budget before a mode restarts its animation.
    pub cycles: u32,
    /// Object size hint (mode-specific; negative means "pick for me").
    pub size: i32,
    /// Number of colors to allocate in the colormap.
    pub ncolors: u32,
    /// Color saturation in `[0.0, 1.0]`.
    pub saturation: f32,
}

impl AnimationParams {
    /// Overwrite every knob from a mode's declared defaults.
    ///
    /// Called on each switch; nothing survives from the outgoing mode.
    pub fn apply(&mut self, defaults: &ModeDefaults) {
        self.delay_micros = defaults.delay_micros;
        self.count = defaults.count;
        self.cycles = defaults.cycles;
        self.size = defaults.size;
        self.ncolors = defaults.ncolors;
        self.saturation = defaults.saturation;
    }
}

impl Default for AnimationParams {
    fn default() -> Self {
        let d = ModeDefaults::default();
        Self {
            delay_micros: d.delay_micros,
            count: d.count,
            cycles: d.cycles,
            size: d.size,
            ncolors: d.ncolors,
            saturation: d.saturation,
        }
    }
}
