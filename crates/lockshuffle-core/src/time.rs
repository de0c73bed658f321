#![forbid(unsafe_code)]

//! Wall-clock seam.
//!
//! The scheduler's only external query is "how many seconds have elapsed".
//! [`SystemClock`] anchors to a monotonic [`Instant`] rather than real wall
//! time so that host clock adjustments can never yank a switch backward or
//! fire one early. [`ManualClock`] lets tests drive time by hand.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Source of elapsed seconds. Assumed cheap and non-blocking.
pub trait WallClock {
    /// Seconds elapsed since some fixed origin.
    fn seconds(&self) -> u64;
}

/// Monotonic production clock, anchored at construction time.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock whose origin is "now".
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl WallClock for SystemClock {
    fn seconds(&self) -> u64 {
        self.origin.elapsed().as_secs()
    }
}

/// Hand-driven clock for tests.
///
/// The clock itself is owned by the scheduler; tests keep a [`ManualClock`]
/// clone (the time cell is shared) and advance it between ticks.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    secs: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock starting at zero seconds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `secs` seconds.
    pub fn advance(&self, secs: u64) {
        self.secs.fetch_add(secs, Ordering::Relaxed);
    }

    /// Jump to an absolute second count.
    pub fn set(&self, secs: u64) {
        self.secs.store(secs, Ordering::Relaxed);
    }
}

impl WallClock for ManualClock {
    fn seconds(&self) -> u64 {
        self.secs.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_starts_at_zero() {
        let clock = ManualClock::new();
        assert_eq!(clock.seconds(), 0);
    }

    #[test]
    fn manual_clock_advances_and_sets() {
        let clock = ManualClock::new();
        clock.advance(61);
        assert_eq!(clock.seconds(), 61);
        clock.set(5);
        assert_eq!(clock.seconds(), 5);
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        handle.advance(10);
        assert_eq!(clock.seconds(), 10);
    }

    #[test]
    fn system_clock_is_monotonic_from_origin() {
        let clock = SystemClock::new();
        // Freshly constructed, essentially no time has passed.
        assert_eq!(clock.seconds(), 0);
    }
}
