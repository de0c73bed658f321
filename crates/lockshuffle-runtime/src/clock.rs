#![forbid(unsafe_code)]

//! Schedule clock: when is it time to switch modes?
//!
//! Tracks the epoch of the last switch and a configured duration. Duration 0
//! means "never switch automatically"; an explicit change request is a
//! one-shot flag consumed by the next effective switch. A negative configured
//! duration is clamped to 0 at construction.

/// Switch-timing state for the authority screen.
#[derive(Debug, Clone)]
pub(crate) struct ScheduleClock {
    /// Wall-clock second of the last switch.
    epoch: u64,
    /// Seconds a mode runs before an automatic switch; 0 = never.
    duration: u64,
    /// One-shot "switch on the next draw tick" request.
    change_requested: bool,
}

impl ScheduleClock {
    /// Build from the configured duration, clamping negatives to "never".
    pub fn new(duration_secs: i64) -> Self {
        Self {
            epoch: 0,
            duration: duration_secs.max(0) as u64,
            change_requested: false,
        }
    }

    /// Seconds the current mode has been running; always 0 when duration is 0.
    pub fn has_run(&self, now: u64) -> u64 {
        if self.duration == 0 {
            0
        } else {
            now.saturating_sub(self.epoch)
        }
    }

    /// Whether the authority screen should switch on this tick.
    pub fn should_switch(&self, now: u64) -> bool {
        self.change_requested || (self.duration != 0 && self.has_run(now) > self.duration)
    }

    /// Arm the one-shot change request.
    pub fn request_change(&mut self) {
        self.change_requested = true;
    }

    /// Record a switch: reset the epoch and consume any change request.
    pub fn reset(&mut self, now: u64) {
        self.epoch = now;
        self.change_requested = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switches_strictly_after_duration() {
        let mut clock = ScheduleClock::new(60);
        clock.reset(100);
        assert!(!clock.should_switch(100));
        assert!(!clock.should_switch(160)); // exactly at the limit: not yet
        assert!(clock.should_switch(161));
    }

    #[test]
    fn zero_duration_never_auto_switches() {
        let mut clock = ScheduleClock::new(0);
        clock.reset(0);
        assert!(!clock.should_switch(u64::MAX));
        assert_eq!(clock.has_run(u64::MAX), 0);
    }

    #[test]
    fn negative_duration_clamps_to_never() {
        let mut clock = ScheduleClock::new(-5);
        clock.reset(0);
        assert!(!clock.should_switch(1_000_000));
    }

    #[test]
    fn change_request_overrides_elapsed_time() {
        let mut clock = ScheduleClock::new(0);
        clock.reset(10);
        clock.request_change();
        assert!(clock.should_switch(10));
    }

    #[test]
    fn reset_consumes_change_request() {
        let mut clock = ScheduleClock::new(60);
        clock.request_change();
        clock.reset(50);
        assert!(!clock.should_switch(51));
    }

    #[test]
    fn clock_going_backward_does_not_underflow() {
        let mut clock = ScheduleClock::new(30);
        clock.reset(100);
        assert_eq!(clock.has_run(40), 0);
        assert!(!clock.should_switch(40));
    }
}
