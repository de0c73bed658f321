#![forbid(unsafe_code)]

//! End-to-end scheduler protocol tests: timing, forced changes, release
//! idempotency, multi-screen lockstep, and shared-pen restoration.

use std::sync::{Arc, Mutex};

use lockshuffle_core::mode::{ModeDefaults, ModeDescriptor, ModeHooks, ModeRegistry};
use lockshuffle_core::screen::{ModeContext, PenValues, ScreenSurface};
use lockshuffle_core::time::ManualClock;
use lockshuffle_runtime::{RandomScheduler, SchedulerConfig};

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

/// In-memory screen that counts scheduler-side operations.
struct FakeSurface {
    index: usize,
    pen: PenValues,
    clears: usize,
    colormap_fixes: usize,
}

impl FakeSurface {
    fn new(index: usize) -> Self {
        Self {
            index,
            pen: PenValues::default(),
            clears: 0,
            colormap_fixes: 0,
        }
    }
}

impl ScreenSurface for FakeSurface {
    fn index(&self) -> usize {
        self.index
    }

    fn clear(&mut self) {
        self.clears += 1;
    }

    fn pen(&self) -> PenValues {
        self.pen.clone()
    }

    fn set_pen(&mut self, pen: &PenValues) {
        self.pen = pen.clone();
    }

    fn fix_colormap(&mut self, _ncolors: u32, _saturation: f32) {
        self.colormap_fixes += 1;
    }
}

type EventLog = Arc<Mutex<Vec<String>>>;

/// Hooks that append every invocation to a shared log. `draw` also dirties
/// the shared pen so tests can observe the restore-on-switch discipline.
struct LogHooks {
    name: &'static str,
    log: EventLog,
    dirty_pen: bool,
}

impl LogHooks {
    fn push(&self, what: &str, ctx: &ModeContext<'_>) {
        self.log
            .lock()
            .unwrap()
            .push(format!("{} {} s{}", what, self.name, ctx.screen()));
    }
}

impl ModeHooks for LogHooks {
    fn init(&mut self, ctx: &mut ModeContext<'_>) {
        // Record the pen width visible at init time; a clean switch must
        // show the pristine width here, not the outgoing mode's scribble.
        let width = ctx.surface.pen().line_width;
        self.log
            .lock()
            .unwrap()
            .push(format!("init {} s{} w{}", self.name, ctx.screen(), width));
    }

    fn draw(&mut self, ctx: &mut ModeContext<'_>) {
        self.push("draw", ctx);
        if self.dirty_pen {
            let mut pen = ctx.surface.pen();
            pen.line_width = 99;
            ctx.surface.set_pen(&pen);
        }
    }

    fn release(&mut self, ctx: &mut ModeContext<'_>) {
        self.push("release", ctx);
    }

    fn refresh(&mut self, ctx: &mut ModeContext<'_>) {
        self.push("refresh", ctx);
    }
}

fn registry(log: &EventLog, dirty_pen: bool) -> ModeRegistry {
    let mode = |name: &'static str, delay: u64| {
        ModeDescriptor::new(
            name,
            Box::new(LogHooks {
                name,
                log: log.clone(),
                dirty_pen,
            }),
        )
        .with_defaults(ModeDefaults {
            delay_micros: delay,
            ..ModeDefaults::default()
        })
    };
    ModeRegistry::new(vec![
        mode("ball", 10_000),
        mode("swirl", 20_000),
        mode("voters", 30_000),
    ])
    .unwrap()
}

fn scheduler(
    log: &EventLog,
    config: SchedulerConfig,
    dirty_pen: bool,
) -> (RandomScheduler, ManualClock) {
    let clock = ManualClock::new();
    let sched =
        RandomScheduler::with_clock(registry(log, dirty_pen), config, Box::new(clock.clone()))
            .unwrap();
    (sched, clock)
}

fn sequential_config(duration_secs: i64) -> SchedulerConfig {
    SchedulerConfig {
        duration_secs,
        modelist: "all,-voters".to_owned(),
        sequential: true,
        ..SchedulerConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn sequential_two_mode_scenario() {
    // Registry {ball, swirl, voters}, list "all,-voters", sequential: the
    // pick sequence is a strict 2-cycle with voters never chosen.
    let log: EventLog = Arc::new(Mutex::new(Vec::new()));
    let (mut sched, clock) = scheduler(&log, sequential_config(1), false);
    let mut screen = FakeSurface::new(0);

    sched.init(&mut screen);
    let mut seen = vec![sched.current_mode().unwrap().to_owned()];
    for _ in 0..6 {
        clock.advance(2);
        sched.draw(&mut screen);
        seen.push(sched.current_mode().unwrap().to_owned());
    }

    assert_eq!(seen, ["ball", "swirl", "ball", "swirl", "ball", "swirl", "ball"]);
    assert!(log.lock().unwrap().iter().all(|e| !e.contains("voters")));
}

#[test]
fn switch_installs_new_mode_defaults() {
    let log: EventLog = Arc::new(Mutex::new(Vec::new()));
    let (mut sched, clock) = scheduler(&log, sequential_config(1), false);
    let mut screen = FakeSurface::new(0);

    sched.init(&mut screen);
    assert_eq!(sched.current_mode(), Some("ball"));
    assert_eq!(sched.params().delay_micros, 10_000);

    clock.advance(2);
    sched.draw(&mut screen);
    assert_eq!(sched.current_mode(), Some("swirl"));
    assert_eq!(sched.params().delay_micros, 20_000);
}

#[test]
fn switch_happens_strictly_after_duration() {
    let log: EventLog = Arc::new(Mutex::new(Vec::new()));
    let (mut sched, clock) = scheduler(&log, sequential_config(60), false);
    let mut screen = FakeSurface::new(0);

    sched.init(&mut screen);
    assert_eq!(sched.current_mode(), Some("ball"));

    clock.set(60); // exactly the duration: not yet
    sched.draw(&mut screen);
    assert_eq!(sched.current_mode(), Some("ball"));

    clock.set(61);
    sched.draw(&mut screen);
    assert_eq!(sched.current_mode(), Some("swirl"));
    assert_eq!(screen.clears, 1);
}

#[test]
fn epoch_resets_after_each_switch() {
    let log: EventLog = Arc::new(Mutex::new(Vec::new()));
    let (mut sched, clock) = scheduler(&log, sequential_config(60), false);
    let mut screen = FakeSurface::new(0);

    sched.init(&mut screen);
    clock.set(61);
    sched.draw(&mut screen);
    assert_eq!(sched.current_mode(), Some("swirl"));

    // 60 more seconds from the new epoch, still not due.
    clock.set(121);
    sched.draw(&mut screen);
    assert_eq!(sched.current_mode(), Some("swirl"));

    clock.set(122);
    sched.draw(&mut screen);
    assert_eq!(sched.current_mode(), Some("ball"));
}

#[test]
fn zero_duration_never_auto_switches() {
    let log: EventLog = Arc::new(Mutex::new(Vec::new()));
    let (mut sched, clock) = scheduler(&log, sequential_config(0), false);
    let mut screen = FakeSurface::new(0);

    sched.init(&mut screen);
    clock.set(1_000_000);
    for _ in 0..5 {
        sched.draw(&mut screen);
    }
    assert_eq!(sched.current_mode(), Some("ball"));
}

#[test]
fn change_forces_immediate_switch_and_resets_epoch() {
    let log: EventLog = Arc::new(Mutex::new(Vec::new()));
    let (mut sched, clock) = scheduler(&log, sequential_config(60), false);
    let mut screen = FakeSurface::new(0);

    sched.init(&mut screen);
    clock.set(5); // nowhere near the duration
    sched.change(&mut screen);
    assert_eq!(sched.current_mode(), Some("swirl"));

    // Epoch restarted at the forced switch.
    clock.set(65);
    sched.draw(&mut screen);
    assert_eq!(sched.current_mode(), Some("swirl"));
    clock.set(66);
    sched.draw(&mut screen);
    assert_eq!(sched.current_mode(), Some("ball"));
}

#[test]
fn change_on_non_authority_screen_does_not_switch() {
    let log: EventLog = Arc::new(Mutex::new(Vec::new()));
    let config = SchedulerConfig {
        screen_count: 2,
        ..sequential_config(0)
    };
    let (mut sched, _clock) = scheduler(&log, config, false);
    let mut screen0 = FakeSurface::new(0);
    let mut screen1 = FakeSurface::new(1);

    sched.init(&mut screen0);
    sched.init(&mut screen1);
    assert_eq!(sched.current_mode(), Some("ball"));

    sched.change(&mut screen1);
    assert_eq!(sched.current_mode(), Some("ball"));

    sched.change(&mut screen0);
    assert_eq!(sched.current_mode(), Some("swirl"));
}

#[test]
fn release_invokes_outgoing_hook_exactly_once() {
    let log: EventLog = Arc::new(Mutex::new(Vec::new()));
    let (mut sched, _clock) = scheduler(&log, sequential_config(0), false);
    let mut screen = FakeSurface::new(0);

    sched.init(&mut screen);
    sched.change(&mut screen); // ball -> swirl
    sched.release(&mut screen);
    sched.release(&mut screen);

    let releases: Vec<String> = log
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.starts_with("release"))
        .cloned()
        .collect();
    assert_eq!(releases, ["release ball s0"]);
}

#[test]
fn release_before_any_switch_is_a_noop() {
    let log: EventLog = Arc::new(Mutex::new(Vec::new()));
    let (mut sched, _clock) = scheduler(&log, sequential_config(0), false);
    let mut screen = FakeSurface::new(0);

    sched.release(&mut screen);
    sched.init(&mut screen);
    sched.release(&mut screen);

    assert!(log.lock().unwrap().iter().all(|e| !e.starts_with("release")));
}

#[test]
fn screens_follow_authority_in_lockstep() {
    let log: EventLog = Arc::new(Mutex::new(Vec::new()));
    let config = SchedulerConfig {
        screen_count: 2,
        ..sequential_config(1)
    };
    let (mut sched, clock) = scheduler(&log, config, false);
    let mut screen0 = FakeSurface::new(0);
    let mut screen1 = FakeSurface::new(1);

    sched.init(&mut screen0);
    sched.init(&mut screen1);
    log.lock().unwrap().clear();

    clock.advance(2);
    sched.draw(&mut screen0); // decides the switch
    sched.draw(&mut screen1); // observes it on its own tick

    let events = log.lock().unwrap().clone();
    assert_eq!(
        events,
        [
            "init swirl s0 w0",
            "draw swirl s0",
            "init swirl s1 w0",
            "draw swirl s1",
        ]
    );
}

#[test]
fn non_authority_screen_never_decides_switches() {
    let log: EventLog = Arc::new(Mutex::new(Vec::new()));
    let config = SchedulerConfig {
        screen_count: 2,
        ..sequential_config(1)
    };
    let (mut sched, clock) = scheduler(&log, config, false);
    let mut screen0 = FakeSurface::new(0);
    let mut screen1 = FakeSurface::new(1);

    sched.init(&mut screen0);
    sched.init(&mut screen1);

    clock.advance(10);
    sched.draw(&mut screen1);
    assert_eq!(sched.current_mode(), Some("ball"));
    sched.draw(&mut screen0);
    assert_eq!(sched.current_mode(), Some("swirl"));
}

#[test]
fn pen_is_restored_before_new_mode_init() {
    let log: EventLog = Arc::new(Mutex::new(Vec::new()));
    let (mut sched, clock) = scheduler(&log, sequential_config(1), true);
    let mut screen = FakeSurface::new(0);

    sched.init(&mut screen);
    sched.draw(&mut screen); // dirties the pen (width 99)
    assert_eq!(screen.pen.line_width, 99);

    clock.advance(2);
    sched.draw(&mut screen);

    // The incoming mode's init must have seen the pristine width.
    let events = log.lock().unwrap().clone();
    assert!(events.contains(&"init swirl s0 w0".to_owned()), "{events:?}");
    assert!(screen.colormap_fixes >= 2);
}

#[test]
fn refresh_delegates_to_current_mode() {
    let log: EventLog = Arc::new(Mutex::new(Vec::new()));
    let (mut sched, _clock) = scheduler(&log, sequential_config(0), false);
    let mut screen = FakeSurface::new(0);

    sched.refresh(&mut screen); // before init: nothing to refresh
    sched.init(&mut screen);
    sched.refresh(&mut screen);

    let events = log.lock().unwrap().clone();
    assert_eq!(
        events
            .iter()
            .filter(|e| e.starts_with("refresh"))
            .collect::<Vec<_>>(),
        ["refresh ball s0"]
    );
}

#[test]
fn debug_output_reports_candidate_count() {
    let log: EventLog = Arc::new(Mutex::new(Vec::new()));
    let (mut sched, _clock) = scheduler(&log, sequential_config(0), false);

    // Before the first contact no pool exists yet.
    assert!(format!("{sched:?}").contains("candidates: None"), "{sched:?}");

    let mut screen = FakeSurface::new(0);
    sched.init(&mut screen);

    // "all,-voters" over {ball, swirl, voters} leaves two candidates.
    assert!(format!("{sched:?}").contains("candidates: Some(2)"), "{sched:?}");
}

#[test]
fn reparsing_mode_list_rebuilds_future_picks() {
    let log: EventLog = Arc::new(Mutex::new(Vec::new()));
    let (mut sched, clock) = scheduler(&log, sequential_config(1), false);
    let mut screen = FakeSurface::new(0);

    sched.init(&mut screen);
    assert_eq!(sched.current_mode(), Some("ball"));

    sched.set_mode_list("voters");
    clock.advance(2);
    sched.draw(&mut screen);
    assert_eq!(sched.current_mode(), Some("voters"));

    // With a single eligible mode, every future switch re-picks it.
    clock.advance(2);
    sched.draw(&mut screen);
    assert_eq!(sched.current_mode(), Some("voters"));
}
