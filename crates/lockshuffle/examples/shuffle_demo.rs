#![forbid(unsafe_code)]

//! Minimal host: three toy modes scheduled on one fake screen.
//!
//! Run with `RUST_LOG=debug` to watch the scheduler's switch decisions.

use lockshuffle::prelude::*;
use lockshuffle::{ManualClock, WallClock};

/// A "screen" that just remembers its pen and counts clears.
struct ConsoleSurface {
    index: usize,
    pen: PenValues,
    clears: usize,
}

impl ScreenSurface for ConsoleSurface {
    fn index(&self) -> usize {
        self.index
    }

    fn clear(&mut self) {
        self.clears += 1;
        println!("  [screen {} cleared]", self.index);
    }

    fn pen(&self) -> PenValues {
        self.pen.clone()
    }

    fn set_pen(&mut self, pen: &PenValues) {
        self.pen = pen.clone();
    }

    fn fix_colormap(&mut self, ncolors: u32, saturation: f32) {
        println!("  [colormap fixed: {ncolors} colors @ {saturation}]");
    }
}

/// A mode that renders as a line of text.
struct Banner {
    glyph: char,
    ticks: usize,
}

impl Banner {
    fn new(glyph: char) -> Box<dyn ModeHooks> {
        Box::new(Self { glyph, ticks: 0 })
    }
}

impl ModeHooks for Banner {
    fn init(&mut self, ctx: &mut ModeContext<'_>) {
        self.ticks = 0;
        println!(
            "  init {} on screen {} (delay {}us, {} colors)",
            self.glyph,
            ctx.screen(),
            ctx.params.delay_micros,
            ctx.params.ncolors
        );
    }

    fn draw(&mut self, _ctx: &mut ModeContext<'_>) {
        self.ticks += 1;
        println!("  {}", self.glyph.to_string().repeat(self.ticks.min(24)));
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let registry = ModeRegistry::new(vec![
        ModeDescriptor::new("dots", Banner::new('.')).with_defaults(ModeDefaults {
            delay_micros: 30_000,
            ..ModeDefaults::default()
        }),
        ModeDescriptor::new("stars", Banner::new('*')).with_flags(ModeFlags::SPACE),
        ModeDescriptor::new("waves", Banner::new('~')).with_flags(ModeFlags::GEOMETRY),
    ])?;

    let config = SchedulerConfig {
        duration_secs: 3,
        modelist: "all".to_owned(),
        verbose: true,
        ..SchedulerConfig::default()
    };

    // Drive time by hand so the demo runs instantly.
    let clock = ManualClock::new();
    let wall: Box<dyn WallClock> = Box::new(clock.clone());
    let mut scheduler = RandomScheduler::with_clock(registry, config, wall)?;

    let mut screen = ConsoleSurface {
        index: 0,
        pen: PenValues::default(),
        clears: 0,
    };

    scheduler.init(&mut screen);
    for frame in 0..12 {
        println!("frame {frame} (mode: {})", scheduler.current_mode().unwrap_or("?"));
        scheduler.draw(&mut screen);
        clock.advance(1);
    }

    println!("forcing a change:");
    scheduler.change(&mut screen);
    scheduler.release(&mut screen);

    println!("{} switches cleared the screen", screen.clears);
    Ok(())
}
