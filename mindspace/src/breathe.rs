//! `mindspace breathe` - guided breathing in the terminal.
//!
//! The breathing sphere is drawn as a progress bar whose fill follows the
//! smoothed sphere scale. Phase changes are printed above the bar.

use anyhow::{Context, Result};
use clap::{ArgGroup, Args};
use indicatif::{ProgressBar, ProgressStyle};
use mindspace_core::breathing::{
    BreathingState, Frame, PatternKey, PhaseChange, PhaseState, ProfileKind, RenderDriver, Scene,
    VisualProfile,
};
use mindspace_core::Config;
use std::sync::atomic::Ordering;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Args)]
#[command(group(ArgGroup::new("limit").args(["cycles", "seconds"])))]
pub struct BreatheArgs {
    /// Pattern to follow (calm, box, 4-7-8, energizing)
    #[arg(short, long)]
    pattern: Option<String>,

    /// Visual profile (sphere, guide)
    #[arg(long)]
    profile: Option<String>,

    /// Stop after this many full cycles
    #[arg(short, long)]
    cycles: Option<u64>,

    /// Stop after this many seconds
    #[arg(short, long)]
    seconds: Option<u64>,

    /// Step frames without sleeping (requires --cycles or --seconds)
    #[arg(long, hide = true, requires = "limit")]
    no_wait: bool,
}

/// Terminal render target for the breathing driver.
struct TerminalScene {
    bar: ProgressBar,
    profile: VisualProfile,
}

impl TerminalScene {
    fn new(profile: VisualProfile) -> Result<Self> {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")
                .context("invalid progress template")?
                .progress_chars("#>-"),
        );
        Ok(Self { bar, profile })
    }
}

impl Scene for TerminalScene {
    fn apply(&mut self, frame: &Frame) {
        let span = self.profile.max_scale - self.profile.min_scale;
        let fill = if span > 0.0 {
            ((frame.scale - self.profile.min_scale) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.bar.set_position((fill * 100.0).round() as u64);
        self.bar.set_message(format!(
            "{:<12} {:>2.0}s",
            frame.state.phase.instruction(),
            frame.state.phase_remaining().ceil()
        ));
    }

    fn phase_changed(&mut self, _change: PhaseChange, state: &PhaseState) {
        let line = phase_line(state);
        self.bar.suspend(|| println!("{}", line));
    }

    fn release(&mut self) {
        self.bar.finish_and_clear();
    }
}

fn phase_line(state: &PhaseState) -> String {
    format!("{:<12} {}s", state.phase.instruction(), state.phase_duration)
}

pub fn run(args: &BreatheArgs, config: &Config) -> Result<()> {
    let key = match &args.pattern {
        Some(name) => name.parse::<PatternKey>()?,
        None => config.breathing.pattern,
    };
    let profile_kind = match &args.profile {
        Some(name) => name.parse::<ProfileKind>()?,
        None => config.breathing.profile,
    };
    let pattern = key.pattern();
    let profile = profile_kind.profile();

    println!("{} - {}", pattern.name, pattern.summary());
    if args.cycles.is_none() && args.seconds.is_none() {
        println!("Press Ctrl+C to stop.");
    }
    println!();

    let state = BreathingState::new(pattern.clone(), profile)?
        .with_smoothing_rate(config.breathing.smoothing_rate);
    println!("{}", phase_line(&state.frame().state));

    let running = crate::interrupt_flag()?;
    let frame_interval = Duration::from_secs_f64(1.0 / f64::from(config.breathing.frame_rate));
    let time_limit = args.seconds.map(|s| s as f64);

    tracing::info!(
        pattern = key.as_str(),
        cycles = ?args.cycles,
        seconds = ?args.seconds,
        "Breathing exercise started"
    );

    let mut driver = RenderDriver::new(state, TerminalScene::new(profile)?);
    let mut last = Instant::now();

    while running.load(Ordering::SeqCst) {
        let delta = if args.no_wait {
            frame_interval.as_secs_f64()
        } else {
            thread::sleep(frame_interval);
            let now = Instant::now();
            let delta = now.duration_since(last).as_secs_f64();
            last = now;
            delta
        };
        driver.frame(delta);

        let cycles_done = driver.state().frame().state.cycle_index;
        if args.cycles.is_some_and(|limit| cycles_done >= limit) {
            break;
        }
        if time_limit.is_some_and(|limit| driver.state().elapsed() >= limit) {
            break;
        }
    }

    let cycles_done = driver.state().frame().state.cycle_index;
    let elapsed = driver.state().elapsed();
    let interrupted = !running.load(Ordering::SeqCst);
    drop(driver);

    tracing::info!(cycles = cycles_done, elapsed, interrupted, "Breathing exercise finished");

    println!();
    println!(
        "{} {} cycle{} of {} in {:.0}s",
        if interrupted { "Stopped after" } else { "Completed" },
        cycles_done,
        if cycles_done == 1 { "" } else { "s" },
        pattern.name,
        elapsed
    );
    Ok(())
}
