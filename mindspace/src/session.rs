//! `mindspace session` - timed meditation with mood check-ins.

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use mindspace_core::format::format_countdown;
use mindspace_core::mood::{MoodRating, MoodReading};
use mindspace_core::{Config, SessionTimer};
use std::cell::Cell;
use std::rc::Rc;
use std::sync::atomic::Ordering;
use std::thread;
use std::time::Duration;

#[derive(Args)]
pub struct SessionArgs {
    /// Session length in minutes
    #[arg(short, long)]
    minutes: Option<u32>,

    /// Mood rating (1-5) recorded before the session
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    before: Option<u8>,

    /// Mood rating (1-5) recorded after the session completes
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    after: Option<u8>,

    /// Session type recorded with the mood entry
    #[arg(short = 't', long)]
    session_type: Option<String>,

    /// Count down without sleeping
    #[arg(long, hide = true)]
    no_wait: bool,
}

pub fn run(args: &SessionArgs, config: &Config) -> Result<()> {
    let minutes = args.minutes.unwrap_or(config.session.duration_minutes);
    if minutes == 0 {
        anyhow::bail!("session length must be at least 1 minute");
    }
    let session_type = args
        .session_type
        .clone()
        .unwrap_or_else(|| config.mood.session_type.clone());

    // Validate ratings before anything is written
    let before = args.before.map(MoodRating::new).transpose()?;
    let after = args.after.map(MoodRating::new).transpose()?;

    let store = if before.is_some() || after.is_some() {
        Some(crate::open_store()?)
    } else {
        None
    };

    let before_id = match (&store, before) {
        (Some(store), Some(rating)) => {
            let entry = store.add_entry(&session_type, Some(MoodReading::new(rating)), None);
            println!("Recorded mood before session: {} ({})", rating.value(), rating.label());
            Some(entry.id)
        }
        _ => None,
    };

    let bar = ProgressBar::new(u64::from(minutes) * 60);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")
            .context("invalid progress template")?
            .progress_chars("#>-"),
    );
    bar.set_message(format_countdown(minutes.saturating_mul(60)));

    let completed = Rc::new(Cell::new(false));
    let tick_bar = bar.clone();
    let done = completed.clone();
    let mut timer = SessionTimer::new(
        minutes,
        move |remaining| {
            let total = tick_bar.length().unwrap_or(0);
            tick_bar.set_position(total.saturating_sub(u64::from(remaining)));
            tick_bar.set_message(format_countdown(remaining));
        },
        move || done.set(true),
    );

    let running = crate::interrupt_flag()?;

    println!("Meditation session: {} minute{}", minutes, if minutes == 1 { "" } else { "s" });
    tracing::info!(minutes, session_type = %session_type, "Meditation session started");
    timer.start();

    while running.load(Ordering::SeqCst) && !completed.get() {
        if !args.no_wait {
            thread::sleep(Duration::from_secs(1));
        }
        timer.tick();
    }

    bar.finish_and_clear();

    if !completed.get() {
        timer.pause();
        tracing::info!(remaining = timer.time_remaining(), "Meditation session stopped");
        println!(
            "Session stopped with {} remaining",
            format_countdown(timer.time_remaining())
        );
        return Ok(());
    }

    println!("Session complete.");

    if let (Some(store), Some(rating)) = (&store, after) {
        let reading = MoodReading::new(rating);
        let entry = match &before_id {
            Some(id) if store.attach_after_rating_to(id, reading.clone()) => store.get(id),
            _ => Some(store.attach_after_rating(&session_type, reading).into_entry()),
        };
        println!("Recorded mood after session: {} ({})", rating.value(), rating.label());
        if let Some(change) = entry.and_then(|e| e.improvement()) {
            println!("Mood change: {:+}", change);
        }
    }

    Ok(())
}
