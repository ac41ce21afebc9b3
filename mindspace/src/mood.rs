//! `mindspace mood` - record and review mood ratings.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{ArgGroup, Args, Subcommand};
use mindspace_core::format::{format_entry_time, format_relative_time};
use mindspace_core::mood::{
    window_start, AfterRatingOutcome, MoodAggregator, MoodEntry, MoodEntryPatch, MoodRating,
    MoodReading,
};
use mindspace_core::{Config, Error};
use serde::Serialize;

#[derive(Subcommand)]
pub enum MoodCommand {
    /// Record a mood entry
    Add(AddArgs),

    /// Record an after-session rating, completing the latest open entry
    After(AfterArgs),

    /// List recorded entries, newest first
    List {
        #[command(flatten)]
        window: WindowArgs,

        /// Show at most this many entries
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Show average ratings and before/after improvement
    Stats {
        #[command(flatten)]
        window: WindowArgs,
    },

    /// Show ratings per entry, oldest first
    Trend {
        #[command(flatten)]
        window: WindowArgs,
    },

    /// Show average ratings per day
    Daily {
        #[command(flatten)]
        window: WindowArgs,
    },

    /// List the session types that have entries
    Types,

    /// Delete an entry by id
    Delete {
        /// Entry id
        id: String,
    },

    /// Delete every entry
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args)]
#[command(group(ArgGroup::new("rating").required(true).multiple(true).args(["before", "after"])))]
pub struct AddArgs {
    /// Rating (1-5) before the session
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    before: Option<u8>,

    /// Rating (1-5) after the session
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    after: Option<u8>,

    /// Session type
    #[arg(short = 't', long)]
    session_type: Option<String>,

    /// Note attached to the first rating given
    #[arg(long)]
    note: Option<String>,

    /// Print the stored entry as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
pub struct AfterArgs {
    /// Rating (1-5)
    #[arg(value_parser = clap::value_parser!(u8).range(1..=5))]
    rating: u8,

    /// Complete this entry instead of the latest open one
    #[arg(long)]
    entry: Option<String>,

    /// Session type of the entry to complete
    #[arg(short = 't', long)]
    session_type: Option<String>,

    #[arg(long)]
    note: Option<String>,

    /// Print the stored entry as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
pub struct WindowArgs {
    /// Trailing window in days
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    days: Option<u32>,

    /// Only include this session type
    #[arg(short = 't', long)]
    session_type: Option<String>,

    /// Print as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct StatsReport {
    days: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_type: Option<String>,
    improvement: mindspace_core::mood::ImprovementStats,
    averages: mindspace_core::mood::MoodAverages,
}

pub fn run(command: MoodCommand, config: &Config) -> Result<()> {
    let store = crate::open_store()?;

    match command {
        MoodCommand::Add(args) => {
            let session_type = args
                .session_type
                .unwrap_or_else(|| config.mood.session_type.clone());
            let note = args.note.unwrap_or_default();
            let before = args
                .before
                .map(MoodRating::new)
                .transpose()?
                .map(|rating| MoodReading::new(rating).with_note(note.clone()));
            let after_note = if before.is_some() { String::new() } else { note };
            let after = args
                .after
                .map(MoodRating::new)
                .transpose()?
                .map(|rating| MoodReading::new(rating).with_note(after_note));

            let entry = store.add_entry(&session_type, before, after);
            if args.json {
                print_json(&entry)?;
            } else {
                println!("Recorded mood entry {}", entry.id);
                print_entry(&entry);
            }
        }

        MoodCommand::After(args) => {
            let mut reading = MoodReading::new(MoodRating::new(args.rating)?);
            if let Some(note) = args.note {
                reading = reading.with_note(note);
            }

            let (entry, attached) = match args.entry {
                Some(id) => {
                    let patch = MoodEntryPatch {
                        after: Some(Some(reading)),
                        ..MoodEntryPatch::default()
                    };
                    let found = store
                        .try_update(&id, patch)
                        .with_context(|| format!("failed to save mood entry {}", id))?;
                    if !found {
                        return Err(Error::EntryNotFound(id).into());
                    }
                    let entry = store.get(&id).ok_or(Error::EntryNotFound(id))?;
                    (entry, true)
                }
                None => {
                    let session_type = args
                        .session_type
                        .unwrap_or_else(|| config.mood.session_type.clone());
                    match store.attach_after_rating(&session_type, reading) {
                        AfterRatingOutcome::Attached(entry) => (entry, true),
                        AfterRatingOutcome::Created(entry) => (entry, false),
                    }
                }
            };

            if args.json {
                print_json(&entry)?;
            } else {
                if attached {
                    println!("Completed mood entry {}", entry.id);
                } else {
                    println!("No open entry found; recorded new entry {}", entry.id);
                }
                print_entry(&entry);
            }
        }

        MoodCommand::List { window, limit } => {
            let days = window.days.unwrap_or(config.mood.window_days);
            let now = Utc::now();
            let mut entries: Vec<MoodEntry> = store
                .entries_between(window_start(now, days), now)
                .into_iter()
                .filter(|e| {
                    window
                        .session_type
                        .as_deref()
                        .map_or(true, |t| e.session_type == t)
                })
                .collect();
            entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            if let Some(limit) = limit {
                entries.truncate(limit);
            }

            if window.json {
                print_json(&entries)?;
            } else if entries.is_empty() {
                println!("No mood entries in the last {} days", days);
            } else {
                for entry in &entries {
                    print_entry(entry);
                }
            }
        }

        MoodCommand::Stats { window } => {
            let days = window.days.unwrap_or(config.mood.window_days);
            let session_type = window.session_type.as_deref();
            let aggregator = MoodAggregator::new(&store);
            let report = StatsReport {
                days,
                session_type: window.session_type.clone(),
                improvement: aggregator.improvement_stats(days, session_type),
                averages: aggregator.averages(days, session_type),
            };

            if window.json {
                print_json(&report)?;
            } else {
                println!("Mood over the last {} days:", days);
                println!(
                    "  Average before:      {:.1} ({} ratings)",
                    report.averages.before, report.averages.before_count
                );
                println!(
                    "  Average after:       {:.1} ({} ratings)",
                    report.averages.after, report.averages.after_count
                );
                println!("  Paired sessions:     {}", report.improvement.session_count);
                println!(
                    "  Average improvement: {:+.1}",
                    report.improvement.average_improvement
                );
                if report.improvement.session_count > 0 {
                    println!(
                        "  Last session:        {} ({:+})",
                        report.improvement.last_rating, report.improvement.last_improvement
                    );
                }
            }
        }

        MoodCommand::Trend { window } => {
            let days = window.days.unwrap_or(config.mood.window_days);
            let trend = MoodAggregator::new(&store).trend(days, window.session_type.as_deref());

            if window.json {
                print_json(&trend)?;
            } else if trend.is_empty() {
                println!("No mood entries in the last {} days", days);
            } else {
                println!("{:<8} {:>6} {:>6}", "Date", "Before", "After");
                for i in 0..trend.len() {
                    println!(
                        "{:<8} {:>6} {:>6}",
                        trend.labels[i],
                        gap(trend.before[i].map(|v| v.to_string())),
                        gap(trend.after[i].map(|v| v.to_string()))
                    );
                }
            }
        }

        MoodCommand::Daily { window } => {
            let days = window.days.unwrap_or(config.mood.window_days);
            let daily =
                MoodAggregator::new(&store).daily_trend(days, window.session_type.as_deref());

            if window.json {
                print_json(&daily)?;
            } else {
                println!("{:<10} {:>6} {:>6}", "Date", "Before", "After");
                for (i, date) in daily.dates.iter().enumerate() {
                    println!(
                        "{:<10} {:>6} {:>6}",
                        date.format("%Y-%m-%d"),
                        gap(daily.before[i].map(|v| format!("{:.1}", v))),
                        gap(daily.after[i].map(|v| format!("{:.1}", v)))
                    );
                }
            }
        }

        MoodCommand::Types => {
            for session_type in store.session_types() {
                println!("{}", session_type);
            }
        }

        MoodCommand::Delete { id } => {
            let found = store
                .try_delete(&id)
                .with_context(|| format!("failed to delete mood entry {}", id))?;
            if !found {
                return Err(Error::EntryNotFound(id).into());
            }
            tracing::info!(id = %id, "Mood entry deleted");
            println!("Deleted mood entry {}", id);
        }

        MoodCommand::Clear { yes } => {
            if !yes {
                anyhow::bail!("refusing to delete all mood entries without --yes");
            }
            store.clear();
            tracing::info!("Mood data cleared");
            println!("All mood entries deleted");
        }
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{}", rendered);
    Ok(())
}

fn print_entry(entry: &MoodEntry) {
    let rating = |reading: Option<&MoodReading>| {
        reading.map_or_else(
            || "-".to_string(),
            |r| format!("{} {}", r.rating.value(), r.rating.label()),
        )
    };

    println!(
        "  {}  {:<12} before: {:<12} after: {:<12} ({})",
        format_entry_time(entry.timestamp),
        entry.session_type,
        rating(entry.before.as_ref()),
        rating(entry.after.as_ref()),
        format_relative_time(entry.timestamp)
    );
    for note in [&entry.before, &entry.after]
        .into_iter()
        .flatten()
        .filter_map(|r| r.note.as_deref())
    {
        println!("    \"{}\"", note);
    }
    println!("    id: {}", entry.id);
}

fn gap(value: Option<String>) -> String {
    value.unwrap_or_else(|| "-".to_string())
}
