//! # mindspace-core
//!
//! Core library for mindspace - guided breathing, meditation timing and mood tracking.
//!
//! This library provides:
//! - A breathing engine: pattern catalog, phase clock, visual mapping and a
//!   frame-driven render driver
//! - A countdown timer for meditation sessions
//! - Mood tracking: a persisted entry store and trend/improvement aggregates
//! - Configuration management and logging infrastructure
//!
//! ## Example
//!
//! ```rust,no_run
//! use mindspace_core::breathing::{phase_at, PatternKey};
//! use mindspace_core::mood::{MoodAggregator, MoodRating, MoodReading, MoodStore, SqliteRepository};
//! use mindspace_core::Config;
//!
//! let state = phase_at(&PatternKey::Box.pattern().timings, 6.0).expect("valid pattern");
//! println!("{} ({:.0}%)", state.phase.instruction(), state.progress * 100.0);
//!
//! let repo = SqliteRepository::open(&Config::database_path()).expect("failed to open store");
//! let store = MoodStore::new(repo);
//! let before = MoodReading::new(MoodRating::new(2).expect("valid rating"));
//! let entry = store.add_entry("meditation", Some(before), None);
//! store.attach_after_rating_to(&entry.id, MoodReading::new(MoodRating::new(4).expect("valid rating")));
//!
//! let stats = MoodAggregator::new(&store).improvement_stats(7, None);
//! println!("average improvement: {}", stats.average_improvement);
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use timer::SessionTimer;

// Public modules
pub mod breathing;
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod logging;
pub mod mood;
pub mod timer;
