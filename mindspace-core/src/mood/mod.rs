//! Mood tracking
//!
//! Mood entries are stored as one JSON dataset behind a [`MoodRepository`],
//! mutated through [`MoodStore`] and summarized by [`MoodAggregator`].
//!
//! ## Session pairing
//!
//! A session usually produces a before rating and, once it ends, an after
//! rating. Prefer [`MoodStore::attach_after_rating_to`] with the id returned
//! from the before capture. [`MoodStore::attach_after_rating`] falls back to
//! matching the most recent open entry of the same session type, which is
//! ambiguous when several sessions of one type overlap.

pub mod aggregate;
pub mod repo;
pub mod store;
pub mod types;

pub use aggregate::{
    window_start, DailyTrend, ImprovementStats, MoodAggregator, MoodAverages, MoodTrend,
    MAX_DAILY_DAYS,
};
pub use repo::{MemoryRepository, MoodRepository, SqliteRepository, STORAGE_KEY};
pub use store::{AfterRatingOutcome, MoodStore};
pub use types::{MoodEntry, MoodEntryPatch, MoodRating, MoodReading};
