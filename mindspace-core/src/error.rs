//! Error types for mindspace-core

use thiserror::Error;

/// Main error type for the mindspace-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Breathing pattern that cannot drive a cycle
    #[error("invalid breathing pattern {name}: {reason}")]
    InvalidPattern { name: String, reason: String },

    /// Pattern key not present in the catalog
    #[error("unknown breathing pattern: {0}")]
    UnknownPattern(String),

    /// Mood rating outside 1..=5
    #[error("invalid mood rating {0}: expected 1-5")]
    InvalidRating(u8),

    /// Mood entry not found
    #[error("mood entry not found: {0}")]
    EntryNotFound(String),
}

/// Result type alias for mindspace-core
pub type Result<T> = std::result::Result<T, Error>;
