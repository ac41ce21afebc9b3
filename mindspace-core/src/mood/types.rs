//! Mood entry data model.
//!
//! Entries serialize with camelCase field names and RFC 3339 timestamps:
//!
//! ```json
//! {"id":"...","timestamp":"2024-05-01T08:00:00Z","sessionType":"meditation",
//!  "before":{"rating":2},"after":{"rating":4,"note":"calmer"}}
//! ```

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A mood rating from 1 (very low) to 5 (excellent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct MoodRating(u8);

impl MoodRating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(Error::InvalidRating(value))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self.0 {
            1 => "Very Low",
            2 => "Low",
            3 => "Neutral",
            4 => "Good",
            _ => "Excellent",
        }
    }

    /// Chart color as a hex string
    pub fn color(&self) -> &'static str {
        match self.0 {
            1 => "#EF4444",
            2 => "#F97316",
            3 => "#EAB308",
            4 => "#10B981",
            _ => "#3B82F6",
        }
    }
}

impl TryFrom<u8> for MoodRating {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<MoodRating> for u8 {
    fn from(rating: MoodRating) -> Self {
        rating.0
    }
}

impl std::fmt::Display for MoodRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A rating captured at one point of a session, with an optional note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodReading {
    pub rating: MoodRating,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl MoodReading {
    pub fn new(rating: MoodRating) -> Self {
        Self { rating, note: None }
    }

    /// Attach a note; blank notes are dropped.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        let note = note.into();
        let trimmed = note.trim();
        self.note = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }
}

/// One mood submission, optionally paired before/after a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub session_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<MoodReading>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<MoodReading>,
}

impl MoodEntry {
    /// `after - before`, when both ratings are present
    pub fn improvement(&self) -> Option<i32> {
        match (&self.before, &self.after) {
            (Some(before), Some(after)) => {
                Some(i32::from(after.rating.value()) - i32::from(before.rating.value()))
            }
            _ => None,
        }
    }

    /// Whether both a before and an after rating were recorded
    pub fn is_paired(&self) -> bool {
        self.before.is_some() && self.after.is_some()
    }
}

/// Partial update for [`MoodEntry`]. `None` leaves a field unchanged;
/// `Some(None)` clears an optional reading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoodEntryPatch {
    pub timestamp: Option<DateTime<Utc>>,
    pub session_type: Option<String>,
    pub before: Option<Option<MoodReading>>,
    pub after: Option<Option<MoodReading>>,
}

impl MoodEntryPatch {
    pub fn apply(self, entry: &mut MoodEntry) {
        if let Some(timestamp) = self.timestamp {
            entry.timestamp = timestamp;
        }
        if let Some(session_type) = self.session_type {
            entry.session_type = session_type;
        }
        if let Some(before) = self.before {
            entry.before = before;
        }
        if let Some(after) = self.after {
            entry.after = after;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(v: u8) -> MoodRating {
        MoodRating::new(v).unwrap()
    }

    #[test]
    fn test_rating_bounds() {
        assert!(MoodRating::new(0).is_err());
        assert!(MoodRating::new(6).is_err());
        assert_eq!(rating(3).label(), "Neutral");
        assert_eq!(rating(1).color(), "#EF4444");
    }

    #[test]
    fn test_entry_json_shape() {
        let entry = MoodEntry {
            id: "abc".to_string(),
            timestamp: "2024-05-01T08:00:00Z".parse().unwrap(),
            session_type: "meditation".to_string(),
            before: Some(MoodReading::new(rating(2))),
            after: None,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["sessionType"], "meditation");
        assert_eq!(json["before"]["rating"], 2);
        assert!(json.get("after").is_none());
        assert!(json["before"].get("note").is_none());
    }

    #[test]
    fn test_out_of_range_rating_rejected_on_load() {
        let json = r#"{"id":"x","timestamp":"2024-05-01T08:00:00Z","sessionType":"breathing","before":{"rating":9}}"#;
        assert!(serde_json::from_str::<MoodEntry>(json).is_err());
    }

    #[test]
    fn test_improvement() {
        let mut entry = MoodEntry {
            id: "x".to_string(),
            timestamp: Utc::now(),
            session_type: "breathing".to_string(),
            before: Some(MoodReading::new(rating(4))),
            after: None,
        };
        assert_eq!(entry.improvement(), None);
        entry.after = Some(MoodReading::new(rating(2)));
        assert_eq!(entry.improvement(), Some(-2));
        assert!(entry.is_paired());
    }

    #[test]
    fn test_blank_note_dropped() {
        let reading = MoodReading::new(rating(3)).with_note("   ");
        assert_eq!(reading.note, None);
        let reading = MoodReading::new(rating(3)).with_note(" relaxed ");
        assert_eq!(reading.note.as_deref(), Some("relaxed"));
    }

    #[test]
    fn test_patch_clears_and_sets() {
        let mut entry = MoodEntry {
            id: "x".to_string(),
            timestamp: Utc::now(),
            session_type: "breathing".to_string(),
            before: Some(MoodReading::new(rating(4))),
            after: None,
        };
        MoodEntryPatch {
            session_type: Some("meditation".to_string()),
            before: Some(None),
            after: Some(Some(MoodReading::new(rating(5)))),
            ..Default::default()
        }
        .apply(&mut entry);

        assert_eq!(entry.session_type, "meditation");
        assert_eq!(entry.before, None);
        assert_eq!(entry.after.unwrap().rating, rating(5));
        assert_eq!(entry.id, "x");
    }
}
