//! Mood store: the append-only log of mood entries.
//!
//! Every mutation reads the whole dataset, changes it and writes it back.
//! Storage failures are logged rather than returned: reads fall back to an
//! empty dataset, and a mutation whose dataset could not be read is never
//! saved, so stored entries are only removed by `delete` and `clear`. The
//! `try_` variants report those failures instead.

use super::repo::MoodRepository;
use super::types::{MoodEntry, MoodEntryPatch, MoodReading};
use crate::error::Result;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// What [`MoodStore::attach_after_rating`] did with the reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AfterRatingOutcome {
    /// Completed an existing entry that had no after rating
    Attached(MoodEntry),
    /// No open entry matched; a new after-only entry was created
    Created(MoodEntry),
}

impl AfterRatingOutcome {
    pub fn entry(&self) -> &MoodEntry {
        match self {
            AfterRatingOutcome::Attached(entry) | AfterRatingOutcome::Created(entry) => entry,
        }
    }

    pub fn into_entry(self) -> MoodEntry {
        match self {
            AfterRatingOutcome::Attached(entry) | AfterRatingOutcome::Created(entry) => entry,
        }
    }
}

/// Mood entries persisted through a [`MoodRepository`].
pub struct MoodStore<R: MoodRepository> {
    repo: R,
}

impl<R: MoodRepository> MoodStore<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    fn read(&self) -> Vec<MoodEntry> {
        match self.repo.load() {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load mood data, using empty dataset");
                Vec::new()
            }
        }
    }

    /// Dataset to mutate, or `None` when it could not be read and nothing
    /// may be saved.
    fn read_for_update(&self) -> Option<Vec<MoodEntry>> {
        match self.repo.load() {
            Ok(entries) => Some(entries),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load mood data, change not saved");
                None
            }
        }
    }

    fn write(&self, entries: &[MoodEntry]) -> bool {
        match self.repo.save(entries) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, count = entries.len(), "Failed to save mood data");
                false
            }
        }
    }

    /// Record a new entry timestamped now.
    pub fn add_entry(
        &self,
        session_type: &str,
        before: Option<MoodReading>,
        after: Option<MoodReading>,
    ) -> MoodEntry {
        self.add_entry_at(Utc::now(), session_type, before, after)
    }

    /// Record a new entry with an explicit timestamp.
    pub fn add_entry_at(
        &self,
        timestamp: DateTime<Utc>,
        session_type: &str,
        before: Option<MoodReading>,
        after: Option<MoodReading>,
    ) -> MoodEntry {
        let loaded = self.read_for_update();
        let entry = MoodEntry {
            id: fresh_id(loaded.as_deref().unwrap_or_default()),
            timestamp,
            session_type: session_type.to_string(),
            before,
            after,
        };
        if let Some(mut entries) = loaded {
            entries.push(entry.clone());
            self.write(&entries);
        }

        tracing::debug!(id = %entry.id, session_type, "Mood entry added");
        entry
    }

    /// Complete the most recent entry of `session_type` that has no after
    /// rating. When there is none, the reading is stored as a new entry.
    pub fn attach_after_rating(&self, session_type: &str, after: MoodReading) -> AfterRatingOutcome {
        let Some(mut entries) = self.read_for_update() else {
            return AfterRatingOutcome::Created(self.add_entry(session_type, None, Some(after)));
        };

        // max_by_key keeps the last of equal timestamps, i.e. the later append
        let open = entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.session_type == session_type && e.after.is_none())
            .max_by_key(|(_, e)| e.timestamp)
            .map(|(i, _)| i);

        match open {
            Some(index) => {
                entries[index].after = Some(after);
                let entry = entries[index].clone();
                self.write(&entries);
                tracing::debug!(id = %entry.id, session_type, "After rating attached");
                AfterRatingOutcome::Attached(entry)
            }
            None => {
                tracing::info!(
                    session_type,
                    "No open mood entry for after rating, recording it alone"
                );
                AfterRatingOutcome::Created(self.add_entry(session_type, None, Some(after)))
            }
        }
    }

    /// Set the after rating on the entry with `id`, as returned when the
    /// before rating was captured. Returns false if no such entry exists.
    pub fn attach_after_rating_to(&self, id: &str, after: MoodReading) -> bool {
        self.update(
            id,
            MoodEntryPatch {
                after: Some(Some(after)),
                ..Default::default()
            },
        )
    }

    /// Every entry, in stored order.
    pub fn get_all(&self) -> Vec<MoodEntry> {
        self.read()
    }

    pub fn get(&self, id: &str) -> Option<MoodEntry> {
        self.read().into_iter().find(|e| e.id == id)
    }

    /// Apply `patch` to the entry with `id`. Returns whether the entry was
    /// found and the change saved.
    pub fn update(&self, id: &str, patch: MoodEntryPatch) -> bool {
        self.try_update(id, patch).unwrap_or_else(|e| {
            tracing::warn!(error = %e, id, "Failed to update mood entry");
            false
        })
    }

    /// Apply `patch` to the entry with `id`. `Ok(false)` when no entry has
    /// that id; storage failures are returned.
    pub fn try_update(&self, id: &str, patch: MoodEntryPatch) -> Result<bool> {
        let mut entries = self.repo.load()?;
        let Some(entry) = entries.iter_mut().find(|e| e.id == id) else {
            return Ok(false);
        };
        patch.apply(entry);
        self.repo.save(&entries)?;
        Ok(true)
    }

    /// Remove the entry with `id`. Returns whether it was found and the
    /// change saved.
    pub fn delete(&self, id: &str) -> bool {
        self.try_delete(id).unwrap_or_else(|e| {
            tracing::warn!(error = %e, id, "Failed to delete mood entry");
            false
        })
    }

    /// Remove the entry with `id`. `Ok(false)` when no entry has that id;
    /// storage failures are returned.
    pub fn try_delete(&self, id: &str) -> Result<bool> {
        let mut entries = self.repo.load()?;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return Ok(false);
        }
        self.repo.save(&entries)?;
        Ok(true)
    }

    /// Remove every entry.
    pub fn clear(&self) {
        if let Err(e) = self.repo.clear() {
            tracing::warn!(error = %e, "Failed to clear mood data");
        }
    }

    /// Distinct session types, in order of first appearance.
    pub fn session_types(&self) -> Vec<String> {
        let mut types: Vec<String> = Vec::new();
        for entry in self.read() {
            if !types.contains(&entry.session_type) {
                types.push(entry.session_type);
            }
        }
        types
    }

    /// Entries with `start <= timestamp <= end`, in stored order.
    pub fn entries_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<MoodEntry> {
        self.read()
            .into_iter()
            .filter(|e| e.timestamp >= start && e.timestamp <= end)
            .collect()
    }
}

fn fresh_id(existing: &[MoodEntry]) -> String {
    loop {
        let id = Uuid::new_v4().to_string();
        if !existing.iter().any(|e| e.id == id) {
            return id;
        }
    }
}
