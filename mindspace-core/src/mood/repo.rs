//! Storage backends for the mood dataset.
//!
//! The dataset is stored as one JSON array and always read and written whole.

use super::types::MoodEntry;
use crate::db::Database;
use crate::error::Result;
use std::sync::Mutex;

/// Fixed key under which the dataset is stored.
pub const STORAGE_KEY: &str = "mindfulness_mood_entries";

/// Load/save access to the whole mood dataset.
pub trait MoodRepository {
    /// Read every entry, in stored order. A missing dataset is empty.
    fn load(&self) -> Result<Vec<MoodEntry>>;

    /// Replace the stored dataset.
    fn save(&self, entries: &[MoodEntry]) -> Result<()>;

    /// Remove the stored dataset entirely.
    fn clear(&self) -> Result<()> {
        self.save(&[])
    }
}

/// Decode the stored dataset row by row.
///
/// Content that is not a JSON array is an error. Rows that do not decode as
/// a [`MoodEntry`] are skipped with a warning.
fn decode(raw: Option<&str>) -> Result<Vec<MoodEntry>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    let rows: Vec<serde_json::Value> = serde_json::from_str(raw)?;

    let mut entries = Vec::with_capacity(rows.len());
    for (index, row) in rows.into_iter().enumerate() {
        match serde_json::from_value::<MoodEntry>(row) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping unreadable mood entry");
            }
        }
    }
    Ok(entries)
}

/// In-process repository holding the serialized dataset.
///
/// Keeps the JSON text rather than entries so it behaves like the on-disk
/// store, including for corrupt content.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    raw: Mutex<Option<String>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from already-serialized content.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(raw.into())),
        }
    }

    /// Current serialized content
    pub fn raw(&self) -> Option<String> {
        self.raw.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl MoodRepository for MemoryRepository {
    fn load(&self) -> Result<Vec<MoodEntry>> {
        let raw = self.raw.lock().unwrap_or_else(|e| e.into_inner());
        decode(raw.as_deref())
    }

    fn save(&self, entries: &[MoodEntry]) -> Result<()> {
        let json = serde_json::to_string(entries)?;
        *self.raw.lock().unwrap_or_else(|e| e.into_inner()) = Some(json);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.raw.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

/// Repository backed by the SQLite key-value table.
pub struct SqliteRepository {
    db: Database,
    key: String,
}

impl SqliteRepository {
    /// Use `db` (already migrated) with the default storage key.
    pub fn new(db: Database) -> Self {
        Self::with_key(db, STORAGE_KEY)
    }

    pub fn with_key(db: Database, key: impl Into<String>) -> Self {
        Self {
            db,
            key: key.into(),
        }
    }

    /// Open and migrate the database at `path`.
    pub fn open(path: &std::path::Path) -> Result<Self> {
        let db = Database::open(path)?;
        db.migrate()?;
        Ok(Self::new(db))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

impl MoodRepository for SqliteRepository {
    fn load(&self) -> Result<Vec<MoodEntry>> {
        let raw = self.db.get(&self.key)?;
        decode(raw.as_deref())
    }

    fn save(&self, entries: &[MoodEntry]) -> Result<()> {
        let json = serde_json::to_string(entries)?;
        self.db.set(&self.key, &json)
    }

    fn clear(&self) -> Result<()> {
        self.db.remove(&self.key)?;
        Ok(())
    }
}

impl<R: MoodRepository + ?Sized> MoodRepository for &R {
    fn load(&self) -> Result<Vec<MoodEntry>> {
        (**self).load()
    }

    fn save(&self, entries: &[MoodEntry]) -> Result<()> {
        (**self).save(entries)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}
