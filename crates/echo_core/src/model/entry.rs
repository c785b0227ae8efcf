//! Journal entry domain model.
//!
//! # Responsibility
//! - Define the canonical journal entry record and its lifecycle helpers.
//! - Keep persisted field naming stable across releases.
//!
//! # Invariants
//! - `id` is stable and never reused for another entry.
//! - `updated_at >= created_at` for every well-formed entry.
//! - Serialized field names stay camelCase to match the persisted JSON shape.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier for a journal entry.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
/// Generated ids are UUIDv7, so they carry creation time and stay unique
/// across the process lifetime without coordination.
pub type EntryId = Uuid;

/// A single journal record: free-text title and content plus lifecycle
/// timestamps in epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    /// Stable global ID, immutable for the entry's lifetime.
    pub id: EntryId,
    /// Free text, may be empty.
    pub title: String,
    /// Free text, may be empty.
    pub content: String,
    /// Epoch milliseconds, set once at creation.
    pub created_at: i64,
    /// Epoch milliseconds, bumped on every title/content mutation.
    pub updated_at: i64,
}

/// Validation failure for a persisted or constructed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValidationError {
    /// `updated_at` is earlier than `created_at`.
    UpdatedBeforeCreated { created_at: i64, updated_at: i64 },
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UpdatedBeforeCreated {
                created_at,
                updated_at,
            } => write!(
                f,
                "updated_at {updated_at} is earlier than created_at {created_at}"
            ),
        }
    }
}

impl Error for EntryValidationError {}

impl JournalEntry {
    /// Creates an empty entry with a fresh id and both timestamps set to now.
    pub fn new() -> Self {
        Self::with_id(Uuid::now_v7())
    }

    /// Creates an empty entry with a caller-provided stable id.
    ///
    /// # Invariants
    /// - The provided `id` must remain stable for this entry's lifetime.
    pub fn with_id(id: EntryId) -> Self {
        let now = now_epoch_ms();
        Self {
            id,
            title: String::new(),
            content: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces title and/or content and bumps `updated_at`.
    ///
    /// Fields passed as `None` are left unchanged. The bump clamps to
    /// `created_at` so a backwards clock step cannot break the timestamp
    /// invariant.
    pub fn apply_edit(&mut self, title: Option<&str>, content: Option<&str>) {
        if let Some(title) = title {
            self.title = title.to_string();
        }
        if let Some(content) = content {
            self.content = content.to_string();
        }
        self.updated_at = now_epoch_ms().max(self.created_at);
    }

    /// Checks structural invariants on a constructed or deserialized entry.
    pub fn validate(&self) -> Result<(), EntryValidationError> {
        if self.updated_at < self.created_at {
            return Err(EntryValidationError::UpdatedBeforeCreated {
                created_at: self.created_at,
                updated_at: self.updated_at,
            });
        }
        Ok(())
    }
}

impl Default for JournalEntry {
    fn default() -> Self {
        Self::new()
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{now_epoch_ms, EntryValidationError, JournalEntry};

    #[test]
    fn new_entry_starts_empty_with_equal_timestamps() {
        let entry = JournalEntry::new();
        assert!(entry.title.is_empty());
        assert!(entry.content.is_empty());
        assert_eq!(entry.created_at, entry.updated_at);
        entry.validate().expect("fresh entry must be valid");
    }

    #[test]
    fn apply_edit_keeps_omitted_fields() {
        let mut entry = JournalEntry::new();
        entry.apply_edit(Some("morning pages"), None);
        assert_eq!(entry.title, "morning pages");
        assert!(entry.content.is_empty());

        entry.apply_edit(None, Some("slept well"));
        assert_eq!(entry.title, "morning pages");
        assert_eq!(entry.content, "slept well");
    }

    #[test]
    fn apply_edit_never_moves_updated_at_backwards() {
        let mut entry = JournalEntry::new();
        entry.created_at = now_epoch_ms() + 60_000;
        entry.apply_edit(None, Some("future-dated"));
        assert!(entry.updated_at >= entry.created_at);
    }

    #[test]
    fn validate_rejects_updated_before_created() {
        let mut entry = JournalEntry::new();
        entry.updated_at = entry.created_at - 1;
        let err = entry.validate().expect_err("must reject inverted timestamps");
        assert!(matches!(
            err,
            EntryValidationError::UpdatedBeforeCreated { .. }
        ));
    }

    #[test]
    fn serialized_field_names_are_camel_case() {
        let entry = JournalEntry::new();
        let json = serde_json::to_string(&entry).expect("entry serializes");
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"updatedAt\""));
    }
}
