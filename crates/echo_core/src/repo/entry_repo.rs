//! Entry repository: in-memory collection mirrored to the key/value store.
//!
//! # Responsibility
//! - Own the authoritative in-memory entry collection.
//! - Mirror every mutation to the store under the `entries` key.
//!
//! # Invariants
//! - Entry ids are unique within the collection at all times.
//! - `update`/`delete` on an absent id perform no mutation and no persist.
//! - Persist failures are swallowed: the in-memory state stays authoritative
//!   and the failure is logged and counted (best-effort storage policy).

use crate::model::entry::{EntryId, JournalEntry};
use crate::store::KvStore;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key for the persisted collection.
const ENTRIES_KEY: &str = "entries";

pub type RepoResult<T> = Result<T, RepoError>;

/// Semantic repository error. Storage transport failures are not surfaced
/// here; see the module-level best-effort policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    /// No entry with the given id exists.
    NotFound(EntryId),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "entry not found: {id}"),
        }
    }
}

impl Error for RepoError {}

/// Partial edit applied by [`EntryRepository::update`].
///
/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl EntryPatch {
    /// Patch replacing both title and content.
    pub fn full(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            content: Some(content.into()),
        }
    }
}

/// Persisted JSON shape: `{"entries": [...]}` under the store namespace.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedEntries {
    entries: Vec<JournalEntry>,
}

#[derive(Serialize)]
struct PersistedEntriesRef<'a> {
    entries: &'a [JournalEntry],
}

/// In-memory entry collection mirrored to a [`KvStore`] on every mutation.
pub struct EntryRepository<S: KvStore> {
    store: S,
    entries: Vec<JournalEntry>,
    persist_failures: u64,
}

impl<S: KvStore> EntryRepository<S> {
    /// Loads the persisted collection from `store`.
    ///
    /// A missing key yields an empty collection. Storage or decode failures
    /// are logged and also yield an empty collection, so a corrupt value
    /// never blocks startup. Entries failing validation are dropped with a
    /// warning instead of poisoning the whole collection.
    pub fn load(store: S) -> Self {
        let entries = match store.get_json::<PersistedEntries>(ENTRIES_KEY) {
            Ok(Some(persisted)) => {
                let mut entries = persisted.entries;
                entries.retain(|entry| match entry.validate() {
                    Ok(()) => true,
                    Err(err) => {
                        warn!(
                            "event=entries_load module=repo status=dropped id={} error={err}",
                            entry.id
                        );
                        false
                    }
                });
                entries
            }
            Ok(None) => Vec::new(),
            Err(err) => {
                error!("event=entries_load module=repo status=error error={err}");
                Vec::new()
            }
        };

        info!(
            "event=entries_load module=repo status=ok count={}",
            entries.len()
        );

        Self {
            store,
            entries,
            persist_failures: 0,
        }
    }

    /// All entries, unsorted by contract. Callers sort for display.
    pub fn list(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Looks up one entry by exact id.
    pub fn find_by_id(&self, id: EntryId) -> Option<&JournalEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Creates an empty entry at the head of the collection and persists.
    ///
    /// # Contract
    /// - Fresh unique id, `created_at == updated_at == now`.
    /// - Returns a reference to the newly inserted entry.
    pub fn create(&mut self) -> &JournalEntry {
        let entry = JournalEntry::new();
        info!("event=entry_create module=repo status=ok id={}", entry.id);
        self.entries.insert(0, entry);
        self.persist();
        &self.entries[0]
    }

    /// Applies `patch` to the entry with `id`, bumps `updated_at`, persists.
    ///
    /// # Contract
    /// - `NotFound` when the id is absent; no mutation, no persist.
    pub fn update(&mut self, id: EntryId, patch: &EntryPatch) -> RepoResult<()> {
        let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == id) else {
            return Err(RepoError::NotFound(id));
        };

        entry.apply_edit(patch.title.as_deref(), patch.content.as_deref());
        self.persist();
        Ok(())
    }

    /// Removes the entry with `id` and persists the reduced collection.
    ///
    /// # Contract
    /// - `NotFound` when the id is absent; no side effects.
    pub fn delete(&mut self, id: EntryId) -> RepoResult<()> {
        let Some(index) = self.entries.iter().position(|entry| entry.id == id) else {
            return Err(RepoError::NotFound(id));
        };

        self.entries.remove(index);
        info!("event=entry_delete module=repo status=ok id={id}");
        self.persist();
        Ok(())
    }

    /// Number of persist attempts that failed since load.
    ///
    /// Exposed so the best-effort policy stays observable and testable.
    pub fn persist_failures(&self) -> u64 {
        self.persist_failures
    }

    /// Borrows the underlying store for auxiliary keys (e.g. model id).
    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&mut self) {
        let snapshot = PersistedEntriesRef {
            entries: &self.entries,
        };
        if let Err(err) = self.store.set_json(ENTRIES_KEY, &snapshot) {
            self.persist_failures += 1;
            error!(
                "event=entries_persist module=repo status=error count={} error={err}",
                self.entries.len()
            );
        }
    }
}
