//! Core domain logic for Echo, a local-first journaling application.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod reflect;
pub mod repo;
pub mod search;
pub mod service;
pub mod store;
pub mod view;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::entry::{EntryId, EntryValidationError, JournalEntry};
pub use reflect::engine::{
    ChatMessage, EngineError, FragmentStream, InferenceEngine, LoadProgress, Role, StreamDelta,
};
pub use reflect::session::{
    normalize_progress, reflection_prompt, CancelHandle, ReflectionSession, SessionError,
    SessionResult, SessionState, DEFAULT_MODEL_ID,
};
pub use repo::entry_repo::{EntryPatch, EntryRepository, RepoError, RepoResult};
pub use search::filter::{filter_entries, sort_display_order, sort_for_display};
pub use service::journal_service::{stored_model_id, JournalService, DEFAULT_QUIET_WINDOW};
pub use store::{KvError, KvResult, KvStore, SqliteKvStore, KEY_NAMESPACE};
pub use view::{Severity, ViewRenderer};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
