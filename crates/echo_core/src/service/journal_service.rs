//! Journal application controller.
//!
//! # Responsibility
//! - Orchestrate repository, renderer and reflection session from user
//!   actions.
//! - Debounce persistence of in-progress edits into a single quiet-window
//!   save.
//!
//! # Invariants
//! - Every mutation of the collection or the active id is followed by a list
//!   re-render with the current collection and active id.
//! - Deleting the active entry clears the edit surface and the active id in
//!   the same logical step; no intermediate render shows a stale selection.
//! - At most one pending debounced save exists; a new edit replaces it and
//!   re-arms the deadline.

use crate::model::entry::EntryId;
use crate::reflect::engine::InferenceEngine;
use crate::reflect::session::{CancelHandle, ReflectionSession};
use crate::repo::entry_repo::{EntryPatch, EntryRepository};
use crate::search::filter::{filter_entries, sort_display_order, sort_for_display};
use crate::store::KvStore;
use crate::view::{Severity, ViewRenderer};
use log::{debug, info, warn};
use std::time::{Duration, Instant};

/// Default quiet window before an in-progress edit is persisted.
pub const DEFAULT_QUIET_WINDOW: Duration = Duration::from_millis(500);

/// Storage key remembering the last successfully loaded model id.
const MODEL_ID_KEY: &str = "llm.model";

/// Edit buffered until its quiet-window deadline elapses.
#[derive(Debug, Clone)]
struct PendingEdit {
    entry_id: EntryId,
    title: String,
    content: String,
    deadline: Instant,
}

/// Orchestrates the journal: explicit composition of store, renderer and
/// engine, no ambient globals.
pub struct JournalService<S: KvStore, V: ViewRenderer, E: InferenceEngine> {
    repo: EntryRepository<S>,
    view: V,
    session: ReflectionSession<E>,
    active_id: Option<EntryId>,
    pending_edit: Option<PendingEdit>,
    quiet_window: Duration,
}

impl<S: KvStore, V: ViewRenderer, E: InferenceEngine> JournalService<S, V, E> {
    /// Wires the controller from its collaborators.
    pub fn new(repo: EntryRepository<S>, view: V, session: ReflectionSession<E>) -> Self {
        Self {
            repo,
            view,
            session,
            active_id: None,
            pending_edit: None,
            quiet_window: DEFAULT_QUIET_WINDOW,
        }
    }

    /// Overrides the quiet window (tests and hosts with faster cadence).
    pub fn with_quiet_window(mut self, quiet_window: Duration) -> Self {
        self.quiet_window = quiet_window;
        self
    }

    /// Renders the initial state: full list, no selection, cleared editor,
    /// reflection action gated on hardware support.
    pub fn init(&mut self) {
        let supported = self.session.hardware_supported();
        self.view.set_reflection_enabled(supported);
        if !supported {
            info!("event=app_init module=service status=ok reflection=disabled");
        }
        self.render_list();
        self.view.load_editor(None);
    }

    /// Currently selected entry id, if any.
    pub fn active_entry_id(&self) -> Option<EntryId> {
        self.active_id
    }

    /// Read access to the repository for hosts and tests.
    pub fn repository(&self) -> &EntryRepository<S> {
        &self.repo
    }

    /// Read access to the renderer for hosts and tests.
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Read access to the reflection session for hosts and tests.
    pub fn session(&self) -> &ReflectionSession<E> {
        &self.session
    }

    /// Handle for cancelling an in-flight reflection.
    pub fn reflection_cancel_handle(&self) -> CancelHandle {
        self.session.cancel_handle()
    }

    /// Selects `id` and loads it into the editor.
    ///
    /// Any pending edit for the previous selection is flushed first so a
    /// selection change can never write buffered text into the wrong entry.
    /// An unknown id is ignored.
    pub fn select_entry(&mut self, id: EntryId) {
        self.flush_pending();

        if self.repo.find_by_id(id).is_none() {
            debug!("event=entry_select module=service status=ignored id={id}");
            return;
        }

        self.active_id = Some(id);
        self.render_list();
        let entry = self.repo.find_by_id(id).cloned();
        self.view.load_editor(entry.as_ref());
    }

    /// Creates a fresh empty entry and selects it.
    pub fn create_entry(&mut self) {
        self.flush_pending();
        let id = self.repo.create().id;
        self.active_id = Some(id);
        self.render_list();
        let entry = self.repo.find_by_id(id).cloned();
        self.view.load_editor(entry.as_ref());
    }

    /// Buffers an edit of the active entry and arms the quiet window.
    ///
    /// The repository mutation and persist happen when the window elapses
    /// with no further edits (`flush_due_saves`), or immediately on the next
    /// selection change, creation, or deletion.
    pub fn edit_active(&mut self, title: &str, content: &str) {
        let Some(entry_id) = self.active_id else {
            return;
        };

        self.pending_edit = Some(PendingEdit {
            entry_id,
            title: title.to_string(),
            content: content.to_string(),
            deadline: Instant::now() + self.quiet_window,
        });
    }

    /// Applies the pending edit when its deadline has passed.
    ///
    /// Hosts call this from their event loop tick. Returns `true` when a
    /// save was flushed.
    pub fn flush_due_saves(&mut self, now: Instant) -> bool {
        match &self.pending_edit {
            Some(pending) if now >= pending.deadline => {
                self.flush_pending();
                true
            }
            _ => false,
        }
    }

    /// Applies the pending edit immediately, if any.
    pub fn flush_pending(&mut self) {
        let Some(pending) = self.pending_edit.take() else {
            return;
        };

        let patch = EntryPatch::full(pending.title, pending.content);
        match self.repo.update(pending.entry_id, &patch) {
            Ok(()) => self.render_list(),
            Err(err) => {
                // The entry was deleted while the edit was buffered.
                warn!("event=entry_save module=service status=skipped error={err}");
            }
        }
    }

    /// Deletes the active entry: collection mutation, cleared selection and
    /// editor, re-render and toast as one logical step.
    pub fn delete_active(&mut self) {
        let Some(id) = self.active_id else {
            return;
        };

        // Buffered edits for the doomed entry must not resurrect it.
        self.pending_edit = None;

        if let Err(err) = self.repo.delete(id) {
            warn!("event=entry_delete module=service status=skipped error={err}");
        }
        self.active_id = None;
        self.render_list();
        self.view.load_editor(None);
        self.view.show_toast("Entry deleted", Severity::Success);
    }

    /// Renders the list filtered by `query` without touching selection or
    /// storage. A blank query shows everything.
    pub fn search(&mut self, query: &str) {
        let mut display = filter_entries(self.repo.list(), query);
        sort_display_order(&mut display);
        self.view.render_list(&display, self.active_id);
    }

    /// Streams an AI reflection on the active entry's content.
    ///
    /// Blank content is rejected with a toast before the engine is touched.
    /// The model is loaded lazily on first use with progress bridged to the
    /// loading indicator. All failures surface once through the toast
    /// channel; the loading indicator is always cleared on the way out.
    pub fn reflect(&mut self) {
        self.flush_pending();

        let Some(id) = self.active_id else {
            return;
        };
        let Some(entry) = self.repo.find_by_id(id) else {
            return;
        };
        let content = entry.content.clone();

        if content.trim().is_empty() {
            self.view
                .show_toast("Write something first!", Severity::Error);
            return;
        }

        let view = &mut self.view;
        let session = &mut self.session;

        view.set_reflection_loading(true, None);

        if let Err(err) = session.ensure_loaded(|percent| {
            view.set_reflection_loading(true, Some(percent));
        }) {
            view.show_toast(&format!("AI Error: {err}"), Severity::Error);
            view.set_reflection_loading(false, None);
            return;
        }

        // Remember the model that actually loaded; best effort like every
        // other storage write.
        if let Err(err) = self.repo.store().set(MODEL_ID_KEY, session.model_id()) {
            warn!("event=model_id_persist module=service status=error error={err}");
        }

        view.clear_reflection();
        view.set_reflection_loading(true, None);

        let result = session.generate(&content, |fragment| {
            view.append_reflection(fragment);
        });
        if let Err(err) = result {
            view.show_toast(&format!("AI Error: {err}"), Severity::Error);
        }
        view.set_reflection_loading(false, None);
    }

    /// Requests cooperative cancellation of the in-flight reflection.
    pub fn cancel_reflection(&self) {
        self.session.cancel_handle().cancel();
    }

    fn render_list(&mut self) {
        let display = sort_for_display(self.repo.list());
        self.view.render_list(&display, self.active_id);
    }
}

/// Reads the model id remembered from a previous session, if any.
///
/// Hosts call this before constructing the [`ReflectionSession`] so the
/// last-used model is loaded again.
pub fn stored_model_id<S: KvStore>(store: &S) -> Option<String> {
    match store.get(MODEL_ID_KEY) {
        Ok(value) => value,
        Err(err) => {
            warn!("event=model_id_load module=service status=error error={err}");
            None
        }
    }
}
