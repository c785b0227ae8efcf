//! Rendering surface boundary and display helpers.
//!
//! # Responsibility
//! - Define the narrow interface the controller drives for all visual output.
//! - Provide pure display helpers (titles, previews, date formatting) so
//!   renderers do not duplicate them.
//!
//! # Invariants
//! - No rendering technology is prescribed; implementations may be a
//!   terminal, a GUI toolkit binding, or a recording stub in tests.

use crate::model::entry::{EntryId, JournalEntry};
use chrono::{Local, TimeZone};

/// Fallback list title for entries without one.
pub const UNTITLED_LABEL: &str = "Untitled Thought";

/// Maximum number of characters in a list preview before truncation.
pub const PREVIEW_MAX_CHARS: usize = 40;

/// Notification severity for transient toasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// External rendering collaborator driven by the application controller.
///
/// Implementations receive already-projected data: the controller decides
/// what to show, the renderer decides how.
pub trait ViewRenderer {
    /// Renders the entry list. `entries` arrive in display order; `active_id`
    /// marks the selected entry, if any.
    fn render_list(&mut self, entries: &[&JournalEntry], active_id: Option<EntryId>);

    /// Populates the edit surface with `entry`, or clears it on `None`.
    fn load_editor(&mut self, entry: Option<&JournalEntry>);

    /// Shows a transient notification.
    fn show_toast(&mut self, message: &str, severity: Severity);

    /// Updates the reflection loading indicator. `percent` is present during
    /// model load (0–100) and absent while waiting on generation.
    fn set_reflection_loading(&mut self, loading: bool, percent: Option<u8>);

    /// Clears the streamed reflection display before a new generation.
    fn clear_reflection(&mut self);

    /// Appends one streamed text fragment to the reflection display.
    fn append_reflection(&mut self, fragment: &str);

    /// Enables or disables the reflection action (hardware gate).
    fn set_reflection_enabled(&mut self, enabled: bool);
}

/// List title for an entry, falling back to [`UNTITLED_LABEL`].
pub fn display_title(entry: &JournalEntry) -> &str {
    if entry.title.trim().is_empty() {
        UNTITLED_LABEL
    } else {
        &entry.title
    }
}

/// Short content preview for list display, truncated to
/// [`PREVIEW_MAX_CHARS`] characters with an ellipsis.
pub fn preview_text(entry: &JournalEntry) -> String {
    let content = entry.content.trim();
    if content.is_empty() {
        return "Empty note...".to_string();
    }

    let mut preview: String = content.chars().take(PREVIEW_MAX_CHARS).collect();
    if content.chars().count() > PREVIEW_MAX_CHARS {
        preview.push_str("...");
    }
    preview
}

/// Formats epoch milliseconds as a short date, e.g. `Mon, Oct 24, 2025`.
///
/// Returns an empty string for timestamps outside the representable range.
pub fn format_entry_date(epoch_ms: i64) -> String {
    match Local.timestamp_millis_opt(epoch_ms).single() {
        Some(moment) => moment.format("%a, %b %-d, %Y").to_string(),
        None => String::new(),
    }
}

/// Formats epoch milliseconds as a clock time, e.g. `07:45 PM`.
pub fn format_entry_time(epoch_ms: i64) -> String {
    match Local.timestamp_millis_opt(epoch_ms).single() {
        Some(moment) => moment.format("%I:%M %p").to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{display_title, format_entry_date, format_entry_time, preview_text};
    use crate::model::entry::JournalEntry;

    #[test]
    fn display_title_falls_back_when_blank() {
        let mut entry = JournalEntry::new();
        assert_eq!(display_title(&entry), "Untitled Thought");
        entry.title = "  ".to_string();
        assert_eq!(display_title(&entry), "Untitled Thought");
        entry.title = "Real title".to_string();
        assert_eq!(display_title(&entry), "Real title");
    }

    #[test]
    fn preview_truncates_long_content_on_char_boundaries() {
        let mut entry = JournalEntry::new();
        entry.content = "é".repeat(60);
        let preview = preview_text(&entry);
        assert_eq!(preview.chars().count(), 40 + 3);
        assert!(preview.ends_with("..."));

        entry.content = "short".to_string();
        assert_eq!(preview_text(&entry), "short");

        entry.content = String::new();
        assert_eq!(preview_text(&entry), "Empty note...");
    }

    #[test]
    fn date_formatting_handles_out_of_range() {
        assert!(!format_entry_date(1_700_000_000_000).is_empty());
        assert!(!format_entry_time(1_700_000_000_000).is_empty());
        assert_eq!(format_entry_date(i64::MAX), "");
        assert_eq!(format_entry_time(i64::MAX), "");
    }
}
