//! Case-insensitive substring filtering over journal entries.
//!
//! # Responsibility
//! - Filter the collection for type-as-you-search list display.
//! - Derive the stable display ordering used by renderers.
//!
//! # Invariants
//! - A blank query is the identity projection.
//! - Results are always a subsequence of the input preserving relative order.

use crate::model::entry::JournalEntry;

/// Returns entries whose title or content contains `query`, ignoring case.
///
/// A query that is empty or whitespace-only matches everything. The result
/// preserves the relative order of the input.
pub fn filter_entries<'a>(entries: &'a [JournalEntry], query: &str) -> Vec<&'a JournalEntry> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return entries.iter().collect();
    }

    entries
        .iter()
        .filter(|entry| {
            entry.title.to_lowercase().contains(&needle)
                || entry.content.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Sorts entries for list display: most recently updated first, ties broken
/// by id so the ordering is deterministic.
pub fn sort_for_display<'a>(entries: &'a [JournalEntry]) -> Vec<&'a JournalEntry> {
    let mut sorted: Vec<&JournalEntry> = entries.iter().collect();
    sort_display_order(&mut sorted);
    sorted
}

/// Sorts an already-filtered reference slice into display order.
pub fn sort_display_order(entries: &mut [&JournalEntry]) {
    entries.sort_by(|a, b| {
        b.updated_at
            .cmp(&a.updated_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}

#[cfg(test)]
mod tests {
    use super::{filter_entries, sort_for_display};
    use crate::model::entry::JournalEntry;

    fn entry(title: &str, content: &str) -> JournalEntry {
        let mut entry = JournalEntry::new();
        entry.title = title.to_string();
        entry.content = content.to_string();
        entry
    }

    #[test]
    fn blank_query_is_identity() {
        let entries = vec![entry("a", ""), entry("b", ""), entry("c", "")];
        let all = filter_entries(&entries, "");
        assert_eq!(all.len(), entries.len());
        let all_ws = filter_entries(&entries, "   ");
        assert_eq!(all_ws.len(), entries.len());
    }

    #[test]
    fn matching_is_case_insensitive_over_title_and_content() {
        let entries = vec![
            entry("Morning Walk", "crisp air"),
            entry("groceries", "buy OATMEAL"),
            entry("", "quiet evening"),
        ];

        let by_title = filter_entries(&entries, "morning");
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].title, "Morning Walk");

        let by_content = filter_entries(&entries, "oatmeal");
        assert_eq!(by_content.len(), 1);
        assert_eq!(by_content[0].title, "groceries");

        assert!(filter_entries(&entries, "nowhere").is_empty());
    }

    #[test]
    fn result_preserves_relative_order() {
        let entries = vec![
            entry("one", "shared term"),
            entry("two", "unrelated"),
            entry("three", "shared term"),
        ];
        let hits = filter_entries(&entries, "shared");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "one");
        assert_eq!(hits[1].title, "three");
    }

    #[test]
    fn display_order_is_updated_at_descending() {
        let mut older = entry("older", "");
        let mut newer = entry("newer", "");
        older.updated_at = older.created_at;
        newer.updated_at = older.updated_at + 1_000;
        newer.created_at = newer.updated_at;

        let entries = vec![older, newer];
        let sorted = sort_for_display(&entries);
        assert_eq!(sorted[0].title, "newer");
        assert_eq!(sorted[1].title, "older");
    }
}
