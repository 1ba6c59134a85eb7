//! Entry snapshot filter.
//!
//! Selects the entries an analytics request looks at: inside a time range
//! (inclusive on both ends) and, optionally, within a set of templates.

use crate::types::{JournalEntry, TimeRange};

/// Filter and sort entries ascending by creation time.
///
/// An empty `template_ids` slice means "all templates". Entries sharing a
/// timestamp are ordered by id so the output is deterministic.
pub fn select_entries<'a, I>(
    entries: I,
    range: &TimeRange,
    template_ids: &[String],
) -> Vec<JournalEntry>
where
    I: IntoIterator<Item = &'a JournalEntry>,
{
    let mut selected: Vec<JournalEntry> = entries
        .into_iter()
        .filter(|e| range.contains(e.created_at))
        .filter(|e| template_ids.is_empty() || template_ids.iter().any(|t| *t == e.template_id))
        .cloned()
        .collect();

    selected.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    selected
}
