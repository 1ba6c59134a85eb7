//! Totals and averages over a filtered entry set.

use crate::types::{CalendarDay, JournalEntry};
use chrono::FixedOffset;
use serde::Serialize;

/// Aggregate totals for a set of entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalStats {
    /// Number of entries
    pub total_entries: u64,
    /// Sum of whitespace-delimited words over all entries
    pub total_words: u64,
    /// `total_words / total_entries`, rounded; 0 without entries
    pub average_words_per_entry: u64,
}

impl TotalStats {
    pub fn from_entries(entries: &[JournalEntry]) -> Self {
        let total_entries = entries.len() as u64;
        let total_words = entries.iter().map(JournalEntry::word_count).sum();
        Self {
            total_entries,
            total_words,
            average_words_per_entry: average_words(total_words, total_entries),
        }
    }
}

/// Rounded mean words per entry, 0 when there are no entries.
pub fn average_words(total_words: u64, total_entries: u64) -> u64 {
    if total_entries == 0 {
        0
    } else {
        (total_words as f64 / total_entries as f64).round() as u64
    }
}

/// Calendar day of the earliest entry in an author's full history.
pub fn journaling_since(history: &[JournalEntry], offset: FixedOffset) -> Option<CalendarDay> {
    history
        .iter()
        .map(|e| e.created_at)
        .min()
        .map(|ts| CalendarDay::from_timestamp(ts, offset))
}
