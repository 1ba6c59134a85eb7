//! Prompt construction for narrative requests.

use crate::analytics::patterns::TimePatterns;
use crate::analytics::AnalyticsSnapshot;
use crate::types::JournalEntry;
use chrono::FixedOffset;
use sha2::{Digest, Sha256};

/// Build the narrative prompt from entries and their snapshot.
///
/// The transcript is capped at `max_chars`; the metrics block is always
/// complete. The consistency score is passed as a fact to quote, not a number
/// to re-derive. Entry dates use the same `offset` as the snapshot's day keys.
pub fn build_prompt(
    snapshot: &AnalyticsSnapshot,
    entries: &[JournalEntry],
    max_chars: usize,
    offset: FixedOffset,
) -> String {
    let mut transcript = String::new();
    for entry in entries {
        let line = format!(
            "[{}] ({}) {}\n",
            entry.day(offset),
            entry.template_id,
            entry.content.replace('\n', " ")
        );
        transcript.push_str(&line);
        if transcript.len() >= max_chars {
            truncate_at_char_boundary(&mut transcript, max_chars);
            transcript.push_str("\n...[truncated]");
            break;
        }
    }

    format!(
        "Metrics (authoritative, quote them as given):\n{}\n\nJournal entries (oldest first):\n{}\n\nReturn only a JSON object with the string fields keyThemes, progressIndicators, patterns, breakthroughs, focusAreas, encouragement.",
        metrics_block(snapshot),
        transcript
    )
}

fn metrics_block(snapshot: &AnalyticsSnapshot) -> String {
    let mut lines = vec![
        format!("- Total entries: {}", snapshot.total_entries),
        format!("- Total words: {}", snapshot.total_words),
        format!(
            "- Average words per entry: {}",
            snapshot.average_words_per_entry
        ),
        format!("- Active days: {}", snapshot.active_days),
        format!("- Current streak: {} days", snapshot.current_streak),
        format!("- Longest streak: {} days", snapshot.longest_streak),
        format!(
            "- Consistency score: {}/100 over the last {} days",
            snapshot.consistency_score, snapshot.consistency_window_days
        ),
    ];

    if let Some(since) = snapshot.journaling_since {
        lines.push(format!("- Journaling since: {}", since));
    }

    if !snapshot.template_breakdown.is_empty() {
        let templates = snapshot
            .template_breakdown
            .iter()
            .map(|t| format!("{} ({} entries, {}%)", t.template_id, t.entries, t.percentage))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("- Templates: {}", templates));
    }

    if let Some(day) = snapshot.time_patterns.busiest_day {
        lines.push(format!("- Busiest weekday: {}", TimePatterns::day_name(day)));
    }
    if let Some(hour) = snapshot.time_patterns.peak_hour {
        lines.push(format!("- Peak hour: {}", TimePatterns::hour_display(hour)));
    }
    if snapshot.time_patterns.is_night_owl() {
        lines.push("- Writes mostly late at night (10pm-4am)".to_string());
    }
    if snapshot.time_patterns.is_early_bird() {
        lines.push("- Writes mostly in the early morning (5am-9am)".to_string());
    }

    lines.join("\n")
}

fn truncate_at_char_boundary(text: &mut String, max: usize) {
    let mut cut = max.min(text.len());
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    text.truncate(cut);
}

/// Hex SHA-256 of a prompt, used to correlate logs with requests.
pub fn prompt_hash(prompt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(prompt.as_bytes());
    hex::encode(hasher.finalize())
}
