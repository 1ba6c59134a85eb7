//! Deterministic narratives built from metrics alone.
//!
//! Used whenever the text generator is unavailable, too slow, over its usage
//! limit, or returns something unusable. Nothing here can fail.

use super::parse::Narrative;
use crate::analytics::patterns::TimePatterns;
use crate::analytics::AnalyticsSnapshot;
use crate::format::{format_count, plural};

/// Consistency below this suggests writing on more days.
const LOW_CONSISTENCY: u8 = 50;
/// Average entry length below this suggests longer entries.
const SHORT_ENTRY_WORDS: u64 = 50;

/// Canned narrative for an author with no entries in range.
pub fn start_your_journey() -> Narrative {
    Narrative {
        key_themes: "No entries yet. Start your journey by writing your first entry, and themes will appear here as your journal grows.".to_string(),
        progress_indicators: "Your progress will be tracked from your very first entry.".to_string(),
        patterns: "Patterns emerge after a few entries. Try writing at the same time each day.".to_string(),
        breakthroughs: "Your first breakthrough is simply getting started.".to_string(),
        focus_areas: "Pick one template that feels inviting and write a few sentences today.".to_string(),
        encouragement: "Every journal starts with a single entry. Start your journey today!".to_string(),
    }
}

/// Narrative synthesized from snapshot fields with fixed prose.
pub fn from_snapshot(snapshot: &AnalyticsSnapshot) -> Narrative {
    if snapshot.is_empty() {
        return start_your_journey();
    }

    let key_themes = match snapshot.top_template() {
        Some(top) if snapshot.template_breakdown.len() > 1 => format!(
            "Your most used template is \"{}\" ({}% of entries), alongside {} other {}.",
            top.template_id,
            top.percentage,
            snapshot.template_breakdown.len() - 1,
            plural(snapshot.template_breakdown.len() as u64 - 1, "template", "templates")
        ),
        Some(top) => format!(
            "All of your entries in this period use the \"{}\" template.",
            top.template_id
        ),
        None => "Your entries cover a range of topics.".to_string(),
    };

    let progress_indicators = format!(
        "You have written {} {} totalling {} {}, averaging {} words per entry across {} active {}.",
        format_count(snapshot.total_entries),
        plural(snapshot.total_entries, "entry", "entries"),
        format_count(snapshot.total_words),
        plural(snapshot.total_words, "word", "words"),
        snapshot.average_words_per_entry,
        snapshot.active_days,
        plural(snapshot.active_days as u64, "day", "days")
    );

    let mut patterns = format!(
        "Your consistency score is {}/100 over the last {} days.",
        snapshot.consistency_score, snapshot.consistency_window_days
    );
    if let Some(day) = snapshot.time_patterns.busiest_day {
        patterns.push_str(&format!(
            " You write most often on {}s.",
            TimePatterns::day_name(day)
        ));
    }

    let breakthroughs = format!(
        "Your longest streak is {} {}.",
        snapshot.longest_streak,
        plural(snapshot.longest_streak as u64, "day", "days")
    );

    let focus_areas = if snapshot.consistency_score < LOW_CONSISTENCY {
        "Aim to write on a few more days each week; short entries still count.".to_string()
    } else if snapshot.average_words_per_entry < SHORT_ENTRY_WORDS {
        "Your rhythm is steady. Try giving some entries a little more room to explore your thoughts.".to_string()
    } else {
        "Your rhythm and depth are strong. Consider trying a template you use less often.".to_string()
    };

    let encouragement = if snapshot.current_streak > 0 {
        format!(
            "You're on a {}-day streak. Keep it going!",
            snapshot.current_streak
        )
    } else {
        "Every entry counts. Pick up your journal today and start a new streak.".to_string()
    };

    Narrative {
        key_themes,
        progress_indicators,
        patterns,
        breakthroughs,
        focus_areas,
        encouragement,
    }
}
