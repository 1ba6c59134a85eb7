//! Streak calculation.
//!
//! A streak is a run of consecutive calendar days that each hold at least one
//! entry. Days are keyed in the author's reference timezone and compared with
//! integer day differences.

use crate::types::{CalendarDay, JournalEntry};
use chrono::FixedOffset;
use serde::Serialize;
use std::collections::BTreeSet;

/// Streak statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakStats {
    /// Run ending today or yesterday (0 otherwise)
    pub current_streak: u32,
    /// Longest run seen
    pub longest_streak: u32,
    /// First day of the longest run (earliest run on ties)
    pub longest_streak_start: Option<CalendarDay>,
    /// Last day of the longest run
    pub longest_streak_end: Option<CalendarDay>,
    /// Days with at least one entry
    pub active_days: u32,
}

/// Sorted unique calendar days that hold at least one entry.
pub fn unique_days(entries: &[JournalEntry], offset: FixedOffset) -> Vec<CalendarDay> {
    entries
        .iter()
        .map(|e| e.day(offset))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Calculate streaks from sorted unique days, evaluated on `today`.
///
/// The current streak is still alive when its most recent day is today or
/// yesterday. Days after `today` never count toward the current streak.
pub fn calculate_streaks(days: &[CalendarDay], today: CalendarDay) -> StreakStats {
    let mut stats = StreakStats {
        active_days: days.len() as u32,
        ..Default::default()
    };

    let mut run = 0u32;
    let mut run_start: Option<CalendarDay> = None;
    let mut prev: Option<CalendarDay> = None;

    for &day in days {
        match prev {
            Some(p) if p.days_until(day) == 1 => run += 1,
            _ => {
                run = 1;
                run_start = Some(day);
            }
        }
        if run > stats.longest_streak {
            stats.longest_streak = run;
            stats.longest_streak_start = run_start;
            stats.longest_streak_end = Some(day);
        }
        prev = Some(day);
    }

    let Some(last_idx) = days.iter().rposition(|d| *d <= today) else {
        return stats;
    };
    if days[last_idx].days_until(today) > 1 {
        return stats;
    }

    let mut current = 1u32;
    for pair in days[..=last_idx].windows(2).rev() {
        if pair[0].days_until(pair[1]) == 1 {
            current += 1;
        } else {
            break;
        }
    }
    stats.current_streak = current;

    stats
}

/// Share of the last `window_days` days (ending `today`) with activity, 0–100.
pub fn consistency_score(days: &[CalendarDay], today: CalendarDay, window_days: u32) -> u8 {
    if window_days == 0 {
        return 0;
    }
    let window_start = today.minus_days(window_days as i64 - 1);
    let active = days
        .iter()
        .filter(|d| **d >= window_start && **d <= today)
        .count();
    let pct = (active as f64 / window_days as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}
