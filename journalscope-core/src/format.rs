//! Formatting helpers shared across front ends.

use crate::types::CalendarDay;

/// Format a count compactly (e.g., "14.2K", "1.3M").
pub fn format_count(count: u64) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 10_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        count.to_string()
    }
}

/// Pick the singular or plural noun for `count`.
pub fn plural<'a>(count: u64, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 {
        one
    } else {
        many
    }
}

/// Format a day relative to `today` (e.g., "yesterday", "5d ago").
pub fn format_relative_day(day: CalendarDay, today: CalendarDay) -> String {
    let days = day.days_until(today);
    if days < 0 {
        day.date().format("%b %d, %Y").to_string()
    } else if days == 0 {
        "today".to_string()
    } else if days == 1 {
        "yesterday".to_string()
    } else if days < 7 {
        format!("{}d ago", days)
    } else if days < 60 {
        format!("{}w ago", days / 7)
    } else {
        day.date().format("%b %d, %Y").to_string()
    }
}

/// Format an optional day relative to `today`, or a dash if missing.
pub fn format_relative_day_opt(day: Option<CalendarDay>, today: CalendarDay) -> String {
    match day {
        Some(day) => format_relative_day(day, today),
        None => "-".to_string(),
    }
}
