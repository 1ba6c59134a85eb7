//! When an author tends to write: hour-of-day and day-of-week histograms.

use crate::types::JournalEntry;
use chrono::{FixedOffset, Timelike};
use serde::Serialize;

/// Time-based writing patterns in the reference timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimePatterns {
    /// Entry count by hour (0-23)
    pub hourly_distribution: [u64; 24],
    /// Entry count by day of week (0=Sunday, 6=Saturday)
    pub daily_distribution: [u64; 7],
    /// Hour with the most entries (earliest on ties)
    pub peak_hour: Option<u8>,
    /// Weekday with the most entries (0=Sunday)
    pub busiest_day: Option<u8>,
    /// Weekday with the fewest entries among days that have any
    pub quietest_day: Option<u8>,
}

impl Default for TimePatterns {
    fn default() -> Self {
        Self {
            hourly_distribution: [0; 24],
            daily_distribution: [0; 7],
            peak_hour: None,
            busiest_day: None,
            quietest_day: None,
        }
    }
}

impl TimePatterns {
    pub fn from_entries(entries: &[JournalEntry], offset: FixedOffset) -> Self {
        let mut patterns = Self::default();
        for entry in entries {
            let local = entry.created_at.with_timezone(&offset);
            patterns.hourly_distribution[local.hour() as usize] += 1;
            patterns.daily_distribution[entry.day(offset).weekday_from_sunday() as usize] += 1;
        }

        patterns.peak_hour = argmax(&patterns.hourly_distribution);
        patterns.busiest_day = argmax(&patterns.daily_distribution);
        patterns.quietest_day = patterns
            .daily_distribution
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0) // Only consider days with activity
            .min_by_key(|&(day, &count)| (count, day))
            .map(|(day, _)| day as u8);
        patterns
    }

    /// Get day name from index.
    pub fn day_name(day: u8) -> &'static str {
        match day {
            0 => "Sunday",
            1 => "Monday",
            2 => "Tuesday",
            3 => "Wednesday",
            4 => "Thursday",
            5 => "Friday",
            6 => "Saturday",
            _ => "Unknown",
        }
    }

    /// Get hour display (e.g., "10am-11am").
    pub fn hour_display(hour: u8) -> String {
        let h = hour % 12;
        let h = if h == 0 { 12 } else { h };
        let period = if hour < 12 { "am" } else { "pm" };
        let next_h = (hour + 1) % 12;
        let next_h = if next_h == 0 { 12 } else { next_h };
        let next_period = if (hour + 1) % 24 < 12 { "am" } else { "pm" };
        format!("{}{}-{}{}", h, period, next_h, next_period)
    }

    /// More than 30% of entries written between 10pm and 4am.
    pub fn is_night_owl(&self) -> bool {
        let night: u64 = self.hourly_distribution[22..24].iter().sum::<u64>()
            + self.hourly_distribution[0..4].iter().sum::<u64>();
        self.share_above(night, 0.3)
    }

    /// More than 30% of entries written between 5am and 9am.
    pub fn is_early_bird(&self) -> bool {
        let morning: u64 = self.hourly_distribution[5..9].iter().sum();
        self.share_above(morning, 0.3)
    }

    fn share_above(&self, part: u64, threshold: f64) -> bool {
        let total: u64 = self.hourly_distribution.iter().sum();
        if total == 0 {
            return false;
        }
        (part as f64 / total as f64) > threshold
    }
}

fn argmax(counts: &[u64]) -> Option<u8> {
    counts
        .iter()
        .enumerate()
        .filter(|(_, &count)| count > 0)
        .max_by_key(|&(idx, &count)| (count, std::cmp::Reverse(idx)))
        .map(|(idx, _)| idx as u8)
}
