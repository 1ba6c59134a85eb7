//! The combined analytics snapshot.
//!
//! A snapshot is a pure function of the filtered entries, the author's
//! earliest entry, and the evaluation instant. Computing it twice from the
//! same inputs gives identical output.

use super::charts::{self, ChartOptions, ChartSeries};
use super::metrics::TotalStats;
use super::patterns::TimePatterns;
use super::streaks::{self, StreakStats};
use super::templates::{template_breakdown, TemplateUsage};
use crate::config::AnalyticsConfig;
use crate::types::{CalendarDay, JournalEntry};
use crate::Result;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::Serialize;

/// Knobs that shape a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotSettings {
    /// Reference timezone for calendar-day keys
    pub offset: FixedOffset,
    /// Days covered by the consistency score
    pub consistency_window_days: u32,
    pub charts: ChartOptions,
}

impl Default for SnapshotSettings {
    fn default() -> Self {
        Self {
            offset: Utc.fix(),
            consistency_window_days: 7,
            charts: ChartOptions::default(),
        }
    }
}

impl SnapshotSettings {
    pub fn from_config(config: &AnalyticsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            offset: config.reference_offset()?,
            consistency_window_days: config.consistency_window_days,
            charts: ChartOptions {
                daily_buckets: config.daily_buckets,
                weekly_buckets: config.weekly_buckets,
                dense: config.dense_charts,
            },
        })
    }
}

/// Derived analytics for one author and time range.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub total_entries: u64,
    pub total_words: u64,
    pub average_words_per_entry: u64,
    pub active_days: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    /// Active share of the last `consistency_window_days`, 0–100
    pub consistency_score: u8,
    pub consistency_window_days: u32,
    pub template_breakdown: Vec<TemplateUsage>,
    /// Earliest entry in the unfiltered history
    pub journaling_since: Option<CalendarDay>,
    pub chart_series: ChartSeries,
    pub streaks: StreakStats,
    pub time_patterns: TimePatterns,
    /// The evaluation instant
    pub generated_at: DateTime<Utc>,
}

impl AnalyticsSnapshot {
    /// Build a snapshot from time-ascending filtered entries.
    pub fn compute(
        entries: &[JournalEntry],
        journaling_since: Option<CalendarDay>,
        now: DateTime<Utc>,
        settings: &SnapshotSettings,
    ) -> Self {
        let today = CalendarDay::from_timestamp(now, settings.offset);
        let days = streaks::unique_days(entries, settings.offset);
        let streak_stats = streaks::calculate_streaks(&days, today);
        let totals = TotalStats::from_entries(entries);

        Self {
            total_entries: totals.total_entries,
            total_words: totals.total_words,
            average_words_per_entry: totals.average_words_per_entry,
            active_days: streak_stats.active_days,
            current_streak: streak_stats.current_streak,
            longest_streak: streak_stats.longest_streak,
            consistency_score: streaks::consistency_score(
                &days,
                today,
                settings.consistency_window_days,
            ),
            consistency_window_days: settings.consistency_window_days,
            template_breakdown: template_breakdown(entries),
            journaling_since,
            chart_series: charts::synthesize(entries, settings.offset, today, &settings.charts),
            streaks: streak_stats,
            time_patterns: TimePatterns::from_entries(entries, settings.offset),
            generated_at: now,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_entries == 0
    }

    /// Most used template, if any.
    pub fn top_template(&self) -> Option<&TemplateUsage> {
        self.template_breakdown.first()
    }
}
