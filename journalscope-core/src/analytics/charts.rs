//! Chart data for trend visualization.
//!
//! Entries are bucketed per ISO week and per calendar day. Weekly buckets
//! also carry two bounded proxy metrics, `engagement` and `depth`. These are
//! presentation heuristics derived from entry and word counts; they do not
//! measure mood or any psychological quantity.

use crate::types::{CalendarDay, JournalEntry};
use chrono::FixedOffset;
use serde::Serialize;
use std::collections::BTreeMap;

/// Entry count at which the entry half of `engagement` reaches 50%.
const ENGAGEMENT_ENTRY_HALF: f64 = 3.0;
/// Word count at which the word half of `engagement` reaches 50%.
const ENGAGEMENT_WORD_HALF: f64 = 750.0;
/// Average words per entry at which `depth` reaches 50.
const DEPTH_WORD_HALF: f64 = 150.0;

/// Bucketing options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartOptions {
    /// Most recent daily buckets to keep
    pub daily_buckets: usize,
    /// Most recent weekly buckets to keep
    pub weekly_buckets: usize,
    /// Zero-fill buckets without entries, ending at today
    pub dense: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            daily_buckets: 30,
            weekly_buckets: 12,
            dense: false,
        }
    }
}

/// One ISO week of activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPoint {
    /// e.g. `2024-W07`
    pub week_label: String,
    pub iso_year: i32,
    pub iso_week: u32,
    pub entries: u64,
    pub words: u64,
    /// Heuristic proxy, 0–100
    pub engagement: u8,
    /// Heuristic proxy, 0–100
    pub depth: u8,
}

/// One calendar day of activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoint {
    /// `YYYY-MM-DD`
    pub date_label: String,
    pub entries: u64,
    pub words: u64,
}

/// Change of the latest week against the week before it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendComparison {
    pub entries_delta_pct: f64,
    pub words_delta_pct: f64,
}

impl TrendComparison {
    /// Calculate delta percentage between two values.
    pub fn calc_delta(current: u64, previous: u64) -> f64 {
        if previous == 0 {
            if current == 0 {
                0.0
            } else {
                100.0 // Growth from nothing shown as 100%
            }
        } else {
            (current as f64 - previous as f64) / previous as f64 * 100.0
        }
    }

    /// Format delta for display (e.g., "+23%" or "-15%").
    pub fn format_delta(delta: f64) -> String {
        if delta >= 0.0 {
            format!("+{:.0}%", delta)
        } else {
            format!("{:.0}%", delta)
        }
    }
}

/// Series handed to chart renderers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    /// Ascending by week
    pub weekly_progress: Vec<WeeklyPoint>,
    /// Ascending by day
    pub daily_activity: Vec<DailyPoint>,
    /// Present when at least two weekly points exist
    pub weekly_trend: Option<TrendComparison>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Bucket {
    entries: u64,
    words: u64,
}

impl Bucket {
    fn add(&mut self, entry: &JournalEntry) {
        self.entries += 1;
        self.words += entry.word_count();
    }
}

fn saturate(value: f64, half: f64) -> f64 {
    if value <= 0.0 {
        0.0
    } else {
        value / (value + half)
    }
}

/// Heuristic engagement proxy: rises with entry and word counts, never exceeds 100.
pub fn engagement_proxy(entries: u64, words: u64) -> u8 {
    let score = 0.5 * saturate(entries as f64, ENGAGEMENT_ENTRY_HALF)
        + 0.5 * saturate(words as f64, ENGAGEMENT_WORD_HALF);
    (score * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Heuristic depth proxy from average words per entry, 0–100.
pub fn depth_proxy(entries: u64, words: u64) -> u8 {
    if entries == 0 {
        return 0;
    }
    let avg = words as f64 / entries as f64;
    (saturate(avg, DEPTH_WORD_HALF) * 100.0).round().clamp(0.0, 100.0) as u8
}

fn week_label(year: i32, week: u32) -> String {
    format!("{}-W{:02}", year, week)
}

/// Build weekly and daily series from entries, anchored at `today`.
pub fn synthesize(
    entries: &[JournalEntry],
    offset: FixedOffset,
    today: CalendarDay,
    options: &ChartOptions,
) -> ChartSeries {
    let mut weekly: BTreeMap<(i32, u32), Bucket> = BTreeMap::new();
    let mut daily: BTreeMap<CalendarDay, Bucket> = BTreeMap::new();

    for entry in entries {
        let day = entry.day(offset);
        weekly.entry(day.iso_week()).or_default().add(entry);
        daily.entry(day).or_default().add(entry);
    }

    let week_keys: Vec<(i32, u32)> = if options.dense {
        let mut keys: Vec<_> = (0..options.weekly_buckets)
            .map(|i| today.minus_days((i as i64).saturating_mul(7)).iso_week())
            .collect();
        keys.reverse();
        keys
    } else {
        last_n(weekly.keys().copied().collect(), options.weekly_buckets)
    };

    let weekly_progress: Vec<WeeklyPoint> = week_keys
        .into_iter()
        .map(|key| {
            let bucket = weekly.get(&key).copied().unwrap_or_default();
            WeeklyPoint {
                week_label: week_label(key.0, key.1),
                iso_year: key.0,
                iso_week: key.1,
                entries: bucket.entries,
                words: bucket.words,
                engagement: engagement_proxy(bucket.entries, bucket.words),
                depth: depth_proxy(bucket.entries, bucket.words),
            }
        })
        .collect();

    let day_keys: Vec<CalendarDay> = if options.dense {
        let mut keys: Vec<_> = (0..options.daily_buckets)
            .map(|i| today.minus_days(i as i64))
            .collect();
        keys.reverse();
        keys
    } else {
        last_n(daily.keys().copied().collect(), options.daily_buckets)
    };

    let daily_activity = day_keys
        .into_iter()
        .map(|day| {
            let bucket = daily.get(&day).copied().unwrap_or_default();
            DailyPoint {
                date_label: day.label(),
                entries: bucket.entries,
                words: bucket.words,
            }
        })
        .collect();

    let weekly_trend = match weekly_progress.as_slice() {
        [.., previous, latest] => Some(TrendComparison {
            entries_delta_pct: TrendComparison::calc_delta(latest.entries, previous.entries),
            words_delta_pct: TrendComparison::calc_delta(latest.words, previous.words),
        }),
        _ => None,
    };

    ChartSeries {
        weekly_progress,
        daily_activity,
        weekly_trend,
    }
}

fn last_n<T>(mut sorted: Vec<T>, n: usize) -> Vec<T> {
    if sorted.len() > n {
        sorted.drain(..sorted.len() - n);
    }
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn entry(y: i32, m: u32, d: u32, words: usize) -> JournalEntry {
        JournalEntry {
            id: format!("{y}-{m}-{d}-{words}"),
            author_id: "a".to_string(),
            journal_id: "j".to_string(),
            template_id: "t".to_string(),
            content: vec!["word"; words].join(" "),
            created_at: Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).unwrap(),
        }
    }

    fn day(label: &str) -> CalendarDay {
        CalendarDay::parse(label).unwrap()
    }

    #[test]
    fn empty_input_gives_empty_sparse_series() {
        let series = synthesize(&[], utc(), day("2024-01-10"), &ChartOptions::default());
        assert!(series.weekly_progress.is_empty());
        assert!(series.daily_activity.is_empty());
        assert!(series.weekly_trend.is_none());
    }

    #[test]
    fn daily_buckets_aggregate_and_skip_empty_days() {
        let entries = vec![entry(2024, 1, 1, 10), entry(2024, 1, 1, 5), entry(2024, 1, 3, 7)];
        let series = synthesize(&entries, utc(), day("2024-01-03"), &ChartOptions::default());
        assert_eq!(
            series.daily_activity,
            vec![
                DailyPoint {
                    date_label: "2024-01-01".to_string(),
                    entries: 2,
                    words: 15
                },
                DailyPoint {
                    date_label: "2024-01-03".to_string(),
                    entries: 1,
                    words: 7
                },
            ]
        );
    }

    #[test]
    fn sparse_daily_keeps_most_recent_buckets() {
        let entries: Vec<_> = (1..=20).map(|d| entry(2024, 1, d, 1)).collect();
        let options = ChartOptions {
            daily_buckets: 5,
            ..Default::default()
        };
        let series = synthesize(&entries, utc(), day("2024-01-20"), &options);
        let labels: Vec<_> = series
            .daily_activity
            .iter()
            .map(|p| p.date_label.as_str())
            .collect();
        assert_eq!(
            labels,
            vec!["2024-01-16", "2024-01-17", "2024-01-18", "2024-01-19", "2024-01-20"]
        );
    }

    #[test]
    fn dense_daily_zero_fills_up_to_today() {
        let entries = vec![entry(2024, 1, 8, 3)];
        let options = ChartOptions {
            daily_buckets: 3,
            weekly_buckets: 2,
            dense: true,
        };
        let series = synthesize(&entries, utc(), day("2024-01-10"), &options);
        let points: Vec<_> = series
            .daily_activity
            .iter()
            .map(|p| (p.date_label.as_str(), p.entries))
            .collect();
        assert_eq!(
            points,
            vec![("2024-01-08", 1), ("2024-01-09", 0), ("2024-01-10", 0)]
        );
        assert_eq!(series.weekly_progress.len(), 2);
        assert_eq!(series.weekly_progress[0].week_label, "2024-W01");
        assert_eq!(series.weekly_progress[0].entries, 0);
        assert_eq!(series.weekly_progress[1].week_label, "2024-W02");
        assert_eq!(series.weekly_progress[1].entries, 1);
    }

    #[test]
    fn weekly_buckets_follow_iso_weeks() {
        // 2023-12-31 is a Sunday in 2023-W52, 2024-01-01 starts 2024-W01
        let entries = vec![entry(2023, 12, 31, 4), entry(2024, 1, 1, 6), entry(2024, 1, 7, 2)];
        let series = synthesize(&entries, utc(), day("2024-01-07"), &ChartOptions::default());
        let weeks: Vec<_> = series
            .weekly_progress
            .iter()
            .map(|w| (w.week_label.as_str(), w.entries, w.words))
            .collect();
        assert_eq!(weeks, vec![("2023-W52", 1, 4), ("2024-W01", 2, 8)]);
        let trend = series.weekly_trend.unwrap();
        assert_eq!(trend.entries_delta_pct, 100.0);
        assert_eq!(trend.words_delta_pct, 100.0);
    }

    #[test]
    fn proxies_are_bounded_and_monotonic() {
        assert_eq!(engagement_proxy(0, 0), 0);
        assert_eq!(depth_proxy(0, 0), 0);
        let mut last = 0;
        for n in 1..50u64 {
            let e = engagement_proxy(n, n * 200);
            assert!(e >= last);
            assert!(e <= 100);
            last = e;
        }
        assert_eq!(engagement_proxy(3, 750), 50);
        assert_eq!(depth_proxy(2, 300), 50);
        assert!(depth_proxy(1, 1_000_000) <= 100);
    }

    #[test]
    fn trend_delta() {
        assert_eq!(TrendComparison::calc_delta(123, 100), 23.0);
        assert_eq!(TrendComparison::calc_delta(80, 100), -20.0);
        assert_eq!(TrendComparison::calc_delta(100, 0), 100.0);
        assert_eq!(TrendComparison::calc_delta(0, 0), 0.0);
        assert_eq!(TrendComparison::format_delta(23.4), "+23%");
        assert_eq!(TrendComparison::format_delta(-15.0), "-15%");
    }
}
