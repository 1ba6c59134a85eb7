//! Core domain types for journalscope
//!
//! These types are the read-only input of the analytics engine. Entries are
//! owned by the entry store; the engine never mutates them.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Author** | The person whose journaling history is analysed |
//! | **Journal** | A notebook that groups entries for an author |
//! | **Template** | A named category/topic tag attached to an entry |
//! | **Entry** | One free-text journal entry with a creation timestamp |
//! | **Calendar day** | A date in the author's reference timezone |

use crate::error::{Error, Result};
use chrono::{DateTime, Datelike, Days, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================
// Entries
// ============================================

/// A single journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    /// Unique identifier
    pub id: String,
    /// Author who wrote the entry
    pub author_id: String,
    /// Journal the entry belongs to
    pub journal_id: String,
    /// Template the entry was written with
    pub template_id: String,
    /// Free-text body
    pub content: String,
    /// When the entry was created
    pub created_at: DateTime<Utc>,
}

impl JournalEntry {
    /// Count of whitespace-delimited tokens in the body.
    pub fn word_count(&self) -> u64 {
        self.content.split_whitespace().count() as u64
    }

    /// Calendar day of creation in the given timezone.
    pub fn day(&self, offset: FixedOffset) -> CalendarDay {
        CalendarDay::from_timestamp(self.created_at, offset)
    }
}

// ============================================
// Time ranges
// ============================================

/// Inclusive time range; a missing bound is unbounded on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeRange {
    /// Range with no bounds at all.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Build a range, rejecting `start > end`.
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Result<Self> {
        let range = Self { start, end };
        range.validate()?;
        Ok(range)
    }

    /// Range covering whole calendar days `from..=to` in the given timezone.
    pub fn from_days(
        from: Option<CalendarDay>,
        to: Option<CalendarDay>,
        offset: FixedOffset,
    ) -> Result<Self> {
        let start = from.map(|d| d.start_of_day(offset));
        let end = to.map(|d| d.next().start_of_day(offset) - Duration::nanoseconds(1));
        Self::new(start, end)
    }

    pub fn validate(&self) -> Result<()> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start > end => Err(Error::InvalidTimeRange { start, end }),
            _ => Ok(()),
        }
    }

    /// Boundaries are inclusive.
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start.map_or(true, |s| ts >= s) && self.end.map_or(true, |e| ts <= e)
    }
}

// ============================================
// Calendar days
// ============================================

/// An immutable calendar date in the reference timezone.
///
/// Day arithmetic is integer arithmetic on dates, never on raw timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarDay(NaiveDate);

impl CalendarDay {
    /// Map an instant to its calendar day in `offset`.
    pub fn from_timestamp(ts: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self(ts.with_timezone(&offset).date_naive())
    }

    /// Parse a `YYYY-MM-DD` label.
    pub fn parse(label: &str) -> Result<Self> {
        NaiveDate::parse_from_str(label, "%Y-%m-%d")
            .map(Self)
            .map_err(|e| Error::Config(format!("invalid date {:?}: {}", label, e)))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Whole days from `self` to `later` (negative if `later` is earlier).
    pub fn days_until(&self, later: CalendarDay) -> i64 {
        (later.0 - self.0).num_days()
    }

    /// Saturates at the earliest representable date.
    pub fn previous(&self) -> Self {
        Self(self.0.pred_opt().unwrap_or(NaiveDate::MIN))
    }

    /// Saturates at the latest representable date.
    pub fn next(&self) -> Self {
        Self(self.0.succ_opt().unwrap_or(NaiveDate::MAX))
    }

    /// The day `days` calendar days before this one, clamped to the
    /// representable date range.
    pub fn minus_days(&self, days: i64) -> Self {
        let shifted = if days >= 0 {
            self.0
                .checked_sub_days(Days::new(days.unsigned_abs()))
                .unwrap_or(NaiveDate::MIN)
        } else {
            self.0
                .checked_add_days(Days::new(days.unsigned_abs()))
                .unwrap_or(NaiveDate::MAX)
        };
        Self(shifted)
    }

    /// ISO week bucket `(iso_year, week_number)`.
    pub fn iso_week(&self) -> (i32, u32) {
        let week = self.0.iso_week();
        (week.year(), week.week())
    }

    /// Day of week with Sunday = 0.
    pub fn weekday_from_sunday(&self) -> u8 {
        self.0.weekday().num_days_from_sunday() as u8
    }

    /// Midnight at the start of this day in `offset`, as UTC.
    pub fn start_of_day(&self, offset: FixedOffset) -> DateTime<Utc> {
        let local = self.0.and_time(NaiveTime::MIN);
        // A fixed offset never produces ambiguous or missing local times.
        local
            .checked_sub_signed(Duration::seconds(offset.local_minus_utc() as i64))
            .unwrap_or(local)
            .and_utc()
    }

    /// `YYYY-MM-DD`
    pub fn label(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }
}

impl fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}
