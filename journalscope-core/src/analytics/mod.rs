//! Analytics over journal entries
//!
//! Turns a filtered list of entries into an [`AnalyticsSnapshot`]:
//! - Totals and average words per entry
//! - Current and longest streaks, active days
//! - Consistency score over a trailing window
//! - Template breakdown
//! - Weekly and daily chart series
//! - Hour-of-day and day-of-week patterns
//!
//! Every function here is a pure function of its inputs and an explicit
//! "now"; nothing reads the wall clock. See [`engine`] for the component
//! that fetches entries and attaches insight reports.

pub mod charts;
pub mod engine;
pub mod filter;
pub mod metrics;
pub mod patterns;
pub mod snapshot;
pub mod streaks;
pub mod templates;

pub use charts::{ChartOptions, ChartSeries, DailyPoint, TrendComparison, WeeklyPoint};
pub use engine::{Analysis, AnalyticsEngine, EngineSettings};
pub use filter::select_entries;
pub use metrics::TotalStats;
pub use patterns::TimePatterns;
pub use snapshot::{AnalyticsSnapshot, SnapshotSettings};
pub use streaks::StreakStats;
pub use templates::TemplateUsage;
