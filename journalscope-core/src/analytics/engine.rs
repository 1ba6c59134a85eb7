//! Analytics engine
//!
//! Wires the entry store, the snapshot computation, and the insight
//! generator together behind the two operations callers use.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     ANALYTICS ENGINE                            │
//! │                                                                 │
//! │  EntryStore.fetch_entries(author, unbounded)                    │
//! │         │                                                       │
//! │         ├──► journaling_since (earliest entry ever)             │
//! │         ▼                                                       │
//! │  select_entries(range, templates)                               │
//! │         │                                                       │
//! │         ▼                                                       │
//! │  ┌──────────┐ ┌──────────┐ ┌───────────┐ ┌──────────┐           │
//! │  │ streaks  │ │ metrics  │ │ templates │ │  charts  │           │
//! │  └────┬─────┘ └────┬─────┘ └─────┬─────┘ └────┬─────┘           │
//! │       └────────────┴──────┬──────┴────────────┘                 │
//! │                           ▼                                     │
//! │                   AnalyticsSnapshot                             │
//! │                           │                                     │
//! │                           ▼                                     │
//! │        InsightGenerator (text generator or fallback)            │
//! │                           │                                     │
//! │                           ▼                                     │
//! │                     InsightReport                               │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use journalscope_core::analytics::{AnalyticsEngine, EngineSettings};
//! use journalscope_core::store::InMemoryEntryStore;
//! use journalscope_core::TimeRange;
//!
//! let engine = AnalyticsEngine::new(Arc::new(store), None, EngineSettings::default());
//! let analysis = engine
//!     .analyze("author-1", &TimeRange::unbounded(), &[], chrono::Utc::now())
//!     .await?;
//! println!("{} day streak", analysis.snapshot.current_streak);
//! ```

use super::filter::select_entries;
use super::metrics::journaling_since;
use super::snapshot::{AnalyticsSnapshot, SnapshotSettings};
use crate::config::Config;
use crate::error::Result;
use crate::insight::{
    create_narrative_client, InsightGenerator, InsightReport, InsightSettings, NarrativeClient,
    UsageState,
};
use crate::store::EntryStore;
use crate::types::{JournalEntry, TimeRange};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Everything the engine needs besides its collaborators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineSettings {
    pub snapshot: SnapshotSettings,
    pub insight: InsightSettings,
}

impl EngineSettings {
    pub fn from_config(config: &Config) -> Result<Self> {
        let timeout_secs = config
            .llm
            .as_ref()
            .map(|llm| llm.effective_timeout_secs())
            .unwrap_or_else(|| InsightSettings::default().timeout.as_secs());
        let snapshot = SnapshotSettings::from_config(&config.analytics)?;
        Ok(Self {
            snapshot,
            insight: InsightSettings {
                timeout: Duration::from_secs(timeout_secs),
                max_prompt_chars: config.analytics.max_prompt_chars,
                offset: snapshot.offset,
            },
        })
    }
}

/// Snapshot, the entries behind it, and the report built from them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub snapshot: AnalyticsSnapshot,
    #[serde(skip)]
    pub entries: Vec<JournalEntry>,
    pub insights: InsightReport,
}

/// The analytics and insight engine.
///
/// Holds no mutable state; concurrent requests never interfere.
#[derive(Clone)]
pub struct AnalyticsEngine {
    store: Arc<dyn EntryStore>,
    insights: InsightGenerator,
    settings: EngineSettings,
}

impl AnalyticsEngine {
    pub fn new(
        store: Arc<dyn EntryStore>,
        narrative_client: Option<Arc<dyn NarrativeClient>>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            store,
            // Transcript dates use the same calendar as the snapshot.
            insights: InsightGenerator::new(
                narrative_client,
                InsightSettings {
                    offset: settings.snapshot.offset,
                    ..settings.insight
                },
            ),
            settings,
        }
    }

    /// Build an engine from configuration, creating the HTTP narrative
    /// client when `[llm]` is present.
    pub fn from_config(store: Arc<dyn EntryStore>, config: &Config) -> Result<Self> {
        let settings = EngineSettings::from_config(config)?;
        let client: Option<Arc<dyn NarrativeClient>> = match config.llm.as_ref() {
            Some(llm) => Some(Arc::from(create_narrative_client(llm)?)),
            None => None,
        };
        Ok(Self::new(store, client, settings))
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn has_narrative_client(&self) -> bool {
        self.insights.has_client()
    }

    /// Fetch the author's history and the filtered subset for a request.
    ///
    /// Returns `(filtered entries, journaling_since)`.
    fn load(
        &self,
        author_id: &str,
        range: &TimeRange,
        template_ids: &[String],
    ) -> Result<(Vec<JournalEntry>, Option<crate::types::CalendarDay>)> {
        range.validate()?;
        let history = self
            .store
            .fetch_entries(author_id, &TimeRange::unbounded(), &[])?;
        let since = journaling_since(&history, self.settings.snapshot.offset);
        let filtered = select_entries(&history, range, template_ids);
        tracing::debug!(
            author_id,
            history = history.len(),
            filtered = filtered.len(),
            "Entries selected"
        );
        Ok((filtered, since))
    }

    /// Compute the analytics snapshot for an author, range, and template set.
    ///
    /// Fails only when the range is invalid or the entry store is unavailable.
    pub fn compute_analytics(
        &self,
        author_id: &str,
        range: &TimeRange,
        template_ids: &[String],
        now: DateTime<Utc>,
    ) -> Result<AnalyticsSnapshot> {
        self.compute_with_entries(author_id, range, template_ids, now)
            .map(|(snapshot, _)| snapshot)
    }

    /// Like [`compute_analytics`](Self::compute_analytics), also returning the
    /// filtered entries needed to build an insight prompt.
    pub fn compute_with_entries(
        &self,
        author_id: &str,
        range: &TimeRange,
        template_ids: &[String],
        now: DateTime<Utc>,
    ) -> Result<(AnalyticsSnapshot, Vec<JournalEntry>)> {
        let started = Instant::now();
        let (entries, since) = self.load(author_id, range, template_ids)?;
        let snapshot = AnalyticsSnapshot::compute(&entries, since, now, &self.settings.snapshot);
        tracing::info!(
            author_id,
            entries = snapshot.total_entries,
            current_streak = snapshot.current_streak,
            consistency = snapshot.consistency_score,
            duration_ms = started.elapsed().as_millis() as u64,
            "Analytics computed"
        );
        Ok((snapshot, entries))
    }

    /// Produce an insight report. Never fails.
    pub async fn generate_insight_report(
        &self,
        snapshot: &AnalyticsSnapshot,
        entries: &[JournalEntry],
    ) -> InsightReport {
        self.insights.generate(snapshot, entries).await
    }

    /// Produce an insight report against a usage cap.
    pub async fn generate_insight_report_with_usage(
        &self,
        snapshot: &AnalyticsSnapshot,
        entries: &[JournalEntry],
        usage: UsageState,
    ) -> (InsightReport, UsageState) {
        self.insights
            .generate_with_usage(snapshot, entries, usage)
            .await
    }

    /// Compute analytics and the matching insight report in one call.
    pub async fn analyze(
        &self,
        author_id: &str,
        range: &TimeRange,
        template_ids: &[String],
        now: DateTime<Utc>,
    ) -> Result<Analysis> {
        let (snapshot, entries) = self.compute_with_entries(author_id, range, template_ids, now)?;
        let insights = self.generate_insight_report(&snapshot, &entries).await;
        Ok(Analysis {
            snapshot,
            entries,
            insights,
        })
    }
}
