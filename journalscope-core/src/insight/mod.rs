//! Narrative insight generation.
//!
//! A request moves from *requesting* to either *validated* (the text
//! generator returned a usable narrative) or *fallback* (anything else).
//!
//! - Empty snapshots never reach the text generator; they get the canned
//!   "start your journey" report.
//! - The generator gets exactly one attempt, bounded by a timeout.
//! - Service errors, timeouts, and malformed responses are logged and turned
//!   into a deterministic report built from the snapshot.
//!
//! The result is tagged with [`InsightSource`] so callers can tell generated
//! prose from synthesized prose.

pub mod client;
pub mod fallback;
pub mod parse;
pub mod prompt;

pub use client::{create_narrative_client, HttpNarrativeClient, NarrativeClient};
pub use parse::{parse_narrative, Narrative};

use crate::analytics::AnalyticsSnapshot;
use crate::types::JournalEntry;
use crate::{Error, Result};
use chrono::{FixedOffset, Offset, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;

/// Where an insight report's prose came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightSource {
    /// Written by the text generator and validated
    Generated,
    /// Synthesized from metrics
    Fallback,
}

impl InsightSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightSource::Generated => "generated",
            InsightSource::Fallback => "fallback",
        }
    }
}

/// Narrative summary of an author's journaling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightReport {
    pub key_themes: String,
    pub progress_indicators: String,
    pub patterns: String,
    pub breakthroughs: String,
    pub focus_areas: String,
    pub encouragement: String,
    pub source: InsightSource,
    /// SHA-256 of the prompt, when one was built
    pub prompt_hash: Option<String>,
}

impl InsightReport {
    fn new(narrative: Narrative, source: InsightSource, prompt_hash: Option<String>) -> Self {
        Self {
            key_themes: narrative.key_themes,
            progress_indicators: narrative.progress_indicators,
            patterns: narrative.patterns,
            breakthroughs: narrative.breakthroughs,
            focus_areas: narrative.focus_areas,
            encouragement: narrative.encouragement,
            source,
            prompt_hash,
        }
    }

    /// The canned report for an empty snapshot.
    pub fn start_your_journey() -> Self {
        Self::new(fallback::start_your_journey(), InsightSource::Fallback, None)
    }

    /// A deterministic report built from metrics alone.
    pub fn fallback(snapshot: &AnalyticsSnapshot, prompt_hash: Option<String>) -> Self {
        Self::new(
            fallback::from_snapshot(snapshot),
            InsightSource::Fallback,
            prompt_hash,
        )
    }

    pub fn is_generated(&self) -> bool {
        self.source == InsightSource::Generated
    }
}

/// Narrative calls made so far against an optional cap.
///
/// Passed into and returned from each request instead of living in a global
/// counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UsageState {
    pub used: u32,
    pub limit: Option<u32>,
}

impl UsageState {
    pub fn new(limit: Option<u32>) -> Self {
        Self { used: 0, limit }
    }

    pub fn can_call(&self) -> bool {
        self.limit.map_or(true, |limit| self.used < limit)
    }

    /// Calls left before the cap, `None` when uncapped.
    pub fn remaining(&self) -> Option<u32> {
        self.limit.map(|limit| limit.saturating_sub(self.used))
    }

    #[must_use]
    pub fn record_call(self) -> Self {
        Self {
            used: self.used.saturating_add(1),
            ..self
        }
    }
}

/// Settings for narrative generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsightSettings {
    /// Bound on the single narrative attempt
    pub timeout: Duration,
    /// Cap on the entry transcript embedded in prompts
    pub max_prompt_chars: usize,
    /// Timezone for transcript dates
    pub offset: FixedOffset,
}

impl Default for InsightSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_prompt_chars: 16_000,
            offset: Utc.fix(),
        }
    }
}

/// Turns snapshots into insight reports.
#[derive(Clone)]
pub struct InsightGenerator {
    client: Option<Arc<dyn NarrativeClient>>,
    settings: InsightSettings,
}

impl InsightGenerator {
    /// A generator without a client always produces fallback reports.
    pub fn new(client: Option<Arc<dyn NarrativeClient>>, settings: InsightSettings) -> Self {
        Self { client, settings }
    }

    pub fn has_client(&self) -> bool {
        self.client.is_some()
    }

    /// Generate a report with no usage cap.
    pub async fn generate(
        &self,
        snapshot: &AnalyticsSnapshot,
        entries: &[JournalEntry],
    ) -> InsightReport {
        self.generate_with_usage(snapshot, entries, UsageState::default())
            .await
            .0
    }

    /// Generate a report, consuming one call from `usage` if the text
    /// generator is contacted.
    pub async fn generate_with_usage(
        &self,
        snapshot: &AnalyticsSnapshot,
        entries: &[JournalEntry],
        usage: UsageState,
    ) -> (InsightReport, UsageState) {
        if snapshot.is_empty() {
            tracing::debug!("Empty snapshot, skipping narrative service");
            return (InsightReport::start_your_journey(), usage);
        }

        let prompt = prompt::build_prompt(
            snapshot,
            entries,
            self.settings.max_prompt_chars,
            self.settings.offset,
        );
        let hash = prompt::prompt_hash(&prompt);

        let Some(client) = self.client.as_ref() else {
            tracing::debug!("No narrative client configured, using fallback");
            return (InsightReport::fallback(snapshot, Some(hash)), usage);
        };

        if !usage.can_call() {
            tracing::info!(
                used = usage.used,
                limit = ?usage.limit,
                "Narrative usage limit reached, using fallback"
            );
            return (InsightReport::fallback(snapshot, Some(hash)), usage);
        }

        let span = tracing::info_span!(
            "narrative",
            request_id = %uuid::Uuid::new_v4(),
            prompt_hash = %hash
        );
        let outcome = self
            .request_narrative(client.as_ref(), &prompt)
            .instrument(span.clone())
            .await;
        let usage = usage.record_call();

        let report = span.in_scope(|| match outcome {
            Ok(narrative) => {
                tracing::info!("Narrative validated");
                InsightReport::new(narrative, InsightSource::Generated, Some(hash))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Narrative request failed, using fallback");
                InsightReport::fallback(snapshot, Some(hash))
            }
        });

        (report, usage)
    }

    /// One bounded attempt followed by the recovery pipeline.
    async fn request_narrative(
        &self,
        client: &dyn NarrativeClient,
        prompt: &str,
    ) -> Result<Narrative> {
        let timeout = self.settings.timeout;
        let raw = tokio::time::timeout(timeout, client.generate_narrative(prompt))
            .await
            .map_err(|_| Error::NarrativeServiceTimeout {
                timeout_secs: timeout.as_secs(),
            })??;
        tracing::debug!(response_len = raw.len(), "Narrative response received");
        Ok(parse_narrative(&raw)?)
    }
}
