//! Integration tests for the journalscope analytics engine
//!
//! These tests drive `AnalyticsEngine` end to end with an in-memory entry
//! store and scripted narrative clients.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use journalscope_core::analytics::{AnalyticsEngine, EngineSettings};
use journalscope_core::insight::NarrativeClient;
use journalscope_core::store::{InMemoryEntryStore, JsonFileEntryStore};
use journalscope_core::{Error, InsightSource, JournalEntry, Result, TimeRange, UsageState};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const AUTHOR: &str = "author-1";

/// Narrative client that always returns the same text.
struct ScriptedClient {
    reply: String,
    calls: AtomicUsize,
}

impl ScriptedClient {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NarrativeClient for ScriptedClient {
    async fn generate_narrative(&self, _prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }
}

/// Narrative client whose service is down.
struct FailingClient;

#[async_trait]
impl NarrativeClient for FailingClient {
    async fn generate_narrative(&self, _prompt: &str) -> Result<String> {
        Err(Error::NarrativeServiceUnavailable("503 Service Unavailable".to_string()))
    }
}

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

fn entry(id: &str, template: &str, created_at: DateTime<Utc>, content: &str) -> JournalEntry {
    JournalEntry {
        id: id.to_string(),
        author_id: AUTHOR.to_string(),
        journal_id: "journal-1".to_string(),
        template_id: template.to_string(),
        content: content.to_string(),
        created_at,
    }
}

fn engine_with(
    entries: Vec<JournalEntry>,
    client: Option<Arc<dyn NarrativeClient>>,
) -> AnalyticsEngine {
    AnalyticsEngine::new(
        Arc::new(InMemoryEntryStore::new(entries)),
        client,
        EngineSettings::default(),
    )
}

fn well_formed_narrative() -> String {
    r#"{"keyThemes":"Gratitude and family","progressIndicators":"Entries are getting longer","patterns":"Mostly mornings","breakthroughs":"Three days in a row","focusAreas":"Weekend reflection","encouragement":"Keep showing up"}"#
        .to_string()
}

// 2024-06-03 is a Monday.
fn monday() -> DateTime<Utc> {
    at(2024, 6, 3, 8)
}

// ============================================
// Streaks
// ============================================

#[test]
fn test_consecutive_days_evaluated_on_last_day() {
    let entries = vec![
        entry("1", "daily", monday(), "monday words"),
        entry("2", "daily", monday() + Duration::days(1), "tuesday words"),
        entry("3", "daily", monday() + Duration::days(2), "wednesday words"),
    ];
    let engine = engine_with(entries, None);
    let now = at(2024, 6, 5, 21);

    let snap = engine
        .compute_analytics(AUTHOR, &TimeRange::unbounded(), &[], now)
        .unwrap();

    assert_eq!(snap.current_streak, 3);
    assert_eq!(snap.longest_streak, 3);
    assert_eq!(snap.active_days, 3);
}

#[test]
fn test_gap_breaks_streak() {
    let entries = vec![
        entry("1", "daily", monday(), "monday words"),
        entry("2", "daily", monday() + Duration::days(2), "wednesday words"),
    ];
    let engine = engine_with(entries, None);
    let now = at(2024, 6, 5, 21);

    let snap = engine
        .compute_analytics(AUTHOR, &TimeRange::unbounded(), &[], now)
        .unwrap();

    assert_eq!(snap.current_streak, 1);
    assert_eq!(snap.longest_streak, 1);
}

#[test]
fn test_current_streak_never_exceeds_longest() {
    // A long run in May, a short live run in June.
    let mut entries: Vec<_> = (1..=10)
        .map(|d| entry(&format!("may-{d}"), "daily", at(2024, 5, d, 9), "words"))
        .collect();
    entries.push(entry("jun-1", "daily", at(2024, 6, 4, 9), "words"));
    entries.push(entry("jun-2", "daily", at(2024, 6, 5, 9), "words"));
    let engine = engine_with(entries, None);

    let snap = engine
        .compute_analytics(AUTHOR, &TimeRange::unbounded(), &[], at(2024, 6, 5, 12))
        .unwrap();

    assert_eq!(snap.current_streak, 2);
    assert_eq!(snap.longest_streak, 10);
    assert!(snap.current_streak <= snap.longest_streak);
    assert!(snap.consistency_score <= 100);
}

// ============================================
// Empty history
// ============================================

#[tokio::test]
async fn test_empty_history_starts_the_journey() {
    let client = ScriptedClient::new(&well_formed_narrative());
    let engine = engine_with(vec![], Some(client.clone()));

    let analysis = engine
        .analyze(AUTHOR, &TimeRange::unbounded(), &[], monday())
        .await
        .unwrap();

    assert_eq!(analysis.snapshot.total_entries, 0);
    assert_eq!(analysis.snapshot.current_streak, 0);
    assert_eq!(analysis.snapshot.longest_streak, 0);
    assert_eq!(analysis.snapshot.consistency_score, 0);
    assert_eq!(analysis.insights.source, InsightSource::Fallback);
    assert!(analysis
        .insights
        .encouragement
        .to_lowercase()
        .contains("start your journey"));
    // Never reaches the text generator.
    assert_eq!(client.calls(), 0);
}

// ============================================
// Templates
// ============================================

#[test]
fn test_even_template_split_orders_by_id() {
    let mut entries = Vec::new();
    for i in 0..5 {
        let t = monday() + Duration::hours(i);
        entries.push(entry(&format!("b{i}"), "templateB", t, "words"));
        entries.push(entry(&format!("a{i}"), "templateA", t, "words"));
    }
    let engine = engine_with(entries, None);

    let snap = engine
        .compute_analytics(AUTHOR, &TimeRange::unbounded(), &[], monday())
        .unwrap();

    let breakdown: Vec<_> = snap
        .template_breakdown
        .iter()
        .map(|t| (t.template_id.as_str(), t.entries, t.percentage))
        .collect();
    assert_eq!(breakdown, vec![("templateA", 5, 50), ("templateB", 5, 50)]);
}

#[test]
fn test_template_percentages_sum_to_about_100() {
    let templates = ["gratitude", "gratitude", "gratitude", "dreams", "dreams", "work", "goals"];
    let entries: Vec<_> = templates
        .iter()
        .enumerate()
        .map(|(i, t)| entry(&i.to_string(), t, monday() + Duration::hours(i as i64), "words"))
        .collect();
    let engine = engine_with(entries, None);

    let snap = engine
        .compute_analytics(AUTHOR, &TimeRange::unbounded(), &[], monday())
        .unwrap();

    let sum: i64 = snap
        .template_breakdown
        .iter()
        .map(|t| t.percentage as i64)
        .sum();
    let slack = snap.template_breakdown.len() as i64 - 1;
    assert!((100 - sum).abs() <= slack, "sum was {sum}");
    assert_eq!(snap.template_breakdown[0].template_id, "gratitude");
}

#[test]
fn test_template_filter_restricts_metrics() {
    let entries = vec![
        entry("1", "gratitude", monday(), "thankful for coffee"),
        entry("2", "work", monday(), "shipped the release today finally"),
    ];
    let engine = engine_with(entries, None);

    let snap = engine
        .compute_analytics(AUTHOR, &TimeRange::unbounded(), &["gratitude".to_string()], monday())
        .unwrap();

    assert_eq!(snap.total_entries, 1);
    assert_eq!(snap.total_words, 3);
    assert_eq!(snap.template_breakdown.len(), 1);
}

// ============================================
// Narrative insights
// ============================================

#[tokio::test]
async fn test_fenced_narrative_is_generated() {
    let fenced = format!("```json\n{}\n```", well_formed_narrative());
    let client = ScriptedClient::new(&fenced);
    let engine = engine_with(
        vec![entry("1", "gratitude", monday(), "grateful for a quiet morning")],
        Some(client.clone()),
    );

    let analysis = engine
        .analyze(AUTHOR, &TimeRange::unbounded(), &[], monday())
        .await
        .unwrap();

    assert_eq!(analysis.insights.source, InsightSource::Generated);
    assert_eq!(analysis.insights.key_themes, "Gratitude and family");
    assert_eq!(analysis.insights.encouragement, "Keep showing up");
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_unusable_responses_fall_back() {
    let replies = [
        "I'm sorry, I can't help with that.",
        r#"{"keyThemes":"Only one field"}"#,
        r#"{"keyThemes":"","progressIndicators":"a","patterns":"b","breakthroughs":"c","focusAreas":"d","encouragement":"e"}"#,
    ];
    for reply in replies {
        let engine = engine_with(
            vec![entry("1", "gratitude", monday(), "grateful")],
            Some(ScriptedClient::new(reply)),
        );
        let analysis = engine
            .analyze(AUTHOR, &TimeRange::unbounded(), &[], monday())
            .await
            .unwrap();
        assert_eq!(analysis.insights.source, InsightSource::Fallback, "reply: {reply}");
        assert!(!analysis.insights.key_themes.is_empty());
    }
}

#[tokio::test]
async fn test_service_error_falls_back() {
    let engine = engine_with(
        vec![entry("1", "gratitude", monday(), "grateful")],
        Some(Arc::new(FailingClient)),
    );

    let analysis = engine
        .analyze(AUTHOR, &TimeRange::unbounded(), &[], monday())
        .await
        .unwrap();

    assert_eq!(analysis.insights.source, InsightSource::Fallback);
    assert!(analysis.insights.prompt_hash.is_some());
}

#[tokio::test]
async fn test_usage_limit_is_threaded_through_calls() {
    let client = ScriptedClient::new(&well_formed_narrative());
    let engine = engine_with(
        vec![entry("1", "gratitude", monday(), "grateful")],
        Some(client.clone()),
    );
    let (snapshot, entries) = engine
        .compute_with_entries(AUTHOR, &TimeRange::unbounded(), &[], monday())
        .unwrap();

    let usage = UsageState::new(Some(1));
    let (first, usage) = engine
        .generate_insight_report_with_usage(&snapshot, &entries, usage)
        .await;
    let (second, usage) = engine
        .generate_insight_report_with_usage(&snapshot, &entries, usage)
        .await;

    assert!(first.is_generated());
    assert_eq!(second.source, InsightSource::Fallback);
    assert_eq!(usage.used, 1);
    assert_eq!(client.calls(), 1);
}

// ============================================
// Determinism and errors
// ============================================

#[test]
fn test_snapshot_is_idempotent() {
    let entries: Vec<_> = (0..20)
        .map(|i| {
            entry(
                &i.to_string(),
                if i % 3 == 0 { "dreams" } else { "daily" },
                at(2024, 5, 1, 7) + Duration::hours(i * 17),
                "a handful of words written down",
            )
        })
        .collect();
    let engine = engine_with(entries, None);
    let now = at(2024, 5, 15, 12);

    let a = engine
        .compute_analytics(AUTHOR, &TimeRange::unbounded(), &[], now)
        .unwrap();
    let b = engine
        .compute_analytics(AUTHOR, &TimeRange::unbounded(), &[], now)
        .unwrap();

    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn test_inverted_range_is_invalid() {
    let engine = engine_with(vec![], None);
    let range = TimeRange {
        start: Some(at(2024, 6, 10, 0)),
        end: Some(at(2024, 6, 1, 0)),
    };

    let err = engine
        .compute_analytics(AUTHOR, &range, &[], monday())
        .unwrap_err();

    assert!(matches!(err, Error::InvalidTimeRange { .. }));
}

#[test]
fn test_json_export_end_to_end() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[
          {{"id":"1","authorId":"author-1","journalId":"j","templateId":"gratitude",
            "content":"morning pages","createdAt":"2024-06-03T07:30:00Z"}},
          {{"id":"2","authorId":"author-1","journalId":"j","templateId":"gratitude",
            "content":"evening notes here","createdAt":"2024-06-04T21:00:00Z"}},
          {{"id":"3","authorId":"someone-else","journalId":"j","templateId":"gratitude",
            "content":"not mine","createdAt":"2024-06-04T21:00:00Z"}}
        ]"#
    )
    .unwrap();

    let engine = AnalyticsEngine::new(
        Arc::new(JsonFileEntryStore::new(file.path())),
        None,
        EngineSettings::default(),
    );
    let snap = engine
        .compute_analytics(AUTHOR, &TimeRange::unbounded(), &[], at(2024, 6, 4, 23))
        .unwrap();

    assert_eq!(snap.total_entries, 2);
    assert_eq!(snap.total_words, 5);
    assert_eq!(snap.current_streak, 2);
    assert_eq!(snap.journaling_since.unwrap().label(), "2024-06-03");
}
