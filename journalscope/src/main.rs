//! journalscope - journaling analytics from the command line
//!
//! Reads a JSON export of journal entries and prints streaks, consistency,
//! template usage, chart series, and an insight report.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use journalscope_core::analytics::{AnalyticsEngine, AnalyticsSnapshot, EngineSettings};
use journalscope_core::analytics::{TimePatterns, TrendComparison};
use journalscope_core::format::{format_count, format_relative_day_opt, plural};
use journalscope_core::insight::{create_narrative_client, NarrativeClient};
use journalscope_core::store::JsonFileEntryStore;
use journalscope_core::{CalendarDay, Config, InsightReport, TimeRange, UsageState};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "journalscope")]
#[command(about = "Journaling analytics and insight reports")]
#[command(version)]
struct Args {
    /// JSON export of journal entries
    #[arg(long)]
    entries: PathBuf,

    /// Author whose entries are analyzed
    #[arg(long)]
    author: String,

    /// First day to include (YYYY-MM-DD)
    #[arg(long)]
    from: Option<String>,

    /// Last day to include, inclusive (YYYY-MM-DD)
    #[arg(long)]
    to: Option<String>,

    /// Restrict to a template (repeatable)
    #[arg(long = "template")]
    templates: Vec<String>,

    /// Export format (md = markdown, json = JSON)
    #[arg(long)]
    export: Option<String>,

    /// Skip the insight report
    #[arg(long)]
    no_insights: bool,

    /// Zero-fill empty chart buckets
    #[arg(long)]
    dense: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = match journalscope_core::logging::init(&config.logging) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!(
                "warning: logging disabled, cannot write {}: {e}",
                journalscope_core::logging::log_file_path().display()
            );
            None
        }
    };

    let mut settings =
        EngineSettings::from_config(&config).context("invalid analytics configuration")?;
    if args.dense {
        settings.snapshot.charts.dense = true;
    }
    let offset = settings.snapshot.offset;

    let from = parse_day(args.from.as_deref()).context("invalid --from date")?;
    let to = parse_day(args.to.as_deref()).context("invalid --to date")?;
    let range = TimeRange::from_days(from, to, offset).context("invalid date range")?;

    let client = if args.no_insights {
        None
    } else {
        narrative_client(&config)
    };

    let store = Arc::new(JsonFileEntryStore::new(&args.entries));
    let engine = AnalyticsEngine::new(store, client, settings);

    let now = Utc::now();
    let (snapshot, entries) = engine
        .compute_with_entries(&args.author, &range, &args.templates, now)
        .with_context(|| format!("failed to analyze {}", args.entries.display()))?;

    let report = if args.no_insights {
        None
    } else {
        let usage = UsageState::new(config.insights.limit);
        let (report, usage) = engine
            .generate_insight_report_with_usage(&snapshot, &entries, usage)
            .await;
        tracing::debug!(used = usage.used, remaining = ?usage.remaining(), "Narrative usage");
        Some(report)
    };

    let today = CalendarDay::from_timestamp(now, offset);
    match args.export.as_deref() {
        Some("json") => print_json(&snapshot, report.as_ref())?,
        Some("md") => print_markdown(&args.author, &snapshot, report.as_ref(), today),
        Some(other) => anyhow::bail!("Unknown export format: {}. Use 'md' or 'json'", other),
        None => print_terminal(&args.author, &snapshot, report.as_ref(), today),
    }

    Ok(())
}

fn parse_day(value: Option<&str>) -> Result<Option<CalendarDay>> {
    value
        .map(|s| CalendarDay::parse(s).map_err(anyhow::Error::from))
        .transpose()
}

/// Build the HTTP narrative client when `[llm]` is configured.
///
/// A misconfigured client is logged and skipped; reports then fall back.
fn narrative_client(config: &Config) -> Option<Arc<dyn NarrativeClient>> {
    let llm = config.llm.as_ref()?;
    match create_narrative_client(llm) {
        Ok(client) => Some(Arc::from(client)),
        Err(e) => {
            tracing::warn!(
                error = %e,
                provider = llm.provider.as_str(),
                "Narrative client unavailable"
            );
            eprintln!("warning: {e}; insights will use the built-in summary");
            None
        }
    }
}

fn days(n: u32) -> String {
    format!("{} {}", n, plural(n as u64, "day", "days"))
}

fn streak_dates(snapshot: &AnalyticsSnapshot) -> String {
    match (
        snapshot.streaks.longest_streak_start,
        snapshot.streaks.longest_streak_end,
    ) {
        (Some(start), Some(end)) => format!(
            " ({} - {})",
            start.date().format("%b %d"),
            end.date().format("%b %d")
        ),
        _ => String::new(),
    }
}

fn print_terminal(
    author: &str,
    snapshot: &AnalyticsSnapshot,
    report: Option<&InsightReport>,
    today: CalendarDay,
) {
    let title = format!("Journal Insights: {}", author);

    println!();
    println!("╭{}╮", "─".repeat(60));
    println!("│{:^60}│", title);
    println!("╰{}╯", "─".repeat(60));
    println!();

    if snapshot.is_empty() {
        println!("  No entries found for this period.");
        println!();
    } else {
        println!("SUMMARY");
        println!(
            "   Entries:  {:<12} Words: {}",
            format_count(snapshot.total_entries),
            format_count(snapshot.total_words)
        );
        println!(
            "   Average:  {:<12} Since: {}",
            format!("{} words", snapshot.average_words_per_entry),
            format_relative_day_opt(snapshot.journaling_since, today)
        );
        println!();

        println!("STREAKS");
        println!("   Current:  {}", days(snapshot.current_streak));
        if snapshot.longest_streak > 0 {
            println!(
                "   Longest:  {}{}",
                days(snapshot.longest_streak),
                streak_dates(snapshot)
            );
        }
        println!("   Active:   {}", days(snapshot.active_days));
        println!(
            "   Consistency: {}% of the last {}",
            snapshot.consistency_score,
            days(snapshot.consistency_window_days)
        );
        println!();

        if !snapshot.template_breakdown.is_empty() {
            println!("TEMPLATES");
            for (i, usage) in snapshot.template_breakdown.iter().enumerate() {
                println!(
                    "   {}. {:<20} {:>6}  {:>3}%",
                    i + 1,
                    usage.template_id,
                    usage.entries,
                    usage.percentage
                );
            }
            println!();
        }

        let patterns = &snapshot.time_patterns;
        println!("TIME PATTERNS");
        if let Some(hour) = patterns.peak_hour {
            println!("   Peak hour:    {}", TimePatterns::hour_display(hour));
        }
        if let Some(day) = patterns.busiest_day {
            println!("   Busiest day:  {}", TimePatterns::day_name(day));
        }
        if let Some(day) = patterns.quietest_day {
            println!("   Quietest day: {}", TimePatterns::day_name(day));
        }
        println!();

        if let Some(trend) = &snapshot.chart_series.weekly_trend {
            println!("VS PREVIOUS WEEK");
            println!(
                "   Entries: {}  │  Words: {}",
                TrendComparison::format_delta(trend.entries_delta_pct),
                TrendComparison::format_delta(trend.words_delta_pct),
            );
            println!();
        }

        if !snapshot.chart_series.weekly_progress.is_empty() {
            println!("WEEKLY PROGRESS");
            for week in &snapshot.chart_series.weekly_progress {
                println!(
                    "   {}  {:>4} entries  {:>7} words  engagement {:>3}  depth {:>3}",
                    week.week_label,
                    week.entries,
                    format_count(week.words),
                    week.engagement,
                    week.depth
                );
            }
            println!();
        }
    }

    if let Some(report) = report {
        println!("INSIGHTS ({})", report.source.as_str());
        for (label, text) in insight_sections(report) {
            println!("   {}:", label);
            println!("     {}", text);
        }
        println!();
    }
}

fn print_markdown(
    author: &str,
    snapshot: &AnalyticsSnapshot,
    report: Option<&InsightReport>,
    today: CalendarDay,
) {
    println!("# Journal Insights: {}", author);
    println!();

    if snapshot.is_empty() {
        println!("*No entries found for this period.*");
        println!();
    } else {
        println!("## Summary");
        println!();
        println!("| Metric | Value |");
        println!("|--------|-------|");
        println!("| Entries | {} |", snapshot.total_entries);
        println!("| Words | {} |", snapshot.total_words);
        println!(
            "| Average words per entry | {} |",
            snapshot.average_words_per_entry
        );
        println!("| Current streak | {} |", days(snapshot.current_streak));
        println!(
            "| Longest streak | {}{} |",
            days(snapshot.longest_streak),
            streak_dates(snapshot)
        );
        println!("| Active days | {} |", snapshot.active_days);
        println!(
            "| Consistency ({}) | {}% |",
            days(snapshot.consistency_window_days),
            snapshot.consistency_score
        );
        println!(
            "| Journaling since | {} |",
            format_relative_day_opt(snapshot.journaling_since, today)
        );
        println!();

        if !snapshot.template_breakdown.is_empty() {
            println!("## Templates");
            println!();
            println!("| Template | Entries | Share |");
            println!("|----------|---------|-------|");
            for usage in &snapshot.template_breakdown {
                println!(
                    "| {} | {} | {}% |",
                    usage.template_id, usage.entries, usage.percentage
                );
            }
            println!();
        }

        if !snapshot.chart_series.weekly_progress.is_empty() {
            println!("## Weekly Progress");
            println!();
            println!("| Week | Entries | Words | Engagement | Depth |");
            println!("|------|---------|-------|------------|-------|");
            for week in &snapshot.chart_series.weekly_progress {
                println!(
                    "| {} | {} | {} | {} | {} |",
                    week.week_label, week.entries, week.words, week.engagement, week.depth
                );
            }
            println!();
            println!("*Engagement and depth are heuristics derived from entry and word counts.*");
            println!();
        }
    }

    if let Some(report) = report {
        println!("## Insights");
        println!();
        for (label, text) in insight_sections(report) {
            println!("**{}:** {}", label, text);
            println!();
        }
        if !report.is_generated() {
            println!("*Summary generated from your metrics.*");
            println!();
        }
    }

    println!("---");
    println!("*Generated by journalscope*");
}

fn print_json(snapshot: &AnalyticsSnapshot, report: Option<&InsightReport>) -> Result<()> {
    let json = serde_json::json!({
        "snapshot": snapshot,
        "insights": report,
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

fn insight_sections(report: &InsightReport) -> [(&'static str, &str); 6] {
    [
        ("Key themes", report.key_themes.as_str()),
        ("Progress", report.progress_indicators.as_str()),
        ("Patterns", report.patterns.as_str()),
        ("Breakthroughs", report.breakthroughs.as_str()),
        ("Focus areas", report.focus_areas.as_str()),
        ("Encouragement", report.encouragement.as_str()),
    ]
}
