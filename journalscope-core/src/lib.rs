//! # journalscope-core
//!
//! Core library for journalscope - analytics and insight reports for
//! journaling apps.
//!
//! This library provides:
//! - Domain types for entries, time ranges, and calendar days
//! - Streak, consistency, template, and chart analytics
//! - Narrative insight reports with a deterministic fallback
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! Data flows through three layers:
//! - **Entries:** Read-only journal entries supplied by an [`store::EntryStore`]
//! - **Snapshot:** Deterministic metrics computed from the filtered entries
//! - **Insights:** Narrative built from the snapshot, never trusted to recompute it
//!
//! ## Example
//!
//! ```rust,no_run
//! use journalscope_core::analytics::AnalyticsEngine;
//! use journalscope_core::store::JsonFileEntryStore;
//! use journalscope_core::{Config, TimeRange};
//! use std::sync::Arc;
//!
//! # async fn run() -> journalscope_core::Result<()> {
//! let config = Config::load()?;
//! let store = Arc::new(JsonFileEntryStore::new("entries.json"));
//! let engine = AnalyticsEngine::from_config(store, &config)?;
//!
//! let analysis = engine
//!     .analyze("author-1", &TimeRange::unbounded(), &[], chrono::Utc::now())
//!     .await?;
//! println!("{}", analysis.insights.encouragement);
//! # Ok(())
//! # }
//! ```

// Re-export commonly used items at the crate root
pub use analytics::{AnalyticsEngine, AnalyticsSnapshot};
pub use config::Config;
pub use error::{Error, ParseFailure, Result};
pub use insight::{InsightReport, InsightSource, UsageState};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod error;
pub mod format;
pub mod insight;
pub mod logging;
pub mod store;
pub mod types;
