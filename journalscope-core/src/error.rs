//! Error types for journalscope-core

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Main error type for the journalscope-core library
#[derive(Error, Debug)]
pub enum Error {
    /// The entry store could not produce entries for the request
    #[error("entry store unavailable: {0}")]
    EntryStoreUnavailable(String),

    /// Requested range has its start after its end
    #[error("invalid time range: start {start} is after end {end}")]
    InvalidTimeRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// Narrative service could not be reached or answered with an error
    #[error("narrative service unavailable: {0}")]
    NarrativeServiceUnavailable(String),

    /// Narrative service did not answer within the configured bound
    #[error("narrative service timed out after {timeout_secs}s")]
    NarrativeServiceTimeout { timeout_secs: u64 },

    /// Narrative service answered with something we could not use
    #[error("malformed narrative response: {0}")]
    MalformedNarrativeResponse(#[from] ParseFailure),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True for failures of the narrative service, which never reach callers.
    pub fn is_narrative_failure(&self) -> bool {
        matches!(
            self,
            Error::NarrativeServiceUnavailable(_)
                | Error::NarrativeServiceTimeout { .. }
                | Error::MalformedNarrativeResponse(_)
        )
    }
}

/// Why a narrative response was rejected by the recovery pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    /// No `{ ... }` region in the response
    #[error("response did not contain a JSON object")]
    NoJsonObject,

    /// The sliced region is not valid JSON
    #[error("response JSON is invalid: {0}")]
    InvalidJson(String),

    /// Valid JSON, but not an object
    #[error("response must be a JSON object")]
    NotAnObject,

    /// A required field is absent, not a string, or blank
    #[error("required field `{0}` is missing or empty")]
    MissingField(&'static str),
}

/// Result type alias for journalscope-core
pub type Result<T> = std::result::Result<T, Error>;
