//! Recovery pipeline for narrative responses.
//!
//! Text generators wrap JSON in code fences, prepend chatter, or drop fields.
//! A response is accepted only when, after fence stripping and object
//! slicing, it parses as a JSON object whose six fields are non-empty strings.

use crate::error::ParseFailure;
use serde::{Deserialize, Serialize};

/// Field names, in the order they are requested.
pub const NARRATIVE_FIELDS: [&str; 6] = [
    "keyThemes",
    "progressIndicators",
    "patterns",
    "breakthroughs",
    "focusAreas",
    "encouragement",
];

/// A validated narrative with all six fields populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Narrative {
    pub key_themes: String,
    pub progress_indicators: String,
    pub patterns: String,
    pub breakthroughs: String,
    pub focus_areas: String,
    pub encouragement: String,
}

/// Parse a raw response into a [`Narrative`].
pub fn parse_narrative(raw: &str) -> Result<Narrative, ParseFailure> {
    let unfenced = strip_code_fences(raw);
    let object = extract_json_object(unfenced)?;
    let value: serde_json::Value =
        serde_json::from_str(object).map_err(|e| ParseFailure::InvalidJson(e.to_string()))?;
    let map = value.as_object().ok_or(ParseFailure::NotAnObject)?;

    let field = |name: &'static str| -> Result<String, ParseFailure> {
        map.get(name)
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
            .map(ToString::to_string)
            .ok_or(ParseFailure::MissingField(name))
    };

    Ok(Narrative {
        key_themes: field(NARRATIVE_FIELDS[0])?,
        progress_indicators: field(NARRATIVE_FIELDS[1])?,
        patterns: field(NARRATIVE_FIELDS[2])?,
        breakthroughs: field(NARRATIVE_FIELDS[3])?,
        focus_areas: field(NARRATIVE_FIELDS[4])?,
        encouragement: field(NARRATIVE_FIELDS[5])?,
    })
}

/// Remove a surrounding markdown code fence (```` ``` ```` or ```` ```json ````).
fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        text = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Slice from the first `{` to the last `}` inclusive.
fn extract_json_object(raw: &str) -> Result<&str, ParseFailure> {
    let start = raw.find('{').ok_or(ParseFailure::NoJsonObject)?;
    let end = raw.rfind('}').ok_or(ParseFailure::NoJsonObject)?;
    if end <= start {
        return Err(ParseFailure::NoJsonObject);
    }
    Ok(&raw[start..=end])
}
