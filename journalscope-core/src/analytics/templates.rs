//! Per-template usage breakdown.

use crate::types::JournalEntry;
use serde::Serialize;
use std::collections::HashMap;

/// How often one template was used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateUsage {
    pub template_id: String,
    pub entries: u64,
    /// Rounded share of all entries, 0–100
    pub percentage: u8,
}

/// Count entries per template, most used first.
///
/// Ties are broken by template id ascending. Rounded percentages may sum to
/// slightly more or less than 100.
pub fn template_breakdown(entries: &[JournalEntry]) -> Vec<TemplateUsage> {
    let total = entries.len() as u64;
    if total == 0 {
        return Vec::new();
    }

    let mut counts: HashMap<&str, u64> = HashMap::new();
    for entry in entries {
        *counts.entry(entry.template_id.as_str()).or_default() += 1;
    }

    let mut breakdown: Vec<TemplateUsage> = counts
        .into_iter()
        .map(|(template_id, count)| TemplateUsage {
            template_id: template_id.to_string(),
            entries: count,
            percentage: (count as f64 / total as f64 * 100.0).round() as u8,
        })
        .collect();

    breakdown.sort_by(|a, b| {
        b.entries
            .cmp(&a.entries)
            .then_with(|| a.template_id.cmp(&b.template_id))
    });
    breakdown
}
