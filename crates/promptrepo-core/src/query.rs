//! Read-only prompt queries: search and most-used ranking.

use crate::model::{Document, Prompt};

/// Find prompts matching `query`, case-insensitively.
///
/// Names are searched first. Only when no name matches is the prompt text
/// searched instead. An empty query returns every prompt.
pub fn search<'a>(doc: &'a Document, query: &str) -> Vec<&'a Prompt> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return doc.prompts.iter().collect();
    }

    let by_name: Vec<&Prompt> = doc
        .prompts
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .collect();
    if !by_name.is_empty() {
        return by_name;
    }

    doc.prompts
        .iter()
        .filter(|p| p.text.to_lowercase().contains(&needle))
        .collect()
}

/// Prompts that were copied at least once, most used first.
///
/// Ties keep document order.
pub fn most_used(doc: &Document, limit: Option<usize>) -> Vec<&Prompt> {
    let mut used: Vec<&Prompt> = doc.prompts.iter().filter(|p| p.usage_count > 0).collect();
    used.sort_by(|a, b| b.usage_count.cmp(&a.usage_count));

    if let Some(limit) = limit {
        used.truncate(limit);
    }
    used
}
