//! Cooldown-gated usage counting.

use serde::Serialize;

use crate::error::StoreError;
use crate::model::Document;

/// Minimum time between two counted copies of the same prompt.
pub const COOLDOWN_MS: i64 = 3 * 60 * 1000;

/// What a copy did to the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CopyOutcome {
    Counted,
    Throttled,
}

/// Record that a prompt was copied at `now` (ms since epoch).
///
/// The counter moves only when at least [`COOLDOWN_MS`] has passed since the
/// last counted copy; a prompt that was never copied always counts. A
/// throttled copy is still a success.
pub fn record_copy(doc: &mut Document, prompt_id: &str, now: i64) -> Result<CopyOutcome, StoreError> {
    let prompt = doc
        .prompt_mut(prompt_id)
        .ok_or_else(|| StoreError::prompt_not_found(prompt_id))?;

    let last = prompt.last_copied_at.unwrap_or(0);
    if now.saturating_sub(last) < COOLDOWN_MS {
        return Ok(CopyOutcome::Throttled);
    }

    prompt.usage_count += 1;
    prompt.last_copied_at = Some(now);
    Ok(CopyOutcome::Counted)
}
