//! Prompt creation and the per-prompt version ledger.
//!
//! A prompt's `versions` only ever grows. Every edit appends a full snapshot
//! of the resulting name and text, and `currentVersion` always equals the
//! `version` of the last entry. Restoring an old entry copies its name and
//! text back onto the prompt without recording anything in the history.

use serde::Deserialize;
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::{Document, Prompt, VersionEntry};
use crate::order::next_order;

/// Fields to change in an update. Absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// Build a history entry.
pub fn snapshot(name: &str, text: &str, timestamp: i64, version: u32) -> VersionEntry {
    VersionEntry {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        text: text.to_string(),
        timestamp,
        version,
    }
}

/// Create a prompt at the end of `folder` (root when `None`), seeded with
/// version 1.
pub fn add_prompt(
    doc: &mut Document,
    name: &str,
    text: &str,
    folder: Option<&str>,
    now: i64,
) -> Result<Prompt, StoreError> {
    doc.require_container(folder)?;

    let prompt = Prompt {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        text: text.to_string(),
        folder_id: folder.map(str::to_string),
        order: next_order(doc, folder),
        current_version: 1,
        versions: vec![snapshot(name, text, now, 1)],
        usage_count: 0,
        last_copied_at: None,
    };
    doc.prompts.push(prompt.clone());

    Ok(prompt)
}

/// Apply an edit and append the resulting state to the history.
pub fn update_prompt(
    doc: &mut Document,
    prompt_id: &str,
    update: &PromptUpdate,
    now: i64,
) -> Result<Prompt, StoreError> {
    let prompt = doc
        .prompt_mut(prompt_id)
        .ok_or_else(|| StoreError::prompt_not_found(prompt_id))?;

    if let Some(name) = &update.name {
        prompt.name = name.clone();
    }
    if let Some(text) = &update.text {
        prompt.text = text.clone();
    }

    let version = prompt.current_version + 1;
    let entry = snapshot(&prompt.name, &prompt.text, now, version);
    prompt.versions.push(entry);
    prompt.current_version = version;

    log::debug!("Prompt {prompt_id} now at version {version}");
    Ok(prompt.clone())
}

/// Copy a history entry's name and text back onto the prompt.
///
/// The history and `currentVersion` are left unchanged.
pub fn restore_version(
    doc: &mut Document,
    prompt_id: &str,
    version_id: &str,
) -> Result<Prompt, StoreError> {
    let prompt = doc
        .prompt_mut(prompt_id)
        .ok_or_else(|| StoreError::prompt_not_found(prompt_id))?;

    let entry = prompt
        .versions
        .iter()
        .find(|v| v.id == version_id)
        .cloned()
        .ok_or_else(|| StoreError::VersionNotFound {
            prompt_id: prompt_id.to_string(),
            version_id: version_id.to_string(),
        })?;

    prompt.name = entry.name;
    prompt.text = entry.text;

    Ok(prompt.clone())
}

/// A prompt's history, oldest first.
pub fn history<'a>(doc: &'a Document, prompt_id: &str) -> Result<&'a [VersionEntry], StoreError> {
    Ok(&doc.require_prompt(prompt_id)?.versions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::folder;

    fn doc_with_prompt() -> (Document, String) {
        let mut doc = Document::default();
        let prompt = add_prompt(&mut doc, "Greeting", "Hello", None, 1_000).unwrap();
        (doc, prompt.id)
    }

    #[test]
    fn add_seeds_first_version() {
        let (doc, id) = doc_with_prompt();
        let prompt = doc.prompt(&id).unwrap();

        assert_eq!(prompt.current_version, 1);
        assert_eq!(prompt.usage_count, 0);
        assert_eq!(prompt.last_copied_at, None);
        assert_eq!(prompt.versions.len(), 1);
        assert_eq!(prompt.versions[0].version, 1);
        assert_eq!(prompt.versions[0].name, "Greeting");
        assert_eq!(prompt.versions[0].timestamp, 1_000);
    }

    #[test]
    fn add_appends_after_existing_members() {
        let mut doc = Document {
            folders: vec![folder("f", None, 0)],
            prompts: vec![],
        };

        let p1 = add_prompt(&mut doc, "one", "", None, 0).unwrap();
        let p2 = add_prompt(&mut doc, "two", "", None, 0).unwrap();
        let inner = add_prompt(&mut doc, "inner", "", Some("f"), 0).unwrap();

        assert_eq!(p1.order, 1);
        assert_eq!(p2.order, 2);
        assert_eq!(inner.order, 0);
        assert_eq!(inner.folder_id.as_deref(), Some("f"));
    }

    #[test]
    fn add_into_unknown_folder_fails() {
        let mut doc = Document::default();
        assert!(add_prompt(&mut doc, "x", "y", Some("gone"), 0).is_err());
        assert!(doc.prompts.is_empty());
    }

    #[test]
    fn update_appends_full_snapshot() {
        let (mut doc, id) = doc_with_prompt();

        let update = PromptUpdate {
            name: None,
            text: Some("Hello there".to_string()),
        };
        let updated = update_prompt(&mut doc, &id, &update, 2_000).unwrap();

        assert_eq!(updated.current_version, 2);
        assert_eq!(updated.versions.len(), 2);
        let last = updated.versions.last().unwrap();
        assert_eq!(last.version, 2);
        assert_eq!(last.name, "Greeting");
        assert_eq!(last.text, "Hello there");
        assert_eq!(last.timestamp, 2_000);
        assert_eq!(doc.prompt(&id).unwrap().text, "Hello there");
    }

    #[test]
    fn update_keeps_current_version_in_step_with_history() {
        let (mut doc, id) = doc_with_prompt();

        for n in 0..3 {
            let update = PromptUpdate {
                name: Some(format!("v{n}")),
                text: None,
            };
            update_prompt(&mut doc, &id, &update, n).unwrap();
        }

        let prompt = doc.prompt(&id).unwrap();
        assert_eq!(prompt.current_version, 4);
        assert_eq!(
            prompt.versions.iter().map(|v| v.version).collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
        assert_eq!(prompt.versions.last().unwrap().version, prompt.current_version);
    }

    #[test]
    fn update_unknown_prompt_fails() {
        let mut doc = Document::default();
        let err = update_prompt(&mut doc, "nope", &PromptUpdate::default(), 0).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn restore_overwrites_live_fields_only() {
        let (mut doc, id) = doc_with_prompt();
        let first_version = doc.prompt(&id).unwrap().versions[0].id.clone();

        let update = PromptUpdate {
            name: Some("Farewell".to_string()),
            text: Some("Bye".to_string()),
        };
        update_prompt(&mut doc, &id, &update, 2_000).unwrap();

        let restored = restore_version(&mut doc, &id, &first_version).unwrap();

        assert_eq!(restored.name, "Greeting");
        assert_eq!(restored.text, "Hello");
        assert_eq!(restored.current_version, 2);
        assert_eq!(restored.versions.len(), 2);
    }

    #[test]
    fn restore_unknown_version_fails_without_mutation() {
        let (mut doc, id) = doc_with_prompt();
        let before = doc.clone();

        let err = restore_version(&mut doc, &id, "missing").unwrap_err();

        assert!(matches!(err, StoreError::VersionNotFound { .. }));
        assert_eq!(doc, before);
    }

    #[test]
    fn history_lists_entries() {
        let (mut doc, id) = doc_with_prompt();
        update_prompt(&mut doc, &id, &PromptUpdate::default(), 5).unwrap();

        let entries = history(&doc, &id).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(history(&doc, "nope").is_err());
    }

    #[test]
    fn update_request_accepts_partial_json() {
        let update: PromptUpdate = serde_json::from_str(r#"{"text": "only text"}"#).unwrap();
        assert!(update.name.is_none());
        assert_eq!(update.text.as_deref(), Some("only text"));
    }
}
