//! Load-time backfill of fields added after a document was first written.
//!
//! Runs on the raw JSON value before it is deserialized, so records written
//! by older versions (no history, no order, no usage counter) load cleanly.
//! Fields that are already present are never touched, which makes the pass
//! idempotent. An empty `versions` array counts as missing.

use serde_json::{json, Map, Value};

use crate::versions::snapshot;

/// Fill in missing fields. Returns `true` if anything was added.
pub fn backfill(doc: &mut Value, now: i64) -> bool {
    let Some(root) = doc.as_object_mut() else {
        return false;
    };

    let mut changed = false;
    for key in ["prompts", "folders"] {
        if !root.get(key).is_some_and(Value::is_array) {
            root.insert(key.to_string(), json!([]));
            changed = true;
        }
    }

    if let Some(Value::Array(prompts)) = root.get_mut("prompts") {
        for (index, prompt) in prompts.iter_mut().enumerate() {
            if let Some(prompt) = prompt.as_object_mut() {
                changed |= backfill_prompt(prompt, index, now);
            }
        }
    }

    if let Some(Value::Array(folders)) = root.get_mut("folders") {
        for (index, folder) in folders.iter_mut().enumerate() {
            if let Some(folder) = folder.as_object_mut() {
                changed |= backfill_folder(folder, index);
            }
        }
    }

    changed
}

fn backfill_prompt(prompt: &mut Map<String, Value>, index: usize, now: i64) -> bool {
    let mut changed = false;

    let has_history = prompt
        .get("versions")
        .and_then(Value::as_array)
        .is_some_and(|versions| !versions.is_empty());

    if !has_history {
        let name = prompt.get("name").and_then(Value::as_str).unwrap_or_default();
        let text = prompt.get("text").and_then(Value::as_str).unwrap_or_default();
        let entry = snapshot(name, text, now, 1);
        prompt.insert("versions".to_string(), json!([entry]));
        prompt.insert("currentVersion".to_string(), json!(1));
        changed = true;
    }

    if !prompt.contains_key("currentVersion") {
        let last = prompt
            .get("versions")
            .and_then(Value::as_array)
            .and_then(|versions| versions.last())
            .and_then(|entry| entry.get("version"))
            .and_then(Value::as_u64)
            .unwrap_or(1);
        prompt.insert("currentVersion".to_string(), json!(last));
        changed = true;
    }

    changed |= insert_missing(prompt, "usageCount", json!(0));
    changed |= insert_missing(prompt, "order", json!(index));
    changed |= insert_missing(prompt, "folderId", Value::Null);
    changed |= insert_missing(prompt, "lastCopiedAt", Value::Null);

    changed
}

fn backfill_folder(folder: &mut Map<String, Value>, index: usize) -> bool {
    let mut changed = false;

    changed |= insert_missing(folder, "order", json!(index));
    changed |= insert_missing(folder, "parentId", Value::Null);
    changed |= insert_missing(folder, "expanded", json!(false));

    changed
}

fn insert_missing(record: &mut Map<String, Value>, key: &str, value: Value) -> bool {
    if record.contains_key(key) {
        return false;
    }
    record.insert(key.to_string(), value);
    true
}
