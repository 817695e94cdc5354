//! Whole-document persistence.
//!
//! # File Format
//!
//! A single pretty-printed JSON file holding every folder and prompt:
//!
//! ```json
//! { "prompts": [ ... ], "folders": [ ... ] }
//! ```
//!
//! # Atomic Writes
//!
//! Saves write `<file>.tmp` first and rename it over `<file>`, so an
//! interrupted save never leaves a half-written document behind.
//!
//! # Recovery
//!
//! A file that is not valid UTF-8 JSON, or does not have the document shape, loads
//! as an empty document. The unreadable file is first copied to
//! `<file>.corrupt` so the next save cannot destroy it.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::StoreError;
use crate::migrate::backfill;
use crate::model::Document;
use crate::order::compact_all;

/// Result of reading a document from disk.
#[derive(Debug, Clone, Default)]
pub struct Loaded {
    pub document: Document,
    /// Backfill added at least one missing field.
    pub migrated: bool,
    /// The file was unreadable and an empty document was substituted.
    pub recovered: bool,
}

impl Loaded {
    fn recovered() -> Self {
        Self {
            document: Document::default(),
            migrated: false,
            recovered: true,
        }
    }
}

/// Save the document to `path`, creating parent directories as needed.
pub fn save_document(path: &Path, doc: &Document) -> Result<(), StoreError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }

    let temp_path = sibling_path(path, ".tmp");

    let json = serde_json::to_string_pretty(doc)?;
    fs::write(&temp_path, json)?;
    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Load the document from `path`.
///
/// A missing file is an empty document. `now` stamps any history entries
/// the backfill has to synthesize.
pub fn load_document(path: &Path, now: i64) -> Result<Loaded, StoreError> {
    if !path.exists() {
        return Ok(Loaded::default());
    }

    let contents = fs::read(path)?;
    let loaded = parse_document(&contents, now);

    if loaded.recovered {
        let backup = sibling_path(path, ".corrupt");
        match fs::copy(path, &backup) {
            Ok(_) => log::warn!("Kept unreadable data file as {}", backup.display()),
            Err(e) => log::warn!("Could not back up unreadable data file: {e}"),
        }
    }

    Ok(loaded)
}

/// Parse and backfill a document from the raw file contents.
///
/// Containers whose orders are not `0..n` after backfill are renumbered.
pub fn parse_document(contents: impl AsRef<[u8]>, now: i64) -> Loaded {
    let mut value: Value = match serde_json::from_slice(contents.as_ref()) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Data file is not valid JSON, starting empty: {e}");
            return Loaded::recovered();
        }
    };

    let backfilled = backfill(&mut value, now);

    match serde_json::from_value::<Document>(value) {
        Ok(mut document) => {
            let compacted = compact_all(&mut document);
            Loaded {
                document,
                migrated: backfilled || compacted,
                recovered: false,
            }
        }
        Err(e) => {
            log::warn!("Data file has an unexpected shape, starting empty: {e}");
            Loaded::recovered()
        }
    }
}

fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("prompts.json"));
    name.push(suffix);
    path.with_file_name(name)
}

// ============================================================================
// TESTS
// ============================================================================
