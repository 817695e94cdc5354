//! `PromptStore` - the repository every interface talks to.
//!
//! The store owns the full document in memory behind a single mutex. A
//! mutation holds the lock for its whole cycle:
//!
//! 1. clone the current document into a draft,
//! 2. apply the operation to the draft,
//! 3. write the draft to disk (write-then-rename),
//! 4. publish the draft as the new in-memory document.
//!
//! If any step fails the lock is released with both the in-memory and the
//! on-disk document unchanged. Holding the lock across the save linearizes
//! concurrent callers, so no update is lost to an interleaved load/save.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use crate::error::StoreError;
use crate::folders;
use crate::model::{Document, Folder, ItemKind, Prompt, VersionEntry};
use crate::moves;
use crate::order::{self, Direction};
use crate::persistence::{load_document, save_document};
use crate::query;
use crate::usage::{self, CopyOutcome};
use crate::versions::{self, PromptUpdate};

/// Current time in milliseconds since the epoch.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

pub struct PromptStore {
    path: PathBuf,
    document: Mutex<Document>,
}

impl PromptStore {
    /// Open the store backed by `path`. A missing file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let document = Self::load(&path)?;

        Ok(Self {
            path,
            document: Mutex::new(document),
        })
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the backing file, replacing the in-memory document.
    pub fn reload(&self) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        *guard = Self::load(&self.path)?;
        Ok(())
    }

    /// A copy of the full document.
    pub fn document(&self) -> Result<Document, StoreError> {
        Ok(self.lock()?.clone())
    }

    // ========================================================================
    // Prompts
    // ========================================================================

    pub fn create_prompt(
        &self,
        name: &str,
        text: &str,
        folder_id: Option<&str>,
    ) -> Result<Prompt, StoreError> {
        let now = now_millis();
        let prompt = self.mutate(|doc| versions::add_prompt(doc, name, text, folder_id, now))?;
        log::debug!("Created prompt {}", prompt.id);
        Ok(prompt)
    }

    pub fn update_prompt(&self, prompt_id: &str, update: &PromptUpdate) -> Result<Prompt, StoreError> {
        let now = now_millis();
        self.mutate(|doc| versions::update_prompt(doc, prompt_id, update, now))
    }

    pub fn delete_prompt(&self, prompt_id: &str) -> Result<(), StoreError> {
        self.mutate(|doc| moves::delete_prompt(doc, prompt_id))?;
        log::debug!("Deleted prompt {prompt_id}");
        Ok(())
    }

    /// Count a copy of the prompt, subject to the cooldown.
    pub fn copy_prompt(&self, prompt_id: &str) -> Result<CopyOutcome, StoreError> {
        self.copy_prompt_at(prompt_id, now_millis())
    }

    /// [`PromptStore::copy_prompt`] with an explicit clock reading.
    pub fn copy_prompt_at(&self, prompt_id: &str, now: i64) -> Result<CopyOutcome, StoreError> {
        let outcome = self.mutate(|doc| usage::record_copy(doc, prompt_id, now))?;
        log::debug!("Copy of prompt {prompt_id}: {outcome:?}");
        Ok(outcome)
    }

    pub fn restore_prompt_version(
        &self,
        prompt_id: &str,
        version_id: &str,
    ) -> Result<Prompt, StoreError> {
        self.mutate(|doc| versions::restore_version(doc, prompt_id, version_id))
    }

    pub fn prompt_history(&self, prompt_id: &str) -> Result<Vec<VersionEntry>, StoreError> {
        let guard = self.lock()?;
        Ok(versions::history(&guard, prompt_id)?.to_vec())
    }

    /// Move a prompt to the end of a folder (root when `None`).
    pub fn move_prompt_to_folder(
        &self,
        prompt_id: &str,
        folder_id: Option<&str>,
    ) -> Result<(), StoreError> {
        self.move_item(ItemKind::Prompt, prompt_id, folder_id, None)
    }

    pub fn search(&self, needle: &str) -> Result<Vec<Prompt>, StoreError> {
        let guard = self.lock()?;
        Ok(query::search(&guard, needle).into_iter().cloned().collect())
    }

    pub fn most_used(&self, limit: Option<usize>) -> Result<Vec<Prompt>, StoreError> {
        let guard = self.lock()?;
        Ok(query::most_used(&guard, limit).into_iter().cloned().collect())
    }

    // ========================================================================
    // Folders
    // ========================================================================

    pub fn create_folder(&self, name: &str, parent_id: Option<&str>) -> Result<Folder, StoreError> {
        let folder = self.mutate(|doc| folders::create_folder(doc, name, parent_id))?;
        log::debug!("Created folder {}", folder.id);
        Ok(folder)
    }

    pub fn rename_folder(&self, folder_id: &str, name: &str) -> Result<Folder, StoreError> {
        self.mutate(|doc| folders::rename_folder(doc, folder_id, name))
    }

    /// Delete a folder; its contents move up to its parent.
    pub fn delete_folder(&self, folder_id: &str) -> Result<(), StoreError> {
        self.mutate(|doc| moves::delete_folder(doc, folder_id))
    }

    /// Set `expanded`, or flip it when `None`. Returns the new value.
    pub fn set_folder_expanded(
        &self,
        folder_id: &str,
        expanded: Option<bool>,
    ) -> Result<bool, StoreError> {
        self.mutate(|doc| folders::set_folder_expanded(doc, folder_id, expanded))
    }

    pub fn set_folder_parent(
        &self,
        folder_id: &str,
        parent_id: Option<&str>,
    ) -> Result<(), StoreError> {
        self.mutate(|doc| moves::set_folder_parent(doc, folder_id, parent_id))
    }

    /// Swap a folder with its neighbouring sibling folder.
    ///
    /// Returns `false` if there was no neighbour in that direction.
    pub fn move_folder(&self, folder_id: &str, direction: Direction) -> Result<bool, StoreError> {
        self.mutate(|doc| order::swap_adjacent(doc, folder_id, direction))
    }

    pub fn reorder_folders(
        &self,
        parent_id: Option<&str>,
        folder_ids: &[String],
    ) -> Result<(), StoreError> {
        self.mutate(|doc| order::reorder_folders(doc, parent_id, folder_ids))
    }

    // ========================================================================
    // Generic move
    // ========================================================================

    pub fn move_item(
        &self,
        kind: ItemKind,
        item_id: &str,
        target: Option<&str>,
        position: Option<usize>,
    ) -> Result<(), StoreError> {
        self.mutate(|doc| moves::move_item(doc, kind, item_id, target, position))
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn load(path: &Path) -> Result<Document, StoreError> {
        let loaded = load_document(path, now_millis())?;

        if loaded.migrated {
            log::info!("Backfilled missing fields in {}", path.display());
        }
        log::info!(
            "Loaded {} prompts and {} folders from {}",
            loaded.document.prompts.len(),
            loaded.document.folders.len(),
            path.display()
        );

        Ok(loaded.document)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Document>, StoreError> {
        self.document.lock().map_err(|_| StoreError::LockPoisoned)
    }

    fn mutate<T>(
        &self,
        op: impl FnOnce(&mut Document) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self.lock()?;

        let mut draft = guard.clone();
        let result = op(&mut draft)?;
        save_document(&self.path, &draft)?;
        *guard = draft;

        Ok(result)
    }
}

// ============================================================================
// TESTS
// ============================================================================
