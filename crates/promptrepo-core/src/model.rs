//! Persisted data types.
//!
//! # Data Model Overview
//!
//! The whole library lives in one JSON document:
//!
//! ```text
//! {
//!   "prompts": [ { id, name, text, folderId, order, currentVersion,
//!                  versions: [...], usageCount, lastCopiedAt }, ... ],
//!   "folders": [ { id, name, parentId, order, expanded }, ... ]
//! }
//! ```
//!
//! Folders and prompts that share a parent (a folder id, or the root when the
//! pointer is `null`) form one *container*. Members of a container share a
//! single `order` sequence regardless of their kind.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

// ============================================================================
// Item Kind
// ============================================================================

/// The two kinds of container members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Folder,
    Prompt,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Folder => write!(f, "Folder"),
            ItemKind::Prompt => write!(f, "Prompt"),
        }
    }
}

// ============================================================================
// Entities
// ============================================================================

/// A folder in the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// Unique folder identifier.
    pub id: String,

    /// User-visible folder name.
    pub name: String,

    /// Containing folder, `None` for the root.
    #[serde(default)]
    pub parent_id: Option<String>,

    /// Rank within the containing folder.
    pub order: i64,

    /// Whether the folder is shown open in the sidebar.
    #[serde(default)]
    pub expanded: bool,
}

/// A stored prompt with its edit history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    /// Unique prompt identifier.
    pub id: String,

    /// User-visible prompt name.
    pub name: String,

    /// Prompt body.
    pub text: String,

    /// Containing folder, `None` for the root.
    #[serde(default)]
    pub folder_id: Option<String>,

    /// Rank within the containing folder.
    pub order: i64,

    /// Version number of the last history entry.
    pub current_version: u32,

    /// Append-only edit history, oldest first.
    pub versions: Vec<VersionEntry>,

    /// How many times the prompt was copied, throttled by the cooldown.
    pub usage_count: u64,

    /// Last counted copy, in milliseconds since the epoch.
    #[serde(default)]
    pub last_copied_at: Option<i64>,
}

/// An immutable snapshot of a prompt's name and text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionEntry {
    pub id: String,
    pub name: String,
    pub text: String,
    /// Milliseconds since the epoch.
    pub timestamp: i64,
    /// 1-based position in the history.
    pub version: u32,
}

/// The full persisted document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub prompts: Vec<Prompt>,

    #[serde(default)]
    pub folders: Vec<Folder>,
}

// ============================================================================
// Document Lookups
// ============================================================================

impl Document {
    /// Find a folder by ID.
    pub fn folder(&self, id: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    /// Find a folder by ID for mutation.
    pub fn folder_mut(&mut self, id: &str) -> Option<&mut Folder> {
        self.folders.iter_mut().find(|f| f.id == id)
    }

    /// Find a prompt by ID.
    pub fn prompt(&self, id: &str) -> Option<&Prompt> {
        self.prompts.iter().find(|p| p.id == id)
    }

    /// Find a prompt by ID for mutation.
    pub fn prompt_mut(&mut self, id: &str) -> Option<&mut Prompt> {
        self.prompts.iter_mut().find(|p| p.id == id)
    }

    /// Like [`Document::folder`], but unknown IDs are an error.
    pub fn require_folder(&self, id: &str) -> Result<&Folder, StoreError> {
        self.folder(id)
            .ok_or_else(|| StoreError::folder_not_found(id))
    }

    /// Like [`Document::prompt`], but unknown IDs are an error.
    pub fn require_prompt(&self, id: &str) -> Result<&Prompt, StoreError> {
        self.prompt(id)
            .ok_or_else(|| StoreError::prompt_not_found(id))
    }

    /// Check that a container key names the root or an existing folder.
    pub fn require_container(&self, container: Option<&str>) -> Result<(), StoreError> {
        match container {
            None => Ok(()),
            Some(id) => self.require_folder(id).map(|_| ()),
        }
    }

    /// Whether an item of the given kind exists.
    pub fn contains(&self, kind: ItemKind, id: &str) -> bool {
        match kind {
            ItemKind::Folder => self.folder(id).is_some(),
            ItemKind::Prompt => self.prompt(id).is_some(),
        }
    }

    /// The container an item currently lives in.
    pub fn container_of(&self, kind: ItemKind, id: &str) -> Option<Option<&str>> {
        match kind {
            ItemKind::Folder => self.folder(id).map(|f| f.parent_id.as_deref()),
            ItemKind::Prompt => self.prompt(id).map(|p| p.folder_id.as_deref()),
        }
    }

    /// Overwrite the `order` of one item. Unknown items are ignored.
    pub fn set_order(&mut self, kind: ItemKind, id: &str, order: i64) {
        match kind {
            ItemKind::Folder => {
                if let Some(folder) = self.folder_mut(id) {
                    folder.order = order;
                }
            }
            ItemKind::Prompt => {
                if let Some(prompt) = self.prompt_mut(id) {
                    prompt.order = order;
                }
            }
        }
    }

    /// Point an item at a new container. Unknown items are ignored.
    pub fn set_container(&mut self, kind: ItemKind, id: &str, container: Option<&str>) {
        let container = container.map(str::to_string);
        match kind {
            ItemKind::Folder => {
                if let Some(folder) = self.folder_mut(id) {
                    folder.parent_id = container;
                }
            }
            ItemKind::Prompt => {
                if let Some(prompt) = self.prompt_mut(id) {
                    prompt.folder_id = container;
                }
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
