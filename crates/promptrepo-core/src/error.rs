//! Error taxonomy for store operations.
//!
//! Every variant except `Io`, `Json` and `LockPoisoned` is raised during
//! validation, before the document is touched.

use thiserror::Error;

use crate::model::ItemKind;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: ItemKind, id: String },

    #[error("Version {version_id} not found for prompt {prompt_id}")]
    VersionNotFound {
        prompt_id: String,
        version_id: String,
    },

    #[error("Moving folder {folder_id} under {parent_id} would create a cycle")]
    CycleDetected { folder_id: String, parent_id: String },

    #[error("Invalid reorder request: {0}")]
    InvalidReorder(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    pub fn folder_not_found(id: impl Into<String>) -> Self {
        StoreError::NotFound {
            kind: ItemKind::Folder,
            id: id.into(),
        }
    }

    pub fn prompt_not_found(id: impl Into<String>) -> Self {
        StoreError::NotFound {
            kind: ItemKind::Prompt,
            id: id.into(),
        }
    }
}
