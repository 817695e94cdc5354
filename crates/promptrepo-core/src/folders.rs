//! Folder lifecycle: creation, renaming, expand/collapse.
//!
//! Reparenting and deletion live in [`crate::moves`].

use uuid::Uuid;

use crate::error::StoreError;
use crate::model::{Document, Folder};
use crate::order::next_order;

/// Create a folder at the end of `parent` (root when `None`).
pub fn create_folder(
    doc: &mut Document,
    name: &str,
    parent: Option<&str>,
) -> Result<Folder, StoreError> {
    doc.require_container(parent)?;

    let folder = Folder {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        parent_id: parent.map(str::to_string),
        order: next_order(doc, parent),
        expanded: true,
    };
    doc.folders.push(folder.clone());

    Ok(folder)
}

/// Rename a folder.
pub fn rename_folder(doc: &mut Document, folder_id: &str, name: &str) -> Result<Folder, StoreError> {
    let folder = doc
        .folder_mut(folder_id)
        .ok_or_else(|| StoreError::folder_not_found(folder_id))?;
    folder.name = name.to_string();
    Ok(folder.clone())
}

/// Set the `expanded` flag, or flip it when `expanded` is `None`.
///
/// Returns the new value.
pub fn set_folder_expanded(
    doc: &mut Document,
    folder_id: &str,
    expanded: Option<bool>,
) -> Result<bool, StoreError> {
    let folder = doc
        .folder_mut(folder_id)
        .ok_or_else(|| StoreError::folder_not_found(folder_id))?;
    folder.expanded = expanded.unwrap_or(!folder.expanded);
    Ok(folder.expanded)
}
