//! Cycle guard for folder reparenting.

use std::collections::HashSet;

use crate::model::Document;

/// Whether making `candidate_parent` the parent of `folder_id` would put the
/// folder inside its own subtree.
///
/// The ancestor chain of the candidate is walked iteratively. A folder seen
/// twice means the stored data already contains a loop that does not pass
/// through `folder_id`; the walk stops there and reports no new cycle. A
/// dangling `parentId` ends the chain like the root does.
pub fn would_create_cycle(
    doc: &Document,
    folder_id: &str,
    candidate_parent: Option<&str>,
) -> bool {
    let Some(candidate) = candidate_parent else {
        return false;
    };
    if candidate == folder_id {
        return true;
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut current = Some(candidate);

    while let Some(id) = current {
        if id == folder_id {
            return true;
        }
        if !visited.insert(id) {
            log::warn!("Folder ancestry loops back to {id}; stored tree is corrupt");
            return false;
        }
        current = doc.folder(id).and_then(|f| f.parent_id.as_deref());
    }

    false
}
