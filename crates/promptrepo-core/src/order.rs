//! Order assignment within a container.
//!
//! Folders and prompts of one container share a single dense sequence
//! `0..n`. Two ways of changing it coexist:
//!
//! - [`reposition`] places one member at an index and renumbers the whole
//!   container. Drag-style moves use this, within or across containers.
//! - [`swap_adjacent`] exchanges the orders of a folder and its neighbouring
//!   sibling folder and touches nothing else. Used for single-step nudges.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::model::{Document, ItemKind};
use crate::tree::{self, sort_members, Member};

/// Direction of a single-step nudge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// Compute the new order sequence after placing one member at `position`.
///
/// The member is removed from `current` if present, inserted at
/// `position` (clamped, `None` meaning the end), and every entry is
/// renumbered by index. Applying the result and planning again with the
/// same arguments yields the same sequence.
pub fn plan_reposition(
    current: &[Member],
    kind: ItemKind,
    id: &str,
    position: Option<usize>,
) -> Vec<Member> {
    let mut list = current.to_vec();
    sort_members(&mut list);

    let target = match list.iter().position(|m| m.is(kind, id)) {
        Some(index) => list.remove(index),
        None => Member::new(kind, id, 0),
    };

    let index = position.unwrap_or(list.len()).min(list.len());
    list.insert(index, target);

    for (index, member) in list.iter_mut().enumerate() {
        member.order = index as i64;
    }
    list
}

/// Place an item at `position` within `container` and renumber the container.
///
/// The item's container pointer must already name `container`.
pub fn reposition(
    doc: &mut Document,
    container: Option<&str>,
    kind: ItemKind,
    id: &str,
    position: Option<usize>,
) {
    let plan = plan_reposition(&tree::members(doc, container), kind, id, position);
    apply(doc, &plan);
}

/// Renumber a container `0..n`, keeping its current relative order.
pub fn compact(doc: &mut Document, container: Option<&str>) {
    let mut members = tree::members(doc, container);
    for (index, member) in members.iter_mut().enumerate() {
        member.order = index as i64;
    }
    apply(doc, &members);
}

/// Renumber every container. Returns `true` if any order changed.
pub fn compact_all(doc: &mut Document) -> bool {
    let keys: Vec<Option<String>> = tree::containers(doc)
        .into_iter()
        .map(|c| c.map(str::to_string))
        .collect();

    let mut changed = false;
    for key in &keys {
        if !tree::is_dense(doc, key.as_deref()) {
            compact(doc, key.as_deref());
            changed = true;
        }
    }
    changed
}

/// Order value for a new member appended to `container`.
pub fn next_order(doc: &Document, container: Option<&str>) -> i64 {
    tree::members(doc, container)
        .iter()
        .map(|m| m.order)
        .max()
        .map_or(0, |max| max + 1)
}

/// Swap a folder with its neighbouring sibling folder.
///
/// Only folders of the same parent take part; prompts in between are skipped
/// over and keep their orders. Returns `false` when the folder is already
/// first (for `Up`) or last (for `Down`).
pub fn swap_adjacent(
    doc: &mut Document,
    folder_id: &str,
    direction: Direction,
) -> Result<bool, StoreError> {
    let parent = doc.require_folder(folder_id)?.parent_id.clone();

    let mut siblings: Vec<Member> = tree::child_folders(doc, parent.as_deref())
        .into_iter()
        .map(|f| Member::new(ItemKind::Folder, f.id.clone(), f.order))
        .collect();
    sort_members(&mut siblings);

    let Some(index) = siblings.iter().position(|m| m.id == folder_id) else {
        return Err(StoreError::folder_not_found(folder_id));
    };

    let neighbor = match direction {
        Direction::Up => index.checked_sub(1),
        Direction::Down => Some(index + 1).filter(|i| *i < siblings.len()),
    };
    let Some(neighbor) = neighbor else {
        return Ok(false);
    };

    let current = &siblings[index];
    let other = &siblings[neighbor];
    doc.set_order(ItemKind::Folder, &current.id, other.order);
    doc.set_order(ItemKind::Folder, &other.id, current.order);

    Ok(true)
}

/// Rearrange the folders of one container.
///
/// `ordered_ids` must name every folder of `container` exactly once. The
/// folders are dealt back into the slots they already occupy, so prompts of
/// the container keep their positions.
pub fn reorder_folders(
    doc: &mut Document,
    container: Option<&str>,
    ordered_ids: &[String],
) -> Result<(), StoreError> {
    doc.require_container(container)?;

    let mut seen = HashSet::new();
    for id in ordered_ids {
        let folder = doc.require_folder(id)?;
        if folder.parent_id.as_deref() != container {
            return Err(StoreError::InvalidReorder(format!(
                "folder {id} is not in the reordered container"
            )));
        }
        if !seen.insert(id.as_str()) {
            return Err(StoreError::InvalidReorder(format!(
                "folder {id} listed more than once"
            )));
        }
    }

    let slots: Vec<i64> = tree::members(doc, container)
        .into_iter()
        .filter(|m| m.kind == ItemKind::Folder)
        .map(|m| m.order)
        .collect();

    if slots.len() != ordered_ids.len() {
        return Err(StoreError::InvalidReorder(format!(
            "expected {} folders, got {}",
            slots.len(),
            ordered_ids.len()
        )));
    }

    for (id, slot) in ordered_ids.iter().zip(slots) {
        doc.set_order(ItemKind::Folder, id, slot);
    }
    compact(doc, container);

    Ok(())
}

fn apply(doc: &mut Document, plan: &[Member]) {
    for member in plan {
        doc.set_order(member.kind, &member.id, member.order);
    }
}

// ============================================================================
// TESTS
// ============================================================================
