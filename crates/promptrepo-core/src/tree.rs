//! Derived tree lookups.
//!
//! Nothing here is stored: parent/child relations are recomputed from the
//! `parentId` and `folderId` pointers every time they are needed.

use crate::model::{Document, Folder, ItemKind, Prompt};

/// One entry of a container's unified order sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub kind: ItemKind,
    pub id: String,
    pub order: i64,
}

impl Member {
    pub fn new(kind: ItemKind, id: impl Into<String>, order: i64) -> Self {
        Self {
            kind,
            id: id.into(),
            order,
        }
    }

    /// Whether this entry refers to the given item.
    pub fn is(&self, kind: ItemKind, id: &str) -> bool {
        self.kind == kind && self.id == id
    }
}

/// Sort members by order, breaking ties by id and then kind.
pub fn sort_members(members: &mut [Member]) {
    members.sort_by(|a, b| {
        a.order
            .cmp(&b.order)
            .then_with(|| a.id.cmp(&b.id))
            .then_with(|| a.kind.cmp(&b.kind))
    });
}

/// Folders whose parent is `container`, in document order.
pub fn child_folders<'a>(doc: &'a Document, container: Option<&str>) -> Vec<&'a Folder> {
    doc.folders
        .iter()
        .filter(|f| f.parent_id.as_deref() == container)
        .collect()
}

/// Prompts stored directly in `container`, in document order.
pub fn prompts_in<'a>(doc: &'a Document, container: Option<&str>) -> Vec<&'a Prompt> {
    doc.prompts
        .iter()
        .filter(|p| p.folder_id.as_deref() == container)
        .collect()
}

/// Folders and prompts of `container`, sorted by their shared order.
pub fn members(doc: &Document, container: Option<&str>) -> Vec<Member> {
    let mut members: Vec<Member> = child_folders(doc, container)
        .into_iter()
        .map(|f| Member::new(ItemKind::Folder, f.id.clone(), f.order))
        .chain(
            prompts_in(doc, container)
                .into_iter()
                .map(|p| Member::new(ItemKind::Prompt, p.id.clone(), p.order)),
        )
        .collect();

    sort_members(&mut members);
    members
}

/// Check that a container's orders are exactly `0..n`.
pub fn is_dense(doc: &Document, container: Option<&str>) -> bool {
    members(doc, container)
        .iter()
        .enumerate()
        .all(|(index, member)| member.order == index as i64)
}

/// Every container key in use: the root plus each folder.
pub fn containers(doc: &Document) -> Vec<Option<&str>> {
    std::iter::once(None)
        .chain(doc.folders.iter().map(|f| Some(f.id.as_str())))
        .collect()
}
