//! Moving items between and within containers.
//!
//! Every public function here validates completely before it changes the
//! document, so an `Err` always means the document is untouched.

use crate::cycle::would_create_cycle;
use crate::error::StoreError;
use crate::model::{Document, ItemKind};
use crate::order;
use crate::tree;

/// Move a folder or prompt into `target` at `position`.
///
/// `target` is a folder id or `None` for the root. `position` is clamped to
/// the container size; `None` appends. Reordering inside the current
/// container goes through the same path as moving to another one.
pub fn move_item(
    doc: &mut Document,
    kind: ItemKind,
    id: &str,
    target: Option<&str>,
    position: Option<usize>,
) -> Result<(), StoreError> {
    if !doc.contains(kind, id) {
        return Err(StoreError::NotFound {
            kind,
            id: id.to_string(),
        });
    }
    doc.require_container(target)?;

    if kind == ItemKind::Folder && would_create_cycle(doc, id, target) {
        return Err(StoreError::CycleDetected {
            folder_id: id.to_string(),
            parent_id: target.unwrap_or_default().to_string(),
        });
    }

    relocate(doc, kind, id, target, position);
    log::debug!("Moved {kind} {id} to {target:?} at {position:?}");
    Ok(())
}

/// Reparent a folder, appending it to the end of its new container.
pub fn set_folder_parent(
    doc: &mut Document,
    folder_id: &str,
    parent: Option<&str>,
) -> Result<(), StoreError> {
    move_item(doc, ItemKind::Folder, folder_id, parent, None)
}

/// Delete a folder, splicing its contents into its parent.
///
/// Child folders and prompts keep their relative order and are appended to
/// the end of the parent container. Nothing but the folder itself is removed.
pub fn delete_folder(doc: &mut Document, folder_id: &str) -> Result<(), StoreError> {
    let parent = doc.require_folder(folder_id)?.parent_id.clone();
    let children = tree::members(doc, Some(folder_id));

    doc.folders.retain(|f| f.id != folder_id);

    for child in &children {
        relocate(doc, child.kind, &child.id, parent.as_deref(), None);
    }
    order::compact(doc, parent.as_deref());

    log::debug!(
        "Deleted folder {folder_id}, moved {} children to {parent:?}",
        children.len()
    );
    Ok(())
}

/// Delete a prompt and close the gap it leaves.
pub fn delete_prompt(doc: &mut Document, prompt_id: &str) -> Result<(), StoreError> {
    let container = doc.require_prompt(prompt_id)?.folder_id.clone();

    doc.prompts.retain(|p| p.id != prompt_id);
    order::compact(doc, container.as_deref());

    Ok(())
}

/// Point an item at `target`, place it, and renumber the container it left.
fn relocate(
    doc: &mut Document,
    kind: ItemKind,
    id: &str,
    target: Option<&str>,
    position: Option<usize>,
) {
    let source = doc
        .container_of(kind, id)
        .map(|container| container.map(str::to_string));

    doc.set_container(kind, id, target);
    order::reposition(doc, target, kind, id, position);

    if let Some(source) = source {
        if source.as_deref() != target {
            order::compact(doc, source.as_deref());
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{assert_all_dense, folder, order_of, prompt};

    fn ids_in(doc: &Document, container: Option<&str>) -> Vec<String> {
        tree::members(doc, container)
            .into_iter()
            .map(|m| m.id)
            .collect()
    }

    mod move_item {
        use super::*;

        #[test]
        fn folder_into_sibling_at_front() {
            let mut doc = Document {
                folders: vec![folder("f1", None, 0), folder("f2", None, 1)],
                prompts: vec![],
            };

            move_item(&mut doc, ItemKind::Folder, "f1", Some("f2"), Some(0)).unwrap();

            let f1 = doc.folder("f1").unwrap();
            assert_eq!(f1.parent_id.as_deref(), Some("f2"));
            assert_eq!(f1.order, 0);
            assert_eq!(order_of(&doc, ItemKind::Folder, "f2"), 0);
            assert_eq!(ids_in(&doc, None), vec!["f2"]);
            assert_all_dense(&doc);
        }

        #[test]
        fn prompt_reorder_within_root() {
            let mut doc = Document {
                folders: vec![],
                prompts: vec![prompt("p1", None, 0), prompt("p2", None, 1)],
            };

            move_item(&mut doc, ItemKind::Prompt, "p1", None, Some(1)).unwrap();

            assert_eq!(order_of(&doc, ItemKind::Prompt, "p2"), 0);
            assert_eq!(order_of(&doc, ItemKind::Prompt, "p1"), 1);
        }

        #[test]
        fn prompt_can_land_between_folders() {
            let mut doc = Document {
                folders: vec![folder("a", None, 0), folder("b", None, 1), folder("inbox", None, 2)],
                prompts: vec![prompt("p", Some("inbox"), 0)],
            };

            move_item(&mut doc, ItemKind::Prompt, "p", None, Some(1)).unwrap();

            assert_eq!(ids_in(&doc, None), vec!["a", "p", "b", "inbox"]);
            assert!(ids_in(&doc, Some("inbox")).is_empty());
            assert_all_dense(&doc);
        }

        #[test]
        fn source_container_is_compacted() {
            let mut doc = Document {
                folders: vec![folder("dest", None, 0)],
                prompts: vec![
                    prompt("p0", None, 1),
                    prompt("p1", None, 2),
                    prompt("p2", None, 3),
                ],
            };

            move_item(&mut doc, ItemKind::Prompt, "p1", Some("dest"), None).unwrap();

            assert_eq!(ids_in(&doc, None), vec!["dest", "p0", "p2"]);
            assert_eq!(order_of(&doc, ItemKind::Prompt, "p2"), 2);
            assert_eq!(order_of(&doc, ItemKind::Prompt, "p1"), 0);
            assert_all_dense(&doc);
        }

        #[test]
        fn none_position_appends_to_target() {
            let mut doc = Document {
                folders: vec![folder("dest", None, 0)],
                prompts: vec![prompt("inside", Some("dest"), 0), prompt("p", None, 1)],
            };

            move_item(&mut doc, ItemKind::Prompt, "p", Some("dest"), None).unwrap();

            assert_eq!(ids_in(&doc, Some("dest")), vec!["inside", "p"]);
        }

        #[test]
        fn cycle_is_rejected_without_mutation() {
            let mut doc = Document {
                folders: vec![folder("a", None, 0), folder("b", Some("a"), 0)],
                prompts: vec![],
            };
            let before = doc.clone();

            let err = move_item(&mut doc, ItemKind::Folder, "a", Some("b"), Some(0)).unwrap_err();
            assert!(matches!(err, StoreError::CycleDetected { .. }));

            let err = move_item(&mut doc, ItemKind::Folder, "a", Some("a"), None).unwrap_err();
            assert!(matches!(err, StoreError::CycleDetected { .. }));

            assert_eq!(doc, before);
        }

        #[test]
        fn unknown_item_is_not_found() {
            let mut doc = Document::default();
            let err = move_item(&mut doc, ItemKind::Prompt, "nope", None, None).unwrap_err();
            assert!(matches!(
                err,
                StoreError::NotFound {
                    kind: ItemKind::Prompt,
                    ..
                }
            ));
        }

        #[test]
        fn unknown_target_is_not_found_without_mutation() {
            let mut doc = Document {
                folders: vec![],
                prompts: vec![prompt("p", None, 0)],
            };
            let before = doc.clone();

            let err = move_item(&mut doc, ItemKind::Prompt, "p", Some("gone"), None).unwrap_err();
            assert!(matches!(
                err,
                StoreError::NotFound {
                    kind: ItemKind::Folder,
                    ..
                }
            ));
            assert_eq!(doc, before);
        }

        #[test]
        fn prompts_do_not_go_through_cycle_guard() {
            let mut doc = Document {
                folders: vec![folder("p", None, 0)],
                prompts: vec![prompt("p", None, 1)],
            };

            move_item(&mut doc, ItemKind::Prompt, "p", Some("p"), None).unwrap();
            assert_eq!(doc.prompt("p").unwrap().folder_id.as_deref(), Some("p"));
        }
    }

    mod set_parent {
        use super::*;

        #[test]
        fn appends_at_end_of_new_parent() {
            let mut doc = Document {
                folders: vec![
                    folder("parent", None, 0),
                    folder("existing", Some("parent"), 0),
                    folder("moving", None, 1),
                ],
                prompts: vec![prompt("p", Some("parent"), 1)],
            };

            set_folder_parent(&mut doc, "moving", Some("parent")).unwrap();

            assert_eq!(
                ids_in(&doc, Some("parent")),
                vec!["existing", "p", "moving"]
            );
            assert_all_dense(&doc);
        }

        #[test]
        fn descendant_parent_is_rejected() {
            let mut doc = Document {
                folders: vec![
                    folder("a", None, 0),
                    folder("b", Some("a"), 0),
                    folder("c", Some("b"), 0),
                ],
                prompts: vec![],
            };
            let before = doc.clone();

            let err = set_folder_parent(&mut doc, "a", Some("c")).unwrap_err();
            assert!(matches!(err, StoreError::CycleDetected { .. }));
            assert_eq!(doc, before);
        }

        #[test]
        fn to_root() {
            let mut doc = Document {
                folders: vec![folder("a", None, 0), folder("b", Some("a"), 0)],
                prompts: vec![],
            };

            set_folder_parent(&mut doc, "b", None).unwrap();

            assert_eq!(ids_in(&doc, None), vec!["a", "b"]);
        }
    }

    mod delete_folder {
        use super::*;

        #[test]
        fn children_are_spliced_into_parent() {
            let mut doc = Document {
                folders: vec![
                    folder("p", None, 0),
                    folder("victim", Some("p"), 0),
                    folder("a", Some("victim"), 0),
                    folder("b", Some("victim"), 2),
                    folder("sibling", Some("p"), 1),
                ],
                prompts: vec![prompt("x", Some("victim"), 1)],
            };

            delete_folder(&mut doc, "victim").unwrap();

            assert!(doc.folder("victim").is_none());
            assert_eq!(doc.folder("a").unwrap().parent_id.as_deref(), Some("p"));
            assert_eq!(doc.folder("b").unwrap().parent_id.as_deref(), Some("p"));
            assert_eq!(doc.prompt("x").unwrap().folder_id.as_deref(), Some("p"));
            assert_eq!(ids_in(&doc, Some("p")), vec!["sibling", "a", "x", "b"]);
            assert_all_dense(&doc);
        }

        #[test]
        fn root_level_folder_splices_into_root() {
            let mut doc = Document {
                folders: vec![folder("victim", None, 0), folder("child", Some("victim"), 0)],
                prompts: vec![prompt("loose", None, 1)],
            };

            delete_folder(&mut doc, "victim").unwrap();

            assert_eq!(doc.folder("child").unwrap().parent_id, None);
            assert_eq!(ids_in(&doc, None), vec!["loose", "child"]);
            assert_all_dense(&doc);
        }

        #[test]
        fn empty_folder_leaves_no_gap() {
            let mut doc = Document {
                folders: vec![folder("a", None, 0), folder("b", None, 1), folder("c", None, 2)],
                prompts: vec![],
            };

            delete_folder(&mut doc, "b").unwrap();

            assert_eq!(order_of(&doc, ItemKind::Folder, "c"), 1);
        }

        #[test]
        fn unknown_folder_is_not_found() {
            let mut doc = Document::default();
            assert!(matches!(
                delete_folder(&mut doc, "nope"),
                Err(StoreError::NotFound { .. })
            ));
        }
    }

    mod delete_prompt {
        use super::*;

        #[test]
        fn closes_the_gap() {
            let mut doc = Document {
                folders: vec![folder("f", None, 1)],
                prompts: vec![prompt("p0", None, 0), prompt("p2", None, 2)],
            };

            delete_prompt(&mut doc, "p0").unwrap();

            assert!(doc.prompt("p0").is_none());
            assert_eq!(order_of(&doc, ItemKind::Folder, "f"), 0);
            assert_eq!(order_of(&doc, ItemKind::Prompt, "p2"), 1);
        }

        #[test]
        fn unknown_prompt_is_not_found() {
            let mut doc = Document::default();
            assert!(matches!(
                delete_prompt(&mut doc, "nope"),
                Err(StoreError::NotFound { .. })
            ));
        }
    }
}
