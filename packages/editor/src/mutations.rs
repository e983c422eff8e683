//! # Tree Mutations
//!
//! Structural operations on one element list (a page's root list or a
//! subflow's list).
//!
//! ## Design Principles
//!
//! 1. **Pure**: every operation borrows the input list and returns a new one;
//!    a rejected operation leaves the caller holding the untouched original
//! 2. **Validated**: containment rules are checked before anything is copied
//! 3. **Single pass**: a move never exposes the intermediate "removed but not
//!    yet inserted" tree
//!
//! ## Mutation Semantics
//!
//! ### Insert
//! - Index is clamped to the container length
//! - The empty parent path is the list itself and accepts any variant
//! - Booleans inserted into a ChipGroup are unwrapped into chips
//! - The containment rules also hold inside the inserted node's own subtree
//!
//! ### Move
//! - Paths are given against the tree before the move
//! - `index` is the node's final position in the target container, clamped
//!   to the last slot it can take
//! - Moving to the node's own position is a no-op
//! - Moving a node into itself or a descendant fails
//!
//! ### Duplicate
//! - The copy lands right after the original with fresh editor keys
//! - A copied chip also gets a fresh field identifier

use patternflow_model::{Children, ChildrenMut, ElementNode, Path, Variant};
use thiserror::Error;

use crate::resolver::{resolve, resolve_container, resolve_container_mut, NodeRef};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Nothing found at path {0}")]
    PathNotFound(Path),

    #[error("Element at {0} cannot contain other elements")]
    NotAContainer(Path),

    #[error("{child} elements cannot be placed inside a {parent}")]
    ContainmentViolation { parent: Variant, child: Variant },

    #[error("Cannot move an element into itself")]
    CycleDetected,

    #[error("Page {0} does not exist")]
    PageNotFound(usize),

    #[error("Element at {0} is not a custom element")]
    NotACustomElement(Path),

    #[error("Custom element at {custom} has no subflow {index}")]
    SubflowNotFound { custom: Path, index: usize },
}

pub type MutationResult = Result<Vec<ElementNode>, MutationError>;

/// Check that a `child` variant may be placed in the container at `parent`
pub fn check_insert(
    root: &[ElementNode],
    parent: &Path,
    child: Variant,
) -> Result<(), MutationError> {
    if parent.is_root() {
        return Ok(());
    }

    let parent_variant = resolve(root, parent)
        .ok_or_else(|| MutationError::PathNotFound(parent.clone()))?
        .variant();

    if !parent_variant.is_container() {
        return Err(MutationError::NotAContainer(parent.clone()));
    }
    if !parent_variant.accepts(child) {
        return Err(MutationError::ContainmentViolation {
            parent: parent_variant,
            child,
        });
    }
    Ok(())
}

/// Check the containment rules between every parent and child inside `node`
///
/// Subflow lists are walked too; like a page list they accept any variant.
pub fn validate_subtree(node: &ElementNode) -> Result<(), MutationError> {
    let parent = node.variant();
    if let Some(Children::Elements(children)) = node.element.children() {
        for child in children {
            if !parent.accepts(child.variant()) {
                return Err(MutationError::ContainmentViolation {
                    parent,
                    child: child.variant(),
                });
            }
            validate_subtree(child)?;
        }
    }
    for subflow in node.element.subflows().unwrap_or_default() {
        for child in &subflow.elements {
            validate_subtree(child)?;
        }
    }
    Ok(())
}

/// Insert `node` into the container at `parent` at position `index`
pub fn insert_at(
    root: &[ElementNode],
    parent: &Path,
    node: ElementNode,
    index: usize,
) -> MutationResult {
    check_insert(root, parent, node.variant())?;
    validate_subtree(&node)?;

    let mut tree = root.to_vec();
    let container = resolve_container_mut(&mut tree, parent.indices())
        .ok_or_else(|| MutationError::PathNotFound(parent.clone()))?;
    insert_into(container, node, index)?;
    Ok(tree)
}

/// Remove the node at `path`; the empty path is a no-op
pub fn remove_at(root: &[ElementNode], path: &Path) -> MutationResult {
    let mut tree = root.to_vec();
    if path.is_root() {
        return Ok(tree);
    }
    take_at(&mut tree, path)?;
    Ok(tree)
}

/// True if moving `source` to (`target_parent`, `index`) would leave it in place
pub fn is_same_position(source: &Path, target_parent: &Path, index: usize) -> bool {
    source
        .split_last()
        .is_some_and(|(parent, current)| parent == *target_parent && current == index)
}

/// Clamp a move's `index` to the last slot the node can end up in
///
/// A node moving within its own container leaves one slot behind, so the
/// last reachable index there is one lower.
pub fn clamp_move_index(
    root: &[ElementNode],
    source: &Path,
    target_parent: &Path,
    index: usize,
) -> usize {
    let len = resolve_container(root, target_parent).map_or(0, |c| c.len());
    let same_container = source
        .split_last()
        .is_some_and(|(parent, _)| parent == *target_parent);
    if same_container {
        index.min(len.saturating_sub(1))
    } else {
        index.min(len)
    }
}

/// Move the node at `source` into the container at `target_parent`
pub fn move_node(
    root: &[ElementNode],
    source: &Path,
    target_parent: &Path,
    index: usize,
) -> MutationResult {
    let index = clamp_move_index(root, source, target_parent, index);
    if is_same_position(source, target_parent, index) {
        return Ok(root.to_vec());
    }

    let moving = resolve(root, source).ok_or_else(|| MutationError::PathNotFound(source.clone()))?;
    if target_parent.starts_with(source) {
        return Err(MutationError::CycleDetected);
    }
    check_insert(root, target_parent, moving.variant())?;

    // Target coordinates shift once the source leaves its container
    let target = target_parent
        .after_removal(source)
        .ok_or(MutationError::CycleDetected)?;

    let mut tree = root.to_vec();
    let node = take_at(&mut tree, source)?;
    let container = resolve_container_mut(&mut tree, target.indices())
        .ok_or_else(|| MutationError::PathNotFound(target_parent.clone()))?;
    insert_into(container, node, index)?;
    Ok(tree)
}

/// Copy the node at `path` and place the copy right after it
pub fn duplicate_at(root: &[ElementNode], path: &Path) -> MutationResult {
    let (parent, index) = path
        .split_last()
        .ok_or_else(|| MutationError::PathNotFound(path.clone()))?;
    let original = resolve(root, path).ok_or_else(|| MutationError::PathNotFound(path.clone()))?;

    let mut copy = original.to_node();
    copy.regenerate_editor_ids();
    // Chips use the field identifier as their storage key
    if let NodeRef::Chip(_) = original {
        copy.regenerate_field_id();
    }

    let mut tree = root.to_vec();
    let container = resolve_container_mut(&mut tree, parent.indices())
        .ok_or_else(|| MutationError::PathNotFound(parent.clone()))?;
    insert_into(container, copy, index + 1)?;
    Ok(tree)
}

/// Replace the node at `path`, keeping its position
///
/// A replacement without an editor key inherits the old node's key.
pub fn replace_at(root: &[ElementNode], path: &Path, node: ElementNode) -> MutationResult {
    let (parent, index) = path
        .split_last()
        .ok_or_else(|| MutationError::PathNotFound(path.clone()))?;
    if resolve(root, path).is_none() {
        return Err(MutationError::PathNotFound(path.clone()));
    }
    check_insert(root, &parent, node.variant())?;
    validate_subtree(&node)?;

    let mut tree = root.to_vec();
    let container = resolve_container_mut(&mut tree, parent.indices())
        .ok_or_else(|| MutationError::PathNotFound(parent.clone()))?;

    match container {
        ChildrenMut::Elements(list) => {
            let slot = list
                .get_mut(index)
                .ok_or_else(|| MutationError::PathNotFound(path.clone()))?;
            let mut node = node;
            if node.id.is_none() {
                node.id = slot.id.clone();
            }
            *slot = node;
        }
        ChildrenMut::Chips(chips) => {
            let slot = chips
                .get_mut(index)
                .ok_or_else(|| MutationError::PathNotFound(path.clone()))?;
            *slot = node.into_chip().map_err(|node| MutationError::ContainmentViolation {
                parent: Variant::ChipGroup,
                child: node.variant(),
            })?;
        }
    }
    Ok(tree)
}

/// Detach the node at `path`, lifting chips into the generic envelope
fn take_at(tree: &mut Vec<ElementNode>, path: &Path) -> Result<ElementNode, MutationError> {
    let (parent, index) = path
        .split_last()
        .ok_or_else(|| MutationError::PathNotFound(path.clone()))?;
    let container = resolve_container_mut(tree, parent.indices())
        .ok_or_else(|| MutationError::PathNotFound(path.clone()))?;

    if index >= container.len() {
        return Err(MutationError::PathNotFound(path.clone()));
    }

    Ok(match container {
        ChildrenMut::Elements(list) => list.remove(index),
        ChildrenMut::Chips(chips) => ElementNode::from_chip(chips.remove(index)),
    })
}

fn insert_into(
    container: ChildrenMut<'_>,
    node: ElementNode,
    index: usize,
) -> Result<(), MutationError> {
    match container {
        ChildrenMut::Elements(list) => {
            let insert_index = index.min(list.len());
            list.insert(insert_index, node);
        }
        ChildrenMut::Chips(chips) => {
            let chip = node.into_chip().map_err(|node| MutationError::ContainmentViolation {
                parent: Variant::ChipGroup,
                child: node.variant(),
            })?;
            let insert_index = index.min(chips.len());
            chips.insert(insert_index, chip);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use patternflow_model::*;

    fn tree() -> Vec<ElementNode> {
        vec![
            ElementNode::new(StringElement::new("name")),
            ElementNode::new(GroupElement::new(vec![
                ElementNode::new(NumberElement::new("age")),
                ElementNode::new(ChipGroupElement::new(vec![
                    BooleanElement::new("pets"),
                    BooleanElement::new("kids"),
                ])),
            ])),
            ElementNode::new(ArrayElement::new(vec![ElementNode::new(StringElement::new(
                "item",
            ))])),
        ]
    }

    fn path(indices: &[usize]) -> Path {
        Path::from(indices)
    }

    #[test]
    fn test_insert_then_resolve() {
        let root = tree();
        let node = ElementNode::new(DateElement::new("born"));

        let next = insert_at(&root, &path(&[1]), node.clone(), 0).unwrap();
        assert_eq!(resolve(&next, &path(&[1, 0])), Some(NodeRef::Element(&node)));
        // Input list untouched
        assert_eq!(root[1].element.children().map(|c| c.len()), Some(2));
    }

    #[test]
    fn test_insert_index_is_clamped() {
        let root = tree();
        let node = ElementNode::new(TextElement::default());
        let next = insert_at(&root, &Path::root(), node, 99).unwrap();
        assert_eq!(next.len(), 4);
        assert_eq!(next[3].variant(), Variant::Text);
    }

    #[test]
    fn test_chip_group_accepts_only_booleans() {
        let root = tree();
        let chip_group = path(&[1, 1]);

        let next = insert_at(
            &root,
            &chip_group,
            ElementNode::new(BooleanElement::new("cars")),
            0,
        )
        .unwrap();
        match resolve(&next, &path(&[1, 1, 0])) {
            Some(NodeRef::Chip(chip)) => assert_eq!(chip.field_id, "cars"),
            other => panic!("Expected chip, got {:?}", other),
        }

        let err = insert_at(
            &root,
            &chip_group,
            ElementNode::new(StringElement::new("s")),
            0,
        )
        .unwrap_err();
        assert_eq!(
            err,
            MutationError::ContainmentViolation {
                parent: Variant::ChipGroup,
                child: Variant::String
            }
        );
    }

    #[test]
    fn test_array_rejects_containers() {
        let root = tree();
        let array = path(&[2]);

        for rejected in [
            ElementNode::new(GroupElement::new(vec![])),
            ElementNode::new(ArrayElement::new(vec![])),
            ElementNode::new(ChipGroupElement::new(vec![])),
            ElementNode::new(CustomElement::new("c", vec![])),
        ] {
            assert!(matches!(
                insert_at(&root, &array, rejected, 0),
                Err(MutationError::ContainmentViolation { parent: Variant::Array, .. })
            ));
        }

        let next = insert_at(&root, &array, ElementNode::new(StringElement::new("s")), 0);
        assert!(next.is_ok());
    }

    #[test]
    fn test_group_rejects_nested_group() {
        let root = tree();
        let err = insert_at(&root, &path(&[1]), ElementNode::new(GroupElement::new(vec![])), 0)
            .unwrap_err();
        assert_eq!(
            err,
            MutationError::ContainmentViolation {
                parent: Variant::Group,
                child: Variant::Group
            }
        );

        let array = ElementNode::new(ArrayElement::new(vec![]));
        assert!(insert_at(&root, &path(&[1]), array, 0).is_ok());
    }

    #[test]
    fn test_insert_checks_the_new_subtree() {
        let root = tree();
        let array_of_groups = ElementNode::new(ArrayElement::new(vec![ElementNode::new(
            GroupElement::new(vec![]),
        )]));
        assert_eq!(
            insert_at(&root, &Path::root(), array_of_groups, 0).unwrap_err(),
            MutationError::ContainmentViolation {
                parent: Variant::Array,
                child: Variant::Group
            }
        );

        // Violations deeper down, inside a subflow of a custom element
        let nested_group = ElementNode::new(GroupElement::new(vec![ElementNode::new(
            GroupElement::new(vec![]),
        )]));
        let custom = ElementNode::new(CustomElement::new(
            "rooms",
            vec![Subflow::new("ROOM", vec![nested_group])],
        ));
        assert!(matches!(
            validate_subtree(&custom),
            Err(MutationError::ContainmentViolation { parent: Variant::Group, .. })
        ));

        let valid = ElementNode::new(GroupElement::new(vec![ElementNode::new(
            ArrayElement::new(vec![ElementNode::new(StringElement::new("s"))]),
        )]));
        assert!(validate_subtree(&valid).is_ok());
        assert!(insert_at(&root, &Path::root(), valid, 0).is_ok());
    }

    #[test]
    fn test_insert_into_leaf_is_rejected() {
        let root = tree();
        let node = ElementNode::new(StringElement::new("s"));
        assert_eq!(
            insert_at(&root, &path(&[0]), node.clone(), 0).unwrap_err(),
            MutationError::NotAContainer(path(&[0]))
        );
        assert_eq!(
            insert_at(&root, &path(&[7]), node, 0).unwrap_err(),
            MutationError::PathNotFound(path(&[7]))
        );
    }

    #[test]
    fn test_remove() {
        let root = tree();

        let next = remove_at(&root, &path(&[1, 1, 1])).unwrap();
        assert!(resolve(&next, &path(&[1, 1, 1])).is_none());
        assert!(resolve(&next, &path(&[1, 1, 0])).is_some());

        assert_eq!(remove_at(&root, &Path::root()).unwrap(), root);
        assert_eq!(
            remove_at(&root, &path(&[5])).unwrap_err(),
            MutationError::PathNotFound(path(&[5]))
        );
    }

    #[test]
    fn test_move_to_same_position_is_noop() {
        let root = tree();
        let next = move_node(&root, &path(&[1, 0]), &path(&[1]), 0).unwrap();
        assert_eq!(next, root);
        assert!(is_same_position(&path(&[1, 0]), &path(&[1]), 0));
        assert!(!is_same_position(&path(&[1, 0]), &path(&[1]), 1));
    }

    #[test]
    fn test_move_index_is_clamped_before_same_position_check() {
        let root = tree();
        assert_eq!(clamp_move_index(&root, &path(&[2]), &Path::root(), 99), 2);
        assert_eq!(clamp_move_index(&root, &path(&[1, 0]), &Path::root(), 99), 3);
        assert_eq!(move_node(&root, &path(&[2]), &Path::root(), 99).unwrap(), root);
    }

    #[test]
    fn test_move_within_same_container() {
        let root = tree();
        let next = move_node(&root, &path(&[0]), &Path::root(), 2).unwrap();
        assert_eq!(next[0].variant(), Variant::Group);
        assert_eq!(next[1].variant(), Variant::Array);
        assert_eq!(next[2].element.field_id(), Some("name"));
    }

    #[test]
    fn test_move_adjusts_target_for_removed_source() {
        let root = tree();
        // Move "name" (root 0) into the array (root 2, which becomes root 1)
        let next = move_node(&root, &path(&[0]), &path(&[2]), 0).unwrap();
        assert_eq!(next.len(), 2);
        assert_eq!(
            resolve(&next, &path(&[1, 0])).and_then(|n| n.field_id()),
            Some("name")
        );
    }

    #[test]
    fn test_move_chip_out_of_chip_group() {
        let root = tree();
        let next = move_node(&root, &path(&[1, 1, 0]), &Path::root(), 0).unwrap();
        assert_eq!(next[0].variant(), Variant::Boolean);
        assert_eq!(next[0].element.field_id(), Some("pets"));
        assert!(next[0].id.is_some());
    }

    #[test]
    fn test_move_rejections() {
        let root = tree();
        assert_eq!(
            move_node(&root, &path(&[1]), &path(&[1, 1]), 0).unwrap_err(),
            MutationError::CycleDetected
        );
        assert_eq!(
            move_node(&root, &path(&[1]), &path(&[2]), 0).unwrap_err(),
            MutationError::ContainmentViolation {
                parent: Variant::Array,
                child: Variant::Group
            }
        );
        assert_eq!(
            move_node(&root, &path(&[1, 0]), &path(&[1, 1]), 0).unwrap_err(),
            MutationError::ContainmentViolation {
                parent: Variant::ChipGroup,
                child: Variant::Number
            }
        );
    }

    #[test]
    fn test_duplicate_keeps_field_id_outside_chip_groups() {
        let root = tree();
        let next = duplicate_at(&root, &path(&[1, 0])).unwrap();

        let original = resolve(&next, &path(&[1, 0])).unwrap();
        let copy = resolve(&next, &path(&[1, 1])).unwrap();
        assert_eq!(copy.field_id(), original.field_id());
        assert_ne!(copy.element().unwrap().id, original.element().unwrap().id);
    }

    #[test]
    fn test_duplicate_chip_gets_fresh_field_id() {
        let root = tree();
        let next = duplicate_at(&root, &path(&[1, 1, 0])).unwrap();

        let original = resolve(&next, &path(&[1, 1, 0])).unwrap();
        let copy = resolve(&next, &path(&[1, 1, 1])).unwrap();
        assert_eq!(original.field_id(), Some("pets"));
        assert!(matches!(copy, NodeRef::Chip(_)));
        assert_ne!(copy.field_id(), Some("pets"));
        assert_eq!(
            resolve(&next, &path(&[1, 1, 2])).and_then(|n| n.field_id()),
            Some("kids")
        );
    }

    #[test]
    fn test_duplicate_container_refreshes_descendant_keys() {
        let root = tree();
        let next = duplicate_at(&root, &path(&[1])).unwrap();
        assert_eq!(next.len(), 4);

        let original_child = resolve(&next, &path(&[1, 0])).unwrap().element().unwrap();
        let copied_child = resolve(&next, &path(&[2, 0])).unwrap().element().unwrap();
        assert_eq!(original_child.element, copied_child.element);
        assert_ne!(original_child.id, copied_child.id);
    }

    #[test]
    fn test_replace_keeps_editor_key() {
        let root = tree();
        let replacement = ElementNode {
            id: None,
            element: StringElement::new("full_name").into(),
        };
        let next = replace_at(&root, &path(&[0]), replacement).unwrap();
        assert_eq!(next[0].id, root[0].id);
        assert_eq!(next[0].element.field_id(), Some("full_name"));

        let err = replace_at(
            &root,
            &path(&[1, 1, 0]),
            ElementNode::new(NumberElement::new("n")),
        )
        .unwrap_err();
        assert!(matches!(err, MutationError::ContainmentViolation { .. }));

        let group_in_group = ElementNode::new(GroupElement::new(vec![ElementNode::new(
            GroupElement::new(vec![]),
        )]));
        assert_eq!(
            replace_at(&root, &path(&[1]), group_in_group).unwrap_err(),
            MutationError::ContainmentViolation {
                parent: Variant::Group,
                child: Variant::Group
            }
        );
    }
}
