//! # Path Resolution
//!
//! Walks a [`Path`] through an element list. At every step the variant of
//! the node reached so far decides where its children live:
//!
//! ```text
//! Group / Array → elements
//! ChipGroup     → chips (bare Boolean leaves)
//! anything else → no children; the path is invalid
//! ```
//!
//! Resolution never partially succeeds: a path either reaches exactly one
//! node or yields `None`.

use patternflow_model::{
    BooleanElement, Children, ChildrenMut, ElementNode, Flow, ListAddress, NodeAddress, Path,
    PatternElement, Subflow, SubflowOwner, SubflowPath, Variant,
};

use crate::mutations::MutationError;

/// A resolved node: either an enveloped element or a chip
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeRef<'a> {
    Element(&'a ElementNode),
    Chip(&'a BooleanElement),
}

impl<'a> NodeRef<'a> {
    pub fn variant(&self) -> Variant {
        match *self {
            NodeRef::Element(node) => node.variant(),
            NodeRef::Chip(_) => Variant::Boolean,
        }
    }

    pub fn element(&self) -> Option<&'a ElementNode> {
        match *self {
            NodeRef::Element(node) => Some(node),
            NodeRef::Chip(_) => None,
        }
    }

    pub fn field_id(&self) -> Option<&'a str> {
        match *self {
            NodeRef::Element(node) => node.element.field_id(),
            NodeRef::Chip(chip) => Some(&chip.field_id),
        }
    }

    pub fn children(&self) -> Option<Children<'a>> {
        match *self {
            NodeRef::Element(node) => node.element.children(),
            NodeRef::Chip(_) => None,
        }
    }

    /// Owned copy in the generic envelope; chips get a fresh editor key
    pub fn to_node(&self) -> ElementNode {
        match *self {
            NodeRef::Element(node) => node.clone(),
            NodeRef::Chip(chip) => ElementNode::from_chip(chip.clone()),
        }
    }
}

/// Resolve `path` against `root`
///
/// The empty path names the list itself, not a node, and resolves to `None`.
pub fn resolve<'a>(root: &'a [ElementNode], path: &Path) -> Option<NodeRef<'a>> {
    let (&first, rest) = path.indices().split_first()?;
    let mut current = NodeRef::Element(root.get(first)?);

    for &index in rest {
        current = match current.children()? {
            Children::Elements(list) => NodeRef::Element(list.get(index)?),
            Children::Chips(chips) => NodeRef::Chip(chips.get(index)?),
        };
    }

    Some(current)
}

/// The child container addressed by `path`; the empty path is `root` itself
pub fn resolve_container<'a>(root: &'a [ElementNode], path: &Path) -> Option<Children<'a>> {
    if path.is_root() {
        return Some(Children::Elements(root));
    }
    resolve(root, path)?.children()
}

/// Resolve a two-part subflow address beneath a Custom element
pub fn resolve_in_subflow<'a>(
    custom: &'a ElementNode,
    address: &SubflowPath,
) -> Option<NodeRef<'a>> {
    let subflow = custom.element.subflows()?.get(address.subflow_index)?;
    resolve(&subflow.elements, &address.path)
}

/// Resolve a flow-level address against the edit pages of `flow`
pub fn resolve_address<'a>(flow: &'a Flow, address: &NodeAddress) -> Option<NodeRef<'a>> {
    let page = flow.edit_page(address.list.page)?;
    match &address.list.subflow {
        None => resolve(&page.elements, &address.path),
        Some(owner) => {
            let custom = resolve(&page.elements, &owner.custom)?.element()?;
            resolve_in_subflow(custom, &address.subflow_path()?)
        }
    }
}

/// The element list named by `list`
pub fn resolve_list<'a>(
    flow: &'a Flow,
    list: &ListAddress,
) -> Result<&'a [ElementNode], MutationError> {
    let page = flow
        .edit_page(list.page)
        .ok_or(MutationError::PageNotFound(list.page))?;

    match &list.subflow {
        None => Ok(page.elements.as_slice()),
        Some(owner) => Ok(subflow_of(&page.elements, owner)?.elements.as_slice()),
    }
}

/// Mutable access to the element list named by `list`
pub fn resolve_list_mut<'a>(
    flow: &'a mut Flow,
    list: &ListAddress,
) -> Result<&'a mut Vec<ElementNode>, MutationError> {
    let page = flow
        .edit_page_mut(list.page)
        .ok_or(MutationError::PageNotFound(list.page))?;

    match &list.subflow {
        None => Ok(&mut page.elements),
        Some(owner) => Ok(&mut subflow_of_mut(&mut page.elements, owner)?.elements),
    }
}

fn subflow_of<'a>(
    root: &'a [ElementNode],
    owner: &SubflowOwner,
) -> Result<&'a Subflow, MutationError> {
    let node = resolve(root, &owner.custom)
        .and_then(|node| node.element())
        .ok_or_else(|| MutationError::PathNotFound(owner.custom.clone()))?;

    match &node.element {
        PatternElement::Custom(custom) => custom
            .subflows
            .as_ref()
            .and_then(|subflows| subflows.get(owner.subflow_index))
            .ok_or_else(|| MutationError::SubflowNotFound {
                custom: owner.custom.clone(),
                index: owner.subflow_index,
            }),
        _ => Err(MutationError::NotACustomElement(owner.custom.clone())),
    }
}

fn subflow_of_mut<'a>(
    root: &'a mut Vec<ElementNode>,
    owner: &SubflowOwner,
) -> Result<&'a mut Subflow, MutationError> {
    let node = resolve_node_mut(root, &owner.custom)
        .ok_or_else(|| MutationError::PathNotFound(owner.custom.clone()))?;

    match &mut node.element {
        PatternElement::Custom(custom) => custom
            .subflows
            .as_mut()
            .and_then(|subflows| subflows.get_mut(owner.subflow_index))
            .ok_or_else(|| MutationError::SubflowNotFound {
                custom: owner.custom.clone(),
                index: owner.subflow_index,
            }),
        _ => Err(MutationError::NotACustomElement(owner.custom.clone())),
    }
}

/// Mutable counterpart of [`resolve_container`]
pub(crate) fn resolve_container_mut<'a>(
    list: &'a mut Vec<ElementNode>,
    path: &[usize],
) -> Option<ChildrenMut<'a>> {
    match path.split_first() {
        None => Some(ChildrenMut::Elements(list)),
        Some((&index, rest)) => {
            let node = list.get_mut(index)?;
            match node.element.children_mut()? {
                ChildrenMut::Elements(children) => resolve_container_mut(children, rest),
                chips @ ChildrenMut::Chips(_) => rest.is_empty().then_some(chips),
            }
        }
    }
}

/// Mutable access to an enveloped node; chips are not reachable this way
pub(crate) fn resolve_node_mut<'a>(
    list: &'a mut Vec<ElementNode>,
    path: &Path,
) -> Option<&'a mut ElementNode> {
    let (parent, index) = path.split_last()?;
    match resolve_container_mut(list, parent.indices())? {
        ChildrenMut::Elements(children) => children.get_mut(index),
        ChildrenMut::Chips(_) => None,
    }
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
            ElementNode::new(CustomElement::new(
                "rooms",
                vec![Subflow::new(
                    "ROOM",
                    vec![ElementNode::new(StringElement::new("room_name"))],
                )],
            )),
        ]
    }

    #[test]
    fn test_resolves_through_elements_and_chips() {
        let root = tree();

        assert_eq!(
            resolve(&root, &Path::new(vec![1, 0])).and_then(|n| n.field_id()),
            Some("age")
        );

        match resolve(&root, &Path::new(vec![1, 1, 1])) {
            Some(NodeRef::Chip(chip)) => assert_eq!(chip.field_id, "kids"),
            other => panic!("Expected chip, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_paths_resolve_to_none() {
        let root = tree();

        assert!(resolve(&root, &Path::root()).is_none());
        assert!(resolve(&root, &Path::new(vec![9])).is_none());
        // Descend past a leaf
        assert!(resolve(&root, &Path::new(vec![0, 0])).is_none());
        // Descend past a chip
        assert!(resolve(&root, &Path::new(vec![1, 1, 0, 0])).is_none());
        // Custom elements are not entered by flat paths
        assert!(resolve(&root, &Path::new(vec![2, 0])).is_none());
    }

    #[test]
    fn test_subflow_addressing() {
        let root = tree();
        let custom = resolve(&root, &Path::new(vec![2])).unwrap().element().unwrap();

        let node = resolve_in_subflow(custom, &SubflowPath::new(0, vec![0])).unwrap();
        assert_eq!(node.field_id(), Some("room_name"));
        assert!(resolve_in_subflow(custom, &SubflowPath::new(1, vec![0])).is_none());
    }

    #[test]
    fn test_resolve_address_and_lists() {
        let mut flow = Flow::new("f");
        flow.pages_edit[0].elements = tree();

        let address = NodeAddress::in_subflow(0, vec![2], SubflowPath::new(0, vec![0]));
        assert_eq!(
            resolve_address(&flow, &address).and_then(|n| n.field_id()),
            Some("room_name")
        );

        assert_eq!(resolve_list(&flow, &ListAddress::page(0)).unwrap().len(), 3);
        assert_eq!(
            resolve_list(&flow, &ListAddress::page(4)).unwrap_err(),
            MutationError::PageNotFound(4)
        );
        assert_eq!(
            resolve_list(&flow, &ListAddress::subflow(0, vec![0], 0)).unwrap_err(),
            MutationError::NotACustomElement(Path::new(vec![0]))
        );
    }

    #[test]
    fn test_container_of_chip_group() {
        let root = tree();
        match resolve_container(&root, &Path::new(vec![1, 1])) {
            Some(Children::Chips(chips)) => assert_eq!(chips.len(), 2),
            other => panic!("Expected chips, got {:?}", other),
        }
        assert!(resolve_container(&root, &Path::new(vec![0])).is_none());
    }
}
