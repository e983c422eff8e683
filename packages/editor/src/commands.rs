//! # Edit Commands
//!
//! Serializable intents applied by an [`EditSession`](crate::EditSession).
//! Each successfully applied command becomes exactly one history entry.
//!
//! Element commands address nodes with [`NodeAddress`] (page list or subflow
//! list); structural paths inside the command are relative to that list.

use patternflow_model::{ListAddress, LocalizedString, NodeAddress, Path, PatternElement, Subflow};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EditCommand {
    /// Insert a new element into the container at `parent` (head by default)
    AddElement {
        list: ListAddress,
        #[serde(default)]
        parent: Path,
        element: PatternElement,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index: Option<usize>,
    },

    /// Remove a node and its subtree
    RemoveElement { node: NodeAddress },

    /// Move a node within its list; `index` is its final position
    MoveElement {
        source: NodeAddress,
        #[serde(default)]
        target_parent: Path,
        index: usize,
    },

    /// Copy a node and place the copy right after it
    DuplicateElement { node: NodeAddress },

    /// Swap a node's payload, keeping its position and editor key
    ReplaceElement {
        node: NodeAddress,
        element: PatternElement,
    },

    /// Insert an empty edit page (appended by default)
    AddPage {
        #[serde(default)]
        title: LocalizedString,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index: Option<usize>,
    },

    RemovePage { page: usize },

    /// Add a subflow to the Custom element at `custom` (appended by default)
    AddSubflow {
        page: usize,
        custom: Path,
        subflow: Subflow,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index: Option<usize>,
    },

    RemoveSubflow {
        page: usize,
        custom: Path,
        subflow_index: usize,
    },
}

impl EditCommand {
    /// Human-readable label used for undo/redo descriptions
    pub fn label(&self) -> &'static str {
        match self {
            EditCommand::AddElement { .. } => "Add element",
            EditCommand::RemoveElement { .. } => "Remove element",
            EditCommand::MoveElement { .. } => "Move element",
            EditCommand::DuplicateElement { .. } => "Duplicate element",
            EditCommand::ReplaceElement { .. } => "Edit element",
            EditCommand::AddPage { .. } => "Add page",
            EditCommand::RemovePage { .. } => "Remove page",
            EditCommand::AddSubflow { .. } => "Add subflow",
            EditCommand::RemoveSubflow { .. } => "Remove subflow",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_command_from_script_json() {
        let command: EditCommand = serde_json::from_value(json!({
            "type": "AddElement",
            "list": { "page": 0 },
            "parent": [1],
            "element": { "pattern_type": "StringUIElement", "field_id": "name" }
        }))
        .unwrap();

        match &command {
            EditCommand::AddElement {
                list,
                parent,
                element,
                index,
            } => {
                assert_eq!(list, &ListAddress::page(0));
                assert_eq!(parent, &Path::new(vec![1]));
                assert_eq!(element.field_id(), Some("name"));
                assert_eq!(*index, None);
            }
            other => panic!("Expected AddElement, got {:?}", other),
        }
        assert_eq!(command.label(), "Add element");
    }

    #[test]
    fn test_subflow_addressed_command() {
        let command: EditCommand = serde_json::from_value(json!({
            "type": "RemoveElement",
            "node": {
                "list": { "page": 0, "subflow": { "custom": [2], "subflow_index": 1 } },
                "path": [0]
            }
        }))
        .unwrap();

        assert_eq!(
            command,
            EditCommand::RemoveElement {
                node: ListAddress::subflow(0, vec![2], 1).node(vec![0])
            }
        );
    }
}
