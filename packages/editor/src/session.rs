//! # Edit Session
//!
//! One editor's view of a flow: the flow itself (behind a [`HistoryStack`])
//! and the current selection.
//!
//! Commands are applied against the current flow and produce a new one. A
//! rejected command leaves flow, history and selection untouched and returns
//! the reason; an accepted command is committed as one history entry.
//!
//! Selection follows the edit where the new position is known (inserted,
//! moved and duplicated nodes become selected, later siblings shift after a
//! removal) and is cleared by undo, redo and whole-flow replacement.

use patternflow_model::{
    export_flow, import_flow, new_editor_id, ElementNode, Flow, ListAddress, LocalizedString,
    NodeAddress, Page, Path, PatternElement, Subflow,
};
use tracing::{debug, info, warn};

use crate::commands::EditCommand;
use crate::history::HistoryStack;
use crate::mutations::{
    clamp_move_index, duplicate_at, insert_at, is_same_position, move_node, remove_at,
    replace_at, validate_subtree, MutationError, MutationResult,
};
use crate::resolver::{
    resolve_address, resolve_container, resolve_list, resolve_list_mut, resolve_node_mut, NodeRef,
};
use crate::EditorError;

/// Result of a command that passed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The flow changed and one history entry was recorded
    Applied,
    /// The command was valid but had nothing to do; history is untouched
    Unchanged,
}

pub struct EditSession {
    /// Unique session identifier
    pub id: String,

    history: HistoryStack,

    selection: Option<NodeAddress>,
}

impl EditSession {
    pub fn new(flow: Flow) -> Self {
        Self::from_history(HistoryStack::new(prepare(flow)))
    }

    /// Session whose undo depth is capped at `limit` (0 = unlimited)
    pub fn with_history_limit(flow: Flow, limit: usize) -> Self {
        Self::from_history(HistoryStack::with_max_levels(prepare(flow), limit))
    }

    fn from_history(history: HistoryStack) -> Self {
        Self {
            id: new_editor_id(),
            history,
            selection: None,
        }
    }

    pub fn flow(&self) -> &Flow {
        self.history.current()
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn selection(&self) -> Option<&NodeAddress> {
        self.selection.as_ref()
    }

    /// Select the node at `address`; an address that does not resolve clears
    /// the selection and returns false
    pub fn select(&mut self, address: NodeAddress) -> bool {
        if resolve_address(self.flow(), &address).is_some() {
            self.selection = Some(address);
            true
        } else {
            self.selection = None;
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn selected_node(&self) -> Option<NodeRef<'_>> {
        resolve_address(self.flow(), self.selection.as_ref()?)
    }

    /// Replace the whole flow, discarding history and selection
    pub fn open(&mut self, flow: Flow) {
        info!(flow = %flow.id, pages = flow.pages_edit.len(), "Opened flow");
        self.history.reset(prepare(flow));
        self.selection = None;
    }

    /// Start over with an empty flow
    pub fn new_flow(&mut self, id: impl Into<String>) {
        self.open(Flow::new(id));
    }

    /// Replace the flow with an imported document
    ///
    /// On error the current flow, history and selection are kept.
    pub fn import_json(&mut self, source: &str) -> Result<(), EditorError> {
        let flow = import_flow(source)?;
        self.open(flow);
        Ok(())
    }

    /// Canonical JSON of the current flow, editor keys stripped
    pub fn export_json(&self) -> Result<String, EditorError> {
        Ok(export_flow(self.flow())?)
    }

    pub fn undo(&mut self) -> bool {
        let undone = self.history.undo();
        if undone {
            self.selection = None;
            debug!(undo_levels = self.history.undo_levels(), "Undo");
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.history.redo();
        if redone {
            self.selection = None;
            debug!(redo_levels = self.history.redo_levels(), "Redo");
        }
        redone
    }

    /// Apply `command` to the current flow
    pub fn apply(&mut self, command: EditCommand) -> Result<CommandOutcome, EditorError> {
        let label = command.label();

        match self.plan(command) {
            Ok(Some(edit)) => {
                self.history.commit_described(edit.flow, label);
                self.selection = edit.selection;
                debug!(
                    command = label,
                    undo_levels = self.history.undo_levels(),
                    "Applied command"
                );
                Ok(CommandOutcome::Applied)
            }
            Ok(None) => {
                debug!(command = label, "Command left flow unchanged");
                Ok(CommandOutcome::Unchanged)
            }
            Err(error) => {
                warn!(command = label, %error, "Rejected command");
                Err(error.into())
            }
        }
    }

    /// Compute the flow and selection a command would produce
    fn plan(&self, command: EditCommand) -> Result<Option<Edit>, MutationError> {
        let flow = self.flow();
        let selection = self.selection.as_ref();

        match command {
            EditCommand::AddElement {
                list,
                parent,
                element,
                index,
            } => {
                let root = resolve_list(flow, &list)?;
                let len = resolve_container(root, &parent).map_or(0, |c| c.len());
                let index = index.unwrap_or(0).min(len);

                let mut node = ElementNode::new(element);
                node.assign_editor_ids();

                let next = update_list(flow, &list, |root| insert_at(root, &parent, node, index))?;
                Ok(Some(Edit {
                    flow: next,
                    selection: Some(list.node(parent.child(index))),
                }))
            }

            EditCommand::RemoveElement { node } => {
                if node.path.is_root() {
                    return Ok(None);
                }
                let next = update_list(flow, &node.list, |root| remove_at(root, &node.path))?;
                Ok(Some(Edit {
                    flow: next,
                    selection: selection.and_then(|selected| selected.after_removal_of(&node)),
                }))
            }

            EditCommand::MoveElement {
                source,
                target_parent,
                index,
            } => {
                let root = resolve_list(flow, &source.list)?;
                let index = clamp_move_index(root, &source.path, &target_parent, index);
                if is_same_position(&source.path, &target_parent, index) {
                    return Ok(None);
                }
                let next = update_list(flow, &source.list, |root| {
                    move_node(root, &source.path, &target_parent, index)
                })?;

                let moved = target_parent
                    .after_removal(&source.path)
                    .and_then(|parent| {
                        let root = resolve_list(&next, &source.list).ok()?;
                        let len = resolve_container(root, &parent)?.len();
                        Some(source.list.node(parent.child(index.min(len.saturating_sub(1)))))
                    });
                Ok(Some(Edit {
                    flow: next,
                    selection: moved,
                }))
            }

            EditCommand::DuplicateElement { node } => {
                let next = update_list(flow, &node.list, |root| duplicate_at(root, &node.path))?;
                let copy = node
                    .path
                    .split_last()
                    .map(|(parent, index)| node.list.node(parent.child(index + 1)));
                Ok(Some(Edit {
                    flow: next,
                    selection: copy,
                }))
            }

            EditCommand::ReplaceElement { node, element } => {
                let replacement = fresh_payload(element);
                let next = update_list(flow, &node.list, |root| {
                    replace_at(root, &node.path, replacement)
                })?;
                let kept = selection
                    .filter(|selected| resolve_address(&next, selected).is_some())
                    .cloned();
                Ok(Some(Edit {
                    flow: next,
                    selection: kept,
                }))
            }

            EditCommand::AddPage { title, index } => {
                let index = index
                    .unwrap_or(flow.pages_edit.len())
                    .min(flow.pages_edit.len());
                let mut next = flow.clone();
                next.pages_edit.insert(index, new_page(flow, title));

                let shifted = selection.cloned().map(|mut selected| {
                    if selected.list.page >= index {
                        selected.list.page += 1;
                    }
                    selected
                });
                Ok(Some(Edit {
                    flow: next,
                    selection: shifted,
                }))
            }

            EditCommand::RemovePage { page } => {
                if page >= flow.pages_edit.len() {
                    return Err(MutationError::PageNotFound(page));
                }
                let mut next = flow.clone();
                next.pages_edit.remove(page);

                let shifted = selection.cloned().and_then(|mut selected| {
                    match selected.list.page.cmp(&page) {
                        std::cmp::Ordering::Less => {}
                        std::cmp::Ordering::Equal => return None,
                        std::cmp::Ordering::Greater => selected.list.page -= 1,
                    }
                    Some(selected)
                });
                Ok(Some(Edit {
                    flow: next,
                    selection: shifted,
                }))
            }

            EditCommand::AddSubflow {
                page,
                custom,
                mut subflow,
                index,
            } => {
                for node in &mut subflow.elements {
                    validate_subtree(node)?;
                    node.assign_editor_ids();
                }
                let mut next = flow.clone();
                let subflows = subflows_mut(&mut next, page, &custom)?;
                let index = index.unwrap_or(subflows.len()).min(subflows.len());
                subflows.insert(index, subflow);

                let shifted = selection.cloned().map(|mut selected| {
                    if let Some(owner) = selected.list.subflow.as_mut() {
                        if selected.list.page == page
                            && owner.custom == custom
                            && owner.subflow_index >= index
                        {
                            owner.subflow_index += 1;
                        }
                    }
                    selected
                });
                Ok(Some(Edit {
                    flow: next,
                    selection: shifted,
                }))
            }

            EditCommand::RemoveSubflow {
                page,
                custom,
                subflow_index,
            } => {
                let mut next = flow.clone();
                let subflows = subflows_mut(&mut next, page, &custom)?;
                if subflow_index >= subflows.len() {
                    return Err(MutationError::SubflowNotFound {
                        custom,
                        index: subflow_index,
                    });
                }
                subflows.remove(subflow_index);

                let shifted = selection.cloned().and_then(|mut selected| {
                    if selected.list.page != page {
                        return Some(selected);
                    }
                    if let Some(owner) = selected.list.subflow.as_mut() {
                        if owner.custom == custom {
                            match owner.subflow_index.cmp(&subflow_index) {
                                std::cmp::Ordering::Less => {}
                                std::cmp::Ordering::Equal => return None,
                                std::cmp::Ordering::Greater => owner.subflow_index -= 1,
                            }
                        }
                    }
                    Some(selected)
                });
                Ok(Some(Edit {
                    flow: next,
                    selection: shifted,
                }))
            }
        }
    }
}

/// A validated command's result, not yet committed
struct Edit {
    flow: Flow,
    selection: Option<NodeAddress>,
}

fn prepare(mut flow: Flow) -> Flow {
    flow.assign_editor_ids();
    flow
}

/// Run a list mutation and splice the result into a copy of `flow`
fn update_list(
    flow: &Flow,
    list: &ListAddress,
    mutate: impl FnOnce(&[ElementNode]) -> MutationResult,
) -> Result<Flow, MutationError> {
    let elements = mutate(resolve_list(flow, list)?)?;
    let mut next = flow.clone();
    *resolve_list_mut(&mut next, list)? = elements;
    Ok(next)
}

/// Replacement payload without a top-level key, so the replaced node's key survives
fn fresh_payload(element: PatternElement) -> ElementNode {
    let mut node = ElementNode::new(element);
    node.assign_editor_ids();
    node.id = None;
    node
}

fn new_page(flow: &Flow, title: LocalizedString) -> Page {
    let mut page = Page::new(flow.next_page_id());
    page.title = title;
    page
}

fn subflows_mut<'a>(
    flow: &'a mut Flow,
    page: usize,
    custom: &Path,
) -> Result<&'a mut Vec<Subflow>, MutationError> {
    let elements = &mut flow
        .edit_page_mut(page)
        .ok_or(MutationError::PageNotFound(page))?
        .elements;
    let node = resolve_node_mut(elements, custom)
        .ok_or_else(|| MutationError::PathNotFound(custom.clone()))?;

    match &mut node.element {
        PatternElement::Custom(element) => Ok(element.subflows.get_or_insert_with(Vec::new)),
        _ => Err(MutationError::NotACustomElement(custom.clone())),
    }
}
