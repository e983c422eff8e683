//! # Undo/Redo History
//!
//! Full-snapshot history of a [`Flow`].
//!
//! ## Design
//!
//! - Every committed edit pushes the previous flow onto the undo stack
//! - Undo moves the current flow onto the redo stack and restores the snapshot
//! - Redo is the mirror image
//! - Committing a new edit clears the redo stack
//! - With `max_levels > 0` the oldest undo snapshots are dropped first
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut history = HistoryStack::new(Flow::new("intake"));
//!
//! history.commit_described(edited, "Add element");
//! assert_eq!(history.undo_description(), Some("Add element"));
//!
//! history.undo();
//! history.redo();
//! ```

use patternflow_model::Flow;

pub const DEFAULT_MAX_LEVELS: usize = 100;

/// One stored flow plus the label of the edit that produced it
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub flow: Flow,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HistoryStack {
    current: Flow,

    /// Label of the edit that produced `current`
    current_description: Option<String>,

    /// Snapshots before `current` (most recent last)
    undo_stack: Vec<HistoryEntry>,

    /// Snapshots undone from `current` (most recent last)
    redo_stack: Vec<HistoryEntry>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,
}

impl HistoryStack {
    /// Create a history with default max levels (100)
    pub fn new(flow: Flow) -> Self {
        Self::with_max_levels(flow, DEFAULT_MAX_LEVELS)
    }

    pub fn with_max_levels(flow: Flow, max_levels: usize) -> Self {
        Self {
            current: flow,
            current_description: None,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
        }
    }

    pub fn current(&self) -> &Flow {
        &self.current
    }

    pub fn into_current(self) -> Flow {
        self.current
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    /// Make `flow` current, keeping the previous flow for undo
    pub fn commit(&mut self, flow: Flow) {
        self.push(flow, None);
    }

    pub fn commit_described(&mut self, flow: Flow, description: impl Into<String>) {
        self.push(flow, Some(description.into()));
    }

    fn push(&mut self, flow: Flow, description: Option<String>) {
        let previous = std::mem::replace(&mut self.current, flow);
        let previous_description = std::mem::replace(&mut self.current_description, description);
        self.undo_stack.push(HistoryEntry {
            flow: previous,
            description: previous_description,
        });

        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            let excess = self.undo_stack.len() - self.max_levels;
            self.undo_stack.drain(..excess);
        }

        self.redo_stack.clear();
    }

    /// Step back one edit; returns false if there is nothing to undo
    pub fn undo(&mut self) -> bool {
        let Some(entry) = self.undo_stack.pop() else {
            return false;
        };

        let undone = std::mem::replace(&mut self.current, entry.flow);
        let undone_description = std::mem::replace(&mut self.current_description, entry.description);
        self.redo_stack.push(HistoryEntry {
            flow: undone,
            description: undone_description,
        });
        true
    }

    /// Step forward one undone edit; returns false if there is nothing to redo
    pub fn redo(&mut self) -> bool {
        let Some(entry) = self.redo_stack.pop() else {
            return false;
        };

        let previous = std::mem::replace(&mut self.current, entry.flow);
        let previous_description =
            std::mem::replace(&mut self.current_description, entry.description);
        self.undo_stack.push(HistoryEntry {
            flow: previous,
            description: previous_description,
        });
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Label of the edit the next undo reverts
    pub fn undo_description(&self) -> Option<&str> {
        if self.undo_stack.is_empty() {
            return None;
        }
        self.current_description.as_deref()
    }

    /// Label of the edit the next redo reapplies
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack
            .last()
            .and_then(|entry| entry.description.as_deref())
    }

    /// Replace the current flow and drop all history
    pub fn reset(&mut self, flow: Flow) {
        self.current = flow;
        self.current_description = None;
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
