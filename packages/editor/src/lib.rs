//! # Patternflow Editor
//!
//! Editing engine for pattern flows.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: Flow JSON ⇄ typed element tree       │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: session + history + mutations       │
//! │  - Resolve paths to nodes                   │
//! │  - Apply structural edits with validation   │
//! │  - Full-snapshot undo/redo                  │
//! │  - Track the selected node                  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ evaluator: visibility + default values      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Trees are values**: every edit produces a new tree from the old one
//! 2. **Rejections are values**: an invalid edit returns a reason and changes nothing
//! 3. **One edit, one snapshot**: undo restores exactly the flow before the edit
//!
//! ## Usage
//!
//! ```rust,ignore
//! use patternflow_editor::{EditCommand, EditSession};
//! use patternflow_model::{ListAddress, Path, StringElement};
//!
//! let mut session = EditSession::new(Flow::new("intake"));
//!
//! session.apply(EditCommand::AddElement {
//!     list: ListAddress::page(0),
//!     parent: Path::root(),
//!     element: StringElement::new("name").into(),
//!     index: None,
//! })?;
//!
//! session.undo();
//! let json = session.export_json()?;
//! ```

mod commands;
mod errors;
mod history;
mod mutations;
mod resolver;
mod session;

pub use commands::EditCommand;
pub use errors::EditorError;
pub use history::{HistoryEntry, HistoryStack, DEFAULT_MAX_LEVELS};
pub use mutations::{
    check_insert, clamp_move_index, duplicate_at, insert_at, is_same_position, move_node,
    remove_at, replace_at, validate_subtree, MutationError, MutationResult,
};
pub use resolver::{
    resolve, resolve_address, resolve_container, resolve_in_subflow, resolve_list,
    resolve_list_mut, NodeRef,
};
pub use session::{CommandOutcome, EditSession};
