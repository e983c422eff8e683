//! # Patternflow Model
//!
//! Data model of a pattern flow: the typed element tree, pages, visibility
//! conditions and the addresses used to point into the tree.
//!
//! ```text
//! Flow
//!  ├─ pages_edit: [Page] ── elements: [ElementNode { id?, element }]
//!  │                                     ├─ Group / Array → elements
//!  │                                     ├─ ChipGroup     → chips: [BooleanElement]
//!  │                                     └─ Custom        → subflows: [Subflow → elements]
//!  └─ pages_view: [Page]
//! ```
//!
//! The model has no editing behavior of its own; see `patternflow-editor`.

pub mod condition;
pub mod element;
pub mod error;
pub mod flow;
pub mod id_generator;
pub mod localized;
pub mod path;
pub mod serializer;
pub mod visitor;

pub use condition::{
    FieldValue, FieldValues, LogicalOperator, RelationalOperator, ViewContext,
    VisibilityCondition,
};
pub use element::{
    ArrayElement, BooleanElement, ChipGroupElement, Children, ChildrenMut, CustomElement,
    DateElement, ElementCommon, ElementNode, FileElement, GroupElement, KeyValueItem,
    KeyValueListElement, NumberElement, PatternElement, SelectionOption, SingleSelectionElement,
    StringElement, Subflow, TextElement, Variant,
};
pub use error::{ExportError, ImportError, ImportResult};
pub use flow::{Flow, Page};
pub use id_generator::{new_editor_id, new_field_id, IdGenerator};
pub use localized::LocalizedString;
pub use path::{ListAddress, NodeAddress, Path, PathParseError, SubflowOwner, SubflowPath};
pub use serializer::{export_flow, export_value, import_flow};
pub use visitor::{walk_custom, walk_elements, walk_flow, walk_node, Visitor};
