//! # Pattern Elements
//!
//! The node types of the editable tree.
//!
//! Every node in a page or container list is wrapped in an [`ElementNode`]
//! envelope carrying an editor-only key. ChipGroup chips are the exception:
//! they are bare [`BooleanElement`]s, because the chip's field identifier is
//! already its stable key.
//!
//! ## Containment
//!
//! ```text
//! Group     → anything but Group
//! Array     → anything but Array, Group, Custom, ChipGroup
//! ChipGroup → Boolean only (stored unwrapped under "chips")
//! Custom    → no flat children; owns Subflows addressed separately
//! ```

use crate::condition::VisibilityCondition;
use crate::id_generator::{new_editor_id, new_field_id};
use crate::localized::LocalizedString;
use crate::FieldValue;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use strum::{Display, EnumIter};

/// Discriminant of [`PatternElement`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Variant {
    Text,
    Boolean,
    SingleSelection,
    Number,
    Date,
    File,
    String,
    Group,
    Array,
    Custom,
    ChipGroup,
    KeyValueList,
}

impl Variant {
    /// Whether a flat path may descend into this variant
    pub fn is_container(self) -> bool {
        matches!(self, Variant::Group | Variant::Array | Variant::ChipGroup)
    }

    /// Containment table: may a `child` be placed directly inside `self`?
    pub fn accepts(self, child: Variant) -> bool {
        match self {
            Variant::ChipGroup => child == Variant::Boolean,
            Variant::Array => !matches!(
                child,
                Variant::Array | Variant::Group | Variant::Custom | Variant::ChipGroup
            ),
            Variant::Group => child != Variant::Group,
            _ => false,
        }
    }

    /// Variants that carry a field identifier
    pub fn is_data_bearing(self) -> bool {
        matches!(
            self,
            Variant::Boolean
                | Variant::SingleSelection
                | Variant::Number
                | Variant::Date
                | Variant::File
                | Variant::String
        )
    }
}

/// Attributes shared by every variant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementCommon {
    #[serde(default, skip_serializing_if = "LocalizedString::is_empty")]
    pub title: LocalizedString,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_title: Option<LocalizedString>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<LocalizedString>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility_condition: Option<VisibilityCondition>,

    /// Attributes this editor does not model, written back untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Static text block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextElement {
    #[serde(flatten)]
    pub common: ElementCommon,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BooleanElement {
    #[serde(flatten)]
    pub common: ElementCommon,
    pub field_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<bool>,
}

impl BooleanElement {
    pub fn new(field_id: impl Into<String>) -> Self {
        Self {
            field_id: field_id.into(),
            ..Default::default()
        }
    }

    pub fn with_default(mut self, value: bool) -> Self {
        self.default_value = Some(value);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionOption {
    pub key: String,
    #[serde(default)]
    pub label: LocalizedString,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SingleSelectionElement {
    #[serde(flatten)]
    pub common: ElementCommon,
    pub field_id: String,
    #[serde(default)]
    pub options: Vec<SelectionOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl SingleSelectionElement {
    pub fn new(field_id: impl Into<String>, options: Vec<SelectionOption>) -> Self {
        Self {
            field_id: field_id.into(),
            options,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumberElement {
    #[serde(flatten)]
    pub common: ElementCommon,
    pub field_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Number>,
}

impl NumberElement {
    pub fn new(field_id: impl Into<String>) -> Self {
        Self {
            field_id: field_id.into(),
            ..Default::default()
        }
    }
}

/// Date input; dates are ISO-8601 strings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateElement {
    #[serde(flatten)]
    pub common: ElementCommon,
    pub field_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl DateElement {
    pub fn new(field_id: impl Into<String>) -> Self {
        Self {
            field_id: field_id.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileElement {
    #[serde(flatten)]
    pub common: ElementCommon,
    pub field_id: String,
    /// MIME types or extensions; empty accepts anything
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_file_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_files: Option<u32>,
}

impl FileElement {
    pub fn new(field_id: impl Into<String>) -> Self {
        Self {
            field_id: field_id.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StringElement {
    #[serde(flatten)]
    pub common: ElementCommon,
    pub field_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub multiline: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl StringElement {
    pub fn new(field_id: impl Into<String>) -> Self {
        Self {
            field_id: field_id.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupElement {
    #[serde(flatten)]
    pub common: ElementCommon,
    #[serde(default)]
    pub elements: Vec<ElementNode>,
}

impl GroupElement {
    pub fn new(elements: Vec<ElementNode>) -> Self {
        Self {
            elements,
            ..Default::default()
        }
    }
}

/// Repeatable block of fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrayElement {
    #[serde(flatten)]
    pub common: ElementCommon,
    #[serde(default)]
    pub elements: Vec<ElementNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_count: Option<u32>,
}

impl ArrayElement {
    pub fn new(elements: Vec<ElementNode>) -> Self {
        Self {
            elements,
            ..Default::default()
        }
    }
}

/// Named sub-flow of a Custom element, e.g. one per "ROOM"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subflow {
    #[serde(rename = "type")]
    pub subflow_type: String,
    #[serde(default, skip_serializing_if = "LocalizedString::is_empty")]
    pub title: LocalizedString,
    #[serde(default)]
    pub elements: Vec<ElementNode>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Subflow {
    pub fn new(subflow_type: impl Into<String>, elements: Vec<ElementNode>) -> Self {
        Self {
            subflow_type: subflow_type.into(),
            elements,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomElement {
    #[serde(flatten)]
    pub common: ElementCommon,
    /// Renderer-side implementation key
    pub custom_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subflows: Option<Vec<Subflow>>,
}

impl CustomElement {
    pub fn new(custom_type: impl Into<String>, subflows: Vec<Subflow>) -> Self {
        Self {
            custom_type: custom_type.into(),
            subflows: Some(subflows),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChipGroupElement {
    #[serde(flatten)]
    pub common: ElementCommon,
    #[serde(default)]
    pub chips: Vec<BooleanElement>,
}

impl ChipGroupElement {
    pub fn new(chips: Vec<BooleanElement>) -> Self {
        Self {
            chips,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyValueItem {
    pub key: LocalizedString,
    #[serde(default)]
    pub value: LocalizedString,
}

/// Read-only list of labelled values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyValueListElement {
    #[serde(flatten)]
    pub common: ElementCommon,
    #[serde(default)]
    pub items: Vec<KeyValueItem>,
}

/// Tagged element payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "pattern_type")]
pub enum PatternElement {
    #[serde(rename = "TextUIElement")]
    Text(TextElement),
    #[serde(rename = "BooleanUIElement")]
    Boolean(BooleanElement),
    #[serde(rename = "SingleSelectionUIElement")]
    SingleSelection(SingleSelectionElement),
    #[serde(rename = "NumberUIElement")]
    Number(NumberElement),
    #[serde(rename = "DateUIElement")]
    Date(DateElement),
    #[serde(rename = "FileUIElement")]
    File(FileElement),
    #[serde(rename = "StringUIElement")]
    String(StringElement),
    #[serde(rename = "GroupUIElement")]
    Group(GroupElement),
    #[serde(rename = "ArrayUIElement")]
    Array(ArrayElement),
    #[serde(rename = "CustomUIElement")]
    Custom(CustomElement),
    #[serde(rename = "ChipGroupUIElement")]
    ChipGroup(ChipGroupElement),
    #[serde(rename = "KeyValueListUIElement")]
    KeyValueList(KeyValueListElement),
}

/// Borrowed child container of a node
#[derive(Debug, Clone, Copy)]
pub enum Children<'a> {
    Elements(&'a [ElementNode]),
    Chips(&'a [BooleanElement]),
}

impl Children<'_> {
    pub fn len(&self) -> usize {
        match self {
            Children::Elements(list) => list.len(),
            Children::Chips(chips) => chips.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Mutably borrowed child container of a node
#[derive(Debug)]
pub enum ChildrenMut<'a> {
    Elements(&'a mut Vec<ElementNode>),
    Chips(&'a mut Vec<BooleanElement>),
}

impl ChildrenMut<'_> {
    pub fn len(&self) -> usize {
        match self {
            ChildrenMut::Elements(list) => list.len(),
            ChildrenMut::Chips(chips) => chips.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PatternElement {
    pub fn variant(&self) -> Variant {
        match self {
            PatternElement::Text(_) => Variant::Text,
            PatternElement::Boolean(_) => Variant::Boolean,
            PatternElement::SingleSelection(_) => Variant::SingleSelection,
            PatternElement::Number(_) => Variant::Number,
            PatternElement::Date(_) => Variant::Date,
            PatternElement::File(_) => Variant::File,
            PatternElement::String(_) => Variant::String,
            PatternElement::Group(_) => Variant::Group,
            PatternElement::Array(_) => Variant::Array,
            PatternElement::Custom(_) => Variant::Custom,
            PatternElement::ChipGroup(_) => Variant::ChipGroup,
            PatternElement::KeyValueList(_) => Variant::KeyValueList,
        }
    }

    pub fn common(&self) -> &ElementCommon {
        match self {
            PatternElement::Text(e) => &e.common,
            PatternElement::Boolean(e) => &e.common,
            PatternElement::SingleSelection(e) => &e.common,
            PatternElement::Number(e) => &e.common,
            PatternElement::Date(e) => &e.common,
            PatternElement::File(e) => &e.common,
            PatternElement::String(e) => &e.common,
            PatternElement::Group(e) => &e.common,
            PatternElement::Array(e) => &e.common,
            PatternElement::Custom(e) => &e.common,
            PatternElement::ChipGroup(e) => &e.common,
            PatternElement::KeyValueList(e) => &e.common,
        }
    }

    pub fn common_mut(&mut self) -> &mut ElementCommon {
        match self {
            PatternElement::Text(e) => &mut e.common,
            PatternElement::Boolean(e) => &mut e.common,
            PatternElement::SingleSelection(e) => &mut e.common,
            PatternElement::Number(e) => &mut e.common,
            PatternElement::Date(e) => &mut e.common,
            PatternElement::File(e) => &mut e.common,
            PatternElement::String(e) => &mut e.common,
            PatternElement::Group(e) => &mut e.common,
            PatternElement::Array(e) => &mut e.common,
            PatternElement::Custom(e) => &mut e.common,
            PatternElement::ChipGroup(e) => &mut e.common,
            PatternElement::KeyValueList(e) => &mut e.common,
        }
    }

    pub fn field_id(&self) -> Option<&str> {
        match self {
            PatternElement::Boolean(e) => Some(&e.field_id),
            PatternElement::SingleSelection(e) => Some(&e.field_id),
            PatternElement::Number(e) => Some(&e.field_id),
            PatternElement::Date(e) => Some(&e.field_id),
            PatternElement::File(e) => Some(&e.field_id),
            PatternElement::String(e) => Some(&e.field_id),
            PatternElement::Text(_)
            | PatternElement::Group(_)
            | PatternElement::Array(_)
            | PatternElement::Custom(_)
            | PatternElement::ChipGroup(_)
            | PatternElement::KeyValueList(_) => None,
        }
    }

    /// Initial value for the field-value store, if the variant declares one
    pub fn default_value(&self) -> Option<FieldValue> {
        match self {
            PatternElement::Boolean(e) => e.default_value.map(FieldValue::Boolean),
            PatternElement::SingleSelection(e) => e.default_value.clone().map(FieldValue::Text),
            PatternElement::Number(e) => e.default_value.clone().map(FieldValue::Number),
            PatternElement::Date(e) => e.default_value.clone().map(FieldValue::Text),
            PatternElement::String(e) => e.default_value.clone().map(FieldValue::Text),
            _ => None,
        }
    }

    /// The container a flat path descends into, if any
    pub fn children(&self) -> Option<Children<'_>> {
        match self {
            PatternElement::Group(e) => Some(Children::Elements(&e.elements)),
            PatternElement::Array(e) => Some(Children::Elements(&e.elements)),
            PatternElement::ChipGroup(e) => Some(Children::Chips(&e.chips)),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<ChildrenMut<'_>> {
        match self {
            PatternElement::Group(e) => Some(ChildrenMut::Elements(&mut e.elements)),
            PatternElement::Array(e) => Some(ChildrenMut::Elements(&mut e.elements)),
            PatternElement::ChipGroup(e) => Some(ChildrenMut::Chips(&mut e.chips)),
            _ => None,
        }
    }

    pub fn subflows(&self) -> Option<&[Subflow]> {
        match self {
            PatternElement::Custom(e) => e.subflows.as_deref(),
            _ => None,
        }
    }

    pub fn subflows_mut(&mut self) -> Option<&mut Vec<Subflow>> {
        match self {
            PatternElement::Custom(e) => e.subflows.as_mut(),
            _ => None,
        }
    }
}

macro_rules! impl_from_variant {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for PatternElement {
                fn from(element: $ty) -> Self {
                    PatternElement::$variant(element)
                }
            }
        )*
    };
}

impl_from_variant! {
    TextElement => Text,
    BooleanElement => Boolean,
    SingleSelectionElement => SingleSelection,
    NumberElement => Number,
    DateElement => Date,
    FileElement => File,
    StringElement => String,
    GroupElement => Group,
    ArrayElement => Array,
    CustomElement => Custom,
    ChipGroupElement => ChipGroup,
    KeyValueListElement => KeyValueList,
}

/// Envelope of every non-chip node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementNode {
    /// Editor-only key; never persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub element: PatternElement,
}

impl ElementNode {
    /// Wrap an element under a fresh editor key
    pub fn new(element: impl Into<PatternElement>) -> Self {
        Self {
            id: Some(new_editor_id()),
            element: element.into(),
        }
    }

    /// Lift a chip out of a ChipGroup into the generic envelope
    pub fn from_chip(chip: BooleanElement) -> Self {
        Self::new(chip)
    }

    /// Unwrap into a chip; non-Boolean nodes are handed back unchanged
    pub fn into_chip(self) -> Result<BooleanElement, ElementNode> {
        match self.element {
            PatternElement::Boolean(chip) => Ok(chip),
            element => Err(ElementNode {
                id: self.id,
                element,
            }),
        }
    }

    pub fn variant(&self) -> Variant {
        self.element.variant()
    }

    /// Give every node in this subtree that lacks an editor key a fresh one
    pub fn assign_editor_ids(&mut self) {
        self.for_each_node_mut(&mut |node: &mut ElementNode| {
            if node.id.is_none() {
                node.id = Some(new_editor_id());
            }
        });
    }

    /// Replace every editor key in this subtree
    pub fn regenerate_editor_ids(&mut self) {
        self.for_each_node_mut(&mut |node: &mut ElementNode| node.id = Some(new_editor_id()));
    }

    /// Drop every editor key in this subtree
    pub fn strip_editor_ids(&mut self) {
        self.for_each_node_mut(&mut |node: &mut ElementNode| node.id = None);
    }

    /// Replace the field identifier of a data-bearing node
    pub fn regenerate_field_id(&mut self) {
        let field_id = match &mut self.element {
            PatternElement::Boolean(e) => &mut e.field_id,
            PatternElement::SingleSelection(e) => &mut e.field_id,
            PatternElement::Number(e) => &mut e.field_id,
            PatternElement::Date(e) => &mut e.field_id,
            PatternElement::File(e) => &mut e.field_id,
            PatternElement::String(e) => &mut e.field_id,
            _ => return,
        };
        *field_id = new_field_id();
    }

    fn for_each_node_mut(&mut self, f: &mut dyn FnMut(&mut ElementNode)) {
        f(self);
        match &mut self.element {
            PatternElement::Group(GroupElement { elements, .. })
            | PatternElement::Array(ArrayElement { elements, .. }) => {
                for child in elements {
                    child.for_each_node_mut(f);
                }
            }
            PatternElement::Custom(CustomElement {
                subflows: Some(subflows),
                ..
            }) => {
                for child in subflows.iter_mut().flat_map(|s| s.elements.iter_mut()) {
                    child.for_each_node_mut(f);
                }
            }
            _ => {}
        }
    }
}
