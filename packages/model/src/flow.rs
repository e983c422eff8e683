//! # Flow Document
//!
//! The aggregate root of the editor. A flow holds two parallel page lists:
//! edit pages (what the tool edits) and view pages (derived display pages
//! carried along untouched).

use crate::condition::VisibilityCondition;
use crate::element::ElementNode;
use crate::id_generator::IdGenerator;
use crate::localized::LocalizedString;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,

    #[serde(default, skip_serializing_if = "LocalizedString::is_empty")]
    pub title: LocalizedString,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Renderer layout hint, e.g. `"2_COL_GRID"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,

    /// Links an edit page to its view-mode counterpart
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_page_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility_condition: Option<VisibilityCondition>,

    #[serde(default)]
    pub elements: Vec<ElementNode>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Page {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: LocalizedString::default(),
            icon: None,
            layout: None,
            related_page_id: None,
            visibility_condition: None,
            elements: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_elements(mut self, elements: Vec<ElementNode>) -> Self {
        self.elements = elements;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    pub id: String,

    #[serde(default, skip_serializing_if = "LocalizedString::is_empty")]
    pub title: LocalizedString,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_title: Option<LocalizedString>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<LocalizedString>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Document format version written by the producing tool
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    pub pages_edit: Vec<Page>,

    pub pages_view: Vec<Page>,

    /// Top-level attributes this editor does not model
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Flow {
    /// Empty flow with a single blank edit page
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let mut ids = IdGenerator::new(format!("{}-page", id));

        Self {
            pages_edit: vec![Page::new(ids.new_id())],
            pages_view: Vec::new(),
            id,
            title: LocalizedString::default(),
            short_title: None,
            description: None,
            icon: None,
            version: None,
            extra: Map::new(),
        }
    }

    pub fn edit_page(&self, index: usize) -> Option<&Page> {
        self.pages_edit.get(index)
    }

    pub fn edit_page_mut(&mut self, index: usize) -> Option<&mut Page> {
        self.pages_edit.get_mut(index)
    }

    /// Id not yet used by any edit or view page
    pub fn next_page_id(&self) -> String {
        let mut ids = IdGenerator::new(format!("{}-page", self.id));
        loop {
            let candidate = ids.new_id();
            let taken = self
                .pages_edit
                .iter()
                .chain(&self.pages_view)
                .any(|page| page.id == candidate);
            if !taken {
                return candidate;
            }
        }
    }

    /// Fill in editor keys for every node that lacks one
    pub fn assign_editor_ids(&mut self) {
        for node in self.nodes_mut() {
            node.assign_editor_ids();
        }
    }

    /// Remove every editor key
    pub fn strip_editor_ids(&mut self) {
        for node in self.nodes_mut() {
            node.strip_editor_ids();
        }
    }

    fn nodes_mut(&mut self) -> impl Iterator<Item = &mut ElementNode> {
        self.pages_edit
            .iter_mut()
            .chain(self.pages_view.iter_mut())
            .flat_map(|page| page.elements.iter_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_flow_has_one_edit_page() {
        let flow = Flow::new("survey");
        assert_eq!(flow.pages_edit.len(), 1);
        assert_eq!(flow.pages_edit[0].id, "survey-page-1");
        assert!(flow.pages_view.is_empty());
    }

    #[test]
    fn test_next_page_id_skips_taken_ids() {
        let mut flow = Flow::new("survey");
        flow.pages_view.push(Page::new("survey-page-2"));
        assert_eq!(flow.next_page_id(), "survey-page-3");
    }
}
