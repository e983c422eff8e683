//! # Default Field Values
//!
//! Collects `field_id → default_value` from a page's element tree to seed the
//! field-value store when a flow is loaded. Groups, arrays and chip groups are
//! walked; Custom subflows are left to the custom element's own renderer.

use patternflow_model::{
    walk_node, BooleanElement, CustomElement, ElementNode, FieldValue, FieldValues, Flow, Visitor,
};
use tracing::debug;

#[derive(Default)]
struct DefaultCollector {
    defaults: FieldValues,
}

impl DefaultCollector {
    fn record(&mut self, field_id: &str, value: FieldValue) {
        // Later occurrences of a field win
        self.defaults.insert(field_id.to_string(), value);
    }
}

impl Visitor for DefaultCollector {
    fn visit_node(&mut self, node: &ElementNode) {
        if let (Some(field_id), Some(value)) = (node.element.field_id(), node.element.default_value())
        {
            self.record(field_id, value);
        }
        walk_node(self, node);
    }

    fn visit_chip(&mut self, chip: &BooleanElement) {
        if let Some(value) = chip.default_value {
            self.record(&chip.field_id, FieldValue::Boolean(value));
        }
    }

    fn visit_custom(&mut self, _custom: &CustomElement) {}
}

/// Defaults declared in one element list
pub fn extract_defaults(elements: &[ElementNode]) -> FieldValues {
    let mut collector = DefaultCollector::default();
    for node in elements {
        collector.visit_node(node);
    }
    collector.defaults
}

/// Defaults of every edit page, merged in page order
pub fn extract_flow_defaults(flow: &Flow) -> FieldValues {
    let mut collector = DefaultCollector::default();
    collector.visit_flow(flow);
    debug!(flow_id = %flow.id, fields = collector.defaults.len(), "Extracted default values");
    collector.defaults
}
