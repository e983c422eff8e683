use crate::element::{BooleanElement, CustomElement, ElementNode, PatternElement, Subflow};
use crate::flow::{Flow, Page};

/// Visitor pattern for traversing element trees immutably
///
/// Default implementations walk the entire tree, including chips and
/// subflows. Override specific visit_* methods to act on nodes or to stop
/// the walk from descending.
pub trait Visitor: Sized {
    fn visit_flow(&mut self, flow: &Flow) {
        walk_flow(self, flow);
    }

    fn visit_page(&mut self, page: &Page) {
        walk_elements(self, &page.elements);
    }

    fn visit_node(&mut self, node: &ElementNode) {
        walk_node(self, node);
    }

    fn visit_chip(&mut self, _chip: &BooleanElement) {
        // Leaf node, no children to walk
    }

    fn visit_custom(&mut self, custom: &CustomElement) {
        walk_custom(self, custom);
    }

    fn visit_subflow(&mut self, subflow: &Subflow) {
        walk_elements(self, &subflow.elements);
    }
}

pub fn walk_flow<V: Visitor>(visitor: &mut V, flow: &Flow) {
    for page in &flow.pages_edit {
        visitor.visit_page(page);
    }
}

pub fn walk_elements<V: Visitor>(visitor: &mut V, elements: &[ElementNode]) {
    for node in elements {
        visitor.visit_node(node);
    }
}

pub fn walk_node<V: Visitor>(visitor: &mut V, node: &ElementNode) {
    match &node.element {
        PatternElement::Group(group) => walk_elements(visitor, &group.elements),
        PatternElement::Array(array) => walk_elements(visitor, &array.elements),
        PatternElement::ChipGroup(chip_group) => {
            for chip in &chip_group.chips {
                visitor.visit_chip(chip);
            }
        }
        PatternElement::Custom(custom) => visitor.visit_custom(custom),
        PatternElement::Text(_)
        | PatternElement::Boolean(_)
        | PatternElement::SingleSelection(_)
        | PatternElement::Number(_)
        | PatternElement::Date(_)
        | PatternElement::File(_)
        | PatternElement::String(_)
        | PatternElement::KeyValueList(_) => {
            // Leaf nodes
        }
    }
}

pub fn walk_custom<V: Visitor>(visitor: &mut V, custom: &CustomElement) {
    for subflow in custom.subflows.iter().flatten() {
        visitor.visit_subflow(subflow);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::*;

    #[derive(Default)]
    struct FieldCollector {
        fields: Vec<String>,
    }

    impl Visitor for FieldCollector {
        fn visit_node(&mut self, node: &ElementNode) {
            if let Some(field_id) = node.element.field_id() {
                self.fields.push(field_id.to_string());
            }
            walk_node(self, node);
        }

        fn visit_chip(&mut self, chip: &BooleanElement) {
            self.fields.push(chip.field_id.clone());
        }
    }

    #[test]
    fn test_walks_every_container_kind() {
        let page = Page::new("p").with_elements(vec![
            ElementNode::new(GroupElement::new(vec![
                ElementNode::new(StringElement::new("name")),
                ElementNode::new(ChipGroupElement::new(vec![BooleanElement::new("chip")])),
            ])),
            ElementNode::new(CustomElement::new(
                "rooms",
                vec![Subflow::new(
                    "ROOM",
                    vec![ElementNode::new(NumberElement::new("area"))],
                )],
            )),
        ]);

        let mut collector = FieldCollector::default();
        collector.visit_page(&page);
        assert_eq!(collector.fields, vec!["name", "chip", "area"]);
    }
}
