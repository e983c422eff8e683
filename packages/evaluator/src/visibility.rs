//! # Visibility Evaluation
//!
//! Decides whether pages and elements are shown, given the field-value store
//! and the viewing context. Read-only: nothing here touches the tree.
//!
//! ## Comparison rules
//!
//! - A field with no stored value fails every comparison, `ne` and `nin` included
//! - Values compare by their stored kind (boolean, number, string); a kind
//!   mismatch is unequal and unordered
//! - Ordering is numeric for numbers and lexicographic for strings, so
//!   ISO-8601 dates order correctly; booleans are unordered
//! - A comparison missing its literal (`value`, or `value_list` for
//!   `in`/`nin`) is false

use patternflow_model::{
    Children, ElementNode, FieldValue, FieldValues, LogicalOperator, Page, Path,
    RelationalOperator, ViewContext, VisibilityCondition,
};
use std::cmp::Ordering;
use tracing::trace;

/// Evaluates conditions against one snapshot of field values
#[derive(Debug, Clone, Copy)]
pub struct VisibilityEvaluator<'a> {
    values: &'a FieldValues,
    context: ViewContext,
}

impl<'a> VisibilityEvaluator<'a> {
    pub fn new(values: &'a FieldValues, context: ViewContext) -> Self {
        Self { values, context }
    }

    pub fn context(&self) -> ViewContext {
        self.context
    }

    pub fn evaluate(&self, condition: &VisibilityCondition) -> bool {
        match condition {
            VisibilityCondition::RelationalFieldOperator {
                field_id,
                operator,
                value,
                value_list,
            } => {
                let result = compare_field(
                    self.values.get(field_id),
                    *operator,
                    value.as_ref(),
                    value_list.as_deref(),
                );
                trace!(field_id = %field_id, %operator, result, "Evaluated field condition");
                result
            }

            VisibilityCondition::LogicalOperator {
                operator,
                conditions,
            } => match operator {
                LogicalOperator::And => conditions.iter().all(|c| self.evaluate(c)),
                LogicalOperator::Or => conditions.iter().any(|c| self.evaluate(c)),
                // Negates the first operand only; further operands are ignored.
                // An empty NOT negates nothing and is true.
                LogicalOperator::Not => conditions.first().map_or(true, |c| !self.evaluate(c)),
            },

            VisibilityCondition::RelationalContextOperator { context } => *context == self.context,
        }
    }

    /// Absent condition means always visible
    pub fn is_visible(&self, condition: Option<&VisibilityCondition>) -> bool {
        condition.map_or(true, |c| self.evaluate(c))
    }

    /// Indices of the visible pages
    pub fn visible_pages(&self, pages: &[Page]) -> Vec<usize> {
        pages
            .iter()
            .enumerate()
            .filter(|(_, page)| self.is_visible(page.visibility_condition.as_ref()))
            .map(|(index, _)| index)
            .collect()
    }

    /// Paths of every visible node in `elements`
    ///
    /// A hidden container hides its whole subtree. Custom subflows are not
    /// entered; their lists are addressed separately.
    pub fn visible_elements(&self, elements: &[ElementNode]) -> Vec<Path> {
        let mut visible = Vec::new();
        self.collect_visible(elements, &Path::root(), &mut visible);
        visible
    }

    fn collect_visible(&self, elements: &[ElementNode], parent: &Path, visible: &mut Vec<Path>) {
        for (index, node) in elements.iter().enumerate() {
            if !self.is_visible(node.element.common().visibility_condition.as_ref()) {
                continue;
            }

            let path = parent.child(index);
            match node.element.children() {
                Some(Children::Elements(children)) => {
                    visible.push(path.clone());
                    self.collect_visible(children, &path, visible);
                }
                Some(Children::Chips(chips)) => {
                    visible.push(path.clone());
                    visible.extend(
                        chips
                            .iter()
                            .enumerate()
                            .filter(|(_, chip)| {
                                self.is_visible(chip.common.visibility_condition.as_ref())
                            })
                            .map(|(chip_index, _)| path.child(chip_index)),
                    );
                }
                None => visible.push(path),
            }
        }
    }
}

/// Evaluate a single condition
pub fn evaluate(condition: &VisibilityCondition, values: &FieldValues, context: ViewContext) -> bool {
    VisibilityEvaluator::new(values, context).evaluate(condition)
}

pub fn is_visible(
    condition: Option<&VisibilityCondition>,
    values: &FieldValues,
    context: ViewContext,
) -> bool {
    VisibilityEvaluator::new(values, context).is_visible(condition)
}

pub fn visible_pages(pages: &[Page], values: &FieldValues, context: ViewContext) -> Vec<usize> {
    VisibilityEvaluator::new(values, context).visible_pages(pages)
}

pub fn visible_elements(
    elements: &[ElementNode],
    values: &FieldValues,
    context: ViewContext,
) -> Vec<Path> {
    VisibilityEvaluator::new(values, context).visible_elements(elements)
}

fn compare_field(
    actual: Option<&FieldValue>,
    operator: RelationalOperator,
    value: Option<&FieldValue>,
    value_list: Option<&[FieldValue]>,
) -> bool {
    let Some(actual) = actual else {
        return false;
    };

    match operator {
        RelationalOperator::Eq => value.is_some_and(|v| values_equal(actual, v)),
        RelationalOperator::Ne => value.is_some_and(|v| !values_equal(actual, v)),
        RelationalOperator::Gt => ordering(actual, value).is_some_and(Ordering::is_gt),
        RelationalOperator::Lt => ordering(actual, value).is_some_and(Ordering::is_lt),
        RelationalOperator::Gte => ordering(actual, value).is_some_and(Ordering::is_ge),
        RelationalOperator::Lte => ordering(actual, value).is_some_and(Ordering::is_le),
        RelationalOperator::In => {
            value_list.is_some_and(|list| list.iter().any(|v| values_equal(actual, v)))
        }
        RelationalOperator::Nin => {
            value_list.is_some_and(|list| !list.iter().any(|v| values_equal(actual, v)))
        }
    }
}

fn values_equal(left: &FieldValue, right: &FieldValue) -> bool {
    match (left, right) {
        (FieldValue::Boolean(a), FieldValue::Boolean(b)) => a == b,
        (FieldValue::Number(a), FieldValue::Number(b)) => a.as_f64() == b.as_f64(),
        (FieldValue::Text(a), FieldValue::Text(b)) => a == b,
        _ => false,
    }
}

fn ordering(left: &FieldValue, right: Option<&FieldValue>) -> Option<Ordering> {
    match (left, right?) {
        (FieldValue::Number(a), FieldValue::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (FieldValue::Text(a), FieldValue::Text(b)) => Some(a.cmp(b)),
        _ => None,
    }
}
