//! # Patternflow Evaluator
//!
//! Read-only evaluation over a flow:
//!
//! - [`VisibilityEvaluator`]: visibility conditions against field values and
//!   the viewing context
//! - [`extract_defaults`]: initial field values declared in the tree

pub mod defaults;
pub mod visibility;

#[cfg(test)]
mod tests_scenarios;

pub use defaults::{extract_defaults, extract_flow_defaults};
pub use visibility::{evaluate, is_visible, visible_elements, visible_pages, VisibilityEvaluator};
