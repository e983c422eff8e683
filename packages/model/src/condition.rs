//! # Visibility Conditions
//!
//! Boolean expression trees attached to pages and elements. A condition is
//! evaluated against the flat field-value store and the current viewing
//! context; evaluation itself lives in `patternflow-evaluator`.

use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::collections::HashMap;
use std::fmt;
use strum::{Display, EnumString};

/// A value held by the field-value store
///
/// Numbers keep their JSON form, so an integer literal is written back as an
/// integer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Boolean(bool),
    Number(Number),
    Text(String),
}

/// Field identifier → current value
pub type FieldValues = HashMap<String, FieldValue>;

impl FieldValue {
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Boolean(_) => "boolean",
            FieldValue::Number(_) => "number",
            FieldValue::Text(_) => "string",
        }
    }

    /// Numeric value for comparisons; integers and floats compare alike
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Boolean(b) => write!(f, "{}", b),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<Number> for FieldValue {
    fn from(value: Number) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value.into())
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Number(value.into())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// Comparison operators of a field condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RelationalOperator {
    Eq,
    Ne,
    Gt,
    Lt,
    Gte,
    Lte,
    In,
    Nin,
}

impl RelationalOperator {
    /// `in`/`nin` compare against `value_list` instead of `value`
    pub fn uses_value_list(self) -> bool {
        matches!(self, RelationalOperator::In | RelationalOperator::Nin)
    }
}

/// Boolean connectives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum LogicalOperator {
    And,
    Or,
    Not,
}

/// The context a flow is currently being looked at in
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ViewContext {
    #[default]
    Edit,
    View,
}

/// Condition expression node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "pattern_type")]
pub enum VisibilityCondition {
    /// Compare a field value against a literal or a literal list
    RelationalFieldOperator {
        field_id: String,
        operator: RelationalOperator,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<FieldValue>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value_list: Option<Vec<FieldValue>>,
    },

    /// Combine child conditions
    LogicalOperator {
        operator: LogicalOperator,
        #[serde(default)]
        conditions: Vec<VisibilityCondition>,
    },

    /// Test the viewing context
    RelationalContextOperator { context: ViewContext },
}

impl VisibilityCondition {
    /// Single-value field comparison
    pub fn field(
        field_id: impl Into<String>,
        operator: RelationalOperator,
        value: impl Into<FieldValue>,
    ) -> Self {
        VisibilityCondition::RelationalFieldOperator {
            field_id: field_id.into(),
            operator,
            value: Some(value.into()),
            value_list: None,
        }
    }

    /// List comparison (`in` / `nin`)
    pub fn field_list(
        field_id: impl Into<String>,
        operator: RelationalOperator,
        values: Vec<FieldValue>,
    ) -> Self {
        VisibilityCondition::RelationalFieldOperator {
            field_id: field_id.into(),
            operator,
            value: None,
            value_list: Some(values),
        }
    }

    pub fn eq(field_id: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::field(field_id, RelationalOperator::Eq, value)
    }

    pub fn and(conditions: Vec<VisibilityCondition>) -> Self {
        VisibilityCondition::LogicalOperator {
            operator: LogicalOperator::And,
            conditions,
        }
    }

    pub fn or(conditions: Vec<VisibilityCondition>) -> Self {
        VisibilityCondition::LogicalOperator {
            operator: LogicalOperator::Or,
            conditions,
        }
    }

    pub fn not(conditions: Vec<VisibilityCondition>) -> Self {
        VisibilityCondition::LogicalOperator {
            operator: LogicalOperator::Not,
            conditions,
        }
    }

    pub fn context(context: ViewContext) -> Self {
        VisibilityCondition::RelationalContextOperator { context }
    }

    /// Field identifiers referenced anywhere in this expression
    pub fn referenced_fields(&self) -> Vec<&str> {
        let mut fields = Vec::new();
        self.collect_fields(&mut fields);
        fields
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            VisibilityCondition::RelationalFieldOperator { field_id, .. } => {
                if !out.contains(&field_id.as_str()) {
                    out.push(field_id);
                }
            }
            VisibilityCondition::LogicalOperator { conditions, .. } => {
                for condition in conditions {
                    condition.collect_fields(out);
                }
            }
            VisibilityCondition::RelationalContextOperator { .. } => {}
        }
    }
}
