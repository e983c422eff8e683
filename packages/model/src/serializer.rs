//! # Flow Import / Export
//!
//! ```text
//! import: JSON text → Flow (+ fresh editor keys)
//! export: Flow → strip editor keys → canonical JSON text
//! ```
//!
//! The in-memory tree differs from the persisted document only by the
//! editor keys on [`ElementNode`](crate::ElementNode) envelopes. Attributes
//! the model does not name are kept in `extra` maps, and numbers keep their
//! integer or float form.

use crate::error::{ExportError, ImportError, ImportResult};
use crate::flow::Flow;
use std::collections::HashSet;
use tracing::{debug, info};

/// Parse a flow document and prepare it for editing
pub fn import_flow(source: &str) -> ImportResult<Flow> {
    let mut flow: Flow = serde_json::from_str(source)?;
    validate_structure(&flow)?;
    flow.assign_editor_ids();

    info!(
        flow_id = %flow.id,
        pages_edit = flow.pages_edit.len(),
        pages_view = flow.pages_view.len(),
        "Imported flow"
    );
    Ok(flow)
}

/// Serialize a flow as its persisted document, without editor keys
pub fn export_flow(flow: &Flow) -> Result<String, ExportError> {
    let value = export_value(flow)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Persisted document as a JSON value
pub fn export_value(flow: &Flow) -> Result<serde_json::Value, ExportError> {
    let mut persisted = flow.clone();
    persisted.strip_editor_ids();
    debug!(flow_id = %flow.id, "Exporting flow");
    Ok(serde_json::to_value(&persisted)?)
}

fn validate_structure(flow: &Flow) -> ImportResult<()> {
    if flow.id.trim().is_empty() {
        return Err(ImportError::structure("flow id is empty"));
    }

    for (kind, pages) in [("pages_edit", &flow.pages_edit), ("pages_view", &flow.pages_view)] {
        let mut seen = HashSet::new();
        for (index, page) in pages.iter().enumerate() {
            if page.id.trim().is_empty() {
                return Err(ImportError::structure(format!(
                    "{}[{}] has an empty id",
                    kind, index
                )));
            }
            if !seen.insert(page.id.as_str()) {
                return Err(ImportError::structure(format!(
                    "{} contains duplicate page id '{}'",
                    kind, page.id
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Variant;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "id": "survey",
            "title": { "en": "Survey" },
            "schema_version": "2",
            "pages_edit": [{
                "id": "p1",
                "related_page_id": "v1",
                "progress_weight": 3,
                "elements": [{
                    "element": {
                        "pattern_type": "GroupUIElement",
                        "elements": [
                            { "element": { "pattern_type": "BooleanUIElement", "field_id": "f1", "default_value": true } },
                            {
                                "element": {
                                    "pattern_type": "NumberUIElement",
                                    "field_id": "rooms",
                                    "minimum": 1,
                                    "maximum": 12.5,
                                    "placeholder": { "en": "x" },
                                    "visibility_condition": {
                                        "pattern_type": "RelationalFieldOperator",
                                        "field_id": "floors",
                                        "operator": "gte",
                                        "value": 5
                                    }
                                }
                            }
                        ]
                    }
                }]
            }],
            "pages_view": [{ "id": "v1", "elements": [] }]
        })
    }

    #[test]
    fn test_import_assigns_editor_ids() {
        let flow = import_flow(&sample().to_string()).unwrap();
        let group = &flow.pages_edit[0].elements[0];
        assert_eq!(group.variant(), Variant::Group);
        assert!(group.id.is_some());
    }

    #[test]
    fn test_export_strips_editor_ids() {
        let flow = import_flow(&sample().to_string()).unwrap();
        let exported = export_value(&flow).unwrap();
        assert_eq!(exported, sample());
    }

    #[test]
    fn test_export_keeps_integers_and_unknown_attributes() {
        let flow = import_flow(&sample().to_string()).unwrap();
        assert_eq!(flow.extra.get("schema_version"), Some(&json!("2")));

        let exported: serde_json::Value =
            serde_json::from_str(&export_flow(&flow).unwrap()).unwrap();
        let rooms = &exported["pages_edit"][0]["elements"][0]["element"]["elements"][1]["element"];
        assert!(rooms["minimum"].is_u64());
        assert!(rooms["maximum"].is_f64());
        assert!(rooms["visibility_condition"]["value"].is_u64());
        assert_eq!(rooms["placeholder"], json!({ "en": "x" }));
        assert_eq!(exported["pages_edit"][0]["progress_weight"], json!(3));
        assert_eq!(exported["schema_version"], json!("2"));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = import_flow("{ not json").unwrap_err();
        assert!(matches!(err, ImportError::Json(_)));
    }

    #[test]
    fn test_rejects_missing_required_fields() {
        let err = import_flow(r#"{ "id": "x", "pages_edit": [] }"#).unwrap_err();
        assert!(matches!(err, ImportError::Json(_)));
    }

    #[test]
    fn test_rejects_duplicate_page_ids() {
        let doc = json!({
            "id": "x",
            "pages_edit": [{ "id": "a" }, { "id": "a" }],
            "pages_view": []
        });
        let err = import_flow(&doc.to_string()).unwrap_err();
        assert!(matches!(err, ImportError::Structure(_)));
    }
}
