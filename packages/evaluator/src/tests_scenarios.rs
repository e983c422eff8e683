/// Evaluation scenarios over imported flow documents
use crate::*;
use patternflow_model::{
    import_flow, FieldValue, FieldValues, ViewContext, VisibilityCondition,
};
use serde_json::json;

fn store(value: serde_json::Value) -> FieldValues {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_and_of_field_conditions() {
    let condition = VisibilityCondition::and(vec![
        VisibilityCondition::eq("a", true),
        VisibilityCondition::eq("b", 5),
    ]);

    assert!(evaluate(&condition, &store(json!({ "a": true, "b": 5 })), ViewContext::Edit));
    assert!(!evaluate(&condition, &store(json!({ "a": false, "b": 5 })), ViewContext::Edit));
}

#[test]
fn test_not_consults_first_operand_only() {
    let condition = VisibilityCondition::not(vec![
        VisibilityCondition::eq("x", 1),
        VisibilityCondition::eq("y", 2),
    ]);

    assert!(!evaluate(&condition, &store(json!({ "x": 1, "y": 99 })), ViewContext::Edit));
    assert!(evaluate(&condition, &store(json!({ "x": 0, "y": 2 })), ViewContext::Edit));
}

#[test]
fn test_empty_connectives() {
    let values = FieldValues::new();
    assert!(!evaluate(&VisibilityCondition::or(vec![]), &values, ViewContext::Edit));
    assert!(evaluate(&VisibilityCondition::and(vec![]), &values, ViewContext::Edit));
}

#[test]
fn test_conditions_from_document() {
    let flow = import_flow(
        &json!({
            "id": "survey",
            "pages_edit": [
                { "id": "always", "elements": [] },
                {
                    "id": "adults",
                    "visibility_condition": {
                        "pattern_type": "RelationalFieldOperator",
                        "field_id": "age",
                        "operator": "gte",
                        "value": 18
                    },
                    "elements": [
                        {
                            "element": {
                                "pattern_type": "StringUIElement",
                                "field_id": "employer",
                                "visibility_condition": {
                                    "pattern_type": "LogicalOperator",
                                    "operator": "OR",
                                    "conditions": [
                                        {
                                            "pattern_type": "RelationalFieldOperator",
                                            "field_id": "status",
                                            "operator": "in",
                                            "value_list": ["employed", "self-employed"]
                                        },
                                        {
                                            "pattern_type": "RelationalContextOperator",
                                            "context": "view"
                                        }
                                    ]
                                }
                            }
                        }
                    ]
                }
            ],
            "pages_view": []
        })
        .to_string(),
    )
    .unwrap();

    let minor = store(json!({ "age": 12 }));
    assert_eq!(visible_pages(&flow.pages_edit, &minor, ViewContext::Edit), vec![0]);

    let adult = store(json!({ "age": 40, "status": "retired" }));
    assert_eq!(visible_pages(&flow.pages_edit, &adult, ViewContext::Edit), vec![0, 1]);

    let adult_page = &flow.pages_edit[1].elements;
    assert!(visible_elements(adult_page, &adult, ViewContext::Edit).is_empty());
    assert_eq!(visible_elements(adult_page, &adult, ViewContext::View).len(), 1);

    let employed = store(json!({ "age": 40, "status": "employed" }));
    assert_eq!(visible_elements(adult_page, &employed, ViewContext::Edit).len(), 1);
}

#[test]
fn test_defaults_seed_visibility() {
    let flow = import_flow(
        &json!({
            "id": "pets",
            "pages_edit": [{
                "id": "p1",
                "elements": [
                    { "element": { "pattern_type": "BooleanUIElement", "field_id": "has_pets", "default_value": true } },
                    { "element": {
                        "pattern_type": "NumberUIElement",
                        "field_id": "pet_count",
                        "visibility_condition": {
                            "pattern_type": "RelationalFieldOperator",
                            "field_id": "has_pets",
                            "operator": "eq",
                            "value": true
                        }
                    } }
                ]
            }],
            "pages_view": []
        })
        .to_string(),
    )
    .unwrap();

    let defaults = extract_flow_defaults(&flow);
    assert_eq!(defaults.get("has_pets"), Some(&FieldValue::Boolean(true)));

    let visible = visible_elements(&flow.pages_edit[0].elements, &defaults, ViewContext::Edit);
    assert_eq!(visible.len(), 2);
}
