use serde_json::{json, Value};

use flownode_params::{
    resolve_field_value, CoercerRegistry, FieldSchema, FieldType,
};

fn field(field_type: FieldType, required: bool, description: &str) -> FieldSchema {
    FieldSchema {
        field_type,
        title: "Custom parameter".to_string(),
        required,
        description: description.to_string(),
        options: None,
    }
}

fn resolve(raw: Value, field: &FieldSchema) -> Result<Option<Value>, String> {
    resolve_field_value(Some(raw), field, &CoercerRegistry::builtin())
        .map_err(|err| err.to_string())
}

#[test]
fn string_json_hint_parses_value() {
    let schema = field(FieldType::String, false, "**JSON** payload");
    assert_eq!(
        resolve(json!("{\"x\":[1,2]}"), &schema).unwrap(),
        Some(json!({ "x": [1, 2] }))
    );
}

#[test]
fn string_json_hint_failure_names_the_field() {
    let schema = field(FieldType::String, false, "**JSON** payload");
    let message = resolve(json!("not json"), &schema).unwrap_err();
    assert!(
        message.starts_with("Can't parse \"Custom parameter\" parameter value as json type:"),
        "unexpected message: {message}"
    );
}

#[test]
fn string_date_hint_normalizes_to_rfc3339() {
    let schema = field(FieldType::String, false, "**Date** pick one");
    assert_eq!(
        resolve(json!("2024-03-01T12:00:00Z"), &schema).unwrap(),
        Some(json!("2024-03-01T12:00:00+00:00"))
    );
}

#[test]
fn empty_optional_custom_field_is_omitted() {
    let schema = field(FieldType::String, false, "**JSON** payload");
    assert_eq!(resolve(json!(""), &schema).unwrap(), None);
}

#[test]
fn empty_required_custom_field_fails() {
    let schema = field(FieldType::String, true, "**JSON** payload");
    assert_eq!(
        resolve(json!(""), &schema).unwrap_err(),
        "Custom parameter \"Custom parameter\" is required"
    );
}

#[test]
fn string_array_json_items_parse_individually() {
    let schema = field(FieldType::StringArray, false, "**JSON** entries");
    assert_eq!(
        resolve(json!(["{\"x\":1}", "[1,2]"]), &schema).unwrap(),
        Some(json!([{ "x": 1 }, [1, 2]]))
    );
}

#[test]
fn string_array_item_failure_names_index() {
    let schema = field(FieldType::StringArray, false, "**JSON** entries");
    let message = resolve(json!(["{\"x\":1}", "bad json"]), &schema).unwrap_err();
    assert!(
        message.starts_with(
            "Can't parse \"Custom parameter\" parameter item at index 1 as json type:"
        ),
        "unexpected message: {message}"
    );
}

#[test]
fn string_array_date_item_failure_names_index() {
    let schema = field(FieldType::StringArray, false, "**Date** entries");
    let message = resolve(json!(["2024-03-01", "yesterday-ish"]), &schema).unwrap_err();
    assert!(
        message.contains("item at index 1 as date type: Invalid Date - \"yesterday-ish\""),
        "unexpected message: {message}"
    );
}

#[test]
fn string_map_json_values_parse_per_key() {
    let schema = field(FieldType::StringToString, false, "**JSON** values");
    assert_eq!(
        resolve(json!({ "a": "{\"n\":1}", "b": "true" }), &schema).unwrap(),
        Some(json!({ "a": { "n": 1 }, "b": true }))
    );
}

#[test]
fn string_map_value_failure_names_key() {
    let schema = field(FieldType::StringToString, false, "**JSON** values");
    let message = resolve(json!({ "good": "1", "bad": "nope" }), &schema).unwrap_err();
    assert!(
        message.starts_with(
            "Can't parse \"Custom parameter\" parameter value at key \"bad\" as json type:"
        ),
        "unexpected message: {message}"
    );
}

#[test]
fn hint_is_case_insensitive() {
    let upper = field(FieldType::String, false, "**JSON** payload");
    let lower = field(FieldType::String, false, "**json** payload");
    assert_eq!(
        resolve(json!("[1]"), &upper).unwrap(),
        resolve(json!("[1]"), &lower).unwrap()
    );
}
