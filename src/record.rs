use serde_json::{Map, Value};

use crate::coerce::{resolve_field_value, CoercerRegistry};
use crate::error::CoercionError;
use crate::schema::Schema;

/// Resolves every schema field against the raw data record and assembles the
/// nested parameter record. Dotted field names nest: `"a.b"` lands at
/// `{"a": {"b": ...}}`. Fields that resolve to "omit" write no key at all.
pub fn build_parameter_record(
    data: &Map<String, Value>,
    schema: &Schema,
    coercers: &CoercerRegistry,
) -> Result<Map<String, Value>, CoercionError> {
    let mut record = Map::new();
    for (name, field) in schema {
        let raw = data.get(name).cloned();
        let Some(value) = resolve_field_value(raw, field, coercers)? else {
            continue;
        };
        insert_dotted(&mut record, name, value);
    }
    Ok(record)
}

fn insert_dotted(record: &mut Map<String, Value>, path: &str, value: Value) {
    let segments: Vec<&str> = path.split('.').collect();
    let (last, parents) = segments
        .split_last()
        .expect("split always yields at least one segment");

    let mut current = record;
    for segment in parents {
        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        // a non-object in the way is replaced, matching the schema's claim
        // that dotted names denote nested objects
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        current = entry.as_object_mut().expect("entry was just made an object");
    }
    current.insert(last.to_string(), value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::parse_schema;
    use serde_json::json;

    fn data(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn dotted_names_merge_into_one_object() {
        let schema = parse_schema(
            r#"{
                "a.b": { "type": "string", "title": "B", "required": false, "description": "" },
                "a.c": { "type": "string", "title": "C", "required": false, "description": "" }
            }"#,
        )
        .unwrap();
        let record = build_parameter_record(
            &data(json!({ "a.b": "one", "a.c": "two" })),
            &schema,
            &CoercerRegistry::builtin(),
        )
        .unwrap();
        assert_eq!(
            Value::Object(record),
            json!({ "a": { "b": "one", "c": "two" } })
        );
    }

    #[test]
    fn omitted_fields_create_no_keys() {
        let schema = parse_schema(
            r#"{
                "a.b": { "type": "string", "title": "B", "required": false, "description": "" },
                "c": { "type": "string", "title": "C", "required": false, "description": "" }
            }"#,
        )
        .unwrap();
        let record = build_parameter_record(
            &data(json!({ "a.b": "", "c": "kept" })),
            &schema,
            &CoercerRegistry::builtin(),
        )
        .unwrap();
        assert_eq!(Value::Object(record), json!({ "c": "kept" }));
    }

    #[test]
    fn empty_schema_builds_empty_record() {
        let schema = parse_schema("{}").unwrap();
        let record = build_parameter_record(
            &data(json!({ "ignored": 1 })),
            &schema,
            &CoercerRegistry::builtin(),
        )
        .unwrap();
        assert!(record.is_empty());
    }

    #[test]
    fn failures_surface_in_schema_order() {
        let schema = parse_schema(
            r#"{
                "second": { "type": "string", "title": "Second", "required": true, "description": "" },
                "first": { "type": "string", "title": "First", "required": true, "description": "" }
            }"#,
        )
        .unwrap();
        let err = build_parameter_record(
            &data(json!({})),
            &schema,
            &CoercerRegistry::builtin(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Custom parameter \"Second\" is required");
    }
}
