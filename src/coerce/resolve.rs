use serde_json::{Map, Value};

use crate::error::CoercionError;
use crate::notation::extract_field_type_notation;
use crate::schema::{FieldSchema, FieldType};

use super::custom::{CoercerRegistry, CustomCoercer};
use super::embedded::coerce_embedded;
use super::Coerced;

/// Resolves one field: embedded coercion, then the custom coercer named by
/// the description hint (per element for container types), then the
/// required-field check. Every coercer failure is re-wrapped with the field
/// title before it propagates; the original failure stays as the cause.
pub fn resolve_field_value(
    raw: Coerced,
    field: &FieldSchema,
    coercers: &CoercerRegistry,
) -> Result<Coerced, CoercionError> {
    let mut value = coerce_embedded(raw, field)?;

    if let Some(type_name) = extract_field_type_notation(&field.description) {
        if let Some(coercer) = coercers.get(&type_name) {
            value = apply_custom(value, field, &type_name, coercer.as_ref())?;
        }
    }

    if field.required && matches!(value, None | Some(Value::Null)) {
        return Err(CoercionError::Required {
            title: field.title.clone(),
        });
    }
    Ok(value)
}

fn apply_custom(
    value: Coerced,
    field: &FieldSchema,
    type_name: &str,
    coercer: &dyn CustomCoercer,
) -> Result<Coerced, CoercionError> {
    match field.field_type {
        FieldType::StringArray => {
            let Some(Value::Array(items)) = value else {
                return Err(CoercionError::TypeMismatch {
                    title: field.title.clone(),
                    expected: "an array",
                });
            };
            let mut coerced = Vec::with_capacity(items.len());
            for (index, item) in items.into_iter().enumerate() {
                let item = coercer.coerce(Some(item), field).map_err(|err| {
                    CoercionError::ItemParse {
                        title: field.title.clone(),
                        index,
                        type_name: type_name.to_string(),
                        source: err.into(),
                    }
                })?;
                coerced.push(item.unwrap_or(Value::Null));
            }
            Ok(Some(Value::Array(coerced)))
        }
        FieldType::StringToString => {
            let Some(Value::Object(entries)) = value else {
                return Err(CoercionError::TypeMismatch {
                    title: field.title.clone(),
                    expected: "an object",
                });
            };
            let mut coerced = Map::new();
            for (key, item) in entries {
                let item = coercer.coerce(Some(item), field).map_err(|err| {
                    CoercionError::EntryParse {
                        title: field.title.clone(),
                        key: key.clone(),
                        type_name: type_name.to_string(),
                        source: err.into(),
                    }
                })?;
                coerced.insert(key, item.unwrap_or(Value::Null));
            }
            Ok(Some(Value::Object(coerced)))
        }
        _ => coercer
            .coerce(value, field)
            .map_err(|err| CoercionError::ValueParse {
                title: field.title.clone(),
                type_name: type_name.to_string(),
                source: err.into(),
            }),
    }
}
