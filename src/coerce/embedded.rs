use serde_json::{Map, Value};

use crate::error::CoercionError;
use crate::schema::{FieldSchema, FieldType};

use super::Coerced;

/// Runs the embedded coercer selected by the field's declared type. This is
/// the first, unconditional coercion stage; unknown types pass through.
pub fn coerce_embedded(value: Coerced, field: &FieldSchema) -> Result<Coerced, CoercionError> {
    match field.field_type {
        FieldType::Connection => Ok(coerce_connection(value, field)),
        FieldType::String => Ok(coerce_string(value)),
        FieldType::Int => Ok(coerce_int(value, field)),
        FieldType::Bool => Ok(coerce_bool(value, field)),
        FieldType::StringArray => coerce_string_array(value, field),
        FieldType::StringToString => coerce_string_map(value, field),
        FieldType::Select => coerce_select(value, field),
        FieldType::Other => Ok(value),
    }
}

/// Shared string rule: the `"null"` literal becomes an explicit null, the
/// empty string becomes "omit", non-strings take their display form.
pub fn coerce_string(value: Coerced) -> Coerced {
    match value {
        None => None,
        Some(Value::String(text)) => match text.as_str() {
            "null" => Some(Value::Null),
            "" => None,
            _ => Some(Value::String(text)),
        },
        Some(Value::Null) => Some(Value::String("null".to_string())),
        Some(Value::Bool(flag)) => Some(Value::String(flag.to_string())),
        Some(Value::Number(number)) => Some(Value::String(number.to_string())),
        // arrays and objects stringify to their compact JSON form
        Some(other) => Some(Value::String(other.to_string())),
    }
}

fn coerce_connection(value: Coerced, field: &FieldSchema) -> Coerced {
    let nullish = match &value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.is_empty(),
        _ => false,
    };
    if nullish {
        return if field.required { Some(Value::Null) } else { None };
    }
    match value {
        // connection blobs arrive as JSON text; anything unparseable is
        // handed back verbatim, never an error
        Some(Value::String(text)) => match serde_json::from_str::<Value>(&text) {
            Ok(parsed) => Some(parsed),
            Err(_) => Some(Value::String(text)),
        },
        other => other,
    }
}

fn coerce_int(value: Coerced, field: &FieldSchema) -> Coerced {
    // zero from an optional int field means "left blank in the form"
    let blank = matches!(&value, Some(Value::Number(n)) if n.as_f64() == Some(0.0));
    if !field.required && blank {
        None
    } else {
        value
    }
}

fn coerce_bool(value: Coerced, field: &FieldSchema) -> Coerced {
    if !field.required && value == Some(Value::Bool(false)) {
        None
    } else {
        value
    }
}

fn coerce_string_array(value: Coerced, field: &FieldSchema) -> Result<Coerced, CoercionError> {
    let Some(Value::Array(items)) = value else {
        return Err(CoercionError::TypeMismatch {
            title: field.title.clone(),
            expected: "an array",
        });
    };
    let mapped = items
        .into_iter()
        .map(|item| coerce_string(Some(item)).unwrap_or(Value::Null))
        .collect();
    Ok(Some(Value::Array(mapped)))
}

fn coerce_string_map(value: Coerced, field: &FieldSchema) -> Result<Coerced, CoercionError> {
    let Some(Value::Object(entries)) = value else {
        return Err(CoercionError::TypeMismatch {
            title: field.title.clone(),
            expected: "an object",
        });
    };
    let mapped = entries
        .into_iter()
        .map(|(key, item)| (key, coerce_string(Some(item)).unwrap_or(Value::Null)))
        .collect::<Map<_, _>>();
    Ok(Some(Value::Object(mapped)))
}

fn coerce_select(value: Coerced, field: &FieldSchema) -> Result<Coerced, CoercionError> {
    let value = match value {
        None => return Ok(None),
        Some(Value::Null) => return Ok(Some(Value::Null)),
        Some(value) => value,
    };
    // the selection UI always submits an array, even for single-select
    let Value::Array(items) = value else {
        return Err(CoercionError::TypeMismatch {
            title: field.title.clone(),
            expected: "an array",
        });
    };
    if field.multiple() {
        Ok(Some(Value::Array(items)))
    } else {
        Ok(items.into_iter().next())
    }
}
