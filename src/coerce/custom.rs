use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

use crate::schema::FieldSchema;

use super::Coerced;

/// Secondary coercion stage, keyed by the type name a field description
/// carries in its leading bold token. Runs on the embedded coercer's output.
pub trait CustomCoercer: Send + Sync {
    fn coerce(&self, value: Coerced, field: &FieldSchema) -> Result<Coerced>;
}

impl<F> CustomCoercer for F
where
    F: Fn(Coerced, &FieldSchema) -> Result<Coerced> + Send + Sync,
{
    fn coerce(&self, value: Coerced, field: &FieldSchema) -> Result<Coerced> {
        (self)(value, field)
    }
}

/// Registry of custom coercers by lower-cased type name. Callers extend it
/// via [`CoercerRegistry::merge`]; caller entries win on name collision.
#[derive(Clone, Default)]
pub struct CoercerRegistry {
    entries: HashMap<String, Arc<dyn CustomCoercer>>,
}

impl CoercerRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register("json", coerce_json);
        registry.register("date", coerce_date);
        registry
    }

    pub fn register<C>(&mut self, name: impl Into<String>, coercer: C)
    where
        C: CustomCoercer + 'static,
    {
        self.entries
            .insert(name.into().to_lowercase(), Arc::new(coercer));
    }

    pub fn merge(&mut self, overrides: CoercerRegistry) {
        for (name, coercer) in overrides.entries {
            self.entries.insert(name, coercer);
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn CustomCoercer>> {
        self.entries.get(name).cloned()
    }
}

fn coerce_json(value: Coerced, _field: &FieldSchema) -> Result<Coerced> {
    match value {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(Value::Null)),
        Some(Value::String(text)) => {
            let parsed: Value = serde_json::from_str(&text)?;
            Ok(Some(parsed))
        }
        other => Ok(other),
    }
}

fn coerce_date(value: Coerced, _field: &FieldSchema) -> Result<Coerced> {
    let value = match value {
        None => return Ok(None),
        Some(Value::Null) => return Ok(Some(Value::Null)),
        Some(value) => value,
    };
    let (parsed, shown) = match &value {
        Value::Number(number) => {
            let millis = number
                .as_i64()
                .or_else(|| number.as_f64().map(|millis| millis as i64));
            (millis.and_then(parse_epoch_millis), number.to_string())
        }
        Value::String(text) => (parse_date_text(text), text.clone()),
        other => return Err(anyhow!("expected a string or number date, got {other}")),
    };
    match parsed {
        Some(formatted) => Ok(Some(Value::String(formatted))),
        None => Err(anyhow!("Invalid Date - \"{shown}\"")),
    }
}

fn parse_epoch_millis(millis: i64) -> Option<String> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(|date| date.to_rfc3339())
}

fn parse_date_text(text: &str) -> Option<String> {
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.to_rfc3339());
    }
    if let Ok(date) = DateTime::parse_from_rfc2822(text) {
        return Some(date.to_rfc3339());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive).to_rfc3339());
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0)?;
        return Some(Utc.from_utc_datetime(&midnight).to_rfc3339());
    }
    None
}
