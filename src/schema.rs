use anyhow::{anyhow, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

/// Ordered mapping from (possibly dotted) field name to its declaration.
/// Insertion order follows the schema document so coercion failures surface
/// in a deterministic order.
pub type Schema = IndexMap<String, FieldSchema>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Connection,
    String,
    Int,
    Bool,
    StringArray,
    StringToString,
    Select,
    /// Unknown declared types pass raw values through unchanged.
    #[serde(other)]
    Other,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FieldSchema {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: String,
    /// Type-specific options blob, e.g. `{"multiple": true}` for selects.
    #[serde(default)]
    pub options: Option<Value>,
}

impl FieldSchema {
    pub fn multiple(&self) -> bool {
        self.options
            .as_ref()
            .and_then(|options| options.get("multiple"))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

pub fn parse_schema(blob: &str) -> Result<Schema> {
    serde_json::from_str(blob).map_err(|err| anyhow!("invalid custom params schema: {err}"))
}
