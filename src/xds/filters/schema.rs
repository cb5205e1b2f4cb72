//! JSON Schema backed filter configurations.
//!
//! Third-party protocol filters have no Rust type in this crate. Their
//! configuration is accepted as JSON and validated against a JSON Schema
//! (draft 7) before encoding. Object schemas are closed: a `properties` block
//! without `additionalProperties` is treated as `additionalProperties: false`,
//! so unknown fields fail the same way they do for the typed protocol filters.

use crate::errors::EncodingError;
use crate::xds::filters::FilterConfig;
use jsonschema::{Draft, Validator};
use serde_json::{Map as JsonMap, Value as JsonValue};
use std::fmt;
use std::sync::Arc;

/// Compile a schema with closed object semantics.
pub fn compile_strict(schema_name: &str, schema: &JsonValue) -> Result<Arc<Validator>, EncodingError> {
    let mut closed = schema.clone();
    close_object_schemas(&mut closed);

    Validator::options().with_draft(Draft::Draft7).build(&closed).map(Arc::new).map_err(|e| {
        EncodingError::InvalidSchema { schema: schema_name.to_string(), message: e.to_string() }
    })
}

/// Mark object schemas as not accepting undeclared properties.
///
/// Recurses through `properties`, `items`, `definitions` and `$defs`.
/// Combinator branches (`allOf`/`anyOf`/`oneOf`) are left open because
/// closing them would reject properties declared by sibling branches.
fn close_object_schemas(schema: &mut JsonValue) {
    let JsonValue::Object(map) = schema else {
        return;
    };

    if map.contains_key("properties")
        && !map.contains_key("additionalProperties")
        && !map.contains_key("patternProperties")
    {
        map.insert("additionalProperties".to_string(), JsonValue::Bool(false));
    }

    if let Some(JsonValue::Object(properties)) = map.get_mut("properties") {
        properties.values_mut().for_each(close_object_schemas);
    }

    match map.get_mut("items") {
        Some(JsonValue::Array(items)) => items.iter_mut().for_each(close_object_schemas),
        Some(items @ JsonValue::Object(_)) => close_object_schemas(items),
        _ => {}
    }

    for key in ["definitions", "$defs"] {
        if let Some(JsonValue::Object(defs)) = map.get_mut(key) {
            defs.values_mut().for_each(close_object_schemas);
        }
    }
}

/// Filter configuration validated against a JSON Schema at encode time.
#[derive(Clone)]
pub struct SchemaFilterConfig {
    schema_name: String,
    validator: Arc<Validator>,
    value: JsonValue,
}

impl SchemaFilterConfig {
    /// Compile `schema` and attach it to `value`.
    pub fn new<S: Into<String>>(
        schema_name: S,
        schema: &JsonValue,
        value: JsonValue,
    ) -> Result<Self, EncodingError> {
        let schema_name = schema_name.into();
        let validator = compile_strict(&schema_name, schema)?;
        Ok(Self { schema_name, validator, value })
    }
}

impl fmt::Debug for SchemaFilterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaFilterConfig")
            .field("schema_name", &self.schema_name)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

impl FilterConfig for SchemaFilterConfig {
    fn to_structured(&self) -> Result<JsonMap<String, JsonValue>, EncodingError> {
        let errors: Vec<String> = self
            .validator
            .iter_errors(&self.value)
            .map(|e| {
                let path = e.instance_path.to_string();
                if path.is_empty() {
                    e.to_string()
                } else {
                    format!("{}: {}", path, e)
                }
            })
            .collect();

        if !errors.is_empty() {
            return Err(EncodingError::schema_mismatch(&self.schema_name, errors.join("; ")));
        }

        match &self.value {
            JsonValue::Object(map) => Ok(map.clone()),
            other => Err(EncodingError::not_an_object(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn redis_schema() -> JsonValue {
        json!({
            "type": "object",
            "required": ["stat_prefix"],
            "properties": {
                "stat_prefix": {"type": "string"},
                "settings": {
                    "type": "object",
                    "properties": {
                        "op_timeout": {"type": "string"}
                    }
                }
            }
        })
    }

    #[test]
    fn test_valid_config_passes() {
        let config = SchemaFilterConfig::new(
            "RedisProxy",
            &redis_schema(),
            json!({"stat_prefix": "redis", "settings": {"op_timeout": "5s"}}),
        )
        .unwrap();

        let value = config.to_structured().unwrap();
        assert_eq!(value["settings"]["op_timeout"], "5s");
    }

    #[test]
    fn test_unknown_top_level_field_is_rejected() {
        let config = SchemaFilterConfig::new(
            "RedisProxy",
            &redis_schema(),
            json!({"stat_prefix": "redis", "cluster": "oops"}),
        )
        .unwrap();

        let err = config.to_structured().unwrap_err();
        assert!(matches!(err, EncodingError::SchemaMismatch { ref schema, .. } if schema == "RedisProxy"));
    }

    #[test]
    fn test_unknown_nested_field_is_rejected() {
        let config = SchemaFilterConfig::new(
            "RedisProxy",
            &redis_schema(),
            json!({"stat_prefix": "redis", "settings": {"op_timeout": "5s", "extra": 1}}),
        )
        .unwrap();

        let err = config.to_structured().unwrap_err();
        assert!(err.to_string().contains("/settings"));
    }

    #[test]
    fn test_explicit_additional_properties_is_respected() {
        let schema = json!({
            "type": "object",
            "properties": {"stat_prefix": {"type": "string"}},
            "additionalProperties": true
        });
        let config =
            SchemaFilterConfig::new("Open", &schema, json!({"stat_prefix": "x", "anything": 1})).unwrap();
        assert!(config.to_structured().is_ok());
    }

    #[test]
    fn test_non_object_value_is_rejected() {
        let config = SchemaFilterConfig::new("Any", &json!({}), json!("scalar")).unwrap();
        assert!(matches!(config.to_structured(), Err(EncodingError::NotAnObject { kind: "string" })));
    }

    #[test]
    fn test_invalid_schema_fails_to_compile() {
        let result = SchemaFilterConfig::new("Broken", &json!({"type": 12}), json!({}));
        assert!(matches!(result, Err(EncodingError::InvalidSchema { .. })));
    }
}
