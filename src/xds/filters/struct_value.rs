//! Conversion between JSON objects and `google.protobuf.Struct`.
//!
//! Filter values are kept as JSON objects so that rendered manifests keep
//! integer literals intact. Consumers that need the protobuf form (for an
//! `Any` or a `TypedStruct`) convert with [`json_to_struct`].

use crate::errors::EncodingError;
use prost_types::{value::Kind, ListValue, Struct, Value};
use serde_json::{Map as JsonMap, Value as JsonValue};
use std::collections::BTreeMap;

/// Convert a JSON value to a protobuf Struct.
///
/// Only objects are accepted; anything else is an [`EncodingError::NotAnObject`].
pub fn json_to_struct(json: &JsonValue) -> Result<Struct, EncodingError> {
    match json {
        JsonValue::Object(map) => object_to_struct(map),
        other => Err(EncodingError::not_an_object(other)),
    }
}

/// Convert a JSON object to a protobuf Struct.
pub fn object_to_struct(map: &JsonMap<String, JsonValue>) -> Result<Struct, EncodingError> {
    let mut fields = BTreeMap::new();
    for (key, value) in map {
        fields.insert(key.clone(), json_to_proto_value(value)?);
    }
    Ok(Struct { fields })
}

fn json_to_proto_value(json: &JsonValue) -> Result<Value, EncodingError> {
    let kind = match json {
        JsonValue::Null => Kind::NullValue(0),
        JsonValue::Bool(b) => Kind::BoolValue(*b),
        JsonValue::Number(n) => {
            // Protobuf only has double for numbers
            let num = n.as_f64().ok_or_else(|| EncodingError::Number(n.to_string()))?;
            Kind::NumberValue(num)
        }
        JsonValue::String(s) => Kind::StringValue(s.clone()),
        JsonValue::Array(arr) => {
            let values = arr.iter().map(json_to_proto_value).collect::<Result<Vec<_>, _>>()?;
            Kind::ListValue(ListValue { values })
        }
        JsonValue::Object(map) => Kind::StructValue(object_to_struct(map)?),
    };

    Ok(Value { kind: Some(kind) })
}

/// Convert a protobuf Struct back to JSON.
pub fn struct_to_json(s: &Struct) -> JsonValue {
    let mut map = JsonMap::new();
    for (key, value) in &s.fields {
        map.insert(key.clone(), proto_value_to_json(value));
    }
    JsonValue::Object(map)
}

fn proto_value_to_json(value: &Value) -> JsonValue {
    match &value.kind {
        Some(Kind::NullValue(_)) | None => JsonValue::Null,
        Some(Kind::BoolValue(b)) => JsonValue::Bool(*b),
        Some(Kind::NumberValue(n)) => serde_json::Number::from_f64(*n)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Some(Kind::StringValue(s)) => JsonValue::String(s.clone()),
        Some(Kind::ListValue(list)) => {
            JsonValue::Array(list.values.iter().map(proto_value_to_json).collect())
        }
        Some(Kind::StructValue(s)) => struct_to_json(s),
    }
}
