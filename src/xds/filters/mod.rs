//! Structured value encoder for network filter configurations.
//!
//! Every protocol filter configuration is carried to the proxy inside a
//! `udpa.type.v1.TypedStruct`, so the control plane never needs the filter's
//! protobuf schema compiled in. The encoded value placed in a patch always has
//! this exact shape:
//!
//! ```text
//! {
//!   "name": <filter name>,
//!   "typed_config": {
//!     "@type": "type.googleapis.com/udpa.type.v1.TypedStruct",
//!     "type_url": <filter type>,
//!     "value": { ...filter configuration... }
//!   }
//! }
//! ```
//!
//! # Filter configurations
//!
//! Anything implementing [`FilterConfig`] can be encoded:
//! - the typed protocol structs in [`network`] (Dubbo, Thrift, Kafka, MetaProtocol)
//! - [`JsonFilterConfig`], raw JSON checked against one of those structs
//! - [`schema::SchemaFilterConfig`], raw JSON checked against a JSON Schema
//!
//! All of them reject fields their schema does not declare.
//!
//! # Example
//!
//! ```rust
//! use aeraki_envoyfilter::xds::filters::{encode_filter, network::KafkaBroker, ProtocolFilter};
//!
//! let broker = KafkaBroker::new("outbound|9092||kafka");
//! let entry = encode_filter(&broker, KafkaBroker::FILTER_NAME, KafkaBroker::TYPE_URL)?;
//! assert_eq!(entry.typed_config.type_url, KafkaBroker::TYPE_URL);
//! # Ok::<(), aeraki_envoyfilter::EncodingError>(())
//! ```

pub mod network;
pub mod schema;
pub mod struct_value;

use crate::errors::EncodingError;
use envoy_types::pb::envoy::config::listener::v3::{filter::ConfigType, Filter};
use envoy_types::pb::google::protobuf::Any as EnvoyAny;
use prost::Message;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};
use std::marker::PhantomData;

pub use schema::SchemaFilterConfig;
pub use struct_value::{json_to_struct, object_to_struct, struct_to_json};

/// Marker identifying the envelope as an opaque typed struct.
pub const TYPED_STRUCT_TYPE_URL: &str = "type.googleapis.com/udpa.type.v1.TypedStruct";

/// A protocol filter configuration that can be serialized to a structured value.
pub trait FilterConfig {
    /// Serialize to the canonical structured form.
    ///
    /// Fails with [`EncodingError`] when the configuration carries fields its
    /// schema does not recognise, or when it does not serialize to an object.
    fn to_structured(&self) -> Result<JsonMap<String, JsonValue>, EncodingError>;
}

impl<T: FilterConfig + ?Sized> FilterConfig for &T {
    fn to_structured(&self) -> Result<JsonMap<String, JsonValue>, EncodingError> {
        (**self).to_structured()
    }
}

impl<T: FilterConfig + ?Sized> FilterConfig for Box<T> {
    fn to_structured(&self) -> Result<JsonMap<String, JsonValue>, EncodingError> {
        (**self).to_structured()
    }
}

/// A filter configuration with a compile-time schema.
///
/// Implementors are serde structs declared with `deny_unknown_fields`, so
/// deserializing one from JSON is the strict schema check.
pub trait ProtocolFilter: Serialize + DeserializeOwned {
    /// Envoy network filter name
    const FILTER_NAME: &'static str;
    /// Type URL carried in the typed-config envelope
    const TYPE_URL: &'static str;
    /// Schema name used in error messages
    const SCHEMA: &'static str;
}

/// Serialize a value and require the result to be a JSON object.
pub fn serialize_object<T: Serialize + ?Sized>(
    value: &T,
) -> Result<JsonMap<String, JsonValue>, EncodingError> {
    match serde_json::to_value(value)? {
        JsonValue::Object(map) => Ok(map),
        other => Err(EncodingError::not_an_object(&other)),
    }
}

/// Raw JSON that must parse as protocol filter `T`.
///
/// Parsing happens at encode time, so a configuration with an unknown field
/// fails inside the generator rather than when it is constructed.
#[derive(Debug, Clone)]
pub struct JsonFilterConfig<T> {
    raw: JsonValue,
    _schema: PhantomData<fn() -> T>,
}

impl<T: ProtocolFilter> JsonFilterConfig<T> {
    pub fn new(raw: JsonValue) -> Self {
        Self { raw, _schema: PhantomData }
    }

    /// Parse the raw JSON with strict schema semantics.
    pub fn parse(&self) -> Result<T, EncodingError> {
        T::deserialize(&self.raw).map_err(|e| EncodingError::schema_mismatch(T::SCHEMA, e.to_string()))
    }
}

impl<T: ProtocolFilter> FilterConfig for JsonFilterConfig<T> {
    fn to_structured(&self) -> Result<JsonMap<String, JsonValue>, EncodingError> {
        serialize_object(&self.parse()?)
    }
}

/// The `typed_config` of a network filter entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedConfigEnvelope {
    #[serde(rename = "@type")]
    pub type_marker: String,
    pub type_url: String,
    pub value: JsonMap<String, JsonValue>,
}

impl TypedConfigEnvelope {
    pub fn new<S: Into<String>>(type_url: S, value: JsonMap<String, JsonValue>) -> Self {
        Self { type_marker: TYPED_STRUCT_TYPE_URL.to_string(), type_url: type_url.into(), value }
    }

    /// Protobuf `TypedStruct` form of this envelope.
    pub fn to_typed_struct(&self) -> Result<TypedStruct, EncodingError> {
        Ok(TypedStruct { type_url: self.type_url.clone(), value: Some(object_to_struct(&self.value)?) })
    }

    /// Envoy `Any` wrapping the `TypedStruct`.
    pub fn to_any(&self) -> Result<EnvoyAny, EncodingError> {
        Ok(EnvoyAny {
            type_url: self.type_marker.clone(),
            value: self.to_typed_struct()?.encode_to_vec(),
        })
    }
}

/// The value placed into a patch: a filter name plus its typed config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedFilterEntry {
    pub name: String,
    pub typed_config: TypedConfigEnvelope,
}

impl NamedFilterEntry {
    /// Generic protobuf Struct form, as stored in an EnvoyFilter patch value.
    pub fn to_proto_struct(&self) -> Result<prost_types::Struct, EncodingError> {
        let mut typed_config = JsonMap::new();
        typed_config.insert("@type".to_string(), JsonValue::String(self.typed_config.type_marker.clone()));
        typed_config.insert("type_url".to_string(), JsonValue::String(self.typed_config.type_url.clone()));
        typed_config.insert("value".to_string(), JsonValue::Object(self.typed_config.value.clone()));

        let mut entry = JsonMap::new();
        entry.insert("name".to_string(), JsonValue::String(self.name.clone()));
        entry.insert("typed_config".to_string(), JsonValue::Object(typed_config));

        object_to_struct(&entry)
    }

    /// Envoy listener filter as the proxy sees it once the patch is applied.
    pub fn to_listener_filter(&self) -> Result<Filter, EncodingError> {
        Ok(Filter {
            name: self.name.clone(),
            config_type: Some(ConfigType::TypedConfig(self.typed_config.to_any()?)),
            ..Default::default()
        })
    }
}

/// `udpa.type.v1.TypedStruct`
#[derive(Clone, PartialEq, Message)]
pub struct TypedStruct {
    #[prost(string, tag = "1")]
    pub type_url: String,
    #[prost(message, optional, tag = "2")]
    pub value: Option<prost_types::Struct>,
}

/// Encode a filter configuration into a named filter entry.
///
/// # Arguments
///
/// * `config` - The protocol filter configuration
/// * `filter_name` - Envoy network filter name placed in `name`
/// * `filter_type` - Type URL placed in `typed_config.type_url`
pub fn encode_filter(
    config: &dyn FilterConfig,
    filter_name: &str,
    filter_type: &str,
) -> Result<NamedFilterEntry, EncodingError> {
    let value = config.to_structured()?;

    Ok(NamedFilterEntry {
        name: filter_name.to_string(),
        typed_config: TypedConfigEnvelope::new(filter_type, value),
    })
}

#[cfg(test)]
mod tests {
    use super::network::{DubboProxy, KafkaBroker};
    use super::*;
    use serde_json::json;

    struct ScalarConfig;

    impl FilterConfig for ScalarConfig {
        fn to_structured(&self) -> Result<JsonMap<String, JsonValue>, EncodingError> {
            serialize_object(&42)
        }
    }

    #[test]
    fn test_envelope_has_exact_keys() {
        let entry =
            encode_filter(&KafkaBroker::new("kafka"), KafkaBroker::FILTER_NAME, "type.googleapis.com/x.Y")
                .unwrap();
        let value = serde_json::to_value(&entry).unwrap();

        let top: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(top, vec!["name", "typed_config"]);

        let typed: Vec<&String> = value["typed_config"].as_object().unwrap().keys().collect();
        assert_eq!(typed, vec!["@type", "type_url", "value"]);
        assert_eq!(value["typed_config"]["@type"], TYPED_STRUCT_TYPE_URL);
        assert_eq!(value["typed_config"]["type_url"], "type.googleapis.com/x.Y");
        assert_eq!(value["typed_config"]["value"]["stat_prefix"], "kafka");
    }

    #[test]
    fn test_non_object_config_is_rejected() {
        let result = encode_filter(&ScalarConfig, "name", "type");
        assert!(matches!(result, Err(EncodingError::NotAnObject { kind: "number" })));
    }

    #[test]
    fn test_json_filter_config_rejects_unknown_field() {
        let config = JsonFilterConfig::<KafkaBroker>::new(json!({
            "stat_prefix": "kafka",
            "unexpected": true
        }));

        let err = encode_filter(&config, KafkaBroker::FILTER_NAME, KafkaBroker::TYPE_URL).unwrap_err();
        match err {
            EncodingError::SchemaMismatch { schema, message } => {
                assert_eq!(schema, "KafkaBroker");
                assert!(message.contains("unexpected"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_json_filter_config_round_trips_known_fields() {
        let config = JsonFilterConfig::<DubboProxy>::new(json!({
            "stat_prefix": "outbound|20880||dubbo",
            "route_config": [{
                "name": "outbound|20880||dubbo",
                "interface": "org.apache.dubbo.samples.DemoService",
                "routes": [{"match": {"method": {"name": {"exact": "sayHello"}}}, "route": {"cluster": "c"}}]
            }]
        }));

        let value = config.to_structured().unwrap();
        assert_eq!(value["protocol_type"], "Dubbo");
        assert_eq!(value["serialization_type"], "Hessian2");
        assert_eq!(value["route_config"][0]["routes"][0]["match"]["method"]["name"]["exact"], "sayHello");
    }

    #[test]
    fn test_to_proto_struct_matches_envelope() {
        let entry = encode_filter(&KafkaBroker::new("kafka"), KafkaBroker::FILTER_NAME, KafkaBroker::TYPE_URL)
            .unwrap();
        let proto = entry.to_proto_struct().unwrap();
        let back = struct_to_json(&proto);

        assert_eq!(back["name"], KafkaBroker::FILTER_NAME);
        assert_eq!(back["typed_config"]["@type"], TYPED_STRUCT_TYPE_URL);
        assert_eq!(back["typed_config"]["value"]["stat_prefix"], "kafka");
    }

    #[test]
    fn test_listener_filter_carries_typed_struct() {
        let entry = encode_filter(&KafkaBroker::new("kafka"), KafkaBroker::FILTER_NAME, KafkaBroker::TYPE_URL)
            .unwrap();
        let filter = entry.to_listener_filter().unwrap();
        assert_eq!(filter.name, KafkaBroker::FILTER_NAME);

        let any = match filter.config_type {
            Some(ConfigType::TypedConfig(any)) => any,
            other => panic!("unexpected config type {:?}", other),
        };
        assert_eq!(any.type_url, TYPED_STRUCT_TYPE_URL);

        let typed = TypedStruct::decode(any.value.as_slice()).unwrap();
        assert_eq!(typed.type_url, KafkaBroker::TYPE_URL);
        let value = struct_to_json(&typed.value.unwrap());
        assert_eq!(value["stat_prefix"], "kafka");
    }
}
