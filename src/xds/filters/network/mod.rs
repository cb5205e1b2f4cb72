//! Protocol-aware network filter configurations.
//!
//! One serde struct per supported protocol proxy. Field names follow the
//! protobuf JSON mapping of the upstream filter, and every struct is declared
//! with `deny_unknown_fields` so parsing from JSON is a strict schema check.

pub mod dubbo_proxy;
pub mod kafka_broker;
pub mod meta_protocol;
pub mod thrift_proxy;

pub use dubbo_proxy::{DubboProxy, DubboRoute, DubboRouteConfiguration, DubboRouteMatch, MethodMatch};
pub use kafka_broker::KafkaBroker;
pub use meta_protocol::{Codec, MetaProtocolProxy, MetaRoute, MetaRouteConfiguration};
pub use thrift_proxy::{ThriftProxy, ThriftRoute, ThriftRouteConfiguration, ThriftRouteMatch};

use crate::errors::EncodingError;
use crate::xds::filters::{
    schema::SchemaFilterConfig, serialize_object, FilterConfig, JsonFilterConfig, ProtocolFilter,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};
use std::fmt;

macro_rules! impl_filter_config {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl FilterConfig for $ty {
                fn to_structured(&self) -> Result<JsonMap<String, JsonValue>, EncodingError> {
                    serialize_object(self)
                }
            }
        )+
    };
}

impl_filter_config!(DubboProxy, ThriftProxy, KafkaBroker, MetaProtocolProxy);

/// Route destination shared by the protocol route tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteAction {
    pub cluster: String,
}

impl RouteAction {
    pub fn cluster<S: Into<String>>(cluster: S) -> Self {
        Self { cluster: cluster.into() }
    }
}

/// String matcher in protobuf JSON form (`{"exact": "..."}` etc).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum StringMatcher {
    Exact(String),
    Prefix(String),
    Suffix(String),
    Contains(String),
    SafeRegex(RegexMatcher),
}

impl StringMatcher {
    /// Matches any value. Envoy rejects an empty `prefix`, so this is a regex.
    pub fn any() -> Self {
        Self::SafeRegex(RegexMatcher::new(".*"))
    }
}

/// RE2 regular expression matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegexMatcher {
    pub regex: String,
}

impl RegexMatcher {
    pub fn new<S: Into<String>>(regex: S) -> Self {
        Self { regex: regex.into() }
    }
}

/// Protocol filters known to the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolKind {
    Dubbo,
    Thrift,
    KafkaBroker,
    MetaProtocol,
    /// A third-party filter described by a JSON Schema
    Custom,
}

impl ProtocolKind {
    /// Default Envoy filter name, if the kind has one.
    pub fn filter_name(self) -> Option<&'static str> {
        match self {
            ProtocolKind::Dubbo => Some(DubboProxy::FILTER_NAME),
            ProtocolKind::Thrift => Some(ThriftProxy::FILTER_NAME),
            ProtocolKind::KafkaBroker => Some(KafkaBroker::FILTER_NAME),
            ProtocolKind::MetaProtocol => Some(MetaProtocolProxy::FILTER_NAME),
            ProtocolKind::Custom => None,
        }
    }

    /// Default typed-config type URL, if the kind has one.
    pub fn type_url(self) -> Option<&'static str> {
        match self {
            ProtocolKind::Dubbo => Some(DubboProxy::TYPE_URL),
            ProtocolKind::Thrift => Some(ThriftProxy::TYPE_URL),
            ProtocolKind::KafkaBroker => Some(KafkaBroker::TYPE_URL),
            ProtocolKind::MetaProtocol => Some(MetaProtocolProxy::TYPE_URL),
            ProtocolKind::Custom => None,
        }
    }

    /// Wrap raw JSON in the strict configuration type for this kind.
    ///
    /// `schema` is required for [`ProtocolKind::Custom`] and ignored otherwise.
    pub fn config_from_json(
        self,
        value: JsonValue,
        schema: Option<&JsonValue>,
    ) -> Result<Box<dyn FilterConfig + Send + Sync>, EncodingError> {
        Ok(match self {
            ProtocolKind::Dubbo => Box::new(JsonFilterConfig::<DubboProxy>::new(value)),
            ProtocolKind::Thrift => Box::new(JsonFilterConfig::<ThriftProxy>::new(value)),
            ProtocolKind::KafkaBroker => Box::new(JsonFilterConfig::<KafkaBroker>::new(value)),
            ProtocolKind::MetaProtocol => Box::new(JsonFilterConfig::<MetaProtocolProxy>::new(value)),
            ProtocolKind::Custom => {
                let schema = schema.ok_or_else(|| EncodingError::InvalidSchema {
                    schema: self.to_string(),
                    message: "custom protocol filters require a JSON schema".to_string(),
                })?;
                Box::new(SchemaFilterConfig::new(self.to_string(), schema, value)?)
            }
        })
    }
}

impl fmt::Display for ProtocolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolKind::Dubbo => write!(f, "dubbo"),
            ProtocolKind::Thrift => write!(f, "thrift"),
            ProtocolKind::KafkaBroker => write!(f, "kafka_broker"),
            ProtocolKind::MetaProtocol => write!(f, "meta_protocol"),
            ProtocolKind::Custom => write!(f, "custom"),
        }
    }
}
