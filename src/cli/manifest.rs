//! Input files for the `render` and `selector` commands.
//!
//! Both files may be YAML or JSON.

use crate::domain::ServiceDescriptor;
use crate::errors::{EncodingError, Error, Result};
use crate::xds::filters::network::ProtocolKind;
use crate::xds::filters::FilterConfig;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::path::Path;

/// Boxed filter configuration built from a manifest.
pub type DynFilterConfig = Box<dyn FilterConfig + Send + Sync>;

/// Describes the filter to install and its per-direction configuration.
///
/// ```yaml
/// protocol: dubbo
/// outbound:
///   stat_prefix: outbound|20880||dubbo
/// inbound:
///   stat_prefix: inbound|20880||
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterManifest {
    pub protocol: ProtocolKind,

    /// Filter name; defaults to the protocol's filter name
    #[serde(default)]
    pub name: Option<String>,

    /// Typed-config type URL; defaults to the protocol's type URL
    #[serde(default)]
    pub type_url: Option<String>,

    /// JSON Schema for `custom` filters
    #[serde(default)]
    pub schema: Option<JsonValue>,

    #[serde(default)]
    pub outbound: Option<JsonValue>,

    #[serde(default)]
    pub inbound: Option<JsonValue>,
}

impl FilterManifest {
    pub fn from_path(path: &Path) -> Result<Self> {
        read_yaml(path, "filter manifest")
    }

    pub fn filter_name(&self) -> Result<&str> {
        self.name.as_deref().or_else(|| self.protocol.filter_name()).ok_or_else(|| {
            Error::validation_field(format!("{} filters must set a name", self.protocol), "name")
        })
    }

    pub fn filter_type(&self) -> Result<&str> {
        self.type_url.as_deref().or_else(|| self.protocol.type_url()).ok_or_else(|| {
            Error::validation_field(format!("{} filters must set a type_url", self.protocol), "type_url")
        })
    }

    pub fn outbound_config(&self) -> std::result::Result<Option<DynFilterConfig>, EncodingError> {
        self.config(self.outbound.as_ref())
    }

    pub fn inbound_config(&self) -> std::result::Result<Option<DynFilterConfig>, EncodingError> {
        self.config(self.inbound.as_ref())
    }

    fn config(
        &self,
        value: Option<&JsonValue>,
    ) -> std::result::Result<Option<DynFilterConfig>, EncodingError> {
        value.map(|v| self.protocol.config_from_json(v.clone(), self.schema.as_ref())).transpose()
    }
}

/// Load a service descriptor.
pub fn load_service(path: &Path) -> Result<ServiceDescriptor> {
    read_yaml(path, "service descriptor")
}

fn read_yaml<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::io(e, format!("Failed to read {} {}", what, path.display())))?;
    serde_yaml::from_str(&content)
        .map_err(|e| Error::from(e).with_context(format!("Failed to parse {} {}", what, path.display())))
}
