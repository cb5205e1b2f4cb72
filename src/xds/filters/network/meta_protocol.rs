//! `aeraki.meta_protocol_proxy`
//!
//! Generic layer-7 proxy that delegates framing to a pluggable codec.

use super::RouteAction;
use crate::xds::filters::ProtocolFilter;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetaProtocolProxy {
    pub stat_prefix: String,
    pub application_protocol: String,
    pub codec: Codec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_config: Option<MetaRouteConfiguration>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meta_protocol_filters: Vec<MetaProtocolFilter>,
}

impl MetaProtocolProxy {
    /// Proxy for `application_protocol` using the codec
    /// `aeraki.meta_protocol.codec.<application_protocol>`.
    pub fn new<S: Into<String>, P: Into<String>>(stat_prefix: S, application_protocol: P) -> Self {
        let application_protocol = application_protocol.into();
        Self {
            stat_prefix: stat_prefix.into(),
            codec: Codec { name: format!("aeraki.meta_protocol.codec.{}", application_protocol) },
            application_protocol,
            route_config: None,
            meta_protocol_filters: Vec::new(),
        }
    }

    /// Add a catch-all route to `cluster`.
    pub fn with_default_route<C: Into<String>>(mut self, cluster: C) -> Self {
        let route = MetaRoute { name: Some("default".to_string()), route: RouteAction::cluster(cluster) };
        let name = self.stat_prefix.clone();
        self.route_config
            .get_or_insert_with(|| MetaRouteConfiguration { name, routes: Vec::new() })
            .routes
            .push(route);
        self
    }
}

impl ProtocolFilter for MetaProtocolProxy {
    const FILTER_NAME: &'static str = "aeraki.meta_protocol_proxy";
    const TYPE_URL: &'static str = "type.googleapis.com/aeraki.meta_protocol_proxy.v1alpha.MetaProtocolProxy";
    const SCHEMA: &'static str = "MetaProtocolProxy";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Codec {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetaRouteConfiguration {
    pub name: String,
    #[serde(default)]
    pub routes: Vec<MetaRoute>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetaRoute {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub route: RouteAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetaProtocolFilter {
    pub name: String,
}
