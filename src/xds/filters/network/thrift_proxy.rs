//! `envoy.filters.network.thrift_proxy`

use super::RouteAction;
use crate::xds::filters::ProtocolFilter;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThriftProxy {
    pub stat_prefix: String,
    #[serde(default)]
    pub transport: TransportType,
    #[serde(default)]
    pub protocol: ThriftProtocol,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_config: Option<ThriftRouteConfiguration>,
}

impl ThriftProxy {
    pub fn new<S: Into<String>>(stat_prefix: S) -> Self {
        Self {
            stat_prefix: stat_prefix.into(),
            transport: TransportType::default(),
            protocol: ThriftProtocol::default(),
            route_config: None,
        }
    }

    /// Proxy sending every method to `cluster`.
    pub fn to_cluster<S: Into<String>, C: Into<String>>(stat_prefix: S, cluster: C) -> Self {
        let stat_prefix = stat_prefix.into();
        let route_config = ThriftRouteConfiguration {
            name: stat_prefix.clone(),
            routes: vec![ThriftRoute {
                route_match: ThriftRouteMatch::method(""),
                route: RouteAction::cluster(cluster),
            }],
        };
        Self { route_config: Some(route_config), ..Self::new(stat_prefix) }
    }
}

impl ProtocolFilter for ThriftProxy {
    const FILTER_NAME: &'static str = "envoy.filters.network.thrift_proxy";
    const TYPE_URL: &'static str =
        "type.googleapis.com/envoy.extensions.filters.network.thrift_proxy.v3.ThriftProxy";
    const SCHEMA: &'static str = "ThriftProxy";
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransportType {
    #[default]
    AutoTransport,
    Framed,
    Unframed,
    Header,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThriftProtocol {
    #[default]
    AutoProtocol,
    Binary,
    LaxBinary,
    Compact,
    Twitter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThriftRouteConfiguration {
    pub name: String,
    #[serde(default)]
    pub routes: Vec<ThriftRoute>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThriftRoute {
    #[serde(rename = "match")]
    pub route_match: ThriftRouteMatch,
    pub route: RouteAction,
}

/// Matches on method name or service name; an empty method name matches all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThriftRouteMatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub invert: bool,
}

impl ThriftRouteMatch {
    pub fn method<S: Into<String>>(name: S) -> Self {
        Self { method_name: Some(name.into()), ..Default::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xds::filters::FilterConfig;
    use serde_json::json;

    #[test]
    fn test_defaults_serialize_as_enum_names() {
        let value = ThriftProxy::new("thrift").to_structured().unwrap();
        assert_eq!(value["transport"], "AUTO_TRANSPORT");
        assert_eq!(value["protocol"], "AUTO_PROTOCOL");
        assert!(!value.contains_key("route_config"));
    }

    #[test]
    fn test_to_cluster_builds_catch_all_route() {
        let value = ThriftProxy::to_cluster("thrift", "outbound|9090||thrift-sample-server")
            .to_structured()
            .unwrap();
        assert_eq!(
            serde_json::Value::Object(value)["route_config"]["routes"][0],
            json!({"match": {"method_name": ""}, "route": {"cluster": "outbound|9090||thrift-sample-server"}})
        );
    }

    #[test]
    fn test_parse_explicit_protocol() {
        let proxy: ThriftProxy =
            serde_json::from_value(json!({"stat_prefix": "t", "transport": "FRAMED", "protocol": "COMPACT"}))
                .unwrap();
        assert_eq!(proxy.transport, TransportType::Framed);
        assert_eq!(proxy.protocol, ThriftProtocol::Compact);
    }
}
