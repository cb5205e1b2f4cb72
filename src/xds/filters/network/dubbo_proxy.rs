//! `envoy.filters.network.dubbo_proxy`

use super::{RouteAction, StringMatcher};
use crate::xds::filters::ProtocolFilter;
use serde::{Deserialize, Serialize};

/// Dubbo proxy filter configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DubboProxy {
    pub stat_prefix: String,
    #[serde(default)]
    pub protocol_type: DubboProtocolType,
    #[serde(default)]
    pub serialization_type: DubboSerializationType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub route_config: Vec<DubboRouteConfiguration>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dubbo_filters: Vec<DubboFilter>,
}

impl DubboProxy {
    pub fn new<S: Into<String>>(stat_prefix: S) -> Self {
        Self {
            stat_prefix: stat_prefix.into(),
            protocol_type: DubboProtocolType::default(),
            serialization_type: DubboSerializationType::default(),
            route_config: Vec::new(),
            dubbo_filters: Vec::new(),
        }
    }

    /// Proxy routing every method of `interface` to `cluster`.
    pub fn for_interface<S, I, C>(stat_prefix: S, interface: I, cluster: C) -> Self
    where
        S: Into<String>,
        I: Into<String>,
        C: Into<String>,
    {
        let stat_prefix = stat_prefix.into();
        let route = DubboRouteConfiguration {
            name: Some(stat_prefix.clone()),
            interface: interface.into(),
            group: None,
            version: None,
            routes: vec![DubboRoute {
                route_match: DubboRouteMatch {
                    method: Some(MethodMatch { name: StringMatcher::any() }),
                },
                route: RouteAction::cluster(cluster),
            }],
        };
        Self::new(stat_prefix).with_route_config(route)
    }

    pub fn with_route_config(mut self, route_config: DubboRouteConfiguration) -> Self {
        self.route_config.push(route_config);
        self
    }
}

impl ProtocolFilter for DubboProxy {
    const FILTER_NAME: &'static str = "envoy.filters.network.dubbo_proxy";
    const TYPE_URL: &'static str =
        "type.googleapis.com/envoy.extensions.filters.network.dubbo_proxy.v3.DubboProxy";
    const SCHEMA: &'static str = "DubboProxy";
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DubboProtocolType {
    #[default]
    Dubbo,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DubboSerializationType {
    #[default]
    Hessian2,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DubboRouteConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub interface: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub routes: Vec<DubboRoute>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DubboRoute {
    #[serde(rename = "match")]
    pub route_match: DubboRouteMatch,
    pub route: RouteAction,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DubboRouteMatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<MethodMatch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodMatch {
    pub name: StringMatcher,
}

/// Entry of the dubbo filter chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DubboFilter {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xds::filters::FilterConfig;
    use serde_json::json;

    #[test]
    fn test_for_interface_routes_all_methods() {
        let proxy = DubboProxy::for_interface(
            "outbound|20880||org.apache.dubbo.samples.basic.api.demoservice",
            "org.apache.dubbo.samples.basic.api.DemoService",
            "outbound|20880||org.apache.dubbo.samples.basic.api.demoservice",
        );

        let value = proxy.to_structured().unwrap();
        assert_eq!(value["protocol_type"], "Dubbo");
        assert_eq!(value["serialization_type"], "Hessian2");
        assert_eq!(value["route_config"][0]["interface"], "org.apache.dubbo.samples.basic.api.DemoService");
        let method = &value["route_config"][0]["routes"][0]["match"]["method"]["name"];
        assert_eq!(method, &json!({"safe_regex": {"regex": ".*"}}));
        assert!(method.get("prefix").is_none());
        assert!(!value.contains_key("dubbo_filters"));
    }

    #[test]
    fn test_unknown_route_field_is_rejected() {
        let result: Result<DubboProxy, _> = serde_json::from_value(json!({
            "stat_prefix": "dubbo",
            "route_config": [{"interface": "x", "routes": [], "timeout": "1s"}]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_serialization_type_is_rejected() {
        let result: Result<DubboProxy, _> =
            serde_json::from_value(json!({"stat_prefix": "dubbo", "serialization_type": "Json"}));
        assert!(result.is_err());
    }
}
