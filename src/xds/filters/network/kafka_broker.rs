//! `envoy.filters.network.kafka_broker`

use crate::xds::filters::ProtocolFilter;
use serde::{Deserialize, Serialize};

/// Kafka broker filter. Observes the Kafka protocol and emits metrics; it
/// does not route, so it sits in front of the transport proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KafkaBroker {
    pub stat_prefix: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub force_pass_through: bool,
}

impl KafkaBroker {
    pub fn new<S: Into<String>>(stat_prefix: S) -> Self {
        Self { stat_prefix: stat_prefix.into(), force_pass_through: false }
    }
}

impl ProtocolFilter for KafkaBroker {
    const FILTER_NAME: &'static str = "envoy.filters.network.kafka_broker";
    const TYPE_URL: &'static str =
        "type.googleapis.com/envoy.extensions.filters.network.kafka_broker.v3.KafkaBroker";
    const SCHEMA: &'static str = "KafkaBroker";
}
