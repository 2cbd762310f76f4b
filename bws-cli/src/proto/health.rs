//! `grpc.health.v1` probe messages.

use serde::{Deserialize, Serialize};

wire_enum!(
    ServingStatus, serving_status {
        Unknown = 0 => "UNKNOWN",
        Serving = 1 => "SERVING",
        NotServing = 2 => "NOT_SERVING",
        ServiceUnknown = 3 => "SERVICE_UNKNOWN",
    }
);

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthCheckRequest {
    #[prost(string, tag = "1")]
    pub service: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthCheckResponse {
    #[prost(enumeration = "ServingStatus", tag = "1")]
    #[serde(with = "serving_status")]
    pub status: i32,
}
