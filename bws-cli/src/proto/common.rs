use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::base64_bytes;

wire_enum!(
    /// Server-side outcome of a processing job, independent of transport success.
    JobStatus, job_status {
        Succeeded = 0 => "SUCCEEDED",
        Faulted = 1 => "FAULTED",
        Cancelled = 2 => "CANCELLED",
    }
);

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobError {
    #[prost(string, tag = "1")]
    pub error_code: String,
    #[prost(string, tag = "2")]
    pub message: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageData {
    #[prost(bytes = "vec", tag = "1")]
    #[serde(with = "base64_bytes")]
    pub image: Vec<u8>,
    #[prost(string, repeated, tag = "2")]
    pub tags: Vec<String>,
}

impl ImageData {
    pub fn new(image: Vec<u8>) -> Self {
        Self {
            image,
            tags: Vec::new(),
        }
    }
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageProperties {
    #[prost(int32, tag = "1")]
    pub rotated: i32,
    #[prost(message, repeated, tag = "2")]
    pub faces: Vec<Face>,
    #[prost(double, tag = "3")]
    pub quality_score: f64,
    #[prost(message, repeated, tag = "4")]
    pub quality_assessments: Vec<QualityAssessment>,
    #[prost(double, tag = "5")]
    pub frame_number: f64,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Face {
    #[prost(message, optional, tag = "1")]
    pub left_eye: Option<PointD>,
    #[prost(message, optional, tag = "2")]
    pub right_eye: Option<PointD>,
    #[prost(double, tag = "3")]
    pub texture_liveness_score: f64,
    #[prost(double, tag = "4")]
    pub motion_liveness_score: f64,
    #[prost(double, tag = "5")]
    pub movement_direction: f64,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct PointD {
    #[prost(double, tag = "1")]
    pub x: f64,
    #[prost(double, tag = "2")]
    pub y: f64,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QualityAssessment {
    #[prost(string, tag = "1")]
    pub check: String,
    #[prost(double, tag = "2")]
    pub score: f64,
    #[prost(string, tag = "3")]
    pub text: String,
}

/// Same wire layout as `google.protobuf.Timestamp`; RFC 3339 in JSON.
#[derive(Clone, Copy, PartialEq, Eq, ::prost::Message)]
pub struct Timestamp {
    #[prost(int64, tag = "1")]
    pub seconds: i64,
    #[prost(int32, tag = "2")]
    pub nanos: i32,
}

impl Timestamp {
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        u32::try_from(self.nanos)
            .ok()
            .and_then(|nanos| DateTime::from_timestamp(self.seconds, nanos))
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self {
            seconds: value.timestamp(),
            nanos: i32::try_from(value.timestamp_subsec_nanos()).unwrap_or_default(),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.to_datetime() {
            Some(at) => serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|at| Self::from(at.with_timezone(&Utc)))
            .map_err(serde::de::Error::custom)
    }
}
