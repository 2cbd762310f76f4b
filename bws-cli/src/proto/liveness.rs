use serde::{Deserialize, Serialize};

use super::base64_bytes;
use super::common::{ImageData, ImageProperties, JobError, JobStatus, job_status};

wire_enum!(
    AccuracyLevel, accuracy_level {
        NotRecognized = 0 => "NOT_RECOGNIZED",
        Level1 = 1 => "LEVEL_1",
        Level2 = 2 => "LEVEL_2",
        Level3 = 3 => "LEVEL_3",
        Level4 = 4 => "LEVEL_4",
        Level5 = 5 => "LEVEL_5",
    }
);

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LivenessDetectionRequest {
    #[prost(message, repeated, tag = "1")]
    pub live_images: Vec<ImageData>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoLivenessDetectionRequest {
    #[prost(bytes = "vec", tag = "1")]
    #[serde(with = "base64_bytes")]
    pub video: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LivenessDetectionResponse {
    #[prost(enumeration = "JobStatus", tag = "1")]
    #[serde(with = "job_status")]
    pub status: i32,
    #[prost(message, repeated, tag = "2")]
    pub errors: Vec<JobError>,
    #[prost(message, repeated, tag = "3")]
    pub image_properties: Vec<ImageProperties>,
    #[prost(bool, tag = "4")]
    pub live: bool,
    #[prost(double, tag = "5")]
    pub liveness_score: f64,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PhotoVerifyRequest {
    #[prost(message, repeated, tag = "1")]
    pub live_images: Vec<ImageData>,
    #[prost(bytes = "vec", tag = "2")]
    #[serde(with = "base64_bytes")]
    pub photo: Vec<u8>,
    #[prost(bool, tag = "3")]
    pub disable_liveness_detection: bool,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PhotoVerifyResponse {
    #[prost(enumeration = "JobStatus", tag = "1")]
    #[serde(with = "job_status")]
    pub status: i32,
    #[prost(message, repeated, tag = "2")]
    pub errors: Vec<JobError>,
    #[prost(message, repeated, tag = "3")]
    pub image_properties: Vec<ImageProperties>,
    #[prost(message, optional, tag = "4")]
    pub photo_properties: Option<ImageProperties>,
    #[prost(enumeration = "AccuracyLevel", tag = "5")]
    #[serde(with = "accuracy_level")]
    pub verification_level: i32,
    #[prost(double, tag = "6")]
    pub verification_score: f64,
    #[prost(bool, tag = "7")]
    pub live: bool,
    #[prost(double, tag = "8")]
    pub liveness_score: f64,
}
