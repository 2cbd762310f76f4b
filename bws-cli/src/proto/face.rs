use serde::{Deserialize, Serialize};

use super::base64_bytes;
use super::common::{ImageData, ImageProperties, JobError, JobStatus, Timestamp, job_status};

wire_enum!(
    EnrollmentAction, enrollment_action {
        NoAction = 0 => "NONE",
        NewTemplateCreated = 1 => "NEW_TEMPLATE_CREATED",
        TemplateUpdated = 2 => "TEMPLATE_UPDATED",
        TemplateUpgraded = 3 => "TEMPLATE_UPGRADED",
        NoTemplateGenerated = 4 => "NO_TEMPLATE_GENERATED",
    }
);

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FaceEnrollmentRequest {
    #[prost(int64, tag = "1")]
    pub class_id: i64,
    #[prost(message, repeated, tag = "2")]
    pub images: Vec<ImageData>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FaceEnrollmentResponse {
    #[prost(enumeration = "JobStatus", tag = "1")]
    #[serde(with = "job_status")]
    pub status: i32,
    #[prost(message, repeated, tag = "2")]
    pub errors: Vec<JobError>,
    #[prost(message, repeated, tag = "3")]
    pub image_properties: Vec<ImageProperties>,
    #[prost(enumeration = "EnrollmentAction", tag = "4")]
    #[serde(with = "enrollment_action")]
    pub performed_action: i32,
    #[prost(int32, tag = "5")]
    pub enrolled_images: i32,
    #[prost(message, optional, tag = "6")]
    pub template_status: Option<FaceTemplateStatus>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FaceVerificationRequest {
    #[prost(int64, tag = "1")]
    pub class_id: i64,
    #[prost(message, optional, tag = "2")]
    pub image: Option<ImageData>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FaceVerificationResponse {
    #[prost(enumeration = "JobStatus", tag = "1")]
    #[serde(with = "job_status")]
    pub status: i32,
    #[prost(message, repeated, tag = "2")]
    pub errors: Vec<JobError>,
    #[prost(message, optional, tag = "3")]
    pub image_properties: Option<ImageProperties>,
    #[prost(bool, tag = "4")]
    pub verified: bool,
    #[prost(double, tag = "5")]
    pub score: f64,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FaceSearchRequest {
    #[prost(string, repeated, tag = "1")]
    pub tags: Vec<String>,
    #[prost(message, repeated, tag = "2")]
    pub images: Vec<ImageData>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FaceSearchResponse {
    #[prost(enumeration = "JobStatus", tag = "1")]
    #[serde(with = "job_status")]
    pub status: i32,
    #[prost(message, repeated, tag = "2")]
    pub errors: Vec<JobError>,
    #[prost(message, repeated, tag = "3")]
    pub image_properties: Vec<ImageProperties>,
    #[prost(message, repeated, tag = "4")]
    pub results: Vec<ImageSearchResult>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageSearchResult {
    #[prost(message, repeated, tag = "1")]
    pub matches: Vec<FaceMatch>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FaceMatch {
    #[prost(int64, tag = "1")]
    pub class_id: i64,
    #[prost(double, tag = "2")]
    pub score: f64,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SetTemplateTagsRequest {
    #[prost(int64, tag = "1")]
    pub class_id: i64,
    #[prost(string, repeated, tag = "2")]
    pub tags: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
pub struct SetTemplateTagsResponse {}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FaceTemplateStatusRequest {
    #[prost(int64, tag = "1")]
    pub class_id: i64,
    #[prost(bool, tag = "2")]
    pub download_thumbnails: bool,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FaceTemplateStatus {
    #[prost(int64, tag = "1")]
    pub class_id: i64,
    #[prost(bool, tag = "2")]
    pub available: bool,
    #[prost(message, optional, tag = "3")]
    pub enrolled: Option<Timestamp>,
    #[prost(string, repeated, tag = "4")]
    pub tags: Vec<String>,
    #[prost(int32, tag = "5")]
    pub encoder_version: i32,
    #[prost(int32, tag = "6")]
    pub feature_vectors: i32,
    #[prost(int32, tag = "7")]
    pub thumbnails_stored: i32,
    #[prost(message, repeated, tag = "8")]
    pub thumbnails: Vec<Thumbnail>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Thumbnail {
    #[prost(message, optional, tag = "1")]
    pub enrolled: Option<Timestamp>,
    #[prost(bytes = "vec", tag = "2")]
    #[serde(with = "base64_bytes")]
    pub image: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassCountRequest {
    #[prost(string, repeated, tag = "1")]
    pub tags: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassCountResponse {
    #[prost(int32, tag = "1")]
    pub count: i32,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeleteTemplateRequest {
    #[prost(int64, tag = "1")]
    pub class_id: i64,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
pub struct DeleteTemplateResponse {}
