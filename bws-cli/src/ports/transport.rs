use async_trait::async_trait;
use serde::Serialize;
use tokio::time::Instant;

use crate::domain::{Probe, Transport};
use crate::error::Result;
use crate::proto::{
    ClassCountRequest, ClassCountResponse, DeleteTemplateRequest, DeleteTemplateResponse,
    FaceEnrollmentRequest, FaceEnrollmentResponse, FaceSearchRequest, FaceSearchResponse,
    FaceTemplateStatus, FaceTemplateStatusRequest, FaceVerificationRequest,
    FaceVerificationResponse, LivenessDetectionRequest, LivenessDetectionResponse,
    PhotoVerifyRequest, PhotoVerifyResponse, SetTemplateTagsRequest, SetTemplateTagsResponse,
    VideoLivenessDetectionRequest,
};

/// One wire protocol's implementation of every service operation.
///
/// `deadline` is the absolute instant the call must finish by; implementations
/// forward it to the server where the protocol allows. Enforcement on the
/// client side happens in the dispatcher.
#[async_trait]
pub trait BwsTransport: Send + Sync {
    fn kind(&self) -> Transport;

    async fn probe(&self, probe: Probe, deadline: Option<Instant>) -> Result<ProbeResult>;

    async fn liveness_detection(
        &self,
        request: LivenessDetectionRequest,
        deadline: Option<Instant>,
    ) -> Result<CallOutcome<LivenessDetectionResponse>>;

    async fn video_liveness_detection(
        &self,
        request: VideoLivenessDetectionRequest,
        deadline: Option<Instant>,
    ) -> Result<CallOutcome<LivenessDetectionResponse>>;

    async fn photo_verify(
        &self,
        request: PhotoVerifyRequest,
        deadline: Option<Instant>,
    ) -> Result<CallOutcome<PhotoVerifyResponse>>;

    async fn enroll(
        &self,
        request: FaceEnrollmentRequest,
        deadline: Option<Instant>,
    ) -> Result<CallOutcome<FaceEnrollmentResponse>>;

    async fn verify(
        &self,
        request: FaceVerificationRequest,
        deadline: Option<Instant>,
    ) -> Result<CallOutcome<FaceVerificationResponse>>;

    async fn search(
        &self,
        request: FaceSearchRequest,
        deadline: Option<Instant>,
    ) -> Result<CallOutcome<FaceSearchResponse>>;

    async fn set_template_tags(
        &self,
        request: SetTemplateTagsRequest,
        deadline: Option<Instant>,
    ) -> Result<CallOutcome<SetTemplateTagsResponse>>;

    async fn get_template_status(
        &self,
        request: FaceTemplateStatusRequest,
        deadline: Option<Instant>,
    ) -> Result<CallOutcome<FaceTemplateStatus>>;

    async fn get_class_count(
        &self,
        request: ClassCountRequest,
        deadline: Option<Instant>,
    ) -> Result<CallOutcome<ClassCountResponse>>;

    async fn delete_template(
        &self,
        request: DeleteTemplateRequest,
        deadline: Option<Instant>,
    ) -> Result<CallOutcome<DeleteTemplateResponse>>;
}

/// A typed payload together with what the transport reported around it.
#[derive(Debug, Clone, PartialEq)]
pub struct CallOutcome<T> {
    pub response: T,
    pub metadata: ResponseMetadata,
}

impl<T> CallOutcome<T> {
    pub const fn new(response: T, metadata: ResponseMetadata) -> Self {
        Self { response, metadata }
    }
}

/// Response status line plus headers/trailers as key to multi-value pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResponseMetadata {
    pub status_line: String,
    pub entries: Vec<(String, Vec<String>)>,
}

impl ResponseMetadata {
    pub fn new(status_line: impl Into<String>) -> Self {
        Self {
            status_line: status_line.into(),
            entries: Vec::new(),
        }
    }

    /// Groups repeated keys, keeping first-seen order.
    pub fn with_pairs<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in pairs {
            let key = key.into();
            let value = value.into();
            match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
                Some((_, values)) => values.push(value),
                None => self.entries.push((key, vec![value])),
            }
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(key))
            .map(|(_, values)| values.as_slice())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    pub probe: Probe,
    pub healthy: bool,
    /// Serving status name (gRPC) or response body (REST).
    pub status: String,
    pub metadata: ResponseMetadata,
}
