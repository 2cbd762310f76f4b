use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::time::Instant;
use url::Url;

use super::CallCredentials;
use crate::domain::{ConnectionContext, Operation, Probe, Transport};
use crate::error::{BwsError, Result, TransportErrorKind};
use crate::ports::{BwsTransport, CallOutcome, ProbeResult, ResponseMetadata};
use crate::proto::{
    ClassCountRequest, ClassCountResponse, DeleteTemplateRequest, DeleteTemplateResponse,
    FaceEnrollmentRequest, FaceEnrollmentResponse, FaceSearchRequest, FaceSearchResponse,
    FaceTemplateStatus, FaceTemplateStatusRequest, FaceVerificationRequest,
    FaceVerificationResponse, LivenessDetectionRequest, LivenessDetectionResponse,
    PhotoVerifyRequest, PhotoVerifyResponse, SetTemplateTagsRequest, SetTemplateTagsResponse,
    VideoLivenessDetectionRequest,
};

struct RawResponse {
    status: StatusCode,
    metadata: ResponseMetadata,
    body: Vec<u8>,
}

pub struct RestTransport {
    http: Client,
    base: Url,
    credentials: CallCredentials,
    max_message_bytes: usize,
}

impl RestTransport {
    pub fn new(
        ctx: &ConnectionContext,
        credentials: CallCredentials,
        max_message_bytes: usize,
    ) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("bws-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base: base_url(ctx.host()),
            credentials,
            max_message_bytes,
        })
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| BwsError::invalid_endpoint(self.base.as_str(), e))
    }

    async fn execute(&self, mut request: RequestBuilder, deadline: Option<Instant>) -> Result<RawResponse> {
        for (name, value) in self.credentials.headers()? {
            request = request.header(name, value);
        }
        if let Some(at) = deadline {
            request = request.timeout(at.saturating_duration_since(Instant::now()));
        }

        let mut response = request.send().await?;
        let status = response.status();
        let metadata = ResponseMetadata::new(format!("{:?} {status}", response.version()))
            .with_pairs(response.headers().iter().map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            }));

        if response
            .content_length()
            .is_some_and(|length| length > self.max_message_bytes as u64)
        {
            return Err(self.too_large());
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > self.max_message_bytes {
                return Err(self.too_large());
            }
            body.extend_from_slice(&chunk);
        }

        Ok(RawResponse {
            status,
            metadata,
            body,
        })
    }

    fn too_large(&self) -> BwsError {
        BwsError::transport(
            TransportErrorKind::Other,
            "ResourceExhausted",
            format!(
                "response exceeds the {} byte limit",
                self.max_message_bytes
            ),
        )
    }

    async fn post<Req, Resp>(
        &self,
        operation: Operation,
        body: &Req,
        deadline: Option<Instant>,
    ) -> Result<CallOutcome<Resp>>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let request = self.http.post(self.url(operation.rest_path())?).json(body);
        let raw = self.execute(request, deadline).await?;

        if !raw.status.is_success() {
            return Err(BwsError::from_http_status(
                raw.status.as_u16(),
                raw.status.canonical_reason(),
                &String::from_utf8_lossy(&raw.body),
            ));
        }

        let payload = if raw.body.iter().all(u8::is_ascii_whitespace) {
            serde_json::from_slice(b"{}")?
        } else {
            serde_json::from_slice(&raw.body)?
        };
        Ok(CallOutcome::new(payload, raw.metadata))
    }
}

/// Makes relative joins keep any path prefix of the host.
fn base_url(host: &Url) -> Url {
    let mut base = host.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

#[async_trait]
impl BwsTransport for RestTransport {
    fn kind(&self) -> Transport {
        Transport::Http
    }

    async fn probe(&self, probe: Probe, deadline: Option<Instant>) -> Result<ProbeResult> {
        let request = self.http.get(self.url(probe.rest_path())?);
        let raw = self.execute(request, deadline).await?;
        let body = String::from_utf8_lossy(&raw.body).trim().to_string();

        // An unhealthy probe answers 503; that is a result, not a failure.
        let healthy = match raw.status {
            status if status.is_success() => true,
            StatusCode::SERVICE_UNAVAILABLE => false,
            status => {
                return Err(BwsError::from_http_status(
                    status.as_u16(),
                    status.canonical_reason(),
                    &body,
                ));
            }
        };

        let status = if body.is_empty() {
            raw.status.to_string()
        } else {
            body
        };
        Ok(ProbeResult {
            probe,
            healthy,
            status,
            metadata: raw.metadata,
        })
    }

    async fn liveness_detection(
        &self,
        request: LivenessDetectionRequest,
        deadline: Option<Instant>,
    ) -> Result<CallOutcome<LivenessDetectionResponse>> {
        self.post(Operation::LiveDetection, &request, deadline).await
    }

    async fn video_liveness_detection(
        &self,
        request: VideoLivenessDetectionRequest,
        deadline: Option<Instant>,
    ) -> Result<CallOutcome<LivenessDetectionResponse>> {
        self.post(Operation::VideoLiveDetection, &request, deadline).await
    }

    async fn photo_verify(
        &self,
        request: PhotoVerifyRequest,
        deadline: Option<Instant>,
    ) -> Result<CallOutcome<PhotoVerifyResponse>> {
        self.post(Operation::PhotoVerify, &request, deadline).await
    }

    async fn enroll(
        &self,
        request: FaceEnrollmentRequest,
        deadline: Option<Instant>,
    ) -> Result<CallOutcome<FaceEnrollmentResponse>> {
        self.post(Operation::Enroll, &request, deadline).await
    }

    async fn verify(
        &self,
        request: FaceVerificationRequest,
        deadline: Option<Instant>,
    ) -> Result<CallOutcome<FaceVerificationResponse>> {
        self.post(Operation::Verify, &request, deadline).await
    }

    async fn search(
        &self,
        request: FaceSearchRequest,
        deadline: Option<Instant>,
    ) -> Result<CallOutcome<FaceSearchResponse>> {
        self.post(Operation::Search, &request, deadline).await
    }

    async fn set_template_tags(
        &self,
        request: SetTemplateTagsRequest,
        deadline: Option<Instant>,
    ) -> Result<CallOutcome<SetTemplateTagsResponse>> {
        self.post(Operation::SetTemplateTags, &request, deadline).await
    }

    async fn get_template_status(
        &self,
        request: FaceTemplateStatusRequest,
        deadline: Option<Instant>,
    ) -> Result<CallOutcome<FaceTemplateStatus>> {
        self.post(Operation::GetTemplateStatus, &request, deadline).await
    }

    async fn get_class_count(
        &self,
        request: ClassCountRequest,
        deadline: Option<Instant>,
    ) -> Result<CallOutcome<ClassCountResponse>> {
        self.post(Operation::GetClassCount, &request, deadline).await
    }

    async fn delete_template(
        &self,
        request: DeleteTemplateRequest,
        deadline: Option<Instant>,
    ) -> Result<CallOutcome<DeleteTemplateResponse>> {
        self.post(Operation::DeleteTemplate, &request, deadline).await
    }
}
