use async_trait::async_trait;
use tokio::time::Instant;
use tonic::client::Grpc;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::metadata::{AsciiMetadataValue, MetadataMap};
use tonic::service::Interceptor;
use tonic::service::interceptor::InterceptedService;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};

use super::CallCredentials;
use crate::domain::{ConnectionContext, Operation, Probe, Transport};
use crate::error::{BwsError, Result, TransportErrorKind};
use crate::ports::{BwsTransport, CallOutcome, ProbeResult, ResponseMetadata};
use crate::proto::{
    ClassCountRequest, ClassCountResponse, DeleteTemplateRequest, DeleteTemplateResponse,
    FaceEnrollmentRequest, FaceEnrollmentResponse, FaceSearchRequest, FaceSearchResponse,
    FaceTemplateStatus, FaceTemplateStatusRequest, FaceVerificationRequest,
    FaceVerificationResponse, HealthCheckRequest, HealthCheckResponse, LivenessDetectionRequest,
    LivenessDetectionResponse, PhotoVerifyRequest, PhotoVerifyResponse, ServingStatus,
    SetTemplateTagsRequest, SetTemplateTagsResponse, VideoLivenessDetectionRequest,
};

impl Interceptor for CallCredentials {
    fn call(
        &mut self,
        mut request: tonic::Request<()>,
    ) -> std::result::Result<tonic::Request<()>, tonic::Status> {
        let headers = self
            .headers()
            .map_err(|e| tonic::Status::unauthenticated(e.to_string()))?;

        for (name, value) in headers {
            let value: AsciiMetadataValue = value
                .parse()
                .map_err(|_| tonic::Status::internal(format!("{name} is not a valid metadata value")))?;
            request.metadata_mut().insert(name, value);
        }
        Ok(request)
    }
}

type AuthenticatedChannel = InterceptedService<Channel, CallCredentials>;

pub struct GrpcTransport {
    grpc: Grpc<AuthenticatedChannel>,
}

impl GrpcTransport {
    /// Creates a lazily connecting channel; the first call dials the host.
    pub fn connect(
        ctx: &ConnectionContext,
        credentials: CallCredentials,
        max_message_bytes: usize,
    ) -> Result<Self> {
        let origin = ctx.host().origin().ascii_serialization();
        let mut endpoint = Endpoint::from_shared(origin.clone())
            .map_err(|e| BwsError::invalid_endpoint(&origin, e))?;

        if ctx.is_secure() {
            endpoint = endpoint
                .tls_config(ClientTlsConfig::new().with_native_roots())
                .map_err(|e| BwsError::invalid_endpoint(&origin, e))?;
        }

        let channel = endpoint.connect_lazy();
        let grpc = Grpc::new(InterceptedService::new(channel, credentials))
            .max_decoding_message_size(max_message_bytes)
            .max_encoding_message_size(max_message_bytes);

        Ok(Self { grpc })
    }

    async fn unary<Req, Resp>(
        &self,
        operation: Operation,
        message: Req,
        deadline: Option<Instant>,
    ) -> Result<CallOutcome<Resp>>
    where
        Req: prost::Message + Send + Sync + 'static,
        Resp: prost::Message + Default + Send + Sync + 'static,
    {
        let mut grpc = self.grpc.clone();
        grpc.ready().await.map_err(|e| {
            BwsError::transport(
                TransportErrorKind::Unavailable,
                "Unavailable",
                format!("service was not ready: {e}"),
            )
        })?;

        let mut request = tonic::Request::new(message);
        if let Some(at) = deadline {
            request.set_timeout(at.saturating_duration_since(Instant::now()));
        }

        let codec: ProstCodec<Req, Resp> = ProstCodec::default();
        let path = PathAndQuery::from_static(operation.rpc_path());
        let response = grpc.unary(request, path, codec).await?;

        let (metadata, message, _) = response.into_parts();
        Ok(CallOutcome::new(message, response_metadata(&metadata)))
    }
}

/// Unary responses carry headers and trailers merged into one map.
fn response_metadata(metadata: &MetadataMap) -> ResponseMetadata {
    let headers = metadata.clone().into_headers();
    ResponseMetadata::new("OK").with_pairs(headers.iter().map(|(name, value)| {
        (
            name.as_str().to_string(),
            String::from_utf8_lossy(value.as_bytes()).into_owned(),
        )
    }))
}

#[async_trait]
impl BwsTransport for GrpcTransport {
    fn kind(&self) -> Transport {
        Transport::Rpc
    }

    async fn probe(&self, probe: Probe, deadline: Option<Instant>) -> Result<ProbeResult> {
        let request = HealthCheckRequest {
            service: probe.service_name().to_string(),
        };
        let outcome: CallOutcome<HealthCheckResponse> =
            self.unary(Operation::HealthCheck, request, deadline).await?;
        let status = outcome.response.status();

        Ok(ProbeResult {
            probe,
            healthy: status == ServingStatus::Serving,
            status: status.to_string(),
            metadata: outcome.metadata,
        })
    }

    async fn liveness_detection(
        &self,
        request: LivenessDetectionRequest,
        deadline: Option<Instant>,
    ) -> Result<CallOutcome<LivenessDetectionResponse>> {
        self.unary(Operation::LiveDetection, request, deadline).await
    }

    async fn video_liveness_detection(
        &self,
        request: VideoLivenessDetectionRequest,
        deadline: Option<Instant>,
    ) -> Result<CallOutcome<LivenessDetectionResponse>> {
        self.unary(Operation::VideoLiveDetection, request, deadline).await
    }

    async fn photo_verify(
        &self,
        request: PhotoVerifyRequest,
        deadline: Option<Instant>,
    ) -> Result<CallOutcome<PhotoVerifyResponse>> {
        self.unary(Operation::PhotoVerify, request, deadline).await
    }

    async fn enroll(
        &self,
        request: FaceEnrollmentRequest,
        deadline: Option<Instant>,
    ) -> Result<CallOutcome<FaceEnrollmentResponse>> {
        self.unary(Operation::Enroll, request, deadline).await
    }

    async fn verify(
        &self,
        request: FaceVerificationRequest,
        deadline: Option<Instant>,
    ) -> Result<CallOutcome<FaceVerificationResponse>> {
        self.unary(Operation::Verify, request, deadline).await
    }

    async fn search(
        &self,
        request: FaceSearchRequest,
        deadline: Option<Instant>,
    ) -> Result<CallOutcome<FaceSearchResponse>> {
        self.unary(Operation::Search, request, deadline).await
    }

    async fn set_template_tags(
        &self,
        request: SetTemplateTagsRequest,
        deadline: Option<Instant>,
    ) -> Result<CallOutcome<SetTemplateTagsResponse>> {
        self.unary(Operation::SetTemplateTags, request, deadline).await
    }

    async fn get_template_status(
        &self,
        request: FaceTemplateStatusRequest,
        deadline: Option<Instant>,
    ) -> Result<CallOutcome<FaceTemplateStatus>> {
        self.unary(Operation::GetTemplateStatus, request, deadline).await
    }

    async fn get_class_count(
        &self,
        request: ClassCountRequest,
        deadline: Option<Instant>,
    ) -> Result<CallOutcome<ClassCountResponse>> {
        self.unary(Operation::GetClassCount, request, deadline).await
    }

    async fn delete_template(
        &self,
        request: DeleteTemplateRequest,
        deadline: Option<Instant>,
    ) -> Result<CallOutcome<DeleteTemplateResponse>> {
        self.unary(Operation::DeleteTemplate, request, deadline).await
    }
}
