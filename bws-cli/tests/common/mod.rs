#![allow(dead_code)] // each test binary uses a different subset

use std::sync::Mutex;

use async_trait::async_trait;
use serde::Serialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time::Instant;

use bws_cli::Result;
use bws_cli::domain::{Operation, Probe, Transport};
use bws_cli::ports::{BwsTransport, CallOutcome, ProbeResult, ResponseMetadata};
use bws_cli::proto::{
    ClassCountRequest, ClassCountResponse, DeleteTemplateRequest, DeleteTemplateResponse,
    FaceEnrollmentRequest, FaceEnrollmentResponse, FaceSearchRequest, FaceSearchResponse,
    FaceTemplateStatus, FaceTemplateStatusRequest, FaceVerificationRequest,
    FaceVerificationResponse, LivenessDetectionRequest, LivenessDetectionResponse,
    PhotoVerifyRequest, PhotoVerifyResponse, SetTemplateTagsRequest, SetTemplateTagsResponse,
    VideoLivenessDetectionRequest,
};

/// In-memory transport: records every request as JSON and replays canned
/// responses.
#[derive(Default)]
pub struct FakeTransport {
    calls: Mutex<Vec<(Operation, serde_json::Value)>>,
    pub liveness: LivenessDetectionResponse,
    pub template: FaceTemplateStatus,
}

impl FakeTransport {
    pub fn with_liveness(liveness: LivenessDetectionResponse) -> Self {
        Self {
            liveness,
            ..Self::default()
        }
    }

    pub fn with_template(template: FaceTemplateStatus) -> Self {
        Self {
            template,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<(Operation, serde_json::Value)> {
        self.calls.lock().unwrap().clone()
    }

    fn record<T: Serialize>(&self, operation: Operation, request: &T) {
        self.calls
            .lock()
            .unwrap()
            .push((operation, serde_json::to_value(request).unwrap()));
    }
}

fn ok<T>(response: T) -> Result<CallOutcome<T>> {
    Ok(CallOutcome::new(
        response,
        ResponseMetadata::new("OK").with_pairs([("x-served-by", "fake")]),
    ))
}

#[async_trait]
impl BwsTransport for FakeTransport {
    fn kind(&self) -> Transport {
        Transport::Rpc
    }

    async fn probe(&self, probe: Probe, _deadline: Option<Instant>) -> Result<ProbeResult> {
        self.record(Operation::HealthCheck, &probe);
        Ok(ProbeResult {
            probe,
            healthy: true,
            status: "SERVING".to_string(),
            metadata: ResponseMetadata::new("OK"),
        })
    }

    async fn liveness_detection(
        &self,
        request: LivenessDetectionRequest,
        _deadline: Option<Instant>,
    ) -> Result<CallOutcome<LivenessDetectionResponse>> {
        self.record(Operation::LiveDetection, &request);
        ok(self.liveness.clone())
    }

    async fn video_liveness_detection(
        &self,
        request: VideoLivenessDetectionRequest,
        _deadline: Option<Instant>,
    ) -> Result<CallOutcome<LivenessDetectionResponse>> {
        self.record(Operation::VideoLiveDetection, &request);
        ok(self.liveness.clone())
    }

    async fn photo_verify(
        &self,
        request: PhotoVerifyRequest,
        _deadline: Option<Instant>,
    ) -> Result<CallOutcome<PhotoVerifyResponse>> {
        self.record(Operation::PhotoVerify, &request);
        ok(PhotoVerifyResponse::default())
    }

    async fn enroll(
        &self,
        request: FaceEnrollmentRequest,
        _deadline: Option<Instant>,
    ) -> Result<CallOutcome<FaceEnrollmentResponse>> {
        self.record(Operation::Enroll, &request);
        ok(FaceEnrollmentResponse::default())
    }

    async fn verify(
        &self,
        request: FaceVerificationRequest,
        _deadline: Option<Instant>,
    ) -> Result<CallOutcome<FaceVerificationResponse>> {
        self.record(Operation::Verify, &request);
        ok(FaceVerificationResponse::default())
    }

    async fn search(
        &self,
        request: FaceSearchRequest,
        _deadline: Option<Instant>,
    ) -> Result<CallOutcome<FaceSearchResponse>> {
        self.record(Operation::Search, &request);
        ok(FaceSearchResponse::default())
    }

    async fn set_template_tags(
        &self,
        request: SetTemplateTagsRequest,
        _deadline: Option<Instant>,
    ) -> Result<CallOutcome<SetTemplateTagsResponse>> {
        self.record(Operation::SetTemplateTags, &request);
        ok(SetTemplateTagsResponse {})
    }

    async fn get_template_status(
        &self,
        request: FaceTemplateStatusRequest,
        _deadline: Option<Instant>,
    ) -> Result<CallOutcome<FaceTemplateStatus>> {
        self.record(Operation::GetTemplateStatus, &request);
        ok(self.template.clone())
    }

    async fn get_class_count(
        &self,
        request: ClassCountRequest,
        _deadline: Option<Instant>,
    ) -> Result<CallOutcome<ClassCountResponse>> {
        self.record(Operation::GetClassCount, &request);
        ok(ClassCountResponse { count: 3 })
    }

    async fn delete_template(
        &self,
        request: DeleteTemplateRequest,
        _deadline: Option<Instant>,
    ) -> Result<CallOutcome<DeleteTemplateResponse>> {
        self.record(Operation::DeleteTemplate, &request);
        ok(DeleteTemplateResponse {})
    }
}

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub head: String,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or_default()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim().eq_ignore_ascii_case(name).then(|| value.trim())
        })
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

pub struct CannedResponse {
    pub status: u16,
    pub reason: &'static str,
    pub body: String,
}

impl CannedResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            reason: "OK",
            body: body.into(),
        }
    }

    pub fn status(status: u16, reason: &'static str, body: impl Into<String>) -> Self {
        Self {
            status,
            reason,
            body: body.into(),
        }
    }
}

/// HTTP/1.1 server answering one canned response per connection, in order.
pub struct CannedServer {
    pub url: String,
    pub requests: mpsc::UnboundedReceiver<CapturedRequest>,
}

pub async fn canned_server(responses: Vec<CannedResponse>) -> CannedServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let (tx, requests) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        for response in responses {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            let Ok(request) = read_request(&mut stream).await else {
                return;
            };
            let _ = tx.send(request);

            let reply = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nX-Served-By: canned\r\nConnection: close\r\n\r\n{}",
                response.status,
                response.reason,
                response.body.len(),
                response.body
            );
            let _ = stream.write_all(reply.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });

    CannedServer { url, requests }
}

async fn read_request(stream: &mut TcpStream) -> std::io::Result<CapturedRequest> {
    let mut buffer = Vec::new();
    let mut chunk = [0_u8; 4096];

    let head_end = loop {
        let read = stream.read(&mut chunk).await?;
        if read == 0 {
            return Err(std::io::ErrorKind::UnexpectedEof.into());
        }
        buffer.extend_from_slice(&chunk[..read]);
        if let Some(position) = buffer.windows(4).position(|window| window == b"\r\n\r\n") {
            break position;
        }
    };

    let head = String::from_utf8_lossy(&buffer[..head_end]).into_owned();
    let length = head
        .lines()
        .find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);

    let body_start = head_end + 4;
    while buffer.len() < body_start + length {
        let read = stream.read(&mut chunk).await?;
        if read == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..read]);
    }
    let body_end = buffer.len().min(body_start + length);

    Ok(CapturedRequest {
        head,
        body: buffer[body_start..body_end].to_vec(),
    })
}

/// Accepts connections and never answers.
pub async fn hung_listener() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });

    url
}
