use std::future::Future;
use std::sync::Arc;

use tokio::time::Instant;
use tracing::Instrument;

use crate::domain::{Deadline, Operation, Probe, Validate};
use crate::error::{BwsError, ErrorKind, Result};
use crate::ports::{BwsTransport, CallOutcome, ProbeResult};
use crate::proto::{
    ClassCountRequest, ClassCountResponse, DeleteTemplateRequest, DeleteTemplateResponse,
    FaceEnrollmentRequest, FaceEnrollmentResponse, FaceSearchRequest, FaceSearchResponse,
    FaceTemplateStatus, FaceTemplateStatusRequest, FaceVerificationRequest,
    FaceVerificationResponse, LivenessDetectionRequest, LivenessDetectionResponse,
    PhotoVerifyRequest, PhotoVerifyResponse, SetTemplateTagsRequest, SetTemplateTagsResponse,
    VideoLivenessDetectionRequest,
};

/// Runs operations against one transport under the invocation's deadline.
///
/// Requests are validated before anything is sent. Each call gets its own
/// absolute deadline computed when it starts; a call still pending at that
/// instant is abandoned and reported as `DeadlineExceeded`, whatever the
/// transport itself would have said.
pub struct OperationDispatcher<T>
where
    T: BwsTransport + ?Sized,
{
    transport: Arc<T>,
    deadline: Deadline,
}

impl<T> OperationDispatcher<T>
where
    T: BwsTransport + ?Sized,
{
    pub const fn new(transport: Arc<T>, deadline: Deadline) -> Self {
        Self {
            transport,
            deadline,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn bounded<R, F, Fut>(&self, operation: Operation, call: F) -> Result<R>
    where
        F: FnOnce(Arc<T>, Option<Instant>) -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        let at = self.deadline.start();
        // The transport records the reference number once it is attached.
        let span = tracing::debug_span!(
            "call",
            %operation,
            transport = %self.transport.kind(),
            reference_number = tracing::field::Empty,
        );
        span.in_scope(|| {
            tracing::debug!(
                deadline_ms = self.deadline.budget().map(|budget| budget.as_millis()),
                "dispatching call"
            );
        });

        let future = call(Arc::clone(&self.transport), at).instrument(span.clone());
        let Some(at) = at else {
            return future.await;
        };

        match tokio::time::timeout_at(at, future).await {
            Ok(Err(error)) if Instant::now() >= at && is_transport(&error) => {
                span.in_scope(|| {
                    tracing::debug!(error = %error, "transport failed after the deadline");
                });
                Err(self.exceeded())
            }
            Ok(result) => result,
            Err(_elapsed) => Err(self.exceeded()),
        }
    }

    fn exceeded(&self) -> BwsError {
        BwsError::deadline_exceeded(self.deadline.budget().map_or(0, |budget| budget.as_millis()))
    }

    /// Runs the liveness probe, then the readiness probe.
    pub async fn health(&self) -> Result<Vec<ProbeResult>> {
        let mut results = Vec::with_capacity(Probe::ALL.len());
        for probe in Probe::ALL {
            let result = self
                .bounded(Operation::HealthCheck, |transport, at| async move {
                    transport.probe(probe, at).await
                })
                .await?;
            results.push(result);
        }
        Ok(results)
    }

    pub async fn liveness_detection(
        &self,
        request: LivenessDetectionRequest,
    ) -> Result<CallOutcome<LivenessDetectionResponse>> {
        request.validate()?;
        self.bounded(Operation::LiveDetection, |transport, at| async move {
            transport.liveness_detection(request, at).await
        })
        .await
    }

    pub async fn video_liveness_detection(
        &self,
        request: VideoLivenessDetectionRequest,
    ) -> Result<CallOutcome<LivenessDetectionResponse>> {
        request.validate()?;
        self.bounded(Operation::VideoLiveDetection, |transport, at| async move {
            transport.video_liveness_detection(request, at).await
        })
        .await
    }

    pub async fn photo_verify(
        &self,
        request: PhotoVerifyRequest,
    ) -> Result<CallOutcome<PhotoVerifyResponse>> {
        request.validate()?;
        self.bounded(Operation::PhotoVerify, |transport, at| async move {
            transport.photo_verify(request, at).await
        })
        .await
    }

    pub async fn enroll(
        &self,
        request: FaceEnrollmentRequest,
    ) -> Result<CallOutcome<FaceEnrollmentResponse>> {
        request.validate()?;
        self.bounded(Operation::Enroll, |transport, at| async move {
            transport.enroll(request, at).await
        })
        .await
    }

    pub async fn verify(
        &self,
        request: FaceVerificationRequest,
    ) -> Result<CallOutcome<FaceVerificationResponse>> {
        request.validate()?;
        self.bounded(Operation::Verify, |transport, at| async move {
            transport.verify(request, at).await
        })
        .await
    }

    pub async fn search(&self, request: FaceSearchRequest) -> Result<CallOutcome<FaceSearchResponse>> {
        request.validate()?;
        self.bounded(Operation::Search, |transport, at| async move {
            transport.search(request, at).await
        })
        .await
    }

    pub async fn set_template_tags(
        &self,
        request: SetTemplateTagsRequest,
    ) -> Result<CallOutcome<SetTemplateTagsResponse>> {
        request.validate()?;
        self.bounded(Operation::SetTemplateTags, |transport, at| async move {
            transport.set_template_tags(request, at).await
        })
        .await
    }

    pub async fn get_template_status(
        &self,
        request: FaceTemplateStatusRequest,
    ) -> Result<CallOutcome<FaceTemplateStatus>> {
        request.validate()?;
        self.bounded(Operation::GetTemplateStatus, |transport, at| async move {
            transport.get_template_status(request, at).await
        })
        .await
    }

    pub async fn get_class_count(
        &self,
        request: ClassCountRequest,
    ) -> Result<CallOutcome<ClassCountResponse>> {
        request.validate()?;
        self.bounded(Operation::GetClassCount, |transport, at| async move {
            transport.get_class_count(request, at).await
        })
        .await
    }

    pub async fn delete_template(
        &self,
        request: DeleteTemplateRequest,
    ) -> Result<CallOutcome<DeleteTemplateResponse>> {
        request.validate()?;
        self.bounded(Operation::DeleteTemplate, |transport, at| async move {
            transport.delete_template(request, at).await
        })
        .await
    }
}

const fn is_transport(error: &BwsError) -> bool {
    matches!(error.kind(), ErrorKind::Transport(_))
}
