use std::fmt;

use serde::Serialize;

/// Every unit of work the client can ask the service to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    HealthCheck,
    LiveDetection,
    VideoLiveDetection,
    PhotoVerify,
    Enroll,
    Verify,
    Search,
    SetTemplateTags,
    GetTemplateStatus,
    GetClassCount,
    DeleteTemplate,
}

impl Operation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HealthCheck => "healthcheck",
            Self::LiveDetection => "livedetect",
            Self::VideoLiveDetection => "videolivedetect",
            Self::PhotoVerify => "photoverify",
            Self::Enroll => "enroll",
            Self::Verify => "verify",
            Self::Search => "search",
            Self::SetTemplateTags => "settags",
            Self::GetTemplateStatus => "gettemplate",
            Self::GetClassCount => "classcount",
            Self::DeleteTemplate => "deletetemplate",
        }
    }

    /// gRPC method path.
    pub const fn rpc_path(self) -> &'static str {
        match self {
            Self::HealthCheck => "/grpc.health.v1.Health/Check",
            Self::LiveDetection => "/bioid.services.v1.BioIDWebService/LivenessDetection",
            Self::VideoLiveDetection => "/bioid.services.v1.BioIDWebService/VideoLivenessDetection",
            Self::PhotoVerify => "/bioid.services.v1.BioIDWebService/PhotoVerify",
            Self::Enroll => "/bioid.services.v1.FaceRecognition/Enroll",
            Self::Verify => "/bioid.services.v1.FaceRecognition/Verify",
            Self::Search => "/bioid.services.v1.FaceRecognition/Search",
            Self::SetTemplateTags => "/bioid.services.v1.FaceRecognition/SetTemplateTags",
            Self::GetTemplateStatus => "/bioid.services.v1.FaceRecognition/GetTemplateStatus",
            Self::GetClassCount => "/bioid.services.v1.FaceRecognition/GetClassCount",
            Self::DeleteTemplate => "/bioid.services.v1.FaceRecognition/DeleteTemplate",
        }
    }

    /// REST path relative to the host. Health probes use [`Probe::rest_path`].
    pub const fn rest_path(self) -> &'static str {
        match self {
            Self::HealthCheck => "livez",
            Self::LiveDetection => "api/v1/livenessdetection",
            Self::VideoLiveDetection => "api/v1/videolivenessdetection",
            Self::PhotoVerify => "api/v1/photoverify",
            Self::Enroll => "api/face/v1/enroll",
            Self::Verify => "api/face/v1/verify",
            Self::Search => "api/face/v1/search",
            Self::SetTemplateTags => "api/face/v1/settemplatetags",
            Self::GetTemplateStatus => "api/face/v1/gettemplatestatus",
            Self::GetClassCount => "api/face/v1/getclasscount",
            Self::DeleteTemplate => "api/face/v1/deletetemplate",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Probe {
    Liveness,
    Readiness,
}

impl Probe {
    pub const ALL: [Self; 2] = [Self::Liveness, Self::Readiness];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Liveness => "Liveness",
            Self::Readiness => "Readiness",
        }
    }

    /// Service name sent in the gRPC health check.
    pub const fn service_name(self) -> &'static str {
        match self {
            Self::Liveness => "liveness",
            Self::Readiness => "readiness",
        }
    }

    pub const fn rest_path(self) -> &'static str {
        match self {
            Self::Liveness => "livez",
            Self::Readiness => "readyz",
        }
    }
}
