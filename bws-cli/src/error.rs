use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BwsError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Signing key is not valid base64: {0}")]
    InvalidKeyEncoding(String),

    #[error("Token lifetime must be positive, got {0} minute(s)")]
    InvalidTtl(i64),

    #[error("Failed to sign token: {0}")]
    TokenSigning(#[from] jsonwebtoken::errors::Error),

    #[error("{kind} [{code}]: {detail}")]
    Transport {
        kind: TransportErrorKind,
        code: String,
        detail: String,
    },

    #[error("Failed to read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed response payload: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse classification every failure folds into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad local input; nothing was sent.
    Validation,
    /// Key or token could not be produced; nothing was sent.
    Authentication,
    Transport(TransportErrorKind),
    /// Anything the transports' own error models do not describe.
    Unexpected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Unauthenticated,
    DeadlineExceeded,
    Unavailable,
    InvalidArgument,
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Unauthenticated => "Unauthenticated",
            Self::DeadlineExceeded => "Deadline exceeded",
            Self::Unavailable => "Service unavailable",
            Self::InvalidArgument => "Invalid argument",
            Self::Other => "Transport error",
        };
        f.write_str(label)
    }
}

impl BwsError {
    pub fn transport(
        kind: TransportErrorKind,
        code: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self::Transport {
            kind,
            code: code.into(),
            detail: detail.into(),
        }
    }

    pub fn deadline_exceeded(budget_millis: u128) -> Self {
        Self::transport(
            TransportErrorKind::DeadlineExceeded,
            "DeadlineExceeded",
            format!("call did not complete within {budget_millis} ms"),
        )
    }

    pub fn invalid_endpoint(endpoint: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::InvalidEndpoint {
            endpoint: endpoint.into(),
            reason: reason.to_string(),
        }
    }

    /// Maps a non-2xx HTTP response onto the transport taxonomy.
    pub fn from_http_status(status: u16, reason: Option<&str>, body: &str) -> Self {
        let kind = match status {
            401 | 403 => TransportErrorKind::Unauthenticated,
            400 | 422 => TransportErrorKind::InvalidArgument,
            408 | 504 => TransportErrorKind::DeadlineExceeded,
            502 | 503 => TransportErrorKind::Unavailable,
            _ => TransportErrorKind::Other,
        };
        let code = reason.map_or_else(
            || format!("HTTP {status}"),
            |reason| format!("HTTP {status} {reason}"),
        );
        let detail = if body.trim().is_empty() {
            "(empty response body)".to_string()
        } else {
            body.trim().to_string()
        };
        Self::transport(kind, code, detail)
    }

    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRequest(_) | Self::InvalidEndpoint { .. } | Self::Config(_) => {
                ErrorKind::Validation
            }
            Self::InvalidKeyEncoding(_) | Self::InvalidTtl(_) | Self::TokenSigning(_) => {
                ErrorKind::Authentication
            }
            Self::Transport { kind, .. } => ErrorKind::Transport(*kind),
            Self::ReadFile { .. } | Self::Io(_) | Self::Serialization(_) => ErrorKind::Unexpected,
        }
    }

    pub const fn exit_code(&self) -> u8 {
        match self.kind() {
            ErrorKind::Transport(_) => 1,
            ErrorKind::Validation | ErrorKind::Authentication => 2,
            ErrorKind::Unexpected => 3,
        }
    }
}

impl From<tonic::Status> for BwsError {
    fn from(status: tonic::Status) -> Self {
        use tonic::Code;

        let kind = match status.code() {
            Code::Unauthenticated | Code::PermissionDenied => TransportErrorKind::Unauthenticated,
            Code::DeadlineExceeded => TransportErrorKind::DeadlineExceeded,
            Code::Unavailable => TransportErrorKind::Unavailable,
            Code::InvalidArgument => TransportErrorKind::InvalidArgument,
            _ => TransportErrorKind::Other,
        };
        let detail = if status.message().is_empty() {
            status.code().description().to_string()
        } else {
            status.message().to_string()
        };
        Self::transport(kind, format!("{:?}", status.code()), detail)
    }
}

impl From<reqwest::Error> for BwsError {
    fn from(error: reqwest::Error) -> Self {
        let kind = if error.is_timeout() {
            TransportErrorKind::DeadlineExceeded
        } else if error.is_connect() {
            TransportErrorKind::Unavailable
        } else {
            TransportErrorKind::Other
        };
        let code = error.status().map_or_else(
            || "HTTP request failed".to_string(),
            |status| format!("HTTP {}", status.as_u16()),
        );
        Self::transport(kind, code, error_chain(&error))
    }
}

/// Joins an error and its sources into one line.
pub fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

pub type Result<T> = std::result::Result<T, BwsError>;
