use std::fmt;
use std::time::Duration;

use tokio::time::Instant;
use url::Url;

use crate::auth::SigningKey;
use crate::error::{BwsError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Transport {
    /// Binary gRPC.
    #[default]
    Rpc,
    /// JSON over HTTP.
    Http,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Rpc => "gRPC",
            Self::Http => "REST",
        })
    }
}

/// Client-imposed call budget. Absent or non-positive means no deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadline(Option<Duration>);

impl Deadline {
    pub const NONE: Self = Self(None);

    pub fn from_millis(millis: Option<i64>) -> Self {
        match millis.and_then(|ms| u64::try_from(ms).ok()) {
            Some(ms) if ms > 0 => Self(Some(Duration::from_millis(ms))),
            _ => Self(None),
        }
    }

    pub const fn budget(self) -> Option<Duration> {
        self.0
    }

    /// Absolute instant for a call starting now.
    pub fn start(self) -> Option<Instant> {
        self.0.map(|budget| Instant::now() + budget)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    client_id: String,
    signing_key: SigningKey,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, signing_key_base64: &str) -> Result<Self> {
        let client_id = client_id.into();
        if client_id.trim().is_empty() {
            return Err(BwsError::InvalidRequest("client id must not be empty".to_string()));
        }
        Ok(Self {
            client_id,
            signing_key: SigningKey::from_base64(signing_key_base64)?,
        })
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub const fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

/// Everything needed to reach the service for one invocation. Built once from
/// validated input and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ConnectionContext {
    host: Url,
    credentials: Option<Credentials>,
    transport: Transport,
    deadline: Deadline,
}

impl ConnectionContext {
    pub fn new(
        host: &str,
        credentials: Option<Credentials>,
        transport: Transport,
        deadline: Deadline,
    ) -> Result<Self> {
        Ok(Self {
            host: parse_host(host)?,
            credentials,
            transport,
            deadline,
        })
    }

    pub const fn host(&self) -> &Url {
        &self.host
    }

    pub const fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub const fn transport(&self) -> Transport {
        self.transport
    }

    pub const fn deadline(&self) -> Deadline {
        self.deadline
    }

    pub fn is_secure(&self) -> bool {
        self.host.scheme() == "https"
    }
}

fn parse_host(host: &str) -> Result<Url> {
    let url = Url::parse(host).map_err(|e| BwsError::invalid_endpoint(host, e))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(BwsError::invalid_endpoint(
            host,
            format!("unsupported scheme '{}', expected http or https", url.scheme()),
        ));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(BwsError::invalid_endpoint(host, "missing host name"));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_deadline_from_millis() {
        assert_eq!(Deadline::from_millis(None), Deadline::NONE);
        assert_eq!(Deadline::from_millis(Some(0)), Deadline::NONE);
        assert_eq!(Deadline::from_millis(Some(-20)), Deadline::NONE);
        assert_eq!(
            Deadline::from_millis(Some(1500)).budget(),
            Some(Duration::from_millis(1500))
        );
    }

    #[tokio::test]
    async fn test_deadline_start_is_relative_to_now() {
        let deadline = Deadline::from_millis(Some(250));
        let before = Instant::now();
        let at = deadline.start().unwrap();
        assert!(at >= before + Duration::from_millis(250));
        assert!(Deadline::NONE.start().is_none());
    }

    #[test]
    fn test_context_parses_host() {
        let ctx = ConnectionContext::new("https://bws.example.com", None, Transport::Rpc, Deadline::NONE)
            .unwrap();
        assert!(ctx.is_secure());
        assert_eq!(ctx.host().host_str(), Some("bws.example.com"));

        let ctx = ConnectionContext::new("http://localhost:5000", None, Transport::Http, Deadline::NONE)
            .unwrap();
        assert!(!ctx.is_secure());
    }

    #[test]
    fn test_context_rejects_bad_hosts() {
        for host in ["not a uri", "ftp://files.example.com", "bws.example.com"] {
            let err = ConnectionContext::new(host, None, Transport::Rpc, Deadline::NONE).unwrap_err();
            assert!(matches!(err, BwsError::InvalidEndpoint { .. }), "{host}");
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
    }

    #[test]
    fn test_credentials_validate_key() {
        let err = Credentials::new("client", "%%%").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authentication);

        let creds = Credentials::new("client", "YmFzZTY0").unwrap();
        assert_eq!(creds.client_id(), "client");
        assert_eq!(creds.signing_key().as_bytes(), b"base64");
    }
}
