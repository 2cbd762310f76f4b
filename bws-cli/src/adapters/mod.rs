//! Transport implementations of [`BwsTransport`] and the factory that picks one.

use std::sync::Arc;

use crate::auth::{BearerSource, CorrelationPolicy, CorrelationSource};
use crate::domain::{ConnectionContext, Transport};
use crate::error::Result;
use crate::ports::BwsTransport;

pub mod grpc;
pub mod rest;

pub use grpc::GrpcTransport;
pub use rest::RestTransport;

pub const AUTHORIZATION: &str = "authorization";
pub const REFERENCE_NUMBER: &str = "reference-number";

/// Large enough for image and video payloads echoed back in diagnostics.
pub const DEFAULT_MAX_MESSAGE_BYTES: usize = 50 * 1024 * 1024;

/// Per-call metadata attached by both transports.
#[derive(Debug, Clone)]
pub struct CallCredentials {
    bearer: Option<Arc<BearerSource>>,
    correlation: Arc<CorrelationSource>,
}

impl CallCredentials {
    pub fn new(bearer: Option<BearerSource>, correlation: CorrelationSource) -> Self {
        Self {
            bearer: bearer.map(Arc::new),
            correlation: Arc::new(correlation),
        }
    }

    pub const fn has_bearer(&self) -> bool {
        self.bearer.is_some()
    }

    /// Header pairs for the next outbound call.
    pub fn headers(&self) -> Result<Vec<(&'static str, String)>> {
        let reference = self.correlation.next();
        tracing::Span::current().record("reference_number", tracing::field::display(&reference));
        tracing::debug!(reference_number = %reference, "attaching call metadata");

        let mut headers = Vec::with_capacity(2);
        if let Some(bearer) = &self.bearer {
            headers.push((AUTHORIZATION, bearer.authorization()?));
        }
        headers.push((REFERENCE_NUMBER, reference.to_string()));
        Ok(headers)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportOptions {
    pub max_message_bytes: usize,
    pub correlation: CorrelationPolicy,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            max_message_bytes: DEFAULT_MAX_MESSAGE_BYTES,
            correlation: CorrelationPolicy::default(),
        }
    }
}

pub struct ClientFactory {
    options: TransportOptions,
}

impl ClientFactory {
    pub const fn new(options: TransportOptions) -> Self {
        Self { options }
    }

    /// Builds the client for the context's transport. Connection errors are
    /// deferred to the first call; only a malformed endpoint fails here.
    pub fn build(
        &self,
        ctx: &ConnectionContext,
        bearer: Option<BearerSource>,
    ) -> Result<Arc<dyn BwsTransport>> {
        let credentials =
            CallCredentials::new(bearer, CorrelationSource::new(self.options.correlation));

        if !ctx.is_secure() && credentials.has_bearer() {
            tracing::warn!(
                host = %ctx.host(),
                transport = %ctx.transport(),
                "bearer token will be sent over an unencrypted connection"
            );
        }

        let transport: Arc<dyn BwsTransport> = match ctx.transport() {
            Transport::Rpc => Arc::new(GrpcTransport::connect(
                ctx,
                credentials,
                self.options.max_message_bytes,
            )?),
            Transport::Http => Arc::new(RestTransport::new(
                ctx,
                credentials,
                self.options.max_message_bytes,
            )?),
        };
        Ok(transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{SigningKey, TokenIssuer};
    use crate::domain::Deadline;

    fn bearer() -> BearerSource {
        let issuer = TokenIssuer::new("client", SigningKey::from_base64("a2V5").unwrap(), 5).unwrap();
        BearerSource::fixed(issuer.issue().unwrap())
    }

    #[test]
    fn test_headers_with_bearer() {
        let credentials = CallCredentials::new(
            Some(bearer()),
            CorrelationSource::new(CorrelationPolicy::PerCall),
        );
        let headers = credentials.headers().unwrap();

        assert_eq!(headers.len(), 2);
        assert_eq!(headers[0].0, AUTHORIZATION);
        assert!(headers[0].1.starts_with("Bearer "));
        assert_eq!(headers[1].0, REFERENCE_NUMBER);
        assert_ne!(headers[1].1, credentials.headers().unwrap()[1].1);
    }

    #[test]
    fn test_headers_without_bearer() {
        let credentials =
            CallCredentials::new(None, CorrelationSource::new(CorrelationPolicy::PerClient));
        let first = credentials.headers().unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first, credentials.headers().unwrap());
    }

    #[tokio::test]
    async fn test_factory_selects_transport() {
        let factory = ClientFactory::new(TransportOptions::default());

        let ctx = ConnectionContext::new("http://127.0.0.1:1", None, Transport::Rpc, Deadline::NONE)
            .unwrap();
        assert_eq!(factory.build(&ctx, None).unwrap().kind(), Transport::Rpc);

        let ctx = ConnectionContext::new("http://127.0.0.1:1", None, Transport::Http, Deadline::NONE)
            .unwrap();
        assert_eq!(factory.build(&ctx, Some(bearer())).unwrap().kind(), Transport::Http);
    }
}
