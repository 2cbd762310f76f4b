pub mod bearer;
pub mod correlation;
pub mod token;

pub use bearer::{BearerSource, TokenRenewal};
pub use correlation::{CorrelationId, CorrelationPolicy, CorrelationSource};
pub use token::{AUDIENCE, Claims, SigningAlgorithm, SigningKey, Token, TokenIssuer, issue};
