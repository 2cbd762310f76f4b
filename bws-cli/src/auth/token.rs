use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{BwsError, Result};

/// Audience every service token is minted for.
pub const AUDIENCE: &str = "BWS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SigningAlgorithm {
    Hs256,
    #[default]
    Hs512,
}

impl SigningAlgorithm {
    const fn jwt(self) -> Algorithm {
        match self {
            Self::Hs256 => Algorithm::HS256,
            Self::Hs512 => Algorithm::HS512,
        }
    }
}

impl std::str::FromStr for SigningAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "HS256" => Ok(Self::Hs256),
            "HS512" => Ok(Self::Hs512),
            _ => Err(format!("Unknown signing algorithm: {s}")),
        }
    }
}

/// Decoded symmetric key. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey(Vec<u8>);

impl SigningKey {
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| BwsError::InvalidKeyEncoding(e.to_string()))?;
        if bytes.is_empty() {
            return Err(BwsError::InvalidKeyEncoding("key is empty".to_string()));
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningKey(<{} bytes>)", self.0.len())
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    value: String,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl Token {
    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub const fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn expires_within(&self, margin: Duration) -> bool {
        Utc::now() + margin >= self.expires_at
    }

    /// Verifies the signature and audience and returns the claims.
    pub fn decode_claims(&self, key: &SigningKey, algorithm: SigningAlgorithm) -> Result<Claims> {
        let mut validation = Validation::new(algorithm.jwt());
        validation.set_audience(&[AUDIENCE]);
        let data = jsonwebtoken::decode::<Claims>(
            &self.value,
            &DecodingKey::from_secret(key.as_bytes()),
            &validation,
        )?;
        Ok(data.claims)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// Mints short-lived HMAC-signed tokens for one client identity.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    client_id: String,
    key: SigningKey,
    ttl_minutes: i64,
    algorithm: SigningAlgorithm,
}

impl TokenIssuer {
    pub fn new(client_id: impl Into<String>, key: SigningKey, ttl_minutes: i64) -> Result<Self> {
        if ttl_minutes <= 0 {
            return Err(BwsError::InvalidTtl(ttl_minutes));
        }
        Ok(Self {
            client_id: client_id.into(),
            key,
            ttl_minutes,
            algorithm: SigningAlgorithm::default(),
        })
    }

    #[must_use]
    pub const fn with_algorithm(mut self, algorithm: SigningAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub const fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm
    }

    pub fn issue(&self) -> Result<Token> {
        let issued_at = Utc::now();
        let expires_at = issued_at + Duration::minutes(self.ttl_minutes);
        let claims = Claims {
            sub: self.client_id.clone(),
            iss: self.client_id.clone(),
            aud: AUDIENCE.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let value = jsonwebtoken::encode(
            &Header::new(self.algorithm.jwt()),
            &claims,
            &EncodingKey::from_secret(self.key.as_bytes()),
        )?;

        tracing::debug!(
            client_id = %self.client_id,
            algorithm = ?self.algorithm,
            expires_at = %expires_at,
            "issued service token"
        );

        Ok(Token {
            value,
            issued_at,
            expires_at,
        })
    }
}

/// One-shot form: decode the key, then mint a token with the default algorithm.
pub fn issue(client_id: &str, signing_key_base64: &str, ttl_minutes: i64) -> Result<Token> {
    let key = SigningKey::from_base64(signing_key_base64)?;
    TokenIssuer::new(client_id, key, ttl_minutes)?.issue()
}
