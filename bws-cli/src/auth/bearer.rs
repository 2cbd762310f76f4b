use std::sync::{Mutex, PoisonError};

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::token::{Token, TokenIssuer};
use crate::error::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenRenewal {
    /// Mint once, reuse for the lifetime of the client.
    #[default]
    Fixed,
    RenewBeforeExpiry,
}

/// Supplies the `Authorization` value for every outbound call.
///
/// A fixed source hands out the token captured at build time unchanged; a
/// renewing one re-issues once the current token is within `margin` of expiry.
#[derive(Debug)]
pub enum BearerSource {
    Fixed(Token),
    Renewing {
        issuer: TokenIssuer,
        current: Mutex<Token>,
        margin: Duration,
    },
}

impl BearerSource {
    pub const fn fixed(token: Token) -> Self {
        Self::Fixed(token)
    }

    pub fn from_policy(issuer: TokenIssuer, renewal: TokenRenewal, margin_secs: u32) -> Result<Self> {
        let token = issuer.issue()?;
        Ok(match renewal {
            TokenRenewal::Fixed => Self::Fixed(token),
            TokenRenewal::RenewBeforeExpiry => Self::Renewing {
                issuer,
                current: Mutex::new(token),
                margin: Duration::seconds(i64::from(margin_secs)),
            },
        })
    }

    pub fn token(&self) -> Result<Token> {
        match self {
            Self::Fixed(token) => Ok(token.clone()),
            Self::Renewing {
                issuer,
                current,
                margin,
            } => {
                let mut current = current.lock().unwrap_or_else(PoisonError::into_inner);
                if current.expires_within(*margin) {
                    *current = issuer.issue()?;
                    tracing::info!(expires_at = %current.expires_at(), "renewed service token");
                }
                Ok(current.clone())
            }
        }
    }

    pub fn authorization(&self) -> Result<String> {
        Ok(format!("Bearer {}", self.token()?.as_str()))
    }
}
