use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::adapters::{DEFAULT_MAX_MESSAGE_BYTES, TransportOptions};
use crate::auth::{CorrelationPolicy, SigningAlgorithm, TokenRenewal};
use crate::error::{BwsError, Result};

pub const ENV_TOKEN_TTL_MINUTES: &str = "BWS_TOKEN_TTL_MINUTES";
pub const ENV_SIGNING_ALGORITHM: &str = "BWS_SIGNING_ALGORITHM";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub token: TokenConfig,
    pub transport: TransportConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    pub ttl_minutes: i64,
    pub algorithm: SigningAlgorithm,
    pub renewal: TokenRenewal,
    pub renew_margin_secs: u32,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: 5,
            algorithm: SigningAlgorithm::default(),
            renewal: TokenRenewal::default(),
            renew_margin_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    pub max_message_bytes: usize,
    pub correlation: CorrelationPolicy,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            max_message_bytes: DEFAULT_MAX_MESSAGE_BYTES,
            correlation: CorrelationPolicy::default(),
        }
    }
}

impl Config {
    /// Loads the explicit file when given, otherwise the global one, then
    /// applies environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => Self::load_global()?,
        };
        config.with_env_overrides(|name| std::env::var(name).ok())
    }

    pub fn global_path() -> PathBuf {
        let config_dir = directories::ProjectDirs::from("", "", "bws").map_or_else(
            || PathBuf::from("~/.config/bws"),
            |d| d.config_dir().to_path_buf(),
        );
        config_dir.join("config.toml")
    }

    fn load_global() -> Result<Self> {
        let config_path = Self::global_path();

        if config_path.exists() {
            tracing::debug!(path = %config_path.display(), "loading global config");
            Self::from_file(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| BwsError::Config(format!("cannot read {}: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| BwsError::Config(format!("{}: {e}", path.display())))
    }

    /// `lookup` resolves an environment variable by name.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(ttl) = lookup(ENV_TOKEN_TTL_MINUTES) {
            self.token.ttl_minutes = ttl.trim().parse().map_err(|_| {
                BwsError::Config(format!("{ENV_TOKEN_TTL_MINUTES} must be an integer, got '{ttl}'"))
            })?;
        }
        if let Some(algorithm) = lookup(ENV_SIGNING_ALGORITHM) {
            self.token.algorithm = algorithm
                .trim()
                .parse()
                .map_err(|e| BwsError::Config(format!("{ENV_SIGNING_ALGORITHM}: {e}")))?;
        }
        Ok(self)
    }

    pub const fn transport_options(&self) -> TransportOptions {
        TransportOptions {
            max_message_bytes: self.transport.max_message_bytes,
            correlation: self.transport.correlation,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.token.ttl_minutes, 5);
        assert_eq!(config.token.algorithm, SigningAlgorithm::Hs512);
        assert_eq!(config.token.renewal, TokenRenewal::Fixed);
        assert_eq!(config.transport.max_message_bytes, 50 * 1024 * 1024);
        assert_eq!(config.transport.correlation, CorrelationPolicy::PerCall);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config(
            r#"
[token]
ttl_minutes = 10
renewal = "renew-before-expiry"

[transport]
correlation = "per-client"
"#,
        );

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.token.ttl_minutes, 10);
        assert_eq!(config.token.renewal, TokenRenewal::RenewBeforeExpiry);
        assert_eq!(config.token.renew_margin_secs, 30);
        assert_eq!(config.token.algorithm, SigningAlgorithm::Hs512);
        assert_eq!(config.transport.correlation, CorrelationPolicy::PerClient);
        assert_eq!(config.transport.max_message_bytes, DEFAULT_MAX_MESSAGE_BYTES);
    }

    #[test]
    fn test_missing_explicit_file_is_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_malformed_file() {
        let file = write_config("[token]\nttl_minutes = \"soon\"\n");
        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, BwsError::Config(_)));
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::default()
            .with_env_overrides(|name| match name {
                ENV_TOKEN_TTL_MINUTES => Some("15".to_string()),
                ENV_SIGNING_ALGORITHM => Some("hs256".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.token.ttl_minutes, 15);
        assert_eq!(config.token.algorithm, SigningAlgorithm::Hs256);

        let err = Config::default()
            .with_env_overrides(|name| (name == ENV_TOKEN_TTL_MINUTES).then(|| "five".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_TOKEN_TTL_MINUTES));
    }
}
