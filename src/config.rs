//! Environment-driven configuration
//!
//! | Variable                    | Default                 |
//! |-----------------------------|-------------------------|
//! | `JA2EN_ENGINE_URL`          | (required)              |
//! | `JA2EN_ENGINE_TOKEN`        | (none)                  |
//! | `JA2EN_SOURCE_LANG`         | `ja`                    |
//! | `JA2EN_TARGET_LANG`         | `en`                    |
//! | `JA2EN_ENGINE_TIMEOUT_SECS` | `60`                    |
//! | `JA2EN_SPLIT_SENTENCES`     | `false`                 |
//! | `JA2EN_HOST`                | `0.0.0.0`               |
//! | `JA2EN_PORT`                | `14366`                 |

use crate::mt::error::{MtError, MtResult};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_SOURCE_LANG: &str = "ja";
pub const DEFAULT_TARGET_LANG: &str = "en";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 14366;

/// Where and how to reach the translation engine
#[derive(Clone)]
pub struct EngineConfig {
    pub endpoint: String,
    pub token: Option<String>,
    pub source_lang: String,
    pub target_lang: String,
    pub timeout: Duration,
}

impl EngineConfig {
    /// Config for `endpoint` with default languages and timeout
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: None,
            source_lang: DEFAULT_SOURCE_LANG.to_string(),
            target_lang: DEFAULT_TARGET_LANG.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn from_env() -> MtResult<Self> {
        let endpoint = std::env::var("JA2EN_ENGINE_URL").map_err(|_| {
            MtError::ConfigError("JA2EN_ENGINE_URL environment variable not set".to_string())
        })?;

        Ok(Self {
            endpoint,
            token: std::env::var("JA2EN_ENGINE_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
            source_lang: env_or("JA2EN_SOURCE_LANG", DEFAULT_SOURCE_LANG.to_string())?,
            target_lang: env_or("JA2EN_TARGET_LANG", DEFAULT_TARGET_LANG.to_string())?,
            timeout: Duration::from_secs(env_or("JA2EN_ENGINE_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?),
        })
    }
}

impl std::fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineConfig")
            .field("endpoint", &self.endpoint)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("source_lang", &self.source_lang)
            .field("target_lang", &self.target_lang)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// HTTP listener and pipeline settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub split_sentences: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            split_sentences: false,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> MtResult<Self> {
        let defaults = Self::default();
        Ok(Self {
            host: env_or("JA2EN_HOST", defaults.host)?,
            port: env_or("JA2EN_PORT", defaults.port)?,
            split_sentences: env_or("JA2EN_SPLIT_SENTENCES", defaults.split_sentences)?,
        })
    }

    /// `host:port` string suitable for binding a listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Read and parse `key`, falling back to `default` when unset
fn env_or<T: FromStr>(key: &str, default: T) -> MtResult<T> {
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> MtResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| MtError::ConfigError(format!("{} has invalid value '{}'", key, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:14366");
        assert!(!config.split_sentences);
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value::<u16>("PORT", " 8080 ").unwrap(), 8080);
        assert!(parse_value::<bool>("SPLIT", "true").unwrap());
        match parse_value::<u16>("PORT", "eighty") {
            Err(MtError::ConfigError(msg)) => assert!(msg.contains("PORT")),
            _ => panic!("Expected ConfigError"),
        }
    }

    #[test]
    fn test_engine_config_defaults() {
        let config = EngineConfig::new("http://localhost:5000/translate");
        assert_eq!(config.source_lang, "ja");
        assert_eq!(config.target_lang, "en");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(config.token.is_none());
    }

    #[test]
    fn test_engine_config_debug_masks_token() {
        let mut config = EngineConfig::new("http://localhost");
        config.token = Some("secret-token".to_string());
        let debug = format!("{:?}", config);
        assert!(debug.contains("***"));
        assert!(!debug.contains("secret-token"));
    }

    #[test]
    fn test_engine_from_env_without_url() {
        unsafe {
            std::env::remove_var("JA2EN_ENGINE_URL");
        }
        match EngineConfig::from_env() {
            Err(MtError::ConfigError(msg)) => assert!(msg.contains("not set")),
            _ => panic!("Expected ConfigError"),
        }
    }
}
