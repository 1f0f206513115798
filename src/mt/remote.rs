//! HTTP client for a remote inference server
//!
//! The pretrained Japanese→English transformer runs in its own process
//! (typically on a GPU host). This engine talks to it over a small JSON
//! contract:
//!
//! ```text
//! POST <endpoint>
//! {"q": ["こんにちは"], "source": "ja", "target": "en"}
//!
//! 200 OK
//! {"translations": ["Hello"]}
//! ```
//!
//! # Example
//!
//! ```ignore
//! use ja2en::mt::{MachineTranslator, RemoteEngine};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads JA2EN_ENGINE_URL and friends
//!     let engine = RemoteEngine::from_env()?;
//!     println!("{}", engine.translate("こんにちは").await?);
//!     Ok(())
//! }
//! ```

use crate::config::EngineConfig;
use crate::mt::error::{MtError, MtResult};
use crate::mt::translator::{MachineTranslator, normalize_locale, validate_locale};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct EngineRequest<'a> {
    q: &'a [String],
    source: &'a str,
    target: &'a str,
}

#[derive(Deserialize)]
struct EngineResponse {
    translations: Vec<String>,
}

/// Translation engine reached over HTTP
#[derive(Clone)]
pub struct RemoteEngine {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
    source_lang: String,
    target_lang: String,
}

impl RemoteEngine {
    /// Maximum number of texts per request
    const MAX_BATCH_SIZE: usize = 64;

    /// Maximum characters per text
    const MAX_CHARS_PER_STRING: usize = 10_000;

    /// Create a new RemoteEngine from explicit configuration
    ///
    /// # Arguments
    ///
    /// * `config` - Endpoint, optional bearer token, language pair and timeout
    ///
    /// # Returns
    ///
    /// * `Ok(Self)` - New engine instance
    /// * `Err(MtError)` - If the endpoint is empty, a locale is invalid, or
    ///   the HTTP client cannot be built
    ///
    /// # Example
    ///
    /// ```ignore
    /// let engine = RemoteEngine::new(EngineConfig::new("http://gpu-host:5000/translate"))?;
    /// ```
    pub fn new(config: EngineConfig) -> MtResult<Self> {
        if config.endpoint.trim().is_empty() {
            return Err(MtError::ConfigError(
                "Engine endpoint cannot be empty".to_string(),
            ));
        }
        validate_locale(&config.source_lang)?;
        validate_locale(&config.target_lang)?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MtError::NetworkError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint,
            token: config.token,
            source_lang: normalize_locale(&config.source_lang),
            target_lang: normalize_locale(&config.target_lang),
        })
    }

    /// Create a RemoteEngine from `JA2EN_ENGINE_*` environment variables
    pub fn from_env() -> MtResult<Self> {
        Self::new(EngineConfig::from_env()?)
    }

    fn chunk_batch(texts: &[String]) -> Vec<&[String]> {
        texts.chunks(Self::MAX_BATCH_SIZE).collect()
    }

    fn check_length(index: usize, text: &str) -> MtResult<()> {
        if text.chars().count() > Self::MAX_CHARS_PER_STRING {
            return Err(MtError::EngineError(format!(
                "Text at index {} exceeds maximum length of {} characters",
                index,
                Self::MAX_CHARS_PER_STRING
            )));
        }
        Ok(())
    }

    async fn translate_chunk(&self, texts: &[String]) -> MtResult<Vec<String>> {
        let body = EngineRequest {
            q: texts,
            source: &self.source_lang,
            target: &self.target_lang,
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            return Err(if status.is_client_error() {
                MtError::ConfigError(format!("Engine rejected request ({}): {}", status, error_text))
            } else {
                MtError::EngineError(format!("Engine server error ({}): {}", status, error_text))
            });
        }

        let parsed: EngineResponse = response.json().await?;

        if parsed.translations.len() != texts.len() {
            return Err(MtError::EngineError(format!(
                "Engine returned {} translations for {} texts",
                parsed.translations.len(),
                texts.len()
            )));
        }

        Ok(parsed.translations)
    }
}

impl std::fmt::Debug for RemoteEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteEngine")
            .field("endpoint", &self.endpoint)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("source_lang", &self.source_lang)
            .field("target_lang", &self.target_lang)
            .finish()
    }
}

#[async_trait]
impl MachineTranslator for RemoteEngine {
    async fn translate(&self, text: &str) -> MtResult<String> {
        if text.is_empty() {
            return Ok(String::new());
        }
        Self::check_length(0, text)?;

        let results = self.translate_chunk(&[text.to_string()]).await?;
        Ok(results.into_iter().next().unwrap_or_default())
    }

    async fn translate_batch(&self, texts: &[String]) -> MtResult<Vec<String>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        for (i, text) in texts.iter().enumerate() {
            Self::check_length(i, text)?;
        }

        let mut all_results = Vec::with_capacity(texts.len());
        for chunk in Self::chunk_batch(texts) {
            all_results.extend(self.translate_chunk(chunk).await?);
        }

        Ok(all_results)
    }

    fn provider_name(&self) -> &str {
        "Remote Engine"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> RemoteEngine {
        RemoteEngine::new(EngineConfig::new("http://127.0.0.1:9/translate")).unwrap()
    }

    // ========== Initialization Tests ==========

    #[test]
    fn test_new_with_valid_endpoint() {
        assert_eq!(engine().provider_name(), "Remote Engine");
    }

    #[test]
    fn test_new_with_empty_endpoint() {
        match RemoteEngine::new(EngineConfig::new("  ")) {
            Err(MtError::ConfigError(msg)) => assert!(msg.contains("empty")),
            _ => panic!("Expected ConfigError"),
        }
    }

    #[test]
    fn test_new_with_invalid_locale() {
        let mut config = EngineConfig::new("http://localhost");
        config.target_lang = "en us".to_string();
        assert!(matches!(
            RemoteEngine::new(config),
            Err(MtError::InvalidLocale(_))
        ));
    }

    #[test]
    fn test_locales_are_normalized() {
        let mut config = EngineConfig::new("http://localhost");
        config.source_lang = "ja-JP".to_string();
        config.target_lang = "EN".to_string();
        let engine = RemoteEngine::new(config).unwrap();
        assert_eq!(engine.source_lang, "ja");
        assert_eq!(engine.target_lang, "en");
    }

    #[test]
    fn test_debug_masks_token() {
        let mut config = EngineConfig::new("http://localhost");
        config.token = Some("hunter2".to_string());
        let debug = format!("{:?}", RemoteEngine::new(config).unwrap());
        assert!(debug.contains("***"));
        assert!(!debug.contains("hunter2"));
    }

    // ========== Request Shape ==========

    #[test]
    fn test_request_body_shape() {
        let texts = vec!["こんにちは".to_string()];
        let body = EngineRequest {
            q: &texts,
            source: "ja",
            target: "en",
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"q": ["こんにちは"], "source": "ja", "target": "en"})
        );
    }

    // ========== Chunking Tests ==========

    #[test]
    fn test_chunk_partial_chunk() {
        let texts = (0..100).map(|i| format!("text{}", i)).collect::<Vec<_>>();
        let chunks = RemoteEngine::chunk_batch(&texts);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].len(), 64);
        assert_eq!(chunks[1].len(), 36);
    }

    #[test]
    fn test_chunk_empty() {
        let texts: Vec<String> = vec![];
        assert!(RemoteEngine::chunk_batch(&texts).is_empty());
    }

    // ========== Validation Tests ==========

    #[tokio::test]
    async fn test_translate_empty_text_skips_request() {
        assert_eq!(engine().translate("").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_translate_text_too_long() {
        let long_text = "あ".repeat(RemoteEngine::MAX_CHARS_PER_STRING + 1);
        match engine().translate(&long_text).await {
            Err(MtError::EngineError(msg)) => assert!(msg.contains("exceeds maximum")),
            _ => panic!("Expected EngineError"),
        }
    }

    #[tokio::test]
    async fn test_batch_empty() {
        assert!(engine().translate_batch(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_engine_is_network_error() {
        // Port 9 (discard) is not expected to accept HTTP connections
        let result = engine().translate("こんにちは").await;
        assert!(matches!(result, Err(MtError::NetworkError(_))));
    }

    // ========== Live Engine (require JA2EN_ENGINE_URL) ==========

    #[tokio::test]
    #[ignore] // Run with: cargo test --ignored
    async fn test_live_engine_translation() {
        if std::env::var("JA2EN_ENGINE_URL").is_err() {
            eprintln!("Skipping: JA2EN_ENGINE_URL not set");
            return;
        }

        let engine = RemoteEngine::from_env().unwrap();
        let result = engine.translate("こんにちは").await.unwrap();
        println!("Translation: こんにちは → {}", result);
        assert!(!result.is_empty());
    }
}
