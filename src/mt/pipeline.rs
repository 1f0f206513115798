//! Translation pipeline
//!
//! Wraps an engine with the text normalization steps:
//!
//! 1. **Pre-filter** - strip invisible marks, detect an enclosing bracket pair
//! 2. **Engine** - translate the cleaned Japanese text
//! 3. **Post-filter** - drop unknown-token markers, normalize punctuation
//! 4. **Re-wrap** - quote the English text when the source was bracketed
//!
//! The engine is constructed once by the caller and injected; the pipeline
//! holds no other state and may be shared across concurrent requests.

use crate::mt::error::MtResult;
use crate::mt::translator::MachineTranslator;
use crate::normalize::{decode_escapes, post_filter, pre_filter, split_sentences, wrap_if_bracketed};
use std::sync::Arc;
use tracing::{debug, info};

/// Text used to warm the engine up at startup
pub const WARM_UP_TEXT: &str = "こんにちわ";

/// Japanese→English translation pipeline over an injected engine
#[derive(Clone)]
pub struct Ja2En {
    engine: Arc<dyn MachineTranslator>,
    split_sentences: bool,
}

impl Ja2En {
    /// Create a pipeline over an already-initialized engine
    ///
    /// # Arguments
    ///
    /// * `engine` - Shared engine handle, built once at startup
    ///
    /// # Example
    ///
    /// ```ignore
    /// let ja2en = Ja2En::new(Arc::new(RemoteEngine::from_env()?));
    /// ja2en.warm_up().await?;
    /// ```
    pub fn new(engine: Arc<dyn MachineTranslator>) -> Self {
        Self {
            engine,
            split_sentences: false,
        }
    }

    /// Translate sentence by sentence instead of in one engine call
    pub fn with_sentence_split(mut self, enabled: bool) -> Self {
        self.split_sentences = enabled;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.engine.provider_name()
    }

    /// Run one translation so the engine is loaded before serving traffic
    pub async fn warm_up(&self) -> MtResult<String> {
        let result = self.translate(WARM_UP_TEXT).await?;
        info!("Warm-up via {}: {} → {}", self.provider_name(), WARM_UP_TEXT, result);
        Ok(result)
    }

    /// Decode `\uXXXX` escapes in request content, then translate it
    pub async fn translate_request(&self, content: &str) -> MtResult<String> {
        let decoded = decode_escapes(content)?;
        self.translate(&decoded).await
    }

    /// Translate already-decoded Japanese text
    ///
    /// Empty input (after pre-filtering) returns an empty string without
    /// calling the engine. Engine errors are returned unchanged.
    pub async fn translate(&self, raw: &str) -> MtResult<String> {
        info!("{}", raw);

        let pre = pre_filter(raw);
        debug!(text = %pre.text, is_bracket = pre.is_bracket, "pre-filtered");

        if pre.text.is_empty() {
            return Ok(String::new());
        }

        let translated = if self.split_sentences {
            let sentences = split_sentences(&pre.text);
            debug!(count = sentences.len(), "split into sentences");
            self.engine.translate_batch(&sentences).await?.join(" ")
        } else {
            self.engine.translate(&pre.text).await?
        };
        debug!(raw = %translated, "engine output");

        let result = wrap_if_bracketed(&post_filter(&translated), pre.is_bracket);
        info!("{}", result);

        Ok(result)
    }
}

impl std::fmt::Debug for Ja2En {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ja2En")
            .field("engine", &self.provider_name())
            .field("split_sentences", &self.split_sentences)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mt::error::MtError;
    use crate::mt::mock::{MockMode, MockTranslator};

    fn pipeline(mode: MockMode) -> (Ja2En, Arc<MockTranslator>) {
        let engine = Arc::new(MockTranslator::new(mode));
        (Ja2En::new(engine.clone()), engine)
    }

    #[tokio::test]
    async fn test_bracketed_input_is_quoted() {
        let (ja2en, engine) = pipeline(MockMode::Fixed("Hello<unk>there".to_string()));
        let result = ja2en.translate("「こんにちは」").await.unwrap();
        assert_eq!(result, "\"Hello there\"");
        assert_eq!(engine.received(), vec!["「こんにちは」"]);
    }

    #[tokio::test]
    async fn test_plain_input_is_not_quoted() {
        let (ja2en, _) = pipeline(MockMode::Fixed("'Hello'".to_string()));
        assert_eq!(ja2en.translate("こんにちは").await.unwrap(), "Hello");
    }

    #[tokio::test]
    async fn test_engine_receives_pre_filtered_text() {
        let (ja2en, engine) = pipeline(MockMode::NoOp);
        ja2en.translate("  こん\u{200b}にち\nは\u{3000}").await.unwrap();
        assert_eq!(engine.received(), vec!["こんにちは"]);
    }

    #[tokio::test]
    async fn test_empty_input_skips_engine() {
        let (ja2en, engine) = pipeline(MockMode::Error("must not be called".to_string()));
        assert_eq!(ja2en.translate(" \u{3000}\n").await.unwrap(), "");
        assert!(engine.received().is_empty());
    }

    #[tokio::test]
    async fn test_engine_error_propagates_verbatim() {
        let (ja2en, _) = pipeline(MockMode::Error("CUDA out of memory".to_string()));
        let err = ja2en.translate("こんにちは").await.unwrap_err();
        assert_eq!(err, MtError::EngineError("CUDA out of memory".to_string()));
        assert_eq!(err.to_string(), "CUDA out of memory");
    }

    #[tokio::test]
    async fn test_translate_request_decodes_escapes() {
        let (ja2en, engine) = pipeline(MockMode::NoOp);
        ja2en.translate_request(r"\u3053\u3093").await.unwrap();
        assert_eq!(engine.received(), vec!["こん"]);
    }

    #[tokio::test]
    async fn test_translate_request_decode_error_skips_engine() {
        let (ja2en, engine) = pipeline(MockMode::NoOp);
        let err = ja2en.translate_request(r"\udead").await.unwrap_err();
        assert!(matches!(err, MtError::DecodeError(_)));
        assert!(engine.received().is_empty());
    }

    #[tokio::test]
    async fn test_sentence_split_translates_each_sentence() {
        let (ja2en, engine) = pipeline(MockMode::NoOp);
        let ja2en = ja2en.with_sentence_split(true);
        let result = ja2en.translate("はい。いいえ！").await.unwrap();
        assert_eq!(engine.received(), vec!["はい。", "いいえ！"]);
        assert_eq!(result, "はい。 いいえ！");
    }

    #[tokio::test]
    async fn test_warm_up_uses_engine() {
        let (ja2en, engine) = pipeline(MockMode::Fixed("Hello".to_string()));
        assert_eq!(ja2en.warm_up().await.unwrap(), "Hello");
        assert_eq!(engine.received(), vec![WARM_UP_TEXT]);
    }

    #[tokio::test]
    async fn test_warm_up_fails_when_engine_down() {
        let (ja2en, _) = pipeline(MockMode::Error("unreachable".to_string()));
        assert!(ja2en.warm_up().await.is_err());
    }
}
