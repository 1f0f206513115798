//! Machine Translation trait and utilities
//!
//! This module defines the `MachineTranslator` trait, the seam between the
//! normalization pipeline and whatever actually runs the pretrained model
//! (a remote inference server, or a deterministic mock in tests).
//!
//! # Example
//!
//! ```ignore
//! use ja2en::mt::{MachineTranslator, RemoteEngine};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = RemoteEngine::from_env()?;
//!     let result = engine.translate("こんにちは").await?;
//!     println!("{}", result); // "Hello"
//!     Ok(())
//! }
//! ```

use crate::mt::error::{MtError, MtResult};
use async_trait::async_trait;

/// Generic trait for translation engines
///
/// The engine is fixed to one language pair at construction time, so callers
/// only pass text. All methods are async to support engines behind a network
/// hop. Implementations must be safe to share across concurrent requests.
#[async_trait]
pub trait MachineTranslator: Send + Sync {
    /// Translate a single text
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The raw engine output, before post-filtering
    /// * `Err(MtError)` - If the engine fails; the message is kept verbatim
    async fn translate(&self, text: &str) -> MtResult<String>;

    /// Translate several texts, preserving order
    ///
    /// The default implementation calls [`MachineTranslator::translate`]
    /// once per text. Engines with per-request overhead should override it.
    ///
    /// # Guarantees
    ///
    /// - Output order matches input order
    /// - Output length equals input length
    async fn translate_batch(&self, texts: &[String]) -> MtResult<Vec<String>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.translate(text).await?);
        }
        Ok(results)
    }

    /// Get the name of this engine, used in logs
    fn provider_name(&self) -> &str;
}

/// Normalize a locale code by stripping region information
///
/// - `ja-JP` → `ja`
/// - `en-US` → `en`
/// - `EN` → `en`
pub fn normalize_locale(locale: &str) -> String {
    locale.split('-').next().unwrap_or(locale).to_lowercase()
}

/// Validate that a locale code is in acceptable format
///
/// Checks that the locale code contains only alphanumeric characters,
/// hyphens, and underscores.
pub fn validate_locale(locale: &str) -> MtResult<()> {
    if locale.is_empty() {
        return Err(MtError::InvalidLocale("Locale code is empty".to_string()));
    }

    if !locale
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(MtError::InvalidLocale(format!(
            "Invalid characters in locale code: {}",
            locale
        )));
    }

    Ok(())
}
