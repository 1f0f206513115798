//! Mock translation engine for testing
//!
//! Deterministic, model-free engine for exercising the pipeline without an
//! inference server.
//!
//! # Example
//!
//! ```ignore
//! use ja2en::mt::{MachineTranslator, MockTranslator, MockMode};
//!
//! #[tokio::test]
//! async fn test_translation() {
//!     let mock = MockTranslator::new(MockMode::Fixed("Hello<unk>there".to_string()));
//!     let result = mock.translate("こんにちは").await.unwrap();
//!     assert_eq!(result, "Hello<unk>there");
//! }
//! ```

use crate::mt::error::{MtError, MtResult};
use crate::mt::translator::MachineTranslator;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Mock translation modes for testing different scenarios
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Look up the input in a table, echoing it when absent
    Mappings(HashMap<String, String>),

    /// Return the same output for every input
    Fixed(String),

    /// Simulate engine failures
    Error(String),

    /// Echo the input unchanged
    NoOp,
}

/// Mock engine that simulates various engine behaviours
///
/// Every text it receives is recorded so tests can assert on exactly what
/// the pipeline sent to the engine.
#[derive(Debug)]
pub struct MockTranslator {
    mode: MockMode,
    /// Optional simulated inference delay (in milliseconds)
    delay_ms: u64,
    received: Mutex<Vec<String>>,
}

impl MockTranslator {
    /// Create a new MockTranslator with the given mode
    ///
    /// # Arguments
    ///
    /// * `mode` - The translation behaviour to simulate
    ///
    /// # Example
    ///
    /// ```ignore
    /// let mock = MockTranslator::new(MockMode::NoOp);
    /// ```
    pub fn new(mode: MockMode) -> Self {
        Self::with_delay(mode, 0)
    }

    /// Create a MockTranslator with simulated inference delay
    ///
    /// # Arguments
    ///
    /// * `mode` - The translation behaviour to simulate
    /// * `delay_ms` - Simulated delay in milliseconds, applied once per call
    ///
    /// # Example
    ///
    /// ```ignore
    /// let mock = MockTranslator::with_delay(MockMode::NoOp, 50);
    /// // Each translation will take at least 50ms
    /// ```
    pub fn with_delay(mode: MockMode, delay_ms: u64) -> Self {
        Self {
            mode,
            delay_ms,
            received: Mutex::new(Vec::new()),
        }
    }

    /// Texts passed to the engine so far, in call order
    pub fn received(&self) -> Vec<String> {
        self.received
            .lock()
            .map(|texts| texts.clone())
            .unwrap_or_default()
    }

    async fn apply_delay(&self) {
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
    }

    fn apply_translation(&self, text: &str) -> MtResult<String> {
        if let Ok(mut received) = self.received.lock() {
            received.push(text.to_string());
        }

        match &self.mode {
            MockMode::Mappings(map) => Ok(map.get(text).cloned().unwrap_or_else(|| text.to_string())),
            MockMode::Fixed(output) => Ok(output.clone()),
            MockMode::Error(msg) => Err(MtError::EngineError(msg.clone())),
            MockMode::NoOp => Ok(text.to_string()),
        }
    }
}

#[async_trait]
impl MachineTranslator for MockTranslator {
    async fn translate(&self, text: &str) -> MtResult<String> {
        self.apply_delay().await;
        self.apply_translation(text)
    }

    async fn translate_batch(&self, texts: &[String]) -> MtResult<Vec<String>> {
        // Delay is per batch, not per string
        self.apply_delay().await;

        texts
            .iter()
            .map(|text| self.apply_translation(text))
            .collect()
    }

    fn provider_name(&self) -> &str {
        "Mock Translator"
    }
}
