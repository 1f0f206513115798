/// Machine Translation Module
///
/// This module connects the text normalizer to a Japanese→English
/// translation engine.
///
/// # Overview
///
/// 1. **Engine Trait & Providers** - `MachineTranslator`, with a remote
///    inference-server client and a deterministic mock
/// 2. **Pipeline** - pre-filter, engine call, post-filter, bracket re-wrap
///
/// # Example
///
/// ```ignore
/// use ja2en::mt::{Ja2En, RemoteEngine};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let ja2en = Ja2En::new(Arc::new(RemoteEngine::from_env()?));
///     ja2en.warm_up().await?;
///
///     let english = ja2en.translate_request("「こんにちは」").await?;
///     println!("{}", english); // "\"Hello\""
///     Ok(())
/// }
/// ```
pub mod error;
pub mod mock;
pub mod pipeline;
pub mod remote;
pub mod translator;


pub use error::{MtError, MtResult};
pub use mock::{MockMode, MockTranslator};
pub use pipeline::{Ja2En, WARM_UP_TEXT};
pub use remote::RemoteEngine;
pub use translator::MachineTranslator;
